//! Store 公共工具函数

/// Server name meaning "the DNS server on this machine".
pub const LOCAL_SERVER: &str = ".";

/// 去掉域名末尾的点
pub fn normalize_domain_name(name: &str) -> String {
    name.trim().trim_end_matches('.').to_string()
}

/// 转为带末尾点的完全限定名（PTR 记录数据以此形式保存）
/// 如: "web01.example.com" -> "web01.example.com."
pub fn to_rooted_name(name: &str) -> String {
    format!("{}.", normalize_domain_name(name))
}

/// Whether `server` designates the local DNS server.
pub fn is_local_server(server: &str) -> bool {
    let server = server.trim();
    server.is_empty() || server == LOCAL_SERVER || server.eq_ignore_ascii_case("localhost")
}

/// Key used to index servers: local aliases collapse to `"."`, everything else is lower-cased.
pub fn server_key(server: &str) -> String {
    if is_local_server(server) {
        LOCAL_SERVER.to_string()
    } else {
        normalize_domain_name(server).to_ascii_lowercase()
    }
}
