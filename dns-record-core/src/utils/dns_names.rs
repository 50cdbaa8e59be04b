//! 域名与反向解析名称工具

/// Suffix of IPv4 reverse-lookup owner names.
pub const REVERSE_LOOKUP_SUFFIX: &str = "in-addr.arpa";

/// Reverse the dot-separated labels of an address: `10.2.0.9` -> `9.0.2.10`.
pub fn reverse_ip_address(ip: &str) -> String {
    ip.trim().split('.').rev().collect::<Vec<_>>().join(".")
}

/// PTR owner name of an IPv4 address: `10.2.0.9` -> `9.0.2.10.in-addr.arpa`.
pub fn ptr_owner_name(ip: &str) -> String {
    format!("{}.{REVERSE_LOOKUP_SUFFIX}", reverse_ip_address(ip))
}

/// Domain suffix of a hostname: everything after the first `.`.
///
/// Returns an empty string when the hostname has no `.`.
pub fn domain_suffix(hostname: &str) -> &str {
    hostname
        .trim()
        .split_once('.')
        .map_or("", |(_, suffix)| suffix.trim_end_matches('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reverses_address_labels() {
        assert_eq!(reverse_ip_address("10.2.0.9"), "9.0.2.10");
        assert_eq!(reverse_ip_address(" 192.168.1.20 "), "20.1.168.192");
    }

    #[test]
    fn builds_ptr_owner_name() {
        assert_eq!(ptr_owner_name("10.2.0.9"), "9.0.2.10.in-addr.arpa");
    }

    #[test]
    fn extracts_domain_suffix() {
        assert_eq!(domain_suffix("host.xxx.com"), "xxx.com");
        assert_eq!(domain_suffix("web01.corp.example.com."), "corp.example.com");
        assert_eq!(domain_suffix("localhost"), "");
        assert_eq!(domain_suffix("trailing."), "");
        assert_eq!(domain_suffix(""), "");
    }
}
