//! CIM script construction
//!
//! Values reach the scripts through two quoting layers: WQL string literals
//! (double-quoted, backslash escapes) embedded in PowerShell single-quoted
//! strings (quote characters doubled).

use std::fmt::Write as _;

use crate::stores::common::{is_local_server, to_rooted_name};
use crate::types::{ARecordSpec, PtrRecordSpec, RecordFilter, RecordKind};

use super::DNS_NAMESPACE;

/// Characters PowerShell treats as a single quote inside single-quoted strings.
const SINGLE_QUOTES: [char; 5] = ['\'', '\u{2018}', '\u{2019}', '\u{201A}', '\u{201B}'];

/// Quote a value as a PowerShell single-quoted string literal.
pub fn ps_quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('\'');
    for c in value.chars() {
        if SINGLE_QUOTES.contains(&c) {
            quoted.push(c);
        }
        quoted.push(c);
    }
    quoted.push('\'');
    quoted
}

/// Quote a value as a WQL string literal.
pub fn wql_string(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// WMI class holding records of `kind`.
pub fn class_name(kind: RecordKind) -> String {
    format!("MicrosoftDNS_{}", kind.wire_name())
}

/// WMI property carrying the record data of `kind`.
fn data_property(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::A => "IPAddress",
        RecordKind::Ptr => "PTRDomainName",
    }
}

/// `-ComputerName` argument, empty for the local server.
fn computer_arg(server: &str) -> String {
    if is_local_server(server) {
        String::new()
    } else {
        format!(" -ComputerName {}", ps_quote(server.trim()))
    }
}

/// `DnsServerName` argument value.
fn dns_server_name(server: &str) -> String {
    if is_local_server(server) {
        "$env:COMPUTERNAME".to_string()
    } else {
        ps_quote(server.trim())
    }
}

/// WQL selecting the records matched by `filter`.
pub fn select_query(filter: &RecordFilter) -> String {
    let mut query = format!(
        "SELECT * FROM {} WHERE OwnerName = {}",
        class_name(filter.kind),
        wql_string(&filter.owner)
    );
    if let Some(data) = &filter.data {
        let value = match filter.kind {
            RecordKind::A => data.trim().to_string(),
            RecordKind::Ptr => to_rooted_name(data),
        };
        let _ = write!(
            query,
            " AND {} = {}",
            data_property(filter.kind),
            wql_string(&value)
        );
    }
    query
}

fn get_instances(server: &str, filter: &RecordFilter) -> String {
    format!(
        "$records = @(Get-CimInstance -Namespace {} -Query {}{})\n",
        ps_quote(DNS_NAMESPACE),
        ps_quote(&select_query(filter)),
        computer_arg(server)
    )
}

fn create_instance(server: &str, kind: RecordKind, properties: &[(&str, &str)]) -> String {
    let mut arguments = format!("DnsServerName = {}", dns_server_name(server));
    for (name, value) in properties {
        let _ = write!(arguments, "; {name} = {}", ps_quote(value));
    }
    format!(
        "$arguments = @{{ {arguments} }}\n\
         Invoke-CimMethod -Namespace {} -ClassName {} -MethodName 'CreateInstanceFromPropertyData' -Arguments $arguments{} | Out-Null\n",
        ps_quote(DNS_NAMESPACE),
        ps_quote(&class_name(kind)),
        computer_arg(server)
    )
}

/// Script creating an A record.
pub fn create_a_script(server: &str, spec: &ARecordSpec) -> String {
    let address = spec.address.to_string();
    create_instance(
        server,
        RecordKind::A,
        &[
            ("ContainerName", spec.zone.as_str()),
            ("OwnerName", spec.owner.as_str()),
            ("IPAddress", address.as_str()),
        ],
    )
}

/// Script creating a PTR record.
pub fn create_ptr_script(server: &str, spec: &PtrRecordSpec) -> String {
    create_instance(
        server,
        RecordKind::Ptr,
        &[
            ("ContainerName", spec.zone.as_str()),
            ("OwnerName", spec.owner.as_str()),
            ("PTRDomainName", spec.target.as_str()),
        ],
    )
}

/// Script printing the matched records as a JSON array.
pub fn query_script(server: &str, filter: &RecordFilter) -> String {
    format!(
        "{}ConvertTo-Json -Compress -InputObject @($records | Select-Object ContainerName, OwnerName, RecordData)\n",
        get_instances(server, filter)
    )
}

/// Script deleting the matched records and printing how many there were.
pub fn delete_script(server: &str, filter: &RecordFilter) -> String {
    format!(
        "{}if ($records.Count -gt 0) {{ $records | Remove-CimInstance }}\n$records.Count\n",
        get_instances(server, filter)
    )
}
