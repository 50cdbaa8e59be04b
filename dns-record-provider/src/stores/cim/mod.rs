//! Windows DNS server store over CIM
//!
//! Talks to the DNS server WMI provider (`root\MicrosoftDNS`) with the
//! PowerShell CIM cmdlets, locally or through `-ComputerName` for remote
//! servers.

mod error;
mod provider;
mod script;
mod types;

pub(crate) use types::CimRows;

pub(crate) const DNS_NAMESPACE: &str = r"root\MicrosoftDNS";
pub(crate) const DEFAULT_SHELL: &str = "powershell.exe";

/// Windows DNS server record store
pub struct CimRecordStore {
    pub(crate) shell: String,
}

impl CimRecordStore {
    /// Store using the default Windows PowerShell executable.
    pub fn new() -> Self {
        Self::with_shell(DEFAULT_SHELL)
    }

    /// Store using a specific PowerShell executable (e.g. `pwsh`).
    pub fn with_shell(shell: impl Into<String>) -> Self {
        Self {
            shell: shell.into(),
        }
    }
}

impl Default for CimRecordStore {
    fn default() -> Self {
        Self::new()
    }
}
