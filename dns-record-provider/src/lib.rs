//! # dns-record-provider
//!
//! Record store abstraction for Windows DNS servers: creates, deletes and
//! queries A and PTR records on a named DNS server.
//!
//! ## Supported Stores
//!
//! | Store | Feature Flag | Transport |
//! |-------|-------------|-----------|
//! | [`CimRecordStore`] | `cim` | PowerShell CIM cmdlets against the `root\MicrosoftDNS` WMI namespace |
//! | [`InMemoryRecordStore`] | `memory` | Process memory (tests, dry runs, non-Windows hosts) |
//!
//! ## Feature Flags
//!
//! - **`cim`** *(default)*: Enable the Windows DNS server store.
//! - **`memory`** *(default)*: Enable the in-memory store.
//! - **`all-stores`**: Enable every store listed above.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::net::Ipv4Addr;
//!
//! use dns_record_provider::{ARecordSpec, RecordStore, StoreBackend, create_store};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = create_store(StoreBackend::Cim { shell: None });
//!
//!     store
//!         .create_a_record(
//!             "dns01.corp.example.com",
//!             &ARecordSpec {
//!                 zone: "corp.example.com".to_string(),
//!                 owner: "web01.corp.example.com".to_string(),
//!                 address: Ipv4Addr::new(10, 2, 0, 9),
//!             },
//!         )
//!         .await?;
//!
//!     let removed = store
//!         .delete_a_record("dns01.corp.example.com", "web01.corp.example.com")
//!         .await?;
//!     println!("removed {removed} record(s)");
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! All store operations return [`Result<T, StoreError>`](StoreError). The
//! server's own message is preserved in every variant that carries one:
//!
//! - [`StoreError::ConnectionFailed`]: server unreachable (`The RPC server is unavailable.`)
//! - [`StoreError::ZoneNotFound`]: the zone is not hosted by the server
//! - [`StoreError::RecordExists`]: duplicate record
//! - [`StoreError::Timeout`]: no response within the caller's time limit

mod error;
mod factory;
#[cfg(feature = "cim")]
mod shell_client;
mod stores;
mod traits;
mod types;
#[cfg(feature = "cim")]
mod utils;

// Re-export error types
pub use error::{Result, StoreError};

// Re-export factory functions
pub use factory::create_store;

// Re-export core trait only (internal traits are not exported)
pub use traits::RecordStore;

// Re-export types
pub use types::{
    ARecordSpec, MemoryServerSeed, PtrRecordSpec, RecordFilter, RecordKind, StoreBackend,
    StoredRecord,
};

// Re-export naming helpers
pub use stores::common::{LOCAL_SERVER, is_local_server, normalize_domain_name, to_rooted_name};

// Re-export concrete stores (behind feature flags)
#[cfg(feature = "cim")]
pub use stores::CimRecordStore;

#[cfg(feature = "memory")]
pub use stores::InMemoryRecordStore;
