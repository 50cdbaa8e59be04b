//! Record store implementations

/// Shared utilities used by store implementations.
pub mod common;

#[cfg(feature = "cim")]
mod cim;
#[cfg(feature = "memory")]
mod memory;

#[cfg(feature = "cim")]
pub use cim::CimRecordStore;
#[cfg(feature = "memory")]
pub use memory::InMemoryRecordStore;
