//! Store factory functions.

use std::sync::Arc;

use crate::traits::RecordStore;
use crate::types::StoreBackend;

#[cfg(feature = "cim")]
use crate::stores::CimRecordStore;
#[cfg(feature = "memory")]
use crate::stores::InMemoryRecordStore;

/// Creates a [`RecordStore`] for the given backend selection.
///
/// The returned store is wrapped in `Arc<dyn RecordStore>` so it can be
/// shared across async tasks.
///
/// # Examples
///
/// ```rust
/// use dns_record_provider::{create_store, RecordStore, StoreBackend};
///
/// let store = create_store(StoreBackend::Memory { servers: Vec::new() });
/// assert_eq!(store.id(), "memory");
/// ```
#[must_use]
pub fn create_store(backend: StoreBackend) -> Arc<dyn RecordStore> {
    match backend {
        #[cfg(feature = "cim")]
        StoreBackend::Cim { shell } => match shell {
            Some(shell) => Arc::new(CimRecordStore::with_shell(shell)),
            None => Arc::new(CimRecordStore::new()),
        },
        #[cfg(feature = "memory")]
        StoreBackend::Memory { servers } => Arc::new(InMemoryRecordStore::from_seeds(&servers)),
    }
}
