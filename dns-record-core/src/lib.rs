//! DNS Record Handler Core Library
//!
//! Processes batches of A / PTR record requests against Windows DNS servers:
//! - Request validation
//! - Server routing by domain suffix
//! - Action dispatch to the record store (dry-run aware)
//! - Batch aggregation with per-item isolation
//!
//! The record store and the progress destination are injected through
//! traits, so the library runs the same under the CLI host, an orchestrator
//! plugin host or tests.

pub mod config;
pub mod error;
pub mod handler;
pub mod services;
pub mod traits;
pub mod types;
pub mod utils;

#[cfg(test)]
mod test_utils;

// Re-export common types
pub use config::HandlerConfig;
pub use error::{CoreError, CoreResult, ResolutionError, ValidationError};
pub use handler::DnsRecordHandler;
pub use services::ServiceContext;
pub use traits::{InMemoryProgressSink, LogProgressSink, ProgressSink};
