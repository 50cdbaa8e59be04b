//! 类型定义模块

mod progress;
mod request;
mod response;
mod route;

pub use progress::{BatchStatus, FINAL_SEQUENCE, ProgressEvent};
pub use request::{
    BatchRequest, PayloadItem, RecordAction, RecordActionRequest, ValidatedRequest,
};
pub use response::{ActionResult, BatchResponse, EXIT_FAILURE, EXIT_SUCCESS};
pub use route::DnsServerRoute;

// Re-export provider 库的公共类型
pub use dns_record_provider::{
    ARecordSpec, MemoryServerSeed, PtrRecordSpec, RecordFilter, RecordKind, StoreBackend,
    StoredRecord,
};
