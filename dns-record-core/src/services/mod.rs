//! 业务逻辑服务层

mod batch_processor;
mod dispatcher;
mod server_resolver;
mod validator;

pub use batch_processor::{BatchProcessor, EXECUTE_CONTEXT};
pub use dispatcher::{ActionDispatcher, DispatchOutcome, Mutation};
pub use server_resolver::{ServerResolver, resolve_server};
pub use validator::{is_valid, validate};

use std::sync::Arc;
use std::time::Duration;

use dns_record_provider::RecordStore;

use crate::config::HandlerConfig;
use crate::traits::ProgressSink;

/// 服务上下文 - 持有所有依赖
///
/// 宿主需要创建此上下文，并注入记录存储与进度通知的实现。
pub struct ServiceContext {
    /// 记录存储
    pub store: Arc<dyn RecordStore>,
    /// 进度通知
    pub progress_sink: Arc<dyn ProgressSink>,
    /// 服务器路由
    pub resolver: ServerResolver,
    /// A 记录默认区域
    pub joined_domain: Option<String>,
    /// 单次存储调用超时
    pub store_timeout: Duration,
}

impl ServiceContext {
    /// 创建服务上下文
    #[must_use]
    pub fn new(
        config: &HandlerConfig,
        store: Arc<dyn RecordStore>,
        progress_sink: Arc<dyn ProgressSink>,
    ) -> Self {
        Self {
            store,
            progress_sink,
            resolver: config.server_resolver(),
            joined_domain: config
                .joined_domain
                .as_deref()
                .map(str::trim)
                .filter(|zone| !zone.is_empty())
                .map(str::to_string),
            store_timeout: config.store_timeout(),
        }
    }
}
