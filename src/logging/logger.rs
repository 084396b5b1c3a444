// src/logging/logger.rs

use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::{fmt, EnvFilter, Registry};

use crate::error::{AdapterError, AdapterResult};

/// 初始化全局 tracing 日志：JSON 格式，按小时滚动写入 log_dir/file_name
///
/// 返回的 guard 必须在进程退出前保持存活，否则缓冲中的日志会丢失。
/// 适配器本身从不调用此函数，订阅器由宿主或 replay 工具安装。
pub fn init(log_dir: &str, file_name: &str) -> AdapterResult<WorkerGuard> {
    let log_file = rolling::hourly(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(log_file);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = Registry::default()
        .with(filter)
        .with(fmt::layer().json().with_writer(non_blocking));

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AdapterError::Config(format!("Unable to set global tracing subscriber: {}", e)))?;
    Ok(guard)
}
