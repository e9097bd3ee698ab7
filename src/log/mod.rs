//! 日志模块
//!
//! 基于 provider 的日志系统：每个 provider 是一个带名称、最低级别（threshold）和可选 fallback 的
//! sink。写入失败时，失败原因和原始日志都会转交给 fallback provider，调用方不会丢失日志。
//!
//! # 特性
//!
//! - 五个日志级别：Debug, Information, Warning, Error, Critical
//! - 可扩展的 sink：MemorySink、ConsoleSink、FileSink、TracingSink，或通过 `register_sink` 注册
//! - 可扩展的格式化器：TextFormatter、JsonFormatter
//! - 注册表构建时校验配置（默认 provider、重名、fallback 缺失、fallback 成环）
//! - 按点分名称层级解析 provider（`System.Configuration` 匹配 `System.Configuration.Install.Foo`）
//! - 全局注册表首次使用时初始化，失败会被缓存
//!
//! # 快速开始
//!
//! ```rust,no_run
//! use chainlog::log::*;
//!
//! fn main() -> Result<()> {
//!     let config = LoggingConfig::from_json(r#"
//!         {
//!             default_provider: "File",
//!             providers: [
//!                 {
//!                     name: "File",
//!                     type: "FileSink",
//!                     threshold: "Information",
//!                     fallback: "Console",
//!                     settings: { file_path: "logs/app.log" }
//!                 },
//!                 {
//!                     name: "Console",
//!                     type: "ConsoleSink",
//!                     settings: { target: "stderr" }
//!                 }
//!             ]
//!         }
//!     "#)?;
//!
//!     configure(config)?;
//!
//!     log_message("application started")?;
//!     log(Severity::Warning, "disk usage above 80%")?;
//!
//!     Ok(())
//! }
//! ```

mod call_site;
mod config;
mod error;
pub mod formatter;
mod global;
mod level;
mod log_entry;
mod logger;
mod provider;
mod registry;
mod resolver;
pub mod sink;

pub use call_site::{MethodDescriptor, ParameterDescriptor};
pub use config::{LoggingConfig, ProviderDescriptor};
pub use error::{LoggingError, Result};
pub use level::Severity;
pub use log_entry::{EntryId, ExceptionInfo, LogEntry};
pub use logger::Logger;
pub use provider::Provider;
pub use registry::{ProviderRegistry, SinkFactory, TypeOptionsSinkFactory};
pub use resolver::resolve_provider;

pub use global::{
    configure,
    configure_with,
    flush,
    get_logger,
    // 默认 provider 的便捷方法
    log,
    log_anyhow,
    log_canonical,
    log_entry,
    log_error,
    log_error_with_call_site,
    log_exception,
    log_message,
    log_raw,
    log_with_call_site,
    log_with_exception,
    log_with_source,
    logger,
    provider,
    registry,
    set_sink_factory,
    RegistryCell,
    CONFIG_ENV_VAR,
};

pub use formatter::{
    create_formatter_from_options, register_formatters, JsonFormatter, JsonFormatterConfig,
    LogFormatter, TextFormatter, TextFormatterConfig,
};
pub use sink::{
    create_sink_from_options, register_fallible_sink, register_sink, register_sink_fn,
    register_sinks, ConsoleSink, ConsoleSinkConfig, FileSink, FileSinkConfig, LogSink,
    MemorySink, MemorySinkConfig, Target, TracingSink, TracingSinkConfig,
};

use std::sync::Once;

static REGISTER_ONCE: Once = Once::new();

/// 注册内置的 formatter 和 sink，重复调用无副作用
pub fn register_builtin_components() {
    REGISTER_ONCE.call_once(|| {
        if let Err(err) = register_formatters() {
            ::log::error!("failed to register built-in formatters: {:#}", err);
        }
        if let Err(err) = register_sinks() {
            ::log::error!("failed to register built-in sinks: {:#}", err);
        }
    });
}
