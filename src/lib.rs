//! ChainLog - 基于 provider 的日志库
//!
//! 应用通过一组具名的 provider 记录日志，每个 provider 有自己的最低级别、fallback provider 和输出目标。
//!
//! ## 模块
//!
//! - **cfg**: 配置工具（TypeOptions、按类型名注册的工厂、JSON5/YAML/TOML 解析）
//! - **log**: 日志模块（provider 注册表、fallback 链、名称层级解析、日志门面）
//!
//! ## 设计理念
//!
//! - **尽早失败**: 配置错误在注册表初始化时立即报告，并在之后每次访问时原样返回
//! - **不丢日志**: provider 写入失败时，失败原因和原始日志都会写入 fallback provider
//! - **读多写少**: 注册表初始化后只读，记录日志无需加锁

pub mod cfg;
pub mod log;

// 重新导出主要的公共 API
pub use cfg::{create_trait_from_type_options, register_trait, TypeOptions};

pub use log::{
    EntryId, ExceptionInfo, LogEntry, LogSink, Logger, LoggingConfig, LoggingError, MethodDescriptor,
    Provider, ProviderDescriptor, ProviderRegistry, Severity,
};
