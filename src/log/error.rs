use std::error::Error as StdError;
use std::sync::Arc;
use thiserror::Error;

/// 日志系统统一错误类型
///
/// - 参数校验错误：`ArgumentNull`、`ArgumentEmpty`、`InvalidEnumValue`
/// - 配置错误：注册表初始化阶段产生，初始化失败后会被缓存并在每次访问时原样返回
/// - 持久化错误：`Sink`，只有在没有可用的 fallback provider 时才会返回给调用方
///
/// 实现了 `Clone`，以便缓存的初始化错误可以重复返回
#[derive(Error, Debug, Clone)]
pub enum LoggingError {
    #[error("value for parameter '{parameter}' must not be null")]
    ArgumentNull { parameter: &'static str },

    #[error("value for parameter '{parameter}' must not be an empty string")]
    ArgumentEmpty { parameter: &'static str },

    #[error("value {value} for parameter '{parameter}' is not a valid Severity")]
    InvalidEnumValue { parameter: &'static str, value: i64 },

    #[error("missing default provider: {reason}")]
    MissingDefaultProvider { reason: String },

    #[error("provider name '{name}' is configured more than once (names are case-insensitive)")]
    DuplicateProviderName { name: String },

    #[error("provider '{provider}' references fallback provider '{fallback}', which is not configured")]
    UnresolvedFallback { provider: String, fallback: String },

    #[error("fallback providers form a cycle: {cycle}")]
    CyclicFallback { cycle: String },

    #[error("provider '{provider}' could not be created: {message}")]
    Configuration { provider: String, message: String },

    #[error("logging configuration could not be loaded: {message}")]
    ConfigSource { message: String },

    #[error("the logging system is already initialized")]
    AlreadyInitialized,

    #[error("provider '{provider}' failed to log: {source}")]
    Sink {
        provider: String,
        #[source]
        source: Arc<dyn StdError + Send + Sync>,
    },
}

impl LoggingError {
    /// 从 sink 返回的错误构造持久化错误
    pub fn sink(provider: impl Into<String>, err: anyhow::Error) -> Self {
        let boxed: Box<dyn StdError + Send + Sync> = err.into();
        LoggingError::Sink {
            provider: provider.into(),
            source: Arc::from(boxed),
        }
    }

    /// 是否为参数校验错误
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            LoggingError::ArgumentNull { .. }
                | LoggingError::ArgumentEmpty { .. }
                | LoggingError::InvalidEnumValue { .. }
        )
    }

    /// 是否为配置错误
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            LoggingError::MissingDefaultProvider { .. }
                | LoggingError::DuplicateProviderName { .. }
                | LoggingError::UnresolvedFallback { .. }
                | LoggingError::CyclicFallback { .. }
                | LoggingError::Configuration { .. }
                | LoggingError::ConfigSource { .. }
        )
    }
}

pub type Result<T, E = LoggingError> = std::result::Result<T, E>;
