use crate::log::call_site::MethodDescriptor;
use crate::log::error::Result;
use crate::log::level::Severity;
use crate::log::log_entry::{EntryId, ExceptionInfo, LogEntry};
use crate::log::provider::Provider;
use crate::log::registry::ProviderRegistry;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

/// 日志门面
///
/// 所有便捷方法最终都归结为 [`Logger::log_canonical`]：校验参数、补全默认值、构造
/// [`LogEntry`]，然后交给 provider 的 fallback 链写入。
///
/// 默认值规则：
/// - 只给出消息时级别为 `Information`
/// - 只给出错误时级别为 `Error`，消息取错误自身的消息，为空时取错误类型名
/// - 给出 [`MethodDescriptor`] 时 source 为 `"{类型}.{方法}({参数})"`
///
/// # 示例
///
/// ```ignore
/// let registry = Arc::new(ProviderRegistry::new(&config)?);
/// let logger = registry.logger("System.Configuration");
///
/// logger.log_message("application started")?;
/// logger.log_with_call_site(Severity::Warning, "slow query", &call_site!())?;
/// if let Err(err) = "x".parse::<i32>() {
///     logger.log_error(&err)?;
/// }
/// ```
#[derive(Clone)]
pub struct Logger {
    target: Target,
}

#[derive(Clone)]
enum Target {
    Provider {
        provider: Arc<Provider>,
        // provider 之间的 fallback 是弱引用，持有注册表保证整条链在 Logger 存活期间有效
        _registry: Option<Arc<ProviderRegistry>>,
    },
    // 每次写入时才获取全局默认 provider，参数校验先于全局初始化
    Global,
}

impl Logger {
    /// 直接包装一个 provider
    ///
    /// provider 的 fallback 链由调用方负责保持存活
    pub fn new(provider: Arc<Provider>) -> Self {
        Self {
            target: Target::Provider {
                provider,
                _registry: None,
            },
        }
    }

    pub fn with_registry(provider: Arc<Provider>, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            target: Target::Provider {
                provider,
                _registry: Some(registry),
            },
        }
    }

    /// 写入全局默认 provider 的 Logger
    pub fn global() -> Self {
        Self {
            target: Target::Global,
        }
    }

    /// 当前写入的 provider，全局 Logger 会触发全局注册表初始化
    pub fn provider(&self) -> Result<Arc<Provider>> {
        match &self.target {
            Target::Provider { provider, .. } => Ok(provider.clone()),
            Target::Global => crate::log::global::provider(),
        }
    }

    /// 以 `Information` 级别记录消息
    pub fn log_message(&self, message: &str) -> Result<Option<EntryId>> {
        self.log(Severity::Information, message)
    }

    pub fn log(&self, severity: Severity, message: &str) -> Result<Option<EntryId>> {
        self.log_canonical(severity, Some(message), None, None)
    }

    pub fn log_with_source(
        &self,
        severity: Severity,
        message: &str,
        source: &str,
    ) -> Result<Option<EntryId>> {
        self.log_canonical(severity, Some(message), Some(source), None)
    }

    /// source 由调用位置描述生成
    pub fn log_with_call_site(
        &self,
        severity: Severity,
        message: &str,
        call_site: &MethodDescriptor,
    ) -> Result<Option<EntryId>> {
        let source = call_site.to_string();
        self.log_canonical(severity, Some(message), Some(&source), None)
    }

    pub fn log_with_exception(
        &self,
        severity: Severity,
        message: &str,
        exception: ExceptionInfo,
    ) -> Result<Option<EntryId>> {
        self.log_canonical(severity, Some(message), None, Some(exception))
    }

    /// 以 `Error` 级别记录错误
    pub fn log_error<E>(&self, err: &E) -> Result<Option<EntryId>>
    where
        E: StdError + 'static,
    {
        self.log_exception(Severity::Error, ExceptionInfo::from_error(err))
    }

    pub fn log_error_with_call_site<E>(
        &self,
        err: &E,
        call_site: &MethodDescriptor,
    ) -> Result<Option<EntryId>>
    where
        E: StdError + 'static,
    {
        let exception = ExceptionInfo::from_error(err);
        let message = exception_message(&exception);
        let source = call_site.to_string();
        self.log_canonical(Severity::Error, Some(&message), Some(&source), Some(exception))
    }

    /// 以 `Error` 级别记录 anyhow 错误，保留完整的 context 链
    pub fn log_anyhow(&self, err: &anyhow::Error) -> Result<Option<EntryId>> {
        self.log_exception(Severity::Error, ExceptionInfo::from_anyhow(err))
    }

    /// 记录已捕获的错误，消息取错误自身的消息，为空时取类型名
    pub fn log_exception(
        &self,
        severity: Severity,
        exception: ExceptionInfo,
    ) -> Result<Option<EntryId>> {
        let message = exception_message(&exception);
        self.log_canonical(severity, Some(&message), None, Some(exception))
    }

    /// 直接写入已构造的日志条目
    pub fn log_entry(&self, entry: &LogEntry) -> Result<Option<EntryId>> {
        match &self.target {
            Target::Provider { provider, .. } => provider.log(entry),
            Target::Global => crate::log::global::provider()?.log(entry),
        }
    }

    /// 统一入口
    ///
    /// `message` 为 `None` 返回 `ArgumentNull`，为空字符串返回 `ArgumentEmpty`；
    /// `source` 显式给出空字符串返回 `ArgumentEmpty`
    pub fn log_canonical(
        &self,
        severity: Severity,
        message: Option<&str>,
        source: Option<&str>,
        exception: Option<ExceptionInfo>,
    ) -> Result<Option<EntryId>> {
        self.log_raw(severity.value(), message, source, exception)
    }

    /// 与 [`Logger::log_canonical`] 相同，但级别以整数给出，超出范围时返回 `InvalidEnumValue`
    pub fn log_raw(
        &self,
        severity: i32,
        message: Option<&str>,
        source: Option<&str>,
        exception: Option<ExceptionInfo>,
    ) -> Result<Option<EntryId>> {
        let entry = LogEntry::from_raw(severity, message, source, exception)?;
        self.log_entry(&entry)
    }
}

/// 错误没有消息时使用类型名
pub(crate) fn exception_message(exception: &ExceptionInfo) -> String {
    if exception.message.is_empty() {
        exception.type_name.clone()
    } else {
        exception.message.clone()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.target {
            Target::Provider { provider, .. } => f
                .debug_struct("Logger")
                .field("provider", &provider.name())
                .finish(),
            Target::Global => f.debug_struct("Logger").field("provider", &"<global>").finish(),
        }
    }
}
