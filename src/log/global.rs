use crate::log::call_site::MethodDescriptor;
use crate::log::config::LoggingConfig;
use crate::log::error::{LoggingError, Result};
use crate::log::level::Severity;
use crate::log::log_entry::{EntryId, ExceptionInfo, LogEntry};
use crate::log::logger::Logger;
use crate::log::provider::Provider;
use crate::log::registry::{ProviderRegistry, SinkFactory, TypeOptionsSinkFactory};
use once_cell::sync::{Lazy, OnceCell};
use std::any::Any;
use std::error::Error as StdError;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Mutex};

/// 未通过 [`configure`] 指定配置时，从该环境变量指定的文件加载配置
pub const CONFIG_ENV_VAR: &str = "CHAINLOG_CONFIG";

type ConfigLoader = Box<dyn FnOnce() -> Result<LoggingConfig> + Send>;

struct Pending {
    loader: Option<ConfigLoader>,
    factory: Arc<dyn SinkFactory>,
    started: bool,
}

/// 只初始化一次的注册表单元
///
/// 首次访问时加载配置并构建注册表，结果（成功的注册表或失败的错误）被缓存，之后每次访问都返回
/// 同一个注册表实例或同一个错误，失败后不会重试。并发的首次访问只会触发一次构建
pub struct RegistryCell {
    pending: Mutex<Pending>,
    state: OnceCell<Result<Arc<ProviderRegistry>>>,
}

impl RegistryCell {
    /// 从 `CHAINLOG_CONFIG` 指定的文件加载配置，未设置时使用空配置
    pub fn new() -> Self {
        Self::from_loader(Box::new(load_from_environment))
    }

    pub fn with_loader<F>(loader: F) -> Self
    where
        F: FnOnce() -> Result<LoggingConfig> + Send + 'static,
    {
        Self::from_loader(Box::new(loader))
    }

    fn from_loader(loader: ConfigLoader) -> Self {
        Self {
            pending: Mutex::new(Pending {
                loader: Some(loader),
                factory: Arc::new(TypeOptionsSinkFactory),
                started: false,
            }),
            state: OnceCell::new(),
        }
    }

    /// 使用指定配置，必须在首次访问前调用
    pub fn configure(&self, config: LoggingConfig) -> Result<()> {
        self.configure_with(move || Ok(config))
    }

    /// 使用指定的配置加载函数，必须在首次访问前调用
    pub fn configure_with<F>(&self, loader: F) -> Result<()>
    where
        F: FnOnce() -> Result<LoggingConfig> + Send + 'static,
    {
        let mut pending = self.lock_pending()?;
        if pending.started {
            return Err(LoggingError::AlreadyInitialized);
        }
        pending.loader = Some(Box::new(loader));
        Ok(())
    }

    /// 替换创建 sink 的工厂，必须在首次访问前调用
    pub fn set_sink_factory<S>(&self, factory: S) -> Result<()>
    where
        S: SinkFactory + 'static,
    {
        let mut pending = self.lock_pending()?;
        if pending.started {
            return Err(LoggingError::AlreadyInitialized);
        }
        pending.factory = Arc::new(factory);
        Ok(())
    }

    /// 获取注册表，首次调用时初始化
    pub fn get(&self) -> Result<Arc<ProviderRegistry>> {
        self.state.get_or_init(|| self.initialize()).clone()
    }

    /// 是否已经完成初始化（无论成功还是失败）
    pub fn is_initialized(&self) -> bool {
        self.state.get().is_some()
    }

    fn initialize(&self) -> Result<Arc<ProviderRegistry>> {
        let (loader, factory) = {
            let mut pending = self.lock_pending()?;
            pending.started = true;
            (pending.loader.take(), pending.factory.clone())
        };

        // loader 已被取出，panic 也必须作为初始化结果缓存，否则下次访问会用空配置重新初始化
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            loader
                .map_or_else(|| Ok(LoggingConfig::default()), |load| load())
                .and_then(|config| ProviderRegistry::with_factory(&config, factory.as_ref()))
                .map(Arc::new)
        }))
        .unwrap_or_else(|payload| {
            Err(LoggingError::ConfigSource {
                message: format!("initialization panicked: {}", panic_message(payload.as_ref())),
            })
        });

        match &result {
            Ok(registry) => ::log::debug!(
                "logging system initialized, default provider '{}'",
                registry.default_provider().name()
            ),
            Err(err) => ::log::error!("logging system initialization failed: {}", err),
        }
        result
    }

    fn lock_pending(&self) -> Result<std::sync::MutexGuard<'_, Pending>> {
        self.pending.lock().map_err(|_| LoggingError::ConfigSource {
            message: "logging configuration lock is poisoned".to_string(),
        })
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    payload
        .downcast_ref::<&str>()
        .copied()
        .or_else(|| payload.downcast_ref::<String>().map(String::as_str))
        .unwrap_or("unknown panic")
}

impl Default for RegistryCell {
    fn default() -> Self {
        Self::new()
    }
}

fn load_from_environment() -> Result<LoggingConfig> {
    match std::env::var(CONFIG_ENV_VAR) {
        Ok(path) if !path.is_empty() => LoggingConfig::from_file(&path),
        _ => Ok(LoggingConfig::default()),
    }
}

static GLOBAL_REGISTRY: Lazy<RegistryCell> = Lazy::new(RegistryCell::new);

/// 设置全局配置，必须在第一次记录日志之前调用
///
/// # 示例
///
/// ```ignore
/// chainlog::log::configure(LoggingConfig::from_file("logging.yaml")?)?;
/// chainlog::log::log_message("application started")?;
/// ```
pub fn configure(config: LoggingConfig) -> Result<()> {
    GLOBAL_REGISTRY.configure(config)
}

pub fn configure_with<F>(loader: F) -> Result<()>
where
    F: FnOnce() -> Result<LoggingConfig> + Send + 'static,
{
    GLOBAL_REGISTRY.configure_with(loader)
}

pub fn set_sink_factory<S>(factory: S) -> Result<()>
where
    S: SinkFactory + 'static,
{
    GLOBAL_REGISTRY.set_sink_factory(factory)
}

/// 全局注册表
pub fn registry() -> Result<Arc<ProviderRegistry>> {
    GLOBAL_REGISTRY.get()
}

/// 刷新全局注册表中所有 sink，注册表尚未初始化时不做任何事
pub fn flush() -> Result<()> {
    match GLOBAL_REGISTRY.state.get() {
        Some(Ok(registry)) => registry.flush(),
        _ => Ok(()),
    }
}

/// 全局默认 provider
pub fn provider() -> Result<Arc<Provider>> {
    Ok(registry()?.default_provider().clone())
}

/// 写入全局默认 provider 的 Logger
pub fn logger() -> Logger {
    Logger::global()
}

/// 按名称层级解析全局注册表中的 provider
pub fn get_logger(name: &str) -> Result<Logger> {
    Ok(registry()?.logger(name))
}

// ========== 默认 provider 的便捷方法 ==========

pub fn log_message(message: &str) -> Result<Option<EntryId>> {
    logger().log_message(message)
}

pub fn log(severity: Severity, message: &str) -> Result<Option<EntryId>> {
    logger().log(severity, message)
}

pub fn log_with_source(severity: Severity, message: &str, source: &str) -> Result<Option<EntryId>> {
    logger().log_with_source(severity, message, source)
}

pub fn log_with_call_site(
    severity: Severity,
    message: &str,
    call_site: &MethodDescriptor,
) -> Result<Option<EntryId>> {
    logger().log_with_call_site(severity, message, call_site)
}

pub fn log_with_exception(
    severity: Severity,
    message: &str,
    exception: ExceptionInfo,
) -> Result<Option<EntryId>> {
    logger().log_with_exception(severity, message, exception)
}

pub fn log_error<E>(err: &E) -> Result<Option<EntryId>>
where
    E: StdError + 'static,
{
    logger().log_error(err)
}

pub fn log_error_with_call_site<E>(err: &E, call_site: &MethodDescriptor) -> Result<Option<EntryId>>
where
    E: StdError + 'static,
{
    logger().log_error_with_call_site(err, call_site)
}

pub fn log_anyhow(err: &anyhow::Error) -> Result<Option<EntryId>> {
    logger().log_anyhow(err)
}

pub fn log_exception(severity: Severity, exception: ExceptionInfo) -> Result<Option<EntryId>> {
    logger().log_exception(severity, exception)
}

pub fn log_entry(entry: &LogEntry) -> Result<Option<EntryId>> {
    logger().log_entry(entry)
}

pub fn log_canonical(
    severity: Severity,
    message: Option<&str>,
    source: Option<&str>,
    exception: Option<ExceptionInfo>,
) -> Result<Option<EntryId>> {
    logger().log_canonical(severity, message, source, exception)
}

pub fn log_raw(
    severity: i32,
    message: Option<&str>,
    source: Option<&str>,
    exception: Option<ExceptionInfo>,
) -> Result<Option<EntryId>> {
    logger().log_raw(severity, message, source, exception)
}
