use crate::log::error::{LoggingError, Result};
use crate::log::level::Severity;
use crate::log::log_entry::{EntryId, ExceptionInfo, LogEntry};
use crate::log::sink::LogSink;
use std::fmt;
use std::sync::{Arc, Weak};

/// 日志 provider
///
/// 带名称和级别阈值的 sink 包装，负责：
/// 1. 丢弃低于阈值的日志（不调用 sink，也不转发给 fallback）
/// 2. 调用 sink 持久化日志
/// 3. sink 失败时，把失败描述和原始日志先后转发给 fallback provider
///
/// fallback 只保存弱引用，所有 provider 由 [`ProviderRegistry`](crate::log::ProviderRegistry) 持有
pub struct Provider {
    name: String,
    threshold: Severity,
    sink: Arc<dyn LogSink>,
    fallback: Option<Weak<Provider>>,
}

impl Provider {
    pub fn new(name: impl Into<String>, threshold: Severity, sink: Arc<dyn LogSink>) -> Self {
        Self {
            name: name.into(),
            threshold,
            sink,
            fallback: None,
        }
    }

    /// 设置 fallback provider
    ///
    /// fallback 必须已经创建，因此通过这个方法构造出的链不会成环
    pub fn with_fallback(mut self, fallback: &Arc<Provider>) -> Self {
        self.fallback = Some(Arc::downgrade(fallback));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn threshold(&self) -> Severity {
        self.threshold
    }

    pub fn sink(&self) -> &Arc<dyn LogSink> {
        &self.sink
    }

    /// 获取 fallback provider
    ///
    /// 持有 fallback 的注册表已被释放时返回 None，此时当前 provider 视为链的终点
    pub fn fallback(&self) -> Option<Arc<Provider>> {
        let weak = self.fallback.as_ref()?;
        let fallback = weak.upgrade();
        if fallback.is_none() {
            ::log::warn!(
                "fallback of provider '{}' is no longer alive, treating it as terminal",
                self.name
            );
        }
        fallback
    }

    /// 是否会接受该级别的日志
    pub fn accepts(&self, severity: Severity) -> bool {
        severity >= self.threshold
    }

    /// 记录日志
    ///
    /// 返回 sink 给出的标识；低于阈值时返回 `Ok(None)`。
    /// sink 失败且没有 fallback 时返回 `LoggingError::Sink`
    pub fn log(&self, entry: &LogEntry) -> Result<Option<EntryId>> {
        if !self.accepts(entry.severity()) {
            return Ok(None);
        }

        let err = match self.sink.log_internal(entry) {
            Ok(id) => return Ok(id),
            Err(err) => err,
        };

        let Some(fallback) = self.fallback() else {
            return Err(LoggingError::sink(&self.name, err));
        };

        ::log::warn!(
            "provider '{}' failed to log, forwarding to fallback provider '{}': {:#}",
            self.name,
            fallback.name(),
            err
        );

        let diagnostic = self.fallback_entry(entry, &err)?;
        fallback.log(&diagnostic)?;
        fallback.log(entry)
    }

    /// 构造描述失败原因的日志
    ///
    /// 级别不低于 Error，也不低于原始日志的级别；异常为 sink 返回的错误链
    fn fallback_entry(&self, original: &LogEntry, err: &anyhow::Error) -> Result<LogEntry> {
        let message = format!(
            "reason for the fallback: {} failed to log: {}",
            self.name, err
        );

        LogEntry::new(
            original.severity().max(Severity::Error),
            message,
            original.source().map(str::to_string),
            Some(ExceptionInfo::from_anyhow(err)),
        )
    }
}

impl fmt::Debug for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fallback = self
            .fallback
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|p| p.name.clone());

        f.debug_struct("Provider")
            .field("name", &self.name)
            .field("threshold", &self.threshold)
            .field("fallback", &fallback)
            .finish()
    }
}
