use crate::cfg::registry::{generate_short_type_name, simplify_type_name};
use crate::log::error::{LoggingError, Result};
use crate::log::level::Severity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;

/// 被记录的异常信息
///
/// 保存错误的类型名、消息以及完整的内部原因链（`inner`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExceptionInfo {
    /// 错误类型名称（简短形式，如 `ParseIntError`）
    pub type_name: String,
    /// 错误消息
    pub message: String,
    /// 内部原因
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner: Option<Box<ExceptionInfo>>,
}

impl ExceptionInfo {
    pub fn new(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            message: message.into(),
            inner: None,
        }
    }

    /// 设置内部原因
    pub fn with_inner(mut self, inner: ExceptionInfo) -> Self {
        self.inner = Some(Box::new(inner));
        self
    }

    /// 从具体错误类型构造，最外层类型名取自静态类型，内部原因通过 `source()` 链获取
    pub fn from_error<E>(err: &E) -> Self
    where
        E: StdError + 'static,
    {
        let mut info = Self::new(generate_short_type_name::<E>(), err.to_string());
        info.inner = err.source().map(|source| Box::new(Self::from_dyn(source)));
        info
    }

    /// 从 trait object 构造
    ///
    /// trait object 无法得到静态类型名，类型名从 Debug 输出的首个标识符推断，推断失败时为 `Error`
    pub fn from_dyn(err: &(dyn StdError + 'static)) -> Self {
        let mut info = Self::new(type_hint(err), err.to_string());
        info.inner = err.source().map(|source| Box::new(Self::from_dyn(source)));
        info
    }

    /// 从 anyhow 错误链构造
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let mut chain: Vec<ExceptionInfo> = err
            .chain()
            .map(|cause| Self::new(type_hint(cause), cause.to_string()))
            .collect();

        let mut current = chain.pop().unwrap_or_else(|| Self::new("Error", err.to_string()));
        while let Some(outer) = chain.pop() {
            current = outer.with_inner(current);
        }
        current
    }

    /// 从最外层开始遍历整个原因链
    pub fn chain(&self) -> impl Iterator<Item = &ExceptionInfo> {
        std::iter::successors(Some(self), |info| info.inner.as_deref())
    }
}

/// 从 Debug 输出推断类型名，如 `ParseIntError { kind: InvalidDigit }` 推断为 `ParseIntError`
fn type_hint(err: &(dyn StdError + 'static)) -> String {
    let debug = format!("{:?}", err);
    let ident: String = debug
        .chars()
        .take_while(|c| c.is_alphanumeric() || *c == '_' || *c == ':')
        .collect();
    let ident = simplify_type_name(ident.trim_end_matches(':'));

    match ident.chars().next() {
        Some(first) if first.is_uppercase() => ident,
        _ => "Error".to_string(),
    }
}

impl fmt::Display for ExceptionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.type_name, self.message)
    }
}

impl StdError for ExceptionInfo {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.as_deref().map(|inner| inner as &(dyn StdError + 'static))
    }
}

/// sink 返回的日志标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(s: String) -> Self {
        EntryId(s)
    }
}

impl From<&str> for EntryId {
    fn from(s: &str) -> Self {
        EntryId(s.to_string())
    }
}

impl From<u64> for EntryId {
    fn from(n: u64) -> Self {
        EntryId(n.to_string())
    }
}

/// 一次日志事件
///
/// 创建后不可变；fallback 时会构造新的 LogEntry 描述失败原因，原始条目保持不变
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "LogEntryRepr")]
pub struct LogEntry {
    severity: Severity,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    exception: Option<ExceptionInfo>,
    timestamp: DateTime<Utc>,
}

impl LogEntry {
    /// 创建日志条目
    ///
    /// - `message` 为空字符串时返回 `ArgumentEmpty`
    /// - `source` 显式给出空字符串时返回 `ArgumentEmpty`
    pub fn new(
        severity: Severity,
        message: impl Into<String>,
        source: Option<String>,
        exception: Option<ExceptionInfo>,
    ) -> Result<Self> {
        let message = message.into();
        if message.is_empty() {
            return Err(LoggingError::ArgumentEmpty {
                parameter: "message",
            });
        }
        if matches!(source.as_deref(), Some("")) {
            return Err(LoggingError::ArgumentEmpty { parameter: "source" });
        }

        Ok(Self {
            severity,
            message,
            source,
            exception,
            timestamp: Utc::now(),
        })
    }

    /// 从未经类型检查的参数创建日志条目
    ///
    /// 校验顺序：severity（`InvalidEnumValue`）、message（`ArgumentNull` / `ArgumentEmpty`）、source
    pub fn from_raw(
        severity: i32,
        message: Option<&str>,
        source: Option<&str>,
        exception: Option<ExceptionInfo>,
    ) -> Result<Self> {
        let severity = Severity::try_from(severity)?;
        let message = message.ok_or(LoggingError::ArgumentNull {
            parameter: "message",
        })?;
        Self::new(severity, message, source.map(str::to_string), exception)
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    pub fn exception(&self) -> Option<&ExceptionInfo> {
        self.exception.as_ref()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}

/// 反序列化中间结构，反序列化时经过与构造函数相同的校验
#[derive(Deserialize)]
struct LogEntryRepr {
    severity: Severity,
    message: Option<String>,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    exception: Option<ExceptionInfo>,
    #[serde(default = "Utc::now")]
    timestamp: DateTime<Utc>,
}

impl TryFrom<LogEntryRepr> for LogEntry {
    type Error = LoggingError;

    fn try_from(repr: LogEntryRepr) -> Result<Self> {
        let message = repr.message.ok_or(LoggingError::ArgumentNull {
            parameter: "message",
        })?;
        let mut entry = LogEntry::new(repr.severity, message, repr.source, repr.exception)?;
        entry.timestamp = repr.timestamp;
        Ok(entry)
    }
}
