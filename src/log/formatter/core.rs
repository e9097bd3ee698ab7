use crate::log::log_entry::LogEntry;
use anyhow::Result;

/// 日志格式化器 trait
///
/// 负责将 LogEntry 格式化为字符串
pub trait LogFormatter: Send + Sync {
    /// 格式化日志条目
    fn format(&self, entry: &LogEntry) -> Result<String>;
}
