use crate::log::log_entry::{EntryId, LogEntry};
use anyhow::Result;

/// 日志持久化 trait
///
/// 每个 sink 只负责持久化一条日志；级别过滤与 fallback 由 Provider 统一处理。
/// 返回 `Err` 表示持久化失败，会触发 Provider 的 fallback
pub trait LogSink: Send + Sync {
    /// 持久化一条日志，返回可选的标识
    fn log_internal(&self, entry: &LogEntry) -> Result<Option<EntryId>>;

    /// 刷新缓冲区（默认实现为空操作）
    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
