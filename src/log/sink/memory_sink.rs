use crate::log::log_entry::{EntryId, LogEntry};
use crate::log::sink::LogSink;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use smart_default::SmartDefault;
use std::sync::Mutex;

/// MemorySink 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct MemorySinkConfig {
    /// 最多保存的条目数，超出后写入失败；为空表示不限制
    pub capacity: Option<usize>,
}

/// 内存输出器
///
/// 将日志保存在内存中，返回条目的序号作为标识
pub struct MemorySink {
    config: MemorySinkConfig,
    state: Mutex<MemoryState>,
}

#[derive(Default)]
struct MemoryState {
    entries: Vec<LogEntry>,
    next_id: u64,
}

impl MemorySink {
    pub fn new(config: MemorySinkConfig) -> Self {
        Self {
            config,
            state: Mutex::new(MemoryState::default()),
        }
    }

    /// 获取当前保存的所有日志（按写入顺序）
    pub fn logged_entries(&self) -> Vec<LogEntry> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.clone()
    }

    /// 清空保存的日志
    pub fn clear(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.entries.clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(MemorySinkConfig::default())
    }
}

impl LogSink for MemorySink {
    fn log_internal(&self, entry: &LogEntry) -> Result<Option<EntryId>> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| anyhow!("memory sink lock poisoned"))?;

        if let Some(capacity) = self.config.capacity {
            if state.entries.len() >= capacity {
                return Err(anyhow!("memory sink is full (capacity {})", capacity));
            }
        }

        state.entries.push(entry.clone());
        let id = state.next_id;
        state.next_id += 1;
        Ok(Some(EntryId::from(id)))
    }
}

crate::impl_from!(MemorySinkConfig => MemorySink);
crate::impl_box_from!(MemorySink => dyn LogSink);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Severity;

    fn entry(message: &str) -> LogEntry {
        LogEntry::new(Severity::Information, message, None, None).unwrap()
    }

    #[test]
    fn test_memory_sink_stores_entries_in_order() -> Result<()> {
        let sink = MemorySink::default();

        let first = sink.log_internal(&entry("first"))?;
        let second = sink.log_internal(&entry("second"))?;

        assert_eq!(first, Some(EntryId::from(0u64)));
        assert_eq!(second, Some(EntryId::from(1u64)));

        let messages: Vec<String> = sink
            .logged_entries()
            .iter()
            .map(|e| e.message().to_string())
            .collect();
        assert_eq!(messages, vec!["first", "second"]);
        Ok(())
    }

    #[test]
    fn test_memory_sink_capacity() -> Result<()> {
        let sink = MemorySink::new(MemorySinkConfig { capacity: Some(1) });

        sink.log_internal(&entry("fits"))?;
        let err = sink.log_internal(&entry("overflow")).unwrap_err();
        assert!(err.to_string().contains("full"));
        assert_eq!(sink.logged_entries().len(), 1);
        Ok(())
    }

    #[test]
    fn test_memory_sink_clear_keeps_ids_increasing() -> Result<()> {
        let sink = MemorySink::default();
        sink.log_internal(&entry("a"))?;
        sink.clear();
        assert!(sink.logged_entries().is_empty());

        let id = sink.log_internal(&entry("b"))?;
        assert_eq!(id, Some(EntryId::from(1u64)));
        Ok(())
    }

    #[test]
    fn test_memory_sink_from_config() {
        let sink = MemorySink::from(MemorySinkConfig { capacity: Some(3) });
        assert_eq!(sink.config.capacity, Some(3));
    }
}
