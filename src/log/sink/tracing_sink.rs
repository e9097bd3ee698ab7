use crate::log::level::Severity;
use crate::log::log_entry::{EntryId, LogEntry};
use crate::log::sink::LogSink;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

/// TracingSink 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TracingSinkConfig {
    /// 事件的 category 字段，用于在订阅端区分来源
    #[default = "chainlog"]
    pub category: String,
}

/// tracing 输出器
///
/// 将日志转发为 `tracing` 事件，由应用已安装的 subscriber 处理。
/// Critical 与 Error 都映射为 `ERROR` 级别，通过 `severity` 字段区分
pub struct TracingSink {
    config: TracingSinkConfig,
}

impl TracingSink {
    pub fn new(config: TracingSinkConfig) -> Self {
        Self { config }
    }
}

impl LogSink for TracingSink {
    fn log_internal(&self, entry: &LogEntry) -> Result<Option<EntryId>> {
        let category = self.config.category.as_str();
        let severity = entry.severity().to_string();
        let source = entry.source().unwrap_or_default();
        let exception = entry
            .exception()
            .map(|e| e.to_string())
            .unwrap_or_default();
        let message = entry.message();

        // tracing 的级别必须是常量，只能逐个分支展开
        match entry.severity() {
            Severity::Debug => {
                tracing::debug!(
                    category,
                    severity = severity.as_str(),
                    source,
                    exception = exception.as_str(),
                    "{}",
                    message
                )
            }
            Severity::Information => {
                tracing::info!(
                    category,
                    severity = severity.as_str(),
                    source,
                    exception = exception.as_str(),
                    "{}",
                    message
                )
            }
            Severity::Warning => {
                tracing::warn!(
                    category,
                    severity = severity.as_str(),
                    source,
                    exception = exception.as_str(),
                    "{}",
                    message
                )
            }
            Severity::Error | Severity::Critical => {
                tracing::error!(
                    category,
                    severity = severity.as_str(),
                    source,
                    exception = exception.as_str(),
                    "{}",
                    message
                )
            }
        }

        Ok(None)
    }
}

crate::impl_from!(TracingSinkConfig => TracingSink);
crate::impl_box_from!(TracingSink => dyn LogSink);

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// 收集 subscriber 输出的 writer
    #[derive(Clone, Default)]
    struct CaptureWriter(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CaptureWriter {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_tracing_sink_emits_event() -> Result<()> {
        let writer = CaptureWriter::default();
        let make_writer = {
            let writer = writer.clone();
            move || writer.clone()
        };
        let subscriber = tracing_subscriber::fmt()
            .with_writer(make_writer)
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .finish();

        let sink = TracingSink::new(TracingSinkConfig {
            category: "orders".to_string(),
        });
        let entry = LogEntry::new(
            Severity::Critical,
            "payment gateway down",
            Some("app::Payments.charge()".to_string()),
            None,
        )?;

        let id = tracing::subscriber::with_default(subscriber, || sink.log_internal(&entry))?;
        assert_eq!(id, None);

        let output = String::from_utf8(writer.0.lock().unwrap().clone())?;
        assert!(output.contains("ERROR"));
        assert!(output.contains("payment gateway down"));
        assert!(output.contains("category=\"orders\""));
        assert!(output.contains("severity=\"Critical\""));
        Ok(())
    }

    #[test]
    fn test_tracing_sink_without_subscriber() -> Result<()> {
        let sink = TracingSink::new(TracingSinkConfig::default());
        let entry = LogEntry::new(Severity::Debug, "nobody listens", None, None)?;
        assert!(sink.log_internal(&entry).is_ok());
        Ok(())
    }
}
