use crate::cfg::{
    create_trait_from_type_options, register_fallible_trait, register_trait, register_trait_fn,
    TypeOptions,
};
use crate::log::sink::{
    console_sink::{ConsoleSink, ConsoleSinkConfig},
    file_sink::{FileSink, FileSinkConfig},
    memory_sink::{MemorySink, MemorySinkConfig},
    tracing_sink::{TracingSink, TracingSinkConfig},
    LogSink,
};
use anyhow::Result;
use serde::de::DeserializeOwned;

/// 注册所有内置 Sink 实现
pub fn register_sinks() -> Result<()> {
    register_sink::<MemorySink, MemorySinkConfig>("MemorySink")?;
    register_sink::<TracingSink, TracingSinkConfig>("TracingSink")?;
    register_fallible_sink::<ConsoleSink, ConsoleSinkConfig>("ConsoleSink")?;
    register_fallible_sink::<FileSink, FileSinkConfig>("FileSink")?;
    Ok(())
}

/// 注册构造不会失败的 Sink 类型
pub fn register_sink<T, Config>(sink_kind: &str) -> Result<()>
where
    T: LogSink + From<Config> + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    Box<T>: Into<Box<dyn LogSink>>,
{
    register_trait::<T, dyn LogSink, Config>(sink_kind)
}

/// 注册构造可能失败的 Sink 类型（如需要打开文件、建立连接）
pub fn register_fallible_sink<T, Config>(sink_kind: &str) -> Result<()>
where
    T: LogSink + TryFrom<Config, Error = anyhow::Error> + 'static,
    Config: DeserializeOwned + Send + Sync + 'static,
    Box<T>: Into<Box<dyn LogSink>>,
{
    register_fallible_trait::<T, dyn LogSink, Config>(sink_kind)
}

/// 使用闭包注册 Sink 构造函数
pub fn register_sink_fn<Config, F>(sink_kind: &str, factory: F) -> Result<()>
where
    Config: DeserializeOwned + Send + Sync + 'static,
    F: Fn(Config) -> Result<Box<dyn LogSink>> + Send + Sync + 'static,
{
    register_trait_fn::<dyn LogSink, Config, F>(sink_kind, factory)
}

/// 从 TypeOptions 创建 Sink
pub fn create_sink_from_options(options: &TypeOptions) -> Result<Box<dyn LogSink>> {
    create_trait_from_type_options(options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::{EntryId, LogEntry, Severity};

    #[test]
    fn test_register_sinks() -> Result<()> {
        register_sinks()?;

        let entry = LogEntry::new(Severity::Information, "test message", None, None)?;

        let memory = create_sink_from_options(&TypeOptions::from_json(
            r#"{ "type": "MemorySink", "options": { "capacity": 10 } }"#,
        )?)?;
        assert_eq!(memory.log_internal(&entry)?, Some(EntryId::from(0u64)));

        let console = create_sink_from_options(&TypeOptions::of("ConsoleSink"))?;
        assert!(console.log_internal(&entry).is_ok());

        let tracing = create_sink_from_options(&TypeOptions::of("TracingSink"))?;
        assert!(tracing.log_internal(&entry).is_ok());

        Ok(())
    }

    #[test]
    fn test_create_file_sink() -> Result<()> {
        register_sinks()?;

        let temp_file = tempfile::NamedTempFile::new()?;
        let options = TypeOptions {
            type_name: "FileSink".to_string(),
            options: serde_json::json!({ "file_path": temp_file.path() }),
        };

        let sink = create_sink_from_options(&options)?;
        sink.log_internal(&LogEntry::new(Severity::Error, "to file", None, None)?)?;

        let contents = std::fs::read_to_string(temp_file.path())?;
        assert!(contents.contains("to file"));
        Ok(())
    }

    #[test]
    fn test_create_file_sink_missing_path() -> Result<()> {
        register_sinks()?;
        assert!(create_sink_from_options(&TypeOptions::of("FileSink")).is_err());
        Ok(())
    }

    #[test]
    fn test_register_sink_fn() -> Result<()> {
        #[derive(serde::Deserialize)]
        struct RejectConfig {
            reason: String,
        }

        struct RejectSink(String);

        impl LogSink for RejectSink {
            fn log_internal(&self, _: &LogEntry) -> Result<Option<EntryId>> {
                Err(anyhow::anyhow!("{}", self.0))
            }
        }

        register_sink_fn::<RejectConfig, _>("RejectSink", |config| {
            Ok(Box::new(RejectSink(config.reason)) as Box<dyn LogSink>)
        })?;

        let sink = create_sink_from_options(&TypeOptions {
            type_name: "RejectSink".to_string(),
            options: serde_json::json!({ "reason": "read only" }),
        })?;
        let err = sink
            .log_internal(&LogEntry::new(Severity::Error, "m", None, None)?)
            .unwrap_err();
        assert_eq!(err.to_string(), "read only");
        Ok(())
    }
}
