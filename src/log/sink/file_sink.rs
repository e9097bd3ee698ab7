use crate::cfg::TypeOptions;
use crate::log::formatter::{create_formatter_from_options, LogFormatter};
use crate::log::log_entry::{EntryId, LogEntry};
use crate::log::sink::LogSink;
use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

/// FileSink 配置
#[derive(Debug, Clone, Deserialize)]
pub struct FileSinkConfig {
    /// 日志文件路径
    pub file_path: String,

    /// Formatter 配置
    #[serde(default = "default_formatter")]
    pub formatter: TypeOptions,
}

fn default_formatter() -> TypeOptions {
    TypeOptions::of("TextFormatter")
}

/// 文件输出器
///
/// 以追加方式写入文件，每条日志写入后立即刷新
pub struct FileSink {
    file: Mutex<File>,
    formatter: Box<dyn LogFormatter>,
    config: FileSinkConfig,
}

impl FileSink {
    pub fn new(config: FileSinkConfig) -> Result<Self> {
        crate::log::register_builtin_components();

        let path = PathBuf::from(&config.file_path);

        // 确保父目录存在
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("failed to create log directory {}", parent.display())
                })?;
            }
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("failed to open log file {}", path.display()))?;

        Ok(Self {
            file: Mutex::new(file),
            formatter: create_formatter_from_options(&config.formatter)?,
            config,
        })
    }

    /// 获取日志文件路径
    pub fn path(&self) -> &str {
        &self.config.file_path
    }
}

impl LogSink for FileSink {
    fn log_internal(&self, entry: &LogEntry) -> Result<Option<EntryId>> {
        let formatted = self.formatter.format(entry)?;

        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("file sink lock poisoned"))?;
        file.write_all(formatted.as_bytes())?;
        file.write_all(b"\n")?;
        file.flush()?;
        Ok(None)
    }

    fn flush(&self) -> Result<()> {
        let mut file = self
            .file
            .lock()
            .map_err(|_| anyhow!("file sink lock poisoned"))?;
        file.flush()?;
        Ok(())
    }
}

crate::impl_try_from!(FileSinkConfig => FileSink);
crate::impl_box_from!(FileSink => dyn LogSink);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::Severity;

    fn config_for(path: &std::path::Path) -> FileSinkConfig {
        FileSinkConfig {
            file_path: path.to_string_lossy().to_string(),
            formatter: default_formatter(),
        }
    }

    #[test]
    fn test_file_sink_appends() -> Result<()> {
        let temp_file = tempfile::NamedTempFile::new()?;
        let sink = FileSink::new(config_for(temp_file.path()))?;

        sink.log_internal(&LogEntry::new(Severity::Information, "First message", None, None)?)?;
        sink.log_internal(&LogEntry::new(Severity::Error, "Second message", None, None)?)?;

        let contents = std::fs::read_to_string(temp_file.path())?;
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("First message"));
        assert!(lines[1].contains("Second message"));
        Ok(())
    }

    #[test]
    fn test_file_sink_json_lines_round_trip() -> Result<()> {
        let temp_file = tempfile::NamedTempFile::new()?;
        let sink = FileSink::new(FileSinkConfig {
            file_path: temp_file.path().to_string_lossy().to_string(),
            formatter: TypeOptions::of("JsonFormatter"),
        })?;

        let entry = LogEntry::new(Severity::Warning, "json line", Some("app.main()".into()), None)?;
        sink.log_internal(&entry)?;

        let contents = std::fs::read_to_string(temp_file.path())?;
        let restored: LogEntry = serde_json::from_str(contents.trim_end())?;
        assert_eq!(restored, entry);
        Ok(())
    }

    #[test]
    fn test_file_sink_creates_directory() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        let log_path = temp_dir.path().join("nested").join("dir").join("test.log");

        let sink = FileSink::new(config_for(&log_path))?;
        sink.log_internal(&LogEntry::new(Severity::Debug, "Test", None, None)?)?;
        sink.flush()?;

        assert!(log_path.exists());
        assert_eq!(sink.path(), log_path.to_string_lossy());
        Ok(())
    }

    #[test]
    fn test_file_sink_unwritable_path() -> Result<()> {
        let temp_dir = tempfile::TempDir::new()?;
        // 目录本身不能作为文件打开
        let result = FileSink::new(config_for(temp_dir.path()));
        assert!(result.is_err());
        Ok(())
    }
}
