use crate::log::formatter::LogFormatter;
use crate::log::level::Severity;
use crate::log::log_entry::LogEntry;
use anyhow::{bail, Result};
use chrono::format::{Item, StrftimeItems};
use colored::Colorize;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::fmt::Write;

/// TextFormatter 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct TextFormatterConfig {
    /// 是否启用颜色输出
    #[default = false]
    pub colored: bool,

    /// 时间戳格式（chrono strftime 语法）
    #[default = "%Y-%m-%dT%H:%M:%S%.3fZ"]
    pub timestamp_format: String,
}

/// 文本格式化器
///
/// 格式: `[2025-01-19T12:34:56.789Z] ERROR [source] message`，
/// 异常链逐层追加在后面，每层一行，以 `  ---> ` 开头
pub struct TextFormatter {
    config: TextFormatterConfig,
}

impl TextFormatter {
    /// 时间戳格式非法时返回错误，而不是在每次格式化时失败
    pub fn new(config: TextFormatterConfig) -> Result<Self> {
        if StrftimeItems::new(&config.timestamp_format).any(|item| matches!(item, Item::Error)) {
            bail!(
                "invalid timestamp_format '{}' for TextFormatter",
                config.timestamp_format
            );
        }
        Ok(Self { config })
    }
}

impl LogFormatter for TextFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        let mut result = String::with_capacity(64 + entry.message().len());

        let timestamp = entry.timestamp().format(&self.config.timestamp_format);
        if self.config.colored {
            let mut stamp = String::new();
            write!(stamp, "{}", timestamp)?;
            write!(result, "[{}] ", stamp.dimmed())?;
            write!(result, "{} ", colored_level(entry.severity()))?;
        } else {
            write!(result, "[{}] {:<11} ", timestamp, entry.severity().to_string().to_uppercase())?;
        }

        if let Some(source) = entry.source() {
            if self.config.colored {
                write!(result, "[{}] ", source.cyan())?;
            } else {
                write!(result, "[{}] ", source)?;
            }
        }

        result.push_str(entry.message());

        if let Some(exception) = entry.exception() {
            for cause in exception.chain() {
                write!(result, "\n  ---> {}", cause)?;
            }
        }

        Ok(result)
    }
}

fn colored_level(severity: Severity) -> String {
    let label = format!("{:<11}", severity.to_string().to_uppercase());
    match severity {
        Severity::Critical => label.red().bold().to_string(),
        Severity::Error => label.red().to_string(),
        Severity::Warning => label.yellow().to_string(),
        Severity::Information => label.green().to_string(),
        Severity::Debug => label.cyan().dimmed().to_string(),
    }
}

crate::impl_try_from!(TextFormatterConfig => TextFormatter);
crate::impl_box_from!(TextFormatter => dyn LogFormatter);
