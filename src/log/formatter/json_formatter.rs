use crate::log::formatter::LogFormatter;
use crate::log::log_entry::LogEntry;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;

/// JsonFormatter 配置
#[derive(Debug, Clone, Deserialize, PartialEq, SmartDefault)]
#[serde(default)]
pub struct JsonFormatterConfig {
    /// 是否输出多行缩进格式
    #[default = false]
    pub pretty: bool,
}

/// JSON 格式化器
///
/// 直接复用 LogEntry 的 Serialize 实现，输出可被反序列化回 LogEntry 的 JSON
pub struct JsonFormatter {
    config: JsonFormatterConfig,
}

impl JsonFormatter {
    pub fn new(config: JsonFormatterConfig) -> Self {
        Self { config }
    }
}

impl LogFormatter for JsonFormatter {
    fn format(&self, entry: &LogEntry) -> Result<String> {
        if self.config.pretty {
            Ok(serde_json::to_string_pretty(entry)?)
        } else {
            Ok(serde_json::to_string(entry)?)
        }
    }
}

crate::impl_from!(JsonFormatterConfig => JsonFormatter);
crate::impl_box_from!(JsonFormatter => dyn LogFormatter);
