use crate::cfg::{ConfigFormat, TypeOptions};
use crate::log::error::{LoggingError, Result};
use crate::log::level::Severity;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::path::Path;

/// 单个 provider 的配置描述
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderDescriptor {
    /// provider 名称（查找时大小写不敏感）
    pub name: String,

    /// sink 类型，对应注册表中的名称，如 `FileSink`
    #[serde(rename = "type")]
    pub sink_kind: String,

    /// 最低接受级别，默认接受所有日志
    #[serde(default)]
    pub threshold: Severity,

    /// fallback provider 名称
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,

    /// sink 自定义配置
    #[serde(default = "empty_settings")]
    pub settings: JsonValue,
}

fn empty_settings() -> JsonValue {
    JsonValue::Object(Default::default())
}

impl ProviderDescriptor {
    pub fn new(name: impl Into<String>, sink_kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sink_kind: sink_kind.into(),
            threshold: Severity::default(),
            fallback: None,
            settings: empty_settings(),
        }
    }

    pub fn with_threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_fallback(mut self, fallback: impl Into<String>) -> Self {
        self.fallback = Some(fallback.into());
        self
    }

    pub fn with_settings(mut self, settings: JsonValue) -> Self {
        self.settings = settings;
        self
    }

    /// 转换为 sink 工厂使用的 TypeOptions
    pub fn sink_options(&self) -> TypeOptions {
        TypeOptions {
            type_name: self.sink_kind.clone(),
            options: self.settings.clone(),
        }
    }
}

/// 日志系统配置
///
/// # 示例
///
/// ```ignore
/// let config = LoggingConfig::from_json(r#"
///     {
///         default_provider: "Main",
///         providers: [
///             { name: "Main", type: "FileSink", threshold: "Information", fallback: "Console",
///               settings: { file_path: "/var/log/app.log" } },
///             { name: "Console", type: "ConsoleSink" },
///         ]
///     }
/// "#)?;
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// 默认 provider 名称
    pub default_provider: String,

    /// 所有 provider，按配置顺序
    pub providers: Vec<ProviderDescriptor>,
}

impl LoggingConfig {
    pub fn new(default_provider: impl Into<String>, providers: Vec<ProviderDescriptor>) -> Self {
        Self {
            default_provider: default_provider.into(),
            providers,
        }
    }

    /// 从 JSON 字符串创建（支持 JSON5 格式）
    pub fn from_json(content: &str) -> Result<Self> {
        Self::parse(ConfigFormat::Json, content)
    }

    /// 从 YAML 字符串创建
    pub fn from_yaml(content: &str) -> Result<Self> {
        Self::parse(ConfigFormat::Yaml, content)
    }

    /// 从 TOML 字符串创建
    pub fn from_toml(content: &str) -> Result<Self> {
        Self::parse(ConfigFormat::Toml, content)
    }

    /// 从文件加载，根据扩展名识别格式
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        ConfigFormat::load_file(path.as_ref()).map_err(config_source_error)
    }

    fn parse(format: ConfigFormat, content: &str) -> Result<Self> {
        format.parse(content).map_err(config_source_error)
    }
}

fn config_source_error(err: anyhow::Error) -> LoggingError {
    LoggingError::ConfigSource {
        message: format!("{:#}", err),
    }
}
