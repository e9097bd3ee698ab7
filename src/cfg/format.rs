//! 配置格式识别与解析

use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// 支持的配置文件格式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON / JSON5（统一使用 json5 解析）
    Json,
    Yaml,
    Toml,
}

impl ConfigFormat {
    /// 根据文件扩展名识别格式
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" | "json5" => Some(ConfigFormat::Json),
            "yaml" | "yml" => Some(ConfigFormat::Yaml),
            "toml" => Some(ConfigFormat::Toml),
            _ => None,
        }
    }

    /// 根据文件路径识别格式
    pub fn from_path(path: &Path) -> Result<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
            .ok_or_else(|| anyhow!("unsupported config file format: {}", path.display()))
    }

    /// 解析配置内容
    pub fn parse<T: DeserializeOwned>(&self, content: &str) -> Result<T> {
        match self {
            ConfigFormat::Json => Ok(json5::from_str(content)?),
            ConfigFormat::Yaml => Ok(serde_yaml::from_str(content)?),
            ConfigFormat::Toml => Ok(toml::from_str(content)?),
        }
    }

    /// 读取并解析配置文件
    pub fn load_file<T: DeserializeOwned>(path: &Path) -> Result<T> {
        let format = Self::from_path(path)?;
        let content = std::fs::read_to_string(path)
            .map_err(|e| anyhow!("failed to read config file {}: {}", path.display(), e))?;
        format.parse(&content)
    }
}
