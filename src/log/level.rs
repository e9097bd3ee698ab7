use crate::log::error::LoggingError;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use smart_default::SmartDefault;
use std::str::FromStr;

/// 日志严重级别，按紧急程度递增排序
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    SmartDefault,
    SerializeDisplay,
    DeserializeFromStr,
)]
pub enum Severity {
    /// 调试信息
    #[default]
    Debug = 0,
    /// 一般信息
    Information = 1,
    /// 警告信息
    Warning = 2,
    /// 错误信息
    Error = 3,
    /// 严重错误
    Critical = 4,
}

impl Severity {
    /// 所有级别，按紧急程度递增
    pub const ALL: [Severity; 5] = [
        Severity::Debug,
        Severity::Information,
        Severity::Warning,
        Severity::Error,
        Severity::Critical,
    ];

    /// 级别对应的整数值
    pub fn value(self) -> i32 {
        self as i32
    }
}

impl TryFrom<i32> for Severity {
    type Error = LoggingError;

    fn try_from(value: i32) -> Result<Self, LoggingError> {
        match value {
            0 => Ok(Severity::Debug),
            1 => Ok(Severity::Information),
            2 => Ok(Severity::Warning),
            3 => Ok(Severity::Error),
            4 => Ok(Severity::Critical),
            _ => Err(LoggingError::InvalidEnumValue {
                parameter: "severity",
                value: value as i64,
            }),
        }
    }
}

impl FromStr for Severity {
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "debug" | "0" => Ok(Severity::Debug),
            "information" | "info" | "1" => Ok(Severity::Information),
            "warning" | "warn" | "2" => Ok(Severity::Warning),
            "error" | "3" => Ok(Severity::Error),
            "critical" | "fatal" | "4" => Ok(Severity::Critical),
            "" => Err(LoggingError::ArgumentEmpty {
                parameter: "severity",
            }),
            other => Err(LoggingError::InvalidEnumValue {
                parameter: "severity",
                value: other.parse::<i64>().unwrap_or(-1),
            }),
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Debug => write!(f, "Debug"),
            Severity::Information => write!(f, "Information"),
            Severity::Warning => write!(f, "Warning"),
            Severity::Error => write!(f, "Error"),
            Severity::Critical => write!(f, "Critical"),
        }
    }
}
