use crate::cfg::TypeOptions;
use crate::log::formatter::{create_formatter_from_options, LogFormatter};
use crate::log::log_entry::{EntryId, LogEntry};
use crate::log::sink::LogSink;
use anyhow::Result;
use serde::Deserialize;
use smart_default::SmartDefault;
use std::io::{self, Write};

/// 输出目标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, SmartDefault)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    #[default]
    Stdout,
    Stderr,
}

/// ConsoleSink 配置
#[derive(Debug, Clone, Deserialize, SmartDefault)]
#[serde(default)]
pub struct ConsoleSinkConfig {
    /// 输出目标
    pub target: Target,

    /// Formatter 配置
    #[default(TypeOptions::of("TextFormatter"))]
    pub formatter: TypeOptions,
}

/// 终端输出器
pub struct ConsoleSink {
    target: Target,
    formatter: Box<dyn LogFormatter>,
}

impl ConsoleSink {
    pub fn new(config: ConsoleSinkConfig) -> Result<Self> {
        crate::log::register_builtin_components();

        Ok(Self {
            target: config.target,
            formatter: create_formatter_from_options(&config.formatter)?,
        })
    }
}

impl LogSink for ConsoleSink {
    fn log_internal(&self, entry: &LogEntry) -> Result<Option<EntryId>> {
        let formatted = self.formatter.format(entry)?;
        match self.target {
            Target::Stdout => {
                let mut stdout = io::stdout().lock();
                writeln!(stdout, "{}", formatted)?;
                stdout.flush()?;
            }
            Target::Stderr => {
                let mut stderr = io::stderr().lock();
                writeln!(stderr, "{}", formatted)?;
            }
        }
        Ok(None)
    }

    fn flush(&self) -> Result<()> {
        match self.target {
            Target::Stdout => io::stdout().flush()?,
            Target::Stderr => io::stderr().flush()?,
        }
        Ok(())
    }
}

crate::impl_try_from!(ConsoleSinkConfig => ConsoleSink);
crate::impl_box_from!(ConsoleSink => dyn LogSink);
