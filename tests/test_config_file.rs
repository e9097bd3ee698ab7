//! 从配置文件构建注册表的集成测试

use chainlog::log::{LoggingConfig, LoggingError, ProviderRegistry, Severity};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[test]
fn test_file_sink_from_each_format() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let log_path = temp_dir.path().join("logs").join("app.log");
    let log_path = log_path.to_string_lossy().replace('\\', "/");

    let json_path = temp_dir.path().join("logging.json5");
    fs::write(
        &json_path,
        format!(
            r#"{{
                // JSON5 允许注释和尾随逗号
                default_provider: "File",
                providers: [
                    {{
                        name: "File",
                        type: "FileSink",
                        threshold: "Information",
                        settings: {{
                            file_path: "{log_path}",
                            formatter: {{ type: "JsonFormatter" }},
                        }},
                    }},
                ],
            }}"#
        ),
    )?;

    let yaml_path = temp_dir.path().join("logging.yml");
    fs::write(
        &yaml_path,
        format!(
            r#"
default_provider: File
providers:
  - name: File
    type: FileSink
    threshold: Information
    settings:
      file_path: "{log_path}"
      formatter:
        type: JsonFormatter
"#
        ),
    )?;

    let toml_path = temp_dir.path().join("logging.toml");
    fs::write(
        &toml_path,
        format!(
            r#"
default_provider = "File"

[[providers]]
name = "File"
type = "FileSink"
threshold = "Information"

[providers.settings]
file_path = "{log_path}"

[providers.settings.formatter]
type = "JsonFormatter"
"#
        ),
    )?;

    let json = LoggingConfig::from_file(&json_path)?;
    let yaml = LoggingConfig::from_file(&yaml_path)?;
    let toml = LoggingConfig::from_file(&toml_path)?;
    assert_eq!(json, yaml);
    assert_eq!(json, toml);

    let registry = Arc::new(ProviderRegistry::new(&json)?);
    let logger = registry.default_logger();
    logger.log(Severity::Debug, "below threshold")?;
    logger.log_with_source(Severity::Warning, "cache miss ratio high", "Cache.Stats")?;

    let contents = fs::read_to_string(&log_path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 1);

    let value: serde_json::Value = serde_json::from_str(lines[0])?;
    assert_eq!(value["severity"], "Warning");
    assert_eq!(value["message"], "cache miss ratio high");
    assert_eq!(value["source"], "Cache.Stats");
    Ok(())
}

#[test]
fn test_unsupported_extension() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("logging.xml");
    fs::write(&path, "<logging/>")?;

    assert!(matches!(
        LoggingConfig::from_file(&path),
        Err(LoggingError::ConfigSource { .. })
    ));
    Ok(())
}

#[test]
fn test_sink_configuration_error_names_provider() -> anyhow::Result<()> {
    let config = LoggingConfig::from_json(
        r#"{
            default_provider: "File",
            providers: [{ name: "File", type: "FileSink", settings: { formatter: { type: "TextFormatter" } } }]
        }"#,
    )?;

    match ProviderRegistry::new(&config) {
        Err(LoggingError::Configuration { provider, message }) => {
            assert_eq!(provider, "File");
            assert!(message.contains("file_path"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}

#[test]
fn test_invalid_timestamp_format_fails_at_build() -> anyhow::Result<()> {
    let config = LoggingConfig::from_json(
        r#"{
            default_provider: "Console",
            providers: [{
                name: "Console",
                type: "ConsoleSink",
                settings: { formatter: { type: "TextFormatter", options: { colored: true, timestamp_format: "%Q" } } }
            }]
        }"#,
    )?;

    match ProviderRegistry::new(&config) {
        Err(LoggingError::Configuration { provider, message }) => {
            assert_eq!(provider, "Console");
            assert!(message.contains("timestamp_format"));
        }
        other => panic!("unexpected result: {other:?}"),
    }
    Ok(())
}
