use std::env;
use std::path::Path;

use anyhow::{Context, Result};
use relkit_core::ErrorCode;
use serde::{Deserialize, Serialize};

use crate::payload::{LoadOptions, ResponseType};

pub const TIMEOUT_ENV: &str = "RELKIT_TIMEOUT_MS";
pub const RESPONSE_TYPE_ENV: &str = "RELKIT_RESPONSE_TYPE";

/// On-disk config file. Loader settings live under `[loader]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    loader: LoaderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default)]
    pub response_type: ResponseType,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Transport timeout per request. Applies to the HTTP loader only.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            response_type: ResponseType::default(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl LoaderConfig {
    #[must_use]
    pub const fn load_options(&self) -> LoadOptions {
        LoadOptions::new(self.response_type)
    }
}

fn default_user_agent() -> String {
    format!("relkit/{}", env!("CARGO_PKG_VERSION"))
}

const fn default_timeout_ms() -> u64 {
    30_000
}

/// Read loader settings from a TOML file. A missing file yields defaults.
///
/// # Errors
///
/// Fails when the file exists but cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<LoaderConfig> {
    if !path.exists() {
        return Ok(LoaderConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let file = toml::from_str::<ConfigFile>(&content).with_context(|| {
        format!(
            "{}: Failed to parse {}",
            ErrorCode::ConfigParseError.code(),
            path.display()
        )
    })?;
    Ok(file.loader)
}

/// Load the config file, then apply `RELKIT_*` environment overrides.
///
/// # Errors
///
/// Fails on unreadable config or malformed override values.
pub fn resolve_config(path: &Path) -> Result<LoaderConfig> {
    let mut config = load_config(path)?;
    apply_overrides(
        &mut config,
        env::var(TIMEOUT_ENV).ok(),
        env::var(RESPONSE_TYPE_ENV).ok(),
    )?;
    Ok(config)
}

fn apply_overrides(
    config: &mut LoaderConfig,
    timeout_ms: Option<String>,
    response_type: Option<String>,
) -> Result<()> {
    if let Some(raw) = timeout_ms {
        config.timeout_ms = raw
            .trim()
            .parse()
            .with_context(|| format!("{TIMEOUT_ENV} must be a whole number of milliseconds, got '{raw}'"))?;
    }

    if let Some(raw) = response_type {
        config.response_type = ResponseType::parse(&raw).with_context(|| {
            format!("{RESPONSE_TYPE_ENV} must be one of text, json, binary; got '{raw}'")
        })?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = TempDir::new().expect("tempdir");
        let config = load_config(&dir.path().join("relkit.toml")).expect("defaults");
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.timeout_ms, 30_000);
        assert!(config.user_agent.starts_with("relkit/"));
    }

    #[test]
    fn loader_section_is_parsed() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("relkit.toml");
        std::fs::write(
            &path,
            "[loader]\nresponse_type = \"json\"\ntimeout_ms = 1500\n",
        )
        .expect("write config");

        let config = load_config(&path).expect("parse");
        assert_eq!(config.response_type, ResponseType::Json);
        assert_eq!(config.timeout_ms, 1500);
        assert_eq!(config.user_agent, default_user_agent());
        assert_eq!(config.load_options().response_type, ResponseType::Json);
    }

    #[test]
    fn parse_error_names_file_and_code() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("relkit.toml");
        std::fs::write(&path, "[loader]\nresponse_type = \"xml\"\n").expect("write config");

        let err = load_config(&path).expect_err("unknown response type");
        let message = err.to_string();
        assert!(message.starts_with("E4001"), "{message}");
        assert!(message.contains("relkit.toml"), "{message}");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = LoaderConfig::default();
        apply_overrides(&mut config, Some(" 250 ".to_string()), Some("Binary".to_string()))
            .expect("valid overrides");
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.response_type, ResponseType::Binary);
    }

    #[test]
    fn malformed_overrides_are_rejected() {
        let mut config = LoaderConfig::default();
        assert!(apply_overrides(&mut config, Some("soon".to_string()), None).is_err());
        assert!(apply_overrides(&mut config, None, Some("xml".to_string())).is_err());
        assert_eq!(config, LoaderConfig::default());
    }
}
