//! Config file loading

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Section name accepted at the top of a config file.
const SECTION: &str = "plan-preview";

/// Settings that may be kept in a file next to the workflow.
///
/// Secrets (API key, GitHub token) are never read from files.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub address: Option<String>,
    pub pipectl_path: Option<PathBuf>,
    pub timeout: Option<String>,
    pub github_api_url: Option<String>,
    pub trigger_command: Option<String>,
}

pub fn load_config(work_dir: &Path, config_path: Option<&Path>) -> Result<FileConfig> {
    let config_path_provided = config_path.is_some();

    let discovered = match config_path {
        Some(path) => Some(path.to_path_buf()),
        None => discover_config(work_dir),
    };

    let Some(config_file) = discovered else {
        return Ok(FileConfig::default());
    };

    let content = fs::read_to_string(&config_file)
        .with_context(|| format!("Failed reading config file: {}", config_file.display()))?;

    let ext = config_file.extension().and_then(|e| e.to_str()).unwrap_or("").to_ascii_lowercase();

    let parsed = match ext.as_str() {
        "toml" => parse_toml_config(&content, &config_file),
        "yaml" | "yml" => parse_yaml_config(&content, &config_file),
        other => Err(anyhow::anyhow!(
            "Unsupported config extension '.{}' for file {}",
            other,
            config_file.display()
        )),
    };

    match parsed {
        Ok(cfg) => {
            tracing::debug!("Loaded config from {}", config_file.display());
            Ok(cfg)
        }
        Err(e) if config_path_provided => Err(e),
        Err(e) => {
            // Auto-discovered: warn and fall back to defaults
            tracing::warn!(
                "Failed to parse auto-discovered config {}: {:#}",
                config_file.display(),
                e
            );
            Ok(FileConfig::default())
        }
    }
}

/// Parse TOML config, supporting a nested [plan-preview] section.
fn parse_toml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: toml::Value = toml::from_str(content)
        .with_context(|| format!("Invalid TOML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    config_val.try_into().with_context(|| format!("Invalid TOML config: {}", config_file.display()))
}

/// Parse YAML config, supporting a nested plan-preview section.
fn parse_yaml_config(content: &str, config_file: &Path) -> Result<FileConfig> {
    let raw: serde_yaml::Value = serde_yaml::from_str(content)
        .with_context(|| format!("Invalid YAML syntax: {}", config_file.display()))?;

    let config_val = match raw.get(SECTION) {
        Some(nested) => nested.clone(),
        None => raw,
    };

    serde_yaml::from_value(config_val)
        .with_context(|| format!("Invalid YAML config: {}", config_file.display()))
}

fn discover_config(work_dir: &Path) -> Option<PathBuf> {
    let candidates = [
        "plan-preview.toml",
        ".plan-preview.toml",
        "plan-preview.yml",
        ".plan-preview.yml",
        "plan-preview.yaml",
        ".plan-preview.yaml",
    ];

    candidates.iter().map(|c| work_dir.join(c)).find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn defaults_when_missing() {
        let tmp = TempDir::new().expect("tmp");
        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg, FileConfig::default());
    }

    #[test]
    fn discovers_toml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join("plan-preview.toml"),
            "address = 'pipecd.example.com:443'\ntimeout = '10m'\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.address.as_deref(), Some("pipecd.example.com:443"));
        assert_eq!(cfg.timeout.as_deref(), Some("10m"));
        assert!(cfg.pipectl_path.is_none());
    }

    #[test]
    fn nested_section_in_toml() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("custom.toml");
        fs::write(&path, "[plan-preview]\npipectl_path = '/opt/bin/pipectl'\n").expect("write");

        let cfg = load_config(tmp.path(), Some(&path)).expect("config");
        assert_eq!(cfg.pipectl_path, Some(PathBuf::from("/opt/bin/pipectl")));
    }

    #[test]
    fn yaml_config() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(
            tmp.path().join(".plan-preview.yml"),
            "plan-preview:\n  trigger_command: /plan\n  github_api_url: https://ghe.example.com/api/v3\n",
        )
        .expect("write");

        let cfg = load_config(tmp.path(), None).expect("config");
        assert_eq!(cfg.trigger_command.as_deref(), Some("/plan"));
        assert_eq!(cfg.github_api_url.as_deref(), Some("https://ghe.example.com/api/v3"));
    }

    #[test]
    fn explicit_invalid_config_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("bad.toml");
        fs::write(&path, "timeout = 5\n").expect("write");
        assert!(load_config(tmp.path(), Some(&path)).is_err());

        let unknown = tmp.path().join("unknown.toml");
        fs::write(&unknown, "api_key = 'secret'\n").expect("write");
        assert!(load_config(tmp.path(), Some(&unknown)).is_err());
    }

    #[test]
    fn explicit_unsupported_extension_is_an_error() {
        let tmp = TempDir::new().expect("tmp");
        let path = tmp.path().join("config.json");
        fs::write(&path, "{}").expect("write");
        assert!(load_config(tmp.path(), Some(&path)).is_err());
    }

    #[test]
    fn auto_discovered_invalid_config_falls_back_to_defaults() {
        let tmp = TempDir::new().expect("tmp");
        fs::write(tmp.path().join("plan-preview.toml"), "address = [1, 2]\n").expect("write");

        let cfg = load_config(tmp.path(), None).expect("should not error on auto-discovery");
        assert_eq!(cfg, FileConfig::default());
    }
}
