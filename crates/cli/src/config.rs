use anyhow::{Context as _, Result};
use plugin_core::loader::{DEFAULT_INTERPRETER, DEFAULT_TIMEOUT_MS};
use plugin_core::{ClassArgs, InterpreterLoader, Loader};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, time::Duration};

use crate::args::Context;

/// Home directory of the AtomShields scanner.
#[cfg(windows)]
pub fn config_dir() -> PathBuf {
    std::env::var("APPDATA")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("atomshields")
}

/// Home directory of the AtomShields scanner.
#[cfg(not(windows))]
pub fn config_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("."))
        .join(".atomshields")
}

pub fn config_file_path() -> PathBuf {
    config_dir().join("ascli.toml")
}

fn default_checkers_dir() -> PathBuf {
    config_dir().join("checkers")
}

fn default_reports_dir() -> PathBuf {
    config_dir().join("reports")
}

/// Where the scanner keeps installed plugins.
#[derive(Debug, Serialize, Deserialize)]
pub struct PluginDirs {
    #[serde(default = "default_checkers_dir")]
    pub checkers_dir: PathBuf,
    #[serde(default = "default_reports_dir")]
    pub reports_dir: PathBuf,
}

impl Default for PluginDirs {
    fn default() -> Self {
        Self {
            checkers_dir: default_checkers_dir(),
            reports_dir: default_reports_dir(),
        }
    }
}

impl PluginDirs {
    pub fn get(&self, context: Context) -> &PathBuf {
        match context {
            Context::Checkers => &self.checkers_dir,
            Context::Reports => &self.reports_dir,
        }
    }
}

fn default_interpreter() -> String {
    DEFAULT_INTERPRETER.to_string()
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

/// Settings of the Python interpreter that imports and instantiates plugins.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoaderConfig {
    #[serde(default = "default_interpreter")]
    pub interpreter: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub mem_mb: Option<u64>,
    /// Named arguments passed to every plugin constructor.
    #[serde(default)]
    pub args: toml::Table,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            interpreter: default_interpreter(),
            timeout_ms: default_timeout_ms(),
            mem_mb: None,
            args: toml::Table::new(),
        }
    }
}

impl LoaderConfig {
    pub fn build(&self) -> Result<Box<dyn Loader>> {
        let loader = InterpreterLoader::new(&self.interpreter)
            .context("invalid [loader] interpreter")?
            .with_timeout(Duration::from_millis(self.timeout_ms))
            .with_mem_limit(self.mem_mb);
        Ok(Box::new(loader))
    }

    pub fn class_args(&self) -> Result<ClassArgs> {
        match serde_json::to_value(&self.args).context("invalid loader args")? {
            serde_json::Value::Object(map) => Ok(map),
            _ => Ok(ClassArgs::new()),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Command line launching the scanner; the target, project name and
    /// verbosity (`0`/`1`) are appended. Unset means the built-in bridge
    /// to the `atomshields` Python package.
    #[serde(default)]
    pub command: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub plugins: PluginDirs,
    #[serde(default)]
    pub loader: LoaderConfig,
    #[serde(default)]
    pub scanner: ScannerConfig,
}

pub fn load_config() -> Result<Config> {
    let path = config_file_path();
    if path.exists() {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("failed to parse {}", path.display()))
    } else {
        Ok(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_uses_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert_eq!(cfg.loader.interpreter, "python3");
        assert_eq!(cfg.loader.timeout_ms, 5000);
        assert!(cfg.scanner.command.is_none());
        assert!(cfg.plugins.checkers_dir.ends_with("checkers"));
    }

    #[test]
    fn parses_all_sections() {
        let cfg: Config = toml::from_str(
            r#"
[plugins]
checkers_dir = "/opt/as/checkers"

[loader]
interpreter = "/usr/bin/env python3"
timeout_ms = 250

[loader.args]
strict = true
level = "high"

[scanner]
command = "atomshields-scan --quiet"
"#,
        )
        .unwrap();
        assert_eq!(
            cfg.plugins.get(Context::Checkers),
            &PathBuf::from("/opt/as/checkers")
        );
        assert!(cfg.plugins.get(Context::Reports).ends_with("reports"));
        assert_eq!(cfg.loader.timeout_ms, 250);
        assert!(cfg.loader.build().is_ok());
        let args = cfg.loader.class_args().unwrap();
        assert_eq!(args["strict"], serde_json::json!(true));
        assert_eq!(args["level"], serde_json::json!("high"));
        assert_eq!(
            cfg.scanner.command.as_deref(),
            Some("atomshields-scan --quiet")
        );
    }

    #[test]
    fn malformed_loader_settings_are_rejected() {
        assert!(toml::from_str::<Config>("[loader]\ntimeout_ms = \"soon\"\n").is_err());
        let cfg: Config = toml::from_str("[loader]\ninterpreter = \"\"\n").unwrap();
        assert!(cfg.loader.build().is_err());
    }
}
