//! Bridge to the AtomShields scanner.
//!
//! Installing a plugin means copying its file into the checkers or reports
//! directory the scanner reads; scanning is delegated to the scanner
//! process itself.

use anyhow::{bail, Context as _, Result};
use plugin_core::{build_registry, locate, ClassArgs, Loader, Registry, EXCLUDED_FILES};
use shlex::Shlex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tracing::{debug, info, warn};

use crate::args::Context;
use crate::config::{Config, PluginDirs};

/// Operations `ascli` delegates to the scanner.
pub trait Scanner {
    /// Directory holding the installed plugins of `context`.
    fn plugin_dir(&self, context: Context) -> &Path;

    /// Name/description of every installed plugin of `context`.
    fn plugins(&self, context: Context) -> Result<Registry>;

    /// Installs the plugin file at `source`, returning its new location.
    fn install(&self, context: Context, source: &Path) -> Result<PathBuf>;

    /// Removes the installed plugin whose `NAME` is `name`. Returns `None`
    /// when no installed plugin has that name.
    fn uninstall(&self, context: Context, name: &str) -> Result<Option<PathBuf>>;

    /// Removes the installed plugin file with the same file name as `path`.
    fn uninstall_file(&self, context: Context, path: &Path) -> Result<PathBuf>;

    /// Scans `target`.
    fn run(&self, target: &Path, project: Option<&str>, verbose: bool) -> Result<()>;
}

/// Runs the `atomshields` package with the arguments appended by
/// [`AtomShields::run`].
const SCANNER_BRIDGE: &str = r#"import sys
from atomshields import AtomShieldsScanner
scanner = AtomShieldsScanner(sys.argv[1], verbose=sys.argv[3] == "1")
scanner.project = sys.argv[2] or None
scanner.run()
"#;

pub struct AtomShields {
    dirs: PluginDirs,
    loader: Box<dyn Loader>,
    args: ClassArgs,
    command: Vec<String>,
}

impl AtomShields {
    pub fn from_config(config: Config) -> Result<Self> {
        let loader = config.loader.build()?;
        let args = config.loader.class_args()?;
        let command = match config.scanner.command.as_deref() {
            Some(cmd) => {
                let parts: Vec<String> = Shlex::new(cmd).collect();
                if parts.is_empty() {
                    bail!("empty scanner command");
                }
                parts
            }
            None => {
                let mut parts: Vec<String> = Shlex::new(&config.loader.interpreter).collect();
                parts.push("-c".into());
                parts.push(SCANNER_BRIDGE.into());
                parts
            }
        };
        Ok(Self {
            dirs: config.plugins,
            loader,
            args,
            command,
        })
    }
}

impl Scanner for AtomShields {
    fn plugin_dir(&self, context: Context) -> &Path {
        self.dirs.get(context)
    }

    fn plugins(&self, context: Context) -> Result<Registry> {
        build_registry(self.plugin_dir(context), self.loader.as_ref(), &self.args)
    }

    fn install(&self, context: Context, source: &Path) -> Result<PathBuf> {
        if !source.exists() {
            bail!("target path does not exist: {}", source.display());
        }
        if !source.is_file() || !source.extension().is_some_and(|ext| ext == "py") {
            bail!("plugin must be a Python file: {}", source.display());
        }
        let file_name = source
            .file_name()
            .context("plugin path has no file name")?;
        if file_name
            .to_str()
            .is_some_and(|name| EXCLUDED_FILES.contains(&name))
        {
            bail!(
                "{} is reserved and cannot be installed as a plugin",
                file_name.to_string_lossy()
            );
        }
        let descriptor = self
            .loader
            .load(source, &self.args)
            .with_context(|| format!("{} is not a valid {context} plugin", source.display()))?;

        let dir = self.plugin_dir(context);
        fs::create_dir_all(dir).with_context(|| format!("failed to create {}", dir.display()))?;
        let dest = dir.join(file_name);
        if dest.exists() {
            warn!(path = %dest.display(), "Replacing existing installation");
        }
        fs::copy(source, &dest).with_context(|| {
            format!("failed to copy {} to {}", source.display(), dest.display())
        })?;
        info!(name = %descriptor.name, path = %dest.display(), "Plugin installed");
        Ok(dest)
    }

    fn uninstall(&self, context: Context, name: &str) -> Result<Option<PathBuf>> {
        let dir = self.plugin_dir(context);
        let Some(path) = locate(dir, self.loader.as_ref(), &self.args, name)? else {
            return Ok(None);
        };
        fs::remove_file(&path).with_context(|| format!("failed to remove {}", path.display()))?;
        info!(name, path = %path.display(), "Plugin uninstalled");
        Ok(Some(path))
    }

    fn uninstall_file(&self, context: Context, path: &Path) -> Result<PathBuf> {
        let file_name = path.file_name().context("plugin path has no file name")?;
        let installed = self.plugin_dir(context).join(file_name);
        if !installed.is_file() {
            bail!("plugin not found: {}", file_name.to_string_lossy());
        }
        fs::remove_file(&installed)
            .with_context(|| format!("failed to remove {}", installed.display()))?;
        info!(path = %installed.display(), "Plugin uninstalled");
        Ok(installed)
    }

    fn run(&self, target: &Path, project: Option<&str>, verbose: bool) -> Result<()> {
        if !target.exists() {
            bail!("target path does not exist: {}", target.display());
        }
        let (program, args) = self
            .command
            .split_first()
            .context("empty scanner command")?;
        let mut command = Command::new(program);
        command
            .args(args)
            .arg(target)
            .arg(project.unwrap_or_default())
            .arg(if verbose { "1" } else { "0" });
        debug!(program = %program, target = %target.display(), "Launching scanner");
        let status = command
            .status()
            .with_context(|| format!("failed to launch scanner: {program}"))?;
        if !status.success() {
            bail!("scanner exited with {status}");
        }
        Ok(())
    }
}
