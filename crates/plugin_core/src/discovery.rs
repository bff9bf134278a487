//! Enumeration of plugin files and construction of the name/description
//! registry used by `ascli show`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use regex::Regex;

use crate::loader::{load_plugin, Loader};
use crate::protocol::ClassArgs;

/// Pattern matched against plugin file names.
pub const PLUGIN_PATTERN: &str = "*.py";

/// Infrastructure files shipped next to plugins that never define one.
pub const EXCLUDED_FILES: &[&str] = &["__init__.py", "base.py"];

/// Plugin name mapped to its description. Rebuilt on every request.
pub type Registry = BTreeMap<String, String>;

/// Converts a file name glob into an anchored regular expression.
///
/// Only `*` and `?` are special; every other character matches itself.
///
/// # Example
///
/// ```
/// use plugin_core::discovery::glob_to_regex;
/// let re = glob_to_regex("*.py").unwrap();
/// assert!(re.is_match("xss.py"));
/// assert!(!re.is_match("xss.pyc"));
/// ```
pub fn glob_to_regex(pat: &str) -> Result<Regex, regex::Error> {
    let mut regex = String::from("^");
    for c in pat.chars() {
        match c {
            '*' => regex.push_str("[^/]*"),
            '?' => regex.push_str("[^/]"),
            _ => regex.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    regex.push('$');
    Regex::new(&regex)
}

/// Lists the files of `dir` whose name matches `pattern`, minus any file
/// whose name appears in `excluded`.
///
/// A missing directory yields an empty list. Sub-directories are not
/// descended into. Paths come back sorted so callers process them in a
/// stable order.
pub fn enumerate(dir: &Path, pattern: &str, excluded: &[&str]) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let re = glob_to_regex(pattern).with_context(|| format!("invalid pattern: {pattern}"))?;
    let entries =
        fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry
            .with_context(|| format!("failed to read {}", dir.display()))?
            .path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if excluded.contains(&name) || !re.is_match(name) {
            continue;
        }
        files.push(path);
    }
    files.sort();
    Ok(files)
}

/// Enumerates the plugin files of `dir` using the default pattern and
/// exclusions.
pub fn plugin_files(dir: &Path) -> Result<Vec<PathBuf>> {
    enumerate(dir, PLUGIN_PATTERN, EXCLUDED_FILES)
}

/// Builds the registry of plugins installed in `dir`.
///
/// Files that fail to load are skipped; the loader reports them at debug
/// level. When two files declare the same name the one processed last
/// (by sorted path) wins.
pub fn build_registry(dir: &Path, loader: &dyn Loader, args: &ClassArgs) -> Result<Registry> {
    let mut registry = Registry::new();
    for path in plugin_files(dir)? {
        if let Some(descriptor) = load_plugin(loader, &path, args) {
            registry.insert(descriptor.name, descriptor.description);
        }
    }
    Ok(registry)
}

/// Finds the file in `dir` that declares the plugin called `name`.
///
/// Mirrors the overwrite order of [`build_registry`]: with duplicates the
/// last matching file is returned.
pub fn locate(
    dir: &Path,
    loader: &dyn Loader,
    args: &ClassArgs,
    name: &str,
) -> Result<Option<PathBuf>> {
    let mut found = None;
    for path in plugin_files(dir)? {
        if load_plugin(loader, &path, args).is_some_and(|d| d.name == name) {
            found = Some(path);
        }
    }
    Ok(found)
}
