//! Command-line front-end for the AtomShields scanner.
use anyhow::{anyhow, bail, Result};
use std::env;
use std::path::{Path, PathBuf};

pub mod args;
pub mod config;
pub mod plugins;
pub mod scan;
pub mod scanner;
pub mod ui;

use args::{allowed_contexts, Action, Cli, Context};
use scanner::Scanner;

/// A validated command line.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub action: Action,
    pub context: Option<Context>,
    pub target: Option<PathBuf>,
    pub project: Option<String>,
    pub verbose: bool,
}

/// Makes `path` absolute when it exists; anything else, such as a plugin
/// name given to `uninstall`, is kept verbatim.
pub fn resolve_target(path: PathBuf) -> PathBuf {
    if path.is_absolute() || !path.exists() {
        return path;
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path,
    }
}

impl From<Cli> for Invocation {
    fn from(cli: Cli) -> Self {
        Self {
            action: cli.action,
            context: cli.context,
            target: cli.target.map(resolve_target),
            project: cli.name,
            verbose: cli.verbose,
        }
    }
}

impl Invocation {
    fn target(&self) -> Result<&Path> {
        match self.target.as_deref() {
            Some(path) if !path.as_os_str().is_empty() => Ok(path),
            _ => Err(anyhow!("You must set a target path.")),
        }
    }
}

/// Performs the requested action through `scanner`.
pub fn execute(inv: &Invocation, scanner: &dyn Scanner) -> Result<()> {
    match (inv.context, inv.action) {
        (Some(context), Action::Show) => plugins::show(scanner, context),
        (Some(context), Action::Install) => plugins::install(scanner, context, inv.target()?),
        (Some(context), Action::Uninstall) => plugins::uninstall(scanner, context, inv.target()?),
        (Some(context), Action::Run) => {
            bail!("Action 'run' does not take a context (got '{context}')")
        }
        (None, Action::Run) => scan::run_scan(
            scanner,
            inv.target()?,
            inv.project.as_deref(),
            inv.verbose,
        ),
        (None, _) => bail!("Invalid context. Allowed values: {}", allowed_contexts()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plugin_core::Registry;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        calls: RefCell<Vec<String>>,
        installed: Registry,
    }

    impl Scanner for Recorder {
        fn plugin_dir(&self, _context: Context) -> &Path {
            Path::new("/plugins")
        }

        fn plugins(&self, context: Context) -> Result<Registry> {
            self.calls.borrow_mut().push(format!("plugins {context}"));
            Ok(self.installed.clone())
        }

        fn install(&self, context: Context, source: &Path) -> Result<PathBuf> {
            self.calls
                .borrow_mut()
                .push(format!("install {context} {}", source.display()));
            Ok(PathBuf::from("/plugins/x.py"))
        }

        fn uninstall(&self, context: Context, name: &str) -> Result<Option<PathBuf>> {
            self.calls
                .borrow_mut()
                .push(format!("uninstall {context} {name}"));
            Ok(self
                .installed
                .contains_key(name)
                .then(|| PathBuf::from("/plugins/x.py")))
        }

        fn uninstall_file(&self, context: Context, path: &Path) -> Result<PathBuf> {
            self.calls
                .borrow_mut()
                .push(format!("uninstall_file {context} {}", path.display()));
            Ok(PathBuf::from("/plugins/x.py"))
        }

        fn run(&self, target: &Path, project: Option<&str>, verbose: bool) -> Result<()> {
            self.calls.borrow_mut().push(format!(
                "run {} {} {verbose}",
                target.display(),
                project.unwrap_or("-")
            ));
            Ok(())
        }
    }

    fn inv(action: Action, context: Option<Context>, target: Option<&str>) -> Invocation {
        Invocation {
            action,
            context,
            target: target.map(PathBuf::from),
            project: None,
            verbose: false,
        }
    }

    #[test]
    fn uninstall_dispatches_on_extension() {
        let mut scanner = Recorder::default();
        scanner.installed.insert("xss".into(), "d".into());
        execute(
            &inv(Action::Uninstall, Some(Context::Reports), Some("/tmp/html.py")),
            &scanner,
        )
        .unwrap();
        execute(
            &inv(Action::Uninstall, Some(Context::Checkers), Some("xss")),
            &scanner,
        )
        .unwrap();
        let calls = scanner.calls.borrow();
        assert_eq!(calls[0], "uninstall_file reports /tmp/html.py");
        assert_eq!(calls.last().unwrap(), "uninstall checkers xss");
    }

    #[test]
    fn uninstall_unknown_name_lists_installed_and_fails() {
        let scanner = Recorder::default();
        let err = execute(
            &inv(Action::Uninstall, Some(Context::Checkers), Some("ghost")),
            &scanner,
        )
        .unwrap_err();
        assert!(err.to_string().contains("plugin not found: ghost"));
        assert_eq!(
            scanner.calls.borrow().as_slice(),
            ["uninstall checkers ghost", "plugins checkers"]
        );
    }

    #[test]
    fn uninstall_by_name_loads_plugins_once() {
        let mut scanner = Recorder::default();
        scanner.installed.insert("xss".into(), "d".into());
        execute(
            &inv(Action::Uninstall, Some(Context::Checkers), Some("xss")),
            &scanner,
        )
        .unwrap();
        assert_eq!(scanner.calls.borrow().as_slice(), ["uninstall checkers xss"]);
    }

    #[test]
    fn target_is_required() {
        let scanner = Recorder::default();
        for invocation in [
            inv(Action::Install, Some(Context::Checkers), None),
            inv(Action::Uninstall, Some(Context::Reports), Some("")),
            inv(Action::Run, None, None),
        ] {
            let err = execute(&invocation, &scanner).unwrap_err();
            assert_eq!(err.to_string(), "You must set a target path.");
        }
        assert!(scanner.calls.borrow().is_empty());
    }

    #[test]
    fn missing_context_lists_allowed_values() {
        let scanner = Recorder::default();
        let err = execute(&inv(Action::Show, None, None), &scanner).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid context. Allowed values: checkers, reports"
        );
    }

    #[test]
    fn run_rejects_context_and_passes_project() {
        let scanner = Recorder::default();
        assert!(execute(
            &inv(Action::Run, Some(Context::Checkers), Some("/src")),
            &scanner
        )
        .is_err());

        let mut invocation = inv(Action::Run, None, Some("/src"));
        invocation.project = Some("demo".into());
        invocation.verbose = true;
        execute(&invocation, &scanner).unwrap();
        assert_eq!(scanner.calls.borrow().as_slice(), ["run /src demo true"]);
    }

    #[test]
    fn relative_existing_targets_become_absolute() {
        let resolved = resolve_target(PathBuf::from("."));
        assert!(resolved.is_absolute());
        assert_eq!(
            resolve_target(PathBuf::from("not-a-real-plugin-name")),
            PathBuf::from("not-a-real-plugin-name")
        );
    }
}
