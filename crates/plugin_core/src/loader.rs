//! Extraction of [`PluginDescriptor`]s from plugin files.
//!
//! A plugin file is a Python module whose first class carries `NAME` and
//! `DESCRIPTION` class attributes. [`InterpreterLoader`] imports the module
//! in a Python subprocess and instantiates that class, so files failing at
//! import or in their constructor are rejected.

use std::io::Read;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use shlex::Shlex;
use tracing::debug;

use crate::limits::apply_limits;
use crate::protocol::{ClassArgs, Limits, PluginDescriptor};

/// Loads the descriptor of the plugin defined in a file.
pub trait Loader {
    /// Returns the descriptor of the first class defined in `path`,
    /// constructed with `args`.
    ///
    /// # Errors
    ///
    /// Any problem reading, parsing or instantiating the plugin.
    fn load(&self, path: &Path, args: &ClassArgs) -> Result<PluginDescriptor>;
}

/// Runs `loader` on `path`, turning failures into a debug diagnostic.
///
/// A broken plugin must not abort the listing of the others, so errors
/// never leave this function.
pub fn load_plugin(
    loader: &dyn Loader,
    path: &Path,
    args: &ClassArgs,
) -> Option<PluginDescriptor> {
    match loader.load(path, args) {
        Ok(descriptor) => Some(descriptor),
        Err(e) => {
            debug!(path = %path.display(), "[!] {e:#}");
            None
        }
    }
}

/// Script executed by the interpreter: imports the plugin module,
/// instantiates its first class and prints the descriptor as JSON.
const INSPECTOR: &str = r#"import importlib.util, inspect, json, sys
path, args = sys.argv[1], json.loads(sys.argv[2])
spec = importlib.util.spec_from_file_location("ascli_plugin", path)
module = importlib.util.module_from_spec(spec)
sys.modules[spec.name] = module
spec.loader.exec_module(module)
classes = [c for _, c in inspect.getmembers(module, inspect.isclass) if c.__module__ == module.__name__]
if not classes:
    raise RuntimeError("no plugin class defined")
classes.sort(key=lambda c: inspect.getsourcelines(c)[1])
cls = classes[0]
cls(**args)
print(json.dumps({"name": cls.NAME, "description": cls.DESCRIPTION}))
"#;

pub const DEFAULT_INTERPRETER: &str = "python3";
pub const DEFAULT_TIMEOUT_MS: u64 = 5000;

/// Imports each plugin in a Python subprocess and instantiates it.
#[derive(Debug, Clone)]
pub struct InterpreterLoader {
    interpreter: Vec<String>,
    timeout: Duration,
    mem_mb: Option<u64>,
}

impl Default for InterpreterLoader {
    fn default() -> Self {
        Self {
            interpreter: vec![DEFAULT_INTERPRETER.to_string()],
            timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            mem_mb: None,
        }
    }
}

impl InterpreterLoader {
    /// Creates a loader running `interpreter`, a shell-style command line
    /// such as `python3` or `/usr/bin/env python3 -S`.
    pub fn new(interpreter: &str) -> Result<Self> {
        let parts: Vec<String> = Shlex::new(interpreter).collect();
        if parts.is_empty() {
            bail!("empty interpreter command");
        }
        Ok(Self {
            interpreter: parts,
            ..Self::default()
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_mem_limit(mut self, mem_mb: Option<u64>) -> Self {
        self.mem_mb = mem_mb;
        self
    }

    fn command(&self, path: &Path, args: &ClassArgs) -> Result<Command> {
        let (program, extra) = self
            .interpreter
            .split_first()
            .context("empty interpreter command")?;
        let mut command = Command::new(program);
        command
            .args(extra)
            .arg("-c")
            .arg(INSPECTOR)
            .arg(path)
            .arg(serde_json::to_string(args)?)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let limits = Limits {
            cpu_ms: Some(self.timeout.as_millis() as u64),
            mem_mb: self.mem_mb,
        };
        apply_limits(&mut command, &limits);
        Ok(command)
    }
}

/// Interval between two checks of the inspector's exit status.
const POLL_INTERVAL: Duration = Duration::from_millis(10);
/// Time left to the output readers once the inspector has exited.
const DRAIN_GRACE: Duration = Duration::from_millis(200);

fn last_line(text: &str) -> Option<&str> {
    text.lines().rev().map(str::trim).find(|l| !l.is_empty())
}

impl Loader for InterpreterLoader {
    fn load(&self, path: &Path, args: &ClassArgs) -> Result<PluginDescriptor> {
        let deadline = Instant::now() + self.timeout;
        let mut child = self
            .command(path, args)?
            .spawn()
            .with_context(|| format!("failed to spawn {}", self.interpreter.join(" ")))?;
        let mut stdout = child.stdout.take().context("open stdout")?;
        let mut stderr = child.stderr.take().context("open stderr")?;
        let (out_tx, out_rx) = mpsc::channel();
        let (err_tx, err_rx) = mpsc::channel();
        thread::spawn(move || {
            let mut out = String::new();
            let res = stdout.read_to_string(&mut out).map(|_| out);
            let _ = out_tx.send(res);
        });
        thread::spawn(move || {
            let mut err = String::new();
            let _ = stderr.read_to_string(&mut err);
            let _ = err_tx.send(err);
        });

        // One deadline covers the whole inspection: a plugin closing its stdout
        // early must not be able to outlive it.
        let status = loop {
            if let Some(status) = child.try_wait().context("failed to wait for inspector")? {
                break status;
            }
            if Instant::now() >= deadline {
                let _ = child.kill();
                let _ = child.wait();
                bail!(
                    "plugin {} did not load within {} ms",
                    path.display(),
                    self.timeout.as_millis()
                );
            }
            thread::sleep(POLL_INTERVAL);
        };

        let remaining = deadline.saturating_duration_since(Instant::now());
        let errors = err_rx.recv_timeout(DRAIN_GRACE).unwrap_or_default();
        if !status.success() {
            let reason = last_line(&errors).unwrap_or("no diagnostics");
            bail!("failed to load {} ({status}): {reason}", path.display());
        }
        let output = out_rx
            .recv_timeout(remaining.max(DRAIN_GRACE))
            .map_err(|_| anyhow::anyhow!("inspector output of {} was not closed", path.display()))?
            .context("failed to read inspector output")?;
        let line = last_line(&output)
            .with_context(|| format!("inspector printed nothing for {}", path.display()))?;
        serde_json::from_str(line).context("invalid inspector output")
    }
}
