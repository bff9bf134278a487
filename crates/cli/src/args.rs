use clap::Parser;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// What the invocation should do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Install,
    Uninstall,
    Show,
    Run,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Install, Action::Uninstall, Action::Show, Action::Run];

    pub fn as_str(self) -> &'static str {
        match self {
            Action::Install => "install",
            Action::Uninstall => "uninstall",
            Action::Show => "show",
            Action::Run => "run",
        }
    }
}

/// Plugin family an action operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Checkers,
    Reports,
}

impl Context {
    pub const ALL: [Context; 2] = [Context::Checkers, Context::Reports];

    pub fn as_str(self) -> &'static str {
        match self {
            Context::Checkers => "checkers",
            Context::Reports => "reports",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn allowed<T: fmt::Display>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Allowed context values, for error messages.
pub fn allowed_contexts() -> String {
    allowed(&Context::ALL)
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        Action::ALL
            .into_iter()
            .find(|a| a.as_str() == s)
            .ok_or_else(|| format!("Invalid action. Allowed values: {}", allowed(&Action::ALL)))
    }
}

impl FromStr for Context {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.to_lowercase();
        Context::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| format!("Invalid context. Allowed values: {}", allowed_contexts()))
    }
}

fn parse_action(s: &str) -> Result<Action, String> {
    s.parse()
}

fn parse_context(s: &str) -> Result<Context, String> {
    s.parse()
}

#[derive(Parser, Debug)]
#[command(
    name = "ascli",
    author,
    version,
    about = "AtomShields CLI - manage checker and report plugins and run scans",
    long_about = "Performs an action into a context. The action is defined by the first argument and the context by the second. Options refine the action.

Examples:
  ascli show checkers                          # List installed checkers
  ascli install checkers -t ./my_checker.py    # Install a checker
  ascli uninstall reports -t http              # Uninstall a report by name
  ascli run -t ./repo -n my-project            # Scan a repository",
    after_help = "For more documentation, please visit https://github.com/ElevenPaths/AtomShields-cli"
)]
pub struct Cli {
    /// Action to perform. Allowed values are: install, uninstall, show, run
    #[arg(value_parser = parse_action)]
    pub action: Action,

    /// Context to operate with. Allowed values are: checkers, reports
    #[arg(value_parser = parse_context)]
    pub context: Option<Context>,

    /// Target folder to scan. For install/uninstall, the path to the plugin
    /// file; uninstall also accepts the plugin name
    #[arg(short = 't', long = "target", value_name = "path_to_scan")]
    pub target: Option<PathBuf>,

    /// Project (repository) name handed to the scanner
    #[arg(short = 'n', long = "name", value_name = "project_name")]
    pub name: Option<String>,

    /// Run verbosely
    #[arg(short, long)]
    pub verbose: bool,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
