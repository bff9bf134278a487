//! Entry point for the command-line interface.
//! Parses arguments, loads the configuration and hands the invocation to
//! the scanner bridge.

use ascli::args::parse_cli;
use ascli::config::load_config;
use ascli::scanner::AtomShields;
use ascli::{execute, Invocation};

fn main() -> anyhow::Result<()> {
    let invocation = Invocation::from(parse_cli());
    ascli::ui::init_logging(invocation.verbose);
    let scanner = AtomShields::from_config(load_config()?)?;
    execute(&invocation, &scanner)
}
