use anyhow::Result;
use std::path::Path;
use tracing::info;

use crate::scanner::Scanner;
use crate::ui;

/// Prints the banner and hands `target` to the scanner.
///
/// Failures of the scanner process are returned as-is, there is no retry.
pub fn run_scan(
    scanner: &dyn Scanner,
    target: &Path,
    project: Option<&str>,
    verbose: bool,
) -> Result<()> {
    ui::print_banner();
    info!(target = %target.display(), project = project.unwrap_or("-"), "Scan started");
    scanner.run(target, project, verbose)?;
    info!("Scan completed");
    Ok(())
}
