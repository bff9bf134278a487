//! `show`, `install` and `uninstall` for checkers and reports.

use anyhow::Result;
use std::path::Path;

use crate::args::Context;
use crate::scanner::Scanner;
use crate::ui::{print_colored, print_error, print_info, print_status, print_success};

/// Prints the installed plugins of `context` as a name/description table.
pub fn show(scanner: &dyn Scanner, context: Context) -> Result<()> {
    let registry = scanner.plugins(context)?;
    println!();
    print!("{}", plugin_core::render(&registry));
    println!();
    Ok(())
}

pub fn install(scanner: &dyn Scanner, context: Context, target: &Path) -> Result<()> {
    print_colored("INSTALL", &format!("Installing {context} plugin..."));
    print_status("SOURCE", &format!("Source: {}", target.display()));

    let dest = scanner.install(context, target)?;

    println!();
    print_success("SUCCESS", "Plugin installed successfully");
    print_status("LOCATION", &format!("Location: {}", dest.display()));
    Ok(())
}

/// Uninstalls by file name when `target` ends in `.py`, by plugin name
/// otherwise.
pub fn uninstall(scanner: &dyn Scanner, context: Context, target: &Path) -> Result<()> {
    print_colored("UNINSTALL", &format!("Uninstalling {context} plugin..."));
    print_status("PLUGIN", &format!("Plugin: {}", target.display()));

    let removed = if target.extension().is_some_and(|ext| ext == "py") {
        scanner.uninstall_file(context, target)
    } else {
        let name = target.to_string_lossy();
        match scanner.uninstall(context, &name)? {
            Some(path) => Ok(path),
            None => {
                println!();
                print_error("ERROR", &format!("Plugin '{name}' not found"));
                print_info("INFO", &format!("Installed {context}:"));
                show(scanner, context)?;
                anyhow::bail!("plugin not found: {name}");
            }
        }
    }?;

    println!();
    print_success("SUCCESS", "Plugin uninstalled successfully");
    print_status("LOCATION", &format!("Removed location: {}", removed.display()));
    Ok(())
}
