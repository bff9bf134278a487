//! Terminal presentation helpers: banner, status tags and log setup.

use colored::*;
use std::env;
use tracing::level_filters::LevelFilter;

/// Check if colored output should be used
pub fn use_colored_output() -> bool {
    // Standard opt-out, see https://no-color.org
    if env::var("NO_COLOR").is_ok() {
        return false;
    }
    if let Ok(term) = env::var("TERM") {
        if term == "dumb" || term == "unknown" {
            return false;
        }
    }
    if env::var("CI").is_ok() || env::var("CONTINUOUS_INTEGRATION").is_ok() {
        return false;
    }
    true
}

/// Installs the stderr log subscriber. Debug diagnostics, such as plugins
/// that failed to load, only show up with `verbose`.
pub fn init_logging(verbose: bool) {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

pub fn print_banner() {
    let version = env!("CARGO_PKG_VERSION");
    // Avoid panics when the version exceeds the expected width
    let spaces = " ".repeat(24usize.saturating_sub(version.len()));
    eprintln!(
        r#"
    ╭──────────────────────────────────────╮
    │                                      │
    │           A T O M S H I E L D S      │
    │                                      │
    │     Source code security scanner     │
    │     Version: {version}{spaces}│
    │                                      │
    ╰──────────────────────────────────────╯
"#
    );
}

pub fn print_status(tag: &str, message: &str) {
    println!("[{tag}] {message}");
}

pub fn print_colored(tag: &str, message: &str) {
    if use_colored_output() {
        println!("[{}] {message}", tag.bright_blue().bold());
    } else {
        println!("[{tag}] {message}");
    }
}

pub fn print_error(tag: &str, message: &str) {
    if use_colored_output() {
        println!("[{}] {message}", tag.bright_red().bold());
    } else {
        println!("[{tag}] {message}");
    }
}

pub fn print_success(tag: &str, message: &str) {
    if use_colored_output() {
        println!("[{}] {message}", tag.bright_green().bold());
    } else {
        println!("[{tag}] {message}");
    }
}

pub fn print_info(tag: &str, message: &str) {
    if use_colored_output() {
        println!("[{}] {message}", tag.bright_yellow());
    } else {
        println!("[{tag}] {message}");
    }
}
