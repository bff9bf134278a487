use std::fmt::Write;

use crate::discovery::Registry;

/// Width of the name column; longer names are cut.
pub const NAME_WIDTH: usize = 20;
/// Length of the line separating the header from the rows.
pub const SEPARATOR_WIDTH: usize = 90;

/// Formats `registry` as a two-column table, one plugin per line, sorted
/// by name.
///
/// # Example
///
/// ```
/// use plugin_core::{render, Registry};
/// let mut registry = Registry::new();
/// registry.insert("xss".into(), "Finds XSS".into());
/// let out = render(&registry);
/// assert!(out.lines().nth(2).unwrap().starts_with("xss "));
/// ```
pub fn render(registry: &Registry) -> String {
    let width = NAME_WIDTH;
    let mut out = String::new();
    let _ = writeln!(out, "{:<width$}\t{}", "Name", "Description");
    let _ = writeln!(out, "{}", "-".repeat(SEPARATOR_WIDTH));
    for (name, description) in registry {
        let _ = writeln!(out, "{name:<width$.width$}\t{description}");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_registry_renders_header_only() {
        let out = render(&Registry::new());
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("Name"));
        assert!(lines[0].ends_with("\tDescription"));
        assert_eq!(lines[1], "-".repeat(SEPARATOR_WIDTH));
    }

    #[test]
    fn rows_sorted_and_aligned() {
        let mut registry = Registry::new();
        registry.insert("sqli".into(), "SQL injection".into());
        registry.insert("a-very-long-plugin-name-indeed".into(), "Long".into());
        let out = render(&registry);
        let rows: Vec<_> = out.lines().skip(2).collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0], "a-very-long-plugin-n\tLong");
        assert_eq!(rows[1], format!("{:<20}\tSQL injection", "sqli"));
    }
}
