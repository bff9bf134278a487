//! Discovery and listing of AtomShields plugins.
//!
//! Checkers and reports are Python files installed in a plugin directory.
//! This crate enumerates those files, extracts the `NAME`/`DESCRIPTION`
//! pair of each one through a [`Loader`] and formats the result.

pub mod discovery;
pub mod limits;
pub mod listing;
pub mod loader;
pub mod protocol;

pub use discovery::{build_registry, enumerate, locate, plugin_files, Registry};
pub use discovery::{EXCLUDED_FILES, PLUGIN_PATTERN};
pub use limits::apply_limits;
pub use listing::render;
pub use loader::{load_plugin, InterpreterLoader, Loader};
pub use protocol::*;
