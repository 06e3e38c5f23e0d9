// hevcify-cli/src/lib.rs
//
// Library portion of the hevcify CLI application.
// Contains argument definitions, command logic, and logging setup.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod select;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConvertArgs, GlobalArgs};
pub use commands::convert::run_convert;
pub use commands::encoders::run_encoders;

/// Completed, even with per-file failures, or nothing to do.
pub const EXIT_OK: i32 = 0;
/// Setup failed before any file was touched.
pub const EXIT_FATAL: i32 = 1;
/// At least one original was deleted without its replacement being moved into place.
pub const EXIT_REPLACE_FAILED: i32 = 2;
/// Stopped by Ctrl+C.
pub const EXIT_ABORTED: i32 = 130;
