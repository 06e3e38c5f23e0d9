//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Converts a directory of videos to HEVC in place.
pub mod convert;
/// Reports encoder availability and the automatic choice.
pub mod encoders;
