//! Implementations behind the `logh` command-line tool.

pub mod commands;
