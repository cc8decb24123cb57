//! Command-line interface for the `spots` tool.

pub mod commands;
