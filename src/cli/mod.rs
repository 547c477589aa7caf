//! CLI subcommand implementations for the orgtree binary.

pub mod map_cmd;
pub mod output;
pub mod sources_cmd;
