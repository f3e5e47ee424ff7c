//! Library side of the `outbreak` CLI: logging setup and the file-level
//! workflow shared by the subcommands.

pub mod logging;
pub mod workflow;
