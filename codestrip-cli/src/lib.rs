//! Command implementations shared by the `codestrip`, `strip-frontend` and
//! `strip-server` binaries.

pub mod commands;
pub mod config;
pub mod explain;
pub mod rules_file;

pub use commands::{RunArgs, StripArgs, cmd_frontend, cmd_run, cmd_server, finish, init_tracing};
