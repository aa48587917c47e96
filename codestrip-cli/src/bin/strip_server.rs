//! Strips payment code from `original/server.js` into `server.js`.
//!
//! A missing source is fatal and leaves `server.js` untouched.

use clap::Parser;
use codestrip_cli::{StripArgs, cmd_server, finish, init_tracing};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "strip-server",
    version,
    about = "Strip payment and subscription code from the server entry point."
)]
struct Cli {
    #[command(flatten)]
    args: StripArgs,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    finish(cmd_server(&cli.args))
}
