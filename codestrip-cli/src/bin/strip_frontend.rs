//! Strips payment code from `original/public/{app.js,index.html}` into `public/`.
//!
//! Missing sources are skipped; the run still succeeds.

use clap::Parser;
use codestrip_cli::{StripArgs, cmd_frontend, finish, init_tracing};
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(
    name = "strip-frontend",
    version,
    about = "Strip payment and subscription code from the frontend bundle."
)]
struct Cli {
    #[command(flatten)]
    args: StripArgs,
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();
    finish(cmd_frontend(&cli.args))
}
