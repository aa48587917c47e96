//! The strip commands and their shared flags.

use crate::config::{self, ConfigMerger};
use crate::rules_file::load_rule_set;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::Args;
use codestrip_core::adapters::{ConsoleProgress, FsSourcePort, FsWritePort};
use codestrip_core::pipeline::{
    Artifact, CUSTOM_PIPELINE, OnMissing, PipelineOutcome, run_artifacts, run_frontend,
    run_server, write_report,
};
use codestrip_core::ports::Ports;
use codestrip_core::settings::ArtifactPaths;
use codestrip_core::ToolError;
use codestrip_types::report::ToolInfo;
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

/// Flags accepted by both strip pipelines.
#[derive(Debug, Clone, Args)]
pub struct StripArgs {
    /// Directory the source and target paths are relative to.
    #[arg(long, default_value = ".")]
    pub root: Utf8PathBuf,

    /// Transform and print a diff, but write no targets.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Exit 2 and leave a target unwritten when any of its rules matched nothing.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Write a JSON run report here (a markdown summary is written beside it).
    #[arg(long)]
    pub report: Option<Utf8PathBuf>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    /// Rule set file (.toml or .json).
    #[arg(long)]
    pub rules: Utf8PathBuf,

    /// File to read. A missing source is skipped.
    #[arg(long)]
    pub source: Utf8PathBuf,

    /// File to overwrite with the transformed text.
    #[arg(long)]
    pub target: Utf8PathBuf,

    /// Transform and print a diff, but write nothing.
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,

    /// Exit 2 and leave the target unwritten when any rule matched nothing.
    #[arg(long, default_value_t = false)]
    pub strict: bool,

    /// Write a JSON run report here.
    #[arg(long)]
    pub report: Option<Utf8PathBuf>,
}

/// Diagnostics go to stderr; stdout carries progress lines only.
pub fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

/// Log a failed command and map it to its exit status.
pub fn finish(result: Result<(), ToolError>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

pub fn tool_info() -> ToolInfo {
    ToolInfo {
        name: "codestrip".to_string(),
        version: Some(env!("CARGO_PKG_VERSION").to_string()),
    }
}

fn console_ports() -> Ports<'static> {
    Ports {
        source: &FsSourcePort,
        writer: &FsWritePort,
        progress: &ConsoleProgress,
    }
}

pub fn cmd_frontend(args: &StripArgs) -> Result<(), ToolError> {
    let file_config = config::load_or_default(&args.root).context("load codestrip.toml config")?;
    let settings = ConfigMerger::new(file_config).merge_frontend_args(
        &args.root,
        args.dry_run,
        args.strict,
    );
    debug!(?settings, "merged frontend settings");

    let outcome = run_frontend(&settings, console_ports(), tool_info())?;
    conclude(outcome, args.report.as_deref())
}

pub fn cmd_server(args: &StripArgs) -> Result<(), ToolError> {
    let file_config = config::load_or_default(&args.root).context("load codestrip.toml config")?;
    let settings =
        ConfigMerger::new(file_config).merge_server_args(&args.root, args.dry_run, args.strict);
    debug!(?settings, "merged server settings");

    let outcome = run_server(&settings, console_ports(), tool_info())?;
    conclude(outcome, args.report.as_deref())
}

pub fn cmd_run(args: &RunArgs) -> Result<(), ToolError> {
    let file_config =
        config::load_or_default(Utf8Path::new(".")).context("load codestrip.toml config")?;
    let options = ConfigMerger::new(file_config).merge_options(args.dry_run, args.strict);
    let rule_set = load_rule_set(&args.rules)?;

    let artifacts = [Artifact {
        paths: ArtifactPaths::new(args.source.clone(), args.target.clone()),
        rule_set,
        on_missing: OnMissing::Skip,
    }];
    let outcome = run_artifacts(
        CUSTOM_PIPELINE,
        Utf8Path::new("."),
        &artifacts,
        options,
        console_ports(),
        tool_info(),
    )?;
    conclude(outcome, args.report.as_deref())
}

/// Write the optional report, then surface a policy block as exit 2.
fn conclude(outcome: PipelineOutcome, report: Option<&Utf8Path>) -> Result<(), ToolError> {
    if let Some(path) = report {
        write_report(&outcome.report, path, &FsWritePort)
            .with_context(|| format!("write report {}", path))?;
        info!("wrote run report to {}", path);
    }
    if outcome.policy_block {
        return Err(ToolError::PolicyBlock);
    }
    Ok(())
}
