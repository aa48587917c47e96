//! The strip pipelines, extracted from the CLI.
//!
//! These entry points are I/O-agnostic: reads, writes and progress output go
//! through the port traits.

use crate::ports::{Ports, WritePort};
use crate::runner::{RunOutcome, run};
use crate::settings::{ArtifactPaths, FrontendSettings, RunOptions, ServerSettings};
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codestrip_catalog::{frontend_markup, frontend_script, server_script};
use codestrip_render::render_run_md;
use codestrip_types::progress::ProgressEvent;
use codestrip_types::report::{FileReport, FileStatus, RunReport, ToolInfo};
use codestrip_types::rule::RuleSet;
use tracing::{error, info};

pub const FRONTEND_PIPELINE: &str = "frontend";
pub const SERVER_PIPELINE: &str = "server";
pub const CUSTOM_PIPELINE: &str = "custom";

/// Error type for pipeline results. Exit code 2 = policy block, 1 = tool error.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("policy block")]
    PolicyBlock,
    #[error("required source {path} not found")]
    MissingSource { path: Utf8PathBuf },
    #[error("{0:#}")]
    Internal(#[from] anyhow::Error),
}

impl ToolError {
    pub fn exit_code(&self) -> u8 {
        match self {
            ToolError::PolicyBlock => 2,
            ToolError::MissingSource { .. } | ToolError::Internal(_) => 1,
        }
    }
}

/// What to do when an artifact's source does not exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnMissing {
    /// Report a skip and continue with the next artifact.
    Skip,
    /// Stop the pipeline with [`ToolError::MissingSource`].
    Fail,
}

/// One source/target pair and the rule set that rewrites it.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub paths: ArtifactPaths,
    pub rule_set: RuleSet,
    pub on_missing: OnMissing,
}

/// Outcome of a pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub report: RunReport,
    /// At least one target was withheld because required rules did not match.
    pub policy_block: bool,
}

/// Frontend: client script and page markup. Missing sources are skipped.
pub fn run_frontend(
    settings: &FrontendSettings,
    ports: Ports<'_>,
    tool: ToolInfo,
) -> Result<PipelineOutcome, ToolError> {
    let artifacts = [
        Artifact {
            paths: settings.script.clone(),
            rule_set: frontend_script(),
            on_missing: OnMissing::Skip,
        },
        Artifact {
            paths: settings.markup.clone(),
            rule_set: frontend_markup(),
            on_missing: OnMissing::Skip,
        },
    ];
    run_artifacts(
        FRONTEND_PIPELINE,
        &settings.root,
        &artifacts,
        settings.options,
        ports,
        tool,
    )
}

/// Server: the HTTP entry point. A missing source is fatal and nothing is written.
pub fn run_server(
    settings: &ServerSettings,
    ports: Ports<'_>,
    tool: ToolInfo,
) -> Result<PipelineOutcome, ToolError> {
    let artifacts = [Artifact {
        paths: settings.server.clone(),
        rule_set: server_script(),
        on_missing: OnMissing::Fail,
    }];
    run_artifacts(
        SERVER_PIPELINE,
        &settings.root,
        &artifacts,
        settings.options,
        ports,
        tool,
    )
}

/// Run each artifact in order, resolving paths against `root`.
pub fn run_artifacts(
    pipeline: &str,
    root: &Utf8Path,
    artifacts: &[Artifact],
    options: RunOptions,
    ports: Ports<'_>,
    tool: ToolInfo,
) -> Result<PipelineOutcome, ToolError> {
    ports.progress.emit(ProgressEvent::Started {
        pipeline: pipeline.to_string(),
        root: root.to_path_buf(),
        dry_run: options.dry_run,
    });

    let mut report = RunReport::new(tool, pipeline, options.dry_run, options.strict);
    for artifact in artifacts {
        let paths = artifact.paths.resolve(root);
        let outcome = run(
            &paths.source,
            &paths.target,
            &artifact.rule_set,
            options,
            ports.source,
            ports.writer,
        )?;

        let (file, patch) = match outcome {
            RunOutcome::NotFound { source } => {
                let status = match artifact.on_missing {
                    OnMissing::Skip => FileStatus::Skipped,
                    OnMissing::Fail => FileStatus::Missing,
                };
                let file = FileReport::absent(
                    artifact.rule_set.name.as_str(),
                    source.as_str(),
                    paths.target.as_str(),
                    status,
                );
                if status == FileStatus::Missing {
                    error!(pipeline, source = source.as_str(), "required source not found");
                    ports.progress.emit(ProgressEvent::File {
                        file: Box::new(file),
                    });
                    return Err(ToolError::MissingSource { path: source });
                }
                info!(pipeline, source = source.as_str(), "source not found; skipping");
                (file, String::new())
            }
            RunOutcome::Transformed(run) => (run.report, run.patch),
        };

        ports.progress.emit(ProgressEvent::File {
            file: Box::new(file.clone()),
        });
        if !patch.is_empty() {
            ports.progress.emit(ProgressEvent::Patch {
                target: file.target.clone(),
                patch,
            });
        }
        report.push(file);
    }

    let targets = report
        .files
        .iter()
        .filter(|f| matches!(f.status, FileStatus::Written | FileStatus::Previewed))
        .map(|f| f.target.clone())
        .collect();
    ports.progress.emit(ProgressEvent::Finished {
        pipeline: pipeline.to_string(),
        targets,
    });

    let policy_block = report.summary.blocked > 0;
    Ok(PipelineOutcome {
        report,
        policy_block,
    })
}

/// Write the JSON run report to `path` and a markdown summary next to it.
pub fn write_report(
    report: &RunReport,
    path: &Utf8Path,
    writer: &dyn WritePort,
) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    writer.write_file(path, json.as_bytes())?;

    let md_path = path.with_extension("md");
    if md_path.as_path() != path {
        writer.write_file(&md_path, render_run_md(report).as_bytes())?;
    }
    Ok(())
}
