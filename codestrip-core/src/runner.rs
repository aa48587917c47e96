//! The transform runner: one source, one rule set, one target.

use crate::pipeline::ToolError;
use crate::ports::{SourcePort, WritePort};
use crate::settings::RunOptions;
use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use codestrip_edit::{EditError, PolicyBlockError, apply_rule_set, check_required, render_patch};
use codestrip_hash::sha256_hex;
use codestrip_types::report::{FileReport, FileStatus};
use codestrip_types::rule::RuleSet;
use tracing::{debug, info, warn};

/// A source that was read and transformed.
#[derive(Debug, Clone)]
pub struct FileRun {
    pub report: FileReport,
    /// Unified diff of source to output; only filled in dry-run mode.
    pub patch: String,
}

#[derive(Debug, Clone)]
pub enum RunOutcome {
    /// Nothing exists at the source path; nothing was written.
    NotFound { source: Utf8PathBuf },
    /// The rule set ran. `report.status` says whether the target was written.
    Transformed(FileRun),
}

/// Read `source` once, apply `rule_set` in order and overwrite `target`.
///
/// Unless `opts.dry_run` is set or a required rule matched nothing, the
/// target is replaced in full.
pub fn run(
    source: &Utf8Path,
    target: &Utf8Path,
    rule_set: &RuleSet,
    opts: RunOptions,
    reader: &dyn SourcePort,
    writer: &dyn WritePort,
) -> Result<RunOutcome, ToolError> {
    let Some(before) = reader.read_source(source)? else {
        return Ok(RunOutcome::NotFound {
            source: source.to_path_buf(),
        });
    };

    let applied = apply_rule_set(&before, rule_set)
        .with_context(|| format!("apply rule set {} to {}", rule_set.name, source))?;
    let after = applied.text.as_str();

    let mut report = FileReport::absent(
        rule_set.name.as_str(),
        source.as_str(),
        target.as_str(),
        FileStatus::Written,
    );
    report.sha256_before = Some(sha256_hex(before.as_bytes()));
    report.sha256_after = Some(sha256_hex(after.as_bytes()));
    report.bytes_before = Some(before.len() as u64);
    report.bytes_after = Some(after.len() as u64);
    report.changed = before != after;
    report.rules = applied.outcomes.clone();

    match check_required(rule_set, &applied, opts.strict) {
        Ok(()) => {}
        Err(EditError::PolicyBlock(PolicyBlockError::Unmatched { rules, .. })) => {
            warn!(
                rule_set = rule_set.name.as_str(),
                target = target.as_str(),
                rules = rules.join(","),
                "required rules matched nothing; target not written"
            );
            report.status = FileStatus::Blocked;
            report.blocked_by = rules;
            return Ok(RunOutcome::Transformed(FileRun {
                report,
                patch: String::new(),
            }));
        }
        Err(err) => return Err(anyhow::Error::from(err).into()),
    }

    if opts.dry_run {
        debug!(target = target.as_str(), "dry run; target not written");
        report.status = FileStatus::Previewed;
        let patch = render_patch(target.as_str(), &before, after);
        return Ok(RunOutcome::Transformed(FileRun { report, patch }));
    }

    writer
        .write_file(target, after.as_bytes())
        .with_context(|| format!("write target {}", target))?;
    info!(
        source = source.as_str(),
        target = target.as_str(),
        changed = report.changed,
        "wrote target"
    );

    Ok(RunOutcome::Transformed(FileRun {
        report,
        patch: String::new(),
    }))
}
