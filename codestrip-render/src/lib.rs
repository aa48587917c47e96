//! Rendering helpers for human-readable output.
//!
//! Console lines are for operators watching a run; the markdown summary is
//! written next to the JSON report when requested.

use codestrip_types::progress::ProgressEvent;
use codestrip_types::report::{FileReport, FileStatus, RunReport};

pub const MANUAL_REVIEW_NOTICE: &str = "Manual review recommended: pattern-based rewrites can miss code that does not match the expected layout.";

/// One progress event as console text (no trailing newline).
pub fn render_progress(event: &ProgressEvent) -> String {
    match event {
        ProgressEvent::Started {
            pipeline,
            root,
            dry_run,
        } => {
            let mode = if *dry_run { " [dry run]" } else { "" };
            format!("🧹 Stripping payment code: {pipeline} (root {root}){mode}")
        }
        ProgressEvent::File { file } => render_file_line(file),
        ProgressEvent::Patch { patch, .. } => patch.trim_end().to_string(),
        ProgressEvent::Finished { targets, .. } => {
            let mut out = format!("⚠️  {MANUAL_REVIEW_NOTICE}");
            if !targets.is_empty() {
                out.push_str(&format!("\n   Review: {}", targets.join(", ")));
            }
            out
        }
    }
}

fn render_file_line(file: &FileReport) -> String {
    match file.status {
        FileStatus::Written => format!(
            "✅ {} -> {} ({})",
            file.source,
            file.target,
            rule_tally(file)
        ),
        FileStatus::Previewed => format!(
            "🔍 {} -> {} would be written ({})",
            file.source,
            file.target,
            rule_tally(file)
        ),
        FileStatus::Skipped => format!("⚠️  {} not found, skipping", file.source),
        FileStatus::Missing => format!("❌ {} not found", file.source),
        FileStatus::Blocked => format!(
            "⛔ {} not written: no match for {}",
            file.target,
            file.blocked_by.join(", ")
        ),
    }
}

fn rule_tally(file: &FileReport) -> String {
    let total = file.rules.len();
    let matched = total - file.unmatched_rules().count();
    if file.changed {
        format!("{matched}/{total} rules matched")
    } else {
        format!("unchanged, {matched}/{total} rules matched")
    }
}

fn status_label(status: FileStatus) -> &'static str {
    match status {
        FileStatus::Written => "written",
        FileStatus::Previewed => "previewed",
        FileStatus::Skipped => "skipped",
        FileStatus::Blocked => "blocked",
        FileStatus::Missing => "missing",
    }
}

pub fn render_run_md(report: &RunReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("# codestrip {}\n\n", report.pipeline));
    if report.dry_run {
        out.push_str("_Dry run: no files were written._\n\n");
    }
    let s = &report.summary;
    out.push_str(&format!("- Files: {}\n", s.files_total));
    out.push_str(&format!(
        "- Written: {} / previewed {} / skipped {} / blocked {} / missing {}\n",
        s.written, s.previewed, s.skipped, s.blocked, s.missing
    ));
    out.push_str(&format!("- Unmatched rules: {}\n\n", s.rules_unmatched));

    out.push_str("## Files\n\n");
    if report.files.is_empty() {
        out.push_str("_No files processed._\n");
        return out;
    }

    for file in &report.files {
        out.push_str(&format!("### {}\n\n", file.target));
        out.push_str(&format!("- Source: `{}`\n", file.source));
        out.push_str(&format!("- Rule set: `{}`\n", file.rule_set));
        out.push_str(&format!("- Status: `{}`\n", status_label(file.status)));
        if let (Some(before), Some(after)) = (file.bytes_before, file.bytes_after) {
            out.push_str(&format!("- Bytes: {} -> {}\n", before, after));
        }
        if !file.blocked_by.is_empty() {
            out.push_str(&format!("- Blocked by: {}\n", file.blocked_by.join(", ")));
        }

        if !file.rules.is_empty() {
            out.push_str("\n| rule | matches |\n|---|---|\n");
            for rule in &file.rules {
                out.push_str(&format!("| `{}` | {} |\n", rule.rule_id, rule.matches));
            }
        }
        out.push('\n');
    }

    out.push_str(&format!("> {MANUAL_REVIEW_NOTICE}\n"));
    out
}
