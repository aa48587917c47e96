//! Pipelines against a real directory tree.

use camino::{Utf8Path, Utf8PathBuf};
use codestrip_core::adapters::{FsSourcePort, FsWritePort, RecordingProgress};
use codestrip_core::pipeline::{run_frontend, run_server, write_report};
use codestrip_core::ports::Ports;
use codestrip_core::settings::{FrontendSettings, RunOptions, ServerSettings};
use codestrip_core::ToolError;
use codestrip_types::progress::ProgressEvent;
use codestrip_types::report::{FileStatus, ToolInfo};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

const APP_JS: &str = "import { loadStripe } from '@stripe/stripe-js';\nlet isPremiumUser = false;\n\nfunction showUpgradeModal(feature) {\n  if (feature) {\n    open(feature);\n  }\n}\n\nrender();\n";

const SERVER_JS: &str = "const express = require('express');\nconst stripe = require('stripe')(process.env.KEY);\n\nconst app = express();\n\napp.post('/api/payment/checkout', async (req, res) => {\n  if (req.body) {\n    res.json({ ok: true });\n  }\n});\n\napp.listen(3000);\n";

fn tool() -> ToolInfo {
    ToolInfo {
        name: "codestrip".to_string(),
        version: None,
    }
}

fn root(tmp: &TempDir) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 temp dir")
}

fn put(root: &Utf8Path, rel: &str, text: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, text).expect("write");
}

fn ports<'a>(progress: &'a RecordingProgress) -> Ports<'a> {
    Ports {
        source: &FsSourcePort,
        writer: &FsWritePort,
        progress,
    }
}

#[test]
fn frontend_writes_script_and_skips_missing_markup() {
    let tmp = TempDir::new().expect("temp dir");
    let root = root(&tmp);
    put(&root, "original/public/app.js", APP_JS);
    put(&root, "public/app.js", "stale content that must be replaced\n");

    let settings = FrontendSettings {
        root: root.clone(),
        ..FrontendSettings::default()
    };
    let progress = RecordingProgress::default();
    let outcome = run_frontend(&settings, ports(&progress), tool()).expect("frontend");

    let written = fs::read_to_string(root.join("public/app.js")).expect("target");
    assert_eq!(
        written,
        "let isPremiumUser = true; // all features unlocked\n\nfunction showUpgradeModal(feature) {\n  return;\n}\n\nrender();\n"
    );
    assert!(!root.join("public/index.html").exists());

    let statuses: Vec<FileStatus> = outcome.report.files.iter().map(|f| f.status).collect();
    assert_eq!(statuses, vec![FileStatus::Written, FileStatus::Skipped]);
    assert!(!outcome.policy_block);
    assert_eq!(
        fs::read_to_string(root.join("original/public/app.js")).expect("source"),
        APP_JS
    );
}

#[test]
fn frontend_with_no_sources_touches_nothing() {
    let tmp = TempDir::new().expect("temp dir");
    let root = root(&tmp);
    put(&root, "public/app.js", "keep me\n");

    let settings = FrontendSettings {
        root: root.clone(),
        ..FrontendSettings::default()
    };
    let progress = RecordingProgress::default();
    let outcome = run_frontend(&settings, ports(&progress), tool()).expect("frontend");

    assert_eq!(outcome.report.summary.skipped, 2);
    assert_eq!(
        fs::read_to_string(root.join("public/app.js")).expect("target"),
        "keep me\n"
    );
    assert!(progress
        .events()
        .iter()
        .any(|e| matches!(e, ProgressEvent::Finished { targets, .. } if targets.is_empty())));
}

#[test]
fn server_rewrites_routes_with_nested_handlers() {
    let tmp = TempDir::new().expect("temp dir");
    let root = root(&tmp);
    put(&root, "original/server.js", SERVER_JS);

    let settings = ServerSettings {
        root: root.clone(),
        ..ServerSettings::default()
    };
    let progress = RecordingProgress::default();
    run_server(&settings, ports(&progress), tool()).expect("server");

    assert_eq!(
        fs::read_to_string(root.join("server.js")).expect("target"),
        "const express = require('express');\n\nconst app = express();\n\n\napp.listen(3000);\n"
    );
}

#[test]
fn server_missing_source_leaves_target_alone() {
    let tmp = TempDir::new().expect("temp dir");
    let root = root(&tmp);
    put(&root, "server.js", "existing\n");

    let settings = ServerSettings {
        root: root.clone(),
        ..ServerSettings::default()
    };
    let progress = RecordingProgress::default();
    let err = run_server(&settings, ports(&progress), tool()).expect_err("missing source");

    assert!(matches!(err, ToolError::MissingSource { .. }));
    assert_eq!(
        fs::read_to_string(root.join("server.js")).expect("target"),
        "existing\n"
    );
}

#[test]
fn dry_run_reports_patch_and_writes_nothing() {
    let tmp = TempDir::new().expect("temp dir");
    let root = root(&tmp);
    put(&root, "original/server.js", SERVER_JS);

    let settings = ServerSettings {
        root: root.clone(),
        options: RunOptions {
            dry_run: true,
            strict: false,
        },
        ..ServerSettings::default()
    };
    let progress = RecordingProgress::default();
    let outcome = run_server(&settings, ports(&progress), tool()).expect("server");

    assert!(!root.join("server.js").exists());
    assert_eq!(outcome.report.summary.previewed, 1);
    let patch = progress
        .events()
        .into_iter()
        .find_map(|e| match e {
            ProgressEvent::Patch { patch, .. } => Some(patch),
            _ => None,
        })
        .expect("patch event");
    assert!(patch.contains("-const stripe = require('stripe')(process.env.KEY);"));
}

#[test]
fn report_lands_on_disk() {
    let tmp = TempDir::new().expect("temp dir");
    let root = root(&tmp);
    put(&root, "original/server.js", SERVER_JS);

    let settings = ServerSettings {
        root: root.clone(),
        ..ServerSettings::default()
    };
    let progress = RecordingProgress::default();
    let outcome = run_server(&settings, ports(&progress), tool()).expect("server");

    let report_path = root.join("reports/run.json");
    write_report(&outcome.report, &report_path, &FsWritePort).expect("write report");

    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).expect("report")).expect("json");
    assert_eq!(json["schema"], "codestrip.report.v1");
    assert_eq!(json["files"][0]["status"], "written");
    assert!(root.join("reports/run.md").exists());
}
