//! Serialization tests for rule sets and run reports.

use camino::Utf8PathBuf;
use codestrip_types::progress::ProgressEvent;
use codestrip_types::report::{FileReport, FileStatus, RuleOutcome, RunReport, ToolInfo};
use codestrip_types::rule::{ArtifactKind, MatchScope, RegionEnd, Rule, RuleKind, RuleSet};
use codestrip_types::schema;
use pretty_assertions::assert_eq;

const RULESET_TOML: &str = r#"
name = "demo"
kind = "script"

[[rules]]
id = "flag"
intent = "always loaded"
type = "replace_literal"
find = "let loaded = false;"
replace = "let loaded = true;"

[[rules]]
id = "gate"
type = "delete_region"
start = "if (!paid)"
end = "block"

[[rules]]
id = "banner"
type = "delete_region"
start = "<!-- BEGIN -->"
end = { marker = "<!-- END -->" }
scope = "first"

[[rules]]
id = "routes"
type = "strip_route_registration"
receiver = "app"
path_prefix = "/api/pay"
required = true
"#;

#[test]
fn ruleset_parses_from_toml_with_defaults() {
    let set: RuleSet = toml::from_str(RULESET_TOML).expect("parse ruleset");

    assert_eq!(set.schema, schema::CODESTRIP_RULESET_V1);
    assert_eq!(set.kind, ArtifactKind::Script);
    assert_eq!(set.rules.len(), 4);

    let flag = set.rule("flag").expect("flag rule");
    assert_eq!(flag.effective_scope(), MatchScope::First);
    assert!(!flag.required);

    let gate = set.rule("gate").expect("gate rule");
    assert!(matches!(
        &gate.kind,
        RuleKind::DeleteRegion { end: RegionEnd::Block, .. }
    ));
    assert_eq!(gate.effective_scope(), MatchScope::All);
    assert!(gate.intent.is_empty());

    let banner = set.rule("banner").expect("banner rule");
    assert_eq!(
        banner.kind,
        RuleKind::DeleteRegion {
            start: "<!-- BEGIN -->".to_string(),
            end: RegionEnd::Marker("<!-- END -->".to_string()),
        }
    );
    assert_eq!(banner.effective_scope(), MatchScope::First);

    let routes = set.rule("routes").expect("routes rule");
    assert!(routes.required);
    match &routes.kind {
        RuleKind::StripRouteRegistration { methods, .. } => {
            assert!(methods.iter().any(|m| m == "post"));
            assert!(methods.iter().any(|m| m == "use"));
        }
        other => panic!("unexpected kind {other:?}"),
    }
}

#[test]
fn ruleset_json_roundtrip_preserves_rules() {
    let set = RuleSet::new(
        "server",
        ArtifactKind::Script,
        vec![
            Rule::new(
                "stripe-import",
                "drop the payment SDK",
                RuleKind::StripDeclaration {
                    module: "stripe".to_string(),
                },
            )
            .required(),
            Rule::new(
                "webhook",
                "",
                RuleKind::StripStatement {
                    prefix: "billing.".to_string(),
                },
            )
            .with_scope(MatchScope::First),
        ],
    );

    let json = serde_json::to_string(&set).expect("serialize");
    assert!(json.contains(r#""type":"strip_declaration""#));
    assert!(!json.contains("intent\":\"\""));

    let back: RuleSet = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, set);
}

#[test]
fn report_summary_counts_statuses_and_unmatched_rules() {
    let tool = ToolInfo {
        name: "codestrip".to_string(),
        version: Some("0.0.0".to_string()),
    };
    let mut report = RunReport::new(tool, "frontend", false, false);

    let mut written = FileReport::absent("frontend-script", "a.js", "b.js", FileStatus::Written);
    written.rules = vec![
        RuleOutcome {
            rule_id: "one".to_string(),
            matches: 2,
        },
        RuleOutcome {
            rule_id: "two".to_string(),
            matches: 0,
        },
    ];
    report.push(written);
    report.push(FileReport::absent(
        "frontend-markup",
        "a.html",
        "b.html",
        FileStatus::Skipped,
    ));

    assert_eq!(report.schema, schema::CODESTRIP_REPORT_V1);
    assert_eq!(report.summary.files_total, 2);
    assert_eq!(report.summary.written, 1);
    assert_eq!(report.summary.skipped, 1);
    assert_eq!(report.summary.rules_unmatched, 1);

    let value = serde_json::to_value(&report).expect("serialize report");
    assert_eq!(value["files"][1]["status"], "skipped");
    assert!(value["files"][1].get("sha256_before").is_none());
}

#[test]
fn progress_events_are_tagged() {
    let event = ProgressEvent::Started {
        pipeline: "server".to_string(),
        root: Utf8PathBuf::from("."),
        dry_run: true,
    };
    let value = serde_json::to_value(&event).expect("serialize event");
    assert_eq!(value["event"], "started");
    assert_eq!(value["dry_run"], true);

    let file = ProgressEvent::File {
        file: Box::new(FileReport::absent(
            "server-script",
            "original/server.js",
            "server.js",
            FileStatus::Missing,
        )),
    };
    let back: ProgressEvent =
        serde_json::from_value(serde_json::to_value(&file).expect("serialize")).expect("parse");
    assert_eq!(back, file);
}
