//! Shared DTOs (schemas-as-code) for the codestrip workspace.
//!
//! # Design constraints
//! - Rule sets are authored by hand in TOML/JSON, so every field that has a
//!   sensible default is optional in serialized form.
//! - Reports are written to disk; prefer adding optional fields over
//!   changing semantics.

pub mod progress;
pub mod report;
pub mod rule;

/// Schema identifiers.
pub mod schema {
    pub const CODESTRIP_RULESET_V1: &str = "codestrip.ruleset.v1";
    pub const CODESTRIP_REPORT_V1: &str = "codestrip.report.v1";
}
