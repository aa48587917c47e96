//! Rule interpreter for codestrip.
//!
//! Responsibilities:
//! - Validate rules and rule sets before they touch any text.
//! - Apply a single rule, or a whole rule set in declaration order, as a pure
//!   text-to-text function that reports how often each rule matched.
//! - Enforce required-match policy (strict mode).
//! - Generate a unified diff preview.

pub mod error;
mod matchers;

pub use error::{EditError, EditResult, InvalidRuleError, PolicyBlockError};

use codestrip_scan::{Scan, is_ident_byte};
use codestrip_types::report::RuleOutcome;
use codestrip_types::rule::{ArtifactKind, MatchScope, RegionEnd, Rule, RuleKind, RuleSet};
use diffy::PatchFormatter;
use matchers::{Edit, next_edit};
use std::collections::BTreeSet;
use tracing::debug;

/// Result of applying one rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleApplication {
    pub text: String,
    pub matches: u64,
}

/// Result of applying a rule set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleSetApplication {
    pub text: String,
    pub outcomes: Vec<RuleOutcome>,
}

impl RuleSetApplication {
    pub fn unmatched(&self) -> impl Iterator<Item = &str> {
        self.outcomes
            .iter()
            .filter(|o| o.matches == 0)
            .map(|o| o.rule_id.as_str())
    }
}

/// Apply one rule to `text`. Total: a rule that finds nothing returns the
/// input unchanged with `matches == 0`.
pub fn apply_rule(text: &str, rule: &Rule, kind: ArtifactKind) -> RuleApplication {
    let edits = {
        let scan = Scan::new(text, kind);
        collect_edits(&scan, &rule.kind, rule.effective_scope())
    };
    let matches = edits.len() as u64;
    let mut out = text.to_string();
    for edit in edits.iter().rev() {
        out.replace_range(edit.start..edit.end, &edit.replacement);
    }
    RuleApplication { text: out, matches }
}

/// Non-overlapping edits in ascending order, found on a single scan.
fn collect_edits(scan: &Scan<'_>, kind: &RuleKind, scope: MatchScope) -> Vec<Edit> {
    let mut edits: Vec<Edit> = Vec::new();
    let mut cursor = 0;
    while let Some(edit) = next_edit(scan, kind, cursor) {
        cursor = edit.end.max(edit.anchor + 1);
        if edits.last().is_some_and(|prev| edit.start < prev.end) {
            continue;
        }
        edits.push(edit);
        if scope == MatchScope::First {
            break;
        }
    }
    edits
}

/// Apply every rule of `set` in declaration order, each one seeing the
/// previous rule's output.
pub fn apply_rule_set(text: &str, set: &RuleSet) -> EditResult<RuleSetApplication> {
    validate_rule_set(set)?;

    let mut current = text.to_string();
    let mut outcomes = Vec::with_capacity(set.rules.len());
    for rule in &set.rules {
        let applied = apply_rule(&current, rule, set.kind);
        debug!(
            rule_set = set.name.as_str(),
            rule = rule.id.as_str(),
            kind = rule.kind.label(),
            matches = applied.matches,
            "applied rule"
        );
        current = applied.text;
        outcomes.push(RuleOutcome {
            rule_id: rule.id.clone(),
            matches: applied.matches,
        });
    }

    Ok(RuleSetApplication {
        text: current,
        outcomes,
    })
}

/// Fail with a policy block when rules that must match did not.
///
/// Rules flagged `required` always count; with `strict` every rule does.
pub fn check_required(
    set: &RuleSet,
    application: &RuleSetApplication,
    strict: bool,
) -> EditResult<()> {
    let rules: Vec<String> = application
        .unmatched()
        .filter(|id| strict || set.rule(id).is_some_and(|r| r.required))
        .map(str::to_string)
        .collect();
    if rules.is_empty() {
        return Ok(());
    }
    Err(PolicyBlockError::Unmatched {
        rule_set: set.name.clone(),
        rules,
    }
    .into())
}

/// Check ids and per-kind invariants of every rule in `set`.
pub fn validate_rule_set(set: &RuleSet) -> Result<(), InvalidRuleError> {
    let mut seen = BTreeSet::new();
    for rule in &set.rules {
        validate_rule(rule)?;
        if !seen.insert(rule.id.as_str()) {
            return Err(InvalidRuleError::DuplicateId {
                rule_id: rule.id.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_rule(rule: &Rule) -> Result<(), InvalidRuleError> {
    if rule.id.trim().is_empty() {
        return Err(InvalidRuleError::EmptyId);
    }
    let rule_id = || rule.id.clone();
    let non_empty = |value: &str, field: &'static str| {
        if value.is_empty() {
            Err(InvalidRuleError::EmptyField {
                rule_id: rule_id(),
                field,
            })
        } else {
            Ok(())
        }
    };

    match &rule.kind {
        RuleKind::ReplaceLiteral { find, replace } => {
            non_empty(find.as_str(), "find")?;
            if recreates_literal(find, replace) {
                return Err(InvalidRuleError::NotIdempotent { rule_id: rule_id() });
            }
        }
        RuleKind::DeleteRegion { start, end } => {
            non_empty(start.as_str(), "start")?;
            if let RegionEnd::Marker(marker) = end {
                non_empty(marker.as_str(), "end")?;
            }
        }
        RuleKind::ReplaceFunctionBody { signature, body } => {
            non_empty(signature.as_str(), "signature")?;
            if !is_single_block(body) {
                return Err(InvalidRuleError::BodyNotBlock { rule_id: rule_id() });
            }
        }
        RuleKind::StripDeclaration { module } => non_empty(module.as_str(), "module")?,
        RuleKind::StripRouteRegistration {
            receiver,
            path_prefix,
            methods,
        } => {
            if receiver.is_empty() || !receiver.bytes().all(is_ident_byte) {
                return Err(InvalidRuleError::BadReceiver {
                    rule_id: rule_id(),
                    receiver: receiver.clone(),
                });
            }
            non_empty(path_prefix.as_str(), "path_prefix")?;
            if methods.is_empty() {
                return Err(InvalidRuleError::EmptyField {
                    rule_id: rule_id(),
                    field: "methods",
                });
            }
        }
        RuleKind::StripConfigField { key } => non_empty(key.as_str(), "key")?,
        RuleKind::StripStatement { prefix } => non_empty(prefix.as_str(), "prefix")?,
    }
    Ok(())
}

/// Whether swapping `find` for `replace` can leave a fresh `find` behind,
/// either inside the replacement or across its edges with neighbouring text
/// that is itself a piece of `find`. Empty replacements are only checked for
/// the trivial case: deleting a literal can always join arbitrary neighbours.
fn recreates_literal(find: &str, replace: &str) -> bool {
    if replace.contains(find) {
        return true;
    }
    if replace.is_empty() {
        return false;
    }
    let pieces = literal_pieces(find);
    pieces.iter().any(|before| {
        pieces
            .iter()
            .any(|after| format!("{before}{replace}{after}").contains(find))
    })
}

/// The empty string plus every proper prefix and suffix of `find`.
fn literal_pieces(find: &str) -> Vec<&str> {
    let mut pieces = vec![""];
    for (i, _) in find.char_indices().skip(1) {
        pieces.push(&find[..i]);
        pieces.push(&find[i..]);
    }
    pieces
}

fn is_single_block(body: &str) -> bool {
    let trimmed = body.trim();
    if !trimmed.starts_with('{') {
        return false;
    }
    Scan::script(trimmed).matching_close(0) == Some(trimmed.len() - 1)
}

/// Unified diff of one file, with git-style headers. Empty when unchanged.
pub fn render_patch(path: &str, before: &str, after: &str) -> String {
    if before == after {
        return String::new();
    }
    let mut out = String::new();
    let formatter = PatchFormatter::new();

    out.push_str(&format!("diff --git a/{0} b/{0}\n", path));
    out.push_str(&format!("--- a/{0}\n+++ b/{0}\n", path));

    let patch = diffy::create_patch(before, after);
    let rendered = formatter.fmt_patch(&patch).to_string();
    // diffy repeats its own ---/+++ header; keep only the hunks.
    let hunks = rendered
        .find("@@")
        .map_or(rendered.as_str(), |i| &rendered[i..]);
    out.push_str(hunks);
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}
