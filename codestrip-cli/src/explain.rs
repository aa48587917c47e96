//! Rule lookup and formatting for `codestrip explain` and `codestrip list-rules`.

use codestrip_catalog::{builtin_rule_sets, find_rule};
use codestrip_types::rule::{RegionEnd, Rule, RuleKind, RuleSet};

/// A built-in rule together with where it sits in its set.
#[derive(Debug, Clone)]
pub struct RuleExplanation {
    pub set: RuleSet,
    pub rule: Rule,
    /// 1-based position in the set.
    pub position: usize,
}

pub fn lookup_rule(rule_id: &str) -> Option<RuleExplanation> {
    let (set, rule) = find_rule(rule_id)?;
    let position = set.rules.iter().position(|r| r.id == rule.id)? + 1;
    Some(RuleExplanation {
        set,
        rule,
        position,
    })
}

pub fn list_rule_ids() -> Vec<String> {
    builtin_rule_sets()
        .into_iter()
        .flat_map(|set| set.rules.into_iter().map(|r| r.id))
        .collect()
}

/// What the rule looks for and what it leaves behind.
pub fn describe_target(kind: &RuleKind) -> String {
    match kind {
        RuleKind::ReplaceLiteral { find, replace } => {
            format!("Literal:     {find}\nReplacement: {replace}")
        }
        RuleKind::DeleteRegion {
            start,
            end: RegionEnd::Block,
        } => format!("From `{start}` through the end of the block that follows it."),
        RuleKind::DeleteRegion {
            start,
            end: RegionEnd::Marker(marker),
        } => format!("From `{start}` through `{marker}`."),
        RuleKind::ReplaceFunctionBody { signature, body } => {
            let indented: Vec<String> = body.lines().map(|l| format!("    {l}")).collect();
            format!(
                "Function `{signature}`, body replaced with:\n\n{}",
                indented.join("\n")
            )
        }
        RuleKind::StripDeclaration { module } => {
            format!("Imports and requires of module `{module}`.")
        }
        RuleKind::StripRouteRegistration {
            receiver,
            path_prefix,
            methods,
        } => format!(
            "`{receiver}.<{}>('{path_prefix}...', ...)` registrations.",
            methods.join("|")
        ),
        RuleKind::StripConfigField { key } => format!("Config entries `{key}: ...`."),
        RuleKind::StripStatement { prefix } => format!("Statements starting with `{prefix}`."),
    }
}
