//! Built-in rule sets.
//!
//! Each set is an ordered list; a rule may rely on earlier rules having
//! already removed the text around it. Ids are unique across the catalog so
//! `codestrip explain <rule-id>` can resolve them without a set name.

mod explain;
mod frontend;
mod server;

pub use explain::{kind_meaning, scope_label};
pub use frontend::{frontend_markup, frontend_script};
pub use server::server_script;

use codestrip_types::rule::{Rule, RuleSet};

pub const FRONTEND_SCRIPT: &str = "frontend-script";
pub const FRONTEND_MARKUP: &str = "frontend-markup";
pub const SERVER_SCRIPT: &str = "server-script";

/// All built-in rule sets, in a stable order.
pub fn builtin_rule_sets() -> Vec<RuleSet> {
    vec![frontend_script(), frontend_markup(), server_script()]
}

pub fn rule_set(name: &str) -> Option<RuleSet> {
    builtin_rule_sets().into_iter().find(|s| s.name == name)
}

/// Resolve a rule id to its owning set and the rule itself.
pub fn find_rule(rule_id: &str) -> Option<(RuleSet, Rule)> {
    builtin_rule_sets().into_iter().find_map(|set| {
        let rule = set.rule(rule_id)?.clone();
        Some((set, rule))
    })
}

pub fn rule_set_names() -> Vec<&'static str> {
    vec![FRONTEND_SCRIPT, FRONTEND_MARKUP, SERVER_SCRIPT]
}
