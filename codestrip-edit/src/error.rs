//! Error types for codestrip-edit.
//!
//! This module defines error types that distinguish between:
//! - Policy blocks (exit code 2): required rules that matched nothing
//! - Invalid rules (exit code 1): malformed or non-idempotent rule definitions

use thiserror::Error;

/// The top-level error type for codestrip-edit operations.
#[derive(Debug, Error)]
pub enum EditError {
    /// A policy block occurred (exit code 2).
    #[error("policy block: {0}")]
    PolicyBlock(#[from] PolicyBlockError),

    /// A rule definition is unusable (exit code 1).
    #[error("invalid rule: {0}")]
    InvalidRule(#[from] InvalidRuleError),
}

/// Policy block errors that should result in exit code 2.
#[derive(Debug, Error)]
pub enum PolicyBlockError {
    /// Rules that were required to match left the text unchanged.
    #[error("unmatched rules in {rule_set}: {}", rules.join(", "))]
    Unmatched {
        /// Name of the rule set being applied.
        rule_set: String,
        /// Ids of the rules that found nothing.
        rules: Vec<String>,
    },
}

/// Rule validation failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidRuleError {
    #[error("rule has an empty id")]
    EmptyId,

    #[error("duplicate rule id `{rule_id}`")]
    DuplicateId { rule_id: String },

    #[error("rule `{rule_id}`: `{field}` must not be empty")]
    EmptyField {
        rule_id: String,
        field: &'static str,
    },

    /// The replacement re-creates the pattern, so a second pass would rewrite again.
    #[error("rule `{rule_id}`: replacement contains the pattern it replaces")]
    NotIdempotent { rule_id: String },

    #[error("rule `{rule_id}`: body must be a single balanced `{{ ... }}` block")]
    BodyNotBlock { rule_id: String },

    #[error("rule `{rule_id}`: receiver `{receiver}` is not an identifier")]
    BadReceiver { rule_id: String, receiver: String },
}

impl EditError {
    /// Returns true if this is a policy block error (exit code 2).
    pub fn is_policy_block(&self) -> bool {
        matches!(self, EditError::PolicyBlock(_))
    }

    /// Returns the recommended exit code for this error.
    pub fn exit_code(&self) -> u8 {
        match self {
            EditError::PolicyBlock(_) => 2,
            EditError::InvalidRule(_) => 1,
        }
    }
}

/// Result type alias using EditError.
pub type EditResult<T> = Result<T, EditError>;
