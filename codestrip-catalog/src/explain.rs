//! Matching-policy descriptions for `codestrip explain`.

use codestrip_types::rule::{MatchScope, RegionEnd, RuleKind};

pub fn scope_label(scope: MatchScope) -> &'static str {
    match scope {
        MatchScope::First => "first match",
        MatchScope::All => "all matches",
    }
}

/// How a rule of this kind finds and rewrites its target.
pub fn kind_meaning(kind: &RuleKind) -> &'static str {
    match kind {
        RuleKind::ReplaceLiteral { .. } => {
            r#"Replaces an exact literal. Occurrences inside strings and comments are
ignored. The replacement may not contain the literal, nor rebuild it
together with a piece of the literal on either side, so a second run finds
nothing to change."#
        }
        RuleKind::DeleteRegion {
            end: RegionEnd::Block,
            ..
        } => {
            r#"Deletes from the start pattern through the end of the block opened by the
first `{` after it. Nesting depth is tracked across all bracket kinds and
braces inside strings, templates, regex literals and comments are not
counted, so inner conditionals never end the region early. A following
`else` / `else if` chain is deleted with the block. Lines left empty are
removed entirely."#
        }
        RuleKind::DeleteRegion { .. } => {
            r#"Deletes from the start pattern through the next end marker, both inclusive.
Markers match in code or at the start of a comment, so `// START` style
markers work in scripts. An occurrence without an end marker after it is
left alone rather than deleting to the end of the file. Lines left empty
are removed entirely."#
        }
        RuleKind::ReplaceFunctionBody { .. } => {
            r#"Finds the signature at identifier boundaries, skips the parameter list by
paren depth and replaces the body block (through its matching `}`) with a
fixed stand-in. The signature text itself is kept verbatim. Plain
functions, arrow functions assigned to a name and methods are supported."#
        }
        RuleKind::StripDeclaration { .. } => {
            r#"Removes `import ... from 'module'`, `import 'module'`, `export ... from
'module'` and `const|let|var x = require('module')` statements, including
multi-line import lists. The module string must match exactly."#
        }
        RuleKind::StripRouteRegistration { .. } => {
            r#"Removes `receiver.method('path', ...)` statements whose path literal starts
with the prefix. The whole statement goes, handler functions included,
using bracket depth and statement boundaries rather than the nearest `}`.
A registration that does not start a statement (the body of an `if`, `else`
or loop without braces, or part of a larger expression) is left alone."#
        }
        RuleKind::StripConfigField { .. } => {
            r#"Removes `key: value,` entries (bare or quoted key) that start a line. Values
spanning several lines are consumed by bracket depth up to the entry's
comma, or up to the end of the enclosing object."#
        }
        RuleKind::StripStatement { .. } => {
            r#"Removes statements that begin with the prefix, optionally after `await`.
Call chains continued on following lines and callback blocks are part of
the statement. A match that continues an expression from the previous line
or is the unbraced body of an `if`, `else` or loop is left alone."#
        }
    }
}
