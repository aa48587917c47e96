//! Lexical scanning for codestrip rules.
//!
//! Rules never match against raw characters. Script text is first split into
//! spans of code, string literals, template literals, regex literals and
//! comments; every delimiter-sensitive query (matching brace, statement end,
//! token search) only looks at code spans. Markup is treated as a single code
//! span.
//!
//! Scanning is total: malformed input (unterminated strings, unbalanced
//! braces) yields best-effort spans and `None` from region queries, never a
//! panic or an error.

pub mod lexer;
pub mod lines;
mod scan;

pub use lexer::{Span, SpanKind};
pub use lines::{expand_to_lines, line_end, line_start, next_line_start};
pub use scan::{ExprEnd, Scan, is_ident_byte};
