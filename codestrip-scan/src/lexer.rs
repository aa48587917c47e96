//! Span classification for JavaScript-like source text.

use crate::scan::is_ident_byte;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpanKind {
    Code,
    Str,
    Template,
    Regex,
    LineComment,
    BlockComment,
}

impl SpanKind {
    pub fn is_comment(self) -> bool {
        matches!(self, SpanKind::LineComment | SpanKind::BlockComment)
    }

    /// Strings, templates and regex literals: opaque values in code position.
    pub fn is_literal(self) -> bool {
        matches!(self, SpanKind::Str | SpanKind::Template | SpanKind::Regex)
    }
}

/// Half-open byte range `[start, end)` of one kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.end
    }
}

/// Keywords after which a `/` starts a regex literal rather than a division.
const REGEX_KEYWORDS: &[&str] = &[
    "return",
    "typeof",
    "instanceof",
    "case",
    "do",
    "else",
    "in",
    "of",
    "new",
    "delete",
    "void",
    "throw",
    "yield",
    "await",
];

/// Split `text` into contiguous spans covering every byte.
///
/// Adjacent code bytes are merged into one span. A line comment ends before
/// its newline, so the newline itself stays code.
pub fn lex(text: &str) -> Vec<Span> {
    let b = text.as_bytes();
    let n = b.len();
    let mut spans = Vec::new();
    let mut code_start = 0;
    let mut i = 0;
    // Last significant code byte, or `b'a'` after an identifier/number.
    let mut last_sig: Option<u8> = None;
    let mut last_word: &str = "";

    while i < n {
        let c = b[i];
        let next = b.get(i + 1).copied();
        let literal = match c {
            b'/' if next == Some(b'/') => {
                let end = find_byte(b, i + 2, b'\n').unwrap_or(n);
                Some((SpanKind::LineComment, end))
            }
            b'/' if next == Some(b'*') => {
                let end = find_seq(b, i + 2, b"*/").map_or(n, |p| p + 2);
                Some((SpanKind::BlockComment, end))
            }
            b'/' if regex_allowed(last_sig, last_word) => {
                skip_regex(b, i).map(|end| (SpanKind::Regex, end))
            }
            b'\'' | b'"' => Some((SpanKind::Str, skip_string(b, i))),
            b'`' => Some((SpanKind::Template, skip_template(b, i))),
            _ => None,
        };

        if let Some((kind, end)) = literal {
            push_after_code(&mut spans, code_start, Span { kind, start: i, end });
            if kind.is_literal() {
                last_sig = Some(b'a');
                last_word = "";
            }
            i = end;
            code_start = end;
            continue;
        }

        if is_ident_byte(c) {
            let start = i;
            while i < n && is_ident_byte(b[i]) {
                i += 1;
            }
            last_word = &text[start..i];
            last_sig = Some(b'a');
            continue;
        }

        if !c.is_ascii_whitespace() {
            last_sig = Some(c);
            last_word = "";
        }
        i += 1;
    }

    if code_start < n {
        spans.push(Span {
            kind: SpanKind::Code,
            start: code_start,
            end: n,
        });
    }
    spans
}

fn push_after_code(spans: &mut Vec<Span>, code_start: usize, span: Span) {
    if code_start < span.start {
        spans.push(Span {
            kind: SpanKind::Code,
            start: code_start,
            end: span.start,
        });
    }
    spans.push(span);
}

fn regex_allowed(last_sig: Option<u8>, last_word: &str) -> bool {
    match last_sig {
        None => true,
        Some(b'a') => REGEX_KEYWORDS.contains(&last_word),
        Some(b')') | Some(b']') => false,
        Some(_) => true,
    }
}

fn find_byte(b: &[u8], from: usize, needle: u8) -> Option<usize> {
    b.get(from..)?
        .iter()
        .position(|&c| c == needle)
        .map(|p| p + from)
}

fn find_seq(b: &[u8], from: usize, needle: &[u8]) -> Option<usize> {
    b.get(from..)?
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

/// `i` is at the opening quote. Unterminated strings stop before the newline.
pub(crate) fn skip_string(b: &[u8], i: usize) -> usize {
    let quote = b[i];
    let n = b.len();
    let mut j = i + 1;
    while j < n {
        match b[j] {
            b'\\' => j += 2,
            b'\n' => return j,
            c if c == quote => return j + 1,
            _ => j += 1,
        }
    }
    n
}

/// `i` is at the opening backtick.
pub(crate) fn skip_template(b: &[u8], i: usize) -> usize {
    let n = b.len();
    let mut j = i + 1;
    while j < n {
        match b[j] {
            b'\\' => j += 2,
            b'`' => return j + 1,
            b'$' if b.get(j + 1) == Some(&b'{') => j = skip_template_expr(b, j + 2),
            _ => j += 1,
        }
    }
    n
}

/// `i` is just past `${`; returns the index after the closing `}`.
fn skip_template_expr(b: &[u8], i: usize) -> usize {
    let n = b.len();
    let mut depth = 1usize;
    let mut j = i;
    while j < n {
        match b[j] {
            b'\'' | b'"' => j = skip_string(b, j),
            b'`' => j = skip_template(b, j),
            b'/' if b.get(j + 1) == Some(&b'/') => j = find_byte(b, j, b'\n').unwrap_or(n),
            b'/' if b.get(j + 1) == Some(&b'*') => {
                j = find_seq(b, j + 2, b"*/").map_or(n, |p| p + 2)
            }
            b'{' => {
                depth += 1;
                j += 1;
            }
            b'}' => {
                depth -= 1;
                j += 1;
                if depth == 0 {
                    return j;
                }
            }
            _ => j += 1,
        }
    }
    n
}

/// `i` is at a `/` in regex position. Returns `None` when no closing `/`
/// appears on the same line, in which case the slash is treated as code.
fn skip_regex(b: &[u8], i: usize) -> Option<usize> {
    let n = b.len();
    let mut j = i + 1;
    let mut in_class = false;
    while j < n {
        match b[j] {
            b'\\' => j += 2,
            b'\n' => return None,
            b'[' => {
                in_class = true;
                j += 1;
            }
            b']' => {
                in_class = false;
                j += 1;
            }
            b'/' if !in_class => {
                j += 1;
                while j < n && b[j].is_ascii_alphabetic() {
                    j += 1;
                }
                return Some(j);
            }
            _ => j += 1,
        }
    }
    None
}
