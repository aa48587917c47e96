use crate::lexer::{Span, SpanKind, lex};
use codestrip_types::rule::ArtifactKind;

/// Identifier byte (ASCII word characters, `$`, and any non-ASCII byte).
pub fn is_ident_byte(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_' || c == b'$' || c >= 0x80
}

/// Bytes that leave an expression open when they end a line.
const CONTINUES_AFTER: &[u8] = b",=([{+-*/%&|^!?:<>.~";

/// Bytes that continue the previous line's expression when they start a line.
const CONTINUES_BEFORE: &[u8] = b".?&|+,=:*";

/// Where an expression scan stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExprEnd {
    /// Exclusive end of the expression, including its terminator if any.
    pub end: usize,
    /// The terminator byte consumed (`;` or `,`), if the scan ended on one.
    pub terminator: Option<u8>,
}

/// A lexed view of one text buffer.
#[derive(Debug, Clone)]
pub struct Scan<'a> {
    text: &'a str,
    spans: Vec<Span>,
}

impl<'a> Scan<'a> {
    pub fn new(text: &'a str, kind: ArtifactKind) -> Self {
        match kind {
            ArtifactKind::Script => Self::script(text),
            ArtifactKind::Markup => Self::plain(text),
        }
    }

    /// Lex `text` as JavaScript-like source.
    pub fn script(text: &'a str) -> Self {
        Self {
            text,
            spans: lex(text),
        }
    }

    /// Treat all of `text` as matchable code.
    pub fn plain(text: &'a str) -> Self {
        let spans = if text.is_empty() {
            vec![]
        } else {
            vec![Span {
                kind: SpanKind::Code,
                start: 0,
                end: text.len(),
            }]
        };
        Self { text, spans }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    fn span_index(&self, pos: usize) -> usize {
        self.spans.partition_point(|s| s.end <= pos)
    }

    pub fn span_at(&self, pos: usize) -> Option<&Span> {
        self.spans.get(self.span_index(pos)).filter(|s| s.contains(pos))
    }

    pub fn is_code(&self, pos: usize) -> bool {
        self.span_at(pos).is_some_and(|s| s.kind == SpanKind::Code)
    }

    /// If a string literal starts at `pos`, its raw contents without quotes.
    pub fn string_at(&self, pos: usize) -> Option<&'a str> {
        let span = self.span_at(pos)?;
        if span.kind != SpanKind::Str || span.start != pos {
            return None;
        }
        let raw = &self.text[span.start..span.end];
        let quote = &raw[..1];
        let inner = &raw[1..];
        Some(inner.strip_suffix(quote).unwrap_or(inner))
    }

    /// String literal spans, in order.
    pub fn strings(&self) -> impl Iterator<Item = (&Span, &'a str)> + '_ {
        self.spans
            .iter()
            .filter(|s| s.kind == SpanKind::Str)
            .filter_map(|s| self.string_at(s.start).map(|v| (s, v)))
    }

    /// Code bytes at or after `from`, skipping literals and comments.
    pub fn code_bytes(&self, from: usize) -> impl Iterator<Item = (usize, u8)> + '_ {
        let bytes = self.text.as_bytes();
        let first = self.span_index(from);
        self.spans[first..]
            .iter()
            .filter(|s| s.kind == SpanKind::Code)
            .flat_map(move |s| (s.start.max(from)..s.end).map(move |i| (i, bytes[i])))
    }

    /// First occurrence of `needle` at or after `from` that starts in code.
    pub fn find_code(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let mut cursor = from;
        while cursor <= self.text.len() {
            let rel = self.text.get(cursor..)?.find(needle)?;
            let pos = cursor + rel;
            if self.is_code(pos) {
                return Some(pos);
            }
            cursor = pos + next_char_len(self.text, pos);
        }
        None
    }

    /// Like [`Scan::find_code`], but the match must not be glued to adjacent
    /// identifier characters (or a preceding `.` when the needle starts with
    /// an identifier).
    pub fn find_token(&self, needle: &str, from: usize) -> Option<usize> {
        let nb = needle.as_bytes();
        let (first, last) = (*nb.first()?, *nb.last()?);
        let bytes = self.text.as_bytes();
        let mut cursor = from;
        loop {
            let pos = self.find_code(needle, cursor)?;
            let end = pos + nb.len();
            let left_ok = !is_ident_byte(first)
                || pos == 0
                || !(is_ident_byte(bytes[pos - 1]) || bytes[pos - 1] == b'.');
            let right_ok = !is_ident_byte(last) || end >= bytes.len() || !is_ident_byte(bytes[end]);
            if left_ok && right_ok {
                return Some(pos);
            }
            cursor = pos + next_char_len(self.text, pos);
        }
    }

    /// Next significant position at or after `from`, skipping whitespace and
    /// comments. Literal spans are reported by their first byte.
    pub fn next_token(&self, from: usize) -> Option<(usize, u8)> {
        let bytes = self.text.as_bytes();
        let first = self.span_index(from);
        for span in &self.spans[first..] {
            match span.kind {
                SpanKind::Code => {
                    let start = span.start.max(from);
                    if let Some(i) = (start..span.end).find(|&i| !bytes[i].is_ascii_whitespace()) {
                        return Some((i, bytes[i]));
                    }
                }
                k if k.is_comment() => {}
                _ => return Some((span.start.max(from), bytes[span.start.max(from)])),
            }
        }
        None
    }

    /// Last significant position before `before`, skipping whitespace and
    /// comments. Literal spans are reported by their last byte.
    pub fn prev_token(&self, before: usize) -> Option<(usize, u8)> {
        let bytes = self.text.as_bytes();
        let last = self.span_index(before).min(self.spans.len().checked_sub(1)?);
        for span in self.spans[..=last].iter().rev() {
            if span.start >= before {
                continue;
            }
            let end = span.end.min(before);
            match span.kind {
                SpanKind::Code => {
                    let found = (span.start..end)
                        .rev()
                        .find(|&i| !bytes[i].is_ascii_whitespace());
                    if let Some(i) = found {
                        return Some((i, bytes[i]));
                    }
                }
                k if k.is_comment() => {}
                _ => return Some((end - 1, bytes[end - 1])),
            }
        }
        None
    }

    /// Identifier ending at `end` (inclusive), if any.
    pub fn ident_ending_at(&self, end: usize) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        let len = bytes[..=end].iter().rev().take_while(|&&c| is_ident_byte(c)).count();
        (len > 0).then(|| &self.text[end + 1 - len..=end])
    }

    /// Whether a statement can begin at `pos`.
    ///
    /// True at the start of input, after `;`, `{` or `}`, and after a line
    /// break that ends the previous statement. False when `pos` continues an
    /// expression (`=`, `=>`, `,` or an operator before it) or is the body of
    /// an `if`/`for`/`while` head, `else` or `do`.
    pub fn starts_statement(&self, pos: usize) -> bool {
        let Some((prev, c)) = self.prev_token(pos) else {
            return true;
        };
        let line_break = self.text[prev..pos].contains('\n');
        if !self.is_code(prev) {
            return line_break;
        }
        match c {
            b';' | b'{' | b'}' => true,
            b')' => line_break && !self.closes_control_head(prev),
            _ if CONTINUES_AFTER.contains(&c) => false,
            _ => {
                let keyword = self
                    .ident_ending_at(prev)
                    .is_some_and(|w| matches!(w, "else" | "do"));
                line_break && !keyword
            }
        }
    }

    /// Whether the `)` at `close` ends the head of an `if`, `for`, `while` or `with`.
    fn closes_control_head(&self, close: usize) -> bool {
        let Some(open) = self.matching_open(close) else {
            return false;
        };
        self.prev_token(open)
            .and_then(|(p, _)| self.ident_ending_at(p))
            .is_some_and(|w| matches!(w, "if" | "for" | "while" | "with"))
    }

    /// Whether the identifier `word` starts at `pos` (followed by a non-identifier byte).
    pub fn word_at(&self, pos: usize, word: &str) -> bool {
        let bytes = self.text.as_bytes();
        self.text[pos..].starts_with(word)
            && bytes
                .get(pos + word.len())
                .is_none_or(|&c| !is_ident_byte(c))
    }

    /// Identifier starting at `pos`, if any.
    pub fn ident_at(&self, pos: usize) -> Option<&'a str> {
        let bytes = self.text.as_bytes();
        let len = bytes[pos..].iter().take_while(|&&c| is_ident_byte(c)).count();
        (len > 0).then(|| &self.text[pos..pos + len])
    }

    /// Index of the delimiter closing the `(`, `[` or `{` at `open`.
    ///
    /// Depth counts all three bracket kinds together and ignores anything
    /// inside literals or comments. Returns `None` when `open` is not an
    /// opening delimiter in code or the input ends first.
    pub fn matching_close(&self, open: usize) -> Option<usize> {
        let opener = *self.text.as_bytes().get(open)?;
        if !matches!(opener, b'(' | b'[' | b'{') || !self.is_code(open) {
            return None;
        }
        let mut depth = 0usize;
        for (i, c) in self.code_bytes(open) {
            match c {
                b'(' | b'[' | b'{' => depth += 1,
                b')' | b']' | b'}' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some(i);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// Index of the delimiter opening the `)`, `]` or `}` at `close`.
    pub fn matching_open(&self, close: usize) -> Option<usize> {
        let closer = *self.text.as_bytes().get(close)?;
        if !matches!(closer, b')' | b']' | b'}') || !self.is_code(close) {
            return None;
        }
        let bytes = self.text.as_bytes();
        let last = self.span_index(close);
        let mut depth = 0usize;
        for span in self.spans[..=last].iter().rev() {
            if span.kind != SpanKind::Code {
                continue;
            }
            for i in (span.start..span.end.min(close + 1)).rev() {
                match bytes[i] {
                    b')' | b']' | b'}' => depth += 1,
                    b'(' | b'[' | b'{' => {
                        depth -= 1;
                        if depth == 0 {
                            return Some(i);
                        }
                    }
                    _ => {}
                }
            }
        }
        None
    }

    /// Next comment at or after `from` whose text begins with `needle`.
    pub fn find_comment(&self, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        self.spans
            .iter()
            .filter(|s| s.kind.is_comment() && s.start >= from)
            .find(|s| self.text[s.start..s.end].starts_with(needle))
            .map(|s| s.start)
    }

    /// The first `{` after `from` that is not nested in parens or brackets,
    /// with its matching `}`. A `;` at depth zero ends the search.
    pub fn block_after(&self, from: usize) -> Option<(usize, usize)> {
        let mut depth = 0usize;
        for (i, c) in self.code_bytes(from) {
            match c {
                b'{' if depth == 0 => return Some((i, self.matching_close(i)?)),
                b'(' | b'[' => depth += 1,
                b')' | b']' => depth = depth.checked_sub(1)?,
                b';' if depth == 0 => return None,
                b'}' if depth == 0 => return None,
                _ => {}
            }
        }
        None
    }

    /// Scan an expression or statement starting at `start`.
    ///
    /// The scan stops after the first terminator in `terminators` at depth
    /// zero, before a closing delimiter that would go below depth zero (the
    /// enclosing block or object ends there), or before a newline at depth
    /// zero when neither the line's last token nor the next line's first
    /// token continues the expression.
    pub fn expression_end(&self, start: usize, terminators: &[u8]) -> ExprEnd {
        let bytes = self.text.as_bytes();
        let mut depth = 0usize;
        let mut last_sig: Option<u8> = None;
        let first = self.span_index(start);

        for span in &self.spans[first..] {
            match span.kind {
                SpanKind::Code => {}
                k if k.is_comment() => continue,
                _ => {
                    last_sig = Some(b'"');
                    continue;
                }
            }
            for i in span.start.max(start)..span.end {
                let c = bytes[i];
                match c {
                    b'(' | b'[' | b'{' => depth += 1,
                    b')' | b']' | b'}' => match depth.checked_sub(1) {
                        Some(d) => depth = d,
                        None => {
                            return ExprEnd {
                                end: i,
                                terminator: None,
                            };
                        }
                    },
                    _ if depth == 0 && terminators.contains(&c) => {
                        return ExprEnd {
                            end: i + 1,
                            terminator: Some(c),
                        };
                    }
                    b'\n' if depth == 0 => {
                        if let Some(sig) = last_sig
                            && !CONTINUES_AFTER.contains(&sig)
                            && !self.next_line_continues(i + 1)
                        {
                            return ExprEnd {
                                end: i,
                                terminator: None,
                            };
                        }
                    }
                    _ => {}
                }
                if !c.is_ascii_whitespace() {
                    last_sig = Some(c);
                }
            }
        }

        ExprEnd {
            end: bytes.len(),
            terminator: None,
        }
    }

    /// End of the statement starting at `start` (see [`Scan::expression_end`]).
    pub fn statement_end(&self, start: usize) -> usize {
        self.expression_end(start, b";").end
    }

    fn next_line_continues(&self, from: usize) -> bool {
        match self.next_token(from) {
            Some((pos, c)) if self.is_code(pos) => {
                CONTINUES_BEFORE.contains(&c) && !self.text[pos..].starts_with("++")
            }
            _ => false,
        }
    }
}

fn next_char_len(text: &str, pos: usize) -> usize {
    text[pos..].chars().next().map_or(1, char::len_utf8)
}
