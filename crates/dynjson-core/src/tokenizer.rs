//! Strict JSON tokenizer producing a flat, pre-order token array.
//!
//! The tokenizer never builds values. It scans the input once, checks it
//! against the JSON grammar and records every value, key and container as a
//! [`Token`] whose span points back into the input. Containers get their
//! `end` filled in when their closing bracket is seen, and every token bumps
//! the `size` of its parent.
//!
//! # Two-pass use
//!
//! [`Tokenizer::count`] runs the full scan without storing anything and
//! returns how many tokens the document needs. [`Tokenizer::tokenize_into`]
//! then fills a caller-provided slice. [`tokenize`] wraps both passes.
//!
//! # Strings
//!
//! String tokens cover the raw text between the quotes. Escape sequences are
//! validated here and decoded on demand by [`decode_string`].

use std::borrow::Cow;

use tracing::trace;

use crate::error::TokenizerError;
use crate::token::{Token, TokenKind};

/// Destination for tokens during a scan. The counting pass and the populate
/// pass share one scanner and differ only in their sink.
trait TokenSink {
    /// Store a token and return its index.
    fn push(&mut self, token: Token, offset: usize) -> Result<usize, TokenizerError>;
    /// Increment the `size` of the token at `index`.
    fn add_child(&mut self, index: usize);
    /// Set the `end` of the container at `index`.
    fn close(&mut self, index: usize, end: usize);
}

struct Counter {
    count: usize,
}

impl TokenSink for Counter {
    fn push(&mut self, _token: Token, _offset: usize) -> Result<usize, TokenizerError> {
        self.count += 1;
        Ok(self.count - 1)
    }

    fn add_child(&mut self, _index: usize) {}

    fn close(&mut self, _index: usize, _end: usize) {}
}

struct SliceSink<'a> {
    tokens: &'a mut [Token],
    next: usize,
}

impl TokenSink for SliceSink<'_> {
    fn push(&mut self, token: Token, offset: usize) -> Result<usize, TokenizerError> {
        let slot = self
            .tokens
            .get_mut(self.next)
            .ok_or(TokenizerError::OutOfTokenMemory { offset })?;
        *slot = token;
        self.next += 1;
        Ok(self.next - 1)
    }

    fn add_child(&mut self, index: usize) {
        if let Some(token) = self.tokens.get_mut(index) {
            token.size += 1;
        }
    }

    fn close(&mut self, index: usize, end: usize) {
        if let Some(token) = self.tokens.get_mut(index) {
            token.end = end;
        }
    }
}

/// What the scanner accepts next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// A value (root, after `:` or after `,` in an array).
    Value,
    /// A value or `]` right after `[`.
    ValueOrClose,
    /// A key after `,` in an object.
    Key,
    /// A key or `}` right after `{`.
    KeyOrClose,
    Colon,
    CommaOrClose,
    /// The root value is complete; only whitespace may follow.
    End,
}

/// An open container on the scan stack.
#[derive(Debug, Clone, Copy)]
struct Frame {
    kind: TokenKind,
    token: usize,
}

/// Strict JSON tokenizer.
#[derive(Debug, Clone, Copy)]
pub struct Tokenizer {
    max_input_len: usize,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer {
    /// A tokenizer accepting inputs up to `u32::MAX` bytes.
    pub fn new() -> Self {
        Self {
            max_input_len: u32::MAX as usize,
        }
    }

    /// A tokenizer rejecting inputs longer than `max_input_len` bytes.
    pub fn with_max_input_len(max_input_len: usize) -> Self {
        Self { max_input_len }
    }

    /// Scan `input` and return the number of tokens it contains.
    pub fn count(&self, input: &[u8]) -> Result<usize, TokenizerError> {
        let mut counter = Counter { count: 0 };
        self.scan(input, &mut counter)?;
        trace!(tokens = counter.count, "counting pass complete");
        Ok(counter.count)
    }

    /// Scan `input`, writing tokens into `tokens`. Returns the number of
    /// tokens written. Fails with `OutOfTokenMemory` if the slice is too
    /// small.
    pub fn tokenize_into(&self, input: &[u8], tokens: &mut [Token]) -> Result<usize, TokenizerError> {
        let mut sink = SliceSink { tokens, next: 0 };
        self.scan(input, &mut sink)?;
        trace!(tokens = sink.next, "populate pass complete");
        Ok(sink.next)
    }

    fn scan<S: TokenSink>(&self, input: &[u8], sink: &mut S) -> Result<(), TokenizerError> {
        if input.len() > self.max_input_len {
            return Err(TokenizerError::InputTooLong {
                len: input.len(),
                limit: self.max_input_len,
            });
        }

        let mut stack: Vec<Frame> = Vec::new();
        let mut expect = Expect::Value;
        // Key token waiting for its value after `:`.
        let mut pending_key: Option<usize> = None;
        // Key token waiting for `:`.
        let mut last_key: Option<usize> = None;
        let mut pos = 0;

        while pos < input.len() {
            let c = input[pos];
            match c {
                b' ' | b'\t' | b'\r' | b'\n' => {
                    pos += 1;
                }
                b'{' | b'[' => {
                    if !matches!(expect, Expect::Value | Expect::ValueOrClose) {
                        return Err(invalid(input, pos));
                    }
                    let kind = if c == b'{' {
                        TokenKind::Object
                    } else {
                        TokenKind::Array
                    };
                    let index = sink.push(Token::new(kind, pos, pos, 0), pos)?;
                    attach(sink, &stack, &mut pending_key);
                    stack.push(Frame { kind, token: index });
                    expect = if kind == TokenKind::Object {
                        Expect::KeyOrClose
                    } else {
                        Expect::ValueOrClose
                    };
                    pos += 1;
                }
                b'}' | b']' => {
                    let kind = if c == b'}' {
                        TokenKind::Object
                    } else {
                        TokenKind::Array
                    };
                    let frame = match stack.last() {
                        Some(frame) if frame.kind == kind => *frame,
                        _ => return Err(TokenizerError::UnmatchedBrackets { offset: pos }),
                    };
                    let may_close = match kind {
                        TokenKind::Object => {
                            matches!(expect, Expect::KeyOrClose | Expect::CommaOrClose)
                        }
                        _ => matches!(expect, Expect::ValueOrClose | Expect::CommaOrClose),
                    };
                    if !may_close {
                        return Err(invalid(input, pos));
                    }
                    stack.pop();
                    sink.close(frame.token, pos + 1);
                    expect = after_value(&stack);
                    pos += 1;
                }
                b'"' => {
                    let is_key = match expect {
                        Expect::Key | Expect::KeyOrClose => true,
                        Expect::Value | Expect::ValueOrClose => false,
                        _ => return Err(invalid(input, pos)),
                    };
                    let start = pos + 1;
                    let end = scan_string(input, start)?;
                    let index = sink.push(Token::new(TokenKind::String, start, end, 0), pos)?;
                    if is_key {
                        if let Some(frame) = stack.last() {
                            sink.add_child(frame.token);
                        }
                        last_key = Some(index);
                        expect = Expect::Colon;
                    } else {
                        attach(sink, &stack, &mut pending_key);
                        expect = after_value(&stack);
                    }
                    pos = end + 1;
                }
                b':' => {
                    if expect != Expect::Colon {
                        return Err(invalid(input, pos));
                    }
                    pending_key = last_key.take();
                    expect = Expect::Value;
                    pos += 1;
                }
                b',' => {
                    if expect != Expect::CommaOrClose {
                        return Err(invalid(input, pos));
                    }
                    expect = match stack.last() {
                        Some(frame) if frame.kind == TokenKind::Object => Expect::Key,
                        _ => Expect::Value,
                    };
                    pos += 1;
                }
                b'-' | b'0'..=b'9' | b't' | b'f' | b'n' => {
                    if !matches!(expect, Expect::Value | Expect::ValueOrClose) {
                        return Err(invalid(input, pos));
                    }
                    let end = scan_primitive(input, pos)?;
                    sink.push(Token::new(TokenKind::Primitive, pos, end, 0), pos)?;
                    attach(sink, &stack, &mut pending_key);
                    expect = after_value(&stack);
                    pos = end;
                }
                _ => return Err(invalid(input, pos)),
            }
        }

        if !stack.is_empty() || matches!(expect, Expect::Colon) || pending_key.is_some() {
            return Err(TokenizerError::TruncatedInput {
                offset: input.len(),
            });
        }
        Ok(())
    }
}

/// Count the tokens in `input`, allocate that many plus `margin`, and fill
/// them in. The returned vector holds exactly the tokens written.
pub fn tokenize(input: &[u8], margin: usize) -> Result<Vec<Token>, TokenizerError> {
    tokenize_with(&Tokenizer::new(), input, margin)
}

/// Two-pass tokenization with an explicit tokenizer configuration.
pub fn tokenize_with(
    tokenizer: &Tokenizer,
    input: &[u8],
    margin: usize,
) -> Result<Vec<Token>, TokenizerError> {
    let needed = tokenizer.count(input)?;
    let mut tokens = vec![Token::default(); needed + margin];
    let written = tokenizer.tokenize_into(input, &mut tokens)?;
    tokens.truncate(written);
    Ok(tokens)
}

/// Register a freshly pushed value with whatever owns it: the key it follows,
/// or the enclosing array. Root values have no owner.
fn attach<S: TokenSink>(sink: &mut S, stack: &[Frame], pending_key: &mut Option<usize>) {
    if let Some(key) = pending_key.take() {
        sink.add_child(key);
    } else if let Some(frame) = stack.last() {
        sink.add_child(frame.token);
    }
}

fn after_value(stack: &[Frame]) -> Expect {
    if stack.is_empty() {
        Expect::End
    } else {
        Expect::CommaOrClose
    }
}

fn invalid(input: &[u8], offset: usize) -> TokenizerError {
    TokenizerError::InvalidCharacter {
        byte: input[offset],
        offset,
    }
}

/// Scan a string body starting just after the opening quote. Returns the
/// offset of the closing quote.
fn scan_string(input: &[u8], start: usize) -> Result<usize, TokenizerError> {
    let truncated = TokenizerError::TruncatedInput {
        offset: input.len(),
    };
    let mut pos = start;
    loop {
        let c = *input.get(pos).ok_or(truncated)?;
        match c {
            b'"' => return Ok(pos),
            b'\\' => {
                let escape = *input.get(pos + 1).ok_or(truncated)?;
                match escape {
                    b'"' | b'\\' | b'/' | b'b' | b'f' | b'n' | b'r' | b't' => pos += 2,
                    b'u' => {
                        for i in pos + 2..pos + 6 {
                            let digit = *input.get(i).ok_or(truncated)?;
                            if !digit.is_ascii_hexdigit() {
                                return Err(invalid(input, i));
                            }
                        }
                        pos += 6;
                    }
                    _ => return Err(invalid(input, pos + 1)),
                }
            }
            0x00..=0x1f => return Err(invalid(input, pos)),
            _ => pos += 1,
        }
    }
}

fn is_delimiter(c: u8) -> bool {
    matches!(c, b' ' | b'\t' | b'\r' | b'\n' | b',' | b']' | b'}' | b':')
}

/// Scan a primitive starting at `start` and check its lexical shape.
/// Returns the offset one past its last byte.
fn scan_primitive(input: &[u8], start: usize) -> Result<usize, TokenizerError> {
    let end = input[start..]
        .iter()
        .position(|&c| is_delimiter(c))
        .map_or(input.len(), |p| start + p);
    let span = &input[start..end];

    let bad = match span[0] {
        b't' => check_literal(span, b"true"),
        b'f' => check_literal(span, b"false"),
        b'n' => check_literal(span, b"null"),
        _ => check_number(span),
    };

    match bad {
        None => Ok(end),
        // The shape needed more bytes than the primitive has.
        Some(at) if at == span.len() => {
            if end == input.len() {
                Err(TokenizerError::TruncatedInput { offset: end })
            } else {
                Err(invalid(input, end))
            }
        }
        Some(at) => Err(invalid(input, start + at)),
    }
}

/// Index of the first byte where `span` departs from `literal`.
fn check_literal(span: &[u8], literal: &[u8]) -> Option<usize> {
    for (i, expected) in literal.iter().enumerate() {
        match span.get(i) {
            Some(c) if c == expected => {}
            Some(_) => return Some(i),
            None => return Some(span.len()),
        }
    }
    if span.len() > literal.len() {
        Some(literal.len())
    } else {
        None
    }
}

/// Index of the first byte where `span` departs from the JSON number grammar
/// `-? (0 | [1-9][0-9]*) (. [0-9]+)? ([eE] [+-]? [0-9]+)?`.
fn check_number(span: &[u8]) -> Option<usize> {
    let mut i = 0;
    let at = |i: usize| span.get(i).copied();

    if at(i) == Some(b'-') {
        i += 1;
    }
    match at(i) {
        Some(b'0') => i += 1,
        Some(b'1'..=b'9') => {
            while matches!(at(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return Some(i),
    }
    if at(i) == Some(b'.') {
        i += 1;
        if !matches!(at(i), Some(b'0'..=b'9')) {
            return Some(i);
        }
        while matches!(at(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if matches!(at(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(at(i), Some(b'+' | b'-')) {
            i += 1;
        }
        if !matches!(at(i), Some(b'0'..=b'9')) {
            return Some(i);
        }
        while matches!(at(i), Some(b'0'..=b'9')) {
            i += 1;
        }
    }
    if i < span.len() {
        Some(i)
    } else {
        None
    }
}

/// Decode the escape sequences in a raw string span.
///
/// Spans without a backslash are returned borrowed. Unpaired UTF-16
/// surrogates decode as U+FFFD. Malformed escapes (possible only in token
/// streams built by hand) are copied through unchanged.
pub fn decode_string(raw: &[u8]) -> Cow<'_, str> {
    if !raw.contains(&b'\\') {
        return String::from_utf8_lossy(raw);
    }

    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        let b = raw[i];
        if b != b'\\' {
            out.push(b);
            i += 1;
            continue;
        }
        let Some(&escape) = raw.get(i + 1) else {
            out.push(b'\\');
            break;
        };
        i += 2;
        let ch = match escape {
            b'"' => '"',
            b'\\' => '\\',
            b'/' => '/',
            b'b' => '\u{8}',
            b'f' => '\u{c}',
            b'n' => '\n',
            b'r' => '\r',
            b't' => '\t',
            b'u' => match read_hex4(raw, i) {
                Some(unit) => {
                    i += 4;
                    decode_utf16(unit, raw, &mut i)
                }
                None => {
                    out.extend_from_slice(b"\\u");
                    continue;
                }
            },
            other => {
                out.push(b'\\');
                out.push(other);
                continue;
            }
        };
        let mut buf = [0u8; 4];
        out.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());
    }
    Cow::Owned(String::from_utf8_lossy(&out).into_owned())
}

fn read_hex4(raw: &[u8], at: usize) -> Option<u16> {
    let digits = raw.get(at..at + 4)?;
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let text = std::str::from_utf8(digits).ok()?;
    u16::from_str_radix(text, 16).ok()
}

/// Turn one `\uXXXX` unit into a char, consuming a following low surrogate
/// escape when `unit` is a high surrogate.
fn decode_utf16(unit: u16, raw: &[u8], i: &mut usize) -> char {
    match unit {
        0xD800..=0xDBFF => {
            if raw.get(*i..*i + 2) == Some(&b"\\u"[..]) {
                if let Some(low @ 0xDC00..=0xDFFF) = read_hex4(raw, *i + 2) {
                    *i += 6;
                    let code = 0x10000
                        + ((u32::from(unit) - 0xD800) << 10)
                        + (u32::from(low) - 0xDC00);
                    return char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER);
                }
            }
            char::REPLACEMENT_CHARACTER
        }
        0xDC00..=0xDFFF => char::REPLACEMENT_CHARACTER,
        _ => char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
    }
}
