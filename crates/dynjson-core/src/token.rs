//! Flat token records produced by the tokenizer and consumed by the materializer.

use std::fmt;

/// Kind tag of a token. The discriminants are single bits so kinds can be
/// tested as flags when a token stream is produced by foreign code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum TokenKind {
    /// Slot that was never filled in.
    #[default]
    Undefined = 0,
    Object = 1,
    Array = 2,
    String = 4,
    Primitive = 8,
}

impl TokenKind {
    /// Map a raw tag to a kind. Anything that is not exactly one known bit
    /// becomes `Undefined`.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            1 => TokenKind::Object,
            2 => TokenKind::Array,
            4 => TokenKind::String,
            8 => TokenKind::Primitive,
            _ => TokenKind::Undefined,
        }
    }

    pub fn bits(self) -> u8 {
        self as u8
    }

    /// True for `Object` and `Array`.
    pub fn is_container(self) -> bool {
        matches!(self, TokenKind::Object | TokenKind::Array)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Undefined => "undefined",
            TokenKind::Object => "object",
            TokenKind::Array => "array",
            TokenKind::String => "string",
            TokenKind::Primitive => "primitive",
        };
        f.write_str(name)
    }
}

/// One syntactic unit of a JSON document.
///
/// `start..end` is a byte range into the source buffer (string spans exclude
/// the quotes). `size` counts direct children: elements for arrays, keys for
/// objects, and `1` for a key string that has a value attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Token {
    pub kind: TokenKind,
    pub start: usize,
    pub end: usize,
    pub size: usize,
}

impl Token {
    pub fn new(kind: TokenKind, start: usize, end: usize, size: usize) -> Self {
        Self {
            kind,
            start,
            end,
            size,
        }
    }

    /// Length of the span in bytes.
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The bytes this token covers, or an empty slice if the range falls
    /// outside `buffer`.
    pub fn span<'a>(&self, buffer: &'a [u8]) -> &'a [u8] {
        buffer.get(self.start..self.end).unwrap_or_default()
    }
}
