//! Error types for tokenizing and materializing JSON documents.

use thiserror::Error;

/// Failures reported by the tokenizer before any value is built.
///
/// Every variant carries the byte offset where the problem was detected.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenizerError {
    /// The output token slice was too small to hold every token.
    #[error("not enough token memory at byte {offset}")]
    OutOfTokenMemory { offset: usize },

    /// The input is longer than the configured limit.
    #[error("input of {len} bytes exceeds the limit of {limit} bytes")]
    InputTooLong { len: usize, limit: usize },

    /// A byte that is not allowed at this position.
    #[error("invalid character {byte:#04x} at byte {offset}")]
    InvalidCharacter { byte: u8, offset: usize },

    /// The input ended inside a string or with unclosed containers.
    #[error("truncated input at byte {offset}")]
    TruncatedInput { offset: usize },

    /// A closing bracket without a matching opening bracket of the same kind.
    #[error("unmatched bracket at byte {offset}")]
    UnmatchedBrackets { offset: usize },
}

impl TokenizerError {
    /// Byte offset at which the error was detected. For `InputTooLong` this
    /// is the configured limit.
    pub fn offset(&self) -> usize {
        match *self {
            TokenizerError::OutOfTokenMemory { offset }
            | TokenizerError::InvalidCharacter { offset, .. }
            | TokenizerError::TruncatedInput { offset }
            | TokenizerError::UnmatchedBrackets { offset } => offset,
            TokenizerError::InputTooLong { limit, .. } => limit,
        }
    }
}

/// Errors that can occur while turning JSON text into a [`Value`](crate::Value).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// The tokenizer rejected the input; no value was built.
    #[error("tokenizer error: {0}")]
    Tokenizer(#[from] TokenizerError),

    /// A primitive token is not a number, boolean or null.
    #[error("unrecognized primitive '{text}' (length {len}) at token {index}")]
    UnrecognizedPrimitive {
        text: String,
        len: usize,
        index: usize,
    },

    /// A token carries a kind tag the materializer does not handle.
    #[error("unrecognized token type {kind:#04x} at token {index}")]
    UnrecognizedType { kind: u8, index: usize },

    /// An object key token is not a string.
    #[error("object key at token {index} is not a string")]
    NonStringKey { index: usize },

    /// Containers are nested deeper than the configured limit.
    #[error("nesting exceeds the maximum depth of {limit}")]
    NestingTooDeep { limit: usize },

    /// serde_json failed to write a value as JSON text.
    #[error("JSON serialization error: {0}")]
    Serialize(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialize(err.to_string())
    }
}

/// Convenience alias used throughout dynjson-core.
pub type Result<T> = std::result::Result<T, Error>;
