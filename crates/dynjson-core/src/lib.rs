//! # dynjson-core
//!
//! Strict JSON tokenizer plus a materializer that turns the flat token array
//! into an owned, dynamically typed [`Value`] tree.
//!
//! Parsing happens in two stages:
//!
//! 1. the [`tokenizer`] scans the text twice, once to count tokens and once
//!    to fill an exactly sized token array (plus a small margin);
//! 2. the [`materializer`] walks that array depth first and builds the tree,
//!    stopping at the first error.
//!
//! ## Quick start
//!
//! ```rust
//! use dynjson_core::{parse, Value};
//!
//! let value = parse(r#"{"a":[1,2,{"b":true}]}"#).unwrap();
//! assert_eq!(value["a"][2]["b"], Value::Bool(true));
//! assert_eq!(value["a"].as_list().map(|l| l.len()), Some(3));
//!
//! // Empty documents are null, not errors.
//! assert_eq!(parse("").unwrap(), Value::Null);
//! ```
//!
//! ## Modules
//!
//! - [`token`] — `Token` / `TokenKind` records
//! - [`tokenizer`] — JSON text → tokens, string escape decoding
//! - [`materializer`] — tokens → `Value`
//! - [`value`] — the `Value` tree and its ordered `Map`
//! - [`encoder`] — `Value` → JSON text
//! - [`options`] — `ParseOptions` limits
//! - [`error`] — error types

mod bridge;
pub mod encoder;
pub mod error;
pub mod materializer;
pub mod options;
pub mod token;
pub mod tokenizer;
pub mod value;

use tracing::debug;

pub use encoder::{encode, encode_pretty};
pub use error::{Error, Result, TokenizerError};
pub use materializer::{materialize, materialize_with_limit};
pub use options::ParseOptions;
pub use token::{Token, TokenKind};
pub use tokenizer::{tokenize, Tokenizer};
pub use value::{Float, Integer, Map, Value};

/// Parse a JSON document with default options.
pub fn parse(input: &str) -> Result<Value> {
    parse_with(input, &ParseOptions::default())
}

/// Parse a JSON document with explicit limits.
pub fn parse_with(input: &str, options: &ParseOptions) -> Result<Value> {
    parse_document(input, options).map(|doc| doc.value)
}

/// A parsed document together with tokenizer statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub value: Value,
    /// Tokens produced by the tokenizer.
    pub token_count: usize,
    /// Tokens covered by the root value. Equal to `token_count` for any
    /// document produced by the built-in tokenizer.
    pub consumed: usize,
}

/// Tokenize and materialize `input`, keeping the token statistics.
///
/// Tokenizer failures are reported before any value is built. A document
/// with no tokens (empty or whitespace-only input) is `Null`.
pub fn parse_document(input: &str, options: &ParseOptions) -> Result<Document> {
    let tokenizer = Tokenizer::with_max_input_len(options.max_input_len);
    let tokens = tokenizer::tokenize_with(&tokenizer, input.as_bytes(), options.token_margin)?;
    debug!(
        input_len = input.len(),
        tokens = tokens.len(),
        "tokenized document"
    );

    if tokens.is_empty() {
        return Ok(Document {
            value: Value::Null,
            token_count: 0,
            consumed: 0,
        });
    }

    let (value, consumed) = materialize_with_limit(
        input.as_bytes(),
        &tokens,
        0,
        tokens.len(),
        options.max_depth,
    )?;
    debug!(consumed, kind = value.kind_name(), "materialized document");

    Ok(Document {
        value,
        token_count: tokens.len(),
        consumed,
    })
}
