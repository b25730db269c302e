//! Token array → [`Value`] tree.
//!
//! The materializer walks a flat, pre-order token array once, depth first,
//! and never backtracks. Each call reports how many tokens its subtree
//! covered so the caller can find the next sibling:
//!
//! ```text
//! consumed(node) = 1 + Σ consumed(child)
//! ```
//!
//! Tokens can come from [`crate::tokenizer`] or from any other producer that
//! follows the same layout, so the walk does not trust `size` fields blindly:
//! a container stops collecting children once the stream is exhausted, a key
//! whose value token is missing maps to `Null`, and capacity hints are
//! clamped to the tokens that actually remain.

use std::num::IntErrorKind;

use crate::error::{Error, Result};
use crate::options::{DEFAULT_MAX_DEPTH, MAX_DEPTH_CEILING};
use crate::token::{Token, TokenKind};
use crate::tokenizer::decode_string;
use crate::value::{Float, Integer, Map, Value};

/// Materialize the subtree rooted at `tokens[index]`, looking at no more than
/// `remaining` tokens. Returns the value and the number of tokens consumed.
///
/// Nesting is limited to [`DEFAULT_MAX_DEPTH`] containers.
pub fn materialize(
    buffer: &[u8],
    tokens: &[Token],
    index: usize,
    remaining: usize,
) -> Result<(Value, usize)> {
    materialize_with_limit(buffer, tokens, index, remaining, DEFAULT_MAX_DEPTH)
}

/// [`materialize`] with an explicit nesting limit. A limit of `0` rejects
/// every container; `1` accepts flat lists and maps only. Limits above
/// [`MAX_DEPTH_CEILING`] are clamped to it.
pub fn materialize_with_limit(
    buffer: &[u8],
    tokens: &[Token],
    index: usize,
    remaining: usize,
    max_depth: usize,
) -> Result<(Value, usize)> {
    let walker = Materializer {
        buffer,
        tokens,
        max_depth: max_depth.min(MAX_DEPTH_CEILING),
    };
    walker.node(index, remaining, 0)
}

struct Materializer<'a> {
    buffer: &'a [u8],
    tokens: &'a [Token],
    max_depth: usize,
}

impl Materializer<'_> {
    fn node(&self, index: usize, remaining: usize, depth: usize) -> Result<(Value, usize)> {
        let remaining = remaining.min(self.tokens.len().saturating_sub(index));
        if remaining == 0 {
            return Ok((Value::Null, 0));
        }

        let token = &self.tokens[index];
        match token.kind {
            TokenKind::Primitive => Ok((self.primitive(index, token)?, 1)),
            TokenKind::String => Ok((Value::String(self.text(token)), 1)),
            TokenKind::Object => self.object(index, token, remaining, depth),
            TokenKind::Array => self.array(index, token, remaining, depth),
            TokenKind::Undefined => Err(Error::UnrecognizedType {
                kind: token.kind.bits(),
                index,
            }),
        }
    }

    fn text(&self, token: &Token) -> String {
        decode_string(token.span(self.buffer)).into_owned()
    }

    /// Classify a primitive by its first byte. Numbers holding a fraction or
    /// exponent marker are floats.
    fn primitive(&self, index: usize, token: &Token) -> Result<Value> {
        let span = token.span(self.buffer);
        let unrecognized = || Error::UnrecognizedPrimitive {
            text: String::from_utf8_lossy(span).into_owned(),
            len: span.len(),
            index,
        };

        match span.first() {
            Some(b'0'..=b'9' | b'-' | b'+') => {
                if span.iter().any(|c| matches!(c, b'.' | b'e' | b'E')) {
                    parse_float(span).map(Value::Float).ok_or_else(unrecognized)
                } else {
                    parse_integer(span).ok_or_else(unrecognized)
                }
            }
            Some(b't') => Ok(Value::Bool(true)),
            Some(b'f') => Ok(Value::Bool(false)),
            Some(b'n') => Ok(Value::Null),
            _ => Err(unrecognized()),
        }
    }

    fn object(
        &self,
        index: usize,
        token: &Token,
        remaining: usize,
        depth: usize,
    ) -> Result<(Value, usize)> {
        if depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let mut map = Map::with_capacity(token.size.min(remaining - 1));
        let mut consumed = 1;
        for _ in 0..token.size {
            let key_index = index + consumed;
            // No key token left: the stream ended before the object did.
            if consumed == remaining {
                break;
            }
            let key_token = &self.tokens[key_index];
            if key_token.kind != TokenKind::String {
                return Err(Error::NonStringKey { index: key_index });
            }
            let key = self.text(key_token);
            consumed += 1;

            // A key without an attached value stands for `null`.
            let value = if key_token.size > 0 {
                let (value, used) = self.node(index + consumed, remaining - consumed, depth + 1)?;
                consumed += used;
                value
            } else {
                Value::Null
            };
            map.insert(key, value);
        }
        Ok((Value::Map(map), consumed))
    }

    fn array(
        &self,
        index: usize,
        token: &Token,
        remaining: usize,
        depth: usize,
    ) -> Result<(Value, usize)> {
        if depth >= self.max_depth {
            return Err(Error::NestingTooDeep {
                limit: self.max_depth,
            });
        }

        let mut items = Vec::with_capacity(token.size.min(remaining - 1));
        let mut consumed = 1;
        for _ in 0..token.size {
            if consumed == remaining {
                break;
            }
            let (value, used) = self.node(index + consumed, remaining - consumed, depth + 1)?;
            consumed += used;
            items.push(value);
        }
        Ok((Value::List(items), consumed))
    }
}

fn parse_float(span: &[u8]) -> Option<Float> {
    std::str::from_utf8(span).ok()?.parse().ok()
}

/// Integers outside the `i64` range fall back to a float.
fn parse_integer(span: &[u8]) -> Option<Value> {
    let text = std::str::from_utf8(span).ok()?;
    match text.parse::<Integer>() {
        Ok(n) => Some(Value::Integer(n)),
        Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
            text.parse::<Float>().ok().map(Value::Float)
        }
        Err(_) => None,
    }
}
