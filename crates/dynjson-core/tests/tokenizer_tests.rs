use std::borrow::Cow;

use dynjson_core::tokenizer::{decode_string, tokenize, Tokenizer};
use dynjson_core::{Token, TokenKind, TokenizerError};

fn tokens_of(input: &str) -> Vec<Token> {
    tokenize(input.as_bytes(), 16).unwrap()
}

fn error_of(input: &str) -> TokenizerError {
    tokenize(input.as_bytes(), 16).unwrap_err()
}

// ============================================================================
// Token layout
// ============================================================================

#[test]
fn single_primitive() {
    assert_eq!(
        tokens_of("42"),
        vec![Token::new(TokenKind::Primitive, 0, 2, 0)]
    );
}

#[test]
fn string_span_excludes_quotes() {
    let tokens = tokens_of(r#""hello""#);
    assert_eq!(tokens, vec![Token::new(TokenKind::String, 1, 6, 0)]);
    assert_eq!(tokens[0].span(br#""hello""#), b"hello");
}

#[test]
fn nested_document_is_pre_order_with_sizes() {
    let input = r#"{"a":[1,2,{"b":true}]}"#;
    let tokens = tokens_of(input);
    assert_eq!(
        tokens,
        vec![
            Token::new(TokenKind::Object, 0, 22, 1),
            Token::new(TokenKind::String, 2, 3, 1),
            Token::new(TokenKind::Array, 5, 21, 3),
            Token::new(TokenKind::Primitive, 6, 7, 0),
            Token::new(TokenKind::Primitive, 8, 9, 0),
            Token::new(TokenKind::Object, 10, 20, 1),
            Token::new(TokenKind::String, 12, 13, 1),
            Token::new(TokenKind::Primitive, 15, 19, 0),
        ]
    );
}

#[test]
fn object_size_counts_keys() {
    let tokens = tokens_of(r#"{"x": 1, "y": [], "z": {}}"#);
    assert_eq!(tokens[0].kind, TokenKind::Object);
    assert_eq!(tokens[0].size, 3);
    // Every key has its value attached.
    for key in tokens.iter().filter(|t| t.kind == TokenKind::String) {
        assert_eq!(key.size, 1);
    }
}

#[test]
fn empty_containers() {
    assert_eq!(tokens_of("[]"), vec![Token::new(TokenKind::Array, 0, 2, 0)]);
    assert_eq!(tokens_of("{}"), vec![Token::new(TokenKind::Object, 0, 2, 0)]);
}

#[test]
fn whitespace_between_tokens_is_skipped() {
    let tokens = tokens_of(" [ 1 ,\n\t2 ]\r\n");
    assert_eq!(tokens.len(), 3);
    assert_eq!(tokens[0], Token::new(TokenKind::Array, 1, 11, 2));
    assert_eq!(tokens[2], Token::new(TokenKind::Primitive, 8, 9, 0));
}

#[test]
fn empty_and_blank_input_have_no_tokens() {
    assert!(tokens_of("").is_empty());
    assert!(tokens_of(" \n\t ").is_empty());
}

#[test]
fn escaped_quote_does_not_end_string() {
    let tokens = tokens_of(r#"["a\"b"]"#);
    assert_eq!(tokens[1], Token::new(TokenKind::String, 2, 6, 0));
}

#[test]
fn numbers_in_all_shapes() {
    for input in ["0", "-0", "12", "-3.5", "1e9", "2E-3", "6.02e+23"] {
        let tokens = tokens_of(input);
        assert_eq!(tokens.len(), 1, "{input}");
        assert_eq!(tokens[0].kind, TokenKind::Primitive, "{input}");
        assert_eq!(tokens[0].len(), input.len(), "{input}");
    }
}

// ============================================================================
// Two-pass operation
// ============================================================================

#[test]
fn count_matches_populate() {
    let input = br#"{"k":[true,false,null,"s",{"n":1.5}]}"#;
    let tokenizer = Tokenizer::new();
    let count = tokenizer.count(input).unwrap();
    let mut slots = vec![Token::default(); count];
    let written = tokenizer.tokenize_into(input, &mut slots).unwrap();
    assert_eq!(count, written);
    assert_eq!(count, 10);
}

#[test]
fn populate_with_too_few_slots() {
    let mut slots = [Token::default(); 2];
    let err = Tokenizer::new()
        .tokenize_into(b"[1,2,3]", &mut slots)
        .unwrap_err();
    assert_eq!(err, TokenizerError::OutOfTokenMemory { offset: 3 });
}

#[test]
fn input_length_limit() {
    let err = Tokenizer::with_max_input_len(4).count(b"[1,2,3]").unwrap_err();
    assert_eq!(err, TokenizerError::InputTooLong { len: 7, limit: 4 });
    assert_eq!(Tokenizer::with_max_input_len(7).count(b"[1,2,3]").unwrap(), 4);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn unclosed_array_is_truncated() {
    assert_eq!(
        error_of("[1,2"),
        TokenizerError::TruncatedInput { offset: 4 }
    );
}

#[test]
fn unclosed_string_is_truncated() {
    assert_eq!(
        error_of(r#""abc"#),
        TokenizerError::TruncatedInput { offset: 4 }
    );
}

#[test]
fn partial_literal_at_end_is_truncated() {
    assert_eq!(error_of("tru"), TokenizerError::TruncatedInput { offset: 3 });
    assert_eq!(error_of("-"), TokenizerError::TruncatedInput { offset: 1 });
}

#[test]
fn extra_closing_bracket() {
    assert_eq!(
        error_of("[1,2]]"),
        TokenizerError::UnmatchedBrackets { offset: 5 }
    );
}

#[test]
fn mismatched_bracket_kind() {
    assert_eq!(
        error_of("[1}"),
        TokenizerError::UnmatchedBrackets { offset: 2 }
    );
    assert_eq!(
        error_of(r#"{"a":1]"#),
        TokenizerError::UnmatchedBrackets { offset: 6 }
    );
}

#[test]
fn trailing_comma_rejected() {
    assert_eq!(
        error_of("[1,]"),
        TokenizerError::InvalidCharacter {
            byte: b']',
            offset: 3
        }
    );
}

#[test]
fn key_without_value_rejected() {
    assert_eq!(
        error_of(r#"{"a"}"#),
        TokenizerError::InvalidCharacter {
            byte: b'}',
            offset: 4
        }
    );
}

#[test]
fn non_string_key_rejected() {
    assert_eq!(
        error_of("{1:2}"),
        TokenizerError::InvalidCharacter {
            byte: b'1',
            offset: 1
        }
    );
}

#[test]
fn unknown_bare_word_rejected() {
    assert_eq!(
        error_of("xyz"),
        TokenizerError::InvalidCharacter {
            byte: b'x',
            offset: 0
        }
    );
}

#[test]
fn misspelled_literal_rejected() {
    assert_eq!(
        error_of("[nul]"),
        TokenizerError::InvalidCharacter {
            byte: b']',
            offset: 4
        }
    );
    assert_eq!(
        error_of("truex"),
        TokenizerError::InvalidCharacter {
            byte: b'x',
            offset: 4
        }
    );
}

#[test]
fn leading_zero_rejected() {
    assert_eq!(
        error_of("01"),
        TokenizerError::InvalidCharacter {
            byte: b'1',
            offset: 1
        }
    );
}

#[test]
fn second_root_value_rejected() {
    assert_eq!(
        error_of("1 2"),
        TokenizerError::InvalidCharacter {
            byte: b'2',
            offset: 2
        }
    );
}

#[test]
fn raw_control_character_in_string_rejected() {
    assert_eq!(
        error_of("\"a\u{1}\""),
        TokenizerError::InvalidCharacter {
            byte: 0x01,
            offset: 2
        }
    );
}

#[test]
fn bad_escape_rejected() {
    assert_eq!(
        error_of(r#""\x""#),
        TokenizerError::InvalidCharacter {
            byte: b'x',
            offset: 2
        }
    );
    assert_eq!(
        error_of(r#""\u12g4""#),
        TokenizerError::InvalidCharacter {
            byte: b'g',
            offset: 5
        }
    );
}

#[test]
fn error_offsets() {
    assert_eq!(error_of("[1,2").offset(), 4);
    assert_eq!(error_of("xyz").offset(), 0);
}

// ============================================================================
// String decoding
// ============================================================================

#[test]
fn decode_plain_string_borrows() {
    assert!(matches!(decode_string(b"plain"), Cow::Borrowed("plain")));
}

#[test]
fn decode_simple_escapes() {
    assert_eq!(decode_string(br#"a\nb\t\"c\"\\\/"#), "a\nb\t\"c\"\\/");
    assert_eq!(decode_string(br#"\b\f\r"#), "\u{8}\u{c}\r");
}

#[test]
fn decode_unicode_escapes() {
    assert_eq!(decode_string(br#"caf\u00e9"#), "caf\u{e9}");
    assert_eq!(decode_string(br#"\ud83d\ude00"#), "\u{1f600}");
}

#[test]
fn decode_lone_surrogates_as_replacement() {
    assert_eq!(decode_string(br#"\ud83dx"#), "\u{fffd}x");
    assert_eq!(decode_string(br#"\ude00"#), "\u{fffd}");
}
