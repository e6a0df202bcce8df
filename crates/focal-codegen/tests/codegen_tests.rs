//! Integration tests for the FOCAL statement compiler.
//!
//! Tests validate:
//! - Numeric literals map one byte per character
//! - Text literal headers, payload encoding and the 15-byte limit
//! - Append statements pull and validate their text token
//! - Errors carry the offending token/character and its position
//! - Line driving with the reference lexer, including error recovery
//! - Deterministic output (same input → same bytes)

use focal_codegen::{
    compile_line, compile_number, compile_statement, compile_text, compile_text_append,
    CompileResult, Statement, MAX_TEXT_PAYLOAD,
};
use focal_lexer::{Lexer, Token, TokenKind, TokenStream};
use focal_types::{ErrorCode, SourceFile, Span};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn text_token(s: &str) -> Token {
    Token::new(TokenKind::Text(s.into()), Span::new(1, 1, 1, 2 + s.chars().count() as u32))
}

fn number_token(s: &str) -> Token {
    Token::new(TokenKind::Number(s.into()), Span::new(1, 1, 1, s.len() as u32))
}

/// Compile every statement line of `source`, skipping blank lines.
fn compile_source(source: &str) -> Vec<CompileResult> {
    let sf = SourceFile::new("test.focal", source);
    let mut lexer = Lexer::new(&sf);
    let mut results = Vec::new();
    while !lexer.at_end() {
        if let Some(result) = compile_line(&mut lexer) {
            results.push(result);
        }
    }
    results
}

/// Compile a single-statement source (panics on error).
fn compile_one(source: &str) -> Vec<u8> {
    let mut results = compile_source(source);
    assert_eq!(results.len(), 1, "expected exactly one statement");
    results
        .remove(0)
        .unwrap_or_else(|e| panic!("compile failed: {e}"))
}

// ══════════════════════════════════════════════════════════════════════════════
// Numeric literals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_number_full_form() {
    assert_eq!(
        compile_number(&number_token("-12.3E4")).unwrap(),
        vec![0x1C, 0x11, 0x12, 0x1A, 0x13, 0x1B, 0x14]
    );
}

#[test]
fn test_number_length_matches_lexeme() {
    for lexeme in ["0", "42", "3.14159", "-1E-99", ".5", "1e5"] {
        let code = compile_number(&number_token(lexeme)).unwrap();
        assert_eq!(code.len(), lexeme.len(), "lexeme {lexeme}");
    }
}

#[test]
fn test_number_from_source() {
    assert_eq!(compile_one("-12.3E4"), vec![0x1C, 0x11, 0x12, 0x1A, 0x13, 0x1B, 0x14]);
    assert_eq!(compile_one("  7 // seven"), vec![0x17]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Text literals
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_text_header_counts_payload() {
    assert_eq!(
        compile_text(&text_token("ABC")).unwrap(),
        vec![0xF3, 0x41, 0x42, 0x43]
    );
}

#[test]
fn test_text_full_capacity() {
    let literal = "ABCDEFGHIJKLMNO";
    assert_eq!(literal.len(), MAX_TEXT_PAYLOAD);
    let code = compile_text(&text_token(literal)).unwrap();
    assert_eq!(code.len(), 16);
    assert_eq!(code[0], 0xFF);
    assert_eq!(&code[1..], literal.as_bytes());
}

#[test]
fn test_text_capacity_exceeded() {
    let err = compile_text(&text_token("ABCDEFGHIJKLMNOP")).unwrap_err();
    assert_eq!(err.code, ErrorCode::CAPACITY_EXCEEDED);
    assert!(err.message.contains("15 characters"), "{}", err.message);
    assert!(err.message.contains("1 too many"), "{}", err.message);
    assert!(err.message.contains("1:1"), "{}", err.message);
}

#[test]
fn test_text_overflow_is_measured() {
    let err = compile_text(&text_token("ABCDEFGHIJKLMNOPQRS")).unwrap_err();
    assert!(err.message.contains("4 too many"), "{}", err.message);
}

#[test]
fn test_capacity_checked_before_late_escape() {
    let err = compile_text(&text_token("ABCDEFGHIJKLMNOP`Q")).unwrap_err();
    assert_eq!(err.code, ErrorCode::CAPACITY_EXCEEDED);
    assert!(err.message.contains("1 too many"), "{}", err.message);
}

#[test]
fn test_capacity_checked_before_late_unsupported_character() {
    let err = compile_text(&text_token("ABCDEFGHIJKLMNOP€")).unwrap_err();
    assert_eq!(err.code, ErrorCode::CAPACITY_EXCEEDED);

    // the 16th character is the bad one: still over capacity
    let err = compile_text(&text_token("ABCDEFGHIJKLMNO€")).unwrap_err();
    assert_eq!(err.code, ErrorCode::CAPACITY_EXCEEDED);

    // within capacity the codec error is reported
    let err = compile_text(&text_token("ABCDEFGHIJKLMN€")).unwrap_err();
    assert_eq!(err.code, ErrorCode::UNSUPPORTED_CHARACTER);
}

#[test]
fn test_append_capacity_checked_before_late_escape() {
    let mut tokens = TokenStream::new(vec![text_token("ABCDEFGHIJKLMNO`Q")]);
    let err = compile_text_append(&mut tokens).unwrap_err();
    assert_eq!(err.code, ErrorCode::CAPACITY_EXCEEDED);
    assert!(err.message.contains("14 characters"), "{}", err.message);
}

#[test]
fn test_text_native_characters() {
    assert_eq!(
        compile_text(&text_token("Σ@`@x\u{0304}")).unwrap(),
        vec![0xF4, 126, 13, 64, 2]
    );
}

#[test]
fn test_text_escape_backtracking_inside_literal() {
    // `256 is byte 25 followed by a plain '6'
    assert_eq!(
        compile_text(&text_token("`256")).unwrap(),
        vec![0xF2, 25, b'6']
    );
}

#[test]
fn test_text_malformed_escape() {
    let err = compile_text(&text_token("AB`xG")).unwrap_err();
    assert_eq!(err.code, ErrorCode::MALFORMED_ESCAPE);
    // `"AB`xG"`: the G sits at column 6
    assert_eq!(err.span, Span::point(1, 6));
    assert!(err.message.contains("position 2"), "{}", err.message);
}

#[test]
fn test_text_unsupported_character() {
    let err = compile_text(&text_token("1€")).unwrap_err();
    assert_eq!(err.code, ErrorCode::UNSUPPORTED_CHARACTER);
    assert!(err.message.contains('€'), "{}", err.message);
    assert_eq!(err.span, Span::point(1, 3));
}

#[test]
fn test_text_wrong_token_kind() {
    let err = compile_text(&number_token("12")).unwrap_err();
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.message, "Text expected \"12\" at 1:1");
}

// ══════════════════════════════════════════════════════════════════════════════
// Append
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_append_header_and_marker() {
    let mut tokens = TokenStream::new(vec![text_token("HELLO")]);
    assert_eq!(
        compile_text_append(&mut tokens).unwrap(),
        vec![0xF6, 0x7F, b'H', b'E', b'L', b'L', b'O']
    );
}

#[test]
fn test_append_from_source() {
    assert_eq!(
        compile_one(">\"HELLO\""),
        vec![0xF6, 0x7F, b'H', b'E', b'L', b'L', b'O']
    );
}

#[test]
fn test_append_requires_text() {
    let mut tokens = TokenStream::new(vec![Token::new(
        TokenKind::Identifier("STO".into()),
        Span::new(1, 3, 1, 5),
    )]);
    let err = compile_text_append(&mut tokens).unwrap_err();
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert!(err.message.contains("\"STO\""), "{}", err.message);
    assert!(err.message.contains("1:3"), "{}", err.message);
}

#[test]
fn test_append_without_text_at_end_of_line() {
    let results = compile_source(">\n\"A\"");
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].as_ref().unwrap_err().code, ErrorCode::UNEXPECTED_TOKEN);
    // the next line is untouched by the failed statement
    assert_eq!(results[1], Ok(vec![0xF1, b'A']));
}

// ══════════════════════════════════════════════════════════════════════════════
// Dispatch
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_classify() {
    assert!(matches!(
        Statement::classify(number_token("1")),
        Ok(Statement::Number(_))
    ));
    assert!(matches!(
        Statement::classify(text_token("A")),
        Ok(Statement::Text(_))
    ));
    assert_eq!(
        Statement::classify(Token::new(TokenKind::Append, Span::point(1, 1))),
        Ok(Statement::AppendText)
    );
    let err = Statement::classify(Token::new(
        TokenKind::Identifier("RTN".into()),
        Span::point(4, 1),
    ))
    .unwrap_err();
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert!(err.message.contains("RTN"));
    assert_eq!(err.span.start_line, 4);
}

#[test]
fn test_compile_statement_dispatch() {
    let mut none = TokenStream::new(Vec::new());
    assert_eq!(
        compile_statement(&Statement::Number(number_token("1")), &mut none),
        Ok(vec![0x11])
    );
    assert_eq!(
        compile_statement(&Statement::Text(text_token("A")), &mut none),
        Ok(vec![0xF1, b'A'])
    );
    let mut tokens = TokenStream::new(vec![text_token("A")]);
    assert_eq!(
        compile_statement(&Statement::AppendText, &mut tokens),
        Ok(vec![0xF2, 0x7F, b'A'])
    );
}

#[test]
fn test_compile_line_through_trait_object() {
    let mut stream = TokenStream::new(vec![text_token("Z")]);
    let source: &mut dyn focal_lexer::TokenSource = &mut stream;
    assert_eq!(compile_line(source), Some(Ok(vec![0xF1, b'Z'])));
}

// ══════════════════════════════════════════════════════════════════════════════
// Line driving
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_program_lines() {
    let results = compile_source("// greeting\n\"HI\"\n\n>\" THERE\"\n1.5\n");
    assert_eq!(
        results,
        vec![
            Ok(vec![0xF2, b'H', b'I']),
            Ok(vec![0xF7, 0x7F, b' ', b'T', b'H', b'E', b'R', b'E']),
            Ok(vec![0x11, 0x1A, 0x15]),
        ]
    );
}

#[test]
fn test_trailing_token_is_an_error() {
    let results = compile_source("\"A\" \"B\"\n2");
    let err = results[0].as_ref().unwrap_err();
    assert_eq!(err.code, ErrorCode::UNEXPECTED_TOKEN);
    assert_eq!(err.span.start_col, 5);
    assert_eq!(results[1], Ok(vec![0x12]));
}

#[test]
fn test_errors_do_not_stop_later_lines() {
    let results = compile_source("\"ABCDEFGHIJKLMNOPQ\"\nSTO 05\n\"OK\"");
    assert_eq!(results.len(), 3);
    assert_eq!(
        results[0].as_ref().unwrap_err().code,
        ErrorCode::CAPACITY_EXCEEDED
    );
    assert_eq!(
        results[1].as_ref().unwrap_err().code,
        ErrorCode::UNEXPECTED_TOKEN
    );
    assert_eq!(results[2], Ok(vec![0xF2, b'O', b'K']));
}

#[test]
fn test_error_position_from_source() {
    let source = "1\n  \"AB`Q\"";
    let results = compile_source(source);
    let err = results[1].as_ref().unwrap_err();
    assert_eq!(err.code, ErrorCode::MALFORMED_ESCAPE);
    // line 2: two spaces, quote, A, B, backtick, Q → the Q is column 7
    assert_eq!(err.span, Span::point(2, 7));
    let sf = SourceFile::new("test.focal", source);
    assert_eq!(sf.char_at(err.span), Some('Q'));
}

#[test]
fn test_compile_errors_carry_source_line() {
    let results = compile_source("1\n\"ABCDEFGHIJKLMNOPQ\"\n>\"`xZ\" // bad\nRTN");
    assert_eq!(
        results[1].as_ref().unwrap_err().source_line,
        "\"ABCDEFGHIJKLMNOPQ\""
    );
    assert_eq!(
        results[2].as_ref().unwrap_err().source_line,
        ">\"`xZ\" // bad"
    );
    assert_eq!(results[3].as_ref().unwrap_err().source_line, "RTN");

    let json = results[1].as_ref().unwrap_err().to_json();
    assert!(json.contains("\"source_line\""), "{json}");
}

#[test]
fn test_hand_built_tokens_have_no_source_line() {
    let mut stream = TokenStream::new(vec![text_token("ABCDEFGHIJKLMNOPQ")]);
    let err = compile_line(&mut stream).unwrap().unwrap_err();
    assert_eq!(err.code, ErrorCode::CAPACITY_EXCEEDED);
    assert!(err.source_line.is_empty());
}

#[test]
fn test_error_json_shape() {
    let err = compile_text(&text_token("ABCDEFGHIJKLMNOPQ")).unwrap_err();
    let json = serde_json::to_string(&err).unwrap();
    assert!(json.contains("\"code\":300"), "{json}");
    assert!(json.contains("\"category\":\"capacity\""), "{json}");
    assert!(json.contains("\"line\":1"), "{json}");
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_codegen_determinism_100_iterations() {
    let source = "\"Σx\u{0304}`b101\"\n-1.5E-3\n>\"`@`255\"";
    let first = compile_source(source);
    for i in 0..100 {
        assert_eq!(first, compile_source(source), "Determinism failure at iteration {i}");
    }
}

#[test]
fn test_statements_compile_in_parallel() {
    let handles: Vec<_> = ["\"A\"", "\"BB\"", "-1", ">\"C\""]
        .into_iter()
        .map(|src| std::thread::spawn(move || compile_one(src)))
        .collect();
    let results: Vec<Vec<u8>> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(
        results,
        vec![
            vec![0xF1, b'A'],
            vec![0xF2, b'B', b'B'],
            vec![0x1C, 0x11],
            vec![0xF2, 0x7F, b'C'],
        ]
    );
}
