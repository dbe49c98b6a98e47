//! Token-level tests for the lexer.

use skim::{Lexer, Token};

fn all_tokens(input: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(input);
    let mut out = Vec::new();
    loop {
        match lexer.next_token() {
            Token::Eof => return out,
            tok => out.push(tok),
        }
    }
}

// ============================================================================
// Structural Tokens
// ============================================================================

#[test]
fn test_parens_brackets_quote() {
    assert_eq!(
        all_tokens("()[]'"),
        vec![
            Token::LParen,
            Token::RParen,
            Token::LBracket,
            Token::RBracket,
            Token::Quote,
        ]
    );
}

#[test]
fn test_whitespace_is_skipped() {
    assert_eq!(
        all_tokens("  ( \n\t 1 )  "),
        vec![Token::LParen, Token::Int(1), Token::RParen]
    );
}

// ============================================================================
// Atoms
// ============================================================================

#[test]
fn test_identifiers() {
    assert_eq!(
        all_tokens("foo bar_2 x"),
        vec![
            Token::Ident("foo".to_string()),
            Token::Ident("bar_2".to_string()),
            Token::Ident("x".to_string()),
        ]
    );
}

#[test]
fn test_colon_identifier_keeps_both_spellings() {
    assert_eq!(
        all_tokens(":key"),
        vec![Token::ColonIdent {
            literal: ":key".to_string(),
            name: "key".to_string(),
        }]
    );
}

#[test]
fn test_integers() {
    assert_eq!(all_tokens("0 42 -7"), vec![
        Token::Int(0),
        Token::Int(42),
        Token::Int(-7),
    ]);
}

#[test]
fn test_minus_followed_by_space_is_an_operator() {
    assert_eq!(
        all_tokens("- 7"),
        vec![Token::Arithmetic("-".to_string()), Token::Int(7)]
    );
}

#[test]
fn test_fractional_literal_is_a_lex_error() {
    match &all_tokens("3.14")[0] {
        Token::Error { literal, message } => {
            assert_eq!(literal, "3.14");
            assert_eq!(message, "malformed number");
        }
        other => panic!("expected error token, got {other:?}"),
    }
}

#[test]
fn test_negative_fractional_keeps_sign_in_literal() {
    match &all_tokens("-3.14")[0] {
        Token::Error { literal, .. } => assert_eq!(literal, "-3.14"),
        other => panic!("expected error token, got {other:?}"),
    }
}

#[test]
fn test_string_contents_are_raw() {
    assert_eq!(
        all_tokens(r#""hi \n there""#),
        vec![Token::Str("hi \\n there".to_string())]
    );
}

#[test]
fn test_unterminated_string_is_lenient() {
    assert_eq!(all_tokens("\"open"), vec![Token::Str("open".to_string())]);
}

#[test]
fn test_booleans_and_chars() {
    assert_eq!(
        all_tokens("#t #f #\\a #\\ "),
        vec![
            Token::Bool(true),
            Token::Bool(false),
            Token::Char('a'),
            Token::Char(' '),
        ]
    );
}

#[test]
fn test_bad_hash_literal() {
    match &all_tokens("#q")[0] {
        Token::Error { literal, message } => {
            assert_eq!(literal, "#q");
            assert_eq!(message, "invalid boolean literal");
        }
        other => panic!("expected error token, got {other:?}"),
    }
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_relational_operators() {
    assert_eq!(
        all_tokens("< <= > >= ="),
        vec![
            Token::Relational("<".to_string()),
            Token::Relational("<=".to_string()),
            Token::Relational(">".to_string()),
            Token::Relational(">=".to_string()),
            Token::Relational("=".to_string()),
        ]
    );
}

#[test]
fn test_arithmetic_operators() {
    assert_eq!(
        all_tokens("+ - * / %"),
        vec![
            Token::Arithmetic("+".to_string()),
            Token::Arithmetic("-".to_string()),
            Token::Arithmetic("*".to_string()),
            Token::Arithmetic("/".to_string()),
            Token::Arithmetic("%".to_string()),
        ]
    );
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_lexing_continues_past_an_error_token() {
    let toks = all_tokens("(+ 1 2.5 3)");
    assert_eq!(toks[0], Token::LParen);
    assert_eq!(toks[1], Token::Arithmetic("+".to_string()));
    assert_eq!(toks[2], Token::Int(1));
    assert!(matches!(toks[3], Token::Error { .. }));
    assert_eq!(toks[4], Token::Int(3));
    assert_eq!(toks[5], Token::RParen);
}

#[test]
fn test_unexpected_character_is_consumed() {
    let toks = all_tokens("^ 1");
    assert!(matches!(&toks[0], Token::Error { message, .. }
        if message == "unexpected character"));
    assert_eq!(toks[1], Token::Int(1));
}

#[test]
fn test_eof_is_sticky() {
    let mut lexer = Lexer::new("x");
    assert_eq!(lexer.next_token(), Token::Ident("x".to_string()));
    assert_eq!(lexer.next_token(), Token::Eof);
    assert_eq!(lexer.next_token(), Token::Eof);
}

#[test]
fn test_literal_round_trips_source_text() {
    for tok in all_tokens("( ) foo 42 \"s\" #t #\\z < + :k") {
        let lit = tok.literal();
        assert!(!lit.is_empty(), "token {tok:?} lost its literal");
    }
}
