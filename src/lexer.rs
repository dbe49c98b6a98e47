// ============================================================================
// Lexer
// ============================================================================

/// One lexical token. `Error` is an ordinary member of the stream: the lexer
/// never halts, and callers may keep pulling tokens after a bad literal.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    LParen,
    RParen,
    LBracket,
    RBracket,
    Quote,
    Ident(String),
    ColonIdent { literal: String, name: String },
    Int(i64),
    Str(String),
    Bool(bool),
    Char(char),
    Relational(String),
    Arithmetic(String),
    Error { literal: String, message: String },
    Eof,
}

impl Token {
    /// The source text this token was lexed from.
    pub fn literal(&self) -> String {
        match self {
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::LBracket => "[".to_string(),
            Token::RBracket => "]".to_string(),
            Token::Quote => "'".to_string(),
            Token::Ident(name) => name.clone(),
            Token::ColonIdent { literal, .. } => literal.clone(),
            Token::Int(n) => n.to_string(),
            Token::Str(s) => format!("\"{s}\""),
            Token::Bool(b) => if *b { "#t" } else { "#f" }.to_string(),
            Token::Char(c) => format!("#\\{c}"),
            Token::Relational(op) | Token::Arithmetic(op) => op.clone(),
            Token::Error { literal, .. } => literal.clone(),
            Token::Eof => String::new(),
        }
    }
}

/// A forward-only tokenizer over a character source. Each `next_token` call
/// consumes exactly the characters of one token (plus any leading
/// whitespace); once the input is exhausted it yields `Eof` forever.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
        }
    }

    fn current_char(&self) -> char {
        if self.position < self.input.len() {
            self.input[self.position]
        } else {
            '\0'
        }
    }

    fn peek_ahead(&self, n: usize) -> char {
        if self.position + n < self.input.len() {
            self.input[self.position + n]
        } else {
            '\0'
        }
    }

    fn advance(&mut self) {
        if self.position < self.input.len() {
            self.position += 1;
        }
    }

    fn is_eof(&self) -> bool {
        self.position >= self.input.len()
    }

    fn skip_whitespace(&mut self) {
        while !self.is_eof() && self.current_char().is_whitespace() {
            self.advance();
        }
    }

    /// Consume characters while `keep` holds, starting only if the first
    /// character satisfies `start`.
    fn collect_chars(&mut self, start: fn(char) -> bool, keep: fn(char) -> bool) -> String {
        let mut text = String::new();
        if self.is_eof() || !start(self.current_char()) {
            return text;
        }
        text.push(self.current_char());
        self.advance();
        while !self.is_eof() && keep(self.current_char()) {
            text.push(self.current_char());
            self.advance();
        }
        text
    }

    // ========================================================================
    // Token Rules
    // ========================================================================

    /// Digits and dots are collected together; only the integer parse is
    /// supported, so `12.5` surfaces as an `Error` token carrying the text.
    fn read_number(&mut self) -> Token {
        let text = self.collect_chars(
            |c| c.is_ascii_digit(),
            |c| c.is_ascii_digit() || c == '.',
        );
        match text.parse::<i64>() {
            Ok(n) => Token::Int(n),
            Err(_) => Token::Error {
                literal: text,
                message: "malformed number".to_string(),
            },
        }
    }

    fn read_identifier(&mut self) -> Token {
        let name = self.collect_chars(
            |c| c.is_alphabetic(),
            |c| c.is_alphanumeric() || c == '_',
        );
        Token::Ident(name)
    }

    fn read_colon_ident(&mut self) -> Token {
        self.advance(); // ':'
        let name = self.collect_chars(
            |c| c.is_alphabetic(),
            |c| c.is_alphanumeric() || c == '_',
        );
        Token::ColonIdent {
            literal: format!(":{name}"),
            name,
        }
    }

    /// Raw string contents between double quotes; no escape processing.
    /// A missing closing quote ends the string at EOF (lenient).
    fn read_string(&mut self) -> Token {
        self.advance(); // opening '"'
        let mut content = String::new();
        while !self.is_eof() && self.current_char() != '"' {
            content.push(self.current_char());
            self.advance();
        }
        if !self.is_eof() {
            self.advance(); // closing '"'
        }
        Token::Str(content)
    }

    fn read_relational(&mut self) -> Token {
        let start = self.current_char();
        self.advance();
        if matches!(start, '<' | '>') && self.current_char() == '=' {
            self.advance();
            return Token::Relational(format!("{start}="));
        }
        Token::Relational(start.to_string())
    }

    /// `-` directly followed by a digit is a negative number, not the
    /// subtraction operator; everything else in `+ - * / %` is an operator.
    fn read_arithmetic_or_number(&mut self) -> Token {
        let op = self.current_char();
        self.advance();
        if op == '-' && self.current_char().is_ascii_digit() {
            return match self.read_number() {
                Token::Int(n) => Token::Int(-n),
                Token::Error { literal, message } => Token::Error {
                    literal: format!("-{literal}"),
                    message,
                },
                other => other,
            };
        }
        Token::Arithmetic(op.to_string())
    }

    /// `#t`/`#f` booleans and `#\c` character literals; anything else after
    /// `#` is a lex error. The offending character is consumed so the stream
    /// keeps moving.
    fn read_hash_literal(&mut self) -> Token {
        self.advance(); // '#'
        match self.current_char() {
            't' => {
                self.advance();
                Token::Bool(true)
            }
            'f' => {
                self.advance();
                Token::Bool(false)
            }
            '\\' => {
                self.advance();
                if self.is_eof() {
                    return Token::Error {
                        literal: "#\\".to_string(),
                        message: "invalid boolean literal".to_string(),
                    };
                }
                let c = self.current_char();
                self.advance();
                Token::Char(c)
            }
            other => {
                if !self.is_eof() {
                    self.advance();
                }
                Token::Error {
                    literal: format!("#{other}"),
                    message: "invalid boolean literal".to_string(),
                }
            }
        }
    }

    // ========================================================================
    // Main Tokenization
    // ========================================================================

    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        if self.is_eof() {
            return Token::Eof;
        }

        let ch = self.current_char();

        if ch.is_ascii_digit() {
            return self.read_number();
        }
        if ch.is_alphabetic() {
            return self.read_identifier();
        }

        match ch {
            '(' => {
                self.advance();
                Token::LParen
            }
            ')' => {
                self.advance();
                Token::RParen
            }
            '[' => {
                self.advance();
                Token::LBracket
            }
            ']' => {
                self.advance();
                Token::RBracket
            }
            ':' => self.read_colon_ident(),
            '"' => self.read_string(),
            '\'' => {
                self.advance();
                Token::Quote
            }
            '<' | '>' | '=' => self.read_relational(),
            '+' | '-' | '*' | '/' | '%' => self.read_arithmetic_or_number(),
            '#' => self.read_hash_literal(),
            other => {
                self.advance();
                Token::Error {
                    literal: other.to_string(),
                    message: "unexpected character".to_string(),
                }
            }
        }
    }
}
