use crate::error::LispError;
use crate::interner::InternedSymbol;
use crate::language::{cons, reverse, OperatorKind, Value};
use crate::lexer::{Lexer, Token};
use crate::numeric::NumericType;

// ============================================================================
// Reader
// ============================================================================

/// Assembles complete data from the token stream, one datum per call.
pub struct Reader<'a> {
    lexer: &'a mut Lexer,
}

/// Map an atom token to its Value. Tokens with no datum counterpart
/// (colon-idents, char literals, brackets) are not atoms.
fn atom_value(token: &Token) -> Option<Value> {
    match token {
        Token::Ident(name) => Some(Value::Identifier(InternedSymbol::new(name))),
        Token::Int(n) => Some(Value::Number(NumericType::Int(*n))),
        Token::Bool(b) => Some(Value::Bool(*b)),
        Token::Str(s) => Some(Value::Str(s.clone())),
        Token::Relational(op) => Some(Value::Operator {
            kind: OperatorKind::Relational,
            literal: InternedSymbol::new(op),
        }),
        Token::Arithmetic(op) => Some(Value::Operator {
            kind: OperatorKind::Arithmetic,
            literal: InternedSymbol::new(op),
        }),
        _ => None,
    }
}

impl<'a> Reader<'a> {
    pub fn new(lexer: &'a mut Lexer) -> Self {
        Reader { lexer }
    }

    /// Read one complete datum. End of input before any datum yields `Void`,
    /// which the driver treats as "no more forms".
    pub fn read_datum(&mut self) -> Result<Value, LispError> {
        match self.lexer.next_token() {
            Token::Eof => Ok(Value::Void),
            Token::LParen => self.read_list(),
            // Quoting binds to exactly the next datum.
            Token::Quote => {
                let datum = self.read_datum()?;
                Ok(cons(Value::quote_marker(), datum))
            }
            Token::Error { literal, message } => Err(LispError::Lex { message, literal }),
            other => match atom_value(&other) {
                Some(value) => Ok(value),
                None => Err(LispError::InvalidToken),
            },
        }
    }

    /// Read the elements of a list whose opening paren has been consumed.
    /// Elements are accumulated by prepending and flipped back into source
    /// order at the closing paren. A missing closing paren is tolerated: the
    /// list read so far is returned.
    fn read_list(&mut self) -> Result<Value, LispError> {
        let mut acc = Value::Nil;
        loop {
            match self.lexer.next_token() {
                Token::RParen | Token::Eof => {
                    return Ok(if acc.is_nil() { Value::Nil } else { reverse(&acc) });
                }
                Token::LParen => {
                    let nested = self.read_list()?;
                    acc = cons(nested, acc);
                }
                Token::Quote => {
                    let datum = self.read_datum()?;
                    acc = cons(cons(Value::quote_marker(), datum), acc);
                }
                Token::Error { literal, message } => {
                    return Err(LispError::Lex { message, literal });
                }
                other => match atom_value(&other) {
                    Some(value) => acc = cons(value, acc),
                    None => return Err(LispError::InvalidToken),
                },
            }
        }
    }
}

/// Read a single datum out of a source string.
pub fn parse(input: &str) -> Result<Value, LispError> {
    let mut lexer = Lexer::new(input);
    Reader::new(&mut lexer).read_datum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::list_to_vec;

    #[test]
    fn list_elements_keep_source_order() {
        let v = parse("(1 2 3 4)").unwrap();
        assert_eq!(v.write_string(), "(1 2 3 4)");
    }

    #[test]
    fn nested_lists_nest() {
        let v = parse("(1 (2 3) 4)").unwrap();
        assert_eq!(v.write_string(), "(1 (2 3) 4)");
    }

    #[test]
    fn empty_list_reads_as_nil() {
        assert_eq!(parse("()").unwrap(), Value::Nil);
    }

    #[test]
    fn quote_wraps_next_datum_only() {
        let v = parse("(a 'b c)").unwrap();
        let elems = list_to_vec(&v);
        assert_eq!(elems.len(), 3);
        assert!(matches!(&elems[1], Value::Pair(cell)
            if matches!(cell.car, Value::Quote(_))));
        assert_eq!(elems[2].write_string(), "c");
    }

    #[test]
    fn stray_rparen_is_invalid() {
        assert!(matches!(parse(")"), Err(LispError::InvalidToken)));
    }

    #[test]
    fn error_token_in_a_list_is_a_lex_error() {
        assert!(matches!(parse("(1 12.5)"), Err(LispError::Lex { .. })));
    }

    #[test]
    fn char_token_is_not_data() {
        assert!(matches!(parse("#\\a"), Err(LispError::InvalidToken)));
        assert!(matches!(parse("(1 #\\a)"), Err(LispError::InvalidToken)));
    }

    #[test]
    fn unterminated_list_is_lenient() {
        let v = parse("(1 2").unwrap();
        assert_eq!(v.write_string(), "(1 2)");
    }

    #[test]
    fn top_level_atom_reads_as_itself() {
        assert_eq!(parse("42").unwrap(), Value::int(42));
        assert_eq!(parse("#t").unwrap(), Value::Bool(true));
    }

    #[test]
    fn empty_input_reads_void() {
        assert_eq!(parse("").unwrap(), Value::Void);
    }
}
