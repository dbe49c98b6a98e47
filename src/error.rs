use thiserror::Error;

/// Errors surfaced by the reader and evaluator.
///
/// Lexer failures are not errors at this level: they travel through the token
/// stream as `Token::Error` and only become a `LispError` when the reader
/// refuses them. No variant is fatal to a session; the driver reports the
/// error and moves on to the next form.
#[derive(Debug, Error)]
pub enum LispError {
    #[error("lex error: {message}: {literal:?}")]
    Lex { message: String, literal: String },

    #[error("invalid token")]
    InvalidToken,

    #[error("undefined identifier: {0}")]
    UndefinedIdent(String),

    #[error("operator is not a procedure")]
    OperatorIsNotAProcedure,

    #[error("wrong number of arguments")]
    WrongNumberOfArguments,

    #[error("number expected")]
    NumberExpected,

    #[error("divide by zero")]
    DivideByZero,

    #[error("bad argument")]
    BadArgument,

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl LispError {
    /// True when a call-position failure may be tolerated by the evaluator
    /// (a literal or quoted head is not a procedure but is still a value).
    pub fn is_not_a_procedure(&self) -> bool {
        matches!(self, LispError::OperatorIsNotAProcedure)
    }
}
