pub mod error;
pub mod interner;
pub mod interpreter;
pub mod language;
pub mod lexer;
pub mod numeric;
pub mod parser;
pub mod runtime;
pub mod stdlib;

// Re-export commonly used items for convenience
pub use error::LispError;
pub use interner::InternedSymbol;
pub use interpreter::{apply, eval, Environment};
pub use language::{cons, LambdaBody, LambdaCell, OperatorKind, PairCell, Value};
pub use lexer::{Lexer, Token};
pub use numeric::NumericType;
pub use parser::{parse, Reader};
pub use runtime::Runtime;
