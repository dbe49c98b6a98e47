use std::io::{self, Write};

use crate::interpreter::{eval, Environment};
use crate::language::Value;
use crate::lexer::Lexer;
use crate::parser::Reader;
use crate::stdlib;

/// Process-wide evaluation context: an output sink, an error sink, and the
/// root environment with the standard bindings pre-registered.
///
/// One `Runtime` lives for the duration of a session. Sinks are pluggable so
/// hosts and tests can capture what `display` and friends produce.
pub struct Runtime {
    pub out: Box<dyn Write>,
    pub err: Box<dyn Write>,
    pub env: Environment,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}

impl Runtime {
    /// A runtime writing to the process stdout/stderr.
    pub fn new() -> Self {
        Self::with_sinks(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    /// A runtime writing to the given sinks.
    pub fn with_sinks(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        let env = Environment::new();
        stdlib::register(&env);
        Runtime { out, err, env }
    }

    /// Read and evaluate every form in `source`. A form that fails to read
    /// or evaluate is reported on the error sink and the next form is
    /// attempted; no error here ends the session. Returns the last
    /// successful result and the number of failed forms.
    pub fn run_source(&mut self, source: &str) -> (Option<Value>, usize) {
        let mut lexer = Lexer::new(source);
        let mut reader = Reader::new(&mut lexer);
        let mut last = None;
        let mut failures = 0;
        loop {
            // Void only comes back at end of input; it has no written syntax.
            match reader.read_datum() {
                Ok(Value::Void) => return (last, failures),
                Ok(datum) => match eval(&datum, self) {
                    Ok(value) => last = Some(value),
                    Err(e) => {
                        failures += 1;
                        let _ = writeln!(self.err, "error: {e}");
                    }
                },
                Err(e) => {
                    failures += 1;
                    let _ = writeln!(self.err, "error: {e}");
                }
            }
        }
    }
}
