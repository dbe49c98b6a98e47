use std::fmt;
use std::rc::Rc;

use crate::error::LispError;
use crate::interner::InternedSymbol;
use crate::interpreter::Environment;
use crate::numeric::NumericType;
use crate::runtime::Runtime;

// ============================================================================
// Core Type System
// ============================================================================

/// Lexical class of an operator symbol. Operators resolve through the
/// environment exactly like identifiers, but live in their own namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperatorKind {
    Relational,
    Arithmetic,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PairCell {
    pub car: Value,
    pub cdr: Value,
}

/// Native procedure: receives the *unevaluated* argument list and evaluates
/// operands itself through the evaluator, so quoting and laziness compose.
pub type NativeFn = fn(&Value, &mut Runtime) -> Result<Value, LispError>;

#[derive(Clone)]
pub enum LambdaBody {
    Native(NativeFn),
    User {
        params: Vec<InternedSymbol>,
        body: Vec<Value>,
        env: Environment,
    },
}

#[derive(Clone)]
pub struct LambdaCell {
    pub body: LambdaBody,
}

impl fmt::Debug for LambdaCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.body {
            LambdaBody::Native(_) => f.write_str("LambdaCell(<native>)"),
            LambdaBody::User { params, .. } => f
                .debug_struct("LambdaCell")
                .field("params", params)
                .field("env", &"<environment>")
                .finish(),
        }
    }
}

/// A runtime datum. The variant set is closed; the evaluator's dispatch is an
/// exhaustive match over these tags.
#[derive(Clone, Debug)]
pub enum Value {
    Nil,
    Pair(Rc<PairCell>),
    Number(NumericType),
    Bool(bool),
    Char(char),
    Str(String),
    Identifier(InternedSymbol),
    Operator {
        kind: OperatorKind,
        literal: InternedSymbol,
    },
    Quote(Rc<Value>),
    Lambda(Rc<LambdaCell>),
    Void,
}

// Manual PartialEq: lambdas compare by identity, everything else structurally.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Pair(a), Value::Pair(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Char(a), Value::Char(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Identifier(a), Value::Identifier(b)) => a == b,
            (
                Value::Operator { kind: ak, literal: al },
                Value::Operator { kind: bk, literal: bl },
            ) => ak == bk && al == bl,
            (Value::Quote(a), Value::Quote(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => Rc::ptr_eq(a, b),
            (Value::Void, Value::Void) => true,
            _ => false,
        }
    }
}

impl Value {
    pub fn number(n: NumericType) -> Value {
        Value::Number(n)
    }

    pub fn int(n: i64) -> Value {
        Value::Number(NumericType::Int(n))
    }

    pub fn identifier(name: &str) -> Value {
        Value::Identifier(InternedSymbol::new(name))
    }

    /// The bare quote marker the reader conses in front of a quoted datum.
    pub fn quote_marker() -> Value {
        Value::Quote(Rc::new(Value::Nil))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Value::Number(_))
    }

    /// Only an explicit `#f` is false; everything else, nil included, counts
    /// as true.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Bool(false))
    }
}

// ============================================================================
// Primitive Operations
// ============================================================================

pub fn cons(car: Value, cdr: Value) -> Value {
    // An empty head with an empty tail is just the empty list.
    if car.is_nil() && cdr.is_nil() {
        return Value::Nil;
    }
    Value::Pair(Rc::new(PairCell { car, cdr }))
}

pub fn car(value: &Value) -> Result<Value, LispError> {
    match value {
        Value::Pair(cell) => Ok(cell.car.clone()),
        _ => Err(LispError::BadArgument),
    }
}

pub fn cdr(value: &Value) -> Result<Value, LispError> {
    match value {
        Value::Pair(cell) => Ok(cell.cdr.clone()),
        _ => Err(LispError::BadArgument),
    }
}

/// Reverse a proper list, preserving the `Nil` terminator. A non-pair input
/// is returned unchanged.
pub fn reverse(input: &Value) -> Value {
    let mut output = Value::Nil;
    let mut current = input.clone();
    while let Value::Pair(cell) = current {
        output = cons(cell.car.clone(), output);
        current = cell.cdr.clone();
    }
    if matches!(input, Value::Pair(_)) {
        output
    } else {
        input.clone()
    }
}

/// Collect the elements of a list into a Vec, stopping at the terminator.
pub fn list_to_vec(list: &Value) -> Vec<Value> {
    let mut result = Vec::new();
    let mut current = list.clone();
    while let Value::Pair(cell) = current {
        result.push(cell.car.clone());
        current = cell.cdr.clone();
    }
    result
}

pub fn vec_to_list(items: Vec<Value>) -> Value {
    items
        .into_iter()
        .rev()
        .fold(Value::Nil, |acc, item| cons(item, acc))
}

// ============================================================================
// Rendering
// ============================================================================

fn escape_string(s: &str) -> String {
    let mut result = String::new();
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\t' => result.push_str("\\t"),
            '\r' => result.push_str("\\r"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c => result.push(c),
        }
    }
    result
}

fn write_char(c: char) -> String {
    match c {
        '\n' => "#\\newline".to_string(),
        ' ' => "#\\space".to_string(),
        '\t' => "#\\tab".to_string(),
        c => format!("#\\{c}"),
    }
}

impl Value {
    /// The form `display` prints: strings raw, characters bare.
    pub fn display_string(&self) -> String {
        match self {
            Value::Str(s) => s.clone(),
            Value::Char(c) => c.to_string(),
            Value::Pair(_) => self.render_list(true),
            Value::Quote(inner) => inner.display_string(),
            _ => self.write_string(),
        }
    }

    /// The form `write` prints: strings quoted and escaped, characters as
    /// `#\…` literals. This is also the `Display` rendering.
    pub fn write_string(&self) -> String {
        match self {
            Value::Nil => "()".to_string(),
            Value::Pair(_) => self.render_list(false),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => if *b { "#t" } else { "#f" }.to_string(),
            Value::Char(c) => write_char(*c),
            Value::Str(s) => format!("\"{}\"", escape_string(s)),
            Value::Identifier(name) => name.resolve(),
            Value::Operator { literal, .. } => literal.resolve(),
            Value::Quote(inner) => format!("'{}", inner.write_string()),
            Value::Lambda(_) => "#<procedure>".to_string(),
            Value::Void => String::new(),
        }
    }

    fn render_list(&self, display: bool) -> String {
        let form = |v: &Value| {
            if display {
                v.display_string()
            } else {
                v.write_string()
            }
        };
        let mut out = String::from("(");
        let mut current = self.clone();
        let mut first = true;
        while let Value::Pair(cell) = current {
            if !first {
                out.push(' ');
            }
            first = false;
            out.push_str(&form(&cell.car));
            match &cell.cdr {
                Value::Nil => break,
                Value::Pair(_) => current = cell.cdr.clone(),
                other => {
                    out.push_str(" . ");
                    out.push_str(&form(other));
                    break;
                }
            }
        }
        out.push(')');
        out
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.write_string())
    }
}
