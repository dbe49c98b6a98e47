//! Native procedures and the default environment bindings.
//!
//! Builtins receive their argument list unevaluated and pull operands
//! through the evaluator themselves, so quoted data and nested forms both
//! work as operands.

use std::io::Write;
use std::rc::Rc;

use crate::error::LispError;
use crate::interner::InternedSymbol;
use crate::interpreter::{eval, Environment};
use crate::language::{car, list_to_vec, LambdaBody, LambdaCell, NativeFn, Value};
use crate::numeric::NumericType;
use crate::runtime::Runtime;

// ============================================================================
// Helpers
// ============================================================================

/// Evaluate `val` if it is not already numeric, then require a number.
fn eval_to_number(val: &Value, rt: &mut Runtime) -> Result<NumericType, LispError> {
    if let Value::Number(n) = val {
        return Ok(*n);
    }
    match eval(val, rt)? {
        Value::Number(n) => Ok(n),
        _ => Err(LispError::NumberExpected),
    }
}

fn eval_operands(args: &Value, rt: &mut Runtime) -> Result<Vec<Value>, LispError> {
    let mut out = Vec::new();
    for arg in list_to_vec(args) {
        out.push(eval(&arg, rt)?);
    }
    Ok(out)
}

// ============================================================================
// Arithmetic
// ============================================================================

/// (+) => 0; (+ a) => a; (+ a b …) folds left.
fn sum(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = list_to_vec(args);
    if operands.is_empty() {
        return Ok(Value::int(0));
    }
    let mut acc = eval_to_number(&operands[0], rt)?;
    for operand in &operands[1..] {
        let rhs = eval_to_number(operand, rt)?;
        acc = acc.add(&rhs);
    }
    Ok(Value::Number(acc))
}

/// (-) => 0; (- a) => a unchanged; (- a b c) => a-b-c.
fn difference(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = list_to_vec(args);
    if operands.is_empty() {
        return Ok(Value::int(0));
    }
    let mut acc = eval_to_number(&operands[0], rt)?;
    for operand in &operands[1..] {
        let rhs = eval_to_number(operand, rt)?;
        acc = acc.sub(&rhs);
    }
    Ok(Value::Number(acc))
}

/// (*) => 1; (* a) => a; (* a b …) folds left.
fn product(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = list_to_vec(args);
    if operands.is_empty() {
        return Ok(Value::int(1));
    }
    let mut acc = eval_to_number(&operands[0], rt)?;
    for operand in &operands[1..] {
        let rhs = eval_to_number(operand, rt)?;
        acc = acc.mul(&rhs);
    }
    Ok(Value::Number(acc))
}

/// (/ a b …) with at least two operands; any zero divisor is an error.
fn quotient(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = list_to_vec(args);
    if operands.len() < 2 {
        return Err(LispError::WrongNumberOfArguments);
    }
    let mut acc = eval_to_number(&operands[0], rt)?;
    for operand in &operands[1..] {
        let rhs = eval_to_number(operand, rt)?;
        acc = acc.div(&rhs)?;
    }
    Ok(Value::Number(acc))
}

/// (modulo a b …) pairwise, left to right; zero divisors are errors.
fn remainder(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = list_to_vec(args);
    if operands.len() < 2 {
        return Err(LispError::WrongNumberOfArguments);
    }
    let mut acc = eval_to_number(&operands[0], rt)?;
    for operand in &operands[1..] {
        let rhs = eval_to_number(operand, rt)?;
        acc = acc.rem(&rhs)?;
    }
    Ok(Value::Number(acc))
}

// ============================================================================
// Relational Comparison
// ============================================================================

/// Chained comparison: every adjacent pair must satisfy the relation.
/// Zero operands are vacuously true; one operand is true iff it is numeric;
/// a non-numeric operand anywhere makes the whole chain false rather than
/// erroring. Every operand is still evaluated and type-checked.
fn compare_chain(
    args: &Value,
    rt: &mut Runtime,
    relation: fn(&NumericType, &NumericType) -> bool,
) -> Result<Value, LispError> {
    let operands = list_to_vec(args);
    if operands.is_empty() {
        return Ok(Value::Bool(true));
    }

    let mut numbers = Vec::with_capacity(operands.len());
    let mut all_numeric = true;
    for operand in &operands {
        match eval(operand, rt)? {
            Value::Number(n) => numbers.push(n),
            _ => all_numeric = false,
        }
    }
    if !all_numeric {
        return Ok(Value::Bool(false));
    }
    if numbers.len() == 1 {
        return Ok(Value::Bool(true));
    }

    let holds = numbers.windows(2).all(|pair| relation(&pair[0], &pair[1]));
    Ok(Value::Bool(holds))
}

fn less_than(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    compare_chain(args, rt, |a, b| a < b)
}

fn less_than_or_equal(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    compare_chain(args, rt, |a, b| a <= b)
}

fn greater_than(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    compare_chain(args, rt, |a, b| a > b)
}

fn greater_than_or_equal(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    compare_chain(args, rt, |a, b| a >= b)
}

fn numeric_equal(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    compare_chain(args, rt, |a, b| a == b)
}

// ============================================================================
// Boolean and Quoting
// ============================================================================

/// (not x) — exactly one argument; only #f is false.
fn not(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    if args.is_nil() {
        return Err(LispError::WrongNumberOfArguments);
    }
    let value = eval(&car(args)?, rt)?;
    Ok(Value::Bool(!value.is_truthy()))
}

/// The quote procedure: first element of a list, anything else unchanged.
fn quot(args: &Value, _rt: &mut Runtime) -> Result<Value, LispError> {
    match args {
        Value::Pair(cell) => Ok(cell.car.clone()),
        other => Ok(other.clone()),
    }
}

// ============================================================================
// I/O
// ============================================================================

fn print_forms(rt: &mut Runtime, forms: &[String]) -> Result<Value, LispError> {
    let text = forms.join(" ");
    rt.out.write_all(text.as_bytes())?;
    rt.out.flush()?;
    Ok(Value::Void)
}

/// (display x …) — display-forms to the output sink, space separated.
fn display(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = eval_operands(args, rt)?;
    let forms: Vec<String> = operands.iter().map(Value::display_string).collect();
    print_forms(rt, &forms)
}

/// (write x …) — write-forms (strings quoted, chars as literals).
fn write(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let operands = eval_operands(args, rt)?;
    let forms: Vec<String> = operands.iter().map(Value::write_string).collect();
    print_forms(rt, &forms)
}

/// (format t x …) — a leading `t` names the default destination and is
/// skipped; the remaining operands print in display-form. A missing body is
/// a bad invocation.
fn format(args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let mut operands = list_to_vec(args);
    if operands.is_empty() {
        return Err(LispError::BadArgument);
    }
    if matches!(&operands[0], Value::Identifier(name) if name.with_str(|s| s == "t")) {
        operands.remove(0);
    }
    if operands.is_empty() {
        return Err(LispError::BadArgument);
    }
    let mut forms = Vec::with_capacity(operands.len());
    for operand in &operands {
        forms.push(eval(operand, rt)?.display_string());
    }
    print_forms(rt, &forms)
}

// ============================================================================
// Registration
// ============================================================================

fn native(f: NativeFn) -> Value {
    Value::Lambda(Rc::new(LambdaCell {
        body: LambdaBody::Native(f),
    }))
}

/// Populate an environment with the default bindings.
pub fn register(env: &Environment) {
    let define = |name: &str, value: Value| env.define(InternedSymbol::new(name), value);

    define("newline", Value::Str("\n".to_string()));
    // I/O
    define("format", native(format));
    define("write", native(write));
    define("display", native(display));
    // quoting
    define("quot", native(quot));
    // relational operators
    define("<", native(less_than));
    define("<=", native(less_than_or_equal));
    define(">", native(greater_than));
    define(">=", native(greater_than_or_equal));
    define("=", native(numeric_equal));
    // boolean
    define("not", native(not));
    // arithmetic
    define("+", native(sum));
    define("-", native(difference));
    define("*", native(product));
    define("/", native(quotient));
    define("modulo", native(remainder));
}
