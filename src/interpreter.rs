use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::error::LispError;
use crate::interner::InternedSymbol;
use crate::language::{car, cdr, list_to_vec, LambdaBody, LambdaCell, Value};
use crate::runtime::Runtime;

// ============================================================================
// Environment
// ============================================================================

struct Frame {
    bindings: FxHashMap<InternedSymbol, Value>,
    parent: Option<Environment>,
}

/// A chain of binding frames. Cloning aliases the same frame (an `Rc` bump),
/// so a root environment shared across forms sees every `define`; `extend`
/// starts a genuinely new scope for lambda application.
#[derive(Clone)]
pub struct Environment {
    state: Rc<RefCell<Frame>>,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    pub fn new() -> Self {
        Environment {
            state: Rc::new(RefCell::new(Frame {
                bindings: FxHashMap::default(),
                parent: None,
            })),
        }
    }

    /// Create a child frame binding `params` to `args`, with this
    /// environment as the parent of the new scope.
    pub fn extend(&self, params: &[InternedSymbol], args: &[Value]) -> Self {
        let mut bindings = FxHashMap::default();
        for (param, arg) in params.iter().zip(args.iter()) {
            bindings.insert(*param, arg.clone());
        }
        Environment {
            state: Rc::new(RefCell::new(Frame {
                bindings,
                parent: Some(self.clone()),
            })),
        }
    }

    /// Upsert a binding in the innermost frame. Re-defining overwrites.
    pub fn define(&self, name: InternedSymbol, value: Value) {
        self.state.borrow_mut().bindings.insert(name, value);
    }

    /// Walk the frame chain looking for a binding.
    pub fn lookup(&self, name: InternedSymbol) -> Option<Value> {
        let frame = self.state.borrow();
        if let Some(value) = frame.bindings.get(&name) {
            return Some(value.clone());
        }
        match &frame.parent {
            Some(parent) => parent.lookup(name),
            None => None,
        }
    }
}

// ============================================================================
// Evaluator
// ============================================================================

fn is_reserved(name: InternedSymbol) -> bool {
    name.with_str(|s| matches!(s, "lambda" | "define"))
}

/// Evaluate one datum against the runtime's environment.
///
/// The walk is purely recursive; the shared environment is the only state
/// that survives between calls.
pub fn eval(expr: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    match expr {
        Value::Nil => Ok(Value::Nil),

        // Self-evaluating atoms.
        Value::Number(_) | Value::Bool(_) | Value::Str(_) | Value::Char(_) | Value::Void => {
            Ok(expr.clone())
        }

        // A bare operator resolves through the environment and self-applies
        // with no arguments.
        Value::Operator { literal, .. } => {
            let resolved = rt
                .env
                .lookup(*literal)
                .ok_or(LispError::OperatorIsNotAProcedure)?;
            match resolved {
                Value::Lambda(cell) => apply(&cell, &Value::Nil, rt),
                _ => Err(LispError::OperatorIsNotAProcedure),
            }
        }

        // A bare procedure reference runs with no arguments, like the
        // operator case.
        Value::Lambda(cell) => apply(cell, &Value::Nil, rt),

        // Quoting suppresses evaluation.
        Value::Quote(inner) => Ok((**inner).clone()),

        // Identifiers resolve once; the binding is returned as-is.
        Value::Identifier(name) => rt
            .env
            .lookup(*name)
            .ok_or_else(|| LispError::UndefinedIdent(name.resolve())),

        Value::Pair(cell) => eval_application(&cell.car, &cell.cdr, rt),
    }
}

fn eval_application(head: &Value, tail: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    match head {
        // A compound head is evaluated first. A not-a-procedure failure is
        // tolerated so a literal or quoted head can still stand for itself.
        Value::Pair(_) => {
            let evaluated = match eval(head, rt) {
                Ok(value) => value,
                Err(e) if e.is_not_a_procedure() => head.clone(),
                Err(e) => return Err(e),
            };
            apply_head(&evaluated, tail, rt)
        }

        // (quote x y z) returns the whole tail unevaluated; a quote with no
        // body is an arity error.
        Value::Quote(_) => {
            if tail.is_nil() {
                Err(LispError::WrongNumberOfArguments)
            } else {
                Ok(tail.clone())
            }
        }

        Value::Operator { literal, .. } => {
            let resolved = rt
                .env
                .lookup(*literal)
                .ok_or(LispError::OperatorIsNotAProcedure)?;
            match resolved {
                Value::Lambda(cell) => apply(&cell, tail, rt),
                _ => Err(LispError::OperatorIsNotAProcedure),
            }
        }

        Value::Identifier(name) => {
            // Reserved forms are recognized before lookup, so a user
            // definition of the same name cannot shadow them.
            if is_reserved(*name) {
                return name.with_str(|s| match s {
                    "lambda" => make_lambda(tail, rt),
                    _ => eval_define(tail, rt),
                });
            }
            let resolved = rt
                .env
                .lookup(*name)
                .ok_or_else(|| LispError::UndefinedIdent(name.resolve()))?;
            match resolved {
                Value::Lambda(cell) => apply(&cell, tail, rt),
                // A non-procedure binding is the value of the form; this is
                // how (newline) yields the newline string.
                other => Ok(other),
            }
        }

        Value::Lambda(cell) => apply(cell, tail, rt),

        // A single-element pair around a literal is that literal.
        other => {
            if tail.is_nil() {
                Ok(other.clone())
            } else {
                Err(LispError::OperatorIsNotAProcedure)
            }
        }
    }
}

/// Re-dispatch after a compound head has been evaluated.
fn apply_head(head: &Value, tail: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    match head {
        Value::Operator { literal, .. } => {
            let resolved = rt
                .env
                .lookup(*literal)
                .ok_or(LispError::OperatorIsNotAProcedure)?;
            match resolved {
                Value::Lambda(cell) => apply(&cell, tail, rt),
                _ => Err(LispError::OperatorIsNotAProcedure),
            }
        }
        Value::Identifier(name) => {
            let resolved = rt
                .env
                .lookup(*name)
                .ok_or_else(|| LispError::UndefinedIdent(name.resolve()))?;
            match resolved {
                Value::Lambda(cell) => apply(&cell, tail, rt),
                _ => Err(LispError::OperatorIsNotAProcedure),
            }
        }
        Value::Lambda(cell) => apply(cell, tail, rt),
        Value::Quote(_) => Ok(tail.clone()),
        _ => Err(LispError::OperatorIsNotAProcedure),
    }
}

/// Apply a procedure to an unevaluated argument list. Native bodies receive
/// the list as-is and evaluate operands themselves; user bodies evaluate
/// every argument, bind parameters in a child frame of the captured
/// environment, and run the body forms in order.
pub fn apply(lambda: &LambdaCell, args: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    match &lambda.body {
        LambdaBody::Native(f) => f(args, rt),
        LambdaBody::User { params, body, env } => {
            let mut evaluated = Vec::new();
            for arg in list_to_vec(args) {
                evaluated.push(eval(&arg, rt)?);
            }
            if evaluated.len() != params.len() {
                return Err(LispError::WrongNumberOfArguments);
            }
            let child = env.extend(params, &evaluated);
            let saved = std::mem::replace(&mut rt.env, child);
            let mut result = Ok(Value::Void);
            for form in body {
                result = eval(form, rt);
                if result.is_err() {
                    break;
                }
            }
            rt.env = saved;
            result
        }
    }
}

/// `(lambda (params…) body…)` — build a user procedure capturing the current
/// environment.
fn make_lambda(tail: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let params_expr = car(tail)?;
    let mut params = Vec::new();
    for param in list_to_vec(&params_expr) {
        match param {
            Value::Identifier(name) => params.push(name),
            _ => return Err(LispError::BadArgument),
        }
    }
    let body = list_to_vec(&cdr(tail)?);
    Ok(Value::Lambda(Rc::new(LambdaCell {
        body: LambdaBody::User {
            params,
            body,
            env: rt.env.clone(),
        },
    })))
}

/// `(define name expr)` — evaluate and bind in the innermost frame.
fn eval_define(tail: &Value, rt: &mut Runtime) -> Result<Value, LispError> {
    let name_expr = car(tail).map_err(|_| LispError::WrongNumberOfArguments)?;
    let value_expr = car(&cdr(tail)?).map_err(|_| LispError::WrongNumberOfArguments)?;
    match name_expr {
        Value::Identifier(name) => {
            let value = eval(&value_expr, rt)?;
            rt.env.define(name, value);
            Ok(Value::Void)
        }
        _ => Err(LispError::BadArgument),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn define_overwrites_in_place() {
        let env = Environment::new();
        let name = InternedSymbol::new("x");
        env.define(name, Value::int(1));
        env.define(name, Value::int(2));
        assert_eq!(env.lookup(name), Some(Value::int(2)));
    }

    #[test]
    fn lookup_walks_the_parent_chain() {
        let root = Environment::new();
        let outer = InternedSymbol::new("outer");
        root.define(outer, Value::int(10));
        let child = root.extend(&[InternedSymbol::new("p")], &[Value::int(1)]);
        assert_eq!(child.lookup(outer), Some(Value::int(10)));
        assert_eq!(child.lookup(InternedSymbol::new("p")), Some(Value::int(1)));
        assert_eq!(root.lookup(InternedSymbol::new("p")), None);
    }

    #[test]
    fn inner_define_does_not_leak_to_parent() {
        let root = Environment::new();
        let child = root.extend(&[], &[]);
        let name = InternedSymbol::new("local");
        child.define(name, Value::int(5));
        assert_eq!(root.lookup(name), None);
    }

    #[test]
    fn clones_alias_the_same_frame() {
        let a = Environment::new();
        let b = a.clone();
        let name = InternedSymbol::new("shared");
        b.define(name, Value::int(7));
        assert_eq!(a.lookup(name), Some(Value::int(7)));
    }
}
