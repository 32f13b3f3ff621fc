//! Evaluates a form to a value. The main entry point is [eval], an explicit
//! loop over a mutable `(expr, env)` pair: special forms and function
//! application rewrite the pair in place for tail positions instead of
//! recursing, so self-recursive user functions never grow the native stack.

use std::rc::Rc;

use crate::environment::Env;
use crate::error::{Error, Result};
use crate::value::{CallScope, Closure, Value};

/// The result of one reduction step: either a finished value, or the next
/// `(expr, env)` pair to keep looping on.
enum Trampoline {
    Done(Value),
    Continue(Value, Env),
}

pub fn eval(expr: Value, env: Env) -> Result<Value> {
    let mut expr = expr;
    let mut env = env;

    loop {
        match step(expr, env)? {
            Trampoline::Done(value) => return Ok(value),
            Trampoline::Continue(next, scope) => {
                expr = next;
                env = scope;
            }
        }
    }
}

fn step(expr: Value, env: Env) -> Result<Trampoline> {
    match expr {
        Value::Sym(name) => env.lookup(&name).map(Trampoline::Done),
        Value::List(items) if items.is_empty() => Ok(Trampoline::Done(Value::List(items))),
        Value::List(items) => reduce_list(items, env),
        Value::Vector(items) => {
            let items = items
                .into_iter()
                .map(|item| eval(item, env.clone()))
                .collect::<Result<_>>()?;
            Ok(Trampoline::Done(Value::Vector(items)))
        }
        Value::Map(entries) => {
            // values are evaluated, keys are not
            let mut evaluated = im_rc::Vector::new();
            for (key, value) in entries {
                evaluated.push_back((key, eval(value, env.clone())?));
            }
            Ok(Trampoline::Done(Value::Map(evaluated)))
        }
        other => Ok(Trampoline::Done(other)),
    }
}

/// Dispatches a non-empty list: a reserved special form, or an ordinary
/// application.
fn reduce_list(items: im_rc::Vector<Value>, env: Env) -> Result<Trampoline> {
    if let Value::Sym(name) = &items[0] {
        match name.as_str() {
            "def!" => return define(&items, env),
            "let*" => return let_binding(&items, env),
            "do" => return do_block(&items, env),
            "if" => return branch(&items, env),
            "fn*" => return lambda(&items, env),
            "quote" => {
                expect_args(&items, 1)?;
                return Ok(Trampoline::Done(items[1].clone()));
            }
            "quasiquote" => {
                expect_args(&items, 1)?;
                return Ok(Trampoline::Continue(quasiquote(items[1].clone()), env));
            }
            _ => {}
        }
    }

    let func = eval(items[0].clone(), env.clone())?;
    let args = items
        .iter()
        .skip(1)
        .map(|item| eval(item.clone(), env.clone()))
        .collect::<Result<Vec<_>>>()?;

    match func {
        Value::Closure(closure) => {
            let frame = Env::bind(&closure.env, &closure.params, args)?;
            Ok(Trampoline::Continue(closure.body.clone(), frame))
        }
        Value::Builtin(builtin) => (builtin.call)(CallScope { args, env }).map(Trampoline::Done),
        other => Err(Error::NotCallable(other.print(true))),
    }
}

/// Applies an already-evaluated function to evaluated arguments, outside any
/// tail position. Higher-order builtins go through here; closures re-enter
/// the evaluator.
pub fn apply(func: &Value, args: Vec<Value>, env: &Env) -> Result<Value> {
    match func {
        Value::Closure(closure) => {
            let frame = Env::bind(&closure.env, &closure.params, args)?;
            eval(closure.body.clone(), frame)
        }
        Value::Builtin(builtin) => (builtin.call)(CallScope {
            args,
            env: env.clone(),
        }),
        other => Err(Error::NotCallable(other.print(true))),
    }
}

fn expect_args(items: &im_rc::Vector<Value>, count: usize) -> Result<()> {
    if items.len() != count + 1 {
        return Err(Error::WrongArity(count, items.len() - 1));
    }
    Ok(())
}

fn define(items: &im_rc::Vector<Value>, env: Env) -> Result<Trampoline> {
    expect_args(items, 2)?;

    let name = items[1].assert_sym()?;
    let value = eval(items[2].clone(), env.clone())?;

    Ok(Trampoline::Done(env.define(name, value)))
}

fn let_binding(items: &im_rc::Vector<Value>, env: Env) -> Result<Trampoline> {
    expect_args(items, 2)?;

    let bindings = items[1].assert_seq()?;
    if bindings.len() % 2 != 0 {
        return Err(Error::Syntax(
            "let* bindings require an even number of forms".to_string(),
        ));
    }

    // each value expression already sees the bindings before it
    let child = env.child();
    let mut forms = bindings.iter();
    while let (Some(name), Some(expr)) = (forms.next(), forms.next()) {
        let name = name.assert_sym()?;
        let value = eval(expr.clone(), child.clone())?;
        child.define(name, value);
    }

    Ok(Trampoline::Continue(items[2].clone(), child))
}

fn do_block(items: &im_rc::Vector<Value>, env: Env) -> Result<Trampoline> {
    if items.len() == 1 {
        return Ok(Trampoline::Done(Value::Nil));
    }

    for form in items.iter().skip(1).take(items.len() - 2) {
        eval(form.clone(), env.clone())?;
    }

    Ok(Trampoline::Continue(items[items.len() - 1].clone(), env))
}

fn branch(items: &im_rc::Vector<Value>, env: Env) -> Result<Trampoline> {
    let condition = eval(items.get(1).cloned().unwrap_or(Value::Nil), env.clone())?;

    let chosen = if condition.is_truthy() {
        items.get(2).cloned()
    } else {
        items.get(3).cloned()
    };

    Ok(Trampoline::Continue(chosen.unwrap_or(Value::Nil), env))
}

fn lambda(items: &im_rc::Vector<Value>, env: Env) -> Result<Trampoline> {
    expect_args(items, 2)?;

    let params = items[1]
        .assert_seq()?
        .iter()
        .map(|param| param.assert_sym())
        .collect::<Result<Vec<_>>>()?;

    let closure = Closure {
        params,
        body: items[2].clone(),
        env,
        is_macro: false,
    };

    Ok(Trampoline::Done(Value::Closure(Rc::new(closure))))
}

/// Expands a quasiquoted form into quote/cons/concat calls. The expansion is
/// evaluated afterwards by the caller's loop.
pub fn quasiquote(ast: Value) -> Value {
    match &ast {
        Value::Sym(..) | Value::Map(..) => Value::list(vec![Value::sym("quote"), ast]),
        Value::List(items) => {
            if let Some(Value::Sym(head)) = items.front() {
                if head == "unquote" {
                    return items.get(1).cloned().unwrap_or(Value::Nil);
                }
            }

            let mut result = Value::List(im_rc::Vector::new());
            for element in items.iter().rev() {
                result = match splice_arg(element) {
                    Some(arg) => Value::list(vec![Value::sym("concat"), arg, result]),
                    None => Value::list(vec![
                        Value::sym("cons"),
                        quasiquote(element.clone()),
                        result,
                    ]),
                };
            }
            result
        }
        _ => ast,
    }
}

fn splice_arg(element: &Value) -> Option<Value> {
    let Value::List(items) = element else {
        return None;
    };
    match items.front() {
        Some(Value::Sym(head)) if head == "splice-unquote" => items.get(1).cloned(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::read;

    fn run(input: &str, env: &Env) -> Result<Value> {
        eval(read(input)?, env.clone())
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        let env = Env::new();
        assert!(matches!(run("42", &env).unwrap(), Value::Int(42)));
        assert!(matches!(run(":kw", &env).unwrap(), Value::Keyword(..)));
        assert!(matches!(run("()", &env).unwrap(), Value::List(items) if items.is_empty()));
    }

    #[test]
    fn def_binds_in_the_current_frame() {
        let env = Env::new();
        run("(def! x 41)", &env).unwrap();
        assert!(matches!(run("x", &env).unwrap(), Value::Int(41)));
    }

    #[test]
    fn def_requires_exactly_two_arguments() {
        let env = Env::new();
        assert!(matches!(
            run("(def! x 1 2)", &env),
            Err(Error::WrongArity(2, 3))
        ));
    }

    #[test]
    fn let_bindings_see_earlier_bindings() {
        let env = Env::new();
        crate::builtins::install(&env);
        assert_eq!(
            run("(let* (x 2 y (* x 3)) y)", &env).unwrap().print(true),
            "6"
        );
    }

    #[test]
    fn let_does_not_leak_into_the_enclosing_frame() {
        let env = Env::new();
        run("(let* (x 2) x)", &env).unwrap();
        assert!(matches!(run("x", &env), Err(Error::UndefinedSymbol(..))));

        run("(let* (y 1) (def! z 9))", &env).unwrap();
        assert!(matches!(run("z", &env), Err(Error::UndefinedSymbol(..))));
    }

    #[test]
    fn only_nil_and_false_are_falsy() {
        let env = Env::new();
        assert!(matches!(run("(if 0 1 2)", &env).unwrap(), Value::Int(1)));
        assert!(matches!(run("(if () 1 2)", &env).unwrap(), Value::Int(1)));
        assert!(matches!(run("(if nil 1 2)", &env).unwrap(), Value::Int(2)));
        assert!(matches!(run("(if false 1 2)", &env).unwrap(), Value::Int(2)));
        assert!(matches!(run("(if false 1)", &env).unwrap(), Value::Nil));
    }

    #[test]
    fn do_evaluates_for_effect_and_returns_the_last_form() {
        let env = Env::new();
        assert!(matches!(run("(do)", &env).unwrap(), Value::Nil));
        assert!(matches!(
            run("(do (def! x 1) (def! x 2) x)", &env).unwrap(),
            Value::Int(2)
        ));
    }

    #[test]
    fn vectors_and_map_values_are_evaluated() {
        let env = Env::new();
        run("(def! x 7)", &env).unwrap();
        assert_eq!(run("[x x]", &env).unwrap().print(true), "[7 7]");
        assert_eq!(run("{:a x}", &env).unwrap().print(true), "{:a 7}");
    }

    #[test]
    fn quote_suppresses_evaluation() {
        let env = Env::new();
        let quoted = run("(quote (unbound 1 2))", &env).unwrap();
        assert!(quoted.try_eq(&read("(unbound 1 2)").unwrap()).unwrap());
    }

    #[test]
    fn closures_capture_their_defining_environment() {
        let env = Env::new();
        crate::builtins::install(&env);
        run("(def! make-adder (fn* (n) (fn* (m) (+ n m))))", &env).unwrap();
        run("(def! add2 (make-adder 2))", &env).unwrap();
        assert!(matches!(run("(add2 40)", &env).unwrap(), Value::Int(42)));
    }

    #[test]
    fn later_defs_are_visible_to_earlier_closures() {
        let env = Env::new();
        run("(def! f (fn* () hidden))", &env).unwrap();
        assert!(matches!(run("(f)", &env), Err(Error::UndefinedSymbol(..))));
        run("(def! hidden 41)", &env).unwrap();
        assert!(matches!(run("(f)", &env).unwrap(), Value::Int(41)));
    }

    #[test]
    fn applying_a_non_function_fails() {
        let env = Env::new();
        assert!(matches!(
            run("(1 2)", &env),
            Err(Error::NotCallable(msg)) if msg == "1"
        ));
    }

    #[test]
    fn quasiquote_wraps_symbols_and_maps() {
        assert_eq!(quasiquote(Value::sym("a")).print(true), "(quote a)");
        assert_eq!(quasiquote(Value::Int(1)).print(true), "1");
    }

    #[test]
    fn quasiquote_splices_and_unquotes() {
        let env = Env::new();
        crate::builtins::install(&env);
        let result = run(
            "(quasiquote (1 (unquote (+ 1 1)) (splice-unquote (list 3 4))))",
            &env,
        )
        .unwrap();
        assert_eq!(result.print(true), "(1 2 3 4)");
    }

    #[test]
    fn tail_calls_do_not_grow_the_stack() {
        let env = Env::new();
        crate::builtins::install(&env);
        run("(def! loop (fn* (n) (if (= n 0) 0 (loop (- n 1)))))", &env).unwrap();
        assert!(matches!(run("(loop 100000)", &env).unwrap(), Value::Int(0)));
    }
}
