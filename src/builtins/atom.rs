//! Atoms: the single mutable cell in the value model. Execution is
//! single-threaded, so `swap!` needs no locking to be a consistent
//! read-modify-write.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::eval::apply;
use crate::value::{CallScope, Value};

/// atom : a -> atom a
pub fn atom(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    Ok(Value::Atom(Rc::new(RefCell::new(scope.at(0)))))
}

/// atom? : a -> bool
pub fn is_atom(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    Ok(Value::Bool(matches!(scope.at(0), Value::Atom(..))))
}

/// deref : atom a -> a
pub fn deref(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    let cell = scope.at(0).assert_atom()?;
    let value = cell.borrow().clone();
    Ok(value)
}

/// reset! : atom a -> a -> a
pub fn reset(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let cell = scope.at(0).assert_atom()?;
    let value = scope.at(1);
    *cell.borrow_mut() = value.clone();
    Ok(value)
}

/// swap! : atom a -> (a -> b... -> a) -> b... -> a
///
/// Calls the function with the current value first and the extra arguments
/// after it, stores the result, and returns it.
pub fn swap(scope: CallScope) -> Result<Value> {
    scope.assert_at_least(2)?;
    let cell = scope.at(0).assert_atom()?;
    let func = scope.at(1);

    let mut args = vec![cell.borrow().clone()];
    args.extend(scope.args.iter().skip(2).cloned());

    let next = apply(&func, args, &scope.env)?;
    *cell.borrow_mut() = next.clone();
    Ok(next)
}
