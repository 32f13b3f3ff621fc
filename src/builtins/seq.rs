//! Sequence primitives. Constructors always build new values: lists and
//! vectors are immutable once built. Higher-order operations take the
//! sequence first, as in `(map seq f)`.

use crate::error::{Error, Result};
use crate::eval::apply;
use crate::value::{CallScope, Value};

/// list : a... -> list a
pub fn list(scope: CallScope) -> Result<Value> {
    Ok(Value::List(scope.args.into_iter().collect()))
}

/// list? : a -> bool
pub fn is_list(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    Ok(Value::Bool(matches!(scope.at(0), Value::List(..))))
}

/// empty? : seq -> bool
pub fn is_empty(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    let count = scope.at(0).count("empty?")?;
    Ok(Value::Bool(count == 0))
}

/// count : seq -> number
pub fn count(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    let count = scope.at(0).count("count")?;
    Ok(Value::Int(count as i64))
}

/// cons : a -> seq a -> list a
pub fn cons(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let mut items = scope.at(1).assert_seq()?;
    items.push_front(scope.at(0));
    Ok(Value::List(items))
}

/// concat : seq a... -> list a
pub fn concat(scope: CallScope) -> Result<Value> {
    let mut items = im_rc::Vector::new();
    for arg in &scope.args {
        items.append(arg.assert_seq()?);
    }
    Ok(Value::List(items))
}

/// vec : seq a -> vector a
pub fn vec(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    Ok(Value::Vector(scope.at(0).assert_seq()?))
}

/// nth : seq a -> number -> a
pub fn nth(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let items = scope.at(0).assert_seq()?;
    let index = scope.at(1).assert_int()?;

    usize::try_from(index)
        .ok()
        .and_then(|index| items.get(index).cloned())
        .ok_or(Error::IndexOutOfBounds(index, items.len()))
}

/// first : seq a -> a, nil on nil or an empty sequence
pub fn first(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    match scope.at(0) {
        Value::Nil => Ok(Value::Nil),
        other => Ok(other.assert_seq()?.front().cloned().unwrap_or(Value::Nil)),
    }
}

/// rest : seq a -> list a, an empty list on nil or an empty sequence
pub fn rest(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    match scope.at(0) {
        Value::Nil => Ok(Value::List(im_rc::Vector::new())),
        other => Ok(Value::List(other.assert_seq()?.skip(1))),
    }
}

/// map : seq a -> (a -> b) -> list b
pub fn map(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let items = scope.at(0).assert_seq()?;
    let func = scope.at(1);

    let mut mapped = im_rc::Vector::new();
    for item in items {
        mapped.push_back(apply(&func, vec![item], &scope.env)?);
    }
    Ok(Value::List(mapped))
}

/// filter : seq a -> (a -> bool) -> list a
pub fn filter(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let items = scope.at(0).assert_seq()?;
    let func = scope.at(1);

    let mut kept = im_rc::Vector::new();
    for item in items {
        if apply(&func, vec![item.clone()], &scope.env)?.is_truthy() {
            kept.push_back(item);
        }
    }
    Ok(Value::List(kept))
}

/// reduce : seq a -> (b -> a -> b) -> b? -> b
pub fn reduce(scope: CallScope) -> Result<Value> {
    scope.assert_at_least(2)?;
    let items = scope.at(0).assert_seq()?;
    let func = scope.at(1);

    let mut items = items.into_iter();
    let mut acc = if scope.args.len() >= 3 {
        scope.at(2)
    } else {
        items.next().ok_or(Error::EmptyReduce)?
    };

    for item in items {
        acc = apply(&func, vec![acc, item], &scope.env)?;
    }
    Ok(acc)
}

/// some? : seq a -> (a -> bool) -> bool
pub fn some(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let items = scope.at(0).assert_seq()?;
    let func = scope.at(1);

    for item in items {
        if apply(&func, vec![item], &scope.env)?.is_truthy() {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

/// every? : seq a -> (a -> bool) -> bool
pub fn every(scope: CallScope) -> Result<Value> {
    scope.assert_arity(2)?;
    let items = scope.at(0).assert_seq()?;
    let func = scope.at(1);

    for item in items {
        if !apply(&func, vec![item], &scope.env)?.is_truthy() {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}
