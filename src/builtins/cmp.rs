//! Variadic comparisons, chained pairwise: `(< 1 2 3)` holds when every
//! adjacent pair does. Zero or one argument is trivially true.

use crate::error::{Error, Result};
use crate::value::{CallScope, Value};

/// = : a... -> bool
pub fn eq(scope: CallScope) -> Result<Value> {
    chain(&scope, |a, b| a.try_eq(b))
}

/// < : a... -> bool
pub fn lt(scope: CallScope) -> Result<Value> {
    chain(&scope, |a, b| Ok(as_float(a)? < as_float(b)?))
}

/// <= : a... -> bool
pub fn le(scope: CallScope) -> Result<Value> {
    chain(&scope, |a, b| Ok(as_float(a)? <= as_float(b)?))
}

/// > : a... -> bool
pub fn gt(scope: CallScope) -> Result<Value> {
    chain(&scope, |a, b| Ok(as_float(a)? > as_float(b)?))
}

/// >= : a... -> bool
pub fn ge(scope: CallScope) -> Result<Value> {
    chain(&scope, |a, b| Ok(as_float(a)? >= as_float(b)?))
}

fn chain(scope: &CallScope, pred: impl Fn(&Value, &Value) -> Result<bool>) -> Result<Value> {
    for pair in scope.args.windows(2) {
        if !pred(&pair[0], &pair[1])? {
            return Ok(Value::Bool(false));
        }
    }
    Ok(Value::Bool(true))
}

fn as_float(value: &Value) -> Result<f64> {
    match value {
        Value::Int(int) => Ok(*int as f64),
        Value::Float(float) => Ok(*float),
        other => Err(Error::ExpectedNumber(other.print(true))),
    }
}
