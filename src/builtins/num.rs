//! Variadic arithmetic, folding left to right with integer-to-float
//! promotion. A single argument folds against the operator's identity, so
//! `(- 5)` is `-5` and `(/ 2)` is `0.5`.

use crate::error::{Error, Result};
use crate::value::{CallScope, Value};

/// The numeric payload shared by the arithmetic folds.
#[derive(Clone, Copy)]
enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    fn from_value(value: &Value) -> Result<Num> {
        match value {
            Value::Int(int) => Ok(Num::Int(*int)),
            Value::Float(float) => Ok(Num::Float(*float)),
            other => Err(Error::ExpectedNumber(other.print(true))),
        }
    }

    fn to_value(self) -> Value {
        match self {
            Num::Int(int) => Value::Int(int),
            Num::Float(float) => Value::Float(float),
        }
    }

    fn as_float(self) -> f64 {
        match self {
            Num::Int(int) => int as f64,
            Num::Float(float) => float,
        }
    }
}

/// + : a... -> a
pub fn add(scope: CallScope) -> Result<Value> {
    fold(scope, Num::Int(0), |a, b| {
        Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => Num::Int(a.wrapping_add(b)),
            (a, b) => Num::Float(a.as_float() + b.as_float()),
        })
    })
}

/// - : a... -> a
pub fn sub(scope: CallScope) -> Result<Value> {
    fold(scope, Num::Int(0), |a, b| {
        Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => Num::Int(a.wrapping_sub(b)),
            (a, b) => Num::Float(a.as_float() - b.as_float()),
        })
    })
}

/// * : a... -> a
pub fn mul(scope: CallScope) -> Result<Value> {
    fold(scope, Num::Int(1), |a, b| {
        Ok(match (a, b) {
            (Num::Int(a), Num::Int(b)) => Num::Int(a.wrapping_mul(b)),
            (a, b) => Num::Float(a.as_float() * b.as_float()),
        })
    })
}

/// / : a... -> a, promoting to float when the division is inexact
pub fn div(scope: CallScope) -> Result<Value> {
    fold(scope, Num::Int(1), |a, b| match (a, b) {
        (_, Num::Int(0)) => Err(Error::DivisionByZero("/")),
        (Num::Int(a), Num::Int(b)) => match (a.checked_div(b), a.checked_rem(b)) {
            (Some(quotient), Some(0)) => Ok(Num::Int(quotient)),
            _ => Ok(Num::Float(a as f64 / b as f64)),
        },
        (a, b) => Ok(Num::Float(a.as_float() / b.as_float())),
    })
}

/// % : a... -> a
pub fn rem(scope: CallScope) -> Result<Value> {
    fold(scope, Num::Int(0), |a, b| match (a, b) {
        (_, Num::Int(0)) => Err(Error::DivisionByZero("%")),
        (Num::Int(a), Num::Int(b)) => Ok(Num::Int(a.checked_rem(b).unwrap_or(0))),
        (a, b) => Ok(Num::Float(a.as_float() % b.as_float())),
    })
}

/// Folds the arguments pairwise. Fewer than two arguments are padded on the
/// left with the identity, which also makes the zero-argument case return
/// the identity itself.
fn fold(scope: CallScope, identity: Num, op: impl Fn(Num, Num) -> Result<Num>) -> Result<Value> {
    let mut nums = scope
        .args
        .iter()
        .map(Num::from_value)
        .collect::<Result<Vec<_>>>()?;

    if nums.len() < 2 {
        nums.insert(0, identity);
    }

    let mut nums = nums.into_iter();
    let mut acc = match nums.next() {
        Some(first) => first,
        None => identity,
    };
    for num in nums {
        acc = op(acc, num)?;
    }

    Ok(acc.to_value())
}
