//! The filesystem touchpoint (`slurp`) and the `eval` builtin that re-enters
//! the evaluator at the top level, which together make `load-file`
//! definable in the language itself.

use crate::error::{Error, Result};
use crate::value::{CallScope, Value};

/// slurp : string -> string
pub fn slurp(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    let path = scope.at(0).assert_str()?;

    std::fs::read_to_string(&path)
        .map(Value::Str)
        .map_err(|_| Error::FileNotFound(path))
}

/// eval : a -> a, evaluated in the top-level environment
pub fn eval(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    crate::eval::eval(scope.at(0), scope.env.root())
}
