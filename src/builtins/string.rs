//! String building and printing primitives. `str` and `println` use display
//! mode, `pr-str` and `prn` use the readable rendering.

use crate::error::Result;
use crate::reader;
use crate::value::{CallScope, Value};

fn join(args: &[Value], readable: bool, separator: &str) -> String {
    args.iter()
        .map(|arg| arg.print(readable))
        .collect::<Vec<_>>()
        .join(separator)
}

/// str : a... -> string
pub fn str_(scope: CallScope) -> Result<Value> {
    Ok(Value::Str(join(&scope.args, false, "")))
}

/// pr-str : a... -> string
pub fn pr_str(scope: CallScope) -> Result<Value> {
    Ok(Value::Str(join(&scope.args, true, " ")))
}

/// prn : a... -> nil
pub fn prn(scope: CallScope) -> Result<Value> {
    println!("{}", join(&scope.args, true, " "));
    Ok(Value::Nil)
}

/// println : a... -> nil
pub fn println_(scope: CallScope) -> Result<Value> {
    println!("{}", join(&scope.args, false, " "));
    Ok(Value::Nil)
}

/// read-string : string -> a
pub fn read_string(scope: CallScope) -> Result<Value> {
    scope.assert_arity(1)?;
    reader::read(&scope.at(0).assert_str()?)
}
