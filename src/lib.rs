//! lilt is a small lisp interpreter: a reader, an evaluator and a printer
//! over one closed value type, with a library of builtin functions. Values
//! are immutable and reference counted; the only mutable value is the atom.
//! The evaluator runs as a trampoline loop, so tail-recursive user functions
//! run in constant stack space.
//!
//! The host drives the core through three entry points:
//!
//! ```
//! use lilt::{builtins, eval, reader};
//!
//! let env = builtins::base_env();
//! let form = reader::read("(+ 1 2)").unwrap();
//! let value = eval::eval(form, env).unwrap();
//! assert_eq!(value.print(true), "3");
//! ```

pub mod builtins;
pub mod environment;
pub mod error;
pub mod eval;
pub mod reader;
pub mod value;

pub use environment::Env;
pub use error::{Error, Result};
pub use value::Value;

/// Reads, evaluates and renders a single piece of source text: the
/// read-eval-print step shared by the REPL and the script runner.
pub fn rep(input: &str, env: &Env) -> Result<String> {
    let form = reader::read(input)?;
    let value = eval::eval(form, env.clone())?;
    Ok(value.print(true))
}
