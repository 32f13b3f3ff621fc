//! The builtin library: the initial environment frame, grouped by concern,
//! plus the bootstrap forms that are written in the language itself.

pub mod atom;
pub mod cmp;
pub mod io;
pub mod num;
pub mod seq;
pub mod string;

use crate::environment::Env;
use crate::error::Result;
use crate::value::{Builtin, Prim, Value};
use crate::{eval, reader};

/// Builds the top-level environment: every primitive, an empty `*ARGV*`,
/// and the bootstrap definitions.
pub fn base_env() -> Env {
    let env = Env::new();
    install(&env);
    bootstrap(&env).expect("bootstrap forms must evaluate");
    env
}

/// Registers the primitives into `env` without running the bootstrap.
pub fn install(env: &Env) {
    register(env, "+", num::add);
    register(env, "-", num::sub);
    register(env, "*", num::mul);
    register(env, "/", num::div);
    register(env, "%", num::rem);

    register(env, "=", cmp::eq);
    register(env, "<", cmp::lt);
    register(env, "<=", cmp::le);
    register(env, ">", cmp::gt);
    register(env, ">=", cmp::ge);

    register(env, "list", seq::list);
    register(env, "list?", seq::is_list);
    register(env, "empty?", seq::is_empty);
    register(env, "count", seq::count);
    register(env, "cons", seq::cons);
    register(env, "concat", seq::concat);
    register(env, "vec", seq::vec);
    register(env, "nth", seq::nth);
    register(env, "first", seq::first);
    register(env, "rest", seq::rest);
    register(env, "map", seq::map);
    register(env, "filter", seq::filter);
    register(env, "reduce", seq::reduce);
    register(env, "some?", seq::some);
    register(env, "every?", seq::every);

    register(env, "str", string::str_);
    register(env, "pr-str", string::pr_str);
    register(env, "prn", string::prn);
    register(env, "println", string::println_);
    register(env, "read-string", string::read_string);
    register(env, "slurp", io::slurp);
    register(env, "eval", io::eval);

    register(env, "atom", atom::atom);
    register(env, "atom?", atom::is_atom);
    register(env, "deref", atom::deref);
    register(env, "reset!", atom::reset);
    register(env, "swap!", atom::swap);

    env.define("*ARGV*", Value::List(im_rc::Vector::new()));
}

fn register(env: &Env, name: &'static str, call: Prim) {
    env.define(name, Value::Builtin(Builtin { name, call }));
}

fn bootstrap(env: &Env) -> Result<()> {
    let forms = [
        "(def! not (fn* (x) (if x false true)))",
        "(def! load-file (fn* (f) (eval (read-string (str \"(do \" (slurp f) \"\\nnil)\")))))",
    ];

    for form in forms {
        eval::eval(reader::read(form)?, env.clone())?;
    }
    Ok(())
}
