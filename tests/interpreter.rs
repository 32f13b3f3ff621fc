//! End-to-end tests driving the interpreter through read, eval and print,
//! the way the host binary does.

use std::rc::Rc;

use lilt::{builtins, eval, reader, rep, Env, Error, Value};

fn run(input: &str, env: &Env) -> Result<Value, Error> {
    eval::eval(reader::read(input)?, env.clone())
}

#[test]
fn literals_round_trip_through_the_printer() {
    let literals = [
        "1", "-42", "1.5", "6.0", "\"hi\\nthere\"", ":kw", "true", "false", "nil",
    ];

    for literal in literals {
        let value = reader::read(literal).unwrap();
        let reread = reader::read(&value.print(true)).unwrap();
        assert!(
            value.try_eq(&reread).unwrap(),
            "{} did not round-trip",
            literal
        );
    }
}

#[test]
fn quote_returns_the_form_as_read() {
    let env = builtins::base_env();
    let quoted = run("(quote (a [b] {:c 1} 2.5))", &env).unwrap();
    let raw = reader::read("(a [b] {:c 1} 2.5)").unwrap();
    assert!(quoted.try_eq(&raw).unwrap());
}

#[test]
fn deep_tail_recursion_completes() {
    let env = builtins::base_env();
    rep("(def! loop (fn* (n) (if (= n 0) 0 (loop (- n 1)))))", &env).unwrap();
    assert_eq!(rep("(loop 100000)", &env).unwrap(), "0");
}

#[test]
fn arithmetic_identities() {
    let env = builtins::base_env();
    assert_eq!(rep("(+)", &env).unwrap(), "0");
    assert_eq!(rep("(*)", &env).unwrap(), "1");
    assert_eq!(rep("(- 5)", &env).unwrap(), "-5");
    assert_eq!(rep("(/ 2)", &env).unwrap(), "0.5");
}

#[test]
fn let_bindings_are_sequential() {
    let env = builtins::base_env();
    assert_eq!(rep("(let* (x 2 y (* x 3)) y)", &env).unwrap(), "6");
}

#[test]
fn def_inside_a_closure_does_not_touch_the_closure_frame_chain() {
    let env = builtins::base_env();
    rep("(def! set-it (fn* () (def! inside 1)))", &env).unwrap();
    rep("(set-it)", &env).unwrap();
    // the definition landed in the call frame, which is gone
    assert!(matches!(
        run("inside", &env),
        Err(Error::UndefinedSymbol(..))
    ));
}

#[test]
fn sequences_compare_across_tags_and_maps_as_sets() {
    let env = builtins::base_env();
    assert_eq!(rep("(= (list 1 2) [1 2])", &env).unwrap(), "true");
    assert_eq!(rep("(= {:a 1 :b 2} {:b 2 :a 1})", &env).unwrap(), "true");
    assert_eq!(rep("(= {:a 1} {:a 2})", &env).unwrap(), "false");
    assert_eq!(rep("(= \"a\" \"a\")", &env).unwrap(), "true");
}

#[test]
fn quasiquote_evaluates_unquotes_and_splices() {
    let env = builtins::base_env();
    assert_eq!(
        rep(
            "(quasiquote (1 (unquote (+ 1 1)) (splice-unquote (list 3 4))))",
            &env
        )
        .unwrap(),
        "(1 2 3 4)"
    );
    assert_eq!(rep("`(a b)", &env).unwrap(), "(a b)");
    assert_eq!(rep("(def! x 7)", &env).unwrap(), "7");
    assert_eq!(rep("`(x ~x)", &env).unwrap(), "(x 7)");
}

#[test]
fn error_surfaces() {
    let env = builtins::base_env();

    assert!(matches!(
        run("(nth (list 1 2) 5)", &env),
        Err(Error::IndexOutOfBounds(5, 2))
    ));
    assert!(matches!(
        reader::read("(1 2"),
        Err(Error::Syntax(msg)) if msg.contains("')'")
    ));
    assert!(matches!(
        run("(foo)", &env),
        Err(Error::UndefinedSymbol(name)) if name == "foo"
    ));
    assert!(matches!(
        run("(= + -)", &env),
        Err(Error::Uncomparable(..))
    ));
}

#[test]
fn swap_mutates_without_replacing_the_atom() {
    let env = builtins::base_env();
    rep("(def! a (atom 1))", &env).unwrap();

    let before = env.lookup("a").unwrap();
    assert_eq!(rep("(swap! a + 5)", &env).unwrap(), "6");
    assert_eq!(rep("(deref a)", &env).unwrap(), "6");
    assert_eq!(rep("@a", &env).unwrap(), "6");

    let after = env.lookup("a").unwrap();
    match (before, after) {
        (Value::Atom(before), Value::Atom(after)) => assert!(Rc::ptr_eq(&before, &after)),
        _ => panic!("expected atoms"),
    }
}

#[test]
fn reset_and_predicates() {
    let env = builtins::base_env();
    rep("(def! a (atom (list 1 2)))", &env).unwrap();
    assert_eq!(rep("(atom? a)", &env).unwrap(), "true");
    assert_eq!(rep("(atom? 1)", &env).unwrap(), "false");
    assert_eq!(rep("(reset! a 9)", &env).unwrap(), "9");
    assert_eq!(rep("(deref a)", &env).unwrap(), "9");
    assert_eq!(rep("a", &env).unwrap(), "(atom 9)");
}

#[test]
fn variadic_parameters_collect_a_list() {
    let env = builtins::base_env();
    rep("(def! tally (fn* (first & rest) (count rest)))", &env).unwrap();
    assert_eq!(rep("(tally 1 2 3 4)", &env).unwrap(), "3");
    assert_eq!(rep("(tally 1)", &env).unwrap(), "0");
    assert!(matches!(run("(tally)", &env), Err(Error::WrongArity(..))));
}

#[test]
fn load_file_defines_at_the_top_level() {
    let env = builtins::base_env();

    let path = std::env::temp_dir().join("lilt-load-file-test.lisp");
    std::fs::write(&path, "(def! loaded (+ 20 22))\n").unwrap();

    let form = format!("(load-file \"{}\")", path.display());
    assert_eq!(rep(&form, &env).unwrap(), "nil");
    assert_eq!(rep("loaded", &env).unwrap(), "42");

    std::fs::remove_file(&path).unwrap();

    assert!(matches!(
        run("(slurp \"no-such-file.lisp\")", &env),
        Err(Error::FileNotFound(..))
    ));
}

#[test]
fn strings_print_readably_or_plainly() {
    let env = builtins::base_env();
    assert_eq!(rep("(str \"a\" 1 :k)", &env).unwrap(), "\"a1:k\"");
    assert_eq!(rep("(pr-str \"a\\nb\")", &env).unwrap(), "\"\\\"a\\\\nb\\\"\"");
    assert_eq!(
        rep("(read-string \"(1 2 (3 4) nil)\")", &env).unwrap(),
        "(1 2 (3 4) nil)"
    );
}

#[test]
fn functions_print_as_opaque_tokens() {
    let env = builtins::base_env();
    assert_eq!(rep("(fn* (x) x)", &env).unwrap(), "#<function>");
    assert_eq!(rep("+", &env).unwrap(), "#<builtin +>");
}
