//! The thin host around the core: an interactive prompt, or a script runner
//! when a file path is given. Errors are printed and the prompt resumes;
//! only a failing script exits non-zero.

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use lilt::value::Value;
use lilt::{builtins, rep, Env};

fn main() {
    let env = builtins::base_env();
    let mut args = std::env::args().skip(1);

    match args.next() {
        Some(path) => run_file(&env, &path, args),
        None => repl(&env),
    }
}

fn run_file(env: &Env, path: &str, args: impl Iterator<Item = String>) {
    let argv = args.map(Value::Str).collect();
    env.define("*ARGV*", Value::List(argv));

    let form = format!("(load-file {})", Value::Str(path.to_string()).print(true));
    if let Err(err) = rep(&form, env) {
        eprintln!("{}", err);
        std::process::exit(1);
    }
}

fn repl(env: &Env) {
    let mut rl = DefaultEditor::new().expect("cannot create a repl");

    loop {
        match rl.readline("user> ") {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(line.as_str());

                match rep(&line, env) {
                    Ok(printed) => println!("{}", printed),
                    Err(err) => println!("{}", err),
                }
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("error: {:?}", err);
                break;
            }
        }
    }
}
