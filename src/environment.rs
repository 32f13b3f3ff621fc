//! An environment is a chain of frames mapping symbols to values. Frames are
//! shared, never copied: a closure keeps its defining frame alive and sees
//! `def!` mutations made in it after the closure was created.

use std::cell::RefCell;
use std::rc::Rc;

use fxhash::FxBuildHasher;
use im_rc::HashMap;

use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug)]
struct Frame {
    variables: RefCell<HashMap<String, Value, FxBuildHasher>>,
    outer: Option<Env>,
}

/// A shared handle to one frame in the chain.
#[derive(Debug, Clone)]
pub struct Env(Rc<Frame>);

impl Env {
    /// The root frame, with no enclosing scope.
    pub fn new() -> Self {
        Env(Rc::new(Frame {
            variables: RefCell::new(HashMap::default()),
            outer: None,
        }))
    }

    /// A fresh frame enclosed by this one.
    pub fn child(&self) -> Self {
        Env(Rc::new(Frame {
            variables: RefCell::new(HashMap::default()),
            outer: Some(self.clone()),
        }))
    }

    /// Inserts into the current frame only, returning the value.
    pub fn define(&self, name: impl Into<String>, value: Value) -> Value {
        self.0
            .variables
            .borrow_mut()
            .insert(name.into(), value.clone());
        value
    }

    /// Searches this frame and then each ancestor in order.
    pub fn lookup(&self, name: &str) -> Result<Value> {
        let mut env = Some(self.clone());
        while let Some(current) = env {
            if let Some(value) = current.0.variables.borrow().get(name) {
                return Ok(value.clone());
            }
            env = current.0.outer.clone();
        }
        Err(Error::UndefinedSymbol(name.to_string()))
    }

    /// The outermost frame of the chain. The `eval` builtin re-enters the
    /// evaluator here so that `load-file` defines at the top level.
    pub fn root(&self) -> Env {
        let mut env = self.clone();
        while let Some(outer) = env.0.outer.clone() {
            env = outer;
        }
        env
    }

    /// Binds parameters to arguments in a new frame under `outer`. The
    /// parameter `&` makes the next parameter collect the remaining
    /// arguments as a List.
    pub fn bind(outer: &Env, params: &[String], args: Vec<Value>) -> Result<Env> {
        let expected = params.len();
        let given = args.len();

        let env = outer.child();
        let mut params = params.iter();
        let mut args = args.into_iter();

        while let Some(param) = params.next() {
            if param == "&" {
                let name = params.next().ok_or_else(|| {
                    Error::Syntax("expected a parameter name after '&'".to_string())
                })?;
                env.define(name.clone(), Value::list(args));
                return Ok(env);
            }

            let Some(value) = args.next() else {
                return Err(Error::WrongArity(expected, given));
            };
            env.define(param.clone(), value);
        }

        if args.next().is_some() {
            return Err(Error::WrongArity(expected, given));
        }

        Ok(env)
    }
}

impl Default for Env {
    fn default() -> Self {
        Env::new()
    }
}
