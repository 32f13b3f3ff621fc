//! This module defines the values that are used by the interpreter, along
//! with the equality, counting and printing rules defined over them.

use std::cell::RefCell;
use std::fmt::{self, Debug, Display};
use std::rc::Rc;

use crate::environment::Env;
use crate::error::{Error, Result};

/// The calling convention of builtin functions: the arguments are already
/// evaluated, and `env` is the environment of the application site.
pub type Prim = fn(CallScope) -> Result<Value>;

/// A native operation exposed in the base environment.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub call: Prim,
}

impl Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

/// A user-defined function: a body expression and parameter list paired with
/// the environment that was active at the `fn*` site.
#[derive(Debug, Clone)]
pub struct Closure {
    pub params: Vec<String>,
    pub body: Value,
    pub env: Env,
    pub is_macro: bool,
}

/// Every runtime value is a variant of this closed type. All composites are
/// immutable once built; [Value::Atom] is the sole mutable cell.
#[derive(Debug, Clone)]
pub enum Value {
    Nil,
    Bool(bool),
    Int(i64),
    Float(f64),
    Sym(String),
    Keyword(String),
    Str(String),
    List(im_rc::Vector<Value>),
    Vector(im_rc::Vector<Value>),
    Map(im_rc::Vector<(Value, Value)>),
    Builtin(Builtin),
    Closure(Rc<Closure>),
    Atom(Rc<RefCell<Value>>),
}

impl Value {
    pub fn sym(name: impl Into<String>) -> Value {
        Value::Sym(name.into())
    }

    pub fn list(items: impl IntoIterator<Item = Value>) -> Value {
        Value::List(items.into_iter().collect())
    }

    /// Only [Value::Nil] and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Value::Nil | Value::Bool(false))
    }

    /// The elements of a List or Vector, cheaply shared.
    pub fn as_seq(&self) -> Option<im_rc::Vector<Value>> {
        match self {
            Value::List(items) | Value::Vector(items) => Some(items.clone()),
            _ => None,
        }
    }

    pub fn assert_seq(&self) -> Result<im_rc::Vector<Value>> {
        self.as_seq()
            .ok_or_else(|| Error::ExpectedSequence(self.print(true)))
    }

    pub fn assert_sym(&self) -> Result<String> {
        match self {
            Value::Sym(name) => Ok(name.clone()),
            other => Err(Error::ExpectedSymbol(other.print(true))),
        }
    }

    pub fn assert_str(&self) -> Result<String> {
        match self {
            Value::Str(text) => Ok(text.clone()),
            other => Err(Error::ExpectedString(other.print(true))),
        }
    }

    pub fn assert_int(&self) -> Result<i64> {
        match self {
            Value::Int(int) => Ok(*int),
            other => Err(Error::ExpectedNumber(other.print(true))),
        }
    }

    pub fn assert_atom(&self) -> Result<Rc<RefCell<Value>>> {
        match self {
            Value::Atom(cell) => Ok(cell.clone()),
            other => Err(Error::ExpectedAtom(other.print(true))),
        }
    }

    /// Structural equality. Lists and vectors compare across tags, maps
    /// compare as key/value sets, atoms compare by dereference. Functions
    /// have no defined equality, so comparing one is an error.
    pub fn try_eq(&self, other: &Value) -> Result<bool> {
        use Value::*;

        Ok(match (self, other) {
            (Nil, Nil) => true,
            (Bool(a), Bool(b)) => a == b,
            (Int(a), Int(b)) => a == b,
            (Float(a), Float(b)) => a == b,
            (Int(a), Float(b)) | (Float(b), Int(a)) => *a as f64 == *b,
            (Sym(a), Sym(b)) => a == b,
            (Keyword(a), Keyword(b)) => a == b,
            (Str(a), Str(b)) => a == b,
            (List(a) | Vector(a), List(b) | Vector(b)) => seq_eq(a, b)?,
            (Map(a), Map(b)) => map_eq(a, b)?,
            (Atom(a), Atom(b)) => a.borrow().try_eq(&b.borrow())?,
            (Builtin(..) | Closure(..), _) => {
                return Err(Error::Uncomparable(self.print(true)));
            }
            (_, Builtin(..) | Closure(..)) => {
                return Err(Error::Uncomparable(other.print(true)));
            }
            _ => false,
        })
    }

    /// The element count behind `count`/`empty?`. `op` names the operation
    /// in the error raised for uncountable values.
    pub fn count(&self, op: &'static str) -> Result<usize> {
        match self {
            Value::List(items) | Value::Vector(items) => Ok(items.len()),
            Value::Map(entries) => Ok(entries.len()),
            Value::Str(text) => Ok(text.chars().count()),
            Value::Nil => Ok(0),
            other => Err(Error::Uncountable(op, other.print(true))),
        }
    }

    /// Serializes the value. `readable` mode escapes and quotes strings so
    /// the output reads back as an equal value; display mode emits raw
    /// string bodies.
    pub fn print(&self, readable: bool) -> String {
        match self {
            Value::Nil => "nil".to_string(),
            Value::Bool(boolean) => boolean.to_string(),
            Value::Int(int) => int.to_string(),
            Value::Float(float) => print_float(*float),
            Value::Sym(name) => name.clone(),
            Value::Keyword(name) => format!(":{}", name),
            Value::Str(text) if readable => escape(text),
            Value::Str(text) => text.clone(),
            Value::List(items) => print_seq(items, readable, '(', ')'),
            Value::Vector(items) => print_seq(items, readable, '[', ']'),
            Value::Map(entries) => print_map(entries, readable),
            Value::Builtin(builtin) => format!("#<builtin {}>", builtin.name),
            Value::Closure(closure) if closure.is_macro => "#<macro>".to_string(),
            Value::Closure(..) => "#<function>".to_string(),
            Value::Atom(cell) => format!("(atom {})", cell.borrow().print(readable)),
        }
    }
}

/// Inserts an entry keeping keys unique: an equal key overwrites in place,
/// preserving the original insertion order.
pub fn map_insert(
    entries: &mut im_rc::Vector<(Value, Value)>,
    key: Value,
    value: Value,
) -> Result<()> {
    for entry in entries.iter_mut() {
        if entry.0.try_eq(&key)? {
            entry.1 = value;
            return Ok(());
        }
    }
    entries.push_back((key, value));
    Ok(())
}

fn seq_eq(a: &im_rc::Vector<Value>, b: &im_rc::Vector<Value>) -> Result<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (x, y) in a.iter().zip(b.iter()) {
        if !x.try_eq(y)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn map_eq(a: &im_rc::Vector<(Value, Value)>, b: &im_rc::Vector<(Value, Value)>) -> Result<bool> {
    if a.len() != b.len() {
        return Ok(false);
    }
    for (key, value) in a {
        let mut found = false;
        for (other_key, other_value) in b {
            if key.try_eq(other_key)? {
                found = value.try_eq(other_value)?;
                break;
            }
        }
        if !found {
            return Ok(false);
        }
    }
    Ok(true)
}

fn print_float(float: f64) -> String {
    // keep the decimal point so the text reads back as a float
    if float.is_finite() && float.fract() == 0.0 {
        format!("{:.1}", float)
    } else {
        float.to_string()
    }
}

fn print_seq(items: &im_rc::Vector<Value>, readable: bool, open: char, close: char) -> String {
    let body = items
        .iter()
        .map(|item| item.print(readable))
        .collect::<Vec<_>>()
        .join(" ");
    format!("{}{}{}", open, body, close)
}

fn print_map(entries: &im_rc::Vector<(Value, Value)>, readable: bool) -> String {
    let body = entries
        .iter()
        .map(|(key, value)| format!("{} {}", key.print(readable), value.print(readable)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{{{}}}", body)
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for chr in text.chars() {
        match chr {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            chr => out.push(chr),
        }
    }
    out.push('"');
    out
}

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.print(true))
    }
}

/// A scope for a builtin function call.
pub struct CallScope {
    pub args: Vec<Value>,
    pub env: Env,
}

impl CallScope {
    pub fn at(&self, nth: usize) -> Value {
        self.args.get(nth).cloned().unwrap_or(Value::Nil)
    }

    pub fn assert_arity(&self, size: usize) -> Result<()> {
        if self.args.len() != size {
            Err(Error::WrongArity(size, self.args.len()))
        } else {
            Ok(())
        }
    }

    pub fn assert_at_least(&self, size: usize) -> Result<()> {
        if self.args.len() < size {
            Err(Error::WrongArity(size, self.args.len()))
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;

    fn int_list(ints: &[i64]) -> im_rc::Vector<Value> {
        ints.iter().map(|n| Value::Int(*n)).collect()
    }

    #[test]
    fn lists_and_vectors_compare_across_tags() {
        let list = Value::List(int_list(&[1, 2]));
        let vector = Value::Vector(int_list(&[1, 2]));
        assert!(list.try_eq(&vector).unwrap());

        let shorter = Value::Vector(int_list(&[1]));
        assert!(!list.try_eq(&shorter).unwrap());
    }

    #[test]
    fn maps_compare_as_sets() {
        let mut a = im_rc::Vector::new();
        map_insert(&mut a, Value::Keyword("a".into()), Value::Int(1)).unwrap();
        map_insert(&mut a, Value::Keyword("b".into()), Value::Int(2)).unwrap();

        let mut b = im_rc::Vector::new();
        map_insert(&mut b, Value::Keyword("b".into()), Value::Int(2)).unwrap();
        map_insert(&mut b, Value::Keyword("a".into()), Value::Int(1)).unwrap();

        assert!(Value::Map(a).try_eq(&Value::Map(b)).unwrap());
    }

    #[test]
    fn map_insert_overwrites_equal_keys() {
        let mut entries = im_rc::Vector::new();
        map_insert(&mut entries, Value::Keyword("a".into()), Value::Int(1)).unwrap();
        map_insert(&mut entries, Value::Keyword("a".into()), Value::Int(2)).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(Value::Map(entries).print(true), "{:a 2}");
    }

    #[test]
    fn atoms_compare_by_deref() {
        let a = Value::Atom(Rc::new(RefCell::new(Value::Int(1))));
        let b = Value::Atom(Rc::new(RefCell::new(Value::Int(1))));
        assert!(a.try_eq(&b).unwrap());
    }

    #[test]
    fn function_equality_is_an_error() {
        let builtin = Value::Builtin(Builtin {
            name: "id",
            call: |scope| Ok(scope.at(0)),
        });
        assert!(matches!(
            builtin.try_eq(&Value::Nil),
            Err(Error::Uncomparable(..))
        ));
    }

    #[test]
    fn int_and_float_compare_numerically() {
        assert!(Value::Int(3).try_eq(&Value::Float(3.0)).unwrap());
        assert!(!Value::Float(3.5).try_eq(&Value::Int(3)).unwrap());
    }

    #[test]
    fn count_is_partial() {
        assert_eq!(Value::Nil.count("count").unwrap(), 0);
        assert_eq!(Value::Str("abc".into()).count("count").unwrap(), 3);
        assert!(matches!(
            Value::Keyword("a".into()).count("empty?"),
            Err(Error::Uncountable("empty?", _))
        ));
    }

    #[test]
    fn readable_printing_escapes_strings() {
        let text = Value::Str("a\"b\\c\nd".into());
        assert_eq!(text.print(true), "\"a\\\"b\\\\c\\nd\"");
        assert_eq!(text.print(false), "a\"b\\c\nd");
    }

    #[test]
    fn floats_keep_their_decimal_point() {
        assert_eq!(Value::Float(6.0).print(true), "6.0");
        assert_eq!(Value::Float(0.5).print(true), "0.5");
    }
}
