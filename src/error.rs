/// Definitions of errors that can occur while reading or evaluating code.
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("syntax error: {0}")]
    Syntax(String),

    #[error("symbol '{0}' not found")]
    UndefinedSymbol(String),

    #[error("'{0}' is not a function")]
    NotCallable(String),

    #[error("expected a symbol but got '{0}'")]
    ExpectedSymbol(String),

    #[error("expected a number but got '{0}'")]
    ExpectedNumber(String),

    #[error("expected a string but got '{0}'")]
    ExpectedString(String),

    #[error("expected a list or vector but got '{0}'")]
    ExpectedSequence(String),

    #[error("expected an atom but got '{0}'")]
    ExpectedAtom(String),

    #[error("wrong arity, expected {0} arguments, got {1}")]
    WrongArity(usize, usize),

    #[error("cannot check '{0}' for '{1}'")]
    Uncountable(&'static str, String),

    #[error("cannot compare '{0}' for equality")]
    Uncomparable(String),

    #[error("cannot reduce an empty sequence without an initial value")]
    EmptyReduce,

    #[error("division by zero in '{0}'")]
    DivisionByZero(&'static str),

    #[error("index {0} out of bounds for sequence of length {1}")]
    IndexOutOfBounds(i64, usize),

    #[error("file '{0}' not found")]
    FileNotFound(String),
}
