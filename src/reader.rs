//! The reader is responsible for parsing source text into values: a single
//! scan tokenizes the input, then a recursive-descent parser keyed on each
//! token's first character builds the value. The reader main function is
//! [read].

use crate::error::{Error, Result};
use crate::value::{map_insert, Value};

/// Raw tokens produced by [tokenize]. An unterminated string is surfaced as
/// its own token so the parser can reject it with a precise error.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// The two-character splice marker `~@`.
    SpliceUnquote,
    /// One of `[ ] { } ( ) ' ` ~ ^ @`.
    Punct(char),
    /// A balanced double-quoted string, body kept with its escapes.
    Str(String),
    Unterminated,
    /// A bare run of non-delimiter characters.
    Atom(String),
}

/// Splits source text into tokens, skipping whitespace, commas and `;`
/// comments.
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut peekable = input.chars().peekable();
    let mut tokens = Vec::new();

    while let Some(chr) = peekable.next() {
        match chr {
            chr if chr.is_whitespace() || chr == ',' => continue,
            ';' => {
                while let Some(&chr) = peekable.peek() {
                    if chr == '\n' {
                        break;
                    }
                    peekable.next();
                }
            }
            '~' => {
                if peekable.peek() == Some(&'@') {
                    peekable.next();
                    tokens.push(Token::SpliceUnquote);
                } else {
                    tokens.push(Token::Punct('~'));
                }
            }
            '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '`' | '^' | '@' => {
                tokens.push(Token::Punct(chr));
            }
            '"' => {
                let mut body = String::new();
                let mut closed = false;

                while let Some(chr) = peekable.next() {
                    match chr {
                        '"' => {
                            closed = true;
                            break;
                        }
                        '\\' => {
                            body.push('\\');
                            if let Some(escaped) = peekable.next() {
                                body.push(escaped);
                            }
                        }
                        chr => body.push(chr),
                    }
                }

                tokens.push(if closed {
                    Token::Str(body)
                } else {
                    Token::Unterminated
                });
            }
            chr => {
                let mut atom: String = chr.into();

                while let Some(&next) = peekable.peek() {
                    if next.is_whitespace()
                        || matches!(
                            next,
                            ',' | ';' | '[' | ']' | '{' | '}' | '(' | ')' | '\'' | '`' | '"'
                        )
                    {
                        break;
                    }
                    atom.push(next);
                    peekable.next();
                }

                tokens.push(Token::Atom(atom));
            }
        }
    }

    tokens
}

/// Reads one form from the input. Empty input reads as nil.
pub fn read(input: &str) -> Result<Value> {
    let tokens = tokenize(input);
    if tokens.is_empty() {
        return Ok(Value::Nil);
    }

    Parser {
        tokens,
        position: 0,
    }
    .read_form()
}

struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn next(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    fn read_form(&mut self) -> Result<Value> {
        let Some(token) = self.next() else {
            return Err(Error::Syntax("unexpected end of input".to_string()));
        };

        match token {
            Token::Punct('(') => Ok(Value::List(self.read_seq(')')?)),
            Token::Punct('[') => Ok(Value::Vector(self.read_seq(']')?)),
            Token::Punct('{') => self.read_map(),
            Token::Punct(closer @ (')' | ']' | '}')) => {
                Err(Error::Syntax(format!("unexpected '{}'", closer)))
            }
            Token::Punct('\'') => self.read_prefixed("quote"),
            Token::Punct('`') => self.read_prefixed("quasiquote"),
            Token::Punct('~') => self.read_prefixed("unquote"),
            Token::SpliceUnquote => self.read_prefixed("splice-unquote"),
            Token::Punct('@') => self.read_prefixed("deref"),
            Token::Punct(chr) => Ok(Value::sym(chr.to_string())),
            Token::Str(body) => {
                let text = unescape::unescape(&body)
                    .ok_or_else(|| Error::Syntax("invalid escape in string".to_string()))?;
                Ok(Value::Str(text))
            }
            Token::Unterminated => Err(Error::Syntax("unterminated string".to_string())),
            Token::Atom(text) => Ok(classify(text)),
        }
    }

    /// A reader macro: consumes the marker's token, then reads the one form
    /// that follows and wraps it as `(name form)`.
    fn read_prefixed(&mut self, name: &str) -> Result<Value> {
        let form = self.read_form()?;
        Ok(Value::list(vec![Value::sym(name), form]))
    }

    fn read_seq(&mut self, closer: char) -> Result<im_rc::Vector<Value>> {
        let mut items = im_rc::Vector::new();

        loop {
            match self.peek() {
                None => {
                    return Err(Error::Syntax(format!("expected '{}', got EOF", closer)));
                }
                Some(Token::Punct(chr)) if *chr == closer => {
                    self.next();
                    return Ok(items);
                }
                Some(..) => items.push_back(self.read_form()?),
            }
        }
    }

    fn read_map(&mut self) -> Result<Value> {
        let forms = self.read_seq('}')?;
        if forms.len() % 2 != 0 {
            return Err(Error::Syntax("odd map arguments".to_string()));
        }

        let mut entries = im_rc::Vector::new();
        let mut forms = forms.into_iter();
        while let (Some(key), Some(value)) = (forms.next(), forms.next()) {
            map_insert(&mut entries, key, value)?;
        }

        Ok(Value::Map(entries))
    }
}

/// Classifies a bare atom: integer, then float, then the literal words, then
/// keyword, and a symbol otherwise.
fn classify(text: String) -> Value {
    if let Some(number) = classify_number(&text) {
        return number;
    }

    match text.as_str() {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        "nil" => Value::Nil,
        _ if text.starts_with(':') => Value::Keyword(text[1..].to_string()),
        _ => Value::Sym(text),
    }
}

fn classify_number(text: &str) -> Option<Value> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if !digits.starts_with(|chr: char| chr.is_ascii_digit()) {
        return None;
    }

    if digits.chars().all(|chr| chr.is_ascii_digit()) {
        return text.parse().ok().map(Value::Int);
    }
    if digits.chars().all(|chr| chr.is_ascii_digit() || chr == '.') {
        return text.parse().ok().map(Value::Float);
    }
    None
}
