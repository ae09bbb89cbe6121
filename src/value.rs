use im_rc::Vector;

use std::{
    fmt::{self, Display},
    rc::Rc,
};

use crate::error::LispError;

pub type Args = Vector<Value>;
pub type EvalResult = Result<Value, LispError>;
pub type BuiltinFunction = fn(Args) -> EvalResult;

/// A parsed expression and a runtime value at the same time.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Symbol(Rc<String>),
    List(Vector<Value>),
    Integer(i128),
    Decimal(f64),
    String(Rc<String>),
    Bool(bool),
    Char(char),
}

impl Value {
    #[inline]
    pub fn bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[inline]
    pub fn make_symbol<I: Into<String>>(s: I) -> Self {
        Value::Symbol(Rc::new(s.into()))
    }

    #[inline]
    pub fn make_string<I: Into<String>>(s: I) -> Self {
        Value::String(Rc::new(s.into()))
    }

    #[inline]
    pub fn make_list<I: IntoIterator<Item = Value>>(i: I) -> Self {
        Value::List(i.into_iter().collect())
    }
}

/// Names the reader accepts after `#\`, paired with the character they denote.
pub const CHAR_NAMES: &[(&str, char)] = &[
    ("space", ' '),
    ("newline", '\n'),
    ("return", '\r'),
    ("linefeed", '\n'),
    ("tab", '\t'),
    ("vtab", '\x0b'),
    ("backspace", '\x08'),
];

impl Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Symbol(s) => write!(f, "{}", s),
            Self::String(s) => write!(f, "\"{}\"", s),
            Self::Integer(n) => write!(f, "{}", n),
            // never exponent notation, and always a fraction so it reads back
            Self::Decimal(n) => {
                let text = n.to_string();
                if text.contains('.') {
                    write!(f, "{}", text)
                } else {
                    write!(f, "{}.0", text)
                }
            }
            Self::Bool(true) => write!(f, "#t"),
            Self::Bool(false) => write!(f, "#f"),
            Self::Char(c) => match CHAR_NAMES.iter().find(|(_, named)| named == c) {
                Some((name, _)) => write!(f, "#\\{}", name),
                None => write!(f, "#\\{}", c),
            },
            Self::List(l) => {
                write!(f, "(")?;
                display_seq(l.iter(), f)?;
                write!(f, ")")
            }
        }
    }
}

pub fn display_seq<P: Display, I: Iterator<Item = P>>(mut i: I, f: &mut fmt::Formatter) -> fmt::Result {
    if let Some(e) = i.next() {
        write!(f, "{}", e)?;
    }

    for e in i {
        write!(f, " {}", e)?;
    }

    Ok(())
}

/// Space separated rendering of a value sequence, as used in arity errors.
pub fn unwords<'a, I: IntoIterator<Item = &'a Value>>(values: I) -> String {
    values
        .into_iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}
