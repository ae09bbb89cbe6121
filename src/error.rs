use std::fmt::{self, Display};

use crate::value::{unwords, Args, Value};

/// 1-based location of a token in the reader's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn of_offset(input: &str, offset: usize) -> Self {
        let before = &input[..offset];
        let line = before.matches('\n').count() + 1;
        let column = match before.rfind('\n') {
            Some(newline) => before[newline + 1..].chars().count() + 1,
            None => before.chars().count() + 1,
        };
        Position { line, column }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadErrorKind {
    UnexpectedEnd,
    UnterminatedString,
    UnknownEscape(char),
    UnknownCharName(String),
    UnexpectedClose(char),
    InvalidToken(String),
    IntegerOutOfRange(String),
}

impl Display for ReadErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::UnexpectedEnd => write!(f, "unexpected end of input, expecting expression"),
            Self::UnterminatedString => write!(f, "could not find string terminator"),
            Self::UnknownEscape(c) => write!(f, "unknown escape sequence \\{}", c),
            Self::UnknownCharName(name) => write!(f, "unknown character name #\\{}", name),
            Self::UnexpectedClose(c) => write!(f, "unexpected '{}', expecting expression", c),
            Self::InvalidToken(t) => write!(f, "unexpected \"{}\", expecting expression", t),
            Self::IntegerOutOfRange(t) => write!(f, "integer literal {} is out of range", t),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadError {
    pub position: Position,
    pub kind: ReadErrorKind,
}

impl Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.kind)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LispError {
    WrongArgumentCount(usize, Vec<Value>),
    TypeMismatch(String, Value),
    ParseFailure(ReadError),
    MalformedSpecialForm(String, Value),
    UnknownFunction(String, String),
    /// Kept for variable support; nothing in evaluation raises it yet.
    UnboundName(String, String),
    Generic(String),
}

impl From<ReadError> for LispError {
    fn from(source: ReadError) -> Self {
        LispError::ParseFailure(source)
    }
}

impl Display for LispError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::WrongArgumentCount(expected, found) => write!(
                f,
                "Expected {} args; found values {}",
                expected,
                unwords(found)
            ),
            Self::TypeMismatch(expected, found) => {
                write!(f, "Invalid type: expected {}, found {}", expected, found)
            }
            Self::ParseFailure(e) => write!(f, "Parse error at {}", e),
            Self::MalformedSpecialForm(message, form) => write!(f, "{}: {}", message, form),
            Self::UnknownFunction(message, name) => write!(f, "{}: {:?}", message, name),
            Self::UnboundName(message, name) => write!(f, "{}: {}", message, name),
            Self::Generic(message) => write!(f, "{}", message),
        }
    }
}

pub fn arg_count<T>(expected: usize, found: &Args) -> Result<T, LispError> {
    Err(LispError::WrongArgumentCount(
        expected,
        found.iter().cloned().collect(),
    ))
}

pub fn type_mismatch<T>(expected: &str, found: &Value) -> Result<T, LispError> {
    Err(LispError::TypeMismatch(expected.into(), found.clone()))
}

pub fn bad_special_form<T>(form: Value) -> Result<T, LispError> {
    Err(LispError::MalformedSpecialForm(
        "Unrecognized special form".into(),
        form,
    ))
}

pub fn unknown_function<T>(name: &str) -> Result<T, LispError> {
    Err(LispError::UnknownFunction(
        "Unrecognized primitive function args".into(),
        name.into(),
    ))
}

pub fn division_by_zero<T, D: Display>(name: D, dividend: i128) -> Result<T, LispError> {
    Err(LispError::Generic(format!(
        "Division by zero: ({} {} 0)",
        name, dividend
    )))
}

pub fn numeric_overflow<T, D: Display>(name: D, first: i128, second: i128) -> Result<T, LispError> {
    Err(LispError::Generic(format!(
        "Numeric overflow: ({} {} {})",
        name, first, second
    )))
}
