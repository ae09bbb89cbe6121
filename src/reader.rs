use im_rc::{vector, Vector};
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use std::iter::Peekable;

use crate::{
    error::{Position, ReadError, ReadErrorKind},
    value::{Value, CHAR_NAMES},
};

lazy_static! {
    static ref TOKEN_RE: Regex =
        Regex::new(r###"(?s)\s*([\[\]{}()']|"(?:\\.|[^\\"])*"?|[^\s\[\]{}()'"]+)"###).unwrap();
    static ref INTEGER_RE: Regex = Regex::new(r"^[0-9]+$").unwrap();
    static ref DECIMAL_RE: Regex = Regex::new(r"^[0-9]+\.[0-9]+$").unwrap();
    static ref SYMBOL_RE: Regex = Regex::new(
        r"^[\p{Alphabetic}!#$%&|*+\-/:<=>?@^_~][\p{Alphabetic}0-9!#$%&|*+\-/:<=>?@^_~]*$"
    )
    .unwrap();
    static ref CHAR_RE: Regex = Regex::new(r"^\p{Alphabetic}+$").unwrap();
}

/// Reads the first expression of `s`. Anything after it is left unread.
pub fn read(s: &str) -> Result<Value, ReadError> {
    debug!("reader::read(), input: {:?}", s);

    Reader {
        input: s,
        tokens: TOKEN_RE
            .captures_iter(s)
            .filter_map(|c| c.get(1).map(|m| (m.start(), m.as_str())))
            .peekable(),
    }
    .read()
}

struct Reader<'s, I: Iterator<Item = (usize, &'s str)>> {
    input: &'s str,
    tokens: Peekable<I>,
}

impl<'s, I: Iterator<Item = (usize, &'s str)>> Reader<'s, I> {
    fn read(&mut self) -> Result<Value, ReadError> {
        let (offset, token) = match self.tokens.next() {
            Some(t) => t,
            None => return Err(self.unexpected_end()),
        };

        match token {
            "'" => self.read_quote(),
            "(" | "[" | "{" => self.read_list(),
            ")" | "]" | "}" => Err(self.error(
                offset,
                ReadErrorKind::UnexpectedClose(token.chars().next().unwrap_or(')')),
            )),
            token if token.starts_with('"') => self.read_string(offset, token),
            token => self.read_atom(offset, token),
        }
    }

    // Bracket kinds are interchangeable: `(` may be closed by `]` or `}`.
    fn read_list(&mut self) -> Result<Value, ReadError> {
        let mut list = Vector::new();
        loop {
            match self.tokens.peek().map(|&(_, token)| token) {
                None => return Err(self.unexpected_end()),
                Some(")") | Some("]") | Some("}") => {
                    self.tokens.next();
                    return Ok(Value::List(list));
                }
                Some(_) => list.push_back(self.read()?),
            }
        }
    }

    fn read_quote(&mut self) -> Result<Value, ReadError> {
        Ok(Value::List(vector![
            Value::make_symbol("quote"),
            self.read()?
        ]))
    }

    fn read_atom(&self, offset: usize, token: &str) -> Result<Value, ReadError> {
        match token {
            "#t" => Ok(Value::Bool(true)),
            "#f" => Ok(Value::Bool(false)),
            token if token.starts_with("#\\") => self.read_char(offset, &token[2..]),
            token if INTEGER_RE.is_match(token) => token.parse().map(Value::Integer).map_err(|_| {
                self.error(offset, ReadErrorKind::IntegerOutOfRange(token.into()))
            }),
            token if DECIMAL_RE.is_match(token) => token
                .parse()
                .map(Value::Decimal)
                .map_err(|_| self.error(offset, ReadErrorKind::InvalidToken(token.into()))),
            token if SYMBOL_RE.is_match(token) => Ok(Value::make_symbol(token)),
            token => Err(self.error(offset, ReadErrorKind::InvalidToken(token.into()))),
        }
    }

    fn read_char(&self, offset: usize, name: &str) -> Result<Value, ReadError> {
        if !CHAR_RE.is_match(name) {
            return Err(self.error(
                offset,
                ReadErrorKind::InvalidToken(format!("#\\{}", name)),
            ));
        }

        let mut chars = name.chars();
        if let (Some(c), None) = (chars.next(), chars.next()) {
            return Ok(Value::Char(c));
        }

        let lower = name.to_lowercase();
        CHAR_NAMES
            .iter()
            .find(|(known, _)| *known == lower)
            .map(|&(_, c)| Value::Char(c))
            .ok_or_else(|| self.error(offset, ReadErrorKind::UnknownCharName(name.into())))
    }

    fn read_string(&self, offset: usize, token: &str) -> Result<Value, ReadError> {
        let mut result = String::new();
        let mut chars = token.chars().skip(1);

        loop {
            match chars.next() {
                None => return Err(self.error(offset, ReadErrorKind::UnterminatedString)),
                Some('"') => break,
                Some('\\') => match chars.next() {
                    Some(escaped) => match unescape(escaped) {
                        Some(c) => result.push(c),
                        None => {
                            return Err(self.error(offset, ReadErrorKind::UnknownEscape(escaped)))
                        }
                    },
                    None => return Err(self.error(offset, ReadErrorKind::UnterminatedString)),
                },
                Some(c) => result.push(c),
            }
        }

        Ok(Value::make_string(result))
    }

    fn unexpected_end(&self) -> ReadError {
        self.error(self.input.len(), ReadErrorKind::UnexpectedEnd)
    }

    fn error(&self, offset: usize, kind: ReadErrorKind) -> ReadError {
        ReadError {
            position: Position::of_offset(self.input, offset),
            kind,
        }
    }
}

fn unescape(c: char) -> Option<char> {
    match c {
        '\\' => Some('\\'),
        'a' => Some('\x07'),
        'b' => Some('\x08'),
        't' => Some('\t'),
        'n' => Some('\n'),
        'v' => Some('\x0b'),
        'f' => Some('\x0c'),
        'r' => Some('\r'),
        '"' => Some('"'),
        _ => None,
    }
}
