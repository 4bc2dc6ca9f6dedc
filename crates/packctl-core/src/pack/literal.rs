//! Evaluation of collection-literal override values.
//!
//! Accepts the literal subset users type on the command line: quoted strings,
//! integers, floats, `True`/`False`/`None` (and `true`/`false`/`null`), lists,
//! tuples, dicts and sets, nested up to [`MAX_LITERAL_DEPTH`] levels. Tuples
//! and sets become YAML sequences. Anything else (names, calls, operators) is
//! rejected.

use serde_yaml::{Mapping, Number, Value};
use thiserror::Error;

/// Deepest collection nesting accepted in one literal. Kept well below the
/// YAML parser's recursion limit so a written values file can be read back.
pub const MAX_LITERAL_DEPTH: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} at offset {offset}")]
pub struct LiteralError {
    pub offset: usize,
    pub message: String,
}

/// Evaluate `text` as one literal value; trailing input is an error.
pub fn parse_literal(text: &str) -> Result<Value, LiteralError> {
    let mut parser = Parser {
        src: text,
        pos: 0,
        depth: 0,
    };
    let value = parser.value()?;
    parser.skip_ws();
    if let Some(c) = parser.peek() {
        return Err(parser.error(format!("unexpected '{c}' after literal")));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a str,
    pos: usize,
    /// Collections currently open.
    depth: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.bump();
        }
    }

    fn error(&self, message: impl Into<String>) -> LiteralError {
        LiteralError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn value(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        match self.peek() {
            None => Err(self.error("unexpected end of input")),
            Some(open @ ('[' | '(' | '{')) => {
                if self.depth == MAX_LITERAL_DEPTH {
                    return Err(self.error(format!(
                        "literal is nested deeper than {MAX_LITERAL_DEPTH} levels"
                    )));
                }
                self.bump();
                self.depth += 1;
                let value = self.collection(open)?;
                self.depth -= 1;
                Ok(value)
            }
            Some(q @ ('\'' | '"')) => {
                self.bump();
                self.string(q).map(Value::String)
            }
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() || c == '_' => self.keyword(),
            Some(c) => Err(self.error(format!("unexpected '{c}'"))),
        }
    }

    fn collection(&mut self, open: char) -> Result<Value, LiteralError> {
        match open {
            '[' => self.items(Vec::new(), ']').map(|(items, _)| Value::Sequence(items)),
            '(' => {
                let (mut items, saw_comma) = self.items(Vec::new(), ')')?;
                // `(x)` is a parenthesised value, `(x,)` a one-element tuple.
                if items.len() == 1 && !saw_comma {
                    Ok(items.remove(0))
                } else {
                    Ok(Value::Sequence(items))
                }
            }
            _ => self.braced(),
        }
    }

    /// Parse comma-separated values up to `close`, after the opening bracket
    /// (and any already parsed `items`). Returns whether a comma was seen.
    fn items(
        &mut self,
        mut items: Vec<Value>,
        close: char,
    ) -> Result<(Vec<Value>, bool), LiteralError> {
        let mut saw_comma = false;
        if items.is_empty() {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.bump();
                return Ok((items, saw_comma));
            }
            items.push(self.value()?);
        }
        loop {
            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    saw_comma = true;
                    self.skip_ws();
                    if self.peek() == Some(close) {
                        self.bump();
                        return Ok((items, saw_comma));
                    }
                    items.push(self.value()?);
                }
                Some(c) if c == close => {
                    self.bump();
                    return Ok((items, saw_comma));
                }
                Some(c) => return Err(self.error(format!("expected ',' or '{close}', found '{c}'"))),
                None => return Err(self.error(format!("expected ',' or '{close}'"))),
            }
        }
    }

    /// `{}` is an empty dict; `{k: v, ...}` a dict; `{a, b}` a set.
    fn braced(&mut self) -> Result<Value, LiteralError> {
        self.skip_ws();
        if self.peek() == Some('}') {
            self.bump();
            return Ok(Value::Mapping(Mapping::new()));
        }
        let first = self.value()?;
        self.skip_ws();
        if self.peek() != Some(':') {
            return self
                .items(vec![first], '}')
                .map(|(items, _)| Value::Sequence(items));
        }

        let mut map = Mapping::new();
        let mut key = first;
        loop {
            self.skip_ws();
            if self.peek() != Some(':') {
                return Err(self.error("expected ':' after dict key"));
            }
            if matches!(key, Value::Sequence(_) | Value::Mapping(_)) {
                return Err(self.error("dict keys must be scalars"));
            }
            self.bump();
            let value = self.value()?;
            map.insert(key, value);

            self.skip_ws();
            match self.peek() {
                Some(',') => {
                    self.bump();
                    self.skip_ws();
                    if self.peek() == Some('}') {
                        self.bump();
                        return Ok(Value::Mapping(map));
                    }
                    key = self.value()?;
                }
                Some('}') => {
                    self.bump();
                    return Ok(Value::Mapping(map));
                }
                Some(c) => return Err(self.error(format!("expected ',' or '}}', found '{c}'"))),
                None => return Err(self.error("expected ',' or '}'")),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<String, LiteralError> {
        let mut out = String::new();
        loop {
            match self.bump() {
                None | Some('\n') => return Err(self.error("unterminated string")),
                Some(c) if c == quote => return Ok(out),
                Some('\\') => match self.bump() {
                    None => return Err(self.error("unterminated string")),
                    Some('n') => out.push('\n'),
                    Some('t') => out.push('\t'),
                    Some('r') => out.push('\r'),
                    Some('0') => out.push('\0'),
                    Some('\n') => {}
                    Some(c @ ('\\' | '\'' | '"')) => out.push(c),
                    Some('x') => out.push(self.hex_escape(2)?),
                    Some('u') => out.push(self.hex_escape(4)?),
                    Some(other) => {
                        out.push('\\');
                        out.push(other);
                    }
                },
                Some(c) => out.push(c),
            }
        }
    }

    fn hex_escape(&mut self, digits: usize) -> Result<char, LiteralError> {
        let start = self.pos;
        for _ in 0..digits {
            match self.bump() {
                Some(c) if c.is_ascii_hexdigit() => {}
                _ => return Err(self.error("truncated escape sequence")),
            }
        }
        u32::from_str_radix(&self.src[start..self.pos], 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error("invalid escape sequence"))
    }

    fn number(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        if matches!(self.peek(), Some('+' | '-')) {
            self.bump();
        }
        let mut is_float = false;
        self.digits();
        if self.peek() == Some('.') {
            is_float = true;
            self.bump();
            self.digits();
        }
        if matches!(self.peek(), Some('e' | 'E')) {
            is_float = true;
            self.bump();
            if matches!(self.peek(), Some('+' | '-')) {
                self.bump();
            }
            self.digits();
        }

        let text = self.src[start..self.pos].replace('_', "");
        let invalid = || LiteralError {
            offset: start,
            message: format!("invalid number '{}'", &self.src[start..self.pos]),
        };
        if is_float {
            let f: f64 = text.parse().map_err(|_| invalid())?;
            return Ok(Value::Number(Number::from(f)));
        }
        if let Ok(i) = text.parse::<i64>() {
            return Ok(Value::Number(Number::from(i)));
        }
        if let Ok(u) = text.parse::<u64>() {
            return Ok(Value::Number(Number::from(u)));
        }
        Err(invalid())
    }

    /// Digits with single `_` separators between them.
    fn digits(&mut self) {
        let mut prev_digit = false;
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_digit() => prev_digit = true,
                Some('_') if prev_digit && self.digit_follows_separator() => prev_digit = false,
                _ => return,
            }
            self.bump();
        }
    }

    fn digit_follows_separator(&self) -> bool {
        self.src[self.pos + 1..].starts_with(|c: char| c.is_ascii_digit())
    }

    fn keyword(&mut self) -> Result<Value, LiteralError> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.bump();
        }
        match &self.src[start..self.pos] {
            "True" | "true" => Ok(Value::Bool(true)),
            "False" | "false" => Ok(Value::Bool(false)),
            "None" | "null" => Ok(Value::Null),
            word => Err(LiteralError {
                offset: start,
                message: format!("'{word}' is not a literal"),
            }),
        }
    }
}
