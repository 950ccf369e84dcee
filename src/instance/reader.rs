//! Line-oriented reader for the textual instance format.

use std::iter::{Enumerate, Peekable};
use std::str::Lines;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::ConfigError;

/// A list of values together with the line it was read from.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub line: usize,
    pub values: Vec<f64>,
}

/// Hands out non-blank, trimmed lines and parses them as scalars, arrays
/// or matrices.
pub struct InstanceReader<'a> {
    lines: Peekable<Enumerate<Lines<'a>>>,
    line: usize,
}

impl<'a> InstanceReader<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate().peekable(),
            line: 0,
        }
    }

    /// 1-based number of the line read last.
    pub fn line(&self) -> usize {
        self.line
    }

    /// Builds a parse error for the line read last.
    pub fn error(&self, message: impl Into<String>) -> ConfigError {
        ConfigError::Parse {
            line: self.line,
            message: message.into(),
        }
    }

    fn next_line(&mut self) -> Result<&'a str, ConfigError> {
        for (index, raw) in self.lines.by_ref() {
            self.line = index + 1;
            let trimmed = raw.trim();
            if !trimmed.is_empty() {
                return Ok(trimmed);
            }
        }
        self.line += 1;
        Err(self.error("unexpected end of input"))
    }

    fn values(&self, text: &str) -> Result<Vec<f64>, ConfigError> {
        parse_values(text).map_err(|message| self.error(message))
    }

    /// The part after `=` of a `name=...;` line.
    fn assigned(&mut self, expecting: &str) -> Result<&'a str, ConfigError> {
        let line = self.next_line()?;
        match line.split_once('=') {
            Some((_, value)) if !value.contains('=') => Ok(value),
            _ => Err(self.error(format!("expected {expecting}"))),
        }
    }

    /// Reads `name=value;`.
    pub fn scalar(&mut self) -> Result<f64, ConfigError> {
        let value = self.assigned("name=value;")?;
        match self.values(value)?.as_slice() {
            [x] => Ok(*x),
            _ => Err(self.error("expected name=value;")),
        }
    }

    /// Reads `name=value;` where value is a non-negative integer.
    pub fn count(&mut self) -> Result<usize, ConfigError> {
        let value = self.scalar()?;
        if value < 0.0 || value.fract() != 0.0 {
            return Err(self.error(format!("count must be a non-negative integer, found {value}")));
        }
        Ok(value as usize)
    }

    /// Reads `name=[v,v,...];`.
    pub fn array(&mut self) -> Result<Row, ConfigError> {
        let value = self.assigned("name=[v,v,...];")?;
        Ok(Row {
            line: self.line,
            values: self.values(value)?,
        })
    }

    /// Reads a `name=[` header, one row per line and a closing line
    /// containing `];`. A header that already contains `];` is an empty
    /// matrix.
    pub fn matrix(&mut self) -> Result<Vec<Row>, ConfigError> {
        let header = self.next_line()?;
        if !header.contains('=') {
            return Err(self.error("expected name=[ opening a matrix"));
        }
        if header.contains("];") {
            return Ok(Vec::new());
        }

        let mut rows = Vec::new();
        loop {
            let line = self.next_line()?;
            if line.contains("];") {
                return Ok(rows);
            }
            rows.push(Row {
                line: self.line,
                values: self.values(line)?,
            });
        }
    }

    /// Fails if anything but blank lines is left.
    pub fn finish(mut self) -> Result<(), ConfigError> {
        match self.lines.find(|(_, raw)| !raw.trim().is_empty()) {
            Some((index, _)) => {
                self.line = index + 1;
                Err(self.error("unexpected trailing content"))
            }
            None => Ok(()),
        }
    }
}

/// Anchored decimal number: optional sign, fraction and exponent.
const NUMBER: &str = r"^[-+]?(\d+\.?\d*|\.\d+)([eE][-+]?\d+)?$";

fn number_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(NUMBER).expect("number pattern is valid"))
}

/// Parses a comma-separated value list such as `[1,0,-2.5];` or `3;`.
///
/// Surrounding brackets, a trailing `;` or `,` and whitespace around
/// tokens are ignored. Every token must be a complete number; the first
/// one that is not is returned as the error.
pub fn parse_values(text: &str) -> Result<Vec<f64>, String> {
    let body = text.trim().trim_end_matches([';', ',']).trim();
    let body = body.strip_prefix('[').unwrap_or(body);
    let body = body.strip_suffix(']').unwrap_or(body).trim();
    if body.is_empty() {
        return Ok(Vec::new());
    }

    body.split(',')
        .map(str::trim)
        .map(|token| {
            if !number_pattern().is_match(token) {
                return Err(format!("malformed number {token:?}"));
            }
            token
                .parse::<f64>()
                .map_err(|e| format!("malformed number {token:?}: {e}"))
        })
        .collect()
}
