//! Path grammar and tokenizer
//!
//! A path is a `.`-separated list of tokens. Each token names an object
//! field, an array index, or a field followed by an index:
//!
//! ```text
//! path   := "" | "." | token ("." token)*
//! token  := field | index | field index
//! field  := (any char except digit, whitespace, '[') (any char except whitespace, '[')*
//! index  := "[" "-"? digit+ "]"
//! ```
//!
//! Negative indexes address elements from the end of an array.

use std::fmt;
use std::str::FromStr;

use crate::error::{JsonKvError, Result};

/// One path segment
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    /// Object field to look up
    pub field: Option<String>,

    /// Array position to resolve after the field lookup
    pub index: Option<i64>,
}

impl Token {
    /// A token addressing an object field
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            field: Some(name.into()),
            index: None,
        }
    }

    /// A token addressing an array element
    pub fn index(index: i64) -> Self {
        Self {
            field: None,
            index: Some(index),
        }
    }

    /// A token addressing an element of the array stored under `name`
    pub fn field_index(name: impl Into<String>, index: i64) -> Self {
        Self {
            field: Some(name.into()),
            index: Some(index),
        }
    }

    /// Parse a single segment (the text between two dots)
    pub fn parse(segment: &str) -> Result<Self> {
        let (field, bracket) = match segment.find('[') {
            Some(pos) => segment.split_at(pos),
            None => (segment, ""),
        };

        if field.is_empty() && bracket.is_empty() {
            return Err(invalid(segment, "is empty"));
        }

        let field = if field.is_empty() {
            None
        } else {
            validate_field(segment, field)?;
            Some(field.to_string())
        };

        let index = if bracket.is_empty() {
            None
        } else {
            Some(parse_index(segment, bracket)?)
        };

        Ok(Self { field, index })
    }
}

fn validate_field(segment: &str, field: &str) -> Result<()> {
    if field.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(invalid(segment, "starts with a digit"));
    }
    if field.chars().any(char::is_whitespace) {
        return Err(invalid(segment, "contains whitespace"));
    }
    Ok(())
}

/// Parse `[n]` / `[-n]`, which must close the segment
fn parse_index(segment: &str, bracket: &str) -> Result<i64> {
    let inner = bracket
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| invalid(segment, "has a malformed index"))?;

    let digits = inner.strip_prefix('-').unwrap_or(inner);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid(segment, "has a non-numeric index"));
    }

    inner
        .parse::<i64>()
        .map_err(|_| invalid(segment, "has an index that does not fit in 64 bits"))
}

fn invalid(segment: &str, reason: &str) -> JsonKvError {
    JsonKvError::InvalidPath(format!("segment '{}' {}", segment, reason))
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(field) = &self.field {
            write!(f, "{}", field)?;
        }
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

/// A parsed path, outermost token first
///
/// The empty path (written `""` or `"."`) addresses the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path {
    tokens: Vec<Token>,
}

impl Path {
    /// The whole-document path
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from already-validated tokens
    pub fn from_tokens(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    /// Parse a dotted path string
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() || text == "." {
            return Ok(Self::root());
        }

        let tokens = text
            .split('.')
            .map(Token::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { tokens })
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// True for the whole-document path
    pub fn is_root(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl FromStr for Path {
    type Err = JsonKvError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.tokens.is_empty() {
            return write!(f, ".");
        }
        for (i, token) in self.tokens.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
