//! Matcher replacement strings.
//!
//! Aspect derivation rewrites one matched URL into another by replacing the
//! matched region with a replacement string that refers back to capturing
//! groups. The syntax is the one publisher plugins have always used:
//!
//! - `$n` inserts group `n`. Digits are consumed greedily for as long as the
//!   resulting number is still a group of the pattern, so with 12 groups `$12`
//!   is group twelve but with 3 groups it is group one followed by a literal
//!   `2`.
//! - `${name}` inserts a named group.
//! - `\c` inserts the character `c` literally (so `\$` is a dollar sign).
//! - A group that exists but did not participate in the match inserts nothing.
//!
//! Syntax is checked once, when the replacement is parsed. Whether a group
//! number exists can only be known per match, so an out-of-range reference
//! makes [`PatternMatch::replace_first`] produce no URL rather than an error.

use crate::error::{ErrorKind, Result};
use crate::pattern::PatternMatch;
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    /// The raw run of digits following `$`; resolved against a match.
    Group(String),
    Named(String),
}

/// A parsed matcher replacement string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Replacement {
    source: String,
    pieces: Vec<Piece>,
}
impl Replacement {
    pub fn parse(source: &str) -> Result<Self> {
        let invalid = |reason: &str| ErrorKind::InvalidReplacement(format!("{source:?}: {reason}"));
        let mut pieces = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(escaped) => literal.push(escaped),
                    None => exn::bail!(invalid("trailing escape character")),
                },
                '$' => {
                    if !literal.is_empty() {
                        pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                    }
                    match chars.peek() {
                        Some('{') => {
                            chars.next();
                            let mut name = String::new();
                            loop {
                                match chars.next() {
                                    Some('}') => break,
                                    Some(c) if c.is_ascii_alphanumeric() || c == '_' => name.push(c),
                                    _ => exn::bail!(invalid("unterminated or invalid group name")),
                                }
                            }
                            if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
                                exn::bail!(invalid("invalid group name"));
                            }
                            pieces.push(Piece::Named(name));
                        },
                        Some(c) if c.is_ascii_digit() => {
                            let mut digits = String::new();
                            while let Some(c) = chars.next_if(char::is_ascii_digit) {
                                digits.push(c);
                            }
                            pieces.push(Piece::Group(digits));
                        },
                        _ => exn::bail!(invalid("'$' must be followed by a group number or ${name}")),
                    }
                },
                c => literal.push(c),
            }
        }
        if !literal.is_empty() {
            pieces.push(Piece::Literal(literal));
        }
        Ok(Self { source: source.to_string(), pieces })
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Expands the replacement against one match. `None` when a referenced
    /// group doesn't exist in the matching pattern.
    pub(crate) fn expand(&self, m: &PatternMatch<'_>) -> Option<String> {
        let group_count = m.group_count();
        let mut out = String::new();
        for piece in &self.pieces {
            match piece {
                Piece::Literal(text) => out.push_str(text),
                Piece::Named(name) => out.push_str(m.named(name)?),
                Piece::Group(digits) => {
                    let mut consumed = 0;
                    let mut index = 0usize;
                    for d in digits.chars().filter_map(|c| c.to_digit(10)) {
                        let candidate = index * 10 + d as usize;
                        if consumed > 0 && candidate > group_count {
                            break;
                        }
                        index = candidate;
                        consumed += 1;
                    }
                    if index > group_count {
                        tracing::trace!(replacement = %self.source, index, group_count, "no such group");
                        return None;
                    }
                    out.push_str(m.group(index).unwrap_or_default());
                    out.push_str(&digits[consumed..]);
                },
            }
        }
        Some(out)
    }
}

impl FromStr for Replacement {
    type Err = crate::error::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Display for Replacement {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.source)
    }
}
