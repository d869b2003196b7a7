//! Compiled URL patterns and their matches.

use crate::error::{ErrorKind, Result};
use crate::replace::Replacement;
use exn::ResultExt;
use regex::{Captures, Regex, RegexBuilder};
use std::fmt::{Display, Formatter, Result as FmtResult};
use std::ops::Range;

/// A compiled URL regular expression.
///
/// Patterns are matched with *find* semantics (anywhere in the URL) unless
/// anchored by the pattern itself. Case-insensitive is the default since every
/// publisher site observed so far treats URL paths that way.
#[derive(Debug, Clone)]
pub struct UrlPattern {
    regex: Regex,
    case_insensitive: bool,
}
impl UrlPattern {
    pub fn new(pattern: &str, case_insensitive: bool) -> Result<Self> {
        let regex = RegexBuilder::new(pattern)
            .case_insensitive(case_insensitive)
            .build()
            .or_raise(|| ErrorKind::InvalidRegex(pattern.to_string()))?;
        Ok(Self { regex, case_insensitive })
    }

    /// Compiles a case-insensitive pattern.
    pub fn insensitive(pattern: &str) -> Result<Self> {
        Self::new(pattern, true)
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn is_case_insensitive(&self) -> bool {
        self.case_insensitive
    }

    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Finds the first match anywhere in `url`, keeping its capturing groups.
    pub fn find<'h>(&self, url: &'h str) -> Option<PatternMatch<'h>> {
        self.regex.captures(url).map(|captures| PatternMatch {
            haystack: url,
            captures,
            case_insensitive: self.case_insensitive,
        })
    }

    /// `true` if the pattern matches starting at the very beginning of `url`,
    /// i.e. `url` lies within a subtree this pattern describes.
    pub fn matches_prefix(&self, url: &str) -> bool {
        self.regex.find(url).is_some_and(|m| m.start() == 0)
    }
}

impl Display for UrlPattern {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.regex.as_str())
    }
}

/// One successful [`UrlPattern::find`]: the URL it was found in and the
/// values of every capturing group.
#[derive(Debug)]
pub struct PatternMatch<'h> {
    haystack: &'h str,
    captures: Captures<'h>,
    case_insensitive: bool,
}
impl<'h> PatternMatch<'h> {
    pub fn haystack(&self) -> &'h str {
        self.haystack
    }

    /// Byte range of the whole match within the haystack.
    pub fn range(&self) -> Range<usize> {
        self.captures.get(0).map(|m| m.range()).unwrap_or_default()
    }

    /// Number of capturing groups in the pattern, not counting group 0.
    pub fn group_count(&self) -> usize {
        self.captures.len().saturating_sub(1)
    }

    /// Value of group `index`, or `None` if it doesn't exist or didn't
    /// participate in the match.
    pub fn group(&self, index: usize) -> Option<&'h str> {
        self.captures.get(index).map(|m| m.as_str())
    }

    pub fn named(&self, name: &str) -> Option<&'h str> {
        self.captures.name(name).map(|m| m.as_str())
    }

    /// Values of every capturing group (group 0 excluded). Groups that didn't
    /// participate are empty strings; values are lower-cased when the pattern
    /// is case-insensitive, so that two URLs differing only in case yield the
    /// same tuple.
    pub fn groups(&self) -> Vec<String> {
        (1..self.captures.len())
            .map(|index| {
                let value = self.group(index).unwrap_or_default();
                match self.case_insensitive {
                    true => value.to_lowercase(),
                    false => value.to_string(),
                }
            })
            .collect()
    }

    /// Replaces the matched region of the haystack with the expansion of
    /// `replacement`, leaving everything before and after the match intact.
    ///
    /// Returns `None` when the replacement references a group this pattern
    /// doesn't have; such a derived URL simply doesn't exist.
    pub fn replace_first(&self, replacement: &Replacement) -> Option<String> {
        let range = self.range();
        let expanded = replacement.expand(self)?;
        let mut url = String::with_capacity(self.haystack.len() + expanded.len());
        url.push_str(&self.haystack[..range.start]);
        url.push_str(&expanded);
        url.push_str(&self.haystack[range.end..]);
        Some(url)
    }
}
