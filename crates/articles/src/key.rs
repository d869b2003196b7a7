//! Article identity within one archival unit.

use folio_pattern::PatternMatch;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The values identifying one article within an AU, taken from the capturing
/// groups of the pattern that recognized it (a DOI, a volume and page, an
/// article id…).
///
/// Two trigger URLs of different shapes for the same article (its HTML and
/// its PDF, say) produce equal keys as long as their patterns capture the same
/// parts in the same order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MatchKey(Vec<String>);
impl MatchKey {
    pub fn new(parts: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self(parts.into_iter().map(Into::into).collect())
    }

    /// Key for a recognizing match. A pattern without capturing groups says
    /// nothing about identity, so the whole URL becomes the key instead.
    pub fn from_match(m: &PatternMatch<'_>) -> Self {
        match m.group_count() {
            0 => Self::for_url(m.haystack()),
            _ => Self(m.groups()),
        }
    }

    /// Key for an article that is nothing more than its own URL.
    pub fn for_url(url: &str) -> Self {
        Self(vec![url.to_string()])
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }
}

impl Display for MatchKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "({})", self.0.join(", "))
    }
}

/// How the iterator protects against emitting one article twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DedupPolicy {
    /// Remember the [`MatchKey`] of every emitted article and drop any later
    /// article with a key already seen, whatever URL shape it arrived as.
    #[default]
    MatchKey,
    /// Rely on aspect deferral alone. Two trigger URLs of the same aspect for
    /// one article both produce an article.
    DeferralOnly,
}
