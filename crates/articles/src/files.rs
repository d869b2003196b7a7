//! The reconstructed article record.

use crate::key::MatchKey;
use crate::roles::Role;
use folio_store::CachedUrl;
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter, Result as FmtResult, Write};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
enum FullText {
    #[default]
    Unset,
    /// Set by the resolver from the trigger URL; a declared full-text role
    /// order may replace it.
    Provisional(CachedUrl),
    /// Set explicitly; never replaced by a role order.
    Explicit(CachedUrl),
}
impl FullText {
    fn cu(&self) -> Option<&CachedUrl> {
        match self {
            Self::Unset => None,
            Self::Provisional(cu) | Self::Explicit(cu) => Some(cu),
        }
    }
}

/// All the stored files making up one logical article, keyed by role, plus
/// the one designated as its full text.
///
/// Roles keep the order they were first assigned in. Unset roles are the
/// common case, so every accessor returns an `Option` rather than failing.
///
/// # Examples
///
/// ```
/// use folio_articles::{ArticleFiles, Role};
/// use folio_store::CachedUrl;
///
/// let mut af = ArticleFiles::new();
/// af.set_full_text_cu(CachedUrl::html("http://x.org/doi/full/1"));
/// af.set_role_cu(Role::FULL_TEXT_HTML, CachedUrl::html("http://x.org/doi/full/1"));
/// af.set_role_cu(Role::FULL_TEXT_PDF, None);
///
/// assert_eq!(af.full_text_url(), Some("http://x.org/doi/full/1"));
/// assert_eq!(af.role_url(Role::FULL_TEXT_PDF), None);
/// assert_eq!(af.to_string(), "[af: ft=http://x.org/doi/full/1, FullTextHtml=http://x.org/doi/full/1]");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleFiles {
    full_text: FullText,
    roles: Vec<(Role, CachedUrl)>,
    properties: BTreeMap<String, String>,
    match_key: Option<MatchKey>,
}
impl ArticleFiles {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn full_text_cu(&self) -> Option<&CachedUrl> {
        self.full_text.cu()
    }

    pub fn full_text_url(&self) -> Option<&str> {
        self.full_text_cu().map(CachedUrl::url)
    }

    /// Designates the full text explicitly. Passing `None` clears it.
    ///
    /// An explicitly set full text takes precedence over any declared
    /// full-text role order.
    pub fn set_full_text_cu(&mut self, cu: impl Into<Option<CachedUrl>>) {
        self.full_text = cu.into().map_or(FullText::Unset, FullText::Explicit);
    }

    /// Designates the full text provisionally, as the resolver does with the
    /// URL that triggered the article.
    pub fn set_provisional_full_text_cu(&mut self, cu: impl Into<Option<CachedUrl>>) {
        self.full_text = cu.into().map_or(FullText::Unset, FullText::Provisional);
    }

    /// `true` when the full text was designated with
    /// [`set_full_text_cu`](Self::set_full_text_cu).
    pub fn has_explicit_full_text(&self) -> bool {
        matches!(self.full_text, FullText::Explicit(_))
    }

    /// Re-designates the full text as the first populated role of `order`,
    /// or clears it if none is populated. An explicitly designated full text
    /// is left alone.
    pub fn full_text_from_roles(&mut self, order: &[Role]) {
        if order.is_empty() || self.has_explicit_full_text() {
            return;
        }
        let found = order.iter().find_map(|role| self.role_cu(role).cloned());
        if let Some(cu) = &found {
            tracing::trace!(url = cu.url(), "full text reset from roles");
        }
        self.set_provisional_full_text_cu(found);
    }

    /// Attaches `cu` under `role`, replacing any previous assignment but
    /// keeping the role's original position. `None` does nothing, so callers
    /// can pass the result of a lookup straight through.
    pub fn set_role_cu(&mut self, role: impl Into<Role>, cu: impl Into<Option<CachedUrl>>) {
        let Some(cu) = cu.into() else {
            return;
        };
        let role = role.into();
        match self.roles.iter_mut().find(|(existing, _)| *existing == role) {
            Some((_, slot)) => *slot = cu,
            None => self.roles.push((role, cu)),
        }
    }

    pub fn role_cu(&self, role: impl AsRef<str>) -> Option<&CachedUrl> {
        let role = role.as_ref();
        self.roles.iter().find(|(existing, _)| existing.as_str() == role).map(|(_, cu)| cu)
    }

    pub fn role_url(&self, role: impl AsRef<str>) -> Option<&str> {
        self.role_cu(role).map(CachedUrl::url)
    }

    pub fn has_role(&self, role: impl AsRef<str>) -> bool {
        self.role_cu(role).is_some()
    }

    /// Populated roles in the order they were first assigned.
    pub fn roles(&self) -> impl Iterator<Item = (&Role, &CachedUrl)> {
        self.roles.iter().map(|(role, cu)| (role, cu))
    }

    pub fn role_count(&self) -> usize {
        self.roles.len()
    }

    /// `true` if neither a full text nor any role is set.
    pub fn is_empty(&self) -> bool {
        self.full_text.cu().is_none() && self.roles.is_empty()
    }

    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.properties.insert(key.into(), value.into());
    }

    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).map(String::as_str)
    }

    pub fn properties(&self) -> &BTreeMap<String, String> {
        &self.properties
    }

    /// Identity of this article within its AU, when it was produced by a
    /// pattern match.
    pub fn match_key(&self) -> Option<&MatchKey> {
        self.match_key.as_ref()
    }

    pub fn set_match_key(&mut self, key: MatchKey) {
        self.match_key = Some(key);
    }

    /// Multi-line, human-readable dump of the full text and every role.
    pub fn pretty(&self) -> String {
        let mut out = String::new();
        // Writing to a String can't fail.
        let _ = writeln!(out, "Full text: {}", self.full_text_url().unwrap_or("-"));
        for (role, cu) in &self.roles {
            let _ = writeln!(out, "  {role}: {}", cu.url());
        }
        for (key, value) in &self.properties {
            let _ = writeln!(out, "  ({key}: {value})");
        }
        out
    }
}

impl Display for ArticleFiles {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "[af: ft={}", self.full_text_url().unwrap_or("-"))?;
        for (role, cu) in &self.roles {
            write!(f, ", {role}={}", cu.url())?;
        }
        f.write_str("]")
    }
}
