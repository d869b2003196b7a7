//! Aspects: the declarative rows of an article table and their compiled form.

use crate::error::{ErrorKind, Result};
use crate::files::ArticleFiles;
use crate::roles::Role;
use exn::ResultExt;
use folio_pattern::{PatternMatch, Replacement, Template, TemplateContext, UrlPattern};
use folio_store::{ArchivalUnit, AuParams, CachedUrl};

/// A live content-type check an aspect's URL must pass, for sites that serve
/// different kinds of content under the same URL shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentRequirement {
    #[default]
    Any,
    Html,
    Pdf,
}
impl ContentRequirement {
    pub fn accepts(&self, cu: &CachedUrl) -> bool {
        match self {
            Self::Any => true,
            Self::Html => cu.is_html(),
            Self::Pdf => cu.is_pdf(),
        }
    }
}

/// One representation of an article, as a plugin declares it.
///
/// An aspect with at least one pattern is *major*: a URL matching it can start
/// an article. One without patterns is *minor*: it is only ever found by
/// rewriting another aspect's URL with its replacements.
///
/// Patterns are regex templates rendered against the AU's parameters, so they
/// may reference `{{ base_url }}` and friends. Replacements are plain matcher
/// replacement strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AspectDef {
    pub patterns: Vec<String>,
    pub replacements: Vec<String>,
    pub roles: Vec<Role>,
    pub content: ContentRequirement,
    /// Overrides the table-wide case sensitivity for this aspect's patterns.
    pub case_insensitive: Option<bool>,
}
impl AspectDef {
    pub fn major(
        patterns: impl IntoIterator<Item = impl Into<String>>,
        replacements: impl IntoIterator<Item = impl Into<String>>,
        roles: impl IntoIterator<Item = impl Into<Role>>,
    ) -> Self {
        Self {
            patterns: patterns.into_iter().map(Into::into).collect(),
            replacements: replacements.into_iter().map(Into::into).collect(),
            roles: roles.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn minor(
        replacements: impl IntoIterator<Item = impl Into<String>>,
        roles: impl IntoIterator<Item = impl Into<Role>>,
    ) -> Self {
        Self::major(Vec::<String>::new(), replacements, roles)
    }

    pub fn with_content(mut self, content: ContentRequirement) -> Self {
        self.content = content;
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = Some(case_insensitive);
        self
    }

    pub fn is_major(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub(crate) fn compile(&self, index: usize, params: &AuParams, case_insensitive: bool) -> Result<Aspect> {
        if self.replacements.is_empty() {
            exn::bail!(ErrorKind::InvalidAspect { index, reason: "no matcher replacements".to_string() });
        }
        if self.roles.is_empty() {
            exn::bail!(ErrorKind::InvalidAspect { index, reason: "no roles".to_string() });
        }
        let case_insensitive = self.case_insensitive.unwrap_or(case_insensitive);
        let mut patterns = Vec::with_capacity(self.patterns.len());
        for source in &self.patterns {
            let pattern = Template::parse(source, TemplateContext::Regex)
                .and_then(|template| template.render_pattern(params, case_insensitive))
                .or_raise(|| ErrorKind::Compile(format!("pattern {source:?} of aspect #{index}")))?;
            patterns.push(pattern);
        }
        let mut replacements = Vec::with_capacity(self.replacements.len());
        for source in &self.replacements {
            let replacement = Replacement::parse(source)
                .or_raise(|| ErrorKind::Compile(format!("replacement {source:?} of aspect #{index}")))?;
            replacements.push(replacement);
        }
        Ok(Aspect {
            index,
            patterns,
            replacements,
            roles: self.roles.clone(),
            content: self.content,
        })
    }
}

/// An [`AspectDef`] compiled for one archival unit.
#[derive(Debug, Clone)]
pub struct Aspect {
    index: usize,
    patterns: Vec<UrlPattern>,
    replacements: Vec<Replacement>,
    roles: Vec<Role>,
    content: ContentRequirement,
}
impl Aspect {
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_major(&self) -> bool {
        !self.patterns.is_empty()
    }

    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    pub fn content(&self) -> ContentRequirement {
        self.content
    }

    /// First of this aspect's patterns found in `url`.
    pub fn find<'h>(&self, url: &'h str) -> Option<PatternMatch<'h>> {
        self.patterns.iter().find_map(|pattern| pattern.find(url))
    }

    /// Applies each replacement in turn to another aspect's match and returns
    /// the first resulting URL stored with content acceptable to this aspect.
    pub fn find_cu(&self, au: &dyn ArchivalUnit, m: &PatternMatch<'_>) -> Option<CachedUrl> {
        self.replacements
            .iter()
            .filter_map(|replacement| m.replace_first(replacement))
            .filter_map(|url| au.lookup_with_content(&url))
            .find(|cu| self.content.accepts(cu))
    }

    /// Assigns `cu` to each of this aspect's roles not already taken.
    pub fn process_roles(&self, af: &mut ArticleFiles, cu: &CachedUrl) {
        for role in &self.roles {
            if !af.has_role(role) {
                tracing::trace!(role = %role, url = cu.url(), "role assigned");
                af.set_role_cu(role.clone(), cu.clone());
            }
        }
    }
}
