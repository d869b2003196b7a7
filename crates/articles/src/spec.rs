//! Which part of an archival unit is scanned for articles.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use folio_pattern::{Template, TemplateContext, UrlPattern};
use folio_store::AuParams;

/// Where to look for articles and what a candidate looks like.
///
/// Roots, patterns and subtree filters may be given literally or as templates
/// over the AU's parameters. Literal roots and root templates are mutually
/// exclusive, as are a literal pattern and a pattern template; asking for both
/// is reported when the spec is compiled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IteratorSpec {
    pub roots: Vec<String>,
    pub root_templates: Vec<String>,
    pub pattern: Option<String>,
    pub pattern_template: Option<String>,
    pub include_subtree: Option<String>,
    pub exclude_subtree: Option<String>,
    pub case_insensitive: bool,
    pub mime_type: Option<String>,
}
impl Default for IteratorSpec {
    fn default() -> Self {
        Self {
            roots: Vec::new(),
            root_templates: Vec::new(),
            pattern: None,
            pattern_template: None,
            include_subtree: None,
            exclude_subtree: None,
            case_insensitive: true,
            mime_type: None,
        }
    }
}
impl IteratorSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_roots(mut self, roots: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.roots.extend(roots.into_iter().map(Into::into));
        self
    }

    pub fn with_root_templates(mut self, templates: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.root_templates.extend(templates.into_iter().map(Into::into));
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    pub fn with_pattern_template(mut self, template: impl Into<String>) -> Self {
        self.pattern_template = Some(template.into());
        self
    }

    /// Only visit URLs lying under a subtree whose URL this regex template
    /// matches from the start.
    pub fn with_include_subtree(mut self, template: impl Into<String>) -> Self {
        self.include_subtree = Some(template.into());
        self
    }

    /// Never visit URLs lying under a subtree whose URL this regex template
    /// matches from the start.
    pub fn with_exclude_subtree(mut self, template: impl Into<String>) -> Self {
        self.exclude_subtree = Some(template.into());
        self
    }

    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub(crate) fn compile(&self, params: &AuParams) -> Result<CompiledSpec> {
        if !self.roots.is_empty() && !self.root_templates.is_empty() {
            exn::bail!(ErrorKind::InvalidSpec("roots and root templates are mutually exclusive".to_string()));
        }
        if self.pattern.is_some() && self.pattern_template.is_some() {
            exn::bail!(ErrorKind::InvalidSpec("pattern and pattern template are mutually exclusive".to_string()));
        }

        let mut roots = self.roots.clone();
        for source in &self.root_templates {
            let root = Template::parse(source, TemplateContext::Url)
                .and_then(|template| template.render(params))
                .or_raise(|| ErrorKind::Compile(format!("root template {source:?}")))?;
            roots.push(root);
        }

        let pattern = match (&self.pattern, &self.pattern_template) {
            (Some(regex), _) => Some(
                UrlPattern::new(regex, self.case_insensitive)
                    .or_raise(|| ErrorKind::Compile(format!("pattern {regex:?}")))?,
            ),
            (None, Some(source)) => Some(self.regex_template(source, params, "pattern template")?),
            (None, None) => None,
        };
        let include_subtree = match &self.include_subtree {
            Some(source) => Some(self.regex_template(source, params, "include-subtree pattern")?),
            None => None,
        };
        let exclude_subtree = match &self.exclude_subtree {
            Some(source) => Some(self.regex_template(source, params, "exclude-subtree pattern")?),
            None => None,
        };

        Ok(CompiledSpec {
            roots: normalize_roots(roots),
            pattern,
            include_subtree,
            exclude_subtree,
            mime_type: self.mime_type.clone(),
        })
    }

    fn regex_template(&self, source: &str, params: &AuParams, what: &str) -> Result<UrlPattern> {
        Template::parse(source, TemplateContext::Regex)
            .and_then(|template| template.render_pattern(params, self.case_insensitive))
            .or_raise(|| ErrorKind::Compile(format!("{what} {source:?}")))
    }
}

/// An [`IteratorSpec`] rendered and compiled for one AU.
#[derive(Debug, Clone)]
pub(crate) struct CompiledSpec {
    /// Sorted, with roots lying under another root removed. Empty means the
    /// whole AU.
    pub(crate) roots: Vec<String>,
    pub(crate) pattern: Option<UrlPattern>,
    pub(crate) include_subtree: Option<UrlPattern>,
    pub(crate) exclude_subtree: Option<UrlPattern>,
    pub(crate) mime_type: Option<String>,
}
impl CompiledSpec {
    /// `true` if `url` is inside the subtrees this spec visits.
    pub(crate) fn in_subtree(&self, url: &str) -> bool {
        if self.include_subtree.as_ref().is_some_and(|include| !include.matches_prefix(url)) {
            return false;
        }
        !self.exclude_subtree.as_ref().is_some_and(|exclude| exclude.matches_prefix(url))
    }
}

/// Sorts roots and drops any root already covered by a shorter one, so that
/// scanning them in turn visits every URL once and in lexical order.
fn normalize_roots(mut roots: Vec<String>) -> Vec<String> {
    roots.sort();
    roots.dedup();
    let mut kept: Vec<String> = Vec::with_capacity(roots.len());
    for root in roots {
        if kept.last().is_some_and(|previous| root.starts_with(previous.as_str())) {
            continue;
        }
        kept.push(root);
    }
    kept
}
