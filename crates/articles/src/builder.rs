//! Declarative construction of an article table.

use crate::aspect::AspectDef;
use crate::error::{ErrorKind, Result};
use crate::key::DedupPolicy;
use crate::roles::Role;
use crate::spec::IteratorSpec;
use crate::table::ArticleTable;
use folio_store::AuParams;
use tracing::instrument;

/// Declares how one publisher's URLs fit together into articles, independent
/// of any particular archival unit.
///
/// Aspects are tried in declaration order: the first whose pattern matches a
/// URL recognizes it, and earlier aspects take precedence over later ones
/// (see [`ArticleTable::resolve`]). [`build`](Self::build) compiles the whole
/// declaration against one AU's parameters.
///
/// # Examples
///
/// ```
/// use folio_articles::{ArticleIteratorBuilder, AspectDef, IteratorSpec, MetadataTarget, Role};
/// use folio_store::{AuParams, CachedUrl, MemoryStore};
///
/// let builder = ArticleIteratorBuilder::new()
///     .with_spec(IteratorSpec::new().with_root_templates(["{{ base_url }}"]))
///     .add_aspect(AspectDef::major([r"/article/view/(\d+)$"], ["/article/view/$1"], [Role::ABSTRACT]))
///     .add_aspect(AspectDef::minor(["/article/cite/$1"], [Role::CITATION_RIS]));
///
/// let params = AuParams::new().with("base_url", "http://j.org/");
/// let table = builder.build(&params).unwrap();
/// let au = MemoryStore::new("j").with_params(params).with_cus([
///     CachedUrl::html("http://j.org/article/view/1"),
///     CachedUrl::new("http://j.org/article/cite/1", Some("application/x-research-info-systems".to_string())),
/// ]);
///
/// let articles: Vec<_> = table.iterator(&au, MetadataTarget::metadata()).collect();
/// assert_eq!(articles.len(), 1);
/// assert_eq!(articles[0].role_url(Role::CITATION_RIS), Some("http://j.org/article/cite/1"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleIteratorBuilder {
    spec: IteratorSpec,
    aspects: Vec<AspectDef>,
    full_text_from_roles: Vec<Role>,
    roles_from_other_roles: Vec<(Role, Vec<Role>)>,
    dedup: DedupPolicy,
    default_mime_type: Option<String>,
}
impl ArticleIteratorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_spec(mut self, spec: IteratorSpec) -> Self {
        self.spec = spec;
        self
    }

    pub fn spec(&self) -> &IteratorSpec {
        &self.spec
    }

    pub fn add_aspect(mut self, aspect: AspectDef) -> Self {
        self.aspects.push(aspect);
        self
    }

    pub fn aspects(&self) -> &[AspectDef] {
        &self.aspects
    }

    /// Once all aspects are found, the full text becomes the first populated
    /// role of `roles` (or nothing, if none is populated).
    pub fn with_full_text_from_roles(mut self, roles: impl IntoIterator<Item = impl Into<Role>>) -> Self {
        self.full_text_from_roles = roles.into_iter().map(Into::into).collect();
        self
    }

    /// Once all aspects are found, `role` is assigned whatever the first
    /// populated role of `others` holds. Declarations are applied in order,
    /// so a later one can build on an earlier one; redeclaring a role
    /// replaces its candidates.
    pub fn with_role_from_other_roles(
        mut self,
        role: impl Into<Role>,
        others: impl IntoIterator<Item = impl Into<Role>>,
    ) -> Self {
        let role = role.into();
        let others: Vec<Role> = others.into_iter().map(Into::into).collect();
        match self.roles_from_other_roles.iter_mut().find(|(existing, _)| *existing == role) {
            Some((_, candidates)) => *candidates = others,
            None => self.roles_from_other_roles.push((role, others)),
        }
        self
    }

    pub fn with_dedup(mut self, dedup: DedupPolicy) -> Self {
        self.dedup = dedup;
        self
    }

    /// MIME type article candidates must have when neither the iteration
    /// target nor the spec names one.
    pub fn with_default_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.default_mime_type = Some(mime_type.into());
        self
    }

    /// Renders and compiles everything against one AU's parameters.
    #[instrument(skip_all, fields(aspects = self.aspects.len()))]
    pub fn build(&self, params: &AuParams) -> Result<ArticleTable> {
        if !self.aspects.is_empty() && !self.aspects.iter().any(AspectDef::is_major) {
            exn::bail!(ErrorKind::InvalidSpec("no aspect has a pattern, so nothing can start an article".to_string()));
        }
        let spec = self.spec.compile(params)?;
        let aspects = self
            .aspects
            .iter()
            .enumerate()
            .map(|(index, def)| def.compile(index, params, self.spec.case_insensitive))
            .collect::<Result<Vec<_>>>()?;
        tracing::debug!(roots = spec.roots.len(), "article table compiled");
        Ok(ArticleTable {
            spec,
            aspects,
            full_text_from_roles: self.full_text_from_roles.clone(),
            roles_from_other_roles: self.roles_from_other_roles.clone(),
            dedup: self.dedup,
            default_mime_type: self.default_mime_type.clone(),
        })
    }
}
