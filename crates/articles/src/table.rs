//! A compiled article table for one archival unit.

use crate::aspect::Aspect;
use crate::iterator::SubTreeArticleIterator;
use crate::key::DedupPolicy;
use crate::roles::Role;
use crate::spec::CompiledSpec;
use crate::target::MetadataTarget;
use folio_store::{ArchivalUnit, CachedUrl};
use tracing::instrument;

/// Everything needed to turn one AU's stored URLs into articles: the scanned
/// subtrees, the candidate filter, and the ordered aspects.
///
/// Immutable once built, so one table can serve any number of concurrent
/// iterations over AUs sharing the same parameters.
#[derive(Debug, Clone)]
pub struct ArticleTable {
    pub(crate) spec: CompiledSpec,
    pub(crate) aspects: Vec<Aspect>,
    pub(crate) full_text_from_roles: Vec<Role>,
    pub(crate) roles_from_other_roles: Vec<(Role, Vec<Role>)>,
    pub(crate) dedup: DedupPolicy,
    pub(crate) default_mime_type: Option<String>,
}
impl ArticleTable {
    pub fn aspects(&self) -> &[Aspect] {
        &self.aspects
    }

    /// Root URLs scanned, in scan order. Empty means the whole AU.
    pub fn roots(&self) -> &[String] {
        &self.spec.roots
    }

    pub fn dedup(&self) -> DedupPolicy {
        self.dedup
    }

    /// The MIME type article candidates must have for `target`: the target's
    /// own format, else the spec's, else the plugin default.
    pub fn mime_type<'a>(&'a self, target: &'a MetadataTarget) -> Option<&'a str> {
        target
            .format()
            .or(self.spec.mime_type.as_deref())
            .or(self.default_mime_type.as_deref())
    }

    /// `true` if `cu` lies within the scanned subtrees.
    pub fn in_subtree(&self, cu: &CachedUrl) -> bool {
        self.spec.in_subtree(cu.url())
    }

    /// `true` if `cu` can be an article at all: it has content, it matches the
    /// master pattern, and its media type is the expected one.
    pub fn is_article_cu(&self, cu: &CachedUrl, target: &MetadataTarget) -> bool {
        if !cu.has_content() {
            return false;
        }
        // Pattern first; it's cheaper than looking at the content type.
        if self.spec.pattern.as_ref().is_some_and(|pattern| !pattern.is_match(cu.url())) {
            return false;
        }
        match self.mime_type(target) {
            Some(expected) => cu.media_type().is_some_and(|actual| actual.eq_ignore_ascii_case(expected)),
            None => true,
        }
    }

    /// Iterates over the articles of `au`.
    #[instrument(skip_all, fields(au = au.name(), purpose = %target.purpose()))]
    pub fn iterator<'a>(&'a self, au: &'a dyn ArchivalUnit, target: MetadataTarget) -> SubTreeArticleIterator<'a> {
        SubTreeArticleIterator::new(self, au, target)
    }
}
