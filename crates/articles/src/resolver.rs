//! Resolution of one candidate URL into an article.

use crate::files::ArticleFiles;
use crate::key::MatchKey;
use crate::table::ArticleTable;
use crate::target::MetadataTarget;
use folio_store::{ArchivalUnit, CachedUrl};
use tracing::instrument;

/// Outcome of resolving one candidate URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The URL starts an article.
    Article(ArticleFiles),
    /// The URL belongs to an article that a higher-precedence aspect, found at
    /// `to`, is responsible for.
    Deferred { to: String },
    /// No aspect recognizes the URL. The usual outcome for tables of contents,
    /// images, stylesheets…
    Unrecognized,
}
impl Resolution {
    pub fn into_article(self) -> Option<ArticleFiles> {
        match self {
            Self::Article(af) => Some(af),
            _ => None,
        }
    }
}

impl ArticleTable {
    /// Builds the article `cu` starts, if it starts one.
    ///
    /// 1. The first aspect (in declaration order) with a pattern found in the
    ///    URL, and whose content requirement the URL satisfies, recognizes it.
    /// 2. If any aspect declared before the recognizing one can derive a URL
    ///    with acceptable content from the same match, that aspect owns the
    ///    article and this URL is deferred.
    /// 3. Otherwise `cu` becomes the provisional full text and fills the
    ///    recognizing aspect's roles. Unless `target` only counts articles,
    ///    every later aspect then fills its roles from the first of its
    ///    replacements found with content, and roles derived from other roles
    ///    are assigned. Roles already set are never overwritten.
    /// 4. Finally a declared full-text role order, if any, picks the full text.
    ///
    /// A table without aspects makes every candidate an article on its own.
    #[instrument(level = "trace", skip_all, fields(url = cu.url()))]
    pub fn resolve(&self, au: &dyn ArchivalUnit, cu: &CachedUrl, target: &MetadataTarget) -> Resolution {
        let url = cu.url();
        if self.aspects.is_empty() {
            let mut af = ArticleFiles::new();
            af.set_provisional_full_text_cu(cu.clone());
            af.set_match_key(MatchKey::for_url(url));
            return Resolution::Article(af);
        }

        for (position, aspect) in self.aspects.iter().enumerate() {
            let Some(m) = aspect.find(url) else {
                continue;
            };
            if !aspect.content().accepts(cu) {
                tracing::trace!(aspect = position, "pattern matched but content type was rejected");
                continue;
            }

            for higher in &self.aspects[..position] {
                if let Some(higher_cu) = higher.find_cu(au, &m) {
                    tracing::trace!(to = higher_cu.url(), "deferring");
                    return Resolution::Deferred { to: higher_cu.url().to_string() };
                }
            }

            let mut af = ArticleFiles::new();
            af.set_provisional_full_text_cu(cu.clone());
            af.set_match_key(MatchKey::from_match(&m));
            aspect.process_roles(&mut af, cu);

            if !target.is_article() {
                for lower in &self.aspects[position + 1..] {
                    if let Some(lower_cu) = lower.find_cu(au, &m) {
                        lower.process_roles(&mut af, &lower_cu);
                    }
                }
                for (role, candidates) in &self.roles_from_other_roles {
                    if let Some(found) = candidates.iter().find_map(|other| af.role_cu(other).cloned()) {
                        tracing::trace!(role = %role, url = found.url(), "role derived from other roles");
                        af.set_role_cu(role.clone(), found);
                    }
                }
            }

            af.full_text_from_roles(&self.full_text_from_roles);
            return Resolution::Article(af);
        }

        tracing::debug!(url, au = au.name(), "did not match any expected patterns");
        Resolution::Unrecognized
    }
}
