//! The article iteration driver.

use crate::files::ArticleFiles;
use crate::key::{DedupPolicy, MatchKey};
use crate::resolver::Resolution;
use crate::table::ArticleTable;
use crate::target::MetadataTarget;
use folio_store::{ArchivalUnit, CachedUrl};
use std::collections::HashSet;
use std::iter::FusedIterator;

/// Counters describing one iteration pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IterationStats {
    /// URLs enumerated from the AU.
    pub visited: usize,
    /// URLs that passed the subtree, pattern and MIME filters.
    pub candidates: usize,
    pub emitted: usize,
    pub deferred: usize,
    pub unrecognized: usize,
    /// Articles dropped because their match key was already emitted.
    pub duplicates: usize,
}

enum State {
    Scanning,
    Resolving(CachedUrl),
    Finished,
}

/// Single forward pass over one AU's stored URLs, producing each article once,
/// in the lexical order of the URL that started it.
///
/// Pull-based: nothing happens until [`next`](Iterator::next) is called, and
/// dropping the iterator is all it takes to stop early.
pub struct SubTreeArticleIterator<'a> {
    table: &'a ArticleTable,
    au: &'a dyn ArchivalUnit,
    target: MetadataTarget,
    /// Roots not yet scanned, in reverse so the next one can be popped.
    pending_roots: Vec<Option<&'a str>>,
    cus: Option<Box<dyn Iterator<Item = CachedUrl> + 'a>>,
    state: State,
    emitted: HashSet<MatchKey>,
    stats: IterationStats,
}
impl<'a> SubTreeArticleIterator<'a> {
    pub(crate) fn new(table: &'a ArticleTable, au: &'a dyn ArchivalUnit, target: MetadataTarget) -> Self {
        let mut pending_roots: Vec<Option<&'a str>> = match table.spec.roots.is_empty() {
            true => vec![None],
            false => table.spec.roots.iter().map(|root| Some(root.as_str())).collect(),
        };
        pending_roots.reverse();
        Self {
            table,
            au,
            target,
            pending_roots,
            cus: None,
            state: State::Scanning,
            emitted: HashSet::new(),
            stats: IterationStats::default(),
        }
    }

    pub fn stats(&self) -> IterationStats {
        self.stats
    }

    pub fn target(&self) -> &MetadataTarget {
        &self.target
    }

    /// Next stored URL that passes every candidate filter, moving on to the
    /// next root whenever one is exhausted.
    fn next_candidate(&mut self) -> Option<CachedUrl> {
        loop {
            if self.cus.is_none() {
                let root = self.pending_roots.pop()?;
                tracing::trace!(root = root.unwrap_or("<all>"), "scanning root");
                let au = self.au;
                self.cus = Some(au.cu_iter(root));
            }
            let Some(cu) = self.cus.as_mut().and_then(|cus| cus.next()) else {
                self.cus = None;
                continue;
            };
            self.stats.visited += 1;
            if !self.table.in_subtree(&cu) || self.unchanged(&cu) || !self.table.is_article_cu(&cu, &self.target) {
                continue;
            }
            self.stats.candidates += 1;
            return Some(cu);
        }
    }

    fn unchanged(&self, cu: &CachedUrl) -> bool {
        match (self.target.changed_after(), cu.last_modified()) {
            (Some(after), Some(modified)) => modified <= after,
            _ => false,
        }
    }

    /// Resolves a candidate, applying match key deduplication.
    fn visit(&mut self, cu: &CachedUrl) -> Option<ArticleFiles> {
        match self.table.resolve(self.au, cu, &self.target) {
            Resolution::Article(af) => {
                if self.table.dedup == DedupPolicy::MatchKey
                    && let Some(key) = af.match_key()
                    && !self.emitted.insert(key.clone())
                {
                    self.stats.duplicates += 1;
                    tracing::warn!(
                        url = cu.url(),
                        key = %key,
                        au = self.au.name(),
                        "mismatch between article iterator factory and article iterator: article already emitted"
                    );
                    return None;
                }
                self.stats.emitted += 1;
                Some(af)
            },
            Resolution::Deferred { .. } => {
                self.stats.deferred += 1;
                None
            },
            Resolution::Unrecognized => {
                self.stats.unrecognized += 1;
                None
            },
        }
    }
}

impl Iterator for SubTreeArticleIterator<'_> {
    type Item = ArticleFiles;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match std::mem::replace(&mut self.state, State::Finished) {
                State::Finished => return None,
                State::Scanning => match self.next_candidate() {
                    Some(cu) => self.state = State::Resolving(cu),
                    None => {
                        let stats = self.stats;
                        tracing::debug!(
                            au = self.au.name(),
                            visited = stats.visited,
                            candidates = stats.candidates,
                            emitted = stats.emitted,
                            deferred = stats.deferred,
                            duplicates = stats.duplicates,
                            "article iteration finished"
                        );
                        return None;
                    },
                },
                State::Resolving(cu) => {
                    self.state = State::Scanning;
                    if let Some(af) = self.visit(&cu) {
                        return Some(af);
                    }
                },
            }
        }
    }
}

impl FusedIterator for SubTreeArticleIterator<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aspect::AspectDef;
    use crate::builder::ArticleIteratorBuilder;
    use crate::roles::Role;
    use crate::spec::IteratorSpec;
    use folio_store::{AuParams, MemoryStore};
    use time::macros::datetime;

    fn ojs_builder() -> ArticleIteratorBuilder {
        ArticleIteratorBuilder::new()
            .with_spec(
                IteratorSpec::new()
                    .with_root_templates(["{{ base_url }}"])
                    .with_pattern_template(r"^{{ base_url }}article/(viewFile|download)/[^/]+/[^/?]+$"),
            )
            .add_aspect(AspectDef::major(
                [r"/article/(?:viewFile|download)/([^/]+)/([^/]+)$"],
                ["/article/viewFile/$1/$2", "/article/download/$1/$2"],
                [Role::FULL_TEXT_PDF],
            ))
            .add_aspect(AspectDef::minor(["/article/view/$1"], [Role::ABSTRACT]))
    }

    fn ojs_store() -> MemoryStore {
        MemoryStore::new("ojs").with_param("base_url", "http://j.org/").with_cus([
            CachedUrl::pdf("http://j.org/article/download/1/10"),
            CachedUrl::pdf("http://j.org/article/viewFile/1/10"),
            CachedUrl::html("http://j.org/article/view/1"),
            CachedUrl::pdf("http://j.org/article/download/2/20"),
            CachedUrl::html("http://j.org/issue/view/3"),
        ])
    }

    fn full_texts(iter: impl Iterator<Item = ArticleFiles>) -> Vec<String> {
        iter.filter_map(|af| af.full_text_url().map(str::to_string)).collect()
    }

    #[test]
    fn test_same_aspect_duplicates_are_deduplicated() {
        let au = ojs_store();
        let table = ojs_builder().build(au.params()).unwrap();
        let mut iter = table.iterator(&au, MetadataTarget::any());
        let urls = full_texts(&mut iter);
        assert_eq!(urls, ["http://j.org/article/download/1/10", "http://j.org/article/download/2/20"]);
        let stats = iter.stats();
        assert_eq!(stats.duplicates, 1);
        assert_eq!(stats.emitted, 2);
        assert_eq!(stats.candidates, 3);
        assert_eq!(stats.visited, 5);
    }

    #[test]
    fn test_deferral_only_keeps_legacy_duplicates() {
        let au = ojs_store();
        let table = ojs_builder().with_dedup(DedupPolicy::DeferralOnly).build(au.params()).unwrap();
        assert_eq!(table.iterator(&au, MetadataTarget::any()).count(), 3);
    }

    #[test]
    fn test_changed_after_skips_unchanged() {
        let au = MemoryStore::new("ojs").with_param("base_url", "http://j.org/").with_cus([
            CachedUrl::pdf("http://j.org/article/download/1/10").with_last_modified(datetime!(2020-01-01 0:00 UTC)),
            CachedUrl::pdf("http://j.org/article/download/2/20").with_last_modified(datetime!(2022-01-01 0:00 UTC)),
            CachedUrl::pdf("http://j.org/article/download/3/30"),
        ]);
        let table = ojs_builder().build(au.params()).unwrap();
        let target = MetadataTarget::any().with_changed_after(datetime!(2021-01-01 0:00 UTC));
        assert_eq!(
            full_texts(table.iterator(&au, target)),
            ["http://j.org/article/download/2/20", "http://j.org/article/download/3/30"]
        );
    }

    #[test]
    fn test_roots_scanned_in_order_and_once() {
        let au = MemoryStore::new("x").with_cus([
            CachedUrl::html("http://x.org/b/1"),
            CachedUrl::html("http://x.org/a/1"),
            CachedUrl::html("http://x.org/a/2"),
            CachedUrl::html("http://x.org/c/1"),
        ]);
        let table = ArticleIteratorBuilder::new()
            .with_spec(IteratorSpec::new().with_roots(["http://x.org/b/", "http://x.org/a/", "http://x.org/a/2"]))
            .build(&AuParams::new())
            .unwrap();
        assert_eq!(
            full_texts(table.iterator(&au, MetadataTarget::any())),
            ["http://x.org/a/1", "http://x.org/a/2", "http://x.org/b/1"]
        );
    }

    #[test]
    fn test_fused_after_exhaustion() {
        let au = MemoryStore::new("empty");
        let table = ArticleIteratorBuilder::new().build(&AuParams::new()).unwrap();
        let mut iter = table.iterator(&au, MetadataTarget::any());
        assert!(iter.next().is_none());
        assert!(iter.next().is_none());
    }
}
