//! In-memory archival unit.

use crate::cached::CachedUrl;
use crate::params::AuParams;
use crate::unit::ArchivalUnit;
use std::collections::BTreeMap;

/// In-memory archival unit.
///
/// Handles are kept in a `BTreeMap` keyed by URL, which gives lexical
/// enumeration order and cheap prefix scans for free. Used by tests and by the
/// CLI after reading a [manifest](crate::manifest).
///
/// # Examples
///
/// ```
/// use folio_store::{ArchivalUnit, CachedUrl, MemoryStore};
///
/// let au = MemoryStore::new("nejm-2011")
///     .with_param("base_url", "http://www.nejm.org/")
///     .with_cu(CachedUrl::html("http://www.nejm.org/doi/full/10.1056/NEJMoa1"))
///     .with_cu(CachedUrl::pdf("http://www.nejm.org/doi/pdf/10.1056/NEJMoa1"));
///
/// assert_eq!(au.cu_iter(Some("http://www.nejm.org/doi/pdf/")).count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    name: String,
    params: AuParams,
    urls: BTreeMap<String, CachedUrl>,
}
impl MemoryStore {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_params(mut self, params: AuParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key, value);
        self
    }

    pub fn with_cu(mut self, cu: CachedUrl) -> Self {
        self.insert(cu);
        self
    }

    pub fn with_cus(mut self, cus: impl IntoIterator<Item = CachedUrl>) -> Self {
        for cu in cus {
            self.insert(cu);
        }
        self
    }

    /// Stores a handle, replacing any previous handle for the same URL.
    pub fn insert(&mut self, cu: CachedUrl) -> Option<CachedUrl> {
        self.urls.insert(cu.url().to_string(), cu)
    }

    pub fn params_mut(&mut self) -> &mut AuParams {
        &mut self.params
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}

impl ArchivalUnit for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn params(&self) -> &AuParams {
        &self.params
    }

    fn lookup(&self, url: &str) -> Option<CachedUrl> {
        self.urls.get(url).cloned()
    }

    fn cu_iter<'a>(&'a self, root: Option<&'a str>) -> Box<dyn Iterator<Item = CachedUrl> + 'a> {
        match root {
            None => Box::new(self.urls.values().cloned()),
            Some(root) => Box::new(
                self.urls
                    .range::<str, _>((std::ops::Bound::Included(root), std::ops::Bound::Unbounded))
                    .take_while(move |(url, _)| url.starts_with(root))
                    .map(|(_, cu)| cu.clone()),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> MemoryStore {
        MemoryStore::new("test").with_cus([
            CachedUrl::html("http://x.org/b/2"),
            CachedUrl::html("http://x.org/a/1"),
            CachedUrl::html("http://x.org/b/1"),
            CachedUrl::html("http://x.org/ba"),
            CachedUrl::without_content("http://x.org/c"),
        ])
    }

    #[test]
    fn test_lexical_order() {
        let urls: Vec<_> = store().cu_iter(None).map(|cu| cu.url().to_string()).collect();
        assert_eq!(
            urls,
            ["http://x.org/a/1", "http://x.org/b/1", "http://x.org/b/2", "http://x.org/ba", "http://x.org/c"]
        );
    }

    #[test]
    fn test_prefix_scan() {
        let store = store();
        let urls: Vec<_> = store.cu_iter(Some("http://x.org/b/")).map(|cu| cu.url().to_string()).collect();
        assert_eq!(urls, ["http://x.org/b/1", "http://x.org/b/2"]);
        assert_eq!(store.cu_iter(Some("http://elsewhere.org/")).count(), 0);
    }

    #[test]
    fn test_lookup_with_content() {
        let store = store();
        assert!(store.lookup("http://x.org/c").is_some());
        assert!(store.lookup_with_content("http://x.org/c").is_none());
        assert!(store.lookup_with_content("http://x.org/a/1").is_some());
    }

    #[test]
    fn test_insert_replaces() {
        let mut store = store();
        let previous = store.insert(CachedUrl::pdf("http://x.org/c"));
        assert!(previous.is_some_and(|cu| !cu.has_content()));
        assert!(store.lookup_with_content("http://x.org/c").is_some());
        assert_eq!(store.len(), 5);
    }
}
