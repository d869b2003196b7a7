//! The archival unit abstraction.
//!
//! An archival unit ("AU") is one harvested collection, typically one journal
//! volume or year, addressed by URL. Article discovery only ever reads from
//! an AU, so the trait is deliberately narrow: enumerate, look up, describe.

use crate::cached::CachedUrl;
use crate::params::AuParams;

/// Read-only view of a crawled archival unit.
///
/// # Ordering
/// [`cu_iter()`](ArchivalUnit::cu_iter) must yield URLs in lexical order of
/// the URL string. Article iteration relies on that order being stable: the
/// same AU always produces the same articles in the same order.
///
/// # Examples
///
/// ```
/// use folio_store::{ArchivalUnit, CachedUrl, MemoryStore};
///
/// let au = MemoryStore::new("demo").with_cu(CachedUrl::html("http://x.org/a"));
/// let urls: Vec<_> = au.cu_iter(None).map(|cu| cu.url().to_string()).collect();
/// assert_eq!(urls, ["http://x.org/a"]);
/// assert!(au.lookup("http://x.org/missing").is_none());
/// ```
pub trait ArchivalUnit: Send + Sync {
    /// Human-readable name, used in log output.
    fn name(&self) -> &str;

    /// Configuration parameters of this AU.
    fn params(&self) -> &AuParams;

    /// Looks up the handle for an exact URL. Absence is not an error.
    fn lookup(&self, url: &str) -> Option<CachedUrl>;

    /// Enumerates every stored URL, optionally restricted to those beginning
    /// with `root`, in lexical order.
    fn cu_iter<'a>(&'a self, root: Option<&'a str>) -> Box<dyn Iterator<Item = CachedUrl> + 'a>;

    /// Convenience: looks up a URL and keeps it only if it has content.
    fn lookup_with_content(&self, url: &str) -> Option<CachedUrl> {
        self.lookup(url).filter(CachedUrl::has_content)
    }
}
