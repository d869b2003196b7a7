//! Plain-text crawl manifests.
//!
//! A manifest lists the URLs stored in one archival unit, one per line:
//!
//! ```text
//! # url                                          content type       last modified (optional)
//! http://www.nejm.org/doi/full/10.1056/NEJMoa1	text/html	2011-03-04T00:00:00Z
//! http://www.nejm.org/doi/pdf/10.1056/NEJMoa1	application/pdf
//! http://www.nejm.org/doi/suppl/10.1056/NEJMoa1	-
//! ```
//!
//! Fields are tab-separated. A content type of `-` records a URL that is known
//! to the AU but has no content. Blank lines and lines starting with `#` are
//! ignored.

use crate::cached::CachedUrl;
use crate::error::{ErrorKind, Result};
use crate::memory::MemoryStore;
use exn::ResultExt;
use std::path::Path;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::instrument;

const NO_CONTENT: &str = "-";

/// Parses a single manifest line. Returns `Ok(None)` for blank and comment
/// lines.
pub fn parse_line(line: &str, number: usize) -> Result<Option<CachedUrl>> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.trim().is_empty() || line.trim_start().starts_with('#') {
        return Ok(None);
    }
    let mut fields = line.split('\t').map(str::trim);
    let url = fields.next().unwrap_or_default();
    if url.is_empty() {
        exn::bail!(ErrorKind::Manifest { line: number, reason: "missing URL".to_string() });
    }
    let Some(content_type) = fields.next().filter(|s| !s.is_empty()) else {
        exn::bail!(ErrorKind::Manifest {
            line: number,
            reason: format!("missing content type for {url}"),
        });
    };
    let mut cu = match content_type {
        NO_CONTENT => CachedUrl::without_content(url),
        other => CachedUrl::new(url, Some(other.to_string())),
    };
    if let Some(modified) = fields.next().filter(|s| !s.is_empty()) {
        let modified = OffsetDateTime::parse(modified, &Rfc3339).or_raise(|| ErrorKind::Manifest {
            line: number,
            reason: format!("invalid RFC 3339 timestamp {modified:?}"),
        })?;
        cu = cu.with_last_modified(modified);
    }
    if fields.next().is_some() {
        exn::bail!(ErrorKind::Manifest { line: number, reason: "too many fields".to_string() });
    }
    Ok(Some(cu))
}

/// Parses manifest text into handles, in file order.
pub fn parse(text: &str) -> Result<Vec<CachedUrl>> {
    let mut cus = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if let Some(cu) = parse_line(line, index + 1)? {
            cus.push(cu);
        }
    }
    Ok(cus)
}

impl MemoryStore {
    /// Builds an in-memory AU from a manifest file. The AU is named after the
    /// file stem; parameters are left empty for the caller to fill in.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_manifest(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        let cus = parse(&text)?;
        let name = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
        let store = Self::new(name).with_cus(cus);
        tracing::debug!(urls = store.len(), "loaded manifest");
        Ok(store)
    }
}
