//! Stored-content handles.

use std::fmt::{Display, Formatter, Result as FmtResult};
use time::OffsetDateTime;

const MIME_HTML: &str = "text/html";
const MIME_XHTML: &str = "application/xhtml+xml";
const MIME_PDF: &str = "application/pdf";

/// Handle to previously fetched content for one URL.
///
/// The handle never exposes the bytes themselves; the article iterator only
/// ever asks whether content exists and what type it claims to be. A handle
/// can exist without content (never fetched, deleted, or a 404 was recorded),
/// which is why [`has_content()`](Self::has_content) must always be checked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedUrl {
    url: String,
    content_type: Option<String>,
    has_content: bool,
    last_modified: Option<OffsetDateTime>,
}
impl CachedUrl {
    /// A handle for a URL whose content is stored, with the content type
    /// reported when it was fetched (if any).
    pub fn new(url: impl Into<String>, content_type: impl Into<Option<String>>) -> Self {
        Self {
            url: url.into(),
            content_type: content_type.into(),
            has_content: true,
            last_modified: None,
        }
    }

    /// Shorthand for an HTML page.
    pub fn html(url: impl Into<String>) -> Self {
        Self::new(url, Some("text/html; charset=utf-8".to_string()))
    }

    /// Shorthand for a PDF file.
    pub fn pdf(url: impl Into<String>) -> Self {
        Self::new(url, Some(MIME_PDF.to_string()))
    }

    /// A handle for a URL known to the archival unit but without content.
    pub fn without_content(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            content_type: None,
            has_content: false,
            last_modified: None,
        }
    }

    pub fn with_last_modified(mut self, last_modified: OffsetDateTime) -> Self {
        self.last_modified = Some(last_modified);
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn has_content(&self) -> bool {
        self.has_content
    }

    /// The raw `Content-Type` value, parameters included.
    pub fn content_type(&self) -> Option<&str> {
        self.content_type.as_deref()
    }

    pub fn last_modified(&self) -> Option<OffsetDateTime> {
        self.last_modified
    }

    /// The lower-cased media type, without parameters such as `charset`.
    ///
    /// ```
    /// use folio_store::CachedUrl;
    /// let cu = CachedUrl::new("http://x.org/a", Some("Text/HTML; charset=UTF-8".to_string()));
    /// assert_eq!(cu.media_type().as_deref(), Some("text/html"));
    /// ```
    pub fn media_type(&self) -> Option<String> {
        self.content_type.as_deref().and_then(media_type)
    }

    /// `true` if this handle has content claiming to be HTML.
    ///
    /// A missing or unreadable content type is treated as "neither HTML nor
    /// PDF"; it is never an error.
    pub fn is_html(&self) -> bool {
        self.has_content && matches!(self.media_type().as_deref(), Some(MIME_HTML | MIME_XHTML))
    }

    /// `true` if this handle has content claiming to be PDF.
    pub fn is_pdf(&self) -> bool {
        self.has_content && self.media_type().as_deref() == Some(MIME_PDF)
    }
}

impl Display for CachedUrl {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.url)
    }
}

/// Extracts the lower-cased media type from a `Content-Type` header value.
pub fn media_type(content_type: &str) -> Option<String> {
    let media = content_type.split(';').next().unwrap_or_default().trim();
    match media.is_empty() {
        true => None,
        false => Some(media.to_ascii_lowercase()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("text/html", Some("text/html"))]
    #[case("text/html; charset=ISO-8859-1", Some("text/html"))]
    #[case("  Application/PDF ", Some("application/pdf"))]
    #[case("; charset=utf-8", None)]
    #[case("", None)]
    fn test_media_type(#[case] content_type: &str, #[case] expected: Option<&str>) {
        assert_eq!(media_type(content_type).as_deref(), expected);
    }

    #[test]
    fn test_classification() {
        assert!(CachedUrl::html("http://x.org/a").is_html());
        assert!(!CachedUrl::html("http://x.org/a").is_pdf());
        assert!(CachedUrl::pdf("http://x.org/a.pdf").is_pdf());
        let xhtml = CachedUrl::new("http://x.org/b", Some("application/xhtml+xml".to_string()));
        assert!(xhtml.is_html());
    }

    #[test]
    fn test_unknown_type_is_neither() {
        let cu = CachedUrl::new("http://x.org/a", None);
        assert!(cu.has_content());
        assert!(!cu.is_html());
        assert!(!cu.is_pdf());
    }

    #[test]
    fn test_without_content_is_never_classified() {
        let cu = CachedUrl::without_content("http://x.org/a.pdf");
        assert!(!cu.has_content());
        assert!(!cu.is_pdf());
    }
}
