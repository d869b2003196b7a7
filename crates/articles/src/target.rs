//! What an iteration pass is for.

use derive_more::Display;
use time::OffsetDateTime;

/// Why articles are being enumerated.
#[derive(Debug, Display, Clone, Copy, Default, PartialEq, Eq)]
pub enum Purpose {
    /// Only enumerate or count articles. Secondary aspects are not derived.
    #[display("article")]
    Article,
    /// Harvest metadata: every aspect is derived.
    #[display("metadata")]
    Metadata,
    #[default]
    #[display("any")]
    Any,
}

/// The purpose of an iteration pass, plus optional restrictions on which
/// stored files it looks at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataTarget {
    purpose: Purpose,
    format: Option<String>,
    changed_after: Option<OffsetDateTime>,
}
impl MetadataTarget {
    pub fn new(purpose: Purpose) -> Self {
        Self { purpose, ..Self::default() }
    }

    pub fn article() -> Self {
        Self::new(Purpose::Article)
    }

    pub fn metadata() -> Self {
        Self::new(Purpose::Metadata)
    }

    pub fn any() -> Self {
        Self::new(Purpose::Any)
    }

    /// Restricts article candidates to one MIME type, overriding whatever the
    /// plugin declares.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Skips stored files not modified after `instant`.
    pub fn with_changed_after(mut self, instant: OffsetDateTime) -> Self {
        self.changed_after = Some(instant);
        self
    }

    pub fn purpose(&self) -> Purpose {
        self.purpose
    }

    pub fn is_article(&self) -> bool {
        self.purpose == Purpose::Article
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    pub fn changed_after(&self) -> Option<OffsetDateTime> {
        self.changed_after
    }
}
