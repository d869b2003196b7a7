//! Role names.

use std::borrow::{Borrow, Cow};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// The name under which one aspect of an article is stored in
/// [`ArticleFiles`](crate::ArticleFiles).
///
/// The associated constants are the vocabulary downstream metadata extraction
/// understands; plugins are free to use any other name as well.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Role(Cow<'static, str>);
impl Role {
    pub const FULL_TEXT_HTML: Role = Role::from_static("FullTextHtml");
    pub const FULL_TEXT_PDF: Role = Role::from_static("FullTextPdf");
    pub const FULL_TEXT_PDF_LANDING_PAGE: Role = Role::from_static("FullTextPdfLandingPage");
    pub const FULL_TEXT_HTML_LANDING_PAGE: Role = Role::from_static("FullTextHtmlLandingPage");
    pub const FULL_TEXT_XML: Role = Role::from_static("FullTextXml");
    pub const FULL_TEXT_EPUB: Role = Role::from_static("FullTextEpub");
    pub const ABSTRACT: Role = Role::from_static("Abstract");
    pub const ARTICLE_METADATA: Role = Role::from_static("ArticleMetadata");
    /// Generic alias for whichever citation export was found first.
    pub const CITATION: Role = Role::from_static("Citation");
    pub const CITATION_RIS: Role = Role::from_static("CitationRis");
    pub const CITATION_BIBTEX: Role = Role::from_static("CitationBibtex");
    pub const CITATION_ENDNOTE: Role = Role::from_static("CitationEndnote");
    pub const CITATION_MEDLARS: Role = Role::from_static("CitationMedlars");
    pub const CITATION_PROCITE: Role = Role::from_static("CitationProcite");
    pub const CITATION_REFMGR: Role = Role::from_static("CitationRefmgr");
    pub const SUPPLEMENTARY_MATERIALS: Role = Role::from_static("SupplementaryMaterials");
    pub const REFERENCES: Role = Role::from_static("References");
    pub const FIGURES_TABLES: Role = Role::from_static("FiguresTables");
    pub const ISSUE_METADATA: Role = Role::from_static("IssueMetadata");

    /// Every named role, in the order above.
    pub const STANDARD: [Role; 19] = [
        Self::FULL_TEXT_HTML,
        Self::FULL_TEXT_PDF,
        Self::FULL_TEXT_PDF_LANDING_PAGE,
        Self::FULL_TEXT_HTML_LANDING_PAGE,
        Self::FULL_TEXT_XML,
        Self::FULL_TEXT_EPUB,
        Self::ABSTRACT,
        Self::ARTICLE_METADATA,
        Self::CITATION,
        Self::CITATION_RIS,
        Self::CITATION_BIBTEX,
        Self::CITATION_ENDNOTE,
        Self::CITATION_MEDLARS,
        Self::CITATION_PROCITE,
        Self::CITATION_REFMGR,
        Self::SUPPLEMENTARY_MATERIALS,
        Self::REFERENCES,
        Self::FIGURES_TABLES,
        Self::ISSUE_METADATA,
    ];

    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_standard(&self) -> bool {
        Self::STANDARD.contains(self)
    }
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Role {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Role {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Role {
    fn from(name: &str) -> Self {
        Self(Cow::Owned(name.to_string()))
    }
}

impl From<String> for Role {
    fn from(name: String) -> Self {
        Self(Cow::Owned(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owned_equals_static() {
        assert_eq!(Role::from("CitationRis"), Role::CITATION_RIS);
        assert!(Role::from("FullTextPdf".to_string()).is_standard());
        assert!(!Role::from("SourceXml").is_standard());
    }
}
