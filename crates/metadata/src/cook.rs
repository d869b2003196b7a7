//! Raw tag to normalized field tables.

use crate::error::{ErrorKind, Result};
use crate::field::MetadataField;
use exn::OptionExt;

/// An ordered mapping from raw tag names to normalized fields.
///
/// A raw tag may feed several fields, and several tags may feed one field.
/// Entries are applied in the order they were added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CookTable {
    entries: Vec<(String, MetadataField)>,
}
impl CookTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn map(mut self, raw: &str, field: MetadataField) -> Self {
        self.insert(raw, field);
        self
    }

    /// Maps one raw tag onto several fields.
    pub fn map_many(mut self, raw: &str, fields: impl IntoIterator<Item = MetadataField>) -> Self {
        for field in fields {
            self.insert(raw, field);
        }
        self
    }

    pub fn insert(&mut self, raw: &str, field: MetadataField) {
        self.entries.push((raw.to_lowercase(), field));
    }

    /// Maps a raw tag onto a standard field given by key.
    pub fn insert_key(&mut self, raw: &str, field: &str) -> Result<()> {
        let field = MetadataField::find(field).ok_or_raise(|| ErrorKind::UnknownField(field.to_string()))?;
        self.insert(raw, field);
        Ok(())
    }

    pub fn entries(&self) -> impl Iterator<Item = (&str, &MetadataField)> {
        self.entries.iter().map(|(raw, field)| (raw.as_str(), field))
    }

    /// Fields fed by one raw tag.
    pub fn fields<'a>(&'a self, raw: &str) -> impl Iterator<Item = &'a MetadataField> {
        let raw = raw.to_lowercase();
        self.entries.iter().filter(move |(tag, _)| *tag == raw).map(|(_, field)| field)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends every entry of `other`.
    pub fn extend(mut self, other: Self) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// The `<meta>` tags of HTML landing pages: Dublin Core first, then the
    /// `citation_*` tags, so the latter win for shared fields.
    pub fn html_meta_tags() -> Self {
        Self::new()
            .map("dc.title", MetadataField::DC_TITLE)
            .map_many("dc.creator", [MetadataField::DC_CREATOR, MetadataField::AUTHOR])
            .map("dc.contributor", MetadataField::DC_CONTRIBUTOR)
            .map_many("dc.date", [MetadataField::DC_DATE, MetadataField::DATE])
            .map_many("dc.publisher", [MetadataField::DC_PUBLISHER, MetadataField::PUBLISHER])
            .map("dc.identifier", MetadataField::DC_IDENTIFIER)
            .map("dc.subject", MetadataField::DC_SUBJECT)
            .map("dc.description", MetadataField::DC_DESCRIPTION)
            .map_many("dc.language", [MetadataField::DC_LANGUAGE, MetadataField::LANGUAGE])
            .map("dc.type", MetadataField::DC_TYPE)
            .map("dc.format", MetadataField::DC_FORMAT)
            .map("dc.rights", MetadataField::DC_RIGHTS)
            .map("dc.source", MetadataField::DC_SOURCE)
            .map("dc.relation", MetadataField::DC_RELATION)
            .map("dc.coverage", MetadataField::DC_COVERAGE)
            .map("citation_doi", MetadataField::DOI)
            .map("citation_issn", MetadataField::ISSN)
            .map("citation_eissn", MetadataField::EISSN)
            .map("citation_isbn", MetadataField::ISBN)
            .map("citation_volume", MetadataField::VOLUME)
            .map("citation_issue", MetadataField::ISSUE)
            .map("citation_firstpage", MetadataField::START_PAGE)
            .map("citation_lastpage", MetadataField::END_PAGE)
            .map("citation_date", MetadataField::DATE)
            .map("citation_publication_date", MetadataField::DATE)
            .map("citation_title", MetadataField::ARTICLE_TITLE)
            .map("citation_journal_title", MetadataField::PUBLICATION_TITLE)
            .map("citation_publisher", MetadataField::PUBLISHER)
            .map("citation_author", MetadataField::AUTHOR)
            .map("citation_keywords", MetadataField::KEYWORDS)
            .map("citation_language", MetadataField::LANGUAGE)
            .map("citation_fulltext_html_url", MetadataField::ACCESS_URL)
    }

    /// RIS citation exports. Full journal names (`JF`) are applied after
    /// abbreviations, and `DA` after the less precise `Y1`/`PY`.
    pub fn ris() -> Self {
        Self::new()
            .map("do", MetadataField::DOI)
            .map("sn", MetadataField::ISSN)
            .map("vl", MetadataField::VOLUME)
            .map("is", MetadataField::ISSUE)
            .map("sp", MetadataField::START_PAGE)
            .map("ep", MetadataField::END_PAGE)
            .map("y1", MetadataField::DATE)
            .map("py", MetadataField::DATE)
            .map("da", MetadataField::DATE)
            .map("t1", MetadataField::ARTICLE_TITLE)
            .map("ti", MetadataField::ARTICLE_TITLE)
            .map("jo", MetadataField::PUBLICATION_TITLE)
            .map("t2", MetadataField::PUBLICATION_TITLE)
            .map("jf", MetadataField::PUBLICATION_TITLE)
            .map("a1", MetadataField::AUTHOR)
            .map("au", MetadataField::AUTHOR)
            .map("pb", MetadataField::PUBLISHER)
            .map("kw", MetadataField::KEYWORDS)
            .map("la", MetadataField::LANGUAGE)
            .map("ur", MetadataField::ACCESS_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::ArticleMetadata;

    #[test]
    fn test_fan_out() {
        let table = CookTable::html_meta_tags();
        let fields: Vec<_> = table.fields("DC.Creator").map(MetadataField::key).collect();
        assert_eq!(fields, ["dc.creator", "author"]);
    }

    #[test]
    fn test_insert_key() {
        let mut table = CookTable::new();
        table.insert_key("prism.volume", "volume").unwrap();
        let err = table.insert_key("prism.issue", "issue.number").unwrap_err();
        assert!(matches!(&*err, ErrorKind::UnknownField(key) if key == "issue.number"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_last_declared_tag_wins() {
        let table = CookTable::new()
            .map("prism.publicationdate", MetadataField::DATE)
            .map("citation_date", MetadataField::DATE);
        let mut am = ArticleMetadata::new();
        am.put_raw("citation_date", "2011/01/06");
        am.put_raw("prism.publicationDate", "2011-01-06");
        assert!(am.cook(&table).is_empty());
        assert_eq!(am.get(&MetadataField::DATE), Some("2011/01/06"));
    }

    #[test]
    fn test_ris_prefers_full_journal_title() {
        let mut am = ArticleMetadata::new();
        am.put_raw("JO", "N Engl J Med");
        am.put_raw("JF", "New England Journal of Medicine");
        am.put_raw("AU", "Smith, John");
        am.put_raw("AU", "Doe, Jane");
        am.cook(&CookTable::ris());
        assert_eq!(am.get(&MetadataField::PUBLICATION_TITLE), Some("New England Journal of Medicine"));
        assert_eq!(am.get_list(&MetadataField::AUTHOR), ["Smith, John", "Doe, Jane"]);
    }
}
