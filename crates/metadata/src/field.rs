//! The normalized metadata vocabulary.

use crate::validate;
use std::borrow::Cow;
use std::fmt;

/// Normalizes a raw value, or says why it was rejected.
pub type Validator = fn(&str) -> Result<String, String>;
/// Splits one raw value into several.
pub type Splitter = fn(&str) -> Vec<String>;

/// How many values a cooked field holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// One value; a later valid value replaces an earlier one.
    Single,
    /// Any number of values, in the order they were cooked.
    Multi,
}

/// A field of the normalized vocabulary: its key, cardinality, and the
/// validator and splitter applied to every raw value put into it.
///
/// Fields compare by key alone.
#[derive(Clone)]
pub struct MetadataField {
    key: Cow<'static, str>,
    cardinality: Cardinality,
    validator: Option<Validator>,
    splitter: Option<Splitter>,
}

const fn field(
    key: &'static str,
    cardinality: Cardinality,
    validator: Option<Validator>,
    splitter: Option<Splitter>,
) -> MetadataField {
    MetadataField { key: Cow::Borrowed(key), cardinality, validator, splitter }
}

const fn single(key: &'static str) -> MetadataField {
    field(key, Cardinality::Single, None, None)
}

const fn multi(key: &'static str) -> MetadataField {
    field(key, Cardinality::Multi, None, None)
}

impl MetadataField {
    pub const DOI: Self = field("doi", Cardinality::Single, Some(validate::doi), None);
    pub const ISSN: Self = field("issn", Cardinality::Single, Some(validate::issn), None);
    pub const EISSN: Self = field("eissn", Cardinality::Single, Some(validate::issn), None);
    pub const ISBN: Self = field("isbn", Cardinality::Single, Some(validate::isbn), None);
    pub const EISBN: Self = field("eisbn", Cardinality::Single, Some(validate::isbn), None);
    pub const PROVIDER: Self = single("provider");
    pub const PUBLISHER: Self = single("publisher");
    pub const PUBLICATION_TYPE: Self = single("pubtype");
    pub const ARTICLE_TYPE: Self = single("articletype");
    pub const VOLUME: Self = single("volume");
    pub const ISSUE: Self = single("issue");
    pub const START_PAGE: Self = single("startpage");
    pub const END_PAGE: Self = single("endpage");
    pub const DATE: Self = single("date");
    pub const ARTICLE_TITLE: Self = single("article.title");
    pub const PUBLICATION_TITLE: Self = single("publication.title");
    pub const SERIES_TITLE: Self = single("series.title");
    pub const AUTHOR: Self = field("author", Cardinality::Multi, Some(validate::author), None);
    pub const ACCESS_URL: Self = single("access.url");
    pub const KEYWORDS: Self = field("keywords", Cardinality::Multi, None, Some(validate::keywords));
    pub const LANGUAGE: Self = single("language");
    pub const FORMAT: Self = single("format");
    pub const DC_CONTRIBUTOR: Self = multi("dc.contributor");
    pub const DC_COVERAGE: Self = multi("dc.coverage");
    pub const DC_CREATOR: Self = field("dc.creator", Cardinality::Multi, Some(validate::author), None);
    pub const DC_DATE: Self = single("dc.date");
    pub const DC_DESCRIPTION: Self = multi("dc.description");
    pub const DC_FORMAT: Self = multi("dc.format");
    pub const DC_IDENTIFIER: Self = multi("dc.identifier");
    pub const DC_LANGUAGE: Self = multi("dc.language");
    pub const DC_PUBLISHER: Self = multi("dc.publisher");
    pub const DC_RELATION: Self = multi("dc.relation");
    pub const DC_RIGHTS: Self = multi("dc.rights");
    pub const DC_SOURCE: Self = multi("dc.source");
    pub const DC_SUBJECT: Self = multi("dc.subject");
    pub const DC_TITLE: Self = multi("dc.title");
    pub const DC_TYPE: Self = multi("dc.type");

    /// Every field of the standard vocabulary.
    pub const STANDARD: [Self; 37] = [
        Self::DOI,
        Self::ISSN,
        Self::EISSN,
        Self::ISBN,
        Self::EISBN,
        Self::PROVIDER,
        Self::PUBLISHER,
        Self::PUBLICATION_TYPE,
        Self::ARTICLE_TYPE,
        Self::VOLUME,
        Self::ISSUE,
        Self::START_PAGE,
        Self::END_PAGE,
        Self::DATE,
        Self::ARTICLE_TITLE,
        Self::PUBLICATION_TITLE,
        Self::SERIES_TITLE,
        Self::AUTHOR,
        Self::ACCESS_URL,
        Self::KEYWORDS,
        Self::LANGUAGE,
        Self::FORMAT,
        Self::DC_CONTRIBUTOR,
        Self::DC_COVERAGE,
        Self::DC_CREATOR,
        Self::DC_DATE,
        Self::DC_DESCRIPTION,
        Self::DC_FORMAT,
        Self::DC_IDENTIFIER,
        Self::DC_LANGUAGE,
        Self::DC_PUBLISHER,
        Self::DC_RELATION,
        Self::DC_RIGHTS,
        Self::DC_SOURCE,
        Self::DC_SUBJECT,
        Self::DC_TITLE,
        Self::DC_TYPE,
    ];

    /// A field outside the standard vocabulary, without validator or
    /// splitter.
    pub fn custom(key: impl Into<String>, cardinality: Cardinality) -> Self {
        Self { key: Cow::Owned(key.into()), cardinality, validator: None, splitter: None }
    }

    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    pub fn with_splitter(mut self, splitter: Splitter) -> Self {
        self.splitter = Some(splitter);
        self
    }

    /// Looks a standard field up by key, ignoring case.
    pub fn find(key: &str) -> Option<Self> {
        Self::STANDARD.into_iter().find(|field| field.key.eq_ignore_ascii_case(key))
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn is_multi(&self) -> bool {
        self.cardinality == Cardinality::Multi
    }

    /// Runs the validator, if any. Without one every value is valid as is.
    pub fn validate(&self, value: &str) -> Result<String, String> {
        match self.validator {
            Some(validator) => validator(value),
            None => Ok(value.to_string()),
        }
    }

    /// Splits a raw value. Without a splitter the value stays whole.
    pub fn split(&self, value: &str) -> Vec<String> {
        match self.splitter {
            Some(splitter) => splitter(value),
            None => vec![value.to_string()],
        }
    }
}

impl PartialEq for MetadataField {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl Eq for MetadataField {}

impl fmt::Debug for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetadataField")
            .field("key", &self.key)
            .field("cardinality", &self.cardinality)
            .field("validated", &self.validator.is_some())
            .field("split", &self.splitter.is_some())
            .finish()
    }
}

impl fmt::Display for MetadataField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashSet;

    #[test]
    fn test_standard_keys_are_unique() {
        let standard = MetadataField::STANDARD;
        let keys: HashSet<_> = standard.iter().map(MetadataField::key).collect();
        assert_eq!(keys.len(), standard.len());
    }

    #[rstest]
    #[case("doi", Some(MetadataField::DOI))]
    #[case("Article.Title", Some(MetadataField::ARTICLE_TITLE))]
    #[case("dc.creator", Some(MetadataField::DC_CREATOR))]
    #[case("citation_doi", None)]
    fn test_find(#[case] key: &str, #[case] expected: Option<MetadataField>) {
        assert_eq!(MetadataField::find(key), expected);
    }

    #[test]
    fn test_custom_field() {
        let field = MetadataField::custom("x.tags", Cardinality::Multi).with_splitter(validate::keywords);
        assert!(field.is_multi());
        assert_eq!(field.split("a;b"), ["a", "b"]);
        assert_eq!(field.validate(" raw "), Ok(" raw ".to_string()));
        assert_eq!(field, MetadataField::custom("x.tags", Cardinality::Single));
    }
}
