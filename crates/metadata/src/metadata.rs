//! Raw and cooked metadata of one article.

use crate::cook::CookTable;
use crate::error::{Error, ErrorKind, Result};
use crate::field::{Cardinality, MetadataField};
use std::collections::BTreeMap;
use tracing::instrument;

/// A raw value a field's validator rejected, kept until a valid one comes
/// along.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidValue {
    raw: String,
    reason: String,
}
impl InvalidValue {
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Cooked {
    Valid(Vec<String>),
    Invalid(InvalidValue),
}

/// The metadata extracted for one article.
///
/// Extractors fill the *raw* map with whatever tags the publisher's page or
/// citation export carries, keyed case-insensitively. [`cook`](Self::cook)
/// then maps those onto the normalized vocabulary of [`MetadataField`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArticleMetadata {
    raw: BTreeMap<String, Vec<String>>,
    cooked: BTreeMap<String, Cooked>,
}
impl ArticleMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a raw value. Values accumulate under their lower-cased key.
    pub fn put_raw(&mut self, key: &str, value: impl Into<String>) {
        self.raw.entry(key.to_lowercase()).or_default().push(value.into());
    }

    pub fn raw(&self, key: &str) -> &[String] {
        self.raw.get(&key.to_lowercase()).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn raw_first(&self, key: &str) -> Option<&str> {
        self.raw(key).first().map(String::as_str)
    }

    pub fn raw_keys(&self) -> impl Iterator<Item = &str> {
        self.raw.keys().map(String::as_str)
    }

    /// Stores `value` in `field` after validation.
    ///
    /// A valid value replaces the current one of a single-valued field, and is
    /// appended to a multi-valued field unless already there. A rejected
    /// value is only remembered (as an [`InvalidValue`]) when the field has
    /// nothing yet.
    pub fn put(&mut self, field: &MetadataField, value: &str) -> Result<()> {
        match Self::store(&mut self.cooked, field, value).into_iter().next() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    /// Stores `value` only if `field` has no valid value yet. Returns whether
    /// it was stored.
    pub fn put_if_better(&mut self, field: &MetadataField, value: &str) -> Result<bool> {
        if self.has_valid_value(field) {
            return Ok(false);
        }
        self.put(field, value).map(|()| true)
    }

    /// Drops whatever `field` holds, then stores `value`.
    pub fn replace(&mut self, field: &MetadataField, value: &str) -> Result<()> {
        self.cooked.remove(&Self::key(field));
        self.put(field, value)
    }

    /// First valid value of `field`.
    pub fn get(&self, field: &MetadataField) -> Option<&str> {
        self.get_list(field).first().map(String::as_str)
    }

    /// Every valid value of `field`.
    pub fn get_list(&self, field: &MetadataField) -> &[String] {
        match self.cooked.get(&Self::key(field)) {
            Some(Cooked::Valid(values)) => values,
            _ => &[],
        }
    }

    pub fn invalid(&self, field: &MetadataField) -> Option<&InvalidValue> {
        match self.cooked.get(&Self::key(field)) {
            Some(Cooked::Invalid(invalid)) => Some(invalid),
            _ => None,
        }
    }

    pub fn has_valid_value(&self, field: &MetadataField) -> bool {
        !self.get_list(field).is_empty()
    }

    /// Keys of every cooked field, valid or not.
    pub fn cooked_keys(&self) -> impl Iterator<Item = &str> {
        self.cooked.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cooked.is_empty()
    }

    /// Copies raw values into normalized fields, one table entry at a time in
    /// declaration order, so that a single-valued field fed by several raw
    /// tags ends up with the last valid value.
    ///
    /// Values that fail validation are reported back; cooking carries on.
    #[instrument(level = "debug", skip_all, fields(entries = table.len()))]
    pub fn cook(&mut self, table: &CookTable) -> Vec<Error> {
        let Self { raw, cooked } = self;
        let mut errors = Vec::new();
        for (tag, field) in table.entries() {
            let Some(values) = raw.get(tag) else {
                continue;
            };
            for value in values {
                errors.extend(Self::store(cooked, field, value));
            }
        }
        if !errors.is_empty() {
            tracing::debug!(rejected = errors.len(), "raw values failed validation");
        }
        errors
    }

    fn key(field: &MetadataField) -> String {
        field.key().to_lowercase()
    }

    fn store(cooked: &mut BTreeMap<String, Cooked>, field: &MetadataField, value: &str) -> Vec<Error> {
        let key = Self::key(field);
        let elements = match field.cardinality() {
            Cardinality::Single => vec![value.to_string()],
            Cardinality::Multi => field.split(value),
        };
        let mut errors = Vec::new();
        for element in elements {
            match field.validate(&element) {
                Ok(valid) => {
                    if field.is_multi()
                        && let Some(Cooked::Valid(values)) = cooked.get_mut(&key)
                    {
                        if !values.contains(&valid) {
                            values.push(valid);
                        }
                        continue;
                    }
                    cooked.insert(key.clone(), Cooked::Valid(vec![valid]));
                },
                Err(reason) => {
                    tracing::trace!(field = field.key(), value = %element, reason = %reason, "invalid metadata value");
                    cooked.entry(key.clone()).or_insert_with(|| {
                        Cooked::Invalid(InvalidValue { raw: element.clone(), reason: reason.clone() })
                    });
                    errors.push(exn::Exn::from(ErrorKind::Validation {
                        field: field.key().to_string(),
                        value: element,
                        reason,
                    }));
                },
            }
        }
        errors
    }
}
