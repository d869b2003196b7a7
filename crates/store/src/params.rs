//! Archival unit configuration parameters.

use crate::error::{ErrorKind, Result};
use std::collections::BTreeMap;
use std::ops::Deref;

/// Well-known parameter names used by publisher plugins.
pub mod keys {
    pub const BASE_URL: &str = "base_url";
    pub const BASE_URL2: &str = "base_url2";
    pub const JOURNAL_ID: &str = "journal_id";
    pub const JOURNAL_ISSN: &str = "journal_issn";
    pub const JOURNAL_ABBR: &str = "journal_abbr";
    pub const VOLUME_NAME: &str = "volume_name";
    pub const YEAR: &str = "year";
}

/// Named configuration parameters of one archival unit, such as `base_url`
/// and `journal_id`.
///
/// Keys are kept sorted, so iteration order (and therefore anything derived
/// from it, such as log output) is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuParams(BTreeMap<String, String>);
impl AuParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Parses a `key=value` pair, as given on a command line.
    ///
    /// Only the first `=` separates; the value may contain further `=`
    /// characters (query strings are common in base URLs).
    pub fn parse_pair(pair: &str) -> Result<(String, String)> {
        let Some((key, value)) = pair.split_once('=') else {
            exn::bail!(ErrorKind::InvalidParam(pair.to_string()));
        };
        let key = key.trim();
        if key.is_empty() {
            exn::bail!(ErrorKind::InvalidParam(pair.to_string()));
        }
        Ok((key.to_string(), value.to_string()))
    }
}

impl Deref for AuParams {
    type Target = BTreeMap<String, String>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AuParams {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
