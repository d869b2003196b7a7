//! Metadata cooking.
//!
//! Publishers describe their articles with whatever tags they like:
//! `citation_*` and Dublin Core `<meta>` tags, RIS exports, their own XML.
//! Extractors collect those as *raw* metadata in an [`ArticleMetadata`];
//! [`ArticleMetadata::cook`] then maps them through a [`CookTable`] onto one
//! normalized vocabulary of [`MetadataField`]s, validating as it goes.

mod consts;
mod cook;
pub mod error;
mod field;
mod metadata;
pub mod validate;

pub use crate::cook::CookTable;
pub use crate::field::{Cardinality, MetadataField, Splitter, Validator};
pub use crate::metadata::{ArticleMetadata, InvalidValue};
