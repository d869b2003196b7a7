//! Plugin definitions and operator settings.
//!
//! A [`PluginDefinition`] is the declarative form of an article table: it is
//! read from YAML, TOML or JSON (or taken from the [`Builtins`] compiled into
//! the binary) and compiled against an AU's parameters into a
//! [`folio_articles::ArticleTable`].

mod builtin;
pub mod error;
mod plugin;
mod settings;

pub use crate::builtin::Builtins;
pub use crate::plugin::{
    AspectDefinition, BUILTIN_PREFIX, Content, CookEntry, Dedup, DerivedRole, PluginDefinition, SpecDefinition, Syntax,
};
pub use crate::settings::Settings;
