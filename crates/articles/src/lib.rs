//! Article discovery over crawled archival units.
//!
//! A publisher's site stores every article as several URLs: its full-text
//! HTML, a PDF, an abstract page, citation exports, supplements. This crate
//! walks an [`ArchivalUnit`](folio_store::ArchivalUnit)'s stored URLs and puts
//! those pieces back together into one [`ArticleFiles`] record per article,
//! driven entirely by a declarative table of [aspects](AspectDef):
//!
//! ```text
//! IteratorSpec ─┐
//! AspectDef…   ─┼─ ArticleIteratorBuilder::build(params) ─▶ ArticleTable
//! role orders  ─┘                                              │
//!                            ArticleTable::iterator(au, target)│
//!                                                              ▼
//!                                   SubTreeArticleIterator ─▶ ArticleFiles…
//! ```
//!
//! Nothing here fetches, and nothing here fails once the table is built: a
//! URL that can't be made into an article is skipped.

mod aspect;
mod builder;
pub mod error;
mod files;
mod iterator;
mod key;
mod resolver;
mod roles;
mod spec;
mod table;
mod target;

pub use crate::aspect::{Aspect, AspectDef, ContentRequirement};
pub use crate::builder::ArticleIteratorBuilder;
pub use crate::files::ArticleFiles;
pub use crate::iterator::{IterationStats, SubTreeArticleIterator};
pub use crate::key::{DedupPolicy, MatchKey};
pub use crate::resolver::Resolution;
pub use crate::roles::Role;
pub use crate::spec::IteratorSpec;
pub use crate::table::ArticleTable;
pub use crate::target::{MetadataTarget, Purpose};
