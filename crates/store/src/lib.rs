//! Read-only access to crawled archival units.
//!
//! Article discovery never fetches anything; it walks what a crawler already
//! stored. This crate models that stored state: [`CachedUrl`] handles, the
//! [`ArchivalUnit`] that owns them, and an in-memory implementation that can
//! be populated from a [manifest](crate::manifest).

mod cached;
pub mod error;
pub mod manifest;
mod memory;
mod params;
mod unit;

pub use crate::cached::{CachedUrl, media_type};
pub use crate::memory::MemoryStore;
pub use crate::params::{AuParams, keys};
pub use crate::unit::ArchivalUnit;
