//! URL pattern registry primitives.
//!
//! Everything a plugin says about URLs ends up as one of three things:
//!
//! - a [`Template`], rendered against an AU's parameters into a root URL or a
//!   regular expression,
//! - a compiled [`UrlPattern`] deciding whether a URL is interesting and
//!   capturing the parts that identify an article,
//! - a [`Replacement`] that rewrites one aspect's URL into another's from
//!   those captured parts.

mod consts;
pub mod error;
mod pattern;
mod replace;
mod template;

pub use crate::pattern::{PatternMatch, UrlPattern};
pub use crate::replace::Replacement;
pub use crate::template::{Template, TemplateContext};
