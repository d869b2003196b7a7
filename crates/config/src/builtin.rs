//! Plugin definitions compiled into the binary.

use crate::error::{ErrorKind, Result};
use crate::plugin::{BUILTIN_PREFIX, PluginDefinition, Syntax};
use exn::{OptionExt, ResultExt};
use rust_embed::Embed;
use std::borrow::Cow;

#[derive(Embed)]
#[folder = "plugins/"]
pub struct Builtins;
impl Builtins {
    /// Loads a builtin definition by name, with or without the `builtin:`
    /// prefix.
    pub fn load(name: impl AsRef<str>) -> Result<PluginDefinition> {
        let id = Self::identifier(&name);
        let file = Self::get(&Self::file_name(&name)).ok_or_raise(|| ErrorKind::NotFound(id.clone()))?;
        let text = std::str::from_utf8(&file.data).or_raise(|| ErrorKind::Malformed(id.clone()))?;
        PluginDefinition::parse(text, Syntax::Yaml, &id)
    }

    /// Names of every builtin definition.
    pub fn list() -> Vec<Cow<'static, str>> {
        Self::iter()
            .filter_map(|file| match file {
                Cow::Borrowed(file) => file.strip_suffix(".yaml").map(Cow::Borrowed),
                Cow::Owned(file) => file.strip_suffix(".yaml").map(|name| Cow::Owned(name.to_string())),
            })
            .collect()
    }

    pub fn exists(name: impl AsRef<str>) -> bool {
        Self::get(&Self::file_name(name)).is_some()
    }

    pub(crate) fn identifier(name: impl AsRef<str>) -> String {
        format!("{BUILTIN_PREFIX}{}", name.as_ref().trim().trim_start_matches(BUILTIN_PREFIX))
    }

    fn file_name(name: impl AsRef<str>) -> String {
        format!("{}.yaml", name.as_ref().trim().trim_start_matches(BUILTIN_PREFIX))
    }
}
