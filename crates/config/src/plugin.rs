//! Plugin definitions.
//!
//! A plugin definition is everything needed to find the articles of one
//! publisher's archival units: where to look, which URLs can start an
//! article, how to derive its other aspects, and how to cook the metadata
//! found in them.

use crate::builtin::Builtins;
use crate::error::{ErrorKind, Result};
use crate::settings::Settings;
use exn::{OptionExt, ResultExt};
use figment::Figment;
use figment::providers::{Format, Json, Toml, Yaml};
use folio_articles::{
    ArticleIteratorBuilder, ArticleTable, AspectDef, ContentRequirement, DedupPolicy, IteratorSpec, Role,
};
use folio_metadata::CookTable;
use folio_store::AuParams;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::instrument;

/// Prefix of references to definitions compiled into the binary.
pub const BUILTIN_PREFIX: &str = "builtin:";

/// The syntax a definition is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Syntax {
    Yaml,
    Toml,
    Json,
}
impl Syntax {
    /// Picks the syntax from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    fn figment(self, text: &str) -> Figment {
        match self {
            Self::Yaml => Figment::from(Yaml::string(text)),
            Self::Toml => Figment::from(Toml::string(text)),
            Self::Json => Figment::from(Json::string(text)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginDefinition {
    pub name: String,
    /// MIME type of article candidates when neither the target nor the spec
    /// names one.
    #[serde(default)]
    pub default_mime_type: Option<String>,
    #[serde(default)]
    pub spec: SpecDefinition,
    /// In order of precedence.
    #[serde(default)]
    pub aspects: Vec<AspectDefinition>,
    #[serde(default)]
    pub full_text_from_roles: Vec<String>,
    #[serde(default)]
    pub roles_from_other_roles: Vec<DerivedRole>,
    #[serde(default)]
    pub dedup: Dedup,
    #[serde(default)]
    pub cook: Vec<CookEntry>,
}

/// Where to look for articles. Every string except `roots` and `pattern` is
/// a template over the AU's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SpecDefinition {
    pub roots: Vec<String>,
    pub root_templates: Vec<String>,
    pub pattern: Option<String>,
    pub pattern_template: Option<String>,
    pub include_subtree: Option<String>,
    pub exclude_subtree: Option<String>,
    pub case_insensitive: bool,
    pub mime_type: Option<String>,
}
impl Default for SpecDefinition {
    fn default() -> Self {
        let spec = IteratorSpec::default();
        Self {
            roots: spec.roots,
            root_templates: spec.root_templates,
            pattern: spec.pattern,
            pattern_template: spec.pattern_template,
            include_subtree: spec.include_subtree,
            exclude_subtree: spec.exclude_subtree,
            case_insensitive: spec.case_insensitive,
            mime_type: spec.mime_type,
        }
    }
}
impl From<&SpecDefinition> for IteratorSpec {
    fn from(spec: &SpecDefinition) -> Self {
        Self {
            roots: spec.roots.clone(),
            root_templates: spec.root_templates.clone(),
            pattern: spec.pattern.clone(),
            pattern_template: spec.pattern_template.clone(),
            include_subtree: spec.include_subtree.clone(),
            exclude_subtree: spec.exclude_subtree.clone(),
            case_insensitive: spec.case_insensitive,
            mime_type: spec.mime_type.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AspectDefinition {
    /// Regex templates; none makes the aspect minor.
    #[serde(default)]
    pub patterns: Vec<String>,
    pub replacements: Vec<String>,
    pub roles: Vec<String>,
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub case_insensitive: Option<bool>,
}
impl From<&AspectDefinition> for AspectDef {
    fn from(aspect: &AspectDefinition) -> Self {
        let mut def = AspectDef::major(&aspect.patterns, &aspect.replacements, aspect.roles.iter().map(String::as_str))
            .with_content(aspect.content.into());
        if let Some(case_insensitive) = aspect.case_insensitive {
            def = def.with_case_insensitive(case_insensitive);
        }
        def
    }
}

/// What an aspect's URL must actually serve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Content {
    #[default]
    Any,
    Html,
    Pdf,
}
impl From<Content> for ContentRequirement {
    fn from(content: Content) -> Self {
        match content {
            Content::Any => Self::Any,
            Content::Html => Self::Html,
            Content::Pdf => Self::Pdf,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DerivedRole {
    pub role: String,
    pub from: Vec<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dedup {
    #[default]
    MatchKey,
    DeferralOnly,
}
impl From<Dedup> for DedupPolicy {
    fn from(dedup: Dedup) -> Self {
        match dedup {
            Dedup::MatchKey => Self::MatchKey,
            Dedup::DeferralOnly => Self::DeferralOnly,
        }
    }
}

/// One raw metadata tag and the standard fields it feeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CookEntry {
    pub raw: String,
    pub fields: Vec<String>,
}

impl PluginDefinition {
    /// Parses a definition. `origin` names where the text came from, for
    /// error reports.
    pub fn parse(text: &str, syntax: Syntax, origin: &str) -> Result<Self> {
        syntax.figment(text).extract().or_raise(|| ErrorKind::Malformed(origin.to_string()))
    }

    /// Loads a definition file, in the syntax its extension says.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let origin = path.display().to_string();
        if !path.is_file() {
            exn::bail!(ErrorKind::NotFound(origin));
        }
        let syntax =
            Syntax::from_path(path).ok_or_raise(|| ErrorKind::Malformed(format!("{origin}: unknown file extension")))?;
        let text = std::fs::read_to_string(path).or_raise(|| ErrorKind::Io(path.to_path_buf()))?;
        let definition = Self::parse(&text, syntax, &origin)?;
        tracing::debug!(plugin = %definition.name, "loaded plugin definition");
        Ok(definition)
    }

    /// Resolves a reference to a definition: `builtin:<name>` for one compiled
    /// into the binary, else a file path, else a name looked up in the
    /// configured plugin directories.
    #[instrument(skip(settings))]
    pub fn resolve(reference: &str, settings: &Settings) -> Result<Self> {
        if let Some(name) = reference.strip_prefix(BUILTIN_PREFIX) {
            return Builtins::load(name);
        }
        let path = Path::new(reference);
        if path.is_file() {
            return Self::load(path);
        }
        match settings.find_plugin(reference) {
            Some(found) => Self::load(found),
            None => exn::bail!(ErrorKind::NotFound(reference.to_string())),
        }
    }

    /// The article iterator builder this definition describes.
    pub fn to_builder(&self) -> ArticleIteratorBuilder {
        let mut builder = ArticleIteratorBuilder::new()
            .with_spec(IteratorSpec::from(&self.spec))
            .with_dedup(self.dedup.into());
        for aspect in &self.aspects {
            builder = builder.add_aspect(AspectDef::from(aspect));
        }
        if !self.full_text_from_roles.is_empty() {
            builder = builder.with_full_text_from_roles(self.full_text_from_roles.iter().map(String::as_str));
        }
        for derived in &self.roles_from_other_roles {
            let others = derived.from.iter().map(String::as_str);
            builder = builder.with_role_from_other_roles(Role::from(derived.role.as_str()), others);
        }
        if let Some(mime_type) = &self.default_mime_type {
            builder = builder.with_default_mime_type(mime_type);
        }
        builder
    }

    /// Compiles the definition against one AU's parameters.
    #[instrument(skip_all, fields(plugin = %self.name))]
    pub fn compile(&self, params: &AuParams) -> Result<ArticleTable> {
        self.to_builder().build(params).or_raise(|| ErrorKind::Invalid {
            plugin: self.name.clone(),
            reason: "article table does not compile".to_string(),
        })
    }

    /// The metadata cooking table, if the definition declares one.
    pub fn cook_table(&self) -> Result<Option<CookTable>> {
        if self.cook.is_empty() {
            return Ok(None);
        }
        let mut table = CookTable::new();
        for entry in &self.cook {
            for field in &entry.fields {
                table.insert_key(&entry.raw, field).or_raise(|| ErrorKind::Invalid {
                    plugin: self.name.clone(),
                    reason: format!("cannot cook {:?} into {field:?}", entry.raw),
                })?;
            }
        }
        Ok(Some(table))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_articles::MetadataTarget;
    use folio_store::{ArchivalUnit, CachedUrl, MemoryStore};
    use rstest::rstest;
    use std::io::Write;

    const OJS: &str = r#"
name: ojs
spec:
  root_templates: ["{{ base_url }}article/"]
  pattern_template: '^{{ base_url }}article/(view|download)/[^/]+/[^/?]+$'
aspects:
  - patterns: ['/article/(?:view|download)/([^/]+)/([^/]+)$']
    replacements: ["/article/download/$1/$2", "/article/view/$1/$2"]
    roles: [FullTextPdf]
    content: pdf
  - replacements: ["/article/view/$1"]
    roles: [Abstract]
cook:
  - raw: citation_doi
    fields: [doi]
"#;

    #[test]
    fn test_parse_defaults() {
        let definition = PluginDefinition::parse(OJS, Syntax::Yaml, "ojs.yaml").unwrap();
        assert_eq!(definition.name, "ojs");
        assert!(definition.spec.case_insensitive);
        assert_eq!(definition.dedup, Dedup::MatchKey);
        assert_eq!(definition.aspects[0].content, Content::Pdf);
        assert_eq!(definition.aspects[1].content, Content::Any);
        assert!(definition.aspects[1].patterns.is_empty());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        let err = PluginDefinition::parse("name: x\nspec:\n  visit_archive_members: true\n", Syntax::Yaml, "x.yaml")
            .unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(origin) if origin == "x.yaml"));
    }

    #[test]
    fn test_compile_and_iterate() {
        let definition = PluginDefinition::parse(OJS, Syntax::Yaml, "ojs.yaml").unwrap();
        let au = MemoryStore::new("ojs-1").with_param("base_url", "http://j.org/").with_cus([
            CachedUrl::pdf("http://j.org/article/view/7/12"),
            CachedUrl::html("http://j.org/article/view/7"),
        ]);
        let table = definition.compile(au.params()).unwrap();
        let found: Vec<_> = table.iterator(&au, MetadataTarget::metadata()).collect();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].full_text_url(), Some("http://j.org/article/view/7/12"));
        assert_eq!(found[0].role_url(Role::ABSTRACT), Some("http://j.org/article/view/7"));
    }

    #[test]
    fn test_compile_reports_missing_param() {
        let definition = PluginDefinition::parse(OJS, Syntax::Yaml, "ojs.yaml").unwrap();
        let err = definition.compile(&AuParams::new()).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Invalid { plugin, .. } if plugin == "ojs"));
    }

    #[test]
    fn test_cook_table() {
        let mut definition = PluginDefinition::parse(OJS, Syntax::Yaml, "ojs.yaml").unwrap();
        assert_eq!(definition.cook_table().unwrap().map(|table| table.len()), Some(1));
        definition.cook.push(CookEntry { raw: "x".to_string(), fields: vec!["nonsense".to_string()] });
        assert!(definition.cook_table().is_err());
        definition.cook.clear();
        assert!(definition.cook_table().unwrap().is_none());
    }

    #[rstest]
    #[case::toml("ojs.toml", "name = \"ojs\"\ndedup = \"deferral_only\"\n")]
    #[case::json("ojs.json", r#"{"name": "ojs", "dedup": "deferral_only"}"#)]
    #[case::yml("ojs.YML", "name: ojs\ndedup: deferral_only\n")]
    fn test_load_by_extension(#[case] file_name: &str, #[case] contents: &str) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(file_name);
        std::fs::File::create(&path).unwrap().write_all(contents.as_bytes()).unwrap();
        let definition = PluginDefinition::load(&path).unwrap();
        assert_eq!(definition.name, "ojs");
        assert_eq!(definition.dedup, Dedup::DeferralOnly);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = PluginDefinition::load(dir.path().join("missing.yaml")).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(_)));

        let path = dir.path().join("plugin.ini");
        std::fs::write(&path, "name = x").unwrap();
        let err = PluginDefinition::load(&path).unwrap_err();
        assert!(matches!(&*err, ErrorKind::Malformed(_)));
    }

    #[test]
    fn test_resolve_from_plugin_dirs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ojs.yaml"), OJS).unwrap();
        let settings = Settings { plugin_dirs: vec![dir.path().to_path_buf()], ..Settings::default() };
        assert_eq!(PluginDefinition::resolve("ojs", &settings).unwrap().name, "ojs");
        let err = PluginDefinition::resolve("nope", &settings).unwrap_err();
        assert!(matches!(&*err, ErrorKind::NotFound(reference) if reference == "nope"));
    }
}
