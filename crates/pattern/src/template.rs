//! AU-parameterized URL and regex templates.
//!
//! Plugins describe where an archival unit's articles live in terms of its
//! configuration, e.g. "everything under `{{ base_url }}doi/`". Templates are
//! compiled once with [upon] and rendered against an AU's [`AuParams`]. The
//! context a template is rendered for decides how parameter values are
//! substituted:
//!
//! - [`TemplateContext::Url`]: values are inserted verbatim.
//! - [`TemplateContext::Regex`]: values are regex-escaped first, so that a
//!   base URL of `http://www.nejm.org/` matches literally.
//!
//! Two formatters are available in either context: **`lower`** and
//! **`upper`**. **`url_host`** and **`url_path`** pick the host or the path
//! out of a URL-valued parameter.
//!
//! Templates written in the older printf style (`"%sdoi/full/", base_url`) are
//! accepted by [`Template::parse`] and converted on the way in.
//!
//! # Example
//!
//! ```
//! use folio_pattern::{Template, TemplateContext};
//! use folio_store::AuParams;
//!
//! let params = AuParams::new().with("base_url", "http://www.nejm.org/");
//! let roots = Template::parse(r#""%sdoi/", base_url"#, TemplateContext::Url).unwrap();
//! assert_eq!(roots.render(&params).unwrap(), "http://www.nejm.org/doi/");
//!
//! let pattern = Template::parse("^{{ base_url }}doi/full/", TemplateContext::Regex).unwrap();
//! assert_eq!(pattern.render(&params).unwrap(), r"^http://www\.nejm\.org/doi/full/");
//! ```

use crate::consts::{TEMPLATE_TAG_REGEX, TEMPLATE_TOKEN_REGEX};
use crate::error::{ErrorKind, Result};
use crate::pattern::UrlPattern;
use exn::ResultExt;
use folio_store::AuParams;
use std::fmt::{Debug, Formatter, Result as FmtResult};
use tracing::instrument;
use upon::{Engine, Value};

/// Words with a meaning of their own inside template tags.
const KEYWORDS: [&str; 14] = [
    "if", "not", "else", "endif", "for", "in", "endfor", "with", "as", "endwith", "include", "true", "false", "loop",
];

/// How parameter values are substituted into a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateContext {
    Url,
    Regex,
}

/// A compiled template plus the AU parameters it needs.
pub struct Template {
    source: String,
    context: TemplateContext,
    params: Vec<String>,
    engine: Engine<'static>,
    template: upon::Template<'static>,
}
impl Template {
    /// Compiles an upon template.
    pub fn new(source: impl Into<String>, context: TemplateContext) -> Result<Self> {
        let source = source.into();
        let mut engine = Engine::new();
        addons::configure(&mut engine);
        // Compile eagerly so that broken templates fail while loading a plugin,
        // not halfway through an AU.
        let template = engine
            .compile(source.clone())
            .or_raise(|| ErrorKind::InvalidTemplate(source.clone()))?;
        let params = referenced_params(&source);
        Ok(Self { source, context, params, engine, template })
    }

    /// Compiles either template style: a source starting with a double quote
    /// is treated as printf style, anything else as an upon template.
    pub fn parse(source: &str, context: TemplateContext) -> Result<Self> {
        match source.trim_start().starts_with('"') {
            true => Self::new(printf::convert(source)?, context),
            false => Self::new(source, context),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn context(&self) -> TemplateContext {
        self.context
    }

    /// Names of the AU parameters this template references, in order of
    /// first appearance.
    pub fn params(&self) -> &[String] {
        &self.params
    }

    /// Renders the template against an AU's parameters.
    ///
    /// Every referenced parameter must be present; an absent one is reported
    /// by name as [`ErrorKind::MissingParam`] rather than rendering an empty
    /// string into a URL.
    #[instrument(level = "trace", skip_all, fields(template = %self.source))]
    pub fn render(&self, params: &AuParams) -> Result<String> {
        if let Some(missing) = self.params.iter().find(|name| params.get(name).is_none()) {
            exn::bail!(ErrorKind::MissingParam(missing.clone()));
        }
        let values = params.iter().map(|(name, value)| {
            let value = match self.context {
                TemplateContext::Url => value.clone(),
                TemplateContext::Regex => regex::escape(value),
            };
            (name.clone(), Value::String(value))
        });
        self.template
            .render(&self.engine, Value::Map(values.collect()))
            .to_string()
            .or_raise(|| ErrorKind::InvalidTemplate(self.source.clone()))
    }

    /// Renders a regex template and compiles the result.
    pub fn render_pattern(&self, params: &AuParams, case_insensitive: bool) -> Result<UrlPattern> {
        UrlPattern::new(&self.render(params)?, case_insensitive)
    }
}

impl Debug for Template {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("Template")
            .field("source", &self.source)
            .field("context", &self.context)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Names of the variables a template reads, in order of first appearance,
/// from both expression tags and block tags. Names bound by the template
/// itself (`for` loop variables, `with … as` names) are not parameters.
fn referenced_params(source: &str) -> Vec<String> {
    let mut params: Vec<String> = Vec::new();
    let mut locals: Vec<&str> = Vec::new();
    for tag in TEMPLATE_TAG_REGEX.captures_iter(source) {
        let (inner, is_block) = match (tag.get(1), tag.get(2)) {
            (Some(expr), _) => (expr.as_str(), false),
            (None, Some(block)) => (block.as_str(), true),
            (None, None) => continue,
        };
        let mut binding = false;
        for (position, token) in TEMPLATE_TOKEN_REGEX.captures_iter(inner).enumerate() {
            // String literals, formatters, fields and function names.
            let Some(name) = token.get(2) else {
                continue;
            };
            if token.get(1).is_some() || token.get(3).is_some() {
                continue;
            }
            let name = name.as_str();
            match name {
                "for" if is_block && position == 0 => binding = true,
                "as" if is_block => binding = true,
                "in" if binding => binding = false,
                _ if binding => locals.push(name),
                _ if KEYWORDS.contains(&name) || locals.contains(&name) => {},
                _ if params.iter().any(|param| param == name) => {},
                _ => params.push(name.to_string()),
            }
        }
    }
    params
}

/// Conversion of printf-style templates.
mod printf {
    use crate::error::{ErrorKind, Result};
    use exn::OptionExt;

    /// Converts `"<format>", arg, arg…` into upon syntax. `%s` and `%d` each
    /// consume the next argument, `%%` is a literal percent sign. Arguments are
    /// parameter names, optionally wrapped in `url_host(…)` or `url_path(…)`.
    pub(super) fn convert(source: &str) -> Result<String> {
        let invalid = |reason: &str| ErrorKind::InvalidTemplate(format!("{source}: {reason}"));
        let source_trimmed = source.trim();
        let Some(rest) = source_trimmed.strip_prefix('"') else {
            exn::bail!(invalid("expected a quoted format string"));
        };
        let mut format = String::new();
        let mut chars = rest.char_indices();
        let mut args_start = None;
        while let Some((index, c)) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some((_, '"')) => format.push('"'),
                    Some((_, other)) => {
                        format.push('\\');
                        format.push(other);
                    },
                    None => format.push('\\'),
                },
                '"' => {
                    args_start = Some(index + 1);
                    break;
                },
                c => format.push(c),
            }
        }
        let Some(args_start) = args_start else {
            exn::bail!(invalid("unterminated format string"));
        };
        let args_text = rest[args_start..].trim();
        let mut args = Vec::new();
        if !args_text.is_empty() {
            let Some(args_text) = args_text.strip_prefix(',') else {
                exn::bail!(invalid("expected ',' after the format string"));
            };
            for arg in args_text.split(',').map(str::trim) {
                args.push(argument(arg).ok_or_raise(|| invalid("invalid argument"))?);
            }
        }
        if ["{{", "{%", "{#"].iter().any(|tag| format.contains(tag)) {
            exn::bail!(invalid("format string contains template delimiters"));
        }

        let mut out = String::with_capacity(format.len());
        let mut args = args.into_iter();
        let mut chars = format.chars();
        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('%') => out.push('%'),
                Some('s' | 'd') => match args.next() {
                    Some(arg) => out.push_str(&arg),
                    None => exn::bail!(invalid("more conversions than arguments")),
                },
                _ => exn::bail!(invalid("unsupported conversion")),
            }
        }
        if args.next().is_some() {
            exn::bail!(invalid("more arguments than conversions"));
        }
        Ok(out)
    }

    fn argument(arg: &str) -> Option<String> {
        let is_name = |s: &str| {
            s.starts_with(|c: char| c.is_ascii_alphabetic() || c == '_')
                && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
        };
        for function in ["url_host", "url_path"] {
            if let Some(inner) = arg.strip_prefix(function).and_then(|s| s.trim().strip_prefix('(')) {
                let name = inner.strip_suffix(')')?.trim();
                return is_name(name).then(|| format!("{{{{ {name}|{function} }}}}"));
            }
        }
        is_name(arg).then(|| format!("{{{{ {arg} }}}}"))
    }
}

/// Custom [`upon`] formatters for URL-valued parameters.
mod addons {
    use std::fmt::Write;
    use upon::{Engine, Value, fmt as upon_fmt};

    fn lower(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", s.to_lowercase())?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn upper(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", s.to_uppercase())?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    /// Splits `scheme://host[:port]/path` into the host and the path. The
    /// path keeps its leading slash; an empty path is `/`.
    pub(crate) fn split_url(url: &str) -> (&str, &str) {
        let after_scheme = url.split_once("://").map_or(url, |(_, rest)| rest);
        let (authority, path) = match after_scheme.find('/') {
            Some(index) => after_scheme.split_at(index),
            None => (after_scheme, "/"),
        };
        let host = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
        let host = host.split(':').next().unwrap_or(host);
        (host, path)
    }

    fn url_host(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", split_url(s).0)?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    fn url_path(f: &mut upon_fmt::Formatter<'_>, value: &Value) -> upon_fmt::Result {
        match value {
            Value::String(s) => write!(f, "{}", split_url(s).1)?,
            v => upon_fmt::default(f, v)?,
        };
        Ok(())
    }

    pub(crate) fn configure(engine: &mut Engine<'_>) {
        engine.add_formatter("lower", lower);
        engine.add_formatter("upper", upper);
        engine.add_formatter("url_host", url_host);
        engine.add_formatter("url_path", url_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn params() -> AuParams {
        AuParams::new()
            .with("base_url", "http://www.nejm.org/")
            .with("journal_id", "NEJM")
            .with("year", "2011")
    }

    #[rstest]
    #[case(r#""%s", base_url"#, "{{ base_url }}")]
    #[case(r#""%sdoi/%s/", base_url, journal_id"#, "{{ base_url }}doi/{{ journal_id }}/")]
    #[case(r#""%slockss/%d/100%%", base_url, year"#, "{{ base_url }}lockss/{{ year }}/100%")]
    #[case(r#""^https?://%s/", url_host(base_url)"#, "^https?://{{ base_url|url_host }}/")]
    #[case(r#""say \"hi\"""#, r#"say "hi""#)]
    #[case(r#""^%s\d+", base_url"#, r"^{{ base_url }}\d+")]
    fn test_printf_convert(#[case] source: &str, #[case] expected: &str) {
        assert_eq!(printf::convert(source).unwrap(), expected);
    }

    #[rstest]
    #[case(r#""%s%s", base_url"#)]
    #[case(r#""%s", base_url, year"#)]
    #[case(r#""%x", base_url"#)]
    #[case(r#""%s" base_url"#)]
    #[case(r#""%s, base_url"#)]
    #[case(r#""%s", base-url"#)]
    #[case(r#""{{ %s }}", base_url"#)]
    fn test_printf_invalid(#[case] source: &str) {
        let err = printf::convert(source).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidTemplate(_)));
    }

    #[test]
    fn test_url_context_is_verbatim() {
        let template = Template::parse("{{ base_url }}lockss/{{ journal_id|lower }}/{{ year }}", TemplateContext::Url)
            .unwrap();
        assert_eq!(template.params(), ["base_url", "journal_id", "year"]);
        assert_eq!(template.render(&params()).unwrap(), "http://www.nejm.org/lockss/nejm/2011");
    }

    #[test]
    fn test_regex_context_escapes() {
        let template = Template::parse(r#""^%sdoi/(full|pdf)/", base_url"#, TemplateContext::Regex).unwrap();
        let pattern = template.render_pattern(&params(), true).unwrap();
        assert!(pattern.is_match("http://www.nejm.org/doi/full/10.1056/x"));
        assert!(!pattern.is_match("http://wwwXnejmXorg/doi/full/10.1056/x"));
    }

    #[rstest]
    #[case::expressions("{{ base_url }}lockss/{{ year }}", &["base_url", "year"])]
    #[case::whitespace_control("{{- base_url -}}{{base_url}}", &["base_url"])]
    #[case::only_in_block("{{ base_url }}{% if volume_name %}vol{% endif %}", &["base_url", "volume_name"])]
    #[case::negated("{% if not journal_id %}x{% else if year %}y{% endif %}", &["journal_id", "year"])]
    #[case::loop_variable("{% for issue in issues %}{{ issue.id }}{% endfor %}", &["issues"])]
    #[case::with_binding("{% with base_url as url %}{{ url|url_host }}{% endwith %}", &["base_url"])]
    #[case::string_literal(r#"{% with "in base_url" as y %}{{ y }}{{ base_url }}{% endwith %}"#, &["base_url"])]
    fn test_referenced_params(#[case] source: &str, #[case] expected: &[&str]) {
        let template = Template::new(source, TemplateContext::Url).unwrap();
        assert_eq!(template.params(), expected);
    }

    #[test]
    fn test_param_used_only_in_block() {
        let template = Template::new("{{ base_url }}{% if volume_name %}vol{% endif %}", TemplateContext::Url).unwrap();
        let with_volume = params().with("volume_name", "364");
        assert_eq!(template.render(&with_volume).unwrap(), "http://www.nejm.org/vol");

        let err = template.render(&params()).unwrap_err();
        assert_eq!(&*err, &ErrorKind::MissingParam("volume_name".to_string()));
    }

    #[test]
    fn test_missing_param() {
        let template = Template::new("{{ base_url }}{{ volume_name }}", TemplateContext::Url).unwrap();
        let err = template.render(&params()).unwrap_err();
        assert_eq!(&*err, &ErrorKind::MissingParam("volume_name".to_string()));
    }

    #[test]
    fn test_invalid_template() {
        let err = Template::new("{{ base_url ", TemplateContext::Url).unwrap_err();
        assert!(matches!(&*err, ErrorKind::InvalidTemplate(_)));
    }

    #[rstest]
    #[case("http://www.nejm.org/", "www.nejm.org", "/")]
    #[case("https://user@host.org:8080/a/b", "host.org", "/a/b")]
    #[case("http://host.org", "host.org", "/")]
    fn test_split_url(#[case] url: &str, #[case] host: &str, #[case] path: &str) {
        assert_eq!(addons::split_url(url), (host, path));
    }

    #[test]
    fn test_url_host_and_path() {
        let params = AuParams::new().with("base_url", "http://www.nejm.org/content/");
        let template = Template::parse(r#""%s|%s", url_host(base_url), url_path(base_url)"#, TemplateContext::Url)
            .unwrap();
        assert_eq!(template.render(&params).unwrap(), "www.nejm.org|/content/");
    }
}
