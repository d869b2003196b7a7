use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// The inside of an expression tag or a block tag, without whitespace control.
regex!(TEMPLATE_TAG_REGEX, r"(?s)\{\{-?(.*?)-?\}\}|\{%-?(.*?)-?%\}");
// A string literal, or an identifier with whatever makes it a formatter, a
// field access or a function call instead of a variable.
regex!(
    TEMPLATE_TOKEN_REGEX,
    r#""(?:[^"\\]|\\.)*"|(\|\s*|\.\s*)?([A-Za-z_][A-Za-z0-9_]*)(\s*\()?"#
);
