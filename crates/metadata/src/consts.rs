use regex::Regex;
use std::sync::LazyLock;

macro_rules! regex {
    ($name:ident, $regex:expr) => {
        pub(crate) static $name: LazyLock<Regex> = LazyLock::new(|| Regex::new($regex).unwrap());
    };
}

// Registrant, then a non-empty suffix.
regex!(DOI_REGEX, r"^10\.[0-9]+(?:\.[0-9]+)*/\S+$");
regex!(ISSN_REGEX, r"^([0-9]{4})-?([0-9]{3}[0-9X])$");
regex!(ISBN_REGEX, r"^(?:[0-9]{9}[0-9X]|[0-9]{13})$");
regex!(KEYWORD_SEPARATOR_REGEX, r"[;,]");
regex!(WHITESPACE_REGEX, r"\s+");
