//! Validators and splitters of the standard fields.
//!
//! A validator returns the normalized value, or why the raw value was
//! rejected.

use crate::consts::{DOI_REGEX, ISBN_REGEX, ISSN_REGEX, KEYWORD_SEPARATOR_REGEX, WHITESPACE_REGEX};

const DOI_PREFIXES: [&str; 5] = [
    "doi:",
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
];

fn strip_prefix_ignore_case<'a>(value: &'a str, prefix: &str) -> Option<&'a str> {
    value
        .get(..prefix.len())
        .filter(|head| head.eq_ignore_ascii_case(prefix))
        .map(|_| &value[prefix.len()..])
}

/// Accepts a bare DOI, a `doi:` URI or a resolver URL, and returns the bare
/// DOI.
pub fn doi(value: &str) -> Result<String, String> {
    let value = value.trim();
    let bare = DOI_PREFIXES
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(value, prefix))
        .unwrap_or(value)
        .trim_start();
    match DOI_REGEX.is_match(bare) {
        true => Ok(bare.to_string()),
        false => Err("not a DOI".to_string()),
    }
}

/// Accepts `NNNN-NNNC` (hyphen optional, `issn:` prefix allowed) with a
/// correct check digit and returns the hyphenated upper-case form.
pub fn issn(value: &str) -> Result<String, String> {
    let value = value.trim();
    let value = strip_prefix_ignore_case(value, "issn:").unwrap_or(value).trim().to_ascii_uppercase();
    let captures = ISSN_REGEX.captures(&value).ok_or_else(|| "not an ISSN".to_string())?;
    let digits: String = format!("{}{}", &captures[1], &captures[2]);
    let sum: u32 = digits
        .chars()
        .take(7)
        .zip((2..=8).rev())
        .filter_map(|(c, weight)| c.to_digit(10).map(|d| d * weight))
        .sum();
    let expected = match (11 - sum % 11) % 11 {
        10 => 'X',
        n => char::from_digit(n, 10).unwrap_or('?'),
    };
    match digits.ends_with(expected) {
        true => Ok(format!("{}-{}", &captures[1], &captures[2])),
        false => Err(format!("bad check digit, expected {expected}")),
    }
}

/// Accepts an ISBN-10 or ISBN-13, punctuated or not. The check digit is not
/// verified. Returns the value as given, minus any `isbn:` prefix.
pub fn isbn(value: &str) -> Result<String, String> {
    let value = value.trim();
    let value = strip_prefix_ignore_case(value, "isbn:").unwrap_or(value).trim();
    let digits: String = value
        .chars()
        .filter(|c| !matches!(c, '-' | ' '))
        .map(|c| c.to_ascii_uppercase())
        .collect();
    match ISBN_REGEX.is_match(&digits) {
        true => Ok(value.to_string()),
        false => Err("not an ISBN-10 or ISBN-13".to_string()),
    }
}

/// Collapses runs of whitespace in an author's name.
pub fn author(value: &str) -> Result<String, String> {
    let name = WHITESPACE_REGEX.replace_all(value.trim(), " ");
    match name.is_empty() {
        true => Err("empty author".to_string()),
        false => Ok(name.into_owned()),
    }
}

/// Splits a keyword list on `;` and `,`.
pub fn keywords(value: &str) -> Vec<String> {
    KEYWORD_SEPARATOR_REGEX
        .split(value)
        .map(str::trim)
        .filter(|keyword| !keyword.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::bare("10.1056/NEJMoa1", Some("10.1056/NEJMoa1"))]
    #[case::uri("doi:10.1056/NEJMoa1", Some("10.1056/NEJMoa1"))]
    #[case::uri_upper("DOI: 10.1056/x", Some("10.1056/x"))]
    #[case::resolver("https://doi.org/10.1000/182", Some("10.1000/182"))]
    #[case::dx_resolver("http://dx.doi.org/10.1000.10/a(b)", Some("10.1000.10/a(b)"))]
    #[case::no_slash("10.1056", None)]
    #[case::no_suffix("10.1056/", None)]
    #[case::wrong_directory("11.1056/x", None)]
    #[case::empty("", None)]
    fn test_doi(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(doi(input).ok().as_deref(), expected);
    }

    #[rstest]
    #[case::hyphenated("0378-5955", Some("0378-5955"))]
    #[case::unpunctuated("03785955", Some("0378-5955"))]
    #[case::prefixed("issn: 2049-3630", Some("2049-3630"))]
    #[case::check_x("0000-006x", Some("0000-006X"))]
    #[case::bad_check("0378-5956", None)]
    #[case::too_short("0378-595", None)]
    fn test_issn(#[case] input: &str, #[case] expected: Option<&str>) {
        assert_eq!(issn(input).ok().as_deref(), expected);
    }

    #[rstest]
    #[case::isbn10("0-306-40615-2", true)]
    #[case::isbn10_x("080442957X", true)]
    #[case::isbn13("978-0-306-40615-7", true)]
    #[case::prefixed("ISBN: 9780306406157", true)]
    #[case::eleven("03064061521", false)]
    #[case::letters("0-306-ABCDE-2", false)]
    fn test_isbn(#[case] input: &str, #[case] valid: bool) {
        assert_eq!(isbn(input).is_ok(), valid);
    }

    #[test]
    fn test_author() {
        assert_eq!(author("  Smith,\n  John ").as_deref(), Ok("Smith, John"));
        assert!(author(" \t ").is_err());
    }

    #[test]
    fn test_keywords() {
        assert_eq!(keywords("cells; proteins ,, membranes;"), ["cells", "proteins", "membranes"]);
        assert!(keywords(" ; ").is_empty());
    }
}
