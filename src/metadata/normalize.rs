use once_cell::sync::Lazy;
use regex::Regex;

/// Anything that is not a letter, a digit or whitespace.
static PUNCTUATION_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\p{L}\p{N}\s]").unwrap());

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

/// URL and scheme prefixes that wrap a bare DOI.
const DOI_PREFIXES: &[&str] = &[
    "https://doi.org/",
    "http://doi.org/",
    "https://dx.doi.org/",
    "http://dx.doi.org/",
    "doi:",
];

/// Normalizes a title for exact fallback matching.
///
/// Lowercases, strips punctuation and collapses runs of whitespace to a
/// single space. `"  Title: B!  "` and `"title b"` normalize identically.
pub fn normalize_title(title: &str) -> String {
    let lower = title.to_lowercase();
    let stripped = PUNCTUATION_RE.replace_all(&lower, "");
    WHITESPACE_RE.replace_all(stripped.trim(), " ").into_owned()
}

/// Canonicalizes an identifier so that spelling variants of the same key
/// compare equal.
///
/// Trims, lowercases and removes DOI URL prefixes; nothing else is changed,
/// so the match stays exact.
pub fn normalize_identifier(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    DOI_PREFIXES
        .iter()
        .find_map(|prefix| lower.strip_prefix(prefix))
        .map(|rest| rest.trim().to_string())
        .unwrap_or(lower)
}

/// Splits a multi-valued cell (`"a; b;c"`) into its non-empty parts.
pub fn split_multi(cell: &str) -> impl Iterator<Item = &str> {
    cell.split(';').map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_lowercase_and_whitespace() {
        assert_eq!(normalize_title("  Title \t  B  "), "title b");
    }

    #[test]
    fn test_title_strips_punctuation() {
        assert_eq!(
            normalize_title("SARS-CoV-2: a review (2020)."),
            "sarscov2 a review 2020"
        );
    }

    #[test]
    fn test_title_punctuation_only_is_empty() {
        assert_eq!(normalize_title(" ... !? "), "");
    }

    #[test]
    fn test_identifier_doi_prefixes() {
        assert_eq!(
            normalize_identifier("https://doi.org/10.1000/ABC"),
            "10.1000/abc"
        );
        assert_eq!(normalize_identifier("doi: 10.1000/abc"), "10.1000/abc");
        assert_eq!(normalize_identifier(" PMC12345 "), "pmc12345");
    }

    #[test]
    fn test_split_multi() {
        let parts: Vec<&str> = split_multi("a; b;;c ").collect();
        assert_eq!(parts, vec!["a", "b", "c"]);
    }
}
