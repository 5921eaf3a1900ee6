use std::str::FromStr;

/// A query-string filter on a numeric column.
///
/// Blank input means "no filter". Input that does not parse can never match
/// anything, so callers should short-circuit to an empty result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericFilter<T> {
    Any,
    Exact(T),
    Unmatchable,
}

impl<T: FromStr> NumericFilter<T> {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            None | Some("") => Self::Any,
            Some(value) => value.parse().map_or(Self::Unmatchable, Self::Exact),
        }
    }
}

impl<T> NumericFilter<T> {
    pub fn is_unmatchable(&self) -> bool {
        matches!(self, Self::Unmatchable)
    }
}

/// Normalizes a text filter for case-insensitive substring matching
pub fn text_filter(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

/// Parses an optional boolean flag, accepting the usual form spellings
pub fn flag_filter(raw: Option<&str>) -> Option<bool> {
    match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
        Some("1" | "true" | "yes" | "on") => Some(true),
        Some("0" | "false" | "no" | "off") => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_numeric_filter() {
        assert_eq!(NumericFilter::<i64>::parse(None), NumericFilter::Any);
        assert_eq!(NumericFilter::<i64>::parse(Some("  ")), NumericFilter::Any);
        assert_eq!(NumericFilter::<i64>::parse(Some(" 42 ")), NumericFilter::Exact(42));
        assert!(NumericFilter::<i64>::parse(Some("4x2")).is_unmatchable());
    }

    #[test]
    fn test_text_filter() {
        assert_eq!(text_filter(Some("  Ali ")), Some("ali".to_string()));
        assert_eq!(text_filter(Some("")), None);
        assert_eq!(text_filter(None), None);
    }

    #[test]
    fn test_flag_filter() {
        assert_eq!(flag_filter(Some("on")), Some(true));
        assert_eq!(flag_filter(Some("False")), Some(false));
        assert_eq!(flag_filter(Some("maybe")), None);
    }
}
