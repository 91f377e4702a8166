//! Path segment identifiers.
use std::fmt;

/// The token that parses to [Segment::Wildcard].
pub const WILDCARD: &str = "*";

/// Identifies what a single trie level matches.
///
/// Two wildcards are always equal, so registering `*` twice at the same depth reuses one
/// node. Literals are equal iff their text is byte-equal.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Segment {
    /// The root marker. Never produced by [Segment::parse] and never matched against
    /// request text.
    Root,

    /// Matches only a segment with exactly this text.
    Literal(String),

    /// Matches any non-empty segment, capturing it.
    Wildcard,
}

impl Segment {
    /// Parse one path token. Total: `*` is a wildcard and anything else is a literal.
    ///
    /// ```
    /// use routetrie::Segment;
    ///
    /// assert_eq!(Segment::Wildcard, Segment::parse("*"));
    /// assert_eq!(Segment::Literal("users".into()), Segment::parse("users"));
    /// assert_eq!(Segment::Literal("*x".into()), Segment::parse("*x"));
    /// ```
    pub fn parse(token: &str) -> Self {
        match token {
            WILDCARD => Segment::Wildcard,
            name => Segment::Literal(name.into()),
        }
    }

    /// Whether this identifier accepts the request segment `seg`.
    #[inline]
    pub fn accepts(&self, seg: &str) -> bool {
        match self {
            Segment::Root => false,
            Segment::Literal(name) => name == seg,
            Segment::Wildcard => true,
        }
    }

    /// Whether this identifier is a literal equal to `seg`.
    #[inline]
    pub(crate) fn is_literal(&self, seg: &str) -> bool {
        matches!(self, Segment::Literal(name) if name == seg)
    }

    #[inline]
    pub fn is_wildcard(&self) -> bool {
        matches!(self, Segment::Wildcard)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Root => Ok(()),
            Segment::Literal(name) => f.write_str(name),
            Segment::Wildcard => f.write_str(WILDCARD),
        }
    }
}

/// Split `path` on `/`, skipping the empty segments produced by leading, trailing or doubled
/// slashes.
#[inline]
pub(crate) fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_parse() {
        assert_eq!(Segment::Wildcard, Segment::parse("*"));
        assert_eq!(Segment::Literal("".into()), Segment::parse(""));
        assert_eq!(Segment::Literal("**".into()), Segment::parse("**"));
        assert_eq!(Segment::Literal(":id".into()), Segment::parse(":id"));
    }

    #[test]
    fn test_equality() {
        assert_eq!(Segment::parse("*"), Segment::parse("*"));
        assert_eq!(Segment::parse("foo"), Segment::parse("foo"));
        assert_ne!(Segment::parse("foo"), Segment::parse("Foo"));
        assert_ne!(Segment::parse("foo"), Segment::parse("*"));
        assert_ne!(Segment::Root, Segment::parse(""));
    }

    #[test]
    fn test_accepts() {
        assert!(Segment::Wildcard.accepts("anything"));
        assert!(Segment::parse("abc").accepts("abc"));
        assert!(!Segment::parse("abc").accepts("abcd"));
        assert!(!Segment::parse("*").is_literal("*"));
        assert!(!Segment::Root.accepts(""));
    }

    #[test]
    fn test_segments() {
        let split = |p| segments(p).collect::<Vec<_>>();

        assert_eq!(Vec::<&str>::new(), split(""));
        assert_eq!(Vec::<&str>::new(), split("///"));
        assert_eq!(vec!["a", "b"], split("/a//b/"));
        assert_eq!(vec!["a", "*", "c"], split("a/*/c"));
    }

    #[quickcheck]
    fn test_display_roundtrips_parse(token: String) -> bool {
        Segment::parse(&token).to_string() == token
    }
}
