//! Slash-delimited path keys.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Path separator used by flat status updates.
pub const SEPARATOR: char = '/';

/// A `/`-delimited path split into its ordered segments.
///
/// Splitting is literal: `"a//b"` yields an empty middle segment and an
/// empty string yields a single empty segment.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathKey {
    segments: Vec<String>,
}

impl PathKey {
    /// Splits a raw path into segments.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        Self {
            segments: raw.split(SEPARATOR).map(str::to_string).collect(),
        }
    }

    /// Returns the segments in order.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The path made of the first `depth` segments.
    #[must_use]
    pub fn prefix(&self, depth: usize) -> Self {
        Self {
            segments: self.segments[..depth.min(self.segments.len())].to_vec(),
        }
    }
}

impl fmt::Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, "{}", SEPARATOR)?;
            }
            f.write_str(segment)?;
        }
        Ok(())
    }
}

impl FromStr for PathKey {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<&str> for PathKey {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested_path() {
        let key = PathKey::parse("dir/sub/key");
        assert_eq!(key.segments(), &["dir", "sub", "key"]);
        assert_eq!(key.len(), 3);
    }

    #[test]
    fn test_parse_single_segment() {
        let key = PathKey::parse("delay");
        assert_eq!(key.segments(), &["delay"]);
    }

    #[test]
    fn test_parse_keeps_empty_segments() {
        let key = PathKey::parse("a//b");
        assert_eq!(key.segments(), &["a", "", "b"]);
        assert_eq!(PathKey::parse("").segments(), &[""]);
    }

    #[test]
    fn test_display_round_trips() {
        let key: PathKey = "subdata/sub2".parse().unwrap();
        assert_eq!(key.to_string(), "subdata/sub2");
    }

    #[test]
    fn test_prefix() {
        let key = PathKey::parse("a/b/c");
        assert_eq!(key.prefix(2).to_string(), "a/b");
        assert_eq!(key.prefix(10), key);
        assert!(key.prefix(0).is_empty());
    }
}
