//! Key paths from the root of a merge call to the key being resolved
//!
//! A [`KeyPath`] never changes in place: every recursion level works on an
//! extended copy produced by [`KeyPath::child`].
//!
//! # Examples
//!
//! ```
//! use blend_core::KeyPath;
//!
//! let path = KeyPath::root().child("x").child("c");
//! assert!(path.starts_with_dotted("x.c"));
//! assert!(path.starts_with_dotted("x"));
//! assert!(!path.starts_with_dotted("c"));
//! assert!(path.contains("c"));
//! assert_eq!(path.to_string(), "x.c");
//! ```

use std::fmt;

/// Ordered sequence of record keys
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct KeyPath {
    segments: Vec<String>,
}

impl KeyPath {
    /// The empty path
    pub fn root() -> Self {
        Self::default()
    }

    /// Split a dotted string into a path.
    ///
    /// The split is verbatim: empty segments are kept, so `"a..b"` has three
    /// segments and `""` has one empty segment.
    pub fn parse(dotted: &str) -> Self {
        Self {
            segments: dotted.split('.').map(str::to_string).collect(),
        }
    }

    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
        }
    }

    /// A copy of this path extended by one key.
    pub fn child(&self, key: &str) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(key.to_string());
        Self { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// The last key, if any.
    pub fn key(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// True when every segment of `dotted` equals the path segment at the
    /// same index. A dotted path longer than this path never matches.
    pub fn starts_with_dotted(&self, dotted: &str) -> bool {
        dotted
            .split('.')
            .enumerate()
            .all(|(i, segment)| self.segments.get(i).is_some_and(|s| s == segment))
    }

    /// True when `segment` equals any single key of the path.
    pub fn contains(&self, segment: &str) -> bool {
        self.segments.iter().any(|s| s == segment)
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("."))
    }
}

impl From<&str> for KeyPath {
    fn from(dotted: &str) -> Self {
        Self::parse(dotted)
    }
}
