//! Matching: deciding whether a strategy applies to a key
//!
//! A [`MatchContext`] is an immutable snapshot of one key under resolution.
//! Its predicates are plain `bool` functions; a [`Matcher`] combines them
//! with ordinary boolean logic, or with the combinators in this module.
//!
//! ```
//! use blend_core::matcher::{self, Matcher};
//!
//! // Records anywhere below a key named "c"
//! let explicit = Matcher::new(|cx| cx.is_object() && cx.path_contains("c"));
//! let combined = matcher::is_object().and(matcher::path_contains("c"));
//! # let _ = (explicit, combined);
//! ```

use crate::path::KeyPath;
use crate::value::{Value, coalesce};
use std::fmt;
use std::sync::Arc;

/// Snapshot of one key offered to matchers
#[derive(Debug, Clone, Copy)]
pub struct MatchContext<'a> {
    path: &'a KeyPath,
    default_value: Option<&'a Value>,
    override_value: Option<&'a Value>,
}

impl<'a> MatchContext<'a> {
    pub fn new(
        path: &'a KeyPath,
        default_value: Option<&'a Value>,
        override_value: Option<&'a Value>,
    ) -> Self {
        Self {
            path,
            default_value,
            override_value,
        }
    }

    pub fn key_path(&self) -> &'a KeyPath {
        self.path
    }

    pub fn default_value(&self) -> Option<&'a Value> {
        self.default_value
    }

    pub fn override_value(&self) -> Option<&'a Value> {
        self.override_value
    }

    /// The effective value: the override unless it is absent or null.
    pub fn value(&self) -> Option<&'a Value> {
        coalesce(self.override_value, self.default_value)
    }

    /// The effective value is a record.
    pub fn is_object(&self) -> bool {
        self.value().is_some_and(Value::is_record)
    }

    /// The effective value is a sequence.
    pub fn is_array(&self) -> bool {
        self.value().is_some_and(Value::is_sequence)
    }

    /// The current path starts with the dotted path segment by segment.
    pub fn path(&self, dotted: &str) -> bool {
        self.path.starts_with_dotted(dotted)
    }

    /// Some key along the current path equals `segment`.
    pub fn path_contains(&self, segment: &str) -> bool {
        self.path.contains(segment)
    }

    /// The effective value equals `expected`.
    pub fn value_is(&self, expected: &Value) -> bool {
        self.value() == Some(expected)
    }
}

type MatchFn = dyn Fn(&MatchContext<'_>) -> bool + Send + Sync;

/// A shareable predicate over [`MatchContext`]
#[derive(Clone)]
pub struct Matcher(Arc<MatchFn>);

impl Matcher {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&MatchContext<'_>) -> bool + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn matches(&self, cx: &MatchContext<'_>) -> bool {
        (self.0)(cx)
    }

    pub fn and(self, other: Matcher) -> Self {
        Self::new(move |cx| self.matches(cx) && other.matches(cx))
    }

    pub fn or(self, other: Matcher) -> Self {
        Self::new(move |cx| self.matches(cx) || other.matches(cx))
    }

    pub fn negate(self) -> Self {
        Self::new(move |cx| !self.matches(cx))
    }
}

impl fmt::Debug for Matcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Matcher(..)")
    }
}

/// Matches every key. Used by the catch-all built-in strategy.
pub fn always() -> Matcher {
    Matcher::new(|_| true)
}

pub fn never() -> Matcher {
    Matcher::new(|_| false)
}

pub fn is_object() -> Matcher {
    Matcher::new(|cx| cx.is_object())
}

pub fn is_array() -> Matcher {
    Matcher::new(|cx| cx.is_array())
}

pub fn path(dotted: impl Into<String>) -> Matcher {
    let dotted = dotted.into();
    Matcher::new(move |cx| cx.path(&dotted))
}

pub fn path_contains(segment: impl Into<String>) -> Matcher {
    let segment = segment.into();
    Matcher::new(move |cx| cx.path_contains(&segment))
}

pub fn value_is(expected: impl Into<Value>) -> Matcher {
    let expected = expected.into();
    Matcher::new(move |cx| cx.value_is(&expected))
}

/// Matches when every matcher matches. An empty list always matches.
pub fn all(matchers: impl IntoIterator<Item = Matcher>) -> Matcher {
    let matchers: Vec<Matcher> = matchers.into_iter().collect();
    Matcher::new(move |cx| matchers.iter().all(|m| m.matches(cx)))
}

/// Matches when any matcher matches. An empty list never matches.
pub fn any(matchers: impl IntoIterator<Item = Matcher>) -> Matcher {
    let matchers: Vec<Matcher> = matchers.into_iter().collect();
    Matcher::new(move |cx| matchers.iter().any(|m| m.matches(cx)))
}

pub fn not(matcher: Matcher) -> Matcher {
    matcher.negate()
}
