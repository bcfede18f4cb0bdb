//! Strategies and the ordered table they are resolved from
//!
//! A [`Strategy`] pairs a [`Matcher`] with an [`Action`]. The table is
//! scanned front to back and the first matcher that accepts a key wins.
//! User strategies always come before the built-ins, whatever their
//! specificity.
//!
//! Built-in fallbacks, tried last and in this order:
//!
//! | Name                | Matches               | Action            |
//! |---------------------|-----------------------|-------------------|
//! | `blend-records`     | value is a record     | recurse (`blend`) |
//! | `replace-sequences` | value is a sequence   | `prefer_override` |
//! | `override-scalars`  | everything            | `prefer_override` |

use crate::action::{self, Action, ActionContext};
use crate::error::Result;
use crate::matcher::{self, MatchContext, Matcher};
use crate::value::Value;
use std::sync::LazyLock;

static BUILTIN_STRATEGIES: LazyLock<Vec<Strategy>> = LazyLock::new(|| {
    vec![
        Strategy::new(matcher::is_object(), action::blend()).named("blend-records"),
        Strategy::new(matcher::is_array(), action::prefer_override()).named("replace-sequences"),
        Strategy::new(matcher::always(), action::prefer_override()).named("override-scalars"),
    ]
});

/// The fallback strategies appended to every default table.
pub fn builtin_strategies() -> &'static [Strategy] {
    &BUILTIN_STRATEGIES
}

/// A matcher paired with the action it triggers
#[derive(Debug, Clone)]
pub struct Strategy {
    name: Option<String>,
    matcher: Matcher,
    action: Action,
}

impl Strategy {
    pub fn new(matcher: Matcher, action: Action) -> Self {
        Self {
            name: None,
            matcher,
            action,
        }
    }

    /// Attach a name used in log output.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn matches(&self, cx: &MatchContext<'_>) -> bool {
        self.matcher.matches(cx)
    }

    pub fn apply(&self, cx: &ActionContext<'_>) -> Result<Option<Value>> {
        self.action.apply(cx)
    }
}

/// Ordered strategy list consulted for every key of a merge call
///
/// The table is immutable once built and is shared by every recursion level
/// of a merge.
#[derive(Debug, Clone)]
pub struct StrategyTable {
    strategies: Vec<Strategy>,
}

impl StrategyTable {
    /// User strategies followed by the built-in fallbacks.
    pub fn new(user: impl IntoIterator<Item = Strategy>) -> Self {
        let mut strategies: Vec<Strategy> = user.into_iter().collect();
        strategies.extend(builtin_strategies().iter().cloned());
        Self { strategies }
    }

    /// Only the given strategies, with no catch-all.
    ///
    /// Keys that no strategy matches are silently left out of the result.
    pub fn without_builtins(user: impl IntoIterator<Item = Strategy>) -> Self {
        Self {
            strategies: user.into_iter().collect(),
        }
    }

    /// The first strategy whose matcher accepts the key, with its position.
    pub fn resolve(&self, cx: &MatchContext<'_>) -> Option<(usize, &Strategy)> {
        self.strategies
            .iter()
            .enumerate()
            .find(|(_, strategy)| strategy.matches(cx))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Strategy> {
        self.strategies.iter()
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl Default for StrategyTable {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::KeyPath;
    use serde_json::json;

    #[test]
    fn test_builtins_are_appended_after_user_strategies() {
        let user = Strategy::new(matcher::never(), action::use_default()).named("mine");
        let table = StrategyTable::new([user]);

        let names: Vec<_> = table.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            vec![
                Some("mine"),
                Some("blend-records"),
                Some("replace-sequences"),
                Some("override-scalars"),
            ]
        );
    }

    #[test]
    fn test_first_match_wins() {
        let table = StrategyTable::new([
            Strategy::new(matcher::always(), action::use_default()).named("first"),
            Strategy::new(matcher::always(), action::use_override()).named("second"),
        ]);
        let path = KeyPath::parse("a");
        let value = Value::from(json!({"x": 1}));
        let cx = MatchContext::new(&path, None, Some(&value));

        let (index, strategy) = table.resolve(&cx).unwrap();
        assert_eq!(index, 0);
        assert_eq!(strategy.name(), Some("first"));
    }

    #[test]
    fn test_builtin_selection_by_kind() {
        let table = StrategyTable::default();
        let path = KeyPath::parse("a");

        let record = Value::from(json!({}));
        let list = Value::from(json!([]));
        let scalar = Value::from(json!(3));
        let set = Value::Set(vec![]);

        let pick = |value: &Value| {
            let cx = MatchContext::new(&path, None, Some(value));
            table.resolve(&cx).and_then(|(_, s)| s.name().map(str::to_string))
        };

        assert_eq!(pick(&record).as_deref(), Some("blend-records"));
        assert_eq!(pick(&list).as_deref(), Some("replace-sequences"));
        assert_eq!(pick(&scalar).as_deref(), Some("override-scalars"));
        assert_eq!(pick(&set).as_deref(), Some("override-scalars"));
    }

    #[test]
    fn test_without_builtins_can_leave_keys_unmatched() {
        let table = StrategyTable::without_builtins([Strategy::new(
            matcher::is_array(),
            action::shallow_merge(),
        )]);
        let path = KeyPath::parse("a");
        let scalar = Value::from(1_i64);
        let cx = MatchContext::new(&path, Some(&scalar), None);
        assert!(table.resolve(&cx).is_none());
        assert_eq!(table.len(), 1);
    }
}
