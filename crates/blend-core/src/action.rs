//! Actions: computing the value stored for a matched key
//!
//! Every resolution operation on [`ActionContext`] returns `Option<Value>`.
//! `None` means "leave the key unset" and the key is omitted from the
//! result, which is what happens when an action picks a side the key is
//! missing from.

use crate::engine;
use crate::error::{Error, Result};
use crate::path::KeyPath;
use crate::strategy::StrategyTable;
use crate::value::{Record, Value, coalesce, is_nullish};
use std::fmt;
use std::sync::Arc;

/// Execution surface handed to the winning strategy's action
#[derive(Debug, Clone, Copy)]
pub struct ActionContext<'a> {
    path: &'a KeyPath,
    default_value: Option<&'a Value>,
    override_value: Option<&'a Value>,
    table: &'a StrategyTable,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        path: &'a KeyPath,
        default_value: Option<&'a Value>,
        override_value: Option<&'a Value>,
        table: &'a StrategyTable,
    ) -> Self {
        Self {
            path,
            default_value,
            override_value,
            table,
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

    pub fn strategies(&self) -> &'a StrategyTable {
        self.table
    }

    pub fn use_default(&self) -> Option<Value> {
        self.default_value.cloned()
    }

    pub fn use_override(&self) -> Option<Value> {
        self.override_value.cloned()
    }

    pub fn prefer_default(&self) -> Option<Value> {
        coalesce(self.default_value, self.override_value).cloned()
    }

    pub fn prefer_override(&self) -> Option<Value> {
        coalesce(self.override_value, self.default_value).cloned()
    }

    pub fn set_value(&self, value: impl Into<Value>) -> Option<Value> {
        Some(value.into())
    }

    /// Concatenate two sequences, otherwise combine records one level deep.
    ///
    /// Sequence concatenation keeps duplicates and puts default elements
    /// first. When one side is absent or null the other side is kept as is.
    /// In the record case override keys win; a side that is not a record
    /// contributes no keys. Two non-record, non-sequence sides resolve like
    /// [`prefer_override`](Self::prefer_override).
    pub fn shallow_merge(&self) -> Option<Value> {
        let (defaults, overrides) = (self.default_value, self.override_value);
        if let (Some(Value::Sequence(left)), Some(Value::Sequence(right))) = (defaults, overrides) {
            let mut items = Vec::with_capacity(left.len() + right.len());
            items.extend(left.iter().cloned());
            items.extend(right.iter().cloned());
            return Some(Value::Sequence(items));
        }

        let has_record =
            defaults.is_some_and(Value::is_record) || overrides.is_some_and(Value::is_record);
        if is_nullish(defaults) || is_nullish(overrides) || !has_record {
            return self.prefer_override();
        }

        let mut record = Record::new();
        for side in [defaults, overrides] {
            if let Some(Value::Record(fields)) = side {
                for (key, value) in fields {
                    record.insert(key.clone(), value.clone());
                }
            }
        }
        Some(Value::Record(record))
    }

    /// Recurse into the engine with the same strategy table and this path.
    pub fn blend(&self) -> Result<Option<Value>> {
        engine::blend_at(self.default_value, self.override_value, self.table, self.path)
    }

    /// An action failure located at the current path.
    pub fn error(&self, message: impl Into<String>) -> Error {
        Error::action(self.path, message)
    }
}

type ActionFn = dyn Fn(&ActionContext<'_>) -> Result<Option<Value>> + Send + Sync;

/// A shareable resolution function
#[derive(Clone)]
pub struct Action(Arc<ActionFn>);

impl Action {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&ActionContext<'_>) -> Result<Option<Value>> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn apply(&self, cx: &ActionContext<'_>) -> Result<Option<Value>> {
        (self.0)(cx)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Action(..)")
    }
}

pub fn use_default() -> Action {
    Action::new(|cx| Ok(cx.use_default()))
}

pub fn use_override() -> Action {
    Action::new(|cx| Ok(cx.use_override()))
}

pub fn prefer_default() -> Action {
    Action::new(|cx| Ok(cx.prefer_default()))
}

pub fn prefer_override() -> Action {
    Action::new(|cx| Ok(cx.prefer_override()))
}

pub fn set_value(value: impl Into<Value>) -> Action {
    let value = value.into();
    Action::new(move |cx| Ok(cx.set_value(value.clone())))
}

pub fn shallow_merge() -> Action {
    Action::new(|cx| Ok(cx.shallow_merge()))
}

pub fn blend() -> Action {
    Action::new(|cx| cx.blend())
}
