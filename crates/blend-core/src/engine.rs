//! The merge engine
//!
//! [`blend_defaults`] walks two trees in parallel. When both sides are
//! records it takes the union of their keys and resolves each key against
//! the strategy table; otherwise it returns the override unless that is
//! null, and the defaults in that case. Nested records are merged through
//! the `blend` action, which calls back into [`blend_at`] with the same
//! table and the extended path.
//!
//! Inputs are only ever read. Every merged level is a freshly built record.
//!
//! # Example
//!
//! ```
//! use blend_core::{BlendOptions, Value, blend_defaults};
//! use serde_json::json;
//!
//! let defaults = Value::from(json!({"a": 1, "b": 1, "c": {"d": 1, "e": 1}}));
//! let overrides = Value::from(json!({"a": 2, "c": {"d": 2}}));
//!
//! let merged = blend_defaults(&defaults, &overrides, &BlendOptions::new()).unwrap();
//! assert_eq!(merged, Value::from(json!({"a": 2, "b": 1, "c": {"d": 2, "e": 1}})));
//! ```

use crate::action::ActionContext;
use crate::error::Result;
use crate::matcher::MatchContext;
use crate::path::KeyPath;
use crate::strategy::{Strategy, StrategyTable};
use crate::value::{Record, Value, coalesce};
use indexmap::IndexSet;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Options for a single merge call
#[derive(Debug, Clone)]
pub struct BlendOptions {
    strategies: Vec<Strategy>,
    path: KeyPath,
    builtins: bool,
}

impl Default for BlendOptions {
    fn default() -> Self {
        Self {
            strategies: Vec::new(),
            path: KeyPath::root(),
            builtins: true,
        }
    }
}

impl BlendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user strategy. User strategies are tried in insertion order,
    /// before the built-ins.
    pub fn strategy(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn strategies(mut self, strategies: impl IntoIterator<Item = Strategy>) -> Self {
        self.strategies.extend(strategies);
        self
    }

    /// Starting path prefix seen by matchers.
    pub fn path(mut self, path: impl Into<KeyPath>) -> Self {
        self.path = path.into();
        self
    }

    /// Drop the built-in fallbacks. Keys no user strategy matches are
    /// silently omitted from the result.
    pub fn without_builtins(mut self) -> Self {
        self.builtins = false;
        self
    }

    pub fn table(&self) -> StrategyTable {
        let user = self.strategies.iter().cloned();
        if self.builtins {
            StrategyTable::new(user)
        } else {
            StrategyTable::without_builtins(user)
        }
    }

    pub fn key_path(&self) -> &KeyPath {
        &self.path
    }
}

/// Merge `overrides` onto `defaults`.
pub fn blend_defaults(defaults: &Value, overrides: &Value, options: &BlendOptions) -> Result<Value> {
    Blender::new(options).blend(defaults, overrides)
}

/// A prepared engine that can be reused across merge calls
#[derive(Debug, Clone, Default)]
pub struct Blender {
    table: StrategyTable,
    path: KeyPath,
}

impl Blender {
    pub fn new(options: &BlendOptions) -> Self {
        Self {
            table: options.table(),
            path: options.key_path().clone(),
        }
    }

    pub fn table(&self) -> &StrategyTable {
        &self.table
    }

    pub fn blend(&self, defaults: &Value, overrides: &Value) -> Result<Value> {
        let merged = blend_at(Some(defaults), Some(overrides), &self.table, &self.path)?;
        Ok(merged.unwrap_or_default())
    }

    /// Merge two serializable values and deserialize the result.
    ///
    /// The inputs go through `serde_json`, so anything that serializes to a
    /// JSON object is merged key by key.
    pub fn blend_typed<D, O, T>(&self, defaults: &D, overrides: &O) -> Result<T>
    where
        D: Serialize + ?Sized,
        O: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let defaults = Value::from(serde_json::to_value(defaults)?);
        let overrides = Value::from(serde_json::to_value(overrides)?);
        let merged = serde_json::Value::try_from(self.blend(&defaults, &overrides)?)?;
        Ok(serde_json::from_value(merged)?)
    }
}

/// Recursive step shared by the entry points and the `blend` action.
pub(crate) fn blend_at(
    defaults: Option<&Value>,
    overrides: Option<&Value>,
    table: &StrategyTable,
    path: &KeyPath,
) -> Result<Option<Value>> {
    let (Some(Value::Record(default_fields)), Some(Value::Record(override_fields))) =
        (defaults, overrides)
    else {
        return Ok(coalesce(overrides, defaults).cloned());
    };

    let keys = union_keys([default_fields, override_fields]);
    let mut result = Record::with_capacity(keys.len());

    for key in keys {
        let key_path = path.child(key);
        let default_value = default_fields.get(key);
        let override_value = override_fields.get(key);

        let cx = MatchContext::new(&key_path, default_value, override_value);
        let Some((index, strategy)) = table.resolve(&cx) else {
            tracing::trace!(path = %key_path, "No strategy matched; key omitted");
            continue;
        };
        tracing::trace!(
            path = %key_path,
            strategy = strategy.name().unwrap_or("unnamed"),
            index,
            "Strategy selected"
        );

        let action_cx = ActionContext::new(&key_path, default_value, override_value, table);
        if let Some(value) = strategy.apply(&action_cx)? {
            result.insert(key.clone(), value);
        }
    }

    Ok(Some(Value::Record(result)))
}

/// Deduplicated union of the keys of several records, in first-seen order.
pub fn union_keys<'a, I>(records: I) -> IndexSet<&'a String>
where
    I: IntoIterator<Item = &'a Record>,
{
    records.into_iter().flat_map(|record| record.keys()).collect()
}
