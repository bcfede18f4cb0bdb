//! Strategy-driven recursive merge of a defaults tree and an override tree
//!
//! For every key in the union of both records, the engine builds a
//! [`MatchContext`], asks each [`Strategy`] in order whether it applies, and
//! lets the first match compute the key's value through an
//! [`ActionContext`]. User strategies are consulted before three built-in
//! fallbacks:
//!
//! - records are merged recursively
//! - sequences are replaced by the override
//! - everything else takes the override unless it is null
//!
//! # Example
//!
//! ```
//! use blend_core::{BlendOptions, Strategy, Value, action, blend_defaults, matcher};
//! use serde_json::json;
//!
//! let options = BlendOptions::new()
//!     .strategy(Strategy::new(matcher::is_array(), action::shallow_merge()));
//!
//! let merged = blend_defaults(
//!     &Value::from(json!({"c": [1, 2, 3]})),
//!     &Value::from(json!({"c": [4, 5, 6]})),
//!     &options,
//! )
//! .unwrap();
//!
//! assert_eq!(merged, Value::from(json!({"c": [1, 2, 3, 4, 5, 6]})));
//! ```

pub mod action;
pub mod engine;
pub mod error;
pub mod layers;
pub mod logging;
pub mod matcher;
pub mod path;
pub mod strategy;
pub mod value;

pub use action::{Action, ActionContext};
pub use engine::{BlendOptions, Blender, blend_defaults, union_keys};
pub use error::{Error, Result};
pub use layers::blend_layers;
pub use matcher::{MatchContext, Matcher};
pub use path::KeyPath;
pub use strategy::{Strategy, StrategyTable, builtin_strategies};
pub use value::{Record, Value, ValueKind, coalesce, is_nullish};
