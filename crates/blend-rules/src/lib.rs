//! Declarative merge rules and document formats for blend-core
//!
//! - [`RuleSet`] turns a rule file into engine strategies, so merge
//!   behaviour can live in configuration instead of code.
//! - [`Format`] loads JSON, TOML and YAML documents into
//!   [`blend_core::Value`] trees and renders merged trees back.
//!
//! # Example
//!
//! ```
//! use blend_rules::{Format, RuleSet};
//!
//! let rules = RuleSet::parse(r#"
//! [[rule]]
//! kind = "array"
//! action = "shallow-merge"
//! "#).unwrap();
//!
//! let defaults = Format::Toml.parse("tools = [\"cargo\"]\n").unwrap();
//! let overrides = Format::Json.parse(r#"{"tools": ["clippy"]}"#).unwrap();
//!
//! let merged = blend_core::blend_defaults(&defaults, &overrides, &rules.options()).unwrap();
//! assert_eq!(Format::Json.render(&merged).unwrap(), "{\n  \"tools\": [\n    \"cargo\",\n    \"clippy\"\n  ]\n}");
//! ```

pub mod error;
pub mod format;
pub mod rules;

pub use error::{Error, Result};
pub use format::Format;
pub use rules::{Rule, RuleAction, RuleKind, RuleSet};
