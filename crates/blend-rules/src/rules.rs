//! Declarative merge rules
//!
//! A rule file lists strategies in priority order. Every condition present
//! on a rule must hold for it to match; a rule without conditions matches
//! every key.
//!
//! ```
//! use blend_rules::RuleSet;
//!
//! let rules = RuleSet::parse(r#"
//! [[rule]]
//! name = "append-plugins"
//! path = "editor.plugins"
//! kind = "array"
//! action = "shallow-merge"
//!
//! [[rule]]
//! path_contains = "secrets"
//! action = "use-default"
//! "#).unwrap();
//!
//! assert_eq!(rules.len(), 2);
//! ```

use crate::error::{Error, Result};
use crate::format::Format;
use blend_core::{
    Action, BlendOptions, MatchContext, Matcher, Strategy, Value, action, matcher,
};
use serde::{Deserialize, Deserializer};

/// Shape of the effective value a rule can require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleKind {
    /// A record
    Object,
    /// A sequence
    Array,
    /// Present, not null, and neither a record nor a sequence
    Scalar,
    /// Absent or null
    Null,
}

impl RuleKind {
    fn matches(&self, cx: &MatchContext<'_>) -> bool {
        match self {
            Self::Object => cx.is_object(),
            Self::Array => cx.is_array(),
            Self::Scalar => cx
                .value()
                .is_some_and(|v| !v.is_null() && !v.is_record() && !v.is_sequence()),
            Self::Null => blend_core::is_nullish(cx.value()),
        }
    }
}

/// Resolution operation a rule applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleAction {
    UseDefault,
    UseOverride,
    PreferDefault,
    PreferOverride,
    ShallowMerge,
    Blend,
    SetValue,
}

/// A single rule entry
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    #[serde(default)]
    pub name: Option<String>,

    /// Dotted path the current key path must start with
    #[serde(default)]
    pub path: Option<String>,

    /// Key that must appear somewhere along the current path
    #[serde(default)]
    pub path_contains: Option<String>,

    #[serde(default)]
    pub kind: Option<RuleKind>,

    /// Value the effective value must equal; an explicit null is kept
    #[serde(default, deserialize_with = "present")]
    pub value: Option<Value>,

    pub action: RuleAction,

    /// Replacement for `action = "set-value"`
    #[serde(default, deserialize_with = "present")]
    pub set: Option<Value>,
}

/// `Some` for any field that is written out, `null` included.
fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl Rule {
    fn validate(&self, index: usize) -> Result<()> {
        match (self.action, &self.set) {
            (RuleAction::SetValue, None) => Err(Error::invalid_rule(
                index,
                "action 'set-value' requires a 'set' value",
            )),
            (action, Some(_)) if action != RuleAction::SetValue => Err(Error::invalid_rule(
                index,
                "'set' is only valid with action 'set-value'",
            )),
            _ => Ok(()),
        }
    }

    pub fn matcher(&self) -> Matcher {
        let mut conditions = Vec::new();
        if let Some(ref dotted) = self.path {
            conditions.push(matcher::path(dotted.as_str()));
        }
        if let Some(ref segment) = self.path_contains {
            conditions.push(matcher::path_contains(segment.as_str()));
        }
        if let Some(kind) = self.kind {
            conditions.push(Matcher::new(move |cx| kind.matches(cx)));
        }
        if let Some(ref expected) = self.value {
            conditions.push(matcher::value_is(expected.clone()));
        }
        matcher::all(conditions)
    }

    pub fn action(&self) -> Action {
        match self.action {
            RuleAction::UseDefault => action::use_default(),
            RuleAction::UseOverride => action::use_override(),
            RuleAction::PreferDefault => action::prefer_default(),
            RuleAction::PreferOverride => action::prefer_override(),
            RuleAction::ShallowMerge => action::shallow_merge(),
            RuleAction::Blend => action::blend(),
            RuleAction::SetValue => action::set_value(self.set.clone().unwrap_or_default()),
        }
    }

    /// Build the engine strategy, named after the rule or its position.
    pub fn to_strategy(&self, index: usize) -> Strategy {
        let name = self
            .name
            .clone()
            .unwrap_or_else(|| format!("rule-{index}"));
        Strategy::new(self.matcher(), self.action()).named(name)
    }
}

/// An ordered list of rules
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleSet {
    #[serde(default, rename = "rule")]
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Parse a TOML rule file.
    pub fn parse(content: &str) -> Result<Self> {
        Self::parse_as(content, Format::Toml)
    }

    /// Parse a rule file in any supported format.
    pub fn parse_as(content: &str, format: Format) -> Result<Self> {
        let rules: RuleSet = match format {
            Format::Toml => toml::from_str(content).map_err(|e| Error::parse("toml", e))?,
            Format::Json => serde_json::from_str(content).map_err(|e| Error::parse("json", e))?,
            Format::Yaml => serde_yaml::from_str(content).map_err(|e| Error::parse("yaml", e))?,
        };

        for (index, rule) in rules.rules.iter().enumerate() {
            rule.validate(index)?;
        }
        tracing::debug!(%format, rules = rules.len(), "Loaded rule set");
        Ok(rules)
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Engine strategies in rule order.
    pub fn strategies(&self) -> Vec<Strategy> {
        self.rules
            .iter()
            .enumerate()
            .map(|(index, rule)| rule.to_strategy(index))
            .collect()
    }

    /// Blend options with these rules ahead of the built-ins.
    pub fn options(&self) -> BlendOptions {
        BlendOptions::new().strategies(self.strategies())
    }
}
