//! Document formats that can be loaded into the engine's value model

use crate::error::{Error, Result};
use blend_core::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Json,
    Toml,
    Yaml,
}

impl Format {
    /// Detect format from file extension
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            "yaml" | "yml" => Some(Self::Yaml),
            _ => None,
        }
    }

    /// Detect format from content heuristics
    pub fn from_content(content: &str) -> Self {
        let trimmed = content.trim_start();

        // JSON starts with { or [; a leading [ may also be a TOML table header
        if trimmed.starts_with('{')
            || (trimmed.starts_with('[')
                && serde_json::from_str::<serde_json::Value>(trimmed).is_ok())
        {
            return Self::Json;
        }

        if looks_like_toml(trimmed) {
            return Self::Toml;
        }

        Self::Yaml
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Toml => "toml",
            Self::Yaml => "yaml",
        }
    }

    /// Parse text in this format.
    pub fn parse(&self, content: &str) -> Result<Value> {
        let value: Value = match self {
            Self::Json => serde_json::from_str(content).map_err(|e| Error::parse("json", e))?,
            Self::Toml => toml::from_str(content).map_err(|e| Error::parse("toml", e))?,
            Self::Yaml => {
                if content.trim().is_empty() {
                    Value::Null
                } else {
                    serde_yaml::from_str(content).map_err(|e| Error::parse("yaml", e))?
                }
            }
        };
        Ok(value)
    }

    /// Render a value in this format.
    ///
    /// TOML has no null and requires a table at the top level; both are
    /// reported as render failures.
    pub fn render(&self, value: &Value) -> Result<String> {
        match self {
            Self::Json => serde_json::to_string_pretty(value).map_err(|e| Error::render("json", e)),
            Self::Toml => {
                if !value.is_record() {
                    return Err(Error::render(
                        "toml",
                        format!("top-level value is a {}, not a table", value.kind()),
                    ));
                }
                toml::to_string(value).map_err(|e| Error::render("toml", e))
            }
            Self::Yaml => serde_yaml::to_string(value).map_err(|e| Error::render("yaml", e)),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// TOML has `[section]` / `[[array]]` headers or `key = value` lines.
fn looks_like_toml(trimmed: &str) -> bool {
    trimmed.lines().any(|line| {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            return false;
        }
        is_table_header(line) || line.split_once(" = ").is_some_and(|(k, _)| !k.contains(':'))
    })
}

/// `[a]`, `[a.b]`, `[[a]]` or `[a."quoted key"]`
fn is_table_header(line: &str) -> bool {
    let inner = line
        .strip_prefix("[[")
        .and_then(|rest| rest.strip_suffix("]]"))
        .or_else(|| line.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')));
    let Some(inner) = inner else {
        return false;
    };

    !inner.trim().is_empty()
        && inner.split('.').all(|segment| {
            let segment = segment.trim();
            let quoted = segment.len() >= 2 && segment.starts_with('"') && segment.ends_with('"');
            quoted
                || (!segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-'))
        })
}
