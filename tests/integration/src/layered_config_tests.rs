//! End-to-end layered configuration resolution
//!
//! Exercises the complete flow: documents in mixed formats on disk -> rule
//! file -> layered blend -> typed result.

use blend_core::{BlendOptions, Blender, Value, blend_layers};
use blend_rules::{Format, RuleSet};
use pretty_assertions::assert_eq;
use serde::Deserialize;
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const RULES: &str = r#"
# Tool lists accumulate across layers instead of being replaced.
[[rule]]
name = "accumulate-tools"
path = "tools"
kind = "array"
action = "shallow-merge"

# Credentials are replaced wholesale, never merged field by field.
[[rule]]
name = "replace-credentials"
path_contains = "credentials"
action = "prefer-override"
"#;

/// Lay out global, org, repo and local config layers in four formats.
fn setup_layers() -> (TempDir, Vec<PathBuf>) {
    let temp = TempDir::new().unwrap();
    let dir = temp.path();

    let global = dir.join("global.toml");
    fs::write(
        &global,
        r#"
tools = ["cargo"]

[core]
mode = "standard"

[presets."env:python"]
version = "3.11"
debug = false

[presets."env:python".credentials]
index = "https://pypi.org/simple"
token = "global-token"
"#,
    )
    .unwrap();

    let org = dir.join("org.yaml");
    fs::write(
        &org,
        "tools:\n  - rustfmt\npresets:\n  env:python:\n    provider: uv\n",
    )
    .unwrap();

    let repo = dir.join("config.json");
    fs::write(
        &repo,
        r#"{
  "tools": ["clippy"],
  "presets": {
    "env:python": {
      "version": "3.12",
      "credentials": {"index": "https://mirror.example/simple"}
    }
  }
}"#,
    )
    .unwrap();

    let local = dir.join("config.local.yml");
    fs::write(&local, "core:\n  mode: worktree\n").unwrap();

    (temp, vec![global, org, repo, local])
}

fn load(path: &Path) -> Value {
    let ext = path.extension().and_then(|e| e.to_str()).unwrap();
    let format = Format::from_extension(ext).unwrap();
    let content = fs::read_to_string(path).unwrap();
    format.parse(&content).unwrap()
}

#[test]
fn test_layers_resolve_with_rules() {
    let (_temp, paths) = setup_layers();
    let layers: Vec<Value> = paths.iter().map(|p| load(p.as_path())).collect();
    let rules = RuleSet::parse(RULES).unwrap();

    let resolved = blend_layers(&layers, &rules.options()).unwrap();

    let expected = Value::from(json!({
        "tools": ["cargo", "rustfmt", "clippy"],
        "core": {"mode": "worktree"},
        "presets": {
            "env:python": {
                "version": "3.12",
                "debug": false,
                "provider": "uv",
                "credentials": {"index": "https://mirror.example/simple"}
            }
        }
    }));
    assert_eq!(resolved, expected);
}

#[test]
fn test_layers_without_rules_replace_lists() {
    let (_temp, paths) = setup_layers();
    let layers: Vec<Value> = paths.iter().map(|p| load(p.as_path())).collect();

    let resolved = blend_layers(&layers, &BlendOptions::new()).unwrap();

    assert_eq!(resolved.get("tools"), Some(&Value::from(json!(["clippy"]))));
    assert_eq!(
        resolved
            .get("presets")
            .and_then(|p| p.get("env:python"))
            .and_then(|p| p.get("credentials")),
        Some(&Value::from(json!({
            "index": "https://mirror.example/simple",
            "token": "global-token"
        })))
    );
}

#[derive(Debug, Deserialize, PartialEq)]
struct Core {
    mode: String,
}

#[derive(Debug, Deserialize, PartialEq)]
struct Config {
    core: Core,
    tools: Vec<String>,
}

#[test]
fn test_resolved_layers_render_and_deserialize() {
    let (_temp, paths) = setup_layers();
    let layers: Vec<Value> = paths.iter().map(|p| load(p.as_path())).collect();
    let rules = RuleSet::parse(RULES).unwrap();
    let blender = Blender::new(&rules.options());

    let resolved = blender.blend_layers(&layers).unwrap();

    let rendered = Format::Json.render(&resolved).unwrap();
    let reparsed = Format::Json.parse(&rendered).unwrap();
    assert_eq!(reparsed, resolved);

    let config: Config =
        serde_json::from_value(serde_json::Value::try_from(resolved).unwrap()).unwrap();
    assert_eq!(
        config,
        Config {
            core: Core {
                mode: "worktree".to_string()
            },
            tools: vec!["cargo".into(), "rustfmt".into(), "clippy".into()],
        }
    );
}

#[test]
fn test_typed_blend_of_two_layers() {
    #[derive(serde::Serialize)]
    struct Overlay {
        tools: Vec<&'static str>,
    }

    let rules = RuleSet::parse(RULES).unwrap();
    let blender = Blender::new(&rules.options());

    let base = json!({"core": {"mode": "standard"}, "tools": ["cargo"]});
    let config: Config = blender
        .blend_typed(&base, &Overlay { tools: vec!["clippy"] })
        .unwrap();

    assert_eq!(config.core.mode, "standard");
    assert_eq!(config.tools, vec!["cargo", "clippy"]);
}
