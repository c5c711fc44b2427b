//! Hierarchical `.lintrc.json` configuration.
//!
//! Configuration files are discovered from the input root down to the
//! directory of the file being linted. Nearer files override farther ones
//! rule by rule, and a file declaring `"root": true` stops inheritance from
//! its parents. An explicit config file and inline rules are layered last.
//!
//! Each file may carry an `overrides` array. An entry applies when the linted
//! path, relative to the directory of the file declaring it, matches one of
//! its `files` globs and none of its `excludedFiles` globs. Matching entries
//! are layered right after the rest of their file, in order. Overrides in the
//! explicit config file match relative to the input root.

use std::fs;
use std::path::{Path, PathBuf};

use globset::{GlobBuilder, GlobSet, GlobSetBuilder};
use jsonc_parser::ParseOptions;
use lintfilter_report::Level;
use serde_json::{Map, Value};
use tracing::debug;

use crate::engine::ConfigResolver;
use crate::error::ConfigError;
use crate::options::EngineOptions;

/// Name of the per-directory configuration file.
pub const LINTRC_FILE: &str = ".lintrc.json";

/// Resolves configuration by walking `.lintrc.json` files.
#[derive(Debug, Clone)]
pub struct LintrcResolver {
    root: PathBuf,
    config_file: Option<PathBuf>,
    inline_rules: Map<String, Value>,
}

impl LintrcResolver {
    /// Creates a resolver for the tree rooted at `root`.
    ///
    /// A relative `config_file` is resolved against `root`.
    pub fn new(root: impl Into<PathBuf>, options: &EngineOptions) -> Self {
        let root = root.into();
        let config_file = options.config_file.as_ref().map(|path| {
            if path.is_absolute() {
                path.clone()
            } else {
                root.join(path)
            }
        });
        Self {
            root,
            config_file,
            inline_rules: options.rules.clone(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directories whose config applies to `path`, nearest first.
    fn candidate_dirs(&self, path: &Path) -> Vec<PathBuf> {
        let mut dirs = Vec::new();
        let Some(parent) = path.parent() else {
            return vec![self.root.clone()];
        };
        if parent.strip_prefix(&self.root).is_err() {
            return vec![self.root.clone()];
        }

        let mut current = Some(parent);
        while let Some(dir) = current {
            dirs.push(dir.to_path_buf());
            if dir == self.root {
                break;
            }
            current = dir.parent();
        }
        dirs
    }
}

impl ConfigResolver for LintrcResolver {
    fn resolve_for_path(&self, path: &Path) -> Result<Value, ConfigError> {
        let mut layers = Vec::new();
        for dir in self.candidate_dirs(path) {
            let file = dir.join(LINTRC_FILE);
            if !file.is_file() {
                continue;
            }
            let layer = read_config(&file)?;
            let is_root = layer.get("root").and_then(Value::as_bool).unwrap_or(false);
            if is_root {
                debug!("Stopping config lookup at root config {}", file.display());
            }
            layers.push((dir, file, layer));
            if is_root {
                break;
            }
        }

        let mut effective = Map::new();
        effective.insert("rules".to_string(), Value::Object(Map::new()));

        for (dir, file, layer) in layers.iter().rev() {
            apply_layer(&mut effective, layer, dir, file, path)?;
        }

        if let Some(config_file) = &self.config_file {
            let layer = read_config(config_file)?;
            apply_layer(&mut effective, &layer, &self.root, config_file, path)?;
        }

        if !self.inline_rules.is_empty() {
            if let Some(Value::Object(rules)) = effective.get_mut("rules") {
                for (name, value) in &self.inline_rules {
                    rules.insert(name.clone(), value.clone());
                }
            }
        }

        Ok(Value::Object(effective))
    }
}

fn read_config(path: &Path) -> Result<Map<String, Value>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let value = jsonc_parser::parse_to_serde_value(&content, &ParseOptions::default())
        .map_err(|e| ConfigError::invalid(path, e.to_string()))?
        .unwrap_or(Value::Object(Map::new()));

    match value {
        Value::Object(map) => {
            if let Some(rules) = map.get("rules") {
                if !rules.is_object() {
                    return Err(ConfigError::invalid(path, "\"rules\" must be an object"));
                }
            }
            Ok(map)
        }
        _ => Err(ConfigError::invalid(path, "expected a JSON object")),
    }
}

/// Layers `layer` and its overrides matching `path` over `effective`.
///
/// Override globs match `path` relative to `base`.
fn apply_layer(
    effective: &mut Map<String, Value>,
    layer: &Map<String, Value>,
    base: &Path,
    source: &Path,
    path: &Path,
) -> Result<(), ConfigError> {
    merge_layer(effective, layer);

    let Some(overrides) = layer.get("overrides") else {
        return Ok(());
    };
    let Value::Array(entries) = overrides else {
        return Err(ConfigError::invalid(source, "\"overrides\" must be an array"));
    };

    let relative = path.strip_prefix(base).unwrap_or(path);
    for entry in entries {
        let Value::Object(entry) = entry else {
            return Err(ConfigError::invalid(source, "override entries must be objects"));
        };
        if let Some(rules) = entry.get("rules") {
            if !rules.is_object() {
                return Err(ConfigError::invalid(source, "\"rules\" must be an object"));
            }
        }
        if override_applies(entry, relative, source)? {
            debug!("Applying override from {} to {}", source.display(), relative.display());
            merge_layer(effective, entry);
        }
    }
    Ok(())
}

fn override_applies(
    entry: &Map<String, Value>,
    relative: &Path,
    source: &Path,
) -> Result<bool, ConfigError> {
    let files = entry
        .get("files")
        .ok_or_else(|| ConfigError::invalid(source, "override entries need \"files\""))?;
    if !build_globset(files, source)?.is_match(relative) {
        return Ok(false);
    }
    match entry.get("excludedFiles") {
        Some(excluded) => Ok(!build_globset(excluded, source)?.is_match(relative)),
        None => Ok(true),
    }
}

/// Builds a glob set from a pattern or an array of patterns.
///
/// A pattern without `/` matches the file name in any subdirectory.
fn build_globset(patterns: &Value, source: &Path) -> Result<GlobSet, ConfigError> {
    let patterns = match patterns {
        Value::String(pattern) => vec![pattern.as_str()],
        Value::Array(items) => items
            .iter()
            .map(|item| {
                item.as_str()
                    .ok_or_else(|| ConfigError::invalid(source, "override globs must be strings"))
            })
            .collect::<Result<Vec<_>, _>>()?,
        _ => return Err(ConfigError::invalid(source, "override globs must be strings")),
    };

    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        let pattern = pattern.trim_start_matches("./");
        let pattern = if pattern.contains('/') {
            pattern.to_string()
        } else {
            format!("**/{pattern}")
        };
        let glob = GlobBuilder::new(&pattern)
            .literal_separator(true)
            .build()
            .map_err(|e| ConfigError::invalid(source, format!("Invalid glob pattern: {}", e)))?;
        builder.add(glob);
    }

    builder
        .build()
        .map_err(|e| ConfigError::invalid(source, format!("Failed to build globset: {}", e)))
}

/// Layers `layer` over `effective`: `rules` merge per rule, other keys replace.
fn merge_layer(effective: &mut Map<String, Value>, layer: &Map<String, Value>) {
    for (key, value) in layer {
        match (key.as_str(), value) {
            ("root" | "overrides" | "files" | "excludedFiles", _) => {}
            ("rules", Value::Object(layer_rules)) => {
                if let Some(Value::Object(rules)) = effective.get_mut("rules") {
                    for (name, setting) in layer_rules {
                        rules.insert(name.clone(), setting.clone());
                    }
                }
            }
            _ => {
                effective.insert(key.clone(), value.clone());
            }
        }
    }
}

/// Level configured for `rule` in an effective configuration.
///
/// Accepts `0`/`1`/`2`, `"off"`/`"warn"`/`"error"`, or an array whose first
/// element is one of those. Unconfigured rules are off.
pub fn rule_level(config: &Value, rule: &str) -> Level {
    let Some(setting) = config.get("rules").and_then(|rules| rules.get(rule)) else {
        return Level::Off;
    };
    let setting = match setting {
        Value::Array(items) => match items.first() {
            Some(first) => first,
            None => return Level::Off,
        },
        other => other,
    };
    match setting {
        Value::Number(n) => n
            .as_u64()
            .and_then(|n| u8::try_from(n).ok())
            .and_then(Level::from_u8)
            .unwrap_or(Level::Off),
        Value::String(s) => match s.as_str() {
            "warn" => Level::Warn,
            "error" => Level::Error,
            _ => Level::Off,
        },
        _ => Level::Off,
    }
}
