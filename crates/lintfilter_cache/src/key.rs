//! Cache key computation.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::CacheError;

/// Fixed-length digest identifying one (content, path, configuration) combination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

/// The five fingerprint dimensions of a cache key.
#[derive(Debug, Clone, Copy)]
pub struct KeyInputs<'a> {
    /// File content.
    pub content: &'a str,
    /// Path relative to the input tree root, `/`-separated.
    pub relative_path: &'a str,
    /// Whether the engine considers the path ignored.
    pub ignored: bool,
    /// Filter options, with function-valued options already replaced by
    /// their fingerprints.
    pub options: &'a Value,
    /// Effective rule configuration for this exact path.
    pub config: &'a Value,
}

impl CacheKey {
    /// Computes the key for `inputs`.
    ///
    /// Each part is length-prefixed before hashing so that no two distinct
    /// tuples share an encoding.
    pub fn compute(inputs: &KeyInputs<'_>) -> Self {
        let options = canonical_json(inputs.options);
        let config = canonical_json(inputs.config);
        let ignored = if inputs.ignored { "true" } else { "false" };

        let mut hasher = blake3::Hasher::new();
        for part in [
            inputs.content,
            inputs.relative_path,
            ignored,
            options.as_str(),
            config.as_str(),
        ] {
            hasher.update(&(part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }

        Self(hasher.finalize().to_hex().to_string())
    }

    /// Hex representation of the digest.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Serializes `value` to JSON text that does not depend on map key order.
///
/// Structurally equal values always produce identical text.
pub fn stable_serialize<T: Serialize + ?Sized>(value: &T) -> Result<String, CacheError> {
    let value = serde_json::to_value(value).map_err(|e| CacheError::serialization(e.to_string()))?;
    Ok(canonical_json(&value))
}

fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();

            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_string(key, out);
                out.push(':');
                write_canonical(&map[key.as_str()], out);
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        Value::String(s) => write_string(s, out),
        scalar => out.push_str(&scalar.to_string()),
    }
}

fn write_string(s: &str, out: &mut String) {
    out.push_str(&Value::String(s.to_owned()).to_string());
}
