//! Schema validation for Huddle JSON5 configuration layers.
//!
//! Runs on each raw layer before merging so that a typo is reported against
//! the file that introduced it rather than the merged result.

use crate::ConfigError;
use serde_json::{Map, Value};

const TOP_LEVEL_KEYS: &[&str] = &[
    "$schema",
    "assistant",
    "retrieval",
    "history",
    "endpoints",
    "server",
    "workspaces",
];

/// Validate a single config layer against the schema.
pub(super) fn validate_layer_schema(value: &Value, layer: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, "")?;
    ensure_allowed_keys(map, TOP_LEVEL_KEYS, layer, "")?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, layer, "$schema")?;
    }
    if let Some(value) = map.get("assistant") {
        validate_assistant(value, layer, "assistant")?;
    }
    if let Some(value) = map.get("retrieval") {
        validate_retrieval(value, layer, "retrieval")?;
    }
    if let Some(value) = map.get("history") {
        validate_history(value, layer, "history")?;
    }
    if let Some(value) = map.get("endpoints") {
        validate_endpoints(value, layer, "endpoints")?;
    }
    if let Some(value) = map.get("server") {
        validate_server(value, layer, "server")?;
    }
    if let Some(value) = map.get("workspaces") {
        validate_workspaces(value, layer, "workspaces")?;
    }
    Ok(())
}

fn validate_assistant(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "persona",
            "history_window",
            "source_text_chars",
            "greeting",
            "no_information_message",
            "apology_message",
        ],
        layer,
        path,
    )?;
    for key in ["history_window", "source_text_chars"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    for key in [
        "greeting",
        "no_information_message",
        "apology_message",
    ] {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("persona") {
        expect_optional_string(value, layer, &join_path(path, "persona"))?;
    }
    Ok(())
}

fn validate_retrieval(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let keys = ["generic_limit", "fallback_limit", "calendar_limit"];
    ensure_allowed_keys(map, &keys, layer, path)?;
    for key in keys {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

/// Validate the "history" block, including the provider enum.
fn validate_history(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    ensure_allowed_keys(
        map,
        &[
            "provider",
            "path",
            "max_attempts",
            "backoff_min_ms",
            "backoff_max_ms",
        ],
        layer,
        path,
    )?;
    if let Some(value) = map.get("provider") {
        let field = join_path(path, "provider");
        match value.as_str() {
            Some("memory" | "file") => {}
            Some(_) => return Err(invalid_field(layer, &field, "expected memory or file")),
            None => return Err(invalid_field(layer, &field, "expected string")),
        }
    }
    if let Some(value) = map.get("path") {
        expect_optional_string(value, layer, &join_path(path, "path"))?;
    }
    for key in ["max_attempts", "backoff_min_ms", "backoff_max_ms"] {
        if let Some(value) = map.get(key) {
            expect_u64(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

fn validate_endpoints(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let urls = ["search_url", "calendar_url", "tool_url", "generator_url"];
    let mut allowed = urls.to_vec();
    allowed.push("timeout_secs");
    ensure_allowed_keys(map, &allowed, layer, path)?;
    for key in urls {
        if let Some(value) = map.get(key) {
            expect_optional_string(value, layer, &join_path(path, key))?;
        }
    }
    if let Some(value) = map.get("timeout_secs") {
        expect_u64(value, layer, &join_path(path, "timeout_secs"))?;
    }
    Ok(())
}

fn validate_server(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, layer, path)?;
    let keys = ["bind_address", "member_header"];
    ensure_allowed_keys(map, &keys, layer, path)?;
    for key in keys {
        if let Some(value) = map.get(key) {
            expect_string(value, layer, &join_path(path, key))?;
        }
    }
    Ok(())
}

fn validate_workspaces(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(entries) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    for (idx, entry) in entries.iter().enumerate() {
        let entry_path = format!("{path}[{idx}]");
        let map = expect_object(entry, layer, &entry_path)?;
        ensure_allowed_keys(map, &["id", "name", "members"], layer, &entry_path)?;
        for key in ["id", "name"] {
            match map.get(key) {
                Some(value) => expect_string(value, layer, &join_path(&entry_path, key))?,
                None => {
                    return Err(invalid_field(
                        layer,
                        &join_path(&entry_path, key),
                        "missing required field",
                    ));
                }
            }
        }
        if let Some(value) = map.get("members") {
            validate_string_array(value, layer, &join_path(&entry_path, "members"))?;
        }
    }
    Ok(())
}

fn expect_object<'a>(
    value: &'a Value,
    layer: &str,
    path: &str,
) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(layer, path, "expected object")),
    }
}

fn expect_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string"))
    }
}

/// Strings that may be explicitly nulled out by a higher layer.
fn expect_optional_string(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_string() || value.is_null() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected string or null"))
    }
}

fn expect_u64(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(layer, path, "expected non-negative integer"))
    }
}

fn validate_string_array(value: &Value, layer: &str, path: &str) -> Result<(), ConfigError> {
    let Value::Array(items) = value else {
        return Err(invalid_field(layer, path, "expected array"));
    };
    match items.iter().position(|item| !item.is_string()) {
        Some(idx) => Err(invalid_field(
            layer,
            &format!("{path}[{idx}]"),
            "expected string",
        )),
        None => Ok(()),
    }
}

fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    layer: &str,
    path: &str,
) -> Result<(), ConfigError> {
    match map.keys().find(|key| !allowed.contains(&key.as_str())) {
        Some(key) => Err(invalid_field(layer, &join_path(path, key), "unknown key")),
        None => Ok(()),
    }
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(layer: &str, path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: format!("{layer}:{path}"),
        message: message.to_string(),
    }
}
