//! Structural checks for the settings document.

use crate::ConfigError;
use serde_json::{Map, Value};

const SHORTCUT_SLOTS: [&str; 4] = [
    "open_interface",
    "open_last_conversation",
    "new_conversation",
    "hide_interface",
];

const MODIFIERS: [&str; 5] = ["Mod", "Ctrl", "Meta", "Shift", "Alt"];

/// Validate a settings document before it is decoded.
pub(super) fn validate_settings_schema(value: &Value) -> Result<(), ConfigError> {
    let map = expect_object(value, "")?;
    ensure_allowed_keys(
        map,
        &[
            "$schema",
            "api_key",
            "conversation_folder",
            "current_conversation_path",
            "include_all_open_files",
            "shortcuts",
            "api",
        ],
        "",
    )?;

    if let Some(value) = map.get("$schema") {
        expect_string(value, "$schema")?;
    }
    if let Some(value) = map.get("api_key") {
        expect_string(value, "api_key")?;
    }
    if let Some(value) = map.get("conversation_folder") {
        expect_string(value, "conversation_folder")?;
    }
    if let Some(value) = map.get("current_conversation_path")
        && !value.is_null()
    {
        expect_string(value, "current_conversation_path")?;
    }
    if let Some(value) = map.get("include_all_open_files") {
        expect_bool(value, "include_all_open_files")?;
    }
    if let Some(value) = map.get("shortcuts") {
        validate_shortcuts(value, "shortcuts")?;
    }
    if let Some(value) = map.get("api") {
        validate_api(value, "api")?;
    }
    Ok(())
}

fn validate_shortcuts(value: &Value, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, path)?;
    ensure_allowed_keys(map, &SHORTCUT_SLOTS, path)?;
    for (slot, bindings) in map {
        let slot_path = join_path(path, slot);
        let arr = expect_array(bindings, &slot_path)?;
        for (idx, entry) in arr.iter().enumerate() {
            validate_hotkey(entry, &format!("{slot_path}[{idx}]"))?;
        }
    }
    Ok(())
}

fn validate_hotkey(value: &Value, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, path)?;
    ensure_allowed_keys(map, &["modifiers", "key"], path)?;
    match map.get("key") {
        Some(key) => expect_string(key, &join_path(path, "key"))?,
        None => return Err(invalid_field(&join_path(path, "key"), "missing key")),
    }
    if let Some(modifiers) = map.get("modifiers") {
        let modifiers_path = join_path(path, "modifiers");
        let arr = expect_array(modifiers, &modifiers_path)?;
        for (idx, entry) in arr.iter().enumerate() {
            let entry_path = format!("{modifiers_path}[{idx}]");
            match entry.as_str() {
                Some(name) if MODIFIERS.contains(&name) => {}
                Some(_) => {
                    return Err(invalid_field(
                        &entry_path,
                        "expected one of Mod, Ctrl, Meta, Shift, Alt",
                    ));
                }
                None => return Err(invalid_field(&entry_path, "expected string")),
            }
        }
    }
    Ok(())
}

fn validate_api(value: &Value, path: &str) -> Result<(), ConfigError> {
    let map = expect_object(value, path)?;
    ensure_allowed_keys(
        map,
        &[
            "endpoint",
            "model",
            "max_tokens",
            "temperature",
            "anthropic_version",
        ],
        path,
    )?;
    if let Some(value) = map.get("endpoint") {
        expect_string(value, &join_path(path, "endpoint"))?;
    }
    if let Some(value) = map.get("model") {
        expect_string(value, &join_path(path, "model"))?;
    }
    if let Some(value) = map.get("max_tokens") {
        expect_u64(value, &join_path(path, "max_tokens"))?;
    }
    if let Some(value) = map.get("temperature") {
        expect_f64(value, &join_path(path, "temperature"))?;
    }
    if let Some(value) = map.get("anthropic_version") {
        expect_string(value, &join_path(path, "anthropic_version"))?;
    }
    Ok(())
}

fn expect_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, ConfigError> {
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(invalid_field(path, "expected object")),
    }
}

fn expect_array<'a>(value: &'a Value, path: &str) -> Result<&'a Vec<Value>, ConfigError> {
    match value {
        Value::Array(arr) => Ok(arr),
        _ => Err(invalid_field(path, "expected array")),
    }
}

fn expect_string(value: &Value, path: &str) -> Result<(), ConfigError> {
    if value.is_string() {
        Ok(())
    } else {
        Err(invalid_field(path, "expected string"))
    }
}

fn expect_bool(value: &Value, path: &str) -> Result<(), ConfigError> {
    if value.is_boolean() {
        Ok(())
    } else {
        Err(invalid_field(path, "expected bool"))
    }
}

fn expect_u64(value: &Value, path: &str) -> Result<(), ConfigError> {
    if value.is_u64() {
        Ok(())
    } else {
        Err(invalid_field(path, "expected non-negative integer"))
    }
}

fn expect_f64(value: &Value, path: &str) -> Result<(), ConfigError> {
    if value.is_number() {
        Ok(())
    } else {
        Err(invalid_field(path, "expected number"))
    }
}

fn ensure_allowed_keys(
    map: &Map<String, Value>,
    allowed: &[&str],
    path: &str,
) -> Result<(), ConfigError> {
    for key in map.keys() {
        if !allowed.contains(&key.as_str()) {
            return Err(invalid_field(&join_path(path, key), "unknown key"));
        }
    }
    Ok(())
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{prefix}.{key}")
    }
}

fn invalid_field(path: &str, message: &str) -> ConfigError {
    let path = if path.is_empty() { "root" } else { path };
    ConfigError::InvalidField {
        path: path.to_string(),
        message: message.to_string(),
    }
}
