//! Tests for settings loading.

use super::*;
use crate::{Hotkey, Modifier};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::TempDir;

#[test]
fn empty_document_yields_defaults() {
    let settings = QuillSettings::load_from_str("{}").expect("settings");
    assert_eq!(settings, QuillSettings::default());
    let blank = QuillSettings::load_from_str("  \n").expect("settings");
    assert_eq!(blank, QuillSettings::default());
}

#[test]
fn partial_document_keeps_other_defaults() {
    let json5 = r#"{
        // trailing comments and unquoted keys are JSON5
        conversation_folder: "chats",
        api: { temperature: 0.2 },
    }"#;
    let settings = QuillSettings::load_from_str(json5).expect("settings");
    assert_eq!(settings.conversation_folder, "chats");
    assert_eq!(settings.api.temperature, 0.2);
    assert_eq!(settings.api.max_tokens, 4096);
    assert_eq!(settings.api.model, "claude-3-5-sonnet-20241022");
    assert_eq!(
        settings.shortcuts.open_interface,
        vec![Hotkey::new([Modifier::Mod], "O")]
    );
}

#[test]
fn shortcut_slot_replaces_default_binding() {
    let json5 = r#"{ shortcuts: { hide_interface: [{ modifiers: ["Ctrl", "Alt"], key: "Q" }] } }"#;
    let settings = QuillSettings::load_from_str(json5).expect("settings");
    assert_eq!(
        settings.shortcuts.hide_interface,
        vec![Hotkey::new([Modifier::Ctrl, Modifier::Alt], "Q")]
    );
    assert_eq!(
        settings.shortcuts.new_conversation,
        vec![Hotkey::new([Modifier::Mod, Modifier::Shift], "N")]
    );
}

#[test]
fn rejects_unknown_top_level_key() {
    let err = QuillSettings::load_from_str(r#"{ unexpected: true }"#).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("unexpected"));
    assert!(msg.contains("unknown key"));
}

#[test]
fn rejects_unknown_modifier_with_path() {
    let json5 = r#"{ shortcuts: { open_interface: [{ modifiers: ["Hyper"], key: "O" }] } }"#;
    let err = QuillSettings::load_from_str(json5).unwrap_err();
    assert!(err.to_string().contains("shortcuts.open_interface[0].modifiers[0]"));
}

#[test]
fn rejects_wrong_value_type() {
    let err = QuillSettings::load_from_str(r#"{ include_all_open_files: "yes" }"#).unwrap_err();
    assert!(err.to_string().contains("include_all_open_files"));
}

#[test]
fn rejects_folder_escaping_vault() {
    let err = QuillSettings::load_from_str(r#"{ conversation_folder: "../outside" }"#).unwrap_err();
    assert!(err.to_string().contains("conversation_folder"));
    let err = QuillSettings::load_from_str(r#"{ conversation_folder: "  " }"#).unwrap_err();
    assert!(err.to_string().contains("must not be empty"));
}

#[test]
fn rejects_out_of_range_api_values() {
    let err = QuillSettings::load_from_str(r#"{ api: { temperature: 1.5 } }"#).unwrap_err();
    assert!(err.to_string().contains("api.temperature"));
    let err = QuillSettings::load_from_str(r#"{ api: { max_tokens: 0 } }"#).unwrap_err();
    assert!(err.to_string().contains("api.max_tokens"));
}

#[test]
fn null_current_conversation_is_accepted() {
    let settings =
        QuillSettings::load_from_str(r#"{ current_conversation_path: null }"#).expect("settings");
    assert_eq!(settings.current_conversation_path, None);
}

#[test]
fn load_from_path_reads_file() {
    let temp = TempDir::new().expect("tmp");
    let path = QuillSettings::default_path(temp.path());
    fs::create_dir_all(path.parent().expect("parent")).expect("dir");
    fs::write(
        &path,
        r#"{ api_key: "sk-test", current_conversation_path: "convos/convo-20240101000000.md" }"#,
    )
    .expect("write");

    let settings = QuillSettings::load_from_path(&path).expect("settings");
    assert_eq!(settings.api_key, "sk-test");
    assert_eq!(
        settings.current_conversation_path.as_deref(),
        Some("convos/convo-20240101000000.md")
    );
    assert!(path.ends_with(".quill/settings.json5"));
}
