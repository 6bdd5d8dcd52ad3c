//! Text form of hotkey descriptors, e.g. `Mod+Shift+N`.

use crate::{ConfigError, Hotkey, Modifier};

/// Parse a `+`-separated hotkey. Empty input clears the binding.
pub fn parse_hotkey(value: &str) -> Result<Vec<Hotkey>, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(Vec::new());
    }
    let mut parts: Vec<&str> = value.split('+').map(str::trim).collect();
    let key = parts.pop().unwrap_or_default();
    if key.is_empty() {
        return Err(ConfigError::InvalidField {
            path: "shortcuts".to_string(),
            message: format!("hotkey '{value}' has no key"),
        });
    }
    let mut modifiers = Vec::with_capacity(parts.len());
    for part in parts {
        let modifier = parse_modifier(part).ok_or_else(|| ConfigError::InvalidField {
            path: "shortcuts".to_string(),
            message: format!("unknown modifier '{part}'"),
        })?;
        if !modifiers.contains(&modifier) {
            modifiers.push(modifier);
        }
    }
    let key = if key.chars().count() == 1 {
        key.to_uppercase()
    } else {
        key.to_string()
    };
    Ok(vec![Hotkey { modifiers, key }])
}

/// Format the first binding as text; empty when unbound.
pub fn format_hotkey(hotkeys: &[Hotkey]) -> String {
    let Some(hotkey) = hotkeys.first() else {
        return String::new();
    };
    hotkey
        .modifiers
        .iter()
        .map(|modifier| -> &str { modifier.as_str() })
        .chain(std::iter::once(hotkey.key.as_str()))
        .collect::<Vec<_>>()
        .join("+")
}

fn parse_modifier(value: &str) -> Option<Modifier> {
    match value.to_lowercase().as_str() {
        "mod" => Some(Modifier::Mod),
        "ctrl" | "control" => Some(Modifier::Ctrl),
        "meta" | "cmd" | "super" => Some(Modifier::Meta),
        "shift" => Some(Modifier::Shift),
        "alt" | "option" => Some(Modifier::Alt),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{format_hotkey, parse_hotkey};
    use crate::{Hotkey, Modifier};
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_and_formats_hotkeys() {
        let parsed = parse_hotkey(" mod + Shift + n ").expect("parse");
        assert_eq!(
            parsed,
            vec![Hotkey::new([Modifier::Mod, Modifier::Shift], "N")]
        );
        assert_eq!(format_hotkey(&parsed), "Mod+Shift+N");
    }

    #[test]
    fn formats_only_first_binding() {
        let bindings = vec![
            Hotkey::new([Modifier::Ctrl, Modifier::Alt], "Enter"),
            Hotkey::new([Modifier::Mod], "K"),
        ];
        assert_eq!(format_hotkey(&bindings), "Ctrl+Alt+Enter");
        assert_eq!(format_hotkey(&[Hotkey::new(Vec::new(), "F5")]), "F5");
    }

    #[test]
    fn empty_text_clears_binding() {
        assert_eq!(parse_hotkey("   ").expect("parse"), Vec::new());
        assert_eq!(format_hotkey(&[]), "");
    }

    #[test]
    fn rejects_unknown_modifier() {
        let err = parse_hotkey("Hyper+K").unwrap_err();
        assert!(err.to_string().contains("unknown modifier"));
    }

    #[test]
    fn keeps_named_keys_verbatim() {
        let parsed = parse_hotkey("Ctrl+Enter").expect("parse");
        assert_eq!(parsed[0].key, "Enter");
    }
}
