//! Mapping terminal key events onto configured hotkeys.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use quill_rs_config::{Hotkey, Modifier};
use quill_rs_core::{CommandId, CommandRegistry};

/// Describe a key press as a hotkey, with Ctrl reported as `Mod`.
///
/// Presses without Ctrl, Alt, or Super are plain typing and never map.
pub fn hotkey_for(key: &KeyEvent) -> Option<Hotkey> {
    let chord =
        KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SUPER | KeyModifiers::META;
    if !key.modifiers.intersects(chord) {
        return None;
    }
    let name = key_name(key.code)?;
    let mut modifiers = Vec::new();
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        modifiers.push(Modifier::Mod);
    }
    if key.modifiers.intersects(KeyModifiers::SUPER | KeyModifiers::META) {
        modifiers.push(Modifier::Meta);
    }
    if key.modifiers.contains(KeyModifiers::ALT) {
        modifiers.push(Modifier::Alt);
    }
    if key.modifiers.contains(KeyModifiers::SHIFT) {
        modifiers.push(Modifier::Shift);
    }
    Some(Hotkey::new(modifiers, name))
}

/// Command bound to `key`. Bindings written with `Ctrl` also match.
pub fn resolve_command(registry: &CommandRegistry, key: &KeyEvent) -> Option<CommandId> {
    let pressed = hotkey_for(key)?;
    registry.resolve(&pressed).or_else(|| {
        let as_ctrl = Hotkey::new(
            pressed
                .modifiers
                .iter()
                .map(|modifier| match modifier {
                    Modifier::Mod => Modifier::Ctrl,
                    other => *other,
                })
                .collect::<Vec<_>>(),
            pressed.key.clone(),
        );
        registry.resolve(&as_ctrl)
    })
}

fn key_name(code: KeyCode) -> Option<String> {
    let name = match code {
        KeyCode::Char(ch) => ch.to_uppercase().to_string(),
        KeyCode::F(n) => format!("F{n}"),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "ArrowUp".to_string(),
        KeyCode::Down => "ArrowDown".to_string(),
        KeyCode::Left => "ArrowLeft".to_string(),
        KeyCode::Right => "ArrowRight".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        _ => return None,
    };
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::{hotkey_for, resolve_command};
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
    use pretty_assertions::assert_eq;
    use quill_rs_config::{Hotkey, Modifier, Shortcuts, parse_hotkey};
    use quill_rs_core::{CommandId, CommandRegistry};

    fn press(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn ctrl_maps_to_mod() {
        let hotkey = hotkey_for(&press(KeyCode::Char('o'), KeyModifiers::CONTROL));
        assert_eq!(hotkey, Some(Hotkey::new([Modifier::Mod], "O")));
    }

    #[test]
    fn plain_typing_is_not_a_hotkey() {
        assert_eq!(hotkey_for(&press(KeyCode::Char('o'), KeyModifiers::NONE)), None);
        assert_eq!(hotkey_for(&press(KeyCode::Char('O'), KeyModifiers::SHIFT)), None);
    }

    #[test]
    fn default_bindings_resolve() {
        let registry = CommandRegistry::from_settings(&Shortcuts::default());
        let cases = [
            (KeyCode::Char('o'), KeyModifiers::CONTROL, CommandId::OpenInterface),
            (KeyCode::Char('l'), KeyModifiers::CONTROL, CommandId::OpenLastConversation),
            (
                KeyCode::Char('N'),
                KeyModifiers::CONTROL | KeyModifiers::SHIFT,
                CommandId::NewConversation,
            ),
            (KeyCode::Char('h'), KeyModifiers::CONTROL, CommandId::HideInterface),
        ];
        for (code, modifiers, expected) in cases {
            assert_eq!(
                resolve_command(&registry, &press(code, modifiers)),
                Some(expected)
            );
        }
    }

    #[test]
    fn ctrl_bindings_match_control_key() {
        let shortcuts = Shortcuts {
            open_interface: parse_hotkey("Ctrl+Alt+K").expect("hotkey"),
            ..Shortcuts::default()
        };
        let registry = CommandRegistry::from_settings(&shortcuts);
        let key = press(KeyCode::Char('k'), KeyModifiers::CONTROL | KeyModifiers::ALT);
        assert_eq!(resolve_command(&registry, &key), Some(CommandId::OpenInterface));
    }

    #[test]
    fn unbound_chord_resolves_to_nothing() {
        let registry = CommandRegistry::from_settings(&Shortcuts::default());
        let key = press(KeyCode::Char('z'), KeyModifiers::CONTROL);
        assert_eq!(resolve_command(&registry, &key), None);
    }
}
