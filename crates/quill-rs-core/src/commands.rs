//! User-invocable chat commands and their hotkey bindings.

use quill_rs_config::{Hotkey, Shortcuts};
use std::fmt;

/// The four chat actions exposed to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandId {
    OpenInterface,
    OpenLastConversation,
    NewConversation,
    HideInterface,
}

impl CommandId {
    pub const ALL: [CommandId; 4] = [
        CommandId::OpenInterface,
        CommandId::OpenLastConversation,
        CommandId::NewConversation,
        CommandId::HideInterface,
    ];

    /// Stable identifier.
    pub fn id(&self) -> &'static str {
        match self {
            CommandId::OpenInterface => "open-chat",
            CommandId::OpenLastConversation => "open-last-conversation",
            CommandId::NewConversation => "new-conversation",
            CommandId::HideInterface => "hide-chat",
        }
    }

    /// Human-readable label.
    pub fn display_name(&self) -> &'static str {
        match self {
            CommandId::OpenInterface => "Open chat",
            CommandId::OpenLastConversation => "Open last conversation",
            CommandId::NewConversation => "New conversation",
            CommandId::HideInterface => "Hide chat",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|command| command.id() == id)
    }

    /// Whether the command can run given the interface visibility.
    pub fn is_available(&self, visible: bool) -> bool {
        match self {
            CommandId::HideInterface => visible,
            _ => true,
        }
    }
}

impl fmt::Display for CommandId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Commands paired with their configured hotkeys.
#[derive(Debug, Clone)]
pub struct CommandRegistry {
    bindings: Vec<(CommandId, Vec<Hotkey>)>,
}

impl CommandRegistry {
    pub fn from_settings(shortcuts: &Shortcuts) -> Self {
        Self {
            bindings: vec![
                (CommandId::OpenInterface, shortcuts.open_interface.clone()),
                (
                    CommandId::OpenLastConversation,
                    shortcuts.open_last_conversation.clone(),
                ),
                (CommandId::NewConversation, shortcuts.new_conversation.clone()),
                (CommandId::HideInterface, shortcuts.hide_interface.clone()),
            ],
        }
    }

    /// Command bound to `pressed`, first registration wins.
    pub fn resolve(&self, pressed: &Hotkey) -> Option<CommandId> {
        self.bindings
            .iter()
            .find(|(_, hotkeys)| hotkeys.iter().any(|hotkey| hotkey.matches(pressed)))
            .map(|(command, _)| *command)
    }

    pub fn hotkeys(&self, command: CommandId) -> &[Hotkey] {
        self.bindings
            .iter()
            .find(|(id, _)| *id == command)
            .map(|(_, hotkeys)| hotkeys.as_slice())
            .unwrap_or(&[])
    }

    /// Commands runnable in the current visibility state.
    pub fn available(&self, visible: bool) -> Vec<CommandId> {
        self.bindings
            .iter()
            .map(|(command, _)| *command)
            .filter(|command| command.is_available(visible))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{CommandId, CommandRegistry};
    use pretty_assertions::assert_eq;
    use quill_rs_config::{Hotkey, Modifier, Shortcuts, format_hotkey, parse_hotkey};

    #[test]
    fn resolves_default_bindings() {
        let registry = CommandRegistry::from_settings(&Shortcuts::default());
        let pressed = Hotkey::new([Modifier::Shift, Modifier::Mod], "n");
        assert_eq!(registry.resolve(&pressed), Some(CommandId::NewConversation));
        assert_eq!(
            registry.resolve(&Hotkey::new([Modifier::Mod], "O")),
            Some(CommandId::OpenInterface)
        );
        assert_eq!(registry.resolve(&Hotkey::new([Modifier::Mod], "Z")), None);
    }

    #[test]
    fn cleared_binding_resolves_nothing() {
        let shortcuts = Shortcuts {
            hide_interface: parse_hotkey("").expect("parse"),
            ..Shortcuts::default()
        };
        let registry = CommandRegistry::from_settings(&shortcuts);
        assert_eq!(registry.resolve(&Hotkey::new([Modifier::Mod], "H")), None);
        assert_eq!(format_hotkey(registry.hotkeys(CommandId::HideInterface)), "");
    }

    #[test]
    fn hide_only_available_when_visible() {
        let registry = CommandRegistry::from_settings(&Shortcuts::default());
        assert!(!registry.available(false).contains(&CommandId::HideInterface));
        assert_eq!(registry.available(true), CommandId::ALL.to_vec());
    }

    #[test]
    fn ids_round_trip() {
        for command in CommandId::ALL {
            assert_eq!(CommandId::from_id(command.id()), Some(command));
        }
        assert_eq!(CommandId::HideInterface.to_string(), "hide-chat");
    }
}
