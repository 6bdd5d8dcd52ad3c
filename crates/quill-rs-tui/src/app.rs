//! Application state for the Quill TUI.

use crate::markdown::render_lines;
use log::{debug, info};
use quill_rs_core::{CommandId, ContextSelector, OpenDocuments, SearchHit, fuzzy, transcript};
use quill_rs_protocol::{ContextFile, ConversationRecord, Message, Role};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::cmp::min;

/// Error shown when a send does not complete.
pub const SEND_FAILED: &str = "Failed to send message. Please try again.";

/// Chat roles displayed in the UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Assistant,
    /// Local notices that are never written to the transcript.
    System,
}

/// Single chat entry rendered in the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatEntry {
    pub role: ChatRole,
    pub content: String,
}

/// Viewer overlay types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerKind {
    Conversations,
    ContextSearch,
    Notes,
}

/// A configured shortcut shown in the status bar.
#[derive(Debug, Clone)]
pub struct ShortcutHint {
    pub command: CommandId,
    pub keys: String,
}

/// Top-level application state for the TUI.
pub struct App {
    /// Model name shown in the header.
    pub model: String,
    /// Vault root shown in the header.
    pub vault: String,
    /// Path of the conversation shown in the chat view.
    pub conversation: Option<String>,
    /// Conversations listed in the picker, newest first.
    pub conversations: Vec<ConversationRecord>,
    pub selected_conversation: usize,
    /// Chat transcript entries.
    pub messages: Vec<ChatEntry>,
    /// Current input buffer.
    pub input: String,
    /// Whether to show the slash command palette.
    pub show_slash_commands: bool,
    /// Status line text.
    pub status: String,
    /// Last send error, cleared on the next submit.
    pub error: Option<String>,
    /// A send is in flight; further submits are ignored.
    pub sending: bool,
    /// Whether the chat panel is shown.
    pub visible: bool,
    pub include_all: bool,
    pub conversation_folder: String,
    /// Files attached to the next message.
    pub context: ContextSelector,
    /// Documents opened in the workspace.
    pub open_docs: OpenDocuments,
    /// Every markdown note in the vault, for the note opener.
    pub notes: Vec<ContextFile>,
    pub selected_note: usize,
    /// Query typed into the search or note-opener overlay.
    pub viewer_query: String,
    pub search_hits: Vec<SearchHit>,
    pub selected_hit: usize,
    pub shortcuts: Vec<ShortcutHint>,
    /// Current viewer mode, if any.
    pub viewer: Option<ViewerKind>,
    pub viewer_scroll: u16,
    pub viewer_max_scroll: u16,
    /// Current scroll offset.
    pub scroll: u16,
    /// Whether to auto-scroll to the bottom.
    pub auto_scroll: bool,
    pub chat_max_scroll: u16,
    pending: Option<String>,
}

impl App {
    /// Create a new application state with defaults.
    pub fn new() -> Self {
        Self {
            model: String::new(),
            vault: String::new(),
            conversation: None,
            conversations: Vec::new(),
            selected_conversation: 0,
            messages: Vec::new(),
            input: String::new(),
            show_slash_commands: false,
            status: "idle".to_string(),
            error: None,
            sending: false,
            visible: true,
            include_all: false,
            conversation_folder: String::new(),
            context: ContextSelector::new(),
            open_docs: OpenDocuments::default(),
            notes: Vec::new(),
            selected_note: 0,
            viewer_query: String::new(),
            search_hits: Vec::new(),
            selected_hit: 0,
            shortcuts: Vec::new(),
            viewer: None,
            viewer_scroll: 0,
            viewer_max_scroll: 0,
            scroll: 0,
            auto_scroll: true,
            chat_max_scroll: 0,
            pending: None,
        }
    }

    /// Set the status line.
    pub fn push_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
    }

    /// Conversation switches wait for the in-flight reply.
    pub fn switch_blocked(&mut self) -> bool {
        if self.sending {
            self.push_status("waiting for reply before switching conversations");
        }
        self.sending
    }

    /// Show a conversation and its decoded messages.
    pub fn load_conversation(&mut self, path: Option<String>, messages: Vec<Message>) {
        debug!(
            "loading messages (count={}, turns={})",
            messages.len(),
            transcript::turn_count(&messages)
        );
        self.conversation = path;
        self.messages = messages
            .into_iter()
            .map(|message| ChatEntry {
                role: match message.role {
                    Role::User => ChatRole::User,
                    Role::Assistant => ChatRole::Assistant,
                },
                content: message.content,
            })
            .collect();
        self.scroll = 0;
        self.auto_scroll = true;
        self.chat_max_scroll = 0;
    }

    pub fn set_conversations(&mut self, conversations: Vec<ConversationRecord>) {
        debug!("set conversations (count={})", conversations.len());
        self.conversations = conversations;
        let current = self.conversation.as_deref();
        self.selected_conversation = self
            .conversations
            .iter()
            .position(|record| Some(record.path.as_str()) == current)
            .unwrap_or(0);
    }

    pub fn set_notes(&mut self, notes: Vec<ContextFile>) {
        debug!("set notes (count={})", notes.len());
        self.notes = notes;
        self.selected_note = 0;
    }

    /// Append a system message to the transcript.
    pub fn push_system_message(&mut self, content: impl Into<String>) {
        self.messages.push(ChatEntry {
            role: ChatRole::System,
            content: content.into(),
        });
        self.maybe_enable_auto_scroll();
    }

    /// Take the input for sending and show it optimistically.
    ///
    /// Returns `None` for blank input or while a send is in flight.
    pub fn begin_send(&mut self) -> Option<String> {
        if self.sending || self.input.trim().is_empty() {
            return None;
        }
        let text = std::mem::take(&mut self.input);
        self.error = None;
        self.sending = true;
        self.messages.push(ChatEntry {
            role: ChatRole::User,
            content: text.clone(),
        });
        self.pending = Some(text.clone());
        self.enable_auto_scroll();
        self.status = "sending".to_string();
        Some(text)
    }

    /// Record the assistant's answer and reset the attached context.
    pub fn finish_send(&mut self, answer: String) {
        info!("reply received (len={})", answer.len());
        self.messages.push(ChatEntry {
            role: ChatRole::Assistant,
            content: answer,
        });
        self.pending = None;
        self.sending = false;
        self.context.clear();
        self.status = "idle".to_string();
        self.maybe_enable_auto_scroll();
    }

    /// Undo the optimistic message and put the text back in the input box.
    pub fn fail_send(&mut self) {
        if let Some(text) = self.pending.take() {
            if self
                .messages
                .last()
                .is_some_and(|entry| entry.role == ChatRole::User && entry.content == text)
            {
                self.messages.pop();
            }
            if self.input.is_empty() {
                self.input = text;
            }
        }
        self.sending = false;
        self.error = Some(SEND_FAILED.to_string());
        self.status = "idle".to_string();
    }

    /// Recompute auto-tracked context after the workspace changed.
    pub fn refresh_context(&mut self) {
        self.context
            .on_workspace_change(&self.open_docs, self.include_all, &self.conversation_folder);
    }

    /// Open a note in the workspace and focus it.
    pub fn open_note(&mut self, file: ContextFile) {
        info!("opened note (path={})", file.path);
        if !self.open_docs.open.iter().any(|doc| doc.path == file.path) {
            self.open_docs.open.push(file.clone());
        }
        self.open_docs.active = Some(file);
        self.refresh_context();
    }

    /// Close the focused note; the most recently opened remaining note takes focus.
    pub fn close_active_note(&mut self) -> Option<ContextFile> {
        let closed = self.open_docs.active.take()?;
        self.open_docs.open.retain(|doc| doc.path != closed.path);
        self.open_docs.active = self.open_docs.open.last().cloned();
        self.refresh_context();
        Some(closed)
    }

    /// Attach the highlighted search hit and close the overlay.
    pub fn attach_selected_hit(&mut self) -> Option<ContextFile> {
        let hit = self.search_hits.get(self.selected_hit)?.file.clone();
        self.context.add_manual(hit.clone());
        self.close_viewer();
        Some(hit)
    }

    /// Remove a context file matched by path or display name.
    pub fn remove_context(&mut self, target: &str) -> bool {
        let found = self
            .context
            .selected()
            .iter()
            .find(|file| file.path == target || file.name == target)
            .map(|file| file.path.clone());
        match found {
            Some(path) => {
                self.context.remove(&path);
                true
            }
            None => false,
        }
    }

    /// Apply search results if they still match the typed query.
    pub fn apply_search_results(&mut self, query: &str, hits: Vec<SearchHit>) {
        if self.viewer != Some(ViewerKind::ContextSearch) || query != self.viewer_query {
            debug!("dropping stale search results (query={query})");
            return;
        }
        self.search_hits = hits;
        self.selected_hit = 0;
        self.viewer_scroll = 0;
    }

    /// Notes matching the opener query; all notes when the query is blank.
    pub fn filtered_notes(&self) -> Vec<&ContextFile> {
        let query = self.viewer_query.trim().to_lowercase();
        if query.is_empty() {
            return self.notes.iter().collect();
        }
        let keyed: Vec<(&ContextFile, String)> = self
            .notes
            .iter()
            .map(|note| (note, note.path.to_lowercase()))
            .collect();
        fuzzy::rank(&query, keyed, |(_, key)| key.as_str())
            .into_iter()
            .map(|((note, _), _)| note)
            .collect()
    }

    /// Move the highlight in the active overlay.
    pub fn move_selection(&mut self, delta: isize) {
        let Some(kind) = self.viewer else {
            return;
        };
        let (selected, len) = match kind {
            ViewerKind::Conversations => {
                (&mut self.selected_conversation, self.conversations.len())
            }
            ViewerKind::ContextSearch => (&mut self.selected_hit, self.search_hits.len()),
            ViewerKind::Notes => {
                let len = self.filtered_notes().len();
                (&mut self.selected_note, len)
            }
        };
        if len == 0 {
            *selected = 0;
            return;
        }
        let next = selected.saturating_add_signed(delta);
        *selected = min(next, len - 1);
        if kind == ViewerKind::ContextSearch {
            self.viewer_scroll = 0;
        }
    }

    /// Scroll the chat view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the chat view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.chat_max_scroll);
        if self.scroll >= self.chat_max_scroll {
            self.auto_scroll = true;
        }
    }

    pub fn scroll_to_top(&mut self) {
        self.auto_scroll = false;
        self.scroll = 0;
    }

    /// Enable auto-scrolling to the bottom.
    pub fn enable_auto_scroll(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.chat_max_scroll;
    }

    /// Update scroll bounds after layout changes.
    ///
    /// Snaps to the new bottom only when auto-scroll is on or the view was
    /// already at the bottom.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        let was_at_bottom = self.scroll >= self.chat_max_scroll;
        self.chat_max_scroll = max_scroll;
        if self.auto_scroll || was_at_bottom {
            self.scroll = max_scroll;
            self.auto_scroll = true;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    fn maybe_enable_auto_scroll(&mut self) {
        if self.auto_scroll {
            self.scroll = self.chat_max_scroll;
        }
    }

    /// Render chat messages into styled lines for the UI.
    pub fn render_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        if self.messages.is_empty() {
            lines.push(Line::from(Span::styled(
                " No messages yet. Type a message below to start.",
                Style::default().fg(Color::Rgb(128, 128, 128)),
            )));
            return lines;
        }

        for (idx, entry) in self.messages.iter().enumerate() {
            let (prefix, badge) = match entry.role {
                ChatRole::User => (" you ", Color::Rgb(107, 161, 230)),
                ChatRole::Assistant => (" claude ", Color::Rgb(238, 121, 72)),
                ChatRole::System => (" notice ", Color::Rgb(60, 60, 60)),
            };
            let prefix_style = Style::default()
                .fg(Color::Rgb(10, 10, 10))
                .bg(badge)
                .add_modifier(Modifier::BOLD);
            let content_style = match entry.role {
                ChatRole::System => Style::default().fg(Color::Rgb(128, 128, 128)),
                _ => Style::default().fg(Color::Rgb(238, 238, 238)),
            };

            lines.push(Line::from(vec![Span::styled(prefix, prefix_style)]));

            // Assistant replies are markdown; user text is shown as typed.
            let body: Vec<String> = match entry.role {
                ChatRole::Assistant => render_lines(&entry.content),
                _ => entry.content.lines().map(str::to_string).collect(),
            };
            for line in body {
                lines.push(Line::from(Span::styled(format!(" {line}"), content_style)));
            }

            if idx + 1 < self.messages.len() {
                lines.push(Line::from(Span::raw("")));
            }
        }

        // Trailing padding so the last message can always scroll fully into view.
        lines.push(Line::from(Span::raw("")));

        lines
    }

    /// Open a viewer overlay.
    pub fn open_viewer(&mut self, kind: ViewerKind) {
        self.viewer = Some(kind);
        self.viewer_scroll = 0;
        self.viewer_max_scroll = 0;
    }

    /// Close the viewer overlay and reset its query.
    pub fn close_viewer(&mut self) {
        self.viewer = None;
        self.viewer_query.clear();
        self.search_hits.clear();
        self.selected_hit = 0;
        self.viewer_scroll = 0;
        self.viewer_max_scroll = 0;
    }

    pub fn viewer_scroll_up(&mut self, lines: u16) {
        self.viewer_scroll = self.viewer_scroll.saturating_sub(lines);
    }

    pub fn viewer_scroll_down(&mut self, lines: u16) {
        self.viewer_scroll = min(
            self.viewer_scroll.saturating_add(lines),
            self.viewer_max_scroll,
        );
    }

    /// Update viewer scroll bounds after layout changes.
    pub fn update_viewer_scroll_bounds(&mut self, max_scroll: u16) {
        self.viewer_max_scroll = max_scroll;
        self.viewer_scroll = self.viewer_scroll.min(max_scroll);
    }
}

#[cfg(test)]
mod tests {
    use super::{App, ChatEntry, ChatRole, SEND_FAILED, ViewerKind};
    use pretty_assertions::assert_eq;
    use quill_rs_core::SearchHit;
    use quill_rs_protocol::{ContextFile, Message};

    fn app() -> App {
        let mut app = App::new();
        app.conversation_folder = "convos".to_string();
        app
    }

    fn paths(app: &App) -> Vec<&str> {
        app.context
            .selected()
            .iter()
            .map(|file| file.path.as_str())
            .collect()
    }

    fn hit(path: &str) -> SearchHit {
        SearchHit {
            file: ContextFile::new(path),
            score: 1.0,
            preview: String::new(),
        }
    }

    #[test]
    fn begin_send_ignores_blank_and_in_flight_input() {
        let mut app = app();
        app.input = "   ".to_string();
        assert_eq!(app.begin_send(), None);

        app.input = "hello".to_string();
        assert_eq!(app.begin_send().as_deref(), Some("hello"));
        assert!(app.sending);
        assert!(app.input.is_empty());

        app.input = "again".to_string();
        assert_eq!(app.begin_send(), None);
        assert_eq!(app.messages.len(), 1);
    }

    #[test]
    fn conversation_switch_waits_for_reply() {
        let mut app = app();
        assert!(!app.switch_blocked());

        app.input = "hello".to_string();
        app.begin_send();
        assert!(app.switch_blocked());
        assert!(app.status.contains("waiting for reply"));

        app.finish_send("hi".to_string());
        assert!(!app.switch_blocked());
    }

    #[test]
    fn failed_send_removes_optimistic_message_and_restores_input() {
        let mut app = app();
        app.load_conversation(None, vec![Message::user("a"), Message::assistant("b")]);
        app.input = "hello".to_string();
        app.begin_send();
        app.fail_send();

        assert_eq!(app.messages.len(), 2);
        assert_eq!(app.input, "hello");
        assert_eq!(app.error.as_deref(), Some(SEND_FAILED));
        assert!(!app.sending);
    }

    #[test]
    fn finished_send_appends_reply_and_clears_context() {
        let mut app = app();
        app.context.add_manual(ContextFile::new("notes/a.md"));
        app.input = "hello".to_string();
        app.begin_send();
        app.finish_send("hi there".to_string());

        assert_eq!(
            app.messages,
            vec![
                ChatEntry {
                    role: ChatRole::User,
                    content: "hello".to_string(),
                },
                ChatEntry {
                    role: ChatRole::Assistant,
                    content: "hi there".to_string(),
                },
            ]
        );
        assert!(app.context.selected().is_empty());
        assert!(!app.sending);
    }

    #[test]
    fn opening_notes_tracks_active_document() {
        let mut app = app();
        app.open_note(ContextFile::new("a.md"));
        app.open_note(ContextFile::new("b.md"));
        assert_eq!(paths(&app), vec!["b.md", "a.md"]);

        app.include_all = true;
        app.refresh_context();
        assert_eq!(paths(&app), vec!["a.md", "b.md"]);

        app.close_active_note();
        assert_eq!(app.open_docs.active, Some(ContextFile::new("a.md")));
        assert_eq!(paths(&app), vec!["a.md"]);
    }

    #[test]
    fn conversation_files_are_not_auto_tracked() {
        let mut app = app();
        app.open_note(ContextFile::new("convos/convo-1.md"));
        assert!(app.context.selected().is_empty());
    }

    #[test]
    fn attached_hits_survive_workspace_changes() {
        let mut app = app();
        app.open_viewer(ViewerKind::ContextSearch);
        app.viewer_query = "ref".to_string();
        app.apply_search_results("ref", vec![hit("ref/c.md")]);
        assert_eq!(app.attach_selected_hit(), Some(ContextFile::new("ref/c.md")));
        assert_eq!(app.viewer, None);

        app.open_note(ContextFile::new("a.md"));
        assert_eq!(paths(&app), vec!["a.md", "ref/c.md"]);
        assert!(app.remove_context("c"));
        assert_eq!(paths(&app), vec!["a.md"]);
    }

    #[test]
    fn stale_search_results_are_dropped() {
        let mut app = app();
        app.open_viewer(ViewerKind::ContextSearch);
        app.viewer_query = "road".to_string();
        app.apply_search_results("ro", vec![hit("roadmap.md")]);
        assert!(app.search_hits.is_empty());
    }

    #[test]
    fn note_filter_ranks_matches() {
        let mut app = app();
        app.set_notes(vec![
            ContextFile::new("daily/today.md"),
            ContextFile::new("projects/roadmap.md"),
        ]);
        assert_eq!(app.filtered_notes().len(), 2);
        app.viewer_query = "road".to_string();
        let filtered: Vec<&str> = app
            .filtered_notes()
            .into_iter()
            .map(|note| note.path.as_str())
            .collect();
        assert_eq!(filtered, vec!["projects/roadmap.md"]);
    }

    #[test]
    fn selection_is_clamped_to_list() {
        let mut app = app();
        app.set_notes(vec![ContextFile::new("a.md"), ContextFile::new("b.md")]);
        app.open_viewer(ViewerKind::Notes);
        app.move_selection(5);
        assert_eq!(app.selected_note, 1);
        app.move_selection(-5);
        assert_eq!(app.selected_note, 0);
    }
}
