//! TUI event types for input and background task results.

use crossterm::event::KeyEvent;
use quill_rs_core::SearchHit;

/// Application event emitted by input handlers or spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Scroll event in the chat view.
    Scroll(i16),
    /// A send finished with the assistant's answer.
    ReplyReceived(String),
    /// A send failed; the string is the underlying error.
    SendFailed(String),
    /// Context search results for `query`.
    SearchResults { query: String, hits: Vec<SearchHit> },
}
