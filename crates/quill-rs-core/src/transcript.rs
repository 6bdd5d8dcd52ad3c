//! Markdown transcript format.
//!
//! A transcript is a title, a start line, and a sequence of turns:
//!
//! ```text
//! # Claude Chat
//!
//! _Started on 2024-05-01 09:30:00_
//!
//!
//! **User**: question
//!
//! **Claude**: answer
//! ```

use chrono::NaiveDateTime;
use quill_rs_protocol::{Message, Role};

pub const USER_MARKER: &str = "**User**:";
pub const ASSISTANT_MARKER: &str = "**Claude**:";

/// Header written into a freshly created transcript.
pub fn header(started_at: &NaiveDateTime) -> String {
    format!(
        "# Claude Chat\n\n_Started on {}_\n",
        started_at.format("%Y-%m-%d %H:%M:%S")
    )
}

/// Append one user/assistant turn to existing transcript text.
pub fn encode_turn(existing: &str, user: &str, assistant: &str) -> String {
    format!("{existing}\n\n{USER_MARKER} {user}\n\n{ASSISTANT_MARKER} {assistant}\n")
}

/// Recover the message sequence from transcript text.
///
/// Lines before the first marker are ignored. Continuation lines join the
/// open message with `\n`; trailing whitespace of each message is dropped.
pub fn decode(text: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut open: Option<Message> = None;

    for line in text.lines() {
        let started = if let Some(rest) = line.strip_prefix(USER_MARKER) {
            Some(Message::user(rest.trim()))
        } else {
            line.strip_prefix(ASSISTANT_MARKER)
                .map(|rest| Message::assistant(rest.trim()))
        };
        match started {
            Some(message) => {
                if let Some(done) = open.replace(message) {
                    messages.push(commit(done));
                }
            }
            None => {
                if let Some(current) = open.as_mut() {
                    current.content.push('\n');
                    current.content.push_str(line);
                }
            }
        }
    }
    if let Some(done) = open {
        messages.push(commit(done));
    }
    messages
}

fn commit(mut message: Message) -> Message {
    let trimmed = message.content.trim_end().len();
    message.content.truncate(trimmed);
    message
}

/// Number of completed user turns in a decoded transcript.
pub fn turn_count(messages: &[Message]) -> usize {
    messages
        .iter()
        .filter(|message| message.role == Role::User)
        .count()
}

#[cfg(test)]
mod tests {
    use super::{decode, encode_turn, header, turn_count};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use quill_rs_protocol::Message;

    fn started() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .and_then(|date| date.and_hms_opt(9, 30, 5))
            .expect("timestamp")
    }

    #[test]
    fn header_uses_fixed_layout() {
        assert_eq!(
            header(&started()),
            "# Claude Chat\n\n_Started on 2024-05-01 09:30:05_\n"
        );
    }

    #[test]
    fn single_turn_round_trips() {
        let text = encode_turn(&header(&started()), "What is Rust?", "A language.");
        assert_eq!(
            decode(&text),
            vec![Message::user("What is Rust?"), Message::assistant("A language.")]
        );
    }

    #[test]
    fn multi_line_answers_round_trip() {
        let first = encode_turn(&header(&started()), "one", "line a\nline b");
        let second = encode_turn(&first, "two", "done");
        assert_eq!(
            decode(&second),
            vec![
                Message::user("one"),
                Message::assistant("line a\nline b"),
                Message::user("two"),
                Message::assistant("done"),
            ]
        );
        assert_eq!(turn_count(&decode(&second)), 2);
    }

    #[test]
    fn text_without_markers_is_empty() {
        assert_eq!(decode("# Claude Chat\n\njust prose\n"), Vec::new());
        assert_eq!(decode(""), Vec::new());
    }

    #[test]
    fn continuation_lines_join_open_message() {
        assert_eq!(
            decode("**User**: hi\n**Claude**: hello\nworld"),
            vec![Message::user("hi"), Message::assistant("hello\nworld")]
        );
    }

    #[test]
    fn markers_only_count_at_line_start() {
        assert_eq!(
            decode("**User**: quote **Claude**: inline\n  **User**: indented"),
            vec![Message::user(
                "quote **Claude**: inline\n  **User**: indented"
            )]
        );
        assert_eq!(decode("**user**: lowercase"), Vec::new());
    }
}
