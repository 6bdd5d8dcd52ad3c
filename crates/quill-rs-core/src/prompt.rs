//! Prompt assembly for a single send.

use quill_rs_protocol::ContextFile;

pub const MESSAGE_DELIMITER: &str = "!! !! NEW MESSAGE !! !!";
pub const CONTEXT_DELIMITER: &str = "++ ++ NEW CONTEXT ++ ++";
pub const HISTORY_DELIMITER: &str = "@@ PREVIOUS DISCUSSION HISTORY @@";

/// System instruction sent with every completion request.
pub const SYSTEM_INSTRUCTION: &str = "The assistant is Claude, created by Anthropic, \
answering inside a personal notes application.\n\n\
Give concise answers to simple questions and thorough answers to complex or \
open-ended ones. Use markdown, with fenced blocks for code.\n\n\
Each request starts with a new message. It may be followed by context taken \
from the user's notes, which should be weighed carefully when forming the \
answer. Last comes the full record of the previous discussion. When the new \
message continues that discussion, read the history and the context before \
answering.";

/// Concatenate context documents as numbered blocks.
///
/// Each entry is `(file, content)`; numbering starts at 1.
pub fn context_block(entries: &[(ContextFile, String)]) -> String {
    entries
        .iter()
        .enumerate()
        .map(|(idx, (file, content))| format!("\nContext {}: {}\n{}\n", idx + 1, file.name, content))
        .collect()
}

/// Full prompt: new message, optional context, then prior history.
pub fn build_prompt(message: &str, context: &str, history: &str) -> String {
    let mut prompt = format!("{MESSAGE_DELIMITER}\n{message}\n\n");
    if !context.is_empty() {
        prompt.push_str(&format!("{CONTEXT_DELIMITER}\n{context}\n\n"));
    }
    prompt.push_str(&format!("{HISTORY_DELIMITER}\n{history}"));
    prompt
}
