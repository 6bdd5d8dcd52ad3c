//! Markdown to terminal text.

use pulldown_cmark::{Event, Options, Parser, Tag, TagEnd};
use quill_rs_core::{CoreError, Renderer};

/// Renders markdown as plain terminal lines: headings lose their hashes,
/// lists keep bullets, code is indented, and quotes are prefixed with `> `.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&self, markdown: &str) -> Result<String, CoreError> {
        Ok(render_lines(markdown).join("\n"))
    }
}

#[derive(Clone, Copy)]
enum ListKind {
    Bullet,
    Ordered(u64),
}

struct LineBuilder {
    lines: Vec<String>,
    line: String,
    quote_depth: usize,
}

impl LineBuilder {
    fn flush(&mut self) {
        if !self.line.is_empty() {
            self.lines.push(std::mem::take(&mut self.line));
        }
    }

    fn blank(&mut self) {
        self.flush();
        if self.lines.last().is_some_and(|line| !line.is_empty()) {
            self.lines.push(String::new());
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.line.is_empty() {
            self.line.push_str(&"> ".repeat(self.quote_depth));
        }
        self.line.push_str(text);
    }
}

/// Split rendered markdown into display lines.
pub fn render_lines(markdown: &str) -> Vec<String> {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = LineBuilder {
        lines: Vec::new(),
        line: String::new(),
        quote_depth: 0,
    };
    let mut lists: Vec<ListKind> = Vec::new();
    let mut in_code_block = false;

    for event in Parser::new_ext(markdown, options) {
        if in_code_block {
            match event {
                Event::End(TagEnd::CodeBlock) => {
                    in_code_block = false;
                    out.blank();
                }
                Event::Text(text) => {
                    for code_line in text.lines() {
                        out.lines.push(format!("    {code_line}"));
                    }
                }
                _ => {}
            }
            continue;
        }

        match event {
            Event::Start(tag) => match tag {
                Tag::Heading { .. } => out.flush(),
                Tag::BlockQuote(_) => {
                    out.flush();
                    out.quote_depth += 1;
                }
                Tag::List(start) => {
                    out.flush();
                    lists.push(match start {
                        Some(n) => ListKind::Ordered(n),
                        None => ListKind::Bullet,
                    });
                }
                Tag::Item => {
                    out.flush();
                    let indent = "  ".repeat(lists.len().saturating_sub(1));
                    let marker = match lists.last_mut() {
                        Some(ListKind::Ordered(n)) => {
                            let marker = format!("{n}. ");
                            *n += 1;
                            marker
                        }
                        _ => "- ".to_string(),
                    };
                    out.push_text(&format!("{indent}{marker}"));
                }
                Tag::CodeBlock(_) => {
                    out.flush();
                    in_code_block = true;
                }
                _ => {}
            },
            Event::End(tag) => match tag {
                TagEnd::Paragraph | TagEnd::Heading(_) => out.blank(),
                TagEnd::BlockQuote(_) => {
                    out.flush();
                    out.quote_depth = out.quote_depth.saturating_sub(1);
                    out.blank();
                }
                TagEnd::List(_) => {
                    lists.pop();
                    if lists.is_empty() {
                        out.blank();
                    } else {
                        out.flush();
                    }
                }
                TagEnd::Item => out.flush(),
                _ => {}
            },
            Event::Text(text) | Event::Code(text) => out.push_text(&text),
            Event::TaskListMarker(done) => out.push_text(if done { "[x] " } else { "[ ] " }),
            Event::SoftBreak => out.push_text(" "),
            Event::HardBreak => out.flush(),
            Event::Rule => {
                out.flush();
                out.lines.push("─".repeat(24));
                out.blank();
            }
            _ => {}
        }
    }
    out.flush();

    let mut lines = out.lines;
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{TerminalRenderer, render_lines};
    use pretty_assertions::assert_eq;
    use quill_rs_core::Renderer;

    #[test]
    fn headings_and_inline_markup_become_plain_text() {
        let rendered = TerminalRenderer
            .render("# Roadmap\n\nShip **v1** with `cargo`.")
            .expect("render");
        assert_eq!(rendered, "Roadmap\n\nShip v1 with cargo.");
    }

    #[test]
    fn lists_keep_markers() {
        assert_eq!(
            render_lines("- a\n- b\n\n1. x\n2. y"),
            vec!["- a", "- b", "", "1. x", "2. y"]
        );
    }

    #[test]
    fn nested_lists_are_indented() {
        assert_eq!(
            render_lines("- a\n  - b\n- c"),
            vec!["- a", "  - b", "- c"]
        );
    }

    #[test]
    fn code_blocks_are_indented() {
        assert_eq!(
            render_lines("Run:\n\n```\nlet x = 1;\nx + 1\n```\n\nDone."),
            vec!["Run:", "", "    let x = 1;", "    x + 1", "", "Done."]
        );
    }

    #[test]
    fn quotes_are_prefixed() {
        assert_eq!(render_lines("> hi\n\nafter"), vec!["> hi", "", "after"]);
    }

    #[test]
    fn soft_breaks_join_lines() {
        assert_eq!(render_lines("one\ntwo"), vec!["one two"]);
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render_lines("").is_empty());
    }
}
