//! Rendering routines for the Quill TUI.

use crate::app::{App, ViewerKind};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState, Wrap,
};

const PRIMARY: Color = Color::Rgb(236, 91, 43);
const SECONDARY: Color = Color::Rgb(238, 121, 72);
const TEXT: Color = Color::Rgb(238, 238, 238);
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);
const BORDER: Color = Color::Rgb(60, 60, 60);
const BORDER_ACTIVE: Color = Color::Rgb(238, 121, 72);
const YELLOW: Color = Color::Rgb(229, 192, 123);
const RED: Color = Color::Rgb(255, 110, 110);

const SLASH_PALETTE_HEIGHT: u16 = 14;
const HEADER_HEIGHT: u16 = 7;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HERO_ART: [&str; 2] = [" █▀▀█ █  █ ▀█▀ █    █   ", " ▀▀█▄ ▀▄▄▀ ▄█▄ █▄▄▄ █▄▄▄"];

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();

    if !app.visible {
        let root = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);
        draw_header(frame, app, root[0]);
        draw_workspace(frame, app, root[1]);
        draw_status_bar(frame, app, root[2]);
        return;
    }

    if app.viewer.is_some() {
        let root = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        draw_header(frame, app, root[0]);
        draw_viewer(frame, app, root[1]);
        draw_viewer_footer(frame, app, root[2]);
        draw_status_bar(frame, app, root[3]);
    } else {
        let root = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(HEADER_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(1),
            ])
            .split(area);

        draw_header(frame, app, root[0]);
        draw_chat(frame, app, root[1]);
        if app.show_slash_commands {
            draw_slash_palette(frame, root[1]);
        }
        draw_context_bar(frame, app, root[2]);
        draw_input(frame, app, root[3]);
        draw_status_bar(frame, app, root[4]);
    }
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let label_style = Style::default().fg(TEXT_MUTED);
    let value_style = Style::default().fg(TEXT);
    let art_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);

    let mut lines: Vec<Line<'_>> = Vec::new();
    for (i, art_line) in HERO_ART.iter().enumerate() {
        if i == HERO_ART.len() - 1 {
            lines.push(Line::from(vec![
                Span::styled(*art_line, art_style),
                Span::styled(format!("  v{VERSION}"), label_style),
            ]));
        } else {
            lines.push(Line::from(Span::styled(*art_line, art_style)));
        }
    }
    lines.push(Line::from(""));

    let conversation = app
        .conversation
        .as_deref()
        .map(|path| path.rsplit('/').next().unwrap_or(path))
        .unwrap_or("none");
    lines.push(Line::from(vec![
        Span::styled("  vault ", label_style),
        Span::styled(app.vault.as_str(), value_style),
        Span::styled("  model ", label_style),
        Span::styled(app.model.as_str(), value_style),
        Span::styled("  conversation ", label_style),
        Span::styled(conversation.to_string(), value_style),
    ]));

    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the open-document list shown while the chat panel is hidden.
fn draw_workspace(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Workspace ", Style::default().fg(TEXT_MUTED)));

    let mut lines = Vec::new();
    if app.open_docs.open.is_empty() {
        lines.push(Line::from(Span::styled(
            " No open notes.",
            Style::default().fg(TEXT_MUTED),
        )));
    }
    let active = app.open_docs.active.as_ref().map(|doc| doc.path.as_str());
    for doc in &app.open_docs.open {
        let is_active = Some(doc.path.as_str()) == active;
        let style = if is_active {
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(TEXT)
        };
        let marker = if is_active { ">" } else { " " };
        lines.push(Line::from(Span::styled(
            format!(" {marker} {}", doc.path),
            style,
        )));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " The chat panel is hidden.",
        Style::default().fg(TEXT_MUTED),
    )));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the chat transcript with border and scrollbar.
fn draw_chat(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.render_lines();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Chat ", Style::default().fg(TEXT_MUTED)));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1);
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);

    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let chat_inner = Rect {
        width: content_width,
        ..inner
    };
    let chat = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(chat, chat_inner);
    draw_scrollbar(frame, inner, total_lines, content_height, scroll);
}

fn draw_scrollbar(
    frame: &mut Frame<'_>,
    inner: Rect,
    total_lines: usize,
    content_height: usize,
    scroll: u16,
) {
    if total_lines <= content_height {
        return;
    }
    let mut scrollbar_state = ScrollbarState::default()
        .content_length(total_lines)
        .position(scroll as usize)
        .viewport_content_length(content_height);
    let scrollbar_area = Rect {
        x: inner.x + inner.width.saturating_sub(1),
        y: inner.y,
        width: 1,
        height: inner.height,
    };
    frame.render_stateful_widget(
        Scrollbar::new(ScrollbarOrientation::VerticalRight)
            .style(Style::default().fg(BORDER))
            .thumb_style(Style::default().fg(TEXT_MUTED)),
        scrollbar_area,
        &mut scrollbar_state,
    );
}

/// Draw the attached context files as chips.
fn draw_context_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(" context ", Style::default().fg(TEXT_MUTED))];
    let selected = app.context.selected();
    if selected.is_empty() {
        spans.push(Span::styled("none", Style::default().fg(BORDER)));
    }
    for file in selected {
        let color = if app.context.is_manual(&file.path) {
            YELLOW
        } else {
            SECONDARY
        };
        spans.push(Span::styled(
            format!(" {} ", file.name),
            Style::default().fg(Color::Rgb(10, 10, 10)).bg(color),
        ));
        spans.push(Span::raw(" "));
    }
    let toggle = if app.include_all {
        "  [x] all open notes"
    } else {
        "  [ ] all open notes"
    };
    spans.push(Span::styled(toggle, Style::default().fg(TEXT_MUTED)));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draw the input box with border and cursor.
fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (title, border_color) = if app.sending {
        (" Sending... ".to_string(), BORDER)
    } else if let Some(error) = &app.error {
        (format!(" {error} "), RED)
    } else {
        (" Message ".to_string(), BORDER_ACTIVE)
    };
    let title_color = if app.error.is_some() && !app.sending {
        RED
    } else {
        SECONDARY
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(title, Style::default().fg(title_color)));

    let inner = block.inner(area);

    let prompt_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let input_text = if app.input.is_empty() {
        Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(
                "Type a message, or / for commands...",
                Style::default().fg(TEXT_MUTED),
            ),
        ])
    } else {
        Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(app.input.as_str(), Style::default().fg(TEXT)),
        ])
    };

    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(input_text), inner);

    if !app.sending {
        let cursor = app.input.chars().count() as u16;
        frame.set_cursor_position((inner.x + 1 + cursor, inner.y));
    }
}

/// Draw the status bar with configured shortcuts.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_color = match app.status.as_str() {
        "sending" => PRIMARY,
        "idle" => TEXT_MUTED,
        _ => YELLOW,
    };

    let mut shortcuts = vec![
        Span::styled(" Ctrl+C", Style::default().fg(TEXT_MUTED)),
        Span::styled(" quit", Style::default().fg(BORDER)),
    ];
    for hint in &app.shortcuts {
        if hint.keys.is_empty() || !hint.command.is_available(app.visible) {
            continue;
        }
        shortcuts.push(Span::styled(
            format!("  {}", hint.keys),
            Style::default().fg(TEXT_MUTED),
        ));
        shortcuts.push(Span::styled(
            format!(" {}", hint.command.display_name().to_lowercase()),
            Style::default().fg(BORDER),
        ));
    }
    if app.visible {
        shortcuts.push(Span::styled("  /", Style::default().fg(TEXT_MUTED)));
        shortcuts.push(Span::styled(" commands", Style::default().fg(BORDER)));
    }

    let right_text = format!(" {} ", app.status);
    let right_len = right_text.len() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len,
        ..area
    };

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(status_color),
        ))),
        right_area,
    );
}

fn draw_slash_palette(frame: &mut Frame<'_>, area: Rect) {
    let cmd_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let desc_style = Style::default().fg(TEXT_MUTED);
    let hint_style = Style::default()
        .fg(TEXT_MUTED)
        .add_modifier(Modifier::ITALIC);

    let commands = [
        ("/new", "Start a new conversation"),
        ("/last", "Reopen the last conversation"),
        ("/conversations", "Pick a conversation"),
        ("/context [query]", "Search notes to attach"),
        ("/remove <name>", "Detach a context file"),
        ("/clear", "Detach all context files"),
        ("/open [query]", "Open a note"),
        ("/close", "Close the focused note"),
        ("/all", "Toggle all open notes as context"),
        ("/hide", "Hide the chat panel"),
    ];
    let mut lines = vec![Line::from(vec![])];
    for (command, description) in commands {
        lines.push(Line::from(vec![
            Span::styled(format!("  {command:<18}"), cmd_style),
            Span::styled(description, desc_style),
        ]));
    }
    lines.push(Line::from(Span::styled("  Esc to close", hint_style)));

    let height = SLASH_PALETTE_HEIGHT
        .min(area.height)
        .min(lines.len() as u16 + 2);
    let palette_area = Rect {
        x: area.x + 1,
        y: area.y + area.height.saturating_sub(height),
        width: area.width.saturating_sub(2).min(60),
        height,
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(PRIMARY))
        .title(Span::styled(
            " Commands ",
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(Color::Rgb(20, 20, 20)));

    frame.render_widget(Paragraph::new(lines).block(block), palette_area);
}

fn draw_viewer(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let Some(kind) = app.viewer else {
        return;
    };
    match kind {
        ViewerKind::Conversations => {
            let lines = render_conversation_lines(app);
            draw_list(frame, " Conversations ", lines, area);
        }
        ViewerKind::Notes => {
            let lines = render_note_lines(app);
            draw_list(frame, " Open note ", lines, area);
        }
        ViewerKind::ContextSearch => {
            let cols = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
                .split(area);
            let lines = render_hit_lines(app);
            draw_list(frame, " Attach context ", lines, cols[0]);
            draw_preview(frame, app, cols[1]);
        }
    }
}

fn draw_list(frame: &mut Frame<'_>, title: &str, lines: Vec<Line<'static>>, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Draw the highlighted hit's preview with its own scroll state.
fn draw_preview(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Preview ", Style::default().fg(TEXT_MUTED)));

    let lines: Vec<Line<'static>> = match app.search_hits.get(app.selected_hit) {
        Some(hit) => hit
            .preview
            .lines()
            .map(|line| Line::from(Span::styled(format!(" {line}"), Style::default().fg(TEXT))))
            .collect(),
        None => Vec::new(),
    };

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1);
    let content_height = inner.height as usize;
    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);
    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_viewer_scroll_bounds(max_scroll);
    let scroll = app.viewer_scroll;

    let preview = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    frame.render_widget(block, area);
    frame.render_widget(
        preview,
        Rect {
            width: content_width,
            ..inner
        },
    );
    draw_scrollbar(frame, inner, total_lines, content_height, scroll);
}

fn draw_viewer_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" Actions ", Style::default().fg(TEXT_MUTED)));
    let inner = block.inner(area);

    let line = match app.viewer {
        Some(ViewerKind::ContextSearch | ViewerKind::Notes) => Line::from(vec![
            Span::styled(" search ", Style::default().fg(TEXT_MUTED)),
            Span::styled(app.viewer_query.clone(), Style::default().fg(TEXT)),
            Span::styled(
                "   Up/Down to navigate  Enter to select  Esc to close",
                Style::default().fg(BORDER),
            ),
        ]),
        _ => Line::from(Span::styled(
            " Up/Down to navigate  Enter to select  Esc to close",
            Style::default().fg(TEXT_MUTED),
        )),
    };

    frame.render_widget(Paragraph::new(line).block(block), area);
    if matches!(
        app.viewer,
        Some(ViewerKind::ContextSearch | ViewerKind::Notes)
    ) {
        let cursor = app.viewer_query.chars().count() as u16;
        frame.set_cursor_position((inner.x + 8 + cursor, inner.y));
    }
}

fn selectable_line(label: String, detail: String, is_selected: bool) -> Line<'static> {
    let style = if is_selected {
        Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(TEXT)
    };
    let marker = if is_selected { ">" } else { " " };
    Line::from(vec![
        Span::styled(format!(" {marker} "), style),
        Span::styled(label, style),
        Span::styled(detail, Style::default().fg(TEXT_MUTED)),
    ])
}

fn empty_line(text: &str) -> Vec<Line<'static>> {
    vec![Line::from(Span::styled(
        format!(" {text}"),
        Style::default().fg(TEXT_MUTED),
    ))]
}

fn render_conversation_lines(app: &App) -> Vec<Line<'static>> {
    if app.conversations.is_empty() {
        return empty_line("No conversations yet. Use /new to start one.");
    }
    app.conversations
        .iter()
        .enumerate()
        .map(|(idx, record)| {
            let created = record
                .created_at
                .map(|at| format!("  {}", at.format("%Y-%m-%d %H:%M")))
                .unwrap_or_default();
            let current = if app.conversation.as_deref() == Some(record.path.as_str()) {
                "  (current)"
            } else {
                ""
            };
            selectable_line(
                record.name.clone(),
                format!("{created}{current}"),
                idx == app.selected_conversation,
            )
        })
        .collect()
}

fn render_note_lines(app: &App) -> Vec<Line<'static>> {
    let notes = app.filtered_notes();
    if notes.is_empty() {
        return empty_line("No matching notes.");
    }
    notes
        .into_iter()
        .enumerate()
        .map(|(idx, note)| {
            let parent = note.parent();
            let detail = if parent.is_empty() {
                String::new()
            } else {
                format!("  {parent}")
            };
            selectable_line(note.name.clone(), detail, idx == app.selected_note)
        })
        .collect()
}

fn render_hit_lines(app: &App) -> Vec<Line<'static>> {
    if app.viewer_query.trim().is_empty() {
        return empty_line("Type to search notes.");
    }
    if app.search_hits.is_empty() {
        return empty_line("No matches.");
    }
    app.search_hits
        .iter()
        .enumerate()
        .map(|(idx, hit)| {
            selectable_line(
                hit.file.name.clone(),
                format!("  {}", hit.file.path),
                idx == app.selected_hit,
            )
        })
        .collect()
}
