//! Library entry point for the Quill TUI.
//!
//! Provides a reusable [`run`] function that launches the Ratatui chat panel
//! against a vault, a settings store, and a completion provider.

mod app;
mod client;
mod event;
mod keys;
mod markdown;
mod ui;

pub use client::QuillClient;
pub use markdown::TerminalRenderer;

use anyhow::anyhow;
use app::{App, ShortcutHint, ViewerKind};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use log::{debug, info, warn};
use quill_rs_config::format_hotkey;
use quill_rs_core::{CommandId, CommandRegistry};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

/// Supported slash commands in the TUI input box.
#[derive(Debug, Clone, PartialEq, Eq)]
enum SlashCommand {
    New,
    Last,
    Conversations,
    Context(String),
    Remove(String),
    Clear,
    Open(String),
    Close,
    All,
    Hide,
}

/// Configuration for the Quill TUI session.
#[derive(Debug, Clone, Default)]
pub struct TuiConfig {
    /// Model name shown in the header.
    pub model_name: String,
    /// Vault root shown in the header.
    pub vault_root: Option<PathBuf>,
}

/// Launch the Quill TUI.
///
/// The caller is responsible for building the [`QuillClient`] and for
/// initializing logging before calling `run`.
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails.
pub async fn run(client: QuillClient, config: TuiConfig) -> anyhow::Result<()> {
    let client = Arc::new(client);
    let registry = client.registry();

    let mut app = App::new();
    app.model = config.model_name.clone();
    app.vault = config
        .vault_root
        .as_ref()
        .map(|root| root.display().to_string())
        .unwrap_or_default();
    app.conversation_folder = client.conversation_folder();
    app.include_all = client.include_all_open_files();
    app.shortcuts = CommandId::ALL
        .into_iter()
        .map(|command| ShortcutHint {
            command,
            keys: format_hotkey(registry.hotkeys(command)),
        })
        .collect();

    if let Err(err) = client.prepare().await {
        warn!("failed to create conversation folder (error={err})");
        app.push_status(format!("failed to create conversation folder: {err}"));
    }
    let current = client.current_conversation().await;
    let messages = client.load_current().await;
    app.load_conversation(current, messages);
    match client.list_notes().await {
        Ok(notes) => app.set_notes(notes),
        Err(err) => {
            warn!("failed to list notes (error={err})");
            app.push_status("failed to list notes");
        }
    }
    app.refresh_context();

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());

    loop {
        terminal.draw(|frame| ui::draw(frame, &mut app))?;
        let event = rx
            .recv()
            .await
            .ok_or_else(|| anyhow!("event channel closed unexpectedly"))?;
        if handle_app_event(event, &client, &registry, &mut app, tx.clone()).await? {
            break;
        }
    }

    restore_terminal(&mut terminal)?;
    Ok(())
}

/// Dispatch a UI event and return true when the app should exit.
async fn handle_app_event(
    event: AppEvent,
    client: &Arc<QuillClient>,
    registry: &CommandRegistry,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Input(key) => handle_input(key, client, registry, app, sender).await,
        AppEvent::ReplyReceived(answer) => {
            app.finish_send(answer);
            app.conversation = client.current_conversation().await;
            Ok(false)
        }
        AppEvent::SendFailed(message) => {
            warn!("send failed (error={message})");
            app.fail_send();
            Ok(false)
        }
        AppEvent::SearchResults { query, hits } => {
            app.apply_search_results(&query, hits);
            Ok(false)
        }
        AppEvent::Scroll(delta) => {
            if app.viewer.is_some() {
                if delta < 0 {
                    app.viewer_scroll_up((-delta) as u16);
                } else if delta > 0 {
                    app.viewer_scroll_down(delta as u16);
                }
            } else if delta < 0 {
                app.scroll_up((-delta) as u16);
            } else if delta > 0 {
                app.scroll_down(delta as u16);
            }
            Ok(false)
        }
    }
}

/// Handle keyboard input and dispatch actions.
async fn handle_input(
    key: KeyEvent,
    client: &Arc<QuillClient>,
    registry: &CommandRegistry,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    if let Some(command) = keys::resolve_command(registry, &key) {
        if command.is_available(app.visible) {
            run_command(command, client, app).await;
        }
        return Ok(false);
    }

    if key.code == KeyCode::Esc {
        if app.viewer.is_some() {
            app.close_viewer();
            return Ok(false);
        }
        if app.show_slash_commands {
            app.show_slash_commands = false;
            app.input.clear();
            return Ok(false);
        }
        return Ok(true);
    }

    if !app.visible {
        return Ok(false);
    }

    if let Some(kind) = app.viewer {
        handle_viewer_input(key, kind, client, app, sender).await;
        return Ok(false);
    }

    match key.code {
        KeyCode::PageUp => app.scroll_up(5),
        KeyCode::PageDown => app.scroll_down(5),
        KeyCode::Up => app.scroll_up(1),
        KeyCode::Down => app.scroll_down(1),
        KeyCode::Home => app.scroll_to_top(),
        KeyCode::End => app.enable_auto_scroll(),
        KeyCode::Enter => {
            app.show_slash_commands = false;
            if app.input.trim_start().starts_with('/') {
                let command = std::mem::take(&mut app.input);
                if let Err(err) = handle_slash_command(client, app, sender, &command).await {
                    app.push_system_message(err);
                }
            } else {
                send_message(client, app, sender);
            }
        }
        KeyCode::Backspace => {
            app.input.pop();
            app.show_slash_commands = app.input.trim_start().starts_with('/');
        }
        KeyCode::Char(ch) => {
            if !key.modifiers.contains(KeyModifiers::CONTROL) {
                app.input.push(ch);
                app.show_slash_commands = app.input.trim_start().starts_with('/');
            }
        }
        _ => {}
    }

    Ok(false)
}

/// Keys while an overlay is open.
async fn handle_viewer_input(
    key: KeyEvent,
    kind: ViewerKind,
    client: &Arc<QuillClient>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) {
    match key.code {
        KeyCode::Up => app.move_selection(-1),
        KeyCode::Down => app.move_selection(1),
        KeyCode::PageUp => app.viewer_scroll_up(5),
        KeyCode::PageDown => app.viewer_scroll_down(5),
        KeyCode::Enter => match kind {
            ViewerKind::Conversations => activate_selected_conversation(client, app).await,
            ViewerKind::ContextSearch => {
                if let Some(file) = app.attach_selected_hit() {
                    app.push_status(format!("attached {}", file.name));
                }
            }
            ViewerKind::Notes => {
                let selected = app.filtered_notes().get(app.selected_note).cloned().cloned();
                if let Some(note) = selected {
                    app.open_note(note);
                    app.close_viewer();
                }
            }
        },
        KeyCode::Backspace if kind != ViewerKind::Conversations => {
            app.viewer_query.pop();
            on_query_changed(client, app, kind, sender);
        }
        KeyCode::Char(ch)
            if kind != ViewerKind::Conversations
                && !key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            app.viewer_query.push(ch);
            on_query_changed(client, app, kind, sender);
        }
        _ => {}
    }
}

fn on_query_changed(
    client: &Arc<QuillClient>,
    app: &mut App,
    kind: ViewerKind,
    sender: mpsc::Sender<AppEvent>,
) {
    match kind {
        ViewerKind::ContextSearch => {
            app.search_hits.clear();
            app.selected_hit = 0;
            spawn_search(client.clone(), app, sender);
        }
        ViewerKind::Notes => app.selected_note = 0,
        ViewerKind::Conversations => {}
    }
}

/// Run one of the four bindable chat actions.
async fn run_command(command: CommandId, client: &Arc<QuillClient>, app: &mut App) {
    info!("running command (command={command})");
    let switches = matches!(
        command,
        CommandId::OpenLastConversation | CommandId::NewConversation
    );
    if switches && app.switch_blocked() {
        return;
    }
    match command {
        CommandId::OpenInterface => {
            app.visible = true;
        }
        CommandId::OpenLastConversation => match client.open_last_conversation().await {
            Ok((path, messages)) => {
                app.load_conversation(Some(path), messages);
                app.visible = true;
                app.push_status("conversation opened");
            }
            Err(err) => app.push_status(format!("failed to open conversation: {err}")),
        },
        CommandId::NewConversation => match client.create_conversation().await {
            Ok(path) => {
                app.load_conversation(Some(path), Vec::new());
                app.visible = true;
                app.push_status("conversation created");
            }
            Err(err) => app.push_status(format!("failed to create conversation: {err}")),
        },
        CommandId::HideInterface => {
            app.close_viewer();
            app.show_slash_commands = false;
            app.visible = false;
        }
    }
}

/// Load the highlighted conversation from the picker.
async fn activate_selected_conversation(client: &Arc<QuillClient>, app: &mut App) {
    if app.switch_blocked() {
        app.close_viewer();
        return;
    }
    let Some(record) = app.conversations.get(app.selected_conversation).cloned() else {
        return;
    };
    match client.activate_conversation(&record.path).await {
        Ok(messages) => {
            app.load_conversation(Some(record.path), messages);
            app.push_status("conversation selected");
        }
        Err(err) => app.push_status(format!("failed to switch conversation: {err}")),
    }
    app.close_viewer();
}

/// Handle slash commands entered in the input box.
async fn handle_slash_command(
    client: &Arc<QuillClient>,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
    input: &str,
) -> Result<(), String> {
    let Some(command) = parse_slash_command(input)? else {
        return Ok(());
    };
    debug!("handling slash command ({command:?})");
    match command {
        SlashCommand::New => run_command(CommandId::NewConversation, client, app).await,
        SlashCommand::Last => run_command(CommandId::OpenLastConversation, client, app).await,
        SlashCommand::Hide => run_command(CommandId::HideInterface, client, app).await,
        SlashCommand::Conversations => {
            let conversations = client
                .list_conversations()
                .await
                .map_err(|err| err.to_string())?;
            app.set_conversations(conversations);
            app.open_viewer(ViewerKind::Conversations);
        }
        SlashCommand::Context(query) => {
            app.open_viewer(ViewerKind::ContextSearch);
            app.viewer_query = query;
            spawn_search(client.clone(), app, sender);
        }
        SlashCommand::Remove(target) => {
            if !app.remove_context(&target) {
                return Err(format!("not in context: {target}"));
            }
        }
        SlashCommand::Clear => app.context.clear(),
        SlashCommand::Open(query) => {
            let notes = client.list_notes().await.map_err(|err| err.to_string())?;
            app.set_notes(notes);
            app.open_viewer(ViewerKind::Notes);
            app.viewer_query = query;
        }
        SlashCommand::Close => {
            if app.close_active_note().is_none() {
                return Err("no open note".to_string());
            }
        }
        SlashCommand::All => {
            let include = !app.include_all;
            client
                .set_include_all_open_files(include)
                .map_err(|err| err.to_string())?;
            app.include_all = include;
            app.refresh_context();
        }
    }
    Ok(())
}

/// Parse a slash command from the input line.
fn parse_slash_command(input: &str) -> Result<Option<SlashCommand>, String> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return Ok(None);
    }
    let body = trimmed.trim_start_matches('/');
    let (command, rest) = match body.split_once(char::is_whitespace) {
        Some((command, rest)) => (command, rest.trim()),
        None => (body, ""),
    };
    if command.is_empty() {
        return Ok(None);
    }
    match command.to_lowercase().as_str() {
        "new" => Ok(Some(SlashCommand::New)),
        "last" => Ok(Some(SlashCommand::Last)),
        "conversations" | "convos" => Ok(Some(SlashCommand::Conversations)),
        "context" | "add" => Ok(Some(SlashCommand::Context(rest.to_string()))),
        "remove" => {
            if rest.is_empty() {
                return Err("usage: /remove <name>".to_string());
            }
            Ok(Some(SlashCommand::Remove(rest.to_string())))
        }
        "clear" => Ok(Some(SlashCommand::Clear)),
        "open" => Ok(Some(SlashCommand::Open(rest.to_string()))),
        "close" => Ok(Some(SlashCommand::Close)),
        "all" => Ok(Some(SlashCommand::All)),
        "hide" => Ok(Some(SlashCommand::Hide)),
        _ => Err(format!("unknown command: {command}")),
    }
}

/// Show the message optimistically and send it in the background.
fn send_message(client: &Arc<QuillClient>, app: &mut App, sender: mpsc::Sender<AppEvent>) {
    let Some(text) = app.begin_send() else {
        return;
    };
    let context = app.context.selected().to_vec();
    info!(
        "sending message (len={}, context_files={})",
        text.len(),
        context.len()
    );
    let client = client.clone();
    tokio::spawn(async move {
        let event = match client.send_message(&text, &context).await {
            Ok(answer) => AppEvent::ReplyReceived(answer),
            Err(err) => AppEvent::SendFailed(format!("{err:#}")),
        };
        let _ = sender.send(event).await;
    });
}

/// Spawn a context search for the current overlay query.
fn spawn_search(client: Arc<QuillClient>, app: &App, sender: mpsc::Sender<AppEvent>) {
    let query = app.viewer_query.clone();
    if query.trim().is_empty() {
        return;
    }
    let selected = app.context.selected().to_vec();
    tokio::spawn(async move {
        let hits = client.search(&query, &selected).await;
        let _ = sender.send(AppEvent::SearchResults { query, hits }).await;
    });
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if let Ok(true) = crossterm::event::poll(Duration::from_millis(30)) {
                while let Ok(true) = crossterm::event::poll(Duration::from_millis(0)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    let app_event = match event {
                        CrosstermEvent::Key(key) => AppEvent::Input(key),
                        CrosstermEvent::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollUp => AppEvent::Scroll(-MOUSE_SCROLL_LINES),
                            MouseEventKind::ScrollDown => AppEvent::Scroll(MOUSE_SCROLL_LINES),
                            _ => continue,
                        },
                        _ => continue,
                    };
                    if sender.send(app_event).await.is_err() {
                        return;
                    }
                }
            }
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
