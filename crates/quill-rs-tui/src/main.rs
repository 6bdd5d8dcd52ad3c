//! Terminal chat panel for a markdown note vault.

use anyhow::Context;
use clap::Parser;
use log::info;
use quill_rs_config::{QuillSettings, SettingsStore};
use quill_rs_core::{AnthropicClient, FsVault, SystemClock};
use quill_rs_tui::{QuillClient, TerminalRenderer, TuiConfig};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line options for the Quill TUI.
#[derive(Parser)]
#[command(name = "quill", version)]
struct Cli {
    /// Vault directory; defaults to the current directory
    #[arg(long)]
    vault: Option<PathBuf>,
    /// Settings file; defaults to <vault>/.quill/settings.json5
    #[arg(long)]
    settings: Option<PathBuf>,
    /// Model override for this run
    #[arg(long)]
    model: Option<String>,
}

/// Entry point for the Quill TUI.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    let vault_root = match cli.vault {
        Some(path) => path,
        None => std::env::current_dir().context("failed to resolve current directory")?,
    };
    let settings_path = cli
        .settings
        .unwrap_or_else(|| QuillSettings::default_path(&vault_root));
    info!(
        "starting quill (vault={}, settings={}, model_set={})",
        vault_root.display(),
        settings_path.display(),
        cli.model.is_some()
    );

    let settings =
        Arc::new(SettingsStore::load(&settings_path).context("failed to load settings")?);
    let vault = Arc::new(FsVault::new(&vault_root).context("failed to open vault")?);

    let (api_key, api) = settings.read(|s| (s.api_key.clone(), s.api.clone()));
    let mut provider = AnthropicClient::new(api_key, api);
    if let Some(model) = cli.model {
        provider = provider.with_model(model);
    }
    let model_name = provider.model().to_string();

    let client = QuillClient::new(
        settings,
        vault,
        Arc::new(TerminalRenderer),
        Arc::new(provider),
        Arc::new(SystemClock),
    );
    let config = TuiConfig {
        model_name,
        vault_root: Some(vault_root),
    };
    quill_rs_tui::run(client, config).await
}
