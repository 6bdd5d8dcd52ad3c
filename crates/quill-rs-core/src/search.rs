//! Fuzzy search over vault files for attaching context.

use crate::fuzzy;
use crate::render::Renderer;
use crate::vault::Vault;
use log::{debug, warn};
use quill_rs_protocol::ContextFile;

/// Preview text shown when a file cannot be read or rendered.
pub const PREVIEW_ERROR: &str = "Error loading preview";

/// One ranked search result.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub file: ContextFile,
    pub score: f64,
    /// Rendered file content, or [`PREVIEW_ERROR`].
    pub preview: String,
}

/// Rank vault files against `query`, skipping files already in `selected`.
///
/// An empty query returns no hits. Failing to enumerate the vault yields no
/// hits; per-file read or render failures only degrade the preview.
pub async fn search_context(
    vault: &dyn Vault,
    renderer: &dyn Renderer,
    query: &str,
    selected: &[ContextFile],
) -> Vec<SearchHit> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return Vec::new();
    }
    let files = match vault.list_files().await {
        Ok(files) => files,
        Err(err) => {
            warn!("context search failed to list vault (error={err})");
            return Vec::new();
        }
    };
    let candidates: Vec<(ContextFile, String)> = files
        .iter()
        .filter(|file| !selected.iter().any(|s| s.path == file.path))
        .map(|file| (ContextFile::from(file), file.path.to_lowercase()))
        .collect();
    let ranked = fuzzy::rank(&query, candidates, |(_, key)| key.as_str());
    debug!("context search ranked (query={query}, hits={})", ranked.len());

    let mut hits = Vec::with_capacity(ranked.len());
    for ((file, _), score) in ranked {
        let preview = preview(vault, renderer, &file.path).await;
        hits.push(SearchHit {
            file,
            score,
            preview,
        });
    }
    hits
}

async fn preview(vault: &dyn Vault, renderer: &dyn Renderer, path: &str) -> String {
    let rendered = match vault.read(path).await {
        Ok(content) => renderer.render(&content),
        Err(err) => Err(err.into()),
    };
    rendered.unwrap_or_else(|err| {
        warn!("failed to build preview (path={path}, error={err})");
        PREVIEW_ERROR.to_string()
    })
}
