use pretty_assertions::assert_eq;
use quill_rs_core::search::PREVIEW_ERROR;
use quill_rs_core::{CoreError, PlainRenderer, Renderer, search_context};
use quill_rs_protocol::ContextFile;
use quill_rs_test_utils::MemoryVault;

struct FailingRenderer;

impl Renderer for FailingRenderer {
    fn render(&self, _markdown: &str) -> Result<String, CoreError> {
        Err(CoreError::Render("broken".to_string()))
    }
}

fn vault() -> MemoryVault {
    MemoryVault::with_files([
        ("Projects/Roadmap.md", "# Roadmap"),
        ("projects/retro.md", "# Retro"),
        ("daily/2024-01-01.md", "today"),
        ("recipes/pasta.md", "boil"),
    ])
}

#[tokio::test]
async fn empty_query_returns_nothing() {
    let hits = search_context(&vault(), &PlainRenderer, "   ", &[]).await;
    assert!(hits.is_empty());
}

#[tokio::test]
async fn ranks_matches_with_rendered_previews() {
    let hits = search_context(&vault(), &PlainRenderer, "proj", &[]).await;
    let paths: Vec<&str> = hits.iter().map(|hit| hit.file.path.as_str()).collect();
    assert_eq!(paths, vec!["Projects/Roadmap.md", "projects/retro.md"]);
    assert_eq!(hits[0].preview, "# Roadmap");
    assert_eq!(hits[0].file.name, "Roadmap");
    assert_eq!(hits[0].score, 1.0);
}

#[tokio::test]
async fn selected_files_are_excluded() {
    let selected = vec![ContextFile::new("Projects/Roadmap.md")];
    let hits = search_context(&vault(), &PlainRenderer, "proj", &selected).await;
    let paths: Vec<&str> = hits.iter().map(|hit| hit.file.path.as_str()).collect();
    assert_eq!(paths, vec!["projects/retro.md"]);
}

#[tokio::test]
async fn preview_failures_use_placeholder() {
    let vault = vault();
    vault.fail_reads("recipes/pasta.md");
    let hits = search_context(&vault, &PlainRenderer, "pasta", &[]).await;
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].preview, PREVIEW_ERROR);

    let hits = search_context(&vault, &FailingRenderer, "retro", &[]).await;
    assert_eq!(hits[0].preview, PREVIEW_ERROR);
}
