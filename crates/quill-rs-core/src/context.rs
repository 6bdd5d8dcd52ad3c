//! Context file selection.
//!
//! The selection is rebuilt from two sources: documents auto-tracked from the
//! host's open-document signal, and files the user attached manually.
//! Manual entries survive workspace changes; auto entries stay selected until
//! their document is closed.

use log::debug;
use quill_rs_protocol::ContextFile;
use std::collections::HashSet;
use std::path::Path;

/// Snapshot of the documents the host currently has open.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OpenDocuments {
    /// The focused document, if any.
    pub active: Option<ContextFile>,
    /// Every open document in display order.
    pub open: Vec<ContextFile>,
}

/// Files that should be auto-tracked for the given open-document snapshot.
///
/// Only markdown files outside `conversation_folder` qualify. The result has
/// no duplicate paths.
pub fn auto_tracked(
    open_docs: &OpenDocuments,
    include_all: bool,
    conversation_folder: &str,
) -> Vec<ContextFile> {
    let candidates: Vec<&ContextFile> = if include_all {
        open_docs.open.iter().collect()
    } else {
        open_docs.active.iter().collect()
    };
    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|file| file.extension().as_deref() == Some("md"))
        .filter(|file| !in_folder(&file.path, conversation_folder))
        .filter(|file| seen.insert(file.path.clone()))
        .cloned()
        .collect()
}

/// Combine auto-tracked files with the surviving entries of `previous`.
///
/// Auto entries come first in their given order, followed by previously
/// selected files that are either in `manual` or still listed in `open`.
/// Entries for closed documents that were never attached manually are dropped.
pub fn reconcile(
    auto: &[ContextFile],
    manual: &HashSet<String>,
    open: &HashSet<&str>,
    previous: &[ContextFile],
) -> Vec<ContextFile> {
    let mut seen = HashSet::new();
    let mut result = Vec::with_capacity(auto.len() + previous.len());
    for file in auto {
        if seen.insert(file.path.as_str()) {
            result.push(file.clone());
        }
    }
    for file in previous {
        let keep = manual.contains(&file.path) || open.contains(file.path.as_str());
        if keep && seen.insert(file.path.as_str()) {
            result.push(file.clone());
        }
    }
    result
}

/// Whether `path` lies inside `folder`, compared by path component.
pub(crate) fn in_folder(path: &str, folder: &str) -> bool {
    let folder = folder.trim_matches('/');
    if folder.is_empty() {
        return false;
    }
    Path::new(path).starts_with(folder)
}

/// Current context selection with manual-entry tracking.
#[derive(Debug, Clone, Default)]
pub struct ContextSelector {
    selection: Vec<ContextFile>,
    manual: HashSet<String>,
}

impl ContextSelector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the selection after the open documents changed.
    pub fn on_workspace_change(
        &mut self,
        open_docs: &OpenDocuments,
        include_all: bool,
        conversation_folder: &str,
    ) {
        let auto = auto_tracked(open_docs, include_all, conversation_folder);
        let open: HashSet<&str> = open_docs.open.iter().map(|f| f.path.as_str()).collect();
        self.selection = reconcile(&auto, &self.manual, &open, &self.selection);
        debug!(
            "context selection updated (auto={}, total={})",
            auto.len(),
            self.selection.len()
        );
    }

    /// Attach a file explicitly. Re-adding a selected path only marks it manual.
    pub fn add_manual(&mut self, file: ContextFile) {
        self.manual.insert(file.path.clone());
        if !self.contains(&file.path) {
            self.selection.push(file);
        }
    }

    /// Drop a file from the selection regardless of how it got there.
    pub fn remove(&mut self, path: &str) {
        self.selection.retain(|file| file.path != path);
        self.manual.remove(path);
    }

    /// Empty the selection.
    pub fn clear(&mut self) {
        self.selection.clear();
        self.manual.clear();
    }

    pub fn selected(&self) -> &[ContextFile] {
        &self.selection
    }

    pub fn contains(&self, path: &str) -> bool {
        self.selection.iter().any(|file| file.path == path)
    }

    pub fn is_manual(&self, path: &str) -> bool {
        self.manual.contains(path)
    }
}

#[cfg(test)]
mod tests {
    use super::{ContextSelector, OpenDocuments, auto_tracked, in_folder, reconcile};
    use pretty_assertions::assert_eq;
    use quill_rs_protocol::ContextFile;
    use std::collections::HashSet;

    fn file(path: &str) -> ContextFile {
        ContextFile::new(path)
    }

    fn paths(files: &[ContextFile]) -> Vec<&str> {
        files.iter().map(|f| f.path.as_str()).collect()
    }

    fn docs(active: Option<&str>, open: &[&str]) -> OpenDocuments {
        OpenDocuments {
            active: active.map(file),
            open: open.iter().map(|p| file(p)).collect(),
        }
    }

    #[test]
    fn auto_tracks_active_only_by_default() {
        let docs = docs(Some("b.md"), &["a.md", "b.md"]);
        assert_eq!(paths(&auto_tracked(&docs, false, "convos")), vec!["b.md"]);
        assert_eq!(
            paths(&auto_tracked(&docs, true, "convos")),
            vec!["a.md", "b.md"]
        );
    }

    #[test]
    fn auto_skips_non_markdown_and_conversations() {
        let docs = docs(
            None,
            &[
                "img.png",
                "Upper.MD",
                "convos/convo-1.md",
                "convos-archive/x.md",
                "a.md",
                "a.md",
            ],
        );
        assert_eq!(
            paths(&auto_tracked(&docs, true, "convos")),
            vec!["convos-archive/x.md", "a.md"]
        );
        assert!(auto_tracked(&OpenDocuments::default(), false, "convos").is_empty());
    }

    #[test]
    fn folder_test_is_by_component() {
        assert!(in_folder("convos/a.md", "convos"));
        assert!(in_folder("convos/nested/a.md", "convos/"));
        assert!(!in_folder("convos2/a.md", "convos"));
        assert!(!in_folder("a.md", ""));
    }

    #[test]
    fn reconcile_orders_auto_then_manual() {
        let manual: HashSet<String> = ["c.md".to_string(), "a.md".to_string()].into();
        let previous = vec![file("a.md"), file("b.md"), file("c.md")];
        let result = reconcile(&[file("a.md")], &manual, &HashSet::new(), &previous);
        assert_eq!(paths(&result), vec!["a.md", "c.md"]);
    }

    #[test]
    fn reconcile_keeps_previous_entries_still_open() {
        let manual = HashSet::new();
        let open: HashSet<&str> = ["a.md", "b.md"].into();
        let previous = vec![file("a.md"), file("d.md")];
        let result = reconcile(&[file("b.md")], &manual, &open, &previous);
        assert_eq!(paths(&result), vec!["b.md", "a.md"]);
    }

    #[test]
    fn switching_active_keeps_previous_open_document() {
        let mut selector = ContextSelector::new();
        selector.on_workspace_change(&docs(Some("a.md"), &["a.md"]), false, "convos");
        assert_eq!(paths(selector.selected()), vec!["a.md"]);

        selector.on_workspace_change(&docs(Some("b.md"), &["a.md", "b.md"]), false, "convos");
        assert_eq!(paths(selector.selected()), vec!["b.md", "a.md"]);

        selector.on_workspace_change(&docs(Some("b.md"), &["b.md"]), false, "convos");
        assert_eq!(paths(selector.selected()), vec!["b.md"]);
    }

    #[test]
    fn manual_entries_survive_closing_auto_documents() {
        let mut selector = ContextSelector::new();
        selector.on_workspace_change(&docs(None, &["A.md", "B.md"]), true, "convos");
        selector.add_manual(file("C.md"));
        assert_eq!(paths(selector.selected()), vec!["A.md", "B.md", "C.md"]);

        selector.on_workspace_change(&docs(None, &["A.md"]), true, "convos");
        assert_eq!(paths(selector.selected()), vec!["A.md", "C.md"]);
    }

    #[test]
    fn add_manual_is_idempotent() {
        let mut selector = ContextSelector::new();
        selector.add_manual(file("a.md"));
        selector.add_manual(file("a.md"));
        assert_eq!(paths(selector.selected()), vec!["a.md"]);
    }

    #[test]
    fn manual_mark_keeps_auto_file_after_close() {
        let mut selector = ContextSelector::new();
        selector.on_workspace_change(&docs(Some("a.md"), &["a.md"]), false, "convos");
        selector.add_manual(file("a.md"));
        selector.on_workspace_change(&OpenDocuments::default(), false, "convos");
        assert_eq!(paths(selector.selected()), vec!["a.md"]);
    }

    #[test]
    fn remove_and_clear_drop_entries() {
        let mut selector = ContextSelector::new();
        selector.add_manual(file("a.md"));
        selector.add_manual(file("b.md"));
        selector.remove("a.md");
        assert_eq!(paths(selector.selected()), vec!["b.md"]);
        assert!(!selector.is_manual("a.md"));

        selector.on_workspace_change(&OpenDocuments::default(), false, "convos");
        assert_eq!(paths(selector.selected()), vec!["b.md"]);

        selector.clear();
        assert!(selector.selected().is_empty());
    }
}
