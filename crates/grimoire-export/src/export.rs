//! Whole-workspace export: one markdown document per page.

use std::collections::{BTreeMap, HashMap};

use tracing::debug;

use grimoire_store::Workspace;

use crate::markdown::MarkdownConverter;

/// Derive a filename stem from a page title: lowercased, every
/// non-alphanumeric character replaced with an underscore, `untitled` when
/// nothing remains.
pub fn sanitize_filename(title: &str) -> String {
    if title.is_empty() {
        return "untitled".to_string();
    }
    title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect()
}

/// Export every page as `<filename>.md` → markdown text.
///
/// Page references resolve against the workspace's current titles; a
/// dangling reference renders as `[[Unknown Note]]`. Colliding filenames
/// are not deduplicated — the later page wins.
pub fn export_workspace(workspace: &mut Workspace) -> BTreeMap<String, String> {
    let titles: HashMap<_, _> = workspace
        .pages()
        .pages()
        .iter()
        .map(|p| (p.id, p.title.clone()))
        .collect();
    let converter = MarkdownConverter::new(titles);

    let pages: Vec<_> = workspace.pages().pages().to_vec();
    let mut documents = BTreeMap::new();
    for page in pages {
        let content = workspace.page_content(page.id);
        let body = converter.convert(&content);
        let markdown = format!("# {}\n\n{}", page.title, body);
        let filename = format!("{}.md", sanitize_filename(&page.title));
        debug!(%page.id, %filename, "Exported page");
        documents.insert(filename, markdown);
    }
    documents
}
