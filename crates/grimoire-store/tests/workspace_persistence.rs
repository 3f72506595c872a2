//! End-to-end persistence: a workspace over the on-disk SQLite backend,
//! including simulated process restarts.

use std::sync::Arc;

use grimoire_core::{ChatMessage, ChatSession, DatabasePatch, DatabaseView, PagePatch};
use grimoire_kv::{KeyValueStore, SqliteKv};
use grimoire_store::Workspace;

fn open(path: &std::path::Path) -> Workspace {
    let kv: Arc<dyn KeyValueStore> = Arc::new(SqliteKv::open(path).expect("open store"));
    Workspace::load(kv)
}

#[test]
fn full_lifecycle_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("grimoire.db");

    let (notes_id, tasks_db_id) = {
        let mut ws = open(&db_path);

        // Fresh store: exactly the seeded welcome page.
        assert_eq!(ws.pages().pages().len(), 1);

        let notes = ws.create_page("Notes", None, "📝");
        let sub = ws.create_page("Sub Note", Some(notes.id), "");
        ws.set_page_content(notes.id, "<p>remember the milk</p>");

        let tasks = ws.create_database("Tasks");
        ws.update_database(tasks.id, DatabasePatch::view(DatabaseView::Kanban));

        let mut session = ChatSession::new("Planning");
        session.push(ChatMessage::user("what is next?"));
        ws.save_chat_sessions(notes.id, vec![session]);

        ws.update_page(sub.id, PagePatch::title("Renamed Sub"));
        ws.update_settings(|s| s.open_router_key = "sk-or-test".to_string());

        (notes.id, tasks.id)
    };

    // Restart: everything comes back from disk.
    let mut ws = open(&db_path);

    assert_eq!(ws.pages().pages().len(), 3);
    assert_eq!(ws.page_content(notes_id), "<p>remember the milk</p>");

    let tasks = ws.databases().get(tasks_db_id).expect("database survives");
    assert_eq!(tasks.current_view, DatabaseView::Kanban);
    assert_eq!(tasks.title, "Tasks");

    let sessions = ws.chat_sessions(notes_id);
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0].messages[0].content, "what is next?");

    assert!(ws
        .pages()
        .pages()
        .iter()
        .any(|p| p.title == "Renamed Sub"));
    assert_eq!(ws.settings().open_router_key, "sk-or-test");

    // Delete cascades reach disk too.
    ws.delete_page(notes_id);
    drop(ws);

    let ws = open(&db_path);
    assert!(ws.pages().get(notes_id).is_none());
    assert!(ws.chat_sessions(notes_id).is_empty());
    // The orphaned child is still present, dangling parent and all.
    assert!(ws.pages().pages().iter().any(|p| p.title == "Renamed Sub"));
}

#[test]
fn reorder_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("grimoire.db");

    let (a, b, c) = {
        let mut ws = open(&db_path);
        let a = ws.create_page("A", None, "");
        let b = ws.create_page("B", None, "");
        let c = ws.create_page("C", None, "");
        ws.reorder_pages(None, &[c.id, b.id, a.id]);
        (a.id, b.id, c.id)
    };

    let ws = open(&db_path);
    let order: Vec<_> = ws
        .pages()
        .children(None)
        .iter()
        .filter(|p| [a, b, c].contains(&p.id))
        .map(|p| p.id)
        .collect();
    assert_eq!(order, vec![c, b, a]);
}
