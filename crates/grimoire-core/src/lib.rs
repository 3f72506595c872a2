//! # Grimoire Core
//!
//! Domain types for the Grimoire knowledge base: pages, embedded structured
//! databases, chat sessions, and application settings.
//!
//! This crate is pure data — no I/O, no persistence. The stores in
//! `grimoire-store` own the lifecycle of these types; this crate only defines
//! their shape and the partial-update patches applied to them.

pub mod chat;
pub mod database;
pub mod page;
pub mod settings;

pub use chat::{ChatMessage, ChatSession, MessageRole};
pub use database::{Column, ColumnType, Database, DatabasePatch, DatabaseView, Row};
pub use page::{PageMetadata, PagePatch};
pub use settings::{AppSettings, UiState};

/// The canonical empty rich-content document.
///
/// Returned when a page has no stored content anywhere; must stay a valid
/// empty document for whatever renderer consumes page bodies.
pub const EMPTY_DOCUMENT: &str = "<p></p>";
