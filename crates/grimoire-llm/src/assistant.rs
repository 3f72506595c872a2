//! Assistant operations: prompt building over pages and embedded databases.

use grimoire_core::{ChatMessage, Database};
use serde_json::Value;

use crate::error::LlmResult;
use crate::provider::ChatProvider;

/// High-level AI operations offered to the UI layer.
///
/// Holds the injected [`ChatProvider`]; all prompt construction lives here
/// so the providers stay pure transports.
pub struct Assistant<P: ChatProvider> {
    provider: P,
}

impl<P: ChatProvider> Assistant<P> {
    /// Wrap a chat provider.
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Summarize a block of text.
    pub async fn summarize(&self, text: &str) -> LlmResult<String> {
        self.provider
            .complete(&[ChatMessage::user(format!(
                "Summarize the following text concisely:\n\n{text}"
            ))])
            .await
    }

    /// Answer a question using the current page's content and any embedded
    /// databases as context.
    pub async fn ask(
        &self,
        question: &str,
        context: &str,
        databases: &[Database],
    ) -> LlmResult<String> {
        let mut system = format!(
            "You are a helpful assistant integrated into Grimoire, a knowledge base app. \
             Use the provided context and database information to answer accurately.\n\n\
             Page Context:\n{context}"
        );
        if !databases.is_empty() {
            system.push_str("\n\nAvailable Databases:\n");
            system.push_str(&render_databases(databases));
        }

        self.provider
            .complete(&[ChatMessage::system(system), ChatMessage::user(question)])
            .await
    }
}

/// Render databases as pipe-separated tables the model can read.
fn render_databases(databases: &[Database]) -> String {
    databases
        .iter()
        .map(|db| {
            let headers = db
                .columns
                .iter()
                .map(|c| c.name.as_str())
                .collect::<Vec<_>>()
                .join(" | ");
            let rows = db
                .rows
                .iter()
                .map(|row| {
                    db.columns
                        .iter()
                        .map(|c| cell_text(row.cell(&c.id)))
                        .collect::<Vec<_>>()
                        .join(" | ")
                })
                .collect::<Vec<_>>()
                .join("\n");
            format!("Table: {}\nHeaders: {}\nData:\n{}", db.title, headers, rows)
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Null) | None => String::new(),
        Some(other) => other.to_string(),
    }
}
