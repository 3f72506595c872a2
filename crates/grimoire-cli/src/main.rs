//! `grim` — command-line shell over the Grimoire stores.
//!
//! All consistency logic lives in the library crates; this binary only
//! opens the durable store, wires the providers, and maps subcommands onto
//! store operations.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use grimoire_core::{DatabasePatch, DatabaseView, PagePatch};
use grimoire_export::export_workspace;
use grimoire_kv::{KeyValueStore, SqliteKv};
use grimoire_llm::{Assistant, OllamaEmbeddings, OpenRouterClient};
use grimoire_search::{SemanticIndex, DEFAULT_SEARCH_LIMIT};
use grimoire_store::Workspace;

#[derive(Parser)]
#[command(name = "grim", version, about = "Local-first knowledge base")]
struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Ollama-compatible embedding endpoint
    #[arg(long, global = true)]
    ollama_url: Option<String>,

    /// Embedding model name
    #[arg(long, global = true)]
    embed_model: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the page tree
    List,
    /// Create a page
    Add {
        title: String,
        /// Parent page id
        #[arg(long)]
        parent: Option<Uuid>,
        #[arg(long, default_value = "📄")]
        icon: String,
    },
    /// Rename a page
    Rename { id: Uuid, title: String },
    /// Delete a page (content and chat history go with it)
    Remove { id: Uuid },
    /// Print a page's raw content
    Show { id: Uuid },
    /// Replace a page's content and refresh its embedding
    SetContent { id: Uuid, content: String },
    /// Re-embed every page
    Index,
    /// Semantic search over indexed pages
    Search {
        query: String,
        #[arg(long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
    /// Create a structured database
    DbNew { title: String },
    /// Switch a database's view
    DbView { id: Uuid, view: String },
    /// Show or update settings
    Settings {
        #[arg(long)]
        key: Option<String>,
        #[arg(long)]
        model: Option<String>,
    },
    /// Summarize a page with the configured model
    Summarize { id: Uuid },
    /// Ask a question in the context of a page and all databases
    Ask { id: Uuid, question: String },
    /// Export every page as markdown
    Export {
        #[arg(long, default_value = "export")]
        out: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let data_dir = match &cli.data_dir {
        Some(dir) => dir.clone(),
        None => dirs::data_dir()
            .context("no platform data directory, pass --data-dir")?
            .join("grimoire"),
    };
    let kv: Arc<dyn KeyValueStore> =
        Arc::new(SqliteKv::open(data_dir.join("grimoire.db")).context("open key-value store")?);
    let mut workspace = Workspace::load(kv.clone());

    let ollama_url = cli.ollama_url.clone();
    let embed_model = cli.embed_model.clone();

    match cli.command {
        Command::List => {
            print_tree(&workspace, None, 0);
        }
        Command::Add { title, parent, icon } => {
            let page = workspace.create_page(title, parent, icon);
            println!("{}  {}", page.id, page.title);
        }
        Command::Rename { id, title } => {
            workspace.update_page(id, PagePatch::title(title));
        }
        Command::Remove { id } => {
            workspace.delete_page(id);
        }
        Command::Show { id } => {
            println!("{}", workspace.page_content(id));
        }
        Command::SetContent { id, content } => {
            workspace.set_page_content(id, content.as_str());
            let mut index = SemanticIndex::load(kv.clone(), embedder(&ollama_url, &embed_model));
            index.index_page(id, &content).await;
        }
        Command::Index => {
            let mut index = SemanticIndex::load(kv.clone(), embedder(&ollama_url, &embed_model));
            let pages: Vec<_> = workspace.pages().pages().to_vec();
            for page in pages {
                let content = workspace.page_content(page.id);
                index.index_page(page.id, &content).await;
            }
            println!("indexed {} pages", index.len());
        }
        Command::Search { query, limit } => {
            let index = SemanticIndex::load(kv.clone(), embedder(&ollama_url, &embed_model));
            let results = index.search(&query, workspace.pages().pages(), limit).await;
            for result in results {
                println!("{:.3}  {}  {}", result.score, result.id, result.title);
            }
        }
        Command::DbNew { title } => {
            let db = workspace.create_database(title);
            println!("{}  {}", db.id, db.title);
        }
        Command::DbView { id, view } => {
            let view = parse_view(&view)?;
            workspace.update_database(id, DatabasePatch::view(view));
        }
        Command::Settings { key, model } => {
            if key.is_none() && model.is_none() {
                let settings = workspace.settings();
                let key_state = if settings.open_router_key.is_empty() {
                    "(unset)"
                } else {
                    "(set)"
                };
                println!("openrouter key: {key_state}");
                println!("model: {}", settings.selected_model);
            } else {
                workspace.update_settings(|s| {
                    if let Some(key) = key {
                        s.open_router_key = key;
                    }
                    if let Some(model) = model {
                        s.selected_model = model;
                    }
                });
            }
        }
        Command::Summarize { id } => {
            let content = workspace.page_content(id);
            let assistant = Assistant::new(chat_client(&workspace));
            let summary = assistant.summarize(&content).await?;
            println!("{summary}");
        }
        Command::Ask { id, question } => {
            let context = workspace.page_content(id);
            let databases: Vec<_> = workspace.databases().iter().cloned().collect();
            let assistant = Assistant::new(chat_client(&workspace));
            let answer = assistant.ask(&question, &context, &databases).await?;
            println!("{answer}");
        }
        Command::Export { out } => {
            let documents = export_workspace(&mut workspace);
            std::fs::create_dir_all(&out).context("create export directory")?;
            let count = documents.len();
            for (filename, markdown) in documents {
                std::fs::write(out.join(&filename), markdown)
                    .with_context(|| format!("write {filename}"))?;
            }
            println!("exported {count} pages to {}", out.display());
        }
    }

    Ok(())
}

fn embedder(ollama_url: &Option<String>, embed_model: &Option<String>) -> Arc<OllamaEmbeddings> {
    Arc::new(OllamaEmbeddings::new(
        ollama_url.clone(),
        embed_model.clone(),
    ))
}

fn chat_client(workspace: &Workspace) -> OpenRouterClient {
    let settings = workspace.settings();
    OpenRouterClient::new(
        settings.open_router_key.clone(),
        settings.selected_model.clone(),
    )
}

fn parse_view(raw: &str) -> Result<DatabaseView> {
    Ok(match raw {
        "table" => DatabaseView::Table,
        "kanban" => DatabaseView::Kanban,
        "calendar" => DatabaseView::Calendar,
        "gallery" => DatabaseView::Gallery,
        other => bail!("unknown view '{other}' (table, kanban, calendar, gallery)"),
    })
}

fn print_tree(workspace: &Workspace, parent: Option<Uuid>, depth: usize) {
    for page in workspace.pages().children(parent) {
        let marker = if workspace.active_page_id() == Some(page.id) {
            "*"
        } else {
            " "
        };
        println!(
            "{}{} {} {}  {}",
            "  ".repeat(depth),
            marker,
            page.icon,
            page.title,
            page.id
        );
        print_tree(workspace, Some(page.id), depth + 1);
    }
}
