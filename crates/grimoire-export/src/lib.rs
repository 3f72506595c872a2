//! # Grimoire Export
//!
//! Converts the full page set into a portable markdown representation.
//!
//! Each page becomes one markdown document: a level-1 heading of the title
//! followed by a conversion of its rich content. Two domain rules override
//! the default conversion: callout blocks become `[!NOTE]` block quotes, and
//! page reference cards become `[[Title]]` wiki links resolved against the
//! current page set. Filenames derive from page titles and are **not**
//! deduplicated on collision — last writer wins.

pub mod export;
pub mod markdown;

pub use export::{export_workspace, sanitize_filename};
pub use markdown::MarkdownConverter;
