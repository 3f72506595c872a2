//! Rich-content → markdown conversion.
//!
//! The editor emits a small, fixed tag vocabulary (headings, paragraphs,
//! lists, quotes, code, emphasis, plus the two domain block types), so the
//! converter works the vocabulary directly with anchored patterns instead of
//! a general HTML parse.

use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

const UNKNOWN_NOTE: &str = "Unknown Note";

static PAGE_CARD_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div[^>]*data-type="page-card"[^>]*>.*?</div>"#).expect("valid regex")
});
static PAGE_ID_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"data-page-id="([^"]+)""#).expect("valid regex"));
static CALLOUT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?s)<div[^>]*data-type="callout"[^>]*>(.*?)</div>"#).expect("valid regex")
});
static CODE_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<pre>\s*<code[^>]*>(.*?)</code>\s*</pre>").expect("valid regex"));
static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<h([1-6])[^>]*>(.*?)</h[1-6]>").expect("valid regex"));
static UL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<ul[^>]*>(.*?)</ul>").expect("valid regex"));
static OL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<ol[^>]*>(.*?)</ol>").expect("valid regex"));
static LI_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<li[^>]*>(.*?)</li>").expect("valid regex"));
static BLOCKQUOTE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<blockquote[^>]*>(.*?)</blockquote>").expect("valid regex"));
static PARAGRAPH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<p[^>]*>(.*?)</p>").expect("valid regex"));
static BR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<br\s*/?>").expect("valid regex"));
static STRONG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(?:strong|b)>(.*?)</(?:strong|b)>").expect("valid regex"));
static EM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<(?:em|i)>(.*?)</(?:em|i)>").expect("valid regex"));
static CODE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<code>(.*?)</code>").expect("valid regex"));
static LINK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?s)<a[^>]*href="([^"]*)"[^>]*>(.*?)</a>"#).expect("valid regex"));
static ANY_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static EXTRA_BLANK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Converter carrying the title lookup used to resolve page references.
pub struct MarkdownConverter {
    titles: HashMap<Uuid, String>,
}

impl MarkdownConverter {
    /// Build a converter resolving references against the given titles.
    pub fn new(titles: HashMap<Uuid, String>) -> Self {
        Self { titles }
    }

    /// Convert one page body to markdown.
    pub fn convert(&self, content: &str) -> String {
        let converted = self.convert_blocks(content);
        EXTRA_BLANK_RE
            .replace_all(&converted, "\n\n")
            .trim()
            .to_string()
    }

    fn convert_blocks(&self, content: &str) -> String {
        // Domain blocks first: their replacements must not be re-processed
        // by the generic rules below.
        let content = PAGE_CARD_RE.replace_all(content, |caps: &regex::Captures| {
            let title = PAGE_ID_ATTR_RE
                .captures(&caps[0])
                .and_then(|attr| Uuid::parse_str(&attr[1]).ok())
                .and_then(|id| self.titles.get(&id).cloned())
                .unwrap_or_else(|| UNKNOWN_NOTE.to_string());
            format!("\n[[{title}]]\n")
        });

        let content = CALLOUT_RE.replace_all(&content, |caps: &regex::Captures| {
            let inner = self.convert(&caps[1]);
            format!("\n> [!NOTE]\n> {}\n", inner.replace('\n', "\n> "))
        });

        let content = CODE_BLOCK_RE.replace_all(&content, |caps: &regex::Captures| {
            format!("\n```\n{}\n```\n", unescape(caps[1].trim_matches('\n')))
        });

        let content = HEADING_RE.replace_all(&content, |caps: &regex::Captures| {
            let level: usize = caps[1].parse().unwrap_or(1);
            format!("\n{} {}\n\n", "#".repeat(level), caps[2].trim())
        });

        let content = UL_RE.replace_all(&content, |caps: &regex::Captures| {
            let items: Vec<String> = LI_RE
                .captures_iter(&caps[1])
                .map(|item| format!("- {}", item[1].trim()))
                .collect();
            format!("\n{}\n\n", items.join("\n"))
        });

        let content = OL_RE.replace_all(&content, |caps: &regex::Captures| {
            let items: Vec<String> = LI_RE
                .captures_iter(&caps[1])
                .enumerate()
                .map(|(i, item)| format!("{}. {}", i + 1, item[1].trim()))
                .collect();
            format!("\n{}\n\n", items.join("\n"))
        });

        let content = BLOCKQUOTE_RE.replace_all(&content, |caps: &regex::Captures| {
            let inner = self.convert(&caps[1]);
            format!("\n> {}\n\n", inner.replace('\n', "\n> "))
        });

        let content = PARAGRAPH_RE.replace_all(&content, "\n$1\n\n");

        // Inline vocabulary.
        let content = BR_RE.replace_all(&content, "\n");
        let content = STRONG_RE.replace_all(&content, "**$1**");
        let content = EM_RE.replace_all(&content, "*$1*");
        let content = CODE_RE.replace_all(&content, "`$1`");
        let content = LINK_RE.replace_all(&content, "[$2]($1)");

        // Anything the vocabulary does not cover is dropped, not escaped.
        let content = ANY_TAG_RE.replace_all(&content, "");
        unescape(&content)
    }
}

fn unescape(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
