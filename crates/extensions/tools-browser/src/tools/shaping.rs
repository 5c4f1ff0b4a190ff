//! Result shaping: caps, truncation and filtering applied to raw script
//! output before it is reported.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Appended to text cut at `maxChars`.
pub const TRUNCATION_MARKER: &str = "\n\n[... content truncated]";

pub const MAX_SEARCH_MATCHES: usize = 10;
pub const SEARCH_CONTEXT_CHARS: usize = 100;
pub const LINK_TEXT_CHARS: usize = 100;
pub const MAX_BUTTONS: usize = 20;
pub const MAX_INPUTS: usize = 20;
pub const MAX_FORMS: usize = 10;
pub const MAX_TABLES: usize = 5;
pub const MAX_TABLE_ROWS: usize = 20;
pub const TABLE_CELL_CHARS: usize = 100;

const NON_NAVIGATIONAL_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:"];

fn take_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

// ============================================================================
// Text truncation
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TruncatedText {
    pub text: String,
    pub total_length: usize,
    pub truncated: bool,
}

/// Cut `text` to `max_chars` characters, appending [`TRUNCATION_MARKER`]
/// when anything was cut.
pub fn truncate(text: &str, max_chars: usize) -> TruncatedText {
    let total_length = text.chars().count();
    if total_length <= max_chars {
        return TruncatedText {
            text: text.to_string(),
            total_length,
            truncated: false,
        };
    }
    let mut cut = take_chars(text, max_chars);
    cut.push_str(TRUNCATION_MARKER);
    TruncatedText {
        text: cut,
        total_length,
        truncated: true,
    }
}

// ============================================================================
// Text search
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchMatch {
    /// Character offset of the match.
    pub position: usize,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub total_matches: usize,
    pub matches: Vec<SearchMatch>,
}

fn fold(c: char) -> char {
    c.to_lowercase().next().unwrap_or(c)
}

/// Case-insensitive, non-overlapping search. Counts every match but keeps
/// context windows for the first [`MAX_SEARCH_MATCHES`].
pub fn search(text: &str, query: &str) -> SearchResults {
    let chars: Vec<char> = text.chars().collect();
    let folded: Vec<char> = chars.iter().copied().map(fold).collect();
    let needle: Vec<char> = query.chars().map(fold).collect();

    let mut matches = Vec::new();
    let mut total_matches = 0;
    let mut i = 0;
    while !needle.is_empty() && i + needle.len() <= folded.len() {
        if folded[i..i + needle.len()] != needle[..] {
            i += 1;
            continue;
        }
        total_matches += 1;
        if matches.len() < MAX_SEARCH_MATCHES {
            matches.push(SearchMatch {
                position: i,
                context: window(&chars, i, needle.len()),
            });
        }
        i += needle.len();
    }

    SearchResults {
        query: query.to_string(),
        total_matches,
        matches,
    }
}

fn window(chars: &[char], position: usize, len: usize) -> String {
    let start = position.saturating_sub(SEARCH_CONTEXT_CHARS);
    let end = (position + len + SEARCH_CONTEXT_CHARS).min(chars.len());
    let mut context = String::new();
    if start > 0 {
        context.push_str("...");
    }
    context.extend(&chars[start..end]);
    if end < chars.len() {
        context.push_str("...");
    }
    context
}

// ============================================================================
// Links
// ============================================================================

/// An anchor as the links script reports it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawLink {
    pub text: String,
    /// Attribute value as written in the markup.
    pub raw_href: String,
    /// Absolute URL resolved by the page.
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub text: String,
    pub href: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkList {
    pub links: Vec<Link>,
    /// Count before the cap.
    pub total_links: usize,
}

fn is_navigational(raw_href: &str) -> bool {
    let href = raw_href.trim();
    if href.is_empty() || href.starts_with('#') {
        return false;
    }
    let lower = href.to_ascii_lowercase();
    !NON_NAVIGATIONAL_SCHEMES
        .iter()
        .any(|scheme| lower.starts_with(scheme))
}

/// Drop empty-text and non-navigational anchors, de-duplicate by absolute
/// URL, then cap at `max_links`.
pub fn shape_links(raw: Vec<RawLink>, max_links: usize) -> LinkList {
    let mut seen = HashSet::new();
    let links: Vec<Link> = raw
        .into_iter()
        .filter(|link| !link.text.trim().is_empty() && is_navigational(&link.raw_href))
        .filter(|link| seen.insert(link.href.clone()))
        .map(|link| Link {
            text: take_chars(link.text.trim(), LINK_TEXT_CHARS),
            href: link.href,
        })
        .collect();

    let total_links = links.len();
    LinkList {
        links: links.into_iter().take(max_links).collect(),
        total_links,
    }
}

// ============================================================================
// Interactive elements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Button {
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInput {
    pub tag: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub id: String,
    pub label: String,
    pub placeholder: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InputField {
    pub tag: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub name: String,
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormSummary {
    pub id: String,
    pub action: String,
    pub method: String,
    pub field_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawInteractive {
    pub buttons: Vec<Button>,
    pub inputs: Vec<RawInput>,
    pub forms: Vec<FormSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractiveElements {
    pub buttons: Vec<Button>,
    pub inputs: Vec<InputField>,
    pub forms: Vec<FormSummary>,
}

/// Explicit label, then placeholder, then name.
pub fn resolve_label(label: &str, placeholder: &str, name: &str) -> String {
    [label, placeholder, name]
        .into_iter()
        .map(str::trim)
        .find(|candidate| !candidate.is_empty())
        .unwrap_or_default()
        .to_string()
}

pub fn shape_interactive(raw: RawInteractive) -> InteractiveElements {
    InteractiveElements {
        buttons: raw.buttons.into_iter().take(MAX_BUTTONS).collect(),
        inputs: raw
            .inputs
            .into_iter()
            .take(MAX_INPUTS)
            .map(|input| InputField {
                label: resolve_label(&input.label, &input.placeholder, &input.name),
                tag: input.tag,
                kind: input.kind,
                name: input.name,
                id: input.id,
            })
            .collect(),
        forms: raw.forms.into_iter().take(MAX_FORMS).collect(),
    }
}

// ============================================================================
// Tables
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Table {
    pub caption: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Data rows before the cap.
    #[serde(default)]
    pub total_rows: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableList {
    pub tables: Vec<Table>,
    pub total_tables: usize,
}

fn cells(row: Vec<String>) -> Vec<String> {
    row.iter().map(|cell| take_chars(cell, TABLE_CELL_CHARS)).collect()
}

pub fn shape_tables(raw: Vec<Table>) -> TableList {
    let total_tables = raw.len();
    let tables = raw
        .into_iter()
        .take(MAX_TABLES)
        .map(|table| Table {
            caption: table.caption,
            headers: cells(table.headers),
            total_rows: table.rows.len(),
            rows: table.rows.into_iter().take(MAX_TABLE_ROWS).map(cells).collect(),
        })
        .collect();
    TableList {
        tables,
        total_tables,
    }
}

// ============================================================================
// Images
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub src: String,
    pub alt: String,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageList {
    pub images: Vec<Image>,
    pub total_images: usize,
}

pub fn shape_images(raw: Vec<Image>, max_images: usize) -> ImageList {
    ImageList {
        total_images: raw.len(),
        images: raw.into_iter().take(max_images).collect(),
    }
}
