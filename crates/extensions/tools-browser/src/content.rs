//! Content pipeline: raw page markup to condensed, link-preserving text.
//!
//! Scripts, styles and images are dropped. Paragraphs, lists, emphasis and
//! anchors survive as Markdown (converted by `htmd`); every other element is
//! unwrapped to its text. The anchors found in the page are appended as a
//! separate inventory under a `## Links` heading.

use htmd::HtmlToMarkdown;
use htmd::options::{BulletListMarker, HeadingStyle, LinkStyle, Options};
use scraper::{ElementRef, Html, Node, Selector};
use serde::Serialize;
use tracing::warn;

/// Heading introducing the link inventory in a content blob.
pub const LINKS_HEADING: &str = "## Links";

const DROPPED: &[&str] = &["script", "style", "noscript", "template", "img", "svg", "picture"];

/// Elements that start a new block when unwrapped.
const BLOCKS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "caption", "dd", "details", "dialog",
    "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form", "h1", "h2", "h3",
    "h4", "h5", "h6", "header", "hr", "main", "nav", "pre", "section", "summary", "table",
    "tbody", "td", "tfoot", "th", "thead", "title", "tr",
];

/// A page reduced to text and the anchors it contains.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanedPage {
    pub text: String,
    pub links: Vec<PageLink>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub text: String,
    pub href: String,
}

impl CleanedPage {
    /// The single content blob stored in history and fed to retrieval.
    pub fn content(&self) -> String {
        let links = self
            .links
            .iter()
            .map(|link| format!("- [{}]({})", link.text, link.href))
            .collect::<Vec<_>>()
            .join("\n");
        format!("{}\n\n{}\n{}", self.text, LINKS_HEADING, links)
    }
}

/// Cleanse raw markup.
pub fn cleanse(html: &str) -> CleanedPage {
    let document = Html::parse_document(html);

    let mut sanitizer = Sanitizer::default();
    sanitizer.children(document.root_element(), Scope::Flow);
    let text = condense(&tighten_list_markers(&to_markdown(&sanitizer.out)));

    CleanedPage {
        text,
        links: extract_links(&document),
    }
}

fn extract_links(document: &Html) -> Vec<PageLink> {
    let Ok(selector) = Selector::parse("a[href]") else {
        return Vec::new();
    };
    document
        .select(&selector)
        .filter_map(|a| {
            let href = a.value().attr("href")?;
            Some(PageLink {
                text: collapse_whitespace(&a.text().collect::<String>()),
                href: href.to_string(),
            })
        })
        .collect()
}

fn to_markdown(html: &str) -> String {
    let options = Options {
        heading_style: HeadingStyle::Atx,
        link_style: LinkStyle::Inlined,
        bullet_list_marker: BulletListMarker::Dash,
        ..Default::default()
    };
    let converter = HtmlToMarkdown::builder().options(options).build();
    match converter.convert(html) {
        Ok(markdown) => markdown,
        Err(e) => {
            warn!("Markdown conversion failed, keeping plain text: {}", e);
            let fragment = Html::parse_fragment(html);
            collapse_whitespace(&fragment.root_element().text().collect::<String>())
        }
    }
}

/// Where an element sits, which decides how much structure it may keep.
#[derive(Clone, Copy, PartialEq, Eq)]
enum Scope {
    /// Ordinary flow content.
    Flow,
    /// Inside a list item: blocks flatten to inline text, nested lists stay.
    ListItem,
    /// Inside an anchor: text only.
    Anchor,
}

/// Re-serializes a parsed page keeping only the allow-listed tags.
#[derive(Default)]
struct Sanitizer {
    out: String,
}

impl Sanitizer {
    fn children(&mut self, element: ElementRef<'_>, scope: Scope) {
        for child in element.children() {
            match child.value() {
                Node::Text(text) => {
                    let text: &str = text;
                    self.text(text);
                }
                Node::Element(_) => {
                    if let Some(child) = ElementRef::wrap(child) {
                        self.element(child, scope);
                    }
                }
                _ => {}
            }
        }
    }

    fn element(&mut self, element: ElementRef<'_>, scope: Scope) {
        let name = element.value().name();
        if DROPPED.contains(&name) {
            return;
        }
        if scope == Scope::Anchor {
            self.flattened(element, scope, is_block(name));
            return;
        }
        match name {
            "a" => match element.value().attr("href") {
                Some(href) => {
                    let open = format!("<a href=\"{}\">", escape(href, true));
                    self.wrapped(&open, "</a>", element, Scope::Anchor, true);
                }
                None => self.children(element, scope),
            },
            "b" | "strong" | "i" | "em" => self.tag(name, element, scope, true),
            "ul" | "ol" => self.tag(name, element, Scope::Flow, false),
            "li" => self.tag(name, element, Scope::ListItem, false),
            "p" if scope == Scope::Flow => self.tag(name, element, scope, false),
            "br" => self.space(),
            _ if is_block(name) => match scope {
                Scope::Flow => self.tag("div", element, scope, false),
                _ => self.flattened(element, scope, true),
            },
            _ => self.children(element, scope),
        }
    }

    fn tag(&mut self, name: &str, element: ElementRef<'_>, scope: Scope, inline: bool) {
        let open = format!("<{}>", name);
        let close = format!("</{}>", name);
        self.wrapped(&open, &close, element, scope, inline);
    }

    /// Emit `element`'s content between `open` and `close` with the
    /// surrounding whitespace trimmed; inline tags keep it outside the tag.
    /// Elements with no text are skipped.
    fn wrapped(&mut self, open: &str, close: &str, element: ElementRef<'_>, scope: Scope, inline: bool) {
        let mut inner = Sanitizer::default();
        inner.children(element, scope);
        let content = inner.out.trim();
        if content.is_empty() {
            if inline && !inner.out.is_empty() {
                self.space();
            }
            return;
        }
        if inline && inner.out.starts_with(' ') {
            self.space();
        }
        self.out.push_str(open);
        self.out.push_str(content);
        self.out.push_str(close);
        if inline && inner.out.ends_with(' ') {
            self.space();
        }
    }

    /// Emit a block's content inline, separated from its neighbours by spaces.
    fn flattened(&mut self, element: ElementRef<'_>, scope: Scope, spaced: bool) {
        if spaced {
            self.space();
        }
        self.children(element, scope);
        if spaced {
            self.space();
        }
    }

    fn space(&mut self) {
        if !self.out.ends_with(' ') {
            self.out.push(' ');
        }
    }

    fn text(&mut self, text: &str) {
        let collapsed = collapse_whitespace(text);
        if text.starts_with(char::is_whitespace) || (collapsed.is_empty() && !text.is_empty()) {
            self.space();
        }
        if collapsed.is_empty() {
            return;
        }
        self.out.push_str(&escape(&collapsed, false));
        if text.ends_with(char::is_whitespace) {
            self.space();
        }
    }
}

fn is_block(name: &str) -> bool {
    name == "p" || name == "li" || BLOCKS.contains(&name)
}

fn escape(text: &str, attribute: bool) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' if attribute => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Collapse the padding after list markers (`-   item`, `1.  item`) to one space.
fn tighten_list_markers(markdown: &str) -> String {
    markdown
        .lines()
        .map(|line| {
            let body = line.trim_start();
            let indent = &line[..line.len() - body.len()];
            let marker_len = if body.starts_with('-') {
                1
            } else {
                let digits = body.chars().take_while(char::is_ascii_digit).count();
                if digits > 0 && body[digits..].starts_with('.') {
                    digits + 1
                } else {
                    0
                }
            };
            let rest = &body[marker_len..];
            if marker_len == 0 || !rest.starts_with(char::is_whitespace) {
                return line.to_string();
            }
            format!("{}{} {}", indent, &body[..marker_len], rest.trim_start())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Trim lines and collapse runs of blank lines to one.
pub(crate) fn condense(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut blank = false;
    for line in text.lines() {
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank = true;
            continue;
        }
        if blank && !result.is_empty() {
            result.push('\n');
        }
        blank = false;
        result.push_str(line);
        result.push('\n');
    }
    result.trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drops_scripts_styles_and_images() {
        let page = cleanse(
            r#"<html><head><style>p { color: red }</style><script>var secret = 1;</script></head>
            <body><p>Visible <img src="cat.png" alt="cat"> text</p></body></html>"#,
        );
        assert!(page.text.contains("Visible text"));
        assert!(!page.text.contains("secret"));
        assert!(!page.text.contains("color"));
        assert!(!page.text.contains("cat"));
    }

    #[test]
    fn test_keeps_allowed_formatting() {
        let page = cleanse("<p>Some <strong>bold</strong> and <em>italic</em> words</p>");
        assert!(page.text.starts_with("Some **bold** and "), "{}", page.text);
        assert!(page.text.contains("italic"));
        assert!(page.text.ends_with(" words"));
        assert!(!page.text.contains('<'));
    }

    #[test]
    fn test_emphasis_whitespace_stays_outside_markers() {
        let page = cleanse("<p>a<strong> bold </strong>b</p>");
        assert_eq!(page.text, "a **bold** b");
    }

    #[test]
    fn test_list_items_wrapping_paragraphs() {
        let page = cleanse("<ul><li><p>alpha</p></li><li><p>beta</p></li></ul>");
        assert_eq!(page.text, "- alpha\n- beta");
    }

    #[test]
    fn test_anchor_wrapping_block_stays_one_link() {
        let page = cleanse(r#"<ul><li><a href="/x"><p>Go</p></a></li></ul>"#);
        assert_eq!(page.text, "- [Go](/x)");

        let page = cleanse(r#"<a href="/card"><div><h3>Title</h3><p>Blurb</p></div></a>"#);
        assert_eq!(page.text, "[Title Blurb](/card)");
    }

    #[test]
    fn test_image_only_anchor_is_skipped_inline() {
        let page = cleanse(r#"<p>Logo <a href="/"><img src="logo.png"></a> here</p>"#);
        assert_eq!(page.text, "Logo here");
        assert_eq!(page.links.len(), 1);
    }

    #[test]
    fn test_nested_lists_are_kept() {
        let page = cleanse("<ul><li>fruit<ul><li>apple</li></ul></li><li>veg</li></ul>");
        let lines: Vec<&str> = page.text.lines().collect();
        assert_eq!(lines.first(), Some(&"- fruit"));
        assert!(lines.iter().any(|line| line.starts_with(' ') && line.trim() == "- apple"));
        assert_eq!(lines.last(), Some(&"- veg"));
    }

    #[test]
    fn test_markup_characters_in_text_survive() {
        let page = cleanse("<p>a &lt; b &amp;&amp; c</p>");
        assert!(page.text.contains('<'), "{}", page.text);
        assert!(page.text.contains("&&"), "{}", page.text);
        assert!(!page.text.contains("&lt;"));
        assert!(!page.text.contains("&amp;"));
    }

    #[test]
    fn test_list_marker_padding_is_tightened() {
        assert_eq!(
            tighten_list_markers("-   one\n  -   two\n10.  ten\n-dash\nplain"),
            "- one\n  - two\n10. ten\n-dash\nplain"
        );
    }

    #[test]
    fn test_unwraps_other_elements() {
        let page = cleanse("<div><span>one</span> <section><h2>two</h2></section></div>");
        assert!(page.text.contains("one"));
        assert!(page.text.contains("two"));
        assert!(!page.text.contains('<'));
        assert!(!page.text.contains('#'));
    }

    #[test]
    fn test_paragraphs_are_separated() {
        let page = cleanse("<p>First</p><p>Second</p>");
        assert_eq!(page.text, "First\n\nSecond");
    }

    #[test]
    fn test_lists() {
        let page = cleanse("<ul><li>apple</li><li>pear</li></ul><ol><li>one</li><li>two</li></ol>");
        assert!(page.text.contains("- apple\n- pear"));
        assert!(page.text.contains("1. one\n2. two"));
    }

    #[test]
    fn test_anchors_inline_and_inventory() {
        let page = cleanse(
            r#"<p>See <a href="/docs">the docs</a> or <a href="https://example.com">Example</a>.</p>
            <a name="top">no href</a>"#,
        );
        assert!(page.text.contains("[the docs](/docs)"));
        assert_eq!(
            page.links,
            vec![
                PageLink { text: "the docs".into(), href: "/docs".into() },
                PageLink { text: "Example".into(), href: "https://example.com".into() },
            ]
        );
    }

    #[test]
    fn test_content_blob_appends_link_inventory() {
        let page = cleanse(r#"<p>Hello <a href="/a">A</a></p>"#);
        let content = page.content();
        assert!(content.starts_with("Hello [A](/a)"));
        assert!(content.ends_with("\n\n## Links\n- [A](/a)"));
    }

    #[test]
    fn test_content_blob_without_links() {
        let content = cleanse("<p>plain</p>").content();
        assert_eq!(content, "plain\n\n## Links\n");
    }

    #[test]
    fn test_empty_markup() {
        let page = cleanse("");
        assert!(page.text.is_empty());
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_whitespace_is_condensed() {
        let page = cleanse("<p>a\n\n   b</p>\n\n\n<div>\n\n</div><p>c</p>");
        assert_eq!(page.text, "a b\n\nc");
    }
}
