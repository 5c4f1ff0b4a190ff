//! Page script templates.
//!
//! Every page interaction is one of a closed set of scripts. Arguments are
//! embedded as JSON literals, so selectors and values can never break out of
//! the template. Each script evaluates to `JSON.stringify(...)` of its result;
//! element scripts report a missing element as `{"notFound": true}`.

use serde::{Deserialize, Serialize};

/// Structural candidates for the main content region, in priority order.
pub const MAIN_CONTENT_CANDIDATES: &[&str] = &[
    "main",
    "article",
    "[role=\"main\"]",
    "#content",
    "#main-content",
    "#main",
    ".content",
    ".main-content",
    ".post-content",
    ".article-body",
];

/// Scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollDirection {
    Up,
    Down,
    Top,
    Bottom,
}

/// A parameterized page script.
#[derive(Debug, Clone, PartialEq)]
pub enum PageScript {
    OuterHtml,
    Click { selector: String },
    FillInput { selector: String, value: String },
    SubmitForm { selector: String },
    Scroll { direction: ScrollDirection, amount: u32 },
    PageText,
    Links,
    Headings,
    Outline,
    InteractiveElements,
    MainContent,
    Tables,
    Images,
    PageInfo,
}

impl PageScript {
    /// Selector the script targets, for element-level scripts.
    pub fn selector(&self) -> Option<&str> {
        match self {
            PageScript::Click { selector }
            | PageScript::FillInput { selector, .. }
            | PageScript::SubmitForm { selector } => Some(selector),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageScript::OuterHtml => "outerHtml",
            PageScript::Click { .. } => "click",
            PageScript::FillInput { .. } => "fillInput",
            PageScript::SubmitForm { .. } => "submitForm",
            PageScript::Scroll { .. } => "scrollPage",
            PageScript::PageText => "getPageText",
            PageScript::Links => "getPageLinks",
            PageScript::Headings => "getPageHeadings",
            PageScript::Outline => "getPageOutline",
            PageScript::InteractiveElements => "getInteractiveElements",
            PageScript::MainContent => "getMainContent",
            PageScript::Tables => "getTables",
            PageScript::Images => "getImages",
            PageScript::PageInfo => "getPageInfo",
        }
    }

    /// Render the script text.
    pub fn render(&self) -> String {
        match self {
            PageScript::OuterHtml => OUTER_HTML.to_string(),
            PageScript::Click { selector } => fill(CLICK, &[("__SELECTOR__", literal(selector))]),
            PageScript::FillInput { selector, value } => fill(
                FILL_INPUT,
                &[("__SELECTOR__", literal(selector)), ("__VALUE__", literal(value))],
            ),
            PageScript::SubmitForm { selector } => {
                fill(SUBMIT_FORM, &[("__SELECTOR__", literal(selector))])
            }
            PageScript::Scroll { direction, amount } => fill(
                SCROLL,
                &[("__DIRECTION__", literal(direction)), ("__AMOUNT__", amount.to_string())],
            ),
            PageScript::PageText => PAGE_TEXT.to_string(),
            PageScript::Links => LINKS.to_string(),
            PageScript::Headings => HEADINGS.to_string(),
            PageScript::Outline => OUTLINE.to_string(),
            PageScript::InteractiveElements => INTERACTIVE_ELEMENTS.to_string(),
            PageScript::MainContent => fill(
                MAIN_CONTENT,
                &[("__CANDIDATES__", literal(MAIN_CONTENT_CANDIDATES))],
            ),
            PageScript::Tables => TABLES.to_string(),
            PageScript::Images => IMAGES.to_string(),
            PageScript::PageInfo => PAGE_INFO.to_string(),
        }
    }
}

/// Substitute placeholders in a single pass, so argument text is never
/// rescanned for placeholders.
fn fill(template: &str, args: &[(&str, String)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    loop {
        let next = args
            .iter()
            .filter_map(|(key, value)| rest.find(key).map(|at| (at, key.len(), value)))
            .min_by_key(|(at, _, _)| *at);
        match next {
            Some((at, key_len, value)) => {
                out.push_str(&rest[..at]);
                out.push_str(value);
                rest = &rest[at + key_len..];
            }
            None => {
                out.push_str(rest);
                return out;
            }
        }
    }
}

/// Embed a value as a JavaScript literal.
fn literal<T: Serialize + ?Sized>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| "null".to_string())
}

const OUTER_HTML: &str = "JSON.stringify(document.documentElement.outerHTML)";

const CLICK: &str = r#"(() => {
  const el = document.querySelector(__SELECTOR__);
  if (!el) return JSON.stringify({ success: false, notFound: true });
  el.scrollIntoView({ block: 'center' });
  el.click();
  return JSON.stringify({
    success: true,
    clickedTag: el.tagName.toLowerCase(),
    href: el.getAttribute('href'),
    text: (el.innerText || el.value || '').trim().slice(0, 100)
  });
})()"#;

const FILL_INPUT: &str = r#"(() => {
  const el = document.querySelector(__SELECTOR__);
  if (!el) return JSON.stringify({ success: false, notFound: true });
  el.focus();
  el.value = __VALUE__;
  el.dispatchEvent(new Event('input', { bubbles: true }));
  el.dispatchEvent(new Event('change', { bubbles: true }));
  return JSON.stringify({
    success: true,
    fieldTag: el.tagName.toLowerCase(),
    name: el.getAttribute('name') || el.id || ''
  });
})()"#;

const SUBMIT_FORM: &str = r#"(() => {
  const el = document.querySelector(__SELECTOR__);
  if (!el) return JSON.stringify({ success: false, notFound: true });
  const form = el.tagName === 'FORM' ? el : el.closest('form');
  if (form && typeof form.requestSubmit === 'function') {
    form.requestSubmit();
  } else if (form) {
    form.submit();
  } else {
    el.click();
  }
  return JSON.stringify({ success: true });
})()"#;

const SCROLL: &str = r#"(() => {
  const amount = __AMOUNT__;
  switch (__DIRECTION__) {
    case 'up': window.scrollBy(0, -amount); break;
    case 'down': window.scrollBy(0, amount); break;
    case 'top': window.scrollTo(0, 0); break;
    case 'bottom': window.scrollTo(0, document.documentElement.scrollHeight); break;
  }
  return JSON.stringify({
    success: true,
    scrollPosition: Math.round(window.scrollY),
    pageHeight: document.documentElement.scrollHeight,
    viewportHeight: window.innerHeight
  });
})()"#;

const PAGE_TEXT: &str =
    "JSON.stringify({ text: document.body ? document.body.innerText : '' })";

const LINKS: &str = r#"JSON.stringify(Array.from(document.querySelectorAll('a[href]')).map(a => ({
  text: (a.innerText || a.textContent || '').trim(),
  rawHref: a.getAttribute('href') || '',
  href: a.href
})))"#;

const HEADINGS: &str = r#"JSON.stringify(Array.from(document.querySelectorAll('h1, h2, h3, h4, h5, h6'))
  .map(h => ({ level: Number(h.tagName.substring(1)), text: (h.innerText || '').trim() }))
  .filter(h => h.text.length > 0))"#;

const OUTLINE: &str = r#"(() => {
  const has = (sel) => document.querySelector(sel) !== null;
  const count = (sel) => document.querySelectorAll(sel).length;
  const first = document.querySelector('h1, h2, h3, h4, h5, h6');
  return JSON.stringify({
    title: document.title,
    hasNav: has('nav, [role="navigation"]'),
    hasSearch: has('input[type="search"], [role="search"], form[action*="search"]'),
    hasMain: has('main, [role="main"]'),
    hasSidebar: has('aside, [role="complementary"], .sidebar, #sidebar'),
    hasFooter: has('footer, [role="contentinfo"]'),
    counts: {
      headings: count('h1, h2, h3, h4, h5, h6'),
      paragraphs: count('p'),
      links: count('a[href]'),
      images: count('img'),
      forms: count('form'),
      inputs: count('input, textarea, select'),
      buttons: count('button, [role="button"]'),
      tables: count('table'),
      lists: count('ul, ol')
    },
    firstHeading: first ? (first.innerText || '').trim() : null
  });
})()"#;

const INTERACTIVE_ELEMENTS: &str = r#"(() => {
  const labelFor = (el) => {
    if (el.id) {
      const label = document.querySelector('label[for="' + CSS.escape(el.id) + '"]');
      if (label) return (label.innerText || '').trim();
    }
    const wrapping = el.closest('label');
    return wrapping ? (wrapping.innerText || '').trim() : '';
  };
  const buttons = Array.from(document.querySelectorAll(
    'button, input[type="submit"], input[type="button"], [role="button"]'
  )).map(b => ({
    text: (b.innerText || b.value || b.getAttribute('aria-label') || '').trim(),
    type: b.getAttribute('type') || '',
    id: b.id || ''
  }));
  const inputs = Array.from(document.querySelectorAll(
    'input:not([type="hidden"]):not([type="submit"]):not([type="button"]), textarea, select'
  )).map(i => ({
    tag: i.tagName.toLowerCase(),
    type: i.getAttribute('type') || '',
    name: i.getAttribute('name') || '',
    id: i.id || '',
    label: labelFor(i),
    placeholder: i.getAttribute('placeholder') || ''
  }));
  const forms = Array.from(document.forms).map(f => ({
    id: f.id || '',
    action: f.getAttribute('action') || '',
    method: (f.getAttribute('method') || 'get').toLowerCase(),
    fieldCount: f.elements.length
  }));
  return JSON.stringify({ buttons, inputs, forms });
})()"#;

const MAIN_CONTENT: &str = r#"(() => {
  for (const sel of __CANDIDATES__) {
    const el = document.querySelector(sel);
    if (el && (el.innerText || '').trim()) {
      return JSON.stringify({ selector: sel, text: el.innerText });
    }
  }
  return JSON.stringify({ selector: null, text: document.body ? document.body.innerText : '' });
})()"#;

const TABLES: &str = r#"JSON.stringify(Array.from(document.querySelectorAll('table')).map(t => {
  const rows = Array.from(t.rows).map(r => Array.from(r.cells).map(c => (c.innerText || '').trim()));
  const hasHeader = t.tHead !== null || (t.rows.length > 0 && t.rows[0].querySelector('th') !== null);
  return {
    caption: t.caption ? (t.caption.innerText || '').trim() : '',
    headers: hasHeader && rows.length > 0 ? rows[0] : [],
    rows: hasHeader ? rows.slice(1) : rows
  };
}))"#;

const IMAGES: &str = r#"JSON.stringify(Array.from(document.images).map(img => ({
  src: img.currentSrc || img.src || '',
  alt: img.alt || '',
  width: img.naturalWidth || img.width || 0,
  height: img.naturalHeight || img.height || 0
})).filter(img => img.src.length > 0))"#;

const PAGE_INFO: &str = r#"(() => {
  const meta = (name) => {
    const m = document.querySelector('meta[name="' + name + '"]');
    return m ? m.getAttribute('content') : null;
  };
  const canonical = document.querySelector('link[rel="canonical"]');
  return JSON.stringify({
    url: location.href,
    title: document.title,
    description: meta('description'),
    keywords: meta('keywords'),
    canonical: canonical ? canonical.href : null,
    language: document.documentElement.lang || null,
    charset: document.characterSet,
    viewport: meta('viewport')
  });
})()"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selector_is_escaped() {
        let script = PageScript::Click {
            selector: "a[title=\"x\"]'); alert(1); ('".to_string(),
        }
        .render();
        assert!(script.contains(r#"document.querySelector("a[title=\"x\"]'); alert(1); ('")"#));
        assert!(!script.contains("__SELECTOR__"));
    }

    #[test]
    fn test_fill_value_is_escaped() {
        let script = PageScript::FillInput {
            selector: "#q".to_string(),
            value: "line\nbreak \"quoted\"".to_string(),
        }
        .render();
        assert!(script.contains(r#"el.value = "line\nbreak \"quoted\"";"#));
    }

    #[test]
    fn test_placeholder_text_in_arguments_is_not_substituted() {
        let script = PageScript::FillInput {
            selector: "__VALUE__".to_string(),
            value: "v".to_string(),
        }
        .render();
        assert!(script.contains(r#"document.querySelector("__VALUE__")"#));
        assert!(script.contains(r#"el.value = "v";"#));
    }

    #[test]
    fn test_scroll_renders_direction_and_amount() {
        let script = PageScript::Scroll {
            direction: ScrollDirection::Down,
            amount: 750,
        }
        .render();
        assert!(script.contains("const amount = 750;"));
        assert!(script.contains("switch (\"down\")"));
    }

    #[test]
    fn test_main_content_candidates_in_order() {
        let script = PageScript::MainContent.render();
        let main = script.find("\"main\"").unwrap();
        let article = script.find("\"article\"").unwrap();
        let body = script.find("\".article-body\"").unwrap();
        assert!(main < article && article < body);
    }

    #[test]
    fn test_every_script_returns_serialized_value() {
        let scripts = [
            PageScript::OuterHtml,
            PageScript::Click { selector: "a".into() },
            PageScript::FillInput { selector: "a".into(), value: "v".into() },
            PageScript::SubmitForm { selector: "form".into() },
            PageScript::Scroll { direction: ScrollDirection::Top, amount: 0 },
            PageScript::PageText,
            PageScript::Links,
            PageScript::Headings,
            PageScript::Outline,
            PageScript::InteractiveElements,
            PageScript::MainContent,
            PageScript::Tables,
            PageScript::Images,
            PageScript::PageInfo,
        ];
        for script in scripts {
            let text = script.render();
            assert!(text.contains("JSON.stringify"), "{}", script.name());
            assert!(!text.contains("__"), "unfilled placeholder in {}", script.name());
        }
    }

    #[test]
    fn test_selector_only_for_element_scripts() {
        assert_eq!(PageScript::Click { selector: "#a".into() }.selector(), Some("#a"));
        assert_eq!(PageScript::PageText.selector(), None);
    }

    #[test]
    fn test_scroll_direction_deserialize() {
        let dir: ScrollDirection = serde_json::from_str("\"bottom\"").unwrap();
        assert_eq!(dir, ScrollDirection::Bottom);
        assert!(serde_json::from_str::<ScrollDirection>("\"left\"").is_err());
    }
}
