//! HTML minimization
//!
//! Rendered product pages are large and mostly noise. [`minimize`] keeps the
//! element structure, text, and the attributes that downstream extraction
//! actually reads, and drops everything else.
//!
//! # Pipeline
//!
//! 1. Parse with an HTML5 parser (tolerates malformed and unbalanced markup)
//! 2. Render the tree back to text, skipping:
//!    - `svg`, `style`, `form`, `button`, `script`, `select`, `link`, `noscript`
//!      (and `plaintext`)
//!    - comments (including conditional and multi-line ones)
//!    - any element whose `src` is a `data:` URI
//!    - every attribute other than `src`, `href` and `title`, except on `meta`
//!      (kept attributes are written in name order)
//! 3. Drop tabs and newlines, and whitespace between adjacent tags
//! 4. Abbreviate tags (see [`ABBREVIATIONS`])
//!
//! Step 4 is a plain text substitution on the rendered output. Selectors run
//! against minimized HTML must use the abbreviated names: `d` for `div` and
//! `s` for `span`. Only bare tags are rewritten; a `div` that kept a `title`
//! attribute stays `<div title="...">`. The substitution does not know about
//! attribute values either, so `title="<div>x</div>"` comes out as
//! `title="<d>x</d>"`.
//!
//! The doctype is written with its public and system identifiers so the
//! output parses in the same document mode as the input.

use regex::Regex;
use scraper::node::{Doctype, Node};
use scraper::{ElementRef, Html};
use std::sync::OnceLock;

/// Elements removed together with all of their content
///
/// `plaintext` has no end tag, so it is removed as well.
const REMOVED_ELEMENTS: &[&str] = &[
    "svg", "style", "form", "button", "script", "select", "link", "noscript", "plaintext",
];

/// Attributes that survive minimization
const KEPT_ATTRIBUTES: &[&str] = &["src", "href", "title"];

/// Elements whose attributes are all kept
const METADATA_ELEMENTS: &[&str] = &["meta"];

/// Elements that never have content or an end tag
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "keygen", "link", "meta",
    "param", "source", "track", "wbr",
];

/// Elements whose text content is written without escaping
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "style", "script", "xmp", "iframe", "noembed", "noframes",
];

/// Tag abbreviations applied to the rendered output, as `(from, to)` pairs
pub const ABBREVIATIONS: &[(&str, &str)] = &[
    ("<span>", "<s>"),
    ("</span>", "</s>"),
    ("<div>", "<d>"),
    ("</div>", "</d>"),
];

/// Minimizes HTML content
///
/// Empty input yields an empty string. The output is deterministic and
/// running it through `minimize` again leaves it unchanged.
///
/// # Example
///
/// ```
/// use shop_trawler::html::minimize;
///
/// let html = r#"<div class="card"><script>track()</script><span>Drone</span></div>"#;
/// assert_eq!(
///     minimize(html),
///     "<html><head></head><body><d><s>Drone</s></d></body></html>"
/// );
/// ```
pub fn minimize(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }

    let document = Html::parse_document(html);

    let mut rendered = String::with_capacity(html.len() / 2);
    for child in document.tree.root().children() {
        match child.value() {
            Node::Doctype(doctype) => render_doctype(doctype, &mut rendered),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    render_element(element, &mut rendered);
                }
            }
            _ => {}
        }
    }

    let collapsed = collapse_whitespace(&rendered);
    abbreviate_tags(&collapsed).trim().to_string()
}

/// Writes the doctype with its public and system identifiers
///
/// The identifiers decide quirks mode, so dropping them would change how
/// the output parses.
fn render_doctype(doctype: &Doctype, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(doctype.name());

    let public_id = doctype.public_id();
    let system_id = doctype.system_id();
    if !public_id.is_empty() {
        out.push_str(" PUBLIC ");
        push_quoted(public_id, out);
        if !system_id.is_empty() {
            out.push(' ');
            push_quoted(system_id, out);
        }
    } else if !system_id.is_empty() {
        out.push_str(" SYSTEM ");
        push_quoted(system_id, out);
    }

    out.push('>');
}

fn push_quoted(id: &str, out: &mut String) {
    let quote = if id.contains('"') { '\'' } else { '"' };
    out.push(quote);
    out.push_str(id);
    out.push(quote);
}

/// Returns true if the element and its subtree are dropped
fn is_removed(element: ElementRef<'_>) -> bool {
    let value = element.value();
    if REMOVED_ELEMENTS.contains(&value.name()) {
        return true;
    }

    value
        .attr("src")
        .is_some_and(|src| src.trim_start().to_ascii_lowercase().starts_with("data:"))
}

fn render_element(element: ElementRef<'_>, out: &mut String) {
    if is_removed(element) {
        return;
    }

    let value = element.value();
    let name = value.name();
    let keep_all = METADATA_ELEMENTS.contains(&name);

    // Attribute storage order is not stable across parses, so sort by name
    let mut attrs: Vec<(&str, &str)> = value
        .attrs()
        .filter(|(attr, _)| keep_all || KEPT_ATTRIBUTES.contains(attr))
        .collect();
    attrs.sort_unstable();

    out.push('<');
    out.push_str(name);
    for (attr, attr_value) in attrs {
        out.push(' ');
        out.push_str(attr);
        out.push_str("=\"");
        escape_into(attr_value, true, out);
        out.push('"');
    }
    out.push('>');

    if VOID_ELEMENTS.contains(&name) {
        return;
    }

    let raw_text = RAW_TEXT_ELEMENTS.contains(&name);
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                if raw_text {
                    out.push_str(&text.text);
                } else {
                    escape_into(&text.text, false, out);
                }
            }
            Node::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    render_element(child_element, out);
                }
            }
            // Comments, processing instructions and stray doctypes are dropped
            _ => {}
        }
    }

    out.push_str("</");
    out.push_str(name);
    out.push('>');
}

/// Escapes text the way an HTML serializer does
fn escape_into(text: &str, attribute_mode: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            '"' if attribute_mode => out.push_str("&quot;"),
            '<' if !attribute_mode => out.push_str("&lt;"),
            '>' if !attribute_mode => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

fn collapse_whitespace(rendered: &str) -> String {
    static BETWEEN_TAGS: OnceLock<Regex> = OnceLock::new();
    let between_tags = BETWEEN_TAGS.get_or_init(|| Regex::new(r">\s+<").expect("valid regex"));

    let without_breaks: String = rendered.chars().filter(|c| *c != '\t' && *c != '\n').collect();
    between_tags.replace_all(&without_breaks, "><").into_owned()
}

fn abbreviate_tags(rendered: &str) -> String {
    ABBREVIATIONS
        .iter()
        .fold(rendered.to_string(), |acc, (from, to)| acc.replace(from, to))
}
