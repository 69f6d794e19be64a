use std::sync::LazyLock;

use regex::Regex;
use url::Url;

use crate::chat::message::Message;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("bold pattern is valid"));
static ITALIC: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*(.*?)\*").expect("italic pattern is valid"));

/// Applies the widget's lightweight markdown: `**bold**`, `*italic*` and line breaks.
///
/// The input is not escaped; use [`render_message`] for untrusted text.
pub fn format_message(text: &str) -> String {
    let text = BOLD.replace_all(text, "<strong>$1</strong>");
    let text = ITALIC.replace_all(&text, "<em>$1</em>");
    text.replace('\n', "<br>")
}

/// HTML for one chat bubble: escaped and formatted text followed by a sources footer when the
/// message carries grounding sources.
pub fn render_message(message: &Message) -> String {
    let mut html = format_message(&escape_html(&message.text));
    if message.sources.is_empty() {
        return html;
    }

    let links: Vec<String> = message
        .sources
        .iter()
        .map(|source| {
            if is_web_link(&source.uri) {
                format!(
                    r#"<a href="{}" target="_blank" rel="noopener noreferrer">{}</a>"#,
                    escape_html(&source.uri),
                    escape_html(&source.title)
                )
            } else {
                escape_html(&source.title)
            }
        })
        .collect();
    html.push_str(r#"<div class="sources">Sources: "#);
    html.push_str(&links.join(", "));
    html.push_str("</div>");
    html
}

/// Only `http` and `https` sources become links.
fn is_web_link(uri: &str) -> bool {
    Url::parse(uri).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
