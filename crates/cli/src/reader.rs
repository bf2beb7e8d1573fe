//! Policy document reading.
//!
//! Plain text and markdown pass through unchanged; HTML is parsed and
//! reduced to its text. Anything else is a fatal ingest error rather than a
//! silent skip, since an unread policy would quietly reject every claim.

use claimlens_core::{Error, Result};
use scraper::{Html, Selector};
use std::path::Path;

/// Read a policy document into plain text, keyed by file extension
pub fn read_document(path: &Path) -> Result<String> {
  let ext = path
    .extension()
    .and_then(|e| e.to_str())
    .map(str::to_lowercase)
    .unwrap_or_default();

  match ext.as_str() {
    "txt" | "md" => Ok(std::fs::read_to_string(path)?),
    "html" | "htm" => {
      let raw = std::fs::read_to_string(path)?;
      Ok(html_to_text(&raw))
    }
    _ => Err(Error::Document(format!("Unsupported file type: .{}", ext))),
  }
}

/// Extract the readable text of an HTML document.
///
/// Walks the parsed body, dropping script/style/noscript content and turning
/// block-level elements into line breaks so clauses stay separated.
fn html_to_text(html: &str) -> String {
  let document = Html::parse_document(html);

  let body = Selector::parse("body")
    .ok()
    .and_then(|sel| document.select(&sel).next());

  let text = match body {
    Some(body) => element_text(&body),
    None => document.root_element().text().collect::<String>(),
  };

  normalize(&text)
}

fn element_text(element: &scraper::ElementRef) -> String {
  let mut text = String::new();

  for node in element.children() {
    if let Some(el) = scraper::ElementRef::wrap(node) {
      let tag = el.value().name();

      if matches!(tag, "script" | "style" | "noscript" | "head") {
        continue;
      }

      let block = matches!(
        tag,
        "p" | "div" | "h1" | "h2" | "h3" | "h4" | "h5" | "h6" | "br" | "li" | "tr" | "td" | "th"
      );
      if block && !text.is_empty() && !text.ends_with('\n') {
        text.push('\n');
      }

      text.push_str(&element_text(&el));

      if block {
        text.push('\n');
      }
    } else if let Some(txt) = node.value().as_text() {
      text.push_str(txt);
    }
  }

  text
}

fn normalize(text: &str) -> String {
  text
    .lines()
    .map(str::trim)
    .filter(|l| !l.is_empty())
    .collect::<Vec<_>>()
    .join("\n")
}
