//! Markup handling for outgoing messages.
//!
//! Rendered messages mix the sink's own HTML subset with rich text copied
//! from card descriptions and comments. [`sanitize`] reduces the result to
//! what the sink accepts; [`escape_text`] and [`escape_attr`] protect
//! plain-text values before they are embedded.

pub mod sanitizer;
pub mod tokenizer;

pub use sanitizer::{ALLOWED_TAGS, sanitize};

/// Escapes `&`, `<` and `>` for use as character data.
#[must_use]
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
    out
}

/// Escapes a value for a double-quoted attribute.
#[must_use]
pub fn escape_attr(s: &str) -> String {
    escape_text(s).replace('"', "&quot;")
}
