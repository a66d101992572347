//! Allow-list filter from arbitrary HTML to the Telegram HTML subset.
//!
//! Single pass over [`Tokenizer`] events with no nesting stack: allowed tags
//! are re-emitted byte for byte, list and paragraph structure is flattened
//! to plain text, and every other tag disappears while its text stays.

use super::tokenizer::{Token, Tokenizer};

/// Inline tags the sink understands. Emitted verbatim, attributes included.
pub const ALLOWED_TAGS: &[&str] = &[
    "b",
    "strong",
    "i",
    "em",
    "u",
    "ins",
    "s",
    "strike",
    "del",
    "span",
    "tg-spoiler",
    "a",
    "code",
    "pre",
    "blockquote",
    "tg-emoji",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagClass {
    Allowed,
    ListContainer,
    ListItem,
    Paragraph,
    LineBreak,
    Dropped,
}

fn classify(name: &str) -> TagClass {
    match name {
        "ul" | "ol" => TagClass::ListContainer,
        "li" => TagClass::ListItem,
        "p" => TagClass::Paragraph,
        "br" => TagClass::LineBreak,
        _ if ALLOWED_TAGS.contains(&name) => TagClass::Allowed,
        _ => TagClass::Dropped,
    }
}

/// Reduces `input` to the sink's supported markup.
///
/// Never fails. Running it on its own output returns the same string.
#[must_use]
pub fn sanitize(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for token in Tokenizer::new(input) {
        match token {
            Token::Text(text) => push_text(&mut out, text),
            Token::Stray => out.push_str("&lt;"),
            Token::Comment(_) => {}
            Token::StartTag { name, raw } => match classify(&name) {
                TagClass::Allowed => out.push_str(raw),
                TagClass::ListItem => out.push_str("- "),
                TagClass::LineBreak => out.push('\n'),
                TagClass::ListContainer | TagClass::Paragraph | TagClass::Dropped => {}
            },
            Token::EndTag { name, raw } => match classify(&name) {
                TagClass::Allowed => out.push_str(raw),
                TagClass::ListItem | TagClass::Paragraph | TagClass::LineBreak => out.push('\n'),
                TagClass::ListContainer | TagClass::Dropped => {}
            },
        }
    }
    out
}

/// Copies character data, escaping `>` and any `&` that does not begin an
/// entity reference. Existing entities pass through untouched.
fn push_text(out: &mut String, text: &str) {
    let mut rest = text;
    while let Some(idx) = rest.find(['&', '>']) {
        let (head, tail) = rest.split_at(idx);
        out.push_str(head);
        if tail.starts_with('>') {
            out.push_str("&gt;");
        } else if starts_with_entity(tail) {
            out.push('&');
        } else {
            out.push_str("&amp;");
        }
        rest = tail.get(1..).unwrap_or_default();
    }
    out.push_str(rest);
}

/// `&name;`, `&#123;` or `&#x1F;` at the start of `s`.
fn starts_with_entity(s: &str) -> bool {
    let Some(body) = s.strip_prefix('&') else {
        return false;
    };
    let Some(end) = body.find(';') else {
        return false;
    };
    let name = body.get(..end).unwrap_or_default();
    if let Some(num) = name.strip_prefix('#') {
        return match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        };
    }
    !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric())
}
