//! Lenient HTML tag tokenizer.
//!
//! Splits input into start tags, end tags, text runs and comments. It never
//! fails: a `<` that does not open a well-formed tag (bad name, missing `>`,
//! unterminated comment) is reported as [`Token::Stray`] and scanning
//! resumes right after it, so the remainder comes out as text.

/// One lexical unit of the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token<'a> {
    /// `<name ...>` or `<name .../>`.
    StartTag {
        /// Lower-cased tag name.
        name: String,
        /// Exact source slice, attributes included.
        raw: &'a str,
    },
    /// `</name>`.
    EndTag {
        /// Lower-cased tag name.
        name: String,
        /// Exact source slice.
        raw: &'a str,
    },
    /// Character data between tags.
    Text(&'a str),
    /// `<!-- ... -->`, `<!DOCTYPE ...>` or `<? ... >`.
    Comment(&'a str),
    /// A `<` that does not start a tag.
    Stray,
}

/// Streaming tokenizer over a borrowed string.
#[derive(Debug, Clone)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a tokenizer positioned at the start of `input`.
    #[must_use]
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn markup(&self, rest: &'a str) -> Option<(Token<'a>, usize)> {
        if let Some(body) = rest.strip_prefix("<!--") {
            let end = body.find("-->")?;
            let len = 4 + end + 3;
            return Some((Token::Comment(rest.get(..len)?), len));
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            let len = rest.find('>')? + 1;
            return Some((Token::Comment(rest.get(..len)?), len));
        }

        let (closing, name_start) = if rest.starts_with("</") { (true, 2) } else { (false, 1) };
        let after = rest.get(name_start..)?;
        if !after.starts_with(|c: char| c.is_ascii_alphabetic()) {
            return None;
        }
        let name_len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-'))
            .unwrap_or(after.len());
        let name = after.get(..name_len)?.to_ascii_lowercase();

        let attrs = after.get(name_len..)?;
        if !attrs.is_empty() && !attrs.starts_with(|c: char| c.is_whitespace() || c == '>' || c == '/') {
            return None;
        }
        let len = name_start + name_len + tag_end(attrs)? + 1;
        let raw = rest.get(..len)?;

        let token = if closing {
            Token::EndTag { name, raw }
        } else {
            Token::StartTag { name, raw }
        };
        Some((token, len))
    }
}

/// Byte offset of the `>` closing a tag, skipping quoted attribute values.
fn tag_end(attrs: &str) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (i, c) in attrs.char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"' | '\'') => quote = Some(c),
            (None, '>') => return Some(i),
            (None, '<') => return None,
            (None, _) => {}
        }
    }
    None
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let rest = self.input.get(self.pos..).filter(|r| !r.is_empty())?;

        if rest.starts_with('<') {
            return match self.markup(rest) {
                Some((token, len)) => {
                    self.pos += len;
                    Some(token)
                }
                None => {
                    self.pos += 1;
                    Some(Token::Stray)
                }
            };
        }

        let len = rest.find('<').unwrap_or(rest.len());
        self.pos += len;
        rest.get(..len).map(Token::Text)
    }
}
