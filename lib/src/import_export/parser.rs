//! Forgiving reader for Netscape bookmark files.
//!
//! [`Lexer`] walks the markup once and yields only the four tokens the
//! bookmark tree is made of; everything else (comments, `<DT>`, `<p>`,
//! `<META>`, stray text) is skipped. [`parse_bookmarks_html`] folds those
//! tokens into flat [`ParsedBookmark`]s with a stack of open lists and a
//! single pending folder name. Neither step can fail: unbalanced or
//! truncated markup simply yields fewer items.

use memchr::memchr;
use serde::{Deserialize, Serialize};

/// Bookmark read from an HTML export, with the folder names leading to it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedBookmark {
    pub folder_path: Vec<String>,
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `<H3>name</H3>`
    FolderHeading(String),
    /// `<A HREF="href">title</A>`
    Anchor { href: String, title: String },
    /// `<DL>`
    ListOpen,
    /// `</DL>`
    ListClose,
}

pub struct Lexer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Text from `start` up to (not including) the next `<`
    fn text_until_tag(&self, start: usize) -> &'a str {
        let rest = &self.input[start..];
        match memchr(b'<', rest.as_bytes()) {
            Some(end) => &rest[..end],
            None => rest,
        }
    }

    fn skip_comment(&mut self, start: usize) {
        let body = start + 4;
        self.pos = match self.input.get(body..).and_then(|rest| rest.find("-->")) {
            Some(end) => body + end + 3,
            None => self.input.len(),
        };
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            let bytes = self.input.as_bytes();
            let start = self.pos + memchr(b'<', bytes.get(self.pos..)?)?;

            if self.input[start..].starts_with("<!--") {
                self.skip_comment(start);
                continue;
            }

            let Some(tag) = read_tag(self.input, start) else {
                // '<' that does not open a tag, e.g. "a < b" in text
                self.pos = start + 1;
                continue;
            };
            let Some(end) = tag.end else {
                // unterminated tag at end of input
                self.pos = self.input.len();
                return None;
            };
            self.pos = end;

            if tag.name.eq_ignore_ascii_case("dl") {
                return Some(if tag.closing {
                    Token::ListClose
                } else {
                    Token::ListOpen
                });
            }
            if tag.closing {
                continue;
            }
            if tag.name.eq_ignore_ascii_case("h3") {
                let name = self.text_until_tag(end);
                self.pos = end + name.len();
                return Some(Token::FolderHeading(normalize_text(name)));
            }
            if tag.name.eq_ignore_ascii_case("a") {
                let title = self.text_until_tag(end);
                self.pos = end + title.len();
                let href = tag
                    .attributes
                    .iter()
                    .find(|(name, _)| name.eq_ignore_ascii_case("href"))
                    .map(|(_, value)| normalize_text(value))
                    .unwrap_or_default();
                return Some(Token::Anchor {
                    href,
                    title: normalize_text(title),
                });
            }
        }
    }
}

struct Tag<'a> {
    name: &'a str,
    closing: bool,
    attributes: Vec<(&'a str, &'a str)>,
    /// Byte offset just past `>`; `None` when the input ends first
    end: Option<usize>,
}

/// Read the tag starting at `input[start] == '<'`.
///
/// Returns `None` when no tag name follows the `<`.
fn read_tag(input: &str, start: usize) -> Option<Tag<'_>> {
    let bytes = input.as_bytes();
    let mut i = start + 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }

    let name_start = i;
    while i < bytes.len() && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name = &input[name_start..i];

    let mut attributes = Vec::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i) {
            None => {
                return Some(Tag {
                    name,
                    closing,
                    attributes,
                    end: None,
                })
            }
            Some(b'>') => {
                return Some(Tag {
                    name,
                    closing,
                    attributes,
                    end: Some(i + 1),
                })
            }
            Some(b'/') => {
                i += 1;
                continue;
            }
            Some(_) => {}
        }

        let attr_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && !matches!(bytes[i], b'=' | b'>' | b'/')
        {
            i += 1;
        }
        let attr_name = &input[attr_start..i];
        if attr_name.is_empty() {
            // lone '=' or similar junk
            i += 1;
            continue;
        }

        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if bytes.get(i) != Some(&b'=') {
            attributes.push((attr_name, ""));
            continue;
        }
        i += 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }

        let value = match bytes.get(i) {
            Some(&quote) if quote == b'"' || quote == b'\'' => {
                let value_start = i + 1;
                let rest = &bytes[value_start..];
                let close = memchr(quote, rest);
                // markup inside the quotes means the quote was never closed
                let runaway = match (close, memchr(b'<', rest)) {
                    (None, _) => true,
                    (Some(close), Some(lt)) => lt < close,
                    (Some(_), None) => false,
                };
                if runaway {
                    let Some(gt) = memchr(b'>', rest) else {
                        return Some(Tag {
                            name,
                            closing,
                            attributes,
                            end: None,
                        });
                    };
                    attributes.push((attr_name, &input[value_start..value_start + gt]));
                    return Some(Tag {
                        name,
                        closing,
                        attributes,
                        end: Some(value_start + gt + 1),
                    });
                }
                let len = close.unwrap_or(rest.len());
                i = value_start + len + 1;
                &input[value_start..value_start + len]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    i += 1;
                }
                &input[value_start..i]
            }
        };
        attributes.push((attr_name, value));
    }
}

fn normalize_text(raw: &str) -> String {
    decode_entities(raw.trim())
}

/// Decode `&amp; &lt; &gt; &quot; &#39;` and decimal `&#NNN;` references.
///
/// Anything else that looks like an entity is kept verbatim. Decoding is a
/// single pass, so `&amp;lt;` becomes `&lt;`, not `<`.
pub fn decode_entities(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(amp) = memchr(b'&', rest.as_bytes()) {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];

        let Some(semi) = memchr(b';', rest.as_bytes()) else {
            break;
        };
        let entity = &rest[1..semi];
        let decoded = match entity {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            _ => entity
                .strip_prefix('#')
                .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|digits| digits.parse::<u32>().ok())
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => {
                out.push(c);
                rest = &rest[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn is_script_url(url: &str) -> bool {
    url.get(..11)
        .is_some_and(|scheme| scheme.eq_ignore_ascii_case("javascript:"))
}

/// Flatten a Netscape bookmark file into bookmarks with their folder paths
pub fn parse_bookmarks_html(html: &str) -> Vec<ParsedBookmark> {
    let mut folder_stack: Vec<String> = Vec::new();
    let mut pending_folder: Option<String> = None;
    let mut items = Vec::new();

    for token in Lexer::new(html) {
        match token {
            Token::FolderHeading(name) => pending_folder = Some(name),
            Token::ListOpen => folder_stack.push(pending_folder.take().unwrap_or_default()),
            Token::ListClose => {
                folder_stack.pop();
                pending_folder = None;
            }
            Token::Anchor { href, title } => {
                if href.is_empty() || is_script_url(&href) {
                    log::debug!("Skipping anchor with unusable href {:?}", href);
                    continue;
                }
                let title = if title.is_empty() { href.clone() } else { title };
                items.push(ParsedBookmark {
                    folder_path: folder_stack
                        .iter()
                        .filter(|name| !name.is_empty())
                        .cloned()
                        .collect(),
                    title,
                    url: href,
                });
            }
        }
    }

    log::debug!("Parsed {} bookmark(s) from HTML", items.len());
    items
}
