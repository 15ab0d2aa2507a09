//! HTML pretty-printing

use super::HtmlStage;

const BLOCK_ELEMENTS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "dd",
    "details",
    "div",
    "dl",
    "dt",
    "figcaption",
    "figure",
    "footer",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "ol",
    "p",
    "pre",
    "section",
    "summary",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[derive(Debug)]
enum Token<'a> {
    Open { name: String, raw: &'a str },
    Close { name: String, raw: &'a str },
    Text(&'a str),
}

impl Token<'_> {
    fn is_block(&self) -> bool {
        match self {
            Token::Open { name, .. } | Token::Close { name, .. } => is_block(name),
            Token::Text(_) => false,
        }
    }
}

/// Puts block elements on their own indented lines.
///
/// Only whitespace that HTML does not render is touched: whitespace next to
/// block tags is dropped, other whitespace-only runs become one space, and
/// `<pre>` contents are copied verbatim.
#[derive(Debug, Clone)]
pub struct Formatter {
    indent: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl Formatter {
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    pub fn format(&self, html: &str) -> String {
        let tokens = tokenize(html);
        let mut out = String::with_capacity(html.len() + html.len() / 4);
        // open block elements and whether each has a block child
        let mut stack: Vec<(String, bool)> = Vec::new();
        let mut in_pre = false;

        for (i, token) in tokens.iter().enumerate() {
            match token {
                Token::Close { name, raw } if in_pre && name != "pre" => out.push_str(raw),
                Token::Open { raw, .. } if in_pre => out.push_str(raw),
                Token::Text(text) if in_pre => out.push_str(text),

                Token::Open { name, raw } if is_block(name) => {
                    if !out.is_empty() {
                        out.push('\n');
                    }
                    self.push_indent(&mut out, stack.len());
                    out.push_str(raw);
                    if let Some(parent) = stack.last_mut() {
                        parent.1 = true;
                    }
                    if !is_void(name) && !raw.ends_with("/>") {
                        stack.push((name.clone(), false));
                        in_pre = name == "pre";
                    }
                }
                Token::Close { name, raw } if is_block(name) => {
                    if name == "pre" {
                        in_pre = false;
                    }
                    if let Some(pos) = stack.iter().rposition(|(open, _)| open == name) {
                        let has_block_child = stack[pos].1;
                        stack.truncate(pos);
                        if has_block_child {
                            out.push('\n');
                            self.push_indent(&mut out, stack.len());
                        }
                    }
                    out.push_str(raw);
                }

                Token::Text(text) if text.trim().is_empty() => {
                    let after_block = i == 0 || tokens[i - 1].is_block();
                    let before_block = tokens.get(i + 1).map_or(true, Token::is_block);
                    if !after_block && !before_block {
                        out.push(' ');
                    }
                }
                Token::Text(text) => out.push_str(text),
                Token::Open { raw, .. } | Token::Close { raw, .. } => out.push_str(raw),
            }
        }

        if !out.is_empty() {
            out.push('\n');
        }
        out
    }

    fn push_indent(&self, out: &mut String, depth: usize) {
        out.extend(std::iter::repeat(' ').take(depth * self.indent));
    }
}

impl HtmlStage for Formatter {
    fn name(&self) -> &'static str {
        "format"
    }

    fn apply(&self, html: String) -> String {
        self.format(&html)
    }
}

fn is_block(name: &str) -> bool {
    BLOCK_ELEMENTS.contains(&name)
}

fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

fn tokenize(html: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut pos = 0;

    while pos < html.len() {
        if html[pos..].starts_with('<') {
            if let Some(end) = tag_end(html, pos) {
                tokens.push(tag_token(&html[pos..end]));
                pos = end;
                continue;
            }
        }
        let skip = html[pos..].chars().next().map_or(1, char::len_utf8);
        let next = html[pos + skip..]
            .find('<')
            .map_or(html.len(), |offset| pos + skip + offset);
        tokens.push(Token::Text(&html[pos..next]));
        pos = next;
    }

    tokens
}

/// Byte offset just past the `>` closing the tag that starts at `start`
fn tag_end(html: &str, start: usize) -> Option<usize> {
    let mut quote: Option<char> = None;
    for (offset, c) in html[start + 1..].char_indices() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), _) => {}
            (None, '"') | (None, '\'') => quote = Some(c),
            (None, '>') => return Some(start + 1 + offset + 1),
            (None, '<') => return None,
            _ => {}
        }
    }
    None
}

fn tag_token(raw: &str) -> Token<'_> {
    let inner = &raw[1..raw.len() - 1];
    let (closing, inner) = match inner.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, inner),
    };
    if inner.starts_with('!') || inner.starts_with('?') {
        return Token::Text(raw);
    }

    let name: String = inner
        .chars()
        .take_while(|c| !c.is_whitespace() && *c != '/')
        .collect::<String>()
        .to_ascii_lowercase();
    if name.is_empty() {
        return Token::Text(raw);
    }

    if closing {
        Token::Close { name, raw }
    } else {
        Token::Open { name, raw }
    }
}
