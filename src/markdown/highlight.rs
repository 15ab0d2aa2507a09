//! Syntax highlighting for fenced code blocks

use pulldown_cmark::{CodeBlockKind, CowStr, Event, Tag, TagEnd};
use syntect::html::{ClassStyle, ClassedHTMLGenerator};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::{html_escape, EventStage};

/// Prefix for highlight classes, e.g. `hljs-keyword`, `hljs-string`
pub const CLASS_PREFIX: &str = "hljs-";

/// Code highlighter emitting class-based spans
pub struct Highlighter {
    syntax_set: SyntaxSet,
}

impl Highlighter {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
        }
    }

    /// Highlight a code block. Unknown or missing languages are escaped and
    /// passed through without highlighting.
    pub fn highlight(&self, code: &str, lang: Option<&str>) -> String {
        let Some(lang) = lang else {
            return plain_block(code, None);
        };

        let Some(syntax) = self.find_syntax(lang) else {
            tracing::debug!("No syntax for language {:?}, leaving unhighlighted", lang);
            return plain_block(code, Some(lang));
        };

        let mut generator = ClassedHTMLGenerator::new_with_class_style(
            syntax,
            &self.syntax_set,
            ClassStyle::SpacedPrefixed {
                prefix: CLASS_PREFIX,
            },
        );
        for line in LinesWithEndings::from(code) {
            if let Err(e) = generator.parse_html_for_line_which_includes_newline(line) {
                tracing::warn!("Highlighting {} failed: {}", lang, e);
                return plain_block(code, Some(lang));
            }
        }

        format!(
            r#"<pre><code class="hljs language-{}">{}</code></pre>"#,
            html_escape(lang),
            generator.finalize()
        )
    }

    fn find_syntax(&self, lang: &str) -> Option<&SyntaxReference> {
        let lang = lang.to_ascii_lowercase();
        let token = match lang.as_str() {
            "jsx" => "js",
            "shell" | "console" => "sh",
            "md" => "markdown",
            other => other,
        };
        self.syntax_set
            .find_syntax_by_token(token)
            .filter(|syntax| syntax.name != "Plain Text")
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStage for Highlighter {
    fn name(&self) -> &'static str {
        "highlight"
    }

    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let mut out = Vec::with_capacity(events.len());
        // language and accumulated text of the code block being read
        let mut block: Option<(Option<String>, String)> = None;

        for event in events {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    let lang = match kind {
                        CodeBlockKind::Fenced(info) => {
                            info.split_whitespace().next().map(str::to_string)
                        }
                        CodeBlockKind::Indented => None,
                    };
                    block = Some((lang, String::new()));
                }
                Event::End(TagEnd::CodeBlock) => {
                    if let Some((lang, code)) = block.take() {
                        let highlighted = self.highlight(&code, lang.as_deref());
                        out.push(Event::Html(CowStr::from(highlighted)));
                    }
                }
                Event::Text(text) if block.is_some() => {
                    if let Some((_, code)) = block.as_mut() {
                        code.push_str(&text);
                    }
                }
                other => out.push(other),
            }
        }

        out
    }
}

fn plain_block(code: &str, lang: Option<&str>) -> String {
    let class = lang
        .map(|l| format!(r#" class="language-{}""#, html_escape(l)))
        .unwrap_or_default();
    format!("<pre><code{}>{}</code></pre>", class, html_escape(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::Parser;

    #[test]
    fn test_highlight_javascript() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("// note\nconst x = \"s\";\n", Some("js"));
        assert!(html.starts_with(r#"<pre><code class="hljs language-js">"#));
        assert!(html.contains("hljs-comment"));
        assert!(html.contains("hljs-string"));
        assert!(html.ends_with("</code></pre>"));
    }

    #[test]
    fn test_language_aliases() {
        let highlighter = Highlighter::new();
        assert!(highlighter.find_syntax("jsx").is_some());
        assert!(highlighter.find_syntax("shell").is_some());
        assert!(highlighter.find_syntax("md").is_some());
        assert!(highlighter.find_syntax("CSS").is_some());
    }

    #[test]
    fn test_unknown_language_passes_through() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("a < b", Some("unknown_lang_xyz"));
        assert_eq!(
            html,
            r#"<pre><code class="language-unknown_lang_xyz">a &lt; b</code></pre>"#
        );
    }

    #[test]
    fn test_no_language() {
        let highlighter = Highlighter::new();
        let html = highlighter.highlight("<b>plain</b>\n", None);
        assert_eq!(html, "<pre><code>&lt;b&gt;plain&lt;/b&gt;\n</code></pre>");
    }

    #[test]
    fn test_stage_replaces_code_blocks() {
        let highlighter = Highlighter::new();
        let events: Vec<Event> =
            Parser::new("before\n\n```css title=x\na { color: red; }\n```\n\nafter").collect();
        let events = highlighter.apply(events);

        let html_events: Vec<_> = events
            .iter()
            .filter_map(|e| match e {
                Event::Html(html) => Some(html.to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(html_events.len(), 1);
        assert!(html_events[0].contains("language-css"));
        assert!(!events
            .iter()
            .any(|e| matches!(e, Event::Start(Tag::CodeBlock(_)))));
        assert!(events
            .iter()
            .any(|e| matches!(e, Event::Text(t) if t.as_ref() == "after")));
    }

    #[test]
    fn test_indented_code_is_escaped() {
        let highlighter = Highlighter::new();
        let events: Vec<Event> = Parser::new("    <script>x</script>\n").collect();
        let events = highlighter.apply(events);
        assert!(matches!(
            &events[0],
            Event::Html(html) if html.as_ref() == "<pre><code>&lt;script&gt;x&lt;/script&gt;\n</code></pre>"
        ));
    }
}
