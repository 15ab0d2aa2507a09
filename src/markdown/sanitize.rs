//! Allow-list HTML sanitization

use ammonia::Builder;
use std::borrow::Cow;

use super::HtmlStage;

/// Classes permitted on `<code>`
const CODE_CLASSES: &[&str] = &[
    "hljs",
    "language-js",
    "language-jsx",
    "language-css",
    "language-md",
    "language-shell",
];

/// Highlight classes permitted on `<span>`
const SPAN_CLASSES: &[&str] = &[
    "hljs-addition",
    "hljs-attr",
    "hljs-attribute",
    "hljs-built_in",
    "hljs-bullet",
    "hljs-char",
    "hljs-code",
    "hljs-comment",
    "hljs-deletion",
    "hljs-doctag",
    "hljs-emphasis",
    "hljs-formula",
    "hljs-keyword",
    "hljs-link",
    "hljs-literal",
    "hljs-meta",
    "hljs-name",
    "hljs-number",
    "hljs-operator",
    "hljs-params",
    "hljs-property",
    "hljs-punctuation",
    "hljs-quote",
    "hljs-regexp",
    "hljs-section",
    "hljs-selector-attr",
    "hljs-selector-class",
    "hljs-selector-id",
    "hljs-selector-pseudo",
    "hljs-selector-tag",
    "hljs-string",
    "hljs-strong",
    "hljs-subst",
    "hljs-symbol",
    "hljs-tag",
    "hljs-template-tag",
    "hljs-template-variable",
    "hljs-title",
    "hljs-type",
    "hljs-variable",
];

/// Strips every element and attribute outside ammonia's safe defaults plus
/// the highlight classes above. Parses and re-serializes the document.
///
/// A `class` attribute left with no permitted class is removed entirely.
pub struct Sanitizer {
    builder: Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = Builder::default();
        builder
            .add_allowed_classes("code", CODE_CLASSES)
            .add_allowed_classes("span", SPAN_CLASSES)
            .attribute_filter(|element, attribute, value| {
                if attribute != "class" {
                    return Some(Cow::Borrowed(value));
                }
                filter_classes(element, value)
            });
        Self { builder }
    }

    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

/// Keep only the permitted classes of a `class` value; `None` drops the attribute
fn filter_classes<'a>(element: &str, value: &'a str) -> Option<Cow<'a, str>> {
    let allowed = match element {
        "code" => CODE_CLASSES,
        "span" => SPAN_CLASSES,
        _ => return Some(Cow::Borrowed(value)),
    };
    let kept: Vec<&str> = value
        .split_ascii_whitespace()
        .filter(|class| allowed.contains(class))
        .collect();
    if kept.is_empty() {
        None
    } else {
        Some(Cow::Owned(kept.join(" ")))
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl HtmlStage for Sanitizer {
    fn name(&self) -> &'static str {
        "sanitize"
    }

    fn apply(&self, html: String) -> String {
        self.clean(&html)
    }
}
