//! Markdown rendering pipeline
//!
//! Markdown is parsed into `pulldown-cmark` events and pushed through an
//! ordered chain of stages:
//!
//! 1. table of contents (events)
//! 2. syntax highlighting (events)
//! 3. conversion to HTML
//! 4. sanitization against an allow-list, re-serialized
//! 5. heading anchors
//! 6. pretty formatting
//!
//! Every stage is a pure transformation behind [`EventStage`] or
//! [`HtmlStage`], so stages can be tested on their own.

mod format;
mod highlight;
mod sanitize;
mod slug;
mod toc;

use pulldown_cmark::{html, Event, Options, Parser};

use crate::config::SiteConfig;

pub use format::Formatter;
pub use highlight::Highlighter;
pub use sanitize::Sanitizer;
pub use slug::{SlugStage, Slugger};
pub use toc::TocStage;

/// A transformation over the parsed markdown event stream
pub trait EventStage {
    fn name(&self) -> &'static str;
    fn apply<'a>(&self, events: Vec<Event<'a>>) -> Vec<Event<'a>>;
}

/// A transformation over serialized HTML
pub trait HtmlStage {
    fn name(&self) -> &'static str;
    fn apply(&self, html: String) -> String;
}

/// Markdown renderer producing sanitized HTML
pub struct MarkdownRenderer {
    options: Options,
    event_stages: Vec<Box<dyn EventStage>>,
    html_stages: Vec<Box<dyn HtmlStage>>,
}

impl MarkdownRenderer {
    /// Create a renderer with the default pipeline
    pub fn new() -> Self {
        Self::from_config(&SiteConfig::default())
    }

    /// Create the full pipeline from site settings
    pub fn from_config(config: &SiteConfig) -> Self {
        let mut renderer = Self::empty();
        renderer.push_event_stage(TocStage::new(config.toc.clone()));
        if config.highlight.enable {
            renderer.push_event_stage(Highlighter::new());
        }
        renderer.push_html_stage(Sanitizer::new());
        renderer.push_html_stage(SlugStage);
        renderer.push_html_stage(Formatter::default());
        renderer
    }

    /// A renderer with no stages: plain markdown to unsanitized HTML
    pub fn empty() -> Self {
        // No YAML metadata blocks; front-matter is split off before rendering
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS;
        Self {
            options,
            event_stages: Vec::new(),
            html_stages: Vec::new(),
        }
    }

    pub fn push_event_stage(&mut self, stage: impl EventStage + 'static) -> &mut Self {
        self.event_stages.push(Box::new(stage));
        self
    }

    pub fn push_html_stage(&mut self, stage: impl HtmlStage + 'static) -> &mut Self {
        self.html_stages.push(Box::new(stage));
        self
    }

    /// Names of the configured stages, in order
    pub fn stages(&self) -> Vec<&'static str> {
        self.event_stages
            .iter()
            .map(|s| s.name())
            .chain(std::iter::once("html"))
            .chain(self.html_stages.iter().map(|s| s.name()))
            .collect()
    }

    /// Render markdown to HTML.
    ///
    /// Never fails: the parser accepts any input and renders it best-effort.
    pub fn render(&self, markdown: &str) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, self.options).collect();
        let events = self
            .event_stages
            .iter()
            .fold(events, |events, stage| stage.apply(events));

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        self.html_stages
            .iter()
            .fold(html_output, |html, stage| stage.apply(html))
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Simple HTML escaping
pub(crate) fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
