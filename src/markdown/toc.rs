//! Table-of-contents generation

use lazy_static::lazy_static;
use pulldown_cmark::{CowStr, Event, LinkType, Tag, TagEnd};
use regex::Regex;
use std::collections::HashMap;

use super::slug::Slugger;
use super::EventStage;
use crate::config::TocConfig;

lazy_static! {
    static ref TOC_HEADING: Regex =
        Regex::new(r"(?i)^(table[ -]of[ -])?contents?$|^toc$").expect("valid toc regex");
}

/// A heading found in the event stream
#[derive(Debug)]
struct Heading {
    /// Index of the `Start(Heading)` event
    start: usize,
    /// Index of the `End(Heading)` event
    end: usize,
    level: u8,
    /// Display text, trimmed
    text: String,
    slug: String,
}

/// Inserts a linked list of headings under a "Contents" / "Table of contents" / "TOC" heading
#[derive(Debug, Clone, Default)]
pub struct TocStage {
    config: TocConfig,
}

impl TocStage {
    pub fn new(config: TocConfig) -> Self {
        Self { config }
    }

    /// Headings listed in the table: within `max_depth` and not empty
    fn is_entry(&self, heading: &Heading) -> bool {
        heading.level <= self.config.max_depth && !heading.text.is_empty()
    }

    fn build_list<'a>(&self, entries: &[&Heading]) -> Vec<Event<'a>> {
        let base = entries.iter().map(|h| h.level).min().unwrap_or(1);
        let mut out = Vec::new();
        // one slot per open list: whether it currently has an open item
        let mut open: Vec<bool> = Vec::new();

        for heading in entries {
            // a heading can only nest one level below the previous one
            let depth = usize::from(heading.level - base).min(open.len());

            while open.len() > depth + 1 {
                self.close_list(&mut out, &mut open);
            }
            while open.len() < depth + 1 {
                if let Some(item_open) = open.last_mut() {
                    if !*item_open {
                        out.push(Event::Start(Tag::Item));
                        *item_open = true;
                    }
                }
                out.push(Event::Start(Tag::List(self.config.ordered.then_some(1))));
                open.push(false);
            }

            if let Some(item_open) = open.last_mut() {
                if *item_open {
                    out.push(Event::End(TagEnd::Item));
                }
                *item_open = true;
            }
            out.push(Event::Start(Tag::Item));
            self.push_link(&mut out, heading);
        }

        while !open.is_empty() {
            self.close_list(&mut out, &mut open);
        }
        out
    }

    fn close_list<'a>(&self, out: &mut Vec<Event<'a>>, open: &mut Vec<bool>) {
        if open.pop() == Some(true) {
            out.push(Event::End(TagEnd::Item));
        }
        out.push(Event::End(TagEnd::List(self.config.ordered)));
    }

    fn push_link<'a>(&self, out: &mut Vec<Event<'a>>, heading: &Heading) {
        if !self.config.tight {
            out.push(Event::Start(Tag::Paragraph));
        }
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Inline,
            dest_url: CowStr::from(format!("#{}", heading.slug)),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(CowStr::from(heading.text.clone())));
        out.push(Event::End(TagEnd::Link));
        if !self.config.tight {
            out.push(Event::End(TagEnd::Paragraph));
        }
    }
}

impl EventStage for TocStage {
    fn name(&self) -> &'static str {
        "toc"
    }

    fn apply<'a>(&self, mut events: Vec<Event<'a>>) -> Vec<Event<'a>> {
        let headings = collect_headings(&events);
        let Some(marker) = headings
            .iter()
            .position(|h| TOC_HEADING.is_match(h.text.trim()))
        else {
            return events;
        };

        // The section ends at the next heading of the same or higher rank
        let marker_level = headings[marker].level;
        let Some(closing) = headings[marker + 1..]
            .iter()
            .position(|h| h.level <= marker_level)
            .map(|offset| marker + 1 + offset)
        else {
            return events;
        };
        if !headings[closing..].iter().any(|h| self.is_entry(h)) {
            return events;
        }

        let list_at = headings[marker].end + 1;
        events.drain(list_at..headings[closing].start);

        // Slugs are taken again so they match the headings left in the document
        let headings = collect_headings(&events);
        let entries: Vec<&Heading> = headings[marker + 1..]
            .iter()
            .filter(|h| self.is_entry(h))
            .collect();
        let tail = events.split_off(list_at);
        events.extend(self.build_list(&entries));
        events.extend(tail);
        events
    }
}

/// Numbers footnotes in order of first appearance, as the HTML writer does
#[derive(Debug, Default)]
struct FootnoteNumbers {
    numbers: HashMap<String, usize>,
}

impl FootnoteNumbers {
    fn number(&mut self, label: &str) -> usize {
        let next = self.numbers.len() + 1;
        *self.numbers.entry(label.to_string()).or_insert(next)
    }
}

/// A heading being read: start index, level, display text, text its id is derived from
type OpenHeading = (usize, u8, String, String);

/// Collect headings with their plain text and anchor slugs, in document order.
///
/// The slug text is the text the rendered heading will contain: image alt
/// text is left out and footnote references count as their number.
fn collect_headings(events: &[Event<'_>]) -> Vec<Heading> {
    let mut headings = Vec::new();
    let mut slugger = Slugger::default();
    let mut footnotes = FootnoteNumbers::default();
    let mut current: Option<OpenHeading> = None;
    let mut image_depth = 0usize;

    for (i, event) in events.iter().enumerate() {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                current = Some((i, *level as u8, String::new(), String::new()));
            }
            Event::Start(Tag::Image { .. }) => image_depth += 1,
            Event::End(TagEnd::Image) => image_depth = image_depth.saturating_sub(1),
            Event::Start(Tag::FootnoteDefinition(label)) => {
                footnotes.number(label);
            }
            Event::FootnoteReference(label) => {
                let number = footnotes.number(label);
                if let Some((_, _, _, slug_text)) = current.as_mut() {
                    slug_text.push_str(&number.to_string());
                }
            }
            Event::Text(text) | Event::Code(text) if image_depth == 0 => {
                if let Some((_, _, display, slug_text)) = current.as_mut() {
                    display.push_str(text);
                    slug_text.push_str(text);
                }
            }
            Event::SoftBreak | Event::HardBreak if image_depth == 0 => {
                if let Some((_, _, display, slug_text)) = current.as_mut() {
                    display.push('\n');
                    slug_text.push('\n');
                }
            }
            Event::End(TagEnd::Heading(_)) => {
                if let Some((start, level, display, slug_text)) = current.take() {
                    let slug = slugger.slug(&slug_text);
                    headings.push(Heading {
                        start,
                        end: i,
                        level,
                        text: display.trim().to_string(),
                        slug,
                    });
                }
            }
            _ => {}
        }
    }

    headings
}

#[cfg(test)]
mod tests {
    use super::*;
    use pulldown_cmark::{html, Options, Parser};

    fn render(markdown: &str, config: TocConfig) -> String {
        let events: Vec<Event> = Parser::new_ext(markdown, Options::ENABLE_FOOTNOTES).collect();
        let events = TocStage::new(config).apply(events);
        let mut out = String::new();
        html::push_html(&mut out, events.into_iter());
        out
    }

    #[test]
    fn test_no_marker_is_noop() {
        let markdown = "# One\n\n## Two\n";
        assert_eq!(
            render(markdown, TocConfig::default()),
            "<h1>One</h1>\n<h2>Two</h2>\n"
        );
    }

    #[test]
    fn test_ordered_tight_nested_list() {
        let html = render(
            "# Doc\n\n## Contents\n\n## Alpha\n\n### Alpha One\n\n## Beta\n",
            TocConfig::default(),
        );
        assert_eq!(
            html,
            "<h1>Doc</h1>\n<h2>Contents</h2>\n<ol>\n\
             <li><a href=\"#alpha\">Alpha</a>\n<ol>\n<li><a href=\"#alpha-one\">Alpha One</a></li>\n</ol>\n</li>\n\
             <li><a href=\"#beta\">Beta</a></li>\n</ol>\n\
             <h2>Alpha</h2>\n<h3>Alpha One</h3>\n<h2>Beta</h2>\n"
        );
    }

    #[test]
    fn test_marker_variants() {
        for marker in ["TOC", "table of contents", "Table-of-Contents", "content"] {
            let html = render(
                &format!("## {}\n\n## Next\n", marker),
                TocConfig::default(),
            );
            assert!(html.contains(r##"<a href="#next">Next</a>"##), "{}", marker);
        }
        let html = render("## Contents of the box\n\n## Next\n", TocConfig::default());
        assert!(!html.contains("<ol>"));
    }

    #[test]
    fn test_section_content_is_replaced() {
        let html = render(
            "## Table of contents\n\nold manual list\n\n## Usage\n",
            TocConfig::default(),
        );
        assert!(!html.contains("old manual list"));
        assert!(html.contains(r##"<a href="#usage">Usage</a>"##));
    }

    #[test]
    fn test_unordered_loose_list() {
        let config = TocConfig {
            ordered: false,
            tight: false,
            max_depth: 6,
        };
        let html = render("## Contents\n\n## Usage\n", config);
        assert!(html.contains("<ul>\n<li>\n<p><a href=\"#usage\">Usage</a></p>\n</li>\n</ul>"));
    }

    #[test]
    fn test_max_depth() {
        let config = TocConfig {
            max_depth: 2,
            ..Default::default()
        };
        let html = render("## Contents\n\n## Keep\n\n### Skip\n", config);
        assert!(html.contains("#keep"));
        assert!(!html.contains("#skip"));
    }

    #[test]
    fn test_deeper_first_entry_does_not_skip_levels() {
        let html = render("### Contents\n\n### Deep\n\n# Shallow\n", TocConfig::default());
        assert!(html.contains("#deep"));
        assert!(html.contains("#shallow"));
        assert_eq!(html.matches("<ol>").count(), html.matches("</ol>").count());
    }

    #[test]
    fn test_inline_code_in_heading_text() {
        let html = render("## TOC\n\n## The `render` call\n", TocConfig::default());
        assert!(html.contains(r##"href="#the-render-call""##));
    }

    #[test]
    fn test_section_ends_at_heading_of_same_rank() {
        let html = render("## Contents\n\n### Old entry\n\n## Next\n", TocConfig::default());
        assert_eq!(
            html,
            "<h2>Contents</h2>\n<ol>\n<li><a href=\"#next\">Next</a></li>\n</ol>\n<h2>Next</h2>\n"
        );
    }

    #[test]
    fn test_no_closing_heading_is_noop() {
        let markdown = "## Contents\n\nkept\n\n### Sub\n";
        assert_eq!(
            render(markdown, TocConfig::default()),
            "<h2>Contents</h2>\n<p>kept</p>\n<h3>Sub</h3>\n"
        );
    }

    #[test]
    fn test_headings_before_marker_are_not_listed() {
        let html = render("## Intro\n\n## TOC\n\n## Usage\n", TocConfig::default());
        assert!(html.contains(r##"<a href="#usage">Usage</a>"##));
        assert!(!html.contains("#intro"));
    }

    #[test]
    fn test_empty_headings_are_skipped() {
        let html = render("## TOC\n\n##\n\n## Real\n", TocConfig::default());
        assert_eq!(html.matches("<li>").count(), 1);
        assert!(html.contains(r##"<a href="#real">Real</a>"##));
    }

    #[test]
    fn test_only_empty_headings_is_noop() {
        let markdown = "## TOC\n\nkept\n\n##\n";
        assert_eq!(
            render(markdown, TocConfig::default()),
            "<h2>TOC</h2>\n<p>kept</p>\n<h2></h2>\n"
        );
    }

    #[test]
    fn test_image_alt_is_not_heading_text() {
        let html = render("## TOC\n\n## ![logo](x.png) Setup\n", TocConfig::default());
        assert!(html.contains(r##"<a href="#setup">Setup</a>"##));
    }

    #[test]
    fn test_footnote_reference_counts_as_its_number() {
        let html = render(
            "## TOC\n\n## Setup[^note]\n\n[^note]: details\n",
            TocConfig::default(),
        );
        assert!(html.contains(r##"<a href="#setup1">Setup</a>"##));
    }

    #[test]
    fn test_footnote_numbers_follow_document_order() {
        let html = render(
            "Intro[^a]\n\n## TOC\n\n## Setup[^b]\n\n[^a]: first\n\n[^b]: second\n",
            TocConfig::default(),
        );
        assert!(html.contains(r##"<a href="#setup2">Setup</a>"##));
    }
}
