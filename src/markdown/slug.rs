//! Heading anchors

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

use super::HtmlStage;

lazy_static! {
    static ref HEADING: Regex =
        Regex::new(r"(?s)<h([1-6])([^>]*)>(.*?)</h[1-6]>").expect("valid heading regex");
    static ref TAG: Regex = Regex::new(r"<[^>]*>").expect("valid tag regex");
    static ref ID_ATTR: Regex = Regex::new(r"(?i)\sid\s*=").expect("valid id regex");
}

/// Produces unique URL-safe slugs; repeats get `-1`, `-2`, ...
#[derive(Debug, Default)]
pub struct Slugger {
    seen: HashMap<String, usize>,
}

impl Slugger {
    pub fn slug(&mut self, text: &str) -> String {
        let mut base = slug::slugify(text);
        if base.is_empty() {
            base = "section".to_string();
        }

        let mut slug = base.clone();
        if let Some(&count) = self.seen.get(&base) {
            let mut n = count;
            loop {
                n += 1;
                slug = format!("{}-{}", base, n);
                if !self.seen.contains_key(&slug) {
                    break;
                }
            }
            self.seen.insert(base, n);
        }
        self.seen.insert(slug.clone(), 0);
        slug
    }
}

/// Adds an `id` to every heading that lacks one
#[derive(Debug, Clone, Copy, Default)]
pub struct SlugStage;

impl HtmlStage for SlugStage {
    fn name(&self) -> &'static str {
        "slug"
    }

    fn apply(&self, html: String) -> String {
        let mut slugger = Slugger::default();
        HEADING
            .replace_all(&html, |caps: &Captures| {
                let (level, attrs, inner) = (&caps[1], &caps[2], &caps[3]);
                if ID_ATTR.is_match(attrs) {
                    return caps[0].to_string();
                }
                let id = slugger.slug(&heading_text(inner));
                format!(r#"<h{level} id="{id}"{attrs}>{inner}</h{level}>"#)
            })
            .into_owned()
    }
}

/// Plain text of a heading's inner HTML
fn heading_text(inner: &str) -> String {
    TAG.replace_all(inner, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}
