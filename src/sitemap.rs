//! Sitemap generation.

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use tracing::debug;

use crate::config::SiteConfig;

/// Content type served with the sitemap
pub const SITEMAP_CONTENT_TYPE: &str = "text/xml";

/// Characters escaped in a single URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'\\')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Builds the sitemap from post ids and category labels
#[derive(Debug)]
pub struct SitemapGenerator {
    config: SiteConfig,
}

impl SitemapGenerator {
    #[must_use]
    pub fn new(config: SiteConfig) -> Self {
        Self { config }
    }

    /// Generate sitemap XML: the site root, then one entry per post and per category.
    pub fn generate(&self, post_ids: &[String], category_ids: &[String]) -> String {
        debug!(
            posts = post_ids.len(),
            categories = category_ids.len(),
            "generating sitemap"
        );

        let mut xml = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        xml.push('\n');
        xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
        xml.push('\n');

        push_url(&mut xml, self.config.base_url());
        for id in post_ids {
            push_url(&mut xml, &self.entry_url(&self.config.post_dir, id));
        }
        for label in category_ids {
            push_url(&mut xml, &self.entry_url(&self.config.category_dir, label));
        }

        xml.push_str("</urlset>\n");
        xml
    }

    fn entry_url(&self, dir: &str, id: &str) -> String {
        let dir = dir.trim_matches('/');
        let id = encode_segment(id);
        if dir.is_empty() {
            format!("{}/{}", self.config.base_url(), id)
        } else {
            format!("{}/{}/{}", self.config.base_url(), dir, id)
        }
    }
}

/// Percent-encode one URL path segment
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

fn push_url(xml: &mut String, loc: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    xml.push_str("  </url>\n");
}

/// Escape XML special characters.
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_two_posts_one_category() {
        let generator = SitemapGenerator::new(SiteConfig::default());
        let xml = generator.generate(&ids(&["a", "b"]), &ids(&["tech"]));

        assert_eq!(xml.matches("<url>").count(), 4);
        assert_eq!(xml.matches("</url>").count(), 4);
        assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#));
        assert!(xml.contains("<loc>https://www.example.com</loc>"));
        assert!(xml.contains("<loc>https://www.example.com/posts/a</loc>"));
        assert!(xml.contains("<loc>https://www.example.com/posts/b</loc>"));
        assert!(xml.contains("<loc>https://www.example.com/categories/tech</loc>"));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_empty_site_has_root() {
        let generator = SitemapGenerator::new(SiteConfig::default());
        let xml = generator.generate(&[], &[]);
        assert_eq!(xml.matches("<url>").count(), 1);
    }

    #[test]
    fn test_entries_follow_config() {
        let config = SiteConfig {
            url: "https://blog.test/".to_string(),
            post_dir: "/articles/".to_string(),
            category_dir: "topics".to_string(),
            ..SiteConfig::default()
        };
        let xml = SitemapGenerator::new(config).generate(&ids(&["x"]), &ids(&["go"]));
        assert!(xml.contains("<loc>https://blog.test</loc>"));
        assert!(xml.contains("<loc>https://blog.test/articles/x</loc>"));
        assert!(xml.contains("<loc>https://blog.test/topics/go</loc>"));
    }

    #[test]
    fn test_ids_are_encoded_and_escaped() {
        let generator = SitemapGenerator::new(SiteConfig::default());
        let xml = generator.generate(&ids(&["a b&c"]), &ids(&["c#/x"]));
        assert!(xml.contains("<loc>https://www.example.com/posts/a%20b&amp;c</loc>"));
        assert!(xml.contains("<loc>https://www.example.com/categories/c%23%2Fx</loc>"));
    }

    #[test]
    fn test_escape_xml() {
        assert_eq!(escape_xml("<a & 'b'>"), "&lt;a &amp; &apos;b&apos;&gt;");
    }
}
