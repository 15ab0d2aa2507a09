//! Front-matter parsing

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::Path;

use crate::error::{ContentError, Result};

/// Custom deserializer that handles both a single string and a list of strings.
/// `null` counts as absent.
fn string_or_vec<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::{self, SeqAccess, Visitor};
    use std::fmt;

    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Option<Vec<String>>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value.to_string()]))
        }

        fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(Some(vec![value]))
        }

        fn visit_seq<S>(self, mut seq: S) -> std::result::Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<String>()? {
                vec.push(item);
            }
            Ok(Some(vec))
        }

        fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post.
///
/// Every field is optional at this level; defaults and required-field
/// checks are applied by the loader.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub excerpt: Option<String>,
    #[serde(deserialize_with = "string_or_vec")]
    pub categories: Option<Vec<String>>,
    #[serde(deserialize_with = "string_or_vec")]
    pub tags: Option<Vec<String>>,
}

impl FrontMatter {
    /// Split a post into its front-matter and body.
    ///
    /// The block opens with a `---` line and closes with the next `---` (or
    /// `...`) line. Content without an opening delimiter has no metadata.
    /// `path` is only used for error reporting.
    pub fn parse<'a>(content: &'a str, path: &Path) -> Result<(Self, &'a str)> {
        let content = content.trim_start_matches('\u{feff}').trim_start();

        let mut lines = content.split_inclusive('\n');
        let yaml_start = match lines.next() {
            Some(first) if first.trim_end() == "---" => first.len(),
            _ => return Ok((FrontMatter::default(), content)),
        };
        let mut offset = yaml_start;

        for line in lines {
            let marker = line.trim_end();
            if marker == "---" || marker == "..." {
                let yaml = &content[yaml_start..offset];
                let body = &content[offset + line.len()..];
                let body = body.trim_start_matches(['\n', '\r']);

                if yaml.trim().is_empty() {
                    return Ok((FrontMatter::default(), body));
                }

                let fm = serde_yaml::from_str::<FrontMatter>(yaml).map_err(|source| {
                    ContentError::MalformedMetadata {
                        path: path.to_path_buf(),
                        source,
                    }
                })?;
                return Ok((fm, body));
            }
            offset += line.len();
        }

        Err(ContentError::UnterminatedMetadata {
            path: path.to_path_buf(),
        })
    }
}

/// Whether a date string starts with a zero-padded `YYYY-MM-DD` and is
/// otherwise a recognised ISO-8601 form, i.e. whether comparing it as a
/// string orders it chronologically.
pub fn is_sortable_date(s: &str) -> bool {
    let s = s.trim();
    if s.len() < 10 || !s.is_char_boundary(10) {
        return false;
    }

    let (day, rest) = s.split_at(10);
    let bytes = day.as_bytes();
    if bytes[4] != b'-' || bytes[7] != b'-' || !day.bytes().all(|b| b == b'-' || b.is_ascii_digit())
    {
        return false;
    }
    if NaiveDate::parse_from_str(day, "%Y-%m-%d").is_err() {
        return false;
    }

    rest.is_empty()
        || DateTime::parse_from_rfc3339(s).is_ok()
        || ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"]
            .iter()
            .any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(content: &str) -> Result<(FrontMatter, &str)> {
        FrontMatter::parse(content, Path::new("posts/test.md"))
    }

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
title: Hello World
date: "2024-01-15"
excerpt: A first post
tags:
  - rust
  - blog
categories:
  - Programming
---

This is the content.
"#;

        let (fm, remaining) = parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Hello World"));
        assert_eq!(fm.date.as_deref(), Some("2024-01-15"));
        assert_eq!(fm.excerpt.as_deref(), Some("A first post"));
        assert_eq!(fm.tags, Some(vec!["rust".to_string(), "blog".to_string()]));
        assert_eq!(fm.categories, Some(vec!["Programming".to_string()]));
        assert_eq!(remaining, "This is the content.\n");
    }

    #[test]
    fn test_unquoted_date_stays_a_string() {
        let content = "---\ntitle: T\ndate: 2020-01-02\n---\nbody";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.date.as_deref(), Some("2020-01-02"));
        assert_eq!(body, "body");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = r#"---
title: Single Tag Post
date: 2024-01-15
tags: Notes
categories: Blog
---

Content here.
"#;

        let (fm, _) = parse(content).unwrap();
        assert_eq!(fm.tags, Some(vec!["Notes".to_string()]));
        assert_eq!(fm.categories, Some(vec!["Blog".to_string()]));
    }

    #[test]
    fn test_null_lists_are_absent() {
        let content = "---\ntitle: T\ncategories:\ntags: ~\n---\n";
        let (fm, _) = parse(content).unwrap();
        assert_eq!(fm.categories, None);
        assert_eq!(fm.tags, None);
    }

    #[test]
    fn test_no_frontmatter() {
        let content = "# Just markdown\n\nNo metadata here.";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, content);
    }

    #[test]
    fn test_empty_frontmatter() {
        let (fm, body) = parse("---\n---\nbody").unwrap();
        assert_eq!(fm, FrontMatter::default());
        assert_eq!(body, "body");
    }

    #[test]
    fn test_crlf_frontmatter() {
        let content = "---\r\ntitle: Windows\r\n---\r\nbody\r\n";
        let (fm, body) = parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "body\r\n");
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let content = "---\ntitle: T\nauthor: someone\n---\n";
        let (fm, _) = parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("T"));
    }

    #[test]
    fn test_malformed_yaml() {
        let content = "---\ntitle: [unclosed\n---\nbody";
        let err = parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedMetadata { .. }));
    }

    #[test]
    fn test_wrong_type_is_rejected() {
        let content = "---\ntitle: T\ntags:\n  nested: map\n---\n";
        let err = parse(content).unwrap_err();
        assert!(matches!(err, ContentError::MalformedMetadata { .. }));
    }

    #[test]
    fn test_unterminated_frontmatter() {
        let content = "---\ntitle: Never closed\n\nbody";
        let err = parse(content).unwrap_err();
        assert!(matches!(err, ContentError::UnterminatedMetadata { .. }));
    }

    #[test]
    fn test_sortable_dates() {
        assert!(is_sortable_date("2021-03-04"));
        assert!(is_sortable_date("2021-03-04T10:20:30Z"));
        assert!(is_sortable_date("2021-03-04 10:20:30"));
        assert!(!is_sortable_date("2021-3-4"));
        assert!(!is_sortable_date("March 4, 2021"));
        assert!(!is_sortable_date("2021-13-40"));
    }
}
