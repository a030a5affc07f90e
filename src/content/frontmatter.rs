//! Front-matter parsing

use indexmap::IndexMap;
use serde::de::{self, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::lines_with_offsets;
use crate::error::FrontMatterError;

const YAML_DELIMITER: &str = "---";
const JSON_DELIMITER: &str = ";;;";

/// A scalar read as text. `tags: 2013` is a number to YAML but a tag to an author.
struct Scalar(String);

struct ScalarVisitor;

impl<'de> Visitor<'de> for ScalarVisitor {
    type Value = Scalar;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string, number or boolean")
    }

    fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
        Ok(Scalar(value.to_string()))
    }

    fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
        Ok(Scalar(value))
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
        Ok(Scalar(value.to_string()))
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
        Ok(Scalar(value.to_string()))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
        Ok(Scalar(value.to_string()))
    }

    fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
        Ok(Scalar(value.to_string()))
    }
}

impl<'de> Deserialize<'de> for Scalar {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(ScalarVisitor)
    }
}

/// Custom deserializer that handles both a single scalar and a list of scalars
fn string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(vec![value.to_string()])
        }

        fn visit_string<E: de::Error>(self, value: String) -> Result<Self::Value, E> {
            Ok(vec![value])
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            ScalarVisitor.visit_i64(value).map(|s| vec![s.0])
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            ScalarVisitor.visit_u64(value).map(|s| vec![s.0])
        }

        fn visit_f64<E: de::Error>(self, value: f64) -> Result<Self::Value, E> {
            ScalarVisitor.visit_f64(value).map(|s| vec![s.0])
        }

        fn visit_bool<E: de::Error>(self, value: bool) -> Result<Self::Value, E> {
            ScalarVisitor.visit_bool(value).map(|s| vec![s.0])
        }

        fn visit_seq<S>(self, mut seq: S) -> Result<Self::Value, S::Error>
        where
            S: SeqAccess<'de>,
        {
            let mut vec = Vec::new();
            while let Some(item) = seq.next_element::<Scalar>()? {
                vec.push(item.0);
            }
            Ok(vec)
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(Vec::new())
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

/// Front-matter data from a post
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrontMatter {
    pub layout: Option<String>,
    pub title: Option<String>,
    pub date: Option<String>,
    pub updated: Option<String>,
    pub comments: Option<bool>,
    pub published: Option<bool>,
    pub slug: Option<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub categories: Vec<String>,
    #[serde(deserialize_with = "string_or_vec", default)]
    pub tags: Vec<String>,

    /// Unrecognized keys, in file order
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_yaml::Value>,
}

impl FrontMatter {
    /// Parse front-matter from the start of a file.
    ///
    /// Returns the metadata and the body that follows the closing delimiter.
    /// Text that does not open with a delimiter line comes back untouched
    /// alongside an empty `FrontMatter`.
    pub fn parse(content: &str) -> Result<(Self, &str), FrontMatterError> {
        if let Some((block, body)) = split_block(content, YAML_DELIMITER)? {
            return Ok((Self::parse_yaml(block)?, body));
        }

        match split_block(content, JSON_DELIMITER)? {
            Some((block, body)) => Ok((Self::parse_json(block)?, body)),
            None => Ok((FrontMatter::default(), content)),
        }
    }

    fn parse_yaml(block: &str) -> Result<Self, FrontMatterError> {
        // `---\n---` is an empty but well-formed block
        if block.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        Ok(serde_yaml::from_str(block)?)
    }

    fn parse_json(block: &str) -> Result<Self, FrontMatterError> {
        if block.trim().is_empty() {
            return Ok(FrontMatter::default());
        }
        Ok(serde_json::from_str(block)?)
    }

    /// True when no key at all was present
    pub fn is_empty(&self) -> bool {
        *self == FrontMatter::default()
    }
}

/// Split `content` into the text between a pair of `delimiter` lines and the
/// body after the closing one. `Ok(None)` means the first line is not the
/// delimiter.
fn split_block<'a>(
    content: &'a str,
    delimiter: &'static str,
) -> Result<Option<(&'a str, &'a str)>, FrontMatterError> {
    let mut lines = lines_with_offsets(content);

    let block_start = match lines.next() {
        Some((start, line)) if line.trim_end() == delimiter => start + line.len(),
        _ => return Ok(None),
    };

    for (start, line) in lines {
        if line.trim_end() == delimiter {
            let block = &content[block_start..start];
            let body = content[start + line.len()..].trim_start_matches(['\n', '\r']);
            return Ok(Some((block, body)));
        }
    }

    Err(FrontMatterError::Unterminated { delimiter })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_yaml_frontmatter() {
        let content = r#"---
layout: post
title: "Verbal math with Ruby"
date: 2013-02-10 21:20
comments: true
categories:
  - ruby
  - metaprogramming
---

This is the content.
"#;

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.layout.as_deref(), Some("post"));
        assert_eq!(fm.title.as_deref(), Some("Verbal math with Ruby"));
        assert_eq!(fm.date.as_deref(), Some("2013-02-10 21:20"));
        assert_eq!(fm.comments, Some(true));
        assert_eq!(fm.categories, vec!["ruby", "metaprogramming"]);
        assert_eq!(body, "This is the content.\n");
    }

    #[test]
    fn test_parse_single_string_tags() {
        let content = "---\ntitle: One Tag\ndate: 2020-01-01\ntags: rails\ncategories: Blog\n---\nBody\n";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["rails"]);
        assert_eq!(fm.categories, vec!["Blog"]);
    }

    #[test]
    fn test_parse_flow_sequence_and_numeric_tag() {
        let content = "---\ntitle: T\ntags: [ruby, 2013]\ncategories: 2013\n---\nBody";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.tags, vec!["ruby", "2013"]);
        assert_eq!(fm.categories, vec!["2013"]);
    }

    #[test]
    fn test_boolean_tag_alone_or_in_list() {
        let (fm, _) = FrontMatter::parse("---\ntitle: T\ntags: true\n---\nBody").unwrap();
        assert_eq!(fm.tags, vec!["true"]);

        let (fm, _) = FrontMatter::parse("---\ntitle: T\ntags: [true]\n---\nBody").unwrap();
        assert_eq!(fm.tags, vec!["true"]);
    }

    #[test]
    fn test_extra_keys_keep_file_order() {
        let content = "---\ntitle: T\nzeta: 1\nalpha: two\n---\nBody";

        let (fm, _) = FrontMatter::parse(content).unwrap();
        let keys: Vec<_> = fm.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);
    }

    #[test]
    fn test_no_frontmatter_returns_original_text() {
        let content = "Just a note.\n---\nnot metadata\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_leading_blank_line_is_not_a_block() {
        let content = "\n---\ntitle: T\n---\nBody";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, content);
    }

    #[test]
    fn test_unterminated_block_is_an_error() {
        let content = "---\ntitle: Never closed\ndate: 2020-01-01\n\nBody text\n";

        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(
            err,
            FrontMatterError::Unterminated { delimiter: "---" }
        ));
    }

    #[test]
    fn test_invalid_yaml_is_an_error() {
        let content = "---\ntitle: [unclosed\n---\nBody";

        let err = FrontMatter::parse(content).unwrap_err();
        assert!(matches!(err, FrontMatterError::Yaml(_)));
    }

    #[test]
    fn test_non_mapping_yaml_is_an_error() {
        let content = "---\njust some prose\n---\nBody";

        assert!(FrontMatter::parse(content).is_err());
    }

    #[test]
    fn test_empty_block() {
        let (fm, body) = FrontMatter::parse("---\n---\nBody").unwrap();
        assert!(fm.is_empty());
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_crlf_delimiters() {
        let content = "---\r\ntitle: Windows\r\n---\r\nBody\r\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Windows"));
        assert_eq!(body, "Body\r\n");
    }

    #[test]
    fn test_delimiter_inside_body_is_content() {
        let content = "---\ntitle: T\n---\nAbove\n---\nBelow\n";

        let (_, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(body, "Above\n---\nBelow\n");
    }

    #[test]
    fn test_parse_json_frontmatter() {
        let content = ";;;\n{\"title\": \"Test Post\", \"tags\": [\"a\", \"b\"], \"comments\": false}\n;;;\n\nThis is content.\n";

        let (fm, body) = FrontMatter::parse(content).unwrap();
        assert_eq!(fm.title.as_deref(), Some("Test Post"));
        assert_eq!(fm.tags, vec!["a", "b"]);
        assert_eq!(fm.comments, Some(false));
        assert_eq!(body, "This is content.\n");
    }

    #[test]
    fn test_unterminated_json_block() {
        let err = FrontMatter::parse(";;;\n{\"title\": \"x\"}\n").unwrap_err();
        assert!(matches!(
            err,
            FrontMatterError::Unterminated { delimiter: ";;;" }
        ));
    }
}
