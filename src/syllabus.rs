//! Free-text syllabus parsing.
//!
//! A syllabus is split at headers of the form `Unit <n>:`. Text on the header
//! line after the colon is the unit title; the lines below it, up to the next
//! header, are the unit body. A unit without body lines uses its title as the
//! content; otherwise the title is kept alongside the body. Text before the
//! first header is ignored.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::SyllabusUnit;

static UNIT_HEADER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Unit\s+\d+:").expect("unit header pattern is valid"));

/// Split raw syllabus text into labeled units, in input order.
///
/// Units with no content after trimming are dropped. Repeated labels are
/// kept as separate units. Text without any header yields no units.
pub fn parse_syllabus(text: &str) -> Vec<SyllabusUnit> {
    let headers: Vec<_> = UNIT_HEADER.find_iter(text).collect();
    let mut units = Vec::with_capacity(headers.len());

    for (i, header) in headers.iter().enumerate() {
        let body_end = headers.get(i + 1).map_or(text.len(), |next| next.start());
        let span = &text[header.end()..body_end];
        let (title, body) = match span.find('\n') {
            Some(nl) => (span[..nl].trim(), span[nl + 1..].trim()),
            None => (span.trim(), ""),
        };

        let (title, content) = match (title, body) {
            ("", "") => continue,
            (title, "") => (None, title),
            ("", body) => (None, body),
            (title, body) => (Some(title.to_string()), body),
        };

        units.push(SyllabusUnit {
            unit: header.as_str().replace(':', "").trim().to_string(),
            title,
            content: content.to_string(),
        });
    }

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(label: &str, content: &str) -> SyllabusUnit {
        SyllabusUnit {
            unit: label.to_string(),
            title: None,
            content: content.to_string(),
        }
    }

    fn titled(label: &str, title: &str, content: &str) -> SyllabusUnit {
        SyllabusUnit {
            title: Some(title.to_string()),
            ..unit(label, content)
        }
    }

    #[test]
    fn test_titled_units_use_body_lines() {
        let units = parse_syllabus("Unit 1: A\nfoo\nUnit 2: B\nbar");
        let contents: Vec<&str> = units.iter().map(|u| u.content.as_str()).collect();
        assert_eq!(contents, vec!["foo", "bar"]);
        assert_eq!(
            units,
            vec![titled("Unit 1", "A", "foo"), titled("Unit 2", "B", "bar")]
        );
    }

    #[test]
    fn test_multiline_body_kept_verbatim() {
        let units = parse_syllabus("Unit 3: Memory\n  paging\n  segmentation  \n");
        assert_eq!(units, vec![titled("Unit 3", "Memory", "paging\n  segmentation")]);
    }

    #[test]
    fn test_bodies_on_following_lines() {
        let units = parse_syllabus("Unit 1:\nfoo\nUnit 2:\nbar");
        assert_eq!(units, vec![unit("Unit 1", "foo"), unit("Unit 2", "bar")]);
    }

    #[test]
    fn test_no_headers() {
        assert!(parse_syllabus("no headers here").is_empty());
        assert!(parse_syllabus("").is_empty());
    }

    #[test]
    fn test_empty_unit_dropped() {
        let units = parse_syllabus("Unit 1:   \n  Unit 2: paging");
        assert_eq!(units, vec![unit("Unit 2", "paging")]);

        assert!(parse_syllabus("Unit 7:").is_empty());
    }

    #[test]
    fn test_single_line_unit_uses_title() {
        let units = parse_syllabus("Unit 1: process scheduling, round robin");
        assert_eq!(units, vec![unit("Unit 1", "process scheduling, round robin")]);
    }

    #[test]
    fn test_preamble_discarded() {
        let units = parse_syllabus("Course outline\nUnit 1: processes");
        assert_eq!(units, vec![unit("Unit 1", "processes")]);
    }

    #[test]
    fn test_repeated_labels_kept() {
        let units = parse_syllabus("Unit 1: a Unit 1: b");
        assert_eq!(units, vec![unit("Unit 1", "a"), unit("Unit 1", "b")]);
    }

    #[test]
    fn test_header_is_case_sensitive_and_needs_space() {
        assert!(parse_syllabus("unit 1: lower").is_empty());
        assert!(parse_syllabus("Unit1: squashed").is_empty());
        let units = parse_syllabus("Unit \t 12: spaced");
        assert_eq!(units, vec![unit("Unit \t 12", "spaced")]);
    }
}
