//! Splits assistant replies into prose, numbered steps, and fenced code.
//!
//! [`segments`] returns a lazy iterator over borrowed slices of the reply.
//! The iterator is `Clone`, so a caller can walk the same reply repeatedly
//! without re-tokenizing from scratch.

use regex::Regex;
use std::sync::OnceLock;

const FENCE: &str = "```";

/// Language reported for fences without a tag.
pub const DEFAULT_LANGUAGE: &str = "javascript";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CodeBlock<'a> {
    pub language: &'a str,
    pub code: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<'a> {
    pub number: &'a str,
    pub content: &'a str,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    /// Prose passed through unmodified.
    Prose(&'a str),
    /// Prose containing `Step N:` markers. `preamble` is the text before the
    /// first marker.
    Steps {
        preamble: &'a str,
        steps: Vec<Step<'a>>,
    },
    Code(CodeBlock<'a>),
}

pub fn segments(text: &str) -> Segments<'_> {
    Segments { rest: text }
}

#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        while !self.rest.is_empty() {
            let rest = self.rest;

            let fenced = rest.find(FENCE).and_then(|open| {
                let body_start = open + FENCE.len();
                rest[body_start..]
                    .find(FENCE)
                    .map(|close| (open, body_start, body_start + close))
            });

            match fenced {
                Some((0, body_start, body_end)) => {
                    self.rest = &rest[body_end + FENCE.len()..];
                    return Some(Segment::Code(parse_code(&rest[body_start..body_end])));
                }
                Some((open, _, _)) => {
                    self.rest = &rest[open..];
                    if let Some(segment) = prose_segment(&rest[..open]) {
                        return Some(segment);
                    }
                }
                None => {
                    // No complete fence left; an unterminated one stays prose.
                    self.rest = "";
                    return prose_segment(rest);
                }
            }
        }
        None
    }
}

impl std::iter::FusedIterator for Segments<'_> {}

fn parse_code(body: &str) -> CodeBlock<'_> {
    let tag_len = body
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    let language = if tag_len == 0 {
        DEFAULT_LANGUAGE
    } else {
        &body[..tag_len]
    };

    CodeBlock {
        language,
        code: body[tag_len..].trim(),
    }
}

fn step_marker() -> &'static Regex {
    static STEP_MARKER: OnceLock<Regex> = OnceLock::new();
    STEP_MARKER
        .get_or_init(|| Regex::new(r"Step ([0-9]+):").expect("step marker pattern is valid"))
}

fn prose_segment(text: &str) -> Option<Segment<'_>> {
    if text.trim().is_empty() {
        return None;
    }

    let markers: Vec<_> = step_marker().captures_iter(text).collect();
    if markers.is_empty() {
        return Some(Segment::Prose(text));
    }

    let mut steps = Vec::with_capacity(markers.len());
    for (i, caps) in markers.iter().enumerate() {
        let (Some(whole), Some(number)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let content_end = markers
            .get(i + 1)
            .and_then(|next| next.get(0))
            .map(|m| m.start())
            .unwrap_or(text.len());
        steps.push(Step {
            number: number.as_str(),
            content: text[whole.end()..content_end].trim(),
        });
    }

    let preamble_end = markers[0].get(0).map(|m| m.start()).unwrap_or(0);
    Some(Segment::Steps {
        preamble: &text[..preamble_end],
        steps,
    })
}
