use std::collections::{HashMap, HashSet};

use ammonia::Builder;

use crate::coverage::normalize;
use crate::mark::{Document, Mark, MarkKind, clamp_mark};
use crate::style::{DEFAULT_FONT_SIZE, FontFamily, normalize_hex_color};

/// Encodes a document as interleaved markup.
///
/// A sweep-line pass over the mark endpoints: at every position all close
/// tags are emitted before any open tag; among same-position closes the mark
/// with the later start closes first, and among same-position opens the mark
/// with the earlier end opens first. This approximates correct nesting for
/// overlapping intervals without guaranteeing it, so round trips are only
/// exact for non-overlapping, well-formed mark sets.
pub fn encode(document: &Document) -> String {
    let text = document.text.as_str();
    let clamped: Vec<Mark> = document
        .marks
        .iter()
        .map(|mark| clamp_mark(mark, text))
        .collect();
    let marks = normalize(&clamped);

    let mut positions: Vec<usize> = marks.iter().flat_map(|mark| [mark.start, mark.end]).collect();
    positions.sort_unstable();
    positions.dedup();

    let mut out = String::with_capacity(text.len() + marks.len() * 16);
    let mut cursor = 0;
    for &pos in &positions {
        push_text(&mut out, &text[cursor..pos]);
        cursor = pos;

        let mut closes: Vec<&Mark> = marks.iter().filter(|mark| mark.end == pos).collect();
        closes.sort_by(|a, b| b.start.cmp(&a.start).then(b.kind.cmp(&a.kind)));
        for mark in closes {
            out.push_str(close_tag(mark.kind));
        }

        let mut opens: Vec<&Mark> = marks.iter().filter(|mark| mark.start == pos).collect();
        opens.sort_by(|a, b| a.end.cmp(&b.end).then(a.kind.cmp(&b.kind)));
        for mark in opens {
            push_open_tag(&mut out, mark);
        }
    }
    push_text(&mut out, &text[cursor..]);
    out
}

/// `encode` followed by an ammonia pass restricted to the engine's own tag
/// vocabulary, for callers that hand the markup to a browser surface.
pub fn encode_sanitized(document: &Document) -> String {
    let raw = encode(document);

    let tags: HashSet<&'static str> = ["a", "br", "code", "em", "s", "span", "strong", "u"]
        .iter()
        .copied()
        .collect();
    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());
    tag_attributes.insert("span", ["style"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .tag_attributes(tag_attributes)
        .clean(&raw)
        .to_string()
}

fn push_open_tag(out: &mut String, mark: &Mark) {
    match mark.kind {
        MarkKind::Bold => out.push_str("<strong>"),
        MarkKind::Italic => out.push_str("<em>"),
        MarkKind::Underline => out.push_str("<u>"),
        MarkKind::Strike => out.push_str("<s>"),
        MarkKind::Code => out.push_str("<code>"),
        MarkKind::Link => {
            out.push_str("<a href=\"");
            out.push_str(&escape_attr(mark.data.as_deref().unwrap_or("")));
            out.push_str("\">");
        }
        MarkKind::FontSize => {
            // Re-validate payloads so hand-built marks cannot break the
            // attribute syntax.
            let size = mark
                .data
                .as_deref()
                .and_then(|data| data.trim().parse::<u32>().ok())
                .unwrap_or(DEFAULT_FONT_SIZE);
            out.push_str("<span style=\"font-size: ");
            out.push_str(&size.to_string());
            out.push_str("px\">");
        }
        MarkKind::FontColor => {
            out.push_str("<span style=\"color: #");
            out.push_str(&normalize_hex_color(mark.data.as_deref().unwrap_or("")));
            out.push_str("\">");
        }
        MarkKind::FontFamily => {
            let family = FontFamily::parse(mark.data.as_deref().unwrap_or(""));
            out.push_str("<span style=\"font-family: ");
            out.push_str(family.css_name());
            out.push_str("\">");
        }
    }
}

fn close_tag(kind: MarkKind) -> &'static str {
    match kind {
        MarkKind::Bold => "</strong>",
        MarkKind::Italic => "</em>",
        MarkKind::Underline => "</u>",
        MarkKind::Strike => "</s>",
        MarkKind::Code => "</code>",
        MarkKind::Link => "</a>",
        MarkKind::FontSize | MarkKind::FontColor | MarkKind::FontFamily => "</span>",
    }
}

fn push_text(out: &mut String, text: &str) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\n' => out.push_str("<br />"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
