use once_cell::sync::Lazy;
use regex::Regex;

use crate::coverage::normalize;
use crate::entities::decode_entities;
use crate::mark::{Document, Mark, MarkKind};
use crate::style::{FontFamily, FontSizeLimits, normalize_hex_color, parse_font_size};

static HREF_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)href\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static STYLE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)style\s*=\s*(?:"([^"]*)"|'([^']*)')"#).unwrap());
static FONT_SIZE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)font-size\s*:\s*(\d+)").unwrap());
// The lookbehind-free guard keeps `background-color` from matching.
static COLOR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:^|[^-\w])color\s*:\s*(#?[0-9a-f]{6})\b").unwrap());
static FONT_FAMILY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)font-family\s*:\s*([^;]+)").unwrap());

struct OpenTag {
    kind: MarkKind,
    data: Option<String>,
    start: usize,
}

/// Decodes interleaved markup into a text buffer plus marks.
///
/// This is a restricted, non-validating scanner, not a general markup parser:
/// it recognizes a fixed inline vocabulary (`b`/`strong`, `i`/`em`, `u`,
/// `s`/`strike`/`del`, `code`, `a`, `span` with an inline style, `br`) and
/// treats everything else as entity-decoded literal text or an ignored
/// unknown tag. Unbalanced input never errors: close tags without an opener
/// are dropped, and tags still open at end of input are force-closed at the
/// final offset.
pub fn decode(markup: &str) -> Document {
    let mut text = String::new();
    let mut marks: Vec<Mark> = Vec::new();
    let mut stack: Vec<OpenTag> = Vec::new();

    let mut i = 0;
    while i < markup.len() {
        if markup.as_bytes()[i] == b'<' {
            match markup[i + 1..].find('>') {
                Some(rel) => {
                    handle_tag(&markup[i + 1..i + 1 + rel], &mut text, &mut marks, &mut stack);
                    i += rel + 2;
                }
                None => {
                    // No closing '>': the rest is literal text.
                    text.push_str(&decode_entities(&markup[i..]));
                    i = markup.len();
                }
            }
            continue;
        }
        let next_tag = markup[i..].find('<').map(|rel| i + rel).unwrap_or(markup.len());
        text.push_str(&decode_entities(&markup[i..next_tag]));
        i = next_tag;
    }

    if !stack.is_empty() {
        tracing::debug!(unclosed = stack.len(), "force-closing tags left open at end of input");
    }
    while let Some(open) = stack.pop() {
        push_mark(&mut marks, open, text.len());
    }

    Document {
        text,
        marks: normalize(&marks),
    }
}

fn handle_tag(raw: &str, text: &mut String, marks: &mut Vec<Mark>, stack: &mut Vec<OpenTag>) {
    let body = raw.trim();
    let (closing, body) = match body.strip_prefix('/') {
        Some(rest) => (true, rest.trim()),
        None => (false, body),
    };
    let name_end = body
        .find(|ch: char| ch.is_whitespace() || ch == '/')
        .unwrap_or(body.len());
    let name = body[..name_end].to_ascii_lowercase();
    let attrs = &body[name_end..];
    let offset = text.len();

    if closing {
        match name.as_str() {
            "b" | "strong" => close_kind(marks, stack, MarkKind::Bold, offset),
            "i" | "em" => close_kind(marks, stack, MarkKind::Italic, offset),
            "u" => close_kind(marks, stack, MarkKind::Underline, offset),
            "s" | "strike" | "del" => close_kind(marks, stack, MarkKind::Strike, offset),
            "code" => close_kind(marks, stack, MarkKind::Code, offset),
            "a" => close_kind(marks, stack, MarkKind::Link, offset),
            // One close tag pops every style mark a span may have opened;
            // kinds with no opener on the stack are skipped.
            "span" => {
                close_kind(marks, stack, MarkKind::FontFamily, offset);
                close_kind(marks, stack, MarkKind::FontColor, offset);
                close_kind(marks, stack, MarkKind::FontSize, offset);
            }
            _ => {}
        }
        return;
    }

    match name.as_str() {
        "br" => text.push('\n'),
        "b" | "strong" => open_plain(stack, MarkKind::Bold, offset),
        "i" | "em" => open_plain(stack, MarkKind::Italic, offset),
        "u" => open_plain(stack, MarkKind::Underline, offset),
        "s" | "strike" | "del" => open_plain(stack, MarkKind::Strike, offset),
        "code" => open_plain(stack, MarkKind::Code, offset),
        "a" => {
            let href = HREF_RE
                .captures(attrs)
                .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
                .map(|m| decode_entities(m.as_str()))
                .unwrap_or_default();
            stack.push(OpenTag {
                kind: MarkKind::Link,
                data: Some(href),
                start: offset,
            });
        }
        "span" => open_span(attrs, offset, stack),
        _ => {}
    }
}

fn open_plain(stack: &mut Vec<OpenTag>, kind: MarkKind, offset: usize) {
    stack.push(OpenTag {
        kind,
        data: None,
        start: offset,
    });
}

/// Each style property a span carries opens its own independent mark, so one
/// span tag may open zero to three marks.
fn open_span(attrs: &str, offset: usize, stack: &mut Vec<OpenTag>) {
    let Some(caps) = STYLE_RE.captures(attrs) else {
        return;
    };
    let style = decode_entities(
        caps.get(1)
            .or_else(|| caps.get(2))
            .map(|m| m.as_str())
            .unwrap_or(""),
    );
    if let Some(caps) = FONT_SIZE_RE.captures(&style) {
        let size = parse_font_size(&caps[1], FontSizeLimits::default());
        stack.push(OpenTag {
            kind: MarkKind::FontSize,
            data: Some(size.to_string()),
            start: offset,
        });
    }
    if let Some(caps) = COLOR_RE.captures(&style) {
        stack.push(OpenTag {
            kind: MarkKind::FontColor,
            data: Some(normalize_hex_color(&caps[1])),
            start: offset,
        });
    }
    if let Some(caps) = FONT_FAMILY_RE.captures(&style) {
        stack.push(OpenTag {
            kind: MarkKind::FontFamily,
            data: Some(FontFamily::from_css(&caps[1]).as_str().to_string()),
            start: offset,
        });
    }
}

/// Pops the most recently opened tag of `kind`, tolerating interleaved
/// closers; a close with no matching opener is a no-op.
fn close_kind(marks: &mut Vec<Mark>, stack: &mut Vec<OpenTag>, kind: MarkKind, offset: usize) {
    if let Some(pos) = stack.iter().rposition(|open| open.kind == kind) {
        let open = stack.remove(pos);
        push_mark(marks, open, offset);
    }
}

fn push_mark(marks: &mut Vec<Mark>, open: OpenTag, end: usize) {
    if open.start < end {
        marks.push(Mark {
            start: open.start,
            end,
            kind: open.kind,
            data: open.data,
        });
    }
}
