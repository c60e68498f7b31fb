use crate::mark::{Mark, MarkKind, Selection};
use crate::style::{
    DEFAULT_FONT_SIZE, FontFamily, FontSizeLimits, normalize_hex_color,
};

/// Literal prefix `apply_bullets` puts in front of each line.
pub const BULLET_PREFIX: &str = "\u{2022} ";

/// Canonicalizes a mark set: drops zero-length marks, sorts by
/// `(kind, data, start, end)`, and merges overlapping or adjacent marks with
/// the same kind and payload. Idempotent.
pub fn normalize(marks: &[Mark]) -> Vec<Mark> {
    let mut kept: Vec<Mark> = marks.iter().filter(|mark| !mark.is_empty()).cloned().collect();
    kept.sort_by(|a, b| {
        (a.kind, &a.data, a.start, a.end).cmp(&(b.kind, &b.data, b.start, b.end))
    });
    let mut out: Vec<Mark> = Vec::with_capacity(kept.len());
    for mark in kept {
        if let Some(last) = out.last_mut()
            && last.kind == mark.kind
            && last.data == mark.data
            && mark.start <= last.end
        {
            last.end = last.end.max(mark.end);
            continue;
        }
        out.push(mark);
    }
    out
}

/// Whether a mark counts toward coverage of `(kind, data)`. Links require an
/// exact payload match; every other kind matches on kind alone.
fn kind_matches(mark: &Mark, kind: MarkKind, data: Option<&str>) -> bool {
    if mark.kind != kind {
        return false;
    }
    kind != MarkKind::Link || mark.data.as_deref() == data
}

/// Merged sub-ranges of `selection` already covered by marks of the given
/// kind and payload. Empty for a collapsed selection.
pub fn coverage(
    marks: &[Mark],
    selection: Selection,
    kind: MarkKind,
    data: Option<&str>,
) -> Vec<(usize, usize)> {
    let (low, high) = selection.ordered();
    if low == high {
        return Vec::new();
    }
    let mut pieces: Vec<(usize, usize)> = marks
        .iter()
        .filter(|mark| kind_matches(mark, kind, data))
        .filter_map(|mark| {
            let start = mark.start.max(low);
            let end = mark.end.min(high);
            (start < end).then_some((start, end))
        })
        .collect();
    pieces.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(pieces.len());
    for (start, end) in pieces {
        if let Some((_, last_end)) = merged.last_mut()
            && start <= *last_end
        {
            *last_end = (*last_end).max(end);
            continue;
        }
        merged.push((start, end));
    }
    merged
}

/// Applies or removes a mark over the selection. If marks of the same kind
/// and payload already tile the whole selection the formatting is removed
/// (overlapping marks are clipped into remainders outside the selection);
/// otherwise a new mark spanning the selection is added. Collapsed selections
/// are a no-op.
pub fn toggle_mark(
    marks: &[Mark],
    selection: Selection,
    kind: MarkKind,
    data: Option<&str>,
) -> Vec<Mark> {
    let (low, high) = selection.ordered();
    if low == high {
        return marks.to_vec();
    }
    let covered = coverage(marks, selection, kind, data);
    let fully_covered = covered.len() == 1 && covered[0] == (low, high);
    if fully_covered {
        let mut out: Vec<Mark> = Vec::with_capacity(marks.len() + 1);
        for mark in marks {
            if !kind_matches(mark, kind, data) || !mark.overlaps(low, high) {
                out.push(mark.clone());
                continue;
            }
            if mark.start < low {
                out.push(Mark {
                    start: mark.start,
                    end: low,
                    kind: mark.kind,
                    data: mark.data.clone(),
                });
            }
            if high < mark.end {
                out.push(Mark {
                    start: high,
                    end: mark.end,
                    kind: mark.kind,
                    data: mark.data.clone(),
                });
            }
        }
        normalize(&out)
    } else {
        let mut out = marks.to_vec();
        out.push(Mark {
            start: low,
            end: high,
            kind,
            data: data.map(str::to_string),
        });
        normalize(&out)
    }
}

/// Replaces every mark of `kind` inside `[low, high)` with a single mark
/// carrying `value`, clipping overlapping marks so their parts outside the
/// selection keep their previous payloads.
fn set_single_value(
    marks: &[Mark],
    low: usize,
    high: usize,
    kind: MarkKind,
    value: String,
) -> Vec<Mark> {
    let mut out: Vec<Mark> = Vec::with_capacity(marks.len() + 1);
    for mark in marks {
        if mark.kind != kind || !mark.overlaps(low, high) {
            out.push(mark.clone());
            continue;
        }
        if mark.start < low {
            out.push(Mark {
                start: mark.start,
                end: low,
                kind,
                data: mark.data.clone(),
            });
        }
        if high < mark.end {
            out.push(Mark {
                start: high,
                end: mark.end,
                kind,
                data: mark.data.clone(),
            });
        }
    }
    out.push(Mark {
        start: low,
        end: high,
        kind,
        data: Some(value),
    });
    normalize(&out)
}

/// `bump_font_size` with the default `[10, 32]` limits.
pub fn bump_font_size(marks: &[Mark], selection: Selection, delta: i32) -> Vec<Mark> {
    bump_font_size_with_limits(marks, selection, delta, FontSizeLimits::default())
}

/// Adjusts the font size over the selection by `delta`. The starting size is
/// taken from the widest FontSize mark enclosing the selection start (or the
/// default size), clamped into the limits, and flattened to a single mark
/// spanning exactly the selection.
pub fn bump_font_size_with_limits(
    marks: &[Mark],
    selection: Selection,
    delta: i32,
    limits: FontSizeLimits,
) -> Vec<Mark> {
    let (low, high) = selection.ordered();
    if low == high {
        return marks.to_vec();
    }
    let current = marks
        .iter()
        .filter(|mark| mark.kind == MarkKind::FontSize && mark.start <= low && low < mark.end)
        .max_by_key(|mark| mark.len())
        .and_then(|mark| mark.data.as_deref())
        .and_then(|data| data.parse::<u32>().ok())
        .unwrap_or(DEFAULT_FONT_SIZE);
    let next = limits.clamp(i64::from(current) + i64::from(delta));
    set_single_value(marks, low, high, MarkKind::FontSize, next.to_string())
}

/// Sets the font color over the selection. Invalid colors degrade to the
/// default instead of erroring.
pub fn set_font_color(marks: &[Mark], selection: Selection, color: &str) -> Vec<Mark> {
    let (low, high) = selection.ordered();
    if low == high {
        return marks.to_vec();
    }
    set_single_value(marks, low, high, MarkKind::FontColor, normalize_hex_color(color))
}

/// Sets the font family over the selection. Unknown families degrade to
/// `sans`.
pub fn set_font_family(marks: &[Mark], selection: Selection, family: &str) -> Vec<Mark> {
    let (low, high) = selection.ordered();
    if low == high {
        return marks.to_vec();
    }
    let family = FontFamily::parse(family).as_str().to_string();
    set_single_value(marks, low, high, MarkKind::FontFamily, family)
}

/// Prefixes every line touched by the selection with a bullet marker. The
/// selection expands to whole lines first; lines already carrying the marker
/// are left alone, so the operation is idempotent.
///
/// This edits the text directly and is not mark-aware: callers are expected
/// to run `adjust_marks_for_edit` with the old and new text afterward.
pub fn apply_bullets(text: &str, selection: Selection) -> (String, Selection) {
    let (low, high) = selection.ordered();
    let low = crate::mark::snap_to_boundary(text, low);
    let high = crate::mark::snap_to_boundary(text, high).max(low);

    let block_start = text[..low].rfind('\n').map(|idx| idx + 1).unwrap_or(0);
    let block_end = text[high..]
        .find('\n')
        .map(|idx| high + idx)
        .unwrap_or(text.len());

    let mut rebuilt = String::with_capacity(block_end - block_start);
    for (idx, line) in text[block_start..block_end].split('\n').enumerate() {
        if idx > 0 {
            rebuilt.push('\n');
        }
        if !line.starts_with(BULLET_PREFIX) {
            rebuilt.push_str(BULLET_PREFIX);
        }
        rebuilt.push_str(line);
    }

    let mut out = String::with_capacity(text.len() + rebuilt.len());
    out.push_str(&text[..block_start]);
    out.push_str(&rebuilt);
    out.push_str(&text[block_end..]);
    let new_end = block_start + rebuilt.len();
    (out, Selection::new(block_start, new_end))
}
