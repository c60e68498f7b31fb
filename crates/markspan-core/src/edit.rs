use crate::coverage::normalize;
use crate::mark::{Mark, Selection, clamp_mark};

/// The inferred contiguous edit: `[replace_start, replace_end)` of the old
/// text was replaced by `inserted` bytes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct EditSpan {
    replace_start: usize,
    replace_end: usize,
    inserted: usize,
}

/// Infers the edited span from the before/after snapshots. Exact for single,
/// contiguous, cursor-local edits (typing, backspace, delete, paste over a
/// selection); multi-point or programmatic bulk edits can be misattributed,
/// which is a documented limitation of the selection-based heuristic.
fn infer_edit(
    old_text: &str,
    old_selection: Selection,
    new_text: &str,
    new_selection: Selection,
) -> EditSpan {
    let old_len = old_text.len();
    let new_len = new_text.len();
    let (low, high) = old_selection.ordered();
    let low = low.min(old_len);
    let high = high.min(old_len);

    if low != high {
        // Replacement of the old selection, e.g. paste-over or cut.
        let inserted = new_len.saturating_sub(old_len - (high - low));
        return EditSpan {
            replace_start: low,
            replace_end: high,
            inserted,
        };
    }

    let cursor = low;
    if new_len > old_len {
        EditSpan {
            replace_start: cursor,
            replace_end: cursor,
            inserted: new_len - old_len,
        }
    } else if new_len < old_len {
        let removed = old_len - new_len;
        let new_cursor = new_selection.ordered().0.min(new_len);
        if new_cursor < cursor {
            // Backspace-style deletion ending at the old cursor.
            EditSpan {
                replace_start: new_cursor,
                replace_end: cursor,
                inserted: 0,
            }
        } else {
            // Forward deletion starting at the old cursor.
            EditSpan {
                replace_start: cursor,
                replace_end: (cursor + removed).min(old_len),
                inserted: 0,
            }
        }
    } else {
        // Same length, collapsed selection: no positional signal, keep
        // offsets as they are.
        EditSpan {
            replace_start: cursor,
            replace_end: cursor,
            inserted: 0,
        }
    }
}

/// Remaps a mark set across a text edit described by before/after
/// `(text, selection)` snapshots. Marks before the edited span keep their
/// offsets, marks after it shift by the length delta, and marks straddling it
/// are split into remainders; a mark fully inside the replaced span is
/// dropped. The result is clamped to the new text and normalized.
pub fn adjust_marks_for_edit(
    old_text: &str,
    old_selection: Selection,
    new_text: &str,
    new_selection: Selection,
    marks: &[Mark],
) -> Vec<Mark> {
    if old_text == new_text {
        return marks.to_vec();
    }
    let edit = infer_edit(old_text, old_selection, new_text, new_selection);
    tracing::debug!(
        replace_start = edit.replace_start,
        replace_end = edit.replace_end,
        inserted = edit.inserted,
        "remapping marks across edit"
    );
    let removed = edit.replace_end - edit.replace_start;
    let shift = |offset: usize| (offset + edit.inserted).saturating_sub(removed);

    let mut remapped: Vec<Mark> = Vec::with_capacity(marks.len());
    for mark in marks {
        if mark.end <= edit.replace_start {
            remapped.push(mark.clone());
            continue;
        }
        if mark.start >= edit.replace_end {
            remapped.push(Mark {
                start: shift(mark.start),
                end: shift(mark.end),
                kind: mark.kind,
                data: mark.data.clone(),
            });
            continue;
        }
        // Straddles the replaced span: keep the remainders on each side.
        if mark.start < edit.replace_start {
            remapped.push(Mark {
                start: mark.start,
                end: edit.replace_start,
                kind: mark.kind,
                data: mark.data.clone(),
            });
        }
        if mark.end > edit.replace_end {
            remapped.push(Mark {
                start: shift(edit.replace_end),
                end: shift(mark.end),
                kind: mark.kind,
                data: mark.data.clone(),
            });
        }
    }

    let clamped: Vec<Mark> = remapped
        .iter()
        .map(|mark| clamp_mark(mark, new_text))
        .collect();
    normalize(&clamped)
}

#[cfg(test)]
mod tests {
    use super::{EditSpan, infer_edit};
    use crate::mark::Selection;

    #[test]
    fn collapsed_insert_is_placed_at_the_cursor() {
        let edit = infer_edit("abcdef", Selection::caret(3), "abcXYdef", Selection::caret(5));
        assert_eq!(
            edit,
            EditSpan {
                replace_start: 3,
                replace_end: 3,
                inserted: 2
            }
        );
    }

    #[test]
    fn backspace_and_delete_are_told_apart_by_the_new_cursor() {
        let backspace = infer_edit("abcdef", Selection::caret(3), "abdef", Selection::caret(2));
        assert_eq!(
            backspace,
            EditSpan {
                replace_start: 2,
                replace_end: 3,
                inserted: 0
            }
        );
        let delete = infer_edit("abcdef", Selection::caret(3), "abcef", Selection::caret(3));
        assert_eq!(
            delete,
            EditSpan {
                replace_start: 3,
                replace_end: 4,
                inserted: 0
            }
        );
    }

    #[test]
    fn non_empty_selection_is_the_replaced_span() {
        let edit = infer_edit("abcdef", Selection::new(4, 1), "aXYef", Selection::caret(3));
        assert_eq!(
            edit,
            EditSpan {
                replace_start: 1,
                replace_end: 4,
                inserted: 2
            }
        );
    }
}
