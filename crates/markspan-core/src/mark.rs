/// Kinds of inline formatting an annotation can carry.
///
/// The declaration order doubles as the canonical sort order used by
/// normalization and by the encoder's same-position tie-breaks.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum MarkKind {
    Bold,
    Italic,
    Underline,
    Strike,
    Code,
    Link,
    FontSize,
    FontColor,
    FontFamily,
}

impl MarkKind {
    /// Kinds whose `data` payload is meaningful.
    pub fn carries_data(self) -> bool {
        matches!(
            self,
            MarkKind::Link | MarkKind::FontSize | MarkKind::FontColor | MarkKind::FontFamily
        )
    }
}

/// An annotation covering the half-open byte range `[start, end)` of a text
/// buffer. Marks are value objects; operations on the engine always build new
/// mark sets instead of patching in place.
///
/// `data` holds the href for `Link`, the integer size for `FontSize`, six
/// lowercase hex digits for `FontColor`, and a family name for `FontFamily`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Mark {
    pub start: usize,
    pub end: usize,
    pub kind: MarkKind,
    pub data: Option<String>,
}

impl Mark {
    pub fn new(
        start: usize,
        end: usize,
        kind: MarkKind,
        data: Option<String>,
    ) -> Result<Self, MarkError> {
        if start <= end {
            Ok(Self {
                start,
                end,
                kind,
                data,
            })
        } else {
            Err(MarkError::InvertedRange { start, end })
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub(crate) fn overlaps(&self, start: usize, end: usize) -> bool {
        self.start < end && start < self.end
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MarkError {
    InvertedRange { start: usize, end: usize },
}

/// A caller-supplied selection: a pair of byte offsets, order-insensitive.
/// `start == end` is a collapsed cursor.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn caret(offset: usize) -> Self {
        Self {
            start: offset,
            end: offset,
        }
    }

    /// The selection as an ordered `(low, high)` pair.
    pub fn ordered(&self) -> (usize, usize) {
        (self.start.min(self.end), self.start.max(self.end))
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }
}

/// A plain text buffer plus its mark set. The set is unordered as far as
/// callers are concerned; operations return it in canonical form.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    pub text: String,
    pub marks: Vec<Mark>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }
}

/// Largest char boundary at or below `offset`, clamped to the buffer.
pub(crate) fn snap_to_boundary(text: &str, offset: usize) -> usize {
    let mut offset = offset.min(text.len());
    while offset > 0 && !text.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Clamps a mark into `[0, text.len()]` on char boundaries. Inverted results
/// collapse to empty and get dropped by normalization.
pub(crate) fn clamp_mark(mark: &Mark, text: &str) -> Mark {
    let start = snap_to_boundary(text, mark.start);
    let end = snap_to_boundary(text, mark.end).max(start);
    Mark {
        start,
        end,
        kind: mark.kind,
        data: mark.data.clone(),
    }
}
