mod coverage;
mod decode;
mod edit;
mod encode;
mod entities;
mod mark;
mod style;

pub use coverage::{
    BULLET_PREFIX, apply_bullets, bump_font_size, bump_font_size_with_limits, coverage, normalize,
    set_font_color, set_font_family, toggle_mark,
};
pub use decode::decode;
pub use edit::adjust_marks_for_edit;
pub use encode::{encode, encode_sanitized};
pub use mark::{Document, Mark, MarkError, MarkKind, Selection};
pub use style::{
    DEFAULT_FONT_COLOR, DEFAULT_FONT_SIZE, FontFamily, FontSizeLimits, normalize_hex_color,
};
