/// Size applied when no FontSize mark encloses the queried offset.
pub const DEFAULT_FONT_SIZE: u32 = 16;

/// Fallback for colors that are not six hex digits.
pub const DEFAULT_FONT_COLOR: &str = "000000";

/// Bounds for `bump_font_size`. Values are clamped into `[min, max]`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct FontSizeLimits {
    pub min: u32,
    pub max: u32,
}

impl Default for FontSizeLimits {
    fn default() -> Self {
        Self { min: 10, max: 32 }
    }
}

impl FontSizeLimits {
    pub fn clamp(&self, size: i64) -> u32 {
        // max-then-min keeps inconsistent limits from panicking.
        size.max(i64::from(self.min)).min(i64::from(self.max)) as u32
    }
}

/// The fixed family vocabulary. Anything else degrades to `Sans`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum FontFamily {
    #[default]
    Sans,
    Serif,
    Mono,
}

impl FontFamily {
    /// Name stored in a FontFamily mark's `data`.
    pub fn as_str(self) -> &'static str {
        match self {
            FontFamily::Sans => "sans",
            FontFamily::Serif => "serif",
            FontFamily::Mono => "mono",
        }
    }

    /// Name emitted in a `font-family` style property.
    pub fn css_name(self) -> &'static str {
        match self {
            FontFamily::Sans => "sans-serif",
            FontFamily::Serif => "serif",
            FontFamily::Mono => "monospace",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "serif" => FontFamily::Serif,
            "mono" | "monospace" => FontFamily::Mono,
            _ => FontFamily::Sans,
        }
    }

    /// Parses the first name of a `font-family` property value.
    pub fn from_css(value: &str) -> Self {
        let first = value.split(',').next().unwrap_or("");
        let first = first.trim().trim_matches(['"', '\'']);
        Self::parse(first)
    }
}

/// Normalizes a color to six lowercase hex digits, accepting an optional
/// leading `#`. Anything else falls back to the default color.
pub fn normalize_hex_color(value: &str) -> String {
    let trimmed = value.trim();
    let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
    if digits.len() == 6 && digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        digits.to_ascii_lowercase()
    } else {
        DEFAULT_FONT_COLOR.to_string()
    }
}

pub(crate) fn parse_font_size(value: &str, limits: FontSizeLimits) -> u32 {
    match value.trim().parse::<i64>() {
        Ok(size) => limits.clamp(size),
        Err(_) => limits.clamp(i64::from(DEFAULT_FONT_SIZE)),
    }
}
