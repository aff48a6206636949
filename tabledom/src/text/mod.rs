use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let current_width = display_width(s);
    if current_width <= max_width {
        return s.to_string();
    }

    if max_width == 0 {
        return String::new();
    }

    let ellipsis = "…";
    let target_width = max_width.saturating_sub(1);

    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = char_width(ch);
        if width + ch_width > target_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result.push_str(ellipsis);
    result
}

/// Pad `s` with spaces to exactly `width` columns, truncating when it is wider.
pub fn pad_to_width(s: &str, width: usize, align: TextAlign) -> String {
    let s = truncate_to_width(s, width);
    let gap = width.saturating_sub(display_width(&s));
    let (left, right) = match align {
        TextAlign::Left => (0, gap),
        TextAlign::Right => (gap, 0),
        TextAlign::Center => (gap / 2, gap - gap / 2),
    };
    format!("{}{}{}", " ".repeat(left), s, " ".repeat(right))
}
