//! 3x5 bitmap glyphs for HUD text on the software surface.

pub(crate) const GLYPH_WIDTH: i32 = 3;
pub(crate) const GLYPH_HEIGHT: i32 = 5;

/// Five rows, most significant of the low three bits is the leftmost column.
pub(crate) type Glyph = [u8; GLYPH_HEIGHT as usize];

const BLANK: Glyph = [0, 0, 0, 0, 0];
const UNKNOWN: Glyph = [0b111, 0b001, 0b011, 0b000, 0b010];

pub(crate) fn glyph_for(ch: char) -> Glyph {
    match ch.to_ascii_lowercase() {
        ' ' => BLANK,
        '0' => [0b111, 0b101, 0b101, 0b101, 0b111],
        '1' => [0b010, 0b110, 0b010, 0b010, 0b111],
        '2' => [0b111, 0b001, 0b111, 0b100, 0b111],
        '3' => [0b111, 0b001, 0b111, 0b001, 0b111],
        '4' => [0b101, 0b101, 0b111, 0b001, 0b001],
        '5' => [0b111, 0b100, 0b111, 0b001, 0b111],
        '6' => [0b111, 0b100, 0b111, 0b101, 0b111],
        '7' => [0b111, 0b001, 0b010, 0b010, 0b010],
        '8' => [0b111, 0b101, 0b111, 0b101, 0b111],
        '9' => [0b111, 0b101, 0b111, 0b001, 0b111],
        ':' => [0b000, 0b010, 0b000, 0b010, 0b000],
        '.' => [0b000, 0b000, 0b000, 0b000, 0b010],
        '-' => [0b000, 0b000, 0b111, 0b000, 0b000],
        '/' => [0b001, 0b001, 0b010, 0b100, 0b100],
        'a' => [0b000, 0b111, 0b001, 0b111, 0b111],
        'b' => [0b100, 0b100, 0b110, 0b101, 0b110],
        'c' => [0b000, 0b111, 0b100, 0b100, 0b111],
        'd' => [0b001, 0b001, 0b111, 0b101, 0b111],
        'e' => [0b000, 0b111, 0b110, 0b100, 0b111],
        'f' => [0b011, 0b100, 0b110, 0b100, 0b100],
        'g' => [0b000, 0b111, 0b101, 0b111, 0b001],
        'h' => [0b100, 0b100, 0b110, 0b101, 0b101],
        'i' => [0b010, 0b000, 0b010, 0b010, 0b010],
        'j' => [0b001, 0b000, 0b001, 0b101, 0b010],
        'k' => [0b100, 0b101, 0b110, 0b101, 0b101],
        'l' => [0b100, 0b100, 0b100, 0b100, 0b111],
        'm' => [0b000, 0b110, 0b111, 0b101, 0b101],
        'n' => [0b000, 0b110, 0b101, 0b101, 0b101],
        'o' => [0b000, 0b111, 0b101, 0b101, 0b111],
        'p' => [0b000, 0b110, 0b101, 0b110, 0b100],
        'q' => [0b000, 0b111, 0b101, 0b111, 0b001],
        'r' => [0b000, 0b110, 0b101, 0b100, 0b100],
        's' => [0b000, 0b111, 0b110, 0b001, 0b111],
        't' => [0b010, 0b111, 0b010, 0b010, 0b011],
        'u' => [0b000, 0b101, 0b101, 0b101, 0b111],
        'v' => [0b000, 0b101, 0b101, 0b101, 0b010],
        'w' => [0b000, 0b101, 0b101, 0b111, 0b010],
        'x' => [0b000, 0b101, 0b010, 0b010, 0b101],
        'y' => [0b000, 0b101, 0b101, 0b111, 0b001],
        'z' => [0b000, 0b111, 0b001, 0b010, 0b111],
        _ => UNKNOWN,
    }
}

/// Integer glyph scale for a requested text height in pixels, at least 1.
pub(crate) fn scale_for_height(height_px: f32) -> i32 {
    if !height_px.is_finite() {
        return 1;
    }
    ((height_px / GLYPH_HEIGHT as f32).floor() as i32).max(1)
}

pub(crate) fn text_width_px(text: &str, scale: i32) -> i32 {
    let count = text.chars().count() as i32;
    if count == 0 {
        return 0;
    }
    count * (GLYPH_WIDTH + 1) * scale - scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hud_characters_have_real_glyphs() {
        for ch in "score: 0123456789 time lives fps".chars() {
            if ch == ' ' {
                continue;
            }
            assert_ne!(glyph_for(ch), BLANK, "{ch}");
            assert_ne!(glyph_for(ch), UNKNOWN, "{ch}");
        }
    }

    #[test]
    fn uppercase_falls_back_to_lowercase_shapes() {
        assert_eq!(glyph_for('S'), glyph_for('s'));
    }

    #[test]
    fn text_width_has_no_trailing_gap() {
        assert_eq!(text_width_px("", 3), 0);
        assert_eq!(text_width_px("a", 3), 9);
        assert_eq!(text_width_px("ab", 3), 21);
    }

    #[test]
    fn scale_never_drops_below_one() {
        assert_eq!(scale_for_height(24.0), 4);
        assert_eq!(scale_for_height(2.0), 1);
        assert_eq!(scale_for_height(f32::NAN), 1);
    }
}
