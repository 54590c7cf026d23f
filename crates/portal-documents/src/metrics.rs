//! Helvetica glyph metrics and line wrapping.
//!
//! Widths are the standard Helvetica AFM advance widths in 1/1000 em for
//! the printable ASCII range. Characters outside it are measured as a
//! digit.

use crate::layout::PT_TO_MM;

const FIRST_CHAR: u32 = 32;
const DEFAULT_WIDTH: u16 = 556;

#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    // space ! " # $ % & ' ( ) * + , - . /
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0-9
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
    // : ; < = > ? @
    278, 278, 584, 584, 584, 556, 1015,
    // A-Z
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
    // [ \ ] ^ _ `
    278, 278, 278, 469, 556, 333,
    // a-z
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
    // { | } ~
    334, 260, 334, 584,
];

fn glyph_width(c: char) -> u16 {
    (c as u32)
        .checked_sub(FIRST_CHAR)
        .and_then(|i| HELVETICA_WIDTHS.get(i as usize))
        .copied()
        .unwrap_or(DEFAULT_WIDTH)
}

/// Rendered width of `text` in millimetres at `font_size` points.
pub fn text_width(text: &str, font_size: f32) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(glyph_width(c))).sum();
    units as f32 / 1000.0 * font_size * PT_TO_MM
}

/// Break `text` into lines no wider than `max_width` millimetres.
///
/// Words are kept whole where they fit; a single word wider than the limit
/// is split between characters. Explicit newlines always break.
pub fn split_text_to_size(text: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();

        for word in paragraph.split(' ').filter(|w| !w.is_empty()) {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{} {}", current, word)
            };

            if text_width(&candidate, font_size) <= max_width {
                current = candidate;
                continue;
            }

            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }

            if text_width(word, font_size) <= max_width {
                current = word.to_string();
            } else {
                let mut pieces = break_word(word, max_width, font_size);
                current = pieces.pop().unwrap_or_default();
                lines.extend(pieces);
            }
        }

        lines.push(current);
    }

    lines
}

fn break_word(word: &str, max_width: f32, font_size: f32) -> Vec<String> {
    let mut pieces = Vec::new();
    let mut current = String::new();

    for c in word.chars() {
        current.push(c);
        if text_width(&current, font_size) > max_width && current.chars().count() > 1 {
            current.pop();
            pieces.push(std::mem::take(&mut current));
            current.push(c);
        }
    }

    pieces.push(current);
    pieces
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_of_known_glyphs() {
        // "KLOUDRAC" = 667+556+778+722+722+722+667+722 = 5556 units
        let expected = 5.556 * 24.0 * PT_TO_MM;
        assert!((text_width("KLOUDRAC", 24.0) - expected).abs() < 1e-3);
        assert_eq!(text_width("", 12.0), 0.0);
    }

    #[test]
    fn test_short_text_is_one_line() {
        assert_eq!(
            split_text_to_size("Booking Amount", 50.0, 9.0),
            vec!["Booking Amount".to_string()]
        );
    }

    #[test]
    fn test_wrapped_lines_fit_width() {
        let text = "We are pleased to inform you that based on your booking application \
                    and the receipt of the booking amount, we hereby allot you the following unit:";
        let lines = split_text_to_size(text, 170.0, 9.0);

        assert!(lines.len() >= 2);
        for line in &lines {
            assert!(text_width(line, 9.0) <= 170.0);
        }
        assert_eq!(lines.join(" "), text.split_whitespace().collect::<Vec<_>>().join(" "));
    }

    #[test]
    fn test_long_word_is_broken() {
        let word = "W".repeat(40);
        let lines = split_text_to_size(&word, 20.0, 10.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
        for line in &lines {
            assert!(text_width(line, 10.0) <= 20.0);
        }
    }

    #[test]
    fn test_newline_forces_break() {
        let lines = split_text_to_size("first\nsecond", 170.0, 9.0);
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }
}
