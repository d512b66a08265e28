//! Text rendering utilities

use crate::document::Color;

/// Context for rendering text
pub struct TextRenderContext {
    /// PDF font resource name (e.g., "F1")
    pub font_name: String,
    /// Font size in points
    pub font_size: f32,
    /// Text color (RGB)
    pub color: Color,
}

/// WinAnsi codes 0x80-0x9F and the characters they show
///
/// 0x81, 0x8D, 0x8F, 0x90 and 0x9D are unassigned.
const WIN_ANSI_HIGH: [(char, u8); 27] = [
    ('\u{20AC}', 0x80),
    ('\u{201A}', 0x82),
    ('\u{0192}', 0x83),
    ('\u{201E}', 0x84),
    ('\u{2026}', 0x85),
    ('\u{2020}', 0x86),
    ('\u{2021}', 0x87),
    ('\u{02C6}', 0x88),
    ('\u{2030}', 0x89),
    ('\u{0160}', 0x8A),
    ('\u{2039}', 0x8B),
    ('\u{0152}', 0x8C),
    ('\u{017D}', 0x8E),
    ('\u{2018}', 0x91),
    ('\u{2019}', 0x92),
    ('\u{201C}', 0x93),
    ('\u{201D}', 0x94),
    ('\u{2022}', 0x95),
    ('\u{2013}', 0x96),
    ('\u{2014}', 0x97),
    ('\u{02DC}', 0x98),
    ('\u{2122}', 0x99),
    ('\u{0161}', 0x9A),
    ('\u{203A}', 0x9B),
    ('\u{0153}', 0x9C),
    ('\u{017E}', 0x9E),
    ('\u{0178}', 0x9F),
];

/// WinAnsi code for a character, if the standard fonts can show it
pub fn win_ansi_code(ch: char) -> Option<u8> {
    match ch as u32 {
        0x20..=0x7E => Some(ch as u8),
        0xA0..=0xFF => Some(ch as u32 as u8),
        _ => WIN_ANSI_HIGH
            .iter()
            .find(|(c, _)| *c == ch)
            .map(|(_, code)| *code),
    }
}

/// Encode text as a PDF literal string for a WinAnsi standard font
///
/// Backslashes and parentheses are escaped and line breaks become spaces.
/// Characters WinAnsi cannot show, C1 controls included, become `?`.
pub fn encode_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 2);
    out.push('(');
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '(' => out.push_str("\\("),
            ')' => out.push_str("\\)"),
            '\n' | '\r' | '\t' => out.push(' '),
            c if (c as u32) < 0x20 || c == '\u{7F}' => {}
            c => match win_ansi_code(c) {
                Some(code) if code < 0x80 => out.push(code as char),
                Some(code) => out.push_str(&format!("\\{:03o}", code)),
                None => out.push('?'),
            },
        }
    }
    out.push(')');
    out
}

/// Generate PDF operators for text insertion
///
/// Creates the PDF text operators (BT, rg, Tf, Td, Tj, ET) to render text
/// at a specific position.
///
/// # Arguments
/// * `text_operand` - Encoded string operand (e.g., "(Hello)")
/// * `x` - X coordinate in points (PDF coordinates, from left)
/// * `y` - Y coordinate in points (PDF coordinates, from bottom)
/// * `ctx` - Text rendering context
///
/// # Returns
/// Vector of bytes containing the PDF operators
pub fn generate_text_operators(
    text_operand: &str,
    x: f64,
    y: f64,
    ctx: &TextRenderContext,
) -> Vec<u8> {
    let mut ops = String::new();

    ops.push_str("BT\n");

    // Non-stroking color
    ops.push_str(&format!(
        "{} {} {} rg\n",
        ctx.color.r, ctx.color.g, ctx.color.b
    ));

    ops.push_str(&format!("/{} {} Tf\n", ctx.font_name, ctx.font_size));
    ops.push_str(&format!("{x} {y} Td\n"));
    ops.push_str(&format!("{text_operand} Tj\n"));
    ops.push_str("ET\n");

    ops.into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_literal_escapes() {
        assert_eq!(encode_literal("a(b)c\\"), "(a\\(b\\)c\\\\)");
    }

    #[test]
    fn test_encode_literal_latin1_and_beyond() {
        assert_eq!(encode_literal("é"), "(\\351)");
        assert_eq!(encode_literal("ก"), "(?)");
    }

    #[test]
    fn test_encode_literal_win_ansi_specials() {
        assert_eq!(encode_literal("\u{20AC}5"), "(\\2005)");
        assert_eq!(
            encode_literal("\u{201C}Hi\u{201D} \u{2013}"),
            "(\\223Hi\\224 \\226)"
        );
    }

    #[test]
    fn test_encode_literal_c1_controls_are_replaced() {
        assert_eq!(encode_literal("a\u{0080}b\u{009F}"), "(a?b?)");
        assert_eq!(win_ansi_code('\u{0085}'), None);
        assert_eq!(win_ansi_code('\u{2026}'), Some(0x85));
    }

    #[test]
    fn test_generate_text_operators() {
        let ctx = TextRenderContext {
            font_name: "F1".to_string(),
            font_size: 14.0,
            color: Color::black(),
        };
        let ops = String::from_utf8(generate_text_operators("(Hi)", 50.0, 700.0, &ctx)).unwrap();
        assert!(ops.starts_with("BT\n"));
        assert!(ops.contains("/F1 14 Tf"));
        assert!(ops.contains("50 700 Td"));
        assert!(ops.contains("(Hi) Tj"));
        assert!(ops.ends_with("ET\n"));
    }
}
