//! Helvetica / Helvetica-Bold advance widths (AFM units, 1/1000 em) and WinAnsi
//! text encoding for the standard Type1 fonts.

use serde::Serialize;

/// Standard 14 font faces used in contract documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum FontFace {
    Regular,
    Bold,
}

impl FontFace {
    /// PostScript name written into the font dictionary
    pub fn base_font(&self) -> &'static str {
        match self {
            Self::Regular => "Helvetica",
            Self::Bold => "Helvetica-Bold",
        }
    }

    /// Name under which the font is registered in page resources
    pub fn resource_name(&self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }

    fn widths(&self) -> &'static [u16; 95] {
        match self {
            Self::Regular => &HELVETICA_WIDTHS,
            Self::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

/// Ascender of both Helvetica faces
pub const ASCENDER: f32 = 718.0;

/// Line height (ascender + gap - descender) relative to the font size
pub const LINE_HEIGHT_FACTOR: f32 = 1.156;

const FALLBACK_WIDTH: u16 = 556;

// Printable ASCII 0x20..=0x7E
#[rustfmt::skip]
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

#[rustfmt::skip]
const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

/// Advance width of one character in AFM units
pub fn char_width(face: FontFace, c: char) -> u16 {
    let code = c as u32;
    if (0x20..=0x7E).contains(&code) {
        face.widths()[(code - 0x20) as usize]
    } else {
        FALLBACK_WIDTH
    }
}

/// Width of `text` in points at `size`
pub fn text_width(face: FontFace, size: f32, text: &str) -> f32 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(face, c))).sum();
    units as f32 * size / 1000.0
}

/// Encode text for a WinAnsiEncoding simple font; unmappable characters become `?`
pub fn encode_win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' => c as u8,
            '\u{A0}'..='\u{FF}' => c as u32 as u8,
            '\u{20AC}' => 0x80,
            '\u{2026}' => 0x85,
            '\u{2018}' => 0x91,
            '\u{2019}' => 0x92,
            '\u{201C}' => 0x93,
            '\u{201D}' => 0x94,
            '\u{2022}' => 0x95,
            '\u{2013}' => 0x96,
            '\u{2014}' => 0x97,
            '\t' => b' ',
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_lookup() {
        assert_eq!(char_width(FontFace::Regular, ' '), 278);
        assert_eq!(char_width(FontFace::Regular, 'W'), 944);
        assert_eq!(char_width(FontFace::Regular, 'i'), 222);
        assert_eq!(char_width(FontFace::Regular, '~'), 584);
        assert_eq!(char_width(FontFace::Bold, 'i'), 278);
        assert_eq!(char_width(FontFace::Bold, 'm'), 889);
        assert_eq!(char_width(FontFace::Regular, 'é'), FALLBACK_WIDTH);
    }

    #[test]
    fn test_text_width_scales_with_size() {
        let at_ten = text_width(FontFace::Regular, 10.0, "Kontrak");
        let at_twenty = text_width(FontFace::Regular, 20.0, "Kontrak");
        assert!((at_twenty - 2.0 * at_ten).abs() < 1e-3);
        assert_eq!(text_width(FontFace::Bold, 12.0, ""), 0.0);
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(encode_win_ansi("Rp 1.000"), b"Rp 1.000".to_vec());
        assert_eq!(encode_win_ansi("café"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_win_ansi("a–b"), vec![b'a', 0x96, b'b']);
        assert_eq!(encode_win_ansi("✓ ok"), b"? ok".to_vec());
    }
}
