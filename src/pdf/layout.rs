//! # Layout Engine
//!
//! Places text blocks onto fixed-size pages. The engine owns all pagination
//! state (pages laid out so far and the vertical cursor); callers only hand it
//! styled blocks through [`LayoutEngine::emit`].
//!
//! Coordinates are in points with the cursor measured from the top edge of the
//! page. The writer converts to PDF user space (origin bottom-left).

use serde::Serialize;

use super::metrics::{text_width, FontFace, LINE_HEIGHT_FACTOR};

/// Page size and pagination thresholds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
    /// A block that leaves the cursor below this line starts a new page
    pub near_bottom_threshold: f32,
}

impl PageGeometry {
    /// US Letter with 50pt margins
    pub const LETTER: PageGeometry = PageGeometry {
        width: 612.0,
        height: 792.0,
        margin: 50.0,
        near_bottom_threshold: 720.0,
    };

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }

    pub fn bottom(&self) -> f32 {
        self.height - self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::LETTER
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Alignment {
    Left,
    Center,
    Justify,
}

/// What a laid-out line represents in the contract document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineRole {
    DocumentTitle,
    HeaderDetail,
    Heading,
    Subheading,
    Paragraph,
    SignatureHeading,
    SignatureConfirmation,
    SignatureDetail,
}

/// Typography of a block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlockStyle {
    pub font: FontFace,
    pub size: f32,
    pub alignment: Alignment,
    /// Extra space between wrapped lines
    pub line_gap: f32,
    /// Space after the block, in lines of this block's size
    pub space_after: f32,
}

impl BlockStyle {
    pub fn line_height(&self) -> f32 {
        self.size * LINE_HEIGHT_FACTOR + self.line_gap
    }
}

/// A unit of text handed to the engine
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub text: String,
    pub style: BlockStyle,
    pub role: LineRole,
}

impl Block {
    pub fn new(text: impl Into<String>, style: BlockStyle, role: LineRole) -> Self {
        Self {
            text: text.into(),
            style,
            role,
        }
    }
}

/// A single positioned line of text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedLine {
    pub text: String,
    pub font: FontFace,
    pub size: f32,
    pub x: f32,
    /// Distance from the top edge of the page to the top of the line box
    pub top: f32,
    /// Extra width added to each space (PDF `Tw`) for justified lines
    pub word_spacing: f32,
    pub role: LineRole,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaidOutPage {
    pub lines: Vec<PlacedLine>,
}

impl LaidOutPage {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

/// Result of layout, ready for serialization
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaidOutDocument {
    pub pages: Vec<LaidOutPage>,
}

impl LaidOutDocument {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All lines in document order
    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|page| page.lines.iter())
    }

    pub fn lines_with_role(&self, role: LineRole) -> impl Iterator<Item = &PlacedLine> {
        self.lines().filter(move |line| line.role == role)
    }
}

/// Pagination state: pages so far and the vertical cursor on the current page
#[derive(Debug)]
pub struct LayoutEngine {
    geometry: PageGeometry,
    pages: Vec<LaidOutPage>,
    cursor: f32,
}

impl LayoutEngine {
    pub fn new(geometry: PageGeometry) -> Self {
        Self {
            geometry,
            pages: vec![LaidOutPage::default()],
            cursor: geometry.margin,
        }
    }

    pub fn geometry(&self) -> &PageGeometry {
        &self.geometry
    }

    pub fn cursor(&self) -> f32 {
        self.cursor
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Lay out a block, flowing wrapped lines across pages, then apply the
    /// near-bottom check
    pub fn emit(&mut self, block: &Block) {
        let style = block.style;
        let line_height = style.line_height();
        let wrapped = wrap_text(&block.text, style.font, style.size, self.geometry.content_width());
        let last_index = wrapped.len().saturating_sub(1);

        for (index, line) in wrapped.into_iter().enumerate() {
            if self.cursor + line_height > self.geometry.bottom() {
                self.start_page();
            }

            let justify = style.alignment == Alignment::Justify && index < last_index;
            self.place(line, &style, block.role, justify);
            self.cursor += line_height;
        }

        self.move_down(style.space_after, style.size);

        if self.cursor > self.geometry.near_bottom_threshold {
            self.start_page();
        }
    }

    /// Advance the cursor by `lines` line heights of a `size` point font
    pub fn move_down(&mut self, lines: f32, size: f32) {
        self.cursor += lines * size * LINE_HEIGHT_FACTOR;
    }

    /// Begin a new page; a still-empty current page is reused
    pub fn start_page(&mut self) {
        let current_is_empty = self.pages.last().map_or(true, LaidOutPage::is_empty);
        if !current_is_empty {
            self.pages.push(LaidOutPage::default());
        }
        self.cursor = self.geometry.margin;
    }

    /// Consume the engine; a trailing empty page is dropped
    pub fn finish(mut self) -> LaidOutDocument {
        if self.pages.len() > 1 && self.pages.last().is_some_and(LaidOutPage::is_empty) {
            self.pages.pop();
        }
        LaidOutDocument { pages: self.pages }
    }

    fn place(&mut self, text: String, style: &BlockStyle, role: LineRole, justify: bool) {
        let width = text_width(style.font, style.size, &text);
        let available = self.geometry.content_width();
        let margin = self.geometry.margin;

        let (x, word_spacing) = match style.alignment {
            Alignment::Center => (margin + ((available - width) / 2.0).max(0.0), 0.0),
            Alignment::Justify if justify => {
                let spaces = text.chars().filter(|c| *c == ' ').count();
                if spaces > 0 && width < available {
                    (margin, (available - width) / spaces as f32)
                } else {
                    (margin, 0.0)
                }
            }
            _ => (margin, 0.0),
        };

        let line = PlacedLine {
            text,
            font: style.font,
            size: style.size,
            x,
            top: self.cursor,
            word_spacing,
            role,
        };

        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }
}

/// Greedy word wrap; words wider than the line are split by character
pub fn wrap_text(text: &str, font: FontFace, size: f32, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };

        if text_width(font, size, &candidate) <= max_width {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }

        if text_width(font, size, word) <= max_width {
            current = word.to_string();
        } else {
            for c in word.chars() {
                current.push(c);
                if text_width(font, size, &current) > max_width && current.chars().count() > 1 {
                    current.pop();
                    lines.push(std::mem::take(&mut current));
                    current.push(c);
                }
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paragraph_style() -> BlockStyle {
        BlockStyle {
            font: FontFace::Regular,
            size: 10.0,
            alignment: Alignment::Justify,
            line_gap: 2.0,
            space_after: 0.2,
        }
    }

    #[test]
    fn test_wrap_respects_width() {
        let text = "lorem ipsum dolor sit amet ".repeat(20);
        let lines = wrap_text(&text, FontFace::Regular, 10.0, 200.0);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(FontFace::Regular, 10.0, line) <= 200.0);
        }
        assert_eq!(lines.join(" "), text.trim_end());
    }

    #[test]
    fn test_wrap_splits_oversized_word() {
        let word = "X".repeat(200);
        let lines = wrap_text(&word, FontFace::Bold, 12.0, 100.0);
        assert!(lines.len() > 1);
        assert_eq!(lines.concat(), word);
    }

    #[test]
    fn test_wrap_empty_text() {
        assert!(wrap_text("   ", FontFace::Regular, 10.0, 100.0).is_empty());
    }

    #[test]
    fn test_justified_lines_except_last() {
        let mut engine = LayoutEngine::new(PageGeometry::LETTER);
        let text = "kedua belah pihak menyepakati ketentuan berikut ".repeat(8);
        engine.emit(&Block::new(text, paragraph_style(), LineRole::Paragraph));
        let doc = engine.finish();
        let lines: Vec<_> = doc.lines().collect();
        assert!(lines.len() >= 2);
        for line in &lines[..lines.len() - 1] {
            assert!(line.word_spacing > 0.0);
        }
        assert_eq!(lines[lines.len() - 1].word_spacing, 0.0);
    }

    #[test]
    fn test_centered_line_is_centered() {
        let mut engine = LayoutEngine::new(PageGeometry::LETTER);
        let style = BlockStyle {
            font: FontFace::Bold,
            size: 14.0,
            alignment: Alignment::Center,
            line_gap: 0.0,
            space_after: 0.5,
        };
        engine.emit(&Block::new("Title", style, LineRole::Heading));
        let doc = engine.finish();
        let line = doc.lines().next().unwrap();
        let width = text_width(FontFace::Bold, 14.0, "Title");
        let left_space = line.x - 50.0;
        let right_space = 612.0 - 50.0 - (line.x + width);
        assert!((left_space - right_space).abs() < 0.01);
    }

    #[test]
    fn test_threshold_forces_page_break() {
        let mut engine = LayoutEngine::new(PageGeometry::LETTER);
        let mut previous_cursor = engine.cursor();
        let mut pages_seen = 1;
        for i in 0..200 {
            engine.emit(&Block::new(
                format!("Baris {i}"),
                paragraph_style(),
                LineRole::Paragraph,
            ));
            assert!(engine.cursor() <= PageGeometry::LETTER.near_bottom_threshold);
            if engine.page_count() == pages_seen {
                assert!(engine.cursor() >= previous_cursor);
            }
            pages_seen = engine.page_count();
            previous_cursor = engine.cursor();
        }
        let doc = engine.finish();
        assert!(doc.page_count() >= 2);
        for page in &doc.pages {
            for line in &page.lines {
                assert!(line.top <= PageGeometry::LETTER.near_bottom_threshold);
            }
        }
    }

    #[test]
    fn test_no_trailing_empty_page() {
        let mut engine = LayoutEngine::new(PageGeometry::LETTER);
        engine.start_page();
        engine.start_page();
        assert_eq!(engine.page_count(), 1);
        assert_eq!(engine.finish().page_count(), 1);
    }
}
