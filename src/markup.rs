//! Highlighted document model.
//! This is what the highlighter hands to the PDF generator: styled spans
//! grouped into printed lines, plus the bits of metadata the page furniture
//! needs (title, syntax and style names, background colour).

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
    pub const WHITE: Rgb = Rgb {
        r: 255,
        g: 255,
        b: 255,
    };

    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Components scaled to 0.0-1.0, as PDF colour operators expect them
    pub fn to_unit(self) -> (f32, f32, f32) {
        (
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        )
    }
}

/// A run of text sharing one style
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl Span {
    pub fn plain(text: impl Into<String>) -> Self {
        Span {
            text: text.into(),
            color: Rgb::BLACK,
            bold: false,
            italic: false,
            underline: false,
        }
    }
}

/// One printed line. Never contains the line terminator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StyledLine {
    pub spans: Vec<Span>,
}

impl StyledLine {
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn char_count(&self) -> usize {
        self.spans.iter().map(|s| s.text.chars().count()).sum()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedDocument {
    /// Shown in the page header and the PDF info dictionary
    pub title: String,
    pub syntax_name: String,
    pub style_name: String,
    pub background: Option<Rgb>,
    pub lines: Vec<StyledLine>,
}

impl HighlightedDocument {
    /// Unstyled document, one plain span per line
    pub fn from_plain_text(title: &str, text: &str) -> Self {
        let lines = text
            .lines()
            .map(|l| StyledLine {
                spans: vec![Span::plain(l)],
            })
            .collect();
        HighlightedDocument {
            title: title.to_string(),
            syntax_name: "Plain Text".to_string(),
            style_name: String::new(),
            background: None,
            lines,
        }
    }

    /// Text of all lines joined with newlines
    pub fn plain_text(&self) -> String {
        let mut text = String::new();
        for line in &self.lines {
            text.push_str(&line.text());
            text.push('\n');
        }
        text
    }

    /// Widest line in characters
    pub fn max_line_chars(&self) -> usize {
        self.lines.iter().map(StyledLine::char_count).max().unwrap_or(0)
    }
}
