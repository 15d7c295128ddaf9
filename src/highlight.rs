//! Syntax detection and highlighting on top of syntect.
//!
//! Syntax lookup goes by file extension first, then by the first line of the
//! content (shebangs, modelines, XML prologs), and finally falls back to plain
//! text. Not finding a syntax is never an error.

use crate::error::{Error, Result};
use crate::markup::{HighlightedDocument, Rgb, Span, StyledLine};
use std::path::Path;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;
use tracing::debug;

/// Style used when none is requested. Light background, prints well.
pub const DEFAULT_STYLE: &str = "InspiredGitHub";

/// How the syntax for a file was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionMethod {
    Extension,
    ContentGuess,
    PlainText,
}

#[derive(Debug, Clone, Copy)]
pub struct Detection<'a> {
    pub syntax: &'a SyntaxReference,
    pub method: DetectionMethod,
}

impl Detection<'_> {
    pub fn syntax_name(&self) -> &str {
        &self.syntax.name
    }
}

pub struct Highlighter {
    syntaxes: SyntaxSet,
    themes: ThemeSet,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    /// Load the bundled syntax definitions and themes
    pub fn new() -> Self {
        Highlighter {
            syntaxes: SyntaxSet::load_defaults_newlines(),
            themes: ThemeSet::load_defaults(),
        }
    }

    /// Names of all available styles, sorted
    pub fn style_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.themes.themes.keys().cloned().collect();
        names.sort();
        names
    }

    /// Look up a style by name
    pub fn resolve_style(&self, name: &str) -> Result<&Theme> {
        self.themes
            .themes
            .get(name)
            .ok_or_else(|| Error::InvalidStyle {
                name: name.to_string(),
                available: self.style_names(),
            })
    }

    /// Pick a syntax for `file_name`: extension, then content, then plain text
    pub fn detect(&self, file_name: &Path, content: &str) -> Detection<'_> {
        let by_name = file_name
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| self.syntaxes.find_syntax_by_extension(ext))
            .or_else(|| {
                file_name
                    .file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| self.syntaxes.find_syntax_by_extension(name))
            });

        let detection = if let Some(syntax) = by_name {
            Detection {
                syntax,
                method: DetectionMethod::Extension,
            }
        } else if let Some(syntax) = content
            .lines()
            .next()
            .and_then(|first| self.syntaxes.find_syntax_by_first_line(first))
        {
            Detection {
                syntax,
                method: DetectionMethod::ContentGuess,
            }
        } else {
            Detection {
                syntax: self.syntaxes.find_syntax_plain_text(),
                method: DetectionMethod::PlainText,
            }
        };

        debug!(
            file = %file_name.display(),
            syntax = %detection.syntax.name,
            method = ?detection.method,
            "detected syntax"
        );
        detection
    }

    /// Highlight prepared content into styled lines
    pub fn highlight(
        &self,
        content: &str,
        detection: &Detection<'_>,
        style: &str,
        title: &str,
    ) -> Result<HighlightedDocument> {
        let theme = self.resolve_style(style)?;
        let mut h = HighlightLines::new(detection.syntax, theme);

        let mut lines = Vec::new();
        for line in LinesWithEndings::from(content) {
            let ranges = h.highlight_line(line, &self.syntaxes)?;
            let spans = ranges
                .into_iter()
                .filter_map(|(style, text)| {
                    let text = text.trim_end_matches(['\n', '\r']);
                    if text.is_empty() {
                        return None;
                    }
                    Some(Span {
                        text: text.to_string(),
                        color: Rgb::new(style.foreground.r, style.foreground.g, style.foreground.b),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                        underline: style.font_style.contains(FontStyle::UNDERLINE),
                    })
                })
                .collect();
            lines.push(StyledLine { spans });
        }

        Ok(HighlightedDocument {
            title: title.to_string(),
            syntax_name: detection.syntax.name.clone(),
            style_name: style.to_string(),
            background: theme
                .settings
                .background
                .map(|c| Rgb::new(c.r, c.g, c.b)),
            lines,
        })
    }
}
