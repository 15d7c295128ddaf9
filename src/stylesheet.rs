//! The style sheet resource: page geometry, fonts and page furniture.
//!
//! Read from a JSON file at invocation time. Every field is optional in the
//! file; missing ones take the defaults below.

use crate::error::{Error, Result};
use crate::pdf_generator::{PageLayout, PageOrientation};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Where the style sheet is looked up, relative to the working directory
pub const DEFAULT_STYLESHEET_PATH: &str = "templates/default.json";

/// Glyph advance of the standard monospace fonts, as a fraction of the size
pub const MONOSPACE_ADVANCE: f32 = 0.6;

/// Names of standard PDF fonts for each font style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Fonts {
    pub regular: String,
    pub bold: String,
    pub italic: String,
    pub bold_italic: String,
}

impl Fonts {
    fn names(&self) -> [&str; 4] {
        [
            self.regular.as_str(),
            self.bold.as_str(),
            self.italic.as_str(),
            self.bold_italic.as_str(),
        ]
    }
}

/// Font names end up as PDF name objects, so keep them to plain characters
fn is_valid_font_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl Default for Fonts {
    fn default() -> Self {
        Fonts {
            regular: "Courier".to_string(),
            bold: "Courier-Bold".to_string(),
            italic: "Courier-Oblique".to_string(),
            bold_italic: "Courier-BoldOblique".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleSheet {
    pub orientation: PageOrientation,
    /// Overrides the orientation's page width (points)
    pub page_width: Option<f32>,
    /// Overrides the orientation's page height (points)
    pub page_height: Option<f32>,
    pub margin_left: f32,
    pub margin_right: f32,
    pub margin_top: f32,
    pub margin_bottom: f32,
    pub fonts: Fonts,
    pub font_size: f32,
    /// Line height as a multiple of the font size
    pub line_spacing: f32,
    /// File name at the top of every page
    pub show_header: bool,
    /// "Page N of M" at the bottom of every page
    pub show_page_numbers: bool,
    /// Fill pages with the style's background colour
    pub paint_background: bool,
}

impl Default for StyleSheet {
    fn default() -> Self {
        StyleSheet {
            orientation: PageOrientation::Portrait,
            page_width: None,
            page_height: None,
            margin_left: 36.0,
            margin_right: 36.0,
            margin_top: 54.0,
            margin_bottom: 45.0,
            fonts: Fonts::default(),
            font_size: 9.0,
            line_spacing: 1.2,
            show_header: true,
            show_page_numbers: true,
            paint_background: false,
        }
    }
}

impl StyleSheet {
    /// Load a style sheet file. A missing or malformed file is a configuration error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|e| {
            Error::config(format!(
                "unable to read style sheet '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&contents).map_err(|e| match e {
            Error::Config { message } => {
                Error::config(format!("style sheet '{}': {}", path.display(), message))
            }
            other => other,
        })
    }

    pub fn from_json(contents: &str) -> Result<Self> {
        let sheet: StyleSheet = serde_json::from_str(contents)
            .map_err(|e| Error::config(format!("invalid style sheet: {}", e)))?;
        sheet.validate()?;
        Ok(sheet)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.font_size > 0.0) {
            return Err(Error::config("font_size must be positive"));
        }
        if !(self.line_spacing > 0.0) {
            return Err(Error::config("line_spacing must be positive"));
        }
        if let Some(bad) = self.fonts.names().into_iter().find(|n| !is_valid_font_name(n)) {
            return Err(Error::config(format!("invalid font name '{}'", bad)));
        }
        let layout = self.layout();
        if layout.content_width() <= 0.0 || layout.content_top() <= layout.margin_bottom {
            return Err(Error::config("margins leave no room for content"));
        }
        Ok(())
    }

    pub fn layout(&self) -> PageLayout {
        let (width, height) = self.orientation.page_size();
        PageLayout {
            width: self.page_width.unwrap_or(width),
            height: self.page_height.unwrap_or(height),
            margin_left: self.margin_left,
            margin_right: self.margin_right,
            margin_top: self.margin_top,
            margin_bottom: self.margin_bottom,
        }
    }

    pub fn line_height(&self) -> f32 {
        self.font_size * self.line_spacing
    }

    /// Width in points of `chars` characters of monospace text
    pub fn text_width(&self, chars: usize) -> f32 {
        chars as f32 * self.font_size * MONOSPACE_ADVANCE
    }

    /// Whether lines of `chars` characters fit between the side margins
    pub fn fits(&self, chars: usize) -> bool {
        self.text_width(chars) <= self.layout().content_width()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fit_default_wrap_width() {
        let sheet = StyleSheet::default();
        assert!(sheet.validate().is_ok());
        assert!(sheet.fits(crate::wrap::DEFAULT_WRAP_WIDTH));
        assert!(!sheet.fits(200));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let sheet = StyleSheet::from_json(r#"{ "font_size": 8, "orientation": "landscape" }"#).unwrap();
        assert_eq!(sheet.font_size, 8.0);
        assert_eq!(sheet.orientation, PageOrientation::Landscape);
        assert_eq!(sheet.layout().width, 792.0);
        assert_eq!(sheet.fonts, Fonts::default());
        assert!(sheet.show_page_numbers);
    }

    #[test]
    fn test_page_size_override() {
        let sheet = StyleSheet::from_json(r#"{ "page_width": 595.0, "page_height": 842.0 }"#).unwrap();
        let layout = sheet.layout();
        assert_eq!(layout.width, 595.0);
        assert_eq!(layout.height, 842.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(StyleSheet::from_json(r#"{ "font_size": 0 }"#).is_err());
        assert!(StyleSheet::from_json(r#"{ "margin_left": 400, "margin_right": 400 }"#).is_err());
        assert!(StyleSheet::from_json(r#"{ "colour": "red" }"#).is_err());
        assert!(StyleSheet::from_json(r#"{ "fonts": { "regular": "Times Roman" } }"#).is_err());
        assert!(StyleSheet::from_json("not json").is_err());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = StyleSheet::load("does/not/exist.json").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("does/not/exist.json"));
    }

    #[test]
    fn test_bundled_default_matches_code_defaults() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/templates/default.json");
        let sheet = StyleSheet::load(path).unwrap();
        assert_eq!(sheet, StyleSheet::default());
    }
}
