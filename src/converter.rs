//! The conversion pipeline: read, wrap, highlight, render, write.

use crate::error::{Error, Result};
use crate::highlight::{DEFAULT_STYLE, Highlighter};
use crate::pdf_generator;
use crate::stylesheet::{DEFAULT_STYLESHEET_PATH, StyleSheet};
use crate::wrap::{self, WrapWidth};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default tab stop distance used when expanding tabs
pub const DEFAULT_TAB_WIDTH: usize = 4;

#[derive(Debug, Clone)]
pub struct ConvertOptions {
    pub input: PathBuf,
    /// Derived from the input name when absent, see [`resolve_output_path`]
    pub output: Option<PathBuf>,
    pub wrap_width: WrapWidth,
    pub style: String,
    pub stylesheet: PathBuf,
    /// Zero keeps tabs as they are
    pub tab_width: usize,
}

impl ConvertOptions {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        ConvertOptions {
            input: input.into(),
            output: None,
            wrap_width: WrapWidth::default(),
            style: DEFAULT_STYLE.to_string(),
            stylesheet: PathBuf::from(DEFAULT_STYLESHEET_PATH),
            tab_width: DEFAULT_TAB_WIDTH,
        }
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = Some(output.into());
        self
    }

    pub fn with_wrap_width(mut self, width: WrapWidth) -> Self {
        self.wrap_width = width;
        self
    }

    pub fn with_style(mut self, style: &str) -> Self {
        self.style = style.to_string();
        self
    }

    pub fn with_stylesheet(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet = path.into();
        self
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }
}

/// Output path: `output` if given, else `<input stem>.pdf` in the current directory.
pub fn resolve_output_path(input: &Path, output: Option<&Path>) -> Result<PathBuf> {
    if let Some(output) = output {
        return Ok(output.to_path_buf());
    }

    let stem = input
        .file_stem()
        .ok_or_else(|| Error::config(format!("cannot derive an output name from '{}'", input.display())))?;
    let mut name = stem.to_os_string();
    name.push(".pdf");

    let cwd = std::env::current_dir()
        .map_err(|e| Error::config(format!("cannot determine current directory: {}", e)))?;
    Ok(cwd.join(name))
}

/// Read the source and prepare it for highlighting: line endings normalized
/// (`\r\n` and lone `\r` become `\n`), tabs expanded, long lines wrapped.
pub fn prepare_source(source: &str, width: WrapWidth, tab_width: usize) -> String {
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
    let expanded = wrap::expand_tabs(&normalized, tab_width);
    wrap::wrap_text(&expanded, width)
}

/// Write the rendered document in one go. The file is only created once
/// rendering has succeeded.
fn write_output(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = File::create(path).map_err(|e| Error::output_write(path, e))?;
    file.write_all(bytes).map_err(|e| Error::output_write(path, e))?;
    file.flush().map_err(|e| Error::output_write(path, e))?;
    Ok(())
}

/// Run the whole conversion and return the path of the written PDF.
pub fn convert(options: &ConvertOptions) -> Result<PathBuf> {
    convert_with(&Highlighter::new(), options)
}

/// Same as [`convert`] with an already loaded highlighter.
pub fn convert_with(highlighter: &Highlighter, options: &ConvertOptions) -> Result<PathBuf> {
    let output = resolve_output_path(&options.input, options.output.as_deref())?;

    // Unknown styles fail before anything is read or written.
    highlighter.resolve_style(&options.style)?;

    let source = std::fs::read_to_string(&options.input)
        .map_err(|e| Error::input_read(&options.input, e))?;
    let prepared = prepare_source(&source, options.wrap_width, options.tab_width);

    let detection = highlighter.detect(&options.input, &prepared);
    let title = options
        .input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let document = highlighter.highlight(&prepared, &detection, &options.style, &title)?;

    let sheet = StyleSheet::load(&options.stylesheet)?;
    let rendered = pdf_generator::render(&document, &sheet)?;
    debug!(
        syntax = %document.syntax_name,
        pages = rendered.page_count,
        bytes = rendered.bytes.len(),
        "document ready"
    );

    write_output(&output, &rendered.bytes)?;
    info!("PDF created at {}", output.display());
    Ok(output)
}
