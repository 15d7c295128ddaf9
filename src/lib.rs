//! # codepdf
//!
//! Turn a source code file into a print-ready, syntax-highlighted PDF.
//!
//! The conversion runs as a fixed pipeline:
//!
//! - **Prepare**: normalize line endings, expand tabs and wrap long lines,
//!   marking every display-only break with `↩` / `↪`
//! - **Highlight**: detect the language (file extension, then content, then
//!   plain text) and colour the prepared text with a named style
//! - **Render**: lay the highlighted lines out on fixed-size pages using the
//!   style sheet, and write the PDF
//!
//! ## Quick Start
//!
//! ```rust
//! use codepdf::wrap::{wrap_text, WrapWidth};
//!
//! let width = WrapWidth::new(10).unwrap();
//! let prepared = wrap_text("let answer = 42; // the answer\n", width);
//! assert!(prepared.lines().all(|l| l.chars().count() <= 10));
//! ```
//!
//! ## Converting a file
//!
//! ```rust,no_run
//! use codepdf::converter::{convert, ConvertOptions};
//!
//! let options = ConvertOptions::new("src/main.rs")
//!     .with_output("main.pdf")
//!     .with_style("InspiredGitHub");
//! convert(&options).expect("Failed to convert");
//! ```
//!
//! ## Modules
//!
//! - [`wrap`]: line wrapping and tab expansion
//! - [`highlight`]: syntax detection and highlighting
//! - [`markup`]: the highlighted document model
//! - [`stylesheet`]: page geometry and fonts
//! - [`pdf_generator`]: PDF rendering
//! - [`text_encoding`]: text to PDF font encodings
//! - [`converter`]: the end-to-end pipeline
//! - [`error`]: error types and exit codes

pub mod converter;
pub mod error;
pub mod highlight;
pub mod markup;
pub mod pdf_generator;
pub mod stylesheet;
pub mod text_encoding;
pub mod wrap;

pub use error::{Error, Result};
