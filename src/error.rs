use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using the library's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a conversion.
///
/// Every variant is fatal for the run; [`Error::exit_code`] gives the process
/// status the binary reports for it.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The requested highlighting style does not exist.
    #[error("Invalid style name: {name}\nExpecting one of:\n    {}", available.join("\n    "))]
    InvalidStyle {
        /// Style that was asked for
        name: String,
        /// Sorted names of the styles that do exist
        available: Vec<String>,
    },

    /// Wrap width too narrow for the wrapping loop to converge.
    #[error("Invalid wrap width {width}: must be at least 3")]
    InvalidWidth {
        /// Rejected width
        width: usize,
    },

    /// Configuration problem (style sheet resource, arguments).
    #[error("Invalid configuration: {message}")]
    Config {
        /// Detailed error message
        message: String,
    },

    /// The input file could not be read.
    #[error("Unable to read file: {}\n{source}", path.display())]
    InputRead {
        /// Input path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The highlighting collaborator failed on otherwise valid input.
    #[error("Failed to highlight source: {message}")]
    Highlight {
        /// Error message
        message: String,
    },

    /// The output document could not be written.
    #[error("Unable to write file: {}\n{source}", path.display())]
    OutputWrite {
        /// Output path
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },
}

impl Error {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Creates an input read error with path context.
    #[must_use]
    pub fn input_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::InputRead {
            path: path.into(),
            source,
        }
    }

    /// Creates an output write error with path context.
    #[must_use]
    pub fn output_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputWrite {
            path: path.into(),
            source,
        }
    }

    /// Process exit status for this error.
    ///
    /// Input read failures exit with 2, everything else with 1.
    #[must_use]
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InputRead { .. } => 2,
            _ => 1,
        }
    }
}

impl From<syntect::Error> for Error {
    fn from(err: syntect::Error) -> Self {
        Self::Highlight {
            message: err.to_string(),
        }
    }
}
