use miette::Diagnostic;
use thiserror::Error;

/// Main error type for beadalize operations
#[derive(Error, Diagnostic, Debug)]
pub enum BeadError {
    #[error("IO error: {0}")]
    #[diagnostic(code(beadalize::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(beadalize::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(beadalize::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Unsupported image format: {message}")]
    #[diagnostic(code(beadalize::format))]
    Format {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Palette is empty")]
    #[diagnostic(
        code(beadalize::palette),
        help("Select at least one colour (check --palette-subset)")
    )]
    EmptyPalette,
}

impl BeadError {
    /// Shorthand for a configuration error without help text.
    pub fn config(message: impl Into<String>) -> Self {
        BeadError::Config {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BeadError>;
