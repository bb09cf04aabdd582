use miette::Diagnostic;
use thiserror::Error;

/// Main error type for pixfx operations
#[derive(Error, Diagnostic, Debug)]
pub enum FxError {
    #[error("IO error: {0}")]
    #[diagnostic(code(pixfx::io))]
    IoError(#[from] std::io::Error),

    #[error("IO error with {path}: {message}")]
    #[diagnostic(code(pixfx::io))]
    Io {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("invalid colour: {token:?}")]
    #[diagnostic(
        code(pixfx::colour),
        help("colours are six hex digits with a leading '#', e.g. #8BAC0F")
    )]
    InvalidColour { token: String },

    #[error("configuration error: {message}")]
    #[diagnostic(code(pixfx::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("image error with {path}: {message}")]
    #[diagnostic(code(pixfx::image))]
    Image {
        path: std::path::PathBuf,
        message: String,
    },

    #[error("build error: {message}")]
    #[diagnostic(code(pixfx::build))]
    Build {
        message: String,
        #[help]
        help: Option<String>,
    },
}

pub type Result<T> = std::result::Result<T, FxError>;
