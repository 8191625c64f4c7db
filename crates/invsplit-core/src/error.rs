//! Error types for the invsplit-core library.

use thiserror::Error;

/// Main error type for the invsplit library.
#[derive(Error, Debug)]
pub enum SplitterError {
    /// Classifier client could not be set up.
    #[error("classification error: {0}")]
    Classification(#[from] ClassificationError),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised while asking the AI service to detect invoices.
#[derive(Error, Debug)]
pub enum ClassificationError {
    /// Failed to read the source file.
    #[error("failed to read source file: {0}")]
    Io(#[from] std::io::Error),

    /// Transport-level failure talking to the service.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned {status}: {message}")]
    Api { status: u16, message: String },

    /// The service answered without any candidate text.
    #[error("service returned no text")]
    EmptyResponse,

    /// The response text is not a JSON invoice array.
    #[error("invalid JSON format: {0}")]
    Parse(String),
}

/// Errors raised while writing per-invoice artifacts.
#[derive(Error, Debug)]
pub enum SplitError {
    /// Filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// PDF library failure.
    #[error("PDF error: {0}")]
    Pdf(String),

    /// The PDF is encrypted and cannot be processed.
    #[error("PDF is encrypted")]
    Encrypted,

    /// Image library failure.
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    /// Requested page range lies outside the document.
    #[error("invalid page range {start}-{end} for a {page_count}-page document")]
    InvalidRange { start: u32, end: u32, page_count: u32 },

    /// The classifier gave no page numbers for a PDF invoice.
    #[error("classifier returned no usable page numbers")]
    MissingPageNumbers,

    /// The image cannot be divided into the requested number of regions.
    #[error("cannot split a {height}px tall image into {regions} regions")]
    TooManyRegions { height: u32, regions: usize },
}

/// Errors raised while recording metadata.
#[derive(Error, Debug)]
pub enum StoreError {
    /// MongoDB connection or insert failure.
    #[error("MongoDB error: {0}")]
    Mongo(#[from] mongodb::error::Error),

    /// Filesystem failure (JSON lines store).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Record could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Errors related to configuration loading and validation.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read or write the configuration file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is not valid JSON.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A required option is missing or empty.
    #[error("missing required option: {0}")]
    Missing(&'static str),

    /// An option holds a value the pipeline cannot work with.
    #[error("invalid value for option: {0}")]
    Invalid(&'static str),
}

/// Result type for the invsplit library.
pub type Result<T> = std::result::Result<T, SplitterError>;
