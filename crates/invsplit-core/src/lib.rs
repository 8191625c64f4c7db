//! Core library for splitting scanned invoice files.
//!
//! This crate provides:
//! - Invoice detection through a document-understanding AI service
//! - PDF page-range extraction per detected invoice
//! - Image region splitting into single-page PDFs
//! - Metadata recording into MongoDB or a JSON lines file
//! - The folder pipeline tying these together

pub mod classifier;
pub mod error;
pub mod models;
pub mod pdf;
pub mod pipeline;
pub mod region;
pub mod store;

pub use classifier::{DocumentClassifier, GeminiClassifier, parse_invoice_response};
pub use error::{ClassificationError, ConfigError, Result, SplitError, SplitterError, StoreError};
pub use models::config::SplitterConfig;
pub use models::invoice::{DetectedInvoice, InvoiceArtifact, SplitMethod, Status};
pub use models::record::FileRecord;
pub use models::source::{SourceFile, SourceKind};
pub use pipeline::{FileOutcome, Pipeline, RunSummary};
pub use store::{JsonlStore, MetadataStore, MongoStore, StoreBackend};
