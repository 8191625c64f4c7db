//! Invoice detection through a document-understanding AI service.

pub mod gemini;
mod parse;

pub use gemini::GeminiClassifier;
pub use parse::parse_invoice_response;

use std::future::Future;
use std::path::Path;

use crate::error::ClassificationError;
use crate::models::invoice::DetectedInvoice;

/// Result type for classifier operations.
pub type Result<T> = std::result::Result<T, ClassificationError>;

/// Instruction sent alongside every document.
pub const INVOICE_PROMPT: &str = r#"You are a document analyst. Your task is to detect all DISTINCT invoices in this file.

Return data in this exact JSON format:
[
  {"invoice_number": "INV-001", "page_numbers": [1, 2], "invoice_type": "type like GST, Proforma, tax, e-invoice etc", "hotel_name": "Hotel A"},
  {"invoice_number": "INV-002", "page_numbers": [3], "invoice_type": "type like GST, Proforma, tax, e-invoice etc.", "hotel_name": "Hotel B"}
]

Rules:
- If the file is an image, 'page_numbers' can be omitted or null.
- Only return the JSON array - nothing else.
- Return an empty array if no invoice found.
"#;

/// Trait for services that find the invoices inside a source file.
pub trait DocumentClassifier {
    /// Detect the distinct invoices in the file at `path`.
    ///
    /// An empty list means the service found no invoice.
    fn classify(&self, path: &Path) -> impl Future<Output = Result<Vec<DetectedInvoice>>> + Send;
}
