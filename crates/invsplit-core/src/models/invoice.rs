//! Detected invoices and the artifacts derived from them.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;
use std::path::{Path, PathBuf};

const UNKNOWN: &str = "Unknown";

fn unknown() -> String {
    UNKNOWN.to_string()
}

/// Accepts a string, a number, or null.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn string_or_unknown<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?.unwrap_or_else(unknown))
}

/// One invoice reported by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetectedInvoice {
    /// Invoice number/identifier.
    #[serde(default, deserialize_with = "lenient_string")]
    pub invoice_number: Option<String>,

    /// 1-based page numbers (PDF sources only).
    #[serde(default)]
    pub page_numbers: Option<Vec<u32>>,

    /// Kind of invoice (GST, Proforma, tax, ...).
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub invoice_type: String,

    /// Issuing hotel.
    #[serde(default = "unknown", deserialize_with = "string_or_unknown")]
    pub hotel_name: String,
}

impl DetectedInvoice {
    /// Create an invoice with only a number; type and hotel are unknown.
    pub fn new(invoice_number: impl Into<String>) -> Self {
        Self {
            invoice_number: Some(invoice_number.into()),
            page_numbers: None,
            invoice_type: unknown(),
            hotel_name: unknown(),
        }
    }

    /// Set the page numbers.
    pub fn with_pages(mut self, pages: &[u32]) -> Self {
        self.page_numbers = Some(pages.to_vec());
        self
    }

    /// Inclusive 1-based page range covered by this invoice.
    ///
    /// Returns `None` when no usable page numbers were reported.
    pub fn page_range(&self) -> Option<(u32, u32)> {
        let pages = self.page_numbers.as_deref()?;
        let start = *pages.iter().min()?;
        let end = *pages.iter().max()?;
        (start >= 1).then_some((start, end))
    }
}

/// How an artifact was cut out of its source file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitMethod {
    /// Contiguous page range of a PDF.
    PageRange,
    /// Whole image as one page.
    FullImage,
    /// Top or bottom half of an image.
    ImageHalf,
    /// One of three or more horizontal strips of an image.
    ImageStrip,
}

/// Outcome of an artifact or a whole file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Success,
    Failed,
}

/// Metadata for one extracted single-invoice file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceArtifact {
    pub invoice_number: Option<String>,

    /// 1-based inclusive pair (PDF sources only).
    pub page_range: Option<[u32; 2]>,

    pub total_pages: u32,

    /// Absolute path of the written PDF.
    pub saved_pdf_path: Option<PathBuf>,

    pub invoice_type: String,

    pub hotel_name: String,

    pub split_method: SplitMethod,

    /// 1-based region index (image splits only).
    pub part_number: Option<u32>,

    pub status: Status,

    pub error_message: String,
}

impl InvoiceArtifact {
    fn from_invoice(invoice: &DetectedInvoice, split_method: SplitMethod) -> Self {
        Self {
            invoice_number: invoice.invoice_number.clone(),
            page_range: None,
            total_pages: 1,
            saved_pdf_path: None,
            invoice_type: invoice.invoice_type.clone(),
            hotel_name: invoice.hotel_name.clone(),
            split_method,
            part_number: None,
            status: Status::Failed,
            error_message: String::new(),
        }
    }

    /// Artifact written successfully to `path`.
    pub fn saved(invoice: &DetectedInvoice, split_method: SplitMethod, path: &Path) -> Self {
        let path = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        Self {
            saved_pdf_path: Some(path),
            status: Status::Success,
            ..Self::from_invoice(invoice, split_method)
        }
    }

    /// Artifact that could not be written.
    pub fn failed(invoice: &DetectedInvoice, split_method: SplitMethod, error: impl Display) -> Self {
        let mut message = error.to_string();
        if message.is_empty() {
            message = "unknown error".to_string();
        }
        Self {
            error_message: message,
            ..Self::from_invoice(invoice, split_method)
        }
    }

    /// Record the 1-based inclusive page range.
    pub fn with_page_range(mut self, start: u32, end: u32) -> Self {
        self.page_range = Some([start, end]);
        self.total_pages = end - start + 1;
        self
    }

    /// Record the 1-based image region index.
    pub fn with_part(mut self, part_number: u32) -> Self {
        self.part_number = Some(part_number);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}
