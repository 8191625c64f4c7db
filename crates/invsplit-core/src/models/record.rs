//! Per-file metadata records written to the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::invoice::{InvoiceArtifact, Status};

/// Error message used when the classifier found nothing.
pub const NO_INVOICE_FOUND: &str = "No invoice found";

/// Aggregate document describing every artifact cut from one source file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Source file name (without directory).
    pub source_pdf: String,

    /// When the file was processed.
    pub processed_at: DateTime<Utc>,

    /// Always equal to `invoices.len()`.
    pub total_invoices: u32,

    pub invoices: Vec<InvoiceArtifact>,

    pub status: Status,

    pub error_message: String,
}

impl FileRecord {
    /// Build a record from the artifacts of one file.
    ///
    /// The file succeeds when at least one artifact was written.
    pub fn from_artifacts(source_pdf: impl Into<String>, invoices: Vec<InvoiceArtifact>) -> Self {
        let any_saved = invoices.iter().any(InvoiceArtifact::is_success);
        let (status, error_message) = if any_saved {
            (Status::Success, String::new())
        } else {
            (Status::Failed, "No invoice could be extracted".to_string())
        };

        Self {
            source_pdf: source_pdf.into(),
            processed_at: Utc::now(),
            total_invoices: invoices.len() as u32,
            invoices,
            status,
            error_message,
        }
    }

    /// Record for a file that produced no artifacts at all.
    pub fn failed(source_pdf: impl Into<String>, error_message: impl Into<String>) -> Self {
        Self {
            source_pdf: source_pdf.into(),
            processed_at: Utc::now(),
            total_invoices: 0,
            invoices: Vec::new(),
            status: Status::Failed,
            error_message: error_message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == Status::Success
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::invoice::{DetectedInvoice, SplitMethod};
    use pretty_assertions::assert_eq;
    use std::path::Path;

    #[test]
    fn test_total_matches_artifacts() {
        let invoice = DetectedInvoice::new("INV-1");
        let record = FileRecord::from_artifacts(
            "a.pdf",
            vec![
                InvoiceArtifact::saved(&invoice, SplitMethod::PageRange, Path::new("/o/a.pdf")),
                InvoiceArtifact::failed(&invoice, SplitMethod::PageRange, "disk full"),
            ],
        );
        assert_eq!(record.total_invoices, 2);
        assert_eq!(record.invoices.len(), 2);
        assert_eq!(record.status, Status::Success);
        assert_eq!(record.error_message, "");
    }

    #[test]
    fn test_all_failed_artifacts() {
        let invoice = DetectedInvoice::new("INV-1");
        let record = FileRecord::from_artifacts(
            "a.pdf",
            vec![InvoiceArtifact::failed(&invoice, SplitMethod::PageRange, "boom")],
        );
        assert_eq!(record.status, Status::Failed);
        assert!(!record.error_message.is_empty());
    }

    #[test]
    fn test_failed_record_shape() {
        let record = FileRecord::failed("scan.png", NO_INVOICE_FOUND);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["source_pdf"], "scan.png");
        assert_eq!(json["total_invoices"], 0);
        assert_eq!(json["invoices"], serde_json::json!([]));
        assert_eq!(json["status"], "Failed");
        assert_eq!(json["error_message"], "No invoice found");
        assert!(json["processed_at"].as_str().unwrap().contains('T'));
    }
}
