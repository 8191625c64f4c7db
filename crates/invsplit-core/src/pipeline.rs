//! Folder walking and per-file processing.

use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info, warn};

use crate::classifier::{DocumentClassifier, GeminiClassifier};
use crate::error::{Result, SplitError};
use crate::models::config::{SplitConfig, SplitterConfig};
use crate::models::invoice::{DetectedInvoice, InvoiceArtifact, SplitMethod};
use crate::models::record::{FileRecord, NO_INVOICE_FOUND};
use crate::models::source::{SourceFile, SourceKind, file_name};
use crate::store::{MetadataStore, StoreBackend};
use crate::{pdf, region};

/// What happened to one file.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// Extension is not one of pdf, jpg, jpeg, png.
    Unsupported,
    /// PDF too short to be worth splitting; nothing recorded.
    SkippedShortPdf { page_count: u32 },
    /// A record was built and handed to the store.
    Recorded {
        record: FileRecord,
        /// `None` when the insert failed.
        stored_id: Option<String>,
    },
}

/// Counters for one folder run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Files handed to per-file processing.
    pub processed: usize,
    /// Unsupported entries, directories, and short PDFs.
    pub skipped: usize,
    /// Records with status Success.
    pub succeeded: usize,
    /// Records with status Failed.
    pub failed: usize,
    /// Records the store accepted.
    pub stored: usize,
}

impl RunSummary {
    fn add(&mut self, outcome: &FileOutcome) {
        match outcome {
            FileOutcome::Unsupported | FileOutcome::SkippedShortPdf { .. } => self.skipped += 1,
            FileOutcome::Recorded { record, stored_id } => {
                if record.is_success() {
                    self.succeeded += 1;
                } else {
                    self.failed += 1;
                }
                if stored_id.is_some() {
                    self.stored += 1;
                }
            }
        }
    }
}

/// Classify, split and record every file of a folder, one at a time.
pub struct Pipeline<C, S> {
    classifier: C,
    store: S,
    output_dir: PathBuf,
    split: SplitConfig,
}

impl Pipeline<GeminiClassifier, StoreBackend> {
    /// Validate `config` and build the Gemini classifier and configured store.
    ///
    /// No network connection is made until the first file is processed.
    pub fn from_config(config: &SplitterConfig) -> Result<Self> {
        config.validate()?;
        let classifier = GeminiClassifier::new(config.api_key.clone(), config.classifier.clone())?;
        let store = StoreBackend::from_config(&config.store);
        info!("Recording file metadata to {}", store.describe());
        Ok(Self::new(config, classifier, store))
    }
}

impl<C: DocumentClassifier, S: MetadataStore> Pipeline<C, S> {
    pub fn new(config: &SplitterConfig, classifier: C, store: S) -> Self {
        Self {
            classifier,
            store,
            output_dir: config.output_dir.clone(),
            split: config.split.clone(),
        }
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process the immediate entries of `dir` in listing order.
    ///
    /// Only a directory that cannot be opened is an error. Per-file failures
    /// are logged and recorded, and the walk continues; a listing that breaks
    /// off midway ends the walk with the files seen so far.
    pub async fn process_folder(&self, dir: &Path) -> Result<RunSummary> {
        let mut reader = tokio::fs::read_dir(dir).await?;
        let mut entries = Vec::new();

        loop {
            match reader.next_entry().await {
                Ok(Some(entry)) => entries.push(Ok(entry.path())),
                Ok(None) => break,
                Err(e) => {
                    entries.push(Err(e));
                    break;
                }
            }
        }

        let summary = self.process_entries(entries).await;
        info!(
            "Finished {}: {} processed, {} skipped, {} succeeded, {} failed",
            dir.display(),
            summary.processed,
            summary.skipped,
            summary.succeeded,
            summary.failed
        );
        Ok(summary)
    }

    /// Process listed paths in order, stopping at the first listing error.
    pub async fn process_entries<I>(&self, entries: I) -> RunSummary
    where
        I: IntoIterator<Item = io::Result<PathBuf>>,
    {
        let mut summary = RunSummary::default();

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    error!("Directory listing failed, stopping early: {}", e);
                    break;
                }
            };
            let name = file_name(&path);

            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file || SourceKind::from_path(&path).is_none() {
                info!("Skipping {}, unsupported file type or directory.", name);
                summary.skipped += 1;
                continue;
            }

            info!("Processing file: {}", name);
            summary.processed += 1;
            let outcome = self.process_file(&path).await;
            summary.add(&outcome);
        }

        summary
    }

    /// Classify one file, split it into per-invoice PDFs, and record the outcome.
    pub async fn process_file(&self, path: &Path) -> FileOutcome {
        let name = file_name(path);

        let source = match SourceFile::inspect(path) {
            Ok(Some(source)) => source,
            Ok(None) => {
                info!("Skipping {}, unsupported file type.", name);
                return FileOutcome::Unsupported;
            }
            Err(e) => {
                warn!("Failed to read {}: {}", path.display(), e);
                let record = FileRecord::failed(name, format!("Failed to read source file: {}", e));
                return self.record(record).await;
            }
        };

        if let Some(page_count) = source.page_count {
            if page_count < self.split.min_pdf_pages {
                info!("Skipping {} ({} pages)", path.display(), page_count);
                return FileOutcome::SkippedShortPdf { page_count };
            }
        }

        let invoices = match self.classifier.classify(path).await {
            Ok(invoices) => invoices,
            Err(e) => {
                warn!("Classification failed for {}: {}", path.display(), e);
                let record = FileRecord::failed(name, format!("Classification failed: {}", e));
                return self.record(record).await;
            }
        };

        if invoices.is_empty() {
            info!("No invoice found in {}", path.display());
            return self.record(FileRecord::failed(name, NO_INVOICE_FOUND)).await;
        }
        debug!("Detected {} invoices in {}", invoices.len(), path.display());

        let record = match source.kind {
            SourceKind::Pdf => FileRecord::from_artifacts(name, self.split_pdf(&source, &invoices)),
            SourceKind::Jpeg | SourceKind::Png => {
                match region::split_image(path, &invoices, &self.output_dir, self.split.image_pdf_dpi) {
                    Ok(artifacts) => FileRecord::from_artifacts(name, artifacts),
                    Err(e) => {
                        warn!("Image splitting failed for {}: {}", path.display(), e);
                        FileRecord::failed(name, format!("Failed to process image invoices: {}", e))
                    }
                }
            }
        };

        self.record(record).await
    }

    fn split_pdf(&self, source: &SourceFile, invoices: &[DetectedInvoice]) -> Vec<InvoiceArtifact> {
        invoices
            .iter()
            .map(|invoice| {
                let Some((start, end)) = invoice.page_range() else {
                    warn!(
                        "Invoice {:?} in {} has no page numbers",
                        invoice.invoice_number,
                        source.path.display()
                    );
                    return InvoiceArtifact::failed(
                        invoice,
                        SplitMethod::PageRange,
                        SplitError::MissingPageNumbers,
                    );
                };

                match pdf::extract_page_range(&source.path, start - 1, end - 1, &self.output_dir) {
                    Ok(path) => InvoiceArtifact::saved(invoice, SplitMethod::PageRange, &path)
                        .with_page_range(start, end),
                    Err(e) => {
                        warn!("PDF splitting error for {}: {}", source.path.display(), e);
                        InvoiceArtifact::failed(
                            invoice,
                            SplitMethod::PageRange,
                            format!("Failed to save PDF: {}", e),
                        )
                        .with_page_range(start, end)
                    }
                }
            })
            .collect()
    }

    async fn record(&self, record: FileRecord) -> FileOutcome {
        let stored_id = match self.store.insert(&record).await {
            Ok(id) => {
                info!(
                    "Metadata for {} ({:?}, {} invoices) inserted with id {}",
                    record.source_pdf, record.status, record.total_invoices, id
                );
                Some(id)
            }
            Err(e) => {
                error!("Failed to insert metadata for {}: {}", record.source_pdf, e);
                None
            }
        };

        FileOutcome::Recorded { record, stored_id }
    }
}
