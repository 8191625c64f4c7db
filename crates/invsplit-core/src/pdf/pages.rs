//! Page-range extraction using lopdf.

use lopdf::Document;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::Result;
use crate::error::SplitError;
use crate::models::source::base_name;

/// Load a PDF, decrypting documents protected only by an empty password.
pub fn load_document(path: &Path) -> Result<Document> {
    let mut doc = Document::load(path).map_err(|e| SplitError::Pdf(e.to_string()))?;

    if doc.is_encrypted() {
        if doc.decrypt("").is_err() {
            return Err(SplitError::Encrypted);
        }
        debug!("Decrypted {} with empty password", path.display());
    }

    Ok(doc)
}

/// Number of pages in the PDF at `path`.
pub fn page_count(path: &Path) -> Result<u32> {
    let doc = load_document(path)?;
    Ok(doc.get_pages().len() as u32)
}

/// Output location for a 0-based inclusive page range of `source`.
///
/// `<output_dir>/<base>/<base>_page_<start+1>-<end+1>.pdf`
pub fn page_range_path(source: &Path, start: u32, end: u32, output_dir: &Path) -> PathBuf {
    let base = base_name(source);
    output_dir
        .join(&base)
        .join(format!("{}_page_{}-{}.pdf", base, start + 1, end + 1))
}

/// Copy pages `start..=end` (0-based) of `source` into a new PDF.
///
/// Requires `start <= end < page_count`. Returns the written path.
pub fn extract_page_range(source: &Path, start: u32, end: u32, output_dir: &Path) -> Result<PathBuf> {
    let mut doc = load_document(source)?;

    let page_count = doc.get_pages().len() as u32;
    if start > end || end >= page_count {
        return Err(SplitError::InvalidRange {
            start: start + 1,
            end: end + 1,
            page_count,
        });
    }

    // lopdf numbers pages from 1
    let unwanted: Vec<u32> = (1..=page_count)
        .filter(|page| *page < start + 1 || *page > end + 1)
        .collect();
    doc.delete_pages(&unwanted);
    doc.prune_objects();
    doc.renumber_objects();
    doc.compress();

    let output_path = page_range_path(source, start, end, output_dir);
    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    doc.save(&output_path)
        .map_err(|e| SplitError::Pdf(format!("failed to write {}: {}", output_path.display(), e)))?;

    debug!(
        "Wrote pages {}-{} of {} to {}",
        start + 1,
        end + 1,
        source.display(),
        output_path.display()
    );
    Ok(output_path)
}
