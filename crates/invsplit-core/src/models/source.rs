//! Source files submitted for splitting.

use std::path::{Path, PathBuf};

use crate::error::SplitError;
use crate::pdf;

/// Supported source file kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Jpeg,
    Png,
}

impl SourceKind {
    /// Detect the kind from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "pdf" => Some(Self::Pdf),
            "jpg" | "jpeg" => Some(Self::Jpeg),
            "png" => Some(Self::Png),
            _ => None,
        }
    }

    /// MIME type sent to the classifier.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Jpeg => "image/jpeg",
            Self::Png => "image/png",
        }
    }
}

/// One PDF or image file, inspected once per run.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub kind: SourceKind,
    /// Number of pages (PDF only).
    pub page_count: Option<u32>,
}

impl SourceFile {
    /// Inspect a file; returns `Ok(None)` for unsupported extensions.
    pub fn inspect(path: &Path) -> Result<Option<Self>, SplitError> {
        let Some(kind) = SourceKind::from_path(path) else {
            return Ok(None);
        };

        let page_count = match kind {
            SourceKind::Pdf => Some(pdf::page_count(path)?),
            _ => None,
        };

        Ok(Some(Self {
            path: path.to_path_buf(),
            kind,
            page_count,
        }))
    }
}

/// File name without directory, as stored in records.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// File name without extension, used to namespace artifacts.
pub(crate) fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "document".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_extension() {
        assert_eq!(SourceKind::from_path(Path::new("a.pdf")), Some(SourceKind::Pdf));
        assert_eq!(SourceKind::from_path(Path::new("a.PDF")), Some(SourceKind::Pdf));
        assert_eq!(SourceKind::from_path(Path::new("a.JPEG")), Some(SourceKind::Jpeg));
        assert_eq!(SourceKind::from_path(Path::new("a.jpg")), Some(SourceKind::Jpeg));
        assert_eq!(SourceKind::from_path(Path::new("a.png")), Some(SourceKind::Png));
        assert_eq!(SourceKind::from_path(Path::new("a.tiff")), None);
        assert_eq!(SourceKind::from_path(Path::new("README")), None);
    }

    #[test]
    fn test_names() {
        assert_eq!(base_name(Path::new("/in/scan.01.png")), "scan.01");
        assert_eq!(file_name(Path::new("/in/scan.01.png")), "scan.01.png");
    }

    #[test]
    fn test_inspect_unsupported() {
        assert!(SourceFile::inspect(Path::new("notes.txt")).unwrap().is_none());
    }

    #[test]
    fn test_inspect_image_has_no_page_count() {
        let source = SourceFile::inspect(Path::new("missing.png")).unwrap().unwrap();
        assert_eq!(source.kind, SourceKind::Png);
        assert_eq!(source.page_count, None);
    }

    #[test]
    fn test_inspect_pdf_counts_pages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Batch.PDF");
        pdf::write_numbered_pdf(&path, 4);

        let source = SourceFile::inspect(&path).unwrap().unwrap();
        assert_eq!(source.kind, SourceKind::Pdf);
        assert_eq!(source.page_count, Some(4));
    }

    #[test]
    fn test_inspect_unreadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        std::fs::write(&path, b"").unwrap();
        assert!(SourceFile::inspect(&path).is_err());
    }
}
