//! PDF processing module.

mod pages;
mod writer;

pub use pages::{extract_page_range, load_document, page_count, page_range_path};
pub use writer::write_image_page;

use crate::error::SplitError;

/// Result type for PDF operations.
pub type Result<T> = std::result::Result<T, SplitError>;

#[cfg(test)]
pub(crate) use pages::tests::write_numbered_pdf;
#[cfg(test)]
pub(crate) use writer::tests::embedded_image;
