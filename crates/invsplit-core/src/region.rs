//! Image splitting into one single-page PDF per detected invoice.
//!
//! One invoice keeps the whole image. Several invoices divide the image into
//! horizontal strips of equal height, top to bottom, paired in order with the
//! detected invoices. Two invoices give the top and bottom halves.

use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::SplitError;
use crate::models::invoice::{DetectedInvoice, InvoiceArtifact, SplitMethod};
use crate::models::source::base_name;
use crate::pdf::write_image_page;

/// Vertical extent of one region, in pixel rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Band {
    pub top: u32,
    pub height: u32,
}

/// Divide `height` rows into `regions` bands.
///
/// Band `i` covers rows `[i*h/n, (i+1)*h/n)`; leftover rows land in the last band.
pub fn bands(height: u32, regions: usize) -> Result<Vec<Band>, SplitError> {
    let n = regions as u64;
    if regions == 0 || (height as u64) < n {
        return Err(SplitError::TooManyRegions { height, regions });
    }

    let h = height as u64;
    Ok((0..n)
        .map(|i| {
            let top = i * h / n;
            let bottom = (i + 1) * h / n;
            Band {
                top: top as u32,
                height: (bottom - top) as u32,
            }
        })
        .collect())
}

/// Output path for the whole-image PDF.
pub fn full_image_path(source: &Path, output_dir: &Path) -> PathBuf {
    let base = base_name(source);
    output_dir.join(&base).join(format!("{}.pdf", base))
}

/// Output path for the 1-based region `part`.
pub fn part_path(source: &Path, part: u32, output_dir: &Path) -> PathBuf {
    let base = base_name(source);
    output_dir.join(&base).join(format!("{}_part_{}.pdf", base, part))
}

/// Split the image at `source` according to `invoices`.
///
/// Returns one successful artifact per invoice, or the first error hit.
pub fn split_image(
    source: &Path,
    invoices: &[DetectedInvoice],
    output_dir: &Path,
    dpi: f32,
) -> Result<Vec<InvoiceArtifact>, SplitError> {
    if invoices.is_empty() {
        return Ok(Vec::new());
    }

    let image = image::open(source)?;

    if let [invoice] = invoices {
        let path = full_image_path(source, output_dir);
        write_image_page(&image, dpi, &path)?;
        debug!("Saved {} as {}", source.display(), path.display());
        return Ok(vec![InvoiceArtifact::saved(invoice, SplitMethod::FullImage, &path)]);
    }

    let method = if invoices.len() == 2 {
        SplitMethod::ImageHalf
    } else {
        SplitMethod::ImageStrip
    };

    let bands = bands(image.height(), invoices.len())?;
    let mut artifacts = Vec::with_capacity(invoices.len());

    for (index, (band, invoice)) in bands.iter().zip(invoices).enumerate() {
        let part = index as u32 + 1;
        let region = image.crop_imm(0, band.top, image.width(), band.height);
        let path = part_path(source, part, output_dir);
        write_image_page(&region, dpi, &path)?;

        debug!(
            "Saved rows {}..{} of {} as {}",
            band.top,
            band.top + band.height,
            source.display(),
            path.display()
        );
        artifacts.push(InvoiceArtifact::saved(invoice, method, &path).with_part(part));
    }

    Ok(artifacts)
}
