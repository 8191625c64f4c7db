//! Single-page PDF output for raster images.

use image::DynamicImage;
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};
use std::fs;
use std::path::Path;
use tracing::trace;

use super::Result;
use crate::error::SplitError;

const POINTS_PER_INCH: f32 = 72.0;

/// Write `image` as the only page of a new PDF at `path`.
///
/// The page is sized so the image prints at `dpi`.
pub fn write_image_page(image: &DynamicImage, dpi: f32, path: &Path) -> Result<()> {
    let rgb = image.to_rgb8();
    let (width, height) = rgb.dimensions();
    let page_width = width as f32 * POINTS_PER_INCH / dpi;
    let page_height = height as f32 * POINTS_PER_INCH / dpi;
    if !(page_width.is_finite() && page_height.is_finite() && page_width > 0.0 && page_height > 0.0) {
        return Err(SplitError::Pdf(format!(
            "cannot place a {}x{} image on a page at {} dpi",
            width, height, dpi
        )));
    }

    trace!(
        "Placing {}x{} image on {:.1}x{:.1}pt page",
        width, height, page_width, page_height
    );

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let image_id = doc.add_object(Stream::new(
        dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width as i64,
            "Height" => height as i64,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8,
        },
        rgb.into_raw(),
    ));

    let content = Content {
        operations: vec![
            Operation::new("q", vec![]),
            Operation::new(
                "cm",
                vec![
                    page_width.into(),
                    0.into(),
                    0.into(),
                    page_height.into(),
                    0.into(),
                    0.into(),
                ],
            ),
            Operation::new("Do", vec!["Im0".into()]),
            Operation::new("Q", vec![]),
        ],
    };
    let encoded = content.encode().map_err(|e| SplitError::Pdf(e.to_string()))?;
    let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));

    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), page_width.into(), page_height.into()],
        "Contents" => content_id,
        "Resources" => dictionary! {
            "XObject" => dictionary! { "Im0" => image_id },
        },
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    doc.save(path)
        .map_err(|e| SplitError::Pdf(format!("failed to write {}: {}", path.display(), e)))?;
    Ok(())
}
