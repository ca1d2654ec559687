//! Raster image to page conversion
//!
//! An image becomes a one-page PDF the size of the paper format. Rotation
//! and scale are applied to the pixels first; that resampling is the only
//! one in the pipeline. The result is then fitted inside the page margin
//! (enlarging small images), centred, and drawn as an image XObject.

use crate::constants::RASTER_MARGIN_PT;
use crate::document::SourceDocument;
use crate::render::{PageTreeBuilder, create_image_xobject};
use crate::types::{DocumentId, PaperFormat, Result, Rotation, Scale};
use image::DynamicImage;
use image::imageops::FilterType;
use lopdf::{Dictionary, Document, Object};

const IMAGE_RESOURCE_NAME: &str = "Im0";

/// Convert encoded image bytes into a single-page source document.
///
/// # Arguments
/// * `id` - Identifier for the resulting document
/// * `image_bytes` - Encoded image (any format the `image` crate decodes)
/// * `rotation` - Clockwise rotation applied to the pixels
/// * `scale` - Resampling factor applied after rotation
/// * `paper` - Size of the produced page
pub fn raster_to_document(
    id: impl Into<DocumentId>,
    image_bytes: &[u8],
    rotation: Rotation,
    scale: Scale,
    paper: PaperFormat,
) -> Result<SourceDocument> {
    let document = rasterize(image_bytes, rotation, scale, paper)?;
    Ok(SourceDocument::from_pdf(id, document))
}

/// Build the one-page PDF for an image
pub(crate) fn rasterize(
    image_bytes: &[u8],
    rotation: Rotation,
    scale: Scale,
    paper: PaperFormat,
) -> Result<Document> {
    let image = image::load_from_memory(image_bytes)?;
    log::debug!(
        "Rasterizing {}×{} px image onto {}",
        image.width(),
        image.height(),
        paper.name
    );

    let image = resample(rotate(image, rotation), scale);

    let mut builder = PageTreeBuilder::new();
    let image_id = create_image_xobject(builder.document_mut(), &image);

    let (page_width, page_height) = paper.dimensions();
    let content = image_command(
        image.width() as f32,
        image.height() as f32,
        page_width,
        page_height,
    );

    let mut xobjects = Dictionary::new();
    xobjects.set(IMAGE_RESOURCE_NAME, Object::Reference(image_id));
    let mut resources = Dictionary::new();
    resources.set("XObject", Object::Dictionary(xobjects));

    builder.push_content_page(page_width, page_height, content, resources);

    let mut document = builder.finish();
    document.compress();
    Ok(document)
}

/// Rotate pixels clockwise by quarter turns (lossless)
fn rotate(image: DynamicImage, rotation: Rotation) -> DynamicImage {
    match rotation {
        Rotation::None => image,
        Rotation::Clockwise90 => image.rotate90(),
        Rotation::Clockwise180 => image.rotate180(),
        Rotation::Clockwise270 => image.rotate270(),
    }
}

fn resample(image: DynamicImage, scale: Scale) -> DynamicImage {
    if scale == Scale::IDENTITY {
        return image;
    }
    let factor = scale.factor();
    let width = ((image.width() as f32 * factor).round() as u32).max(1);
    let height = ((image.height() as f32 * factor).round() as u32).max(1);
    image.resize_exact(width, height, FilterType::Triangle)
}

/// Content stream drawing the image fitted and centred inside the margin.
///
/// Image XObjects occupy the unit square, so the matrix carries the drawn
/// size directly.
fn image_command(image_width: f32, image_height: f32, page_width: f32, page_height: f32) -> String {
    let available_width = (page_width - 2.0 * RASTER_MARGIN_PT).max(0.0);
    let available_height = (page_height - 2.0 * RASTER_MARGIN_PT).max(0.0);

    let fit = (available_width / image_width).min(available_height / image_height);
    let width = image_width * fit;
    let height = image_height * fit;
    let x = RASTER_MARGIN_PT + (available_width - width) / 2.0;
    let y = RASTER_MARGIN_PT + (available_height - height) / 2.0;

    format!("q {width} 0 0 {height} {x} {y} cm /{IMAGE_RESOURCE_NAME} Do Q\n")
}
