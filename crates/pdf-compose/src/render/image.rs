//! Raster image XObjects
//!
//! Pixels are stored uncompressed as DeviceRGB; transparency goes into a
//! separate DeviceGray soft mask. Stream compression happens when the
//! finished document is compressed.

use image::DynamicImage;
use lopdf::{Document, Object, ObjectId, Stream, dictionary};

/// Add an image XObject for `image` to `output`.
///
/// The soft mask is only written for images that carry an alpha channel.
pub fn create_image_xobject(output: &mut Document, image: &DynamicImage) -> ObjectId {
    let width = i64::from(image.width());
    let height = i64::from(image.height());

    let mut image_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Image",
        "Width" => width,
        "Height" => height,
        "ColorSpace" => "DeviceRGB",
        "BitsPerComponent" => 8,
    };

    if image.color().has_alpha() {
        let rgba = image.to_rgba8();
        let alpha: Vec<u8> = rgba.pixels().map(|pixel| pixel[3]).collect();
        let smask_id = output.add_object(Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => width,
                "Height" => height,
                "ColorSpace" => "DeviceGray",
                "BitsPerComponent" => 8,
            },
            alpha,
        ));
        image_dict.set("SMask", Object::Reference(smask_id));
    }

    output.add_object(Stream::new(image_dict, image.to_rgb8().into_raw()))
}
