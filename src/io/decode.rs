use std::io::{BufRead, Cursor, Seek};
use std::path::Path;

use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageReader};

use crate::foundation::error::AspectFitResult;

/// Decode the image at `path` and apply its EXIF orientation.
///
/// The format is sniffed from the content, not the extension.
pub fn load_image(path: impl AsRef<Path>) -> AspectFitResult<DynamicImage> {
    decode_oriented(ImageReader::open(path)?)
}

/// In-memory variant of [`load_image`].
pub fn load_image_from_memory(bytes: &[u8]) -> AspectFitResult<DynamicImage> {
    decode_oriented(ImageReader::new(Cursor::new(bytes)))
}

fn decode_oriented<R: BufRead + Seek>(reader: ImageReader<R>) -> AspectFitResult<DynamicImage> {
    let mut decoder = reader.with_guessed_format()?.into_decoder()?;
    // Unreadable EXIF is treated as "no rotation", never as a decode failure.
    let orientation = decoder
        .orientation()
        .unwrap_or(Orientation::NoTransforms);
    let mut img = DynamicImage::from_decoder(decoder)?;
    if orientation != Orientation::NoTransforms {
        tracing::debug!(?orientation, "applying EXIF orientation");
        img.apply_orientation(orientation);
    }
    Ok(img)
}
