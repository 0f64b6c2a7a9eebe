//! Edge shift: move image content right by a fixed number of columns.

use image::{DynamicImage, ImageBuffer, Pixel};

use crate::foundation::error::{AspectFitError, AspectFitResult};

/// Drop `amount` columns on the right and repeat the left-most column
/// `amount` times on the left.
///
/// Size is unchanged. 8-bit gray and RGB(A) buffers keep their pixel format;
/// anything else comes back as RGBA8.
pub fn shift_right(img: &DynamicImage, amount: u32) -> AspectFitResult<DynamicImage> {
    if amount == 0 {
        return Err(AspectFitError::invalid_argument("shift amount must be >= 1"));
    }
    if img.width() <= amount {
        return Err(AspectFitError::invalid_dimension(format!(
            "image width {} must exceed shift amount {amount}",
            img.width()
        )));
    }

    let out = match img {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(shift_buffer(buf, amount)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(shift_buffer(buf, amount)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(shift_buffer(buf, amount)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(shift_buffer(buf, amount)),
        other => DynamicImage::ImageRgba8(shift_buffer(&other.to_rgba8(), amount)),
    };
    tracing::debug!(amount, width = img.width(), height = img.height(), "shifted image");
    Ok(out)
}

fn shift_buffer<P: Pixel>(
    src: &ImageBuffer<P, Vec<P::Subpixel>>,
    amount: u32,
) -> ImageBuffer<P, Vec<P::Subpixel>> {
    let (w, h) = src.dimensions();
    ImageBuffer::from_fn(w, h, |x, y| *src.get_pixel(x.saturating_sub(amount), y))
}
