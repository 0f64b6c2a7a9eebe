use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use image::buffer::ConvertBuffer as _;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::{CompressionType, FilterType, PngEncoder};
use image::{DynamicImage, ImageFormat, RgbImage, RgbaImage};

use crate::foundation::error::{AspectFitError, AspectFitResult};

pub const DEFAULT_JPEG_QUALITY: u8 = 95;
pub const DEFAULT_FORMAT: &str = "jpg";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveOptions {
    /// JPEG quality, 1..=100.
    pub jpeg_quality: u8,
    /// Extension (without the dot) given to outputs of directory runs.
    pub format: String,
}

impl Default for SaveOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            format: DEFAULT_FORMAT.to_string(),
        }
    }
}

/// Encode `img` to `path`, choosing the format from the extension.
///
/// JPEG has no alpha channel, so it is dropped before encoding. Parent
/// directories are created as needed.
pub fn save_image(img: &RgbaImage, path: impl AsRef<Path>, opts: &SaveOptions) -> AspectFitResult<()> {
    let path = path.as_ref();
    let format = prepare_output(path)?;

    match format {
        ImageFormat::Jpeg => {
            let rgb: RgbImage = img.convert();
            write_jpeg(&rgb, path, opts.jpeg_quality)?;
        }
        ImageFormat::Png => {
            let mut w = BufWriter::new(File::create(path)?);
            img.write_with_encoder(png_encoder(&mut w))?;
            w.flush()?;
        }
        other => img.save_with_format(path, other)?,
    }
    tracing::debug!(path = %path.display(), ?format, "saved image");
    Ok(())
}

/// Like [`save_image`], but keeps the pixel format of `img` where the
/// target format can store it.
pub fn save_dynamic_image(
    img: &DynamicImage,
    path: impl AsRef<Path>,
    opts: &SaveOptions,
) -> AspectFitResult<()> {
    let path = path.as_ref();
    let format = prepare_output(path)?;

    match (format, img) {
        (ImageFormat::Jpeg, DynamicImage::ImageLuma8(gray)) => {
            let mut w = BufWriter::new(File::create(path)?);
            gray.write_with_encoder(JpegEncoder::new_with_quality(&mut w, opts.jpeg_quality))?;
            w.flush()?;
        }
        (ImageFormat::Jpeg, _) => write_jpeg(&img.to_rgb8(), path, opts.jpeg_quality)?,
        (ImageFormat::Png, _) => {
            let mut w = BufWriter::new(File::create(path)?);
            img.write_with_encoder(png_encoder(&mut w))?;
            w.flush()?;
        }
        (other, _) => img.save_with_format(path, other)?,
    }
    tracing::debug!(path = %path.display(), ?format, color = ?img.color(), "saved image");
    Ok(())
}

fn prepare_output(path: &Path) -> AspectFitResult<ImageFormat> {
    let format = ImageFormat::from_path(path).map_err(|_| {
        AspectFitError::invalid_argument(format!(
            "cannot pick an image format for '{}'",
            path.display()
        ))
    })?;

    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(format)
}

fn write_jpeg(rgb: &RgbImage, path: &Path, quality: u8) -> AspectFitResult<()> {
    let mut w = BufWriter::new(File::create(path)?);
    rgb.write_with_encoder(JpegEncoder::new_with_quality(&mut w, quality))?;
    w.flush()?;
    Ok(())
}

fn png_encoder<W: Write>(w: W) -> PngEncoder<W> {
    PngEncoder::new_with_quality(w, CompressionType::Default, FilterType::Adaptive)
}
