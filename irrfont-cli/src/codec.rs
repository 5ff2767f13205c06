//! PNG ⇄ [`PixelBuffer`] through the `image` crate. Channel count passes
//! through unchanged; deeper-than-8-bit images are narrowed per channel.

use image::error::{ParameterError, ParameterErrorKind};
use image::{DynamicImage, ExtendedColorType, GenericImageView, ImageEncoder as _, ImageError, ImageFormat, ImageReader};
use irrfont::PixelBuffer;
use std::io::Cursor;

#[inline]
fn parameter_error(msg: String) -> ImageError {
  ImageError::Parameter(ParameterError::from_kind(ParameterErrorKind::Generic(msg)))
}

/// Decode PNG bytes into an 8-bit buffer with the image's own channel count.
pub fn decode_png(bytes: &[u8]) -> Result<PixelBuffer, ImageError> {
  let img = ImageReader::with_format(Cursor::new(bytes), ImageFormat::Png).decode()?;

  let (w, h) = img.dimensions();
  let (channels, data) = match img {
    DynamicImage::ImageLuma8(l) => (1, l.into_raw()),
    DynamicImage::ImageLumaA8(la) => (2, la.into_raw()),
    DynamicImage::ImageRgb8(rgb) => (3, rgb.into_raw()),
    DynamicImage::ImageRgba8(rgba) => (4, rgba.into_raw()),
    // 16-bit / float: keep the channel layout, drop precision.
    other => match other.color().channel_count() {
      1 => (1, other.to_luma8().into_raw()),
      2 => (2, other.to_luma_alpha8().into_raw()),
      3 => (3, other.to_rgb8().into_raw()),
      _ => (4, other.to_rgba8().into_raw()),
    },
  };

  PixelBuffer::new(w, h, channels, data).map_err(|e| parameter_error(e.to_string()))
}

/// Encode a buffer as PNG bytes.
pub fn encode_png(buf: &PixelBuffer) -> Result<Vec<u8>, ImageError> {
  use image::codecs::png::PngEncoder;

  let color = match buf.channels {
    1 => ExtendedColorType::L8,
    2 => ExtendedColorType::La8,
    3 => ExtendedColorType::Rgb8,
    4 => ExtendedColorType::Rgba8,
    n => return Err(parameter_error(format!("cannot write {n}-channel PNG"))),
  };
  let mut out = Vec::new();
  PngEncoder::new(&mut out).write_image(&buf.data, buf.width, buf.height, color)?;
  Ok(out)
}
