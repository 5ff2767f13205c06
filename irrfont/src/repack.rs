//! Atlas repacking: move every glyph rectangle from the source atlas into its
//! grid cell in a fresh square texture.

use crate::{Error, Glyph, GridLayout};

/// Row-major interleaved 8-bit pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelBuffer {
  pub width: u32,
  pub height: u32,
  /// Interleaved channels per pixel (1..=4 for PNG).
  pub channels: u8,
  pub data: Vec<u8>,
}

impl PixelBuffer {
  #[inline]
  pub fn new(width: u32, height: u32, channels: u8, data: Vec<u8>) -> Result<Self, Error> {
    let need = width as usize * height as usize * channels as usize;
    if data.len() != need {
      return Err(Error::BufferSize { len: data.len(), width, height, channels });
    }
    Ok(Self { width, height, channels, data })
  }

  /// All-zero buffer.
  #[inline]
  pub fn zeroed(width: u32, height: u32, channels: u8) -> Self {
    let data = vec![0u8; width as usize * height as usize * channels as usize];
    Self { width, height, channels, data }
  }

  #[inline]
  fn row_stride(&self) -> usize {
    self.width as usize * self.channels as usize
  }
}

/// Half-open overlap of `[0, len)` shifted by `src` and `dst` origins with
/// both buffers' `[0, src_extent)` / `[0, dst_extent)`.
#[inline]
fn clip_span(src: i64, dst: i64, len: i64, src_extent: i64, dst_extent: i64) -> Option<(i64, i64)> {
  let lo = 0.max(-src).max(-dst);
  let hi = len.min(src_extent - src).min(dst_extent - dst);
  (lo < hi).then_some((lo, hi))
}

/// Copy a `width × height` rectangle from `src` at `(src_x, src_y)` to
/// `dst` at `(dst_x, dst_y)`.
///
/// The rectangle is first clipped against both buffers; anything outside
/// either one is skipped. Buffers with different channel counts copy nothing.
pub fn copy_rect(
  src: &PixelBuffer,
  (src_x, src_y): (i64, i64),
  dst: &mut PixelBuffer,
  (dst_x, dst_y): (i64, i64),
  (width, height): (u32, u32),
) {
  if src.channels != dst.channels {
    return;
  }
  let Some((x0, x1)) = clip_span(src_x, dst_x, width.into(), src.width.into(), dst.width.into()) else {
    return;
  };
  let Some((y0, y1)) = clip_span(src_y, dst_y, height.into(), src.height.into(), dst.height.into()) else {
    return;
  };

  let c = src.channels as usize;
  let src_stride = src.row_stride();
  let dst_stride = dst.row_stride();
  // All coordinates below are non-negative and in bounds after clipping.
  let span = (x1 - x0) as usize * c;
  let sx = (src_x + x0) as usize * c;
  let dx = (dst_x + x0) as usize * c;

  for row in y0..y1 {
    let s = (src_y + row) as usize * src_stride + sx;
    let d = (dst_y + row) as usize * dst_stride + dx;
    dst.data[d..d + span].copy_from_slice(&src.data[s..s + span]);
  }
}

/// Build the output texture: `dimension²` pixels with the source's channel
/// count, glyph `i` copied to [`GridLayout::cursor_for`]`(i)` shifted down by
/// its `yoffset`. Zero-area glyphs keep their cell but copy nothing.
pub fn repack(glyphs: &[Glyph], layout: &GridLayout, src: &PixelBuffer) -> PixelBuffer {
  let mut dst = PixelBuffer::zeroed(layout.dimension, layout.dimension, src.channels);
  for (i, g) in glyphs.iter().enumerate() {
    if !g.has_pixels() {
      continue;
    }
    let (cx, cy) = layout.cursor_for(i);
    let dst_at = (cx.into(), i64::from(cy) + i64::from(g.yoffset));
    copy_rect(src, (g.x.into(), g.y.into()), &mut dst, dst_at, (g.width, g.height));
  }
  dst
}
