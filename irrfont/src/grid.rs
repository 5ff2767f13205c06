//! Uniform-grid texture sizing and the shared cell walk.

use crate::{Error, Glyph};

/// Square texture sizes tried in order; the first that fits wins.
pub const CANDIDATE_DIMENSIONS: [u32; 10] = [8, 16, 32, 64, 128, 256, 512, 1024, 2048, 4096];

/// Output texture grid: one `cell_width × cell_height` slot per glyph inside a
/// `dimension × dimension` texture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridLayout {
  pub cell_width: u32,
  pub cell_height: u32,
  pub dimension: u32,
}

impl GridLayout {
  /// Largest per-axis extent over all glyphs, offsets included.
  ///
  /// Each axis is at least 1 so an empty or all-blank font still divides.
  pub fn cell_size(glyphs: &[Glyph]) -> (u32, u32) {
    let (w, h) = glyphs
      .iter()
      .fold((0, 0), |(w, h), g| (w.max(g.cell_width()), h.max(g.cell_height())));
    (w.max(1), h.max(1))
  }

  /// Pick the smallest candidate dimension whose grid holds every glyph.
  pub fn select(glyphs: &[Glyph]) -> Result<Self, Error> {
    let (cell_width, cell_height) = Self::cell_size(glyphs);
    CANDIDATE_DIMENSIONS
      .iter()
      .map(|&dimension| Self { cell_width, cell_height, dimension })
      .find(|layout| layout.capacity() >= glyphs.len())
      .ok_or(Error::TextureTooSmall { cell_width, cell_height, glyphs: glyphs.len() })
  }

  /// Cells in a `dimension / cell` grid, the figure sizing is based on.
  #[inline]
  pub fn capacity(&self) -> usize {
    (self.dimension / self.cell_width) as usize * (self.dimension / self.cell_height) as usize
  }

  /// Cells the walk places on one row before wrapping.
  ///
  /// The walk wraps once `x + 2 * cell_width >= dimension`, so this is one
  /// less than `dimension / cell_width` when the cell divides the texture
  /// exactly, and never less than one.
  #[inline]
  pub fn columns(&self) -> u32 {
    self.dimension.div_ceil(self.cell_width).saturating_sub(1).max(1)
  }

  /// Upper-left corner of the cell assigned to the glyph at `index`.
  ///
  /// Row-major: start at (0,0); after each glyph advance right by
  /// `cell_width`, wrapping to column 0 of the next row when two more cell
  /// widths would reach the texture edge.
  #[inline]
  pub fn cursor_for(&self, index: usize) -> (u32, u32) {
    let columns = self.columns() as usize;
    let col = (index % columns) as u32;
    let row = (index / columns) as u32;
    (col * self.cell_width, row * self.cell_height)
  }

  /// Whether the walk keeps all `count` cells inside the texture.
  ///
  /// Can be false even when [`capacity`](Self::capacity) suffices (see
  /// [`columns`](Self::columns)); pixels past the edge are clipped by the copy.
  pub fn walk_fits(&self, count: usize) -> bool {
    match count.checked_sub(1) {
      None => true,
      Some(last) => {
        let (_, y) = self.cursor_for(last);
        y + self.cell_height <= self.dimension
      }
    }
  }
}
