//! BMFont → Irrlicht font conversion engine.
//!
//! Pipeline (all in memory, no I/O):
//! - [`fnt::parse`]: BMFont text descriptor → [`FontDescriptor`]
//! - [`GridLayout::select`]: smallest power-of-two square texture holding one
//!   uniform cell per glyph
//! - [`repack`]: copy every glyph rectangle from the source atlas into its cell
//! - [`descriptor`]: per-glyph cell rectangles + padding, serialized as
//!   Irrlicht XML
//!
//! Repacker and emitter both place glyph `i` at [`GridLayout::cursor_for`]`(i)`,
//! so the rectangles in the XML always match where pixels were written.

pub mod descriptor;
pub mod fnt;
mod glyph;
pub mod grid;
pub mod repack;

pub use descriptor::{CharRecord, layout_records, render_xml};
pub use glyph::{FIRST_PRINTABLE, FontDescriptor, Glyph, LAST_PRINTABLE, Rect, display_token};
pub use grid::{CANDIDATE_DIMENSIONS, GridLayout};
pub use repack::{PixelBuffer, copy_rect, repack};

/// Conversion errors. All of them abort the conversion.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
  /// A record lacks a key the format requires.
  #[error("line {line}: `{record}` record is missing key `{key}`")]
  MissingKey {
    line: usize,
    record: &'static str,
    key: &'static str,
  },
  /// A key carries a value that does not parse as the expected number.
  #[error("line {line}: invalid value `{value}` for key `{key}`")]
  InvalidValue { line: usize, key: String, value: String },
  /// A word after the record type is not a `key=value` pair.
  #[error("line {line}: expected key=value, found `{token}`")]
  MalformedPair { line: usize, token: String },
  /// No `page` record named the source atlas image.
  #[error("descriptor has no `page` record naming the atlas image")]
  MissingPage,
  /// No candidate texture dimension holds one cell per glyph.
  #[error("Could not fit char size in texture: {cell_width},{cell_height} ({glyphs} glyphs)")]
  TextureTooSmall {
    cell_width: u32,
    cell_height: u32,
    glyphs: usize,
  },
  /// Pixel data length does not match `width * height * channels`.
  #[error("pixel buffer len {len} != {width}*{height}*{channels}")]
  BufferSize {
    len: usize,
    width: u32,
    height: u32,
    channels: u8,
  },
}
