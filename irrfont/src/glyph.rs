/// Lowest code point kept by the parser (space).
pub const FIRST_PRINTABLE: u32 = 32;
/// Highest code point kept by the parser (`~`).
pub const LAST_PRINTABLE: u32 = 126;

/// Pixel rectangle in the source atlas.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Rect {
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
}

impl Rect {
  #[inline]
  pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
    Self { x, y, width, height }
  }
}

/// One character's metrics in the source atlas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Glyph {
  pub id: u32,
  /// Text written to the `c` attribute of the output element.
  pub token: String,
  pub x: u32,
  pub y: u32,
  pub width: u32,
  pub height: u32,
  pub xoffset: i32,
  pub yoffset: i32,
  pub xadvance: i32,
}

impl Glyph {
  /// Builds a glyph for `id`, deriving its display token.
  ///
  /// Returns `None` for ids outside [`FIRST_PRINTABLE`]..=[`LAST_PRINTABLE`].
  pub fn new(id: u32, src: Rect, (xoffset, yoffset): (i32, i32), xadvance: i32) -> Option<Self> {
    let token = display_token(id)?;
    let Rect { x, y, width, height } = src;
    Some(Self { id, token, x, y, width, height, xoffset, yoffset, xadvance })
  }

  /// Where the glyph's pixels live in the source atlas.
  #[inline]
  pub fn source_rect(&self) -> Rect {
    Rect::new(self.x, self.y, self.width, self.height)
  }

  /// Zero-area glyphs (e.g. space) carry metrics only.
  #[inline]
  pub fn has_pixels(&self) -> bool {
    self.width != 0 && self.height != 0
  }

  /// Horizontal space the glyph needs inside a cell. Saturates at `u32::MAX`,
  /// which no texture candidate holds.
  #[inline]
  pub fn cell_width(&self) -> u32 {
    self.width.saturating_add(self.xoffset.unsigned_abs())
  }

  /// Vertical space the glyph needs inside a cell. Saturates like
  /// [`cell_width`](Self::cell_width).
  #[inline]
  pub fn cell_height(&self) -> u32 {
    self.height.saturating_add(self.yoffset.unsigned_abs())
  }
}

/// Output token for a printable ASCII code point.
///
/// `"`, `<` and `>` are written as XML entities; everything else verbatim.
pub fn display_token(id: u32) -> Option<String> {
  if !(FIRST_PRINTABLE..=LAST_PRINTABLE).contains(&id) {
    return None;
  }
  let token = match char::from_u32(id)? {
    '"' => "&quot;".to_owned(),
    '<' => "&lt;".to_owned(),
    '>' => "&gt;".to_owned(),
    c => c.to_string(),
  };
  Some(token)
}

/// A parsed font: glyphs in file order plus the atlas they live in.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FontDescriptor {
  /// `info face=...`, if present.
  pub face: Option<String>,
  /// Atlas file name from the `page` record, relative to the descriptor.
  pub image_file: Option<String>,
  pub glyphs: Vec<Glyph>,
}

impl FontDescriptor {
  /// The atlas file name, or [`crate::Error::MissingPage`].
  pub fn image_file(&self) -> Result<&str, crate::Error> {
    self.image_file.as_deref().ok_or(crate::Error::MissingPage)
  }
}
