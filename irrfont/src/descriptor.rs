//! Irrlicht XML font descriptor.
//!
//! ```text
//! <?xml version="1.0"?>
//! <font type="bitmap">
//!   <Texture index="0" filename="font_irr.png" hasAlpha="true" />
//!   <c c="A" r="0,0,10,9" o="2" u="0" />
//!   ...
//! </font>
//! ```
//!
//! `r` is upper-left x,y then lower-right x,y. The bottom edge is always the
//! last row of the cell, whatever the glyph's own height.

use crate::{Glyph, GridLayout};

/// One `<c>` element.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharRecord<'a> {
  pub token: &'a str,
  /// upper left (x,y), lower right (x,y)
  pub rect: [u32; 4],
  /// Padding after the glyph.
  pub overhang: i64,
  /// Padding before the glyph.
  pub underhang: i64,
}

impl CharRecord<'_> {
  fn to_xml(&self) -> String {
    let [x0, y0, x1, y1] = self.rect;
    format!(
      "  <c c=\"{}\" r=\"{x0},{y0},{x1},{y1}\" o=\"{}\" u=\"{}\" />\n",
      self.token, self.overhang, self.underhang
    )
  }
}

/// Output metrics for every glyph, in glyph order, using the same cells the
/// repacker wrote to.
pub fn layout_records<'a>(glyphs: &'a [Glyph], layout: &GridLayout) -> Vec<CharRecord<'a>> {
  glyphs
    .iter()
    .enumerate()
    .map(|(i, g)| {
      let (x, y) = layout.cursor_for(i);
      CharRecord {
        token: &g.token,
        rect: [x, y, x.saturating_add(g.width), y + layout.cell_height - 1],
        overhang: i64::from(g.xadvance) - i64::from(g.width),
        underhang: 0,
      }
    })
    .collect()
}

/// Full document text. `texture` is the file name written into `<Texture>`.
pub fn render_xml(texture: &str, records: &[CharRecord<'_>]) -> String {
  let mut out = String::with_capacity(96 + records.len() * 48);
  out.push_str("<?xml version=\"1.0\"?>\n");
  out.push_str("<font type=\"bitmap\">\n");
  out.push_str(&format!("  <Texture index=\"0\" filename=\"{texture}\" hasAlpha=\"true\" />\n"));
  for record in records {
    out.push_str(&record.to_xml());
  }
  out.push_str("</font>");
  out
}
