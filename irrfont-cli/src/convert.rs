//! One conversion run: BMFont `.fnt` + atlas PNG → Irrlicht `.xml` + repacked PNG.
//!
//! Everything is built in memory first; files are only written once both the
//! descriptor text and the encoded texture exist.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::ImageError;
use irrfont::{GridLayout, fnt, layout_records, render_xml, repack};
use tracing::{debug, info, warn};

use crate::codec;

#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
  #[error("Could not open file: {}", path.display())]
  Read {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("Could not write file: {}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: io::Error,
  },
  #[error("Could not decode image file: {}", path.display())]
  Decode {
    path: PathBuf,
    #[source]
    source: ImageError,
  },
  #[error("Could not encode image file: {}", path.display())]
  Encode {
    path: PathBuf,
    #[source]
    source: ImageError,
  },
  #[error("Invalid font file: {}", path.display())]
  Font {
    path: PathBuf,
    #[source]
    source: irrfont::Error,
  },
}

#[derive(Clone, Debug)]
pub struct ConvertOptions {
  /// Appended to the output descriptor's stem to name the texture.
  pub texture_suffix: String,
}

impl Default for ConvertOptions {
  fn default() -> Self {
    Self { texture_suffix: "_irr".to_owned() }
  }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct Converted {
  pub descriptor: PathBuf,
  pub texture: PathBuf,
  pub layout: GridLayout,
  pub glyphs: usize,
}

/// `out/font.xml` + `_irr` → (`font_irr.png`, `out/font_irr.png`).
pub fn texture_path(output: &Path, suffix: &str) -> (String, PathBuf) {
  let stem = output.file_stem().map(|s| s.to_string_lossy()).unwrap_or_default();
  let name = format!("{stem}{suffix}.png");
  let path = output.with_file_name(&name);
  (name, path)
}

/// Directory the `page` file is resolved against.
#[inline]
fn input_dir(input: &Path) -> &Path {
  input.parent().unwrap_or_else(|| Path::new(""))
}

pub fn convert(input: &Path, output: &Path, opts: &ConvertOptions) -> Result<Converted, ConvertError> {
  // ── input descriptor ──────────────────────────────────────────
  let text = fs::read_to_string(input).map_err(|source| ConvertError::Read { path: input.to_owned(), source })?;
  let font_err = |source: irrfont::Error| ConvertError::Font { path: input.to_owned(), source };
  let font = fnt::parse(&text).map_err(font_err)?;
  info!("Read input file: {}", input.display());
  if let Some(face) = &font.face {
    debug!(face = %face, glyphs = font.glyphs.len(), "parsed font");
  }

  // ── source atlas ──────────────────────────────────────────────
  let src_path = input_dir(input).join(font.image_file().map_err(font_err)?);
  let png = fs::read(&src_path).map_err(|source| ConvertError::Read { path: src_path.clone(), source })?;
  let src = codec::decode_png(&png).map_err(|source| ConvertError::Decode { path: src_path.clone(), source })?;
  debug!(width = src.width, height = src.height, channels = src.channels, "decoded atlas");

  // ── layout + repack ───────────────────────────────────────────
  let layout = GridLayout::select(&font.glyphs).map_err(font_err)?;
  debug!(
    cell_width = layout.cell_width,
    cell_height = layout.cell_height,
    dimension = layout.dimension,
    "grid layout"
  );
  if !layout.walk_fits(font.glyphs.len()) {
    warn!(
      dimension = layout.dimension,
      columns = layout.columns(),
      "glyph cells run past the bottom of the texture; their pixels are clipped"
    );
  }
  let dst = repack(&font.glyphs, &layout, &src);
  drop(src);

  let (texture_name, texture) = texture_path(output, &opts.texture_suffix);
  let xml = render_xml(&texture_name, &layout_records(&font.glyphs, &layout));
  let encoded = codec::encode_png(&dst).map_err(|source| ConvertError::Encode { path: texture.clone(), source })?;

  // ── outputs ───────────────────────────────────────────────────
  fs::write(output, xml).map_err(|source| ConvertError::Write { path: output.to_owned(), source })?;
  info!("Wrote xml font file: {}", output.display());

  if let Err(source) = fs::write(&texture, &encoded) {
    // Keep the all-or-nothing contract.
    let _ = fs::remove_file(output);
    return Err(ConvertError::Write { path: texture, source });
  }
  info!("Wrote font image file: {}", texture.display());

  Ok(Converted { descriptor: output.to_owned(), texture, layout, glyphs: font.glyphs.len() })
}

#[cfg(test)]
mod tests {
  use super::*;
  use image::{GenericImageView, Rgba, RgbaImage};

  /// Fresh scratch directory for one test.
  fn scratch(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("irrfont-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  fn char_line(id: u32, x: u32, y: u32, w: u32, h: u32, yoffset: i32, xadvance: i32) -> String {
    format!(
      "char id={id} x={x} y={y} width={w} height={h} xoffset=0 yoffset={yoffset} xadvance={xadvance} page=0 chnl=15\n"
    )
  }

  /// Every pixel encodes its own source position.
  fn write_atlas(path: &Path, w: u32, h: u32) {
    RgbaImage::from_fn(w, h, |x, y| Rgba([x as u8, y as u8, 0x40, 0xFF])).save(path).unwrap();
  }

  #[test]
  fn t_single_glyph_scenario() {
    let dir = scratch("single");
    write_atlas(&dir.join("atlas.png"), 20, 20);
    let fnt = format!("page id=0 file=\"atlas.png\"\n{}", char_line(65, 0, 0, 10, 10, 0, 12));
    fs::write(dir.join("in.fnt"), fnt).unwrap();

    let out = dir.join("font.xml");
    let done = convert(&dir.join("in.fnt"), &out, &ConvertOptions::default()).unwrap();
    assert_eq!(done.layout, GridLayout { cell_width: 10, cell_height: 10, dimension: 16 });
    assert_eq!(done.texture, dir.join("font_irr.png"));

    let xml = fs::read_to_string(&out).unwrap();
    assert_eq!(
      xml,
      "<?xml version=\"1.0\"?>\n<font type=\"bitmap\">\n  \
       <Texture index=\"0\" filename=\"font_irr.png\" hasAlpha=\"true\" />\n  \
       <c c=\"A\" r=\"0,0,10,9\" o=\"2\" u=\"0\" />\n</font>"
    );

    let img = image::open(&done.texture).unwrap();
    assert_eq!(img.dimensions(), (16, 16));
    assert_eq!(img.color().channel_count(), 4);
    let rgba = img.to_rgba8();
    assert_eq!(rgba.get_pixel(9, 9), &Rgba([9, 9, 0x40, 0xFF]));
    assert_eq!(rgba.get_pixel(10, 0), &Rgba([0, 0, 0, 0]));
    assert_eq!(rgba.get_pixel(0, 10), &Rgba([0, 0, 0, 0]));
  }

  #[test]
  fn t_pixels_land_at_emitted_rects() {
    let dir = scratch("rects");
    write_atlas(&dir.join("atlas.png"), 64, 64);
    let mut fnt = String::from("info face=\"Test\"\npage id=0 file=\"atlas.png\"\n");
    fnt += &char_line(32, 0, 0, 0, 0, 0, 4);
    for (i, id) in (65..75).enumerate() {
      fnt += &char_line(id, i as u32 * 6, 10, 5, 7, 1, 6);
    }
    fs::write(dir.join("in.fnt"), fnt).unwrap();

    let done = convert(&dir.join("in.fnt"), &dir.join("out.xml"), &ConvertOptions::default()).unwrap();
    assert_eq!(done.glyphs, 11);
    let rgba = image::open(&done.texture).unwrap().to_rgba8();
    let xml = fs::read_to_string(&done.descriptor).unwrap();

    for (i, id) in (65..75).enumerate() {
      let (x, y) = done.layout.cursor_for(i + 1);
      let token = char::from_u32(id).unwrap();
      assert!(xml.contains(&format!("<c c=\"{token}\" r=\"{x},{y},{},", x + 5)), "{token} in {xml}");
      // Top-left source pixel of glyph `i`, moved down by yoffset=1.
      assert_eq!(rgba.get_pixel(x, y + 1), &Rgba([i as u8 * 6, 10, 0x40, 0xFF]));
    }
    assert!(xml.contains("<c c=\" \" r=\"0,0,0,7\" o=\"4\" u=\"0\" />"));
  }

  #[test]
  fn t_idempotent() {
    let dir = scratch("idem");
    write_atlas(&dir.join("atlas.png"), 32, 32);
    let mut fnt = String::from("page id=0 file=\"atlas.png\"\n");
    for id in [34, 60, 62, 97, 127] {
      fnt += &char_line(id, 2, 3, 4, 5, -1, 5);
    }
    fs::write(dir.join("in.fnt"), fnt).unwrap();
    let out = dir.join("out.xml");

    convert(&dir.join("in.fnt"), &out, &ConvertOptions::default()).unwrap();
    let first = (fs::read(&out).unwrap(), fs::read(dir.join("out_irr.png")).unwrap());
    convert(&dir.join("in.fnt"), &out, &ConvertOptions::default()).unwrap();
    let second = (fs::read(&out).unwrap(), fs::read(dir.join("out_irr.png")).unwrap());
    assert_eq!(first, second);

    let xml = String::from_utf8(first.0).unwrap();
    assert_eq!(xml.matches("<c ").count(), 4);
    assert!(xml.contains("c=\"&quot;\"") && xml.contains("c=\"&lt;\"") && xml.contains("c=\"&gt;\""));
  }

  #[test]
  fn t_custom_suffix() {
    let (name, path) = texture_path(Path::new("fonts/big.xml"), "-tex");
    assert_eq!(name, "big-tex.png");
    assert_eq!(path, Path::new("fonts/big-tex.png"));
  }

  #[test]
  fn t_missing_atlas() {
    let dir = scratch("noatlas");
    fs::write(dir.join("in.fnt"), "page id=0 file=\"gone.png\"\n").unwrap();
    let out = dir.join("out.xml");
    let err = convert(&dir.join("in.fnt"), &out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Read { ref path, .. } if path.ends_with("gone.png")));
    assert!(!out.exists());
  }

  #[test]
  fn t_missing_input() {
    let dir = scratch("noinput");
    let err = convert(&dir.join("nope.fnt"), &dir.join("o.xml"), &ConvertOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), format!("Could not open file: {}", dir.join("nope.fnt").display()));
  }

  #[test]
  fn t_undecodable_atlas() {
    let dir = scratch("badpng");
    fs::write(dir.join("atlas.png"), b"definitely not a png").unwrap();
    fs::write(dir.join("in.fnt"), "page id=0 file=\"atlas.png\"\n").unwrap();
    let err = convert(&dir.join("in.fnt"), &dir.join("o.xml"), &ConvertOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Decode { .. }));
  }

  #[test]
  fn t_oversized_glyphs_abort_without_output() {
    let dir = scratch("toobig");
    write_atlas(&dir.join("atlas.png"), 4, 4);
    // 4096 / 500 = 8 → 64 cells for 95 glyphs.
    let mut fnt = String::from("page id=0 file=\"atlas.png\"\n");
    for id in 32..=126 {
      fnt += &char_line(id, 0, 0, 500, 500, 0, 500);
    }
    fs::write(dir.join("in.fnt"), fnt).unwrap();
    let out = dir.join("out.xml");

    let err = convert(&dir.join("in.fnt"), &out, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(
      err,
      ConvertError::Font { source: irrfont::Error::TextureTooSmall { cell_width: 500, cell_height: 500, glyphs: 95 }, .. }
    ));
    assert_eq!(err.to_string(), format!("Invalid font file: {}", dir.join("in.fnt").display()));
    let cause = std::error::Error::source(&err).map(ToString::to_string).unwrap_or_default();
    assert_eq!(cause, "Could not fit char size in texture: 500,500 (95 glyphs)");
    assert!(!out.exists());
    assert!(!dir.join("out_irr.png").exists());
  }

  #[test]
  fn t_bad_record_reports_line() {
    let dir = scratch("badrecord");
    fs::write(dir.join("in.fnt"), "page id=0 file=\"a.png\"\nchar id=65 x=0\n").unwrap();
    let err = convert(&dir.join("in.fnt"), &dir.join("o.xml"), &ConvertOptions::default()).unwrap_err();
    // The line number lives on the cause only, so a chained report shows it once.
    assert!(!err.to_string().contains("line 2"), "{err}");
    let cause = std::error::Error::source(&err).map(ToString::to_string).unwrap_or_default();
    assert!(cause.starts_with("line 2:"), "{cause}");
    let report = format!("{:#}", anyhow::Error::new(err));
    assert_eq!(report.matches("line 2").count(), 1, "{report}");
  }
}
