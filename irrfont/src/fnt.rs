//! BMFont text descriptor parser.
//!
//! Line format: `<record> key=value key="quoted value" ...`
//!
//! Records used:
//! - `info`     → `face` (optional)
//! - `page`     → `file` (atlas image, relative to the descriptor)
//! - `char`     → `id x y width height xoffset yoffset xadvance page chnl`
//! - `kernings` → stop; kerning pairs are not carried over
//!
//! Every other record (`common`, `chars`, blank lines, ...) is skipped.

use std::collections::HashMap;
use std::str::FromStr;

use crate::{Error, FontDescriptor, Glyph, Rect};

/// Parse a whole descriptor. Glyph order follows the file.
pub fn parse(text: &str) -> Result<FontDescriptor, Error> {
  let mut font = FontDescriptor::default();

  for (idx, raw) in text.lines().enumerate() {
    let line = idx + 1;
    let words = split_words(raw.trim_end_matches('\r'));
    let Some((&kind, rest)) = words.split_first() else {
      continue;
    };

    match kind {
      "kernings" => break,
      "info" => {
        let record = Record::new(line, "info", rest)?;
        font.face = record.get("face").map(unquote);
      }
      "page" => {
        let record = Record::new(line, "page", rest)?;
        font.image_file = Some(unquote(record.require("file")?));
      }
      "char" => {
        let record = Record::new(line, "char", rest)?;
        if let Some(glyph) = record.glyph()? {
          font.glyphs.push(glyph);
        }
      }
      _ => {}
    }
  }

  Ok(font)
}

/// Split on spaces that are not inside double quotes. Quotes are kept.
/// Consecutive spaces yield empty words.
pub fn split_words(line: &str) -> Vec<&str> {
  let mut words = Vec::new();
  let mut in_quote = false;
  let mut start = 0;
  for (i, b) in line.bytes().enumerate() {
    match b {
      b'"' => in_quote = !in_quote,
      b' ' if !in_quote => {
        words.push(&line[start..i]);
        start = i + 1;
      }
      _ => {}
    }
  }
  words.push(&line[start..]);
  words
}

#[inline]
fn unquote(value: &str) -> String {
  value.chars().filter(|&c| c != '"').collect()
}

/// One record's `key=value` pairs.
struct Record<'a> {
  line: usize,
  kind: &'static str,
  pairs: HashMap<&'a str, &'a str>,
}

impl<'a> Record<'a> {
  fn new(line: usize, kind: &'static str, words: &[&'a str]) -> Result<Self, Error> {
    let mut pairs = HashMap::with_capacity(words.len());
    for &word in words.iter().filter(|w| !w.is_empty()) {
      let (k, v) = word
        .split_once('=')
        .ok_or_else(|| Error::MalformedPair { line, token: word.to_owned() })?;
      pairs.insert(k, v);
    }
    Ok(Self { line, kind, pairs })
  }

  fn get(&self, key: &str) -> Option<&'a str> {
    self.pairs.get(key).copied()
  }

  fn require(&self, key: &'static str) -> Result<&'a str, Error> {
    self.get(key).ok_or(Error::MissingKey { line: self.line, record: self.kind, key })
  }

  fn number<T: FromStr>(&self, key: &'static str) -> Result<T, Error> {
    let value = self.require(key)?;
    value.trim().parse().map_err(|_| Error::InvalidValue {
      line: self.line,
      key: key.to_owned(),
      value: value.to_owned(),
    })
  }

  /// `None` when the id is outside the printable ASCII range.
  fn glyph(&self) -> Result<Option<Glyph>, Error> {
    // Validate every key before the range check so a broken record fails
    // even when its glyph would be dropped.
    let id: i64 = self.number("id")?;
    let x = self.number("x")?;
    let y = self.number("y")?;
    let width = self.number("width")?;
    let height = self.number("height")?;
    let xoffset = self.number("xoffset")?;
    let yoffset = self.number("yoffset")?;
    let xadvance = self.number("xadvance")?;
    let _page: i64 = self.number("page")?;
    let _chnl: i64 = self.number("chnl")?;

    let Ok(id) = u32::try_from(id) else {
      return Ok(None);
    };
    Ok(Glyph::new(id, Rect::new(x, y, width, height), (xoffset, yoffset), xadvance))
  }
}
