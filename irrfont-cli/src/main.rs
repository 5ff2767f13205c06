mod codec;
mod convert;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use crate::convert::ConvertOptions;

// ---------------------------------------------
// irrfont: BMFont (.fnt text) → Irrlicht XML font
//   irrfont input.fnt output.xml
// Produces: output.xml + output_irr.png (repacked square atlas) next to it
// ---------------------------------------------
#[derive(Parser, Debug)]
#[command(name = "irrfont", author, version, about = "irrfont: convert a BMFont text font into an Irrlicht XML font", long_about=None)]
struct Cli {
  /// BMFont text descriptor (.fnt); its `page` image is resolved next to it
  input: PathBuf,

  /// Irrlicht XML descriptor to write; the texture is written alongside
  output: PathBuf,

  /// Appended to the output file stem to name the texture (<stem><suffix>.png)
  #[arg(long = "suffix", default_value = "_irr")]
  suffix: String,
}

fn init_logging() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .with_target(false)
    .init();
}

fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging();

  let opts = ConvertOptions { texture_suffix: cli.suffix };
  let done = convert::convert(&cli.input, &cli.output, &opts)
    .with_context(|| format!("convert {:?} -> {:?}", cli.input, cli.output))?;

  tracing::debug!(
    descriptor = %done.descriptor.display(),
    texture = %done.texture.display(),
    glyphs = done.glyphs,
    dimension = done.layout.dimension,
    "done"
  );
  Ok(())
}
