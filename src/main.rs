// Command-line front end for the polygon mask loader.
// • Resolves IMAGE inside the input directory and validates it.
// • Builds the mask from --polygons / --polygons-file (malformed data selects everything).
// • Writes the mask as 8-bit grayscale and the flattened RGB image as PNG.
// • --list prints the selectable images instead.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use log::info;

use poly_mask::{Config, Feather, InputDirectory, load_image_and_mask};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Image file name, relative to the input directory.
    #[arg(required_unless_present = "list")]
    image: Option<String>,

    /// JSON config file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory images are read from (overrides the config).
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Feather radius in pixels (overrides the config default).
    #[arg(short, long)]
    feather: Option<u32>,

    /// Polygon payload as JSON text.
    #[arg(short, long, conflicts_with = "polygons_file")]
    polygons: Option<String>,

    /// File holding the polygon payload.
    #[arg(long)]
    polygons_file: Option<PathBuf>,

    /// Where to write the mask.
    #[arg(long, default_value = "mask.png")]
    mask_out: PathBuf,

    /// Where to write the normalized image.
    #[arg(long)]
    image_out: Option<PathBuf>,

    /// List the images in the input directory and exit.
    #[arg(long)]
    list: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    /* --- Configuration: file first, then flags --- */
    let mut config = Config::load(args.config.as_deref()).context("Failed to load config")?;
    if let Some(dir) = args.input_dir {
        config.input_dir = dir;
    }
    let input = InputDirectory::from_config(&config);

    if args.list {
        info!("Images in {}:", input.root().display());
        for name in input.list_images().context("Failed to list input directory")? {
            println!("{name}");
        }
        return Ok(());
    }

    /* --- Request inputs --- */
    let name = args.image.context("No image given")?;
    let feather = Feather(args.feather.unwrap_or(config.default_feather));
    let polygon_data = match (args.polygons, args.polygons_file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read polygon file {}", path.display()))?,
        (None, None) => "[]".to_owned(),
    };

    input.validate(&name, feather)?;
    info!("Change key: {}", input.change_key(&name, feather, &polygon_data)?);

    /* --- Load + mask --- */
    let loaded = load_image_and_mask(&input.resolve(&name), feather, &polygon_data)
        .with_context(|| format!("Failed to load {name}"))?;

    /* --- Outputs --- */
    loaded
        .mask
        .to_luma8()
        .save(&args.mask_out)
        .with_context(|| format!("Failed to save mask to {}", args.mask_out.display()))?;
    info!("Mask written to {}", args.mask_out.display());

    if let Some(path) = args.image_out {
        loaded
            .image
            .to_rgb8()
            .save(&path)
            .with_context(|| format!("Failed to save image to {}", path.display()))?;
        info!("Image written to {}", path.display());
    }

    Ok(())
}
