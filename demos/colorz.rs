#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice
)]

//! Prints a colorscheme for an image, one `#normal #bold` pair per line.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use colorz::{
    KmeansOptions, PalettePipeline, DEFAULT_BOLD_OFFSET, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE,
    DEFAULT_NUM_COLORS,
};

#[derive(Parser)]
#[command(about = "A color scheme generator")]
struct Options {
    /// The image file to generate from.
    image: PathBuf,

    /// Number of colors to generate (excluding bold).
    #[arg(short = 'n', default_value_t = DEFAULT_NUM_COLORS)]
    num_colors: usize,

    /// Minimum value for the colors.
    #[arg(long, default_value_t = DEFAULT_MIN_VALUE)]
    minv: u8,

    /// Maximum value for the colors.
    #[arg(long, default_value_t = DEFAULT_MAX_VALUE)]
    maxv: u8,

    /// How much value to add for bold colors.
    #[arg(long, default_value_t = DEFAULT_BOLD_OFFSET, allow_negative_numbers = true)]
    bold: i16,

    /// Keep the k-means order instead of sorting by hue.
    #[arg(long)]
    no_order: bool,

    /// Seed k-means from OS entropy instead of a fixed seed.
    #[arg(long)]
    random: bool,

    /// The fixed k-means seed.
    #[arg(long, default_value_t = KmeansOptions::DEFAULT_SEED)]
    seed: u64,

    /// The maximum number of k-means iterations.
    #[arg(long, default_value_t = 100)]
    accuracy: u32,

    /// Run the pipeline on multiple threads.
    #[arg(long)]
    par: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let Options {
        image,
        num_colors,
        minv,
        maxv,
        bold,
        no_order,
        random,
        seed,
        accuracy,
        par,
    } = Options::parse();

    let decoded = image::open(&image)
        .with_context(|| format!("failed to read {}", image.display()))?
        .into_rgb8();

    let time = std::time::Instant::now();

    let pipeline = PalettePipeline::try_from(&decoded)?
        .num_colors(num_colors)
        .value_bounds(minv, maxv)
        .bold_offset(bold)
        .order_by_hue(!no_order)
        .kmeans(KmeansOptions::new().max_iter(accuracy).seed(seed).randomize(random));

    let palette = if par {
        pipeline.palette_par()?
    } else {
        pipeline.palette()?
    };

    log::info!("palette took {}ms", time.elapsed().as_millis());

    print!("{palette}");
    Ok(())
}
