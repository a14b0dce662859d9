//! A library for extracting a small colorscheme from an image.
//!
//! `colorz` downscales an image, counts its unique colors, clamps their brightness,
//! and then runs weighted k-means over the counted colors to find a handful of representative colors.
//! Each resulting color is paired with a "bold" variant that is brighter by a fixed amount,
//! and the pairs are (optionally) ordered by hue.
//!
//! # Features
//! To reduce dependencies and compile times, `colorz` has several `cargo` features
//! that can be turned off or on:
//! - `threads`: exposes parallel versions of most functions via [`rayon`].
//! - `image`: enables integration with the [`image`] crate.
//!
//! # High-Level API
//! To get started with the high-level API, see [`PalettePipeline`].
//! ```no_run
//! # use colorz::{PalettePipeline, KmeansOptions};
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let img = image::open("some image")?.into_rgb8();
//!
//! let palette = PalettePipeline::try_from(&img)?
//!     .num_colors(8)
//!     .value_bounds(120, 230)
//!     .kmeans(KmeansOptions::new().seed(42))
//!     .palette()?;
//!
//! for swatch in &palette {
//!     println!("{} {}", swatch.base_hex(), swatch.bold_hex());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! The individual pipeline stages are also exposed:
//! [`sample`], [`UniqueColorCounts`], [`adjust`], and [`kmeans`].

#![deny(unsafe_code, unsafe_op_in_unsafe_fn)]
#![warn(
    clippy::pedantic,
    clippy::cargo,
    clippy::use_debug,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used,
    clippy::unwrap_in_result,
    clippy::expect_used,
    clippy::unneeded_field_pattern,
    clippy::rest_pat_in_fully_bound_structs,
    clippy::unnecessary_self_imports,
    clippy::str_to_string,
    clippy::string_to_string,
    clippy::string_slice,
    missing_docs,
    clippy::missing_docs_in_private_items,
    rustdoc::all,
    clippy::float_cmp_const,
    clippy::lossy_float_literal
)]
#![allow(
    clippy::doc_markdown,
    clippy::module_name_repetitions,
    clippy::many_single_char_names,
    clippy::missing_panics_doc,
    clippy::unreadable_literal,
    clippy::wildcard_imports
)]

mod api;
mod color_counts;
mod error;
mod types;

pub mod adjust;
pub mod kmeans;
pub mod sample;
pub mod shade;

pub use api::*;
pub use color_counts::*;
pub use error::Error;
pub use types::*;

/// The maximum supported image size in number of pixels is `u32::MAX`.
pub const MAX_PIXELS: u32 = u32::MAX;

/// The default number of colors in a palette (not counting bold variants).
pub const DEFAULT_NUM_COLORS: usize = 6;

/// The default lower bound for the HSV value of each color, on a `0..=255` scale.
pub const DEFAULT_MIN_VALUE: u8 = 110;

/// The default upper bound for the HSV value of each color, on a `0..=255` scale.
pub const DEFAULT_MAX_VALUE: u8 = 255;

/// The default amount of HSV value added to create the bold variant of each color.
pub const DEFAULT_BOLD_OFFSET: i16 = 50;

/// The default width and height that images are downscaled to before counting colors.
pub const DEFAULT_THUMBNAIL_SIZE: (u32, u32) = (200, 200);
