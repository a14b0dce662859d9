//! Box-averaging downscaling of a [`PixelBuffer`] into a fixed size thumbnail.
//!
//! Output pixel `(x, y)` covers the source columns `⌊x·W/w⌋..⌊(x+1)·W/w⌋`
//! and the source rows `⌊y·H/h⌋..⌊(y+1)·H/h⌋`, where `W × H` is the source size and `w × h` the target size.
//! Each output channel is the (floored) mean of that region.
//!
//! A region is always widened to contain at least one source pixel,
//! so every output pixel is a true regional average.
//! When the target is larger than the source, this degrades to nearest-neighbor sampling.
//! A source with zero area produces an all-black thumbnail.

use crate::{PixelBuffer, MAX_PIXELS};
use palette::Srgb;
use std::ops::Range;
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Returns the source range covered by output index `i` when mapping `src` pixels onto `dst` pixels.
///
/// The range is empty only if `src` is zero.
#[allow(clippy::cast_possible_truncation)]
fn source_range(i: u32, src: u32, dst: u32) -> Range<u32> {
    if src == 0 {
        return 0..0;
    }

    let (i, src, dst) = (u64::from(i), u64::from(src), u64::from(dst));
    let start = i * src / dst;
    let end = ((i + 1) * src / dst).max(start + 1).min(src);
    (start as u32)..(end as u32)
}

/// Computes one output row given the source rows it covers.
fn downscale_row(
    source: &PixelBuffer<'_>,
    rows: Range<u32>,
    columns: &[Range<u32>],
    row: &mut [Srgb<u8>],
) {
    let width = source.width() as usize;
    let pixels = source.pixels();

    for (out, cols) in row.iter_mut().zip(columns) {
        let mut sum = [0u64; 3];
        let mut count = 0u64;

        for y in rows.clone() {
            let offset = y as usize * width;
            let region = (offset + cols.start as usize)..(offset + cols.end as usize);
            for &pixel in &pixels[region] {
                let components: [u8; 3] = pixel.into();
                for (s, c) in sum.iter_mut().zip(components) {
                    *s += u64::from(c);
                }
                count += 1;
            }
        }

        if count > 0 {
            #[allow(clippy::cast_possible_truncation)]
            {
                *out = Srgb::from(sum.map(|s| (s / count) as u8));
            }
        }
    }
}

/// Keeps the thumbnail within the pixel limit of a [`PixelBuffer`].
fn assert_thumbnail_size(width: u32, height: u32) {
    assert!(
        u64::from(width) * u64::from(height) <= u64::from(MAX_PIXELS),
        "thumbnail size {width}x{height} is above the maximum of {MAX_PIXELS} pixels"
    );
}

/// The column ranges for every output column.
fn column_ranges(source: &PixelBuffer<'_>, width: u32) -> Vec<Range<u32>> {
    (0..width)
        .map(|x| source_range(x, source.width(), width))
        .collect()
}

/// Downscales `source` to `width × height` pixels by averaging each covered source region.
///
/// See the [module](self) documentation for the exact region boundaries.
/// A `width` or `height` of zero produces an empty buffer.
///
/// # Panics
/// Panics if `width * height` is above [`MAX_PIXELS`](crate::MAX_PIXELS).
///
/// # Examples
/// ```
/// # use colorz::{sample, PixelBuffer};
/// # use palette::Srgb;
/// # fn main() -> Result<(), colorz::Error> {
/// let pixels = vec![
///     Srgb::new(0, 0, 0), Srgb::new(10, 20, 30),
///     Srgb::new(20, 40, 60), Srgb::new(30, 60, 90),
/// ];
/// let source = PixelBuffer::new(2, 2, pixels)?;
/// let thumb = sample::downscale(&source, 1, 1);
/// assert_eq!(thumb.pixels(), &[Srgb::new(15, 30, 45)]);
/// # Ok(())
/// # }
/// ```
#[must_use]
pub fn downscale(source: &PixelBuffer<'_>, width: u32, height: u32) -> PixelBuffer<'static> {
    assert_thumbnail_size(width, height);
    let mut pixels = vec![Srgb::new(0, 0, 0); width as usize * height as usize];
    if pixels.is_empty() {
        return PixelBuffer::new_unchecked(width, height, pixels);
    }

    let columns = column_ranges(source, width);
    for (y, row) in (0..height).zip(pixels.chunks_exact_mut(width as usize)) {
        let rows = source_range(y, source.height(), height);
        downscale_row(source, rows, &columns, row);
    }

    log::trace!(
        "downscaled {}x{} to {width}x{height}",
        source.width(),
        source.height()
    );

    PixelBuffer::new_unchecked(width, height, pixels)
}

/// Downscales `source` to `width × height` pixels in parallel, one output row per task.
///
/// The result is identical to [`downscale`].
///
/// # Panics
/// Panics if `width * height` is above [`MAX_PIXELS`](crate::MAX_PIXELS).
#[cfg(feature = "threads")]
#[must_use]
pub fn downscale_par(source: &PixelBuffer<'_>, width: u32, height: u32) -> PixelBuffer<'static> {
    assert_thumbnail_size(width, height);
    let mut pixels = vec![Srgb::new(0, 0, 0); width as usize * height as usize];
    if pixels.is_empty() {
        return PixelBuffer::new_unchecked(width, height, pixels);
    }

    let columns = column_ranges(source, width);
    pixels
        .par_chunks_exact_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            #[allow(clippy::cast_possible_truncation)]
            let rows = source_range(y as u32, source.height(), height);
            downscale_row(source, rows, &columns, row);
        });

    PixelBuffer::new_unchecked(width, height, pixels)
}
