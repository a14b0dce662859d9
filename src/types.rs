//! Contains the input and output types shared across the crate.

use crate::{Error, MAX_PIXELS};
use palette::{cast::ComponentsAs, Srgb};
use std::{borrow::Cow, fmt::Display, slice};
#[cfg(feature = "image")]
use image::{RgbImage, RgbaImage};

/// A decoded image: a width, a height, and one [`Srgb<u8>`] per pixel in row-major order.
///
/// The invariant `pixels.len() == width * height <= MAX_PIXELS` is checked by every constructor.
///
/// # Examples
/// From a raw RGB buffer (no copy is made):
/// ```
/// # use colorz::PixelBuffer;
/// # fn main() -> Result<(), colorz::Error> {
/// let raw = [255, 0, 0, 0, 0, 255];
/// let buffer = PixelBuffer::from_rgb8(2, 1, &raw)?;
/// assert_eq!(buffer.pixels().len(), 2);
/// # Ok(())
/// # }
/// ```
///
/// From an image (needs the `image` feature to be enabled):
/// ```no_run
/// # use colorz::PixelBuffer;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let img = image::open("some image")?.into_rgb8();
/// let buffer = PixelBuffer::try_from(&img)?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer<'a> {
    /// The number of pixels in each row.
    width: u32,
    /// The number of rows.
    height: u32,
    /// The pixels in row-major order.
    pixels: Cow<'a, [Srgb<u8>]>,
}

/// Checks that `actual` components match `width * height * channels`.
fn check_len(width: u32, height: u32, channels: u64, actual: usize) -> Result<(), Error> {
    let num_pixels = u64::from(width) * u64::from(height);
    if num_pixels > u64::from(MAX_PIXELS) {
        return Err(Error::AboveMaxPixels);
    }

    let expected = num_pixels * channels;
    let actual = actual as u64;
    if expected == actual {
        Ok(())
    } else {
        Err(Error::BufferSize { expected, actual })
    }
}

/// Converts a normalized `[0, 1]` channel to `0..=255`, truncating like most host applications do.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(x: f32) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0) as u8
}

impl<'a> PixelBuffer<'a> {
    /// Creates a new [`PixelBuffer`] from a `width`, `height`, and the pixels in row-major order.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if the number of pixels is not `width * height`,
    /// or [`Error::AboveMaxPixels`] if the image is too large.
    pub fn new(
        width: u32,
        height: u32,
        pixels: impl Into<Cow<'a, [Srgb<u8>]>>,
    ) -> Result<Self, Error> {
        let pixels = pixels.into();
        check_len(width, height, 1, pixels.len())?;
        Ok(Self { width, height, pixels })
    }

    /// Borrows a packed RGB buffer with one byte per channel.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if `rgb.len() != width * height * 3`,
    /// or [`Error::AboveMaxPixels`] if the image is too large.
    pub fn from_rgb8(width: u32, height: u32, rgb: &'a [u8]) -> Result<Self, Error> {
        check_len(width, height, 3, rgb.len())?;
        let pixels: &[Srgb<u8>] = rgb.components_as();
        Ok(Self { width, height, pixels: Cow::Borrowed(pixels) })
    }

    /// Copies a packed RGBA buffer with one byte per channel. The alpha channel is ignored.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if `rgba.len() != width * height * 4`,
    /// or [`Error::AboveMaxPixels`] if the image is too large.
    pub fn from_rgba8(width: u32, height: u32, rgba: &[u8]) -> Result<Self, Error> {
        check_len(width, height, 4, rgba.len())?;
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| Srgb::new(p[0], p[1], p[2]))
            .collect::<Vec<_>>();

        Ok(Self { width, height, pixels: Cow::Owned(pixels) })
    }

    /// Copies a packed RGBA buffer with channels normalized to `[0, 1]`. The alpha channel is ignored.
    ///
    /// Each channel is clamped to `[0, 1]`, scaled by `255`, and truncated.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if `rgba.len() != width * height * 4`,
    /// or [`Error::AboveMaxPixels`] if the image is too large.
    pub fn from_rgba_f32(width: u32, height: u32, rgba: &[f32]) -> Result<Self, Error> {
        check_len(width, height, 4, rgba.len())?;
        let pixels = rgba
            .chunks_exact(4)
            .map(|p| Srgb::new(unit_to_u8(p[0]), unit_to_u8(p[1]), unit_to_u8(p[2])))
            .collect::<Vec<_>>();

        Ok(Self { width, height, pixels: Cow::Owned(pixels) })
    }

    /// Copies a packed RGB buffer with channels normalized to `[0, 1]`.
    ///
    /// Each channel is clamped to `[0, 1]`, scaled by `255`, and truncated.
    ///
    /// # Errors
    /// Returns [`Error::BufferSize`] if `rgb.len() != width * height * 3`,
    /// or [`Error::AboveMaxPixels`] if the image is too large.
    pub fn from_rgb_f32(width: u32, height: u32, rgb: &[f32]) -> Result<Self, Error> {
        check_len(width, height, 3, rgb.len())?;
        let pixels = rgb
            .chunks_exact(3)
            .map(|p| Srgb::new(unit_to_u8(p[0]), unit_to_u8(p[1]), unit_to_u8(p[2])))
            .collect::<Vec<_>>();

        Ok(Self { width, height, pixels: Cow::Owned(pixels) })
    }

    /// Creates a buffer without checking the length invariant.
    pub(crate) fn new_unchecked(width: u32, height: u32, pixels: Vec<Srgb<u8>>) -> PixelBuffer<'static> {
        debug_assert_eq!(pixels.len() as u64, u64::from(width) * u64::from(height));
        PixelBuffer { width, height, pixels: Cow::Owned(pixels) }
    }

    /// The number of pixels in each row.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// The number of rows.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// The pixels in row-major order.
    #[must_use]
    pub fn pixels(&self) -> &[Srgb<u8>] {
        &self.pixels
    }

    /// Whether or not the image has zero area.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Returns the pixel at `(x, y)`.
    #[must_use]
    pub fn get(&self, x: u32, y: u32) -> Option<Srgb<u8>> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    /// Converts this buffer into one that owns its pixels.
    #[must_use]
    pub fn into_owned(self) -> PixelBuffer<'static> {
        let Self { width, height, pixels } = self;
        PixelBuffer::new_unchecked(width, height, pixels.into_owned())
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for PixelBuffer<'a> {
    type Error = Error;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        let raw = image.as_raw();
        #[allow(clippy::cast_possible_truncation)]
        let len = (u64::from(width) * u64::from(height) * 3).min(raw.len() as u64) as usize;
        Self::from_rgb8(width, height, &raw[..len])
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbaImage> for PixelBuffer<'a> {
    type Error = Error;

    fn try_from(image: &'a RgbaImage) -> Result<Self, Self::Error> {
        let (width, height) = image.dimensions();
        let raw = image.as_raw();
        #[allow(clippy::cast_possible_truncation)]
        let len = (u64::from(width) * u64::from(height) * 4).min(raw.len() as u64) as usize;
        Self::from_rgba8(width, height, &raw[..len])
    }
}

/// Formats a color as a `#rrggbb` hex string.
///
/// # Examples
/// ```
/// # use palette::Srgb;
/// assert_eq!(colorz::hex(Srgb::new(255, 16, 0)), "#ff1000");
/// ```
#[must_use]
pub fn hex(color: Srgb<u8>) -> String {
    format!("#{:02x}{:02x}{:02x}", color.red, color.green, color.blue)
}

/// Parses a `#rrggbb` (or `rrggbb`) hex string into a color.
///
/// Surrounding whitespace is ignored. Shorthand `#rgb` strings are rejected.
///
/// # Errors
/// Returns [`Error::InvalidHex`] if `s` is not a six digit hex color.
pub fn parse_hex(s: &str) -> Result<Srgb<u8>, Error> {
    let digits = s.trim();
    let digits = digits.strip_prefix('#').unwrap_or(digits);
    if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidHex(s.to_owned()));
    }

    digits
        .parse::<Srgb<u8>>()
        .map_err(|_| Error::InvalidHex(s.to_owned()))
}

/// A palette color alongside its brighter "bold" variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    /// The representative color of a cluster.
    pub base: Srgb<u8>,
    /// `base` with extra HSV value added.
    pub bold: Srgb<u8>,
}

impl Swatch {
    /// The base color as a `#rrggbb` hex string.
    #[must_use]
    pub fn base_hex(&self) -> String {
        hex(self.base)
    }

    /// The bold color as a `#rrggbb` hex string.
    #[must_use]
    pub fn bold_hex(&self) -> String {
        hex(self.bold)
    }
}

/// The final output of the pipeline: an ordered list of [`Swatch`]es.
///
/// The `Display` implementation writes one swatch per line as `#base #bold`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Palette(Vec<Swatch>);

impl Palette {
    /// Creates a palette by pairing each base color with its bold variant.
    pub(crate) fn zip(base: Vec<Srgb<u8>>, bold: Vec<Srgb<u8>>) -> Self {
        Self(
            base.into_iter()
                .zip(bold)
                .map(|(base, bold)| Swatch { base, bold })
                .collect(),
        )
    }

    /// The swatches in order.
    #[must_use]
    pub fn swatches(&self) -> &[Swatch] {
        &self.0
    }

    /// The number of swatches.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether or not the palette has no swatches.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the swatches.
    pub fn iter(&self) -> slice::Iter<'_, Swatch> {
        self.0.iter()
    }

    /// The base colors in order.
    #[must_use]
    pub fn base_colors(&self) -> Vec<Srgb<u8>> {
        self.0.iter().map(|s| s.base).collect()
    }

    /// The bold colors in order.
    #[must_use]
    pub fn bold_colors(&self) -> Vec<Srgb<u8>> {
        self.0.iter().map(|s| s.bold).collect()
    }

    /// Each swatch as a `(base, bold)` pair of hex strings.
    #[must_use]
    pub fn hex_pairs(&self) -> Vec<(String, String)> {
        self.0.iter().map(|s| (s.base_hex(), s.bold_hex())).collect()
    }

    /// Derives a shade of every base color, see [`shade`](crate::shade::shade).
    #[must_use]
    pub fn shades(&self, lightness_factor: f64, saturation_factor: f64) -> Vec<Srgb<u8>> {
        self.0
            .iter()
            .map(|s| crate::shade::shade(s.base, lightness_factor, saturation_factor))
            .collect()
    }

    /// Consumes the palette, returning the swatches.
    #[must_use]
    pub fn into_inner(self) -> Vec<Swatch> {
        self.0
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl From<Palette> for Vec<Swatch> {
    fn from(palette: Palette) -> Self {
        palette.into_inner()
    }
}

impl Display for Palette {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for swatch in &self.0 {
            writeln!(f, "{} {}", swatch.base_hex(), swatch.bold_hex())?;
        }
        Ok(())
    }
}
