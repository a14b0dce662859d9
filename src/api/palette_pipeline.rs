use crate::{
    adjust, kmeans, sample, Error, KmeansOptions, Palette, PixelBuffer, UniqueColorCounts,
    DEFAULT_BOLD_OFFSET, DEFAULT_MAX_VALUE, DEFAULT_MIN_VALUE, DEFAULT_NUM_COLORS,
    DEFAULT_THUMBNAIL_SIZE, MAX_PIXELS,
};

use palette::Srgb;
use rand::Rng;

#[cfg(feature = "image")]
use image::{RgbImage, RgbaImage};

/// A builder struct to generate a [`Palette`] from an image.
///
/// The image is downscaled to a thumbnail, its unique colors are counted,
/// the value of each color is clamped, and then k-means finds the palette colors.
/// Each palette color is then paired with a bold variant.
///
/// # Examples
/// ```
/// # use colorz::{PalettePipeline, PixelBuffer};
/// # use palette::Srgb;
/// # fn main() -> Result<(), colorz::Error> {
/// let mut pixels = vec![Srgb::new(0, 0, 255); 100];
/// pixels[..50].fill(Srgb::new(255, 0, 0));
/// let buffer = PixelBuffer::new(10, 10, pixels)?;
///
/// let palette = PalettePipeline::new(buffer).num_colors(2).palette()?;
/// assert_eq!(palette.swatches()[0].base, Srgb::new(255, 0, 0));
/// assert_eq!(palette.swatches()[1].base, Srgb::new(0, 0, 255));
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct PalettePipeline<'a> {
    /// The input image.
    pub(crate) pixels: PixelBuffer<'a>,
    /// The number of palette colors to generate.
    pub(crate) k: usize,
    /// The lower bound for the HSV value.
    pub(crate) min_value: u8,
    /// The upper bound for the HSV value.
    pub(crate) max_value: u8,
    /// The value added for bold colors.
    pub(crate) bold_offset: i16,
    /// Whether to sort the palette by hue.
    pub(crate) order_by_hue: bool,
    /// The size to downscale the image to.
    pub(crate) thumbnail_size: (u32, u32),
    /// The k-means parameters.
    pub(crate) kmeans: KmeansOptions,
}

impl<'a> PalettePipeline<'a> {
    /// Creates a new [`PalettePipeline`] with default options.
    #[must_use]
    pub fn new(pixels: PixelBuffer<'a>) -> Self {
        Self {
            pixels,
            k: DEFAULT_NUM_COLORS,
            min_value: DEFAULT_MIN_VALUE,
            max_value: DEFAULT_MAX_VALUE,
            bold_offset: DEFAULT_BOLD_OFFSET,
            order_by_hue: true,
            thumbnail_size: DEFAULT_THUMBNAIL_SIZE,
            kmeans: KmeansOptions::new(),
        }
    }

    /// Sets the number of palette colors (not counting bold variants).
    ///
    /// If the image has fewer unique colors (after value clamping),
    /// the palette will contain only that many colors.
    ///
    /// The default is `6`.
    #[must_use]
    pub fn num_colors(mut self, num_colors: usize) -> Self {
        self.k = num_colors;
        self
    }

    /// Sets the lower and upper bounds for the HSV value of each color, on a `0..=255` scale.
    ///
    /// The default bounds are `110` and `255`.
    #[must_use]
    pub fn value_bounds(mut self, min_value: u8, max_value: u8) -> Self {
        self.min_value = min_value;
        self.max_value = max_value;
        self
    }

    /// Sets the amount of HSV value (on a `0..=255` scale) added to create each bold color.
    ///
    /// The default is `50`.
    #[must_use]
    pub fn bold_offset(mut self, bold_offset: i16) -> Self {
        self.bold_offset = bold_offset;
        self
    }

    /// Sets whether to sort the palette by hue.
    ///
    /// The default is `true`.
    #[must_use]
    pub fn order_by_hue(mut self, order_by_hue: bool) -> Self {
        self.order_by_hue = order_by_hue;
        self
    }

    /// Sets the size that the image is downscaled to before counting colors.
    ///
    /// The default is `200 × 200`.
    #[must_use]
    pub fn thumbnail_size(mut self, width: u32, height: u32) -> Self {
        self.thumbnail_size = (width, height);
        self
    }

    /// Sets the k-means parameters.
    #[must_use]
    pub fn kmeans(mut self, options: KmeansOptions) -> Self {
        self.kmeans = options;
        self
    }

    /// Checks the configuration and the input image.
    fn validate(&self) -> Result<(), Error> {
        if self.k == 0 {
            return Err(Error::InvalidConfiguration(
                "the number of colors must be at least 1".to_owned(),
            ));
        }

        if self.min_value > self.max_value {
            return Err(Error::InvalidConfiguration(format!(
                "the minimum value {} is above the maximum value {}",
                self.min_value, self.max_value
            )));
        }

        let (width, height) = self.thumbnail_size;
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfiguration(format!(
                "the thumbnail size {width}x{height} has zero area"
            )));
        }

        if u64::from(width) * u64::from(height) > u64::from(MAX_PIXELS) {
            return Err(Error::AboveMaxPixels);
        }

        if self.pixels.is_empty() {
            return Err(Error::EmptyInput);
        }

        Ok(())
    }

    /// Clamps the value of each counted color.
    fn clamp(&self, color: Srgb<u8>) -> Srgb<u8> {
        adjust::clamp_value(color, self.min_value, self.max_value)
    }

    /// Caps the number of colors at the number of unique clamped colors.
    fn capped_k(&self, color_counts: &UniqueColorCounts) -> usize {
        if self.k > color_counts.len() {
            log::debug!(
                "requested {} colors but only {} unique colors remain after clamping",
                self.k,
                color_counts.len()
            );
        }
        self.k.min(color_counts.len())
    }

    /// Logs the number of colors before and after clamping.
    fn log_counts(color_counts: &UniqueColorCounts, clamped: &UniqueColorCounts) {
        log::debug!(
            "{} unique colors, {} after clamping",
            color_counts.len(),
            clamped.len()
        );
    }

    /// Logs how the k-means run ended.
    fn log_kmeans(output: &kmeans::KmeansOutput) {
        log::debug!(
            "k-means ran {} iterations (converged: {})",
            output.iterations,
            output.converged
        );
    }

    /// Orders the cluster centers and pairs each with its bold variant.
    fn assemble(&self, output: &kmeans::KmeansOutput) -> Palette {
        let colors = output.colors();
        let colors = if self.order_by_hue {
            adjust::order_by_hue(&colors)
        } else {
            colors
        };

        let bold = colors
            .iter()
            .map(|&color| adjust::brighten(color, self.bold_offset))
            .collect();

        Palette::zip(colors, bold)
    }

    /// Computes the palette using the random number generator described by the [`KmeansOptions`].
    ///
    /// # Errors
    /// Returns [`Error::InvalidConfiguration`] if the number of colors is zero,
    /// the value bounds are inverted, or the thumbnail size has zero area.
    /// Returns [`Error::AboveMaxPixels`] if the thumbnail size has more than [`MAX_PIXELS`] pixels.
    /// Returns [`Error::EmptyInput`] if the image has no pixels.
    pub fn palette(&self) -> Result<Palette, Error> {
        self.palette_with_rng(&mut self.kmeans.rng())
    }

    /// Computes the palette using the given random number generator for k-means.
    ///
    /// The seed and randomize settings of the [`KmeansOptions`] are ignored.
    ///
    /// # Errors
    /// See [`PalettePipeline::palette`].
    pub fn palette_with_rng(&self, rng: &mut impl Rng) -> Result<Palette, Error> {
        self.validate()?;

        let (width, height) = self.thumbnail_size;
        let thumbnail = sample::downscale(&self.pixels, width, height);
        let color_counts = UniqueColorCounts::new(thumbnail.pixels());
        let clamped = color_counts.map(|color| self.clamp(color));
        Self::log_counts(&color_counts, &clamped);

        let k = self.capped_k(&clamped);
        let output = kmeans::palette(&clamped, k, self.kmeans.max_iter, rng);
        Self::log_kmeans(&output);

        Ok(self.assemble(&output))
    }
}

#[cfg(feature = "threads")]
impl<'a> PalettePipeline<'a> {
    /// Computes the palette in parallel using the random number generator
    /// described by the [`KmeansOptions`].
    ///
    /// The result is identical to [`PalettePipeline::palette`].
    ///
    /// # Errors
    /// See [`PalettePipeline::palette`].
    pub fn palette_par(&self) -> Result<Palette, Error> {
        self.palette_par_with_rng(&mut self.kmeans.rng())
    }

    /// Computes the palette in parallel using the given random number generator for k-means.
    ///
    /// The result is identical to [`PalettePipeline::palette_with_rng`].
    ///
    /// # Errors
    /// See [`PalettePipeline::palette`].
    pub fn palette_par_with_rng(&self, rng: &mut impl Rng) -> Result<Palette, Error> {
        self.validate()?;

        let (width, height) = self.thumbnail_size;
        let thumbnail = sample::downscale_par(&self.pixels, width, height);
        let color_counts = UniqueColorCounts::new_par(thumbnail.pixels());
        let (min_value, max_value) = (self.min_value, self.max_value);
        let clamped = color_counts.map_par(|color| adjust::clamp_value(color, min_value, max_value));
        Self::log_counts(&color_counts, &clamped);

        let k = self.capped_k(&clamped);
        let output = kmeans::palette_par(&clamped, k, self.kmeans.max_iter, rng);
        Self::log_kmeans(&output);

        Ok(self.assemble(&output))
    }
}

impl<'a> From<PixelBuffer<'a>> for PalettePipeline<'a> {
    fn from(pixels: PixelBuffer<'a>) -> Self {
        Self::new(pixels)
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbImage> for PalettePipeline<'a> {
    type Error = Error;

    fn try_from(image: &'a RgbImage) -> Result<Self, Self::Error> {
        Ok(Self::new(image.try_into()?))
    }
}

#[cfg(feature = "image")]
impl<'a> TryFrom<&'a RgbaImage> for PalettePipeline<'a> {
    type Error = Error;

    fn try_from(image: &'a RgbaImage) -> Result<Self, Self::Error> {
        Ok(Self::new(image.try_into()?))
    }
}
