//! HSL based shade derivation for consumers that build themes on top of a [`Palette`](crate::Palette).
//!
//! These are not part of the palette pipeline itself.

use crate::adjust::srgb_to_u8;
use palette::{encoding, FromColor, Hsl, Srgb};

/// [`Hsl`] in the sRGB color space with `f64` components.
type Hsl64 = Hsl<encoding::Srgb, f64>;

/// The saturation scaling in [`shade`] divides by the lightness factor, floored at this value.
pub const MIN_LIGHTNESS_FACTOR: f64 = 0.05;

/// The saturation of a shade is additionally scaled by this amount.
pub const SHADE_SATURATION_SCALE: f64 = 0.8;

/// Converts a color to HSL.
fn to_hsl(color: Srgb<u8>) -> Hsl64 {
    Hsl64::from_color(color.into_format::<f64>())
}

/// Converts an HSL color back to `u8` sRGB.
fn from_hsl(hsl: Hsl64) -> Srgb<u8> {
    srgb_to_u8(Srgb::<f64>::from_color(hsl))
}

/// Derives a darker or lighter shade of a color.
///
/// The HSL lightness is multiplied by `lightness_factor`, and the saturation by
/// `saturation_factor * 0.8 / lightness_factor`, so darker shades become more saturated.
/// The divisor is floored at [`MIN_LIGHTNESS_FACTOR`] and both channels are clamped to `[0, 1]`,
/// so factors near (or below) zero cannot produce out of range or inverted results.
///
/// # Examples
/// ```
/// # use colorz::shade::shade;
/// # use palette::Srgb;
/// let gray = Srgb::new(128, 128, 128);
/// assert_eq!(shade(gray, 0.5, 1.0), Srgb::new(64, 64, 64));
/// ```
#[must_use]
pub fn shade(color: Srgb<u8>, lightness_factor: f64, saturation_factor: f64) -> Srgb<u8> {
    let mut hsl = to_hsl(color);
    let divisor = lightness_factor.max(MIN_LIGHTNESS_FACTOR);

    hsl.lightness = (hsl.lightness * lightness_factor).clamp(0.0, 1.0);
    hsl.saturation =
        (hsl.saturation * saturation_factor * SHADE_SATURATION_SCALE / divisor).clamp(0.0, 1.0);

    from_hsl(hsl)
}

/// Sets the HSL saturation of a color to `amount`, clamped to `[0, 1]`.
#[must_use]
pub fn saturate(color: Srgb<u8>, amount: f64) -> Srgb<u8> {
    let mut hsl = to_hsl(color);
    hsl.saturation = amount.clamp(0.0, 1.0);
    from_hsl(hsl)
}
