//! HSV based color adjustments: value clamping, bold variants, and hue ordering.
//!
//! All functions work on [`Srgb<u8>`] and go through [`Hsv`] with `f64` components.
//! Values given as `u8`/`i16` amounts are on a `0..=255` scale and are divided by `255`
//! before being applied to the `[0, 1]` HSV value channel.
//! Channels are always clamped to `[0, 1]` before being rounded back to `u8`.

use ordered_float::OrderedFloat;
use palette::{encoding, FromColor, Hsv, Srgb};

/// [`Hsv`] in the sRGB color space with `f64` components.
pub type Hsv64 = Hsv<encoding::Srgb, f64>;

/// Converts a `[0, 1]` channel to `0..=255`, rounding to the nearest integer.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn unit_to_u8(x: f64) -> u8 {
    (x.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Converts a `[0, 1]` `f64` sRGB color to `u8` with rounding and clamping.
pub(crate) fn srgb_to_u8(color: Srgb<f64>) -> Srgb<u8> {
    Srgb::new(
        unit_to_u8(color.red),
        unit_to_u8(color.green),
        unit_to_u8(color.blue),
    )
}

/// Converts a color to HSV.
#[must_use]
pub fn to_hsv(color: Srgb<u8>) -> Hsv64 {
    Hsv64::from_color(color.into_format::<f64>())
}

/// Converts an HSV color back to `u8` sRGB, clamping out of range values.
#[must_use]
pub fn from_hsv(hsv: Hsv64) -> Srgb<u8> {
    srgb_to_u8(Srgb::<f64>::from_color(hsv))
}

/// The hue of a color in degrees, in the range `[0, 360)`.
///
/// Grays have a hue of `0`.
#[must_use]
pub fn hue(color: Srgb<u8>) -> f64 {
    to_hsv(color).hue.into_positive_degrees()
}

/// Clamps the HSV value of a color to `[min_value / 255, max_value / 255]`,
/// keeping its hue and saturation.
///
/// If `min_value > max_value`, the value is set to `max_value / 255`.
///
/// # Examples
/// ```
/// # use colorz::adjust::clamp_value;
/// # use palette::Srgb;
/// assert_eq!(clamp_value(Srgb::new(255, 0, 0), 0, 128), Srgb::new(128, 0, 0));
/// assert_eq!(clamp_value(Srgb::new(10, 10, 10), 110, 255), Srgb::new(110, 110, 110));
/// ```
#[must_use]
pub fn clamp_value(color: Srgb<u8>, min_value: u8, max_value: u8) -> Srgb<u8> {
    let min = f64::from(min_value) / 255.0;
    let max = f64::from(max_value) / 255.0;

    let mut hsv = to_hsv(color);
    hsv.value = hsv.value.max(min).min(max);
    from_hsv(hsv)
}

/// Adds `offset / 255` to the HSV value of a color, clamping the result to `[0, 1]`.
///
/// This creates the "bold" variant of a palette color. An `offset` of `0` returns `color`.
///
/// # Examples
/// ```
/// # use colorz::adjust::brighten;
/// # use palette::Srgb;
/// assert_eq!(brighten(Srgb::new(0, 0, 128), 50), Srgb::new(0, 0, 178));
/// assert_eq!(brighten(Srgb::new(0, 0, 240), 50), Srgb::new(0, 0, 255));
/// ```
#[must_use]
pub fn brighten(color: Srgb<u8>, offset: i16) -> Srgb<u8> {
    let mut hsv = to_hsv(color);
    hsv.value = (hsv.value + f64::from(offset) / 255.0).clamp(0.0, 1.0);
    from_hsv(hsv)
}

/// Sorts colors by ascending hue.
///
/// The sort is stable, so colors with the same hue (e.g., grays) keep their relative order.
/// For evenly spread hues the order is red, yellow, green, cyan, blue, magenta.
#[must_use]
pub fn order_by_hue(colors: &[Srgb<u8>]) -> Vec<Srgb<u8>> {
    let mut colors = colors.to_vec();
    colors.sort_by_key(|&color| OrderedFloat(hue(color)));
    colors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    const RED: Srgb<u8> = Srgb::new(255, 0, 0);
    const YELLOW: Srgb<u8> = Srgb::new(255, 255, 0);
    const GREEN: Srgb<u8> = Srgb::new(0, 255, 0);
    const CYAN: Srgb<u8> = Srgb::new(0, 255, 255);
    const BLUE: Srgb<u8> = Srgb::new(0, 0, 255);
    const MAGENTA: Srgb<u8> = Srgb::new(255, 0, 255);

    fn assert_within_one(a: Srgb<u8>, b: Srgb<u8>) {
        let a: [u8; 3] = a.into();
        let b: [u8; 3] = b.into();
        for (x, y) in a.into_iter().zip(b) {
            assert!(x.abs_diff(y) <= 1, "{a:?} != {b:?}");
        }
    }

    fn value(color: Srgb<u8>) -> f64 {
        to_hsv(color).value
    }

    #[test]
    fn hsv_round_trip() {
        let grid = (0..=255u8)
            .step_by(15)
            .flat_map(|r| (0..=255u8).step_by(15).map(move |g| (r, g)))
            .flat_map(|(r, g)| (0..=255u8).step_by(15).map(move |b| Srgb::new(r, g, b)));

        for color in grid.chain(test_data_1024()) {
            assert_within_one(from_hsv(to_hsv(color)), color);
        }
    }

    #[test]
    fn clamp_keeps_value_in_bounds() {
        let (min, max) = (110, 200);
        let lower = f64::from(min) / 255.0 - 1.0 / 255.0;
        let upper = f64::from(max) / 255.0 + 1.0 / 255.0;

        for color in test_data_1024() {
            let v = value(clamp_value(color, min, max));
            assert!(lower <= v && v <= upper, "value {v} out of bounds for {color:?}");
        }
    }

    #[test]
    fn clamp_preserves_hue() {
        for color in [RED, YELLOW, GREEN, CYAN, BLUE, MAGENTA, Srgb::new(200, 100, 50)] {
            let clamped = clamp_value(color, 0, 100);
            assert!((hue(clamped) - hue(color)).abs() < 1.0);
            assert!((to_hsv(clamped).saturation - to_hsv(color).saturation).abs() < 0.02);
        }
    }

    #[test]
    fn clamp_within_bounds_is_unchanged() {
        for color in test_data_1024() {
            assert_within_one(clamp_value(color, 0, 255), color);
        }
    }

    #[test]
    fn inverted_bounds_collapse_to_max() {
        let clamped = clamp_value(Srgb::new(10, 200, 30), 200, 100);
        assert_eq!(clamped.green, 100);

        let clamped = clamp_value(Srgb::new(0, 0, 0), 255, 0);
        assert_eq!(clamped, Srgb::new(0, 0, 0));
    }

    #[test]
    fn brighten_by_zero_is_identity() {
        for color in test_data_1024() {
            assert_eq!(brighten(color, 0), color);
        }
    }

    #[test]
    fn brighten_clamps() {
        assert_eq!(brighten(RED, 50), RED);
        assert_eq!(brighten(Srgb::new(0, 0, 100), -200), Srgb::new(0, 0, 0));
        assert_eq!(brighten(Srgb::new(0, 100, 0), -50), Srgb::new(0, 50, 0));
    }

    #[test]
    fn brighten_keeps_hue() {
        for color in [Srgb::new(100, 50, 20), Srgb::new(20, 60, 120), Srgb::new(90, 30, 90)] {
            let bold = brighten(color, 50);
            assert!(value(bold) > value(color));
            assert!((hue(bold) - hue(color)).abs() < 1.0);
        }
    }

    #[test]
    fn orders_primary_hues() {
        let expected = vec![RED, YELLOW, GREEN, CYAN, BLUE, MAGENTA];
        let mut shuffled = expected.clone();
        shuffled.shuffle(&mut Xoroshiro128PlusPlus::seed_from_u64(7));

        assert_eq!(order_by_hue(&shuffled), expected);
    }

    #[test]
    fn ordered_hues_are_ascending() {
        let ordered = order_by_hue(&test_data_1024());
        for pair in ordered.windows(2) {
            assert!(hue(pair[0]) <= hue(pair[1]));
        }
    }

    #[test]
    fn equal_hues_keep_order() {
        let grays = [Srgb::new(50, 50, 50), Srgb::new(10, 10, 10), Srgb::new(200, 200, 200)];
        assert_eq!(order_by_hue(&grays), grays);
    }
}
