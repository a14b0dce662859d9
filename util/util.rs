#![allow(dead_code)]

use colorz::PixelBuffer;
use palette::Srgb;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoroshiro128PlusPlus;

/// Image sizes used across the benchmarks.
pub const SIZES: [(u32, u32); 3] = [(480, 270), (1920, 1080), (3840, 2160)];

/// A smooth two dimensional gradient, which has many unique but closely spaced colors.
pub fn gradient(width: u32, height: u32) -> PixelBuffer<'static> {
    let pixels = (0..height)
        .flat_map(|y| {
            (0..width).map(move |x| {
                Srgb::new(
                    (x * 255 / width.max(1)) as u8,
                    (y * 255 / height.max(1)) as u8,
                    ((x + y) * 127 / (width + height).max(1)) as u8,
                )
            })
        })
        .collect::<Vec<_>>();

    PixelBuffer::new(width, height, pixels).unwrap()
}

/// Uniform random noise, the worst case for the number of unique colors.
pub fn noise(width: u32, height: u32, seed: u64) -> PixelBuffer<'static> {
    let mut rng = Xoroshiro128PlusPlus::seed_from_u64(seed);
    let pixels = (0..(width as usize * height as usize))
        .map(|_| Srgb::from(rng.gen::<[u8; 3]>()))
        .collect::<Vec<_>>();

    PixelBuffer::new(width, height, pixels).unwrap()
}

/// Every benchmark image alongside a name.
pub fn images() -> Vec<(String, PixelBuffer<'static>)> {
    SIZES
        .iter()
        .flat_map(|&(w, h)| {
            [
                (format!("gradient/{w}x{h}"), gradient(w, h)),
                (format!("noise/{w}x{h}"), noise(w, h, 0)),
            ]
        })
        .collect()
}
