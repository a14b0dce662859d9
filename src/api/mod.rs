//! Contains the types and functions for the high level pipeline builder API.

mod palette_pipeline;

pub use palette_pipeline::PalettePipeline;

use crate::kmeans::DEFAULT_MAX_ITER;

use rand::SeedableRng;
use rand_xoshiro::Xoroshiro128PlusPlus;

/// A builder struct to specify the parameters for k-means.
///
/// By default, k-means runs deterministically from a fixed seed,
/// so the same image always gives the same palette.
/// Use [`KmeansOptions::randomize`] to seed from OS entropy instead.
///
/// # Examples
/// ```
/// # use colorz::KmeansOptions;
/// let options = KmeansOptions::new()
///     .max_iter(50)
///     .seed(42);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KmeansOptions {
    /// The maximum number of iterations to run.
    pub(crate) max_iter: u32,
    /// The seed value for the random number generator.
    pub(crate) seed: u64,
    /// Whether to ignore `seed` and seed from OS entropy.
    pub(crate) randomize: bool,
}

impl Default for KmeansOptions {
    fn default() -> Self {
        Self::new()
    }
}

impl KmeansOptions {
    /// The default seed value.
    pub const DEFAULT_SEED: u64 = 216;

    /// Creates a new [`KmeansOptions`] with default values.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_iter: DEFAULT_MAX_ITER,
            seed: Self::DEFAULT_SEED,
            randomize: false,
        }
    }

    /// Sets the maximum number of iterations, which bounds the worst case running time.
    ///
    /// The default is `100`.
    #[must_use]
    pub const fn max_iter(mut self, max_iter: u32) -> Self {
        self.max_iter = max_iter;
        self
    }

    /// Sets the seed value for the random number generator.
    ///
    /// The default seed is `216`.
    #[must_use]
    pub const fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets whether to seed the random number generator from OS entropy,
    /// giving a (likely) different palette on every run.
    ///
    /// The default is `false`.
    #[must_use]
    pub const fn randomize(mut self, randomize: bool) -> Self {
        self.randomize = randomize;
        self
    }

    /// Creates the random number generator described by these options.
    #[must_use]
    pub fn rng(&self) -> Xoroshiro128PlusPlus {
        if self.randomize {
            Xoroshiro128PlusPlus::from_entropy()
        } else {
            Xoroshiro128PlusPlus::seed_from_u64(self.seed)
        }
    }
}
