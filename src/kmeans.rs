//! Weighted k-means (Lloyd's algorithm) over deduplicated colors.
//!
//! Each unique color is a point in the RGB cube (on a `0..=255` scale)
//! weighted by the number of pixels it occurred in.
//! Every iteration assigns each color to its nearest center (by Euclidean distance,
//! ties going to the center with the lowest index) and then moves each center
//! to the weighted mean of its assigned colors.
//! A center that ends up with no colors is reseeded to a uniformly random input color.
//! Iteration stops once every center moves less than [`CONVERGENCE_THRESHOLD`]
//! or after the maximum number of iterations.
//!
//! All randomness comes from the [`Rng`] passed in by the caller,
//! so a seeded generator gives the exact same centers on every run and platform.
//! The parallel version [`palette_par`] only parallelizes the assignment step;
//! all sums are still accumulated in color order, so its output matches [`palette`].

use crate::{adjust, UniqueColorCounts};

use palette::{cast, Srgb};
use rand::{prelude::Distribution, seq::index, Rng};
use rand_distr::Uniform;

#[cfg(feature = "threads")]
use rayon::prelude::*;

/// A center stops being updated once it moves less than this distance (on a `0..=255` scale).
pub const CONVERGENCE_THRESHOLD: f64 = 1e-3;

/// The default maximum number of k-means iterations.
pub const DEFAULT_MAX_ITER: u32 = 100;

/// The output of a k-means run.
#[derive(Debug, Clone, PartialEq)]
pub struct KmeansOutput {
    /// The final cluster centers as `[red, green, blue]` on a `0..=255` scale.
    pub centroids: Vec<[f64; 3]>,
    /// The total weight (number of pixels) assigned to each center on the last iteration.
    ///
    /// A count may be zero if the center was reseeded on the last iteration.
    pub counts: Vec<u64>,
    /// The number of iterations that were run.
    pub iterations: u32,
    /// Whether the centers converged before the iteration limit.
    pub converged: bool,
}

impl KmeansOutput {
    /// Uses every unique color as its own center.
    fn trivial(color_counts: &UniqueColorCounts) -> Self {
        Self {
            centroids: color_counts
                .colors()
                .iter()
                .map(|&c| cast::into_array(c).map(f64::from))
                .collect(),
            counts: color_counts.counts().iter().copied().map(u64::from).collect(),
            iterations: 0,
            converged: true,
        }
    }

    /// The centers rounded to the nearest `u8` color.
    #[must_use]
    pub fn colors(&self) -> Vec<Srgb<u8>> {
        self.centroids.iter().map(|&c| centroid_to_srgb(c)).collect()
    }
}

/// Rounds and clamps a center to a `u8` color.
#[must_use]
pub fn centroid_to_srgb(centroid: [f64; 3]) -> Srgb<u8> {
    adjust::srgb_to_u8(Srgb::from(centroid.map(|c| c / 255.0)))
}

/// The squared Euclidean distance between two points.
#[inline]
fn squared_distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let d0 = a[0] - b[0];
    let d1 = a[1] - b[1];
    let d2 = a[2] - b[2];
    d0 * d0 + d1 * d1 + d2 * d2
}

/// Returns the index of the center nearest to `point`, preferring the lowest index on ties.
#[inline]
fn nearest(centroids: &[[f64; 3]], point: [f64; 3]) -> usize {
    let mut min_index = 0;
    let mut min_distance = f64::INFINITY;
    for (i, &centroid) in centroids.iter().enumerate() {
        let distance = squared_distance(point, centroid);
        if distance < min_distance {
            min_distance = distance;
            min_index = i;
        }
    }
    min_index
}

/// The per-run clustering state.
struct State<'a> {
    /// The input colors and their weights.
    color_counts: &'a UniqueColorCounts,
    /// `color_counts.colors()` as `f64` points.
    points: Vec<[f64; 3]>,
    /// The current cluster centers.
    centroids: Vec<[f64; 3]>,
    /// The index of the center each point is assigned to.
    assignments: Vec<usize>,
    /// The total weight assigned to each center.
    counts: Vec<u64>,
}

impl<'a> State<'a> {
    /// Picks `k` distinct input colors as the initial centers.
    fn new(color_counts: &'a UniqueColorCounts, k: usize, rng: &mut impl Rng) -> Self {
        let points = color_counts
            .colors()
            .iter()
            .map(|&c| cast::into_array(c).map(f64::from))
            .collect::<Vec<_>>();

        let centroids = index::sample(rng, points.len(), k)
            .into_iter()
            .map(|i| points[i])
            .collect::<Vec<_>>();

        Self {
            color_counts,
            assignments: vec![0; points.len()],
            counts: vec![0; k],
            points,
            centroids,
        }
    }

    /// Assigns each point to its nearest center.
    fn assign(&mut self) {
        let Self { points, centroids, assignments, .. } = self;
        for (assignment, &point) in assignments.iter_mut().zip(&*points) {
            *assignment = nearest(centroids, point);
        }
    }

    /// Moves each center to the weighted mean of its points, reseeding empty clusters.
    ///
    /// Returns whether every center moved less than [`CONVERGENCE_THRESHOLD`].
    fn update(&mut self, rng: &mut impl Rng, reseed: &Uniform<usize>) -> bool {
        let Self {
            color_counts, points, centroids, assignments, counts,
        } = self;

        let mut sums = vec![[0.0f64; 3]; centroids.len()];
        counts.fill(0);

        for ((&point, &i), &count) in points.iter().zip(&*assignments).zip(color_counts.counts()) {
            let weight = f64::from(count);
            for (s, p) in sums[i].iter_mut().zip(point) {
                *s += p * weight;
            }
            counts[i] += u64::from(count);
        }

        let mut converged = true;
        for (i, (centroid, sum)) in centroids.iter_mut().zip(sums).enumerate() {
            let updated = if counts[i] == 0 {
                let point = points[reseed.sample(rng)];
                log::trace!("reseeded empty cluster {i} to {point:?}");
                point
            } else {
                #[allow(clippy::cast_precision_loss)]
                let total = counts[i] as f64;
                sum.map(|s| s / total)
            };

            if squared_distance(*centroid, updated).sqrt() >= CONVERGENCE_THRESHOLD {
                converged = false;
            }
            *centroid = updated;
        }

        converged
    }

    /// Runs Lloyd iterations using `assign` for the assignment step.
    fn run(
        mut self,
        max_iter: u32,
        rng: &mut impl Rng,
        mut assign: impl FnMut(&mut Self),
    ) -> KmeansOutput {
        let reseed = Uniform::new(0, self.points.len());

        let mut iterations = 0;
        let mut converged = false;
        while iterations < max_iter && !converged {
            assign(&mut self);
            converged = self.update(rng, &reseed);
            iterations += 1;
        }

        log::trace!("k-means finished after {iterations} iterations (converged: {converged})");

        let Self { centroids, counts, .. } = self;
        KmeansOutput { centroids, counts, iterations, converged }
    }
}

/// Computes a palette of (at most) `k` colors for the given colors and counts.
///
/// The initial centers are `k` distinct input colors chosen using `rng`.
/// If there are `k` or fewer unique colors, each color becomes its own center
/// (so the output has fewer than `k` centers when there are fewer than `k` unique colors).
/// If `k` is `0` or there are no colors, the output is empty.
///
/// # Examples
/// ```
/// # use colorz::{kmeans, UniqueColorCounts};
/// # use palette::Srgb;
/// # use rand::SeedableRng;
/// # use rand_xoshiro::Xoroshiro128PlusPlus;
/// let pixels = [Srgb::new(250, 0, 0), Srgb::new(240, 0, 0), Srgb::new(0, 0, 250)];
/// let counts = UniqueColorCounts::new(&pixels);
/// let mut rng = Xoroshiro128PlusPlus::seed_from_u64(0);
/// let output = kmeans::palette(&counts, 2, 100, &mut rng);
/// assert_eq!(output.centroids.len(), 2);
/// ```
#[must_use]
pub fn palette(
    color_counts: &UniqueColorCounts,
    k: usize,
    max_iter: u32,
    rng: &mut impl Rng,
) -> KmeansOutput {
    if k == 0 || color_counts.is_empty() {
        KmeansOutput::trivial(&UniqueColorCounts::default())
    } else if color_counts.len() <= k {
        KmeansOutput::trivial(color_counts)
    } else {
        State::new(color_counts, k, rng).run(max_iter, rng, State::assign)
    }
}

#[cfg(feature = "threads")]
impl<'a> State<'a> {
    /// Assigns each point to its nearest center in parallel.
    fn assign_par(&mut self) {
        let Self { points, centroids, assignments, .. } = self;
        let centroids = &*centroids;
        points
            .par_iter()
            .map(|&point| nearest(centroids, point))
            .collect_into_vec(assignments);
    }
}

/// Computes a palette of (at most) `k` colors, finding the nearest centers in parallel.
///
/// The output is identical to [`palette`] given the same inputs and `rng` state.
#[cfg(feature = "threads")]
#[must_use]
pub fn palette_par(
    color_counts: &UniqueColorCounts,
    k: usize,
    max_iter: u32,
    rng: &mut impl Rng,
) -> KmeansOutput {
    if k == 0 || color_counts.is_empty() {
        KmeansOutput::trivial(&UniqueColorCounts::default())
    } else if color_counts.len() <= k {
        KmeansOutput::trivial(color_counts)
    } else {
        State::new(color_counts, k, rng).run(max_iter, rng, State::assign_par)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn rng() -> Xoroshiro128PlusPlus {
        Xoroshiro128PlusPlus::seed_from_u64(216)
    }

    fn counts() -> UniqueColorCounts {
        UniqueColorCounts::new(&[test_data_1024().as_slice(); 3].concat())
    }

    fn assert_in_bounds(output: &KmeansOutput) {
        for centroid in &output.centroids {
            assert!(centroid.iter().all(|&c| (0.0..=255.0).contains(&c)));
        }
    }

    #[test]
    fn returns_exactly_k_centers() {
        let counts = counts();
        for k in [1, 2, 6, 16, 100] {
            let output = palette(&counts, k, 100, &mut rng());
            assert_eq!(output.centroids.len(), k);
            assert_eq!(output.counts.len(), k);
            assert_in_bounds(&output);
        }
    }

    #[test]
    fn counts_sum_to_total() {
        let counts = counts();
        let output = palette(&counts, 8, 100, &mut rng());
        assert_eq!(output.counts.iter().sum::<u64>(), counts.total_count());
    }

    #[test]
    fn deterministic_with_same_seed() {
        let counts = counts();
        let a = palette(&counts, 6, 100, &mut rng());
        let b = palette(&counts, 6, 100, &mut rng());
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_are_independent_runs() {
        let counts = counts();
        let a = palette(&counts, 6, 100, &mut Xoroshiro128PlusPlus::seed_from_u64(1));
        let b = palette(&counts, 6, 100, &mut Xoroshiro128PlusPlus::seed_from_u64(2));
        assert_eq!(a.centroids.len(), b.centroids.len());
        assert_in_bounds(&a);
        assert_in_bounds(&b);
    }

    #[test]
    fn separates_two_groups() {
        let pixels = [
            vec![Srgb::new(250, 10, 10); 30],
            vec![Srgb::new(240, 20, 0); 10],
            vec![Srgb::new(10, 10, 250); 20],
            vec![Srgb::new(0, 20, 230); 20],
        ]
        .concat();
        let counts = UniqueColorCounts::new(&pixels);

        for seed in 0..10 {
            let output = palette(&counts, 2, 100, &mut Xoroshiro128PlusPlus::seed_from_u64(seed));
            let mut centroids = output.centroids;
            centroids.sort_by(|a, b| a[0].total_cmp(&b[0]));

            // weighted means of each group
            assert_eq!(centroids[0], [5.0, 15.0, 240.0]);
            assert_eq!(centroids[1], [247.5, 12.5, 7.5]);
            assert!(output.converged);
        }
    }

    #[test]
    fn centers_stay_within_input_range() {
        let pixels = [
            vec![Srgb::new(250, 10, 10); 30],
            vec![Srgb::new(240, 20, 0); 10],
            vec![Srgb::new(10, 10, 250); 20],
            vec![Srgb::new(0, 20, 230); 20],
            vec![Srgb::new(120, 200, 40); 5],
        ]
        .concat();
        let counts = UniqueColorCounts::new(&pixels);

        let mut lower = [f64::INFINITY; 3];
        let mut upper = [f64::NEG_INFINITY; 3];
        for &color in counts.colors() {
            let color = cast::into_array(color).map(f64::from);
            for i in 0..3 {
                lower[i] = lower[i].min(color[i]);
                upper[i] = upper[i].max(color[i]);
            }
        }

        for seed in 0..10 {
            let output = palette(&counts, 3, 100, &mut Xoroshiro128PlusPlus::seed_from_u64(seed));
            assert_eq!(output.centroids.len(), 3);
            for centroid in &output.centroids {
                for i in 0..3 {
                    assert!((lower[i]..=upper[i]).contains(&centroid[i]));
                }
            }
        }
    }

    #[test]
    fn trivial_when_few_colors() {
        let counts = UniqueColorCounts::new(&[Srgb::new(255, 0, 0), Srgb::new(0, 0, 255)]);
        let output = palette(&counts, 10, 100, &mut rng());
        assert_eq!(output.centroids, vec![[0.0, 0.0, 255.0], [255.0, 0.0, 0.0]]);
        assert_eq!(output.counts, vec![1, 1]);
    }

    #[test]
    fn empty_and_zero_k() {
        let output = palette(&UniqueColorCounts::default(), 3, 100, &mut rng());
        assert!(output.centroids.is_empty());

        let output = palette(&counts(), 0, 100, &mut rng());
        assert!(output.centroids.is_empty());
    }

    #[test]
    fn zero_iterations_returns_initial_centers() {
        let counts = counts();
        let output = palette(&counts, 4, 0, &mut rng());
        assert_eq!(output.iterations, 0);
        assert!(!output.converged);
        for centroid in &output.centroids {
            let color = centroid_to_srgb(*centroid);
            assert!(counts.colors().contains(&color));
        }
    }

    #[test]
    fn iteration_cap_is_respected() {
        let output = palette(&counts(), 32, 3, &mut rng());
        assert!(output.iterations <= 3);
    }

    #[test]
    fn ties_go_to_lowest_index() {
        let centroids = [[0.0, 0.0, 0.0], [10.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        assert_eq!(nearest(&centroids, [5.0, 0.0, 0.0]), 0);
        assert_eq!(nearest(&centroids, [1.0, 0.0, 0.0]), 0);
        assert_eq!(nearest(&centroids, [9.0, 0.0, 0.0]), 1);
    }

    #[test]
    fn empty_cluster_is_reseeded() {
        let counts = UniqueColorCounts::new(&[
            Srgb::new(0, 0, 0),
            Srgb::new(1, 0, 0),
            Srgb::new(255, 255, 255),
        ]);
        let mut rng = rng();
        let mut state = State::new(&counts, 2, &mut rng);
        // both centers on top of each other so the second one gets no points
        state.centroids = vec![[0.0, 0.0, 0.0], [0.0, 0.0, 0.0]];
        state.assign();
        let converged = state.update(&mut rng, &Uniform::new(0, state.points.len()));

        assert!(!converged);
        assert_eq!(state.counts[1], 0);
        assert!(state.points.contains(&state.centroids[1]));
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let counts = counts();
        for k in [1, 6, 32] {
            let single = palette(&counts, k, 100, &mut rng());
            let par = palette_par(&counts, k, 100, &mut rng());
            assert_eq!(single, par);
        }
    }
}
