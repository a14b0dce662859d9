//! Contains the code for color/pixel deduplication.

use palette::{cast, Srgb};
#[cfg(feature = "threads")]
use rayon::prelude::*;

/// Deduplicated colors and the number of times each color occurred.
///
/// The colors are unique and sorted in ascending `(red, green, blue)` order.
/// This order carries no meaning beyond making the output deterministic.
/// Every count is nonzero, and the counts sum to [`total_count`](UniqueColorCounts::total_count).
///
/// # Examples
/// ```
/// # use colorz::UniqueColorCounts;
/// # use palette::Srgb;
/// let pixels = [Srgb::new(0, 0, 255), Srgb::new(255, 0, 0), Srgb::new(0, 0, 255)];
/// let counts = UniqueColorCounts::new(&pixels);
/// assert_eq!(counts.colors(), &[Srgb::new(0, 0, 255), Srgb::new(255, 0, 0)]);
/// assert_eq!(counts.counts(), &[2, 1]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UniqueColorCounts {
    /// The unique colors.
    colors: Vec<Srgb<u8>>,
    /// The number of times each color was seen.
    counts: Vec<u32>,
    /// The sum of `counts`.
    total_count: u64,
}

impl UniqueColorCounts {
    /// Counts the unique colors in the given slice.
    ///
    /// Counts saturate at `u32::MAX`,
    /// which cannot happen for a [`PixelBuffer`](crate::PixelBuffer).
    #[must_use]
    pub fn new(colors: &[Srgb<u8>]) -> Self {
        let mut components = colors.iter().map(|&c| cast::into_array(c)).collect::<Vec<_>>();
        components.sort_unstable();
        Self::from_sorted_runs(&components)
    }

    /// Builds the counts from sorted components by run-length encoding equal neighbors.
    fn from_sorted_runs(sorted: &[[u8; 3]]) -> Self {
        let mut colors = Vec::<Srgb<u8>>::new();
        let mut counts = Vec::<u32>::new();

        for &color in sorted {
            match colors.last() {
                Some(&last) if cast::into_array::<Srgb<u8>>(last) == color => {
                    if let Some(count) = counts.last_mut() {
                        *count = count.saturating_add(1);
                    }
                }
                _ => {
                    colors.push(cast::from_array(color));
                    counts.push(1);
                }
            }
        }

        let total_count = counts.iter().copied().map(u64::from).sum();
        Self { colors, counts, total_count }
    }

    /// Builds the counts from `(color, count)` pairs sorted by color, merging equal colors.
    fn from_sorted_pairs(sorted: &[([u8; 3], u32)]) -> Self {
        let mut colors = Vec::<Srgb<u8>>::new();
        let mut counts = Vec::<u32>::new();

        for &(color, count) in sorted {
            match (colors.last(), counts.last_mut()) {
                (Some(&last), Some(total)) if cast::into_array::<Srgb<u8>>(last) == color => {
                    *total = total.saturating_add(count);
                }
                _ => {
                    colors.push(cast::from_array(color));
                    counts.push(count);
                }
            }
        }

        let total_count = counts.iter().copied().map(u64::from).sum();
        Self { colors, counts, total_count }
    }

    /// Applies `convert` to each unique color.
    ///
    /// Colors that become equal after conversion are merged and their counts summed,
    /// so the returned colors are still unique.
    #[must_use]
    pub fn map(&self, convert: impl Fn(Srgb<u8>) -> Srgb<u8>) -> Self {
        let mut pairs = self
            .colors
            .iter()
            .zip(&self.counts)
            .map(|(&color, &count)| (cast::into_array(convert(color)), count))
            .collect::<Vec<_>>();

        pairs.sort_unstable_by_key(|&(color, _)| color);
        Self::from_sorted_pairs(&pairs)
    }

    /// The unique colors.
    #[must_use]
    pub fn colors(&self) -> &[Srgb<u8>] {
        &self.colors
    }

    /// The number of occurrences of each color in [`colors`](UniqueColorCounts::colors).
    #[must_use]
    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    /// The number of input colors before deduplication.
    #[must_use]
    pub const fn total_count(&self) -> u64 {
        self.total_count
    }

    /// The number of unique colors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Whether or not there are no colors.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Returns an iterator over `(color, count)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (Srgb<u8>, u32)> + '_ {
        self.colors.iter().copied().zip(self.counts.iter().copied())
    }
}

#[cfg(feature = "threads")]
impl UniqueColorCounts {
    /// Counts the unique colors in the given slice in parallel.
    ///
    /// The result is identical to [`UniqueColorCounts::new`].
    #[must_use]
    pub fn new_par(colors: &[Srgb<u8>]) -> Self {
        let mut components = colors.par_iter().map(|&c| cast::into_array(c)).collect::<Vec<_>>();
        components.par_sort_unstable();
        Self::from_sorted_runs(&components)
    }

    /// Applies `convert` to each unique color in parallel, merging colors that become equal.
    ///
    /// The result is identical to [`UniqueColorCounts::map`].
    #[must_use]
    pub fn map_par(&self, convert: impl Fn(Srgb<u8>) -> Srgb<u8> + Sync) -> Self {
        let mut pairs = self
            .colors
            .par_iter()
            .zip(&self.counts)
            .map(|(&color, &count)| (cast::into_array(convert(color)), count))
            .collect::<Vec<_>>();

        pairs.par_sort_unstable_by_key(|&(color, _)| color);
        Self::from_sorted_pairs(&pairs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tests::*;
    use rand::{seq::SliceRandom, SeedableRng};
    use rand_xoshiro::Xoroshiro128PlusPlus;

    fn assert_valid_unique(unique: &UniqueColorCounts, colors: &[Srgb<u8>]) {
        assert_eq!(unique.total_count(), colors.len() as u64);
        assert_eq!(unique.colors().len(), unique.counts().len());
        assert!(unique.counts().iter().all(|&n| n > 0));

        let unique = unique.colors();
        for i in 1..unique.len() {
            assert!(unique[i - 1].into_components() < unique[i].into_components());
        }
    }

    #[test]
    fn empty_input() {
        let unique = UniqueColorCounts::new(&[]);
        assert!(unique.is_empty() && unique.colors().is_empty() && unique.counts().is_empty());
        assert_eq!(unique.total_count(), 0);
    }

    #[test]
    fn single_repeated_color() {
        let colors = vec![Srgb::new(12, 34, 56); 500];
        let unique = UniqueColorCounts::new(&colors);
        assert_valid_unique(&unique, &colors);
        assert_eq!(unique.colors(), &[Srgb::new(12, 34, 56)]);
        assert_eq!(unique.counts(), &[500]);
    }

    #[test]
    fn all_distinct_colors() {
        let colors = (0..=255).map(|i| Srgb::new(i, 255 - i, 7)).collect::<Vec<_>>();
        let unique = UniqueColorCounts::new(&colors);
        assert_valid_unique(&unique, &colors);
        assert_eq!(unique.len(), colors.len());
        assert!(unique.counts().iter().all(|&n| n == 1));
    }

    #[test]
    fn add_duplicate_color() {
        let mut colors = test_data_1024();
        let without_duplicate = UniqueColorCounts::new(&colors);

        let duplicate = colors[0];
        colors.push(duplicate);
        let with_duplicate = UniqueColorCounts::new(&colors);
        assert_valid_unique(&with_duplicate, &colors);

        let i = with_duplicate.colors().iter().position(|&c| c == duplicate).unwrap();
        let mut expected = without_duplicate;
        expected.counts[i] += 1;
        expected.total_count += 1;
        assert_eq!(with_duplicate, expected);
    }

    #[test]
    fn reordered_input() {
        let colors = [test_data_1024().as_slice(); 4].concat();
        let mut reordered = colors.clone();
        reordered.shuffle(&mut Xoroshiro128PlusPlus::seed_from_u64(0));

        let expected = UniqueColorCounts::new(&colors);
        let actual = UniqueColorCounts::new(&reordered);
        assert_valid_unique(&actual, &reordered);
        assert_eq!(actual, expected);
    }

    #[test]
    fn map_merges_equal_colors() {
        let colors = [
            Srgb::new(10, 0, 0),
            Srgb::new(10, 0, 0),
            Srgb::new(20, 0, 0),
            Srgb::new(30, 0, 0),
        ];
        let unique = UniqueColorCounts::new(&colors);

        let merged = unique.map(|c| Srgb::new(c.red.min(20), 0, 0));
        assert_eq!(merged.colors(), &[Srgb::new(10, 0, 0), Srgb::new(20, 0, 0)]);
        assert_eq!(merged.counts(), &[2, 2]);
        assert_eq!(merged.total_count(), unique.total_count());
    }

    #[test]
    #[cfg(feature = "threads")]
    fn single_and_multi_threaded_match() {
        let colors = [test_data_1024().as_slice(); 16].concat();

        let single = UniqueColorCounts::new(&colors);
        let par = UniqueColorCounts::new_par(&colors);
        assert_valid_unique(&single, &colors);
        assert_eq!(single, par);

        let convert = |c: Srgb<u8>| Srgb::new(c.red / 16, c.green / 16, c.blue / 16);
        assert_eq!(single.map(convert), par.map_par(convert));
    }
}
