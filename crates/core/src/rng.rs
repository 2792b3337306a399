//! RNG module - seeded randomness for colors, disco picks and shuffles
//!
//! Wraps a ChaCha8 stream so that the same seed always produces the same
//! board, the same refills and the same shuffles. Every random decision in
//! the simulation goes through one [`TileRng`].

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use match3_types::Color;

/// Deterministic random source for the simulation
#[derive(Debug, Clone)]
pub struct TileRng {
    inner: ChaCha8Rng,
    seed: u64,
}

impl TileRng {
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }

    /// Seed this stream was created from
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Random value in `[0, max)`; zero when `max` is zero
    pub fn next_range(&mut self, max: u32) -> u32 {
        if max == 0 {
            return 0;
        }
        self.inner.random_range(0..max)
    }

    /// Uniform color below `count`
    pub fn color(&mut self, count: u8) -> Color {
        Color(self.next_range(u32::from(count)) as u8)
    }

    /// Uniform element of a non-empty slice
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        items.get(self.next_range(items.len() as u32) as usize)
    }

    /// Shuffle a slice using Fisher-Yates
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.next_range((i + 1) as u32) as usize;
            slice.swap(i, j);
        }
    }
}

impl Default for TileRng {
    fn default() -> Self {
        Self::new(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rng_deterministic() {
        let mut rng1 = TileRng::new(12345);
        let mut rng2 = TileRng::new(12345);
        for _ in 0..100 {
            assert_eq!(rng1.next_range(1000), rng2.next_range(1000));
        }
    }

    #[test]
    fn test_colors_stay_in_range() {
        let mut rng = TileRng::new(7);
        for _ in 0..500 {
            assert!(rng.color(6).0 < 6);
        }
        assert_eq!(rng.next_range(0), 0);
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = TileRng::new(99);
        let mut values: Vec<u32> = (0..20).collect();
        rng.shuffle(&mut values);
        let mut sorted = values.clone();
        sorted.sort();
        assert_eq!(sorted, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_pick_empty() {
        let mut rng = TileRng::new(3);
        let empty: [u8; 0] = [];
        assert_eq!(rng.pick(&empty), None);
        assert_eq!(rng.pick(&[42]), Some(&42));
    }
}
