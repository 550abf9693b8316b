//! Density-adaptive Poisson disk sampling over a luminance field.
//!
//! This module holds the algorithmic core:
//! - [`spatial_index`]: uniform grid bucketing accepted points for neighbor scans.
//! - [`density`]: luminance window sampling and luminance-to-radius mapping.
//! - [`poisson_disk`]: the active-set growth loop producing the point cloud.
//!
//! Randomness is drawn from any [`rand::RngCore`] through the helpers below, so a seeded
//! generator yields a reproducible point sequence.
use rand::RngCore;

pub mod density;
pub mod poisson_disk;
pub mod spatial_index;

pub use density::{sample_luminance, window_mean, DensityBias, DensityModel, SampleWindow};
pub use poisson_disk::{AdaptivePoissonSampler, ExclusionRule, SamplerStep, SamplingStats};
pub use spatial_index::{SpatialIndex, SCAN_PATTERN};

/// Generate a random float in the range [0, 1].
#[inline]
pub(crate) fn rand01(rng: &mut dyn RngCore) -> f32 {
    (rng.next_u32() as f32) / ((u32::MAX as f32) + 1.0)
}

/// Generate a random float in `[lo, hi]`.
#[inline]
pub(crate) fn rand_range(rng: &mut dyn RngCore, lo: f32, hi: f32) -> f32 {
    lo + rand01(rng) * (hi - lo)
}

/// Pick a uniformly random index into a sequence of `len` elements.
///
/// `len` must be non-zero.
#[inline]
pub(crate) fn rand_index(rng: &mut dyn RngCore, len: usize) -> usize {
    debug_assert!(len > 0);
    ((rand01(rng) * len as f32) as usize).min(len - 1)
}

/// Pick a uniformly random integer in `lo..=hi`.
#[inline]
pub(crate) fn rand_int_inclusive(rng: &mut dyn RngCore, lo: i32, hi: i32) -> i32 {
    debug_assert!(lo <= hi);
    let span = (hi - lo) as usize + 1;
    lo + rand_index(rng, span) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedRng {
        value: u32,
    }

    impl RngCore for FixedRng {
        fn next_u32(&mut self) -> u32 {
            self.value
        }

        fn next_u64(&mut self) -> u64 {
            self.value as u64
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            let bytes = self.value.to_le_bytes();
            for (i, b) in dest.iter_mut().enumerate() {
                *b = bytes[i % 4];
            }
        }
    }

    #[test]
    fn rand01_returns_zero_for_zero_input() {
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand01(&mut rng), 0.0);
    }

    #[test]
    fn rand01_values_in_range() {
        for value in [0, 1, 100, u32::MAX / 2, u32::MAX - 1, u32::MAX] {
            let mut rng = FixedRng { value };
            let result = rand01(&mut rng);
            assert!(
                (0.0..=1.0).contains(&result),
                "rand01({}) = {} is out of range [0,1]",
                value,
                result
            );
        }
    }

    #[test]
    fn rand_range_scales_into_interval() {
        let mut rng = FixedRng {
            value: u32::MAX / 2,
        };
        let v = rand_range(&mut rng, 10.0, 20.0);
        assert!((v - 15.0).abs() < 0.01);
    }

    #[test]
    fn rand_index_never_reaches_len() {
        let mut rng = FixedRng { value: u32::MAX };
        assert_eq!(rand_index(&mut rng, 7), 6);
        let mut rng = FixedRng { value: 0 };
        assert_eq!(rand_index(&mut rng, 7), 0);
    }

    #[test]
    fn rand_int_inclusive_covers_both_ends() {
        let mut low = FixedRng { value: 0 };
        let mut high = FixedRng { value: u32::MAX };
        assert_eq!(rand_int_inclusive(&mut low, 5, 95), 5);
        assert_eq!(rand_int_inclusive(&mut high, 5, 95), 95);
        assert_eq!(rand_int_inclusive(&mut high, 3, 3), 3);
    }
}
