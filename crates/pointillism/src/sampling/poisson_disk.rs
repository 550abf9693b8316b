//! Density-adaptive Poisson disk sampler.
//!
//! The sampler grows a point cloud from one random seed. Each step picks an active point
//! uniformly at random and tries up to `sample_limit` candidates in the annulus
//! `[radius, 2 * radius)` around it. The first candidate that stays inside the draw bounds
//! and clears every neighbor's exclusion radius is accepted. A point whose attempts all fail
//! leaves the active set for good. The run ends when the active set is empty.
use std::f32::consts::TAU;

use glam::{IVec2, Vec2};
use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::field::LuminanceField;
use crate::point::Point;
use crate::sampling::density::DensityModel;
use crate::sampling::spatial_index::SpatialIndex;
use crate::sampling::{rand_index, rand_int_inclusive, rand_range};

/// How two exclusion radii combine into the minimum distance between their points.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ExclusionRule {
    /// The smaller radius applies. Dots in dense regions may sit close to sparse neighbors.
    Min,
    /// The larger radius applies. Sparser, never lets a dense dot intrude on a sparse one.
    #[default]
    Max,
}

impl ExclusionRule {
    #[inline]
    pub fn threshold(self, a: f32, b: f32) -> f32 {
        match self {
            ExclusionRule::Min => a.min(b),
            ExclusionRule::Max => a.max(b),
        }
    }

    /// Returns `true` if points `a` and `b` are closer than this rule allows.
    #[inline]
    pub fn violates(self, a: &Point, b: &Point) -> bool {
        let t = self.threshold(a.radius, b.radius);
        a.distance_squared(b) < t * t
    }
}

/// Counters collected during one run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SamplingStats {
    /// Candidates generated around active points.
    pub candidates: usize,
    /// Candidates outside the draw bounds.
    pub rejected_out_of_bounds: usize,
    /// Candidates within a neighbor's exclusion radius.
    pub rejected_too_close: usize,
    /// Points removed from the active set.
    pub exhausted: usize,
}

/// Outcome of one [`AdaptivePoissonSampler::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SamplerStep {
    /// A candidate spawned by `parent` was accepted at `index`.
    Accepted { index: usize, parent: usize },
    /// Every attempt around `index` failed; it left the active set.
    Exhausted { index: usize },
}

/// State of one sampling run over a luminance field.
pub struct AdaptivePoissonSampler<'a, F>
where
    F: LuminanceField + ?Sized,
{
    field: &'a F,
    model: DensityModel,
    rule: ExclusionRule,
    sample_limit: u32,
    min_corner: IVec2,
    max_corner: IVec2,
    index: SpatialIndex,
    points: Vec<Point>,
    active: Vec<usize>,
    stats: SamplingStats,
}

impl<'a, F> AdaptivePoissonSampler<'a, F>
where
    F: LuminanceField + ?Sized,
{
    /// Creates a sampler keeping points inside `[draw_radius, dim - draw_radius]`.
    ///
    /// Parameters are expected to be validated already, see
    /// [`crate::stipple::config::StippleConfig::validate_for`].
    pub fn new(
        field: &'a F,
        model: DensityModel,
        rule: ExclusionRule,
        sample_limit: u32,
        draw_radius: u32,
    ) -> Self {
        debug_assert!(model.max_radius > 0.0, "max_radius must be > 0");
        debug_assert!(sample_limit > 0, "sample_limit must be > 0");
        debug_assert!(
            field.width() >= 2 * draw_radius && field.height() >= 2 * draw_radius,
            "field must be at least 2 * draw_radius on both axes"
        );

        let margin = draw_radius as i32;
        let index = SpatialIndex::new(field.width(), field.height(), model.max_radius);
        Self {
            field,
            model,
            rule,
            sample_limit,
            min_corner: IVec2::splat(margin),
            max_corner: IVec2::new(field.width() as i32 - margin, field.height() as i32 - margin),
            index,
            points: Vec::new(),
            active: Vec::new(),
            stats: SamplingStats::default(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Number of points still spawning candidates.
    pub fn active_len(&self) -> usize {
        self.active.len()
    }

    pub fn stats(&self) -> SamplingStats {
        self.stats
    }

    pub fn spatial_index(&self) -> &SpatialIndex {
        &self.index
    }

    #[inline]
    fn in_bounds(&self, c: IVec2) -> bool {
        c.cmpge(self.min_corner).all() && c.cmple(self.max_corner).all()
    }

    /// Returns `true` if no indexed point lies within the exclusion distance of `candidate`.
    fn is_clear(&self, candidate: &Point) -> bool {
        self.index
            .neighbors_near(candidate.x, candidate.y)
            .all(|i| !self.rule.violates(candidate, &self.points[i]))
    }

    /// Builds the candidate point at `c`, evaluating luminance first when density varies.
    fn make_candidate(&self, c: IVec2) -> Point {
        if self.model.vary_density {
            let (luminance, radius) = self.model.evaluate(self.field, c);
            Point::new(c.x, c.y, radius).with_luminance(luminance)
        } else {
            Point::new(c.x, c.y, self.model.max_radius)
        }
    }

    fn add_point(&mut self, mut point: Point) -> usize {
        if point.luminance.is_none() {
            point.luminance = Some(self.model.luminance_at(self.field, point.position()));
        }
        let index = self.points.len();
        self.index.insert(index, point.x, point.y);
        self.points.push(point);
        self.active.push(index);
        index
    }

    /// Places the initial point uniformly inside the draw bounds. Returns its index.
    pub fn seed(&mut self, rng: &mut dyn RngCore) -> usize {
        let c = IVec2::new(
            rand_int_inclusive(rng, self.min_corner.x, self.max_corner.x),
            rand_int_inclusive(rng, self.min_corner.y, self.max_corner.y),
        );
        let point = self.make_candidate(c);
        self.add_point(point)
    }

    fn candidate_near(&mut self, rng: &mut dyn RngCore, spawn: Point) -> Option<Point> {
        let origin = Vec2::new(spawn.x as f32, spawn.y as f32);
        for _ in 0..self.sample_limit {
            let angle = rand_range(rng, 0.0, TAU);
            let distance = rand_range(rng, spawn.radius, 2.0 * spawn.radius);
            let offset = Vec2::from_angle(angle) * distance;
            let c = (origin + offset).as_ivec2();
            self.stats.candidates += 1;

            if !self.in_bounds(c) {
                self.stats.rejected_out_of_bounds += 1;
                continue;
            }

            let candidate = self.make_candidate(c);
            if self.is_clear(&candidate) {
                return Some(candidate);
            }
            self.stats.rejected_too_close += 1;
        }

        None
    }

    /// Runs one frontier step. Returns `None` once the active set is empty.
    pub fn step(&mut self, rng: &mut dyn RngCore) -> Option<SamplerStep> {
        if self.active.is_empty() {
            return None;
        }

        let slot = rand_index(rng, self.active.len());
        let parent = self.active[slot];
        let spawn = self.points[parent];

        match self.candidate_near(rng, spawn) {
            Some(candidate) => {
                let index = self.add_point(candidate);
                Some(SamplerStep::Accepted { index, parent })
            }
            None => {
                self.active.swap_remove(slot);
                self.stats.exhausted += 1;
                Some(SamplerStep::Exhausted { index: parent })
            }
        }
    }

    /// Seeds (if needed) and steps until the active set is empty.
    pub fn run(&mut self, rng: &mut dyn RngCore) {
        if self.points.is_empty() {
            self.seed(rng);
        }
        while self.step(rng).is_some() {}
    }

    /// Consumes the sampler, returning points in acceptance order and the run counters.
    pub fn into_parts(self) -> (Vec<Point>, SamplingStats) {
        (self.points, self.stats)
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::field::{FnField, LuminanceGrid};
    use crate::sampling::density::DensityBias;

    fn sample_fixed(seed: u64) -> Vec<Point> {
        let field = LuminanceGrid::filled(100, 100, 128);
        let mut sampler =
            AdaptivePoissonSampler::new(&field, DensityModel::fixed(10.0), ExclusionRule::Max, 100, 5);
        let mut rng = StdRng::seed_from_u64(seed);
        sampler.run(&mut rng);
        sampler.into_parts().0
    }

    fn assert_no_overlap(points: &[Point], rule: ExclusionRule) {
        for i in 0..points.len() {
            for j in (i + 1)..points.len() {
                assert!(
                    !rule.violates(&points[i], &points[j]),
                    "{:?} and {:?} violate {:?}",
                    points[i],
                    points[j],
                    rule
                );
            }
        }
    }

    #[test]
    fn exclusion_rule_thresholds() {
        assert_eq!(ExclusionRule::Min.threshold(3.0, 5.0), 3.0);
        assert_eq!(ExclusionRule::Max.threshold(3.0, 5.0), 5.0);

        let a = Point::new(0, 0, 3.0);
        let b = Point::new(4, 0, 5.0);
        assert!(!ExclusionRule::Min.violates(&a, &b));
        assert!(ExclusionRule::Max.violates(&a, &b));
    }

    #[test]
    fn flat_field_respects_radius_and_bounds() {
        let points = sample_fixed(123);

        assert!(
            (55..=75).contains(&points.len()),
            "unexpected point count {}",
            points.len()
        );
        for p in &points {
            assert!((5..=95).contains(&p.x) && (5..=95).contains(&p.y), "{:?}", p);
            assert_eq!(p.radius, 10.0);
            assert_eq!(p.luminance, Some(128));
        }
        assert_no_overlap(&points, ExclusionRule::Max);
    }

    #[test]
    fn same_seed_replays_identically() {
        assert_eq!(sample_fixed(7), sample_fixed(7));
    }

    #[test]
    fn seed_is_first_point_and_inside_bounds() {
        let field = LuminanceGrid::filled(40, 30, 0);
        let mut sampler =
            AdaptivePoissonSampler::new(&field, DensityModel::fixed(4.0), ExclusionRule::Max, 10, 8);
        let mut rng = StdRng::seed_from_u64(99);
        let first = sampler.seed(&mut rng);
        assert_eq!(first, 0);
        let p = sampler.points()[0];
        assert!((8..=32).contains(&p.x));
        assert!((8..=22).contains(&p.y));
        assert_eq!(sampler.active_len(), 1);
        assert_eq!(sampler.spatial_index().len(), 1);
    }

    #[test]
    fn exhausted_points_stay_in_point_list() {
        // Bounds collapse to a single pixel: the seed can never spawn a neighbor.
        let field = LuminanceGrid::filled(10, 10, 50);
        let mut sampler =
            AdaptivePoissonSampler::new(&field, DensityModel::fixed(3.0), ExclusionRule::Max, 5, 5);
        let mut rng = StdRng::seed_from_u64(1);
        sampler.seed(&mut rng);

        assert_eq!(sampler.step(&mut rng), Some(SamplerStep::Exhausted { index: 0 }));
        assert_eq!(sampler.step(&mut rng), None);
        assert_eq!(sampler.points().len(), 1);
        assert_eq!(sampler.points()[0].position(), IVec2::new(5, 5));

        let stats = sampler.stats();
        assert_eq!(stats.candidates, 5);
        assert_eq!(stats.rejected_out_of_bounds, 5);
        assert_eq!(stats.exhausted, 1);
    }

    #[test]
    fn varying_density_respects_both_rules() {
        let field = FnField::new(120, 120, |x, _| ((x * 255) / 119) as u8);
        for rule in [ExclusionRule::Min, ExclusionRule::Max] {
            let model = DensityModel::varying(3.0, 9.0, DensityBias::DenseInDark);
            let mut sampler = AdaptivePoissonSampler::new(&field, model, rule, 30, 2);
            let mut rng = StdRng::seed_from_u64(2024);
            sampler.run(&mut rng);
            let (points, stats) = sampler.into_parts();

            assert!(points.len() > 50);
            assert_eq!(stats.exhausted, points.len());
            for p in &points {
                assert!(p.radius >= 3.0 && p.radius <= 9.0);
            }
            assert_no_overlap(&points, rule);
        }
    }

    #[test]
    fn dark_side_is_denser_on_gradient() {
        let field = FnField::new(200, 100, |x, _| ((x * 255) / 199) as u8);
        let model = DensityModel::varying(2.0, 10.0, DensityBias::DenseInDark);
        let mut sampler = AdaptivePoissonSampler::new(&field, model, ExclusionRule::Max, 30, 0);
        let mut rng = StdRng::seed_from_u64(5);
        sampler.run(&mut rng);
        let points = sampler.into_parts().0;

        let mut bands = [0usize; 4];
        for p in &points {
            bands[(p.x as usize * 4 / 201).min(3)] += 1;
        }
        assert!(
            bands.windows(2).all(|w| w[0] > w[1]),
            "density is not decreasing with brightness: {:?}",
            bands
        );
    }

    #[test]
    fn bright_bias_flips_density() {
        let field = FnField::new(200, 100, |x, _| ((x * 255) / 199) as u8);
        let model = DensityModel::varying(2.0, 10.0, DensityBias::DenseInBright);
        let mut sampler = AdaptivePoissonSampler::new(&field, model, ExclusionRule::Max, 30, 0);
        let mut rng = StdRng::seed_from_u64(5);
        sampler.run(&mut rng);
        let points = sampler.into_parts().0;

        let left = points.iter().filter(|p| p.x < 100).count();
        let right = points.len() - left;
        assert!(right > left, "left {} right {}", left, right);
    }
}
