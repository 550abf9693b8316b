//! High-level entry points for sampling a luminance field and subsetting the result.
use rand::RngCore;
use tracing::{debug, info};

use crate::error::Result;
use crate::field::LuminanceField;
use crate::point::PointCloud;
use crate::sampling::poisson_disk::{AdaptivePoissonSampler, SamplerStep};
use crate::sampling::SamplingStats;
use crate::stipple::config::StippleConfig;
use crate::stipple::events::{EventSink, SamplingEvent};
use crate::stipple::selection::{pick, BrightnessOrder, Selection};

/// Result of a sampling run.
#[non_exhaustive]
#[derive(Debug, Clone, Default)]
pub struct SamplingResult {
    /// Accepted points in acceptance order, seed first.
    pub points: PointCloud,
    /// Counters for the run.
    pub stats: SamplingStats,
}

/// Samples `field` with `config`, returning the point cloud.
///
/// Fails with [`crate::error::Error::InvalidConfig`] before any sampling if the
/// configuration or the field dimensions are invalid.
pub fn run_sampling<F, R>(config: &StippleConfig, field: &F, rng: &mut R) -> Result<SamplingResult>
where
    F: LuminanceField + ?Sized,
    R: RngCore,
{
    run_sampling_internal(config, field, rng, None)
}

pub fn run_sampling_with_events<F, R>(
    config: &StippleConfig,
    field: &F,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Result<SamplingResult>
where
    F: LuminanceField + ?Sized,
    R: RngCore,
{
    run_sampling_internal(config, field, rng, Some(sink))
}

fn run_sampling_internal<F, R>(
    config: &StippleConfig,
    field: &F,
    rng: &mut R,
    mut sink: Option<&mut dyn EventSink>,
) -> Result<SamplingResult>
where
    F: LuminanceField + ?Sized,
    R: RngCore,
{
    config.validate_for(field.width(), field.height())?;

    if let Some(s) = sink.as_deref_mut() {
        s.send(SamplingEvent::RunStarted {
            config: config.clone(),
            width: field.width(),
            height: field.height(),
        });
    }

    let mut sampler = AdaptivePoissonSampler::new(
        field,
        config.density_model(),
        config.exclusion_rule,
        config.sample_limit,
        config.draw_radius,
    );

    let seed = sampler.seed(rng);
    let seed_point = sampler.points()[seed];
    debug!(
        "Seeded sampling at ({}, {}) with radius {}.",
        seed_point.x, seed_point.y, seed_point.radius
    );
    if let Some(s) = sink.as_deref_mut() {
        s.send(SamplingEvent::PointAccepted {
            index: seed,
            parent: None,
            point: seed_point,
        });
    }

    while let Some(step) = sampler.step(rng) {
        let Some(s) = sink.as_deref_mut() else {
            continue;
        };
        match step {
            SamplerStep::Accepted { index, parent } => s.send(SamplingEvent::PointAccepted {
                index,
                parent: Some(parent),
                point: sampler.points()[index],
            }),
            SamplerStep::Exhausted { index } => s.send(SamplingEvent::PointExhausted {
                index,
                remaining_active: sampler.active_len(),
            }),
        }
    }

    let (points, stats) = sampler.into_parts();
    info!(
        "Sampling finished: {} points, {} candidates ({} out of bounds, {} too close).",
        points.len(),
        stats.candidates,
        stats.rejected_out_of_bounds,
        stats.rejected_too_close
    );
    if let Some(s) = sink.as_deref_mut() {
        s.send(SamplingEvent::RunFinished {
            point_count: points.len(),
            stats,
        });
    }

    Ok(SamplingResult {
        points: PointCloud::new(points),
        stats,
    })
}

/// Picks `n` points biased toward one end of the luminance range.
///
/// See [`crate::stipple::selection::pick`].
pub fn select_subset<R: RngCore>(
    points: &PointCloud,
    n: usize,
    order: BrightnessOrder,
    rng: &mut R,
) -> Selection {
    pick(points, n, order, rng)
}

/// Like [`select_subset`], reporting a shortfall to `sink` as a warning event.
pub fn select_subset_with_events<R: RngCore>(
    points: &PointCloud,
    n: usize,
    order: BrightnessOrder,
    rng: &mut R,
    sink: &mut dyn EventSink,
) -> Selection {
    let selection = pick(points, n, order, rng);
    if let Some(missing) = selection.shortfall() {
        sink.send(SamplingEvent::Warning {
            context: "select_subset".into(),
            message: format!(
                "requested {} points, {} available, {} short",
                n,
                selection.len(),
                missing
            ),
        });
    }
    selection
}

/// Binds a validated configuration to a luminance field.
pub struct StippleRunner<'a, F>
where
    F: LuminanceField + ?Sized,
{
    /// Configuration applied to every run.
    pub config: StippleConfig,
    /// Field sampled by this runner.
    pub field: &'a F,
}

impl<'a, F> StippleRunner<'a, F>
where
    F: LuminanceField + ?Sized,
{
    pub fn try_new(config: StippleConfig, field: &'a F) -> Result<Self> {
        config.validate_for(field.width(), field.height())?;
        Ok(Self { config, field })
    }

    pub fn new(config: StippleConfig, field: &'a F) -> Self {
        debug_assert!(
            config.validate_for(field.width(), field.height()).is_ok(),
            "invalid configuration for a {}x{} field",
            field.width(),
            field.height()
        );

        Self { config, field }
    }

    /// Runs the sampler, returning the result.
    pub fn run(&self, rng: &mut impl RngCore) -> Result<SamplingResult> {
        run_sampling(&self.config, self.field, rng)
    }

    pub fn run_with_events(
        &self,
        rng: &mut impl RngCore,
        sink: &mut dyn EventSink,
    ) -> Result<SamplingResult> {
        run_sampling_with_events(&self.config, self.field, rng, sink)
    }

    /// Runs the sampler and keeps at most `n` points, drained from `order`'s end.
    pub fn run_and_select(
        &self,
        n: usize,
        order: BrightnessOrder,
        rng: &mut impl RngCore,
    ) -> Result<(SamplingResult, Selection)> {
        let result = self.run(rng)?;
        let selection = select_subset(&result.points, n, order, rng);
        Ok((result, selection))
    }
}
