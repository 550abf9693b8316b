#![forbid(unsafe_code)]
//! pointillism: density-adaptive Poisson disk sampling for stippled image rendering.
//!
//! Modules:
//! - field: read-only grayscale luminance fields consumed by the sampler
//! - sampling: spatial grid index, luminance-to-radius density model, adaptive Poisson disk sampler
//! - stipple: configuration, runner, events, and brightness-stratified point selection
//!
//! Decoding images and drawing dots are left to the caller; see the `pointillism_examples`
//! crate for a PNG front-end.
pub mod error;
pub mod field;
pub mod point;
pub mod sampling;
pub mod stipple;

/// Convenient re-exports for common types. Import with `use pointillism::prelude::*;`.
pub mod prelude {
    pub use crate::error::{Error, Result};
    pub use crate::field::{FnField, LuminanceField, LuminanceGrid};
    pub use crate::point::{Point, PointCloud};
    pub use crate::sampling::{
        sample_luminance, window_mean, AdaptivePoissonSampler, DensityBias, DensityModel,
        ExclusionRule, SampleWindow, SamplingStats, SpatialIndex,
    };
    pub use crate::stipple::config::StippleConfig;
    pub use crate::stipple::events::{EventSink, FnSink, SamplingEvent, VecSink};
    pub use crate::stipple::runner::{
        run_sampling, run_sampling_with_events, select_subset, select_subset_with_events,
        SamplingResult, StippleRunner,
    };
    pub use crate::stipple::selection::{pick, BrightnessOrder, Selection};
}
