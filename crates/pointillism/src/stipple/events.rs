//! Event types and sinks for observing sampling runs.
//!
//! This module defines [`SamplingEvent`] and a set of sinks to emit, collect, or forward
//! events while executing [`crate::stipple::runner::run_sampling_with_events`] or
//! [`crate::stipple::runner::StippleRunner::run_with_events`].
use crate::point::Point;
use crate::sampling::SamplingStats;
use crate::stipple::config::StippleConfig;

/// Describes events emitted by a sampling run.
#[non_exhaustive]
#[derive(Debug, Clone)]
pub enum SamplingEvent {
    /// Emitted after validation, before the seed is placed.
    RunStarted {
        /// The configuration used.
        config: StippleConfig,
        /// Field width in pixels.
        width: u32,
        /// Field height in pixels.
        height: u32,
    },

    /// Emitted for every accepted point, including the seed.
    PointAccepted {
        /// Index of the point in the output cloud.
        index: usize,
        /// Index of the active point that spawned it; `None` for the seed.
        parent: Option<usize>,
        /// The accepted point.
        point: Point,
    },

    /// Emitted when a point leaves the active set.
    PointExhausted {
        /// Index of the retired point.
        index: usize,
        /// Points still active afterwards.
        remaining_active: usize,
    },

    /// Emitted once the active set is empty.
    RunFinished {
        /// Number of points produced.
        point_count: usize,
        /// Counters for the run.
        stats: SamplingStats,
    },

    /// Non-fatal warning generated during a run or a selection.
    Warning {
        /// Context string (e.g. operation name).
        context: String,
        /// Human-readable message.
        message: String,
    },
}

/// A generic event sink that accepts [`SamplingEvent`]s.
pub trait EventSink {
    fn send(&mut self, event: SamplingEvent);
}

/// A no-op event sink.
impl EventSink for () {
    #[inline]
    fn send(&mut self, _event: SamplingEvent) {}
}

/// An event sink that forwards to a user-provided closure.
pub struct FnSink<F>
where
    F: FnMut(SamplingEvent),
{
    f: F,
}

impl<F> FnSink<F>
where
    F: FnMut(SamplingEvent),
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> EventSink for FnSink<F>
where
    F: FnMut(SamplingEvent),
{
    #[inline]
    fn send(&mut self, event: SamplingEvent) {
        (self.f)(event);
    }
}

/// An event sink that collects all events in a `Vec`.
#[derive(Default)]
pub struct VecSink {
    events: Vec<SamplingEvent>,
}

impl VecSink {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn with_capacity(cap: usize) -> Self {
        Self {
            events: Vec::with_capacity(cap),
        }
    }

    pub fn into_inner(self) -> Vec<SamplingEvent> {
        self.events
    }

    pub fn as_slice(&self) -> &[SamplingEvent] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for VecSink {
    #[inline]
    fn send(&mut self, event: SamplingEvent) {
        self.events.push(event);
    }
}
