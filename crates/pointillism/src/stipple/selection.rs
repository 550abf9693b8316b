//! Brightness-stratified subsetting of a point cloud.
//!
//! [`pick`] buckets points by luminance and drains the buckets from one end of the range,
//! drawing uniformly at random inside each bucket. The result is biased toward the chosen
//! extreme but not deterministic within a luminance level.
//!
//! Asking for more points than exist is not an error: the [`Selection`] holds every point
//! and reports the gap through [`Selection::shortfall`]. Callers that need more dots can
//! rerun sampling with smaller radii.
use std::fmt;
use std::str::FromStr;

use rand::RngCore;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::Error;
use crate::point::Point;
use crate::sampling::rand_index;

/// Which end of the luminance range is drained first.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BrightnessOrder {
    /// Luminance 255 first.
    #[default]
    BrightFirst,
    /// Luminance 0 first.
    DarkFirst,
}

impl BrightnessOrder {
    pub fn favor_bright(favor_bright: bool) -> Self {
        if favor_bright {
            BrightnessOrder::BrightFirst
        } else {
            BrightnessOrder::DarkFirst
        }
    }
}

impl FromStr for BrightnessOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bright" | "bright_first" => Ok(BrightnessOrder::BrightFirst),
            "dark" | "dark_first" => Ok(BrightnessOrder::DarkFirst),
            _ => Err(Error::InvalidConfigValue {
                key: "order".into(),
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for BrightnessOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrightnessOrder::BrightFirst => f.write_str("bright"),
            BrightnessOrder::DarkFirst => f.write_str("dark"),
        }
    }
}

/// Points chosen by [`pick`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Selection {
    points: Vec<Point>,
    requested: usize,
}

impl Selection {
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of points asked for.
    pub fn requested(&self) -> usize {
        self.requested
    }

    /// How many requested points were unavailable, if any.
    pub fn shortfall(&self) -> Option<usize> {
        self.requested
            .checked_sub(self.points.len())
            .filter(|&missing| missing > 0)
    }

    pub fn is_complete(&self) -> bool {
        self.shortfall().is_none()
    }
}

/// Picks `min(n, points.len())` points, draining luminance buckets in `order`.
///
/// Points without a computed luminance are bucketed as `0`.
pub fn pick<R: RngCore>(points: &[Point], n: usize, order: BrightnessOrder, rng: &mut R) -> Selection {
    let mut buckets: Vec<Vec<usize>> = vec![Vec::new(); 256];
    for (i, p) in points.iter().enumerate() {
        buckets[p.luminance.unwrap_or(0) as usize].push(i);
    }

    let target = n.min(points.len());
    let mut chosen = Vec::with_capacity(target);
    let mut drain = |bucket: &mut Vec<usize>, chosen: &mut Vec<Point>| {
        while !bucket.is_empty() && chosen.len() < target {
            let slot = rand_index(rng, bucket.len());
            chosen.push(points[bucket.swap_remove(slot)]);
        }
    };

    match order {
        BrightnessOrder::BrightFirst => {
            for bucket in buckets.iter_mut().rev() {
                drain(bucket, &mut chosen);
            }
        }
        BrightnessOrder::DarkFirst => {
            for bucket in buckets.iter_mut() {
                drain(bucket, &mut chosen);
            }
        }
    }

    let selection = Selection {
        points: chosen,
        requested: n,
    };
    if let Some(missing) = selection.shortfall() {
        warn!(
            "Requested {} points but only {} are available ({} short); consider smaller radii.",
            n,
            points.len(),
            missing
        );
    }
    selection
}
