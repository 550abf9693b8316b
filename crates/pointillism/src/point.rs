//! Accepted dots and the read-only point cloud returned by a sampling run.
use std::ops::Deref;
use std::sync::Arc;

use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A dot accepted by the sampler.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    /// Pixel column.
    pub x: i32,
    /// Pixel row.
    pub y: i32,
    /// Exclusion radius in effect when the point was accepted.
    pub radius: f32,
    /// Local mean luminance, once computed.
    pub luminance: Option<u8>,
}

impl Point {
    pub fn new(x: i32, y: i32, radius: f32) -> Self {
        Self {
            x,
            y,
            radius,
            luminance: None,
        }
    }

    pub fn with_luminance(mut self, luminance: u8) -> Self {
        self.luminance = Some(luminance);
        self
    }

    #[inline]
    pub fn position(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Squared pixel distance to `other`.
    #[inline]
    pub fn distance_squared(&self, other: &Point) -> f32 {
        let dx = (self.x - other.x) as f32;
        let dy = (self.y - other.y) as f32;
        dx * dx + dy * dy
    }
}

impl From<Point> for mint::Point2<f32> {
    fn from(p: Point) -> Self {
        mint::Point2 {
            x: p.x as f32,
            y: p.y as f32,
        }
    }
}

impl From<Point> for mint::Point2<i32> {
    fn from(p: Point) -> Self {
        mint::Point2 { x: p.x, y: p.y }
    }
}

/// Shared, read-only sequence of points in acceptance order (seed first).
///
/// Cloning is cheap. Call [`PointCloud::to_vec`] for an owned, mutable copy.
#[derive(Clone, Debug, PartialEq)]
pub struct PointCloud {
    points: Arc<[Point]>,
}

impl PointCloud {
    pub fn new(points: Vec<Point>) -> Self {
        Self {
            points: points.into(),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn as_slice(&self) -> &[Point] {
        &self.points
    }

    /// Returns `true` if both clouds share the same allocation.
    pub fn ptr_eq(&self, other: &PointCloud) -> bool {
        Arc::ptr_eq(&self.points, &other.points)
    }
}

impl Default for PointCloud {
    fn default() -> Self {
        Self::empty()
    }
}

impl Deref for PointCloud {
    type Target = [Point];

    fn deref(&self) -> &Self::Target {
        &self.points
    }
}

impl From<Vec<Point>> for PointCloud {
    fn from(points: Vec<Point>) -> Self {
        Self::new(points)
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point;
    type IntoIter = std::slice::Iter<'a, Point>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}
