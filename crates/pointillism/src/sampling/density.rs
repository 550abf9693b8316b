//! Luminance window sampling and luminance-to-radius mapping.
//!
//! [`DensityModel`] decides how far apart dots must be at a given brightness. Local brightness
//! comes from [`sample_luminance`], which averages a square or circular pixel window.
//!
//! A window that visits no pixel (for example a zero radius, or a center far outside the
//! field) does not divide by zero: it is averaged as if it held one phantom black sample, so
//! [`sample_luminance`] returns `0`. Use [`window_mean`] to detect that case.
use glam::IVec2;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::field::LuminanceField;

/// Shape of the pixel window averaged by [`sample_luminance`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SampleWindow {
    /// Every pixel of the `2r x 2r` square.
    Square,
    /// Pixels of the square with `dx² + dy² <= r²`.
    #[default]
    Circle,
}

/// Which end of the luminance range receives the densest dots.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum DensityBias {
    /// Black maps to `min_radius`, white to `max_radius`.
    #[default]
    DenseInDark,
    /// White maps to `min_radius`, black to `max_radius`.
    DenseInBright,
}

/// Maps local luminance to an exclusion radius.
#[derive(Clone, Debug, PartialEq)]
pub struct DensityModel {
    pub min_radius: f32,
    pub max_radius: f32,
    pub vary_density: bool,
    pub bias: DensityBias,
    /// Radius of the window averaged around each point.
    pub sample_radius: f32,
    pub window: SampleWindow,
}

impl DensityModel {
    /// Fixed-density model: every point gets `radius`.
    pub fn fixed(radius: f32) -> Self {
        Self {
            min_radius: radius,
            max_radius: radius,
            vary_density: false,
            bias: DensityBias::default(),
            sample_radius: radius / 2.0,
            window: SampleWindow::default(),
        }
    }

    /// Variable-density model interpolating between `min_radius` and `max_radius`.
    pub fn varying(min_radius: f32, max_radius: f32, bias: DensityBias) -> Self {
        Self {
            min_radius,
            max_radius,
            vary_density: true,
            bias,
            sample_radius: max_radius / 2.0,
            window: SampleWindow::default(),
        }
    }

    pub fn with_sample_radius(mut self, sample_radius: f32) -> Self {
        self.sample_radius = sample_radius;
        self
    }

    pub fn with_window(mut self, window: SampleWindow) -> Self {
        self.window = window;
        self
    }

    /// Exclusion radius for a point whose local luminance is `luminance`.
    pub fn radius_for(&self, luminance: u8) -> f32 {
        if !self.vary_density {
            return self.max_radius;
        }

        let t = luminance as f32 / 255.0;
        let span = self.max_radius - self.min_radius;
        match self.bias {
            DensityBias::DenseInDark => self.min_radius + span * t,
            DensityBias::DenseInBright => self.max_radius - span * t,
        }
    }

    /// Local luminance around `center` using this model's window.
    pub fn luminance_at<F>(&self, field: &F, center: IVec2) -> u8
    where
        F: LuminanceField + ?Sized,
    {
        sample_luminance(field, center, self.sample_radius, self.window)
    }

    /// Local luminance and the resulting exclusion radius at `center`.
    pub fn evaluate<F>(&self, field: &F, center: IVec2) -> (u8, f32)
    where
        F: LuminanceField + ?Sized,
    {
        let luminance = self.luminance_at(field, center);
        (luminance, self.radius_for(luminance))
    }
}

/// Mean luminance of the window around `center`, or `None` if it covers no pixel.
///
/// The window spans `[c - r, c + r)` on both axes with `r = ceil(radius)`, clipped to the
/// field. Radii beyond the field's larger side cover the same pixels as that side, so `r` is
/// capped there. The mean is truncated to an integer.
pub fn window_mean<F>(field: &F, center: IVec2, radius: f32, window: SampleWindow) -> Option<u8>
where
    F: LuminanceField + ?Sized,
{
    if !radius.is_finite() || radius <= 0.0 {
        return None;
    }

    let width = field.width().min(i32::MAX as u32) as i32;
    let height = field.height().min(i32::MAX as u32) as i32;
    let r = radius.min(width.max(height) as f32).ceil() as i32;
    let r_squared = radius * radius;
    let x0 = center.x.saturating_sub(r).max(0);
    let y0 = center.y.saturating_sub(r).max(0);
    let x1 = center.x.saturating_add(r).min(width);
    let y1 = center.y.saturating_add(r).min(height);

    let mut total = 0u64;
    let mut count = 0u64;
    for y in y0..y1 {
        for x in x0..x1 {
            if window == SampleWindow::Circle {
                let dx = (x - center.x) as f32;
                let dy = (y - center.y) as f32;
                if dx * dx + dy * dy > r_squared {
                    continue;
                }
            }
            total += field.luminance(x as u32, y as u32) as u64;
            count += 1;
        }
    }

    if count == 0 {
        None
    } else {
        Some((total / count) as u8)
    }
}

/// Mean luminance of the window around `center`, falling back to `0` for empty windows.
pub fn sample_luminance<F>(field: &F, center: IVec2, radius: f32, window: SampleWindow) -> u8
where
    F: LuminanceField + ?Sized,
{
    match window_mean(field, center, radius, window) {
        Some(mean) => mean,
        None => {
            debug!(
                "Luminance window at ({}, {}) with radius {} covers no pixel; using 0.",
                center.x, center.y, radius
            );
            0
        }
    }
}
