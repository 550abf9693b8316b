//! PNG front-end for the stippler: image loading, tracing setup, and dot rasterization.
use std::path::Path;

use anyhow::Context;
use image::{GrayImage, Luma};
use pointillism::prelude::{LuminanceGrid, Point};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber honoring `RUST_LOG` (default `info`).
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Decodes `path` and converts it to an 8-bit luminance grid.
pub fn load_luminance(path: impl AsRef<Path>) -> anyhow::Result<LuminanceGrid> {
    let path = path.as_ref();
    let gray = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .to_luma8();
    let (width, height) = gray.dimensions();
    info!("Loaded {} ({}x{}).", path.display(), width, height);
    Ok(LuminanceGrid::from_raw(width, height, gray.into_raw())?)
}

/// Radius of each drawn dot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DotSize {
    /// Every dot has the same radius in pixels.
    Fixed(f32),
    /// Dot radius is the point's exclusion radius times this factor.
    Scaled(f32),
}

impl DotSize {
    fn radius_for(&self, point: &Point) -> f32 {
        match *self {
            DotSize::Fixed(r) => r,
            DotSize::Scaled(factor) => point.radius * factor,
        }
    }
}

/// Intensity of each drawn dot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DotShade {
    /// The point's sampled luminance.
    Luminance,
    /// One intensity for every dot.
    Solid(u8),
}

#[derive(Clone, Debug)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub background: u8,
    pub dot_size: DotSize,
    pub shade: DotShade,
}

impl RenderConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            background: 0,
            dot_size: DotSize::Scaled(0.5),
            shade: DotShade::Luminance,
        }
    }

    pub fn with_background(mut self, background: u8) -> Self {
        self.background = background;
        self
    }

    pub fn with_dot_size(mut self, dot_size: DotSize) -> Self {
        self.dot_size = dot_size;
        self
    }

    pub fn with_shade(mut self, shade: DotShade) -> Self {
        self.shade = shade;
        self
    }
}

fn fill_circle(img: &mut GrayImage, cx: i32, cy: i32, radius: f32, value: u8) {
    if radius <= 0.0 {
        return;
    }
    let r = radius.ceil() as i32;
    let r_squared = radius * radius;
    let (w, h) = (img.width() as i32, img.height() as i32);
    for y in (cy - r).max(0)..=(cy + r).min(h - 1) {
        for x in (cx - r).max(0)..=(cx + r).min(w - 1) {
            let dx = (x - cx) as f32;
            let dy = (y - cy) as f32;
            if dx * dx + dy * dy <= r_squared {
                img.put_pixel(x as u32, y as u32, Luma([value]));
            }
        }
    }
}

/// Draws every point as a filled circle, in slice order.
pub fn render_points(points: &[Point], config: &RenderConfig) -> GrayImage {
    let mut img = GrayImage::from_pixel(config.width, config.height, Luma([config.background]));
    for p in points {
        let value = match config.shade {
            DotShade::Luminance => p.luminance.unwrap_or(0),
            DotShade::Solid(v) => v,
        };
        fill_circle(&mut img, p.x, p.y, config.dot_size.radius_for(p), value);
    }
    img
}

pub fn render_points_to_png(
    points: &[Point],
    config: &RenderConfig,
    path: impl AsRef<Path>,
) -> anyhow::Result<()> {
    let path = path.as_ref();
    render_points(points, config)
        .save(path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    info!("Wrote {} dots to {}.", points.len(), path.display());
    Ok(())
}
