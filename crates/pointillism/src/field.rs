//! Luminance fields consumed by the sampler.
//!
//! This module defines how decoded grayscale images integrate into sampling:
//! - Implement [`LuminanceField`] for your own pixel source.
//! - Use [`LuminanceGrid`] for an owned row-major buffer.
//! - Use [`FnField`] for procedural fields (gradients, test patterns).
use crate::error::{Error, Result};

/// Read-only grayscale pixel accessor with known dimensions.
///
/// `luminance` is only called with `x < width()` and `y < height()`.
pub trait LuminanceField {
    fn width(&self) -> u32;
    fn height(&self) -> u32;
    fn luminance(&self, x: u32, y: u32) -> u8;
}

impl<T: LuminanceField + ?Sized> LuminanceField for &T {
    #[inline]
    fn width(&self) -> u32 {
        (**self).width()
    }

    #[inline]
    fn height(&self) -> u32 {
        (**self).height()
    }

    #[inline]
    fn luminance(&self, x: u32, y: u32) -> u8 {
        (**self).luminance(x, y)
    }
}

/// Owned row-major luminance buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LuminanceGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl LuminanceGrid {
    /// Wraps `data` (row-major, `width * height` bytes).
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(Error::InvalidConfig(format!(
                "luminance buffer has {} bytes, expected {}x{} = {}",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Creates a field with every pixel set to `value`.
    pub fn filled(width: u32, height: u32, value: u8) -> Self {
        Self {
            width,
            height,
            data: vec![value; width as usize * height as usize],
        }
    }

    /// Builds a grid by evaluating `f` at every pixel.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> u8,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    pub fn into_raw(self) -> Vec<u8> {
        self.data
    }
}

impl LuminanceField for LuminanceGrid {
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn luminance(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }
}

/// Procedural field backed by a closure.
pub struct FnField<F>
where
    F: Fn(u32, u32) -> u8,
{
    width: u32,
    height: u32,
    f: F,
}

impl<F> FnField<F>
where
    F: Fn(u32, u32) -> u8,
{
    pub fn new(width: u32, height: u32, f: F) -> Self {
        Self { width, height, f }
    }
}

impl<F> LuminanceField for FnField<F>
where
    F: Fn(u32, u32) -> u8,
{
    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn luminance(&self, x: u32, y: u32) -> u8 {
        (self.f)(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_raw_rejects_wrong_length() {
        let err = LuminanceGrid::from_raw(4, 4, vec![0; 15]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn grid_is_row_major() {
        let grid = LuminanceGrid::from_raw(3, 2, vec![0, 1, 2, 3, 4, 5]).unwrap();
        assert_eq!(grid.luminance(2, 0), 2);
        assert_eq!(grid.luminance(0, 1), 3);
        assert_eq!(grid.luminance(2, 1), 5);
    }

    #[test]
    fn from_fn_matches_closure() {
        let grid = LuminanceGrid::from_fn(8, 4, |x, y| (x * 10 + y) as u8);
        assert_eq!(grid.luminance(7, 3), 73);
        assert_eq!(grid.as_raw().len(), 32);
    }

    #[test]
    fn fn_field_evaluates_lazily() {
        let field = FnField::new(256, 1, |x, _| x as u8);
        assert_eq!(field.width(), 256);
        assert_eq!(field.luminance(200, 0), 200);
    }
}
