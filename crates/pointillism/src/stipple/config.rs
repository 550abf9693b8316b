//! Typed configuration for one stippling run.
//!
//! [`StippleConfig`] is built once (builder methods or [`StippleConfig::set`]), validated, and
//! then only read. Text front-ends such as interactive menus or `key=value` CLI flags go
//! through the explicit lookup table behind [`StippleConfig::set`] and
//! [`StippleConfig::get`]; [`StippleConfig::KEYS`] lists the accepted keys in display order.
use std::fmt;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::sampling::{DensityBias, DensityModel, ExclusionRule, SampleWindow};

pub const DEFAULT_MAX_RADIUS: f32 = 10.0;
pub const DEFAULT_MIN_RADIUS: f32 = 4.0;
pub const DEFAULT_SAMPLE_LIMIT: u32 = 200;
pub const DEFAULT_DRAW_RADIUS: u32 = 50;

/// Parameters of a sampling run.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub struct StippleConfig {
    /// Exclusion radius in the sparsest region, and the radius used when density is fixed.
    pub max_radius: f32,
    /// Exclusion radius in the densest region.
    pub min_radius: f32,
    /// Derive each point's radius from local luminance.
    pub vary_density: bool,
    /// Which end of the luminance range gets the densest dots.
    pub density_bias: DensityBias,
    /// Candidate attempts around an active point before it is retired.
    pub sample_limit: u32,
    /// Margin in pixels kept free on every side of the image.
    pub draw_radius: u32,
    /// Radius of the luminance window averaged around each point.
    pub sample_radius: f32,
    /// Shape of the luminance window.
    pub sample_window: SampleWindow,
    /// How two exclusion radii combine.
    pub exclusion_rule: ExclusionRule,
}

impl Default for StippleConfig {
    fn default() -> Self {
        Self {
            max_radius: DEFAULT_MAX_RADIUS,
            min_radius: DEFAULT_MIN_RADIUS,
            vary_density: false,
            density_bias: DensityBias::DenseInDark,
            sample_limit: DEFAULT_SAMPLE_LIMIT,
            draw_radius: DEFAULT_DRAW_RADIUS,
            sample_radius: DEFAULT_MAX_RADIUS / 2.0,
            sample_window: SampleWindow::Circle,
            exclusion_rule: ExclusionRule::Max,
        }
    }
}

type Setter = fn(&mut StippleConfig, &str) -> Result<()>;
type Getter = fn(&StippleConfig) -> String;

/// Key → accessor table used by text front-ends.
const FIELDS: &[(&str, Setter, Getter)] = &[
    (
        "max_radius",
        |c, v| {
            c.max_radius = parse_value("max_radius", v)?;
            Ok(())
        },
        |c| c.max_radius.to_string(),
    ),
    (
        "min_radius",
        |c, v| {
            c.min_radius = parse_value("min_radius", v)?;
            Ok(())
        },
        |c| c.min_radius.to_string(),
    ),
    (
        "vary_density",
        |c, v| {
            c.vary_density = parse_bool("vary_density", v)?;
            Ok(())
        },
        |c| c.vary_density.to_string(),
    ),
    (
        "density_bias",
        |c, v| {
            c.density_bias = parse_value("density_bias", v)?;
            Ok(())
        },
        |c| c.density_bias.to_string(),
    ),
    (
        "sample_limit",
        |c, v| {
            c.sample_limit = parse_value("sample_limit", v)?;
            Ok(())
        },
        |c| c.sample_limit.to_string(),
    ),
    (
        "draw_radius",
        |c, v| {
            c.draw_radius = parse_value("draw_radius", v)?;
            Ok(())
        },
        |c| c.draw_radius.to_string(),
    ),
    (
        "sample_radius",
        |c, v| {
            c.sample_radius = parse_value("sample_radius", v)?;
            Ok(())
        },
        |c| c.sample_radius.to_string(),
    ),
    (
        "sample_window",
        |c, v| {
            c.sample_window = parse_value("sample_window", v)?;
            Ok(())
        },
        |c| c.sample_window.to_string(),
    ),
    (
        "exclusion_rule",
        |c, v| {
            c.exclusion_rule = parse_value("exclusion_rule", v)?;
            Ok(())
        },
        |c| c.exclusion_rule.to_string(),
    ),
];

fn parse_value<T: FromStr>(key: &str, value: &str) -> Result<T> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_owned(),
        })
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(Error::InvalidConfigValue {
            key: key.to_owned(),
            value: value.to_owned(),
        }),
    }
}

impl StippleConfig {
    /// Keys accepted by [`StippleConfig::set`], in display order.
    pub const KEYS: [&'static str; 9] = [
        "max_radius",
        "min_radius",
        "vary_density",
        "density_bias",
        "sample_limit",
        "draw_radius",
        "sample_radius",
        "sample_window",
        "exclusion_rule",
    ];

    /// Fixed-density configuration with every point using `radius`.
    pub fn fixed(radius: f32) -> Self {
        Self {
            max_radius: radius,
            min_radius: radius,
            sample_radius: radius / 2.0,
            ..Default::default()
        }
    }

    /// Variable-density configuration between `min_radius` and `max_radius`.
    pub fn varying(min_radius: f32, max_radius: f32) -> Self {
        Self {
            max_radius,
            min_radius,
            vary_density: true,
            sample_radius: max_radius / 2.0,
            ..Default::default()
        }
    }

    pub fn with_max_radius(mut self, max_radius: f32) -> Self {
        self.max_radius = max_radius;
        self
    }

    pub fn with_min_radius(mut self, min_radius: f32) -> Self {
        self.min_radius = min_radius;
        self
    }

    pub fn with_vary_density(mut self, vary_density: bool) -> Self {
        self.vary_density = vary_density;
        self
    }

    pub fn with_density_bias(mut self, density_bias: DensityBias) -> Self {
        self.density_bias = density_bias;
        self
    }

    pub fn with_sample_limit(mut self, sample_limit: u32) -> Self {
        self.sample_limit = sample_limit;
        self
    }

    pub fn with_draw_radius(mut self, draw_radius: u32) -> Self {
        self.draw_radius = draw_radius;
        self
    }

    pub fn with_sample_radius(mut self, sample_radius: f32) -> Self {
        self.sample_radius = sample_radius;
        self
    }

    pub fn with_sample_window(mut self, sample_window: SampleWindow) -> Self {
        self.sample_window = sample_window;
        self
    }

    pub fn with_exclusion_rule(mut self, exclusion_rule: ExclusionRule) -> Self {
        self.exclusion_rule = exclusion_rule;
        self
    }

    /// Assigns the field named `key` from its textual `value`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = key.trim();
        match FIELDS.iter().find(|(name, _, _)| *name == key) {
            Some((_, setter, _)) => setter(self, value),
            None => Err(Error::UnknownConfigKey {
                key: key.to_owned(),
            }),
        }
    }

    /// Parses a `key=value` assignment and applies it.
    pub fn apply_assignment(&mut self, assignment: &str) -> Result<()> {
        let Some((key, value)) = assignment.split_once('=') else {
            return Err(Error::InvalidConfig(format!(
                "expected key=value, got '{}'",
                assignment
            )));
        };
        self.set(key, value)
    }

    /// Textual value of the field named `key`.
    pub fn get(&self, key: &str) -> Result<String> {
        FIELDS
            .iter()
            .find(|(name, _, _)| *name == key)
            .map(|(_, _, getter)| getter(self))
            .ok_or_else(|| Error::UnknownConfigKey {
                key: key.to_owned(),
            })
    }

    /// All `(key, value)` pairs in display order.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        FIELDS
            .iter()
            .map(|(name, _, getter)| (*name, getter(self)))
            .collect()
    }

    /// Validates the parameters on their own, returning an error if invalid.
    pub fn validate(&self) -> Result<()> {
        // Points sit on integer pixels; the neighbor grid has one cell per max_radius / √2.
        if !self.max_radius.is_finite() || self.max_radius < 1.0 {
            return Err(Error::InvalidConfig(format!(
                "max_radius must be >= 1 pixel, got {}",
                self.max_radius
            )));
        }
        if !self.min_radius.is_finite() || self.min_radius <= 0.0 {
            return Err(Error::InvalidConfig("min_radius must be > 0".into()));
        }
        if self.min_radius > self.max_radius {
            return Err(Error::InvalidConfig(format!(
                "min_radius ({}) must not exceed max_radius ({})",
                self.min_radius, self.max_radius
            )));
        }
        if self.sample_limit == 0 {
            return Err(Error::InvalidConfig("sample_limit must be > 0".into()));
        }
        if !self.sample_radius.is_finite() || self.sample_radius < 0.0 {
            return Err(Error::InvalidConfig("sample_radius must be >= 0".into()));
        }

        Ok(())
    }

    /// Validates the parameters against a `width` x `height` image.
    pub fn validate_for(&self, width: u32, height: u32) -> Result<()> {
        self.validate()?;
        if width == 0 || height == 0 {
            return Err(Error::InvalidConfig(format!(
                "image must not be empty, got {}x{}",
                width, height
            )));
        }
        let min_extent = 2 * self.draw_radius as u64;
        if (width as u64) < min_extent || (height as u64) < min_extent {
            return Err(Error::InvalidConfig(format!(
                "image {}x{} is smaller than 2 * draw_radius ({}) on at least one axis",
                width, height, min_extent
            )));
        }

        Ok(())
    }

    /// Density model described by this configuration.
    pub fn density_model(&self) -> DensityModel {
        let model = if self.vary_density {
            DensityModel::varying(self.min_radius, self.max_radius, self.density_bias)
        } else {
            DensityModel::fixed(self.max_radius)
        };
        model
            .with_sample_radius(self.sample_radius)
            .with_window(self.sample_window)
    }
}

impl FromStr for SampleWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "square" => Ok(SampleWindow::Square),
            "circle" | "circular" => Ok(SampleWindow::Circle),
            _ => Err(Error::InvalidConfigValue {
                key: "sample_window".into(),
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for SampleWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SampleWindow::Square => f.write_str("square"),
            SampleWindow::Circle => f.write_str("circle"),
        }
    }
}

impl FromStr for ExclusionRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "min" => Ok(ExclusionRule::Min),
            "max" => Ok(ExclusionRule::Max),
            _ => Err(Error::InvalidConfigValue {
                key: "exclusion_rule".into(),
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for ExclusionRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExclusionRule::Min => f.write_str("min"),
            ExclusionRule::Max => f.write_str("max"),
        }
    }
}

impl FromStr for DensityBias {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dark" | "dense_in_dark" => Ok(DensityBias::DenseInDark),
            "bright" | "dense_in_bright" => Ok(DensityBias::DenseInBright),
            _ => Err(Error::InvalidConfigValue {
                key: "density_bias".into(),
                value: s.to_owned(),
            }),
        }
    }
}

impl fmt::Display for DensityBias {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DensityBias::DenseInDark => f.write_str("dark"),
            DensityBias::DenseInBright => f.write_str("bright"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(StippleConfig::default().validate().is_ok());
        assert!(StippleConfig::default().validate_for(100, 100).is_ok());
    }

    #[test]
    fn keys_match_lookup_table() {
        let table: Vec<_> = FIELDS.iter().map(|(name, _, _)| *name).collect();
        assert_eq!(table, StippleConfig::KEYS.to_vec());
    }

    #[test]
    fn min_radius_above_max_is_rejected() {
        let config = StippleConfig::varying(12.0, 10.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn min_radius_above_max_is_rejected_for_fixed_density() {
        let config = StippleConfig::fixed(5.0).with_min_radius(50.0);
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        assert!(config.validate_for(100, 100).is_err());
        assert!(StippleConfig::fixed(5.0).with_min_radius(5.0).validate().is_ok());
    }

    #[test]
    fn sub_pixel_max_radius_is_rejected() {
        assert!(StippleConfig::fixed(0.001).validate().is_err());
        assert!(StippleConfig::fixed(0.5).validate_for(1000, 1000).is_err());
        assert!(StippleConfig::varying(0.2, 0.9).validate().is_err());
        assert!(StippleConfig::fixed(1.0).with_draw_radius(0).validate().is_ok());
    }

    #[test]
    fn zero_sample_limit_is_rejected() {
        let config = StippleConfig::fixed(5.0).with_sample_limit(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn non_positive_radius_is_rejected() {
        assert!(StippleConfig::fixed(0.0).validate().is_err());
        assert!(StippleConfig::fixed(f32::NAN).validate().is_err());
        assert!(StippleConfig::varying(0.0, 5.0).validate().is_err());
    }

    #[test]
    fn image_smaller_than_draw_margin_is_rejected() {
        let config = StippleConfig::fixed(5.0).with_draw_radius(30);
        assert!(config.validate_for(60, 60).is_ok());
        assert!(config.validate_for(59, 100).is_err());
        assert!(config.validate_for(100, 59).is_err());
        assert!(config.validate_for(0, 0).is_err());
    }

    #[test]
    fn set_parses_each_kind_of_field() {
        let mut config = StippleConfig::default();
        config.set("max_radius", "12.5").unwrap();
        config.set("vary_density", "yes").unwrap();
        config.set("sample_limit", " 40 ").unwrap();
        config.set("sample_window", "Square").unwrap();
        config.set("exclusion_rule", "min").unwrap();
        config.set("density_bias", "bright").unwrap();

        assert_eq!(config.max_radius, 12.5);
        assert!(config.vary_density);
        assert_eq!(config.sample_limit, 40);
        assert_eq!(config.sample_window, SampleWindow::Square);
        assert_eq!(config.exclusion_rule, ExclusionRule::Min);
        assert_eq!(config.density_bias, DensityBias::DenseInBright);
    }

    #[test]
    fn set_reports_unknown_key_and_bad_value() {
        let mut config = StippleConfig::default();
        assert!(matches!(
            config.set("radius", "3"),
            Err(Error::UnknownConfigKey { ref key }) if key == "radius"
        ));
        assert!(matches!(
            config.set("sample_limit", "-3"),
            Err(Error::InvalidConfigValue { ref key, .. }) if key == "sample_limit"
        ));
        assert_eq!(config, StippleConfig::default());
    }

    #[test]
    fn apply_assignment_splits_on_equals() {
        let mut config = StippleConfig::default();
        config.apply_assignment("draw_radius=7").unwrap();
        assert_eq!(config.draw_radius, 7);
        assert!(config.apply_assignment("draw_radius").is_err());
    }

    #[test]
    fn get_round_trips_through_set() {
        let mut config = StippleConfig::default();
        for (key, value) in StippleConfig::varying(2.0, 9.0).entries() {
            config.set(key, &value).unwrap();
        }
        assert_eq!(config, StippleConfig::varying(2.0, 9.0));
        assert_eq!(config.get("exclusion_rule").unwrap(), "max");
    }

    #[test]
    fn density_model_mirrors_config() {
        let model = StippleConfig::varying(2.0, 8.0)
            .with_sample_window(SampleWindow::Square)
            .density_model();
        assert!(model.vary_density);
        assert_eq!(model.min_radius, 2.0);
        assert_eq!(model.max_radius, 8.0);
        assert_eq!(model.sample_radius, 4.0);
        assert_eq!(model.window, SampleWindow::Square);
    }
}
