//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! invalid sampling configuration and failures of the textual configuration lookup table.
//! Degenerate luminance windows and short selections are not errors; see
//! [`crate::sampling::density`] and [`crate::stipple::selection`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("unknown configuration key '{key}'")]
    UnknownConfigKey { key: String },

    #[error("invalid value '{value}' for configuration key '{key}'")]
    InvalidConfigValue { key: String, value: String },

    #[error("{0}")]
    Other(String),
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_string_uses_other_variant() {
        let err: Error = String::from("boom").into();
        assert!(matches!(err, Error::Other(_)));
    }

    #[test]
    fn invalid_value_message_names_key_and_value() {
        let err = Error::InvalidConfigValue {
            key: "sample_limit".into(),
            value: "lots".into(),
        };
        assert_eq!(
            err.to_string(),
            "invalid value 'lots' for configuration key 'sample_limit'"
        );
    }
}
