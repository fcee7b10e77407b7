//! Construction-time configuration for the dial.
//!
//! Mirrors the three color attributes a host declares for the widget. Values
//! are `#RRGGBB` strings borrowed from wherever the host keeps them (a
//! postcard blob in flash, environment variables, a literal).

extern crate alloc;

use alloc::vec::Vec;
use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
#[serde(default)]
pub struct DialConfig<'a> {
    /// Fill color for [`FanSpeed::Low`](crate::FanSpeed::Low)
    #[serde(borrow)]
    pub fan_color_1: Option<&'a str>,
    /// Fill color for [`FanSpeed::Medium`](crate::FanSpeed::Medium)
    #[serde(borrow)]
    pub fan_color_2: Option<&'a str>,
    /// Fill color for [`FanSpeed::High`](crate::FanSpeed::High)
    #[serde(borrow)]
    pub fan_color_3: Option<&'a str>,
}

/// Errors from encoding or decoding a [`DialConfig`] blob
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to decode dial config: {0:?}")]
    Decode(postcard::Error),

    #[error("failed to encode dial config: {0:?}")]
    Encode(postcard::Error),
}

impl<'a> DialConfig<'a> {
    pub fn new(low: &'a str, medium: &'a str, high: &'a str) -> Self {
        Self {
            fan_color_1: Some(low),
            fan_color_2: Some(medium),
            fan_color_3: Some(high),
        }
    }

    /// Decode a config from a postcard blob. Strings borrow from `bytes`.
    pub fn from_bytes(bytes: &'a [u8]) -> Result<Self, ConfigError> {
        postcard::from_bytes(bytes).map_err(ConfigError::Decode)
    }

    /// Encode this config as a postcard blob.
    pub fn to_vec(&self) -> Result<Vec<u8>, ConfigError> {
        postcard::to_allocvec(self).map_err(ConfigError::Encode)
    }
}
