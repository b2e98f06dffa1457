//! Detector configuration.
//!
//! Every threshold the probers use lives here. The struct deserializes with
//! defaults for missing fields, so callers can embed a partial `[detector]`
//! table in their own configuration files.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Tunables for a [`Detector`](crate::Detector) session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Results below this confidence are reported as unknown.
    pub minimum_confidence: f32,
    /// Stop at the first decisive prober instead of reading on.
    pub short_circuit: bool,
    /// Errors a multi-byte candidate survives once it has confirmed a
    /// character. Each costs half its confidence.
    pub max_errors: u32,
    /// Chance that a random byte pair passes a multi-byte machine.
    pub one_char_prob: f32,
    /// Single-byte confidence that ends detection early.
    pub positive_shortcut: f32,
    /// Scored pairs required before the single-byte shortcut applies.
    pub enough_sequences: u32,
    /// Run the escape-sequence prober.
    pub escape: bool,
    /// Run the multi-byte probers.
    pub multi_byte: bool,
    /// Run the single-byte probers.
    pub single_byte: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            minimum_confidence: 0.20,
            short_circuit: true,
            max_errors: 0,
            one_char_prob: 0.5,
            positive_shortcut: 0.95,
            enough_sequences: 1024,
            escape: true,
            multi_byte: true,
            single_byte: true,
        }
    }
}

impl DetectorConfig {
    /// Rejects values outside their meaningful range.
    pub fn validate(&self) -> Result<()> {
        unit_interval("minimum_confidence", self.minimum_confidence)?;
        unit_interval("positive_shortcut", self.positive_shortcut)?;
        if !(self.one_char_prob > 0.0 && self.one_char_prob < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "one_char_prob must lie in (0, 1), got {}",
                self.one_char_prob
            )));
        }
        if !(self.escape || self.multi_byte || self.single_byte) {
            return Err(Error::InvalidConfig(
                "at least one prober family must be enabled".to_string(),
            ));
        }
        Ok(())
    }
}

fn unit_interval(name: &str, value: f32) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{name} must lie in [0, 1], got {value}"
        )))
    }
}
