//! Simulation settings
//!
//! Loaded from JSON; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{GRAVITATIONAL_CONSTANT, GRAVITY, SUBSTEPS};
use crate::error::{Error, Result};

/// Tunables for a `Simulator`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimSettings {
    /// Fixed substeps per `step` call
    pub substeps: u32,
    /// Scales every external `dt` (0 freezes the world)
    pub time_multiplier: f64,
    /// Uniform downward gravity toggle
    pub gravity_on: bool,
    /// Uniform gravity acceleration (m/s², +y is down)
    pub gravity: f64,
    /// Newtonian constant used for gravity-source attraction
    pub gravitational_constant: f64,
}

impl Default for SimSettings {
    fn default() -> Self {
        Self {
            substeps: SUBSTEPS,
            time_multiplier: 1.0,
            gravity_on: true,
            gravity: GRAVITY,
            gravitational_constant: GRAVITATIONAL_CONSTANT,
        }
    }
}

impl SimSettings {
    pub fn from_json(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.substeps == 0 {
            return Err(Error::InvalidSettings("substeps must be at least 1"));
        }
        if !self.time_multiplier.is_finite() || self.time_multiplier < 0.0 {
            return Err(Error::InvalidSettings("time multiplier must be finite and >= 0"));
        }
        if !self.gravity.is_finite() {
            return Err(Error::InvalidSettings("gravity must be finite"));
        }
        if !self.gravitational_constant.is_finite() {
            return Err(Error::InvalidSettings("gravitational constant must be finite"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = SimSettings::default();
        assert_eq!(settings.substeps, 6);
        assert_eq!(settings.time_multiplier, 1.0);
        assert!(settings.gravity_on);
        assert_eq!(settings.gravity, 9.8);
        assert_eq!(settings.gravitational_constant, 6.674e-11);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = SimSettings::from_json(r#"{ "gravity_on": false, "substeps": 12 }"#).unwrap();
        assert!(!settings.gravity_on);
        assert_eq!(settings.substeps, 12);
        assert_eq!(settings.time_multiplier, 1.0);
    }

    #[test]
    fn test_json_roundtrip() {
        let settings = SimSettings {
            time_multiplier: 0.25,
            ..Default::default()
        };
        let json = settings.to_json().unwrap();
        assert_eq!(SimSettings::from_json(&json).unwrap(), settings);
    }

    #[test]
    fn test_rejects_invalid() {
        assert!(matches!(
            SimSettings::from_json(r#"{ "substeps": 0 }"#),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(
            SimSettings::from_json(r#"{ "time_multiplier": -1.0 }"#),
            Err(Error::InvalidSettings(_))
        ));
        assert!(matches!(SimSettings::from_json("{ nope"), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_missing_file() {
        assert!(matches!(
            SimSettings::load("/definitely/not/here.json"),
            Err(Error::Config(_))
        ));
    }
}
