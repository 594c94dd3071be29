//! Simulation configuration
//!
//! Loaded from JSON; every field has a default so partial files work.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_SPEED_LIMIT, DEFAULT_WIDTH};
use crate::error::{Result, SimError};

/// How entities are kept inside the area each tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum BorderMode {
    /// Reflect velocity off the edges
    #[default]
    Bounce,
    /// Teleport to the opposite edge
    Wrap,
    /// No containment
    None,
}

impl BorderMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorderMode::Bounce => "Bounce",
            BorderMode::Wrap => "Wrap",
            BorderMode::None => "None",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "bounce" => Some(BorderMode::Bounce),
            "wrap" | "edges" => Some(BorderMode::Wrap),
            "none" | "off" => Some(BorderMode::None),
            _ => None,
        }
    }
}

/// Flow field parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlowFieldConfig {
    /// Side length of one square cell
    pub cell_size: f32,
    /// Initial time coordinate fed to the noise function
    pub time_offset: f64,
    /// Noise-space step per grid column/row
    pub multiplier: f64,
    /// Scale applied to a cell's unit direction when used as a force
    pub strength: f32,
    /// Noise seed
    pub seed: u32,
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            cell_size: 50.0,
            time_offset: 0.0,
            multiplier: 0.1,
            strength: 1.0,
            seed: 0,
        }
    }
}

impl FlowFieldConfig {
    /// Reject parameters that would put NaN/inf into cell velocities
    pub fn validate(&self) -> Result<()> {
        if !self.cell_size.is_finite() || self.cell_size <= 0.0 {
            return Err(SimError::InvalidCellSize(self.cell_size));
        }
        if !self.strength.is_finite() {
            return Err(SimError::Config(format!(
                "flow field strength must be finite, got {}",
                self.strength
            )));
        }
        if !self.multiplier.is_finite() {
            return Err(SimError::Config(format!(
                "flow field multiplier must be finite, got {}",
                self.multiplier
            )));
        }
        if !self.time_offset.is_finite() {
            return Err(SimError::Config(format!(
                "flow field time offset must be finite, got {}",
                self.time_offset
            )));
        }
        Ok(())
    }
}

/// Simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Area width
    pub width: f32,
    /// Area height
    pub height: f32,
    /// Velocity clamp applied during integration
    pub speed_limit: f32,
    /// Border handling
    pub border: BorderMode,
    /// Pairwise collision resolution
    pub collisions: bool,
    /// Ambient flow field (none by default)
    pub flowfield: Option<FlowFieldConfig>,
    /// Seed for random placement
    pub seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            speed_limit: DEFAULT_SPEED_LIMIT,
            border: BorderMode::Bounce,
            collisions: true,
            flowfield: None,
            seed: 0,
        }
    }
}

impl SimConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self> {
        let config: SimConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values that would produce NaN/inf during a tick
    pub fn validate(&self) -> Result<()> {
        if !(self.width.is_finite() && self.height.is_finite())
            || self.width <= 0.0
            || self.height <= 0.0
        {
            return Err(SimError::InvalidArea {
                width: self.width,
                height: self.height,
            });
        }
        if self.speed_limit.is_nan() || self.speed_limit < 0.0 {
            return Err(SimError::InvalidSpeedLimit(self.speed_limit));
        }
        if let Some(field) = &self.flowfield {
            field.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(SimConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config = SimConfig::from_json(r#"{ "width": 400, "border": "Wrap" }"#).unwrap();
        assert_eq!(config.width, 400.0);
        assert_eq!(config.height, DEFAULT_HEIGHT);
        assert_eq!(config.border, BorderMode::Wrap);
        assert!(config.flowfield.is_none());
    }

    #[test]
    fn test_flowfield_json() {
        let config =
            SimConfig::from_json(r#"{ "flowfield": { "cell_size": 20, "seed": 7 } }"#).unwrap();
        let field = config.flowfield.unwrap();
        assert_eq!(field.cell_size, 20.0);
        assert_eq!(field.seed, 7);
        assert!((field.multiplier - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            SimConfig::from_json(r#"{ "width": 0 }"#),
            Err(SimError::InvalidArea { .. })
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{ "speed_limit": -1 }"#),
            Err(SimError::InvalidSpeedLimit(_))
        ));
        assert!(matches!(
            SimConfig::from_json(r#"{ "flowfield": { "cell_size": -5 } }"#),
            Err(SimError::InvalidCellSize(_))
        ));
        assert!(matches!(
            SimConfig::from_json("{"),
            Err(SimError::Json(_))
        ));
    }

    #[test]
    fn test_flowfield_rejects_non_finite() {
        let nan_strength = FlowFieldConfig {
            strength: f32::NAN,
            ..Default::default()
        };
        assert!(matches!(nan_strength.validate(), Err(SimError::Config(_))));

        let inf_multiplier = FlowFieldConfig {
            multiplier: f64::INFINITY,
            ..Default::default()
        };
        assert!(inf_multiplier.validate().is_err());

        let nan_time = FlowFieldConfig {
            time_offset: f64::NAN,
            ..Default::default()
        };
        assert!(nan_time.validate().is_err());
        assert!(FlowFieldConfig::default().validate().is_ok());
    }

    #[test]
    fn test_border_mode_from_str() {
        assert_eq!(BorderMode::from_str("BOUNCE"), Some(BorderMode::Bounce));
        assert_eq!(BorderMode::from_str("edges"), Some(BorderMode::Wrap));
        assert_eq!(BorderMode::from_str("off"), Some(BorderMode::None));
        assert_eq!(BorderMode::from_str("sideways"), None);
        assert_eq!(BorderMode::Wrap.as_str(), "Wrap");
    }

    #[test]
    fn test_json_roundtrip_keeps_border() {
        let mut config = SimConfig::default();
        config.border = BorderMode::None;
        let json = config.to_json().unwrap();
        assert_eq!(SimConfig::from_json(&json).unwrap().border, BorderMode::None);
    }
}
