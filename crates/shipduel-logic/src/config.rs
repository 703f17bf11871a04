//! Battle configuration: starting resources, frame clamp, and the two
//! ship layouts a battle is fought between.
//!
//! Every field has a default, so a JSON config only needs to name what it
//! changes:
//!
//! ```json
//! { "starting_missiles": 3, "autofire": true }
//! ```

use serde::{Deserialize, Serialize};

use crate::constants::balance::{STARTING_FUEL, STARTING_MISSILES, STARTING_SCRAP};
use crate::constants::timing::MAX_FRAME_DT;
use crate::error::TemplateError;
use crate::model::ShipSide;
use crate::ships;
use crate::template::ShipTemplate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    pub starting_missiles: u32,
    pub starting_fuel: u32,
    pub starting_scrap: u32,
    /// Largest delta, in seconds, a single frame may advance the simulation.
    pub max_frame_dt: f32,
    /// Initial state of the autofire toggle.
    pub autofire: bool,
    pub player: ShipTemplate,
    pub enemy: ShipTemplate,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            starting_missiles: STARTING_MISSILES,
            starting_fuel: STARTING_FUEL,
            starting_scrap: STARTING_SCRAP,
            max_frame_dt: MAX_FRAME_DT,
            autofire: false,
            player: ships::kestrel(),
            enemy: ships::rebel_fighter(),
        }
    }
}

impl BattleConfig {
    /// Parse a config from JSON, then validate both layouts.
    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        let config: BattleConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        if !(self.max_frame_dt.is_finite() && self.max_frame_dt > 0.0) {
            return Err(TemplateError::FrameClamp(self.max_frame_dt));
        }
        for (template, expected) in [(&self.player, ShipSide::Player), (&self.enemy, ShipSide::Enemy)] {
            if template.side != expected {
                return Err(TemplateError::WrongSide {
                    name: template.name.clone(),
                    expected,
                    found: template.side,
                });
            }
            template.validate()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = BattleConfig::default();
        assert_eq!(config.starting_missiles, 8);
        assert_eq!(config.starting_fuel, 10);
        assert_eq!(config.max_frame_dt, 0.1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = BattleConfig::from_json(r#"{ "starting_missiles": 3, "autofire": true }"#).unwrap();
        assert_eq!(config.starting_missiles, 3);
        assert!(config.autofire);
        assert_eq!(config.starting_fuel, 10);
        assert_eq!(config.player, ships::kestrel());
    }

    #[test]
    fn test_rejects_bad_frame_clamp() {
        let err = BattleConfig::from_json(r#"{ "max_frame_dt": 0.0 }"#).unwrap_err();
        assert!(matches!(err, TemplateError::FrameClamp(_)));
    }

    #[test]
    fn test_rejects_swapped_sides() {
        let config = BattleConfig {
            player: ships::rebel_fighter(),
            ..BattleConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(
            err,
            TemplateError::WrongSide {
                expected: ShipSide::Player,
                ..
            }
        ));
    }
}
