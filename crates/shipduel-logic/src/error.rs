//! Errors for loading ship layouts and battle configuration.
//!
//! Commands never fail loudly: a rejected command leaves the state
//! untouched. The only fallible surface is turning JSON into templates and
//! configs.

use thiserror::Error;

use crate::geometry::ValidationError;
use crate::model::ShipSide;

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("layout {name:?} failed validation with {} error(s): {}", .errors.len(), first_error(.errors))]
    Invalid {
        name: String,
        errors: Vec<ValidationError>,
    },

    #[error("layout {name:?} is for the {found:?} side but was given as the {expected:?} ship")]
    WrongSide {
        name: String,
        expected: ShipSide,
        found: ShipSide,
    },

    #[error("max_frame_dt must be a positive number of seconds, got {0}")]
    FrameClamp(f32),
}

fn first_error(errors: &[ValidationError]) -> String {
    errors
        .first()
        .map(ToString::to_string)
        .unwrap_or_default()
}
