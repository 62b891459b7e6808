//! Named camera views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown view preset '{0}' (expected front, side or cross-section)")]
pub struct ViewPresetError(pub String);

/// Camera position and look-at target, Y up
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPose {
    pub position: [f32; 3],
    pub target: [f32; 3],
}

impl CameraPose {
    /// Camera on the +Z axis, five units out, looking at the eye centre
    pub const DEFAULT: CameraPose = CameraPose {
        position: [0.0, 0.0, 5.0],
        target: [0.0, 0.0, 0.0],
    };

    /// Pose that frames a part: target on the part, camera offset by (2, 2, 2)
    pub fn focusing(part_position: [f32; 3]) -> Self {
        let [x, y, z] = part_position;
        Self {
            position: [x + 2.0, y + 2.0, z + 2.0],
            target: part_position,
        }
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fixed viewpoints offered by the view selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewPreset {
    #[default]
    Front,
    Side,
    CrossSection,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 3] = [ViewPreset::Front, ViewPreset::Side, ViewPreset::CrossSection];

    /// Selector value
    pub fn as_str(self) -> &'static str {
        match self {
            ViewPreset::Front => "front",
            ViewPreset::Side => "side",
            ViewPreset::CrossSection => "cross-section",
        }
    }

    /// Human-readable label for the UI
    pub fn label(self) -> &'static str {
        match self {
            ViewPreset::Front => "Front View",
            ViewPreset::Side => "Side View",
            ViewPreset::CrossSection => "Cross Section",
        }
    }

    pub fn pose(self) -> CameraPose {
        let position = match self {
            ViewPreset::Front => [0.0, 0.0, 5.0],
            ViewPreset::Side => [5.0, 0.0, 0.0],
            ViewPreset::CrossSection => [2.0, 0.0, 0.0],
        };
        CameraPose {
            position,
            target: [0.0, 0.0, 0.0],
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewPreset {
    type Err = ViewPresetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "front" => Ok(ViewPreset::Front),
            "side" => Ok(ViewPreset::Side),
            "cross-section" | "cross_section" | "crosssection" => Ok(ViewPreset::CrossSection),
            _ => Err(ViewPresetError(s.to_string())),
        }
    }
}
