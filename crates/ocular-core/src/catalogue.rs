//! Part catalogue - the static list of anatomical structures
//!
//! The catalogue is a TOML (or JSON) document with one `[[part]]` table per
//! structure. It is parsed once at startup and never mutated afterwards.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

/// The catalogue shipped with the viewer
const BUILTIN_EYE: &str = include_str!("../assets/eye.toml");

#[derive(Error, Debug)]
pub enum CatalogueError {
    #[error("Failed to parse catalogue: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("Failed to parse JSON catalogue: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Part '{part}' has an invalid color '{value}'")]
    InvalidColor { part: String, value: String },
    #[error("Part '{part}' has opacity {value} outside 0.0..=1.0")]
    InvalidOpacity { part: String, value: f32 },
    #[error("Part '{part}' has a non-positive or non-finite size")]
    InvalidSize { part: String },
    #[error("Part '{part}' has a non-finite position")]
    InvalidPosition { part: String },
    #[error("Duplicate part name: {0}")]
    DuplicateName(String),
    #[error("Part at index {0} has an empty name")]
    EmptyName(usize),
    #[error("Catalogue contains no parts")]
    Empty,
}

/// sRGB color with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as floats in 0.0-1.0
    pub fn to_f32_array(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }
}

/// Parse a `#rrggbb` or `0xrrggbb` color string
pub fn parse_hex_color(value: &str) -> Option<Rgb> {
    let trimmed = value.trim();
    let hex = trimmed
        .strip_prefix('#')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))?;

    if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let packed = u32::from_str_radix(hex, 16).ok()?;
    Some(Rgb::new(
        ((packed >> 16) & 0xff) as u8,
        ((packed >> 8) & 0xff) as u8,
        (packed & 0xff) as u8,
    ))
}

/// Static description of one anatomical structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartDefinition {
    pub name: String,
    /// Hex color string, e.g. "#88ccff"
    pub color: String,
    /// Translucency; `None` renders the part fully opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    pub position: [f32; 3],
    /// Box extents, or `[radius, _, _]` for spherical parts
    pub size: [f32; 3],
    #[serde(default)]
    pub spherical: bool,
    pub description: String,
}

impl PartDefinition {
    /// Parsed color; only valid after [`Catalogue::validate`] has run
    pub fn rgb(&self) -> Rgb {
        parse_hex_color(&self.color).unwrap_or(Rgb::new(255, 255, 255))
    }

    /// Opacity with the fully-opaque default applied
    pub fn effective_opacity(&self) -> f32 {
        self.opacity.unwrap_or(1.0)
    }

    /// Whether the part was declared translucent
    pub fn is_translucent(&self) -> bool {
        self.opacity.is_some()
    }

    /// Shell radius for spherical parts
    pub fn radius(&self) -> f32 {
        self.size[0]
    }

    fn validate(&self, index: usize) -> Result<(), CatalogueError> {
        if self.name.trim().is_empty() {
            return Err(CatalogueError::EmptyName(index));
        }
        if parse_hex_color(&self.color).is_none() {
            return Err(CatalogueError::InvalidColor {
                part: self.name.clone(),
                value: self.color.clone(),
            });
        }
        if let Some(opacity) = self.opacity {
            if !(0.0..=1.0).contains(&opacity) {
                return Err(CatalogueError::InvalidOpacity {
                    part: self.name.clone(),
                    value: opacity,
                });
            }
        }
        if self.size.iter().any(|s| !s.is_finite() || *s <= 0.0) {
            return Err(CatalogueError::InvalidSize {
                part: self.name.clone(),
            });
        }
        if self.position.iter().any(|p| !p.is_finite()) {
            return Err(CatalogueError::InvalidPosition {
                part: self.name.clone(),
            });
        }
        Ok(())
    }
}

/// Ordered, validated list of part definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalogue {
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(default)]
    pub part: Vec<PartDefinition>,
}

/// Case-folded name used for both duplicate checks and lookups
fn name_key(name: &str) -> String {
    name.trim().to_lowercase()
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Catalogue {
    /// The eye model shipped with the viewer
    pub fn builtin() -> Result<Self, CatalogueError> {
        Self::from_toml(BUILTIN_EYE)
    }

    /// Parse and validate a TOML catalogue
    pub fn from_toml(content: &str) -> Result<Self, CatalogueError> {
        let catalogue: Catalogue = toml::from_str(content)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Parse and validate a JSON catalogue
    pub fn from_json(content: &str) -> Result<Self, CatalogueError> {
        let catalogue: Catalogue = serde_json::from_str(content)?;
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// Check every part and reject duplicate names (case-insensitive)
    pub fn validate(&self) -> Result<(), CatalogueError> {
        if self.part.is_empty() {
            return Err(CatalogueError::Empty);
        }

        let mut seen = HashSet::new();
        for (index, part) in self.part.iter().enumerate() {
            part.validate(index)?;
            if !seen.insert(name_key(&part.name)) {
                return Err(CatalogueError::DuplicateName(part.name.clone()));
            }
        }

        tracing::debug!(parts = self.part.len(), "Catalogue validated");
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.part.len()
    }

    pub fn is_empty(&self) -> bool {
        self.part.is_empty()
    }

    pub fn parts(&self) -> impl Iterator<Item = &PartDefinition> {
        self.part.iter()
    }

    pub fn get(&self, index: usize) -> Option<&PartDefinition> {
        self.part.get(index)
    }

    /// Look up a part index by name, ignoring case
    pub fn position_of(&self, name: &str) -> Option<usize> {
        let key = name_key(name);
        self.part.iter().position(|p| name_key(&p.name) == key)
    }

    pub fn find(&self, name: &str) -> Option<&PartDefinition> {
        self.position_of(name).and_then(|i| self.part.get(i))
    }
}
