//! Ocular Core - Renderer-independent data for the eye anatomy viewer
//!
//! This crate provides:
//! - The part catalogue (TOML/JSON) and its validation
//! - Named camera views and poses
//! - The single-highlight selection state machine
//! - Start-up options parsed from URL query parameters

pub mod catalogue;
pub mod options;
pub mod selection;
pub mod view;

pub use catalogue::{parse_hex_color, Catalogue, CatalogueError, PartDefinition, Rgb};
pub use options::ViewerOptions;
pub use selection::{HighlightChange, Selection};
pub use view::{CameraPose, ViewPreset, ViewPresetError};
