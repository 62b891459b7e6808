//! Start-up options taken from the host page URL

use crate::view::ViewPreset;

/// Viewer options, `?view=side&labels=off&part=Lens`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerOptions {
    /// Preset applied on startup; `None` keeps the default camera
    pub initial_view: Option<ViewPreset>,
    pub labels_visible: bool,
    /// Part name to select on startup
    pub preselect: Option<String>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            initial_view: None,
            labels_visible: true,
            preselect: None,
        }
    }
}

impl ViewerOptions {
    /// Build options from query key/value pairs
    ///
    /// Unknown keys are ignored. Invalid values are logged and leave the
    /// default in place.
    pub fn from_query_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();

        for (key, value) in pairs {
            let value = value.as_ref().trim();
            match key.as_ref() {
                "view" => match value.parse::<ViewPreset>() {
                    Ok(preset) => options.initial_view = Some(preset),
                    Err(e) => tracing::warn!("Ignoring view parameter: {}", e),
                },
                "labels" => match parse_flag(value) {
                    Some(flag) => options.labels_visible = flag,
                    None => tracing::warn!("Ignoring labels parameter '{}'", value),
                },
                "part" => {
                    if !value.is_empty() {
                        options.preselect = Some(value.to_string());
                    }
                }
                _ => {}
            }
        }

        options
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.to_ascii_lowercase().as_str() {
        "on" | "true" | "1" | "yes" | "show" => Some(true),
        "off" | "false" | "0" | "no" | "hide" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ViewerOptions::from_query_pairs(Vec::<(String, String)>::new());
        assert_eq!(options, ViewerOptions::default());
        assert!(options.labels_visible);
    }

    #[test]
    fn test_parse_all_keys() {
        let options = ViewerOptions::from_query_pairs([
            ("view", "cross-section"),
            ("labels", "off"),
            ("part", "Optic Nerve"),
            ("hcdf", "ignored"),
        ]);
        assert_eq!(options.initial_view, Some(ViewPreset::CrossSection));
        assert!(!options.labels_visible);
        assert_eq!(options.preselect.as_deref(), Some("Optic Nerve"));
    }

    #[test]
    fn test_invalid_values_keep_defaults() {
        let options = ViewerOptions::from_query_pairs([
            ("view", "upside-down"),
            ("labels", "maybe"),
            ("part", "  "),
        ]);
        assert_eq!(options, ViewerOptions::default());
    }
}
