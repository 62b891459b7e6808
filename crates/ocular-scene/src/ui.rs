//! Shared egui widgets for the part panels and floating labels

use bevy::prelude::*;
use bevy_egui::egui;
use ocular_core::ViewPreset;

use crate::types::*;

/// Buttons pressed in the view controls this frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewActions {
    pub reset: bool,
    pub toggle_labels: bool,
    pub preset: Option<ViewPreset>,
}

impl ViewActions {
    pub fn is_empty(&self) -> bool {
        !self.reset && !self.toggle_labels && self.preset.is_none()
    }
}

/// Render the info panel: title, description and optional diagram link
pub fn render_info_panel(ui: &mut egui::Ui, info: &InfoPanel, ui_layout: &UiLayout) {
    let ui_scale = ui_layout.ui_scale();

    ui.heading(egui::RichText::new(&info.title).size(18.0 * ui_scale));
    ui.separator();
    ui.label(egui::RichText::new(&info.description).size(14.0 * ui_scale));

    if let Some(url) = &info.diagram_url {
        ui.add_space(8.0);
        ui.hyperlink_to("Eye diagram", url);
    }
}

/// Render the clickable part list; returns the part that was clicked
pub fn render_part_list<'a>(
    ui: &mut egui::Ui,
    parts: impl IntoIterator<Item = (Entity, &'a str)>,
    highlighted: Option<Entity>,
    ui_layout: &UiLayout,
) -> Option<Entity> {
    let ui_scale = ui_layout.ui_scale();
    let mut clicked = None;

    for (entity, name) in parts {
        let text = egui::RichText::new(name).size(14.0 * ui_scale);
        if ui
            .selectable_label(highlighted == Some(entity), text)
            .clicked()
        {
            clicked = Some(entity);
        }
    }

    clicked
}

/// Render reset, label toggle and the view selector
pub fn render_view_controls(
    ui: &mut egui::Ui,
    active: ViewPreset,
    labels_visible: bool,
    ui_layout: &UiLayout,
) -> ViewActions {
    let ui_scale = ui_layout.ui_scale();
    let mut actions = ViewActions::default();

    let button = |text: &str| {
        let button = egui::Button::new(egui::RichText::new(text).size(14.0 * ui_scale));
        if ui_layout.is_mobile {
            button.min_size(egui::vec2(0.0, 36.0))
        } else {
            button
        }
    };

    ui.horizontal_wrapped(|ui| {
        if ui.add(button("Reset View")).clicked() {
            actions.reset = true;
        }
        let toggle_text = if labels_visible { "Hide Labels" } else { "Show Labels" };
        if ui.add(button(toggle_text)).clicked() {
            actions.toggle_labels = true;
        }
    });

    ui.add_space(4.0);

    let mut selected = active;
    egui::ComboBox::from_label("View")
        .selected_text(selected.label())
        .show_ui(ui, |ui| {
            for preset in ViewPreset::ALL {
                ui.selectable_value(&mut selected, preset, preset.label());
            }
        });
    if selected != active {
        actions.preset = Some(selected);
    }

    actions
}

/// Font size and colour for a floating label
pub fn label_style(emphasized: bool, ui_scale: f32) -> (f32, egui::Color32) {
    if emphasized {
        (15.0 * ui_scale, egui::Color32::from_rgb(255, 230, 0))
    } else {
        (13.0 * ui_scale, egui::Color32::WHITE)
    }
}

/// Draw every visible label as a non-interactive area over the scene
pub fn draw_labels<'a>(
    ctx: &egui::Context,
    labels: impl IntoIterator<Item = (Entity, &'a PartLabel, &'a LabelPlacement)>,
    ui_layout: &UiLayout,
) {
    let ui_scale = ui_layout.ui_scale();

    for (entity, label, placement) in labels {
        if !placement.visible {
            continue;
        }

        let (size, color) = label_style(placement.emphasized, ui_scale);
        egui::Area::new(egui::Id::new(("part_label", entity)))
            .fixed_pos(egui::pos2(placement.position.x, placement.position.y))
            .order(egui::Order::Background)
            .interactable(false)
            .show(ctx, |ui| {
                egui::Frame::new()
                    .fill(egui::Color32::from_black_alpha(180))
                    .corner_radius(4.0)
                    .inner_margin(4.0)
                    .show(ui, |ui| {
                        ui.label(egui::RichText::new(&label.text).size(size).color(color));
                    });
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_actions_empty() {
        assert!(ViewActions::default().is_empty());
        assert!(!ViewActions {
            preset: Some(ViewPreset::Side),
            ..default()
        }
        .is_empty());
    }

    #[test]
    fn test_label_style() {
        let (plain_size, plain_color) = label_style(false, 1.0);
        let (hover_size, hover_color) = label_style(true, 1.0);
        assert!(hover_size > plain_size);
        assert_ne!(plain_color, hover_color);

        let (mobile_size, _) = label_style(false, 1.2);
        assert!(mobile_size > plain_size);
    }

    #[test]
    fn test_ui_layout_mobile_detection() {
        let mut layout = UiLayout::default();
        layout.update_from_window(1920.0, 1080.0);
        assert!(!layout.is_mobile);
        assert_eq!(layout.left_panel_width(), 240.0);

        layout.update_from_window(390.0, 844.0);
        assert!(layout.is_mobile);
        assert!((layout.right_panel_width() - 390.0 * 0.85).abs() < 1e-3);
        assert_eq!(layout.ui_scale(), 1.2);
    }

    #[test]
    fn test_default_panel_links_diagram() {
        let info = InfoPanel::default();
        assert_eq!(info.diagram_url.as_deref(), Some(EYE_DIAGRAM_URL));

        // Part panels carry no diagram
        let part = PartObject {
            index: 0,
            name: "Cornea".to_string(),
            description: "Clear front window".to_string(),
            original_material: Handle::default(),
        };
        assert_eq!(InfoPanel::for_part(&part).diagram_url, None);
    }
}
