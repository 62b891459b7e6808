//! UI overlays using bevy_egui

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;
use bevy_egui::{egui, EguiContexts, EguiPrimaryContextPass};
use ocular_core::{Catalogue, ViewPreset, ViewerOptions};
use ocular_scene::ui::{draw_labels, render_info_panel, render_part_list, render_view_controls};
use ocular_scene::{
    ActiveViewPreset, ApplyViewPreset, HighlightState, InfoPanel, LabelPlacement, LabelSettings,
    PartCatalogue, PartIndex, PartLabel, ResetView, SelectPart, ToggleLabels, UiLayout, ViewerSet,
};

/// Grouped system parameters for the main UI system to work around Bevy's 16-param limit
#[derive(SystemParam)]
pub struct UiParams<'w, 's> {
    pub contexts: EguiContexts<'w, 's>,
    pub ui_layout: ResMut<'w, UiLayout>,
    pub catalogue: Res<'w, PartCatalogue>,
    pub index: Res<'w, PartIndex>,
    pub info: Res<'w, InfoPanel>,
    pub highlight: Res<'w, HighlightState>,
    pub active_view: Res<'w, ActiveViewPreset>,
    pub label_settings: Res<'w, LabelSettings>,
    pub labels: Query<'w, 's, (Entity, &'static PartLabel, &'static LabelPlacement)>,
    pub select: MessageWriter<'w, SelectPart>,
    pub reset: MessageWriter<'w, ResetView>,
    pub preset: MessageWriter<'w, ApplyViewPreset>,
    pub toggle_labels: MessageWriter<'w, ToggleLabels>,
}

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<PendingOptions>()
            // Check URL parameters on startup
            .add_systems(Startup, check_url_parameters)
            .add_systems(Update, update_ui_layout)
            .add_systems(Update, apply_pending_options.in_set(ViewerSet::Input))
            // Main UI system runs in EguiPrimaryContextPass for proper input handling (bevy_egui 0.38+)
            .add_systems(EguiPrimaryContextPass, ui_system);
    }
}

/// URL options waiting for the parts to be spawned
#[derive(Resource, Default)]
pub struct PendingOptions(pub Option<ViewerOptions>);

/// What the start-up options resolve to against the loaded catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StartupPlan {
    pub preset: Option<ViewPreset>,
    pub labels_visible: bool,
    /// Catalogue index of the part to select
    pub select: Option<usize>,
}

impl StartupPlan {
    pub fn new(options: &ViewerOptions, catalogue: &Catalogue) -> Self {
        let select = options.preselect.as_deref().and_then(|name| {
            let index = catalogue.position_of(name);
            if index.is_none() {
                tracing::warn!("Ignoring unknown part '{}' in URL", name);
            }
            index
        });

        Self {
            preset: options.initial_view,
            labels_visible: options.labels_visible,
            select,
        }
    }
}

/// Check URL parameters on startup for ?view=, ?labels= and ?part=
#[allow(unused_variables, unused_mut)]
fn check_url_parameters(mut pending: ResMut<PendingOptions>) {
    #[cfg(target_arch = "wasm32")]
    {
        let window = match web_sys::window() {
            Some(w) => w,
            None => return,
        };

        let location = match window.location().href() {
            Ok(href) => href,
            Err(_) => return,
        };

        if let Ok(url) = web_sys::Url::new(&location) {
            let params = url.search_params();
            let pairs: Vec<(&str, String)> = ["view", "labels", "part"]
                .into_iter()
                .filter_map(|key| params.get(key).map(|value| (key, value)))
                .collect();

            if !pairs.is_empty() {
                tracing::info!("Applying {} URL parameter(s)", pairs.len());
                pending.0 = Some(ViewerOptions::from_query_pairs(pairs));
            }
        }
    }
}

/// Apply URL options once the part entities exist
fn apply_pending_options(
    mut pending: ResMut<PendingOptions>,
    catalogue: Res<PartCatalogue>,
    index: Res<PartIndex>,
    mut label_settings: ResMut<LabelSettings>,
    mut preset: MessageWriter<ApplyViewPreset>,
    mut select: MessageWriter<SelectPart>,
) {
    if pending.0.is_none() || index.0.is_empty() {
        return;
    }
    let Some(options) = pending.0.take() else {
        return;
    };

    let plan = StartupPlan::new(&options, &catalogue);

    if let Some(view) = plan.preset {
        preset.write(ApplyViewPreset(view));
    }
    label_settings.visible = plan.labels_visible;
    if let Some(entity) = plan.select.and_then(|i| index.entity(i)) {
        select.write(SelectPart(entity));
    }
}

fn update_ui_layout(
    windows: Query<&Window>,
    mut ui_layout: ResMut<UiLayout>,
) {
    if let Ok(window) = windows.single() {
        let width = window.width();
        let height = window.height();

        // Only update if dimensions changed significantly
        if (ui_layout.screen_width - width).abs() > 1.0
            || (ui_layout.screen_height - height).abs() > 1.0
        {
            ui_layout.update_from_window(width, height);
        }
    }
}

fn ui_system(mut params: UiParams) {
    let is_mobile = params.ui_layout.is_mobile;
    let ui_scale = params.ui_layout.ui_scale();
    let left_width = params.ui_layout.left_panel_width();
    let right_width = params.ui_layout.right_panel_width();

    // Get the egui context - early return if not available
    let Ok(ctx) = params.contexts.ctx_mut() else { return };

    // Mobile: toggle buttons at the bottom, one panel open at a time
    if is_mobile {
        egui::TopBottomPanel::bottom("mobile_toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                let menu_text = if params.ui_layout.show_left_panel { "☰ Parts" } else { "☰" };
                if ui.button(egui::RichText::new(menu_text).size(16.0 * ui_scale)).clicked() {
                    params.ui_layout.show_left_panel = !params.ui_layout.show_left_panel;
                    if params.ui_layout.show_left_panel {
                        params.ui_layout.show_right_panel = false;
                    }
                }

                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let info_text = if params.ui_layout.show_right_panel { "Info ✕" } else { "Info" };
                    if ui.button(egui::RichText::new(info_text).size(16.0 * ui_scale)).clicked() {
                        params.ui_layout.show_right_panel = !params.ui_layout.show_right_panel;
                        if params.ui_layout.show_right_panel {
                            params.ui_layout.show_left_panel = false;
                        }
                    }
                });
            });
        });
    }

    let mut clicked_part = None;

    // Part list and view controls (left side)
    if !is_mobile || params.ui_layout.show_left_panel {
        egui::SidePanel::left("parts_panel")
            .default_width(left_width)
            .resizable(!is_mobile)
            .show(ctx, |ui| {
                ui.heading(egui::RichText::new("Eye Parts").size(18.0 * ui_scale));
                ui.separator();

                egui::ScrollArea::vertical().show(ui, |ui| {
                    let parts = params
                        .index
                        .0
                        .iter()
                        .copied()
                        .zip(params.catalogue.parts().map(|p| p.name.as_str()));
                    clicked_part = render_part_list(
                        ui,
                        parts,
                        params.highlight.0.highlighted(),
                        &params.ui_layout,
                    );

                    ui.add_space(8.0);
                    ui.separator();

                    let actions = render_view_controls(
                        ui,
                        params.active_view.0,
                        params.label_settings.visible,
                        &params.ui_layout,
                    );
                    if actions.reset {
                        params.reset.write(ResetView);
                    }
                    if actions.toggle_labels {
                        params.toggle_labels.write(ToggleLabels);
                    }
                    if let Some(preset) = actions.preset {
                        params.preset.write(ApplyViewPreset(preset));
                    }
                });
            });
    }

    if let Some(entity) = clicked_part {
        params.select.write(SelectPart(entity));
        if is_mobile {
            params.ui_layout.show_left_panel = false;
            params.ui_layout.show_right_panel = true;
        }
    }

    // Info panel (right side)
    if !is_mobile || params.ui_layout.show_right_panel {
        egui::SidePanel::right("info_panel")
            .default_width(right_width)
            .resizable(!is_mobile)
            .show(ctx, |ui| {
                render_info_panel(ui, &params.info, &params.ui_layout);
            });
    }

    draw_labels(ctx, params.labels.iter(), &params.ui_layout);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_startup_plan() {
        let catalogue = Catalogue::builtin().unwrap();
        let options = ViewerOptions::from_query_pairs([
            ("view", "side"),
            ("labels", "off"),
            ("part", "lens"),
        ]);

        let plan = StartupPlan::new(&options, &catalogue);
        assert_eq!(plan.preset, Some(ViewPreset::Side));
        assert!(!plan.labels_visible);
        assert_eq!(plan.select, catalogue.position_of("Lens"));
        assert!(plan.select.is_some());
    }

    #[test]
    fn test_startup_plan_unknown_part() {
        let catalogue = Catalogue::builtin().unwrap();
        let options = ViewerOptions::from_query_pairs([("part", "Eyelid")]);

        let plan = StartupPlan::new(&options, &catalogue);
        assert_eq!(plan.select, None);
        assert_eq!(plan.preset, None);
        assert!(plan.labels_visible);
    }

    #[test]
    fn test_pending_options_wait_for_parts() {
        let mut app = App::new();
        app.insert_resource(PartCatalogue(Catalogue::builtin().unwrap()))
            .init_resource::<PartIndex>()
            .init_resource::<LabelSettings>()
            .insert_resource(PendingOptions(Some(ViewerOptions::from_query_pairs([(
                "labels", "off",
            )]))))
            .add_message::<ApplyViewPreset>()
            .add_message::<SelectPart>()
            .add_systems(Update, apply_pending_options);

        // No parts yet: options stay pending
        app.update();
        assert!(app.world().resource::<PendingOptions>().0.is_some());
        assert!(app.world().resource::<LabelSettings>().visible);

        let parts: Vec<Entity> = (0..10).map(|_| app.world_mut().spawn_empty().id()).collect();
        app.world_mut().resource_mut::<PartIndex>().0 = parts;
        app.update();

        assert!(app.world().resource::<PendingOptions>().0.is_none());
        assert!(!app.world().resource::<LabelSettings>().visible);
    }
}
