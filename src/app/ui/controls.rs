use std::collections::HashSet;
use std::sync::Arc;

use eframe::egui::{self, Key, Response, RichText, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::catalog::Catalog;

use super::super::{SearchMatchCache, ViewModel};

const SLIDER_KEY_BASE_RATE: f32 = 10.0;
const SLIDER_KEY_ACCEL_PER_SEC: f32 = 9.0;
const SLIDER_KEY_ACCEL_MAX: f32 = 40.0;

#[derive(Clone, Copy, Default)]
struct SliderKeyHoldState {
    positive_secs: f32,
    negative_secs: f32,
}

fn slider_key_accel_multiplier(hold_secs: f32) -> f32 {
    let ramp = hold_secs * SLIDER_KEY_ACCEL_PER_SEC;
    (1.0 + ramp + ramp * ramp * 0.15).min(SLIDER_KEY_ACCEL_MAX)
}

fn default_slider_key_step(min: f32, max: f32) -> f32 {
    ((max - min) / 200.0).max(0.0005)
}

/// Arrow keys nudge a focused slider, faster the longer they are held.
fn apply_slider_arrow_acceleration(
    ui: &Ui,
    response: &Response,
    value: &mut f32,
    min: f32,
    max: f32,
) -> bool {
    let state_id = response.id.with("arrow_key_hold_state");
    let mut hold_state = ui.ctx().data(|data| {
        data.get_temp::<SliderKeyHoldState>(state_id)
            .unwrap_or_default()
    });

    if !response.has_focus() {
        ui.ctx()
            .data_mut(|data| data.insert_temp(state_id, SliderKeyHoldState::default()));
        return false;
    }

    let (delta_time, increase_down, decrease_down) = ui.input(|input| {
        (
            input.stable_dt.min(0.1),
            input.key_down(Key::ArrowRight) || input.key_down(Key::ArrowUp),
            input.key_down(Key::ArrowLeft) || input.key_down(Key::ArrowDown),
        )
    });

    hold_state.positive_secs = if increase_down {
        hold_state.positive_secs + delta_time
    } else {
        0.0
    };
    hold_state.negative_secs = if decrease_down {
        hold_state.negative_secs + delta_time
    } else {
        0.0
    };
    ui.ctx()
        .data_mut(|data| data.insert_temp(state_id, hold_state));

    let direction = (increase_down as i8) - (decrease_down as i8);
    if direction == 0 {
        return false;
    }

    let hold_secs = if direction > 0 {
        hold_state.positive_secs
    } else {
        hold_state.negative_secs
    };
    let speed = SLIDER_KEY_BASE_RATE * slider_key_accel_multiplier(hold_secs);
    let delta = direction as f32 * default_slider_key_step(min, max) * speed * delta_time;

    let old_value = *value;
    *value = (*value + delta).clamp(min, max);
    (*value - old_value).abs() > f32::EPSILON
}

fn layout_slider(
    ui: &mut Ui,
    value: &mut f32,
    range: std::ops::RangeInclusive<f32>,
    text: &str,
    hint: &str,
) -> bool {
    let (min, max) = (*range.start(), *range.end());
    let response = ui
        .add(
            egui::Slider::new(&mut *value, range)
                .text(text)
                .clamping(egui::SliderClamping::Always),
        )
        .on_hover_text(hint);
    if response.hovered() {
        response.request_focus();
    }
    let mut changed = response.changed();
    changed |= apply_slider_arrow_acceleration(ui, &response, value, min, max);
    changed
}

pub(in crate::app) fn fuzzy_match_score(
    matcher: &SkimMatcherV2,
    text: &str,
    query: &str,
) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_lowercase(), &query.to_lowercase()))
}

/// Indices of nodes whose label, id or any tag fuzzy-matches `query`.
pub(in crate::app) fn search_matches(catalog: &Catalog, query: &str) -> HashSet<usize> {
    let query = query.trim();
    if query.is_empty() {
        return HashSet::new();
    }

    let matcher = SkimMatcherV2::default();
    catalog
        .nodes()
        .iter()
        .enumerate()
        .filter(|(_, node)| {
            fuzzy_match_score(&matcher, &node.label, query).is_some()
                || fuzzy_match_score(&matcher, &node.id, query).is_some()
                || node
                    .tags
                    .iter()
                    .any(|tag| fuzzy_match_score(&matcher, tag, query).is_some())
        })
        .map(|(index, _)| index)
        .collect()
}

impl ViewModel {
    pub(in crate::app) fn cached_search_matches(&mut self) -> Option<Arc<HashSet<usize>>> {
        let query = self.search.trim();
        if query.is_empty() {
            return None;
        }

        if let Some(cached) = &self.search_match_cache
            && cached.query == query
        {
            return Some(Arc::clone(&cached.matches));
        }

        let matches = Arc::new(search_matches(&self.catalog, query));
        self.search_match_cache = Some(SearchMatchCache {
            query: query.to_owned(),
            matches: Arc::clone(&matches),
        });
        Some(matches)
    }

    pub(in crate::app) fn draw_controls(&mut self, ui: &mut Ui) {
        ui.label(RichText::new("GRAPH CONTROLS").monospace().strong());
        ui.add_space(4.0);

        ui.label("Search")
            .on_hover_text("Fuzzy-highlight nodes by label, id or tag.");
        ui.text_edit_singleline(&mut self.search)
            .on_hover_text("Matching nodes get a highlight ring; click one to open it.");

        let match_count = self
            .cached_search_matches()
            .map(|matches| matches.len())
            .unwrap_or(0);
        if !self.search.trim().is_empty() {
            ui.small(format!("{match_count} matching nodes"));
        }

        ui.add_space(4.0);
        let mut auto_rotate = self.camera.auto_rotate();
        if ui
            .checkbox(&mut auto_rotate, "Auto-rotate camera")
            .on_hover_text("Pauses by itself while a node is hovered.")
            .changed()
        {
            self.camera.set_auto_rotate(auto_rotate);
        }
        ui.checkbox(&mut self.live_physics, "Live layout simulation");
        ui.checkbox(&mut self.show_fps_bar, "FPS display");

        ui.collapsing("Layout tuning", |ui| {
            let mut layout = self.simulation.config();
            let mut changed = false;

            changed |= layout_slider(
                ui,
                &mut layout.charge_strength,
                -900.0..=-50.0,
                "Charge",
                "Many-body strength. More negative pushes nodes further apart.",
            );
            changed |= layout_slider(
                ui,
                &mut layout.link_distance,
                30.0..=250.0,
                "Link distance",
                "Rest length of every link spring.",
            );
            changed |= layout_slider(
                ui,
                &mut layout.collide_strength,
                0.0..=1.0,
                "Collision",
                "How much of an overlap is resolved per tick.",
            );
            changed |= layout_slider(
                ui,
                &mut layout.cluster_strength,
                0.0..=0.1,
                "Type clustering",
                "Pull toward each type's quadrant while the layout is hot.",
            );
            changed |= layout_slider(
                ui,
                &mut layout.center_strength,
                0.0..=1.0,
                "Centering",
                "Fraction of the centroid offset removed each tick.",
            );
            changed |= layout_slider(
                ui,
                &mut layout.velocity_decay,
                0.05..=0.9,
                "Velocity decay",
                "Friction applied during integration.",
            );

            if changed {
                self.simulation.reconfigure(layout);
            }

            ui.horizontal(|ui| {
                if ui.button("Reheat").clicked() {
                    self.simulation.reheat();
                }
                if ui
                    .button("Defaults")
                    .on_hover_text("Startup values, including command-line overrides.")
                    .clicked()
                {
                    self.simulation.reconfigure(self.options.layout_config());
                }
            });
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_matches_labels_ids_and_tags() {
        let catalog = Catalog::embedded().expect("embedded catalog");
        assert!(search_matches(&catalog, "   ").is_empty());

        let github = catalog.index_of("sys-github").expect("github");
        assert!(search_matches(&catalog, "github").contains(&github));

        let cod = catalog.index_of("thought-cod").expect("cod");
        assert!(search_matches(&catalog, "identity").contains(&cod));

        assert!(search_matches(&catalog, "zzqxv").is_empty());
    }

    #[test]
    fn accel_grows_with_hold_time_and_caps() {
        assert_eq!(slider_key_accel_multiplier(0.0), 1.0);
        assert!(slider_key_accel_multiplier(0.5) > slider_key_accel_multiplier(0.1));
        assert_eq!(slider_key_accel_multiplier(100.0), SLIDER_KEY_ACCEL_MAX);
    }
}
