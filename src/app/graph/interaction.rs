use eframe::egui::{self, PointerButton, Pos2, Ui};

use super::super::ViewModel;
use super::super::scene::camera::Projected;
use super::super::scene::layout_delta;

/// Alpha kept while a node is dragged so its neighbours follow.
const DRAG_ALPHA: f32 = 0.3;

/// Index of the sphere under `pointer`, nearest to the camera when several
/// overlap. `radii` are world radii and are scaled by each projection.
pub(in crate::app) fn hit_test(
    pointer: Pos2,
    projected: &[Option<Projected>],
    radii: &[f32],
) -> Option<usize> {
    projected
        .iter()
        .zip(radii)
        .enumerate()
        .filter_map(|(index, (projection, radius))| {
            let projection = projection.as_ref()?;
            let screen_radius = radius * projection.scale;
            (projection.pos.distance(pointer) <= screen_radius).then_some((index, projection.depth))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _)| index)
}

impl ViewModel {
    /// Primary drag orbits the camera, or moves a node when it starts on one.
    /// Scroll zooms while the pointer is over the graph.
    pub(in crate::app) fn handle_graph_input(
        &mut self,
        ui: &Ui,
        response: &egui::Response,
        target: Option<usize>,
        projected: &[Option<Projected>],
    ) {
        if response.drag_started_by(PointerButton::Primary)
            && let Some(index) = target
            && let Some(position) = self.snapshot.get(index)
        {
            self.dragged_node = Some(index);
            self.simulation.pin(index, position);
        }

        if response.dragged_by(PointerButton::Primary) {
            let delta = response.drag_delta();
            match self.dragged_node {
                Some(index) => {
                    let scale = projected
                        .get(index)
                        .copied()
                        .flatten()
                        .map_or(1.0, |projection| projection.scale);
                    let moved = layout_delta(self.camera.screen_delta_to_world(delta, scale));
                    if let Some(position) = self.snapshot.get(index) {
                        let position = position + moved;
                        self.simulation.pin(index, position);
                        self.simulation.set_position(index, position);
                        self.simulation.warm(DRAG_ALPHA);
                    }
                }
                None => self.camera.drag(delta.x, delta.y),
            }
        }

        if response.drag_stopped()
            && let Some(index) = self.dragged_node.take()
        {
            self.simulation.unpin(index);
        }

        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() > f32::EPSILON {
            self.camera.zoom(scroll);
        }
    }
}
