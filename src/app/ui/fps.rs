use eframe::egui::Context;

use super::super::ViewModel;
use super::super::interaction::Phase;

impl ViewModel {
    pub(in crate::app) fn update_fps_counter(&mut self, ctx: &Context) {
        const FPS_SAMPLE_WINDOW: usize = 180;

        let dt = ctx.input(|input| input.stable_dt);
        if dt <= f32::EPSILON {
            return;
        }

        self.fps_current = (1.0 / dt).clamp(0.0, 1000.0);
        self.fps_samples.push_back(self.fps_current);
        while self.fps_samples.len() > FPS_SAMPLE_WINDOW {
            self.fps_samples.pop_front();
        }
    }

    pub(in crate::app) fn fps_display_text(&self) -> Option<String> {
        if !self.show_fps_bar {
            return None;
        }

        let mut parts = vec![format!("FPS {:.0}", self.fps_current)];
        if !self.fps_samples.is_empty() {
            let avg = self.fps_samples.iter().sum::<f32>() / self.fps_samples.len() as f32;
            parts.push(format!("avg {avg:.1}"));
        }
        if self.fps_current > f32::EPSILON {
            parts.push(format!("{:.1} ms", 1000.0 / self.fps_current));
        }

        Some(parts.join(" | "))
    }

    pub(in crate::app) fn visible_graph_text(&self) -> String {
        let state = if self.simulation.is_settled() {
            format!("settled after {} ticks", self.simulation.ticks())
        } else {
            format!("alpha {:.3}", self.simulation.alpha())
        };
        let mut text = format!(
            "nodes {} / {} in view | layout {state}",
            self.visible_node_count.min(self.simulation.len()),
            self.simulation.len(),
        );
        if let Some(focus) = self.focus_text() {
            text.push_str(" | ");
            text.push_str(&focus);
        }
        text
    }

    fn focus_text(&self) -> Option<String> {
        let label = |index: usize| {
            self.catalog
                .node(index)
                .map_or("?", |node| node.label.as_str())
                .to_owned()
        };
        match self.interaction.phase() {
            Phase::Idle => None,
            Phase::Hovered(index) => Some(format!("hover {}", label(index))),
            Phase::Selected(index) => Some(format!("open {}", label(index))),
            Phase::HoveredWhileSelected { hovered, selected } => Some(format!(
                "open {} | hover {}",
                label(selected),
                label(hovered)
            )),
        }
    }
}
