use std::collections::VecDeque;

use eframe::egui::{self, Align, Context, Key, Layout, RichText};

use crate::catalog::profile::{OWNER_NAME, OWNER_TITLE};
use crate::catalog::{Catalog, CatalogError};

use super::super::interaction::Interaction;
use super::super::physics::Simulation;
use super::super::scene::SceneGraph;
use super::super::scene::camera::OrbitCamera;
use super::super::{AppOptions, ViewModel};

impl ViewModel {
    pub(in crate::app) fn new(catalog: Catalog, options: AppOptions) -> Result<Self, CatalogError> {
        let simulation = Simulation::new(&catalog, options.layout_config(), options.seed)?;
        let snapshot = simulation.snapshot();
        let scene = SceneGraph::new(&catalog, &options.assets_root, options.seed);
        let camera = OrbitCamera::new(options.auto_rotate);

        Ok(Self {
            catalog,
            options,
            simulation,
            snapshot,
            scene,
            camera,
            interaction: Interaction::default(),
            started_at: None,
            live_physics: true,
            search: String::new(),
            search_match_cache: None,
            show_bio: true,
            show_fps_bar: true,
            fps_current: 0.0,
            fps_samples: VecDeque::new(),
            visible_node_count: 0,
            dragged_node: None,
        })
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context) {
        self.update_fps_counter(ctx);

        if ctx.input(|input| input.key_pressed(Key::Escape)) {
            self.interaction.close();
        }

        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading(OWNER_NAME);
                    ui.separator();
                    ui.label(RichText::new(OWNER_TITLE).monospace().small());
                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        ui.label(self.visible_graph_text());
                        if let Some(fps_text) = self.fps_display_text() {
                            ui.label(fps_text);
                        }
                    });
                });
            });

        egui::TopBottomPanel::bottom("contact_dock")
            .resizable(false)
            .show(ctx, |ui| self.draw_contact_dock(ui));

        egui::SidePanel::left("widgets")
            .resizable(true)
            .default_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .id_salt("widget_stack")
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        self.draw_signal_widget(ui);
                        ui.add_space(10.0);
                        self.draw_bio_widget(ui);
                        ui.add_space(10.0);
                        self.draw_controls(ui);
                    });
            });

        if self.interaction.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(420.0)
                .show(ctx, |ui| self.draw_details(ui));
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));

        ctx.request_repaint();
    }
}
