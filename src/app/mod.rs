use std::collections::{HashSet, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;

use eframe::egui::{self, Context};
use log::{error, info};

use crate::catalog::Catalog;

mod graph;
mod interaction;
mod physics;
mod render_utils;
mod scene;
mod ui;

use interaction::Interaction;
use physics::{LayoutConfig, LayoutSnapshot, Simulation};
use scene::SceneGraph;
use scene::camera::OrbitCamera;

/// Startup settings taken from the command line.
#[derive(Clone, Debug)]
pub struct AppOptions {
    pub assets_root: PathBuf,
    pub seed: u64,
    pub auto_rotate: bool,
    pub charge: Option<f32>,
    pub link_distance: Option<f32>,
}

impl AppOptions {
    /// Default layout with the command-line overrides applied.
    fn layout_config(&self) -> LayoutConfig {
        let defaults = LayoutConfig::default();
        LayoutConfig {
            charge_strength: self.charge.unwrap_or(defaults.charge_strength),
            link_distance: self.link_distance.unwrap_or(defaults.link_distance),
            ..defaults
        }
    }
}

pub struct PortfolioApp {
    state: AppState,
}

enum AppState {
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    catalog: Catalog,
    options: AppOptions,
    simulation: Simulation,
    snapshot: LayoutSnapshot,
    scene: SceneGraph,
    camera: OrbitCamera,
    interaction: Interaction,
    started_at: Option<f64>,
    live_physics: bool,
    search: String,
    search_match_cache: Option<SearchMatchCache>,
    show_bio: bool,
    show_fps_bar: bool,
    fps_current: f32,
    fps_samples: VecDeque<f32>,
    visible_node_count: usize,
    /// Node pinned under the pointer while it is being dragged.
    dragged_node: Option<usize>,
}

struct SearchMatchCache {
    query: String,
    matches: Arc<HashSet<usize>>,
}

impl PortfolioApp {
    pub fn new(cc: &eframe::CreationContext<'_>, catalog: Catalog, options: AppOptions) -> Self {
        egui_extras::install_image_loaders(&cc.egui_ctx);

        let state = match ViewModel::new(catalog, options) {
            Ok(model) => AppState::Ready(Box::new(model)),
            Err(error) => {
                error!("failed to start the layout: {error}");
                AppState::Error(error.to_string())
            }
        };

        Self { state }
    }
}

impl eframe::App for PortfolioApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        match &mut self.state {
            AppState::Ready(model) => model.show(ctx),
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to build the system graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                });
            }
        }
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let AppState::Ready(model) = &mut self.state {
            model.simulation.stop();
        }
        info!("shutting down");
    }
}
