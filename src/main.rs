mod app;
mod catalog;
mod layout;
mod util;

use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{info, warn};

use catalog::Catalog;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Catalog JSON to load instead of the built-in one.
    #[arg(long)]
    catalog: Option<PathBuf>,
    /// Directory that node image paths are resolved against.
    #[arg(long, default_value = "public")]
    assets: PathBuf,
    /// Seed for layout jiggle, node spin and the star field.
    #[arg(long, default_value_t = 7)]
    seed: u64,
    /// Many-body strength override (negative repels).
    #[arg(long, allow_hyphen_values = true)]
    charge: Option<f32>,
    #[arg(long)]
    link_distance: Option<f32>,
    #[arg(long)]
    no_auto_rotate: bool,
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::load(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => Catalog::embedded().context("built-in catalog is invalid"),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("system_graph=info"))
        .init();

    let args = Args::parse();
    let catalog = load_catalog(args.catalog.as_ref())?;
    info!(
        "loaded {} nodes and {} links",
        catalog.len(),
        catalog.links().len()
    );
    if catalog.is_empty() {
        warn!("catalog has no nodes; the graph will be empty");
    }

    info!("resolving node images against {}", args.assets.display());

    let options = app::AppOptions {
        assets_root: args.assets,
        seed: args.seed,
        auto_rotate: !args.no_auto_rotate,
        charge: args.charge,
        link_distance: args.link_distance,
    };
    let native_options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 920.0])
            .with_title("System Graph"),
        ..Default::default()
    };

    eframe::run_native(
        "system-graph",
        native_options,
        Box::new(move |cc| Ok(Box::new(app::PortfolioApp::new(cc, catalog, options)))),
    )
    .map_err(|error| anyhow!("failed to start the window: {error}"))
}
