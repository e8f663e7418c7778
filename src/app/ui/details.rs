use chrono::Datelike;
use eframe::egui::{self, Color32, OpenUrl, RichText, Ui};

use crate::catalog::signal::today;
use crate::catalog::{CatalogNode, NodeKind};
use crate::util::{forks_estimate, sys_id};

use super::super::ViewModel;
use super::super::render_utils::kind_color;

/// What the overlay is allowed to do back to the app.
enum DetailsAction {
    Close,
    OpenExternal(String),
}

fn draw_project_card(ui: &mut Ui, node: &CatalogNode, color: Color32) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.horizontal(|ui| {
            ui.label(RichText::new("REPOSITORY").monospace().small().color(color));
            if let Some(stars) = node.stars {
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(format!("forks {}", forks_estimate(stars))).monospace());
                    ui.label(RichText::new(format!("stars {stars}")).monospace());
                });
            }
        });
        ui.add_space(4.0);
        ui.label(RichText::new(&node.label).size(20.0).strong());
        ui.label(&node.description);
        ui.separator();
        ui.horizontal(|ui| {
            if let Some(language) = &node.language {
                ui.label(RichText::new(language).monospace().small());
            }
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(RichText::new("PUBLIC ACCESS").monospace().small().weak());
            });
        });
    });
}

fn draw_article_card(ui: &mut Ui, node: &CatalogNode) {
    egui::Frame::group(ui.style()).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(RichText::new("THOUGHT STREAM").monospace().small().weak());
        ui.add_space(4.0);
        ui.label(RichText::new(&node.label).size(20.0));
        ui.horizontal(|ui| {
            if let Some(read_time) = &node.read_time {
                ui.label(RichText::new(read_time).monospace().small());
                ui.label(RichText::new("·").weak());
            }
            let stamp = node
                .date
                .clone()
                .unwrap_or_else(|| today().year().to_string());
            ui.label(RichText::new(stamp).monospace().small());
        });
        ui.add_space(4.0);
        ui.label(RichText::new(&node.description).italics());
    });
}

fn draw_generic_header(ui: &mut Ui, node: &CatalogNode, color: Color32) {
    ui.label(RichText::new(node.kind.label()).monospace().color(color));
    ui.label(RichText::new(&node.label).size(26.0));
    ui.add_space(8.0);
    ui.label(RichText::new(&node.description).size(15.0));
}

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(node) = self
            .interaction
            .selected()
            .and_then(|index| self.catalog.node(index))
        else {
            ui.label("Select a node in the graph.");
            return;
        };

        let color = kind_color(node.kind);
        let mut action = None;

        ui.horizontal(|ui| {
            ui.vertical(|ui| {
                ui.label(
                    RichText::new(format!("SYS.ID: {}", sys_id(&node.id)))
                        .monospace()
                        .small()
                        .weak(),
                );
                ui.label(RichText::new(node.kind.label()).monospace().color(color));
            });
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Min), |ui| {
                if ui.button("Close").on_hover_text("Esc").clicked() {
                    action = Some(DetailsAction::Close);
                }
            });
        });
        ui.separator();

        egui::ScrollArea::vertical()
            .id_salt("details_scroll")
            .auto_shrink([false, false])
            .show(ui, |ui| {
                match node.kind {
                    kind if kind.is_project() => draw_project_card(ui, node, color),
                    NodeKind::Thought => draw_article_card(ui, node),
                    _ => draw_generic_header(ui, node, color),
                }

                if let Some(content) = &node.content {
                    ui.add_space(10.0);
                    ui.label(RichText::new("EXTENDED DATA").monospace().small().weak());
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(content);
                    });
                }

                if !node.tags.is_empty() {
                    ui.add_space(10.0);
                    ui.label(RichText::new("SEMANTIC TAGS").monospace().small().weak());
                    ui.horizontal_wrapped(|ui| {
                        for tag in &node.tags {
                            ui.label(RichText::new(format!("#{tag}")).monospace().color(color));
                        }
                    });
                }

                if let Some(url) = &node.url {
                    ui.add_space(14.0);
                    if ui
                        .button("Open External Resource")
                        .on_hover_text(url.as_str())
                        .clicked()
                    {
                        action = Some(DetailsAction::OpenExternal(url.clone()));
                    }
                }
            });

        match action {
            Some(DetailsAction::Close) => self.interaction.close(),
            Some(DetailsAction::OpenExternal(url)) => {
                ui.ctx().open_url(OpenUrl::new_tab(url));
            }
            None => {}
        }
    }
}
