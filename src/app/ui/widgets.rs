use eframe::egui::{self, Align2, Color32, FontId, Painter, Rect, RichText, Ui, vec2};

use crate::catalog::profile::{
    AVAILABILITY, BIO_SECTIONS, CONTACT_LINKS, INTRO_SUBTITLE, OWNER_NAME, TAGLINE,
};
use crate::catalog::signal::{date_stamp, today, todays_signal};

use super::super::ViewModel;
use super::super::render_utils::{ACCENT, with_alpha};

const INTRO_SECONDS: f32 = 3.0;
const INTRO_FADE_SECONDS: f32 = 1.0;
const AVAILABLE: Color32 = Color32::from_rgb(16, 185, 129);

/// Opacity of the intro title `elapsed` seconds after start: fully shown for
/// three seconds, then fading out over one.
pub(in crate::app) fn intro_opacity(elapsed: f32) -> f32 {
    if elapsed <= INTRO_SECONDS {
        1.0
    } else {
        (1.0 - (elapsed - INTRO_SECONDS) / INTRO_FADE_SECONDS).clamp(0.0, 1.0)
    }
}

impl ViewModel {
    pub(in crate::app) fn draw_intro(&self, painter: &Painter, rect: Rect, elapsed: f32) {
        let opacity = intro_opacity(elapsed);
        if opacity <= 0.0 {
            return;
        }

        let center = rect.center();
        painter.text(
            center - vec2(0.0, 18.0),
            Align2::CENTER_CENTER,
            OWNER_NAME.to_uppercase(),
            FontId::proportional(40.0),
            with_alpha(Color32::WHITE, opacity),
        );
        painter.text(
            center + vec2(0.0, 26.0),
            Align2::CENTER_CENTER,
            INTRO_SUBTITLE,
            FontId::monospace(14.0),
            with_alpha(Color32::from_rgb(100, 116, 139), opacity),
        );
    }

    pub(in crate::app) fn draw_tagline(&self, painter: &Painter, rect: Rect) {
        painter.text(
            rect.center_top() + vec2(0.0, 18.0),
            Align2::CENTER_TOP,
            format!("\"{TAGLINE}\""),
            FontId::proportional(12.0),
            with_alpha(Color32::from_rgb(148, 163, 184), 0.4),
        );
    }

    pub(in crate::app) fn draw_signal_widget(&self, ui: &mut Ui) {
        let signal = todays_signal();

        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("DAILY SIGNAL").monospace().small().color(ACCENT));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(RichText::new(date_stamp(today())).monospace().small().weak());
                });
            });
            ui.add_space(6.0);
            ui.label(RichText::new(format!("\"{}\"", signal.text)).italics());
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                ui.label(RichText::new(format!("// {}", signal.author)).monospace().small());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(
                        RichText::new("TRANSMISSION_RECEIVED")
                            .monospace()
                            .small()
                            .color(ACCENT),
                    );
                });
            });
        });
    }

    pub(in crate::app) fn draw_bio_widget(&mut self, ui: &mut Ui) {
        egui::Frame::group(ui.style()).show(ui, |ui| {
            ui.set_width(ui.available_width());
            ui.horizontal(|ui| {
                ui.label(RichText::new("IDENTITY LOG").monospace().strong());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    let toggle = if self.show_bio { "collapse" } else { "expand" };
                    if ui.small_button(toggle).clicked() {
                        self.show_bio = !self.show_bio;
                    }
                });
            });

            if !self.show_bio {
                return;
            }

            for section in BIO_SECTIONS {
                ui.add_space(6.0);
                ui.label(RichText::new(section.title.to_uppercase()).monospace().small().weak());
                for row in section.rows {
                    ui.label(RichText::new(row.label).small().weak());
                    ui.label(RichText::new(row.value).strong());
                }
                for bullet in section.bullets {
                    ui.label(format!("- {bullet}"));
                }
                if !section.tags.is_empty() {
                    ui.horizontal_wrapped(|ui| {
                        for tag in section.tags {
                            ui.label(RichText::new(*tag).monospace().small());
                        }
                    });
                }
            }

            ui.add_space(6.0);
            ui.label(RichText::new("END_OF_LOG").monospace().small().weak());
        });
    }

    pub(in crate::app) fn draw_contact_dock(&self, ui: &mut Ui) {
        ui.horizontal(|ui| {
            for contact in CONTACT_LINKS {
                ui.hyperlink_to(format!("{}: {}", contact.label, contact.value), contact.href);
                ui.separator();
            }
            ui.label(RichText::new("STATUS").monospace().small().weak());
            ui.label(RichText::new(AVAILABILITY).monospace().strong().color(AVAILABLE));
        });
    }
}
