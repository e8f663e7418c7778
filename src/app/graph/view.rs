use std::collections::HashSet;

use eframe::egui::epaint::Vertex;
use eframe::egui::{
    self, Align2, Color32, FontId, Mesh, Painter, PointerButton, Pos2, Rect, Sense, Shape, Stroke,
    TextureId, Ui, pos2, vec2,
};
use glam::{Quat, Vec3};

use crate::catalog::NodeKind;

use super::super::ViewModel;
use super::super::render_utils::{
    ACCENT, blend_color, circle_visible, dim_color, draw_background, fog_amount, fogged,
    kind_color, with_alpha,
};
use super::super::scene::camera::Projected;
use super::super::scene::texture::{EguiTextures, SurfaceFill};
use super::super::scene::{Glow, GlowOrientation, LabelStyle, SceneNode, Surface};
use super::interaction::hit_test;

const SEARCH_MATCH: Color32 = Color32::from_rgb(103, 196, 255);
const LABEL_WIDTH: f32 = 230.0;
const DISC_SEGMENTS: usize = 40;
const RING_SEGMENTS: usize = 48;

/// Unit great circle through the local poles, turned `phase` around y.
fn meridian_point(phase: f32, t: f32) -> Vec3 {
    Vec3::new(t.cos() * phase.cos(), t.sin(), t.cos() * phase.sin())
}

fn textured_disc(painter: &Painter, center: Pos2, radius: f32, texture: TextureId, spin: f32, tint: Color32) {
    let mut mesh = Mesh::with_texture(texture);
    mesh.vertices.push(Vertex {
        pos: center,
        uv: pos2(0.5, 0.5),
        color: tint,
    });

    for step in 0..=DISC_SEGMENTS {
        let angle = step as f32 / DISC_SEGMENTS as f32 * std::f32::consts::TAU;
        let (sin, cos) = angle.sin_cos();
        let (uv_sin, uv_cos) = (angle + spin).sin_cos();
        mesh.vertices.push(Vertex {
            pos: center + vec2(cos, sin) * radius,
            uv: pos2(0.5 + uv_cos * 0.5, 0.5 + uv_sin * 0.5),
            color: tint,
        });
    }
    for step in 1..=DISC_SEGMENTS as u32 {
        mesh.add_triangle(0, step, step + 1);
    }

    painter.add(Shape::mesh(mesh));
}

fn draw_facets(painter: &Painter, center: Pos2, radius: f32, color: Color32, spin: f32) {
    const FACETS: usize = 7;
    for facet in 0..FACETS {
        let start = spin + facet as f32 / FACETS as f32 * std::f32::consts::TAU;
        let end = start + std::f32::consts::TAU / FACETS as f32;
        let shade = if facet % 2 == 0 { 0.95 } else { 0.7 };
        painter.add(Shape::convex_polygon(
            vec![
                center,
                center + vec2(start.cos(), start.sin()) * radius,
                center + vec2(end.cos(), end.sin()) * radius,
            ],
            dim_color(color, shade),
            Stroke::NONE,
        ));
    }
}

/// Surface lines that make the spin visible on flat-colored spheres.
fn draw_meridians(painter: &Painter, center: Pos2, radius: f32, orientation: Quat, color: Color32) {
    let stroke = Stroke::new(1.0, with_alpha(color, 0.35));
    for phase in [0.0, std::f32::consts::FRAC_PI_2] {
        let mut previous: Option<Vec3> = None;
        for step in 0..=RING_SEGMENTS {
            let t = step as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
            let point = orientation * meridian_point(phase, t);
            if let Some(last) = previous
                && last.z > 0.0
                && point.z > 0.0
            {
                painter.line_segment(
                    [
                        center + vec2(last.x, -last.y) * radius,
                        center + vec2(point.x, -point.y) * radius,
                    ],
                    stroke,
                );
            }
            previous = Some(point);
        }
    }
}

impl ViewModel {
    fn elapsed_seconds(&mut self, now: f64) -> f32 {
        let started = *self.started_at.get_or_insert(now);
        (now - started) as f32
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        let (now, dt) = ui.input(|input| (input.time, input.stable_dt.clamp(1.0 / 240.0, 1.0 / 20.0)));
        let elapsed = self.elapsed_seconds(now);

        if self.live_physics && self.simulation.is_running() && !self.simulation.is_settled() {
            self.simulation.tick();
        }
        self.snapshot = self.simulation.snapshot();
        self.scene.advance(&self.snapshot, elapsed);
        let mut textures = EguiTextures { ctx: ui.ctx() };
        self.scene.resolve_textures(&mut textures, &self.catalog);

        let radii = self
            .scene
            .nodes()
            .iter()
            .map(|node| node.radius)
            .collect::<Vec<_>>();
        let projected = self.project_nodes(rect);

        let target = match self.dragged_node {
            Some(index) => Some(index),
            None if response.hovered() => ui
                .input(|input| input.pointer.hover_pos())
                .and_then(|pointer| hit_test(pointer, &projected, &radii)),
            None => None,
        };
        self.interaction.pointer_target(target);
        if target.is_some() {
            ui.ctx().set_cursor_icon(if self.dragged_node.is_some() {
                egui::CursorIcon::Grabbing
            } else {
                egui::CursorIcon::PointingHand
            });
        }
        if response.clicked_by(PointerButton::Primary)
            && let Some(index) = target
        {
            self.interaction.click(index);
        }

        self.handle_graph_input(ui, &response, target, &projected);
        self.camera.update(dt, self.interaction.auto_rotate_allowed());

        draw_background(&painter, rect);
        self.draw_stars(&painter, rect);

        let projected = self.project_nodes(rect);
        let matches = self.cached_search_matches();

        let mut draw_order = projected
            .iter()
            .enumerate()
            .filter_map(|(index, projection)| projection.map(|projection| (index, projection)))
            .collect::<Vec<_>>();
        draw_order.sort_by(|a, b| b.1.depth.total_cmp(&a.1.depth));
        self.visible_node_count = draw_order
            .iter()
            .filter(|(index, projection)| {
                circle_visible(rect, projection.pos, radii[*index] * projection.scale)
            })
            .count();

        let mut selection_animating = false;
        for &(index, projection) in &draw_order {
            selection_animating |=
                self.draw_node(ui, &painter, index, projection, elapsed, matches.as_deref());
        }
        for &(index, _) in &draw_order {
            self.draw_label(&painter, rect, index);
        }

        self.draw_legend(&painter, rect);
        self.draw_tagline(&painter, rect);
        self.draw_intro(&painter, rect, elapsed);

        if selection_animating {
            ui.ctx().request_repaint();
        }
    }

    fn project_nodes(&self, rect: Rect) -> Vec<Option<Projected>> {
        self.scene
            .nodes()
            .iter()
            .map(|node| self.camera.project(node.position, rect))
            .collect()
    }

    fn draw_stars(&self, painter: &Painter, rect: Rect) {
        for star in self.scene.stars() {
            let Some(projection) = self.camera.project(star.position, rect) else {
                continue;
            };
            if !rect.contains(projection.pos) {
                continue;
            }
            let alpha = star.brightness * (1.0 - fog_amount(projection.depth) * 0.5);
            painter.circle_filled(
                projection.pos,
                0.6 + star.brightness * 0.8,
                with_alpha(Color32::WHITE, alpha),
            );
        }
    }

    /// Returns whether the selection halo is still animating.
    fn draw_node(
        &self,
        ui: &Ui,
        painter: &Painter,
        index: usize,
        projection: Projected,
        elapsed: f32,
        matches: Option<&HashSet<usize>>,
    ) -> bool {
        let Some(node) = self.scene.node(index) else {
            return false;
        };

        let hovered = self.interaction.is_hovered(index);
        let selected = self.interaction.is_selected(index);
        let radius = (node.radius * projection.scale).max(1.5);
        let center = projection.pos;
        let search_active = matches.is_some_and(|matches| !matches.is_empty());
        let is_match = matches.is_some_and(|matches| matches.contains(&index));

        if let Some(glow) = self.scene.glow(index, hovered, elapsed) {
            self.draw_glow(painter, node, glow, projection);
        }

        let ring = node.has_ring.then(|| self.ring_points(node, painter.clip_rect()));
        if let Some(points) = &ring {
            draw_ring_half(painter, points, projection.depth, true, node.kind);
        }

        let fill = node.texture.fill(node.kind);
        let mut base = match fill {
            SurfaceFill::Flat(color) => color,
            SurfaceFill::Textured(_) => Color32::WHITE,
        };
        if node.is_core {
            base = blend_color(base, Color32::WHITE, 0.35);
        }
        let emissive = if hovered { 0.8 } else { 0.2 };
        let mut color = blend_color(dim_color(base, 0.55), base, 0.4 + emissive * 0.6);
        if search_active && !is_match {
            color = dim_color(color, 0.38);
        }
        let color = fogged(color, projection.depth);

        match (fill, node.surface) {
            (SurfaceFill::Textured(texture), _) => {
                textured_disc(painter, center, radius, texture, node.spin, color);
            }
            (SurfaceFill::Flat(_), Surface::Unlit) => {
                painter.circle_filled(center, radius, color);
            }
            (SurfaceFill::Flat(_), Surface::Faceted) => {
                draw_facets(painter, center, radius, color, node.spin);
            }
            (SurfaceFill::Flat(_), surface) => {
                painter.circle_filled(center, radius, dim_color(color, 0.8));
                painter.circle_filled(
                    center - vec2(radius, radius) * 0.22,
                    radius * 0.68,
                    blend_color(color, Color32::WHITE, 0.08),
                );
                if surface == Surface::Glossy {
                    painter.circle_filled(
                        center - vec2(radius * 0.36, radius * 0.42),
                        radius * 0.16,
                        with_alpha(Color32::WHITE, 0.7 * (1.0 - fog_amount(projection.depth))),
                    );
                }
            }
        }

        if node.surface != Surface::Unlit && radius > 4.0 {
            draw_meridians(painter, center, radius, node.orientation(), color);
        }

        if let Some(points) = &ring {
            draw_ring_half(painter, points, projection.depth, false, node.kind);
        }

        if is_match {
            painter.circle_stroke(center, radius + 3.0, Stroke::new(1.6, SEARCH_MATCH));
        }

        let selection_mix = ui.ctx().animate_bool(
            ui.make_persistent_id(("node-selection", index)),
            selected,
        );
        if selection_mix > 0.0 {
            let halo_strength = (selection_mix * (1.0 - selection_mix) * 4.0).clamp(0.0, 1.0);
            painter.circle_stroke(
                center,
                radius + 5.0 + ((1.0 - selection_mix) * 6.0),
                Stroke::new(
                    1.2 + halo_strength * 1.6,
                    with_alpha(ACCENT, 0.35 + selection_mix * 0.5),
                ),
            );
        }

        selection_mix > 0.0 && selection_mix < 1.0
    }

    fn draw_glow(&self, painter: &Painter, node: &SceneNode, glow: Glow, projection: Projected) {
        let radius = glow.radius * projection.scale;
        let base = if node.is_core {
            Color32::WHITE
        } else {
            kind_color(node.kind)
        };
        let color = with_alpha(fogged(base, projection.depth), glow.opacity);
        let center = projection.pos;

        match glow.orientation {
            GlowOrientation::FacingCamera => {
                let stroke = Stroke::new(1.0, with_alpha(color, glow.opacity * 3.0));
                painter.circle_stroke(center, radius, stroke);
                if glow.wireframe {
                    for squash in [0.35, 0.7] {
                        painter.add(Shape::ellipse_stroke(
                            center,
                            vec2(radius * squash, radius),
                            stroke,
                        ));
                        painter.add(Shape::ellipse_stroke(
                            center,
                            vec2(radius, radius * squash),
                            stroke,
                        ));
                    }
                }
            }
            GlowOrientation::Spinning { yaw, roll } => {
                painter.circle_filled(center, radius, color);
                let orientation = Quat::from_rotation_y(yaw) * Quat::from_rotation_z(roll);
                draw_meridians(
                    painter,
                    center,
                    radius,
                    orientation,
                    with_alpha(Color32::WHITE, 0.5),
                );
            }
        }
    }

    fn ring_points(&self, node: &SceneNode, rect: Rect) -> Vec<Projected> {
        let tilt = Quat::from_rotation_x(1.15) * Quat::from_rotation_z(0.35);
        (0..=RING_SEGMENTS)
            .filter_map(|step| {
                let angle = step as f32 / RING_SEGMENTS as f32 * std::f32::consts::TAU;
                let local = Vec3::new(angle.cos(), 0.0, angle.sin()) * node.radius * 1.7;
                self.camera.project(node.position + tilt * local, rect)
            })
            .collect()
    }

    fn draw_label(&self, painter: &Painter, rect: Rect, index: usize) {
        let (Some(node), Some(entry)) = (self.scene.node(index), self.catalog.node(index)) else {
            return;
        };
        let Some(anchor) = self
            .camera
            .project(node.position + Vec3::Y * node.label_lift(), rect)
        else {
            return;
        };

        let hovered = self.interaction.is_hovered(index);
        let style = LabelStyle::for_hover(hovered);
        let opacity = style.opacity * (1.0 - fog_amount(anchor.depth) * 0.7);
        let accent = kind_color(node.kind);
        let width = LABEL_WIDTH * style.scale;
        let padding = 8.0 * style.scale;
        let text_width = width - padding * 2.0;

        let kind_line = painter.layout_no_wrap(
            format!("{} NODE", node.kind.label()),
            FontId::monospace(9.0 * style.scale),
            with_alpha(Color32::from_rgb(148, 163, 184), opacity * 0.8),
        );
        let title = painter.layout(
            entry.label.clone(),
            FontId::proportional(14.0 * style.scale),
            with_alpha(if hovered { Color32::WHITE } else { accent }, opacity),
            text_width - 12.0,
        );
        let description = painter.layout(
            entry.description.clone(),
            FontId::proportional(11.0 * style.scale),
            with_alpha(Color32::from_rgb(203, 213, 225), opacity),
            text_width,
        );
        let footer = style.show_footer.then(|| {
            (
                painter.layout_no_wrap(
                    "INTERACTIVE".to_owned(),
                    FontId::monospace(9.0 * style.scale),
                    with_alpha(Color32::from_rgb(100, 116, 139), opacity),
                ),
                painter.layout_no_wrap(
                    "CLICK_TO_ACCESS".to_owned(),
                    FontId::monospace(9.0 * style.scale),
                    with_alpha(ACCENT, opacity),
                ),
            )
        });

        let header_height = kind_line.size().y + title.size().y + padding;
        let footer_height = footer
            .as_ref()
            .map_or(0.0, |(left, _)| left.size().y + padding);
        let height = padding * 2.0 + header_height + description.size().y + footer_height;
        let card = Rect::from_min_size(anchor.pos - vec2(width * 0.5, height), vec2(width, height));
        if !rect.intersects(card) {
            return;
        }

        let (fill, stroke) = if style.emphasized {
            (
                with_alpha(Color32::from_rgb(15, 23, 42), 0.95 * opacity),
                Stroke::new(1.0, with_alpha(ACCENT, 0.8 * opacity)),
            )
        } else {
            (
                with_alpha(Color32::from_rgb(15, 23, 42), 0.5 * opacity),
                Stroke::new(1.0, with_alpha(Color32::from_rgb(51, 65, 85), 0.4 * opacity)),
            )
        };
        painter.rect(card, 6.0, fill, stroke, egui::StrokeKind::Inside);

        let mut cursor = card.min + vec2(padding, padding);
        let kind_height = kind_line.size().y;
        painter.galley(cursor, kind_line, Color32::WHITE);
        cursor.y += kind_height;
        let title_height = title.size().y;
        painter.galley(cursor, title, Color32::WHITE);
        painter.circle_filled(
            pos2(card.right() - padding - 3.0, cursor.y + title_height * 0.5),
            3.0,
            with_alpha(accent, opacity),
        );
        cursor.y += title_height + padding;

        let description_height = description.size().y;
        painter.galley(cursor, description, Color32::WHITE);
        cursor.y += description_height + padding * 0.5;

        if let Some((left, right)) = footer {
            painter.line_segment(
                [pos2(card.left() + padding, cursor.y), pos2(card.right() - padding, cursor.y)],
                Stroke::new(1.0, with_alpha(Color32::WHITE, 0.1 * opacity)),
            );
            cursor.y += padding * 0.5;
            let right_width = right.size().x;
            painter.galley(cursor, left, Color32::WHITE);
            painter.galley(
                pos2(card.right() - padding - right_width, cursor.y),
                right,
                Color32::WHITE,
            );
        }
    }

    fn draw_legend(&self, painter: &Painter, rect: Rect) {
        let font = FontId::monospace(10.0);
        let text_color = Color32::from_rgb(100, 116, 139);
        let mut cursor = rect.right_bottom() - vec2(24.0, 20.0);

        for kind in NodeKind::ALL.iter().rev() {
            painter.circle_filled(cursor + vec2(0.0, -6.0), 3.0, kind_color(*kind));
            painter.text(
                cursor - vec2(10.0, 0.0),
                Align2::RIGHT_BOTTOM,
                format!("{} {}", kind.label(), self.catalog.count_of(*kind)),
                font.clone(),
                text_color,
            );
            cursor.y -= 14.0;
        }

        cursor.y -= 8.0;
        for line in [
            format!("NODES: {}", self.catalog.len()),
            "ENTROPY: STABLE".to_owned(),
            "SYSTEM STATUS: ONLINE".to_owned(),
        ] {
            painter.text(cursor, Align2::RIGHT_BOTTOM, line, font.clone(), text_color);
            cursor.y -= 14.0;
        }
    }
}

/// Draws the part of the ring behind (`back`) or in front of the sphere.
fn draw_ring_half(painter: &Painter, points: &[Projected], depth: f32, back: bool, kind: NodeKind) {
    for pair in points.windows(2) {
        let behind = (pair[0].depth + pair[1].depth) * 0.5 > depth;
        if behind != back {
            continue;
        }
        let color = fogged(kind_color(kind), pair[0].depth);
        painter.line_segment(
            [pair[0].pos, pair[1].pos],
            Stroke::new(1.4, with_alpha(color, if back { 0.35 } else { 0.7 })),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn meridians_are_unit_circles() {
        for step in 0..16 {
            let t = step as f32 * 0.4;
            assert!((meridian_point(0.0, t).length() - 1.0).abs() < 1e-5);
            assert!((meridian_point(1.2, t).length() - 1.0).abs() < 1e-5);
        }
        assert!((meridian_point(0.0, std::f32::consts::FRAC_PI_2) - Vec3::Y).length() < 1e-5);
    }
}
