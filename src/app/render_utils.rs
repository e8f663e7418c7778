use eframe::egui::{Color32, Painter, Pos2, Rect};

use crate::catalog::NodeKind;

pub(super) const BACKGROUND: Color32 = Color32::from_rgb(15, 23, 42);
pub(super) const ACCENT: Color32 = Color32::from_rgb(245, 158, 11);
pub(super) const FOG_NEAR: f32 = 50.0;
pub(super) const FOG_FAR: f32 = 150.0;

pub(super) fn kind_color(kind: NodeKind) -> Color32 {
    match kind {
        NodeKind::System => Color32::from_rgb(56, 189, 248),
        NodeKind::Data => Color32::from_rgb(167, 139, 250),
        NodeKind::Thought => Color32::from_rgb(148, 163, 184),
        NodeKind::Failure => Color32::from_rgb(248, 113, 113),
        NodeKind::Signal => Color32::from_rgb(251, 191, 36),
    }
}

pub(super) fn blend_color(base: Color32, overlay: Color32, amount: f32) -> Color32 {
    let amount = amount.clamp(0.0, 1.0);
    let inverse = 1.0 - amount;

    Color32::from_rgba_unmultiplied(
        ((base.r() as f32 * inverse) + (overlay.r() as f32 * amount)) as u8,
        ((base.g() as f32 * inverse) + (overlay.g() as f32 * amount)) as u8,
        ((base.b() as f32 * inverse) + (overlay.b() as f32 * amount)) as u8,
        ((base.a() as f32 * inverse) + (overlay.a() as f32 * amount)) as u8,
    )
}

pub(super) fn dim_color(color: Color32, factor: f32) -> Color32 {
    let factor = factor.clamp(0.0, 1.0);
    Color32::from_rgba_unmultiplied(
        (color.r() as f32 * factor) as u8,
        (color.g() as f32 * factor) as u8,
        (color.b() as f32 * factor) as u8,
        (color.a() as f32 * (0.45 + (factor * 0.55))) as u8,
    )
}

pub(super) fn with_alpha(color: Color32, alpha: f32) -> Color32 {
    Color32::from_rgba_unmultiplied(
        color.r(),
        color.g(),
        color.b(),
        (alpha.clamp(0.0, 1.0) * 255.0) as u8,
    )
}

/// Linear fog amount for a view depth: 0 before `FOG_NEAR`, 1 past `FOG_FAR`.
pub(super) fn fog_amount(depth: f32) -> f32 {
    ((depth - FOG_NEAR) / (FOG_FAR - FOG_NEAR)).clamp(0.0, 1.0)
}

pub(super) fn fogged(color: Color32, depth: f32) -> Color32 {
    blend_color(color, BACKGROUND, fog_amount(depth))
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, BACKGROUND);
}

pub(super) fn circle_visible(rect: Rect, position: Pos2, radius: f32) -> bool {
    !(position.x + radius < rect.left()
        || position.x - radius > rect.right()
        || position.y + radius < rect.top()
        || position.y - radius > rect.bottom())
}

#[cfg(test)]
mod tests {
    use eframe::egui::{pos2, vec2};

    use super::*;

    #[test]
    fn fog_ramps_between_near_and_far() {
        assert_eq!(fog_amount(10.0), 0.0);
        assert_eq!(fog_amount(100.0), 0.5);
        assert_eq!(fog_amount(500.0), 1.0);
        assert_eq!(fogged(Color32::WHITE, 400.0), BACKGROUND);
        assert_eq!(fogged(Color32::WHITE, 20.0), Color32::WHITE);
    }

    #[test]
    fn every_kind_has_its_own_color() {
        let mut colors = NodeKind::ALL.map(kind_color).to_vec();
        colors.dedup();
        assert_eq!(colors.len(), NodeKind::ALL.len());
    }

    #[test]
    fn circle_visibility_counts_partial_overlap() {
        let rect = Rect::from_min_size(pos2(0.0, 0.0), vec2(100.0, 100.0));
        assert!(circle_visible(rect, pos2(-5.0, 50.0), 10.0));
        assert!(!circle_visible(rect, pos2(-20.0, 50.0), 10.0));
    }
}
