use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

const INITIAL_RADIUS: f32 = 10.0;

/// Sunflower spiral seed positions. Every body starts at a distinct point and
/// the disc grows with the square root of the node count, so the first ticks
/// never see coincident bodies.
pub fn initial_positions(count: usize) -> Vec<Vec2> {
    let initial_angle = PI * (3.0 - 5.0_f32.sqrt());
    (0..count)
        .map(|index| {
            let radius = INITIAL_RADIUS * (0.5 + index as f32).sqrt();
            let angle = index as f32 * initial_angle;
            vec2(radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_are_distinct_and_spiral_outward() {
        let positions = initial_positions(32);
        assert_eq!(positions.len(), 32);
        assert!((positions[0].length() - INITIAL_RADIUS * 0.5_f32.sqrt()).abs() < 1e-4);
        for window in positions.windows(2) {
            assert!(window[1].length() > window[0].length());
        }
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                assert!((*a - *b).length() > 1.0);
            }
        }
    }

    #[test]
    fn no_positions_for_empty_set() {
        assert!(initial_positions(0).is_empty());
    }
}
