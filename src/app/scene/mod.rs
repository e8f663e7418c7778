//! 3D presentation state derived from layout snapshots.
//!
//! The simulation works in a 2D plane with y growing downward. Each frame the
//! scene maps a snapshot into world space (`x * 0.1`, `-y * 0.1`, a slow z
//! drift) and eases every node toward that target, so nodes glide instead of
//! snapping to the raw layout.

pub(in crate::app) mod camera;
pub(in crate::app) mod texture;

use std::path::Path;

use glam::{Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::{Catalog, NodeKind};
use crate::util::node_seed;

use super::physics::LayoutSnapshot;
use texture::{TextureSlot, TextureSource};

const WORLD_SCALE: f32 = 0.1;
const PLANE_LERP: f32 = 0.1;
const DEPTH_LERP: f32 = 0.05;
const DRIFT_AMPLITUDE: f32 = 5.0;
const DRIFT_RATE: f32 = 0.5;
const RADIUS_PER_VAL: f32 = 0.6;
const CORE_RADIUS: f32 = 2.5;
const GLOW_RADIUS: f32 = 1.5;
const FAILURE_JITTER_CHANCE: f64 = 0.35;
const FAILURE_JITTER: f32 = 0.05;
const STAR_COUNT: usize = 1_200;
const STAR_INNER_RADIUS: f32 = 100.0;
const STAR_DEPTH: f32 = 50.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(in crate::app) enum Surface {
    /// Smooth, strong specular highlight.
    Glossy,
    /// Hard-edged shading bands.
    Faceted,
    /// Flat emissive color, no lighting.
    Unlit,
    Matte,
}

impl Surface {
    pub(in crate::app) fn for_kind(kind: NodeKind) -> Self {
        match kind {
            NodeKind::System => Self::Glossy,
            NodeKind::Failure => Self::Faceted,
            NodeKind::Signal => Self::Unlit,
            NodeKind::Data | NodeKind::Thought => Self::Matte,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) enum GlowOrientation {
    FacingCamera,
    Spinning { yaw: f32, roll: f32 },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct Glow {
    pub(in crate::app) radius: f32,
    pub(in crate::app) opacity: f32,
    pub(in crate::app) wireframe: bool,
    pub(in crate::app) orientation: GlowOrientation,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LabelStyle {
    pub(in crate::app) opacity: f32,
    pub(in crate::app) scale: f32,
    pub(in crate::app) emphasized: bool,
    pub(in crate::app) show_footer: bool,
}

impl LabelStyle {
    pub(in crate::app) fn for_hover(hovered: bool) -> Self {
        if hovered {
            Self {
                opacity: 1.0,
                scale: 1.05,
                emphasized: true,
                show_footer: true,
            }
        } else {
            Self {
                opacity: 0.9,
                scale: 0.9,
                emphasized: false,
                show_footer: false,
            }
        }
    }
}

pub(in crate::app) struct SceneNode {
    pub(in crate::app) index: usize,
    pub(in crate::app) kind: NodeKind,
    pub(in crate::app) is_core: bool,
    pub(in crate::app) position: Vec3,
    pub(in crate::app) radius: f32,
    pub(in crate::app) surface: Surface,
    pub(in crate::app) has_ring: bool,
    pub(in crate::app) rotation_axis: Vec3,
    pub(in crate::app) rotation_speed: f32,
    pub(in crate::app) spin: f32,
    pub(in crate::app) glow_yaw: f32,
    pub(in crate::app) glow_roll: f32,
    pub(in crate::app) texture: TextureSlot,
}

impl SceneNode {
    pub(in crate::app) fn orientation(&self) -> Quat {
        Quat::from_axis_angle(self.rotation_axis, self.spin)
    }

    /// World height of the label anchor above the node center.
    pub(in crate::app) fn label_lift(&self) -> f32 {
        if self.is_core { 3.5 } else { 2.5 }
    }
}

pub(in crate::app) struct SceneGraph {
    nodes: Vec<SceneNode>,
    stars: Vec<Star>,
    rng: StdRng,
}

#[derive(Clone, Copy, Debug)]
pub(in crate::app) struct Star {
    pub(in crate::app) position: Vec3,
    pub(in crate::app) brightness: f32,
}

/// World-space target for a layout position at time `elapsed`.
pub(in crate::app) fn world_target(
    layout: eframe::egui::Vec2,
    index: usize,
    is_core: bool,
    elapsed: f32,
) -> Vec3 {
    let drift = if is_core {
        0.0
    } else {
        (elapsed * DRIFT_RATE + index as f32).sin() * DRIFT_AMPLITUDE
    };
    Vec3::new(layout.x * WORLD_SCALE, -layout.y * WORLD_SCALE, drift)
}

/// Layout-plane displacement for a world displacement, ignoring depth.
pub(in crate::app) fn layout_delta(world: Vec3) -> eframe::egui::Vec2 {
    eframe::egui::vec2(world.x / WORLD_SCALE, -world.y / WORLD_SCALE)
}

fn random_axis(rng: &mut StdRng) -> Vec3 {
    let axis = Vec3::new(
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
        rng.gen_range(-1.0..1.0),
    );
    axis.try_normalize().unwrap_or(Vec3::Y)
}

fn star_field(rng: &mut StdRng) -> Vec<Star> {
    (0..STAR_COUNT)
        .map(|_| {
            let direction = random_axis(rng);
            let distance = STAR_INNER_RADIUS + rng.r#gen::<f32>() * STAR_DEPTH;
            Star {
                position: direction * distance,
                brightness: rng.gen_range(0.25..1.0),
            }
        })
        .collect()
}

impl SceneGraph {
    pub(in crate::app) fn new(catalog: &Catalog, assets_root: &Path, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let nodes = catalog
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let is_core = catalog.is_core(index);
                let mut node_rng = StdRng::seed_from_u64(node_seed(seed, &node.id));
                SceneNode {
                    index,
                    kind: node.kind,
                    is_core,
                    position: Vec3::ZERO,
                    radius: if is_core {
                        CORE_RADIUS
                    } else {
                        node.val * RADIUS_PER_VAL
                    },
                    surface: Surface::for_kind(node.kind),
                    has_ring: node.kind == NodeKind::System && !is_core,
                    rotation_axis: random_axis(&mut node_rng),
                    rotation_speed: node_rng.gen_range(0.002..0.012),
                    spin: 0.0,
                    glow_yaw: 0.0,
                    glow_roll: 0.0,
                    texture: TextureSlot::new(assets_root, node.img.as_deref()),
                }
            })
            .collect();
        let stars = star_field(&mut rng);

        Self { nodes, stars, rng }
    }

    pub(in crate::app) fn nodes(&self) -> &[SceneNode] {
        &self.nodes
    }

    pub(in crate::app) fn node(&self, index: usize) -> Option<&SceneNode> {
        self.nodes.get(index)
    }

    pub(in crate::app) fn stars(&self) -> &[Star] {
        &self.stars
    }

    /// Eases every node toward the snapshot. Called once per frame after the
    /// simulation tick.
    pub(in crate::app) fn advance(&mut self, snapshot: &LayoutSnapshot, elapsed: f32) {
        for (node, &layout) in self.nodes.iter_mut().zip(snapshot.positions()) {
            let target = world_target(layout, node.index, node.is_core, elapsed);
            node.position.x += (target.x - node.position.x) * PLANE_LERP;
            node.position.y += (target.y - node.position.y) * PLANE_LERP;
            node.position.z += (target.z - node.position.z) * DEPTH_LERP;
            node.spin = (node.spin + node.rotation_speed) % std::f32::consts::TAU;

            if node.is_core {
                node.glow_yaw += 0.005;
                node.glow_roll += 0.002;
            }

            if node.kind == NodeKind::Failure && self.rng.gen_bool(FAILURE_JITTER_CHANCE) {
                node.position.x += (self.rng.r#gen::<f32>() - 0.5) * FAILURE_JITTER;
                node.position.y += (self.rng.r#gen::<f32>() - 0.5) * FAILURE_JITTER;
            }
        }
    }

    pub(in crate::app) fn resolve_textures(
        &mut self,
        source: &mut dyn TextureSource,
        catalog: &Catalog,
    ) {
        for node in &mut self.nodes {
            let id = catalog
                .node(node.index)
                .map(|entry| entry.id.as_str())
                .unwrap_or_default();
            node.texture.resolve(source, id);
        }
    }

    /// Pulsing shell for the core, signals and the hovered node.
    pub(in crate::app) fn glow(&self, index: usize, hovered: bool, elapsed: f32) -> Option<Glow> {
        let node = self.nodes.get(index)?;
        if !(node.is_core || node.kind == NodeKind::Signal || hovered) {
            return None;
        }

        let pulse = (elapsed * 2.0).sin();
        let scale = if node.is_core {
            1.1 + pulse * 0.05
        } else {
            1.2 + pulse * 0.2
        };
        let base = if node.is_core { CORE_RADIUS } else { GLOW_RADIUS };
        let orientation = if node.is_core {
            GlowOrientation::Spinning {
                yaw: node.glow_yaw,
                roll: node.glow_roll,
            }
        } else {
            GlowOrientation::FacingCamera
        };

        Some(Glow {
            radius: base * scale,
            opacity: if node.is_core { 0.1 } else { 0.15 },
            wireframe: !node.is_core,
            orientation,
        })
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;

    fn scene() -> (Catalog, SceneGraph) {
        let catalog = Catalog::embedded().expect("embedded catalog");
        let scene = SceneGraph::new(&catalog, Path::new("public"), 7);
        (catalog, scene)
    }

    fn snapshot_of(catalog: &Catalog) -> LayoutSnapshot {
        let mut simulation = crate::app::physics::Simulation::new(
            catalog,
            crate::app::physics::LayoutConfig::default(),
            7,
        )
        .expect("simulation");
        for _ in 0..20 {
            simulation.tick();
        }
        simulation.snapshot()
    }

    #[test]
    fn world_target_flips_and_scales() {
        let target = world_target(vec2(100.0, 50.0), 0, true, 3.0);
        assert_eq!(target, Vec3::new(10.0, -5.0, 0.0));

        let drifting = world_target(vec2(0.0, 0.0), 2, false, 0.0);
        assert!((drifting.z - 2.0_f32.sin() * 5.0).abs() < 1e-5);

        let back = layout_delta(target);
        assert!((back - vec2(100.0, 50.0)).length() < 1e-4);
    }

    #[test]
    fn nodes_ease_toward_the_layout() {
        let (catalog, mut scene) = scene();
        let snapshot = snapshot_of(&catalog);
        let index = catalog.index_of("sys-github").expect("github");

        scene.advance(&snapshot, 0.0);
        let layout = snapshot.get(index).expect("position");
        let first = scene.node(index).expect("node").position;
        assert!((first.x - layout.x * 0.01).abs() < 1e-4);

        for _ in 0..300 {
            scene.advance(&snapshot, 0.0);
        }
        let settled = scene.node(index).expect("node").position;
        assert!((settled - world_target(layout, index, false, 0.0)).length() < 1e-2);
    }

    #[test]
    fn core_is_fixed_size_and_never_drifts() {
        let (catalog, mut scene) = scene();
        let core = catalog.core_index().expect("core");
        let snapshot = snapshot_of(&catalog);
        for frame in 0..100 {
            scene.advance(&snapshot, frame as f32 * 0.25);
        }
        let node = scene.node(core).expect("core");
        assert_eq!(node.radius, 2.5);
        assert_eq!(node.position.z, 0.0);
        assert!(!node.has_ring);
    }

    #[test]
    fn surfaces_and_rings_follow_kind() {
        let (catalog, scene) = scene();
        for node in scene.nodes() {
            assert_eq!(node.surface, Surface::for_kind(node.kind));
            assert_eq!(
                node.has_ring,
                node.kind == NodeKind::System && !catalog.is_core(node.index)
            );
            assert!((node.rotation_axis.length() - 1.0).abs() < 1e-4);
            if !node.is_core {
                let val = catalog.node(node.index).expect("node").val;
                assert_eq!(node.radius, val * 0.6);
            }
        }
        assert_eq!(Surface::for_kind(NodeKind::Signal), Surface::Unlit);
        assert_eq!(Surface::for_kind(NodeKind::Failure), Surface::Faceted);
    }

    #[test]
    fn glow_rules() {
        let (catalog, mut scene) = scene();
        let core = catalog.core_index().expect("core");
        let data = catalog.index_of("sys-streamlit").expect("data");

        assert!(scene.glow(data, false, 0.0).is_none());
        let hovered = scene.glow(data, true, 0.0).expect("hover glow");
        assert_eq!(hovered.orientation, GlowOrientation::FacingCamera);
        assert!((hovered.radius - 1.5 * 1.2).abs() < 1e-5);
        assert!(hovered.wireframe);

        let signals = Catalog::from_json(
            r#"{ "nodes": [{ "id": "signal-01", "label": "Ping", "type": "SIGNAL" }] }"#,
        )
        .expect("catalog");
        let signal_scene = SceneGraph::new(&signals, Path::new("public"), 1);
        assert!(signal_scene.glow(0, false, 0.0).is_some());

        let snapshot = snapshot_of(&catalog);
        scene.advance(&snapshot, 0.0);
        scene.advance(&snapshot, 0.0);
        let core_glow = scene.glow(core, false, 0.0).expect("core glow");
        assert!(!core_glow.wireframe);
        let GlowOrientation::Spinning { yaw, roll } = core_glow.orientation else {
            panic!("core glow should spin");
        };
        assert!((yaw - 0.01).abs() < 1e-6);
        assert!((roll - 0.004).abs() < 1e-6);
    }

    #[test]
    fn label_style_emphasizes_hover() {
        let idle = LabelStyle::for_hover(false);
        let hovered = LabelStyle::for_hover(true);
        assert_eq!((idle.opacity, idle.scale), (0.9, 0.9));
        assert_eq!((hovered.opacity, hovered.scale), (1.0, 1.05));
        assert!(hovered.show_footer && !idle.show_footer);
        assert!(hovered.emphasized && !idle.emphasized);
    }

    #[test]
    fn stars_sit_in_a_shell() {
        let (_, scene) = scene();
        assert_eq!(scene.stars().len(), STAR_COUNT);
        assert!(scene.stars().iter().all(|star| {
            let distance = star.position.length();
            (STAR_INNER_RADIUS - 1e-3..=STAR_INNER_RADIUS + STAR_DEPTH + 1e-3).contains(&distance)
        }));
    }
}
