mod forces;
mod quadtree;

use eframe::egui::{Vec2, vec2};
use log::{debug, info};

use crate::catalog::{Catalog, CatalogError, NodeKind};
use crate::layout::initial_positions;

use forces::{Center, Collide, Link, ManyBody, TypeCluster};

/// One simulated node. Indices are assigned once from catalog order and never
/// change.
#[derive(Clone, Debug)]
pub(in crate::app) struct Body {
    pub(in crate::app) index: usize,
    pub(in crate::app) kind: NodeKind,
    pub(in crate::app) position: Vec2,
    pub(in crate::app) velocity: Vec2,
    pub(in crate::app) fixed: Option<Vec2>,
    pub(in crate::app) radius: f32,
}

impl Body {
    pub(in crate::app) fn new(index: usize, kind: NodeKind, position: Vec2, radius: f32) -> Self {
        Self {
            index,
            kind,
            position,
            velocity: Vec2::ZERO,
            fixed: None,
            radius,
        }
    }
}

pub(in crate::app) trait Force {
    fn name(&self) -> &'static str;
    fn apply(&mut self, bodies: &mut [Body], alpha: f32);
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(in crate::app) struct LayoutConfig {
    pub(in crate::app) charge_strength: f32,
    pub(in crate::app) theta: f32,
    pub(in crate::app) distance_min: f32,
    pub(in crate::app) center_strength: f32,
    pub(in crate::app) collide_radius_per_val: f32,
    pub(in crate::app) collide_strength: f32,
    pub(in crate::app) link_distance: f32,
    pub(in crate::app) link_value_scale: f32,
    pub(in crate::app) cluster_strength: f32,
    pub(in crate::app) core_velocity_decay: f32,
    pub(in crate::app) core_contraction: f32,
    pub(in crate::app) alpha_min: f32,
    pub(in crate::app) alpha_decay: f32,
    pub(in crate::app) alpha_target: f32,
    pub(in crate::app) velocity_decay: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            charge_strength: -300.0,
            theta: 0.9,
            distance_min: 1.0,
            center_strength: 0.05,
            collide_radius_per_val: 15.0,
            collide_strength: 0.7,
            link_distance: 100.0,
            link_value_scale: 0.5,
            cluster_strength: 0.02,
            core_velocity_decay: 0.1,
            core_contraction: 0.9,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            alpha_target: 0.0,
            velocity_decay: 0.4,
        }
    }
}

/// Positions of every body at the end of one tick, indexed like the catalog.
#[derive(Clone, Debug, Default)]
pub(in crate::app) struct LayoutSnapshot {
    positions: Vec<Vec2>,
}

impl LayoutSnapshot {
    pub(in crate::app) fn get(&self, index: usize) -> Option<Vec2> {
        self.positions.get(index).copied()
    }

    #[cfg(test)]
    pub(in crate::app) fn len(&self) -> usize {
        self.positions.len()
    }

    #[cfg(test)]
    pub(in crate::app) fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub(in crate::app) fn positions(&self) -> &[Vec2] {
        &self.positions
    }
}

pub(in crate::app) struct Simulation {
    bodies: Vec<Body>,
    edges: Vec<(usize, usize, f32)>,
    core_index: Option<usize>,
    forces: Vec<Box<dyn Force>>,
    config: LayoutConfig,
    alpha: f32,
    running: bool,
    seed: u64,
    ticks: u64,
}

impl Simulation {
    pub(in crate::app) fn new(
        catalog: &Catalog,
        config: LayoutConfig,
        seed: u64,
    ) -> Result<Self, CatalogError> {
        let spiral = initial_positions(catalog.len());
        let bodies = catalog
            .nodes()
            .iter()
            .enumerate()
            .map(|(index, node)| {
                let pinned = node.pinned.map(|[x, y]| vec2(x, y));
                let mut body = Body::new(
                    index,
                    node.kind,
                    pinned.unwrap_or(spiral[index]),
                    node.val * config.collide_radius_per_val,
                );
                body.fixed = pinned;
                body
            })
            .collect::<Vec<_>>();

        let mut edges = Vec::with_capacity(catalog.links().len());
        for (link_index, link) in catalog.links().iter().enumerate() {
            let resolve = |id: &str| {
                catalog
                    .index_of(id)
                    .ok_or_else(|| CatalogError::UnknownLinkEndpoint {
                        link: link_index,
                        id: id.to_owned(),
                    })
            };
            edges.push((resolve(&link.source)?, resolve(&link.target)?, link.value));
        }

        let core_index = catalog.core_index();
        let forces = build_forces(&config, &edges, bodies.len(), core_index, seed);

        info!(
            "layout simulation started: {} bodies, {} links",
            bodies.len(),
            edges.len()
        );

        Ok(Self {
            bodies,
            edges,
            core_index,
            forces,
            config,
            alpha: 1.0,
            running: true,
            seed,
            ticks: 0,
        })
    }

    pub(in crate::app) fn tick(&mut self) {
        if !self.running || self.bodies.is_empty() {
            return;
        }

        let alpha = self.alpha;
        for force in &mut self.forces {
            force.apply(&mut self.bodies, alpha);
        }

        let retain = 1.0 - self.config.velocity_decay;
        for body in &mut self.bodies {
            match body.fixed {
                Some(fixed) => {
                    body.position = fixed;
                    body.velocity = Vec2::ZERO;
                }
                None => {
                    body.velocity *= retain;
                    body.position += body.velocity;
                }
            }
        }

        self.alpha += (self.config.alpha_target - self.alpha) * self.config.alpha_decay;
        self.ticks += 1;
    }

    pub(in crate::app) fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            positions: self.bodies.iter().map(|body| body.position).collect(),
        }
    }

    pub(in crate::app) fn len(&self) -> usize {
        self.bodies.len()
    }

    pub(in crate::app) fn alpha(&self) -> f32 {
        self.alpha
    }

    pub(in crate::app) fn is_settled(&self) -> bool {
        self.alpha < self.config.alpha_min
    }

    pub(in crate::app) fn ticks(&self) -> u64 {
        self.ticks
    }

    pub(in crate::app) fn config(&self) -> LayoutConfig {
        self.config
    }

    pub(in crate::app) fn reheat(&mut self) {
        self.alpha = 1.0;
    }

    /// Raises alpha to at least `alpha` without cooling a hotter layout.
    pub(in crate::app) fn warm(&mut self, alpha: f32) {
        self.alpha = self.alpha.max(alpha);
    }

    /// Rebuilds every force from `config`. Body state is kept; the layout is
    /// reheated so the change becomes visible.
    pub(in crate::app) fn reconfigure(&mut self, config: LayoutConfig) {
        if config == self.config {
            return;
        }

        for body in &mut self.bodies {
            body.radius *= config.collide_radius_per_val / self.config.collide_radius_per_val;
        }
        self.forces = build_forces(
            &config,
            &self.edges,
            self.bodies.len(),
            self.core_index,
            self.seed,
        );
        self.config = config;
        self.reheat();

        let names = self.forces.iter().map(|force| force.name()).collect::<Vec<_>>();
        debug!("layout reconfigured: {names:?} {config:?}");
    }

    pub(in crate::app) fn pin(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.fixed = Some(position);
        }
    }

    pub(in crate::app) fn unpin(&mut self, index: usize) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.fixed = None;
        }
    }

    pub(in crate::app) fn set_position(&mut self, index: usize, position: Vec2) {
        if let Some(body) = self.bodies.get_mut(index) {
            body.position = position;
            body.velocity = Vec2::ZERO;
        }
    }

    pub(in crate::app) fn stop(&mut self) {
        if self.running {
            info!("layout simulation stopped after {} ticks", self.ticks);
        }
        self.running = false;
    }

    pub(in crate::app) fn is_running(&self) -> bool {
        self.running
    }
}

fn build_forces(
    config: &LayoutConfig,
    edges: &[(usize, usize, f32)],
    body_count: usize,
    core_index: Option<usize>,
    seed: u64,
) -> Vec<Box<dyn Force>> {
    vec![
        Box::new(ManyBody::new(
            config.charge_strength,
            config.theta,
            config.distance_min,
            seed,
        )),
        Box::new(Center::new(Vec2::ZERO, config.center_strength)),
        Box::new(Collide::new(config.collide_strength, seed.wrapping_add(1))),
        Box::new(Link::new(
            edges,
            body_count,
            config.link_distance,
            config.link_value_scale,
            seed.wrapping_add(2),
        )),
        Box::new(TypeCluster::new(
            config.cluster_strength,
            core_index,
            config.core_velocity_decay,
            config.core_contraction,
        )),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn embedded_simulation() -> Simulation {
        let catalog = Catalog::embedded().expect("embedded catalog");
        Simulation::new(&catalog, LayoutConfig::default(), 7).expect("simulation")
    }

    fn run(simulation: &mut Simulation, ticks: usize) {
        for _ in 0..ticks {
            simulation.tick();
        }
    }

    #[test]
    fn forces_run_in_a_fixed_order() {
        let simulation = embedded_simulation();
        let names = simulation
            .forces
            .iter()
            .map(|force| force.name())
            .collect::<Vec<_>>();
        assert_eq!(names, ["charge", "center", "collide", "link", "cluster"]);
    }

    #[test]
    fn empty_catalog_ticks_without_bodies() {
        let catalog = Catalog::from_json("{}").expect("catalog");
        let mut simulation =
            Simulation::new(&catalog, LayoutConfig::default(), 1).expect("simulation");
        run(&mut simulation, 10);
        assert_eq!(simulation.len(), 0);
        assert!(simulation.snapshot().is_empty());
    }

    #[test]
    fn alpha_cools_to_settled() {
        let mut simulation = embedded_simulation();
        let mut previous = simulation.alpha();
        for _ in 0..50 {
            simulation.tick();
            assert!(simulation.alpha() < previous);
            previous = simulation.alpha();
        }
        run(&mut simulation, 260);
        assert!(simulation.is_settled());

        simulation.reheat();
        assert_eq!(simulation.alpha(), 1.0);
        assert!(!simulation.is_settled());
    }

    #[test]
    fn snapshot_keeps_catalog_order() {
        let mut simulation = embedded_simulation();
        run(&mut simulation, 30);
        let snapshot = simulation.snapshot();
        assert_eq!(snapshot.len(), 17);
        for (index, body) in simulation.bodies.iter().enumerate() {
            assert_eq!(body.index, index);
            assert_eq!(snapshot.get(index), Some(body.position));
        }
        assert!(snapshot.get(17).is_none());
    }

    #[test]
    fn core_converges_near_origin() {
        let mut simulation = embedded_simulation();
        let core = simulation.core_index.expect("core");
        simulation.set_position(core, vec2(400.0, -300.0));
        run(&mut simulation, 1000);

        let position = simulation.snapshot().get(core).expect("core position");
        assert!(position.length() < 30.0, "core drifted to {position:?}");
    }

    #[test]
    fn settled_layout_keeps_bodies_apart() {
        let mut simulation = embedded_simulation();
        run(&mut simulation, 2000);

        let bodies = &simulation.bodies;
        for i in 0..bodies.len() {
            for j in (i + 1)..bodies.len() {
                let distance = (bodies[i].position - bodies[j].position).length();
                let minimum = bodies[i].radius + bodies[j].radius;
                assert!(
                    distance >= minimum * 0.9,
                    "bodies {i} and {j} overlap: {distance} < {minimum}"
                );
            }
        }
        assert!(
            bodies
                .iter()
                .all(|body| body.position.x.is_finite() && body.position.y.is_finite())
        );
    }

    #[test]
    fn thought_neighbour_settles_on_its_quadrant() {
        let raw = r#"{
            "core": "a",
            "nodes": [
                { "id": "a", "label": "A", "type": "SYSTEM", "val": 5 },
                { "id": "b", "label": "B", "type": "THOUGHT", "val": 2 }
            ],
            "links": [{ "source": "a", "target": "b", "value": 2 }]
        }"#;
        let catalog = Catalog::from_json(raw).expect("catalog");
        let mut simulation =
            Simulation::new(&catalog, LayoutConfig::default(), 7).expect("simulation");
        run(&mut simulation, 1000);

        let snapshot = simulation.snapshot();
        let a = snapshot.get(0).expect("a");
        let b = snapshot.get(1).expect("b");
        let distance = (a - b).length();
        assert!((90.0..160.0).contains(&distance), "distance {distance}");
        assert!(b.x < a.x && b.y < a.y, "a {a:?} b {b:?}");
    }

    #[test]
    fn pinned_bodies_hold_their_position() {
        let raw = r#"{
            "nodes": [
                { "id": "a", "label": "A", "type": "DATA", "pinned": [40, -20] },
                { "id": "b", "label": "B", "type": "DATA" },
                { "id": "c", "label": "C", "type": "FAILURE" }
            ],
            "links": [{ "source": "a", "target": "b" }]
        }"#;
        let catalog = Catalog::from_json(raw).expect("catalog");
        let mut simulation =
            Simulation::new(&catalog, LayoutConfig::default(), 3).expect("simulation");
        run(&mut simulation, 100);
        assert_eq!(simulation.snapshot().get(0), Some(vec2(40.0, -20.0)));

        simulation.pin(1, vec2(-5.0, 5.0));
        simulation.tick();
        assert_eq!(simulation.snapshot().get(1), Some(vec2(-5.0, 5.0)));

        simulation.unpin(1);
        simulation.reheat();
        run(&mut simulation, 5);
        assert_ne!(simulation.snapshot().get(1), Some(vec2(-5.0, 5.0)));
    }

    #[test]
    fn stopped_simulation_no_longer_moves() {
        let mut simulation = embedded_simulation();
        run(&mut simulation, 5);
        simulation.stop();
        assert!(!simulation.is_running());

        let before = simulation.snapshot();
        let ticks = simulation.ticks();
        run(&mut simulation, 5);
        assert_eq!(simulation.snapshot().positions(), before.positions());
        assert_eq!(simulation.ticks(), ticks);
    }

    #[test]
    fn reconfigure_reheats_and_rescales_radii() {
        let mut simulation = embedded_simulation();
        run(&mut simulation, 400);
        assert!(simulation.is_settled());

        let radius = simulation.bodies[1].radius;
        let config = LayoutConfig {
            collide_radius_per_val: 30.0,
            link_distance: 150.0,
            ..LayoutConfig::default()
        };
        simulation.reconfigure(config);
        assert_eq!(simulation.alpha(), 1.0);
        assert_eq!(simulation.config().link_distance, 150.0);
        assert!((simulation.bodies[1].radius - radius * 2.0).abs() < 1e-4);
    }
}
