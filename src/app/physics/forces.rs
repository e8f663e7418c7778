use eframe::egui::{Vec2, vec2};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::catalog::NodeKind;

use super::quadtree::QuadNode;
use super::{Body, Force};

/// Tiny random offset used to separate exactly coincident bodies.
pub(super) struct Jiggle {
    rng: StdRng,
}

impl Jiggle {
    pub(super) fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn next(&mut self) -> f32 {
        (self.rng.r#gen::<f32>() - 0.5) * 1e-6
    }

    fn separate(&mut self, mut delta: Vec2) -> Vec2 {
        if delta.x == 0.0 {
            delta.x = self.next();
        }
        if delta.y == 0.0 {
            delta.y = self.next();
        }
        delta
    }
}

/// Quadrant each semantic type drifts toward. Signals float free.
pub(in crate::app) fn cluster_anchor(kind: NodeKind) -> Option<Vec2> {
    match kind {
        NodeKind::System => Some(vec2(300.0, -200.0)),
        NodeKind::Data => Some(vec2(300.0, 200.0)),
        NodeKind::Thought => Some(vec2(-300.0, -200.0)),
        NodeKind::Failure => Some(vec2(-300.0, 200.0)),
        NodeKind::Signal => None,
    }
}

pub(super) struct ManyBody {
    strength: f32,
    theta: f32,
    distance_min_sq: f32,
    jiggle: Jiggle,
    positions: Vec<Vec2>,
}

impl ManyBody {
    pub(super) fn new(strength: f32, theta: f32, distance_min: f32, seed: u64) -> Self {
        Self {
            strength,
            theta,
            distance_min_sq: distance_min * distance_min,
            jiggle: Jiggle::new(seed),
            positions: Vec::new(),
        }
    }
}

struct Repulsion<'a> {
    positions: &'a [Vec2],
    strength_alpha: f32,
    theta_sq: f32,
    distance_min_sq: f32,
}

impl Repulsion<'_> {
    fn push(&self, delta: Vec2, mass: f32, jiggle: &mut Jiggle) -> Vec2 {
        let delta = jiggle.separate(delta);
        let mut distance_sq = delta.length_sq();
        if distance_sq < self.distance_min_sq {
            distance_sq = (self.distance_min_sq * distance_sq).sqrt();
        }
        delta * (self.strength_alpha * mass / distance_sq)
    }

    fn accumulate(&self, node: &QuadNode, index: usize, jiggle: &mut Jiggle, out: &mut Vec2) {
        if node.mass <= 0.0 {
            return;
        }

        let point = self.positions[index];

        if node.is_leaf() {
            for &other_index in &node.indices {
                if other_index == index {
                    continue;
                }
                *out += self.push(self.positions[other_index] - point, 1.0, jiggle);
            }
            return;
        }

        let delta = node.center_of_mass - point;
        let side = node.bounds.side_length();
        let can_approximate =
            !node.bounds.contains(point) && (side * side) < self.theta_sq * delta.length_sq();

        if can_approximate {
            *out += self.push(delta, node.mass, jiggle);
            return;
        }

        for child in node.children.iter().flatten() {
            self.accumulate(child, index, jiggle, out);
        }
    }
}

impl Force for ManyBody {
    fn name(&self) -> &'static str {
        "charge"
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f32) {
        self.positions.clear();
        self.positions.extend(bodies.iter().map(|body| body.position));

        let Some(quadtree) = QuadNode::build(&self.positions) else {
            return;
        };

        let repulsion = Repulsion {
            positions: &self.positions,
            strength_alpha: self.strength * alpha,
            theta_sq: self.theta * self.theta,
            distance_min_sq: self.distance_min_sq,
        };
        for (index, body) in bodies.iter_mut().enumerate() {
            let mut delta_velocity = Vec2::ZERO;
            repulsion.accumulate(&quadtree, index, &mut self.jiggle, &mut delta_velocity);
            body.velocity += delta_velocity;
        }
    }
}

pub(super) struct Center {
    target: Vec2,
    strength: f32,
}

impl Center {
    pub(super) fn new(target: Vec2, strength: f32) -> Self {
        Self { target, strength }
    }
}

impl Force for Center {
    fn name(&self) -> &'static str {
        "center"
    }

    fn apply(&mut self, bodies: &mut [Body], _alpha: f32) {
        if bodies.is_empty() {
            return;
        }

        let mut centroid = Vec2::ZERO;
        for body in bodies.iter() {
            centroid += body.position;
        }
        let shift = (centroid / bodies.len() as f32 - self.target) * self.strength;
        for body in bodies.iter_mut() {
            body.position -= shift;
        }
    }
}

pub(super) struct Collide {
    strength: f32,
    jiggle: Jiggle,
    predicted: Vec<Vec2>,
    radii: Vec<f32>,
    pairs: Vec<(usize, usize)>,
}

impl Collide {
    pub(super) fn new(strength: f32, seed: u64) -> Self {
        Self {
            strength,
            jiggle: Jiggle::new(seed),
            predicted: Vec::new(),
            radii: Vec::new(),
            pairs: Vec::new(),
        }
    }
}

fn collect_collision_pairs(
    node_a: &QuadNode,
    node_b: &QuadNode,
    same_node: bool,
    pairs: &mut Vec<(usize, usize)>,
) {
    let reach = node_a.max_radius + node_b.max_radius;
    if node_a.bounds.distance_sq_to(node_b.bounds) > reach * reach {
        return;
    }

    if node_a.is_leaf() && node_b.is_leaf() {
        if same_node {
            for (offset, &from) in node_a.indices.iter().enumerate() {
                for &to in &node_a.indices[offset + 1..] {
                    pairs.push((from.min(to), from.max(to)));
                }
            }
        } else {
            for &from in &node_a.indices {
                for &to in &node_b.indices {
                    pairs.push((from.min(to), from.max(to)));
                }
            }
        }
        return;
    }

    if same_node {
        for first in 0..4 {
            let Some(child_a) = node_a.children[first].as_ref() else {
                continue;
            };

            collect_collision_pairs(child_a, child_a, true, pairs);

            for second in (first + 1)..4 {
                let Some(child_b) = node_a.children[second].as_ref() else {
                    continue;
                };
                collect_collision_pairs(child_a, child_b, false, pairs);
            }
        }
        return;
    }

    let split_a = if node_a.is_leaf() {
        false
    } else if node_b.is_leaf() {
        true
    } else {
        node_a.bounds.half_extent >= node_b.bounds.half_extent
    };

    if split_a {
        for child in node_a.children.iter().flatten() {
            collect_collision_pairs(child, node_b, false, pairs);
        }
    } else {
        for child in node_b.children.iter().flatten() {
            collect_collision_pairs(node_a, child, false, pairs);
        }
    }
}

impl Force for Collide {
    fn name(&self) -> &'static str {
        "collide"
    }

    fn apply(&mut self, bodies: &mut [Body], _alpha: f32) {
        self.predicted.clear();
        self.radii.clear();
        for body in bodies.iter() {
            self.predicted.push(body.position + body.velocity);
            self.radii.push(body.radius);
        }

        let Some(quadtree) = QuadNode::build_with_radii(&self.predicted, &self.radii) else {
            return;
        };

        self.pairs.clear();
        collect_collision_pairs(&quadtree, &quadtree, true, &mut self.pairs);
        self.pairs.sort_unstable();

        for &(first, second) in &self.pairs {
            let radius_a = bodies[first].radius;
            let radius_b = bodies[second].radius;
            let reach = radius_a + radius_b;

            let delta = (bodies[first].position + bodies[first].velocity)
                - (bodies[second].position + bodies[second].velocity);
            if delta.length_sq() >= reach * reach {
                continue;
            }

            let delta = self.jiggle.separate(delta);
            let distance = delta.length();
            let push = delta * ((reach - distance) / distance * self.strength);

            let weight_a = radius_a * radius_a;
            let weight_b = radius_b * radius_b;
            let share = weight_b / (weight_a + weight_b);
            bodies[first].velocity += push * share;
            bodies[second].velocity -= push * (1.0 - share);
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct ResolvedLink {
    source: usize,
    target: usize,
    strength: f32,
    bias: f32,
}

pub(super) struct Link {
    links: Vec<ResolvedLink>,
    distance: f32,
    jiggle: Jiggle,
}

impl Link {
    /// `edges` are `(source, target, value)` triples with indices already
    /// resolved against the body list.
    pub(super) fn new(
        edges: &[(usize, usize, f32)],
        body_count: usize,
        distance: f32,
        value_scale: f32,
        seed: u64,
    ) -> Self {
        let mut degree = vec![0usize; body_count];
        for &(source, target, _) in edges {
            degree[source] += 1;
            degree[target] += 1;
        }

        let links = edges
            .iter()
            .map(|&(source, target, value)| {
                let source_degree = degree[source] as f32;
                let target_degree = degree[target] as f32;
                ResolvedLink {
                    source,
                    target,
                    strength: (value * value_scale).min(1.0) / source_degree.min(target_degree),
                    bias: source_degree / (source_degree + target_degree),
                }
            })
            .collect();

        Self {
            links,
            distance,
            jiggle: Jiggle::new(seed),
        }
    }
}

impl Force for Link {
    fn name(&self) -> &'static str {
        "link"
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f32) {
        for link in &self.links {
            let source = &bodies[link.source];
            let target = &bodies[link.target];
            let delta = self.jiggle.separate(
                (target.position + target.velocity) - (source.position + source.velocity),
            );
            let length = delta.length();
            let correction = delta * ((length - self.distance) / length * alpha * link.strength);

            bodies[link.target].velocity -= correction * link.bias;
            bodies[link.source].velocity += correction * (1.0 - link.bias);
        }
    }
}

/// Pulls each typed body toward its quadrant anchor while the layout is hot
/// and keeps the core body clamped near the origin.
pub(super) struct TypeCluster {
    strength: f32,
    core: Option<usize>,
    core_velocity_decay: f32,
    core_contraction: f32,
}

impl TypeCluster {
    pub(super) fn new(
        strength: f32,
        core: Option<usize>,
        core_velocity_decay: f32,
        core_contraction: f32,
    ) -> Self {
        Self {
            strength,
            core,
            core_velocity_decay,
            core_contraction,
        }
    }
}

impl Force for TypeCluster {
    fn name(&self) -> &'static str {
        "cluster"
    }

    fn apply(&mut self, bodies: &mut [Body], alpha: f32) {
        for body in bodies.iter_mut() {
            if Some(body.index) == self.core {
                body.velocity *= self.core_velocity_decay;
                body.position *= self.core_contraction;
                continue;
            }

            let Some(anchor) = cluster_anchor(body.kind) else {
                continue;
            };
            body.velocity += (anchor - body.position) * (alpha * self.strength);
        }
    }
}
