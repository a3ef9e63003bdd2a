use eframe::egui::Vec2;

use super::Jiggle;
use super::quadtree::QuadTree;
use crate::layout::graph::{Edge, Node};

pub(super) struct LinkForce {
    strengths: Vec<f32>,
    biases: Vec<f32>,
}

impl LinkForce {
    pub(super) fn new(node_count: usize, edges: &[Edge]) -> Self {
        let mut degree = vec![0usize; node_count];
        for edge in edges.iter().filter(|edge| edge.source != edge.target) {
            degree[edge.source] += 1;
            degree[edge.target] += 1;
        }

        let mut strengths = Vec::with_capacity(edges.len());
        let mut biases = Vec::with_capacity(edges.len());
        for edge in edges {
            let source = degree[edge.source].max(1) as f32;
            let target = degree[edge.target].max(1) as f32;
            strengths.push(1.0 / source.min(target));
            biases.push(source / (source + target));
        }

        Self { strengths, biases }
    }

    pub(super) fn apply(
        &self,
        nodes: &mut [Node],
        edges: &[Edge],
        distance: f32,
        alpha: f32,
        jiggle: &mut Jiggle,
    ) {
        for (index, edge) in edges.iter().enumerate() {
            if edge.source == edge.target {
                continue;
            }

            let source = &nodes[edge.source];
            let target = &nodes[edge.target];
            let mut delta = (target.pos + target.velocity) - (source.pos + source.velocity);
            if delta.x == 0.0 {
                delta.x = jiggle.sample();
            }
            if delta.y == 0.0 {
                delta.y = jiggle.sample();
            }

            let length = delta.length();
            let scale = (length - distance) / length * alpha * self.strengths[index];
            let correction = delta * scale;
            let bias = self.biases[index];

            nodes[edge.target].velocity -= correction * bias;
            nodes[edge.source].velocity += correction * (1.0 - bias);
        }
    }
}

#[derive(Clone, Copy)]
pub(super) struct CollisionParams {
    pub(super) radius: f32,
    pub(super) strength: f32,
    pub(super) iterations: usize,
}

pub(super) fn apply_collision(
    nodes: &mut [Node],
    params: CollisionParams,
    positions: &mut Vec<Vec2>,
    candidates: &mut Vec<usize>,
    jiggle: &mut Jiggle,
) {
    let radius = params.radius;
    let reach = radius * 2.0;
    let reach_sq = reach * reach;

    for _ in 0..params.iterations {
        positions.clear();
        positions.extend(nodes.iter().map(|node| node.pos + node.velocity));
        let Some(tree) = QuadTree::build(positions) else {
            return;
        };

        for index in 0..nodes.len() {
            let predicted = nodes[index].pos + nodes[index].velocity;
            candidates.clear();
            tree.collect_near(positions[index], reach, candidates);

            for &other in candidates.iter() {
                if other <= index {
                    continue;
                }

                let mut delta =
                    predicted - (nodes[other].pos + nodes[other].velocity);
                let mut length_sq = delta.length_sq();
                if length_sq >= reach_sq {
                    continue;
                }

                if delta.x == 0.0 {
                    delta.x = jiggle.sample();
                    length_sq += delta.x * delta.x;
                }
                if delta.y == 0.0 {
                    delta.y = jiggle.sample();
                    length_sq += delta.y * delta.y;
                }

                let length = length_sq.sqrt();
                let push = delta * ((reach - length) / length * params.strength);

                // Equal radii split the correction evenly.
                nodes[index].velocity += push * 0.5;
                nodes[other].velocity -= push * 0.5;
            }
        }
    }
}

#[derive(Clone, Copy)]
pub(super) struct ChargeParams {
    pub(super) strength: f32,
    pub(super) theta_sq: f32,
    pub(super) distance_min_sq: f32,
    pub(super) alpha: f32,
}

fn charge_between(mut delta: Vec2, weight: f32, params: ChargeParams, jiggle: &mut Jiggle) -> Vec2 {
    let mut length_sq = delta.length_sq();
    if delta.x == 0.0 {
        delta.x = jiggle.sample();
        length_sq += delta.x * delta.x;
    }
    if delta.y == 0.0 {
        delta.y = jiggle.sample();
        length_sq += delta.y * delta.y;
    }
    if length_sq < params.distance_min_sq {
        length_sq = (params.distance_min_sq * length_sq).sqrt();
    }

    delta * (weight * params.alpha / length_sq)
}

/// Barnes-Hut accumulation of the many-body force acting on `index`.
pub(super) fn accumulate_charge_for_node(
    tree: &QuadTree,
    index: usize,
    positions: &[Vec2],
    params: ChargeParams,
    jiggle: &mut Jiggle,
    velocity: &mut Vec2,
) {
    let point = positions[index];

    tree.visit(|cell| {
        if cell.mass <= 0.0 {
            return true;
        }

        let delta = cell.center_of_mass - point;
        let width = cell.extent.size;
        if !cell.extent.contains(point) && (width * width / params.theta_sq) < delta.length_sq() {
            *velocity += charge_between(delta, params.strength * cell.mass, params, jiggle);
            return true;
        }

        for &other in cell.points.iter().filter(|&&other| other != index) {
            *velocity += charge_between(positions[other] - point, params.strength, params, jiggle);
        }
        cell.is_leaf()
    });
}

pub(super) fn apply_charge(
    nodes: &mut [Node],
    params: ChargeParams,
    positions: &mut Vec<Vec2>,
    jiggle: &mut Jiggle,
) {
    positions.clear();
    positions.extend(nodes.iter().map(|node| node.pos));
    let Some(tree) = QuadTree::build(positions) else {
        return;
    };

    for (index, node) in nodes.iter_mut().enumerate() {
        accumulate_charge_for_node(&tree, index, positions, params, jiggle, &mut node.velocity);
    }
}

pub(super) fn apply_center(nodes: &mut [Node], center: Vec2) {
    if nodes.is_empty() {
        return;
    }

    let mut centroid = Vec2::ZERO;
    for node in nodes.iter() {
        centroid += node.pos;
    }
    centroid /= nodes.len() as f32;

    let shift = centroid - center;
    for node in nodes.iter_mut() {
        node.pos -= shift;
    }
}
