mod forces;
mod quadtree;

use std::f32::consts::PI;

use eframe::egui::{Vec2, vec2};

use super::graph::Graph;
use super::{LayoutConfig, Viewport};
use forces::{ChargeParams, CollisionParams, LinkForce, apply_center, apply_charge, apply_collision};

pub(super) struct Jiggle {
    state: u64,
}

impl Default for Jiggle {
    fn default() -> Self {
        Self { state: 1 }
    }
}

impl Jiggle {
    const MULTIPLIER: u64 = 1_664_525;
    const INCREMENT: u64 = 1_013_904_223;
    const MODULUS: u64 = 1 << 32;

    fn uniform(&mut self) -> f32 {
        self.state = (Self::MULTIPLIER * self.state + Self::INCREMENT) % Self::MODULUS;
        (self.state as f64 / Self::MODULUS as f64) as f32
    }

    pub(super) fn sample(&mut self) -> f32 {
        (self.uniform() - 0.5) * 1e-6
    }
}

#[derive(Default)]
struct Scratch {
    positions: Vec<Vec2>,
    candidates: Vec<usize>,
}

/// Force-directed layout over a [`Graph`] it owns.
///
/// Stepping is driven from outside: the host calls [`Simulation::advance`]
/// once per frame. Each step cools `alpha` toward `alpha_target`; once alpha
/// drops below `alpha_min` the simulation goes idle until [`Simulation::restart`].
pub struct Simulation {
    graph: Graph,
    config: LayoutConfig,
    viewport: Viewport,
    alpha: f32,
    alpha_target: f32,
    running: bool,
    links: LinkForce,
    jiggle: Jiggle,
    scratch: Scratch,
}

impl Simulation {
    pub fn new(mut graph: Graph, viewport: Viewport, config: &LayoutConfig) -> Self {
        initialize_nodes(&mut graph, config.initial_radius);
        let links = LinkForce::new(graph.nodes.len(), &graph.edges);
        tracing::debug!(
            nodes = graph.nodes.len(),
            width = viewport.width,
            height = viewport.height,
            "simulation created"
        );

        Self {
            graph,
            config: *config,
            viewport,
            alpha: 1.0,
            alpha_target: 0.0,
            running: true,
            links,
            jiggle: Jiggle::default(),
            scratch: Scratch::default(),
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn alpha(&self) -> f32 {
        self.alpha
    }

    pub fn alpha_target(&self) -> f32 {
        self.alpha_target
    }

    pub fn set_alpha_target(&mut self, alpha_target: f32) {
        self.alpha_target = alpha_target;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn restart(&mut self) {
        if !self.running {
            tracing::debug!(alpha = self.alpha, "simulation restarted");
        }
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Stops the stepping loop and hands back the graph, leaving this
    /// simulation empty.
    pub fn take_graph(&mut self) -> Graph {
        self.stop();
        std::mem::take(&mut self.graph)
    }

    /// One stepping-loop turn. Steps once if running, then calls `on_tick`
    /// before returning. Returns whether the loop is still live.
    pub fn advance(&mut self, on_tick: impl FnOnce(&mut Graph)) -> bool {
        if !self.running {
            return false;
        }

        self.step();
        on_tick(&mut self.graph);

        if self.alpha < self.config.alpha_min {
            self.running = false;
            tracing::debug!(alpha = self.alpha, "simulation idle");
        }
        self.running
    }

    /// Applies every force once and integrates positions. Does not consult
    /// the running flag.
    pub fn step(&mut self) {
        self.alpha += (self.alpha_target - self.alpha) * self.config.alpha_decay;
        let alpha = self.alpha;
        let config = &self.config;
        let nodes = &mut self.graph.nodes;

        self.links.apply(
            nodes,
            &self.graph.edges,
            config.link_distance,
            alpha,
            &mut self.jiggle,
        );
        apply_collision(
            nodes,
            CollisionParams {
                radius: config.collide_radius(),
                strength: config.collide_strength,
                iterations: config.collide_iterations,
            },
            &mut self.scratch.positions,
            &mut self.scratch.candidates,
            &mut self.jiggle,
        );
        apply_charge(
            nodes,
            ChargeParams {
                strength: config.charge_strength,
                theta_sq: config.theta * config.theta,
                distance_min_sq: config.charge_distance_min * config.charge_distance_min,
                alpha,
            },
            &mut self.scratch.positions,
            &mut self.jiggle,
        );
        apply_center(nodes, self.viewport.center());

        let retain = 1.0 - config.velocity_decay;
        for node in nodes.iter_mut() {
            match node.pin {
                Some(pin) => {
                    node.pos = pin;
                    node.velocity = Vec2::ZERO;
                }
                None => {
                    node.velocity *= retain;
                    node.pos += node.velocity;
                }
            }
        }
    }
}

/// Places unplaced nodes on a phyllotaxis spiral around the origin and snaps
/// pinned nodes to their pins.
fn initialize_nodes(graph: &mut Graph, initial_radius: f32) {
    let initial_angle = PI * (3.0 - 5.0_f32.sqrt());
    let place = !graph.placed;

    for (index, node) in graph.nodes.iter_mut().enumerate() {
        if let Some(pin) = node.pin {
            node.pos = pin;
        } else if place {
            let radius = initial_radius * (0.5 + index as f32).sqrt();
            let angle = index as f32 * initial_angle;
            node.pos = vec2(radius * angle.cos(), radius * angle.sin());
        }
        if !node.velocity.x.is_finite() || !node.velocity.y.is_finite() {
            node.velocity = Vec2::ZERO;
        }
    }

    graph.placed = true;
}
