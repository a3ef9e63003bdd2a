use eframe::egui::Vec2;

use super::graph::Graph;
use super::interaction::DragState;
use super::simulation::Simulation;
use super::tick::{Scene, ticked};
use super::{LayoutConfig, Viewport};
use crate::dataset::RawEdge;

/// Session state for one displayed dataset.
///
/// Any change of dataset or viewport replaces the simulation wholesale; the
/// previous one is stopped first so only one stepping loop ever touches the
/// nodes.
pub struct GraphView {
    simulation: Simulation,
    viewport: Viewport,
    config: LayoutConfig,
    drag: DragState,
    scene: Scene,
}

impl GraphView {
    pub fn new(raw: &[RawEdge], viewport: Viewport, config: LayoutConfig) -> Self {
        let graph = Graph::build(raw);
        tracing::info!(
            nodes = graph.node_count(),
            edges = graph.edge_count(),
            "graph view created"
        );
        let simulation = Simulation::new(graph, viewport, &config);

        Self {
            simulation,
            viewport,
            config,
            drag: DragState::default(),
            scene: Scene::empty(viewport),
        }
    }

    pub fn graph(&self) -> &Graph {
        self.simulation.graph()
    }

    pub fn simulation(&self) -> &Simulation {
        &self.simulation
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn set_dataset(&mut self, raw: &[RawEdge]) {
        self.simulation.stop();
        *self = Self::new(raw, self.viewport, self.config);
    }

    /// Rebuilds the simulation for a new viewport, keeping node positions.
    /// Returns `false` when the size did not change.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if viewport == self.viewport {
            return false;
        }

        let mut graph = self.simulation.take_graph();
        for node in &mut graph.nodes {
            node.pin = None;
        }
        self.drag.reset();

        tracing::info!(
            width = viewport.width,
            height = viewport.height,
            "viewport resized; rebuilding simulation"
        );
        self.simulation = Simulation::new(graph, viewport, &self.config);
        self.viewport = viewport;
        self.scene.viewport = viewport;
        true
    }

    /// One turn of the stepping loop; refreshes the scene when a step ran.
    pub fn advance(&mut self) -> bool {
        let viewport = self.viewport;
        let config = self.config;
        let scene = &mut self.scene;
        self.simulation
            .advance(|graph| *scene = ticked(graph, viewport, &config))
    }

    /// Advances until the simulation idles or `max_steps` have run. Returns
    /// the number of steps taken.
    pub fn settle(&mut self, max_steps: usize) -> usize {
        let mut steps = 0;
        while steps < max_steps && self.simulation.is_running() {
            self.advance();
            steps += 1;
        }
        steps
    }

    pub fn node_at(&self, point: Vec2) -> Option<usize> {
        let radius_sq = self.config.node_radius * self.config.node_radius;
        self.scene
            .nodes
            .iter()
            .rposition(|node| (node.center - point).length_sq() <= radius_sq)
    }

    pub fn is_dragging(&self) -> bool {
        !self.drag.is_idle()
    }

    pub fn drag_start(&mut self, node: usize, pointer: Vec2) {
        self.drag.drag_start(&mut self.simulation, node, pointer);
    }

    pub fn grab(&mut self, node: usize, pointer: Vec2) {
        self.drag.grab(&mut self.simulation, node, pointer);
    }

    pub fn drag_move(&mut self, node: usize, pointer: Vec2) {
        self.drag.drag_move(&mut self.simulation, node, pointer);
    }

    pub fn drag_end(&mut self, node: usize) {
        self.drag.drag_end(&mut self.simulation, node);
    }
}
