//! Force-directed layout and rendering core.
//!
//! A dataset of [`RawEdge`](crate::dataset::RawEdge) records is turned into a
//! [`Graph`], handed to a [`Simulation`] that owns it, and every simulation
//! step is followed by [`ticked`], which produces the [`Scene`] a front end
//! paints. [`GraphView`] ties these together with the drag state.

pub mod geometry;
pub mod graph;
pub mod interaction;
pub mod simulation;
pub mod svg;
pub mod tick;
pub mod view;

use eframe::egui::{Vec2, vec2};

pub use graph::{Edge, EdgeKind, Graph, Node};
pub use interaction::DragState;
pub use simulation::Simulation;
pub use tick::{EdgeLabel, EdgeShape, Marker, NodeShape, Scene, ticked};
pub use view::GraphView;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(self) -> Vec2 {
        vec2(self.width * 0.5, self.height * 0.5)
    }
}

#[derive(Clone, Copy, Debug)]
pub struct LayoutConfig {
    pub node_radius: f32,
    /// Gap kept between a node's rim and the viewport edge.
    pub padding: f32,
    pub link_distance: f32,
    pub collide_iterations: usize,
    pub collide_strength: f32,
    pub charge_strength: f32,
    pub theta: f32,
    pub charge_distance_min: f32,
    pub alpha_min: f32,
    pub alpha_decay: f32,
    pub velocity_decay: f32,
    /// Alpha target held while a node is being dragged.
    pub drag_alpha_target: f32,
    pub initial_radius: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        let alpha_min = 0.001_f32;
        Self {
            node_radius: 25.0,
            padding: 10.0,
            link_distance: 200.0,
            collide_iterations: 4,
            collide_strength: 1.0,
            charge_strength: -200.0,
            theta: 0.9,
            charge_distance_min: 1.0,
            alpha_min,
            alpha_decay: 1.0 - alpha_min.powf(1.0 / 300.0),
            velocity_decay: 0.4,
            drag_alpha_target: 0.3,
            initial_radius: 10.0,
        }
    }
}

impl LayoutConfig {
    pub fn collide_radius(&self) -> f32 {
        self.node_radius + 0.5
    }

    /// Distance from the viewport edge inside which node centres are kept.
    pub fn force_padding(&self) -> f32 {
        self.node_radius + self.padding
    }

    /// Perpendicular offset applied per unit of an edge's target distance.
    pub fn target_distance_unit(&self) -> f32 {
        self.node_radius / 4.0
    }
}
