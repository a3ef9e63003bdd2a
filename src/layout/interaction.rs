use eframe::egui::Vec2;

use super::simulation::Simulation;

#[derive(Clone, Copy, Debug)]
struct Gesture {
    node: usize,
    grab_offset: Vec2,
}

/// Drag gestures in progress, one entry per dragged node.
///
/// The first gesture reheats the simulation and the last one to end lets it
/// cool again; gestures in between only move pins.
#[derive(Debug, Default)]
pub struct DragState {
    active: Vec<Gesture>,
}

impl DragState {
    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    pub fn is_dragging(&self, node: usize) -> bool {
        self.active.iter().any(|gesture| gesture.node == node)
    }

    pub fn drag_start(&mut self, simulation: &mut Simulation, node: usize, pointer: Vec2) {
        self.begin(simulation, node, pointer, Vec2::ZERO);
    }

    /// Starts a gesture at a pointer that may sit anywhere on the node's disc.
    /// The node stays where it is and keeps that offset from the pointer.
    pub fn grab(&mut self, simulation: &mut Simulation, node: usize, pointer: Vec2) {
        let Some(grabbed) = simulation.graph().nodes.get(node) else {
            return;
        };
        let grab_offset = grabbed.pos - pointer;
        self.begin(simulation, node, pointer, grab_offset);
    }

    fn begin(&mut self, simulation: &mut Simulation, node: usize, pointer: Vec2, grab_offset: Vec2) {
        if node >= simulation.graph().node_count() || self.is_dragging(node) {
            return;
        }

        if self.is_idle() {
            let target = simulation.config().drag_alpha_target;
            simulation.set_alpha_target(target);
            simulation.restart();
        }

        self.active.push(Gesture { node, grab_offset });
        simulation.graph_mut().nodes[node].pin = Some(pointer + grab_offset);
    }

    pub fn drag_move(&mut self, simulation: &mut Simulation, node: usize, pointer: Vec2) {
        let Some(gesture) = self.active.iter().find(|gesture| gesture.node == node) else {
            return;
        };

        if let Some(dragged) = simulation.graph_mut().nodes.get_mut(node) {
            dragged.pin = Some(pointer + gesture.grab_offset);
        }
    }

    pub fn drag_end(&mut self, simulation: &mut Simulation, node: usize) {
        let Some(position) = self.active.iter().position(|gesture| gesture.node == node) else {
            return;
        };
        self.active.swap_remove(position);

        if self.is_idle() {
            simulation.set_alpha_target(0.0);
        }

        if let Some(released) = simulation.graph_mut().nodes.get_mut(node) {
            released.pin = None;
        }
    }

    /// Forgets every gesture without touching a simulation. Used when the
    /// simulation the gestures referred to has been replaced.
    pub fn reset(&mut self) {
        self.active.clear();
    }
}
