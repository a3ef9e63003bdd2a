use eframe::egui::Vec2;

use super::geometry::{calc_translation, clamp_axis};
use super::graph::{EdgeKind, Graph};
use super::{LayoutConfig, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Marker {
    RequestRejected,
    RequestAccepted,
    Response,
}

impl Marker {
    pub const ALL: [Marker; 3] = [Self::RequestRejected, Self::RequestAccepted, Self::Response];

    pub fn for_kind(kind: &EdgeKind) -> Option<Self> {
        match kind {
            EdgeKind::RequestRejected => Some(Self::RequestRejected),
            EdgeKind::RequestAccepted => Some(Self::RequestAccepted),
            EdgeKind::Response => Some(Self::Response),
            EdgeKind::Other(_) => None,
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::RequestRejected => "request-rejected",
            Self::RequestAccepted => "request-accepted",
            Self::Response => "response",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EdgeShape {
    pub id: String,
    pub kind: EdgeKind,
    pub start: Vec2,
    pub end: Vec2,
    pub offset: Vec2,
    pub marker: Option<Marker>,
}

impl EdgeShape {
    pub fn path_start(&self) -> Vec2 {
        self.start + self.offset
    }

    pub fn path_end(&self) -> Vec2 {
        self.end + self.offset
    }
}

#[derive(Clone, Debug)]
pub struct EdgeLabel {
    pub path_id: String,
    pub text: String,
    pub anchor: Vec2,
    /// 180 when the edge runs right to left, so the text stays upright.
    pub rotation_degrees: f32,
    pub path_angle: f32,
}

impl EdgeLabel {
    pub fn text_angle(&self) -> f32 {
        self.path_angle + self.rotation_degrees.to_radians()
    }
}

#[derive(Clone, Debug)]
pub struct NodeShape {
    pub name: String,
    pub center: Vec2,
}

#[derive(Clone, Debug)]
pub struct Scene {
    pub viewport: Viewport,
    pub edges: Vec<EdgeShape>,
    pub labels: Vec<EdgeLabel>,
    pub nodes: Vec<NodeShape>,
}

impl Scene {
    pub fn empty(viewport: Viewport) -> Self {
        Self {
            viewport,
            edges: Vec::new(),
            labels: Vec::new(),
            nodes: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Per-step geometry update.
///
/// Edge offsets are computed from the positions the step produced, then node
/// positions are clamped into the viewport. The clamp is written back to the
/// graph so the next step starts from the visible position.
pub fn ticked(graph: &mut Graph, viewport: Viewport, config: &LayoutConfig) -> Scene {
    let unit = config.target_distance_unit();
    let mut edges = Vec::with_capacity(graph.edges.len());
    let mut labels = Vec::with_capacity(graph.edges.len());

    for (index, edge) in graph.edges.iter_mut().enumerate() {
        let start = graph.nodes[edge.source].pos;
        let end = graph.nodes[edge.target].pos;
        edge.offset = calc_translation(f32::from(edge.target_distance) * unit, start, end);

        let id = format!("link-{index}");
        let delta = end - start;
        let rotation_degrees = if end.x < start.x { 180.0 } else { 0.0 };
        labels.push(EdgeLabel {
            path_id: id.clone(),
            text: edge.kind.label().to_owned(),
            anchor: (start + end) * 0.5 + edge.offset,
            rotation_degrees,
            path_angle: delta.y.atan2(delta.x),
        });
        edges.push(EdgeShape {
            id,
            kind: edge.kind.clone(),
            start,
            end,
            offset: edge.offset,
            marker: Marker::for_kind(&edge.kind),
        });
    }

    let padding = config.force_padding();
    let nodes = graph
        .nodes
        .iter_mut()
        .map(|node| {
            node.pos.x = clamp_axis(node.pos.x, viewport.width, padding);
            node.pos.y = clamp_axis(node.pos.y, viewport.height, padding);
            NodeShape {
                name: node.name.clone(),
                center: node.pos,
            }
        })
        .collect();

    Scene {
        viewport,
        edges,
        labels,
        nodes,
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::vec2;

    use super::*;
    use crate::dataset::RawEdge;

    fn graph_at(raw: &[RawEdge], positions: &[Vec2]) -> Graph {
        let mut graph = Graph::build(raw);
        for (node, position) in graph.nodes.iter_mut().zip(positions) {
            node.pos = *position;
        }
        graph
    }

    #[test]
    fn reciprocal_edges_offset_in_opposite_directions() {
        let mut graph = graph_at(
            &[
                RawEdge::new("A", "B", "request-accepted"),
                RawEdge::new("B", "A", "response"),
            ],
            &[vec2(100.0, 300.0), vec2(500.0, 300.0)],
        );

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        assert_eq!(scene.edges[0].offset, vec2(0.0, 6.25));
        assert_eq!(scene.edges[1].offset, vec2(0.0, -6.25));
        assert_eq!(graph.edges[0].offset, vec2(0.0, 6.25));
        assert_eq!(scene.edges[0].path_start(), vec2(100.0, 306.25));
        assert_eq!(scene.edges[0].id, "link-0");
        assert_eq!(scene.edges[1].id, "link-1");
    }

    #[test]
    fn reciprocal_paths_do_not_overlap_on_slopes() {
        let mut graph = graph_at(
            &[
                RawEdge::new("A", "B", "request-accepted"),
                RawEdge::new("B", "A", "response"),
            ],
            &[vec2(100.0, 100.0), vec2(400.0, 500.0)],
        );

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        let first_mid = (scene.edges[0].path_start() + scene.edges[0].path_end()) * 0.5;
        let second_mid = (scene.edges[1].path_start() + scene.edges[1].path_end()) * 0.5;
        assert!((first_mid - second_mid).length() > 12.0);
    }

    #[test]
    fn label_flips_for_leftward_edges() {
        let mut graph = graph_at(
            &[
                RawEdge::new("A", "B", "response"),
                RawEdge::new("C", "A", "response"),
            ],
            &[vec2(200.0, 200.0), vec2(400.0, 200.0), vec2(600.0, 200.0)],
        );

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        assert_eq!(scene.labels[0].rotation_degrees, 0.0);
        assert_eq!(scene.labels[1].rotation_degrees, 180.0);
        assert_eq!(scene.labels[1].anchor, vec2(400.0, 200.0));
        assert_eq!(scene.labels[1].path_id, "link-1");
        assert_eq!(scene.labels[0].text, "response");
    }

    #[test]
    fn nodes_are_clamped_and_written_back() {
        let mut graph = graph_at(
            &[RawEdge::new("A", "B", "response")],
            &[vec2(-50.0, 900.0), vec2(600.0, 10.0)],
        );

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        assert_eq!(scene.nodes[0].center, vec2(35.0, 765.0));
        assert_eq!(scene.nodes[1].center, vec2(600.0, 35.0));
        assert_eq!(graph.nodes[0].pos, vec2(35.0, 765.0));
    }

    #[test]
    fn edges_use_positions_before_clamping() {
        let mut graph = graph_at(
            &[RawEdge::new("A", "B", "response")],
            &[vec2(-50.0, 100.0), vec2(600.0, 100.0)],
        );

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        assert_eq!(scene.edges[0].start, vec2(-50.0, 100.0));
        assert_eq!(scene.nodes[0].center, vec2(35.0, 100.0));
    }

    #[test]
    fn unknown_type_has_no_marker() {
        let mut graph = graph_at(
            &[
                RawEdge::new("A", "B", "timeout"),
                RawEdge::new("B", "C", "request-rejected"),
            ],
            &[vec2(100.0, 100.0), vec2(200.0, 200.0), vec2(300.0, 100.0)],
        );

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        assert_eq!(scene.edges[0].marker, None);
        assert_eq!(scene.edges[1].marker, Some(Marker::RequestRejected));
    }

    #[test]
    fn self_loop_is_degenerate_not_fatal() {
        let mut graph = graph_at(&[RawEdge::new("A", "A", "response")], &[vec2(300.0, 300.0)]);

        let scene = ticked(&mut graph, Viewport::new(1200.0, 800.0), &LayoutConfig::default());

        assert_eq!(scene.edges[0].start, scene.edges[0].end);
        assert_eq!(scene.nodes.len(), 1);
    }
}
