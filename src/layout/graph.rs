use std::collections::HashMap;

use eframe::egui::Vec2;

use crate::dataset::RawEdge;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EdgeKind {
    RequestRejected,
    RequestAccepted,
    Response,
    Other(String),
}

impl EdgeKind {
    pub fn parse(value: &str) -> Self {
        match value {
            "request-rejected" => Self::RequestRejected,
            "request-accepted" => Self::RequestAccepted,
            "response" => Self::Response,
            other => Self::Other(other.to_owned()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::RequestRejected => "request-rejected",
            Self::RequestAccepted => "request-accepted",
            Self::Response => "response",
            Self::Other(value) => value,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

#[derive(Clone, Debug)]
pub struct Node {
    pub name: String,
    pub pos: Vec2,
    pub velocity: Vec2,
    /// Drag override; while set the simulation holds the node here.
    pub pin: Option<Vec2>,
}

impl Node {
    fn new(name: String) -> Self {
        Self {
            name,
            pos: Vec2::ZERO,
            velocity: Vec2::ZERO,
            pin: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Edge {
    pub source: usize,
    pub target: usize,
    pub kind: EdgeKind,
    /// -1, 0 or 1: which side of a reciprocal pair this edge bows toward.
    pub target_distance: i8,
    pub offset: Vec2,
}

#[derive(Clone, Debug, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
    index_by_name: HashMap<String, usize>,
    pub(super) placed: bool,
}

impl Graph {
    pub fn build(raw_edges: &[RawEdge]) -> Self {
        let mut graph = Self::default();

        for raw in raw_edges {
            let source = graph.resolve(&raw.source);
            let target = graph.resolve(&raw.target);
            graph.edges.push(Edge {
                source,
                target,
                kind: EdgeKind::parse(&raw.kind),
                target_distance: 0,
                offset: Vec2::ZERO,
            });
        }

        assign_target_distances(&mut graph.edges);
        tracing::debug!(
            nodes = graph.nodes.len(),
            edges = graph.edges.len(),
            "built graph"
        );
        graph
    }

    fn resolve(&mut self, name: &str) -> usize {
        if let Some(&index) = self.index_by_name.get(name) {
            return index;
        }

        let index = self.nodes.len();
        self.nodes.push(Node::new(name.to_owned()));
        self.index_by_name.insert(name.to_owned(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index_by_name.get(name).copied()
    }

    pub fn node(&self, name: &str) -> Option<&Node> {
        self.index_of(name).map(|index| &self.nodes[index])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

/// Flags the first reverse partner of each edge so reciprocal pairs bow apart.
fn assign_target_distances(edges: &mut [Edge]) {
    for i in 0..edges.len() {
        if edges[i].target_distance == -1 {
            continue;
        }

        for j in (i + 1)..edges.len() {
            if edges[j].target_distance == -1 {
                continue;
            }

            if edges[i].source == edges[j].target && edges[i].target == edges[j].source {
                edges[i].target_distance = 1;
                edges[j].target_distance = -1;
                break;
            }
        }
    }
}
