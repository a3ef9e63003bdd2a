//! Property tests for the layout core: graph building, curvature offsets and
//! viewport clamping.

use std::collections::{BTreeSet, HashSet};

use eframe::egui::{Vec2, vec2};
use proptest::prelude::*;

use trace_graph::dataset::RawEdge;
use trace_graph::layout::geometry::calc_translation;
use trace_graph::layout::{Graph, LayoutConfig, Viewport, ticked};

const NAMES: [&str; 6] = ["gateway", "auth", "billing", "ledger", "mailer", "search"];

fn raw_edges_strategy(max_len: usize) -> impl Strategy<Value = Vec<RawEdge>> {
    prop::collection::vec((0..NAMES.len(), 0..NAMES.len(), 0..4usize), 0..max_len).prop_map(
        |triples| {
            triples
                .into_iter()
                .map(|(source, target, kind)| {
                    let kind = ["request-rejected", "request-accepted", "response", "other"][kind];
                    RawEdge::new(NAMES[source], NAMES[target], kind)
                })
                .collect()
        },
    )
}

/// Edges with distinct directed endpoint pairs and no self loops.
fn unique_edges_strategy() -> impl Strategy<Value = Vec<RawEdge>> {
    raw_edges_strategy(40).prop_map(|edges| {
        let mut seen = HashSet::new();
        edges
            .into_iter()
            .filter(|edge| edge.source != edge.target)
            .filter(|edge| seen.insert((edge.source.clone(), edge.target.clone())))
            .collect()
    })
}

fn point_strategy() -> impl Strategy<Value = Vec2> {
    (-2000.0f32..2000.0, -2000.0f32..2000.0).prop_map(|(x, y)| vec2(x, y))
}

proptest! {
    #[test]
    fn node_table_holds_each_name_once(raw in raw_edges_strategy(30)) {
        let graph = Graph::build(&raw);

        let expected = raw
            .iter()
            .flat_map(|edge| [edge.source.as_str(), edge.target.as_str()])
            .collect::<BTreeSet<_>>();
        let actual = graph.nodes.iter().map(|node| node.name.as_str()).collect::<BTreeSet<_>>();
        prop_assert_eq!(&actual, &expected);
        prop_assert_eq!(graph.node_count(), expected.len());

        for (edge, source) in graph.edges.iter().zip(&raw) {
            prop_assert_eq!(&graph.nodes[edge.source].name, &source.source);
            prop_assert_eq!(&graph.nodes[edge.target].name, &source.target);
            prop_assert_eq!(graph.index_of(&source.source), Some(edge.source));
            prop_assert_eq!(graph.index_of(&source.target), Some(edge.target));
        }
    }

    #[test]
    fn reciprocal_pairs_get_opposite_flags(raw in unique_edges_strategy()) {
        let graph = Graph::build(&raw);

        for (index, edge) in graph.edges.iter().enumerate() {
            let reverse = graph
                .edges
                .iter()
                .position(|other| other.source == edge.target && other.target == edge.source);

            match reverse {
                Some(partner) => {
                    let partner_flag = graph.edges[partner].target_distance;
                    prop_assert_eq!(edge.target_distance + partner_flag, 0);
                    prop_assert_eq!(edge.target_distance.abs(), 1);
                    let expected = if index < partner { 1 } else { -1 };
                    prop_assert_eq!(edge.target_distance, expected);
                }
                None => prop_assert_eq!(edge.target_distance, 0),
            }
        }
    }

    #[test]
    fn rebuilding_is_idempotent(raw in raw_edges_strategy(40)) {
        let first = Graph::build(&raw);
        let second = Graph::build(&raw);

        let first_flags = first.edges.iter().map(|edge| edge.target_distance).collect::<Vec<_>>();
        let second_flags = second.edges.iter().map(|edge| edge.target_distance).collect::<Vec<_>>();
        prop_assert_eq!(first_flags, second_flags);
    }

    #[test]
    fn translation_has_requested_magnitude(
        distance in -20.0f32..20.0,
        p0 in point_strategy(),
        p1 in point_strategy(),
    ) {
        prop_assume!((p1 - p0).length() > 1e-2);

        let offset = calc_translation(distance, p0, p1);
        let tolerance = 1e-3 * distance.abs().max(1.0);
        prop_assert!((offset.length() - distance.abs()).abs() <= tolerance,
            "offset {:?} for distance {}", offset, distance);
    }

    #[test]
    fn horizontal_translation_is_exact(distance in -20.0f32..20.0, y in -500.0f32..500.0, x0 in -500.0f32..500.0, x1 in -500.0f32..500.0) {
        prop_assert_eq!(calc_translation(distance, vec2(x0, y), vec2(x1, y)), vec2(0.0, distance));
    }

    #[test]
    fn tick_keeps_nodes_inside_viewport(
        raw in raw_edges_strategy(20),
        positions in prop::collection::vec(point_strategy(), 12),
        width in 70.0f32..2400.0,
        height in 70.0f32..1600.0,
    ) {
        let mut graph = Graph::build(&raw);
        for (node, position) in graph.nodes.iter_mut().zip(&positions) {
            node.pos = *position;
        }

        let scene = ticked(&mut graph, Viewport::new(width, height), &LayoutConfig::default());

        for node in &scene.nodes {
            prop_assert!(node.center.x >= 35.0 && node.center.x <= width - 35.0);
            prop_assert!(node.center.y >= 35.0 && node.center.y <= height - 35.0);
        }
    }
}
