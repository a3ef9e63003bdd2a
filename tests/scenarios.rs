use eframe::egui::vec2;

use trace_graph::dataset::{RawEdge, parse_edges};
use trace_graph::layout::svg::render_svg;
use trace_graph::layout::{Graph, GraphView, LayoutConfig, Viewport};

#[test]
fn reciprocal_pair_scenario() {
    let raw = parse_edges(
        r#"[{"source":"A","target":"B","type":"response"},
            {"source":"B","target":"A","type":"response"}]"#,
    )
    .expect("dataset parses");
    let graph = Graph::build(&raw);

    assert_eq!(graph.node_count(), 2);
    assert!(graph.node("A").is_some());
    assert!(graph.node("B").is_some());
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.edges[0].target_distance, 1);
    assert_eq!(graph.edges[1].target_distance, -1);
}

#[test]
fn single_edge_scenario() {
    let graph = Graph::build(&[RawEdge::new("A", "B", "response")]);

    assert_eq!(graph.edge_count(), 1);
    assert_eq!(graph.edges[0].target_distance, 0);
}

#[test]
fn drag_then_release_scenario() {
    let mut view = GraphView::new(
        &[
            RawEdge::new("A", "B", "response"),
            RawEdge::new("B", "C", "request-accepted"),
        ],
        Viewport::new(1200.0, 800.0),
        LayoutConfig::default(),
    );
    view.settle(400);
    assert!(!view.simulation().is_running());

    let a = view.graph().index_of("A").expect("A exists");
    let target = vec2(100.0, 200.0);
    view.drag_start(a, target);
    assert!(view.simulation().is_running());
    for _ in 0..5 {
        view.advance();
    }
    assert_eq!(view.graph().nodes[a].pos, target);

    view.drag_end(a);
    assert_eq!(view.graph().nodes[a].pin, None);
    for _ in 0..20 {
        view.advance();
    }
    assert_ne!(view.graph().nodes[a].pos, target);
}

#[test]
fn settled_layout_stays_in_view_and_exports() {
    let raw = vec![
        RawEdge::new("gateway", "auth", "request-accepted"),
        RawEdge::new("auth", "gateway", "response"),
        RawEdge::new("gateway", "billing", "request-rejected"),
        RawEdge::new("billing", "ledger", "request-accepted"),
        RawEdge::new("ledger", "billing", "response"),
        RawEdge::new("gateway", "search", "timeout"),
    ];
    let viewport = Viewport::new(900.0, 600.0);
    let mut view = GraphView::new(&raw, viewport, LayoutConfig::default());

    let steps = view.settle(1000);
    assert!(steps < 1000);

    let scene = view.scene();
    assert_eq!(scene.nodes.len(), 5);
    for node in &scene.nodes {
        assert!(node.center.x >= 35.0 && node.center.x <= 865.0);
        assert!(node.center.y >= 35.0 && node.center.y <= 565.0);
    }
    for (first, second) in [(0, 1), (3, 4)] {
        assert_eq!(
            scene.edges[first].offset,
            -scene.edges[second].offset,
            "reciprocal offsets mirror each other"
        );
    }

    let svg = render_svg(scene, view.config()).expect("svg renders");
    assert_eq!(svg.matches("<path id=\"link-").count(), 6);
    assert_eq!(svg.matches("marker-end=").count(), 5);
}
