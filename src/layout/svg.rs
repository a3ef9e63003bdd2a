use std::fmt::{self, Write};

use super::LayoutConfig;
use super::tick::{Marker, Scene};

const STYLE: &str = "\
.link { fill: none; stroke: #666; stroke-width: 1.5px; }
.link.request-rejected { stroke: #d9534f; }
.link.request-accepted { stroke: #5cb85c; }
.link.response { stroke: #337ab7; }
marker#request-rejected { fill: #d9534f; }
marker#request-accepted { fill: #5cb85c; }
marker#response { fill: #337ab7; }
circle { fill: #ccc; stroke: #333; stroke-width: 1.5px; }
.link-label, .node-label { font: 11px sans-serif; pointer-events: none; }";

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for character in text.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

pub fn render_svg(scene: &Scene, config: &LayoutConfig) -> Result<String, fmt::Error> {
    let mut out = String::new();
    write_svg(&mut out, scene, config)?;
    Ok(out)
}

fn write_svg(out: &mut String, scene: &Scene, config: &LayoutConfig) -> fmt::Result {
    writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        scene.viewport.width, scene.viewport.height
    )?;
    writeln!(out, "<style>\n{STYLE}\n</style>")?;

    writeln!(out, "<defs>")?;
    for marker in Marker::ALL {
        writeln!(
            out,
            r#"<marker id="{}" markerWidth="8" markerHeight="8" refX="{}" refY="4" orient="auto" markerUnits="userSpaceOnUse"><path d="M0,0 L0,8 L8,4 z"/></marker>"#,
            marker.id(),
            config.node_radius + 8.0
        )?;
    }
    writeln!(out, "</defs>")?;

    writeln!(out, "<g>")?;
    for edge in &scene.edges {
        let kind = escape(edge.kind.label());
        write!(
            out,
            r#"<path id="{}" class="link {kind}" d="M{},{} L{},{}" transform="translate({}, {})""#,
            edge.id, edge.start.x, edge.start.y, edge.end.x, edge.end.y, edge.offset.x, edge.offset.y
        )?;
        if let Some(marker) = edge.marker {
            write!(out, r#" marker-end="url(#{})""#, marker.id())?;
        }
        writeln!(out, "/>")?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, "<g>")?;
    for label in &scene.labels {
        let transform = if label.rotation_degrees == 0.0 {
            "rotate(0)".to_owned()
        } else {
            format!(
                "rotate({},{},{})",
                label.rotation_degrees, label.anchor.x, label.anchor.y
            )
        };
        writeln!(
            out,
            r##"<text class="link-label" text-anchor="middle" dy="0.31em" transform="{transform}"><textPath href="#{}" startOffset="50%">{}</textPath></text>"##,
            label.path_id,
            escape(&label.text)
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, "<g>")?;
    for node in &scene.nodes {
        writeln!(
            out,
            r#"<circle r="{}" transform="translate({},{})"/>"#,
            config.node_radius, node.center.x, node.center.y
        )?;
    }
    writeln!(out, "</g>")?;

    writeln!(out, "<g>")?;
    for node in &scene.nodes {
        writeln!(
            out,
            r#"<text class="node-label" y=".31em" text-anchor="middle" transform="translate({},{})">{}</text>"#,
            node.center.x,
            node.center.y,
            escape(&node.name)
        )?;
    }
    writeln!(out, "</g>")?;
    writeln!(out, "</svg>")
}
