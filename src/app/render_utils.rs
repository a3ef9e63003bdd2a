use eframe::egui::emath::Rot2;
use eframe::egui::epaint::TextShape;
use eframe::egui::{Align2, Color32, FontId, Painter, Pos2, Rect, Shape, Stroke};

use crate::layout::geometry::arrowhead;
use crate::layout::{EdgeKind, LayoutConfig, Scene};

const GRID_STEP: f32 = 56.0;
const ARROW_SIZE: f32 = 8.0;

pub(super) fn edge_color(kind: &EdgeKind) -> Color32 {
    match kind {
        EdgeKind::RequestRejected => Color32::from_rgb(217, 83, 79),
        EdgeKind::RequestAccepted => Color32::from_rgb(92, 184, 92),
        EdgeKind::Response => Color32::from_rgb(51, 122, 183),
        EdgeKind::Other(_) => Color32::from_rgb(140, 146, 156),
    }
}

pub(super) fn draw_background(painter: &Painter, rect: Rect) {
    painter.rect_filled(rect, 0.0, Color32::from_rgb(19, 23, 29));

    let stroke = Stroke::new(1.0, Color32::from_rgba_unmultiplied(60, 70, 80, 70));
    let mut x = rect.left() + GRID_STEP;
    while x < rect.right() {
        painter.line_segment([Pos2::new(x, rect.top()), Pos2::new(x, rect.bottom())], stroke);
        x += GRID_STEP;
    }

    let mut y = rect.top() + GRID_STEP;
    while y < rect.bottom() {
        painter.line_segment([Pos2::new(rect.left(), y), Pos2::new(rect.right(), y)], stroke);
        y += GRID_STEP;
    }
}

/// Draws `text` centred on `anchor` and rotated by `angle` radians.
fn rotated_label(painter: &Painter, anchor: Pos2, angle: f32, text: &str, color: Color32) {
    let galley = painter.layout_no_wrap(text.to_owned(), FontId::proportional(11.0), color);
    let half_size = galley.size() * 0.5;
    let top_left = anchor - Rot2::from_angle(angle) * half_size;
    painter.add(Shape::Text(
        TextShape::new(top_left, galley, color).with_angle(angle),
    ));
}

/// Paints a scene whose layout origin sits at `origin` on screen.
pub(super) fn draw_scene(painter: &Painter, origin: Pos2, scene: &Scene, config: &LayoutConfig) {
    let offset = origin.to_vec2();

    for edge in &scene.edges {
        let color = edge_color(&edge.kind);
        let start = edge.path_start() + offset;
        let end = edge.path_end() + offset;
        painter.line_segment([start.to_pos2(), end.to_pos2()], Stroke::new(1.5, color));

        if edge.marker.is_some() {
            let points = arrowhead(start, end, config.node_radius, ARROW_SIZE)
                .map(|point| point.to_pos2())
                .to_vec();
            painter.add(Shape::convex_polygon(points, color, Stroke::NONE));
        }
    }

    let label_color = Color32::from_rgb(196, 202, 210);
    for label in &scene.labels {
        let anchor = (label.anchor + offset).to_pos2();
        rotated_label(painter, anchor, label.text_angle(), &label.text, label_color);
    }

    let fill = Color32::from_rgb(58, 66, 78);
    let rim = Stroke::new(1.5, Color32::from_rgb(150, 160, 172));
    for node in &scene.nodes {
        let center = (node.center + offset).to_pos2();
        painter.circle(center, config.node_radius, fill, rim);
        painter.text(
            center,
            Align2::CENTER_CENTER,
            &node.name,
            FontId::proportional(12.0),
            Color32::WHITE,
        );
    }
}
