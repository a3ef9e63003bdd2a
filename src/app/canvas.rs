use eframe::egui::{self, Pos2, Rect, Sense, Ui, Vec2};

use crate::layout::{GraphView, Viewport};

use super::ViewModel;
use super::render_utils::{draw_background, draw_scene};

fn to_layout(rect: Rect, screen: Pos2) -> Vec2 {
    screen - rect.min
}

impl ViewModel {
    pub(super) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);
        draw_background(&painter, rect);

        let viewport = Viewport::new(rect.width().round(), rect.height().round());
        if viewport.width < 1.0 || viewport.height < 1.0 {
            return;
        }

        if let Some(view) = self.view.as_mut()
            && view.resize(viewport)
        {
            self.dragged = None;
        }
        let view = self
            .view
            .get_or_insert_with(|| GraphView::new(&self.raw, viewport, self.config));

        if view.graph().node_count() == 0 {
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                "Dataset has no edges. Drop a JSON dataset to show it.",
                egui::FontId::proportional(14.0),
                egui::Color32::GRAY,
            );
            return;
        }

        Self::handle_drag(ui, rect, &response, view, &mut self.dragged);

        let live = view.advance();
        if live || view.is_dragging() {
            ui.ctx().request_repaint();
        }

        let hovered = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer))
            .and_then(|pointer| view.node_at(to_layout(rect, pointer)));
        if self.dragged.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grabbing);
        } else if hovered.is_some() {
            ui.output_mut(|output| output.cursor_icon = egui::CursorIcon::Grab);
        }

        draw_scene(&painter, rect.min, view.scene(), view.config());
    }

    fn handle_drag(
        ui: &Ui,
        rect: Rect,
        response: &egui::Response,
        view: &mut GraphView,
        dragged: &mut Option<usize>,
    ) {
        if response.drag_started_by(egui::PointerButton::Primary) {
            let origin = ui
                .input(|input| input.pointer.press_origin())
                .or_else(|| response.interact_pointer_pos());
            if let Some(origin) = origin
                && let Some(node) = view.node_at(to_layout(rect, origin))
            {
                view.grab(node, to_layout(rect, origin));
                if let Some(pointer) = response.interact_pointer_pos() {
                    view.drag_move(node, to_layout(rect, pointer));
                }
                *dragged = Some(node);
            }
        } else if response.dragged()
            && let (Some(node), Some(pointer)) = (*dragged, response.interact_pointer_pos())
        {
            view.drag_move(node, to_layout(rect, pointer));
        }

        if response.drag_stopped()
            && let Some(node) = dragged.take()
        {
            view.drag_end(node);
        }
    }
}
