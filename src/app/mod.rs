use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use eframe::egui::{self, Context};

use crate::dataset::{RawEdge, load_dataset, parse_edges};
use crate::layout::{GraphView, LayoutConfig};

mod canvas;
mod render_utils;

type LoadResult = Result<Vec<RawEdge>, String>;

pub struct TraceGraphApp {
    data_path: PathBuf,
    config: LayoutConfig,
    state: AppState,
    reload_rx: Option<Receiver<LoadResult>>,
}

enum AppState {
    Loading { rx: Receiver<LoadResult> },
    Ready(Box<ViewModel>),
    Error(String),
}

struct ViewModel {
    raw: Vec<RawEdge>,
    config: LayoutConfig,
    view: Option<GraphView>,
    dragged: Option<usize>,
}

impl ViewModel {
    fn new(raw: Vec<RawEdge>, config: LayoutConfig) -> Self {
        Self {
            raw,
            config,
            view: None,
            dragged: None,
        }
    }

    fn replace_dataset(&mut self, raw: Vec<RawEdge>) {
        self.dragged = None;
        if let Some(view) = self.view.as_mut() {
            view.set_dataset(&raw);
        }
        self.raw = raw;
    }
}

impl TraceGraphApp {
    pub fn new(_cc: &eframe::CreationContext<'_>, data_path: PathBuf, config: LayoutConfig) -> Self {
        let state = Self::start_load(data_path.clone());
        Self {
            data_path,
            config,
            state,
            reload_rx: None,
        }
    }

    fn spawn_load(path: PathBuf) -> Receiver<LoadResult> {
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            let result = load_dataset(&path).map_err(|error| format!("{error:#}"));
            let _ = tx.send(result);
        });

        rx
    }

    fn start_load(path: PathBuf) -> AppState {
        AppState::Loading {
            rx: Self::spawn_load(path),
        }
    }

    /// Applies a loaded dataset. Failures replace the screen only when no
    /// graph is showing; otherwise they are logged and the graph stays.
    fn apply_loaded(&mut self, result: LoadResult) {
        match (result, &mut self.state) {
            (Ok(raw), AppState::Ready(model)) => model.replace_dataset(raw),
            (Ok(raw), state) => *state = AppState::Ready(Box::new(ViewModel::new(raw, self.config))),
            (Err(error), AppState::Ready(_)) => {
                tracing::warn!(%error, "dataset rejected; keeping current graph");
            }
            (Err(error), state) => {
                tracing::warn!(%error, "dataset could not be loaded");
                *state = AppState::Error(error);
            }
        }
    }

    fn handle_dropped_files(&mut self, ctx: &Context) {
        let dropped = ctx.input(|input| input.raw.dropped_files.clone());

        for file in dropped {
            if let Some(bytes) = file.bytes.as_deref() {
                tracing::info!(name = %file.name, "dataset dropped");
                let text = String::from_utf8_lossy(bytes);
                let result = parse_edges(&text).map_err(|error| format!("{error:#}"));
                self.apply_loaded(result);
            } else if let Some(path) = file.path {
                tracing::info!(path = %path.display(), "dataset dropped");
                self.data_path = path.clone();
                self.reload_rx = Some(Self::spawn_load(path));
            }
        }
    }

    fn poll_reload(&mut self) {
        let Some(rx) = self.reload_rx.take() else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => self.apply_loaded(result),
            Err(TryRecvError::Empty) => self.reload_rx = Some(rx),
            Err(TryRecvError::Disconnected) => {
                self.apply_loaded(Err("Background load worker disconnected".to_owned()));
            }
        }
    }
}

impl eframe::App for TraceGraphApp {
    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.handle_dropped_files(ctx);
        self.poll_reload();
        if self.reload_rx.is_some() {
            ctx.request_repaint();
        }

        let mut transition = None;
        let mut retry_requested = false;

        match &mut self.state {
            AppState::Loading { rx } => {
                match rx.try_recv() {
                    Ok(result) => transition = Some(result),
                    Err(TryRecvError::Empty) => ctx.request_repaint(),
                    Err(TryRecvError::Disconnected) => {
                        transition = Some(Err("Background load worker disconnected".to_owned()));
                    }
                }

                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.vertical_centered(|ui| {
                        ui.add_space(120.0);
                        ui.heading("Loading trace graph...");
                        ui.add_space(8.0);
                        ui.spinner();
                    });
                });
            }
            AppState::Error(error) => {
                egui::CentralPanel::default().show(ctx, |ui| {
                    ui.heading("Failed to load trace graph");
                    ui.add_space(6.0);
                    ui.label(error.as_str());
                    ui.add_space(6.0);
                    ui.label("Drop a JSON dataset onto this window, or retry.");
                    ui.add_space(10.0);
                    retry_requested = ui.button("Retry").clicked();
                });
            }
            AppState::Ready(model) => {
                egui::CentralPanel::default()
                    .frame(egui::Frame::NONE)
                    .show(ctx, |ui| model.draw_graph(ui));
            }
        }

        if retry_requested {
            self.state = Self::start_load(self.data_path.clone());
        }
        if let Some(result) = transition {
            self.apply_loaded(result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app(state: AppState) -> TraceGraphApp {
        TraceGraphApp {
            data_path: PathBuf::from("traces.json"),
            config: LayoutConfig::default(),
            state,
            reload_rx: None,
        }
    }

    fn shown() -> Vec<RawEdge> {
        vec![
            RawEdge::new("gateway", "auth", "request-accepted"),
            RawEdge::new("auth", "gateway", "response"),
        ]
    }

    fn ready() -> AppState {
        AppState::Ready(Box::new(ViewModel::new(shown(), LayoutConfig::default())))
    }

    #[test]
    fn malformed_drop_keeps_current_graph() {
        let mut app = app(ready());
        let rejected = parse_edges("[{\"source\": \"a\"}]").map_err(|error| format!("{error:#}"));
        assert!(rejected.is_err());

        app.apply_loaded(rejected);

        match &app.state {
            AppState::Ready(model) => assert_eq!(model.raw, shown()),
            _ => panic!("graph was replaced"),
        }
    }

    #[test]
    fn failed_startup_load_shows_error() {
        let (_tx, rx) = mpsc::channel();
        let mut app = app(AppState::Loading { rx });

        app.apply_loaded(Err("no such file".to_owned()));

        match &app.state {
            AppState::Error(error) => assert_eq!(error, "no such file"),
            _ => panic!("expected the error screen"),
        }
    }

    #[test]
    fn good_drop_replaces_dataset() {
        let mut app = app(ready());
        let dropped = vec![RawEdge::new("x", "y", "response")];

        app.apply_loaded(Ok(dropped.clone()));

        match &app.state {
            AppState::Ready(model) => assert_eq!(model.raw, dropped),
            _ => panic!("expected a graph"),
        }
    }

    #[test]
    fn successful_load_clears_error_screen() {
        let mut app = app(AppState::Error("offline".to_owned()));

        app.apply_loaded(Ok(shown()));

        assert!(matches!(app.state, AppState::Ready(_)));
    }
}
