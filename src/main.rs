use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use trace_graph::app::TraceGraphApp;
use trace_graph::dataset::load_dataset;
use trace_graph::layout::svg::render_svg;
use trace_graph::layout::{GraphView, LayoutConfig, Viewport};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON dataset of `{source, target, type}` edge records.
    #[arg(long, default_value = "traces.json")]
    data: PathBuf,
    /// Lay the graph out without a window and write it as SVG.
    #[arg(long)]
    export_svg: Option<PathBuf>,
    #[arg(long, default_value_t = 1200.0)]
    width: f32,
    #[arg(long, default_value_t = 800.0)]
    height: f32,
    /// Step limit for headless export.
    #[arg(long, default_value_t = 600)]
    max_steps: usize,
    #[arg(long)]
    link_distance: Option<f32>,
    #[arg(long, allow_negative_numbers = true)]
    charge_strength: Option<f32>,
}

impl Args {
    fn layout_config(&self) -> LayoutConfig {
        let mut config = LayoutConfig::default();
        if let Some(distance) = self.link_distance {
            config.link_distance = distance;
        }
        if let Some(strength) = self.charge_strength {
            config.charge_strength = strength;
        }
        config
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn export_svg(args: &Args, output: &Path) -> Result<()> {
    let raw = load_dataset(&args.data)?;
    let viewport = Viewport::new(args.width, args.height);
    let mut view = GraphView::new(&raw, viewport, args.layout_config());

    let steps = view.settle(args.max_steps);
    tracing::info!(steps, idle = !view.simulation().is_running(), "layout finished");

    let svg = render_svg(view.scene(), view.config()).context("failed to render svg")?;
    fs::write(output, svg).with_context(|| format!("failed to write {}", output.display()))?;
    tracing::info!(path = %output.display(), "wrote svg");
    Ok(())
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    if let Some(output) = &args.export_svg {
        return export_svg(&args, output);
    }

    let config = args.layout_config();
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([args.width, args.height])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let data_path = args.data.clone();
    eframe::run_native(
        "trace-graph",
        options,
        Box::new(move |cc| Ok(Box::new(TraceGraphApp::new(cc, data_path, config)))),
    )
    .map_err(|error| anyhow!("viewer exited with an error: {error}"))
}
