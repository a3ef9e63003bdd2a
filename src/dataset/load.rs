use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::parse::{RawEdge, parse_edges};

pub fn load_dataset(path: &Path) -> Result<Vec<RawEdge>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read dataset {}", path.display()))?;

    let edges = parse_edges(&raw)
        .with_context(|| format!("failed to parse dataset {}", path.display()))?;
    tracing::info!(path = %path.display(), edges = edges.len(), "loaded dataset");

    Ok(edges)
}
