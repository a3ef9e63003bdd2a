use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

/// One directed edge as it appears in a trace dataset. Endpoints are node names.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct RawEdge {
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: String,
}

impl RawEdge {
    pub fn new(source: impl Into<String>, target: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            kind: kind.into(),
        }
    }
}

/// Parses dataset text. Accepts a bare array of edges or an object with a
/// `links` array.
pub fn parse_edges(raw: &str) -> Result<Vec<RawEdge>> {
    let parsed: Value = serde_json::from_str(raw).context("invalid JSON in dataset")?;

    let entries = match &parsed {
        Value::Array(entries) => entries,
        Value::Object(object) => object
            .get("links")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow!("dataset object has no `links` array"))?,
        _ => return Err(anyhow!("unexpected JSON type for dataset; expected an array of edges")),
    };

    let mut edges = Vec::with_capacity(entries.len());
    for (index, value) in entries.iter().enumerate() {
        let edge = RawEdge::deserialize(value)
            .with_context(|| format!("invalid edge record at index {index}"))?;
        edges.push(edge);
    }

    Ok(edges)
}
