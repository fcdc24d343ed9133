//! Step Rendering
//!
//! Per-step observers that write one artifact per step, named by the step
//! index. Rendering never feeds back into the simulation: failures are
//! logged and the run continues.

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::components::Network;

use super::snapshot::network_snapshot;

/// Fill color for graph nodes without a state record
pub const STATELESS_COLOR: &str = "gray";

/// Rendering error type
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to serialize snapshot: {0}")]
    Json(#[from] serde_json::Error),
}

/// Observer invoked before the first step and after every step
pub trait StepRenderer {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    fn render(&mut self, network: &Network, step: usize) -> Result<(), RenderError>;
}

/// Output format selectable from the command line
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum RenderFormat {
    /// One `<step>.json` network snapshot per step
    #[default]
    Json,
    /// One `<step>.dot` GraphViz graph per step
    Dot,
    /// Render nothing
    None,
}

/// Builds the renderer for a format, writing under `dir`.
pub fn renderer_for(format: RenderFormat, dir: &Path) -> Box<dyn StepRenderer> {
    match format {
        RenderFormat::Json => Box::new(JsonSnapshotRenderer::new(dir)),
        RenderFormat::Dot => Box::new(DotRenderer::new(dir)),
        RenderFormat::None => Box::new(NullRenderer),
    }
}

/// Renders and logs a failure instead of propagating it. Returns success.
pub fn render_isolated(renderer: &mut dyn StepRenderer, network: &Network, step: usize) -> bool {
    match renderer.render(network, step) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(renderer = renderer.name(), step, "Could not render step: {}", e);
            false
        }
    }
}

fn write_artifact(dir: &Path, file_name: String, contents: &str) -> Result<(), RenderError> {
    let path = dir.join(file_name);
    fs::create_dir_all(dir)
        .and_then(|_| fs::write(&path, contents))
        .map_err(|source| RenderError::Io { path, source })
}

/// Writes the shared JSON snapshot schema
#[derive(Debug, Clone)]
pub struct JsonSnapshotRenderer {
    dir: PathBuf,
}

impl JsonSnapshotRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl StepRenderer for JsonSnapshotRenderer {
    fn name(&self) -> &'static str {
        "json"
    }

    fn render(&mut self, network: &Network, step: usize) -> Result<(), RenderError> {
        let json = network_snapshot(network, step).to_json_pretty()?;
        write_artifact(&self.dir, format!("{}.json", step), &json)
    }
}

/// Writes layout-free GraphViz graphs, one fill color per node
#[derive(Debug, Clone)]
pub struct DotRenderer {
    dir: PathBuf,
}

impl DotRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

/// GraphViz source for the network at one step.
pub fn to_dot(network: &Network, step: usize) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail.
    let _ = writeln!(out, "graph step_{} {{", step);
    let _ = writeln!(out, "  node [shape=circle, style=filled, label=\"\", width=0.15];");
    for id in network.graph().node_ids() {
        let color = network
            .state(id)
            .map(|s| s.color().as_str())
            .unwrap_or(STATELESS_COLOR);
        let _ = writeln!(out, "  {} [fillcolor={}];", id, color);
    }
    for (a, b) in network.graph().edges() {
        let _ = writeln!(out, "  {} -- {};", a, b);
    }
    out.push_str("}\n");
    out
}

impl StepRenderer for DotRenderer {
    fn name(&self) -> &'static str {
        "dot"
    }

    fn render(&mut self, network: &Network, step: usize) -> Result<(), RenderError> {
        write_artifact(&self.dir, format!("{}.dot", step), &to_dot(network, step))
    }
}

/// Renders nothing
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl StepRenderer for NullRenderer {
    fn name(&self) -> &'static str {
        "none"
    }

    fn render(&mut self, _network: &Network, _step: usize) -> Result<(), RenderError> {
        Ok(())
    }
}
