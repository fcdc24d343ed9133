//! Output Generation
//!
//! Network snapshots, per-step rendering and the summary time series.

pub mod metrics;
pub mod render;
pub mod snapshot;

pub use metrics::{write_series, MetricsCollector, SERIES_CSV, SERIES_JSON};
pub use render::{
    render_isolated, renderer_for, DotRenderer, JsonSnapshotRenderer, NullRenderer, RenderError,
    RenderFormat, StepRenderer,
};
pub use snapshot::network_snapshot;
