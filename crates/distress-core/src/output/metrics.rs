//! Metrics Collector
//!
//! Accumulates the distress and app-user time series and writes them out for
//! plotting.

use bevy_ecs::prelude::*;
use distress_events::SeriesReport;
use std::fs;
use std::path::Path;

use crate::systems::diffusion::StepOutcome;

/// Series JSON file name inside the output directory
pub const SERIES_JSON: &str = "series.json";
/// Series CSV file name inside the output directory
pub const SERIES_CSV: &str = "series.csv";

/// Resource: time series accumulated over a run
#[derive(Resource, Debug, Clone, Default)]
pub struct MetricsCollector {
    distress_series: Vec<usize>,
    user_series: Vec<usize>,
    finished: bool,
}

impl MetricsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts the distress series with the count before any step runs.
    pub fn record_initial(&mut self, distressed: usize) {
        self.distress_series.push(distressed);
    }

    /// Appends one step: its distress tally and the frozen app-user count.
    pub fn record_step(&mut self, outcome: &StepOutcome) {
        self.distress_series.push(outcome.distressed);
        self.user_series.push(outcome.app_users_at_start);
    }

    /// Appends the trailing fresh app-user count. Later calls are ignored.
    pub fn finish(&mut self, app_users: usize) {
        if self.finished {
            return;
        }
        self.user_series.push(app_users);
        self.finished = true;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn distress_series(&self) -> &[usize] {
        &self.distress_series
    }

    pub fn user_series(&self) -> &[usize] {
        &self.user_series
    }

    /// Number of steps recorded so far.
    pub fn steps_recorded(&self) -> usize {
        self.distress_series.len().saturating_sub(1)
    }

    pub fn to_report(&self, seed: u64) -> SeriesReport {
        SeriesReport {
            seed,
            steps: self.steps_recorded(),
            distress_series: self.distress_series.clone(),
            user_series: self.user_series.clone(),
        }
    }
}

/// Writes `series.json` and `series.csv` into `dir`, creating it if needed.
pub fn write_series(report: &SeriesReport, dir: &Path) -> std::io::Result<()> {
    if !dir.exists() {
        fs::create_dir_all(dir)?;
    }

    let json = report
        .to_json_pretty()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
    fs::write(dir.join(SERIES_JSON), json)?;
    fs::write(dir.join(SERIES_CSV), report.to_csv())?;
    Ok(())
}
