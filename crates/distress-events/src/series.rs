//! Series Report
//!
//! The two time series handed to plotting collaborators after a run.

use serde::{Deserialize, Serialize};

/// Distress and app-user counts over a run
///
/// `distress_series[0]` is the count before the first step. `user_series`
/// holds one frozen count per step plus a trailing fresh count, so both
/// series have `steps + 1` entries after a completed run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeriesReport {
    pub seed: u64,
    pub steps: usize,
    pub distress_series: Vec<usize>,
    pub user_series: Vec<usize>,
}

impl SeriesReport {
    /// Renders both series as CSV with a `step,distress,users` header.
    ///
    /// Rows run to the longer series; a missing value is left empty.
    pub fn to_csv(&self) -> String {
        let rows = self.distress_series.len().max(self.user_series.len());
        let mut out = String::from("step,distress,users\n");
        for step in 0..rows {
            let distress = self
                .distress_series
                .get(step)
                .map(|v| v.to_string())
                .unwrap_or_default();
            let users = self
                .user_series
                .get(step)
                .map(|v| v.to_string())
                .unwrap_or_default();
            out.push_str(&format!("{},{},{}\n", step, distress, users));
        }
        out
    }

    /// Highest distress count over the run.
    pub fn peak_distress(&self) -> usize {
        self.distress_series.iter().copied().max().unwrap_or(0)
    }

    /// Highest app-user count over the run.
    pub fn peak_users(&self) -> usize {
        self.user_series.iter().copied().max().unwrap_or(0)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
