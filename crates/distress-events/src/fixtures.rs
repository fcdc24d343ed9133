//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // distress-events = { path = "../distress-events", features = ["test-fixtures"] }
//!
//! use distress_events::fixtures;
//!
//! let snapshot = fixtures::sample_snapshot();
//! ```

use crate::NetworkSnapshot;

/// Returns a sample network snapshot from the fixtures file.
///
/// Contains one node of each color class, one stateless node and four edges.
pub fn sample_snapshot() -> NetworkSnapshot {
    let json = include_str!("../tests/fixtures/sample_snapshot.json");
    NetworkSnapshot::from_json(json).expect("Failed to parse sample_snapshot.json")
}
