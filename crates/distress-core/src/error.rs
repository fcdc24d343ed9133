//! Error types for building and running a simulation.

use std::path::PathBuf;
use thiserror::Error;

use crate::config::ConfigError;

/// A malformed line in an adjacency source
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("{source_name}:{line_number}: missing ':' between anchor and neighbors in {line:?}")]
    MissingSeparator {
        source_name: String,
        line_number: usize,
        line: String,
    },
    #[error("{source_name}:{line_number}: invalid node id {token:?} in {line:?}")]
    InvalidId {
        source_name: String,
        line_number: usize,
        line: String,
        token: String,
    },
}

/// Errors surfaced while setting up or running a simulation
#[derive(Debug, Error)]
pub enum SimError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("network has no nodes; at least one non-self adjacency edge is required")]
    EmptyNetwork,
}
