//! Ego File Parsing
//!
//! Reads adjacency sources in the `<anchor>: <neighbor> <neighbor> ...`
//! format. Parsing is the first construction pass: every source is checked in
//! full before any edge is inserted or any random draw is made.

use std::fs;
use std::path::{Path, PathBuf};

use crate::components::NodeId;
use crate::error::{ParseError, SimError};

/// One anchor line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencyEntry {
    pub anchor: NodeId,
    /// Neighbors as listed, self references included
    pub neighbors: Vec<NodeId>,
}

/// All entries of one source, in file order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacencySource {
    pub name: String,
    pub entries: Vec<AdjacencyEntry>,
}

impl AdjacencySource {
    /// Number of (anchor, neighbor) pairs excluding self references.
    pub fn pair_count(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.neighbors.iter().filter(|&&n| n != e.anchor).count())
            .sum()
    }
}

fn parse_id(
    token: &str,
    source_name: &str,
    line_number: usize,
    line: &str,
) -> Result<NodeId, ParseError> {
    token
        .trim()
        .parse::<i64>()
        .map(NodeId)
        .map_err(|_| ParseError::InvalidId {
            source_name: source_name.to_string(),
            line_number,
            line: line.to_string(),
            token: token.trim().to_string(),
        })
}

/// Parses adjacency text. Blank lines are skipped; line numbers are 1-based.
pub fn parse_adjacency(source_name: &str, text: &str) -> Result<AdjacencySource, ParseError> {
    let mut entries = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = index + 1;
        if line.trim().is_empty() {
            continue;
        }
        let Some((anchor, rest)) = line.split_once(':') else {
            return Err(ParseError::MissingSeparator {
                source_name: source_name.to_string(),
                line_number,
                line: line.to_string(),
            });
        };
        let anchor = parse_id(anchor, source_name, line_number, line)?;
        let neighbors = rest
            .split_whitespace()
            .map(|token| parse_id(token, source_name, line_number, line))
            .collect::<Result<Vec<_>, _>>()?;
        entries.push(AdjacencyEntry { anchor, neighbors });
    }
    Ok(AdjacencySource {
        name: source_name.to_string(),
        entries,
    })
}

/// Reads and parses one ego file.
pub fn read_ego_file(path: &Path) -> Result<AdjacencySource, SimError> {
    let text = fs::read_to_string(path).map_err(|source| SimError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let source = parse_adjacency(&path.display().to_string(), &text)?;
    tracing::info!(
        source = %source.name,
        anchors = source.entries.len(),
        pairs = source.pair_count(),
        "Read ego file"
    );
    Ok(source)
}

/// Reads every ego file, stopping at the first failure.
pub fn read_ego_files(paths: &[PathBuf]) -> Result<Vec<AdjacencySource>, SimError> {
    paths.iter().map(|path| read_ego_file(path)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_basic() {
        let source = parse_adjacency("mem", "1: 2 3\n2: 1 3\n3: 1 2").unwrap();

        assert_eq!(source.entries.len(), 3);
        assert_eq!(source.entries[0].anchor, NodeId(1));
        assert_eq!(source.entries[0].neighbors, vec![NodeId(2), NodeId(3)]);
        assert_eq!(source.pair_count(), 6);
    }

    #[test]
    fn test_parse_trims_and_keeps_self_refs() {
        let source = parse_adjacency("mem", "  7 :  7   8\t9  \n\n10:\n").unwrap();

        assert_eq!(source.entries.len(), 2);
        assert_eq!(source.entries[0].anchor, NodeId(7));
        assert_eq!(source.entries[0].neighbors, vec![NodeId(7), NodeId(8), NodeId(9)]);
        assert!(source.entries[1].neighbors.is_empty());
        assert_eq!(source.pair_count(), 2);
    }

    #[test]
    fn test_negative_ids_accepted() {
        let source = parse_adjacency("mem", "-1: 2 3\n4: -1\n").unwrap();

        assert_eq!(source.entries[0].anchor, NodeId(-1));
        assert_eq!(source.entries[0].neighbors, vec![NodeId(2), NodeId(3)]);
        assert_eq!(source.entries[1].neighbors, vec![NodeId(-1)]);
    }

    #[test]
    fn test_missing_separator_reports_line() {
        let err = parse_adjacency("ego.txt", "1: 2\n3 4\n").unwrap_err();
        assert_eq!(
            err,
            ParseError::MissingSeparator {
                source_name: "ego.txt".to_string(),
                line_number: 2,
                line: "3 4".to_string(),
            }
        );
        assert!(err.to_string().starts_with("ego.txt:2:"));
    }

    #[test]
    fn test_non_integer_ids_rejected() {
        let err = parse_adjacency("ego.txt", "1: 2 x3\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidId { ref token, line_number: 1, .. } if token == "x3"));

        let err = parse_adjacency("ego.txt", "a: 2\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidId { ref token, .. } if token == "a"));

        let err = parse_adjacency("ego.txt", ": 2\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidId { ref token, .. } if token.is_empty()));
    }

    #[test]
    fn test_second_colon_is_invalid() {
        let err = parse_adjacency("ego.txt", "1: 2 3:4\n").unwrap_err();
        assert!(matches!(err, ParseError::InvalidId { ref token, .. } if token == "3:4"));
    }

    #[test]
    fn test_missing_file() {
        let err = read_ego_file(Path::new("/nonexistent/ego/file")).unwrap_err();
        assert!(matches!(err, SimError::Io { .. }));
    }
}
