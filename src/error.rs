//! Error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading the lexunit -> synset table.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Table file could not be opened.
    #[error("failed to open lex2syn table {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// CSV parser error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Row does not have exactly two columns.
    #[error("line {line}: expected 2 fields (lexunit, synset), got {fields}")]
    MalformedRecord { line: u64, fields: usize },

    /// Delimiter cannot be used as a single CSV byte.
    #[error("delimiter {0:?} is not a single ASCII character")]
    InvalidDelimiter(char),
}

/// Errors raised by k-medoids clustering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClusterError {
    /// Nothing to cluster.
    #[error("cannot cluster an empty input")]
    Empty,

    /// k outside `1..=n`.
    #[error("invalid number of clusters: {k} (must be 1 <= k <= {n})")]
    InvalidClusterCount { k: usize, n: usize },

    /// Distance matrix is not square.
    #[error("distance matrix must be square, got {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },
}

/// A vector whose length differs from the first vector of its batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("vector {index} has dimension {found}, expected {expected}")]
pub struct DimensionMismatch {
    pub index: usize,
    pub expected: usize,
    pub found: usize,
}

/// Errors raised by [`crate::Sense`] operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SenseError {
    /// Requested layer does not exist for a representation.
    #[error("layer {layer} out of range for representation '{key}' ({layers} layers)")]
    LayerOutOfRange {
        key: String,
        layer: usize,
        layers: usize,
    },

    /// Representations of differing dimensions.
    #[error("representation {index} has dimension {found}, expected {expected}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    /// Clustering failed.
    #[error(transparent)]
    Cluster(#[from] ClusterError),
}

/// Errors raised while reading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error(transparent)]
    Load(#[from] anyhow::Error),
}

impl From<DimensionMismatch> for SenseError {
    fn from(err: DimensionMismatch) -> Self {
        SenseError::DimensionMismatch {
            index: err.index,
            expected: err.expected,
            found: err.found,
        }
    }
}

impl ClusterError {
    /// True when the caller asked for an impossible k (as opposed to bad input data).
    pub fn is_cluster_count(&self) -> bool {
        matches!(self, ClusterError::InvalidClusterCount { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = BridgeError::MalformedRecord { line: 7, fields: 4 };
        assert!(err.to_string().contains("line 7"));

        let err = ClusterError::InvalidClusterCount { k: 5, n: 3 };
        assert!(err.to_string().contains('5'));
        assert!(err.to_string().contains('3'));

        let err = SenseError::LayerOutOfRange {
            key: "img_01".into(),
            layer: 12,
            layers: 4,
        };
        let msg = err.to_string();
        assert!(msg.contains("img_01"));
        assert!(msg.contains("12"));
    }

    #[test]
    fn dimension_mismatch_converts() {
        let err: SenseError = DimensionMismatch {
            index: 1,
            expected: 2,
            found: 3,
        }
        .into();
        assert_eq!(
            err,
            SenseError::DimensionMismatch {
                index: 1,
                expected: 2,
                found: 3,
            }
        );
        assert!(err.to_string().contains("representation 1"));
    }

    #[test]
    fn cluster_error_converts_transparently() {
        let err: SenseError = ClusterError::Empty.into();
        assert_eq!(err.to_string(), ClusterError::Empty.to_string());
        assert!(ClusterError::InvalidClusterCount { k: 0, n: 1 }.is_cluster_count());
        assert!(!ClusterError::Empty.is_cluster_count());
    }
}
