//! Shared data types

use serde::{Deserialize, Serialize};

/// Vectors for one representation key, one entry per layer.
pub type LayeredRepresentation = Vec<Vec<f32>>;

/// One row of the lexunit -> synset table.
///
/// `synset` is `None` when the source cell holds a not-a-value marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexSynRecord {
    pub lexunit: String,
    pub synset: Option<String>,
}

impl LexSynRecord {
    pub fn new(lexunit: impl Into<String>, synset: Option<impl Into<String>>) -> Self {
        Self {
            lexunit: lexunit.into(),
            synset: synset.map(Into::into),
        }
    }
}

/// Outcome of a synset -> lexical unit lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SynsetLookup {
    /// Comma-joined lexical units, in first-seen order.
    Found(String),
    /// No synset was supplied; propagated as "no lexical unit".
    Missing,
    /// A synset was supplied but nothing maps to it.
    LookupFailed,
}

impl SynsetLookup {
    pub fn is_found(&self) -> bool {
        matches!(self, SynsetLookup::Found(_))
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, SynsetLookup::Missing)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, SynsetLookup::LookupFailed)
    }

    pub fn as_found(&self) -> Option<&str> {
        match self {
            SynsetLookup::Found(joined) => Some(joined),
            _ => None,
        }
    }

    pub fn into_found(self) -> Option<String> {
        match self {
            SynsetLookup::Found(joined) => Some(joined),
            _ => None,
        }
    }
}
