//! Lexical unit / synset bridging and word-sense medoid selection
//!
//! Two independent pieces:
//!
//! - [`LexSynBridge`] loads a headerless `lexunit,synset` table and answers
//!   "which lexical units belong to this synset?" (and the reverse).
//! - [`Sense`] holds the layered vector representations of one word sense and
//!   picks representative vectors (medoids) among them.
//!
//! # Medoid pipeline
//!
//! ```text
//! Sense data (key → [layer vectors])
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  get_representations(layer)             │
//! │  first 30 keys → one vector each        │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  pairwise cosine distance               │
//! │  n × n, symmetric, zero diagonal        │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  PAM k-medoids (precomputed distances)  │
//! │  → medoid index per cluster             │
//! └─────────────────────────────────────────┘
//! ```

pub mod bridge;
pub mod config;
pub mod distance;
pub mod error;
pub mod medoids;
pub mod sense;
pub mod types;

pub use bridge::LexSynBridge;
pub use config::{BridgeConfig, MedoidConfig, Picto2VecConfig};
pub use distance::{cosine_distance, pairwise_distances, DistanceMatrix};
pub use error::{BridgeError, ClusterError, ConfigError, DimensionMismatch, SenseError};
pub use medoids::{MedoidClusterer, MedoidFit, MedoidInit, Pam};
pub use sense::{Sense, MAX_SAMPLED_REPRESENTATIONS};
pub use types::*;
