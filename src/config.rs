//! Configuration.

use crate::error::{BridgeError, ConfigError};
use crate::medoids::MedoidInit;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default cap on PAM swap rounds.
pub const DEFAULT_MAX_ITERATIONS: usize = 300;

/// Top-level configuration, usually read from YAML.
///
/// ```yaml
/// bridge:
///   lex2syn_path: data/lex2syn_original.csv
/// medoids:
///   init: random
///   seed: 42
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Picto2VecConfig {
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub medoids: MedoidConfig,
}

impl Picto2VecConfig {
    pub fn from_yaml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_yaml_str(&raw)
    }
}

/// Where and how to read the lexunit -> synset table.
///
/// The table path has no default and must always be given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Headerless two-column CSV: lexunit, synset.
    pub lex2syn_path: PathBuf,
    /// Skip the first row.
    #[serde(default)]
    pub has_headers: bool,
    /// Field delimiter; must be a single ASCII character.
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
}

fn default_delimiter() -> char {
    ','
}

impl BridgeConfig {
    pub fn new(lex2syn_path: impl Into<PathBuf>) -> Self {
        Self {
            lex2syn_path: lex2syn_path.into(),
            has_headers: false,
            delimiter: default_delimiter(),
        }
    }

    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn with_headers(mut self, has_headers: bool) -> Self {
        self.has_headers = has_headers;
        self
    }

    pub(crate) fn delimiter_byte(&self) -> Result<u8, BridgeError> {
        if self.delimiter.is_ascii() {
            Ok(self.delimiter as u8)
        } else {
            Err(BridgeError::InvalidDelimiter(self.delimiter))
        }
    }
}

/// K-medoids settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MedoidConfig {
    /// How the initial medoids are chosen.
    pub init: MedoidInit,
    /// Maximum SWAP rounds.
    pub max_iterations: usize,
    /// Seed for [`MedoidInit::Random`]. Ignored by the deterministic inits.
    pub seed: Option<u64>,
}

impl Default for MedoidConfig {
    fn default() -> Self {
        Self {
            init: MedoidInit::default(),
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl MedoidConfig {
    /// Random initialization with a fixed seed, for reproducible runs.
    pub fn seeded(seed: u64) -> Self {
        Self {
            init: MedoidInit::Random,
            seed: Some(seed),
            ..Self::default()
        }
    }
}
