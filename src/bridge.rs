//! Lexical unit <-> synset bridge
//!
//! Loads a headerless `lexunit,synset` table and indexes it both ways. The
//! table is many-to-many: a synset groups several lexical units and a lexical
//! unit may appear under several synsets.
//!
//! Synset cells holding a not-a-value marker (empty, `NaN`, `NA`, `null`, ...)
//! are read as a missing synset. Such rows stay in [`LexSynBridge::records`]
//! but are not indexed. Lexical unit cells are kept literally; rows with an
//! empty one are skipped with a warning.

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::types::{LexSynRecord, SynsetLookup};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Cell values read as "no value".
const NA_VALUES: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_missing_value(cell: &str) -> bool {
    NA_VALUES.contains(&cell)
}

/// Bidirectional lookup between lexical units and synsets
#[derive(Debug, Clone, Default)]
pub struct LexSynBridge {
    records: Vec<LexSynRecord>,
    syn2lex: HashMap<String, Vec<String>>,
    lex2syn: HashMap<String, Vec<String>>,
}

impl LexSynBridge {
    /// Load the table named by `config.lex2syn_path`.
    pub fn from_config(config: &BridgeConfig) -> Result<Self, BridgeError> {
        info!("Loading lex2syn table: {}", config.lex2syn_path.display());
        let file = File::open(&config.lex2syn_path).map_err(|source| BridgeError::Io {
            path: config.lex2syn_path.clone(),
            source,
        })?;
        Self::from_reader(file, config)
    }

    /// Load a comma-separated, headerless table from `path`.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self, BridgeError> {
        Self::from_config(&BridgeConfig::new(path))
    }

    /// Parse the table from any reader. `config.lex2syn_path` is not used.
    pub fn from_reader<R: Read>(reader: R, config: &BridgeConfig) -> Result<Self, BridgeError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(config.has_headers)
            .delimiter(config.delimiter_byte()?)
            .flexible(true)
            .from_reader(reader);

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            if let Some(record) = parse_row(&row)? {
                records.push(record);
            }
        }

        Ok(Self::from_records(records))
    }

    /// Build the indexes from in-memory records, keeping their order.
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = LexSynRecord>,
    {
        let records: Vec<LexSynRecord> = records.into_iter().collect();
        let mut syn2lex: HashMap<String, Vec<String>> = HashMap::new();
        let mut lex2syn: HashMap<String, Vec<String>> = HashMap::new();

        for record in &records {
            let Some(synset) = &record.synset else {
                continue;
            };
            syn2lex
                .entry(synset.clone())
                .or_default()
                .push(record.lexunit.clone());
            lex2syn
                .entry(record.lexunit.clone())
                .or_default()
                .push(synset.clone());
        }

        info!(
            records = records.len(),
            synsets = syn2lex.len(),
            lexunits = lex2syn.len(),
            "lex2syn table indexed"
        );

        Self {
            records,
            syn2lex,
            lex2syn,
        }
    }

    /// Comma-joined lexical units of `synset`, in first-seen order.
    ///
    /// `None` propagates as [`SynsetLookup::Missing`]. A synset that nothing
    /// maps to logs a warning and yields [`SynsetLookup::LookupFailed`].
    pub fn synset_to_lexunits(&self, synset: Option<&str>) -> SynsetLookup {
        let Some(synset) = synset else {
            return SynsetLookup::Missing;
        };

        match self.syn2lex.get(synset) {
            Some(lexunits) => SynsetLookup::Found(lexunits.join(",")),
            None => {
                warn!("{} to lexunit failed!", synset);
                SynsetLookup::LookupFailed
            }
        }
    }

    pub fn lexunits_for(&self, synset: &str) -> Option<&[String]> {
        self.syn2lex.get(synset).map(Vec::as_slice)
    }

    /// Synsets a lexical unit belongs to, in first-seen order.
    pub fn lexunit_to_synsets(&self, lexunit: &str) -> Option<&[String]> {
        self.lex2syn.get(lexunit).map(Vec::as_slice)
    }

    pub fn records(&self) -> &[LexSynRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn synset_count(&self) -> usize {
        self.syn2lex.len()
    }

    /// Lexical units whose synset cell was empty.
    pub fn unmapped_lexunits(&self) -> impl Iterator<Item = &str> {
        self.records
            .iter()
            .filter(|r| r.synset.is_none())
            .map(|r| r.lexunit.as_str())
    }
}

/// `None` for a row whose lexical unit cell is empty.
fn parse_row(row: &StringRecord) -> Result<Option<LexSynRecord>, BridgeError> {
    let line = row.position().map(|p| p.line()).unwrap_or_default();

    if row.len() > 2 {
        return Err(BridgeError::MalformedRecord {
            line,
            fields: row.len(),
        });
    }

    // Lexical units are taken literally: "NA" or "None" can be real entries.
    let lexunit = match row.get(0) {
        Some(cell) if !cell.is_empty() => cell.to_string(),
        _ => {
            warn!(line, "skipping lex2syn row without lexical unit");
            return Ok(None);
        }
    };

    let synset = row
        .get(1)
        .filter(|cell| !is_missing_value(cell))
        .map(str::to_string);

    if synset.is_none() {
        debug!(line, lexunit = %lexunit, "row without synset");
    }

    Ok(Some(LexSynRecord { lexunit, synset }))
}
