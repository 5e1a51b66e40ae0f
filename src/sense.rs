//! Word sense representations and medoid selection
//!
//! A [`Sense`] holds, per representation key (typically one usage example),
//! the vectors produced at every layer of an embedding model. Medoid selection
//! looks at one layer at a time over a bounded sample of keys.

use crate::distance::{pairwise_distances, DistanceMatrix};
use crate::error::SenseError;
use crate::medoids::{MedoidClusterer, Pam};
use crate::types::LayeredRepresentation;
use std::collections::HashMap;
use tracing::debug;

/// Only the first this-many keys (insertion order) are sampled per layer.
pub const MAX_SAMPLED_REPRESENTATIONS: usize = 30;

/// Layered vector representations of one word sense
#[derive(Debug, Clone, PartialEq)]
pub struct Sense {
    name: String,
    entries: Vec<(String, LayeredRepresentation)>,
}

impl Sense {
    /// Create a sense, dropping keys whose representation is absent.
    ///
    /// Key order is preserved. A repeated key overwrites the earlier value but
    /// keeps the earlier position.
    pub fn new<K, I>(name: impl Into<String>, data: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Option<LayeredRepresentation>)>,
    {
        let name = name.into();
        let mut entries: Vec<(String, LayeredRepresentation)> = Vec::new();
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut dropped = 0usize;

        for (key, value) in data {
            let Some(layers) = value else {
                dropped += 1;
                continue;
            };
            let key = key.into();
            match positions.get(&key) {
                Some(&pos) => entries[pos].1 = layers,
                None => {
                    positions.insert(key.clone(), entries.len());
                    entries.push((key, layers));
                }
            }
        }

        debug!(
            sense = %name,
            representations = entries.len(),
            dropped,
            "Sense created"
        );

        Self { name, entries }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of representation keys held.
    pub fn total_representation_count(&self) -> usize {
        self.entries.len()
    }

    /// Representation keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn representation(&self, key: &str) -> Option<&LayeredRepresentation> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, layers)| layers)
    }

    /// Vector at `layer_index` for each of the first
    /// [`MAX_SAMPLED_REPRESENTATIONS`] keys, in key order.
    pub fn get_representations(&self, layer_index: usize) -> Result<Vec<Vec<f32>>, SenseError> {
        if self.entries.len() > MAX_SAMPLED_REPRESENTATIONS {
            debug!(
                sense = %self.name,
                total = self.entries.len(),
                sampled = MAX_SAMPLED_REPRESENTATIONS,
                "Sampling truncated"
            );
        }

        self.entries
            .iter()
            .take(MAX_SAMPLED_REPRESENTATIONS)
            .map(|(key, layers)| {
                layers
                    .get(layer_index)
                    .cloned()
                    .ok_or_else(|| SenseError::LayerOutOfRange {
                        key: key.clone(),
                        layer: layer_index,
                        layers: layers.len(),
                    })
            })
            .collect()
    }

    /// All-pairs cosine distance between `representations`.
    pub fn get_distances(
        &self,
        representations: &[Vec<f32>],
    ) -> Result<DistanceMatrix, SenseError> {
        Ok(pairwise_distances(representations)?)
    }

    /// Medoid index (into `representations`) of each of `medoid_clusters`
    /// clusters, using PAM with default settings.
    pub fn get_medoid_indices(
        &self,
        representations: &[Vec<f32>],
        medoid_clusters: usize,
    ) -> Result<Vec<usize>, SenseError> {
        self.get_medoid_indices_with(representations, medoid_clusters, &Pam::default())
    }

    /// Same as [`Sense::get_medoid_indices`] with an explicit clusterer, e.g. a
    /// seeded [`Pam`].
    pub fn get_medoid_indices_with<C>(
        &self,
        representations: &[Vec<f32>],
        medoid_clusters: usize,
        clusterer: &C,
    ) -> Result<Vec<usize>, SenseError>
    where
        C: MedoidClusterer + ?Sized,
    {
        let distances = self.get_distances(representations)?;
        let fit = clusterer.fit(&distances, medoid_clusters)?;
        debug!(
            sense = %self.name,
            k = medoid_clusters,
            medoids = ?fit.medoid_indices,
            inertia = fit.inertia,
            "Medoids selected"
        );
        Ok(fit.medoid_indices)
    }

    /// Keys of the medoid representations at `layer_index`.
    pub fn medoid_keys(
        &self,
        layer_index: usize,
        medoid_clusters: usize,
    ) -> Result<Vec<&str>, SenseError> {
        let representations = self.get_representations(layer_index)?;
        let indices = self.get_medoid_indices(&representations, medoid_clusters)?;
        Ok(indices
            .into_iter()
            .map(|i| self.entries[i].0.as_str())
            .collect())
    }
}
