//! K-medoids clustering over a precomputed distance matrix
//!
//! [`Pam`] is Partitioning Around Medoids: pick `k` initial medoids, then keep
//! applying the single medoid/non-medoid swap that lowers total deviation the
//! most, until no swap helps.
//!
//! Each SWAP round uses the nearest/second-nearest medoid distance of every
//! point, so evaluating one candidate swap is `O(n)` and a round is `O(k·n²)`.

use crate::config::MedoidConfig;
use crate::distance::DistanceMatrix;
use crate::error::ClusterError;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Swaps must improve total deviation by more than this to be applied.
const SWAP_TOLERANCE: f64 = 1e-9;

/// Initial medoid selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MedoidInit {
    /// The k points with the smallest total distance to all others.
    #[default]
    Heuristic,
    /// Greedy PAM BUILD.
    Build,
    /// Uniform random sample (seeded when a seed is configured).
    Random,
}

/// Result of a k-medoids fit
#[derive(Debug, Clone, PartialEq)]
pub struct MedoidFit {
    /// Index of each cluster's medoid, in cluster-label order.
    pub medoid_indices: Vec<usize>,
    /// Cluster label per input point (an index into `medoid_indices`).
    pub labels: Vec<usize>,
    /// Sum of distances from every point to its medoid.
    pub inertia: f64,
    /// SWAP rounds performed.
    pub iterations: usize,
}

/// Partitions points into `k` clusters given their pairwise distances.
pub trait MedoidClusterer {
    fn fit(&self, distances: &DistanceMatrix, k: usize) -> Result<MedoidFit, ClusterError>;
}

/// PAM k-medoids
#[derive(Debug, Clone, Default)]
pub struct Pam {
    config: MedoidConfig,
}

impl Pam {
    pub fn new(config: MedoidConfig) -> Self {
        Self { config }
    }

    /// Random initialization with a fixed seed.
    pub fn with_seed(seed: u64) -> Self {
        Self::new(MedoidConfig::seeded(seed))
    }

    pub fn config(&self) -> &MedoidConfig {
        &self.config
    }

    fn initial_medoids(&self, distances: &DistanceMatrix, k: usize) -> Vec<usize> {
        match self.config.init {
            MedoidInit::Heuristic => init_heuristic(distances, k),
            MedoidInit::Build => init_build(distances, k),
            MedoidInit::Random => {
                let mut rng = match self.config.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                rand::seq::index::sample(&mut rng, distances.len(), k).into_vec()
            }
        }
    }
}

impl MedoidClusterer for Pam {
    fn fit(&self, distances: &DistanceMatrix, k: usize) -> Result<MedoidFit, ClusterError> {
        let n = distances.len();
        if n == 0 {
            return Err(ClusterError::Empty);
        }
        if k == 0 || k > n {
            return Err(ClusterError::InvalidClusterCount { k, n });
        }

        let mut medoids = self.initial_medoids(distances, k);
        debug!(n, k, init = ?self.config.init, ?medoids, "PAM initialized");

        let mut nearest = Nearest::compute(distances, &medoids);
        let mut iterations = 0;

        while iterations < self.config.max_iterations {
            let Some((slot, candidate, delta)) = best_swap(distances, &medoids, &nearest) else {
                break;
            };
            iterations += 1;
            medoids[slot] = candidate;
            nearest = Nearest::compute(distances, &medoids);
            debug!(iterations, slot, candidate, delta, "PAM swap applied");
        }

        if iterations == self.config.max_iterations {
            debug!(iterations, "PAM stopped at max_iterations");
        }

        Ok(MedoidFit {
            inertia: nearest.total(),
            labels: nearest.slot,
            medoid_indices: medoids,
            iterations,
        })
    }
}

/// Per-point nearest and second-nearest medoid.
struct Nearest {
    /// Medoid slot of the nearest medoid.
    slot: Vec<usize>,
    first: Vec<f64>,
    second: Vec<f64>,
}

impl Nearest {
    fn compute(distances: &DistanceMatrix, medoids: &[usize]) -> Self {
        let n = distances.len();
        let mut slot = vec![0; n];
        let mut first = vec![f64::INFINITY; n];
        let mut second = vec![f64::INFINITY; n];

        for j in 0..n {
            for (s, &m) in medoids.iter().enumerate() {
                let d = distances.get(m, j) as f64;
                // a medoid stays in its own cluster even when another medoid
                // is the same point
                if d < first[j] || (m == j && d <= first[j]) {
                    second[j] = first[j];
                    first[j] = d;
                    slot[j] = s;
                } else if d < second[j] {
                    second[j] = d;
                }
            }
        }

        Self {
            slot,
            first,
            second,
        }
    }

    fn total(&self) -> f64 {
        self.first.iter().sum()
    }
}

/// Best improving (slot, candidate, delta), if any.
fn best_swap(
    distances: &DistanceMatrix,
    medoids: &[usize],
    nearest: &Nearest,
) -> Option<(usize, usize, f64)> {
    let n = distances.len();
    let mut best: Option<(usize, usize, f64)> = None;

    for candidate in (0..n).filter(|h| !medoids.contains(h)) {
        let to_candidate = distances.row(candidate);
        for slot in 0..medoids.len() {
            let mut delta = 0.0;
            for j in 0..n {
                let d_h = to_candidate[j] as f64;
                let replacement = if nearest.slot[j] == slot {
                    nearest.second[j].min(d_h)
                } else {
                    nearest.first[j].min(d_h)
                };
                delta += replacement - nearest.first[j];
            }
            if delta < -SWAP_TOLERANCE && best.map_or(true, |(_, _, b)| delta < b) {
                best = Some((slot, candidate, delta));
            }
        }
    }

    best
}

/// Indices of the k smallest row sums (ties broken by index).
fn init_heuristic(distances: &DistanceMatrix, k: usize) -> Vec<usize> {
    let mut order: Vec<(usize, f64)> = (0..distances.len())
        .map(|i| (i, distances.row_sum(i)))
        .collect();
    order.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
    order.into_iter().take(k).map(|(i, _)| i).collect()
}

/// Greedy BUILD: start from the most central point, then repeatedly add the
/// point that lowers total deviation the most.
fn init_build(distances: &DistanceMatrix, k: usize) -> Vec<usize> {
    let n = distances.len();
    let mut medoids = init_heuristic(distances, 1);
    let mut nearest: Vec<f64> = distances.row(medoids[0]).iter().map(|&d| d as f64).collect();

    while medoids.len() < k {
        let mut best: Option<(usize, f64)> = None;
        for candidate in (0..n).filter(|c| !medoids.contains(c)) {
            let gain: f64 = distances
                .row(candidate)
                .iter()
                .zip(&nearest)
                .map(|(&d, &near)| (near - d as f64).max(0.0))
                .sum();
            if best.map_or(true, |(_, g)| gain > g) {
                best = Some((candidate, gain));
            }
        }

        // k <= n guarantees a candidate remains
        let Some((chosen, _)) = best else { break };
        for (near, &d) in nearest.iter_mut().zip(distances.row(chosen)) {
            *near = near.min(d as f64);
        }
        medoids.push(chosen);
    }

    medoids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::pairwise_distances;

    /// Two tight groups on the 1-D line: {0, 1, 2} near 0, {3, 4, 5} near 10.
    fn two_groups() -> DistanceMatrix {
        let points = [0.0f32, 0.5, 1.0, 10.0, 10.5, 11.0];
        let rows = points
            .iter()
            .map(|a| points.iter().map(|b| (a - b).abs()).collect())
            .collect();
        DistanceMatrix::from_rows(rows).unwrap()
    }

    fn assert_valid(fit: &MedoidFit, n: usize, k: usize) {
        assert_eq!(fit.medoid_indices.len(), k);
        let mut sorted = fit.medoid_indices.clone();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), k, "medoids must be distinct");
        assert!(fit.medoid_indices.iter().all(|&i| i < n));
        assert_eq!(fit.labels.len(), n);
        assert!(fit.labels.iter().all(|&l| l < k));
        for (slot, &m) in fit.medoid_indices.iter().enumerate() {
            assert_eq!(fit.labels[m], slot, "a medoid belongs to its own cluster");
        }
    }

    #[test]
    fn test_two_groups_all_inits() {
        let d = two_groups();
        for init in [MedoidInit::Heuristic, MedoidInit::Build, MedoidInit::Random] {
            let pam = Pam::new(MedoidConfig {
                init,
                seed: Some(3),
                ..MedoidConfig::default()
            });
            let fit = pam.fit(&d, 2).unwrap();
            assert_valid(&fit, 6, 2);

            let mut medoids = fit.medoid_indices.clone();
            medoids.sort_unstable();
            assert_eq!(medoids, vec![1, 4], "init {:?}", init);
            assert!((fit.inertia - 2.0).abs() < 1e-6);
            assert_eq!(fit.labels[0], fit.labels[2]);
            assert_eq!(fit.labels[3], fit.labels[5]);
            assert_ne!(fit.labels[0], fit.labels[5]);
        }
    }

    #[test]
    fn test_single_cluster_picks_center() {
        let fit = Pam::default().fit(&two_groups(), 1).unwrap();
        assert_valid(&fit, 6, 1);
        assert_eq!(fit.medoid_indices, vec![2]);
    }

    #[test]
    fn test_k_equals_n() {
        let d = two_groups();
        let fit = Pam::default().fit(&d, 6).unwrap();
        assert_valid(&fit, 6, 6);
        assert_eq!(fit.inertia, 0.0);
    }

    #[test]
    fn test_duplicate_points() {
        let v = vec![0.2, 0.9];
        let d = pairwise_distances(&[v.clone(), v.clone(), v]).unwrap();
        let fit = Pam::default().fit(&d, 3).unwrap();
        assert_valid(&fit, 3, 3);
        let mut medoids = fit.medoid_indices;
        medoids.sort_unstable();
        assert_eq!(medoids, vec![0, 1, 2]);

        let fit = Pam::new(MedoidConfig {
            init: MedoidInit::Build,
            ..MedoidConfig::default()
        })
        .fit(&d, 2)
        .unwrap();
        assert_valid(&fit, 3, 2);
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let d = pairwise_distances(&[
            vec![1.0, 0.0],
            vec![0.9, 0.1],
            vec![0.0, 1.0],
            vec![0.1, 0.9],
            vec![-1.0, 0.2],
            vec![-0.9, 0.1],
        ])
        .unwrap();
        let a = Pam::with_seed(11).fit(&d, 3).unwrap();
        let b = Pam::with_seed(11).fit(&d, 3).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_max_iterations_zero_keeps_init() {
        let pam = Pam::new(MedoidConfig {
            init: MedoidInit::Heuristic,
            max_iterations: 0,
            seed: None,
        });
        let d = two_groups();
        let fit = pam.fit(&d, 2).unwrap();
        assert_eq!(fit.iterations, 0);
        assert_eq!(fit.medoid_indices, init_heuristic(&d, 2));
    }

    #[test]
    fn test_errors() {
        let d = two_groups();
        assert_eq!(
            Pam::default().fit(&d, 0).unwrap_err(),
            ClusterError::InvalidClusterCount { k: 0, n: 6 }
        );
        assert_eq!(
            Pam::default().fit(&d, 7).unwrap_err(),
            ClusterError::InvalidClusterCount { k: 7, n: 6 }
        );
        let empty = DistanceMatrix::from_rows(vec![]).unwrap();
        assert_eq!(Pam::default().fit(&empty, 1).unwrap_err(), ClusterError::Empty);
    }

    #[test]
    fn test_init_deserializes_snake_case() {
        let init: MedoidInit = serde_yaml::from_str("build").unwrap();
        assert_eq!(init, MedoidInit::Build);
    }
}
