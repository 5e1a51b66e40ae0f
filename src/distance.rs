//! Pairwise cosine distance
//!
//! Cosine distance is `1 - cos(a, b)`, clamped to `[0, 2]`. A zero vector has
//! similarity 0 with everything, so its distance to any other vector is 1.

use crate::error::{ClusterError, DimensionMismatch};

/// Square, symmetric distance matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    n: usize,
    values: Vec<f32>,
}

impl DistanceMatrix {
    /// Build from explicit rows, e.g. distances computed elsewhere.
    pub fn from_rows(rows: Vec<Vec<f32>>) -> Result<Self, ClusterError> {
        let n = rows.len();
        let mut values = Vec::with_capacity(n * n);
        for row in rows {
            if row.len() != n {
                return Err(ClusterError::NotSquare {
                    rows: n,
                    cols: row.len(),
                });
            }
            values.extend(row);
        }
        Ok(Self { n, values })
    }

    fn zeros(n: usize) -> Self {
        Self {
            n,
            values: vec![0.0; n * n],
        }
    }

    /// Number of points (rows).
    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// # Panics
    /// Panics if `i` or `j` is out of bounds.
    pub fn get(&self, i: usize, j: usize) -> f32 {
        assert!(i < self.n && j < self.n, "index ({i}, {j}) out of bounds");
        self.values[i * self.n + j]
    }

    pub fn row(&self, i: usize) -> &[f32] {
        &self.values[i * self.n..(i + 1) * self.n]
    }

    /// Sum of row `i`, accumulated in f64.
    pub(crate) fn row_sum(&self, i: usize) -> f64 {
        self.row(i).iter().map(|&d| d as f64).sum()
    }

    fn set_symmetric(&mut self, i: usize, j: usize, d: f32) {
        self.values[i * self.n + j] = d;
        self.values[j * self.n + i] = d;
    }
}

fn norm(v: &[f32]) -> f64 {
    v.iter().map(|&x| (x as f64) * (x as f64)).sum::<f64>().sqrt()
}

fn dot(a: &[f32], b: &[f32]) -> f64 {
    a.iter().zip(b).map(|(&x, &y)| x as f64 * y as f64).sum()
}

fn distance_from_parts(dot: f64, norm_a: f64, norm_b: f64) -> f32 {
    let similarity = if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    };
    (1.0 - similarity).clamp(0.0, 2.0) as f32
}

/// Cosine similarity in `[-1, 1]`; 0 when either vector has zero magnitude.
///
/// # Panics
/// Panics if the vectors have different dimensions.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    1.0 - cosine_distance(a, b)
}

/// Cosine distance between two vectors.
///
/// # Panics
/// Panics if the vectors have different dimensions.
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "all vectors must have same dimension");
    distance_from_parts(dot(a, b), norm(a), norm(b))
}

/// All-pairs cosine distance. Diagonal is exactly 0.
///
/// Every vector must have the dimension of the first one.
pub fn pairwise_distances(vectors: &[Vec<f32>]) -> Result<DistanceMatrix, DimensionMismatch> {
    let n = vectors.len();
    let mut matrix = DistanceMatrix::zeros(n);
    if n == 0 {
        return Ok(matrix);
    }

    let expected = vectors[0].len();
    let mut norms = Vec::with_capacity(n);
    for (index, v) in vectors.iter().enumerate() {
        if v.len() != expected {
            return Err(DimensionMismatch {
                index,
                expected,
                found: v.len(),
            });
        }
        norms.push(norm(v));
    }

    for i in 0..n {
        for j in (i + 1)..n {
            let d = distance_from_parts(dot(&vectors[i], &vectors[j]), norms[i], norms[j]);
            matrix.set_symmetric(i, j, d);
        }
    }

    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_vectors() {
        let d = cosine_distance(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0]);
        assert!(d.abs() < 1e-6);
    }

    #[test]
    fn test_orthogonal_vectors() {
        let d = cosine_distance(&[1.0, 0.0], &[0.0, 1.0]);
        assert!((d - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_opposite_vectors() {
        let d = cosine_distance(&[1.0, 1.0], &[-1.0, -1.0]);
        assert!((d - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_vector() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[3.0, 4.0]), 1.0);
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[0.0, 0.0]), 0.0);
    }

    #[test]
    fn test_scale_invariant() {
        let a = cosine_distance(&[1.0, 2.0], &[2.0, 1.0]);
        let b = cosine_distance(&[10.0, 20.0], &[0.2, 0.1]);
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "all vectors must have same dimension")]
    fn test_dimension_mismatch() {
        cosine_distance(&[1.0], &[1.0, 2.0]);
    }

    #[test]
    fn test_pairwise_shape() {
        let m = pairwise_distances(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![1.0, 1.0]]).unwrap();
        assert_eq!(m.len(), 3);
        for i in 0..3 {
            assert_eq!(m.get(i, i), 0.0);
            for j in 0..3 {
                assert_eq!(m.get(i, j), m.get(j, i));
            }
        }
        assert!((m.get(0, 1) - 1.0).abs() < 1e-6);
        let expected = 1.0 - 1.0 / 2.0_f32.sqrt();
        assert!((m.get(0, 2) - expected).abs() < 1e-6);
    }

    #[test]
    fn test_pairwise_identical_pair() {
        let v = vec![0.3, -0.7, 0.1];
        let m = pairwise_distances(&[v.clone(), v]).unwrap();
        assert!(m.get(0, 1).abs() < 1e-6);
    }

    #[test]
    fn test_pairwise_empty() {
        let m = pairwise_distances(&[]).unwrap();
        assert!(m.is_empty());
    }

    #[test]
    fn test_pairwise_dimension_mismatch() {
        let err = pairwise_distances(&[vec![1.0, 0.0], vec![0.0, 1.0], vec![0.0, 1.0, 0.0]])
            .unwrap_err();
        assert_eq!(
            err,
            DimensionMismatch {
                index: 2,
                expected: 2,
                found: 3,
            }
        );
    }

    #[test]
    fn test_from_rows() {
        let m = DistanceMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.5, 0.0]]).unwrap();
        assert_eq!(m.row(1), &[0.5, 0.0]);
        assert!((m.row_sum(0) - 0.5).abs() < 1e-9);

        let err = DistanceMatrix::from_rows(vec![vec![0.0, 0.5], vec![0.5]]).unwrap_err();
        assert_eq!(err, ClusterError::NotSquare { rows: 2, cols: 1 });
    }
}
