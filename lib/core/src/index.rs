use crate::{Error, Result};
use ordered_float::OrderedFloat;
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Rows above which the distance pass is split across the rayon pool
const PARALLEL_SCAN_CUTOFF: usize = 4096;

/// A ranked neighbour: catalog ordinal plus its Euclidean distance to the query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub ordinal: usize,
    pub distance: f32,
}

impl Neighbor {
    #[inline]
    fn key(&self) -> (OrderedFloat<f32>, usize) {
        (OrderedFloat(self.distance), self.ordinal)
    }
}

impl Eq for Neighbor {}

impl Ord for Neighbor {
    // Max-heap on (distance, ordinal): the worst kept neighbour sits on top
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl PartialOrd for Neighbor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Read-only k-nearest-neighbour search over the QA embeddings.
///
/// Implementations return at most `k` neighbours in ascending distance, ties
/// broken by ascending ordinal.
pub trait NeighborSearch: Send + Sync {
    /// Number of indexed rows
    fn len(&self) -> usize;

    /// Row dimension
    fn dim(&self) -> usize;

    fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Immutable exhaustive Euclidean index.
///
/// Rows live in one contiguous buffer so a scan walks memory linearly.
#[derive(Debug, Clone)]
pub struct VectorIndex {
    /// Row-major storage, `len * dim` values
    vectors: Vec<f32>,
    dim: usize,
}

impl VectorIndex {
    /// Build an index from row-major data. Fails if the buffer is not a whole
    /// number of rows or holds non-finite values.
    pub fn from_flat(dim: usize, vectors: Vec<f32>) -> Result<Self> {
        if dim == 0 {
            return Err(Error::MalformedIndex("dimension must be positive".to_string()));
        }
        if vectors.len() % dim != 0 {
            return Err(Error::MalformedIndex(format!(
                "{} values do not divide into rows of dimension {}",
                vectors.len(),
                dim
            )));
        }
        if let Some(pos) = vectors.iter().position(|v| !v.is_finite()) {
            return Err(Error::MalformedIndex(format!(
                "non-finite value in row {}",
                pos / dim
            )));
        }
        Ok(Self { vectors, dim })
    }

    /// Build an index from individual rows, all of which must have length `dim`.
    pub fn from_rows(dim: usize, rows: Vec<Vec<f32>>) -> Result<Self> {
        let mut flat = Vec::with_capacity(rows.len() * dim);
        for (ordinal, row) in rows.into_iter().enumerate() {
            if row.len() != dim {
                return Err(Error::MalformedIndex(format!(
                    "row {} has dimension {}, expected {}",
                    ordinal,
                    row.len(),
                    dim
                )));
            }
            flat.extend_from_slice(&row);
        }
        Self::from_flat(dim, flat)
    }

    #[inline]
    #[must_use]
    pub fn row(&self, ordinal: usize) -> Option<&[f32]> {
        let start = ordinal.checked_mul(self.dim)?;
        self.vectors.get(start..start + self.dim)
    }

    #[must_use]
    pub fn as_flat(&self) -> &[f32] {
        &self.vectors
    }

    fn distances(&self, query: &[f32]) -> Vec<Neighbor> {
        let score = |(ordinal, row): (usize, &[f32])| Neighbor {
            ordinal,
            distance: crate::simd::l2_distance_simd(query, row),
        };

        if self.len() >= PARALLEL_SCAN_CUTOFF {
            self.vectors
                .par_chunks_exact(self.dim)
                .enumerate()
                .map(score)
                .collect()
        } else {
            self.vectors.chunks_exact(self.dim).enumerate().map(score).collect()
        }
    }
}

impl NeighborSearch for VectorIndex {
    #[inline]
    fn len(&self) -> usize {
        self.vectors.len() / self.dim
    }

    #[inline]
    fn dim(&self) -> usize {
        self.dim
    }

    fn nearest(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        if query.len() != self.dim {
            return Err(Error::InvalidDimension {
                expected: self.dim,
                actual: query.len(),
            });
        }
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored = self.distances(query);

        if k >= scored.len() {
            scored.sort_unstable();
            return Ok(scored);
        }

        // Bounded max-heap keeps only the k best
        let mut heap: BinaryHeap<Neighbor> = BinaryHeap::with_capacity(k + 1);
        for neighbor in scored {
            if heap.len() < k {
                heap.push(neighbor);
            } else if let Some(worst) = heap.peek() {
                if neighbor < *worst {
                    heap.pop();
                    heap.push(neighbor);
                }
            }
        }
        Ok(heap.into_sorted_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    fn line_index() -> VectorIndex {
        // Points on the x axis at 0, 1, 2, ... 9
        let rows = (0..10).map(|i| vec![i as f32, 0.0, 0.0]).collect();
        VectorIndex::from_rows(3, rows).unwrap()
    }

    #[test]
    fn test_full_scan_is_ranked_ascending() {
        let index = line_index();
        let results = index.nearest(&[4.2, 0.0, 0.0], index.len()).unwrap();

        assert_eq!(results.len(), 10);
        let order: Vec<usize> = results.iter().map(|n| n.ordinal).collect();
        assert_eq!(order, vec![4, 5, 3, 6, 2, 7, 1, 8, 0, 9]);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
        assert!((results[0].distance - 0.2).abs() < 1e-5);
    }

    #[test]
    fn test_partial_k_matches_prefix_of_full_scan() {
        let mut rng = rand::rng();
        let rows: Vec<Vec<f32>> = (0..200)
            .map(|_| (0..16).map(|_| rng.random::<f32>()).collect())
            .collect();
        let index = VectorIndex::from_rows(16, rows).unwrap();
        let query: Vec<f32> = (0..16).map(|_| rng.random::<f32>()).collect();

        let full = index.nearest(&query, index.len()).unwrap();
        let top = index.nearest(&query, 7).unwrap();
        assert_eq!(top, full[..7].to_vec());
    }

    #[test]
    fn test_ties_break_by_ordinal() {
        let rows = vec![vec![1.0, 0.0], vec![0.0, 1.0], vec![-1.0, 0.0]];
        let index = VectorIndex::from_rows(2, rows).unwrap();
        let results = index.nearest(&[0.0, 0.0], 3).unwrap();
        let order: Vec<usize> = results.iter().map(|n| n.ordinal).collect();
        assert_eq!(order, vec![0, 1, 2]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let index = line_index();
        let err = index.nearest(&[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(err, Error::InvalidDimension { expected: 3, actual: 2 }));
    }

    #[test]
    fn test_rejects_ragged_and_non_finite_rows() {
        assert!(VectorIndex::from_rows(2, vec![vec![1.0, 2.0], vec![1.0]]).is_err());
        assert!(VectorIndex::from_flat(2, vec![1.0, 2.0, 3.0]).is_err());
        assert!(VectorIndex::from_flat(2, vec![1.0, f32::NAN]).is_err());
        assert!(VectorIndex::from_flat(0, vec![]).is_err());
    }

    #[test]
    fn test_row_access() {
        let index = line_index();
        assert_eq!(index.row(3), Some(&[3.0, 0.0, 0.0][..]));
        assert_eq!(index.row(10), None);
    }
}
