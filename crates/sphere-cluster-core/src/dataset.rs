//! Point identifiers and the feature-vector dataset consumed by a clustering run.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{SvcError, SvcResult};

/// Opaque handle into a dataset.
///
/// Totally ordered so that iteration and tie-breaking are deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PointId(pub u64);

impl fmt::Display for PointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<u64> for PointId {
    fn from(value: u64) -> Self {
        PointId(value)
    }
}

/// An ordered, finite collection of `(PointId, feature vector)` pairs.
///
/// Iteration order is the order the points were supplied in and is stable
/// for the lifetime of the dataset. All vectors share one dimension.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::dataset::{Dataset, PointId};
///
/// let dataset = Dataset::new(vec![
///     (PointId(0), vec![0.0, 0.0]),
///     (PointId(1), vec![1.0, 0.5]),
/// ]).unwrap();
/// assert_eq!(dataset.len(), 2);
/// assert_eq!(dataset.dimension(), 2);
/// assert_eq!(dataset.vector(PointId(1)), Some(&[1.0, 0.5][..]));
/// ```
#[derive(Debug, Clone)]
pub struct Dataset {
    ids: Vec<PointId>,
    vectors: Vec<Vec<f64>>,
    positions: HashMap<PointId, usize>,
    dimension: usize,
}

impl Dataset {
    /// Build a dataset from `(id, vector)` pairs.
    ///
    /// An empty input yields an empty dataset of dimension 0.
    ///
    /// # Errors
    ///
    /// - `SvcError::DuplicatePoint` if an id repeats
    /// - `SvcError::DimensionMismatch` if vector lengths differ
    pub fn new(points: Vec<(PointId, Vec<f64>)>) -> SvcResult<Self> {
        let dimension = points.first().map_or(0, |(_, v)| v.len());

        let mut ids = Vec::with_capacity(points.len());
        let mut vectors = Vec::with_capacity(points.len());
        let mut positions = HashMap::with_capacity(points.len());

        for (id, vector) in points {
            if vector.len() != dimension {
                return Err(SvcError::dimension_mismatch(dimension, vector.len()));
            }
            if positions.insert(id, ids.len()).is_some() {
                return Err(SvcError::DuplicatePoint { id });
            }
            ids.push(id);
            vectors.push(vector);
        }

        Ok(Self {
            ids,
            vectors,
            positions,
            dimension,
        })
    }

    /// Build a dataset whose ids are `0..vectors.len()` in order.
    pub fn from_vectors(vectors: Vec<Vec<f64>>) -> SvcResult<Self> {
        Self::new(
            vectors
                .into_iter()
                .enumerate()
                .map(|(i, v)| (PointId(i as u64), v))
                .collect(),
        )
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Shared dimension of all feature vectors; 0 when empty.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Point ids in iteration order.
    pub fn ids(&self) -> &[PointId] {
        &self.ids
    }

    /// Position of `id` in iteration order.
    pub fn position(&self, id: PointId) -> Option<usize> {
        self.positions.get(&id).copied()
    }

    /// Feature vector of `id`, if present.
    pub fn vector(&self, id: PointId) -> Option<&[f64]> {
        self.position(id).map(|pos| self.vectors[pos].as_slice())
    }

    /// Feature vector of `id`, failing with `UnknownPoint` if absent.
    pub fn require(&self, id: PointId) -> SvcResult<&[f64]> {
        self.vector(id).ok_or(SvcError::UnknownPoint { id })
    }

    /// Feature vector at iteration position `pos`.
    ///
    /// # Panics
    ///
    /// Panics if `pos >= len()`.
    #[inline]
    pub fn vector_at(&self, pos: usize) -> &[f64] {
        &self.vectors[pos]
    }

    /// Iterate `(id, vector)` pairs in iteration order.
    pub fn iter(&self) -> impl Iterator<Item = (PointId, &[f64])> + '_ {
        self.ids
            .iter()
            .copied()
            .zip(self.vectors.iter().map(Vec::as_slice))
    }
}
