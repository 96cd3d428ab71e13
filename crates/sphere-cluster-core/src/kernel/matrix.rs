//! Precomputed symmetric kernel matrix.
//!
//! # Layout
//!
//! Values are stored densely, row-major, indexed by the offsets of an
//! [`IdOffsets`] mapping. Offsets follow sorted id order, not dataset order.
//! Both cells of every pair hold the same scalar, so
//! `similarity(i, j) == similarity(j, i)` holds bit-for-bit.
//!
//! The matrix is built once and read-only afterwards. [`KernelMatrix::centered`]
//! returns a new matrix rather than mutating in place.

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::dataset::{Dataset, PointId};
use crate::error::{SvcError, SvcResult};

use super::offsets::IdOffsets;
use super::Kernel;

/// Cached `k(p_i, p_j)` for every pair of points in a set.
#[derive(Debug, Clone, PartialEq)]
pub struct KernelMatrix {
    offsets: IdOffsets,
    values: Vec<f64>,
}

impl KernelMatrix {
    /// Build the matrix over every point of `dataset`.
    ///
    /// Each unordered pair `(i, j)`, `i <= j`, is evaluated exactly once and
    /// written to both cells.
    ///
    /// # Example
    ///
    /// ```
    /// use sphere_cluster_core::dataset::{Dataset, PointId};
    /// use sphere_cluster_core::kernel::{KernelMatrix, LinearKernel};
    ///
    /// let dataset = Dataset::from_vectors(vec![vec![1.0, 0.0], vec![0.0, 2.0]]).unwrap();
    /// let matrix = KernelMatrix::build(&dataset, &LinearKernel, false);
    /// assert_eq!(matrix.similarity(PointId(1), PointId(1)).unwrap(), 4.0);
    /// assert_eq!(matrix.distance(PointId(0), PointId(1)).unwrap(), 5.0f64.sqrt());
    /// ```
    pub fn build(dataset: &Dataset, kernel: &dyn Kernel, parallel: bool) -> Self {
        let offsets = IdOffsets::new(dataset.ids());
        let vectors: Vec<&[f64]> = (0..offsets.len())
            .filter_map(|off| offsets.id_at(off))
            .filter_map(|id| dataset.vector(id))
            .collect();
        let values = compute_values(&vectors, kernel, parallel);
        Self { offsets, values }
    }

    /// Adopt an externally computed table.
    ///
    /// `rows[a][b]` is `k(ids[a], ids[b])`, in the order of `ids`.
    ///
    /// # Errors
    ///
    /// - `SvcError::InconsistentSize` if the table is not `ids.len()` square
    /// - `SvcError::DuplicatePoint` if an id repeats
    /// - `SvcError::InvalidParameter` if the table is not exactly symmetric
    pub fn from_precomputed(ids: &[PointId], rows: Vec<Vec<f64>>) -> SvcResult<Self> {
        let n = ids.len();
        if rows.len() != n {
            return Err(SvcError::inconsistent_size("kernel matrix rows", n, rows.len()));
        }
        if let Some(row) = rows.iter().find(|row| row.len() != n) {
            return Err(SvcError::inconsistent_size(
                "kernel matrix columns",
                n,
                row.len(),
            ));
        }
        ensure_distinct(ids)?;

        for a in 0..n {
            for b in (a + 1)..n {
                if rows[a][b].to_bits() != rows[b][a].to_bits() {
                    return Err(SvcError::invalid_parameter(format!(
                        "kernel matrix is not symmetric at ({}, {}): {} != {}",
                        ids[a], ids[b], rows[a][b], rows[b][a]
                    )));
                }
            }
        }

        let offsets = IdOffsets::new(ids);
        let mut values = vec![0.0; n * n];
        for (a, row) in rows.iter().enumerate() {
            let oa = offsets
                .offset(ids[a])
                .ok_or(SvcError::UnknownPoint { id: ids[a] })?;
            for (b, &value) in row.iter().enumerate() {
                let ob = offsets
                    .offset(ids[b])
                    .ok_or(SvcError::UnknownPoint { id: ids[b] })?;
                values[oa * n + ob] = value;
            }
        }

        Ok(Self { offsets, values })
    }

    /// Number of points covered.
    #[inline]
    pub fn size(&self) -> usize {
        self.offsets.len()
    }

    /// The id-to-offset mapping.
    pub fn offsets(&self) -> &IdOffsets {
        &self.offsets
    }

    /// Offset of `id`, if covered.
    #[inline]
    pub fn offset(&self, id: PointId) -> Option<usize> {
        self.offsets.offset(id)
    }

    /// Covered ids, in offset order.
    pub fn ids(&self) -> Vec<PointId> {
        (0..self.size())
            .filter_map(|off| self.offsets.id_at(off))
            .collect()
    }

    fn require_offset(&self, id: PointId) -> SvcResult<usize> {
        self.offset(id).ok_or(SvcError::UnknownPoint { id })
    }

    /// `k(i, j)` by offset.
    ///
    /// # Panics
    ///
    /// Panics if either offset is out of range.
    #[inline]
    pub fn similarity_at(&self, oi: usize, oj: usize) -> f64 {
        self.values[oi * self.size() + oj]
    }

    /// `k(i, j)`.
    pub fn similarity(&self, i: PointId, j: PointId) -> SvcResult<f64> {
        let oi = self.require_offset(i)?;
        let oj = self.require_offset(j)?;
        Ok(self.similarity_at(oi, oj))
    }

    /// Squared feature-space distance `k(i,i) + k(j,j) - 2 k(i,j)`.
    ///
    /// Clamped at zero; rounding can push it slightly negative for
    /// near-identical points.
    pub fn squared_distance(&self, i: PointId, j: PointId) -> SvcResult<f64> {
        let oi = self.require_offset(i)?;
        let oj = self.require_offset(j)?;
        let d2 = self.similarity_at(oi, oi) + self.similarity_at(oj, oj)
            - 2.0 * self.similarity_at(oi, oj);
        Ok(d2.max(0.0))
    }

    /// Feature-space distance `sqrt(k(i,i) + k(j,j) - 2 k(i,j))`.
    pub fn distance(&self, i: PointId, j: PointId) -> SvcResult<f64> {
        self.squared_distance(i, j).map(f64::sqrt)
    }

    /// Row of `id`, in offset order.
    pub fn row(&self, id: PointId) -> SvcResult<&[f64]> {
        let n = self.size();
        let oi = self.require_offset(id)?;
        Ok(&self.values[oi * n..(oi + 1) * n])
    }

    /// Restriction of the matrix to `ids`.
    pub fn sub_matrix(&self, ids: &[PointId]) -> SvcResult<Self> {
        ensure_distinct(ids)?;
        let offsets = IdOffsets::new(ids);
        let source = (0..offsets.len())
            .filter_map(|off| offsets.id_at(off))
            .map(|id| self.require_offset(id))
            .collect::<SvcResult<Vec<_>>>()?;

        let m = source.len();
        let mut values = Vec::with_capacity(m * m);
        for &si in &source {
            for &sj in &source {
                values.push(self.similarity_at(si, sj));
            }
        }
        Ok(Self { offsets, values })
    }

    /// Double-centered copy of this matrix.
    ///
    /// Each cell becomes `k(i,j) - mean_row(i) - mean_col(j) + mean_all`,
    /// which centers the implicit feature vectors at their mean. Centering
    /// an already centered matrix again re-derives the means, so the result
    /// is a new matrix that is only equal up to rounding.
    pub fn centered(&self) -> Self {
        Self {
            offsets: self.offsets.clone(),
            values: center_values(&self.values, self.size()),
        }
    }
}

/// Double-center a dense row-major `n x n` table.
///
/// # Panics
///
/// Panics if `values.len() != n * n`.
pub fn center_values(values: &[f64], n: usize) -> Vec<f64> {
    assert_eq!(values.len(), n * n, "center_values expects an n x n table");
    if n == 0 {
        return Vec::new();
    }

    let nf = n as f64;
    let mut row_means = vec![0.0; n];
    let mut col_means = vec![0.0; n];
    for i in 0..n {
        for j in 0..n {
            let v = values[i * n + j];
            row_means[i] += v;
            col_means[j] += v;
        }
    }
    for mean in row_means.iter_mut().chain(col_means.iter_mut()) {
        *mean /= nf;
    }
    let total_mean = row_means.iter().sum::<f64>() / nf;

    let mut centered = Vec::with_capacity(n * n);
    for i in 0..n {
        for j in 0..n {
            centered.push(values[i * n + j] - row_means[i] - col_means[j] + total_mean);
        }
    }
    centered
}

fn ensure_distinct(ids: &[PointId]) -> SvcResult<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for &id in ids {
        if !seen.insert(id) {
            return Err(SvcError::DuplicatePoint { id });
        }
    }
    Ok(())
}

/// Evaluate the upper triangle once and mirror it.
fn compute_values(vectors: &[&[f64]], kernel: &dyn Kernel, parallel: bool) -> Vec<f64> {
    let start = Instant::now();
    let n = vectors.len();

    let upper_row = |i: usize| -> Vec<f64> {
        (i..n)
            .map(|j| kernel.similarity(vectors[i], vectors[j]))
            .collect()
    };

    let rows: Vec<Vec<f64>> = if parallel {
        (0..n).into_par_iter().map(upper_row).collect()
    } else {
        (0..n).map(upper_row).collect()
    };

    let mut values = vec![0.0; n * n];
    for (i, row) in rows.into_iter().enumerate() {
        for (k, value) in row.into_iter().enumerate() {
            let j = i + k;
            values[i * n + j] = value;
            values[j * n + i] = value;
        }
    }

    debug!(
        points = n,
        kernel = kernel.name(),
        parallel,
        elapsed_us = start.elapsed().as_micros() as u64,
        "kernel matrix built"
    );
    values
}
