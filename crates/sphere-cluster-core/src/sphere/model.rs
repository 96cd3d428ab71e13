//! Trained sphere model and the trainer seam that produces it.
//!
//! The sphere is fitted elsewhere (an SVDD quadratic-program solver). This
//! crate only consumes the result: support-vector ids, their coefficients
//! and the squared radius, delivered together as a [`TrainedSphere`].

use serde::{Deserialize, Serialize};

use crate::dataset::{Dataset, PointId};
use crate::error::{SvcError, SvcResult};
use crate::kernel::{Kernel, KernelMatrix};

pub(crate) fn check_r_squared(r_squared: f64) -> SvcResult<()> {
    if r_squared.is_finite() && r_squared >= 0.0 {
        Ok(())
    } else {
        Err(SvcError::untrained(r_squared))
    }
}

/// Support vectors and their coefficients.
///
/// `coefficients[i]` belongs to `support_indices[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SphereModel {
    pub support_indices: Vec<PointId>,
    pub coefficients: Vec<f64>,
}

impl SphereModel {
    pub fn new(support_indices: Vec<PointId>, coefficients: Vec<f64>) -> Self {
        Self {
            support_indices,
            coefficients,
        }
    }

    /// Number of support vectors.
    #[inline]
    pub fn support_count(&self) -> usize {
        self.support_indices.len()
    }

    /// Iterate `(support id, coefficient)` pairs.
    pub fn support(&self) -> impl Iterator<Item = (PointId, f64)> + '_ {
        self.support_indices
            .iter()
            .copied()
            .zip(self.coefficients.iter().copied())
    }
}

/// A sphere model together with its fitted squared radius.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::dataset::PointId;
/// use sphere_cluster_core::sphere::{SphereModel, TrainedSphere};
///
/// let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 0.25);
/// assert_eq!(sphere.model.support_count(), 1);
/// assert!(TrainedSphere::new(sphere.model.clone(), f64::NAN).check_radius().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainedSphere {
    pub model: SphereModel,
    pub r_squared: f64,
}

impl TrainedSphere {
    pub fn new(model: SphereModel, r_squared: f64) -> Self {
        Self { model, r_squared }
    }

    /// Fail with `UntrainedModel` unless r² is finite and non-negative.
    pub fn check_radius(&self) -> SvcResult<()> {
        check_r_squared(self.r_squared)
    }

    /// Validate the sphere against the dataset it was trained on.
    ///
    /// # Errors
    ///
    /// - `SvcError::UntrainedModel` if r² is NaN, infinite or negative
    /// - `SvcError::InconsistentSize` if coefficient and support counts differ
    /// - `SvcError::UnknownPoint` if a support vector is not in `dataset`
    pub fn validate(&self, dataset: &Dataset) -> SvcResult<()> {
        self.check_radius()?;

        if self.model.coefficients.len() != self.model.support_indices.len() {
            return Err(SvcError::inconsistent_size(
                "sphere coefficients",
                self.model.support_indices.len(),
                self.model.coefficients.len(),
            ));
        }

        for &id in &self.model.support_indices {
            dataset.require(id)?;
        }

        Ok(())
    }
}

/// Fits an enclosing sphere (SVDD) to a dataset.
///
/// Implementations live outside this crate. The kernel matrix over the full
/// dataset is handed over so the solver need not recompute it.
pub trait SphereTrainer {
    fn train(
        &self,
        dataset: &Dataset,
        kernel: &dyn Kernel,
        matrix: &KernelMatrix,
        cost: f64,
    ) -> SvcResult<TrainedSphere>;
}

/// Trainer that returns a sphere fitted ahead of time.
#[derive(Debug, Clone)]
pub struct PrecomputedSphere(pub TrainedSphere);

impl SphereTrainer for PrecomputedSphere {
    fn train(
        &self,
        _dataset: &Dataset,
        _kernel: &dyn Kernel,
        _matrix: &KernelMatrix,
        _cost: f64,
    ) -> SvcResult<TrainedSphere> {
        Ok(self.0.clone())
    }
}

/// Query-independent part of the membership inequality,
/// `sum_i sum_j coef[i] * coef[j] * k(sv_i, sv_j)`.
///
/// Computed once per clustering run and reused for every membership test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedPart(f64);

impl FixedPart {
    /// Compute from the cached kernel matrix.
    ///
    /// # Errors
    ///
    /// Returns `SvcError::UnknownPoint` if a support vector is not covered.
    pub fn from_matrix(model: &SphereModel, matrix: &KernelMatrix) -> SvcResult<Self> {
        let offsets = model
            .support_indices
            .iter()
            .map(|&id| matrix.offset(id).ok_or(SvcError::UnknownPoint { id }))
            .collect::<SvcResult<Vec<_>>>()?;

        let mut sum = 0.0;
        for (&oi, &ci) in offsets.iter().zip(&model.coefficients) {
            for (&oj, &cj) in offsets.iter().zip(&model.coefficients) {
                sum += ci * cj * matrix.similarity_at(oi, oj);
            }
        }
        Ok(Self(sum))
    }

    /// Compute by calling the kernel directly on the support vectors.
    pub fn from_kernel(
        model: &SphereModel,
        dataset: &Dataset,
        kernel: &dyn Kernel,
    ) -> SvcResult<Self> {
        let vectors = model
            .support_indices
            .iter()
            .map(|&id| dataset.require(id))
            .collect::<SvcResult<Vec<_>>>()?;

        let mut sum = 0.0;
        for (vi, &ci) in vectors.iter().zip(&model.coefficients) {
            for (vj, &cj) in vectors.iter().zip(&model.coefficients) {
                sum += ci * cj * kernel.similarity(vi, vj);
            }
        }
        Ok(Self(sum))
    }

    /// Wrap an already computed value.
    pub fn from_value(value: f64) -> Self {
        Self(value)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}
