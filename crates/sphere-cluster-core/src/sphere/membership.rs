//! Enclosing-sphere membership test.
//!
//! A point `x` lies inside the trained sphere iff
//!
//! ```text
//! k(x, x) - 2 * sum_i coef[i] * k(x, sv_i) + fixed_part <= r^2
//! ```
//!
//! The left-hand side is the squared feature-space distance from the image
//! of `x` to the sphere center. The evaluator works on raw feature vectors
//! and calls the kernel for every support vector on each query, so it
//! answers identically for dataset points and for synthetic points sampled
//! between them.

use crate::dataset::Dataset;
use crate::error::{SvcError, SvcResult};
use crate::kernel::Kernel;

use super::model::{check_r_squared, FixedPart, SphereModel, TrainedSphere};

/// Evaluate the membership value `k(x,x) - 2 * cross + fixed_part`.
fn membership_value<'a>(
    kernel: &dyn Kernel,
    point: &[f64],
    support: impl Iterator<Item = (&'a [f64], f64)>,
    fixed_part: f64,
) -> f64 {
    let self_sim = kernel.similarity(point, point);
    let cross: f64 = support
        .map(|(sv, coef)| coef * kernel.similarity(point, sv))
        .sum();
    self_sim - 2.0 * cross + fixed_part
}

/// Stateless membership contract.
///
/// Returns whether `point` lies inside the sphere described by `model`,
/// `fixed_part` and `r_squared`. A NaN kernel value makes the comparison
/// false, so the point counts as outside.
///
/// # Errors
///
/// - `SvcError::UntrainedModel` if `r_squared` is NaN, infinite or negative
/// - `SvcError::DimensionMismatch` if `point` and `dataset` differ in dimension
/// - `SvcError::UnknownPoint` if a support vector is not in `dataset`
pub fn accept(
    point: &[f64],
    model: &SphereModel,
    dataset: &Dataset,
    kernel: &dyn Kernel,
    fixed_part: FixedPart,
    r_squared: f64,
) -> SvcResult<bool> {
    check_r_squared(r_squared)?;
    if point.len() != dataset.dimension() {
        return Err(SvcError::dimension_mismatch(dataset.dimension(), point.len()));
    }
    let support = model
        .support()
        .map(|(id, coef)| dataset.require(id).map(|v| (v, coef)))
        .collect::<SvcResult<Vec<_>>>()?;
    let value = membership_value(kernel, point, support.into_iter(), fixed_part.value());
    Ok(value <= r_squared)
}

/// Membership evaluator bound to one trained sphere.
///
/// Resolves support vectors to feature vectors once at construction. The
/// radius is checked there too, so a constructed evaluator always holds a
/// finite non-negative r². Points whose dimension differs from the dataset
/// are never inside.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::dataset::{Dataset, PointId};
/// use sphere_cluster_core::kernel::LinearKernel;
/// use sphere_cluster_core::sphere::{FixedPart, SphereMembership, SphereModel, TrainedSphere};
///
/// // Linear kernel with a single unit-weight support vector: a euclidean
/// // ball of radius 1 around (2, 0).
/// let dataset = Dataset::from_vectors(vec![vec![2.0, 0.0], vec![0.0, 0.0]]).unwrap();
/// let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
/// let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &LinearKernel).unwrap();
/// let membership = SphereMembership::new(&LinearKernel, &dataset, &sphere, fixed).unwrap();
///
/// assert!(membership.accept(&[2.5, 0.5]));
/// assert!(!membership.accept(&[0.0, 0.0]));
/// ```
pub struct SphereMembership<'a> {
    kernel: &'a dyn Kernel,
    support_vectors: Vec<&'a [f64]>,
    coefficients: Vec<f64>,
    fixed_part: FixedPart,
    r_squared: f64,
    dimension: usize,
}

impl<'a> SphereMembership<'a> {
    /// Bind a validated sphere to its kernel and dataset.
    ///
    /// # Errors
    ///
    /// See [`TrainedSphere::validate`].
    pub fn new(
        kernel: &'a dyn Kernel,
        dataset: &'a Dataset,
        sphere: &TrainedSphere,
        fixed_part: FixedPart,
    ) -> SvcResult<Self> {
        sphere.validate(dataset)?;
        let support_vectors = sphere
            .model
            .support_indices
            .iter()
            .map(|&id| dataset.require(id))
            .collect::<SvcResult<Vec<_>>>()?;

        Ok(Self {
            kernel,
            support_vectors,
            coefficients: sphere.model.coefficients.clone(),
            fixed_part,
            r_squared: sphere.r_squared,
            dimension: dataset.dimension(),
        })
    }

    /// Squared feature-space distance of `point` to the sphere center.
    ///
    /// NaN if `point` has the wrong dimension.
    pub fn score(&self, point: &[f64]) -> f64 {
        if point.len() != self.dimension {
            return f64::NAN;
        }
        membership_value(
            self.kernel,
            point,
            self.support_vectors
                .iter()
                .copied()
                .zip(self.coefficients.iter().copied()),
            self.fixed_part.value(),
        )
    }

    /// Whether `point` lies inside (or on) the sphere.
    ///
    /// False for a point of the wrong dimension.
    #[inline]
    pub fn accept(&self, point: &[f64]) -> bool {
        self.score(point) <= self.r_squared
    }

    #[inline]
    pub fn r_squared(&self) -> f64 {
        self.r_squared
    }

    #[inline]
    pub fn fixed_part(&self) -> FixedPart {
        self.fixed_part
    }

    /// Feature-vector dimension of the bound dataset.
    #[inline]
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    #[inline]
    pub fn support_count(&self) -> usize {
        self.support_vectors.len()
    }

    pub fn kernel(&self) -> &dyn Kernel {
        self.kernel
    }
}
