//! Line-sampling connectivity between two points.
//!
//! Two points are connected when the input-space segment between them maps
//! entirely inside the enclosing sphere. The segment is checked at
//! `sample_count` points: starting at the far endpoint and stepping back
//! towards the near one by `(far - near) / sample_count`. The far endpoint
//! is always sampled; the near endpoint is covered by its own membership
//! test, so together every sample of the closed segment is checked.
//!
//! The pair is put in a canonical order (lexicographic on the feature
//! vectors) before sampling, so `connected(p, q)` and `connected(q, p)`
//! evaluate exactly the same sample points.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::error::{SvcError, SvcResult};
use crate::sphere::SphereMembership;

/// Default number of samples per segment.
pub const DEFAULT_SAMPLE_COUNT: usize = 21;

/// Scan state of a single point.
///
/// `Untested -> Accepted` or `Untested -> Rejected`. Rejected is terminal:
/// a point outside the sphere starts no connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PointState {
    #[default]
    Untested,
    Accepted,
    Rejected,
}

impl PointState {
    /// State after a membership test with outcome `inside`.
    #[inline]
    pub fn from_membership(inside: bool) -> Self {
        if inside {
            PointState::Accepted
        } else {
            PointState::Rejected
        }
    }

    #[inline]
    pub fn is_accepted(self) -> bool {
        self == PointState::Accepted
    }
}

fn lexicographic(a: &[f64], b: &[f64]) -> Ordering {
    a.iter()
        .zip(b)
        .map(|(x, y)| x.total_cmp(y))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Tests pairwise connectivity through one trained sphere.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::clustering::ConnectivityAnalyzer;
/// use sphere_cluster_core::dataset::{Dataset, PointId};
/// use sphere_cluster_core::kernel::LinearKernel;
/// use sphere_cluster_core::sphere::{FixedPart, SphereMembership, SphereModel, TrainedSphere};
///
/// let dataset = Dataset::from_vectors(vec![vec![0.0], vec![0.5], vec![5.0]]).unwrap();
/// let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
/// let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &LinearKernel).unwrap();
/// let membership = SphereMembership::new(&LinearKernel, &dataset, &sphere, fixed).unwrap();
/// let analyzer = ConnectivityAnalyzer::new(&membership, 21).unwrap();
///
/// assert!(analyzer.connected(&[0.0], &[0.5]));
/// assert!(!analyzer.connected(&[0.0], &[5.0]));
/// ```
#[derive(Clone, Copy)]
pub struct ConnectivityAnalyzer<'m> {
    membership: &'m SphereMembership<'m>,
    sample_count: usize,
}

impl<'m> ConnectivityAnalyzer<'m> {
    /// # Errors
    ///
    /// Returns `SvcError::InvalidParameter` if `sample_count == 0`.
    pub fn new(membership: &'m SphereMembership<'m>, sample_count: usize) -> SvcResult<Self> {
        if sample_count == 0 {
            return Err(SvcError::invalid_parameter(
                "sample_count must be >= 1; at least the endpoint has to be sampled",
            ));
        }
        Ok(Self {
            membership,
            sample_count,
        })
    }

    #[inline]
    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    #[inline]
    pub fn membership(&self) -> &'m SphereMembership<'m> {
        self.membership
    }

    /// Membership of a single point.
    #[inline]
    pub fn accept(&self, point: &[f64]) -> bool {
        self.membership.accept(point)
    }

    /// Full connectivity test, including both endpoint memberships.
    ///
    /// False whenever either endpoint lies outside the sphere or has the
    /// wrong dimension.
    pub fn connected(&self, p: &[f64], q: &[f64]) -> bool {
        if !self.same_dimension(p, q) {
            return false;
        }
        let (near, far) = Self::canonical(p, q);
        self.membership.accept(near) && self.walk(near, far)
    }

    /// Connectivity of two points whose memberships were already accepted.
    ///
    /// Samples the segment only; the scan uses this with cached point states.
    pub fn segment_inside(&self, p: &[f64], q: &[f64]) -> bool {
        if !self.same_dimension(p, q) {
            return false;
        }
        let (near, far) = Self::canonical(p, q);
        self.walk(near, far)
    }

    fn same_dimension(&self, p: &[f64], q: &[f64]) -> bool {
        let dimension = self.membership.dimension();
        p.len() == dimension && q.len() == dimension
    }

    fn canonical<'v>(p: &'v [f64], q: &'v [f64]) -> (&'v [f64], &'v [f64]) {
        if lexicographic(p, q) == Ordering::Greater {
            (q, p)
        } else {
            (p, q)
        }
    }

    /// Walk back from `far` towards `near`, stopping at the first sample
    /// outside the sphere.
    fn walk(&self, near: &[f64], far: &[f64]) -> bool {
        let n = self.sample_count as f64;
        let step: Vec<f64> = far.iter().zip(near).map(|(f, s)| (f - s) / n).collect();
        let mut sample = far.to_vec();

        for k in 0..self.sample_count {
            let kf = k as f64;
            for ((x, f), d) in sample.iter_mut().zip(far).zip(&step) {
                *x = f - kf * d;
            }
            if !self.membership.accept(&sample) {
                return false;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::{Dataset, PointId};
    use crate::kernel::{Kernel, LinearKernel, RbfKernel};
    use crate::sphere::{FixedPart, SphereModel, TrainedSphere};

    /// Two RBF support vectors at (-2, 0) and (2, 0); the sphere is two
    /// lobes that do not touch at the origin.
    fn two_lobes() -> (Dataset, TrainedSphere) {
        let dataset = Dataset::from_vectors(vec![
            vec![-2.0, 0.0],
            vec![2.0, 0.0],
            vec![-1.8, 0.1],
            vec![1.8, -0.1],
        ])
        .unwrap();
        let sphere = TrainedSphere::new(
            SphereModel::new(vec![PointId(0), PointId(1)], vec![0.5, 0.5]),
            1.0,
        );
        (dataset, sphere)
    }

    #[test]
    fn test_zero_sample_count_rejected() {
        let (dataset, sphere) = two_lobes();
        let kernel = RbfKernel::new(1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &kernel).unwrap();
        let membership = SphereMembership::new(&kernel, &dataset, &sphere, fixed).unwrap();
        assert!(matches!(
            ConnectivityAnalyzer::new(&membership, 0),
            Err(SvcError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_same_lobe_connected_across_lobes_not() {
        let (dataset, sphere) = two_lobes();
        let kernel = RbfKernel::new(1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &kernel).unwrap();
        let membership = SphereMembership::new(&kernel, &dataset, &sphere, fixed).unwrap();
        let analyzer = ConnectivityAnalyzer::new(&membership, DEFAULT_SAMPLE_COUNT).unwrap();

        let left = dataset.vector_at(2);
        let right = dataset.vector_at(3);
        assert!(analyzer.accept(left) && analyzer.accept(right));
        assert!(analyzer.connected(dataset.vector_at(0), left));
        assert!(!analyzer.connected(left, right));
        assert!(!membership.accept(&[0.0, 0.0]), "origin lies between the lobes");
        println!(
            "[PASS] test_same_lobe_connected_across_lobes_not - score(origin)={}",
            membership.score(&[0.0, 0.0])
        );
    }

    #[test]
    fn test_single_sample_only_checks_endpoint() {
        let (dataset, sphere) = two_lobes();
        let kernel = RbfKernel::new(1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &kernel).unwrap();
        let membership = SphereMembership::new(&kernel, &dataset, &sphere, fixed).unwrap();

        let coarse = ConnectivityAnalyzer::new(&membership, 1).unwrap();
        let fine = ConnectivityAnalyzer::new(&membership, DEFAULT_SAMPLE_COUNT).unwrap();
        let (left, right) = (dataset.vector_at(2), dataset.vector_at(3));

        assert!(coarse.connected(left, right), "endpoint-only sampling misses the gap");
        assert!(!fine.connected(left, right));
    }

    #[test]
    fn test_connectivity_is_symmetric() {
        let (dataset, sphere) = two_lobes();
        let kernel = RbfKernel::new(1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &kernel).unwrap();
        let membership = SphereMembership::new(&kernel, &dataset, &sphere, fixed).unwrap();

        for sample_count in [1, 2, 7, DEFAULT_SAMPLE_COUNT] {
            let analyzer = ConnectivityAnalyzer::new(&membership, sample_count).unwrap();
            for (_, p) in dataset.iter() {
                for (_, q) in dataset.iter() {
                    assert_eq!(analyzer.connected(p, q), analyzer.connected(q, p));
                }
            }
        }
    }

    #[test]
    fn test_rejected_point_connects_to_nothing() {
        let dataset = Dataset::from_vectors(vec![vec![0.0], vec![0.5], vec![-0.5], vec![4.0]])
            .unwrap();
        let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &LinearKernel).unwrap();
        let membership = SphereMembership::new(&LinearKernel, &dataset, &sphere, fixed).unwrap();
        let analyzer = ConnectivityAnalyzer::new(&membership, DEFAULT_SAMPLE_COUNT).unwrap();

        let outlier = dataset.vector_at(3);
        assert!(!analyzer.accept(outlier));
        for pos in 0..3 {
            let other = dataset.vector_at(pos);
            assert!(!analyzer.connected(outlier, other));
            assert!(!analyzer.connected(other, outlier));
        }
    }

    #[test]
    fn test_zero_length_segment_degrades_to_membership() {
        let dataset = Dataset::from_vectors(vec![vec![0.0, 0.0], vec![0.3, 0.3]]).unwrap();
        let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &LinearKernel).unwrap();
        let membership = SphereMembership::new(&LinearKernel, &dataset, &sphere, fixed).unwrap();
        let analyzer = ConnectivityAnalyzer::new(&membership, DEFAULT_SAMPLE_COUNT).unwrap();

        let p = dataset.vector_at(1);
        assert!(analyzer.connected(p, p));
        assert!(!analyzer.connected(&[2.0, 0.0], &[2.0, 0.0]));
    }

    #[test]
    fn test_wrong_dimension_never_connects() {
        let dataset = Dataset::from_vectors(vec![vec![1.0, 0.0], vec![0.5, 0.0]]).unwrap();
        let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &LinearKernel).unwrap();
        let membership = SphereMembership::new(&LinearKernel, &dataset, &sphere, fixed).unwrap();
        let analyzer = ConnectivityAnalyzer::new(&membership, DEFAULT_SAMPLE_COUNT).unwrap();

        let center = dataset.vector_at(0);
        assert!(analyzer.connected(center, dataset.vector_at(1)));
        assert!(!analyzer.connected(&[1.0], &[1.0, 0.0, 50.0]));
        assert!(!analyzer.connected(&[1.0], center));
        assert!(!analyzer.connected(center, &[1.0, 0.0, 0.0]));
        assert!(!analyzer.segment_inside(center, &[1.0]));
        assert!(!analyzer.segment_inside(&[1.0, 0.0, 0.0], center));
    }

    /// Kernel counting how often it is evaluated.
    struct CountingKernel {
        inner: LinearKernel,
        calls: std::sync::atomic::AtomicUsize,
    }

    impl Kernel for CountingKernel {
        fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
            self.calls.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            self.inner.similarity(a, b)
        }

        fn name(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_walk_stops_at_first_failure() {
        // Linear ball of radius 1 around 0; segment from 0.5 to 3.0.
        let dataset = Dataset::from_vectors(vec![vec![0.0]]).unwrap();
        let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
        let kernel = CountingKernel {
            inner: LinearKernel,
            calls: std::sync::atomic::AtomicUsize::new(0),
        };
        let fixed = FixedPart::from_kernel(&sphere.model, &dataset, &kernel).unwrap();
        let membership = SphereMembership::new(&kernel, &dataset, &sphere, fixed).unwrap();
        let analyzer = ConnectivityAnalyzer::new(&membership, DEFAULT_SAMPLE_COUNT).unwrap();

        kernel.calls.store(0, std::sync::atomic::Ordering::Relaxed);
        assert!(!analyzer.segment_inside(&[0.5], &[3.0]));
        // One membership test (self + one support vector) at the far endpoint.
        assert_eq!(kernel.calls.load(std::sync::atomic::Ordering::Relaxed), 2);
    }
}
