//! Deterministic datasets and matching trained spheres.
//!
//! The spheres are written down analytically for an RBF kernel with
//! `gamma = 1`. With support vectors `s_j` and coefficients `c_j` the
//! membership score of `x` is `1 - 2 * sum_j c_j k(x, s_j) + fixed_part`.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use sphere_cluster_core::dataset::{Dataset, PointId};
use sphere_cluster_core::kernel::RbfKernel;
use sphere_cluster_core::sphere::{SphereModel, TrainedSphere};

/// RBF width used by every fixture sphere.
pub const FIXTURE_GAMMA: f64 = 1.0;

/// The kernel every fixture sphere was written for.
pub fn fixture_kernel() -> RbfKernel {
    RbfKernel::new(FIXTURE_GAMMA)
}

fn dataset_from(points: &[[f64; 2]]) -> Dataset {
    Dataset::from_vectors(points.iter().map(|p| p.to_vec()).collect())
        .expect("fixture points are valid")
}

/// Four points around (-2, 0); the first is the center itself.
pub const LEFT_BLOB: [[f64; 2]; 4] = [[-2.0, 0.0], [-2.2, 0.0], [-1.8, 0.1], [-2.0, -0.2]];

/// [`LEFT_BLOB`] mirrored through the origin.
pub const RIGHT_BLOB: [[f64; 2]; 4] = [[2.0, 0.0], [2.2, 0.0], [1.8, -0.1], [2.0, 0.2]];

/// Five colinear points from (0, 0) to (1, 0).
///
/// Ids 0..5; id 2 is the midpoint (0.5, 0).
pub fn colinear_dataset() -> Dataset {
    dataset_from(&[[0.0, 0.0], [0.25, 0.0], [0.5, 0.0], [0.75, 0.0], [1.0, 0.0]])
}

/// Sphere centered on the midpoint of [`colinear_dataset`].
///
/// Scores along the segment stay below 0.45; r² = 0.5.
pub fn colinear_sphere() -> TrainedSphere {
    TrainedSphere::new(SphereModel::new(vec![PointId(2)], vec![1.0]), 0.5)
}

/// [`LEFT_BLOB`] as ids 0..4, [`RIGHT_BLOB`] as ids 4..8.
pub fn two_blob_dataset() -> Dataset {
    let points: Vec<[f64; 2]> = LEFT_BLOB.iter().chain(RIGHT_BLOB.iter()).copied().collect();
    dataset_from(&points)
}

/// Two-lobe sphere with support vectors at both blob centers.
///
/// Blob points score at most 0.55; the region around the origin scores
/// about 1.46; r² = 1.0.
pub fn two_blob_sphere() -> TrainedSphere {
    TrainedSphere::new(
        SphereModel::new(vec![PointId(0), PointId(4)], vec![0.5, 0.5]),
        1.0,
    )
}

/// [`LEFT_BLOB`] as ids 0..4 plus an outlier at (5, 5) with id 4.
pub fn blob_with_outlier_dataset() -> Dataset {
    let mut points = LEFT_BLOB.to_vec();
    points.push([5.0, 5.0]);
    dataset_from(&points)
}

/// Sphere around the left blob center; the outlier scores 2.0, r² = 0.5.
pub fn blob_with_outlier_sphere() -> TrainedSphere {
    TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 0.5)
}

/// Number of points on the ring of [`ring_dataset`].
pub const RING_POINTS: usize = 16;

/// Sixteen points on a circle of radius 2 (ids 0..16), the circle center
/// (id 16) and a far outlier at (6, 6) (id 17).
pub fn ring_dataset() -> Dataset {
    let mut points: Vec<[f64; 2]> = (0..RING_POINTS)
        .map(|i| {
            let angle = 2.0 * std::f64::consts::PI * i as f64 / RING_POINTS as f64;
            [2.0 * angle.cos(), 2.0 * angle.sin()]
        })
        .collect();
    points.push([0.0, 0.0]);
    points.push([6.0, 6.0]);
    dataset_from(&points)
}

/// Annulus-shaped sphere: every ring point is a support vector with equal
/// weight.
///
/// Ring points and the arcs between neighbours score about 0.857, the
/// circle center about 1.107; r² = 0.95.
pub fn ring_sphere() -> TrainedSphere {
    let support = (0..RING_POINTS as u64).map(PointId).collect();
    let coefficients = vec![1.0 / RING_POINTS as f64; RING_POINTS];
    TrainedSphere::new(SphereModel::new(support, coefficients), 0.95)
}

/// `per_blob` points scattered uniformly within `spread` of each center.
///
/// Ids run `0..centers.len() * per_blob`, blob by blob; the first point of
/// each blob is the center itself.
pub fn scattered_blobs(centers: &[[f64; 2]], per_blob: usize, spread: f64, seed: u64) -> Dataset {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut points = Vec::with_capacity(centers.len() * per_blob);
    for center in centers {
        for k in 0..per_blob {
            if k == 0 {
                points.push(*center);
                continue;
            }
            points.push([
                center[0] + rng.gen_range(-spread..spread),
                center[1] + rng.gen_range(-spread..spread),
            ]);
        }
    }
    dataset_from(&points)
}

/// Sphere whose support vectors are the centers of [`scattered_blobs`].
pub fn scattered_blobs_sphere(blob_count: usize, per_blob: usize, r_squared: f64) -> TrainedSphere {
    let support = (0..blob_count)
        .map(|b| PointId((b * per_blob) as u64))
        .collect();
    let coefficients = vec![1.0 / blob_count as f64; blob_count];
    TrainedSphere::new(SphereModel::new(support, coefficients), r_squared)
}
