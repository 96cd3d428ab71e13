//! Cluster result types.

use serde::{Deserialize, Serialize};

use crate::dataset::PointId;

/// Cluster ID of the shared noise cluster.
pub const NOISE_CLUSTER_ID: i32 = -1;

/// A set of points plus a noise flag.
///
/// Significant clusters have ids `0, 1, 2, ...`; the noise cluster, which
/// gathers every point left in a singleton group, has id -1.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::clustering::Cluster;
/// use sphere_cluster_core::dataset::PointId;
///
/// let cluster = Cluster::new(0, vec![PointId(3), PointId(4)]);
/// assert!(!cluster.is_noise());
/// assert!(cluster.contains(PointId(4)));
///
/// let noise = Cluster::noise(vec![PointId(9)]);
/// assert!(noise.is_noise());
/// assert_eq!(noise.id, -1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster {
    /// Cluster identifier (-1 = noise).
    pub id: i32,

    /// Member point ids, in dataset order.
    pub members: Vec<PointId>,

    /// Whether this is the aggregated noise cluster.
    pub noise: bool,
}

impl Cluster {
    /// Create a significant cluster.
    pub fn new(id: i32, members: Vec<PointId>) -> Self {
        Self {
            id,
            members,
            noise: false,
        }
    }

    /// Create the noise cluster.
    pub fn noise(members: Vec<PointId>) -> Self {
        Self {
            id: NOISE_CLUSTER_ID,
            members,
            noise: true,
        }
    }

    #[inline]
    pub fn is_noise(&self) -> bool {
        self.noise
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn contains(&self, id: PointId) -> bool {
        self.members.contains(&id)
    }
}

/// Counters collected during one connectivity scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Points in the dataset.
    pub points: usize,
    /// Points whose membership test was evaluated and passed.
    pub accepted: usize,
    /// Points whose membership test was evaluated and failed.
    pub rejected: usize,
    /// Segment tests performed.
    pub pair_tests: usize,
    /// Pairs skipped because both points already shared a root.
    pub pairs_pruned: usize,
    /// Successful unions.
    pub unions: usize,
}

/// Final partition of a dataset.
///
/// Every point belongs to exactly one cluster. Significant clusters come
/// first, ordered by their first member in dataset order; the noise
/// cluster, when non-empty, comes last.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clustering {
    clusters: Vec<Cluster>,
    stats: ScanStats,
}

impl Clustering {
    pub fn new(clusters: Vec<Cluster>, stats: ScanStats) -> Self {
        Self { clusters, stats }
    }

    /// All clusters, noise last.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    pub fn into_clusters(self) -> Vec<Cluster> {
        self.clusters
    }

    /// Clusters excluding noise.
    pub fn significant(&self) -> impl Iterator<Item = &Cluster> + '_ {
        self.clusters.iter().filter(|c| !c.is_noise())
    }

    /// The noise cluster, if any point ended in a singleton group.
    pub fn noise(&self) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.is_noise())
    }

    /// Cluster containing `id`.
    pub fn cluster_of(&self, id: PointId) -> Option<&Cluster> {
        self.clusters.iter().find(|c| c.contains(id))
    }

    /// Number of clusters, noise included.
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Total number of assigned points.
    pub fn total_points(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }
}
