//! Union-find cluster assembly.
//!
//! Scans every unordered pair of points in dataset order, unions the pairs
//! the [`ConnectivityAnalyzer`] reports as connected, then groups points by
//! root. Groups with more than one member become clusters; every singleton
//! is collected into one shared noise cluster.
//!
//! # Pruning
//!
//! - A point is tested for membership at most once. A rejected point takes
//!   part in no further pair tests.
//! - A pair already sharing a root is skipped without sampling.
//! - A segment walk stops at the first sample outside the sphere.
//!
//! # Parallel mode
//!
//! Point memberships are evaluated in parallel up front. The pair scan then
//! proceeds row by row: for row `i`, the candidate partners `j > i` not yet
//! sharing a root with `i` are tested in parallel into a list, and the
//! unions are applied sequentially in partner order. Skipping already-joined
//! pairs never changes the final components, so both modes produce the same
//! partition and the same output order.

use std::collections::HashMap;
use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::dataset::{Dataset, PointId};

use super::cluster::{Cluster, Clustering, ScanStats};
use super::connectivity::{ConnectivityAnalyzer, PointState};
use super::union_find::DisjointSetForest;

/// Builds the final partition from pairwise connectivity.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClusterAssembler {
    parallel: bool,
}

impl ClusterAssembler {
    /// Sequential assembler.
    pub fn new() -> Self {
        Self { parallel: false }
    }

    /// Assembler running the scan in parallel row batches.
    pub fn parallel() -> Self {
        Self { parallel: true }
    }

    #[inline]
    pub fn is_parallel(&self) -> bool {
        self.parallel
    }

    /// Partition `dataset` by connectivity.
    pub fn assemble(&self, dataset: &Dataset, analyzer: &ConnectivityAnalyzer<'_>) -> Clustering {
        let start = Instant::now();
        let n = dataset.len();
        let mut forest = DisjointSetForest::new(n);
        let mut stats = ScanStats {
            points: n,
            ..ScanStats::default()
        };

        if self.parallel {
            scan_parallel(dataset, analyzer, &mut forest, &mut stats);
        } else {
            scan_sequential(dataset, analyzer, &mut forest, &mut stats);
        }

        debug!(
            points = n,
            accepted = stats.accepted,
            rejected = stats.rejected,
            pair_tests = stats.pair_tests,
            pairs_pruned = stats.pairs_pruned,
            unions = stats.unions,
            parallel = self.parallel,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "connectivity scan finished"
        );

        let clusters = group_by_root(dataset.ids(), &mut forest);
        Clustering::new(clusters, stats)
    }
}

/// Lazily evaluated per-point membership.
struct PointStates<'a, 'm> {
    dataset: &'a Dataset,
    analyzer: &'a ConnectivityAnalyzer<'m>,
    states: Vec<PointState>,
}

impl<'a, 'm> PointStates<'a, 'm> {
    fn new(dataset: &'a Dataset, analyzer: &'a ConnectivityAnalyzer<'m>) -> Self {
        Self {
            dataset,
            analyzer,
            states: vec![PointState::Untested; dataset.len()],
        }
    }

    fn accepted(&mut self, pos: usize, stats: &mut ScanStats) -> bool {
        if self.states[pos] == PointState::Untested {
            let inside = self.analyzer.accept(self.dataset.vector_at(pos));
            self.states[pos] = PointState::from_membership(inside);
            if inside {
                stats.accepted += 1;
            } else {
                stats.rejected += 1;
            }
        }
        self.states[pos].is_accepted()
    }
}

fn scan_sequential(
    dataset: &Dataset,
    analyzer: &ConnectivityAnalyzer<'_>,
    forest: &mut DisjointSetForest,
    stats: &mut ScanStats,
) {
    let n = dataset.len();
    let mut states = PointStates::new(dataset, analyzer);

    for i in 0..n {
        if !states.accepted(i, stats) {
            continue;
        }
        for j in (i + 1)..n {
            if forest.same_set(i, j) {
                stats.pairs_pruned += 1;
                continue;
            }
            if !states.accepted(j, stats) {
                continue;
            }
            stats.pair_tests += 1;
            if analyzer.segment_inside(dataset.vector_at(i), dataset.vector_at(j))
                && forest.union(i, j)
            {
                stats.unions += 1;
            }
        }
    }
}

fn scan_parallel(
    dataset: &Dataset,
    analyzer: &ConnectivityAnalyzer<'_>,
    forest: &mut DisjointSetForest,
    stats: &mut ScanStats,
) {
    let n = dataset.len();
    let states: Vec<PointState> = (0..n)
        .into_par_iter()
        .map(|pos| PointState::from_membership(analyzer.accept(dataset.vector_at(pos))))
        .collect();
    stats.accepted = states.iter().filter(|s| s.is_accepted()).count();
    stats.rejected = n - stats.accepted;

    for i in 0..n {
        if !states[i].is_accepted() {
            continue;
        }

        let mut candidates = Vec::new();
        for j in (i + 1)..n {
            if forest.same_set(i, j) {
                stats.pairs_pruned += 1;
            } else if states[j].is_accepted() {
                candidates.push(j);
            }
        }
        stats.pair_tests += candidates.len();

        let p = dataset.vector_at(i);
        let connected: Vec<usize> = candidates
            .into_par_iter()
            .filter(|&j| analyzer.segment_inside(p, dataset.vector_at(j)))
            .collect();

        for j in connected {
            if forest.union(i, j) {
                stats.unions += 1;
            }
        }
    }
}

/// Group positions by root; singletons go to the shared noise cluster.
fn group_by_root(ids: &[PointId], forest: &mut DisjointSetForest) -> Vec<Cluster> {
    let mut group_of_root: HashMap<usize, usize> = HashMap::new();
    let mut groups: Vec<Vec<PointId>> = Vec::new();

    for (pos, &id) in ids.iter().enumerate() {
        let root = forest.find(pos);
        let group = *group_of_root.entry(root).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[group].push(id);
    }

    let mut clusters = Vec::new();
    let mut noise = Vec::new();
    for members in groups {
        if members.len() > 1 {
            clusters.push(Cluster::new(clusters.len() as i32, members));
        } else {
            noise.extend(members);
        }
    }

    // Groups open in dataset order of their first member, so singleton
    // members are already in dataset order.
    if !noise.is_empty() {
        clusters.push(Cluster::noise(noise));
    }
    clusters
}
