//! Connectivity analysis and cluster assembly.
//!
//! Given a trained enclosing sphere, two points belong to the same cluster
//! when the input-space segment between them stays inside the sphere at
//! every sample. Connected pairs are merged in a disjoint-set forest; groups
//! of one are reported together as noise.
//!
//! # Components
//!
//! - [`ConnectivityAnalyzer`]: line-sampled pair test
//! - [`DisjointSetForest`]: union-find over dataset positions
//! - [`ClusterAssembler`]: the O(n²) pair scan with pruning, sequential or parallel
//! - [`SupportVectorClustering`]: end-to-end driver
//! - [`Cluster`] / [`Clustering`]: the resulting partition

mod assembler;
mod cluster;
mod connectivity;
mod runner;
mod union_find;

pub use assembler::ClusterAssembler;
pub use cluster::{Cluster, Clustering, ScanStats, NOISE_CLUSTER_ID};
pub use connectivity::{ConnectivityAnalyzer, PointState, DEFAULT_SAMPLE_COUNT};
pub use runner::SupportVectorClustering;
pub use union_find::DisjointSetForest;
