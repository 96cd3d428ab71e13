//! Sphere Cluster Core Library
//!
//! Support vector clustering: points are grouped by whether the straight
//! path between them, mapped through a kernel, stays inside a previously
//! trained minimal enclosing sphere (SVDD). This finds non-convex clusters
//! of arbitrary shape.
//!
//! # Architecture
//!
//! This crate defines:
//! - Datasets of `(PointId, feature vector)` pairs (`dataset`)
//! - Kernel functions and the cached pairwise kernel matrix (`kernel`)
//! - The consumed sphere model, fixed part and membership test (`sphere`)
//! - Line-sampled connectivity and union-find assembly (`clustering`)
//! - Error types and configuration
//!
//! Training the sphere is not part of this crate; plug a solver in through
//! [`sphere::SphereTrainer`] or pass a [`sphere::TrainedSphere`] directly.
//!
//! # Example
//!
//! ```
//! use sphere_cluster_core::{Dataset, SupportVectorClustering, SvcConfig};
//! use sphere_cluster_core::dataset::PointId;
//! use sphere_cluster_core::kernel::KernelConfig;
//! use sphere_cluster_core::sphere::{SphereModel, TrainedSphere};
//!
//! let dataset = Dataset::from_vectors(vec![vec![0.0], vec![0.5], vec![-0.5]]).unwrap();
//! let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
//!
//! let svc = SupportVectorClustering::new(SvcConfig::default().with_kernel(KernelConfig::Linear))
//!     .unwrap();
//! let clustering = svc.run_with_sphere(&dataset, &sphere).unwrap();
//! assert_eq!(clustering.len(), 1);
//! assert!(clustering.noise().is_none());
//! ```

pub mod clustering;
pub mod config;
pub mod dataset;
pub mod error;
pub mod kernel;
pub mod sphere;

// Re-exports for convenience
pub use clustering::{Cluster, Clustering, SupportVectorClustering};
pub use config::SvcConfig;
pub use dataset::{Dataset, PointId};
pub use error::{SvcError, SvcResult};
pub use kernel::{Kernel, KernelMatrix};
