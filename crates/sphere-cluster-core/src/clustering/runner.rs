//! End-to-end support vector clustering run.
//!
//! # Phases
//!
//! 1. Kernel matrix over the full dataset
//! 2. Sphere training (external trainer) or a supplied sphere
//! 3. Validation: fails fast on an untrained sphere before any scan work
//! 4. Fixed part, computed once from the matrix
//! 5. Connectivity scan and union-find assembly
//!
//! Nothing is visible to the caller until the final [`Clustering`] is built.
//! An empty dataset partitions into an empty clustering without training.

use std::time::Instant;

use tracing::{debug, info, instrument, warn};

use crate::config::SvcConfig;
use crate::dataset::Dataset;
use crate::error::SvcResult;
use crate::kernel::{Kernel, KernelMatrix};
use crate::sphere::{FixedPart, SphereMembership, SphereTrainer, TrainedSphere};

use super::assembler::ClusterAssembler;
use super::cluster::{Clustering, ScanStats};
use super::connectivity::ConnectivityAnalyzer;

/// Support vector clustering driver.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::clustering::SupportVectorClustering;
/// use sphere_cluster_core::config::SvcConfig;
/// use sphere_cluster_core::dataset::{Dataset, PointId};
/// use sphere_cluster_core::kernel::KernelConfig;
/// use sphere_cluster_core::sphere::{SphereModel, TrainedSphere};
///
/// let config = SvcConfig::default().with_kernel(KernelConfig::Linear);
/// let svc = SupportVectorClustering::new(config).unwrap();
///
/// let dataset = Dataset::from_vectors(vec![
///     vec![0.0, 0.0],
///     vec![0.5, 0.0],
///     vec![0.0, 0.5],
///     vec![4.0, 4.0],
/// ]).unwrap();
/// // Linear kernel, one unit support vector: a ball of radius 1 at the origin.
/// let sphere = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), 1.0);
///
/// let clustering = svc.run_with_sphere(&dataset, &sphere).unwrap();
/// assert_eq!(clustering.significant().count(), 1);
/// assert_eq!(clustering.noise().unwrap().members, vec![PointId(3)]);
/// ```
pub struct SupportVectorClustering {
    config: SvcConfig,
    kernel: Box<dyn Kernel>,
}

impl SupportVectorClustering {
    /// Create a driver using the kernel named in `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if `config` fails validation.
    pub fn new(config: SvcConfig) -> SvcResult<Self> {
        config.validate()?;
        let kernel = config.kernel.build()?;
        Ok(Self { config, kernel })
    }

    /// Create a driver with a caller-supplied kernel.
    ///
    /// `config.kernel` is ignored.
    pub fn with_kernel(config: SvcConfig, kernel: Box<dyn Kernel>) -> SvcResult<Self> {
        config.validate()?;
        Ok(Self { config, kernel })
    }

    pub fn with_defaults() -> SvcResult<Self> {
        Self::new(SvcConfig::default())
    }

    pub fn config(&self) -> &SvcConfig {
        &self.config
    }

    pub fn kernel(&self) -> &dyn Kernel {
        self.kernel.as_ref()
    }

    /// Build the kernel matrix for `dataset` with the configured kernel.
    pub fn kernel_matrix(&self, dataset: &Dataset) -> KernelMatrix {
        KernelMatrix::build(dataset, self.kernel(), self.config.parallel.kernel_matrix)
    }

    /// Train a sphere with `trainer` and cluster `dataset`.
    ///
    /// # Errors
    ///
    /// - Any error returned by the trainer
    /// - `SvcError::UntrainedModel` if the trained radius is not usable
    /// - `SvcError::InconsistentSize` / `SvcError::UnknownPoint` for a
    ///   sphere that does not match the dataset
    #[instrument(skip_all, fields(points = dataset.len(), kernel = self.kernel.name()))]
    pub fn run(&self, dataset: &Dataset, trainer: &dyn SphereTrainer) -> SvcResult<Clustering> {
        if dataset.is_empty() {
            return Ok(empty_clustering());
        }
        let matrix = self.kernel_matrix(dataset);

        let start = Instant::now();
        let sphere = trainer.train(dataset, self.kernel(), &matrix, self.config.cost)?;
        debug!(
            support_vectors = sphere.model.support_count(),
            r_squared = sphere.r_squared,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "sphere trained"
        );

        self.cluster(dataset, &matrix, &sphere)
    }

    /// Cluster `dataset` with a sphere trained elsewhere.
    ///
    /// # Errors
    ///
    /// Same as [`run`](Self::run), minus trainer errors. An unusable radius
    /// is reported even for an empty dataset.
    #[instrument(skip_all, fields(points = dataset.len(), kernel = self.kernel.name()))]
    pub fn run_with_sphere(
        &self,
        dataset: &Dataset,
        sphere: &TrainedSphere,
    ) -> SvcResult<Clustering> {
        sphere.check_radius()?;
        if dataset.is_empty() {
            return Ok(empty_clustering());
        }
        let matrix = self.kernel_matrix(dataset);
        self.cluster(dataset, &matrix, sphere)
    }

    fn cluster(
        &self,
        dataset: &Dataset,
        matrix: &KernelMatrix,
        sphere: &TrainedSphere,
    ) -> SvcResult<Clustering> {
        sphere.validate(dataset)?;
        if sphere.model.support_indices.is_empty() {
            warn!("trained sphere has no support vectors; center collapses to the origin");
        }

        let fixed_part = FixedPart::from_matrix(&sphere.model, matrix)?;
        debug!(fixed_part = fixed_part.value(), "fixed part computed");

        let membership = SphereMembership::new(self.kernel(), dataset, sphere, fixed_part)?;
        let analyzer = ConnectivityAnalyzer::new(&membership, self.config.sample_count)?;
        let assembler = if self.config.parallel.connectivity {
            ClusterAssembler::parallel()
        } else {
            ClusterAssembler::new()
        };

        let clustering = assembler.assemble(dataset, &analyzer);

        info!(
            points = dataset.len(),
            support_vectors = sphere.model.support_count(),
            clusters = clustering.significant().count(),
            noise = clustering.noise().map_or(0, |c| c.len()),
            "support vector clustering finished"
        );
        Ok(clustering)
    }
}

fn empty_clustering() -> Clustering {
    debug!("empty dataset; nothing to cluster");
    Clustering::new(Vec::new(), ScanStats::default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::PointId;
    use crate::error::SvcError;
    use crate::kernel::{KernelConfig, LinearKernel};
    use crate::sphere::{PrecomputedSphere, SphereModel};

    struct FailingTrainer;

    impl SphereTrainer for FailingTrainer {
        fn train(
            &self,
            _dataset: &Dataset,
            _kernel: &dyn Kernel,
            _matrix: &KernelMatrix,
            _cost: f64,
        ) -> SvcResult<TrainedSphere> {
            Err(SvcError::Training("did not converge".into()))
        }
    }

    fn line() -> Dataset {
        Dataset::from_vectors(vec![vec![0.0], vec![0.25], vec![0.5], vec![-0.5], vec![9.0]])
            .unwrap()
    }

    fn unit_ball(r_squared: f64) -> TrainedSphere {
        TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![1.0]), r_squared)
    }

    fn linear_svc() -> SupportVectorClustering {
        SupportVectorClustering::new(SvcConfig::default().with_kernel(KernelConfig::Linear))
            .unwrap()
    }

    #[test]
    fn test_run_with_precomputed_trainer() {
        let svc = linear_svc();
        let clustering = svc
            .run(&line(), &PrecomputedSphere(unit_ball(1.0)))
            .expect("run");

        assert_eq!(clustering.len(), 2);
        assert_eq!(
            clustering.clusters()[0].members,
            vec![PointId(0), PointId(1), PointId(2), PointId(3)]
        );
        assert_eq!(clustering.noise().unwrap().members, vec![PointId(4)]);
    }

    #[test]
    fn test_untrained_sphere_aborts() {
        let svc = linear_svc();
        let result = svc.run(&line(), &PrecomputedSphere(unit_ball(f64::NAN)));
        assert!(matches!(result, Err(SvcError::UntrainedModel { .. })));

        let result = svc.run_with_sphere(&line(), &unit_ball(f64::NAN));
        assert!(matches!(result, Err(SvcError::UntrainedModel { .. })));
    }

    #[test]
    fn test_trainer_error_is_surfaced() {
        let result = linear_svc().run(&line(), &FailingTrainer);
        match result {
            Err(SvcError::Training(message)) => assert!(message.contains("converge")),
            other => panic!("expected Training error, got {:?}", other.map(|c| c.len())),
        }
    }

    #[test]
    fn test_custom_kernel_overrides_config() {
        let svc = SupportVectorClustering::with_kernel(
            SvcConfig::default(),
            Box::new(LinearKernel),
        )
        .unwrap();
        assert_eq!(svc.kernel().name(), "linear");
    }

    #[test]
    fn test_empty_dataset_gives_empty_clustering() {
        let empty = Dataset::new(Vec::new()).unwrap();
        let svc = linear_svc();

        let clustering = svc.run(&empty, &FailingTrainer).expect("trainer is not consulted");
        assert!(clustering.is_empty());
        assert_eq!(clustering.total_points(), 0);
        assert!(clustering.noise().is_none());

        let sphere = TrainedSphere::new(SphereModel::new(Vec::new(), Vec::new()), 0.0);
        let clustering = svc.run_with_sphere(&empty, &sphere).expect("run");
        assert!(clustering.is_empty());

        let result = svc.run_with_sphere(&empty, &unit_ball(f64::NAN));
        assert!(matches!(result, Err(SvcError::UntrainedModel { .. })));
    }

    #[test]
    fn test_run_with_sphere_reports_invalid_spheres() {
        let svc = linear_svc();
        let unknown = TrainedSphere::new(SphereModel::new(vec![PointId(42)], vec![1.0]), 1.0);
        assert!(matches!(
            svc.run_with_sphere(&line(), &unknown),
            Err(SvcError::UnknownPoint { id: PointId(42) })
        ));

        let lopsided = TrainedSphere::new(SphereModel::new(vec![PointId(0)], vec![0.5, 0.5]), 1.0);
        assert!(matches!(
            svc.run_with_sphere(&line(), &lopsided),
            Err(SvcError::InconsistentSize { .. })
        ));
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = SupportVectorClustering::new(SvcConfig::default().with_sample_count(0));
        assert!(matches!(result, Err(SvcError::InvalidParameter { .. })));
    }
}
