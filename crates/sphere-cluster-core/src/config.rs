//! Configuration for sphere-cluster runs.

use serde::{Deserialize, Serialize};

use crate::clustering::DEFAULT_SAMPLE_COUNT;
use crate::error::{SvcError, SvcResult};
use crate::kernel::KernelConfig;

/// Default SVDD cost parameter `C`.
pub const DEFAULT_COST: f64 = 0.05;

/// Optional parallel phases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ParallelConfig {
    /// Compute kernel-matrix rows in parallel.
    #[serde(default)]
    pub kernel_matrix: bool,
    /// Test connectivity candidates in parallel row batches.
    #[serde(default)]
    pub connectivity: bool,
}

impl ParallelConfig {
    /// Both phases parallel.
    pub fn all() -> Self {
        Self {
            kernel_matrix: true,
            connectivity: true,
        }
    }
}

/// Main configuration structure.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SvcConfig {
    /// Kernel used for the matrix, training and membership.
    #[serde(default)]
    pub kernel: KernelConfig,

    /// SVDD cost parameter `C`, forwarded to the trainer.
    #[serde(default = "default_cost")]
    pub cost: f64,

    /// Samples per connectivity segment.
    #[serde(default = "default_sample_count")]
    pub sample_count: usize,

    #[serde(default)]
    pub parallel: ParallelConfig,
}

fn default_cost() -> f64 {
    DEFAULT_COST
}

fn default_sample_count() -> usize {
    DEFAULT_SAMPLE_COUNT
}

impl Default for SvcConfig {
    fn default() -> Self {
        Self {
            kernel: KernelConfig::default(),
            cost: DEFAULT_COST,
            sample_count: DEFAULT_SAMPLE_COUNT,
            parallel: ParallelConfig::default(),
        }
    }
}

impl SvcConfig {
    /// Load configuration from files and environment.
    ///
    /// Configuration is loaded in order:
    /// 1. config/default.toml (base settings)
    /// 2. config/{SPHERE_CLUSTER_ENV}.toml (environment-specific)
    /// 3. Environment variables with SPHERE_CLUSTER_ prefix
    pub fn load() -> SvcResult<Self> {
        let env =
            std::env::var("SPHERE_CLUSTER_ENV").unwrap_or_else(|_| "development".to_string());

        let builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{}", env)).required(false))
            .add_source(config::Environment::with_prefix("SPHERE_CLUSTER").separator("__"));

        let config: SvcConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> SvcResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            SvcError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;

        let config: SvcConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> SvcResult<()> {
        self.kernel.validate()?;

        if !(self.cost.is_finite() && self.cost > 0.0) {
            return Err(SvcError::invalid_parameter(format!(
                "cost must be > 0 and finite, got {}",
                self.cost
            )));
        }

        if self.sample_count == 0 {
            return Err(SvcError::invalid_parameter(
                "sample_count must be >= 1; at least the endpoint has to be sampled",
            ));
        }

        Ok(())
    }

    #[must_use]
    pub fn with_kernel(mut self, kernel: KernelConfig) -> Self {
        self.kernel = kernel;
        self
    }

    #[must_use]
    pub fn with_cost(mut self, cost: f64) -> Self {
        self.cost = cost;
        self
    }

    #[must_use]
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    #[must_use]
    pub fn with_parallel(mut self, parallel: ParallelConfig) -> Self {
        self.parallel = parallel;
        self
    }
}
