//! Kernel similarity functions and the cached pairwise kernel matrix.
//!
//! All geometry in the implicit feature space is expressed through a single
//! capability, [`Kernel::similarity`]. A concrete kernel is chosen once, at
//! construction time, from a [`KernelConfig`].

mod functions;
mod matrix;
mod offsets;

use serde::{Deserialize, Serialize};

use crate::error::{SvcError, SvcResult};

pub use functions::{LinearKernel, PolynomialKernel, RbfKernel, SigmoidKernel};
pub use matrix::{center_values, KernelMatrix};
pub use offsets::IdOffsets;

/// Kernel similarity `k(a, b)`.
///
/// Implementations must be pure, symmetric (`k(a,b) == k(b,a)`) and
/// deterministic for fixed arguments. Both slices have the same length.
pub trait Kernel: Send + Sync {
    /// Compute `k(a, b)`.
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64;

    /// Short human-readable name, used in logs.
    fn name(&self) -> &'static str;
}

impl<K: Kernel + ?Sized> Kernel for &K {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        (**self).similarity(a, b)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

impl<K: Kernel + ?Sized> Kernel for Box<K> {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        (**self).similarity(a, b)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// Serializable kernel selection.
///
/// # Example
///
/// ```
/// use sphere_cluster_core::kernel::KernelConfig;
///
/// let kernel = KernelConfig::Rbf { gamma: 0.5 }.build().unwrap();
/// assert_eq!(kernel.name(), "rbf");
/// assert!((kernel.similarity(&[1.0, 2.0], &[1.0, 2.0]) - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum KernelConfig {
    /// `a · b`
    Linear,
    /// `(a · b + bias)^degree`
    Polynomial { degree: u32, bias: f64 },
    /// `exp(-gamma * |a - b|^2)`
    Rbf { gamma: f64 },
    /// `tanh(gamma * a · b + coef0)`
    Sigmoid { gamma: f64, coef0: f64 },
}

impl Default for KernelConfig {
    fn default() -> Self {
        KernelConfig::Rbf { gamma: 1.0 }
    }
}

impl KernelConfig {
    /// Validate kernel parameters.
    ///
    /// # Errors
    ///
    /// Returns `SvcError::InvalidParameter` for non-finite parameters,
    /// a zero polynomial degree or a non-positive RBF gamma.
    pub fn validate(&self) -> SvcResult<()> {
        match *self {
            KernelConfig::Linear => Ok(()),
            KernelConfig::Polynomial { degree, bias } => {
                if degree == 0 {
                    return Err(SvcError::invalid_parameter(
                        "polynomial kernel degree must be >= 1",
                    ));
                }
                if !bias.is_finite() {
                    return Err(SvcError::invalid_parameter(format!(
                        "polynomial kernel bias must be finite, got {}",
                        bias
                    )));
                }
                Ok(())
            }
            KernelConfig::Rbf { gamma } => {
                if !(gamma.is_finite() && gamma > 0.0) {
                    return Err(SvcError::invalid_parameter(format!(
                        "rbf kernel gamma must be > 0 and finite, got {}",
                        gamma
                    )));
                }
                Ok(())
            }
            KernelConfig::Sigmoid { gamma, coef0 } => {
                if !gamma.is_finite() || !coef0.is_finite() {
                    return Err(SvcError::invalid_parameter(format!(
                        "sigmoid kernel parameters must be finite, got gamma={} coef0={}",
                        gamma, coef0
                    )));
                }
                Ok(())
            }
        }
    }

    /// Validate and instantiate the configured kernel.
    pub fn build(&self) -> SvcResult<Box<dyn Kernel>> {
        self.validate()?;
        Ok(match *self {
            KernelConfig::Linear => Box::new(LinearKernel),
            KernelConfig::Polynomial { degree, bias } => {
                Box::new(PolynomialKernel::new(degree, bias))
            }
            KernelConfig::Rbf { gamma } => Box::new(RbfKernel::new(gamma)),
            KernelConfig::Sigmoid { gamma, coef0 } => Box::new(SigmoidKernel::new(gamma, coef0)),
        })
    }
}
