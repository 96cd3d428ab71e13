//! Standard kernel functions.

use super::Kernel;

#[inline]
fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

#[inline]
fn squared_euclidean(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Linear kernel, `k(a, b) = a · b`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearKernel;

impl Kernel for LinearKernel {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        dot(a, b)
    }

    fn name(&self) -> &'static str {
        "linear"
    }
}

/// Polynomial kernel, `k(a, b) = (a · b + bias)^degree`.
#[derive(Debug, Clone, Copy)]
pub struct PolynomialKernel {
    degree: u32,
    bias: f64,
}

impl PolynomialKernel {
    pub fn new(degree: u32, bias: f64) -> Self {
        Self { degree, bias }
    }
}

impl Kernel for PolynomialKernel {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        // powi takes i32; degrees beyond that are meaningless anyway
        (dot(a, b) + self.bias).powi(self.degree.min(i32::MAX as u32) as i32)
    }

    fn name(&self) -> &'static str {
        "polynomial"
    }
}

/// Gaussian radial basis function kernel, `k(a, b) = exp(-gamma * |a - b|^2)`.
///
/// `k(a, a) == 1` for every `a`, which makes the self-similarity term of
/// the membership test constant.
#[derive(Debug, Clone, Copy)]
pub struct RbfKernel {
    gamma: f64,
}

impl RbfKernel {
    pub fn new(gamma: f64) -> Self {
        Self { gamma }
    }

    pub fn gamma(&self) -> f64 {
        self.gamma
    }
}

impl Kernel for RbfKernel {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        (-self.gamma * squared_euclidean(a, b)).exp()
    }

    fn name(&self) -> &'static str {
        "rbf"
    }
}

/// Sigmoid kernel, `k(a, b) = tanh(gamma * a · b + coef0)`.
///
/// Not positive semi-definite in general.
#[derive(Debug, Clone, Copy)]
pub struct SigmoidKernel {
    gamma: f64,
    coef0: f64,
}

impl SigmoidKernel {
    pub fn new(gamma: f64, coef0: f64) -> Self {
        Self { gamma, coef0 }
    }
}

impl Kernel for SigmoidKernel {
    fn similarity(&self, a: &[f64], b: &[f64]) -> f64 {
        (self.gamma * dot(a, b) + self.coef0).tanh()
    }

    fn name(&self) -> &'static str {
        "sigmoid"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: [f64; 3] = [1.0, 2.0, 3.0];
    const B: [f64; 3] = [-1.0, 0.5, 2.0];

    #[test]
    fn test_linear_kernel() {
        assert_eq!(LinearKernel.similarity(&A, &B), -1.0 + 1.0 + 6.0);
    }

    #[test]
    fn test_polynomial_kernel() {
        let k = PolynomialKernel::new(2, 1.0);
        assert_eq!(k.similarity(&A, &B), 49.0);
    }

    #[test]
    fn test_rbf_kernel() {
        let k = RbfKernel::new(0.5);
        // |A - B|^2 = 4 + 2.25 + 1 = 7.25
        let expected = (-0.5f64 * 7.25).exp();
        assert!((k.similarity(&A, &B) - expected).abs() < 1e-15);
        assert_eq!(k.similarity(&A, &A), 1.0);
    }

    #[test]
    fn test_sigmoid_kernel() {
        let k = SigmoidKernel::new(0.1, -0.2);
        let expected = (0.1f64 * 6.0 - 0.2).tanh();
        assert!((k.similarity(&A, &B) - expected).abs() < 1e-15);
    }

    #[test]
    fn test_kernels_are_symmetric() {
        let kernels: Vec<Box<dyn Kernel>> = vec![
            Box::new(LinearKernel),
            Box::new(PolynomialKernel::new(3, 0.5)),
            Box::new(RbfKernel::new(2.0)),
            Box::new(SigmoidKernel::new(0.3, 0.1)),
        ];
        for k in &kernels {
            assert_eq!(
                k.similarity(&A, &B),
                k.similarity(&B, &A),
                "{} kernel must be symmetric",
                k.name()
            );
        }
        println!("[PASS] test_kernels_are_symmetric - {} kernels", kernels.len());
    }
}
