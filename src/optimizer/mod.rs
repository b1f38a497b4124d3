use crate::model::ParamOps;

/// Trait for gradient-based optimizers.
///
/// An optimizer maps current parameters and their gradients to new
/// parameters without mutating either input.
pub trait Optimizer<P> {
    fn step(&self, params: &P, gradients: &P) -> P;
}

/// Plain gradient descent: `θ ← θ - η · ∇L(θ)`.
#[derive(Clone, Copy, Debug)]
pub struct SGD {
    lr: f64,
}

impl SGD {
    pub fn new(lr: f64) -> Self {
        Self { lr }
    }
}

impl<P: ParamOps> Optimizer<P> for SGD {
    fn step(&self, params: &P, gradients: &P) -> P {
        params.add(&gradients.scale(-self.lr))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::linear::LinearParams;
    use ndarray::array;

    #[test]
    fn test_sgd_step_correctness() {
        let params = LinearParams {
            weights: array![2.0, 3.0],
            bias: 2.0,
        };
        let grads = LinearParams {
            weights: array![1.0, -1.0],
            bias: -1.0,
        };

        let updated = SGD::new(0.5).step(&params, &grads);

        assert_eq!(updated.weights.to_vec(), vec![1.5, 3.5]);
        assert_eq!(updated.bias, 2.5);
    }

    #[test]
    fn test_sgd_zero_gradient_is_identity() {
        let params = LinearParams {
            weights: array![5.0],
            bias: -1.0,
        };
        let grads = LinearParams {
            weights: array![0.0],
            bias: 0.0,
        };
        assert_eq!(SGD::new(0.1).step(&params, &grads), params);
    }
}
