//! Q-network value-function approximator
//!
//! A small fully connected network mapping a flat observation to one value
//! estimate per action:
//!
//! ```text
//! Input: [batch, state_dim]
//!   ↓ Linear(state_dim → hidden) + ReLU
//!   ↓ Linear(hidden → hidden) + ReLU
//!   ↓ Linear(hidden → num_actions)
//! Output: [batch, num_actions]
//! ```
//!
//! The architecture is a hyperparameter; only the input/output shapes are
//! contractual (input length = `state_dim`, output length = number of
//! actions).

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{activation::relu, backend::Backend, Tensor},
};

/// Configuration for the Q-network
#[derive(Debug, Clone)]
pub struct QNetworkConfig {
    /// Length of the observation vector
    pub state_dim: usize,

    /// Number of discrete actions (output width)
    pub num_actions: usize,

    /// Width of the two hidden layers
    pub hidden_dim: usize,
}

impl QNetworkConfig {
    pub fn new(state_dim: usize, num_actions: usize, hidden_dim: usize) -> Self {
        Self {
            state_dim,
            num_actions,
            hidden_dim,
        }
    }

    /// Initialize a Q-network from this configuration
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            fc1: LinearConfig::new(self.state_dim, self.hidden_dim).init(device),
            fc2: LinearConfig::new(self.hidden_dim, self.hidden_dim).init(device),
            out: LinearConfig::new(self.hidden_dim, self.num_actions).init(device),
        }
    }
}

/// Fully connected Q-network
///
/// Generic over the Burn backend so the same definition serves the online
/// network (autodiff) and the target network (plain inference).
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    fc1: Linear<B>,
    fc2: Linear<B>,
    out: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: `[batch, state_dim]` → `[batch, num_actions]`
    pub fn forward(&self, input: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(input));
        let x = relu(self.fc2.forward(x));
        self.out.forward(x)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::backend::{default_device, InferenceBackend, TrainingBackend};
    use burn::tensor::{Distribution, TensorData};

    #[test]
    fn test_forward_pass_shapes() {
        let device = default_device();
        let network = QNetworkConfig::new(120, 5, 32).init::<InferenceBackend>(&device);

        let input = Tensor::zeros([2, 120], &device);
        let output = network.forward(input);

        assert_eq!(output.dims(), [2, 5]);
    }

    #[test]
    fn test_different_batch_sizes() {
        let device = default_device();
        let network = QNetworkConfig::new(60, 5, 16).init::<InferenceBackend>(&device);

        for batch_size in [1, 4, 16] {
            let input = Tensor::zeros([batch_size, 60], &device);
            assert_eq!(network.forward(input).dims(), [batch_size, 5]);
        }
    }

    #[test]
    fn test_output_finite() {
        let device = default_device();
        let network = QNetworkConfig::new(60, 5, 16).init::<InferenceBackend>(&device);

        let input = Tensor::random([8, 60], Distribution::Uniform(0.0, 1.0), &device);
        let output = network.forward(input);

        let data: TensorData = output.into_data();
        for &value in data.as_slice::<f32>().unwrap() {
            assert!(value.is_finite(), "Q-values should be finite, got {value}");
        }
    }

    #[test]
    fn test_batch_consistency() {
        let device = default_device();
        let network = QNetworkConfig::new(40, 5, 16).init::<InferenceBackend>(&device);

        let single = Tensor::ones([1, 40], &device);
        let single_out = network.forward(single.clone());

        let batch = Tensor::cat(vec![single.clone(), single.clone(), single], 0);
        let batch_out = network.forward(batch);

        let single_vals: Vec<f32> = single_out.into_data().to_vec().unwrap();
        let batch_vals: Vec<f32> = batch_out.into_data().to_vec().unwrap();

        for i in 0..5 {
            assert!(
                (single_vals[i] - batch_vals[i]).abs() < 1e-5,
                "batch element 0 should match single at action {i}"
            );
        }
    }

    #[test]
    fn test_gradient_flow() {
        let device = default_device();
        let network = QNetworkConfig::new(40, 5, 16).init::<TrainingBackend>(&device);

        let input = Tensor::ones([1, 40], &device).require_grad();
        let output = network.forward(input.clone());
        let loss = output.sum();
        let gradients = loss.backward();

        assert!(
            input.grad(&gradients).is_some(),
            "gradients should flow back to the input"
        );
    }
}
