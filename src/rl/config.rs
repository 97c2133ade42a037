//! DQN hyperparameter configuration

use serde::{Deserialize, Serialize};

/// Configuration for the DQN algorithm
///
/// Default values are common DQN settings, scaled down for the small maze.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Learning rate for the Adam optimizer
    pub learning_rate: f64,

    /// Discount factor for future rewards
    pub gamma: f32,

    /// Exploration rate at the start of training
    pub epsilon_start: f32,

    /// Exploration floor the schedule decays toward
    pub epsilon_end: f32,

    /// Episodes over which epsilon decays linearly from start to end
    pub epsilon_decay_episodes: usize,

    /// Copy online-network parameters into the target network every this
    /// many learn steps
    pub target_update_interval: usize,

    /// Minibatch size for each learn step
    pub batch_size: usize,

    /// Replay buffer capacity
    pub replay_capacity: usize,

    /// Learn steps are skipped until the buffer holds this many transitions
    pub min_replay_size: usize,

    /// Width of the Q-network hidden layers
    pub hidden_dim: usize,
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            learning_rate: 1e-4,
            gamma: 0.99,
            epsilon_start: 1.0,
            epsilon_end: 0.05,
            epsilon_decay_episodes: 2000,
            target_update_interval: 500,
            batch_size: 64,
            replay_capacity: 50_000,
            min_replay_size: 1000,
            hidden_dim: 256,
        }
    }
}

impl DqnConfig {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if !(0.0..=1.0).contains(&self.epsilon_start) {
            return Err(format!(
                "epsilon_start must be in [0, 1], got {}",
                self.epsilon_start
            ));
        }

        if !(0.0..=1.0).contains(&self.epsilon_end) {
            return Err(format!(
                "epsilon_end must be in [0, 1], got {}",
                self.epsilon_end
            ));
        }

        if self.epsilon_end > self.epsilon_start {
            return Err(format!(
                "epsilon_end ({}) cannot exceed epsilon_start ({})",
                self.epsilon_end, self.epsilon_start
            ));
        }

        if self.target_update_interval == 0 {
            return Err("target_update_interval must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        if self.replay_capacity < self.batch_size {
            return Err(format!(
                "replay_capacity ({}) cannot be smaller than batch_size ({})",
                self.replay_capacity, self.batch_size
            ));
        }

        if self.hidden_dim == 0 {
            return Err("hidden_dim must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(DqnConfig::default().validate().is_ok());
    }

    #[test]
    fn test_validation_negative_learning_rate() {
        let config = DqnConfig {
            learning_rate: -0.1,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_gamma_out_of_range() {
        let config = DqnConfig {
            gamma: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_epsilon_order() {
        let config = DqnConfig {
            epsilon_start: 0.1,
            epsilon_end: 0.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_epsilon_range() {
        let config = DqnConfig {
            epsilon_start: 1.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_capacity_vs_batch() {
        let config = DqnConfig {
            replay_capacity: 10,
            batch_size: 64,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_target_interval() {
        let config = DqnConfig {
            target_update_interval: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
