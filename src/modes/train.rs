//! Training mode for the DQN agent
//!
//! This module implements the training loop: it runs episodes in the maze
//! environment, stores transitions in the replay buffer, performs a learn
//! step after every environment step, and periodically saves checkpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use ml_pacman::modes::{TrainMode, TrainConfig};
//! use ml_pacman::rl::{default_device, TrainingBackend};
//! use std::path::PathBuf;
//!
//! let config = TrainConfig::new(5000, PathBuf::from("models/pacman.mpk"));
//! let device = default_device();
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, device);
//! train_mode.run()?;
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use std::path::{Path, PathBuf};

use crate::game::{GameConfig, Layout, TerminationReason};
use crate::metrics::TrainingStats;
use crate::rl::{save_agent, DqnAgent, DqnConfig, PacmanEnvironment, Transition};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Number of episodes to train
    pub num_episodes: usize,

    /// Path to save the final trained model
    pub save_path: PathBuf,

    /// Save a checkpoint every N episodes
    pub checkpoint_frequency: usize,

    /// Log training progress every N episodes
    pub log_frequency: usize,

    /// Base seed; episode i runs with seed `seed + i`
    pub seed: u64,

    /// Maze layout to train on
    pub layout: Layout,

    /// Game configuration (rewards, timers)
    pub game_config: GameConfig,

    /// DQN hyperparameters
    pub dqn_config: DqnConfig,
}

impl TrainConfig {
    /// Create a new training configuration with defaults
    pub fn new(num_episodes: usize, save_path: PathBuf) -> Self {
        Self {
            num_episodes,
            save_path,
            checkpoint_frequency: 1000,
            log_frequency: 100,
            seed: 42,
            layout: Layout::classic(),
            game_config: GameConfig::default(),
            dqn_config: DqnConfig::default(),
        }
    }
}

/// Training mode for the DQN agent
///
/// Runs the training loop, collecting experience and updating the agent.
/// Periodically logs progress and saves checkpoints.
pub struct TrainMode<B: AutodiffBackend> {
    /// DQN agent being trained
    agent: DqnAgent<B>,

    /// Maze environment for experience collection
    env: PacmanEnvironment,

    /// Training statistics tracker
    stats: TrainingStats,

    /// Training configuration
    config: TrainConfig,

    /// Current episode number
    current_episode: usize,
}

impl<B: AutodiffBackend> TrainMode<B> {
    /// Create a new training mode with a freshly initialized agent
    pub fn new(config: TrainConfig, device: B::Device) -> Self {
        let env = PacmanEnvironment::new(
            config.game_config.clone(),
            config.layout.clone(),
            config.seed,
        );

        let agent = DqnAgent::new(
            env.state_dim(),
            env.num_actions(),
            config.dqn_config.clone(),
            device,
        );

        // 100-episode rolling window
        let stats = TrainingStats::new(100);

        Self {
            agent,
            env,
            stats,
            config,
            current_episode: 0,
        }
    }

    /// Run the training loop
    ///
    /// Trains the agent for the configured number of episodes, logging
    /// progress and saving checkpoints periodically.
    pub fn run(&mut self) -> Result<()> {
        self.print_header();

        for episode in 0..self.config.num_episodes {
            self.current_episode = episode;

            // Vary the episode seed so ghost behavior is not identical
            // across episodes
            self.env.set_seed(self.config.seed.wrapping_add(episode as u64));

            let (episode_reward, episode_steps, episode_score, won) = self.run_episode();

            self.stats
                .record_episode(episode_reward, episode_steps, episode_score, won);
            self.agent.end_episode();

            if (episode + 1) % self.config.log_frequency == 0 {
                self.print_progress(episode + 1);
            }

            if (episode + 1) % self.config.checkpoint_frequency == 0 {
                self.save_checkpoint()?;
            }
        }

        self.save_final()?;

        println!("\nTraining complete!");
        println!("Final model saved to: {:?}", self.config.save_path);
        println!("\nFinal Statistics:");
        println!("{}", self.stats.format_summary());

        Ok(())
    }

    /// Run a single training episode
    ///
    /// Returns `(total reward, steps, score, cleared the maze)`.
    fn run_episode(&mut self) -> (f32, usize, u32, bool) {
        let mut obs = self.env.reset();
        let mut episode_reward = 0.0;
        let mut episode_steps = 0;

        loop {
            let action = self.agent.select_action(&obs);
            let (next_obs, reward, terminated) = self.env.step(action);

            self.agent.push_transition(Transition {
                state: obs,
                action: action.index(),
                reward,
                next_state: next_obs.clone(),
                done: terminated,
            });

            if let Some(loss) = self.agent.learn() {
                self.stats.record_loss(loss);
            }

            episode_reward += reward;
            episode_steps += 1;
            obs = next_obs;

            if terminated {
                break;
            }
        }

        let state = self.env.state().expect("episode just ran");
        let won = self.env.termination() == Some(TerminationReason::Cleared);

        (episode_reward, episode_steps, state.score, won)
    }

    /// Save a checkpoint of the current model
    fn save_checkpoint(&self) -> Result<()> {
        let checkpoint_path = self
            .config
            .save_path
            .parent()
            .unwrap_or(Path::new("."))
            .join(format!("checkpoint_ep{}.mpk", self.current_episode + 1));

        save_agent(&self.agent, &checkpoint_path)
            .with_context(|| format!("Failed to save checkpoint to {:?}", checkpoint_path))?;

        println!("  Checkpoint saved: {:?}", checkpoint_path);

        Ok(())
    }

    /// Save the final trained model
    fn save_final(&self) -> Result<()> {
        save_agent(&self.agent, &self.config.save_path).with_context(|| {
            format!("Failed to save final model to {:?}", self.config.save_path)
        })?;

        Ok(())
    }

    /// Print training header information
    fn print_header(&self) {
        println!("{}", "=".repeat(70));
        println!("DQN Training - ML Pac-Man");
        println!("{}", "=".repeat(70));
        println!("Episodes: {}", self.config.num_episodes);
        println!(
            "Maze: {}x{}, {} pellets, {} ghosts",
            self.config.layout.width(),
            self.config.layout.height(),
            self.config.layout.pellets().len() + self.config.layout.power_pellets().len(),
            self.config.layout.ghost_starts().len(),
        );
        println!("DQN Config:");
        println!("  Learning rate: {}", self.config.dqn_config.learning_rate);
        println!("  Gamma: {}", self.config.dqn_config.gamma);
        println!(
            "  Epsilon: {} -> {} over {} episodes",
            self.config.dqn_config.epsilon_start,
            self.config.dqn_config.epsilon_end,
            self.config.dqn_config.epsilon_decay_episodes,
        );
        println!(
            "  Target update: every {} learn steps",
            self.config.dqn_config.target_update_interval
        );
        println!("  Batch size: {}", self.config.dqn_config.batch_size);
        println!(
            "  Replay: {} capacity, {} warmup",
            self.config.dqn_config.replay_capacity, self.config.dqn_config.min_replay_size
        );
        println!(
            "Checkpoints: Every {} episodes",
            self.config.checkpoint_frequency
        );
        println!("Logging: Every {} episodes", self.config.log_frequency);
        println!("Save path: {:?}", self.config.save_path);
        println!("{}", "=".repeat(70));
        println!();
    }

    /// Print training progress
    fn print_progress(&self, episode: usize) {
        println!(
            "[Episode {}/{}] Epsilon: {:.3} | {}",
            episode,
            self.config.num_episodes,
            self.agent.epsilon(),
            self.stats.format_summary()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{default_device, TrainingBackend};
    use tempfile::TempDir;

    fn tiny_config(save_path: PathBuf) -> TrainConfig {
        let mut config = TrainConfig::new(1, save_path);
        config.layout = Layout::parse("#####\n#P..#\n#####").unwrap();
        config.game_config.max_steps = 20;
        config.dqn_config.hidden_dim = 8;
        config.dqn_config.batch_size = 4;
        config.dqn_config.min_replay_size = 1000; // no learn steps in tests
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new(1000, PathBuf::from("test.mpk"));
        assert_eq!(config.num_episodes, 1000);
        assert_eq!(config.save_path, PathBuf::from("test.mpk"));
    }

    #[test]
    fn test_train_mode_creation() {
        let temp_dir = TempDir::new().unwrap();
        let config = tiny_config(temp_dir.path().join("model.mpk"));
        let _train_mode = TrainMode::<TrainingBackend>::new(config, default_device());
    }

    #[test]
    fn test_run_single_episode() {
        let temp_dir = TempDir::new().unwrap();
        let config = tiny_config(temp_dir.path().join("model.mpk"));
        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device());

        let (reward, steps, score, won) = train_mode.run_episode();
        assert!(steps > 0);
        assert!(steps <= 20);
        // Either cleared the two pellets or ran out of time
        if won {
            assert_eq!(score, 20);
        } else {
            assert!(reward < 0.0 || score > 0);
        }
    }

    #[test]
    fn test_run_saves_final_model() {
        let temp_dir = TempDir::new().unwrap();
        let save_path = temp_dir.path().join("model.mpk");
        let config = tiny_config(save_path.clone());
        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device());

        train_mode.run().unwrap();
        assert!(save_path.exists());
        assert!(save_path.with_extension("meta.json").exists());
    }
}
