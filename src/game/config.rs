use serde::{Deserialize, Serialize};

/// Configuration for the game
///
/// Reward magnitudes and timing constants are not dictated by the maze
/// itself, so they live here as explicit, documented configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    // Rewards (for RL)
    /// Reward for eating a pellet
    pub pellet_reward: f32,
    /// Reward for eating a power pellet
    pub power_pellet_reward: f32,
    /// Reward for eating a frightened ghost
    pub ghost_reward: f32,
    /// Penalty for being caught by a non-frightened ghost
    pub death_penalty: f32,
    /// Bonus for clearing every pellet in the maze
    pub win_bonus: f32,
    /// Penalty applied when the step limit is reached
    pub timeout_penalty: f32,
    /// Penalty for each step (encourages efficiency)
    pub step_penalty: f32,

    // Timing
    /// How many ticks ghosts stay frightened after a power pellet,
    /// counting the pickup tick
    pub frightened_duration: u32,
    /// Ghosts alternate between scatter and chase every this many ticks
    pub mode_switch_interval: u32,
    /// Episode ends in a timeout once this many ticks have elapsed
    pub max_steps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            pellet_reward: 10.0,
            power_pellet_reward: 50.0,
            ghost_reward: 200.0,
            death_penalty: -500.0,
            win_bonus: 500.0,
            timeout_penalty: -100.0,
            step_penalty: -0.1,
            frightened_duration: 30,
            mode_switch_interval: 50,
            max_steps: 1000,
        }
    }
}

impl GameConfig {
    /// Validate configuration parameters
    ///
    /// The timing constants drive tick arithmetic, so zero values would
    /// break the engine rather than merely train badly.
    pub fn validate(&self) -> Result<(), String> {
        if self.frightened_duration == 0 {
            return Err("frightened_duration must be at least 1".to_string());
        }

        if self.mode_switch_interval == 0 {
            return Err("mode_switch_interval must be at least 1".to_string());
        }

        if self.max_steps == 0 {
            return Err("max_steps must be at least 1".to_string());
        }

        Ok(())
    }
}
