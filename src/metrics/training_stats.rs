//! Training statistics tracking for DQN
//!
//! This module provides utilities for tracking and monitoring training
//! progress, including episode rewards, lengths, scores, win rate, and TD
//! loss values.

use std::collections::VecDeque;

/// Training statistics tracker with rolling averages
///
/// Tracks episode-level metrics (rewards, lengths, scores, wins) and
/// training-level metrics (TD loss) using rolling windows for smoothed
/// statistics.
///
/// # Example
///
/// ```rust
/// use ml_pacman::metrics::TrainingStats;
///
/// let mut stats = TrainingStats::new(100);
///
/// // Record an episode
/// stats.record_episode(120.5, 150, 230, false);
///
/// // Record a learn step
/// stats.record_loss(0.02);
///
/// println!("Mean reward: {}", stats.mean_episode_reward());
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct TrainingStats {
    /// Episode rewards (rolling window)
    episode_rewards: VecDeque<f32>,

    /// Episode lengths in steps (rolling window)
    episode_lengths: VecDeque<usize>,

    /// Episode scores (rolling window)
    episode_scores: VecDeque<u32>,

    /// Whether each episode cleared the maze (rolling window)
    episode_wins: VecDeque<bool>,

    /// TD losses from learn steps (rolling window)
    losses: VecDeque<f32>,

    /// Total number of episodes completed
    total_episodes: usize,

    /// Total number of environment steps taken
    total_steps: usize,

    /// Window size for rolling averages
    window_size: usize,
}

impl TrainingStats {
    /// Create a new tracker keeping the last `window_size` values
    pub fn new(window_size: usize) -> Self {
        Self {
            episode_rewards: VecDeque::with_capacity(window_size),
            episode_lengths: VecDeque::with_capacity(window_size),
            episode_scores: VecDeque::with_capacity(window_size),
            episode_wins: VecDeque::with_capacity(window_size),
            losses: VecDeque::with_capacity(window_size),
            total_episodes: 0,
            total_steps: 0,
            window_size,
        }
    }

    /// Record the completion of an episode
    pub fn record_episode(&mut self, reward: f32, length: usize, score: u32, won: bool) {
        Self::push_deque(&mut self.episode_rewards, reward, self.window_size);
        Self::push_deque(&mut self.episode_lengths, length, self.window_size);
        Self::push_deque(&mut self.episode_scores, score, self.window_size);
        Self::push_deque(&mut self.episode_wins, won, self.window_size);
        self.total_episodes += 1;
        self.total_steps += length;
    }

    /// Record the TD loss from one learn step
    pub fn record_loss(&mut self, loss: f32) {
        Self::push_deque(&mut self.losses, loss, self.window_size);
    }

    /// Mean episode reward over the rolling window, or 0.0 when empty
    pub fn mean_episode_reward(&self) -> f32 {
        self.mean(&self.episode_rewards)
    }

    /// Mean episode length in steps over the rolling window
    pub fn mean_episode_length(&self) -> f32 {
        let sum: usize = self.episode_lengths.iter().sum();
        if self.episode_lengths.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_lengths.len() as f32
        }
    }

    /// Mean episode score over the rolling window
    pub fn mean_episode_score(&self) -> f32 {
        let sum: u32 = self.episode_scores.iter().sum();
        if self.episode_scores.is_empty() {
            0.0
        } else {
            sum as f32 / self.episode_scores.len() as f32
        }
    }

    /// Fraction of window episodes that cleared the maze
    pub fn win_rate(&self) -> f32 {
        if self.episode_wins.is_empty() {
            0.0
        } else {
            let wins = self.episode_wins.iter().filter(|&&w| w).count();
            wins as f32 / self.episode_wins.len() as f32
        }
    }

    /// Mean TD loss over the rolling window, or 0.0 when empty
    pub fn mean_loss(&self) -> f32 {
        self.mean(&self.losses)
    }

    /// Get the total number of episodes completed
    pub fn total_episodes(&self) -> usize {
        self.total_episodes
    }

    /// Get the total number of environment steps taken
    pub fn total_steps(&self) -> usize {
        self.total_steps
    }

    /// Get the window size for rolling averages
    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Format a one-line summary of the current statistics
    pub fn format_summary(&self) -> String {
        format!(
            "Episodes: {} | Steps: {} | Reward: {:.2} | Score: {:.2} | Len: {:.1} | Win%: {:.1} | Loss: {:.4}",
            self.total_episodes,
            self.total_steps,
            self.mean_episode_reward(),
            self.mean_episode_score(),
            self.mean_episode_length(),
            self.win_rate() * 100.0,
            self.mean_loss(),
        )
    }

    /// Helper function to compute mean of a VecDeque<f32>
    fn mean(&self, deque: &VecDeque<f32>) -> f32 {
        if deque.is_empty() {
            0.0
        } else {
            deque.iter().sum::<f32>() / deque.len() as f32
        }
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
