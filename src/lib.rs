//! ML Pac-Man - A grid maze-chase game with a DQN agent
//!
//! This library provides:
//! - Core game logic: maze layout, ghosts, and the step engine (game module)
//! - DQN training infrastructure on Burn (rl module)
//! - TUI rendering (render module)
//! - Training statistics (metrics module)
//! - Execution modes: train and watch (modes module)

pub mod game;
pub mod metrics;
pub mod modes;
pub mod render;
pub mod rl;
