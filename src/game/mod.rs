//! Core maze-chase simulation for Pac-Man
//!
//! This module contains all the game logic without any I/O, rendering, or
//! learning dependencies. It can be driven programmatically by both the
//! evaluation loop and RL training.

pub mod action;
pub mod config;
pub mod engine;
pub mod layout;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult, TerminationReason};
pub use layout::{Layout, LayoutError};
pub use state::{GameState, Ghost, GhostMode, Position};
