//! Reinforcement learning core for the Pac-Man maze chase
//!
//! Provides:
//! - Flat grid-plane observations of the game state
//! - A `reset`/`step` RL environment over the game engine
//! - The Q-network value-function approximator
//! - DQN agent with experience replay and a lagged target network
//! - Checkpoint persistence via Burn records + JSON metadata

pub mod agent;
pub mod backend;
pub mod config;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod replay;

pub use agent::DqnAgent;
pub use backend::{default_device, InferenceBackend, TrainingBackend};
pub use config::DqnConfig;
pub use environment::PacmanEnvironment;
pub use network::{QNetwork, QNetworkConfig};
pub use observation::{encode_state, state_dim, StateVector};
pub use persistence::{load_agent, save_agent, CheckpointMetadata};
pub use replay::{ReplayBuffer, Transition};
