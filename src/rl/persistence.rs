//! Checkpoint persistence for trained agents
//!
//! Saves and restores the online and target networks together with the
//! training metadata needed to rebuild an agent. Uses Burn's Record system
//! for the weights and a JSON sidecar for the metadata.

use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::AutodiffBackend,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::{
    agent::DqnAgent,
    config::DqnConfig,
    network::{QNetwork, QNetworkConfig},
};

/// Metadata saved alongside the network weights
///
/// Carries everything needed to rebuild a structurally identical agent and
/// resume its exploration schedule.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckpointMetadata {
    /// DQN configuration used during training
    pub dqn_config: DqnConfig,

    /// Observation vector length the network was built for
    pub state_dim: usize,

    /// Number of discrete actions
    pub num_actions: usize,

    /// Exploration rate at save time
    pub epsilon: f32,

    /// Total learn steps completed
    pub training_steps: usize,

    /// Number of episodes trained
    pub episodes_trained: usize,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl CheckpointMetadata {
    pub fn new(
        dqn_config: DqnConfig,
        state_dim: usize,
        num_actions: usize,
        epsilon: f32,
        training_steps: usize,
        episodes_trained: usize,
    ) -> Self {
        Self {
            dqn_config,
            state_dim,
            num_actions,
            epsilon,
            training_steps,
            episodes_trained,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Sibling file holding the target-network weights
fn target_path(path: &Path) -> PathBuf {
    path.with_extension("target.mpk")
}

/// Save a trained agent to a checkpoint
///
/// The checkpoint is three files:
/// - `<path>` - Online network weights (Burn record format)
/// - `<path>.target.mpk` - Target network weights (Burn record format)
/// - `<path>.meta.json` - Metadata as JSON
///
/// Creates parent directories if they don't exist. The replay buffer and
/// optimizer moments are not persisted; a resumed run rebuilds them fresh.
pub fn save_agent<B: AutodiffBackend>(agent: &DqnAgent<B>, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();

    let record = agent.q_network().clone().into_record();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    // The target lag is part of the training state, so the target network
    // is checkpointed as well instead of being rebuilt from the online net
    let target_record = agent.target_network().clone().into_record();
    recorder
        .record(target_record, target_path(path))
        .context("Failed to save target network weights")?;

    let metadata = CheckpointMetadata::new(
        agent.config().clone(),
        agent.state_dim(),
        agent.num_actions(),
        agent.epsilon(),
        agent.step_count(),
        agent.episode_count(),
    );

    let meta_path = path.with_extension("meta.json");
    let meta_json =
        serde_json::to_string_pretty(&metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load an agent from a checkpoint
///
/// Rebuilds both networks from the saved metadata and restores their
/// weights, so a resumed run keeps its target lag intact.
pub fn load_agent<B: AutodiffBackend>(path: &Path, device: &B::Device) -> Result<DqnAgent<B>> {
    let meta_path = path.with_extension("meta.json");
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: CheckpointMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let network_config = QNetworkConfig::new(
        metadata.state_dim,
        metadata.num_actions,
        metadata.dqn_config.hidden_dim,
    );
    let network: QNetwork<B> = network_config.init(device);
    let target_network: QNetwork<B::InnerBackend> = network_config.init(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;
    let network = network.load_record(record);

    let target = target_path(path);
    let target_record = recorder
        .load(target.clone(), device)
        .with_context(|| format!("Failed to load target network weights from {:?}", target))?;
    let target_network = target_network.load_record(target_record);

    Ok(DqnAgent::from_parts(
        network,
        target_network,
        metadata.dqn_config,
        metadata.state_dim,
        metadata.num_actions,
        metadata.epsilon,
        metadata.training_steps,
        metadata.episodes_trained,
        device.clone(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::backend::{default_device, InferenceBackend, TrainingBackend};
    use crate::rl::observation::state_to_tensor;
    use crate::rl::replay::Transition;
    use burn::module::AutodiffModule;
    use tempfile::TempDir;

    /// Distinct observations for comparing policies across a round trip
    fn state_battery(state_dim: usize) -> Vec<Vec<f32>> {
        (0..6)
            .map(|i| {
                (0..state_dim)
                    .map(|j| ((i * state_dim + j) % 5) as f32 / 4.0)
                    .collect()
            })
            .collect()
    }

    fn target_q_values(agent: &DqnAgent<TrainingBackend>, state: &[f32]) -> Vec<f32> {
        let input = state_to_tensor::<InferenceBackend>(state, &default_device());
        agent
            .target_network()
            .forward(input)
            .into_data()
            .to_vec()
            .unwrap()
    }

    #[test]
    fn test_metadata_serialization_round_trip() {
        let metadata = CheckpointMetadata::new(DqnConfig::default(), 120, 5, 0.3, 1000, 100);

        let json = serde_json::to_string(&metadata).unwrap();
        let restored: CheckpointMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(restored.state_dim, 120);
        assert_eq!(restored.num_actions, 5);
        assert_eq!(restored.training_steps, 1000);
        assert_eq!(restored.episodes_trained, 100);
        assert!((restored.epsilon - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_save_and_load_agent() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("checkpoints").join("model.mpk");
        let device = default_device();

        let config = DqnConfig {
            hidden_dim: 8,
            ..Default::default()
        };
        let mut agent: DqnAgent<TrainingBackend> = DqnAgent::new(12, 5, config, device);
        agent.set_epsilon(0.25);

        save_agent(&agent, &path).unwrap();
        assert!(path.exists());
        assert!(target_path(&path).exists());
        assert!(path.with_extension("meta.json").exists());

        let restored: DqnAgent<TrainingBackend> =
            load_agent(&path, &default_device()).unwrap();
        assert_eq!(restored.state_dim(), 12);
        assert_eq!(restored.num_actions(), 5);
        assert!((restored.epsilon() - 0.25).abs() < 1e-6);

        // Same weights produce the same greedy choice on every state
        for state in state_battery(12) {
            assert_eq!(agent.greedy_action(&state), restored.greedy_action(&state));
        }
    }

    #[test]
    fn test_round_trip_preserves_target_lag() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("model.mpk");
        let device = default_device();

        let config = DqnConfig {
            learning_rate: 1e-2,
            hidden_dim: 8,
            batch_size: 4,
            min_replay_size: 4,
            replay_capacity: 64,
            // Never syncs during this test, so online and target diverge
            target_update_interval: 1000,
            ..Default::default()
        };
        let mut agent: DqnAgent<TrainingBackend> = DqnAgent::new(12, 5, config, device);

        for i in 0..8 {
            agent.push_transition(Transition {
                state: vec![0.5; 12],
                action: i % 5,
                reward: 1.0,
                next_state: vec![0.25; 12],
                done: false,
            });
        }
        for _ in 0..3 {
            agent.learn().expect("buffer is warm");
        }

        let probe = vec![0.4; 12];
        let target_before = target_q_values(&agent, &probe);

        // The online net has moved away from the target
        let online: Vec<f32> = agent
            .q_network()
            .valid()
            .forward(state_to_tensor::<InferenceBackend>(&probe, &default_device()))
            .into_data()
            .to_vec()
            .unwrap();
        let max_gap = online
            .iter()
            .zip(&target_before)
            .map(|(a, b)| (a - b).abs())
            .fold(0.0f32, f32::max);
        assert!(max_gap > 1e-5, "learn steps should move the online net");

        save_agent(&agent, &path).unwrap();
        let restored: DqnAgent<TrainingBackend> =
            load_agent(&path, &default_device()).unwrap();

        // The restored target is the lagged one, not a copy of the online net
        let target_after = target_q_values(&restored, &probe);
        for (before, after) in target_before.iter().zip(&target_after) {
            assert!((before - after).abs() < 1e-6);
        }
    }

    #[test]
    fn test_load_missing_checkpoint_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.mpk");
        let device = default_device();

        let result: Result<DqnAgent<TrainingBackend>> = load_agent(&path, &device);
        assert!(result.is_err());
    }
}
