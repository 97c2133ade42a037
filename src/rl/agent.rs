//! DQN agent: epsilon-greedy policy, replay learning, target network sync

use burn::{
    module::AutodiffModule,
    optim::{adaptor::OptimizerAdaptor, Adam, AdamConfig, GradientsParams, Optimizer},
    tensor::{backend::AutodiffBackend, Tensor, TensorData},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    config::DqnConfig,
    network::{QNetwork, QNetworkConfig},
    observation::{state_to_tensor, states_to_tensor},
    replay::{ReplayBuffer, Transition},
};
use crate::game::Action;

/// DQN agent with online + target networks, replay buffer, and Adam optimizer
///
/// The agent has no separate evaluation type: forcing epsilon to 0 and not
/// calling `learn`/`end_episode` puts it in pure-greedy mode.
pub struct DqnAgent<B: AutodiffBackend> {
    q_network: QNetwork<B>,
    target_network: QNetwork<B::InnerBackend>,
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,
    replay: ReplayBuffer,
    config: DqnConfig,
    state_dim: usize,
    num_actions: usize,
    epsilon: f32,
    step_count: usize,
    episode_count: usize,
    device: B::Device,
    rng: StdRng,
}

impl<B: AutodiffBackend> DqnAgent<B> {
    /// Create a freshly initialized agent for the given observation size
    pub fn new(state_dim: usize, num_actions: usize, config: DqnConfig, device: B::Device) -> Self {
        config.validate().expect("invalid DQN configuration");

        let net_config = QNetworkConfig::new(state_dim, num_actions, config.hidden_dim);
        let q_network: QNetwork<B> = net_config.init(&device);
        let target_network: QNetwork<B::InnerBackend> = q_network.valid();

        let epsilon = config.epsilon_start;
        let replay = ReplayBuffer::new(config.replay_capacity);

        Self {
            q_network,
            target_network,
            optim: AdamConfig::new().init(),
            replay,
            config,
            state_dim,
            num_actions,
            epsilon,
            step_count: 0,
            episode_count: 0,
            device,
            rng: StdRng::from_entropy(),
        }
    }

    /// Rebuild an agent from restored parts (used by checkpoint loading)
    pub(crate) fn from_parts(
        q_network: QNetwork<B>,
        target_network: QNetwork<B::InnerBackend>,
        config: DqnConfig,
        state_dim: usize,
        num_actions: usize,
        epsilon: f32,
        step_count: usize,
        episode_count: usize,
        device: B::Device,
    ) -> Self {
        config.validate().expect("invalid DQN configuration");
        let replay = ReplayBuffer::new(config.replay_capacity);

        Self {
            q_network,
            target_network,
            optim: AdamConfig::new().init(),
            replay,
            config,
            state_dim,
            num_actions,
            epsilon: epsilon.clamp(0.0, 1.0),
            step_count,
            episode_count,
            device,
            rng: StdRng::from_entropy(),
        }
    }

    /// Epsilon-greedy action selection
    pub fn select_action(&mut self, state: &[f32]) -> Action {
        if self.epsilon > 0.0 && self.rng.gen::<f32>() < self.epsilon {
            return Action::from_index(self.rng.gen_range(0..self.num_actions));
        }
        self.greedy_action(state)
    }

    /// Greedy action: argmax over the online network's Q-values, ties
    /// resolved to the lowest action index for reproducible evaluation
    pub fn greedy_action(&self, state: &[f32]) -> Action {
        assert_eq!(
            state.len(),
            self.state_dim,
            "observation length {} does not match the network input size {}",
            state.len(),
            self.state_dim
        );

        let input = state_to_tensor::<B::InnerBackend>(state, &self.device);
        let q_values = self.q_network.valid().forward(input);
        let q_vec: Vec<f32> = q_values
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");

        let mut best = 0;
        for (idx, &q) in q_vec.iter().enumerate() {
            if q > q_vec[best] {
                best = idx;
            }
        }
        Action::from_index(best)
    }

    /// Record a transition for later replay
    pub fn push_transition(&mut self, transition: Transition) {
        self.replay.push(transition);
    }

    /// Perform one gradient update step from the replay buffer.
    ///
    /// Returns the loss, or `None` while the buffer is still warming up.
    pub fn learn(&mut self) -> Option<f32> {
        let threshold = self.config.min_replay_size.max(self.config.batch_size);
        if self.replay.len() < threshold {
            return None;
        }

        let batch = self.replay.sample(self.config.batch_size);
        let batch_size = batch.len();
        let num_actions = self.num_actions;

        let states: Vec<_> = batch.iter().map(|t| t.state.clone()).collect();
        let next_states: Vec<_> = batch.iter().map(|t| t.next_state.clone()).collect();

        // Q(s, a) for the taken actions, via a one-hot mask over the
        // online network's outputs
        let state_tensors = states_to_tensor::<B>(&states, self.state_dim, &self.device);
        let q_all = self.q_network.forward(state_tensors);

        let mut mask_data = vec![0.0f32; batch_size * num_actions];
        for (i, t) in batch.iter().enumerate() {
            mask_data[i * num_actions + t.action] = 1.0;
        }
        let action_mask = Tensor::<B, 2>::from_data(
            TensorData::new(mask_data, [batch_size, num_actions]),
            &self.device,
        );
        let q_taken = (q_all * action_mask).sum_dim(1); // [B, 1]

        // Targets from the lagged network: r + gamma * max_a' Q_target(s')
        let next_tensors =
            states_to_tensor::<B::InnerBackend>(&next_states, self.state_dim, &self.device);
        let next_q: Vec<f32> = self
            .target_network
            .forward(next_tensors)
            .into_data()
            .to_vec()
            .expect("f32 tensor data extraction");

        let mut target_data = Vec::with_capacity(batch_size);
        for (i, t) in batch.iter().enumerate() {
            if t.done {
                target_data.push(t.reward);
            } else {
                let max_q = next_q[i * num_actions..(i + 1) * num_actions]
                    .iter()
                    .fold(f32::NEG_INFINITY, |acc, &q| acc.max(q));
                target_data.push(t.reward + self.config.gamma * max_q);
            }
        }
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(target_data, [batch_size, 1]),
            &self.device,
        );

        // MSE loss
        let diff = q_taken - targets;
        let loss = (diff.clone() * diff).mean();
        let loss_val: f32 = loss
            .clone()
            .into_data()
            .to_vec::<f32>()
            .expect("f32 loss tensor extraction")[0];

        let grads = loss.backward();
        let grads = GradientsParams::from_grads(grads, &self.q_network);
        self.q_network =
            self.optim
                .step(self.config.learning_rate, self.q_network.clone(), grads);

        // Delayed copy into the target network: the lag is what keeps the
        // learning targets stable
        self.step_count += 1;
        if self.step_count % self.config.target_update_interval == 0 {
            self.target_network = self.q_network.valid();
        }

        Some(loss_val)
    }

    /// Mark an episode as finished and advance the exploration schedule
    pub fn end_episode(&mut self) {
        self.episode_count += 1;
        self.decay_epsilon();
    }

    /// Decay epsilon linearly over the configured number of episodes
    fn decay_epsilon(&mut self) {
        if self.config.epsilon_decay_episodes == 0 {
            self.epsilon = self.config.epsilon_end;
            return;
        }
        let progress = (self.episode_count as f32
            / self.config.epsilon_decay_episodes as f32)
            .min(1.0);
        self.epsilon = (self.config.epsilon_start
            + (self.config.epsilon_end - self.config.epsilon_start) * progress)
            .clamp(0.0, 1.0);
    }

    pub fn epsilon(&self) -> f32 {
        self.epsilon
    }

    /// Set epsilon directly (0.0 for pure-greedy evaluation).
    ///
    /// Does not touch the decay counters, so a training run resumed after
    /// evaluation continues its schedule unchanged.
    pub fn set_epsilon(&mut self, epsilon: f32) {
        self.epsilon = epsilon.clamp(0.0, 1.0);
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn episode_count(&self) -> usize {
        self.episode_count
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn num_actions(&self) -> usize {
        self.num_actions
    }

    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    pub fn replay_len(&self) -> usize {
        self.replay.len()
    }

    pub(crate) fn q_network(&self) -> &QNetwork<B> {
        &self.q_network
    }

    pub(crate) fn target_network(&self) -> &QNetwork<B::InnerBackend> {
        &self.target_network
    }
}
