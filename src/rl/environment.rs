//! RL-facing wrapper around the game engine
//!
//! Presents the maze as a standard episodic environment: `reset` starts an
//! episode and returns the first observation, `step` applies one action and
//! returns the next observation, the reward, and the terminal flag.

use crate::game::{Action, GameConfig, GameEngine, GameState, Layout, TerminationReason};

use super::observation::{encode_state, state_dim, StateVector};

/// Episodic environment over the maze game
pub struct PacmanEnvironment {
    engine: GameEngine,
    state: Option<GameState>,
    state_dim: usize,
    last_termination: Option<TerminationReason>,
}

impl PacmanEnvironment {
    pub fn new(config: GameConfig, layout: Layout, seed: u64) -> Self {
        let state_dim = state_dim(&layout);
        Self {
            engine: GameEngine::new(config, layout, seed),
            state: None,
            state_dim,
            last_termination: None,
        }
    }

    /// Start a new episode and return the initial observation
    pub fn reset(&mut self) -> StateVector {
        let state = self.engine.reset();
        let obs = encode_state(&state);
        self.state = Some(state);
        self.last_termination = None;
        obs
    }

    /// Apply one action; returns `(observation, reward, done)`.
    ///
    /// Panics if called before `reset`, and keeps returning the terminal
    /// observation with zero reward once the episode is over.
    pub fn step(&mut self, action: Action) -> (StateVector, f32, bool) {
        let state = self
            .state
            .as_mut()
            .expect("step called before reset");

        let result = self.engine.step(state, action);
        if result.info.termination.is_some() {
            self.last_termination = result.info.termination;
        }
        (encode_state(state), result.reward, result.terminated)
    }

    /// Current game state, for rendering; `None` before the first `reset`
    pub fn state(&self) -> Option<&GameState> {
        self.state.as_ref()
    }

    /// How the last finished episode ended
    pub fn termination(&self) -> Option<TerminationReason> {
        self.last_termination
    }

    pub fn state_dim(&self) -> usize {
        self.state_dim
    }

    pub fn num_actions(&self) -> usize {
        Action::COUNT
    }

    /// Change the episode seed; takes effect at the next `reset`
    pub fn set_seed(&mut self, seed: u64) {
        self.engine.set_seed(seed);
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    pub fn layout(&self) -> &Layout {
        self.engine.layout()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_env() -> PacmanEnvironment {
        let layout = Layout::parse("#####\n#P..#\n#####").unwrap();
        PacmanEnvironment::new(GameConfig::default(), layout, 7)
    }

    #[test]
    fn test_reset_returns_observation_of_fixed_length() {
        let mut env = small_env();
        let obs = env.reset();
        assert_eq!(obs.len(), env.state_dim());
    }

    #[test]
    fn test_step_advances_and_rewards() {
        let mut env = small_env();
        env.reset();

        let (obs, reward, done) = env.step(Action::Move(crate::game::Direction::Right));
        assert_eq!(obs.len(), env.state_dim());
        let expected = env.config().pellet_reward + env.config().step_penalty;
        assert!((reward - expected).abs() < 1e-6);
        assert!(!done);
    }

    #[test]
    fn test_episode_terminates_on_clear() {
        let mut env = small_env();
        env.reset();

        let (_, _, done) = env.step(Action::Move(crate::game::Direction::Right));
        assert!(!done);
        let (_, reward, done) = env.step(Action::Move(crate::game::Direction::Right));
        assert!(done);
        assert_eq!(env.termination(), Some(TerminationReason::Cleared));
        let expected =
            env.config().pellet_reward + env.config().step_penalty + env.config().win_bonus;
        assert!((reward - expected).abs() < 1e-6);
    }

    #[test]
    fn test_reset_restores_full_episode() {
        let mut env = small_env();
        env.reset();
        env.step(Action::Move(crate::game::Direction::Right));
        env.step(Action::Move(crate::game::Direction::Right));

        let obs_a = env.reset();
        assert_eq!(env.state().unwrap().pellets_remaining(), 2);
        assert!(env.termination().is_none());

        // Same seed, same initial observation
        let obs_b = env.reset();
        assert_eq!(obs_a, obs_b);
    }

    #[test]
    #[should_panic(expected = "step called before reset")]
    fn test_step_before_reset_panics() {
        let mut env = small_env();
        env.step(Action::Stay);
    }

    #[test]
    fn test_num_actions() {
        let env = small_env();
        assert_eq!(env.num_actions(), 5);
    }
}
