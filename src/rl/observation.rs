//! Numeric encoding of the game state
//!
//! The observation is six one-hot grid planes flattened row-major into a
//! single vector:
//! - Plane 0: walls
//! - Plane 1: pellets
//! - Plane 2: power pellets
//! - Plane 3: player position
//! - Plane 4: ghosts in chase/scatter mode
//! - Plane 5: frightened ghosts
//!
//! The vector length (`state_dim`) is fixed by the layout and constant for
//! the whole session; it sizes the Q-network input at agent construction.

use burn::tensor::{backend::Backend, Tensor, TensorData};

use crate::game::{GameState, Layout, Position};

/// The numeric state handed to the agent
pub type StateVector = Vec<f32>;

const NUM_PLANES: usize = 6;

/// Observation length for a layout
pub fn state_dim(layout: &Layout) -> usize {
    NUM_PLANES * layout.width() * layout.height()
}

/// Encode a game state as a flat observation vector
pub fn encode_state(state: &GameState) -> StateVector {
    let width = state.layout.width();
    let height = state.layout.height();
    let plane_len = width * height;
    let mut data = vec![0.0; NUM_PLANES * plane_len];

    let cell_index = |pos: Position| pos.y as usize * width + pos.x as usize;

    for y in 0..height {
        for x in 0..width {
            let pos = Position::new(x as i32, y as i32);
            if state.is_wall(pos) {
                data[cell_index(pos)] = 1.0;
            }
        }
    }

    for &pos in &state.pellets {
        data[plane_len + cell_index(pos)] = 1.0;
    }

    for &pos in &state.power_pellets {
        data[2 * plane_len + cell_index(pos)] = 1.0;
    }

    data[3 * plane_len + cell_index(state.player)] = 1.0;

    for ghost in &state.ghosts {
        let plane = if ghost.mode.is_frightened() { 5 } else { 4 };
        data[plane * plane_len + cell_index(ghost.position)] = 1.0;
    }

    data
}

/// Build a `[1, state_dim]` tensor from a single observation
pub fn state_to_tensor<B: Backend>(state: &[f32], device: &B::Device) -> Tensor<B, 2> {
    Tensor::from_data(TensorData::new(state.to_vec(), [1, state.len()]), device)
}

/// Build a `[batch, state_dim]` tensor from a batch of observations
pub fn states_to_tensor<B: Backend>(
    states: &[StateVector],
    state_dim: usize,
    device: &B::Device,
) -> Tensor<B, 2> {
    let mut flat = Vec::with_capacity(states.len() * state_dim);
    for state in states {
        debug_assert_eq!(state.len(), state_dim);
        flat.extend_from_slice(state);
    }
    Tensor::from_data(TensorData::new(flat, [states.len(), state_dim]), device)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::backend::{default_device, InferenceBackend};

    #[test]
    fn test_observation_length() {
        let layout = Layout::classic();
        let state = GameState::new(layout.clone());
        let obs = encode_state(&state);
        assert_eq!(obs.len(), state_dim(&layout));
        assert_eq!(obs.len(), 6 * layout.width() * layout.height());
    }

    #[test]
    fn test_values_are_binary() {
        let state = GameState::new(Layout::classic());
        for &value in &encode_state(&state) {
            assert!(value == 0.0 || value == 1.0);
        }
    }

    #[test]
    fn test_player_plane_is_one_hot() {
        let layout = Layout::classic();
        let state = GameState::new(layout.clone());
        let plane_len = layout.width() * layout.height();

        let obs = encode_state(&state);
        let player_plane = &obs[3 * plane_len..4 * plane_len];
        let sum: f32 = player_plane.iter().sum();
        assert_eq!(sum, 1.0);

        let idx = state.player.y as usize * layout.width() + state.player.x as usize;
        assert_eq!(player_plane[idx], 1.0);
    }

    #[test]
    fn test_wall_plane_matches_layout() {
        let layout = Layout::classic();
        let state = GameState::new(layout.clone());
        let obs = encode_state(&state);

        for y in 0..layout.height() {
            for x in 0..layout.width() {
                let pos = Position::new(x as i32, y as i32);
                let expected = if layout.is_wall(pos) { 1.0 } else { 0.0 };
                assert_eq!(obs[y * layout.width() + x], expected);
            }
        }
    }

    #[test]
    fn test_pellet_plane_counts() {
        let layout = Layout::classic();
        let state = GameState::new(layout.clone());
        let plane_len = layout.width() * layout.height();

        let obs = encode_state(&state);
        let pellet_sum: f32 = obs[plane_len..2 * plane_len].iter().sum();
        assert_eq!(pellet_sum, layout.pellets().len() as f32);

        let power_sum: f32 = obs[2 * plane_len..3 * plane_len].iter().sum();
        assert_eq!(power_sum, layout.power_pellets().len() as f32);
    }

    #[test]
    fn test_ghost_planes_follow_mode() {
        use crate::game::GhostMode;

        let layout = Layout::classic();
        let mut state = GameState::new(layout.clone());
        let plane_len = layout.width() * layout.height();

        let obs = encode_state(&state);
        let normal_sum: f32 = obs[4 * plane_len..5 * plane_len].iter().sum();
        assert_eq!(normal_sum, state.ghosts.len() as f32);

        for ghost in &mut state.ghosts {
            ghost.mode = GhostMode::Frightened { remaining: 10 };
        }
        let obs = encode_state(&state);
        let normal_sum: f32 = obs[4 * plane_len..5 * plane_len].iter().sum();
        let frightened_sum: f32 = obs[5 * plane_len..].iter().sum();
        assert_eq!(normal_sum, 0.0);
        assert_eq!(frightened_sum, state.ghosts.len() as f32);
    }

    #[test]
    fn test_tensor_shapes() {
        let layout = Layout::classic();
        let state = GameState::new(layout.clone());
        let obs = encode_state(&state);
        let device = default_device();

        let single = state_to_tensor::<InferenceBackend>(&obs, &device);
        assert_eq!(single.dims(), [1, state_dim(&layout)]);

        let batch = states_to_tensor::<InferenceBackend>(
            &[obs.clone(), obs.clone(), obs],
            state_dim(&layout),
            &device,
        );
        assert_eq!(batch.dims(), [3, state_dim(&layout)]);
    }
}
