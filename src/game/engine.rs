use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    layout::Layout,
    state::{GameState, Ghost, GhostMode, Position},
};

/// Why an episode ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerminationReason {
    /// Player was caught by a non-frightened ghost
    Caught,
    /// Every pellet was consumed
    Cleared,
    /// The step limit was reached
    TimedOut,
}

/// Information about a step
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Whether the player ate a pellet this step
    pub pellet_eaten: bool,
    /// Whether the player ate a power pellet this step
    pub power_pellet_eaten: bool,
    /// Number of frightened ghosts eaten this step
    pub ghosts_eaten: usize,
    /// Set when this step ended the episode
    pub termination: Option<TerminationReason>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step (for RL training)
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// Owns the only source of randomness in the simulation (frightened ghost
/// movement). The RNG is reseeded on every reset, so episodes are
/// reproducible given a seed.
pub struct GameEngine {
    config: GameConfig,
    layout: Layout,
    seed: u64,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration, maze, and seed
    ///
    /// Panics on an invalid configuration; a zero timing constant would
    /// corrupt the tick arithmetic.
    pub fn new(config: GameConfig, layout: Layout, seed: u64) -> Self {
        config.validate().expect("invalid game configuration");
        Self {
            config,
            layout,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Reset the game to the session's fixed starting layout
    pub fn reset(&mut self) -> GameState {
        self.rng = StdRng::seed_from_u64(self.seed);
        GameState::new(self.layout.clone())
    }

    /// Change the seed used by subsequent resets
    pub fn set_seed(&mut self, seed: u64) {
        self.seed = seed;
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Execute one tick of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if state.game_over {
            return StepResult {
                reward: 0.0,
                terminated: true,
                info: StepInfo::default(),
            };
        }

        let mut reward = self.config.step_penalty;
        let mut info = StepInfo::default();

        // Advance ghost modes: frightened timers count down, everyone else
        // follows the scatter/chase phase for the current tick.
        let phase = phase_mode(state.steps, self.config.mode_switch_interval);
        for ghost in &mut state.ghosts {
            ghost.mode = match ghost.mode {
                GhostMode::Frightened { remaining } if remaining > 1 => GhostMode::Frightened {
                    remaining: remaining - 1,
                },
                _ => phase,
            };
        }

        // Player movement: a request into a wall leaves the position
        // unchanged, with no penalty beyond the step cost.
        let (dx, dy) = action.delta();
        let target = state.player.moved_by(dx, dy);
        if state.is_walkable(target) {
            state.player = target;
        }

        let mut caught = self.resolve_collisions(state, &mut reward, &mut info);

        // Consume whatever sits on the player's cell
        if state.pellets.remove(&state.player) {
            reward += self.config.pellet_reward;
            state.score += self.config.pellet_reward as u32;
            info.pellet_eaten = true;
        }
        if state.power_pellets.remove(&state.player) {
            reward += self.config.power_pellet_reward;
            state.score += self.config.power_pellet_reward as u32;
            info.power_pellet_eaten = true;
            for ghost in &mut state.ghosts {
                ghost.mode = GhostMode::Frightened {
                    remaining: self.config.frightened_duration,
                };
            }
        }

        if !caught {
            for i in 0..state.ghosts.len() {
                let ghost = state.ghosts[i];
                state.ghosts[i].position = self.ghost_step(state, ghost);
            }
            caught = self.resolve_collisions(state, &mut reward, &mut info);
        }

        state.steps += 1;

        let termination = if caught {
            reward += self.config.death_penalty;
            Some(TerminationReason::Caught)
        } else if state.is_cleared() {
            reward += self.config.win_bonus;
            Some(TerminationReason::Cleared)
        } else if state.steps >= self.config.max_steps {
            reward += self.config.timeout_penalty;
            Some(TerminationReason::TimedOut)
        } else {
            None
        };

        if termination.is_some() {
            state.game_over = true;
        }
        info.termination = termination;

        StepResult {
            reward,
            terminated: state.game_over,
            info,
        }
    }

    /// Resolve ghost/player co-occupancy. Frightened ghosts are eaten and
    /// sent back to their start cell; any other ghost catches the player.
    fn resolve_collisions(
        &self,
        state: &mut GameState,
        reward: &mut f32,
        info: &mut StepInfo,
    ) -> bool {
        let mut caught = false;
        let phase = phase_mode(state.steps, self.config.mode_switch_interval);
        let player = state.player;

        for ghost in &mut state.ghosts {
            if ghost.position != player {
                continue;
            }
            if ghost.mode.is_frightened() {
                *reward += self.config.ghost_reward;
                state.score += self.config.ghost_reward as u32;
                info.ghosts_eaten += 1;
                ghost.position = ghost.start;
                ghost.mode = phase;
            } else {
                caught = true;
            }
        }

        caught
    }

    /// Compute the next cell for a ghost.
    ///
    /// Chase and scatter greedily minimize Manhattan distance to their
    /// target (ties broken in fixed Up/Down/Left/Right order); frightened
    /// ghosts pick a uniformly random walkable neighbor. A fully boxed-in
    /// ghost stays put.
    fn ghost_step(&mut self, state: &GameState, ghost: Ghost) -> Position {
        let neighbors: Vec<Position> = Direction::ALL
            .iter()
            .map(|d| {
                let (dx, dy) = d.delta();
                ghost.position.moved_by(dx, dy)
            })
            .filter(|&pos| state.is_walkable(pos))
            .collect();

        if neighbors.is_empty() {
            return ghost.position;
        }

        match ghost.mode {
            GhostMode::Frightened { .. } => neighbors[self.rng.gen_range(0..neighbors.len())],
            GhostMode::Chase => nearest_to(&neighbors, state.player),
            GhostMode::Scatter => nearest_to(&neighbors, ghost.home_corner),
        }
    }
}

/// Scatter/chase phase for a given tick count
fn phase_mode(steps: u32, interval: u32) -> GhostMode {
    if (steps / interval) % 2 == 0 {
        GhostMode::Scatter
    } else {
        GhostMode::Chase
    }
}

/// First candidate with minimal Manhattan distance to the target
fn nearest_to(candidates: &[Position], target: Position) -> Position {
    let mut best = candidates[0];
    let mut best_distance = best.manhattan_distance(target);
    for &pos in &candidates[1..] {
        let distance = pos.manhattan_distance(target);
        if distance < best_distance {
            best = pos;
            best_distance = distance;
        }
    }
    best
}
