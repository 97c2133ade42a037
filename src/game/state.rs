use std::collections::BTreeSet;

use super::layout::Layout;

/// A position on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Manhattan distance to another position
    pub fn manhattan_distance(&self, other: Position) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }
}

/// Movement mode of a ghost
///
/// Modeled as a tagged variant: behavior is selected by a pure function of
/// (mode, ghost position, player position, grid) in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GhostMode {
    /// Head toward the player
    Chase,
    /// Head toward the ghost's home corner
    Scatter,
    /// Vulnerable: wander randomly for the remaining ticks
    Frightened { remaining: u32 },
}

impl GhostMode {
    pub fn is_frightened(&self) -> bool {
        matches!(self, GhostMode::Frightened { .. })
    }
}

/// An adversary in the maze
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ghost {
    /// Current cell
    pub position: Position,
    /// Cell the ghost starts on and returns to when eaten
    pub start: Position,
    /// Scatter target corner
    pub home_corner: Position,
    /// Current movement mode
    pub mode: GhostMode,
}

/// Complete game state
///
/// Invariants: the player and every ghost always occupy a walkable cell;
/// pellet sets only shrink within an episode; `game_over`, once set, is
/// only cleared by a fresh reset.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub layout: Layout,
    pub player: Position,
    pub ghosts: Vec<Ghost>,
    pub pellets: BTreeSet<Position>,
    pub power_pellets: BTreeSet<Position>,
    pub score: u32,
    pub steps: u32,
    pub game_over: bool,
}

impl GameState {
    /// Build the starting state for a layout: player and ghosts on their
    /// start cells, full pellet set, zeroed counters
    pub fn new(layout: Layout) -> Self {
        let player = layout.player_start();
        let ghosts = layout
            .ghost_starts()
            .iter()
            .enumerate()
            .map(|(i, &start)| Ghost {
                position: start,
                start,
                home_corner: layout.home_corner(i),
                mode: GhostMode::Scatter,
            })
            .collect();
        let pellets = layout.pellets().iter().copied().collect();
        let power_pellets = layout.power_pellets().iter().copied().collect();

        Self {
            layout,
            player,
            ghosts,
            pellets,
            power_pellets,
            score: 0,
            steps: 0,
            game_over: false,
        }
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        self.layout.in_bounds(pos)
    }

    /// Check if a position is a wall cell
    pub fn is_wall(&self, pos: Position) -> bool {
        self.layout.is_wall(pos)
    }

    /// Check if a position can be occupied
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.layout.is_walkable(pos)
    }

    /// Number of pellets (of both kinds) still on the board
    pub fn pellets_remaining(&self) -> usize {
        self.pellets.len() + self.power_pellets.len()
    }

    /// True once every pellet has been consumed
    pub fn is_cleared(&self) -> bool {
        self.pellets.is_empty() && self.power_pellets.is_empty()
    }
}
