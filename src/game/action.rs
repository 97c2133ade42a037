/// Direction the player can move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// All directions in their fixed tie-break order
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Returns the delta (dx, dy) for moving in this direction
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

/// Action that can be taken in the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Move in a specific direction
    Move(Direction),
    /// Stay on the current cell
    Stay,
}

impl Action {
    /// Number of discrete actions
    pub const COUNT: usize = 5;

    /// Decode a discrete action index.
    ///
    /// Panics on an out-of-range index: an invalid action is a programming
    /// error in the caller, not something to silently ignore.
    pub fn from_index(idx: usize) -> Self {
        match idx {
            0 => Action::Move(Direction::Up),
            1 => Action::Move(Direction::Down),
            2 => Action::Move(Direction::Left),
            3 => Action::Move(Direction::Right),
            4 => Action::Stay,
            _ => panic!("invalid action index {idx} (actions are 0..{})", Self::COUNT),
        }
    }

    /// The discrete index of this action
    pub fn index(&self) -> usize {
        match self {
            Action::Move(Direction::Up) => 0,
            Action::Move(Direction::Down) => 1,
            Action::Move(Direction::Left) => 2,
            Action::Move(Direction::Right) => 3,
            Action::Stay => 4,
        }
    }

    /// Returns the movement delta (dx, dy) for this action
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Action::Move(direction) => direction.delta(),
            Action::Stay => (0, 0),
        }
    }
}

impl From<Direction> for Action {
    fn from(direction: Direction) -> Self {
        Action::Move(direction)
    }
}
