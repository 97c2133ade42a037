use super::state::Position;

/// The built-in session maze.
///
/// Glyphs: `#` wall, `.` pellet, `o` power pellet, `P` player start,
/// `G` ghost start, space empty corridor.
const CLASSIC_LAYOUT: &str = "\
###################
#........#........#
#o##.###.#.###.##o#
#.................#
#.##.#.#####.#.##.#
#....#...#...#....#
####.###.#.###.####
#....#.G.G.G.#....#
#.##.#.#####.#.##.#
#........P........#
#o##.###.#.###.##o#
#.................#
###################";

/// Errors produced while parsing a maze layout
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    #[error("layout has no rows")]
    Empty,

    #[error("row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("layout has no player start cell")]
    MissingPlayerStart,

    #[error("layout has more than one player start cell")]
    MultiplePlayerStarts,

    #[error("unknown layout glyph '{0}'")]
    UnknownGlyph(char),
}

/// A fixed maze layout: wall grid, pellet cells, and start cells.
///
/// The layout never changes during a session; each episode is rebuilt from
/// it by `GameEngine::reset`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    width: usize,
    height: usize,
    walls: Vec<bool>,
    pellets: Vec<Position>,
    power_pellets: Vec<Position>,
    player_start: Position,
    ghost_starts: Vec<Position>,
}

impl Layout {
    /// Parse a layout from its textual representation
    pub fn parse(text: &str) -> Result<Self, LayoutError> {
        let rows: Vec<&str> = text.lines().collect();
        if rows.is_empty() {
            return Err(LayoutError::Empty);
        }

        let width = rows[0].chars().count();
        let height = rows.len();

        let mut walls = vec![false; width * height];
        let mut pellets = Vec::new();
        let mut power_pellets = Vec::new();
        let mut player_start = None;
        let mut ghost_starts = Vec::new();

        for (y, row) in rows.iter().enumerate() {
            let row_width = row.chars().count();
            if row_width != width {
                return Err(LayoutError::RaggedRow {
                    row: y,
                    found: row_width,
                    expected: width,
                });
            }

            for (x, glyph) in row.chars().enumerate() {
                let pos = Position::new(x as i32, y as i32);
                match glyph {
                    '#' => walls[y * width + x] = true,
                    '.' => pellets.push(pos),
                    'o' => power_pellets.push(pos),
                    'P' => {
                        if player_start.replace(pos).is_some() {
                            return Err(LayoutError::MultiplePlayerStarts);
                        }
                    }
                    'G' => ghost_starts.push(pos),
                    ' ' => {}
                    other => return Err(LayoutError::UnknownGlyph(other)),
                }
            }
        }

        let player_start = player_start.ok_or(LayoutError::MissingPlayerStart)?;

        Ok(Self {
            width,
            height,
            walls,
            pellets,
            power_pellets,
            player_start,
            ghost_starts,
        })
    }

    /// The built-in maze used by the default session
    pub fn classic() -> Self {
        Self::parse(CLASSIC_LAYOUT).expect("built-in layout is valid")
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Check if a position is within the grid bounds
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Check if a position is a wall cell (out-of-bounds counts as wall)
    pub fn is_wall(&self, pos: Position) -> bool {
        if !self.in_bounds(pos) {
            return true;
        }
        self.walls[pos.y as usize * self.width + pos.x as usize]
    }

    /// Check if a position can be occupied by the player or a ghost
    pub fn is_walkable(&self, pos: Position) -> bool {
        self.in_bounds(pos) && !self.is_wall(pos)
    }

    pub fn pellets(&self) -> &[Position] {
        &self.pellets
    }

    pub fn power_pellets(&self) -> &[Position] {
        &self.power_pellets
    }

    pub fn player_start(&self) -> Position {
        self.player_start
    }

    pub fn ghost_starts(&self) -> &[Position] {
        &self.ghost_starts
    }

    /// Scatter target for the ghost at `index`, cycling through the four
    /// grid corners
    pub fn home_corner(&self, index: usize) -> Position {
        let corners = [
            Position::new(1, 1),
            Position::new(self.width as i32 - 2, 1),
            Position::new(1, self.height as i32 - 2),
            Position::new(self.width as i32 - 2, self.height as i32 - 2),
        ];
        corners[index % corners.len()]
    }
}
