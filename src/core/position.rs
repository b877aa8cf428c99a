//! Board coordinates and line geometry.
//!
//! `Position` is a plain value pair: structural equality, no identity.
//! Units that are not on the board report the `OFF_BOARD` sentinel rather
//! than an `Option`, matching the permissive query posture of the rest of
//! the engine.
//!
//! `LineDir` is the directional predicate behind blast attacks: given an
//! origin and a direction, it answers "does this tile share that exact
//! horizontal or vertical ray?".

use serde::{Deserialize, Serialize};

use super::board::Board;

/// A 2D integer board coordinate.
///
/// Value-equality, not identity. Arithmetic never clamps to board bounds;
/// use [`Position::is_on_board`] (or [`Board::in_bounds`]) to test.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Sentinel position reported for units that are not on any board.
    pub const OFF_BOARD: Position = Position::new(-1, -1);

    /// Create a position.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Component-wise difference `self - other`.
    #[must_use]
    pub const fn diff(self, other: Position) -> Position {
        Position::new(self.x - other.x, self.y - other.y)
    }

    /// Component-wise sum.
    #[must_use]
    pub const fn add(self, other: Position) -> Position {
        Position::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise absolute value.
    #[must_use]
    pub const fn abs(self) -> Position {
        Position::new(self.x.abs(), self.y.abs())
    }

    /// Chebyshev distance to another position (max of |Δx|, |Δy|).
    ///
    /// Adjacency in this game is 8-directional: two units are "near" when
    /// their Chebyshev distance is exactly 1.
    #[must_use]
    pub const fn chebyshev(self, other: Position) -> i32 {
        let d = self.diff(other).abs();
        if d.x > d.y {
            d.x
        } else {
            d.y
        }
    }

    /// Whether this position lies within a board's dimensions.
    #[must_use]
    pub fn is_on_board(self, board: &Board) -> bool {
        board.in_bounds(self)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the four orthogonal ray directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LineDir {
    North,
    South,
    East,
    West,
}

impl LineDir {
    /// Whether `p` lies on the ray from `origin` in this direction.
    ///
    /// The origin itself is never on the ray.
    #[must_use]
    pub fn contains(self, origin: Position, p: Position) -> bool {
        line_between(origin, p) == Some(self)
    }
}

/// The orthogonal direction from `from` to `to`, if they are inline.
///
/// Two positions are inline iff they share exactly one axis: Δx = 0 with
/// Δy ≠ 0, or Δy = 0 with Δx ≠ 0. The same tile is not inline with itself.
#[must_use]
pub fn line_between(from: Position, to: Position) -> Option<LineDir> {
    let d = to.diff(from);
    match (d.x, d.y) {
        (0, y) if y > 0 => Some(LineDir::North),
        (0, y) if y < 0 => Some(LineDir::South),
        (x, 0) if x > 0 => Some(LineDir::East),
        (x, 0) if x < 0 => Some(LineDir::West),
        _ => None,
    }
}
