use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{EnumCount, EnumIter, FromRepr, VariantArray};

/// A cell coordinate as `(column, row)`
///
/// Signed so that a move off the edge of the grid is still representable and can be
/// rejected with [`Grid::is_in_bounds`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The coordinate one cell away in the direction of `action`
    ///
    /// No clamping is applied, the result may lie outside the grid.
    pub fn step(self, action: Action) -> Self {
        let (dx, dy) = action.delta();
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Euclidean distance to `other` in continuous space
    pub fn distance(self, other: Coord) -> f32 {
        let dx = (other.x - self.x) as f32;
        let dy = (other.y - self.y) as f32;
        (dx * dx + dy * dy).sqrt()
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// The four moves available in every cell
///
/// The declaration order is the table index order and the tie-breaking order for
/// greedy lookups.
#[derive(
    EnumIter,
    VariantArray,
    EnumCount,
    FromRepr,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Default,
    Serialize,
    Deserialize,
)]
pub enum Action {
    #[default]
    Up = 0,
    Down = 1,
    Left = 2,
    Right = 3,
}

impl Action {
    /// Index of the action in a q-table row
    pub const fn index(self) -> usize {
        self as usize
    }

    const fn delta(self) -> (i32, i32) {
        match self {
            Action::Up => (0, -1),
            Action::Down => (0, 1),
            Action::Left => (-1, 0),
            Action::Right => (1, 0),
        }
    }
}

/// Square grid topology of side `size`
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Grid {
    size: usize,
}

impl Grid {
    pub const fn new(size: usize) -> Self {
        Self { size }
    }

    pub const fn size(&self) -> usize {
        self.size
    }

    pub fn is_in_bounds(&self, coord: Coord) -> bool {
        let n = self.size as i64;
        (0..n).contains(&(coord.x as i64)) && (0..n).contains(&(coord.y as i64))
    }

    /// Every in-bounds coordinate, `x` major then `y`
    pub fn cells(&self) -> impl Iterator<Item = Coord> {
        let n = self.size as i32;
        (0..n).flat_map(move |x| (0..n).map(move |y| Coord::new(x, y)))
    }
}
