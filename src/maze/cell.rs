use std::fmt;

/// A cell of the maze, identified purely by its coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
}

impl Cell {
    pub const fn new(x: u16, y: u16) -> Self {
        Cell { x, y }
    }

    /// Number of single steps between two cells on a 4-connected grid, ignoring walls.
    pub fn manhattan_distance(self, other: Cell) -> usize {
        self.x.abs_diff(other.x) as usize + self.y.abs_diff(other.y) as usize
    }

    /// The cell one step away in `direction`, or `None` if that would leave the `u16` range.
    /// Bounds of an actual grid are checked by the grid, not here.
    pub fn step(self, direction: Direction) -> Option<Cell> {
        let (x, y) = (self.x, self.y);
        match direction {
            Direction::Right => x.checked_add(1).map(|x| Cell::new(x, y)),
            Direction::Down => y.checked_add(1).map(|y| Cell::new(x, y)),
            Direction::Left => x.checked_sub(1).map(|x| Cell::new(x, y)),
            Direction::Up => y.checked_sub(1).map(|y| Cell::new(x, y)),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Relative position of one cell as seen from an adjacent one.
/// `y` grows downwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Right,
    Down,
    Left,
    Up,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::Left,
        Direction::Up,
    ];

    /// Direction of `to` as seen from `from`.
    /// Returns `None` if the two cells are not exactly one step apart.
    pub fn between(from: Cell, to: Cell) -> Option<Direction> {
        if from.manhattan_distance(to) != 1 {
            return None;
        }
        let direction = if to.x > from.x {
            Direction::Right
        } else if to.x < from.x {
            Direction::Left
        } else if to.y > from.y {
            Direction::Down
        } else {
            Direction::Up
        };
        Some(direction)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan_distance() {
        assert_eq!(Cell::new(0, 0).manhattan_distance(Cell::new(4, 4)), 8);
        assert_eq!(Cell::new(3, 1).manhattan_distance(Cell::new(1, 2)), 3);
        assert_eq!(Cell::new(2, 2).manhattan_distance(Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_direction_between() {
        let c = Cell::new(1, 1);
        assert_eq!(Direction::between(c, Cell::new(2, 1)), Some(Direction::Right));
        assert_eq!(Direction::between(c, Cell::new(0, 1)), Some(Direction::Left));
        assert_eq!(Direction::between(c, Cell::new(1, 2)), Some(Direction::Down));
        assert_eq!(Direction::between(c, Cell::new(1, 0)), Some(Direction::Up));
        // Diagonal and distant cells are not adjacent
        assert_eq!(Direction::between(c, Cell::new(2, 2)), None);
        assert_eq!(Direction::between(c, Cell::new(3, 1)), None);
        assert_eq!(Direction::between(c, c), None);
    }

    #[test]
    fn test_step_is_overflow_safe() {
        assert_eq!(Cell::new(0, 0).step(Direction::Left), None);
        assert_eq!(Cell::new(0, 0).step(Direction::Up), None);
        assert_eq!(Cell::new(u16::MAX, 0).step(Direction::Right), None);
        assert_eq!(Cell::new(0, 0).step(Direction::Down), Some(Cell::new(0, 1)));
        for direction in Direction::ALL {
            let next = Cell::new(5, 5).step(direction).unwrap();
            assert_eq!(Direction::between(Cell::new(5, 5), next), Some(direction));
        }
    }
}
