use super::cell::{Cell, Direction};
use crate::error::{MazeError, Result};

/// An undirected pair of adjacent cells.
/// Candidate connections produced by [`Grid::connections`] always have `b` to the right of
/// or below `a`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Connection {
    pub a: Cell,
    pub b: Cell,
}

impl Connection {
    pub fn new(a: Cell, b: Cell) -> Self {
        Connection { a, b }
    }

    /// Direction of `b` as seen from `a`.
    ///
    /// # Panics
    /// If the two cells are not adjacent. Connections are only built from grid adjacencies.
    pub fn direction(&self) -> Direction {
        Direction::between(self.a, self.b).unwrap_or_else(|| {
            panic!("Connection {} -> {} joins non-adjacent cells", self.a, self.b)
        })
    }
}

/// A rectangular, 4-connected grid of cells with no wraparound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    width: u16,
    height: u16,
}

impl Grid {
    /// Creates a grid of `width` x `height` cells. Both dimensions must be at least 1.
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(MazeError::InvalidDimensions { width, height });
        }
        Ok(Grid { width, height })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Total number of cells in the grid.
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.width && cell.y < self.height
    }

    /// Row-major index of a cell, or `None` if the cell is out of bounds.
    pub fn index_of(&self, cell: Cell) -> Option<usize> {
        // Overflow-safe since width and height are u16 (assuming usize is at least 32 bits)
        self.contains(cell)
            .then(|| cell.y as usize * self.width as usize + cell.x as usize)
    }

    /// Inverse of [`Grid::index_of`].
    ///
    /// # Panics
    /// If `index` is not smaller than [`Grid::len`].
    pub fn cell_at(&self, index: usize) -> Cell {
        assert!(index < self.len(), "Cell index {} is out of bounds", index);
        let width = self.width as usize;
        Cell::new((index % width) as u16, (index / width) as u16)
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let (width, height) = (self.width, self.height);
        (0..height).flat_map(move |y| (0..width).map(move |x| Cell::new(x, y)))
    }

    /// In-bounds cells one step away in the cardinal directions.
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        let in_bounds = self.contains(cell);
        Direction::ALL
            .into_iter()
            .filter(move |_| in_bounds)
            .filter_map(move |direction| cell.step(direction))
            .filter(move |&c| self.contains(c))
    }

    /// Every adjacency of the grid exactly once, as a connection to the right or below.
    pub fn connections(&self) -> Vec<Connection> {
        self.cells()
            .flat_map(|cell| {
                // Cells order by x first, so only right and down neighbors compare greater
                self.neighbors(cell)
                    .filter(move |&next| next > cell)
                    .map(move |next| Connection::new(cell, next))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_zero_dimensions_rejected() {
        assert_eq!(
            Grid::new(0, 5),
            Err(MazeError::InvalidDimensions { width: 0, height: 5 })
        );
        assert_eq!(
            Grid::new(5, 0),
            Err(MazeError::InvalidDimensions { width: 5, height: 0 })
        );
        assert!(Grid::new(1, 1).is_ok());
    }

    #[test]
    fn test_index_round_trip() {
        let grid = Grid::new(4, 3).unwrap();
        assert_eq!(grid.len(), 12);
        assert_eq!(grid.index_of(Cell::new(3, 2)), Some(11));
        assert_eq!(grid.index_of(Cell::new(4, 0)), None);
        assert_eq!(grid.index_of(Cell::new(0, 3)), None);
        for (i, cell) in grid.cells().enumerate() {
            assert_eq!(grid.index_of(cell), Some(i));
            assert_eq!(grid.cell_at(i), cell);
        }
    }

    #[test]
    fn test_neighbors() {
        let grid = Grid::new(5, 5).unwrap();
        let corner = grid.neighbors(Cell::new(0, 0)).collect::<Vec<_>>();
        assert_eq!(corner, vec![Cell::new(1, 0), Cell::new(0, 1)]);
        let center = grid.neighbors(Cell::new(2, 2)).count();
        assert_eq!(center, 4);
        let edge = grid.neighbors(Cell::new(4, 2)).count();
        assert_eq!(edge, 3);
        // Out of bounds cells have no neighbors
        assert_eq!(grid.neighbors(Cell::new(5, 5)).count(), 0);
    }

    #[test]
    fn test_connections_follow_neighbors_right_then_down() {
        let grid = Grid::new(2, 2).unwrap();
        let connections = grid.connections();
        assert_eq!(
            connections,
            vec![
                Connection::new(Cell::new(0, 0), Cell::new(1, 0)),
                Connection::new(Cell::new(0, 0), Cell::new(0, 1)),
                Connection::new(Cell::new(1, 0), Cell::new(1, 1)),
                Connection::new(Cell::new(0, 1), Cell::new(1, 1)),
            ]
        );
    }

    #[test]
    fn test_connections_count_and_uniqueness() {
        for (width, height) in [(1, 1), (2, 1), (1, 7), (5, 5), (8, 3)] {
            let grid = Grid::new(width, height).unwrap();
            let connections = grid.connections();
            let (w, h) = (width as usize, height as usize);
            assert_eq!(connections.len(), (w - 1) * h + w * (h - 1));

            let mut seen = HashSet::new();
            for connection in &connections {
                assert!(grid.contains(connection.a) && grid.contains(connection.b));
                assert_eq!(connection.a.manhattan_distance(connection.b), 1);
                assert!(matches!(
                    connection.direction(),
                    Direction::Right | Direction::Down
                ));
                // Each adjacency appears once, in either orientation
                assert!(seen.insert((connection.a, connection.b)));
                assert!(!seen.contains(&(connection.b, connection.a)));
            }
        }
    }
}
