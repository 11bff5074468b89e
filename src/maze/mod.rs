pub mod cell;
pub mod grid;

use std::collections::VecDeque;

pub use cell::{Cell, Direction};
pub use grid::{Connection, Grid};

/// A maze carved into a [`Grid`]: for every cell, the list of cells directly reachable from it.
///
/// Mazes built by the generators are perfect, i.e. the adjacency forms a spanning tree.
/// The maze holds no search state, so any number of searches can run on the same maze.
#[derive(Debug, Clone)]
pub struct Maze {
    grid: Grid,
    /// Maze neighbors of each cell, indexed by the cell's row-major index
    adjacency: Box<[Vec<Cell>]>,
    /// Connections in the order they were carved
    connections: Vec<Connection>,
}

impl Maze {
    /// Creates a maze where every cell is walled off from its neighbors.
    pub fn new(grid: Grid) -> Self {
        Maze {
            grid,
            adjacency: vec![Vec::new(); grid.len()].into_boxed_slice(),
            connections: Vec::with_capacity(grid.len().saturating_sub(1)),
        }
    }

    /// Carves a passage between the two cells of `connection`, recording both directions.
    ///
    /// # Panics
    /// If either cell is out of bounds.
    pub fn connect(&mut self, connection: Connection) {
        let (Some(ia), Some(ib)) = (
            self.grid.index_of(connection.a),
            self.grid.index_of(connection.b),
        ) else {
            panic!(
                "Connection {} -> {} is out of bounds of the {}x{} grid",
                connection.a,
                connection.b,
                self.grid.width(),
                self.grid.height()
            );
        };
        self.adjacency[ia].push(connection.b);
        self.adjacency[ib].push(connection.a);
        self.connections.push(connection);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.grid.contains(cell)
    }

    /// Cells reachable from `cell` in one step. Empty for out of bounds cells.
    pub fn neighbors(&self, cell: Cell) -> &[Cell] {
        match self.grid.index_of(cell) {
            Some(i) => &self.adjacency[i],
            None => &[],
        }
    }

    pub fn connections(&self) -> &[Connection] {
        &self.connections
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Whether there is an open passage between two cells.
    pub fn is_connected(&self, a: Cell, b: Cell) -> bool {
        self.neighbors(a).contains(&b)
    }

    /// Breadth-first distances, in steps, from `from` to every cell.
    /// `None` marks unreachable cells.
    fn distances_from(&self, from: Cell) -> Vec<Option<usize>> {
        let mut distances = vec![None; self.grid.len()];
        let Some(start) = self.grid.index_of(from) else {
            return distances;
        };
        distances[start] = Some(0);
        let mut queue = VecDeque::from([from]);
        while let Some(cell) = queue.pop_front() {
            let Some(d) = self.grid.index_of(cell).and_then(|i| distances[i]) else {
                continue;
            };
            for &next in self.neighbors(cell) {
                if let Some(i) = self.grid.index_of(next)
                    && distances[i].is_none()
                {
                    distances[i] = Some(d + 1);
                    queue.push_back(next);
                }
            }
        }
        distances
    }

    /// Number of steps on the maze path between two cells, found by a plain BFS.
    /// Returns `None` if either cell is outside the maze or they are not connected.
    pub fn tree_distance(&self, a: Cell, b: Cell) -> Option<usize> {
        let i = self.grid.index_of(b)?;
        self.distances_from(a)[i]
    }

    /// A perfect maze is a spanning tree: `cells - 1` connections and every cell reachable.
    pub fn is_perfect(&self) -> bool {
        if self.connections.len() + 1 != self.grid.len() {
            return false;
        }
        self.distances_from(Cell::new(0, 0))
            .iter()
            .all(Option::is_some)
    }
}
