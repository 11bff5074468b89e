mod best_first;
mod bfs;

use crate::{
    error::{MazeError, Result},
    events::MazeObserver,
    maze::{Cell, Maze},
};
pub use best_first::solve_best_first;
pub use bfs::solve_bfs;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Solver {
    /// Frontier ordered by Manhattan distance to the goal
    #[default]
    BestFirst,
    /// Frontier in discovery order
    Bfs,
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::BestFirst => write!(f, "Greedy Best-First Search"),
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
        }
    }
}

/// Finds the path from `start` to `end`, both included, with the chosen solver.
pub fn solve_maze<O: MazeObserver + ?Sized>(
    maze: &Maze,
    solver: Solver,
    start: Cell,
    end: Cell,
    observer: &mut O,
) -> Result<Vec<Cell>> {
    match solver {
        Solver::BestFirst => solve_best_first(maze, start, end, observer),
        Solver::Bfs => solve_bfs(maze, start, end, observer),
    }
}

/// Resolves both endpoints to cell indices, failing with the matching error kind.
fn endpoint_indices(maze: &Maze, start: Cell, end: Cell) -> Result<(usize, usize)> {
    let start_idx = maze
        .grid()
        .index_of(start)
        .ok_or(MazeError::StartNotFound(start))?;
    let end_idx = maze
        .grid()
        .index_of(end)
        .ok_or(MazeError::EndNotFound(end))?;
    Ok((start_idx, end_idx))
}

/// Walks the predecessor map back from the goal, then reports the path from start to goal.
///
/// # Panics
/// If a cell on the way back has no predecessor. Every discovered cell gets one before it
/// enters the frontier.
fn reconstruct_path<O: MazeObserver + ?Sized>(
    maze: &Maze,
    came_from: &[Option<usize>],
    start_idx: usize,
    goal_idx: usize,
    observer: &mut O,
) -> Vec<Cell> {
    let mut path = vec![maze.grid().cell_at(goal_idx)];
    let mut ci = goal_idx;
    while ci != start_idx {
        ci = match came_from[ci] {
            Some(parent) => parent,
            None => panic!(
                "cell {} was reached without a predecessor",
                maze.grid().cell_at(ci)
            ),
        };
        path.push(maze.grid().cell_at(ci));
    }
    path.reverse();

    for (index, &cell) in path.iter().enumerate() {
        observer.on_path_cell(cell, index);
    }
    path
}
