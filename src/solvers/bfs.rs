use std::collections::VecDeque;

use super::{endpoint_indices, reconstruct_path};
use crate::{
    error::{MazeError, Result},
    events::MazeObserver,
    maze::{Cell, Maze},
};

/// Breadth-first search. Finds a path with the fewest steps on any maze, perfect or not.
pub fn solve_bfs<O: MazeObserver + ?Sized>(
    maze: &Maze,
    start: Cell,
    end: Cell,
    observer: &mut O,
) -> Result<Vec<Cell>> {
    let (start_idx, end_idx) = endpoint_indices(maze, start, end)?;
    tracing::info!("[solver] breadth-first search from {} to {}", start, end);
    observer.on_search_started(start, end);

    let grid = maze.grid();
    let mut discovered = vec![false; grid.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];
    discovered[start_idx] = true;

    let mut queue = VecDeque::from([start_idx]);
    loop {
        if observer.on_cancel_requested() {
            tracing::warn!("[solver] breadth-first search cancelled");
            return Err(MazeError::Cancelled);
        }

        let Some(ci) = queue.pop_front() else {
            tracing::warn!("[solver] queue exhausted before reaching {}", end);
            return Err(MazeError::NoPathFound { start, end });
        };

        if ci == end_idx {
            return Ok(reconstruct_path(maze, &came_from, start_idx, end_idx, observer));
        }

        let current = grid.cell_at(ci);
        observer.on_cell_expanded(current);

        for &neighbor in maze.neighbors(current) {
            if let Some(ni) = grid.index_of(neighbor)
                && !discovered[ni]
            {
                discovered[ni] = true;
                came_from[ni] = Some(ci);
                queue.push_back(ni);
            }
        }
    }
}
