use std::{cmp::Reverse, collections::BinaryHeap};

use super::{endpoint_indices, reconstruct_path};
use crate::{
    error::{MazeError, Result},
    events::MazeObserver,
    maze::{Cell, Maze},
};

/// A frontier entry. Ordered by priority first, then by cell index so ties pop deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct FrontierEntry {
    priority: usize,
    index: usize,
}

/// Greedy best-first search ordered by Manhattan distance to `end`.
///
/// The first cell to discover a neighbor becomes its predecessor. With unit step costs and
/// exactly one path between any two cells of a perfect maze, the walk back from `end` is
/// the maze path itself. On graphs with cycles this gives no shortest path guarantee.
///
/// Each expanded cell is reported once, and each cell of the final path in start to end order.
pub fn solve_best_first<O: MazeObserver + ?Sized>(
    maze: &Maze,
    start: Cell,
    end: Cell,
    observer: &mut O,
) -> Result<Vec<Cell>> {
    let (start_idx, end_idx) = endpoint_indices(maze, start, end)?;
    tracing::info!("[solver] best-first search from {} to {}", start, end);
    observer.on_search_started(start, end);

    let grid = maze.grid();
    // Search state is scoped to this call so repeated searches never see stale marks
    let mut visited = vec![false; grid.len()];
    let mut came_from: Vec<Option<usize>> = vec![None; grid.len()];

    // Using Reverse to turn the max-heap into a min-heap
    let mut frontier = BinaryHeap::new();
    frontier.push(Reverse(FrontierEntry {
        priority: start.manhattan_distance(end),
        index: start_idx,
    }));

    let mut expanded = 0usize;
    loop {
        if observer.on_cancel_requested() {
            tracing::warn!("[solver] cancelled after expanding {} cells", expanded);
            return Err(MazeError::Cancelled);
        }

        let Some(Reverse(FrontierEntry { index: ci, .. })) = frontier.pop() else {
            tracing::warn!("[solver] frontier exhausted before reaching {}", end);
            return Err(MazeError::NoPathFound { start, end });
        };

        // Skip stale entries
        if visited[ci] {
            continue;
        }

        if ci == end_idx {
            let path = reconstruct_path(maze, &came_from, start_idx, end_idx, observer);
            tracing::info!(
                "[solver] reached {} after expanding {} cells, path has {} cells",
                end,
                expanded,
                path.len()
            );
            return Ok(path);
        }

        let current = grid.cell_at(ci);
        observer.on_cell_expanded(current);
        expanded += 1;

        for &neighbor in maze.neighbors(current) {
            let Some(ni) = grid.index_of(neighbor) else {
                continue;
            };
            if visited[ni] {
                continue;
            }
            // First discovery wins
            if came_from[ni].is_none() && ni != start_idx {
                came_from[ni] = Some(ci);
            }
            frontier.push(Reverse(FrontierEntry {
                priority: neighbor.manhattan_distance(end),
                index: ni,
            }));
        }
        visited[ci] = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        events::{EventRecorder, MazeEvent},
        generators::generate_maze,
        maze::{Connection, Grid},
        solvers::tests::assert_valid_path,
    };

    #[test]
    fn test_frontier_entry_order() {
        let mut heap = BinaryHeap::new();
        for (priority, index) in [(3, 0), (1, 9), (1, 2), (2, 5)] {
            heap.push(Reverse(FrontierEntry { priority, index }));
        }
        let order = std::iter::from_fn(|| heap.pop())
            .map(|Reverse(e)| (e.priority, e.index))
            .collect::<Vec<_>>();
        assert_eq!(order, vec![(1, 2), (1, 9), (2, 5), (3, 0)]);
    }

    #[test]
    fn test_single_cell_maze() {
        let maze = generate_maze(1, 1, Some(0), &mut ()).unwrap();
        let path = solve_best_first(&maze, Cell::new(0, 0), Cell::new(0, 0), &mut ()).unwrap();
        assert_eq!(path, vec![Cell::new(0, 0)]);
    }

    #[test]
    fn test_two_cell_maze() {
        let maze = generate_maze(2, 1, Some(0), &mut ()).unwrap();
        let path = solve_best_first(&maze, Cell::new(0, 0), Cell::new(1, 0), &mut ()).unwrap();
        assert_eq!(path, vec![Cell::new(0, 0), Cell::new(1, 0)]);
    }

    #[test]
    fn test_five_by_five_corner_to_corner() {
        for seed in 0..20 {
            let maze = generate_maze(5, 5, Some(seed), &mut ()).unwrap();
            let (start, end) = (Cell::new(0, 0), Cell::new(4, 4));
            let path = solve_best_first(&maze, start, end, &mut ()).unwrap();
            assert_valid_path(&maze, &path, start, end);
        }
    }

    #[test]
    fn test_always_finds_path_in_perfect_maze() {
        for seed in 0..10 {
            let maze = generate_maze(23, 17, Some(seed), &mut ()).unwrap();
            let start = Cell::new((seed * 3 % 23) as u16, (seed * 5 % 17) as u16);
            let end = Cell::new(22 - (seed % 23) as u16, 16 - (seed * 2 % 17) as u16);
            let path = solve_best_first(&maze, start, end, &mut ()).unwrap();
            assert_valid_path(&maze, &path, start, end);
        }
    }

    #[test]
    fn test_greedy_order_follows_heuristic() {
        // A straight corridor with a side branch pointing away from the goal:
        // (0,1) - (1,1) - (2,1) - (3,1), with (1,0) hanging off (1,1)
        let mut maze = Maze::new(Grid::new(4, 2).unwrap());
        for connection in [
            Connection::new(Cell::new(0, 1), Cell::new(1, 1)),
            Connection::new(Cell::new(1, 0), Cell::new(1, 1)),
            Connection::new(Cell::new(1, 1), Cell::new(2, 1)),
            Connection::new(Cell::new(2, 1), Cell::new(3, 1)),
            Connection::new(Cell::new(0, 0), Cell::new(1, 0)),
            Connection::new(Cell::new(2, 0), Cell::new(3, 0)),
            Connection::new(Cell::new(3, 0), Cell::new(3, 1)),
        ] {
            maze.connect(connection);
        }
        let mut recorder = EventRecorder::new();
        let path =
            solve_best_first(&maze, Cell::new(0, 1), Cell::new(3, 1), &mut recorder).unwrap();
        assert_eq!(
            path,
            vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1), Cell::new(3, 1)]
        );
        // The branch towards (1,0) is never expanded since the corridor is always closer
        assert_eq!(
            recorder.expanded_cells().collect::<Vec<_>>(),
            vec![Cell::new(0, 1), Cell::new(1, 1), Cell::new(2, 1)]
        );
        assert_eq!(
            recorder.events.first(),
            Some(&MazeEvent::SearchStarted {
                start: Cell::new(0, 1),
                end: Cell::new(3, 1)
            })
        );
    }

    #[test]
    fn test_cells_expanded_at_most_once() {
        let maze = generate_maze(15, 15, Some(8), &mut ()).unwrap();
        let mut recorder = EventRecorder::new();
        solve_best_first(&maze, Cell::new(14, 0), Cell::new(0, 14), &mut recorder).unwrap();
        let expanded = recorder.expanded_cells().collect::<Vec<_>>();
        let unique = expanded.iter().collect::<std::collections::HashSet<_>>();
        assert_eq!(unique.len(), expanded.len());
        assert!(!expanded.contains(&Cell::new(0, 14)));
    }

    #[test]
    fn test_repeated_searches_do_not_interfere() {
        let maze = generate_maze(9, 9, Some(2), &mut ()).unwrap();
        let first = solve_best_first(&maze, Cell::new(0, 0), Cell::new(8, 8), &mut ()).unwrap();
        let _ = solve_best_first(&maze, Cell::new(8, 0), Cell::new(0, 8), &mut ()).unwrap();
        let again = solve_best_first(&maze, Cell::new(0, 0), Cell::new(8, 8), &mut ()).unwrap();
        assert_eq!(first, again);
    }

    #[test]
    fn test_cancellation() {
        let maze = generate_maze(10, 10, Some(4), &mut ()).unwrap();
        let mut recorder = EventRecorder::cancel_after(3);
        let result = solve_best_first(&maze, Cell::new(0, 0), Cell::new(9, 9), &mut recorder);
        assert_eq!(result, Err(MazeError::Cancelled));
        assert!(recorder.expanded_cells().count() <= 3);
        assert_eq!(recorder.path_cells().count(), 0);
    }
}
