use rand::{Rng, seq::SliceRandom};

use super::union_find::DisjointSet;
use crate::{
    error::{MazeError, Result},
    events::MazeObserver,
    maze::{Grid, Maze},
};

/// Carves a perfect maze into `grid` with randomized Kruskal's algorithm.
///
/// Every grid adjacency is shuffled and taken in turn; it becomes a passage if its two
/// cells are not yet connected. The loop stops as soon as `cells - 1` passages exist.
/// Cancellation is polled at the top of every iteration, and a cancelled run yields no maze.
///
/// # Panics
/// If the candidates run out before the spanning tree is complete, which cannot happen on a
/// rectangular 4-connected grid.
pub fn randomized_kruskal<R, O>(grid: Grid, rng: &mut R, observer: &mut O) -> Result<Maze>
where
    R: Rng + ?Sized,
    O: MazeObserver + ?Sized,
{
    let total_cells = grid.len();
    let target = total_cells - 1;
    tracing::info!(
        "[kruskal] generating {}x{} maze ({} connections to carve)",
        grid.width(),
        grid.height(),
        target
    );

    observer.on_grid_init(grid.width(), grid.height());

    let mut maze = Maze::new(grid);
    let mut groups = DisjointSet::new(total_cells);

    // Shuffling stands in for random weights followed by a sort
    let mut candidates = grid.connections();
    candidates.shuffle(rng);
    let mut candidates = candidates.into_iter();

    let mut rejected = 0usize;
    while maze.connection_count() < target {
        if observer.on_cancel_requested() {
            tracing::warn!(
                "[kruskal] cancelled after carving {} of {} connections",
                maze.connection_count(),
                target
            );
            return Err(MazeError::Cancelled);
        }

        let Some(connection) = candidates.next() else {
            panic!(
                "ran out of candidate connections with {} groups left; the grid is disconnected",
                groups.group_count()
            );
        };

        let (Some(ia), Some(ib)) = (grid.index_of(connection.a), grid.index_of(connection.b))
        else {
            unreachable!("candidate connections always lie within the grid");
        };

        if groups.same_group(ia, ib) {
            // Would close a cycle
            rejected += 1;
            continue;
        }

        groups.union(ia, ib);
        maze.connect(connection);
        observer.on_connection_accepted(connection.a, connection.b, connection.direction());
    }

    assert_eq!(
        groups.group_count(),
        1,
        "spanning tree complete but cells are still split into several groups"
    );
    tracing::info!(
        "[kruskal] done: {} connections carved, {} rejected",
        maze.connection_count(),
        rejected
    );
    Ok(maze)
}
