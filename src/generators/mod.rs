use rand::{SeedableRng, rngs::StdRng};

mod kruskal;
pub mod union_find;

pub use kruskal::randomized_kruskal;

use crate::{error::Result, events::MazeObserver, maze::Grid, maze::Maze};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

/// Validates the dimensions and carves a new perfect maze of `width` x `height` cells.
pub fn generate_maze<O: MazeObserver + ?Sized>(
    width: u16,
    height: u16,
    seed: Option<u64>,
    observer: &mut O,
) -> Result<Maze> {
    let grid = Grid::new(width, height)?;
    randomized_kruskal(grid, &mut get_rng(seed), observer)
}
