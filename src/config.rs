use std::{path::PathBuf, time::Duration};

use clap::Parser;

use crate::{maze::Cell, solvers::Solver};

const DEFAULT_MAZE_SIZE: u16 = 20;
const DEFAULT_DELAY_US: u64 = 2000;
const DEFAULT_LOG_LEVEL: tracing::Level = tracing::Level::INFO;

/// Generate a random perfect maze and walk through it from one cell to another.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "mazepath", version, about)]
pub struct Config {
    /// Maze width in cells
    #[arg(
        long,
        default_value_t = DEFAULT_MAZE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub width: u16,

    /// Maze height in cells
    #[arg(
        long,
        default_value_t = DEFAULT_MAZE_SIZE,
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub height: u16,

    /// Seed for maze generation. A fresh maze every run when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Search algorithm used to find the path
    #[arg(long, value_enum, default_value_t)]
    pub solver: Solver,

    /// Start cell as `x,y`. Defaults to the top-left cell
    #[arg(long, value_parser = parse_cell)]
    pub start: Option<Cell>,

    /// End cell as `x,y`. Defaults to the bottom-right cell
    #[arg(long, value_parser = parse_cell)]
    pub end: Option<Cell>,

    /// Time spent rendering each event, in microseconds
    #[arg(long, default_value_t = DEFAULT_DELAY_US)]
    pub delay_us: u64,

    /// Print the finished maze once instead of animating it
    #[arg(long)]
    pub headless: bool,

    /// Directory to write log files to. Logging is off when omitted
    #[arg(long, env = "MAZEPATH_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Maximum log level (error, warn, info, debug, trace)
    #[arg(long, env = "MAZEPATH_LOG_LEVEL", default_value_t = DEFAULT_LOG_LEVEL)]
    pub log_level: tracing::Level,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            width: DEFAULT_MAZE_SIZE,
            height: DEFAULT_MAZE_SIZE,
            seed: None,
            solver: Solver::default(),
            start: None,
            end: None,
            delay_us: DEFAULT_DELAY_US,
            headless: false,
            log_dir: None,
            log_level: DEFAULT_LOG_LEVEL,
        }
    }
}

impl Config {
    pub fn start_cell(&self) -> Cell {
        self.start.unwrap_or_default()
    }

    pub fn end_cell(&self) -> Cell {
        self.end.unwrap_or(Cell::new(
            self.width.saturating_sub(1),
            self.height.saturating_sub(1),
        ))
    }

    pub fn render_refresh_time(&self) -> Duration {
        Duration::from_micros(self.delay_us)
    }
}

fn parse_cell(s: &str) -> Result<Cell, String> {
    let error_msg = || format!("expected a cell as `x,y`, got `{}`", s);
    let (x, y) = s.split_once(',').ok_or_else(error_msg)?;
    let x = x.trim().parse::<u16>().map_err(|_| error_msg())?;
    let y = y.trim().parse::<u16>().map_err(|_| error_msg())?;
    Ok(Cell::new(x, y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell() {
        assert_eq!(parse_cell("3,4"), Ok(Cell::new(3, 4)));
        assert_eq!(parse_cell(" 0 , 12 "), Ok(Cell::new(0, 12)));
        assert!(parse_cell("3").is_err());
        assert!(parse_cell("a,1").is_err());
        assert!(parse_cell("-1,1").is_err());
    }

    #[test]
    fn test_defaults() {
        let config = Config::try_parse_from(["mazepath"]).unwrap();
        assert_eq!((config.width, config.height), (20, 20));
        assert_eq!(config.solver, Solver::BestFirst);
        assert_eq!(config.start_cell(), Cell::new(0, 0));
        assert_eq!(config.end_cell(), Cell::new(19, 19));
        assert!(!config.headless);
    }

    #[test]
    fn test_default_matches_parsed_defaults() {
        let parsed = Config::try_parse_from(["mazepath", "--log-level", "info"]).unwrap();
        let config = Config {
            log_dir: parsed.log_dir.clone(),
            ..Config::default()
        };
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_parse_args() {
        let config = Config::try_parse_from([
            "mazepath", "--width", "5", "--height", "3", "--seed", "9", "--solver", "bfs",
            "--start", "1,2", "--end", "4,0", "--headless",
        ])
        .unwrap();
        assert_eq!((config.width, config.height), (5, 3));
        assert_eq!(config.seed, Some(9));
        assert_eq!(config.solver, Solver::Bfs);
        assert_eq!(config.start_cell(), Cell::new(1, 2));
        assert_eq!(config.end_cell(), Cell::new(4, 0));
        assert!(config.headless);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        assert!(Config::try_parse_from(["mazepath", "--width", "0"]).is_err());
    }
}
