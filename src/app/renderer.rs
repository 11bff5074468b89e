use std::{
    fmt,
    io::Write,
    sync::{
        atomic::{AtomicBool, Ordering},
        mpsc::{Receiver, RecvTimeoutError},
    },
    time::Duration,
};

use crossterm::{
    cursor, queue,
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{events::MazeEvent, maze::Cell};

/// What a single tile of the drawn maze shows.
/// Cells sit on odd tile coordinates, with the walls between them on even ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Wall,
    Empty,
    /// Expanded by the search
    Visited,
    /// Part of the final path
    Route,
    Start,
    Goal,
}

impl Tile {
    /// The width of each tile when rendered, in character widths.
    pub const WIDTH: u16 = 2;

    fn symbol(self) -> &'static str {
        match self {
            Tile::Wall => "██",
            Tile::Empty => "  ",
            Tile::Visited => "··",
            Tile::Route => "**",
            Tile::Start => "S ",
            Tile::Goal => "G ",
        }
    }

    fn color(self) -> Color {
        match self {
            Tile::Wall => Color::White,
            Tile::Empty => Color::Reset,
            Tile::Visited => Color::Blue,
            Tile::Route => Color::Yellow,
            Tile::Start => Color::Green,
            Tile::Goal => Color::Red,
        }
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = self.symbol().with(self.color());

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            assert_eq!(
                styled_symbol.content().width(),
                Tile::WIDTH as usize,
                "Each tile must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RendererStatus {
    /// All events were drawn and the event channel closed
    Completed,
    /// The stop flag was raised before the events ran out
    Cancelled,
}

/// Draws maze events onto a tile grid of `(2w + 1) x (2h + 1)` tiles.
pub struct Renderer<W: Write> {
    out: W,
    tiles: Box<[Tile]>,
    tile_width: usize,
    tile_height: usize,
    endpoints: Option<(Cell, Cell)>,
    /// Last path cell drawn, to fill the passage leading to the next one
    last_path_cell: Option<Cell>,
    /// Time to wait after each event so the animation is watchable
    render_refresh_time: Duration,
}

impl<W: Write> Renderer<W> {
    /// How often the render loop checks the stop flag while no events arrive
    const EVENT_RECV_TIMEOUT: Duration = Duration::from_millis(100);

    pub fn new(out: W, render_refresh_time: Duration) -> Self {
        Renderer {
            out,
            tiles: Box::default(),
            tile_width: 0,
            tile_height: 0,
            endpoints: None,
            last_path_cell: None,
            render_refresh_time,
        }
    }

    /// Number of tile rows, which is also the number of terminal rows the maze occupies.
    pub fn tile_height(&self) -> usize {
        self.tile_height
    }

    pub fn tile(&self, coord: (usize, usize)) -> Tile {
        self.tiles[coord.1 * self.tile_width + coord.0]
    }

    fn set(&mut self, coord: (usize, usize), tile: Tile, changed: &mut Vec<(usize, usize)>) {
        let idx = coord.1 * self.tile_width + coord.0;
        if idx < self.tiles.len() && self.tiles[idx] != tile {
            self.tiles[idx] = tile;
            changed.push(coord);
        }
    }

    fn cell_tile(cell: Cell) -> (usize, usize) {
        (cell.x as usize * 2 + 1, cell.y as usize * 2 + 1)
    }

    fn passage_tile(a: Cell, b: Cell) -> (usize, usize) {
        (a.x as usize + b.x as usize + 1, a.y as usize + b.y as usize + 1)
    }

    fn is_endpoint(&self, cell: Cell) -> bool {
        self.endpoints
            .is_some_and(|(start, end)| cell == start || cell == end)
    }

    /// Applies an event to the tile grid and returns the tiles that changed.
    /// A `GridInit` replaces the whole grid and returns no individual tiles.
    pub fn apply(&mut self, event: &MazeEvent) -> Vec<(usize, usize)> {
        let mut changed = Vec::new();
        match *event {
            MazeEvent::GridInit { width, height } => {
                self.tile_width = width as usize * 2 + 1;
                self.tile_height = height as usize * 2 + 1;
                self.tiles =
                    vec![Tile::Wall; self.tile_width * self.tile_height].into_boxed_slice();
                for y in 0..height {
                    for x in 0..width {
                        let (tx, ty) = Self::cell_tile(Cell::new(x, y));
                        self.tiles[ty * self.tile_width + tx] = Tile::Empty;
                    }
                }
                self.endpoints = None;
                self.last_path_cell = None;
            }
            MazeEvent::ConnectionAccepted { a, b, .. } => {
                self.set(Self::passage_tile(a, b), Tile::Empty, &mut changed);
            }
            MazeEvent::SearchStarted { start, end } => {
                // Wipe marks left over from an earlier search
                for idx in 0..self.tiles.len() {
                    if self.tiles[idx] != Tile::Wall {
                        let coord = (idx % self.tile_width, idx / self.tile_width);
                        self.set(coord, Tile::Empty, &mut changed);
                    }
                }
                self.endpoints = Some((start, end));
                self.last_path_cell = None;
                // A start that is also the goal shows as the start
                self.set(Self::cell_tile(end), Tile::Goal, &mut changed);
                self.set(Self::cell_tile(start), Tile::Start, &mut changed);
            }
            MazeEvent::CellExpanded(cell) => {
                if !self.is_endpoint(cell) {
                    self.set(Self::cell_tile(cell), Tile::Visited, &mut changed);
                }
            }
            MazeEvent::PathCell { cell, .. } => {
                if let Some(previous) = self.last_path_cell {
                    self.set(Self::passage_tile(previous, cell), Tile::Route, &mut changed);
                }
                if !self.is_endpoint(cell) {
                    self.set(Self::cell_tile(cell), Tile::Route, &mut changed);
                }
                self.last_path_cell = Some(cell);
            }
        }
        changed
    }

    /// Redraws every tile from the top-left corner of the terminal.
    pub fn draw_all(&mut self) -> std::io::Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All), cursor::MoveTo(0, 0))?;
        for y in 0..self.tile_height {
            for x in 0..self.tile_width {
                let tile = self.tile((x, y));
                queue!(self.out, style::Print(tile))?;
            }
            queue!(self.out, style::Print("\r\n"))?;
        }
        self.out.flush()
    }

    /// Writes the tile grid as plain, unstyled lines, for output outside of raw mode.
    pub fn write_plain(&mut self) -> std::io::Result<()> {
        for y in 0..self.tile_height {
            for x in 0..self.tile_width {
                let symbol = self.tile((x, y)).symbol();
                self.out.write_all(symbol.as_bytes())?;
            }
            writeln!(self.out)?;
        }
        self.out.flush()
    }

    /// Apply an event and draw whatever it changed
    pub fn render_event(&mut self, event: &MazeEvent) -> std::io::Result<()> {
        if let MazeEvent::GridInit { .. } = event {
            self.apply(event);
            return self.draw_all();
        }
        for (x, y) in self.apply(event) {
            let (Ok(column), Ok(row)) = (u16::try_from(x * Tile::WIDTH as usize), u16::try_from(y))
            else {
                // Beyond what a terminal can address
                continue;
            };
            let tile = self.tile((x, y));
            queue!(self.out, cursor::MoveTo(column, row), style::Print(tile))?;
        }
        self.out.flush()
    }

    /// Render loop that draws events until the channel closes or `should_stop` is raised.
    pub fn render(
        &mut self,
        event_rx: Receiver<MazeEvent>,
        should_stop: &AtomicBool,
    ) -> std::io::Result<RendererStatus> {
        loop {
            if should_stop.load(Ordering::Acquire) {
                tracing::debug!("[render] stop flag set, exiting render loop");
                return Ok(RendererStatus::Cancelled);
            }
            match event_rx.recv_timeout(Self::EVENT_RECV_TIMEOUT) {
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => {
                    // All senders are dropped
                    tracing::debug!("[render] event channel closed, exiting render loop");
                    break;
                }
                Ok(event) => {
                    self.render_event(&event)?;
                    if !self.render_refresh_time.is_zero() {
                        std::thread::sleep(self.render_refresh_time);
                    }
                }
            }
        }
        // Move cursor below the maze after exiting
        let row = u16::try_from(self.tile_height).unwrap_or(u16::MAX);
        queue!(self.out, cursor::MoveTo(0, row))?;
        self.out.flush()?;
        Ok(RendererStatus::Completed)
    }
}
