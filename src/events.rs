use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
    mpsc::SyncSender,
};

use crate::maze::{Cell, Direction};

/// Notifications sent from the algorithms to whoever is watching them run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeEvent {
    /// A new, fully walled maze of the given size is about to be carved
    GridInit { width: u16, height: u16 },
    /// A passage was carved between `a` and `b`; `direction` is where `b` lies from `a`
    ConnectionAccepted { a: Cell, b: Cell, direction: Direction },
    /// A search between two cells is starting
    SearchStarted { start: Cell, end: Cell },
    /// A cell was taken off the frontier and expanded
    CellExpanded(Cell),
    /// The `index`-th cell of the final path, counted from the start
    PathCell { cell: Cell, index: usize },
}

/// Observer of the generation and search loops.
///
/// Both loops call [`MazeObserver::on_cancel_requested`] at the top of every iteration and
/// stop with [`crate::error::MazeError::Cancelled`] as soon as it returns `true`.
pub trait MazeObserver {
    fn on_grid_init(&mut self, _width: u16, _height: u16) {}
    fn on_connection_accepted(&mut self, _a: Cell, _b: Cell, _direction: Direction) {}
    fn on_search_started(&mut self, _start: Cell, _end: Cell) {}
    fn on_cell_expanded(&mut self, _cell: Cell) {}
    fn on_path_cell(&mut self, _cell: Cell, _index: usize) {}
    fn on_cancel_requested(&mut self) -> bool {
        false
    }
}

/// Observer that ignores everything and never cancels.
impl MazeObserver for () {}

/// Forwards every event over a bounded channel to a render thread.
///
/// Cancellation is requested once the shared stop flag is set or the receiving end hangs up.
/// Sending blocks while the channel is full, which paces the algorithms to the renderer.
pub struct ChannelObserver {
    sender: SyncSender<MazeEvent>,
    should_stop: Arc<AtomicBool>,
    disconnected: bool,
}

impl ChannelObserver {
    pub fn new(sender: SyncSender<MazeEvent>, should_stop: Arc<AtomicBool>) -> Self {
        ChannelObserver {
            sender,
            should_stop,
            disconnected: false,
        }
    }

    fn send(&mut self, event: MazeEvent) {
        if self.disconnected {
            return;
        }
        if self.sender.send(event).is_err() {
            self.mark_disconnected();
        }
    }

    fn mark_disconnected(&mut self) {
        tracing::debug!("[events] receiver hung up, requesting cancellation");
        self.disconnected = true;
    }
}

impl MazeObserver for ChannelObserver {
    fn on_grid_init(&mut self, width: u16, height: u16) {
        self.send(MazeEvent::GridInit { width, height });
    }

    fn on_connection_accepted(&mut self, a: Cell, b: Cell, direction: Direction) {
        self.send(MazeEvent::ConnectionAccepted { a, b, direction });
    }

    fn on_search_started(&mut self, start: Cell, end: Cell) {
        self.send(MazeEvent::SearchStarted { start, end });
    }

    fn on_cell_expanded(&mut self, cell: Cell) {
        self.send(MazeEvent::CellExpanded(cell));
    }

    fn on_path_cell(&mut self, cell: Cell, index: usize) {
        self.send(MazeEvent::PathCell { cell, index });
    }

    fn on_cancel_requested(&mut self) -> bool {
        self.disconnected || self.should_stop.load(Ordering::Acquire)
    }
}

/// Collects every event in memory.
/// With [`EventRecorder::cancel_after`], requests cancellation once it has been polled that
/// many times.
#[derive(Debug, Default)]
pub struct EventRecorder {
    pub events: Vec<MazeEvent>,
    polls: usize,
    cancel_after: Option<usize>,
}

impl EventRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_after(polls: usize) -> Self {
        EventRecorder {
            cancel_after: Some(polls),
            ..Self::default()
        }
    }

    /// Number of cancellation polls answered so far.
    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn accepted_connections(&self) -> impl Iterator<Item = (Cell, Cell, Direction)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            MazeEvent::ConnectionAccepted { a, b, direction } => Some((a, b, direction)),
            _ => None,
        })
    }

    pub fn expanded_cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.events.iter().filter_map(|event| match *event {
            MazeEvent::CellExpanded(cell) => Some(cell),
            _ => None,
        })
    }

    pub fn path_cells(&self) -> impl Iterator<Item = (Cell, usize)> + '_ {
        self.events.iter().filter_map(|event| match *event {
            MazeEvent::PathCell { cell, index } => Some((cell, index)),
            _ => None,
        })
    }
}

impl MazeObserver for EventRecorder {
    fn on_grid_init(&mut self, width: u16, height: u16) {
        self.events.push(MazeEvent::GridInit { width, height });
    }

    fn on_connection_accepted(&mut self, a: Cell, b: Cell, direction: Direction) {
        self.events
            .push(MazeEvent::ConnectionAccepted { a, b, direction });
    }

    fn on_search_started(&mut self, start: Cell, end: Cell) {
        self.events.push(MazeEvent::SearchStarted { start, end });
    }

    fn on_cell_expanded(&mut self, cell: Cell) {
        self.events.push(MazeEvent::CellExpanded(cell));
    }

    fn on_path_cell(&mut self, cell: Cell, index: usize) {
        self.events.push(MazeEvent::PathCell { cell, index });
    }

    fn on_cancel_requested(&mut self) -> bool {
        self.polls += 1;
        self.cancel_after.is_some_and(|limit| self.polls > limit)
    }
}
