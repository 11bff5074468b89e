pub mod renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
        mpsc::SyncSender,
    },
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crossterm::{
    ExecutableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};

use crate::{
    app::renderer::{Renderer, RendererStatus, Tile},
    config::Config,
    error::MazeError,
    events::{ChannelObserver, EventRecorder, MazeEvent, MazeObserver},
    generators::generate_maze,
    maze::Cell,
    solvers::{Solver, solve_maze},
};

/// Maximum number of events to buffer in the channel between compute and render threads
const MAX_EVENTS_IN_CHANNEL_BUFFER: usize = 1000;
/// Timeout for polling input events in the input thread, a.k.a.
/// how often to check the stop flag
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        // Ignore any errors as we are already failing
        let _ = restore_terminal(&mut std::io::stdout());
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()?;
    Ok(())
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()?;
    Ok(())
}

/// Whether the terminal is big enough to show the whole maze plus a status line
fn fits_terminal(width: u16, height: u16) -> bool {
    let needed_columns = (width as usize * 2 + 1) * Tile::WIDTH as usize;
    let needed_rows = height as usize * 2 + 2;
    match terminal::size() {
        Ok((columns, rows)) => needed_columns <= columns as usize && needed_rows <= rows as usize,
        Err(_) => false,
    }
}

/// Entry point of the app. Animates generation and search in the terminal, or prints the
/// result once in headless mode or when the terminal is too small.
pub fn run(config: &Config) -> std::io::Result<()> {
    let mut stdout = std::io::stdout();
    if config.headless || !fits_terminal(config.width, config.height) {
        if !config.headless {
            tracing::info!("[app] terminal too small for animation, printing the result instead");
        }
        return run_headless(config, &mut stdout);
    }

    setup_terminal(&mut stdout)?;
    let result = visualize(config, &mut stdout);
    restore_terminal(&mut stdout)?;

    if let Ok(Some(outcome)) = &result {
        println!("{}", describe_outcome(config, outcome));
    }
    result.map(|_| ())
}

/// Generate and solve without animation, then print the maze with its path.
fn run_headless(config: &Config, stdout: &mut Stdout) -> std::io::Result<()> {
    let mut recorder = EventRecorder::new();
    let outcome = compute(config, &mut recorder);

    let mut renderer = Renderer::new(&mut *stdout, Duration::ZERO);
    recorder.events.iter().for_each(|event| {
        renderer.apply(event);
    });
    renderer.write_plain()?;
    writeln!(stdout, "{}", describe_outcome(config, &outcome))?;
    Ok(())
}

/// Runs the input, render, and compute threads until the animation ends and the user presses
/// Esc. Returns `None` if the user cancelled before the animation finished.
fn visualize(
    config: &Config,
    stdout: &mut Stdout,
) -> std::io::Result<Option<Result<Vec<Cell>, MazeError>>> {
    // Flag to indicate other threads should stop. Set to true by the input thread on Esc key event.
    let should_stop = Arc::new(AtomicBool::new(false));

    let should_stop_for_input = should_stop.clone();
    // Spawn a thread to listen for user input
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(USER_INPUT_EVENT_POLL_TIMEOUT, &should_stop_for_input)
    });

    let (event_tx, event_rx) =
        std::sync::mpsc::sync_channel::<MazeEvent>(MAX_EVENTS_IN_CHANNEL_BUFFER);

    // Spawn a thread to listen for maze events and render them
    let render_refresh_time = config.render_refresh_time();
    let should_stop_for_render = should_stop.clone();
    let render_thread_handle = std::thread::spawn(move || {
        Renderer::new(std::io::stdout(), render_refresh_time)
            .render(event_rx, &should_stop_for_render)
    });

    // Spawn a thread to generate the maze and solve it
    let compute_config = config.clone();
    let should_stop_for_compute = should_stop.clone();
    let compute_thread_handle = std::thread::spawn(move || {
        compute_with_channel(&compute_config, event_tx, should_stop_for_compute)
    });

    let outcome = compute_thread_handle
        .join()
        .expect("Compute thread panicked");
    let render_result = render_thread_handle.join().expect("Render thread panicked");
    let status = match render_result {
        Ok(status) => status,
        Err(e) => {
            tracing::error!("[app] render thread failed: {}", e);
            stop_input_thread(&should_stop, input_thread_handle)?;
            return Err(e);
        }
    };

    if status == RendererStatus::Cancelled || outcome == Err(MazeError::Cancelled) {
        tracing::info!("[app] animation was cancelled by user");
        stop_input_thread(&should_stop, input_thread_handle)?;
        return Ok(None);
    }

    let color = if outcome.is_ok() {
        Color::Green
    } else {
        Color::Red
    };
    queue!(
        stdout,
        style::PrintStyledContent(
            format!("{} ", describe_outcome(config, &outcome))
                .with(color)
                .attribute(Attribute::Bold)
        ),
    )?;
    stdout.execute(style::PrintStyledContent(
        "Press Esc to exit...".with(Color::Blue).attribute(Attribute::Bold),
    ))?;

    // The input thread exits on Esc
    input_thread_handle.join().expect("Input thread panicked")?;
    Ok(Some(outcome))
}

/// Listen for user input events until Esc is pressed or the stop flag is set
/// This function runs in a separate thread, and is the only place where user input is read
fn listen_to_user_input(
    event_poll_timeout: Duration,
    should_stop: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        // Check if this thread should exit
        if should_stop.load(Ordering::Acquire) {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            // No event available, continue loop to check the flag again
            continue;
        }

        // We only care about key presses
        if let event::Event::Key(event::KeyEvent {
            code: KeyCode::Esc,
            kind: event::KeyEventKind::Press,
            ..
        }) = event::read()?
        {
            tracing::debug!("[input loop] Esc key pressed, stopping");
            should_stop.store(true, Ordering::Release);
            return Ok(());
        }
    }
}

/// Raise the stop flag and wait for the input thread to notice it
fn stop_input_thread(
    should_stop: &AtomicBool,
    input_thread_handle: JoinHandle<std::io::Result<()>>,
) -> std::io::Result<()> {
    should_stop.store(true, Ordering::Release);
    input_thread_handle.join().expect("Input thread panicked")
}

/// Generate and solve the maze, reporting every step over the event channel
fn compute_with_channel(
    config: &Config,
    event_tx: SyncSender<MazeEvent>,
    should_stop: Arc<AtomicBool>,
) -> Result<Vec<Cell>, MazeError> {
    let mut observer = ChannelObserver::new(event_tx, should_stop);
    compute(config, &mut observer)
    // Observer is dropped here, as well as the event sender
}

/// Generate and solve the maze
fn compute<O: MazeObserver + ?Sized>(
    config: &Config,
    observer: &mut O,
) -> Result<Vec<Cell>, MazeError> {
    let maze = generate_maze(config.width, config.height, config.seed, observer)?;
    solve_maze(
        &maze,
        config.solver,
        config.start_cell(),
        config.end_cell(),
        observer,
    )
}

fn describe_outcome(config: &Config, outcome: &Result<Vec<Cell>, MazeError>) -> String {
    match outcome {
        Ok(path) => format!(
            "Path found with {}! {} steps from {} to {}.",
            config.solver,
            path.len().saturating_sub(1),
            config.start_cell(),
            config.end_cell()
        ),
        Err(e) => format!("No path: {}.", e),
    }
}

/// Profiling mode: generate and solve repeatedly without rendering to the terminal
pub fn profile(
    width: u16,
    height: u16,
    solver: Solver,
    num_iterations: usize,
) -> Result<(), MazeError> {
    let config = Config {
        width,
        height,
        solver,
        ..Config::default()
    };

    let mut total_events = 0usize;
    let started = Instant::now();
    for iteration in 0..num_iterations {
        let mut recorder = EventRecorder::new();
        let path = compute(&config, &mut recorder)?;
        total_events += recorder.events.len();
        tracing::debug!(
            "[profile] iteration {}: {} events, path of {} cells",
            iteration,
            recorder.events.len(),
            path.len()
        );
    }
    let elapsed = started.elapsed();

    println!(
        "{} iterations of {}x{} with {}: {:?} total, {:?} per iteration, {} events",
        num_iterations,
        width,
        height,
        solver,
        elapsed,
        per_iteration(elapsed, num_iterations),
        total_events
    );
    Ok(())
}

fn per_iteration(elapsed: Duration, num_iterations: usize) -> Duration {
    elapsed.div_f64(num_iterations.max(1) as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compute_over_channel() {
        let config = Config {
            width: 6,
            height: 4,
            seed: Some(1),
            ..Config::default()
        };
        let (tx, rx) = std::sync::mpsc::sync_channel(MAX_EVENTS_IN_CHANNEL_BUFFER);
        let path = compute_with_channel(&config, tx, Arc::new(AtomicBool::new(false))).unwrap();
        let events = rx.iter().collect::<Vec<_>>();
        assert_eq!(
            events.first(),
            Some(&MazeEvent::GridInit {
                width: 6,
                height: 4
            })
        );
        let path_events = events
            .iter()
            .filter(|e| matches!(e, MazeEvent::PathCell { .. }))
            .count();
        assert_eq!(path_events, path.len());
    }

    #[test]
    fn test_compute_stops_when_flag_set() {
        let config = Config {
            width: 6,
            height: 4,
            seed: Some(1),
            ..Config::default()
        };
        let (tx, _rx) = std::sync::mpsc::sync_channel(MAX_EVENTS_IN_CHANNEL_BUFFER);
        let result = compute_with_channel(&config, tx, Arc::new(AtomicBool::new(true)));
        assert_eq!(result, Err(MazeError::Cancelled));
    }

    #[test]
    fn test_compute_reports_bad_endpoint() {
        let config = Config {
            width: 3,
            height: 3,
            start: Some(Cell::new(7, 7)),
            ..Config::default()
        };
        let outcome = compute(&config, &mut ());
        assert_eq!(outcome, Err(MazeError::StartNotFound(Cell::new(7, 7))));
        assert!(describe_outcome(&config, &outcome).contains("(7, 7)"));
    }

    #[test]
    fn test_stop_input_thread_raises_flag_and_joins() {
        let should_stop = Arc::new(AtomicBool::new(false));
        let should_stop_for_input = should_stop.clone();
        let handle = std::thread::spawn(move || -> std::io::Result<()> {
            while !should_stop_for_input.load(Ordering::Acquire) {
                std::thread::sleep(Duration::from_millis(1));
            }
            Ok(())
        });
        stop_input_thread(&should_stop, handle).unwrap();
        assert!(should_stop.load(Ordering::Acquire));
    }

    #[test]
    fn test_per_iteration() {
        let elapsed = Duration::from_secs(10);
        assert_eq!(per_iteration(elapsed, 4), Duration::from_millis(2500));
        assert_eq!(per_iteration(elapsed, 0), elapsed);
        // Far more iterations than fit in a u32
        assert!(per_iteration(elapsed, usize::MAX) < Duration::from_nanos(2));
    }

    #[test]
    fn test_describe_success() {
        let config = Config {
            width: 2,
            height: 1,
            ..Config::default()
        };
        let outcome = Ok(vec![Cell::new(0, 0), Cell::new(1, 0)]);
        assert_eq!(
            describe_outcome(&config, &outcome),
            "Path found with Greedy Best-First Search! 1 steps from (0, 0) to (1, 0)."
        );
    }
}
