use mazepath::{app, solvers::Solver};

fn main() {
    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args.next().and_then(|s| s.parse::<usize>().ok()).unwrap_or(1);
    let size = args.next().and_then(|s| s.parse::<u16>().ok()).unwrap_or(u8::MAX as u16);

    for solver in [Solver::BestFirst, Solver::Bfs] {
        if let Err(e) = app::profile(size, size, solver, num_iters) {
            eprintln!("Profiling failed: {}", e);
            std::process::exit(1);
        }
    }
}
