use std::{
    io::{self, IsTerminal},
    process::ExitCode,
};

use record_lifetimes::{SystemAllocator, Tracked, demo};
use tracing::{debug, error};

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    // stdout carries the program output, diagnostics only when asked for
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(io::stderr)
                    .with_ansi(io::stderr().is_terminal())
                    .with_target(true)
                    .with_level(true),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}

fn main() -> ExitCode {
    init_tracing();

    let alloc = Tracked::new(SystemAllocator);
    let result = demo::run(&alloc, &mut io::stdout().lock());
    debug!(
        allocations = alloc.allocations(),
        releases = alloc.releases(),
        outstanding = alloc.outstanding(),
        "heap accounting at exit"
    );

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "demo failed");
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}
