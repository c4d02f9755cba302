use std::process;

use clap::Parser;
use hexspray_core::backend::create_backend;
use hexspray_core::session::Session;
use hexspray_utils::logging::LogLevel;
use hexspray_utils::{error, info, init_logging_for_tui};

/// An interactive terminal front-end for symbolic debugging with typed
/// memory inspection.
#[derive(Parser, Debug)]
#[command(name = "hexspray")]
#[command(version)]
#[command(about = "An interactive terminal front-end for symbolic debugging", long_about = None)]
struct Cli
{
    /// Path to the executable to debug; can also be set later from the
    /// target prompt
    target: Option<String>,

    /// Debugging engine to drive ("scripted" runs the built-in demo engine)
    #[arg(long, default_value = "scripted")]
    engine: String,

    /// Log level for the session log file (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<LogLevel>,
}

fn main()
{
    let cli = Cli::parse();

    // The TUI owns the terminal, so logs go to a file instead of stderr.
    let log_path = match init_logging_for_tui(cli.log_level) {
        Ok(path) => path,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(1);
        }
    };
    info!(log = %log_path.display(), engine = %cli.engine, "hexspray starting");

    let backend = match create_backend(&cli.engine) {
        Ok(backend) => backend,
        Err(e) => {
            error!(error = %e, "backend initialization failed");
            eprintln!("Error: {e}");
            process::exit(2);
        }
    };

    let session = Session::new(backend);
    if let Err(e) = hexspray_ui::run_tui(session, cli.target.as_deref()) {
        error!(error = %e, "terminal failure");
        eprintln!("Error: {e}");
        process::exit(1);
    }

    info!("hexspray exiting");
}
