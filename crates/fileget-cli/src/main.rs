use fileget_core::logging;

mod cli;

fn main() {
    // Initialize logging as early as possible; fall back to stderr if the
    // state dir is unusable.
    if logging::init().is_err() {
        logging::init_stderr();
    }

    if let Err(err) = cli::run_from_args() {
        eprintln!("fileget error: {:#}", err);
        std::process::exit(1);
    }
}
