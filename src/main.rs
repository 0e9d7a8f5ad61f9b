use sws::cli;

fn main() {
    // Errors are reported by the CLI itself
    if cli::Cli::run().is_err() {
        std::process::exit(1);
    }
}
