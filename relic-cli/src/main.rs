//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

fn main() {
    if let Err(err) = relic_cli::run() {
        eprintln!("relic: {err}");
        std::process::exit(1);
    }
}
