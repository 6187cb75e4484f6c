//! Entry point for the command-line interface.
#![forbid(unsafe_code)]

use roadnet_cli::CliError;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Stderr)
        .init();

    match roadnet_cli::run() {
        Ok(()) => {}
        // Help and version requests are not failures.
        Err(CliError::ArgumentParsing(err)) if !err.use_stderr() => err.exit(),
        Err(err) => {
            eprintln!("roadnet: {err}");
            std::process::exit(1);
        }
    }
}
