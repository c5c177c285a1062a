use std::process::ExitCode;

use clap::Parser;

use element_explorer::app;
use element_explorer::config::{Args, Config};
use element_explorer::state::AppState;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::from(Args::parse());

    let default_filter = if config.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let state = match AppState::load(&config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Failed to load data: {e}");
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    match app::run_server(state, config.addr).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e:#}");
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
