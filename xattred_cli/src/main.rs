mod app;
mod config;
mod fmt;
mod opt;

use clap::Parser;

use app::App;
use config::Config;
use opt::Opts;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Store(#[from] xattred_core::Error),
    #[error("failed to format output - {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to format output - {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

fn main() {
    pretty_env_logger::init();

    let config = Config::load_default_location().unwrap_or_else(|e| {
        log::debug!("using default configuration, reason: {e}");
        Config::default()
    });

    if let Err(e) = App::run(Opts::parse(), config) {
        eprintln!("{}", fmt::err(&e));
        std::process::exit(1);
    }
}
