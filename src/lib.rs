pub mod clean;
pub mod cli;
pub mod data;
pub mod error;
pub mod frame;
pub mod io_utils;
pub mod load;
pub mod persist;
pub mod schema;

use std::{env, sync::OnceLock};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug};

use crate::{
    cli::{Cli, USAGE},
    load::ReadOptions,
};

pub use crate::{clean::clean_data, load::load_data, persist::save_data};

static LOGGER: OnceLock<()> = OnceLock::new();

fn init_logging() {
    LOGGER.get_or_init(|| {
        let mut builder = env_logger::Builder::from_env(env_logger::Env::default());
        if env::var("RUST_LOG").is_err() {
            builder.filter_module("disaster_etl", LevelFilter::Info);
        }
        let _ = builder.format_timestamp_millis().try_init();
    });
}

pub fn run() -> Result<()> {
    init_logging();
    let cli = Cli::parse();
    execute(&cli)
}

/// Runs load, clean and save in order, or prints usage when the positional
/// arguments are not exactly three paths.
pub fn execute(cli: &Cli) -> Result<()> {
    let Some(paths) = cli.pipeline_paths() else {
        debug!("Expected 3 positional arguments, got {}", cli.paths.len());
        println!("{USAGE}");
        return Ok(());
    };
    let options = ReadOptions {
        delimiter: cli.delimiter,
        encoding: io_utils::resolve_encoding(cli.input_encoding.as_deref())?,
    };

    println!(
        "Loading data...\n    MESSAGES: {}\n    CATEGORIES: {}",
        paths.messages.display(),
        paths.categories.display()
    );
    let frame = load_data(paths.messages, paths.categories, &options)?;

    println!("Cleaning data...");
    let frame = clean_data(frame);

    println!("Saving data...\n    DATABASE: {}", paths.database.display());
    save_data(&frame, paths.database, &cli.table, cli.if_exists)
        .with_context(|| format!("Saving data to {:?}", paths.database))?;

    println!("Cleaned data saved to database!");
    Ok(())
}
