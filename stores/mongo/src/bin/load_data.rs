// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use catalog::{error::ErrorKind, seed, CatalogStore};
use config::Config;
use indicatif::ProgressIterator;
use mongo_store::MongoStore;
use simplelog::{Config as LogConfig, LevelFilter, TermLogger, TerminalMode};

const DEFAULT_CONFIG: &str = "movie-catalog.toml";
const DEFAULT_CATALOG: &str = "data/movies.csv";

fn main() -> Result<(), Error> {
    TermLogger::init(LevelFilter::Info, LogConfig::default(), TerminalMode::Mixed)?;

    let mut config = Config::load_or_default(DEFAULT_CONFIG)?;
    config.apply_env(dotenv::vars());

    let path = std::env::args()
        .nth(1)
        .or_else(|| config.store.seed_path.clone())
        .unwrap_or_else(|| DEFAULT_CATALOG.into());

    println!("Collecting records for movies from {}...", path);
    let movies = seed::load_movies(&path)?;

    let store = MongoStore::from_config(&config.store)?;
    println!("Pushing {} movies into the database", movies.len());
    let mut skipped = 0;
    for movie in movies.into_iter().progress() {
        match store.insert_movie(movie) {
            Ok(_) => {}
            Err(e)
                if matches!(
                    e.downcast_ref::<ErrorKind>(),
                    Some(ErrorKind::DuplicateMovie(_))
                ) =>
            {
                log::warn!("{}", e);
                skipped += 1;
            }
            Err(e) => return Err(e),
        }
    }

    if skipped > 0 {
        println!("Skipped {} movies already in the database", skipped);
    }

    Ok(())
}
