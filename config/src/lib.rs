// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use anyhow::Error;
use serde::Deserialize;
use std::path::Path;

pub const MONGO_URI_VAR: &str = "MONGO_URI";
pub const MONGO_DB_VAR: &str = "MONGO_DB";

#[derive(Debug, Copy, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Memory,
    Mongo,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct StoreConfig {
    pub backend: Backend,
    pub mongo_url: String,
    pub mongo_db: String,
    pub seed_path: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Memory,
            mongo_url: "mongodb://localhost:27017".into(),
            mongo_db: "movie-catalog".into(),
            seed_path: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    /// Read the catalog in pages of this size while filtering, all at once if unset
    pub catalog_chunk_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub store: StoreConfig,
    pub engine: EngineConfig,
    pub log: LogConfig,
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, Error> {
        let contents = std::fs::read_to_string(path)?;
        let parsed: Self = toml::from_str(&contents)?;
        Ok(parsed)
    }

    /// Like `load`, a missing file gives the defaults
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, Error> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Override the store connection from environment variables
    pub fn apply_env<I>(&mut self, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, val) in vars {
            match key.as_str() {
                MONGO_URI_VAR => self.store.mongo_url = val,
                MONGO_DB_VAR => self.store.mongo_db = val,
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Error;
    use common_macros::hash_map;

    #[test]
    fn load_example_config() -> Result<(), Error> {
        let expected = Config {
            store: StoreConfig {
                backend: Backend::Mongo,
                mongo_url: "mongodb://localhost:27017".into(),
                mongo_db: "movie-catalog".into(),
                seed_path: Some("data/movies.csv".into()),
            },
            engine: EngineConfig {
                catalog_chunk_size: Some(500),
            },
            log: LogConfig {
                level: "debug".into(),
            },
        };

        let loaded = Config::load("example.toml")?;
        assert_eq!(expected, loaded);

        Ok(())
    }

    #[test]
    fn partial_config_uses_defaults() -> Result<(), Error> {
        let parsed: Config = toml::from_str("[store]\nbackend = \"mongo\"\n")?;

        assert_eq!(parsed.store.backend, Backend::Mongo);
        assert_eq!(parsed.store.mongo_db, "movie-catalog");
        assert_eq!(parsed.engine.catalog_chunk_size, None);
        assert_eq!(parsed.log.level, "info");

        Ok(())
    }

    #[test]
    fn missing_file_gives_defaults() -> Result<(), Error> {
        let config = Config::load_or_default("does-not-exist.toml")?;
        assert_eq!(config, Config::default());

        Ok(())
    }

    #[test]
    fn environment_overrides_store() {
        let mut config = Config::default();
        let vars = hash_map! {
            MONGO_URI_VAR.to_owned() => "mongodb://db.internal:27017".to_owned(),
            MONGO_DB_VAR.to_owned() => "catalog-test".to_owned(),
            "HOME".to_owned() => "/root".to_owned(),
        };

        config.apply_env(vars);
        assert_eq!(config.store.mongo_url, "mongodb://db.internal:27017");
        assert_eq!(config.store.mongo_db, "catalog-test");
    }
}
