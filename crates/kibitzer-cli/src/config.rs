use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;

use kibitzer_core::{Error, Result};
use kibitzer_engine::{BusyPolicy, EngineConfig};

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineSection,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    #[serde(default = "default_binary_path")]
    pub binary_path: String,

    #[serde(default = "default_threads")]
    pub threads: u16,

    #[serde(default = "default_multipv")]
    pub multipv: u8,

    #[serde(default = "default_skill_level")]
    pub skill_level: u8,

    #[serde(default = "default_depth")]
    pub depth: u8,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    #[serde(default)]
    pub busy_policy: BusyPolicy,

    #[serde(default = "default_pool_size")]
    pub pool_size: usize,
}

fn default_binary_path() -> String {
    std::env::var("STOCKFISH_PATH").unwrap_or_else(|_| "/usr/local/bin/stockfish".to_string())
}

fn default_threads() -> u16 {
    4
}

fn default_multipv() -> u8 {
    1
}

fn default_skill_level() -> u8 {
    20
}

fn default_depth() -> u8 {
    kibitzer_core::DEFAULT_DEPTH
}

fn default_timeout_ms() -> u64 {
    30_000
}

fn default_pool_size() -> usize {
    1
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            binary_path: default_binary_path(),
            threads: default_threads(),
            multipv: default_multipv(),
            skill_level: default_skill_level(),
            depth: default_depth(),
            timeout_ms: default_timeout_ms(),
            busy_policy: BusyPolicy::default(),
            pool_size: default_pool_size(),
        }
    }
}

impl Config {
    /// An explicit path must exist. Otherwise `KIBITZER_CONFIG` or
    /// `config/default.toml` is read when present, else defaults apply.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(Error::MissingInput(format!(
                    "config file {}",
                    path.display()
                )));
            }
            return Self::load_from(path);
        }

        let path = std::env::var("KIBITZER_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH));
        if path.exists() {
            Self::load_from(&path)
        } else {
            debug!("no config file at {}, using defaults", path.display());
            let config = Config::default();
            config.validate()?;
            Ok(config)
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        debug!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let engine = &self.engine;
        if engine.pool_size == 0 {
            return Err(Error::Config("engine.pool_size must be at least 1".into()));
        }
        if engine.depth == 0 {
            return Err(Error::Config("engine.depth must be at least 1".into()));
        }
        if engine.multipv == 0 {
            return Err(Error::Config("engine.multipv must be at least 1".into()));
        }
        if engine.skill_level > 20 {
            return Err(Error::Config(format!(
                "engine.skill_level must be 0-20, got {}",
                engine.skill_level
            )));
        }
        if engine.timeout_ms == 0 {
            return Err(Error::Config("engine.timeout_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            binary_path: self.engine.binary_path.clone(),
            pool_size: self.engine.pool_size,
            threads: self.engine.threads,
            multipv: self.engine.multipv,
            skill_level: self.engine.skill_level,
            timeout: Duration::from_millis(self.engine.timeout_ms),
            busy_policy: self.engine.busy_policy,
        }
    }
}
