//! Config file and command-line settings.

use clap::Parser;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::Level;

use crate::error::{PlannerError, Result};

const APP_DIR: &str = "taskplanner";
const DEFAULT_LOG_LEVEL: Level = Level::INFO;

#[derive(Parser, Debug, Default)]
#[command(name = "taskplanner")]
#[command(about = "Daily task planner with per-user task lists", long_about = None)]
pub struct Cli {
    /// Config file (defaults to <config dir>/taskplanner/config.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Directory holding the per-user task files
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    /// Username whose task list to open
    #[arg(short, long)]
    pub user: Option<String>,

    /// error, warn, info, debug or trace
    #[arg(long)]
    pub log_level: Option<String>,
}

/// Contents of config.toml. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct Config {
    #[serde(default)]
    pub data_dir: Option<PathBuf>,
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default)]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub user: Option<String>,
    pub log_level: Level,
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(APP_DIR)
        .join("config.toml")
}

pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Missing or unparsable files fall back to defaults.
pub fn load_config(path: &Path) -> Config {
    if !path.exists() {
        return Config::default();
    }
    match fs::read_to_string(path).map(|s| toml::from_str::<Config>(&s)) {
        Ok(Ok(config)) => config,
        Ok(Err(err)) => {
            tracing::warn!(path = %path.display(), %err, "ignoring invalid config file");
            Config::default()
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "ignoring unreadable config file");
            Config::default()
        }
    }
}

impl Settings {
    /// Command-line values win over the config file.
    pub fn resolve(cli: Cli, config: Config) -> Result<Self> {
        let data_dir = cli
            .data_dir
            .or(config.data_dir)
            .unwrap_or_else(default_data_dir);
        let user = cli
            .user
            .or(config.user)
            .map(|u| u.trim().to_string())
            .filter(|u| !u.is_empty());
        let log_level = match cli.log_level.or(config.log_level) {
            Some(raw) => raw
                .parse::<Level>()
                .map_err(|_| PlannerError::config(format!("unknown log level: {raw}")))?,
            None => DEFAULT_LOG_LEVEL,
        };

        Ok(Self {
            data_dir,
            user,
            log_level,
        })
    }

    pub fn from_cli(cli: Cli) -> Result<Self> {
        let path = cli.config.clone().unwrap_or_else(default_config_path);
        let config = load_config(&path);
        Self::resolve(cli, config)
    }

    pub fn log_file(&self) -> PathBuf {
        self.data_dir.join("taskplanner.log")
    }
}
