// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

static APP: Lazy<(&str, &str, &str)> =
    Lazy::new(|| ("com.alphavelocity", "Sharebook", "sharebook"));

pub const ENV_MODE: &str = "SHAREBOOK_MODE";
pub const ENV_DATA_DIR: &str = "SHAREBOOK_DATA_DIR";
pub const ENV_USER: &str = "SHAREBOOK_USER";
pub const DEFAULT_USER: &str = "local";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreMode {
    /// SQLite file in the data directory.
    Database,
    /// JSON file store, same API.
    Demo,
}

impl fmt::Display for StoreMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreMode::Database => f.write_str("database"),
            StoreMode::Demo => f.write_str("demo"),
        }
    }
}

impl FromStr for StoreMode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "database" | "db" | "sqlite" => Ok(StoreMode::Database),
            "demo" => Ok(StoreMode::Demo),
            other => Err(anyhow!("Unknown store mode '{}' (use database|demo)", other)),
        }
    }
}

/// Values given on the command line; they win over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub demo: bool,
    pub data_dir: Option<PathBuf>,
    pub user: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub mode: StoreMode,
    pub data_dir: PathBuf,
    pub user: String,
}

impl AppConfig {
    pub fn resolve(overrides: &Overrides) -> Result<Self> {
        Self::resolve_with(overrides, |key| std::env::var(key).ok())
    }

    pub fn resolve_with<F>(overrides: &Overrides, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = |key: &str| env(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mode = if overrides.demo {
            StoreMode::Demo
        } else if let Some(raw) = env(ENV_MODE) {
            raw.parse::<StoreMode>()
                .with_context(|| format!("Invalid {} value", ENV_MODE))?
        } else {
            StoreMode::Database
        };

        let data_dir = match overrides.data_dir.clone() {
            Some(dir) => dir,
            None => match env(ENV_DATA_DIR) {
                Some(dir) => PathBuf::from(dir),
                None => Self::default_data_dir()?,
            },
        };

        let user = overrides
            .user
            .as_deref()
            .map(str::trim)
            .filter(|u| !u.is_empty())
            .map(str::to_string)
            .or_else(|| env(ENV_USER))
            .unwrap_or_else(|| DEFAULT_USER.to_string());

        Ok(Self {
            mode,
            data_dir,
            user,
        })
    }

    pub fn default_data_dir() -> Result<PathBuf> {
        let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
            .context("Could not determine platform-specific data dir")?;
        Ok(proj.data_dir().to_path_buf())
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join("sharebook.sqlite")
    }

    pub fn demo_path(&self) -> PathBuf {
        self.data_dir.join("demo.json")
    }
}
