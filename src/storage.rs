// File: storage.rs
// SPDX-License-Identifier: MIT OR Apache-2.0
//
// Copyright (c) 2023-2025
// - Volker Schwaberow <volker@schwaberow.de>

use chrono::{DateTime, Utc};
use dirs::data_local_dir;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use sled::{Config, Db};
use std::path::{Path, PathBuf};

use crate::config::ConnectionParameters;
use crate::error::{StorageError, StorageResult};

const CONFIGURATION_KEY: &[u8] = b"current";

/// The single configuration row: where the Tautulli server lives and how to
/// authenticate against it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Configuration {
    pub tautulli_url: Option<String>,
    pub api_key: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Configuration {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            tautulli_url: None,
            api_key: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.connection().is_some()
    }

    pub fn connection(&self) -> Option<ConnectionParameters> {
        let url = self.tautulli_url.as_deref().filter(|u| !u.is_empty())?;
        let key = self.api_key.as_deref().filter(|k| !k.is_empty())?;
        Some(ConnectionParameters::new(url, key))
    }

    /// API key with everything but the last four characters hidden.
    pub fn masked_api_key(&self) -> String {
        match self.api_key.as_deref() {
            None | Some("") => String::new(),
            Some(key) => {
                let visible: String = key
                    .chars()
                    .rev()
                    .take(4)
                    .collect::<Vec<_>>()
                    .into_iter()
                    .rev()
                    .collect();
                let hidden = key.chars().count().saturating_sub(4);
                format!("{}{}", "*".repeat(hidden), visible)
            }
        }
    }
}

pub struct ConfigStore {
    db: Db,
    settings_tree: sled::Tree,
    path: PathBuf,
}

impl ConfigStore {
    pub fn open(data_dir: Option<PathBuf>) -> StorageResult<Self> {
        let db_path = Self::resolve_path(data_dir);

        std::fs::create_dir_all(&db_path)
            .map_err(|e| StorageError::DirectoryCreation(format!("{}: {}", db_path.display(), e)))?;

        let db = Config::default().path(&db_path).open()?;
        let settings_tree = db.open_tree(b"configuration")?;
        debug!("Opened configuration store at {}", db_path.display());

        Ok(Self {
            db,
            settings_tree,
            path: db_path,
        })
    }

    fn resolve_path(data_dir: Option<PathBuf>) -> PathBuf {
        match data_dir {
            Some(dir) => dir.join("tautulli_export"),
            None => data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("tautulli-export")
                .join("config"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the configuration row, creating an empty one on first use.
    pub fn get_or_create(&self) -> StorageResult<Configuration> {
        if let Some(raw) = self.settings_tree.get(CONFIGURATION_KEY)? {
            return Ok(serde_json::from_slice(&raw)?);
        }

        let config = Configuration::new();
        self.write(&config)?;
        Ok(config)
    }

    pub fn save(&self, tautulli_url: &str, api_key: &str) -> StorageResult<Configuration> {
        let mut config = self.get_or_create()?;
        config.tautulli_url = Some(tautulli_url.trim().to_string());
        config.api_key = Some(api_key.trim().to_string());
        config.updated_at = Utc::now();
        self.write(&config)?;
        info!("Configuration saved");
        Ok(config)
    }

    pub fn connection(&self) -> StorageResult<Option<ConnectionParameters>> {
        Ok(self.get_or_create()?.connection())
    }

    fn write(&self, config: &Configuration) -> StorageResult<()> {
        let value = serde_json::to_vec(config)?;
        self.settings_tree.insert(CONFIGURATION_KEY, value)?;
        self.db.flush()?;
        Ok(())
    }
}
