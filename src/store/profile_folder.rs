// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Galatea-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Galatea and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::{Catalog, Settings};

const CATALOG_FILE: &str = "catalog.json";
const SETTINGS_FILE: &str = "settings.json";

/// On-disk profile: one folder holding the catalog and the settings.
#[derive(Debug, Clone)]
pub struct ProfileFolder {
    dir: PathBuf,
}

impl ProfileFolder {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads the stored catalog; an absent file is an empty catalog, not an error.
    pub fn load_catalog(&self) -> Result<Catalog, StoreError> {
        let path = self.dir.join(CATALOG_FILE);
        let Some(raw) = read_optional(&path)? else {
            return Ok(Catalog::new());
        };
        let entries: BTreeMap<String, String> =
            serde_json::from_str(&raw).map_err(|source| StoreError::Json {
                path: path.clone(),
                source,
            })?;
        Ok(entries.into_iter().collect())
    }

    /// Replaces the stored catalog wholesale.
    pub fn save_catalog(&self, catalog: &Catalog) -> Result<(), StoreError> {
        let entries: BTreeMap<&str, &str> = catalog
            .iter()
            .map(|(name, value)| (name.as_str(), value))
            .collect();
        let path = self.dir.join(CATALOG_FILE);
        let raw = serde_json::to_string_pretty(&entries).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write_atomic(&path, raw.as_bytes())
    }

    /// Loads settings; an absent file means defaults (enabled, no token).
    pub fn load_settings(&self) -> Result<Settings, StoreError> {
        let path = self.dir.join(SETTINGS_FILE);
        let Some(raw) = read_optional(&path)? else {
            return Ok(Settings::default());
        };
        serde_json::from_str(&raw).map_err(|source| StoreError::Json { path, source })
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<(), StoreError> {
        let path = self.dir.join(SETTINGS_FILE);
        let raw = serde_json::to_string_pretty(settings).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;
        self.write_atomic(&path, raw.as_bytes())
    }

    /// Write-then-rename so readers always observe a complete file.
    fn write_atomic(&self, path: &Path, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, bytes).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, path).map_err(|source| StoreError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn read_optional(path: &Path) -> Result<Option<String>, StoreError> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(StoreError::Io {
            path: path.to_path_buf(),
            source,
        }),
    }
}

#[derive(Debug)]
pub enum StoreError {
    Io { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "io error at {}: {source}", path.display())
            }
            Self::Json { path, source } => {
                write!(f, "invalid json in {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
        }
    }
}

#[cfg(test)]
mod tests;
