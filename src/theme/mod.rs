//! Display theme
//!
//! The only persisted state: a light/dark flag stored under the `theme` key.

mod store;

pub use store::{FileStore, StoreError};

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Key the theme is stored under
pub const THEME_KEY: &str = "theme";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(format!("unknown theme: {}", other)),
        }
    }
}

/// Theme flag backed by a file store
#[derive(Debug, Clone)]
pub struct ThemeSettings {
    store: FileStore,
}

impl ThemeSettings {
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        Ok(Self {
            store: FileStore::open(path)?,
        })
    }

    /// Current theme; unknown or missing values read as light
    pub fn theme(&self) -> Theme {
        self.store
            .get(THEME_KEY)
            .and_then(|v| v.parse().ok())
            .unwrap_or_default()
    }

    pub fn set(&mut self, theme: Theme) -> Result<(), StoreError> {
        self.store.set(THEME_KEY, theme.as_str())?;
        tracing::info!(theme = %theme, "Theme changed");
        Ok(())
    }

    /// Flip the theme and return the new value
    pub fn toggle(&mut self) -> Result<Theme, StoreError> {
        let next = self.theme().toggled();
        self.set(next)?;
        Ok(next)
    }

    pub fn store(&self) -> &FileStore {
        &self.store
    }
}
