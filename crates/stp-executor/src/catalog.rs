use std::sync::Arc;

use anyhow::{bail, Result};

use crate::Play;

struct CatalogEntry {
    play: Arc<Play>,
    enabled: bool,
}

/// The set of plays the executor chooses from. Plays are registered once at startup and
/// have no priority among each other.
#[derive(Default)]
pub struct PlayCatalog {
    entries: Vec<CatalogEntry>,
}

impl PlayCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a play, enabled. Names must be unique.
    pub fn register(&mut self, play: Play) -> Result<&mut Self> {
        if self.get(play.name()).is_some() {
            bail!("Play '{}' is already registered", play.name());
        }
        log::debug!("Registered play {}", play.name());
        self.entries.push(CatalogEntry {
            play: Arc::new(play),
            enabled: true,
        });
        Ok(self)
    }

    /// Enables or disables a play. Disabled plays are never selected.
    pub fn set_enabled(&mut self, name: &str, enabled: bool) -> Result<()> {
        match self.entries.iter_mut().find(|e| e.play.name() == name) {
            Some(entry) => {
                entry.enabled = enabled;
                Ok(())
            }
            None => bail!("Unknown play '{}'", name),
        }
    }

    pub fn is_enabled(&self, name: &str) -> bool {
        self.entries
            .iter()
            .any(|e| e.enabled && e.play.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<Play>> {
        self.entries
            .iter()
            .find(|e| e.play.name() == name)
            .map(|e| e.play.clone())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.play.name())
    }

    pub fn enabled(&self) -> impl Iterator<Item = Arc<Play>> + '_ {
        self.entries
            .iter()
            .filter(|e| e.enabled)
            .map(|e| e.play.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
