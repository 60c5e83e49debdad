//! Process-level wiring: one store, shared by every view.

use std::rc::Rc;

use tracing::info;

use crate::archive::ArchiveShelf;
use crate::config::Config;
use crate::error::Result;
use crate::matches::MatchScouting;
use crate::pit::PitScouting;
use crate::roster::{load_teams, Roster};
use crate::storage::{keys, SharedStore, Storage};

/// An open scoutbook: configuration plus the single shared store.
///
/// Each view loader reads fresh state from the store, the same way a screen
/// reloads its data when it is entered.
#[derive(Debug, Clone)]
pub struct Scoutbook {
    config: Config,
    store: SharedStore,
}

impl Scoutbook {
    /// Open the database named by `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened.
    pub fn open(config: Config) -> Result<Self> {
        let storage = Storage::open(config.database_path())?;
        Ok(Self::with_store(config, Rc::new(storage)))
    }

    /// Use an existing store.
    #[must_use]
    pub fn with_store(config: Config, store: SharedStore) -> Self {
        Self { config, store }
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The shared store.
    #[must_use]
    pub fn store(&self) -> &SharedStore {
        &self.store
    }

    /// Load the roster view.
    #[must_use]
    pub fn roster(&self) -> Roster {
        Roster::load(self.store.clone(), self.config.debounce_delay())
    }

    /// Load the pit view against the current roster.
    #[must_use]
    pub fn pit(&self) -> PitScouting {
        let teams = load_teams(self.store.as_ref());
        PitScouting::load(self.store.clone(), &teams)
    }

    /// Load the match view.
    #[must_use]
    pub fn matches(&self) -> MatchScouting {
        MatchScouting::load(self.store.clone(), self.config.breakdown.clone())
    }

    /// Load the archive view.
    #[must_use]
    pub fn archives(&self) -> ArchiveShelf {
        ArchiveShelf::load(self.store.clone(), self.config.breakdown.clone())
    }

    /// Clear all live scouting data. Archives are kept.
    ///
    /// # Errors
    ///
    /// Returns an error if a key cannot be removed.
    pub fn delete_all_data(&self) -> Result<()> {
        for key in keys::ARCHIVED_KEYS {
            self.store.remove(key)?;
        }
        info!("deleted all live scouting data");
        Ok(())
    }
}
