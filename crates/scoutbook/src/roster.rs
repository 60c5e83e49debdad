//! Event roster: the ordered list of teams attending the event.
//!
//! Rows are created blank and filled in field by field, so the stored list
//! can contain blank rows; they are dropped every time the list is loaded.
//! Field edits go through a [`DebouncedStore`] so bursts of keystrokes turn
//! into a single write, while adding and deleting rows write immediately.

use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::storage::{codec, keys, DebouncedStore, KeyValueStore, SharedStore};

/// One team on the event roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    /// Stable identity of the row, independent of its contents.
    pub id: Uuid,
    /// Team number as typed; not required to be numeric.
    pub team_number: String,
    /// Team name as typed.
    pub team_name: String,
}

impl Team {
    /// A fresh row with both fields empty.
    #[must_use]
    pub fn blank() -> Self {
        Self::new("", "")
    }

    /// A fresh row with the given contents.
    #[must_use]
    pub fn new(team_number: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_number: team_number.into(),
            team_name: team_name.into(),
        }
    }

    /// The team number with surrounding whitespace removed.
    #[must_use]
    pub fn trimmed_number(&self) -> &str {
        self.team_number.trim()
    }

    /// Whether both the number and the name are empty after trimming.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.team_number.trim().is_empty() && self.team_name.trim().is_empty()
    }
}

/// Editable fields of a roster row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamField {
    /// The team number.
    Number,
    /// The team name.
    Name,
}

/// Drop every blank row, keeping the order of the rest.
#[must_use]
pub fn filter_blanks(teams: Vec<Team>) -> Vec<Team> {
    teams.into_iter().filter(|team| !team.is_blank()).collect()
}

/// Read the stored roster without blank rows; missing or corrupt data is an empty roster.
#[must_use]
pub fn load_teams(store: &dyn KeyValueStore) -> Vec<Team> {
    codec::load::<Vec<Team>>(store, keys::EVENT_TEAMS)
        .map(filter_blanks)
        .unwrap_or_default()
}

/// The live roster and its persistence.
#[derive(Debug)]
pub struct Roster {
    store: DebouncedStore,
    teams: Vec<Team>,
}

impl Roster {
    /// Load the roster, deferring field edits by `debounce`.
    #[must_use]
    pub fn load(store: SharedStore, debounce: Duration) -> Self {
        let store = DebouncedStore::new(store, debounce);
        let teams = load_teams(&store);
        debug!(count = teams.len(), "loaded roster");
        Self { store, teams }
    }

    /// Current rows, in display order.
    #[must_use]
    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    /// Append a blank row and persist. Returns the new row's index.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be written.
    pub fn add(&mut self) -> Result<usize> {
        let mut next = self.teams.clone();
        next.push(Team::blank());
        self.persist(next)?;
        Ok(self.teams.len() - 1)
    }

    /// Change one field of the row at `index`.
    ///
    /// The write is staged and lands once the debounce delay has passed
    /// without further edits (see [`poll`](Self::poll)). Returns `false`
    /// without doing anything if `index` is out of range.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be encoded.
    pub fn edit(&mut self, index: usize, field: TeamField, value: &str, now: Instant) -> Result<bool> {
        if index >= self.teams.len() {
            debug!(index, "ignoring edit of missing roster row");
            return Ok(false);
        }
        let mut next = self.teams.clone();
        let team = &mut next[index];
        match field {
            TeamField::Number => team.team_number = value.to_string(),
            TeamField::Name => team.team_name = value.to_string(),
        }
        self.store
            .stage(keys::EVENT_TEAMS, codec::encode(&next)?, now);
        self.teams = next;
        Ok(true)
    }

    /// Remove the row at `index` and persist. Out-of-range indices are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be written.
    pub fn delete(&mut self, index: usize) -> Result<Option<Team>> {
        if index >= self.teams.len() {
            return Ok(None);
        }
        let mut next = self.teams.clone();
        let removed = next.remove(index);
        self.persist(next)?;
        Ok(Some(removed))
    }

    /// Write any staged edit whose delay has elapsed by `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be written.
    pub fn poll(&self, now: Instant) -> Result<bool> {
        Ok(self.store.flush_due(now)? > 0)
    }

    /// Write any staged edit immediately.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster cannot be written.
    pub fn flush(&self) -> Result<()> {
        self.store.flush()?;
        Ok(())
    }

    /// Whether an edit is waiting to be written.
    #[must_use]
    pub fn has_pending_edit(&self) -> bool {
        self.store.is_pending(keys::EVENT_TEAMS)
    }

    /// Write `teams` through and keep them only once the write lands.
    fn persist(&mut self, teams: Vec<Team>) -> Result<()> {
        codec::save(&self.store, keys::EVENT_TEAMS, &teams)?;
        self.teams = teams;
        Ok(())
    }
}
