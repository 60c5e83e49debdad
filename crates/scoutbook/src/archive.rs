//! Named, immutable snapshots of the live scouting data.
//!
//! An archive copies the raw stored bytes of every [`keys::ARCHIVED_KEYS`]
//! entry at the moment it is taken. The live records can change afterwards
//! without affecting it; the only ways to alter the archive list are to append
//! a new snapshot or delete one wholesale.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, info_span};
use uuid::Uuid;

use crate::config::BreakdownConfig;
use crate::error::{Error, Result, ValidationError};
use crate::matches::{stats, BreakdownPoint, MatchData, MatchSetup, SummaryStats};
use crate::pit::{ScoreBook, TeamScore};
use crate::roster::{filter_blanks, Team};
use crate::storage::{codec, keys, KeyValueStore, SharedStore};

/// One archived competition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchivedCompetition {
    /// Unique identifier.
    pub id: Uuid,
    /// Name given at archive time.
    pub name: String,
    /// Competition date.
    pub date: DateTime<Utc>,
    /// Raw stored bytes per key.
    pub payload: BTreeMap<String, Vec<u8>>,
}

/// Capture the archived keys from `store`.
///
/// Keys without data are skipped. The finalized flag is re-encoded from its
/// boolean value so the payload holds a canonical `true`/`false`.
///
/// # Errors
///
/// Returns an error if a key cannot be read.
pub fn snapshot(store: &dyn KeyValueStore) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut payload = BTreeMap::new();
    for key in keys::ARCHIVED_KEYS {
        if key == keys::MATCH_FINALIZED {
            if let Some(flag) = codec::load::<bool>(store, key) {
                payload.insert(key.to_string(), codec::encode(&flag)?);
            }
            continue;
        }
        if let Some(bytes) = store.get(key)? {
            payload.insert(key.to_string(), bytes);
        }
    }
    debug!(keys = payload.len(), "captured snapshot");
    Ok(payload)
}

/// The archive list and its persistence.
#[derive(Debug)]
pub struct ArchiveShelf {
    store: SharedStore,
    archives: Vec<ArchivedCompetition>,
    breakdown: BreakdownConfig,
}

impl ArchiveShelf {
    /// Load the archive list, newest first.
    #[must_use]
    pub fn load(store: SharedStore, breakdown: BreakdownConfig) -> Self {
        let mut archives: Vec<ArchivedCompetition> =
            codec::load(store.as_ref(), keys::ARCHIVED_COMPETITIONS).unwrap_or_default();
        sort_newest_first(&mut archives);
        Self {
            store,
            archives,
            breakdown,
        }
    }

    /// Snapshot the live data under `name` and persist the updated list.
    ///
    /// The snapshot reads the shared store. A roster edit still staged in a
    /// live [`Roster`](crate::roster::Roster) is not captured; call
    /// [`Roster::flush`](crate::roster::Roster::flush) first.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyArchiveName`] for a blank name, or a
    /// store error. Nothing is written on failure.
    pub fn archive(&mut self, name: &str, date: DateTime<Utc>) -> Result<&ArchivedCompetition> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyArchiveName.into());
        }

        let archived = ArchivedCompetition {
            id: Uuid::new_v4(),
            name: name.to_string(),
            date,
            payload: snapshot(self.store.as_ref())?,
        };
        let id = archived.id;

        let mut archives = self.archives.clone();
        archives.push(archived);
        sort_newest_first(&mut archives);
        codec::save(self.store.as_ref(), keys::ARCHIVED_COMPETITIONS, &archives)?;
        self.archives = archives;

        info!(%id, name, "archived competition");
        self.get(id)
            .ok_or_else(|| Error::internal("archive missing after save"))
    }

    /// All archives, newest first.
    #[must_use]
    pub fn list(&self) -> &[ArchivedCompetition] {
        &self.archives
    }

    /// Look up an archive by id.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&ArchivedCompetition> {
        self.archives.iter().find(|a| a.id == id)
    }

    /// Delete an archive. Returns `false` if no archive has `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the updated list cannot be written.
    pub fn delete(&mut self, id: Uuid) -> Result<bool> {
        let Some(position) = self.archives.iter().position(|a| a.id == id) else {
            return Ok(false);
        };
        let mut archives = self.archives.clone();
        let removed = archives.remove(position);
        codec::save(self.store.as_ref(), keys::ARCHIVED_COMPETITIONS, &archives)?;
        self.archives = archives;
        info!(%id, name = %removed.name, "deleted archive");
        Ok(true)
    }

    /// Decode an archive for read-only display.
    #[must_use]
    pub fn detail(&self, id: Uuid) -> Option<ArchiveDetail> {
        self.get(id)
            .map(|archived| ArchiveDetail::decode(archived, &self.breakdown))
    }
}

fn sort_newest_first(archives: &mut [ArchivedCompetition]) {
    archives.sort_by(|a, b| b.date.cmp(&a.date));
}

/// An archive payload decoded back into records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArchiveDetail {
    /// Archive name.
    pub name: String,
    /// Competition date.
    pub date: DateTime<Utc>,
    /// Roster, blank rows removed.
    pub teams: Vec<Team>,
    /// Schedule, if one had been created.
    pub match_setup: Option<MatchSetup>,
    /// Score sheets.
    pub match_data: Vec<MatchData>,
    /// Pit scores, blank keys removed.
    pub pit_scores: ScoreBook,
    /// Last generated pit ranking.
    pub pit_rankings: Vec<TeamScore>,
    /// Whether the schedule had been finalized.
    pub finalized: bool,
    /// Summary over the frozen score sheets.
    pub summary: SummaryStats,
    /// Breakdown over the frozen score sheets.
    pub breakdown: Option<Vec<BreakdownPoint>>,
}

impl ArchiveDetail {
    /// Decode every payload entry. Missing or corrupt entries decode as empty.
    #[must_use]
    pub fn decode(archived: &ArchivedCompetition, config: &BreakdownConfig) -> Self {
        let teams = filter_blanks(decode_entry(archived, keys::EVENT_TEAMS).unwrap_or_default());
        let match_setup = decode_entry(archived, keys::MATCH_SETUP);
        let match_data: Vec<MatchData> =
            decode_entry(archived, keys::MATCH_DATA).unwrap_or_default();
        let mut pit_scores: ScoreBook =
            decode_entry(archived, keys::PIT_SCORES).unwrap_or_default();
        pit_scores.remove_blank_keys();
        let pit_rankings = decode_entry(archived, keys::PIT_RANKINGS).unwrap_or_default();
        let finalized = decode_entry(archived, keys::MATCH_FINALIZED).unwrap_or(false);

        let summary = stats::summary_stats(&match_data);
        let breakdown = stats::breakdown(&match_data, config.max_teams, config.team_order);

        Self {
            name: archived.name.clone(),
            date: archived.date,
            teams,
            match_setup,
            match_data,
            pit_scores,
            pit_rankings,
            finalized,
            summary,
            breakdown,
        }
    }
}

fn decode_entry<T: serde::de::DeserializeOwned>(
    archived: &ArchivedCompetition,
    key: &str,
) -> Option<T> {
    let bytes = archived.payload.get(key)?;
    info_span!("archive", id = %archived.id).in_scope(|| codec::decode(key, bytes))
}
