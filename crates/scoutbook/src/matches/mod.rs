//! Match scouting: schedule setup, score entry and derived statistics.
//!
//! [`MatchScouting`] owns the current [`MatchPhase`] and persists each change
//! under the three match keys. Reads follow the usual lenient rule: anything
//! missing or corrupt loads as absent.

pub mod scores;
pub mod setup;
pub mod state;
pub mod stats;

use tracing::{debug, info};

use crate::config::BreakdownConfig;
use crate::error::Result;
use crate::storage::{codec, keys, SharedStore};

pub use scores::{clamp_score, MatchData, ScoreCategory, TeamScores, MAX_MATCH_SCORE};
pub use setup::{MatchSetup, MatchSetupData, Slot, MAX_TOTAL_MATCHES};
pub use state::MatchPhase;
pub use stats::{BreakdownPoint, SummaryStats};

/// Match scouting state for the current event.
#[derive(Debug)]
pub struct MatchScouting {
    store: SharedStore,
    phase: MatchPhase,
    breakdown: BreakdownConfig,
}

impl MatchScouting {
    /// Restore the phase from the store.
    #[must_use]
    pub fn load(store: SharedStore, breakdown: BreakdownConfig) -> Self {
        let setup = codec::load::<MatchSetup>(store.as_ref(), keys::MATCH_SETUP);
        let finalized =
            codec::load::<bool>(store.as_ref(), keys::MATCH_FINALIZED).unwrap_or(false);
        let matches = if finalized {
            codec::load::<Vec<MatchData>>(store.as_ref(), keys::MATCH_DATA)
        } else {
            None
        };

        let phase = MatchPhase::from_stored(setup, matches, finalized);
        debug!(phase = phase.name(), "loaded match scouting");
        Self {
            store,
            phase,
            breakdown,
        }
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> &MatchPhase {
        &self.phase
    }

    /// Score sheets; empty until finalized.
    #[must_use]
    pub fn matches(&self) -> &[MatchData] {
        self.phase.matches()
    }

    /// Create the schedule from the setup form and persist it.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the phase untouched, when the form
    /// is invalid or a schedule already exists; otherwise a store error.
    pub fn submit_setup(&mut self, total_matches: &str, our_team: &str) -> Result<()> {
        let next = self.phase.configure(total_matches, our_team)?;
        if let Some(setup) = next.setup() {
            codec::save(self.store.as_ref(), keys::MATCH_SETUP, setup)?;
            info!(
                total_matches = setup.total_matches,
                our_team = %setup.our_team,
                "created match schedule"
            );
        }
        self.phase = next;
        Ok(())
    }

    /// Set one slot of the draft schedule and persist it immediately.
    ///
    /// The value is stored as typed. An out-of-range `match_index` is ignored.
    ///
    /// # Errors
    ///
    /// Returns a validation error when no draft is open, otherwise a store
    /// error. On error the draft is unchanged.
    pub fn set_slot(&mut self, match_index: usize, slot: Slot, team_number: &str) -> Result<()> {
        let MatchPhase::ScheduleDraft(current) = &self.phase else {
            return Err(self.phase.refuse("edit the schedule").into());
        };
        if match_index >= current.matches.len() {
            debug!(match_index, "ignoring slot edit for missing match");
            return Ok(());
        }

        let mut next = current.clone();
        next.matches[match_index].set_team(slot, team_number);
        codec::save(self.store.as_ref(), keys::MATCH_SETUP, &next)?;
        self.phase = MatchPhase::ScheduleDraft(next);
        Ok(())
    }

    /// Freeze the draft into score sheets and persist them with the finalized flag.
    ///
    /// # Errors
    ///
    /// Returns a validation error, leaving the draft untouched, when not
    /// drafting or when the schedule is blank; otherwise a store error.
    pub fn finalize(&mut self) -> Result<()> {
        let next = self.phase.finalize()?;
        codec::save(self.store.as_ref(), keys::MATCH_DATA, next.matches())?;
        codec::save(self.store.as_ref(), keys::MATCH_FINALIZED, &true)?;
        info!(matches = next.matches().len(), "finalized match schedule");
        self.phase = next;
        Ok(())
    }

    /// Set one category score for `team_number` in match `match_index`.
    ///
    /// The value is clamped to `0..=5` and the match average recomputed. An
    /// out-of-range index, a blank team number, or a schedule that is not
    /// finalized yet (no score sheets exist) is a silent no-op.
    ///
    /// # Errors
    ///
    /// Returns a store error, leaving the score sheets unchanged.
    pub fn update_score(
        &mut self,
        match_index: usize,
        team_number: &str,
        category: ScoreCategory,
        value: i64,
    ) -> Result<()> {
        let MatchPhase::Finalized { matches, .. } = &self.phase else {
            debug!(phase = self.phase.name(), "ignoring score before finalize");
            return Ok(());
        };
        if match_index >= matches.len() {
            debug!(match_index, "ignoring score for missing match");
            return Ok(());
        }

        let mut next = matches.clone();
        let Some(scores) = next[match_index].get_or_create(team_number) else {
            debug!(match_index, "ignoring score for blank team number");
            return Ok(());
        };
        scores.set(category, value);
        codec::save(self.store.as_ref(), keys::MATCH_DATA, &next)?;

        if let MatchPhase::Finalized { matches, .. } = &mut self.phase {
            *matches = next;
        }
        Ok(())
    }

    /// Drop the schedule and every score sheet.
    ///
    /// # Errors
    ///
    /// Returns an error if a key cannot be removed.
    pub fn reset(&mut self) -> Result<()> {
        for key in keys::MATCH_KEYS {
            self.store.remove(key)?;
        }
        self.phase = MatchPhase::Unconfigured;
        info!("reset match scouting");
        Ok(())
    }

    /// Headline numbers over the current score sheets.
    #[must_use]
    pub fn summary_stats(&self) -> SummaryStats {
        stats::summary_stats(self.matches())
    }

    /// Per-team, per-category means, or `None` when there is nothing to chart.
    #[must_use]
    pub fn breakdown(&self) -> Option<Vec<BreakdownPoint>> {
        stats::breakdown(
            self.matches(),
            self.breakdown.max_teams,
            self.breakdown.team_order,
        )
    }

    /// Whether any match has a score entry.
    #[must_use]
    pub fn has_score_data(&self) -> bool {
        stats::has_score_data(self.matches())
    }

    /// Mean match average of one team.
    #[must_use]
    pub fn team_average(&self, team_number: &str) -> Option<f64> {
        stats::team_average(self.matches(), team_number)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::error::{Error, ValidationError};
    use crate::storage::{KeyValueStore, MemoryStore};

    fn fresh() -> (Rc<MemoryStore>, MatchScouting) {
        let store = Rc::new(MemoryStore::new());
        let scouting = MatchScouting::load(store.clone(), BreakdownConfig::default());
        (store, scouting)
    }

    fn finalized() -> (Rc<MemoryStore>, MatchScouting) {
        let (store, mut scouting) = fresh();
        scouting.submit_setup("2", "7083").unwrap();
        scouting.set_slot(0, Slot::Red1, "7083").unwrap();
        scouting.set_slot(0, Slot::Blue1, "254").unwrap();
        scouting.finalize().unwrap();
        (store, scouting)
    }

    #[test]
    fn test_load_empty_is_unconfigured() {
        let (_, scouting) = fresh();
        assert_eq!(scouting.phase(), &MatchPhase::Unconfigured);
        assert!(scouting.matches().is_empty());
        assert!(scouting.summary_stats().is_empty());
        assert!(scouting.breakdown().is_none());
    }

    #[test]
    fn test_invalid_setup_persists_nothing() {
        let (store, mut scouting) = fresh();
        let err = scouting.submit_setup("0", "7083").unwrap_err();

        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidMatchCount)
        ));
        assert!(store.is_empty());
        assert_eq!(scouting.phase(), &MatchPhase::Unconfigured);
    }

    #[test]
    fn test_setup_persists_draft() {
        let (store, mut scouting) = fresh();
        scouting.submit_setup("3", "7083").unwrap();

        let reloaded = MatchScouting::load(store, BreakdownConfig::default());
        let setup = reloaded.phase().setup().unwrap();
        assert_eq!(setup.matches.len(), 3);
        assert!(!reloaded.phase().is_finalized());
    }

    #[test]
    fn test_set_slot_persists_immediately() {
        let (store, mut scouting) = fresh();
        scouting.submit_setup("2", "7083").unwrap();
        scouting.set_slot(1, Slot::Blue2, "abc").unwrap();
        // Out of range is ignored
        scouting.set_slot(9, Slot::Red1, "1").unwrap();

        let stored: MatchSetup = codec::load(store.as_ref(), keys::MATCH_SETUP).unwrap();
        assert_eq!(stored.matches[1].blue_team2, "abc");
    }

    #[test]
    fn test_set_slot_after_finalize_is_refused() {
        let (_, mut scouting) = finalized();
        let err = scouting.set_slot(0, Slot::Red2, "1").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_finalize_blank_schedule_keeps_draft() {
        let (store, mut scouting) = fresh();
        scouting.submit_setup("2", "7083").unwrap();

        let err = scouting.finalize().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::EmptySchedule)
        ));
        assert!(matches!(scouting.phase(), MatchPhase::ScheduleDraft(_)));
        assert!(!store.contains(keys::MATCH_DATA));
        assert!(!store.contains(keys::MATCH_FINALIZED));
    }

    #[test]
    fn test_finalize_persists_sheets_and_flag() {
        let (store, scouting) = finalized();

        assert_eq!(scouting.matches().len(), 2);
        assert_eq!(scouting.matches()[0].scores.len(), 2);
        assert!(scouting.matches()[1].scores.is_empty());
        assert_eq!(store.get(keys::MATCH_FINALIZED).unwrap(), Some(b"true".to_vec()));

        let reloaded = MatchScouting::load(store, BreakdownConfig::default());
        assert!(reloaded.phase().is_finalized());
        assert_eq!(reloaded.matches(), scouting.matches());
    }

    #[test]
    fn test_update_score_clamps_and_persists() {
        let (store, mut scouting) = finalized();
        scouting
            .update_score(0, "7083", ScoreCategory::Auto, 5)
            .unwrap();
        scouting
            .update_score(0, "7083", ScoreCategory::Teleop, 3)
            .unwrap();
        scouting
            .update_score(0, "7083", ScoreCategory::Endgame, 99)
            .unwrap();

        let scores = scouting.matches()[0].scores["7083"];
        assert_eq!(scores.endgame, 5);
        assert!((scores.match_average - 13.0 / 3.0).abs() < 1e-9);

        let stored: Vec<MatchData> = codec::load(store.as_ref(), keys::MATCH_DATA).unwrap();
        assert_eq!(stored[0].scores["7083"], scores);
    }

    #[test]
    fn test_update_score_creates_missing_entry() {
        let (_, mut scouting) = finalized();
        scouting
            .update_score(1, " 42 ", ScoreCategory::Auto, 2)
            .unwrap();
        assert_eq!(scouting.matches()[1].scores["42"].auto, 2);
    }

    #[test]
    fn test_update_score_out_of_range_is_noop() {
        let (_, mut scouting) = finalized();
        let before = scouting.matches().to_vec();

        scouting
            .update_score(7, "7083", ScoreCategory::Auto, 3)
            .unwrap();
        scouting.update_score(0, "  ", ScoreCategory::Auto, 3).unwrap();

        assert_eq!(scouting.matches(), before.as_slice());
    }

    #[test]
    fn test_update_score_before_finalize_is_noop() {
        let (store, mut scouting) = fresh();
        scouting
            .update_score(0, "1", ScoreCategory::Auto, 1)
            .unwrap();
        scouting.submit_setup("2", "7083").unwrap();
        scouting
            .update_score(0, "7083", ScoreCategory::Auto, 1)
            .unwrap();

        assert!(scouting.matches().is_empty());
        assert!(!store.contains(keys::MATCH_DATA));
    }

    #[test]
    fn test_failed_score_write_keeps_sheets() {
        let (store, mut scouting) = finalized();
        store.set_read_only(true);

        assert!(scouting
            .update_score(0, "7083", ScoreCategory::Auto, 4)
            .is_err());
        assert_eq!(scouting.matches()[0].scores["7083"].auto, 0);
        assert!(!scouting.matches()[1].scores.contains_key("7083"));

        store.set_read_only(false);
        let stored: Vec<MatchData> = codec::load(store.as_ref(), keys::MATCH_DATA).unwrap();
        assert_eq!(stored.as_slice(), scouting.matches());
    }

    #[test]
    fn test_failed_slot_write_keeps_draft() {
        let (store, mut scouting) = fresh();
        scouting.submit_setup("2", "7083").unwrap();
        store.set_read_only(true);

        assert!(scouting.set_slot(0, Slot::Red1, "7083").is_err());
        let setup = scouting.phase().setup().unwrap();
        assert!(!setup.has_any_team());
    }

    #[test]
    fn test_reset_clears_keys() {
        let (store, mut scouting) = finalized();
        store.set(keys::EVENT_TEAMS, b"[]").unwrap();
        scouting.reset().unwrap();

        assert_eq!(scouting.phase(), &MatchPhase::Unconfigured);
        for key in keys::MATCH_KEYS {
            assert!(!store.contains(key));
        }
        assert!(store.contains(keys::EVENT_TEAMS));

        scouting.submit_setup("1", "7083").unwrap();
    }

    #[test]
    fn test_corrupt_match_data_loads_empty() {
        crate::logging::init_test_logging();
        let (store, _) = finalized();
        store.set(keys::MATCH_DATA, b"garbage").unwrap();

        let reloaded = MatchScouting::load(store, BreakdownConfig::default());
        assert!(reloaded.phase().is_finalized());
        assert!(reloaded.matches().is_empty());
    }

    #[test]
    fn test_aggregates() {
        let (_, mut scouting) = finalized();
        scouting
            .update_score(0, "7083", ScoreCategory::Auto, 3)
            .unwrap();
        scouting
            .update_score(0, "7083", ScoreCategory::Teleop, 3)
            .unwrap();
        scouting
            .update_score(0, "7083", ScoreCategory::Endgame, 3)
            .unwrap();

        let stats = scouting.summary_stats();
        assert_eq!(stats.teams_count, 2);
        assert_eq!(stats.matches_with_data, 1);
        assert!((stats.overall_average - 1.5).abs() < 1e-9);

        assert!(scouting.has_score_data());
        assert_eq!(scouting.team_average("7083"), Some(3.0));

        let points = scouting.breakdown().unwrap();
        assert_eq!(points.len(), 6);
        // "254" sorts before "7083"
        assert_eq!(points[0].team_number, "254");
    }
}
