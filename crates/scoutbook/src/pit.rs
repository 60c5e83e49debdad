//! Pit scouting: per-team notes and scores gathered before matches, and the
//! ranking derived from them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::roster::Team;
use crate::storage::{codec, keys, SharedStore};

/// Upper bound of the compatibility and overall scores.
pub const PIT_SCORE_MAX: f64 = 10.0;

/// Clamp a pit score into `0..=10`. NaN becomes 0.
#[must_use]
pub fn clamp_pit_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, PIT_SCORE_MAX)
    }
}

/// Everything recorded about one team in the pits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScore {
    /// Trimmed team number.
    pub team_number: String,
    /// Team name copied from the roster when the entry was created.
    pub team_name: String,
    /// Notes on the autonomous period.
    pub auto_score: String,
    /// Notes on the driver-controlled period.
    pub teleop_score: String,
    /// Notes on the endgame.
    pub endgame_score: String,
    /// How well the team would pair with ours, 0 to 10.
    pub compatibility_score: f64,
    /// Overall impression, 0 to 10.
    pub overall_score: f64,
}

impl TeamScore {
    /// An entry with empty notes and zero scores.
    #[must_use]
    pub fn new(team_number: impl Into<String>, team_name: impl Into<String>) -> Self {
        Self {
            team_number: team_number.into(),
            team_name: team_name.into(),
            auto_score: String::new(),
            teleop_score: String::new(),
            endgame_score: String::new(),
            compatibility_score: 0.0,
            overall_score: 0.0,
        }
    }

    /// Mean of the compatibility and overall scores.
    #[must_use]
    pub fn average(&self) -> f64 {
        (self.compatibility_score + self.overall_score) / 2.0
    }

    /// Notes for one phase.
    #[must_use]
    pub fn note(&self, field: PitNoteField) -> &str {
        match field {
            PitNoteField::Auto => &self.auto_score,
            PitNoteField::Teleop => &self.teleop_score,
            PitNoteField::Endgame => &self.endgame_score,
        }
    }
}

/// Numeric pit scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitScoreField {
    /// Compatibility with our team.
    Compatibility,
    /// Overall impression.
    Overall,
}

/// Free-text pit notes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PitNoteField {
    /// Autonomous period.
    Auto,
    /// Driver-controlled period.
    Teleop,
    /// Endgame.
    Endgame,
}

/// Pit entries keyed by trimmed team number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBook(BTreeMap<String, TeamScore>);

impl ScoreBook {
    /// An empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Entry for `team_number`, if one exists.
    #[must_use]
    pub fn get(&self, team_number: &str) -> Option<&TeamScore> {
        self.0.get(team_number.trim())
    }

    /// Entry for `team_number`, created with `create` if absent.
    ///
    /// Returns `None` when the trimmed number is empty; no entry is ever
    /// stored under a blank key.
    pub fn get_or_create(
        &mut self,
        team_number: &str,
        create: impl FnOnce(&str) -> TeamScore,
    ) -> Option<&mut TeamScore> {
        let key = team_number.trim();
        if key.is_empty() {
            return None;
        }
        Some(
            self.0
                .entry(key.to_string())
                .or_insert_with(|| create(key)),
        )
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the book has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in key order.
    pub fn values(&self) -> impl Iterator<Item = &TeamScore> {
        self.0.values()
    }

    /// Drop any entry stored under a blank key.
    pub fn remove_blank_keys(&mut self) {
        self.0.retain(|key, _| !key.trim().is_empty());
    }
}

/// Order entries by descending [`TeamScore::average`], ignoring blank numbers.
///
/// The sort is stable, so ties keep the book's key order.
#[must_use]
pub fn rank(book: &ScoreBook) -> Vec<TeamScore> {
    let mut ranked: Vec<TeamScore> = book
        .values()
        .filter(|score| !score.team_number.trim().is_empty())
        .cloned()
        .collect();
    ranked.sort_by(|a, b| b.average().total_cmp(&a.average()));
    ranked
}

/// Pit scouting state for the current event.
#[derive(Debug)]
pub struct PitScouting {
    store: SharedStore,
    teams: Vec<Team>,
    scores: ScoreBook,
    rankings: Vec<TeamScore>,
}

impl PitScouting {
    /// Load pit data for `teams`.
    ///
    /// Every roster team with a number starts with a zeroed entry; a stored
    /// book, when present, replaces those seeds wholesale.
    #[must_use]
    pub fn load(store: SharedStore, teams: &[Team]) -> Self {
        let mut scores = ScoreBook::new();
        for team in teams {
            scores.get_or_create(&team.team_number, |key| {
                TeamScore::new(key, team.team_name.clone())
            });
        }

        if let Some(mut saved) = codec::load::<ScoreBook>(store.as_ref(), keys::PIT_SCORES) {
            saved.remove_blank_keys();
            scores = saved;
        }

        let rankings = codec::load::<Vec<TeamScore>>(store.as_ref(), keys::PIT_RANKINGS)
            .unwrap_or_default()
            .into_iter()
            .filter(|score| !score.team_number.trim().is_empty())
            .collect();

        Self {
            store,
            teams: teams.to_vec(),
            scores,
            rankings,
        }
    }

    /// All entries.
    #[must_use]
    pub fn scores(&self) -> &ScoreBook {
        &self.scores
    }

    /// The last generated ranking.
    #[must_use]
    pub fn rankings(&self) -> &[TeamScore] {
        &self.rankings
    }

    /// Notes for one team and phase, or an empty string.
    #[must_use]
    pub fn notes(&self, team_number: &str, field: PitNoteField) -> &str {
        self.scores
            .get(team_number)
            .map_or("", |score| score.note(field))
    }

    /// Set a numeric score (clamped to `0..=10`) and persist the book.
    ///
    /// Blank team numbers are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the book cannot be written; the book is then
    /// unchanged.
    pub fn update_score(&mut self, team_number: &str, field: PitScoreField, value: f64) -> Result<()> {
        let value = clamp_pit_score(value);
        let updated = self.update_entry(team_number, |entry| match field {
            PitScoreField::Compatibility => entry.compatibility_score = value,
            PitScoreField::Overall => entry.overall_score = value,
        })?;
        if !updated {
            debug!("ignoring pit score for blank team number");
        }
        Ok(())
    }

    /// Replace the notes for one phase and persist the book.
    ///
    /// Blank team numbers are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the book cannot be written; the book is then
    /// unchanged.
    pub fn update_notes(&mut self, team_number: &str, field: PitNoteField, text: &str) -> Result<()> {
        let updated = self.update_entry(team_number, |entry| {
            let slot = match field {
                PitNoteField::Auto => &mut entry.auto_score,
                PitNoteField::Teleop => &mut entry.teleop_score,
                PitNoteField::Endgame => &mut entry.endgame_score,
            };
            *slot = text.to_string();
        })?;
        if !updated {
            debug!("ignoring pit notes for blank team number");
        }
        Ok(())
    }

    /// Rank the in-memory entries and persist the ranking.
    ///
    /// # Errors
    ///
    /// Returns an error if the ranking cannot be written; the previous
    /// ranking is then kept.
    pub fn generate_ranking(&mut self) -> Result<&[TeamScore]> {
        let rankings = rank(&self.scores);
        codec::save(self.store.as_ref(), keys::PIT_RANKINGS, &rankings)?;
        info!(teams = rankings.len(), "generated pit ranking");
        self.rankings = rankings;
        Ok(&self.rankings)
    }

    /// Apply `change` to a copy of the book, persist it, then keep it.
    ///
    /// Returns `false` for a blank team number.
    fn update_entry(&mut self, team_number: &str, change: impl FnOnce(&mut TeamScore)) -> Result<bool> {
        let mut next = self.scores.clone();
        let teams = &self.teams;
        let Some(entry) = next.get_or_create(team_number, |key| {
            let name = teams
                .iter()
                .find(|team| team.trimmed_number() == key)
                .map(|team| team.team_name.clone())
                .unwrap_or_default();
            TeamScore::new(key, name)
        }) else {
            return Ok(false);
        };
        change(entry);

        codec::save(self.store.as_ref(), keys::PIT_SCORES, &next)?;
        self.scores = next;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::storage::{KeyValueStore, MemoryStore};

    fn scored(number: &str, compatibility: f64, overall: f64) -> TeamScore {
        TeamScore {
            compatibility_score: compatibility,
            overall_score: overall,
            ..TeamScore::new(number, "")
        }
    }

    fn setup(teams: &[Team]) -> (Rc<MemoryStore>, PitScouting) {
        let inner = Rc::new(MemoryStore::new());
        let pit = PitScouting::load(inner.clone(), teams);
        (inner, pit)
    }

    #[test]
    fn test_clamp_pit_score() {
        assert_eq!(clamp_pit_score(-1.0), 0.0);
        assert_eq!(clamp_pit_score(4.5), 4.5);
        assert_eq!(clamp_pit_score(11.0), 10.0);
        assert_eq!(clamp_pit_score(f64::NAN), 0.0);
    }

    #[test]
    fn test_ranking_orders_by_average_descending() {
        let mut book = ScoreBook::new();
        book.get_or_create("1", |_| scored("1", 8.0, 6.0));
        book.get_or_create("2", |_| scored("2", 9.0, 9.0));

        let ranked = rank(&book);
        let order: Vec<_> = ranked.iter().map(|s| s.team_number.as_str()).collect();
        assert_eq!(order, vec!["2", "1"]);
        assert_eq!(ranked[0].average(), 9.0);
        assert_eq!(ranked[1].average(), 7.0);
    }

    #[test]
    fn test_get_or_create_reports_size_change() {
        let mut book = ScoreBook::new();
        assert_eq!(book.len(), 0);

        book.get_or_create(" 42 ", |key| TeamScore::new(key, ""));
        assert_eq!(book.len(), 1);
        assert!(book.get("42").is_some());

        // Existing entry is returned, not replaced
        book.get_or_create("42", |_| panic!("should not create"));
        assert_eq!(book.len(), 1);

        assert!(book.get_or_create("   ", |key| TeamScore::new(key, "")).is_none());
        assert_eq!(book.len(), 1);
    }

    #[test]
    fn test_load_seeds_roster_teams() {
        let teams = vec![Team::new("7083", "TundraBots"), Team::new("", "Nameless")];
        let (_inner, pit) = setup(&teams);

        assert_eq!(pit.scores().len(), 1);
        let seeded = pit.scores().get("7083").unwrap();
        assert_eq!(seeded.team_name, "TundraBots");
        assert_eq!(seeded.average(), 0.0);
    }

    #[test]
    fn test_stored_book_replaces_seeds() {
        let inner = Rc::new(MemoryStore::new());
        let mut stored = ScoreBook::new();
        stored.get_or_create("1", |_| scored("1", 5.0, 5.0));
        codec::save(inner.as_ref(), keys::PIT_SCORES, &stored).unwrap();

        let pit = PitScouting::load(inner, &[Team::new("2", "Two")]);
        assert_eq!(pit.scores().len(), 1);
        assert!(pit.scores().get("2").is_none());
    }

    #[test]
    fn test_load_drops_blank_keys_and_rankings() {
        let inner = Rc::new(MemoryStore::new());
        inner
            .set(
                keys::PIT_SCORES,
                br#"{"": {"teamNumber": "", "teamName": "", "autoScore": "", "teleopScore": "", "endgameScore": "", "compatibilityScore": 1, "overallScore": 1}}"#,
            )
            .unwrap();
        let ranked = vec![scored("", 1.0, 1.0), scored("3", 2.0, 2.0)];
        codec::save(inner.as_ref(), keys::PIT_RANKINGS, &ranked).unwrap();

        let pit = PitScouting::load(inner, &[]);
        assert!(pit.scores().is_empty());
        assert_eq!(pit.rankings().len(), 1);
        assert_eq!(pit.rankings()[0].team_number, "3");
    }

    #[test]
    fn test_update_score_creates_lazily_and_persists() {
        let (inner, mut pit) = setup(&[]);
        pit.update_score("  9 ", PitScoreField::Overall, 12.0).unwrap();

        let entry = pit.scores().get("9").unwrap();
        assert_eq!(entry.team_number, "9");
        assert_eq!(entry.overall_score, 10.0);

        let saved: ScoreBook = codec::load(inner.as_ref(), keys::PIT_SCORES).unwrap();
        assert_eq!(saved.get("9").unwrap().overall_score, 10.0);
    }

    #[test]
    fn test_lazy_entry_takes_roster_name() {
        let inner = Rc::new(MemoryStore::new());
        // Stored book exists, so the roster seed is replaced
        codec::save(inner.as_ref(), keys::PIT_SCORES, &ScoreBook::new()).unwrap();
        let mut pit = PitScouting::load(inner, &[Team::new("11", "Eleven")]);
        assert!(pit.scores().is_empty());

        pit.update_score("11", PitScoreField::Compatibility, 3.0)
            .unwrap();
        assert_eq!(pit.scores().get("11").unwrap().team_name, "Eleven");
    }

    #[test]
    fn test_update_score_blank_team_is_ignored() {
        let (inner, mut pit) = setup(&[]);
        pit.update_score("  ", PitScoreField::Overall, 5.0).unwrap();

        assert!(pit.scores().is_empty());
        assert!(!inner.contains(keys::PIT_SCORES));
    }

    #[test]
    fn test_update_and_read_notes() {
        let (_inner, mut pit) = setup(&[]);
        pit.update_notes("5", PitNoteField::Endgame, "hangs reliably")
            .unwrap();

        assert_eq!(pit.notes("5", PitNoteField::Endgame), "hangs reliably");
        assert_eq!(pit.notes("5", PitNoteField::Auto), "");
        assert_eq!(pit.notes("6", PitNoteField::Auto), "");
    }

    #[test]
    fn test_generate_ranking_persists() {
        let (inner, mut pit) = setup(&[]);
        pit.update_score("1", PitScoreField::Compatibility, 8.0)
            .unwrap();
        pit.update_score("1", PitScoreField::Overall, 6.0).unwrap();
        pit.update_score("2", PitScoreField::Compatibility, 9.0)
            .unwrap();
        pit.update_score("2", PitScoreField::Overall, 9.0).unwrap();

        let order: Vec<String> = pit
            .generate_ranking()
            .unwrap()
            .iter()
            .map(|s| s.team_number.clone())
            .collect();
        assert_eq!(order, vec!["2".to_string(), "1".to_string()]);

        let saved: Vec<TeamScore> = codec::load(inner.as_ref(), keys::PIT_RANKINGS).unwrap();
        assert_eq!(saved.len(), 2);
        assert_eq!(saved[0].team_number, "2");
    }

    #[test]
    fn test_generate_ranking_does_not_read_back() {
        let (inner, mut pit) = setup(&[]);
        pit.update_score("1", PitScoreField::Overall, 4.0).unwrap();
        // Someone else wipes the stored book; the in-memory set still ranks
        inner.remove(keys::PIT_SCORES).unwrap();

        assert_eq!(pit.generate_ranking().unwrap().len(), 1);
    }

    #[test]
    fn test_failed_write_keeps_book_and_ranking() {
        let (inner, mut pit) = setup(&[]);
        pit.update_score("1", PitScoreField::Overall, 6.0).unwrap();
        pit.generate_ranking().unwrap();
        inner.set_read_only(true);

        assert!(pit.update_score("1", PitScoreField::Overall, 9.0).is_err());
        assert!(pit.update_score("2", PitScoreField::Overall, 9.0).is_err());
        assert!(pit
            .update_notes("1", PitNoteField::Auto, "shoots from range")
            .is_err());
        assert_eq!(pit.scores().len(), 1);
        assert_eq!(pit.scores().get("1").unwrap().overall_score, 6.0);
        assert_eq!(pit.notes("1", PitNoteField::Auto), "");

        inner.set_read_only(false);
        pit.update_score("2", PitScoreField::Overall, 9.0).unwrap();
        inner.set_read_only(true);
        assert!(pit.generate_ranking().is_err());
        assert_eq!(pit.rankings().len(), 1);
        assert_eq!(pit.rankings()[0].team_number, "1");
    }
}
