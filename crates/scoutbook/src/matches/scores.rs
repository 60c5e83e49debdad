//! Per-match score sheets.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::setup::{MatchSetupData, Slot};

/// Highest score a team can get in one category.
pub const MAX_MATCH_SCORE: u8 = 5;

/// Clamp a raw input into `0..=5`.
#[must_use]
pub fn clamp_score(value: i64) -> u8 {
    // The clamp guarantees the value fits
    u8::try_from(value.clamp(0, i64::from(MAX_MATCH_SCORE))).unwrap_or(0)
}

/// Scored phases of a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScoreCategory {
    /// Autonomous period.
    Auto,
    /// Driver-controlled period.
    #[serde(rename = "TeleOp")]
    Teleop,
    /// Endgame.
    Endgame,
}

impl ScoreCategory {
    /// All categories in display order.
    pub const ALL: [ScoreCategory; 3] = [Self::Auto, Self::Teleop, Self::Endgame];

    /// Chart label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Auto => "Auto",
            Self::Teleop => "TeleOp",
            Self::Endgame => "Endgame",
        }
    }
}

impl std::fmt::Display for ScoreCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// One team's scores in one match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamScores {
    /// Autonomous score, `0..=5`.
    pub auto: u8,
    /// Driver-controlled score, `0..=5`.
    pub teleop: u8,
    /// Endgame score, `0..=5`.
    pub endgame: u8,
    /// Mean of the three category scores.
    pub match_average: f64,
}

impl TeamScores {
    /// All categories zero.
    #[must_use]
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// Score in `category`.
    #[must_use]
    pub fn get(&self, category: ScoreCategory) -> u8 {
        match category {
            ScoreCategory::Auto => self.auto,
            ScoreCategory::Teleop => self.teleop,
            ScoreCategory::Endgame => self.endgame,
        }
    }

    /// Set `category` to `value` clamped into range, then recompute the average.
    pub fn set(&mut self, category: ScoreCategory, value: i64) {
        let value = clamp_score(value);
        match category {
            ScoreCategory::Auto => self.auto = value,
            ScoreCategory::Teleop => self.teleop = value,
            ScoreCategory::Endgame => self.endgame = value,
        }
        self.match_average =
            (f64::from(self.auto) + f64::from(self.teleop) + f64::from(self.endgame)) / 3.0;
    }
}

/// Score sheet of one match, frozen from the schedule at finalize time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchData {
    /// 1-based match number.
    pub match_number: u32,
    /// Red alliance, first team.
    pub red_team1: String,
    /// Red alliance, second team.
    pub red_team2: String,
    /// Blue alliance, first team.
    pub blue_team1: String,
    /// Blue alliance, second team.
    pub blue_team2: String,
    /// Scores keyed by trimmed team number.
    pub scores: BTreeMap<String, TeamScores>,
}

impl MatchData {
    /// Freeze `setup` into a score sheet with a zeroed entry per distinct team.
    #[must_use]
    pub fn from_setup(setup: &MatchSetupData) -> Self {
        let scores = Slot::ALL
            .iter()
            .map(|slot| setup.team(*slot).trim())
            .filter(|team| !team.is_empty())
            .map(|team| (team.to_string(), TeamScores::zeroed()))
            .collect();

        Self {
            match_number: setup.match_number,
            red_team1: setup.red_team1.clone(),
            red_team2: setup.red_team2.clone(),
            blue_team1: setup.blue_team1.clone(),
            blue_team2: setup.blue_team2.clone(),
            scores,
        }
    }

    /// Team number in `slot`, as frozen from the schedule.
    #[must_use]
    pub fn team(&self, slot: Slot) -> &str {
        match slot {
            Slot::Red1 => &self.red_team1,
            Slot::Red2 => &self.red_team2,
            Slot::Blue1 => &self.blue_team1,
            Slot::Blue2 => &self.blue_team2,
        }
    }

    /// Scores for `team_number`, created zeroed if absent.
    ///
    /// Returns `None` for a blank team number.
    pub fn get_or_create(&mut self, team_number: &str) -> Option<&mut TeamScores> {
        let key = team_number.trim();
        if key.is_empty() {
            return None;
        }
        Some(self.scores.entry(key.to_string()).or_default())
    }
}
