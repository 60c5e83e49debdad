//! Match schedule drafts.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// One of the four team positions in a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// First red alliance team.
    Red1,
    /// Second red alliance team.
    Red2,
    /// First blue alliance team.
    Blue1,
    /// Second blue alliance team.
    Blue2,
}

impl Slot {
    /// All slots in schedule order.
    pub const ALL: [Slot; 4] = [Slot::Red1, Slot::Red2, Slot::Blue1, Slot::Blue2];

    /// Short label used in listings.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Red1 => "Red 1",
            Self::Red2 => "Red 2",
            Self::Blue1 => "Blue 1",
            Self::Blue2 => "Blue 2",
        }
    }
}

/// The four team slots of one scheduled match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSetupData {
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
}

impl MatchSetupData {
    /// A match with every slot empty.
    #[must_use]
    pub fn empty(match_number: u32) -> Self {
        Self {
            match_number,
            ..Self::default()
        }
    }

    /// Team number in `slot`, as typed.
    #[must_use]
    pub fn team(&self, slot: Slot) -> &str {
        match slot {
            Slot::Red1 => &self.red_team1,
            Slot::Red2 => &self.red_team2,
            Slot::Blue1 => &self.blue_team1,
            Slot::Blue2 => &self.blue_team2,
        }
    }

    /// Overwrite the team number in `slot`.
    pub fn set_team(&mut self, slot: Slot, team_number: &str) {
        let target = match slot {
            Slot::Red1 => &mut self.red_team1,
            Slot::Red2 => &mut self.red_team2,
            Slot::Blue1 => &mut self.blue_team1,
            Slot::Blue2 => &mut self.blue_team2,
        };
        *target = team_number.to_string();
    }

    /// Whether any slot holds a non-blank team number.
    #[must_use]
    pub fn has_any_team(&self) -> bool {
        Slot::ALL
            .iter()
            .any(|slot| !self.team(*slot).trim().is_empty())
    }
}

/// Largest schedule the setup form accepts.
pub const MAX_TOTAL_MATCHES: u32 = 1000;

/// A schedule being drafted before match scouting starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSetup {
    /// Number of matches in the schedule.
    pub total_matches: u32,
    /// The scouting team's own number.
    pub our_team: String,
    /// One entry per match, numbered from 1.
    pub matches: Vec<MatchSetupData>,
}

impl MatchSetup {
    /// Build an empty schedule from the setup form fields.
    ///
    /// # Errors
    ///
    /// Rejects a match count that is not an integer in
    /// `1..=MAX_TOTAL_MATCHES` and a blank team identifier.
    pub fn from_form(total_matches: &str, our_team: &str) -> Result<Self, ValidationError> {
        let total_matches = total_matches
            .trim()
            .parse::<u32>()
            .ok()
            .filter(|n| (1..=MAX_TOTAL_MATCHES).contains(n))
            .ok_or(ValidationError::InvalidMatchCount)?;

        let our_team = our_team.trim();
        if our_team.is_empty() {
            return Err(ValidationError::EmptyTeamIdentifier);
        }

        Ok(Self {
            total_matches,
            our_team: our_team.to_string(),
            matches: (1..=total_matches).map(MatchSetupData::empty).collect(),
        })
    }

    /// Whether any slot in any match holds a team.
    #[must_use]
    pub fn has_any_team(&self) -> bool {
        self.matches.iter().any(MatchSetupData::has_any_team)
    }
}
