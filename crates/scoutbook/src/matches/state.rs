//! Lifecycle of the match schedule.
//!
//! ```text
//! Unconfigured --configure--> ScheduleDraft --finalize--> Finalized
//!       ^                                                     |
//!       +------------------------ reset ----------------------+
//! ```
//!
//! Transitions are pure: they borrow the current phase and either return the
//! next one or a [`ValidationError`], leaving the current phase untouched.

use tracing::warn;

use crate::error::ValidationError;

use super::scores::MatchData;
use super::setup::MatchSetup;

/// Where the match-scouting workflow currently stands.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum MatchPhase {
    /// No schedule yet.
    #[default]
    Unconfigured,
    /// Schedule created; slots can still be edited.
    ScheduleDraft(MatchSetup),
    /// Schedule frozen into score sheets.
    Finalized {
        /// The schedule as it was when finalized.
        setup: MatchSetup,
        /// One score sheet per scheduled match.
        matches: Vec<MatchData>,
    },
}

impl MatchPhase {
    /// Rebuild the phase from stored records.
    ///
    /// A finalized flag without a schedule is inconsistent and falls back to
    /// `Unconfigured`.
    #[must_use]
    pub fn from_stored(
        setup: Option<MatchSetup>,
        matches: Option<Vec<MatchData>>,
        finalized: bool,
    ) -> Self {
        match (setup, finalized) {
            (None, true) => {
                warn!("finalized flag set without a stored schedule, ignoring");
                Self::Unconfigured
            }
            (None, false) => Self::Unconfigured,
            (Some(setup), false) => Self::ScheduleDraft(setup),
            (Some(setup), true) => Self::Finalized {
                setup,
                matches: matches.unwrap_or_default(),
            },
        }
    }

    /// Human-readable phase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Unconfigured => "unconfigured",
            Self::ScheduleDraft(_) => "drafting a schedule",
            Self::Finalized { .. } => "finalized",
        }
    }

    /// The schedule, if one exists.
    #[must_use]
    pub fn setup(&self) -> Option<&MatchSetup> {
        match self {
            Self::Unconfigured => None,
            Self::ScheduleDraft(setup) | Self::Finalized { setup, .. } => Some(setup),
        }
    }

    /// Score sheets; empty until finalized.
    #[must_use]
    pub fn matches(&self) -> &[MatchData] {
        match self {
            Self::Finalized { matches, .. } => matches,
            _ => &[],
        }
    }

    /// Whether the schedule has been frozen.
    #[must_use]
    pub fn is_finalized(&self) -> bool {
        matches!(self, Self::Finalized { .. })
    }

    /// `Unconfigured -> ScheduleDraft`: create an empty schedule from the setup form.
    ///
    /// # Errors
    ///
    /// Fails on invalid form input or when a schedule already exists.
    pub fn configure(&self, total_matches: &str, our_team: &str) -> Result<Self, ValidationError> {
        if !matches!(self, Self::Unconfigured) {
            return Err(self.refuse("create a new schedule"));
        }
        MatchSetup::from_form(total_matches, our_team).map(Self::ScheduleDraft)
    }

    /// `ScheduleDraft -> Finalized`: freeze every match into a score sheet.
    ///
    /// # Errors
    ///
    /// Fails when not drafting or when no slot holds a team.
    pub fn finalize(&self) -> Result<Self, ValidationError> {
        let Self::ScheduleDraft(setup) = self else {
            return Err(self.refuse("finalize the schedule"));
        };
        if !setup.has_any_team() {
            return Err(ValidationError::EmptySchedule);
        }
        Ok(Self::Finalized {
            setup: setup.clone(),
            matches: setup.matches.iter().map(MatchData::from_setup).collect(),
        })
    }

    pub(crate) fn refuse(&self, action: &'static str) -> ValidationError {
        ValidationError::InvalidTransition {
            from: self.name(),
            action,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matches::setup::Slot;

    fn draft() -> MatchPhase {
        MatchPhase::Unconfigured.configure("2", "7083").unwrap()
    }

    #[test]
    fn test_configure_rejects_invalid_input() {
        let phase = MatchPhase::Unconfigured;
        assert_eq!(
            phase.configure("0", "7083"),
            Err(ValidationError::InvalidMatchCount)
        );
        assert_eq!(
            phase.configure("", "7083"),
            Err(ValidationError::InvalidMatchCount)
        );
        assert_eq!(
            phase.configure("3", ""),
            Err(ValidationError::EmptyTeamIdentifier)
        );
    }

    #[test]
    fn test_configure_creates_draft() {
        let phase = MatchPhase::Unconfigured.configure("3", "7083").unwrap();
        let setup = phase.setup().unwrap();
        assert_eq!(setup.matches.len(), 3);
        assert!(!phase.is_finalized());
        assert!(phase.matches().is_empty());
    }

    #[test]
    fn test_configure_twice_is_refused() {
        let err = draft().configure("3", "7083").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidTransition { .. }));
    }

    #[test]
    fn test_finalize_all_blank_is_rejected() {
        assert_eq!(draft().finalize(), Err(ValidationError::EmptySchedule));
    }

    #[test]
    fn test_finalize_with_one_team() {
        let mut phase = draft();
        if let MatchPhase::ScheduleDraft(setup) = &mut phase {
            setup.matches[1].set_team(Slot::Red2, "42");
        }

        let finalized = phase.finalize().unwrap();
        assert!(finalized.is_finalized());
        let matches = finalized.matches();
        assert_eq!(matches.len(), 2);
        assert!(matches[0].scores.is_empty());
        assert_eq!(matches[1].scores.len(), 1);
        assert_eq!(matches[1].scores["42"].match_average, 0.0);
    }

    #[test]
    fn test_finalize_from_unconfigured_is_refused() {
        let err = MatchPhase::Unconfigured.finalize().unwrap_err();
        assert_eq!(
            err.to_string(),
            "cannot finalize the schedule while match scouting is unconfigured"
        );
    }

    #[test]
    fn test_from_stored() {
        let setup = MatchSetup::from_form("1", "1").unwrap();

        assert_eq!(
            MatchPhase::from_stored(None, None, false),
            MatchPhase::Unconfigured
        );
        assert_eq!(
            MatchPhase::from_stored(None, None, true),
            MatchPhase::Unconfigured
        );
        assert!(matches!(
            MatchPhase::from_stored(Some(setup.clone()), None, false),
            MatchPhase::ScheduleDraft(_)
        ));
        let finalized = MatchPhase::from_stored(Some(setup), None, true);
        assert!(finalized.is_finalized());
        assert!(finalized.matches().is_empty());
    }
}
