//! The fixed key namespace.

/// Event roster, a list of teams.
pub const EVENT_TEAMS: &str = "eventTeams";
/// Pit scores keyed by trimmed team number.
pub const PIT_SCORES: &str = "pitScoutingScores";
/// Last generated pit ranking.
pub const PIT_RANKINGS: &str = "pitScoutingRankings";
/// Match schedule draft.
pub const MATCH_SETUP: &str = "matchScoutingSetup";
/// Frozen per-match score sheets.
pub const MATCH_DATA: &str = "matchScoutingData";
/// Boolean flag set once the schedule is finalized.
pub const MATCH_FINALIZED: &str = "matchScoutingFinalized";
/// List of archived competitions.
pub const ARCHIVED_COMPETITIONS: &str = "archivedCompetitions";

/// Keys captured by an archive snapshot, in snapshot order.
pub const ARCHIVED_KEYS: [&str; 6] = [
    EVENT_TEAMS,
    PIT_SCORES,
    PIT_RANKINGS,
    MATCH_SETUP,
    MATCH_DATA,
    MATCH_FINALIZED,
];

/// Keys cleared by a match-scouting reset.
pub const MATCH_KEYS: [&str; 3] = [MATCH_SETUP, MATCH_DATA, MATCH_FINALIZED];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_archive_excludes_archive_list() {
        assert!(!ARCHIVED_KEYS.contains(&ARCHIVED_COMPETITIONS));
        for key in MATCH_KEYS {
            assert!(ARCHIVED_KEYS.contains(&key));
        }
    }
}
