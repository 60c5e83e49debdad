//! Aggregates over score sheets for the summary cards and breakdown chart.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::TeamOrder;

use super::scores::{MatchData, ScoreCategory};

/// Headline numbers for the match-scouting dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryStats {
    /// Distinct non-blank teams with a score entry in any match.
    pub teams_count: usize,
    /// Matches with at least one score entry.
    pub matches_with_data: usize,
    /// Mean of every recorded match average, 0 when there are none.
    pub overall_average: f64,
}

impl SummaryStats {
    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.teams_count == 0 && self.matches_with_data == 0
    }
}

/// One bar of the breakdown chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakdownPoint {
    /// Team number.
    pub team_number: String,
    /// Scored phase.
    pub category: ScoreCategory,
    /// Mean score for the phase across the team's matches.
    pub score: f64,
}

fn distinct_teams(matches: &[MatchData]) -> BTreeSet<&str> {
    matches
        .iter()
        .flat_map(|m| m.scores.keys())
        .map(String::as_str)
        .filter(|team| !team.trim().is_empty())
        .collect()
}

/// Summarize `matches`. Empty input gives the all-zero default.
#[must_use]
pub fn summary_stats(matches: &[MatchData]) -> SummaryStats {
    let teams_count = distinct_teams(matches).len();
    let matches_with_data = matches.iter().filter(|m| !m.scores.is_empty()).count();

    let (total, count) = matches
        .iter()
        .flat_map(|m| m.scores.values())
        .fold((0.0, 0_u32), |(total, count), scores| {
            (total + scores.match_average, count + 1)
        });
    let overall_average = if count > 0 {
        total / f64::from(count)
    } else {
        0.0
    };

    SummaryStats {
        teams_count,
        matches_with_data,
        overall_average,
    }
}

/// Whether any match has at least one score entry, even an all-zero one.
#[must_use]
pub fn has_score_data(matches: &[MatchData]) -> bool {
    matches.iter().any(|m| !m.scores.is_empty())
}

/// Mean match average of `team_number` over the matches it was scored in.
#[must_use]
pub fn team_average(matches: &[MatchData], team_number: &str) -> Option<f64> {
    let key = team_number.trim();
    let averages: Vec<f64> = matches
        .iter()
        .filter_map(|m| m.scores.get(key))
        .map(|s| s.match_average)
        .collect();
    if averages.is_empty() {
        return None;
    }
    let count = u32::try_from(averages.len()).unwrap_or(u32::MAX);
    Some(averages.iter().sum::<f64>() / f64::from(count))
}

/// Sort team numbers for display.
///
/// [`TeamOrder::Lexicographic`] compares strings, so "10" comes before "9".
/// [`TeamOrder::Numeric`] puts numbers that parse as integers first, in
/// numeric order, followed by everything else as strings.
pub fn order_teams(teams: &mut [String], order: TeamOrder) {
    match order {
        TeamOrder::Lexicographic => teams.sort(),
        TeamOrder::Numeric => teams.sort_by(|a, b| {
            match (a.trim().parse::<u64>(), b.trim().parse::<u64>()) {
                (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
                (Ok(_), Err(_)) => Ordering::Less,
                (Err(_), Ok(_)) => Ordering::Greater,
                (Err(_), Err(_)) => a.cmp(b),
            }
        }),
    }
}

/// Per-team, per-category means for the first `max_teams` teams in `order`.
///
/// Returns `None` when there are no matches or nobody has a score entry.
#[must_use]
pub fn breakdown(
    matches: &[MatchData],
    max_teams: usize,
    order: TeamOrder,
) -> Option<Vec<BreakdownPoint>> {
    if matches.is_empty() {
        return None;
    }

    let mut teams: Vec<String> = distinct_teams(matches)
        .into_iter()
        .map(str::to_string)
        .collect();
    order_teams(&mut teams, order);
    teams.truncate(max_teams);

    let mut points = Vec::with_capacity(teams.len() * ScoreCategory::ALL.len());
    for team in teams {
        let entries: Vec<_> = matches
            .iter()
            .filter_map(|m| m.scores.get(&team))
            .collect();
        if entries.is_empty() {
            continue;
        }
        let count = f64::from(u32::try_from(entries.len()).unwrap_or(u32::MAX));
        for category in ScoreCategory::ALL {
            let total: f64 = entries.iter().map(|s| f64::from(s.get(category))).sum();
            points.push(BreakdownPoint {
                team_number: team.clone(),
                category,
                score: total / count,
            });
        }
    }

    if points.is_empty() {
        None
    } else {
        Some(points)
    }
}
