//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands. Row and match
//! numbers are 1-based here and converted to indices by the handlers.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Subcommand, ValueEnum};
use uuid::Uuid;

use crate::matches::{ScoreCategory, Slot};
use crate::pit::{PitNoteField, PitScoreField};
use crate::roster::TeamField;

/// Roster commands.
#[derive(Debug, Subcommand)]
pub enum TeamsCommand {
    /// List the roster
    List,

    /// Append a team, blank unless a number or name is given
    Add {
        /// Team number
        number: Option<String>,
        /// Team name
        name: Option<String>,
    },

    /// Change one field of a roster row
    Edit {
        /// Row number as shown by `teams list`
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        row: u32,
        /// Field to change
        #[arg(value_enum)]
        field: TeamFieldArg,
        /// New value
        value: String,
    },

    /// Remove a roster row
    Delete {
        /// Row number as shown by `teams list`
        #[arg(value_parser = clap::value_parser!(u32).range(1..))]
        row: u32,
    },
}

/// Pit scouting commands.
#[derive(Debug, Subcommand)]
pub enum PitCommand {
    /// Show every team's pit entry
    Show,

    /// Set a numeric pit score (clamped to 0-10)
    Score {
        /// Team number
        team: String,
        /// Score to set
        #[arg(value_enum)]
        field: PitScoreArg,
        /// Value
        #[arg(allow_negative_numbers = true)]
        value: f64,
    },

    /// Replace the notes for one phase
    Note {
        /// Team number
        team: String,
        /// Phase the notes describe
        #[arg(value_enum)]
        field: CategoryArg,
        /// Note text
        text: String,
    },

    /// Rank teams by their average pit score
    Rank,
}

/// Match scouting commands.
#[derive(Debug, Subcommand)]
pub enum MatchesCommand {
    /// Show the schedule and score sheets
    Show,

    /// Create the match schedule
    Setup {
        /// Number of matches
        total: String,
        /// Your team number
        our_team: String,
    },

    /// Put a team into a schedule slot
    Slot {
        /// Match number
        #[arg(value_name = "MATCH", value_parser = clap::value_parser!(u32).range(1..))]
        match_number: u32,
        /// Alliance slot
        #[arg(value_enum)]
        slot: SlotArg,
        /// Team number
        team: String,
    },

    /// Freeze the schedule and start scoring
    Finalize,

    /// Record a score (clamped to 0-5)
    Score {
        /// Match number
        #[arg(value_name = "MATCH", value_parser = clap::value_parser!(u32).range(1..))]
        match_number: u32,
        /// Team number
        team: String,
        /// Match phase
        #[arg(value_enum)]
        category: CategoryArg,
        /// Value
        #[arg(allow_negative_numbers = true)]
        value: i64,
    },

    /// Show summary statistics
    Summary,

    /// Show per-team category averages
    Breakdown,

    /// Discard the schedule and all match scores
    Reset {
        /// Skip confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

/// Archive commands.
#[derive(Debug, Subcommand)]
pub enum ArchiveCommand {
    /// List archived competitions, newest first
    List,

    /// Archive the current data
    Create {
        /// Competition name
        name: String,
        /// Competition date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        date: Option<NaiveDate>,
    },

    /// Show an archived competition
    Show {
        /// Archive id
        id: Uuid,
    },

    /// Delete an archived competition
    Delete {
        /// Archive id
        id: Uuid,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Wipe command arguments.
#[derive(Debug, Args)]
pub struct WipeCommand {
    /// Skip confirmation
    #[arg(short, long)]
    pub yes: bool,
}

/// Roster field argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TeamFieldArg {
    /// Team number
    Number,
    /// Team name
    Name,
}

impl From<TeamFieldArg> for TeamField {
    fn from(arg: TeamFieldArg) -> Self {
        match arg {
            TeamFieldArg::Number => Self::Number,
            TeamFieldArg::Name => Self::Name,
        }
    }
}

/// Numeric pit score argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PitScoreArg {
    /// Compatibility with our robot
    Compatibility,
    /// Overall impression
    Overall,
}

impl From<PitScoreArg> for PitScoreField {
    fn from(arg: PitScoreArg) -> Self {
        match arg {
            PitScoreArg::Compatibility => Self::Compatibility,
            PitScoreArg::Overall => Self::Overall,
        }
    }
}

/// Match phase argument, used for pit notes and match scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CategoryArg {
    /// Autonomous period
    Auto,
    /// Driver-controlled period
    Teleop,
    /// Endgame
    Endgame,
}

impl From<CategoryArg> for ScoreCategory {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Auto => Self::Auto,
            CategoryArg::Teleop => Self::Teleop,
            CategoryArg::Endgame => Self::Endgame,
        }
    }
}

impl From<CategoryArg> for PitNoteField {
    fn from(arg: CategoryArg) -> Self {
        match arg {
            CategoryArg::Auto => Self::Auto,
            CategoryArg::Teleop => Self::Teleop,
            CategoryArg::Endgame => Self::Endgame,
        }
    }
}

/// Schedule slot argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SlotArg {
    /// First red alliance team
    Red1,
    /// Second red alliance team
    Red2,
    /// First blue alliance team
    Blue1,
    /// Second blue alliance team
    Blue2,
}

impl From<SlotArg> for Slot {
    fn from(arg: SlotArg) -> Self {
        match arg {
            SlotArg::Red1 => Self::Red1,
            SlotArg::Red2 => Self::Red2,
            SlotArg::Blue1 => Self::Blue1,
            SlotArg::Blue2 => Self::Blue2,
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_arg_conversion() {
        assert_eq!(Slot::from(SlotArg::Red1), Slot::Red1);
        assert_eq!(Slot::from(SlotArg::Red2), Slot::Red2);
        assert_eq!(Slot::from(SlotArg::Blue1), Slot::Blue1);
        assert_eq!(Slot::from(SlotArg::Blue2), Slot::Blue2);
    }

    #[test]
    fn test_category_arg_conversion() {
        assert_eq!(ScoreCategory::from(CategoryArg::Teleop), ScoreCategory::Teleop);
        assert_eq!(PitNoteField::from(CategoryArg::Endgame), PitNoteField::Endgame);
    }

    #[test]
    fn test_field_arg_conversion() {
        assert_eq!(TeamField::from(TeamFieldArg::Name), TeamField::Name);
        assert_eq!(
            PitScoreField::from(PitScoreArg::Compatibility),
            PitScoreField::Compatibility
        );
    }

    #[test]
    fn test_output_format_default() {
        assert_eq!(OutputFormat::default(), OutputFormat::Plain);
    }

    #[test]
    fn test_slot_arg_value_names() {
        let names: Vec<String> = SlotArg::value_variants()
            .iter()
            .filter_map(|v| v.to_possible_value())
            .map(|v| v.get_name().to_string())
            .collect();
        assert_eq!(names, vec!["red1", "red2", "blue1", "blue2"]);
    }
}
