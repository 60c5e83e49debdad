//! Command-line interface for scoutbook.
//!
//! This module provides the CLI structure parsed by the `scoutbook` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    ArchiveCommand, CategoryArg, ConfigCommand, MatchesCommand, OutputFormat, PitCommand,
    PitScoreArg, SlotArg, TeamFieldArg, TeamsCommand, WipeCommand,
};

/// scoutbook - Robotics competition scouting notebook
///
/// Keeps the event roster, pit scouting notes and scores, match-by-match
/// ratings and named archives of past competitions in a local database.
#[derive(Debug, Parser)]
#[command(name = "scoutbook")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(long, global = true, value_enum, default_value = "plain")]
    pub format: OutputFormat,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the event roster
    #[command(subcommand)]
    Teams(TeamsCommand),

    /// Record pit scouting notes and scores
    #[command(subcommand)]
    Pit(PitCommand),

    /// Set up matches and record match scores
    #[command(subcommand)]
    Matches(MatchesCommand),

    /// Archive the current competition or browse past ones
    #[command(subcommand)]
    Archive(ArchiveCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),

    /// Delete all live scouting data (archives are kept)
    Wipe(WipeCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        if self.quiet {
            crate::logging::Verbosity::Quiet
        } else {
            match self.verbose {
                0 => crate::logging::Verbosity::Normal,
                1 => crate::logging::Verbosity::Verbose,
                _ => crate::logging::Verbosity::Trace,
            }
        }
    }
}
