//! `scoutbook` - A local scouting notebook for robotics competitions
//!
//! This library keeps the event roster, pit scouting scores and notes, match
//! ratings and named archives of past competitions in one key-value store,
//! and computes the rankings and statistics shown over them.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod app;
pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod matches;
pub mod pit;
pub mod roster;
pub mod storage;

pub use app::Scoutbook;
pub use archive::{ArchiveDetail, ArchiveShelf, ArchivedCompetition};
pub use config::Config;
pub use error::{Error, Result, ValidationError};
pub use logging::init_logging;
pub use matches::{MatchPhase, MatchScouting};
pub use pit::PitScouting;
pub use roster::{Roster, Team};
pub use storage::{KeyValueStore, MemoryStore, SharedStore, Storage};
