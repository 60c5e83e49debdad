//! `scoutbook` - CLI for the scouting notebook
//!
//! This binary drives the roster, pit, match and archive views from the
//! command line.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use chrono::{NaiveTime, Utc};
use clap::Parser;
use serde::Serialize;

use scoutbook::cli::{
    ArchiveCommand, Cli, Command, ConfigCommand, MatchesCommand, OutputFormat, PitCommand,
    TeamsCommand,
};
use scoutbook::matches::{MatchPhase, Slot};
use scoutbook::{init_logging, Config, Error, Scoutbook};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<Error>().and_then(Error::as_validation) {
                Some(validation) => eprintln!("{validation}"),
                None => eprintln!("error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = Config::load_from(cli.config.clone()).context("failed to load configuration")?;
    let format = cli.format;

    if let Command::Config(cmd) = cli.command {
        return handle_config(&config, cmd);
    }

    let app = Scoutbook::open(config).context("failed to open scouting database")?;
    match cli.command {
        Command::Teams(cmd) => handle_teams(&app, cmd, format),
        Command::Pit(cmd) => handle_pit(&app, cmd, format),
        Command::Matches(cmd) => handle_matches(&app, cmd, format),
        Command::Archive(cmd) => handle_archive(&app, cmd, format),
        Command::Wipe(cmd) => {
            if cmd.yes {
                app.delete_all_data()?;
                println!("All live scouting data deleted. Archives were kept.");
            } else {
                println!("This deletes the roster, pit data and match data.");
                println!("Use --yes to confirm.");
            }
            Ok(())
        }
        Command::Config(_) => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn index_of(number: u32) -> usize {
    usize::try_from(number.saturating_sub(1)).unwrap_or(usize::MAX)
}

fn handle_teams(app: &Scoutbook, cmd: TeamsCommand, format: OutputFormat) -> anyhow::Result<()> {
    let mut roster = app.roster();
    match cmd {
        TeamsCommand::List => {
            if format == OutputFormat::Json {
                return print_json(roster.teams());
            }
            if roster.teams().is_empty() {
                println!("No teams added yet.");
            }
            for (row, team) in roster.teams().iter().enumerate() {
                println!("{:>3}  {:<8} {}", row + 1, team.team_number, team.team_name);
            }
        }
        TeamsCommand::Add { number, name } => {
            let row = roster.add()?;
            let now = Instant::now();
            if let Some(number) = number {
                roster.edit(row, scoutbook::roster::TeamField::Number, &number, now)?;
            }
            if let Some(name) = name {
                roster.edit(row, scoutbook::roster::TeamField::Name, &name, now)?;
            }
            roster.flush()?;
            println!("Added row {}.", row + 1);
        }
        TeamsCommand::Edit { row, field, value } => {
            if roster.edit(index_of(row), field.into(), &value, Instant::now())? {
                roster.flush()?;
                println!("Updated row {row}.");
            } else {
                println!("No row {row}.");
            }
        }
        TeamsCommand::Delete { row } => match roster.delete(index_of(row))? {
            Some(team) => println!("Removed {} {}.", team.team_number, team.team_name),
            None => println!("No row {row}."),
        },
    }
    Ok(())
}

fn handle_pit(app: &Scoutbook, cmd: PitCommand, format: OutputFormat) -> anyhow::Result<()> {
    let mut pit = app.pit();
    match cmd {
        PitCommand::Show => {
            if format == OutputFormat::Json {
                return print_json(pit.scores());
            }
            if pit.scores().is_empty() {
                println!("No pit data yet.");
            }
            for score in pit.scores().values() {
                println!(
                    "{} {}: compatibility {:.1}, overall {:.1}",
                    score.team_number, score.team_name, score.compatibility_score, score.overall_score
                );
                for (label, note) in [
                    ("auto", &score.auto_score),
                    ("teleop", &score.teleop_score),
                    ("endgame", &score.endgame_score),
                ] {
                    if !note.is_empty() {
                        println!("    {label}: {note}");
                    }
                }
            }
        }
        PitCommand::Score { team, field, value } => {
            pit.update_score(&team, field.into(), value)?;
        }
        PitCommand::Note { team, field, text } => {
            pit.update_notes(&team, field.into(), &text)?;
        }
        PitCommand::Rank => {
            let ranking = pit.generate_ranking()?;
            if format == OutputFormat::Json {
                return print_json(ranking);
            }
            for (place, score) in ranking.iter().enumerate() {
                println!(
                    "{:>3}. {:<8} {:<24} {:.1}",
                    place + 1,
                    score.team_number,
                    score.team_name,
                    score.average()
                );
            }
        }
    }
    Ok(())
}

fn handle_matches(
    app: &Scoutbook,
    cmd: MatchesCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut matches = app.matches();
    match cmd {
        MatchesCommand::Show => {
            if format == OutputFormat::Json {
                return print_json(&serde_json::json!({
                    "phase": matches.phase().name(),
                    "setup": matches.phase().setup(),
                    "matches": matches.matches(),
                }));
            }
            print_phase(matches.phase());
        }
        MatchesCommand::Setup { total, our_team } => {
            matches.submit_setup(&total, &our_team)?;
            println!("Schedule created. Fill in slots, then run `matches finalize`.");
        }
        MatchesCommand::Slot {
            match_number,
            slot,
            team,
        } => {
            matches.set_slot(index_of(match_number), slot.into(), &team)?;
        }
        MatchesCommand::Finalize => {
            matches.finalize()?;
            println!("Schedule finalized with {} matches.", matches.matches().len());
        }
        MatchesCommand::Score {
            match_number,
            team,
            category,
            value,
        } => {
            if !matches.phase().is_finalized() {
                eprintln!("No score sheets yet; finalize the schedule first.");
                return Ok(());
            }
            matches.update_score(index_of(match_number), &team, category.into(), value)?;
        }
        MatchesCommand::Summary => {
            let stats = matches.summary_stats();
            if format == OutputFormat::Json {
                return print_json(&stats);
            }
            println!("Teams scouted:      {}", stats.teams_count);
            println!("Matches with data:  {}", stats.matches_with_data);
            println!("Overall average:    {:.2}", stats.overall_average);
        }
        MatchesCommand::Breakdown => {
            let points = matches.breakdown();
            if format == OutputFormat::Json {
                return print_json(&points);
            }
            match points {
                Some(points) => {
                    for point in points {
                        println!(
                            "{:<8} {:<8} {:.2}",
                            point.team_number, point.category, point.score
                        );
                    }
                }
                None => println!("No match data yet."),
            }
        }
        MatchesCommand::Reset { yes } => {
            if yes {
                matches.reset()?;
                println!("Match scouting reset.");
            } else {
                println!("This discards the schedule and every match score.");
                println!("Use --yes to confirm.");
            }
        }
    }
    Ok(())
}

fn print_phase(phase: &MatchPhase) {
    let Some(setup) = phase.setup() else {
        println!("No schedule yet. Run `matches setup TOTAL OUR_TEAM`.");
        return;
    };
    println!("Our team: {} ({})", setup.our_team, phase.name());

    if phase.is_finalized() {
        for data in phase.matches() {
            println!("Match {}", data.match_number);
            for (team, scores) in &data.scores {
                println!(
                    "    {:<8} auto {} teleop {} endgame {}  avg {:.2}",
                    team, scores.auto, scores.teleop, scores.endgame, scores.match_average
                );
            }
        }
    } else {
        for data in &setup.matches {
            let slots: Vec<String> = Slot::ALL
                .iter()
                .map(|slot| format!("{} {}", slot.label(), data.team(*slot)))
                .collect();
            println!("Match {:>3}: {}", data.match_number, slots.join(" | "));
        }
    }
}

fn handle_archive(
    app: &Scoutbook,
    cmd: ArchiveCommand,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut shelf = app.archives();
    match cmd {
        ArchiveCommand::List => {
            if format == OutputFormat::Json {
                return print_json(shelf.list());
            }
            if shelf.list().is_empty() {
                println!("No archived competitions.");
            }
            for archived in shelf.list() {
                println!(
                    "{}  {}  {}",
                    archived.id,
                    archived.date.format("%Y-%m-%d"),
                    archived.name
                );
            }
        }
        ArchiveCommand::Create { name, date } => {
            let date = date.map_or_else(Utc::now, |day| day.and_time(NaiveTime::MIN).and_utc());
            let archived = shelf.archive(&name, date)?;
            println!("Archived \"{}\" as {}.", archived.name, archived.id);
        }
        ArchiveCommand::Show { id } => {
            let Some(detail) = shelf.detail(id) else {
                anyhow::bail!("no archive with id {id}");
            };
            if format == OutputFormat::Json {
                return print_json(&detail);
            }
            println!("{} ({})", detail.name, detail.date.format("%Y-%m-%d"));
            println!("Teams:              {}", detail.teams.len());
            println!("Pit entries:        {}", detail.pit_scores.len());
            println!("Ranked teams:       {}", detail.pit_rankings.len());
            println!("Schedule finalized: {}", detail.finalized);
            println!("Matches:            {}", detail.match_data.len());
            println!("Overall average:    {:.2}", detail.summary.overall_average);
        }
        ArchiveCommand::Delete { id } => {
            if shelf.delete(id)? {
                println!("Deleted archive {id}.");
            } else {
                anyhow::bail!("no archive with id {id}");
            }
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                return print_json(config);
            }
            println!("Current Configuration");
            println!("=====================");
            println!();
            println!("[Storage]");
            println!("  Database path:      {}", config.database_path().display());
            println!();
            println!("[Roster]");
            println!("  Debounce (ms):      {}", config.roster.debounce_ms);
            println!();
            println!("[Breakdown]");
            println!("  Max teams:          {}", config.breakdown.max_teams);
            println!("  Team order:         {:?}", config.breakdown.team_order);
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
