use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use tomekeep_core::questions::QuestionBank;
use tomekeep_core::session::{GameSession, SessionConfig};
use tomekeep_core::types::Theme;
use tomekeep_core::{DEFAULT_SEED, GameContent, load_game_content};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a dungeon and print its snapshot as JSON.
    Generate {
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(short, long, default_value_t = 5)]
        rooms: usize,
        /// Optional game content definition file.
        #[arg(long)]
        content: Option<PathBuf>,
    },
    /// Generate the same dungeon twice and compare canonical fingerprints.
    Verify {
        #[arg(short, long, default_value_t = DEFAULT_SEED)]
        seed: u64,
        #[arg(short, long, default_value_t = 5)]
        rooms: usize,
    },
    /// Materialize the per-theme question pool files into a directory.
    Pools {
        #[arg(long)]
        data_dir: PathBuf,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    match args.command {
        Command::Generate { seed, rooms, content } => {
            let game_content = match content {
                Some(path) => load_game_content(&path),
                None => GameContent::default(),
            };
            let session = build_session(seed, rooms, game_content)?;
            let snapshot = session.snapshot();
            let json = serde_json::to_string_pretty(&snapshot)
                .context("failed to serialize the dungeon snapshot")?;
            println!("{json}");
        }
        Command::Verify { seed, rooms } => {
            let first = build_session(seed, rooms, GameContent::default())?;
            let second = build_session(seed, rooms, GameContent::default())?;
            let first_print = first.fingerprint();
            let second_print = second.fingerprint();
            if first_print != second_print {
                bail!(
                    "determinism violated: seed {seed} produced fingerprints \
                     {first_print:016x} and {second_print:016x}"
                );
            }
            println!("Seed {seed} with {rooms} rooms is stable.");
            println!("Rooms placed: {}", first.dungeon().len());
            println!("Fingerprint: {first_print:016x}");
        }
        Command::Pools { data_dir } => {
            let mut bank = QuestionBank::with_data_dir(data_dir.clone());
            for theme in Theme::ALL {
                let size = bank
                    .ensure_pool(theme)
                    .with_context(|| format!("failed to materialize the {theme:?} pool"))?;
                println!("{}: {size} questions", theme.key());
            }
            println!("Pool files written to {}", data_dir.display());
        }
    }

    Ok(())
}

fn build_session(seed: u64, rooms: usize, game_content: GameContent) -> Result<GameSession> {
    let config = SessionConfig { num_rooms: rooms, ..SessionConfig::default() };
    GameSession::new(seed, config, game_content, QuestionBank::in_memory())
        .map_err(|error| anyhow::anyhow!("session generation failed: {error}"))
}
