mod presentation;
mod seed;

use std::io::{self, BufRead};
use std::process::ExitCode;

use tomekeep_core::questions::QuestionBank;
use tomekeep_core::session::{GameSession, SessionConfig};
use tomekeep_core::types::RoomId;
use tomekeep_core::{ChallengeProgress, GameContent, ScoringMode, load_game_content};

use presentation::{PresentationPort, TextPresenter};
use seed::{LaunchOptions, SeedChoice};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();
    let options = match seed::resolve_launch_options(&args, seed::generate_runtime_seed()) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut session = match build_session(&options) {
        Ok(session) => session,
        Err(message) => {
            eprintln!("{message}");
            return ExitCode::FAILURE;
        }
    };

    let mut presenter = TextPresenter;
    if let SeedChoice::Generated(value) = options.seed {
        presenter.line(&format!("(generated seed {value})"));
    }
    let stdin = io::stdin();
    run_loop(&mut session, &mut presenter, stdin.lock());
    ExitCode::SUCCESS
}

fn build_session(options: &LaunchOptions) -> Result<GameSession, String> {
    let game_content = match &options.content_path {
        Some(path) => load_game_content(path),
        None => GameContent::default(),
    };
    let bank = match &options.data_dir {
        Some(dir) => QuestionBank::with_data_dir(dir.clone()),
        None => QuestionBank::in_memory(),
    };
    let scoring =
        if options.partial_credit { ScoringMode::PartialCredit } else { ScoringMode::AllOrNothing };
    let config = SessionConfig { num_rooms: options.rooms, scoring, ..SessionConfig::default() };
    GameSession::new(options.seed.value(), config, game_content, bank)
        .map_err(|error| error.to_string())
}

/// Line-oriented command loop. The core owns all game state; this loop only
/// translates commands and narrates results.
fn run_loop(
    session: &mut GameSession,
    presenter: &mut impl PresentationPort,
    input: impl BufRead,
) {
    presenter.line(&format!(
        "Tomekeep - seed {}, {} rooms. Type 'help' for commands.",
        session.seed(),
        session.dungeon().len()
    ));
    presenter.blank();
    show_overview(session, presenter);

    for line in input.lines() {
        let Ok(line) = line else {
            break;
        };
        let mut parts = line.split_whitespace();
        let command = parts.next().unwrap_or("");
        let argument = parts.next();

        match command {
            "" => {}
            "help" => show_help(presenter),
            "look" => show_overview(session, presenter),
            "enter" => match parse_room(session, argument) {
                Some(room) => {
                    if session.enter_room(room) {
                        presenter.line("You step inside.");
                    } else {
                        let required = session
                            .dungeon()
                            .room(room)
                            .map(|state| state.required_score)
                            .unwrap_or(0);
                        presenter.line(&format!(
                            "The door holds fast; it needs {required} points."
                        ));
                    }
                }
                None => presenter.line("Usage: enter <room-index>"),
            },
            "read" => match parse_room(session, argument) {
                Some(room) => match session.finish_reading(room) {
                    Ok(0) => presenter.line("You have already read this book."),
                    Ok(points) => {
                        let text = session
                            .dungeon()
                            .room(room)
                            .map(|state| state.book.text.clone())
                            .unwrap_or_default();
                        presenter.line(&text);
                        presenter.line(&format!(
                            "Finished reading: +{points} points (score {}).",
                            session.score()
                        ));
                    }
                    Err(_) => presenter.line("No such room."),
                },
                None => presenter.line("Usage: read <room-index>"),
            },
            "challenge" => match parse_room(session, argument) {
                Some(room) => match session.begin_challenge(room) {
                    Ok(()) => show_current_question(session, presenter),
                    Err(error) => presenter.line(&format!("The guardian refuses: {error:?}")),
                },
                None => presenter.line("Usage: challenge <room-index>"),
            },
            "pick" => match argument.and_then(|raw| raw.parse::<usize>().ok()) {
                Some(display_index) if display_index >= 1 => {
                    let current =
                        session.attempt().map(|attempt| attempt.current_index()).unwrap_or(0);
                    match session.select_choice(current, display_index - 1) {
                        Ok(()) => presenter.line(&format!("Choice {display_index} selected.")),
                        Err(error) => presenter.line(&format!("Cannot select: {error:?}")),
                    }
                }
                _ => presenter.line("Usage: pick <1-3>"),
            },
            "confirm" => match session.confirm_current() {
                Ok(ChallengeProgress::Answered { correct, .. }) => {
                    presenter.line(if correct { "Correct." } else { "Wrong." });
                    show_current_question(session, presenter);
                }
                Ok(ChallengeProgress::Finished(evaluation)) => {
                    presenter.line(&format!(
                        "Guardian settled: {} correct, +{} points (score {}).",
                        evaluation.correct_count,
                        evaluation.points_awarded,
                        session.score()
                    ));
                    show_overview(session, presenter);
                }
                Err(error) => presenter.line(&format!("Cannot confirm: {error:?}")),
            },
            "cancel" => {
                session.cancel_challenge();
                presenter.line("Challenge abandoned.");
            }
            "score" => presenter.line(&format!("Score: {}", session.score())),
            "quit" => break,
            other => presenter.line(&format!("Unknown command '{other}'. Type 'help'.")),
        }
    }
}

fn parse_room(session: &GameSession, argument: Option<&str>) -> Option<RoomId> {
    let index = argument?.parse::<usize>().ok()?;
    session.dungeon().room_id_at(index)
}

fn show_help(presenter: &mut impl PresentationPort) {
    presenter.line("Commands:");
    presenter.line("  look                 room overview");
    presenter.line("  enter <room-index>   step into a room you qualify for");
    presenter.line("  read <room-index>    read the room's book");
    presenter.line("  challenge <room>     face the room's guardian");
    presenter.line("  pick <1-3>           select a choice for the current question");
    presenter.line("  confirm              lock in the selected choice");
    presenter.line("  cancel               abandon the current challenge");
    presenter.line("  score | quit");
}

fn show_overview(session: &GameSession, presenter: &mut impl PresentationPort) {
    presenter.line(&format!("Score: {}", session.score()));
    for (index, room) in session.dungeon().rooms_in_order().enumerate() {
        let book_state = if room.book.locked { "book sealed" } else { "book read" };
        let guardian_state =
            if room.guardian.defeated { "guardian defeated" } else { "guardian waiting" };
        presenter.line(&format!(
            "  [{index}] {:?} room (needs {} pts) - {book_state}, {guardian_state}",
            room.theme, room.required_score
        ));
    }
}

fn show_current_question(session: &GameSession, presenter: &mut impl PresentationPort) {
    let Some(attempt) = session.attempt() else {
        return;
    };
    let Some(questions) = session.challenge_questions() else {
        return;
    };
    let index = attempt.current_index();
    let question = &questions[index];
    presenter.line(&format!(
        "Question {} of {}: {}",
        index + 1,
        questions.len(),
        question.record.prompt
    ));
    for (choice_index, choice) in question.choices.iter().enumerate() {
        presenter.line(&format!("  {}) {choice}", choice_index + 1));
    }
}
