//! One interactive run: owns the random stream, the dungeon, player
//! progress, and the explicit quiz-attempt state the presentation layer
//! drives.
//!
//! Sessions are plain values owned by the call site. Two sessions never
//! share a stream; running two with the same seed and command sequence
//! yields identical fingerprints.

use serde::Serialize;
use xxhash_rust::xxh3::xxh3_64;

use crate::content_file::GameContent;
use crate::dungeon::{Dungeon, DungeonSnapshot, PopulateContext, QUESTIONS_PER_GUARDIAN};
use crate::packer::{PackerConfig, WorldBounds};
use crate::pool_file::PoolFileError;
use crate::progression::{self, Evaluation, PlayerProgress, ScoringMode};
use crate::questions::{QuestionBank, QuestionInstance};
use crate::rng::RandomStream;
use crate::types::{AnswerError, ChallengeError, LogEvent, ReadError, RoomId};

pub const DEFAULT_SEED: u64 = 42;
pub const DEFAULT_ROOM_COUNT: usize = 3;

#[derive(Clone, Copy, Debug)]
pub struct SessionConfig {
    pub num_rooms: usize,
    pub bounds: WorldBounds,
    pub packer: PackerConfig,
    pub scoring: ScoringMode,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            num_rooms: DEFAULT_ROOM_COUNT,
            bounds: WorldBounds::default(),
            packer: PackerConfig::default(),
            scoring: ScoringMode::default(),
        }
    }
}

/// Explicit suspension state for an in-progress guardian challenge.
/// Dropping it (cancel) never touches committed room flags.
#[derive(Clone, Debug)]
pub struct QuizAttempt {
    room: RoomId,
    current_index: usize,
    selected: Vec<Option<usize>>,
    results: Vec<Option<bool>>,
}

impl QuizAttempt {
    pub fn room(&self) -> RoomId {
        self.room
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn selected(&self) -> &[Option<usize>] {
        &self.selected
    }

    pub fn results(&self) -> &[Option<bool>] {
        &self.results
    }

    fn next_unanswered(&self) -> Option<usize> {
        self.results.iter().position(Option::is_none)
    }
}

/// What confirming an answer did to the attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeProgress {
    /// One question graded; more remain.
    Answered { correct: bool, next_index: usize },
    /// Every question has a result; the guardian is settled.
    Finished(Evaluation),
}

pub struct GameSession {
    seed: u64,
    rng: RandomStream,
    dungeon: Dungeon,
    bank: QuestionBank,
    progress: PlayerProgress,
    scoring: ScoringMode,
    attempt: Option<QuizAttempt>,
    log: Vec<LogEvent>,
}

impl GameSession {
    pub fn new(
        seed: u64,
        config: SessionConfig,
        game_content: GameContent,
        mut bank: QuestionBank,
    ) -> Result<Self, PoolFileError> {
        let mut rng = RandomStream::seed_from_u64(seed);
        let mut log = Vec::new();
        let dungeon = {
            let mut context = PopulateContext { bank: &mut bank, rng: &mut rng, log: &mut log };
            Dungeon::generate(
                seed,
                config.num_rooms,
                config.bounds,
                config.packer,
                game_content,
                &mut context,
            )?
        };
        Ok(Self {
            seed,
            rng,
            dungeon,
            bank,
            progress: PlayerProgress::default(),
            scoring: config.scoring,
            attempt: None,
            log,
        })
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn score(&self) -> u32 {
        self.progress.score
    }

    pub fn scoring(&self) -> ScoringMode {
        self.scoring
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn log(&self) -> &[LogEvent] {
        &self.log
    }

    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    pub fn can_enter(&self, room: RoomId) -> bool {
        self.dungeon
            .room(room)
            .is_some_and(|room| self.progress.score >= room.required_score)
    }

    /// Mark a room explored if the player's score clears its entry gate.
    pub fn enter_room(&mut self, room: RoomId) -> bool {
        if !self.can_enter(room) {
            return false;
        }
        if let Some(room) = self.dungeon.room_mut(room) {
            room.explored = true;
            return true;
        }
        false
    }

    /// Complete the reading interaction for a room's book. Unlocks the book
    /// and awards its points exactly once; later calls are no-ops.
    pub fn finish_reading(&mut self, room: RoomId) -> Result<u32, ReadError> {
        let Some(room_state) = self.dungeon.room_mut(room) else {
            return Err(ReadError::UnknownRoom);
        };
        if !room_state.book.locked {
            return Ok(0);
        }
        room_state.book.locked = false;
        let points = room_state.book.points;
        self.progress.score += points;
        self.log.push(LogEvent::BookFinished { room, points });
        Ok(points)
    }

    /// Start the guardian challenge for a room. The book must be unlocked,
    /// the score gate met, and a full question set available.
    pub fn begin_challenge(&mut self, room: RoomId) -> Result<(), ChallengeError> {
        if self.attempt.is_some() {
            return Err(ChallengeError::AttemptInProgress);
        }
        let Some(room_state) = self.dungeon.room(room) else {
            return Err(ChallengeError::UnknownRoom);
        };
        if room_state.guardian.defeated {
            return Err(ChallengeError::AlreadyDefeated);
        }
        if room_state.book.locked {
            return Err(ChallengeError::BookStillLocked);
        }
        if self.progress.score < room_state.guardian.required_score {
            return Err(ChallengeError::ScoreTooLow {
                required: room_state.guardian.required_score,
            });
        }
        let question_count = room_state.guardian.questions.len();
        if question_count < QUESTIONS_PER_GUARDIAN {
            return Err(ChallengeError::QuestionsUnavailable);
        }
        self.attempt = Some(QuizAttempt {
            room,
            current_index: 0,
            selected: vec![None; question_count],
            results: vec![None; question_count],
        });
        Ok(())
    }

    /// Questions of the active attempt, in presentation order.
    pub fn challenge_questions(&self) -> Option<&[QuestionInstance]> {
        let attempt = self.attempt.as_ref()?;
        self.dungeon.room(attempt.room).map(|room| room.guardian.questions.as_slice())
    }

    /// Record a pending choice for a question of the active attempt.
    pub fn select_choice(
        &mut self,
        question_index: usize,
        choice_index: usize,
    ) -> Result<(), AnswerError> {
        let Some(attempt) = self.attempt.as_mut() else {
            return Err(AnswerError::NoActiveAttempt);
        };
        if question_index >= attempt.selected.len() {
            return Err(AnswerError::QuestionOutOfRange);
        }
        if attempt.results[question_index].is_some() {
            return Err(AnswerError::AlreadyAnswered);
        }
        let choice_count = self
            .dungeon
            .room(attempt.room)
            .map(|room| room.guardian.questions[question_index].choices.len())
            .unwrap_or(0);
        if choice_index >= choice_count {
            return Err(AnswerError::ChoiceOutOfRange);
        }
        attempt.selected[question_index] = Some(choice_index);
        attempt.current_index = question_index;
        Ok(())
    }

    /// Grade the currently selected answer. When the last open question is
    /// graded the guardian settles: it becomes defeated (one-way), points
    /// are awarded per the scoring mode, and at least one correct answer
    /// triggers expansion from the guardian's room.
    pub fn confirm_current(&mut self) -> Result<ChallengeProgress, AnswerError> {
        let Some(attempt) = self.attempt.as_mut() else {
            return Err(AnswerError::NoActiveAttempt);
        };
        let question_index = attempt.current_index;
        if attempt.results[question_index].is_some() {
            return Err(AnswerError::AlreadyAnswered);
        }
        let Some(choice_index) = attempt.selected[question_index] else {
            return Err(AnswerError::NothingSelected);
        };
        let room_id = attempt.room;
        let correct = {
            let room = self.dungeon.room(room_id).ok_or(AnswerError::NoActiveAttempt)?;
            let question = &room.guardian.questions[question_index];
            progression::answer_matches(
                &question.record.answer,
                &question.choices[choice_index],
            )
        };
        let attempt = self.attempt.as_mut().ok_or(AnswerError::NoActiveAttempt)?;
        attempt.results[question_index] = Some(correct);

        if let Some(next_index) = attempt.next_unanswered() {
            attempt.current_index = next_index;
            return Ok(ChallengeProgress::Answered { correct, next_index });
        }

        let evaluation = self.settle_guardian();
        Ok(ChallengeProgress::Finished(evaluation))
    }

    /// Abandon the in-progress challenge. Scratch state only; committed
    /// flags and score are untouched and the guardian can be re-challenged.
    pub fn cancel_challenge(&mut self) {
        self.attempt = None;
    }

    /// Grade a completed attempt, commit the one-way transitions, and
    /// expand the dungeon when at least one answer was correct.
    fn settle_guardian(&mut self) -> Evaluation {
        let attempt = self.attempt.take().expect("settle is only called with an active attempt");
        let room_id = attempt.room;
        let evaluation = {
            let questions = self
                .dungeon
                .room(room_id)
                .map(|room| room.guardian.questions.as_slice())
                .unwrap_or_default();
            let answers: Vec<String> = questions
                .iter()
                .zip(attempt.selected.iter())
                .map(|(question, selected)| match selected {
                    Some(choice_index) => question.choices[*choice_index].clone(),
                    None => String::new(),
                })
                .collect();
            progression::evaluate(questions, &answers, self.scoring)
        };

        if let Some(room) = self.dungeon.room_mut(room_id) {
            room.guardian.defeated = true;
        }
        self.progress.score += evaluation.points_awarded;
        self.log.push(LogEvent::GuardianDefeated {
            room: room_id,
            correct: evaluation.correct_count,
            awarded: evaluation.points_awarded,
        });

        if evaluation.correct_count > 0 {
            let expansion = {
                let mut context = PopulateContext {
                    bank: &mut self.bank,
                    rng: &mut self.rng,
                    log: &mut self.log,
                };
                self.dungeon.expand(room_id, &mut context)
            };
            if expansion.is_err() {
                // A pool failure mid-expansion degrades to a skipped
                // expansion, matching the no-space outcome.
                self.log.push(LogEvent::ExpansionSkipped { base: room_id });
            }
        }
        evaluation
    }

    /// Canonical fingerprint over dungeon state, score, and scoring mode.
    pub fn fingerprint(&self) -> u64 {
        let mut bytes = self.dungeon.canonical_bytes();
        bytes.extend(self.progress.score.to_le_bytes());
        bytes.push(match self.scoring {
            ScoringMode::AllOrNothing => 0,
            ScoringMode::PartialCredit => 1,
        });
        xxh3_64(&bytes)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            seed: self.seed,
            score: self.progress.score,
            fingerprint: self.fingerprint(),
            dungeon: self.dungeon.snapshot(),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct SessionSnapshot {
    pub seed: u64,
    pub score: u32,
    pub fingerprint: u64,
    pub dungeon: DungeonSnapshot,
}
