//! Scoring policy for guardian challenges.
//!
//! `AllOrNothing` is the primary mode: full success awards the sum of the
//! question difficulties, anything less awards zero. `PartialCredit` is an
//! explicit opt-in that awards one point per correct answer. The two are
//! never mixed within a session.

use crate::questions::{QuestionInstance, normalize};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScoringMode {
    #[default]
    AllOrNothing,
    PartialCredit,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerProgress {
    pub score: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub success: bool,
    pub correct_count: usize,
    pub points_awarded: u32,
}

pub fn answer_matches(canonical: &str, given: &str) -> bool {
    normalize(canonical) == normalize(given)
}

/// Grade a full answer set against its questions. Answers beyond the
/// question count are ignored; questions without an answer count as wrong.
pub fn evaluate<A: AsRef<str>>(
    questions: &[QuestionInstance],
    answers: &[A],
    mode: ScoringMode,
) -> Evaluation {
    let correct_count = questions
        .iter()
        .zip(answers.iter())
        .filter(|(question, answer)| answer_matches(&question.record.answer, answer.as_ref()))
        .count();
    let success = !questions.is_empty() && correct_count == questions.len();
    let points_awarded = match mode {
        ScoringMode::AllOrNothing => {
            if success {
                questions.iter().map(|question| u32::from(question.record.difficulty)).sum()
            } else {
                0
            }
        }
        ScoringMode::PartialCredit => correct_count as u32,
    };
    Evaluation { success, correct_count, points_awarded }
}
