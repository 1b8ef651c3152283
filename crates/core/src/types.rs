use serde::{Deserialize, Serialize};
use slotmap::new_key_type;

new_key_type! {
    pub struct RoomId;
}

/// Axis-aligned footprint in world pixels. Edges are exclusive: two rects
/// that merely touch do not overlap.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn right(self) -> i32 {
        self.x + self.w
    }

    pub fn bottom(self) -> i32 {
        self.y + self.h
    }

    pub fn center(self) -> (i32, i32) {
        (self.x + self.w / 2, self.y + self.h / 2)
    }

    pub fn overlaps(self, other: &Self) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }

    pub fn contains_point(self, px: i32, py: i32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn contains_rect(self, other: &Self) -> bool {
        other.x >= self.x
            && other.right() <= self.right()
            && other.y >= self.y
            && other.bottom() <= self.bottom()
    }
}

/// Subject category a room draws its questions and lore from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Theme {
    Arithmetic,
    Logic,
    Trivia,
}

impl Theme {
    pub const ALL: [Self; 3] = [Self::Arithmetic, Self::Logic, Self::Trivia];

    /// Stable lowercase key used in pool file names.
    pub fn key(self) -> &'static str {
        match self {
            Self::Arithmetic => "arithmetic",
            Self::Logic => "logic",
            Self::Trivia => "trivia",
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Arithmetic => 0,
            Self::Logic => 1,
            Self::Trivia => 2,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogEvent {
    PlacementBudgetExhausted { placed: usize, requested: usize },
    BookFinished { room: RoomId, points: u32 },
    GuardianDefeated { room: RoomId, correct: usize, awarded: u32 },
    DungeonExpanded { base: RoomId, room: RoomId },
    ExpansionSkipped { base: RoomId },
}

/// Why a guardian challenge could not start.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChallengeError {
    UnknownRoom,
    AttemptInProgress,
    AlreadyDefeated,
    BookStillLocked,
    ScoreTooLow { required: u32 },
    QuestionsUnavailable,
}

/// Why an answer interaction on the active attempt was rejected.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnswerError {
    NoActiveAttempt,
    QuestionOutOfRange,
    ChoiceOutOfRange,
    AlreadyAnswered,
    NothingSelected,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReadError {
    UnknownRoom,
}
