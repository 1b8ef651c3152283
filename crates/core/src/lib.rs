pub mod content;
pub mod content_file;
pub mod dungeon;
pub mod packer;
pub mod pool_file;
pub mod progression;
pub mod questions;
pub mod rng;
pub mod session;
pub mod types;

pub use content_file::{GameContent, load_game_content, parse_game_content};
pub use dungeon::{Book, Dungeon, Guardian, QUESTIONS_PER_GUARDIAN, Room};
pub use packer::{PackerConfig, SpatialPacker, WorldBounds};
pub use pool_file::PoolFileError;
pub use progression::{Evaluation, PlayerProgress, ScoringMode, evaluate};
pub use questions::{QuestionBank, QuestionInstance, QuestionRecord};
pub use rng::RandomStream;
pub use session::{
    ChallengeProgress, DEFAULT_ROOM_COUNT, DEFAULT_SEED, GameSession, SessionConfig,
};
pub use types::*;
