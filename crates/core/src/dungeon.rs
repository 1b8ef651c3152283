//! The evolving room set: seeded generation, incremental expansion, and
//! atomic population of each room with one book and one guardian.

use serde::Serialize;
use slotmap::SlotMap;

use crate::content;
use crate::content_file::{BookDef, DefinedQuestion, GameContent, GuardianDef};
use crate::packer::{PackerConfig, SpatialPacker, WorldBounds};
use crate::pool_file::PoolFileError;
use crate::questions::{QuestionBank, QuestionInstance, QuestionRecord};
use crate::rng::RandomStream;
use crate::types::{LogEvent, Rect, RoomId, Theme};

pub const QUESTIONS_PER_GUARDIAN: usize = 3;
pub const BOOK_WIDTH: i32 = 32;
pub const BOOK_HEIGHT: i32 = 32;
pub const GUARDIAN_WIDTH: i32 = 40;
pub const GUARDIAN_HEIGHT: i32 = 40;
const ENTITY_MARGIN: i32 = 15;
const SEPARATION_ATTEMPTS: u32 = 20;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Book {
    pub rect: Rect,
    pub text: String,
    pub points: u32,
    pub locked: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Guardian {
    pub rect: Rect,
    pub required_score: u32,
    pub questions: Vec<QuestionInstance>,
    pub defeated: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Room {
    pub id: RoomId,
    pub rect: Rect,
    pub theme: Theme,
    pub required_score: u32,
    pub book: Book,
    pub guardian: Guardian,
    pub explored: bool,
}

/// Mutable collaborators threaded through generation and expansion.
pub struct PopulateContext<'a> {
    pub bank: &'a mut QuestionBank,
    pub rng: &'a mut RandomStream,
    pub log: &'a mut Vec<LogEvent>,
}

pub struct Dungeon {
    seed: u64,
    rooms: SlotMap<RoomId, Room>,
    room_order: Vec<RoomId>,
    packer: SpatialPacker,
    content: GameContent,
    consumed_books: Vec<bool>,
    consumed_guardians: Vec<bool>,
    consumed_placements: Vec<bool>,
    initial_count: usize,
}

impl Dungeon {
    /// Build the initial dungeon. Fewer rooms than requested is a
    /// documented partial success recorded in the log, never an error.
    pub fn generate(
        seed: u64,
        requested_rooms: usize,
        bounds: WorldBounds,
        packer_config: PackerConfig,
        game_content: GameContent,
        context: &mut PopulateContext<'_>,
    ) -> Result<Self, PoolFileError> {
        let mut packer = SpatialPacker::new(bounds, packer_config);
        let rects = packer.place_initial_rooms(requested_rooms, context.rng);
        if rects.len() < requested_rooms {
            context.log.push(LogEvent::PlacementBudgetExhausted {
                placed: rects.len(),
                requested: requested_rooms,
            });
        }

        let consumed_books = vec![false; game_content.books.len()];
        let consumed_guardians = vec![false; game_content.guardians.len()];
        let consumed_placements = vec![false; game_content.book_placements.len()];
        let mut dungeon = Self {
            seed,
            rooms: SlotMap::with_key(),
            room_order: Vec::new(),
            packer,
            content: game_content,
            consumed_books,
            consumed_guardians,
            consumed_placements,
            initial_count: rects.len(),
        };

        let total = rects.len();
        for (index, rect) in rects.into_iter().enumerate() {
            let theme = pick_theme(context.rng);
            let required_score = required_score_at(index, total);
            dungeon.add_populated_room(rect, theme, required_score, index, context)?;
        }
        Ok(dungeon)
    }

    /// Spawn one room next to `base` and populate it. `None` means no free
    /// space was found, which is a normal outcome the caller absorbs.
    pub fn expand(
        &mut self,
        base: RoomId,
        context: &mut PopulateContext<'_>,
    ) -> Result<Option<RoomId>, PoolFileError> {
        let Some(base_room) = self.rooms.get(base) else {
            return Ok(None);
        };
        let base_rect = base_room.rect;
        let existing: Vec<Rect> = self.room_order.iter().map(|id| self.rooms[*id].rect).collect();
        let Some(rect) = self.packer.place_adjacent(base_rect, &existing, context.rng) else {
            context.log.push(LogEvent::ExpansionSkipped { base });
            return Ok(None);
        };

        let index = self.room_order.len();
        let theme = pick_theme(context.rng);
        let required_score = required_score_at(index, self.initial_count);
        let id = self.add_populated_room(rect, theme, required_score, index, context)?;
        context.log.push(LogEvent::DungeonExpanded { base, room: id });
        Ok(Some(id))
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.room_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.room_order.is_empty()
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id)
    }

    pub(crate) fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id)
    }

    pub fn room_id_at(&self, index: usize) -> Option<RoomId> {
        self.room_order.get(index).copied()
    }

    pub fn index_of(&self, id: RoomId) -> Option<usize> {
        self.room_order.iter().position(|&room_id| room_id == id)
    }

    /// Rooms in creation order (initial layout first, expansions appended).
    pub fn rooms_in_order(&self) -> impl Iterator<Item = &Room> {
        self.room_order.iter().map(|id| &self.rooms[*id])
    }

    /// Canonical encoding of everything observable about the dungeon, used
    /// for fingerprinting and determinism checks.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend(self.seed.to_le_bytes());
        bytes.extend((self.room_order.len() as u32).to_le_bytes());
        for room in self.rooms_in_order() {
            push_rect(&mut bytes, room.rect);
            bytes.push(room.theme.code());
            bytes.extend(room.required_score.to_le_bytes());
            bytes.push(u8::from(room.explored));

            push_rect(&mut bytes, room.book.rect);
            bytes.extend(room.book.points.to_le_bytes());
            bytes.push(u8::from(room.book.locked));
            push_str(&mut bytes, &room.book.text);

            push_rect(&mut bytes, room.guardian.rect);
            bytes.extend(room.guardian.required_score.to_le_bytes());
            bytes.push(u8::from(room.guardian.defeated));
            bytes.extend((room.guardian.questions.len() as u32).to_le_bytes());
            for question in &room.guardian.questions {
                bytes.extend(question.record.id.to_le_bytes());
                bytes.push(question.record.difficulty);
                push_str(&mut bytes, &question.record.answer);
                bytes.extend((question.choices.len() as u32).to_le_bytes());
                for choice in &question.choices {
                    push_str(&mut bytes, choice);
                }
            }
        }
        bytes
    }

    pub fn snapshot(&self) -> DungeonSnapshot {
        DungeonSnapshot {
            seed: self.seed,
            rooms: self
                .rooms_in_order()
                .enumerate()
                .map(|(index, room)| RoomSnapshot {
                    index,
                    rect: room.rect,
                    theme: room.theme,
                    required_score: room.required_score,
                    explored: room.explored,
                    book_points: room.book.points,
                    book_locked: room.book.locked,
                    guardian_required_score: room.guardian.required_score,
                    guardian_defeated: room.guardian.defeated,
                    question_count: room.guardian.questions.len(),
                })
                .collect(),
        }
    }

    /// Population is atomic: the room is only inserted with both entities
    /// attached.
    fn add_populated_room(
        &mut self,
        rect: Rect,
        theme: Theme,
        required_score: u32,
        room_index: usize,
        context: &mut PopulateContext<'_>,
    ) -> Result<RoomId, PoolFileError> {
        let (book_rect, guardian_rect) = place_entities(rect, context.rng);
        let book = self.next_book(rect, book_rect, theme, room_index);
        let guardian = self.next_guardian(rect, guardian_rect, theme, context)?;
        let id = self.rooms.insert_with_key(|id| Room {
            id,
            rect,
            theme,
            required_score,
            book,
            guardian,
            explored: false,
        });
        self.room_order.push(id);
        Ok(id)
    }

    /// Definition-file content first (explicit placement, then list order),
    /// synthesized lore once the list is exhausted.
    fn next_book(&mut self, room: Rect, fallback_rect: Rect, theme: Theme, room_index: usize) -> Book {
        let placement_index = self.content.book_placements.iter().enumerate().find_map(
            |(index, placement)| {
                (!self.consumed_placements[index] && room.contains_point(placement.x, placement.y))
                    .then_some(index)
            },
        );
        if let Some(index) = placement_index {
            self.consumed_placements[index] = true;
            let placement = self.content.book_placements[index].clone();
            let rect = clamp_into_room(
                room,
                Rect { x: placement.x, y: placement.y, w: BOOK_WIDTH, h: BOOK_HEIGHT },
            );
            if let Some(def) = self.take_book_def_by_id(&placement.book_id) {
                return Book { rect, text: def.text, points: def.points, locked: true };
            }
            let (text, points) = content::synthesized_book(theme, room_index);
            return Book { rect, text, points, locked: true };
        }

        match self.take_next_book_def() {
            Some(def) => Book { rect: fallback_rect, text: def.text, points: def.points, locked: true },
            None => {
                let (text, points) = content::synthesized_book(theme, room_index);
                Book { rect: fallback_rect, text, points, locked: true }
            }
        }
    }

    fn take_next_book_def(&mut self) -> Option<BookDef> {
        let index = self.consumed_books.iter().position(|consumed| !consumed)?;
        self.consumed_books[index] = true;
        Some(self.content.books[index].clone())
    }

    fn take_book_def_by_id(&mut self, id: &str) -> Option<BookDef> {
        let index = self.content.books.iter().position(|def| def.id == id)?;
        if self.consumed_books[index] {
            return None;
        }
        self.consumed_books[index] = true;
        Some(self.content.books[index].clone())
    }

    fn next_guardian(
        &mut self,
        room: Rect,
        fallback_rect: Rect,
        theme: Theme,
        context: &mut PopulateContext<'_>,
    ) -> Result<Guardian, PoolFileError> {
        // A definition pinned to coordinates inside this room wins.
        let positioned = (0..self.content.guardians.len()).find(|&index| {
            if self.consumed_guardians[index] {
                return false;
            }
            match (self.content.guardians[index].x, self.content.guardians[index].y) {
                (Some(x), Some(y)) => room.contains_point(x, y),
                _ => false,
            }
        });
        if let Some(index) = positioned {
            self.consumed_guardians[index] = true;
            let def = self.content.guardians[index].clone();
            if let (Some(x), Some(y)) = (def.x, def.y) {
                let rect = clamp_into_room(
                    room,
                    Rect { x, y, w: GUARDIAN_WIDTH, h: GUARDIAN_HEIGHT },
                );
                return Ok(guardian_from_def(def, rect, theme));
            }
        }

        let sequential = (0..self.content.guardians.len()).find(|&index| {
            !self.consumed_guardians[index]
                && self.content.guardians[index].x.is_none()
                && self.content.guardians[index].y.is_none()
        });
        if let Some(index) = sequential {
            self.consumed_guardians[index] = true;
            let def = self.content.guardians[index].clone();
            return Ok(guardian_from_def(def, fallback_rect, theme));
        }

        let questions =
            context.bank.sample(theme, context.rng, QUESTIONS_PER_GUARDIAN, 1)?;
        Ok(Guardian { rect: fallback_rect, required_score: 0, questions, defeated: false })
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct DungeonSnapshot {
    pub seed: u64,
    pub rooms: Vec<RoomSnapshot>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RoomSnapshot {
    pub index: usize,
    pub rect: Rect,
    pub theme: Theme,
    pub required_score: u32,
    pub explored: bool,
    pub book_points: u32,
    pub book_locked: bool,
    pub guardian_required_score: u32,
    pub guardian_defeated: bool,
    pub question_count: usize,
}

/// Difficulty ramp over room creation order: room 0 requires 0, the last
/// initially-placed room requires 100, expansions keep climbing.
pub fn required_score_at(index: usize, initial_total: usize) -> u32 {
    let denominator = initial_total.saturating_sub(1).max(1);
    ((index as f64 / denominator as f64) * 100.0).round() as u32
}

fn pick_theme(rng: &mut RandomStream) -> Theme {
    *rng.choice(&Theme::ALL).expect("theme set is non-empty")
}

fn guardian_from_def(def: GuardianDef, rect: Rect, theme: Theme) -> Guardian {
    let questions = def
        .questions
        .into_iter()
        .map(|question| defined_question_instance(question, theme))
        .collect();
    Guardian { rect, required_score: def.required_score, questions, defeated: false }
}

fn defined_question_instance(question: DefinedQuestion, theme: Theme) -> QuestionInstance {
    QuestionInstance {
        theme,
        record: QuestionRecord {
            id: 0,
            prompt: question.prompt,
            answer: question.answer,
            explanation: question.explanation,
            difficulty: question.difficulty,
        },
        choices: question.choices,
    }
}

/// Pick non-overlapping spots for the book and guardian inside a room.
/// Book position is rolled once; the guardian re-rolls against the padded
/// book rect until the separation budget runs out, then both fall back to
/// opposite corners.
fn place_entities(room: Rect, rng: &mut RandomStream) -> (Rect, Rect) {
    let margin = ENTITY_MARGIN;
    let min_width = 2 * margin + BOOK_WIDTH.max(GUARDIAN_WIDTH) + 50;
    let min_height = 2 * margin + BOOK_HEIGHT.max(GUARDIAN_HEIGHT);
    if room.w >= min_width && room.h >= min_height {
        let bx = room.x + margin + rng.next_int(0, room.w - 2 * margin - BOOK_WIDTH);
        let by = room.y + margin + rng.next_int(0, room.h - 2 * margin - BOOK_HEIGHT);
        let book = Rect { x: bx, y: by, w: BOOK_WIDTH, h: BOOK_HEIGHT };
        let padded = Rect { x: bx - 5, y: by - 5, w: BOOK_WIDTH + 10, h: BOOK_HEIGHT + 10 };
        for _ in 0..SEPARATION_ATTEMPTS {
            let gx = room.x + margin + rng.next_int(0, room.w - 2 * margin - GUARDIAN_WIDTH);
            let gy = room.y + margin + rng.next_int(0, room.h - 2 * margin - GUARDIAN_HEIGHT);
            let guardian = Rect { x: gx, y: gy, w: GUARDIAN_WIDTH, h: GUARDIAN_HEIGHT };
            if !guardian.overlaps(&padded) {
                return (book, guardian);
            }
        }
        return (
            Rect { x: room.x + margin, y: room.y + margin, w: BOOK_WIDTH, h: BOOK_HEIGHT },
            Rect {
                x: room.right() - margin - GUARDIAN_WIDTH,
                y: room.bottom() - margin - GUARDIAN_HEIGHT,
                w: GUARDIAN_WIDTH,
                h: GUARDIAN_HEIGHT,
            },
        );
    }

    // Undersized room: pin both to opposite corners with a small inset.
    (
        Rect { x: room.x + 5, y: room.y + 5, w: BOOK_WIDTH, h: BOOK_HEIGHT },
        Rect {
            x: (room.right() - GUARDIAN_WIDTH - 5).max(room.x + 5),
            y: (room.bottom() - GUARDIAN_HEIGHT - 5).max(room.y + 5),
            w: GUARDIAN_WIDTH,
            h: GUARDIAN_HEIGHT,
        },
    )
}

fn clamp_into_room(room: Rect, entity: Rect) -> Rect {
    Rect {
        x: entity.x.clamp(room.x, (room.right() - entity.w).max(room.x)),
        y: entity.y.clamp(room.y, (room.bottom() - entity.h).max(room.y)),
        ..entity
    }
}

fn push_rect(bytes: &mut Vec<u8>, rect: Rect) {
    bytes.extend(rect.x.to_le_bytes());
    bytes.extend(rect.y.to_le_bytes());
    bytes.extend(rect.w.to_le_bytes());
    bytes.extend(rect.h.to_le_bytes());
}

fn push_str(bytes: &mut Vec<u8>, text: &str) {
    bytes.extend((text.len() as u32).to_le_bytes());
    bytes.extend(text.as_bytes());
}
