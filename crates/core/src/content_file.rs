//! Optional external game definition: named books, guardian question sets,
//! and explicit placements.
//!
//! Loading is lenient end to end. A missing or unreadable file yields empty
//! content, a malformed entry is skipped in favor of synthesis, and a
//! defined question whose choice list does not contain its own answer is
//! dropped. Dungeon generation never aborts over this file.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::questions::normalize;

#[derive(Clone, Debug, Deserialize)]
pub struct BookDef {
    pub id: String,
    #[serde(default = "default_book_text")]
    pub text: String,
    #[serde(default = "default_book_points")]
    pub points: u32,
}

#[derive(Clone, Debug, Deserialize)]
pub struct GuardianDef {
    #[serde(default)]
    pub required_score: u32,
    #[serde(default)]
    pub questions: Vec<DefinedQuestion>,
    #[serde(default)]
    pub x: Option<i32>,
    #[serde(default)]
    pub y: Option<i32>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DefinedQuestion {
    #[serde(rename = "question")]
    pub prompt: String,
    pub choices: Vec<String>,
    pub answer: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default = "default_question_difficulty")]
    pub difficulty: u8,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct BookPlacement {
    pub book_id: String,
    pub x: i32,
    pub y: i32,
}

#[derive(Clone, Debug, Default)]
pub struct GameContent {
    pub books: Vec<BookDef>,
    pub guardians: Vec<GuardianDef>,
    pub book_placements: Vec<BookPlacement>,
}

impl GameContent {
    pub fn is_empty(&self) -> bool {
        self.books.is_empty() && self.guardians.is_empty() && self.book_placements.is_empty()
    }
}

fn default_book_text() -> String {
    "A worn book with no legible title.".to_string()
}

fn default_book_points() -> u32 {
    1
}

fn default_question_difficulty() -> u8 {
    1
}

/// Read and parse a definition file. Any failure degrades to empty content.
pub fn load_game_content(path: &Path) -> GameContent {
    match fs::read_to_string(path) {
        Ok(raw) => parse_game_content(&raw),
        Err(_) => GameContent::default(),
    }
}

/// Parse definitions entry by entry so one malformed object cannot take
/// down the rest of the file.
pub fn parse_game_content(raw: &str) -> GameContent {
    let Ok(document) = serde_json::from_str::<Value>(raw) else {
        return GameContent::default();
    };

    let books = collect_entries::<BookDef>(document.get("books"));
    let mut guardians = collect_entries::<GuardianDef>(document.get("guardians"));
    for guardian in &mut guardians {
        guardian.questions.retain(question_is_usable);
    }
    let book_placements =
        collect_entries::<BookPlacement>(document.get("placements").and_then(|p| p.get("books")));

    GameContent { books, guardians, book_placements }
}

fn collect_entries<T: for<'de> Deserialize<'de>>(value: Option<&Value>) -> Vec<T> {
    let Some(entries) = value.and_then(Value::as_array) else {
        return Vec::new();
    };
    entries
        .iter()
        .filter_map(|entry| serde_json::from_value(entry.clone()).ok())
        .collect()
}

fn question_is_usable(question: &DefinedQuestion) -> bool {
    let answer = normalize(&question.answer);
    question.choices.iter().filter(|choice| normalize(choice) == answer).count() == 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_document_parses_books_guardians_and_placements() {
        let raw = r#"{
            "books": [
                {"id": "ledger", "text": "The ledger of the first hall.", "points": 3}
            ],
            "guardians": [
                {
                    "required_score": 2,
                    "x": 120,
                    "y": 140,
                    "questions": [
                        {"question": "2 + 2?", "choices": ["3", "4", "5"], "answer": "4"}
                    ]
                }
            ],
            "placements": {"books": [{"book_id": "ledger", "x": 100, "y": 120}]}
        }"#;
        let content = parse_game_content(raw);
        assert_eq!(content.books.len(), 1);
        assert_eq!(content.books[0].points, 3);
        assert_eq!(content.guardians.len(), 1);
        assert_eq!(content.guardians[0].required_score, 2);
        assert_eq!(content.guardians[0].questions.len(), 1);
        assert_eq!(content.book_placements.len(), 1);
    }

    #[test]
    fn missing_optional_fields_take_defaults() {
        let raw = r#"{"books": [{"id": "bare"}]}"#;
        let content = parse_game_content(raw);
        assert_eq!(content.books.len(), 1);
        assert_eq!(content.books[0].points, 1);
        assert!(!content.books[0].text.is_empty());
    }

    #[test]
    fn malformed_entries_are_skipped_not_fatal() {
        let raw = r#"{
            "books": [
                {"text": "no id, should be dropped"},
                {"id": "kept"}
            ],
            "guardians": [
                {"questions": "not a list"},
                {"required_score": 1}
            ]
        }"#;
        let content = parse_game_content(raw);
        assert_eq!(content.books.len(), 1);
        assert_eq!(content.books[0].id, "kept");
        assert_eq!(content.guardians.len(), 1);
        assert_eq!(content.guardians[0].required_score, 1);
    }

    #[test]
    fn questions_without_their_answer_among_choices_are_dropped() {
        let raw = r#"{
            "guardians": [{
                "questions": [
                    {"question": "ok", "choices": ["a", "b"], "answer": "A"},
                    {"question": "broken", "choices": ["x", "y"], "answer": "z"},
                    {"question": "doubled", "choices": ["q", "q"], "answer": "q"}
                ]
            }]
        }"#;
        let content = parse_game_content(raw);
        assert_eq!(content.guardians.len(), 1);
        let prompts: Vec<&str> = content.guardians[0]
            .questions
            .iter()
            .map(|question| question.prompt.as_str())
            .collect();
        assert_eq!(prompts, vec!["ok"]);
    }

    #[test]
    fn non_json_input_and_missing_files_degrade_to_empty_content() {
        assert!(parse_game_content("definitely not json").is_empty());
        let missing = Path::new("/nonexistent/content/definitions.json");
        assert!(load_game_content(missing).is_empty());
    }
}
