//! Per-theme question pools: lazy materialization, difficulty-filtered
//! sampling, and multiple-choice instance assembly.
//!
//! Pool membership is formula-driven and stable; only sampling and
//! distractor synthesis consume the session's random stream.

mod distractors;

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::pool_file::{self, PoolFileError};
use crate::rng::RandomStream;
use crate::types::Theme;

pub const POOL_SIZE: usize = 100;
pub const CHOICES_PER_QUESTION: usize = 3;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: u32,
    #[serde(rename = "question")]
    pub prompt: String,
    pub answer: String,
    pub explanation: String,
    pub difficulty: u8,
}

/// A sampled record plus its generated 3-choice set. Built per sampling
/// call and never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuestionInstance {
    pub theme: Theme,
    pub record: QuestionRecord,
    pub choices: Vec<String>,
}

impl QuestionInstance {
    /// Index of the correct choice after trim+lowercase normalization.
    pub fn correct_choice_index(&self) -> Option<usize> {
        let answer = normalize(&self.record.answer);
        self.choices.iter().position(|choice| normalize(choice) == answer)
    }
}

pub struct QuestionBank {
    pools: BTreeMap<Theme, Vec<QuestionRecord>>,
    data_dir: Option<PathBuf>,
}

impl QuestionBank {
    /// Bank with no persistence; pools are regenerated per process.
    pub fn in_memory() -> Self {
        Self { pools: BTreeMap::new(), data_dir: None }
    }

    /// Bank backed by one JSON file per theme under `data_dir`.
    pub fn with_data_dir(data_dir: PathBuf) -> Self {
        Self { pools: BTreeMap::new(), data_dir: Some(data_dir) }
    }

    /// Idempotent: materializes the pool for `theme` on first call and is a
    /// no-op afterwards. Returns the pool size.
    pub fn ensure_pool(&mut self, theme: Theme) -> Result<usize, PoolFileError> {
        if !self.pools.contains_key(&theme) {
            let pool = match &self.data_dir {
                Some(dir) => pool_file::load_or_create(dir, theme, POOL_SIZE)?,
                None => generate_pool(theme, POOL_SIZE),
            };
            self.pools.insert(theme, pool);
        }
        Ok(self.pools[&theme].len())
    }

    pub fn pool(&self, theme: Theme) -> Option<&[QuestionRecord]> {
        self.pools.get(&theme).map(Vec::as_slice)
    }

    /// Draw up to `count` non-repeating instances with difficulty at or
    /// above `min_difficulty`. A short result means the pool cannot cover
    /// the request; callers must treat that as "not challengeable yet"
    /// rather than padding.
    pub fn sample(
        &mut self,
        theme: Theme,
        rng: &mut RandomStream,
        count: usize,
        min_difficulty: u8,
    ) -> Result<Vec<QuestionInstance>, PoolFileError> {
        self.ensure_pool(theme)?;
        let pool = &self.pools[&theme];
        let mut filtered: Vec<&QuestionRecord> =
            pool.iter().filter(|record| record.difficulty >= min_difficulty).collect();
        rng.shuffle(&mut filtered);
        filtered.truncate(count);
        let instances = filtered
            .into_iter()
            .map(|record| build_instance(theme, record.clone(), rng))
            .collect();
        Ok(instances)
    }
}

fn build_instance(
    theme: Theme,
    record: QuestionRecord,
    rng: &mut RandomStream,
) -> QuestionInstance {
    let mut choices = distractors::choices_for(theme, &record.answer, rng);
    // Shuffle so the correct answer is not biased toward index 0.
    rng.shuffle(&mut choices);
    QuestionInstance { theme, record, choices }
}

/// Generate the full pool for a theme. Pure function of `(theme, total)`,
/// which is what makes pool files idempotent to regenerate.
pub(crate) fn generate_pool(theme: Theme, total: usize) -> Vec<QuestionRecord> {
    (1..=total as u32).map(|index| generate_record(theme, index, total)).collect()
}

fn generate_record(theme: Theme, index: u32, total: usize) -> QuestionRecord {
    let difficulty = spread_difficulty(index, total);
    match theme {
        Theme::Arithmetic => QuestionRecord {
            id: index,
            prompt: format!("What is {index} + {index}?"),
            answer: (index + index).to_string(),
            explanation: format!("Basic addition: {index} + {index}."),
            difficulty,
        },
        Theme::Logic => QuestionRecord {
            id: index,
            prompt: format!("If A implies B and B implies C, does A imply C? (yes/no) [{index}]"),
            answer: "yes".to_string(),
            explanation: "Implication is transitive.".to_string(),
            difficulty,
        },
        Theme::Trivia => QuestionRecord {
            id: index,
            prompt: format!("Which number does the word-form of \"{index}\" stand for?"),
            answer: index.to_string(),
            explanation: "Plain numeral reading.".to_string(),
            difficulty,
        },
    }
}

/// Spread difficulty evenly across `1..=5`: the i-th generated record
/// (1-based) lands at `1 + (i - 1) * 4 / (total - 1)`.
pub fn spread_difficulty(index: u32, total: usize) -> u8 {
    if total <= 1 {
        return 1;
    }
    (1 + (index as usize - 1) * 4 / (total - 1)) as u8
}

pub(crate) fn normalize(raw: &str) -> String {
    raw.trim().to_lowercase()
}
