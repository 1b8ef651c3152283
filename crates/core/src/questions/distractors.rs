//! Theme-aware wrong-answer synthesis for multiple-choice prompts.
//!
//! Offsets are fixed per theme: arithmetic shifts the true value by 1..=5,
//! trivia by 1..=3. Boolean-like answers get the opposite plus a neutral
//! "maybe". Anything unparseable falls back to string mutation plus the
//! sentinel "none".

use crate::rng::RandomStream;
use crate::types::Theme;

const ARITHMETIC_MAX_OFFSET: i32 = 5;
const TRIVIA_MAX_OFFSET: i32 = 3;

/// Build the unshuffled 3-choice set for an answer: the correct text first,
/// then two synthesized distractors.
pub(super) fn choices_for(theme: Theme, answer: &str, rng: &mut RandomStream) -> Vec<String> {
    let (first, second) = match theme {
        Theme::Arithmetic => numeric_pair(answer, ARITHMETIC_MAX_OFFSET, rng),
        Theme::Logic => boolean_pair(answer),
        Theme::Trivia => numeric_pair(answer, TRIVIA_MAX_OFFSET, rng),
    };
    vec![answer.to_string(), first, second]
}

fn numeric_pair(answer: &str, max_offset: i32, rng: &mut RandomStream) -> (String, String) {
    let Ok(value) = answer.trim().parse::<i64>() else {
        return (format!("{answer}?"), "none".to_string());
    };
    let above = value + i64::from(rng.next_int(1, max_offset));
    let mut below = (value - i64::from(rng.next_int(1, max_offset))).max(0);
    if below == value {
        // Clamping to zero can land back on the answer itself.
        below = value + i64::from(max_offset) + 1;
    }
    (above.to_string(), below.to_string())
}

fn boolean_pair(answer: &str) -> (String, String) {
    let opposite = if answer.trim().eq_ignore_ascii_case("yes") { "no" } else { "yes" };
    (opposite.to_string(), "maybe".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn normalized(raw: &str) -> String {
        raw.trim().to_lowercase()
    }

    #[test]
    fn numeric_answers_get_three_distinct_choices() {
        let mut rng = RandomStream::seed_from_u64(99);
        for answer in ["4", "17", "200"] {
            let choices = choices_for(Theme::Arithmetic, answer, &mut rng);
            assert_eq!(choices.len(), 3);
            let matches =
                choices.iter().filter(|choice| normalized(choice) == normalized(answer)).count();
            assert_eq!(matches, 1, "answer must appear exactly once in {choices:?}");
        }
    }

    #[test]
    fn zero_answer_never_collides_with_its_clamped_distractor() {
        let mut rng = RandomStream::seed_from_u64(5);
        for _ in 0..50 {
            let choices = choices_for(Theme::Trivia, "0", &mut rng);
            let zero_count = choices.iter().filter(|choice| choice.as_str() == "0").count();
            assert_eq!(zero_count, 1, "clamped distractor duplicated the answer: {choices:?}");
        }
    }

    #[test]
    fn boolean_answers_get_the_opposite_and_a_neutral_option() {
        let mut rng = RandomStream::seed_from_u64(1);
        let choices = choices_for(Theme::Logic, "yes", &mut rng);
        assert_eq!(choices, vec!["yes".to_string(), "no".to_string(), "maybe".to_string()]);
        let negative = choices_for(Theme::Logic, "no", &mut rng);
        assert_eq!(negative, vec!["no".to_string(), "yes".to_string(), "maybe".to_string()]);
    }

    #[test]
    fn unparseable_answers_fall_back_to_string_mutations() {
        let mut rng = RandomStream::seed_from_u64(1);
        let choices = choices_for(Theme::Arithmetic, "seven", &mut rng);
        assert_eq!(choices, vec!["seven".to_string(), "seven?".to_string(), "none".to_string()]);
    }

    #[test]
    fn distractor_values_stay_non_negative() {
        let mut rng = RandomStream::seed_from_u64(31);
        for _ in 0..100 {
            let choices = choices_for(Theme::Arithmetic, "2", &mut rng);
            for choice in &choices {
                let value: i64 = choice.parse().expect("numeric theme yields numeric choices");
                assert!(value >= 0);
            }
        }
    }
}
