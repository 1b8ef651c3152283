//! Built-in lore used when no external definition file is supplied, or
//! once its entries run out.

use crate::types::Theme;

pub const SYNTHESIZED_BOOK_POINTS: u32 = 2;

pub struct LoreExcerpt {
    pub theme: Theme,
    pub title: &'static str,
    pub body: &'static str,
}

pub const LORE_EXCERPTS: [LoreExcerpt; 6] = [
    LoreExcerpt {
        theme: Theme::Arithmetic,
        title: "On Counting Twice",
        body: "Every sum in these halls was checked by two scribes working apart. \
               When their totals agreed, the number was carved; when they did not, \
               both began again. Doubling a number is the oldest of those checks: \
               add a thing to itself and the result must be even.",
    },
    LoreExcerpt {
        theme: Theme::Arithmetic,
        title: "The Ledger of Small Differences",
        body: "A clerk who is off by one is off entirely. The ledger keeps its \
               balance only because every entry can be undone by its opposite, \
               and nothing below zero was ever owed.",
    },
    LoreExcerpt {
        theme: Theme::Logic,
        title: "Chains of Consequence",
        body: "The keepers wrote their rules as chains: if the first link holds \
               and the second follows, the far end may be trusted without \
               walking the whole span. This is why a single broken link is \
               treated as seriously as a missing bridge.",
    },
    LoreExcerpt {
        theme: Theme::Logic,
        title: "The Gatekeeper's Yes and No",
        body: "At each gate only two words carry weight, and \"maybe\" opens \
               nothing. A guard who accepts an uncertain answer has already \
               failed the watch.",
    },
    LoreExcerpt {
        theme: Theme::Trivia,
        title: "Numerals and Their Names",
        body: "Before the carvers agreed on digits, every number wore a word. \
               The archive still tests its visitors on reading both ways, for a \
               numeral misread is a door misopened.",
    },
    LoreExcerpt {
        theme: Theme::Trivia,
        title: "The Archivist's Parsing Rule",
        body: "Text is quoted so that it cannot be mistaken for the thing it \
               names. Strip the quotes carefully and what remains should stand \
               for exactly one value, or for nothing at all.",
    },
];

/// Book text and point value for a room with no remaining definition-file
/// entry. Excerpts cycle per theme so neighboring rooms of the same theme
/// do not repeat immediately.
pub fn synthesized_book(theme: Theme, room_index: usize) -> (String, u32) {
    let matching: Vec<&LoreExcerpt> =
        LORE_EXCERPTS.iter().filter(|excerpt| excerpt.theme == theme).collect();
    let excerpt = matching[room_index % matching.len()];
    (format!("{}\n\n{}", excerpt.title, excerpt.body), SYNTHESIZED_BOOK_POINTS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_theme_has_at_least_two_excerpts() {
        for theme in Theme::ALL {
            let count = LORE_EXCERPTS.iter().filter(|excerpt| excerpt.theme == theme).count();
            assert!(count >= 2, "theme {theme:?} needs excerpt variety, has {count}");
        }
    }

    #[test]
    fn synthesized_books_cycle_through_the_theme_excerpts() {
        let (first, _) = synthesized_book(Theme::Logic, 0);
        let (second, _) = synthesized_book(Theme::Logic, 1);
        let (wrapped, _) = synthesized_book(Theme::Logic, 2);
        assert_ne!(first, second);
        assert_eq!(first, wrapped);
    }

    #[test]
    fn synthesized_books_carry_the_fallback_point_value() {
        let (_, points) = synthesized_book(Theme::Trivia, 3);
        assert_eq!(points, SYNTHESIZED_BOOK_POINTS);
    }
}
