use std::collections::HashSet;
use std::fmt;

use crate::deck::card::Card;

pub const DELIMITER: char = '-';

/// A non-blank, non-comment line that could not be split into two sides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LineParseError {
    pub source: String,
    /// 1-based.
    pub line: usize,
    pub raw: String,
}

impl fmt::Display for LineParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.source, self.line, self.raw)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParseOutcome {
    pub cards: Vec<Card>,
    pub errors: Vec<LineParseError>,
}

/// Parses `front - back` lines into unique cards.
///
/// Malformed lines are collected in `errors` and never abort the parse.
/// Duplicates (by key) keep their first occurrence and are not reported.
pub fn parse(text: &str, source: &str) -> ParseOutcome {
    let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
    // A leading byte-order mark is not part of the first line.
    let normalized = normalized.strip_prefix('\u{feff}').unwrap_or(&normalized);
    let mut seen = HashSet::new();
    let mut outcome = ParseOutcome::default();

    for (idx, raw) in normalized.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        match split_once(line) {
            Some((front, back)) => {
                let card = Card::new(front, back);
                if seen.insert(card.key().to_string()) {
                    outcome.cards.push(card);
                }
            }
            None => outcome.errors.push(LineParseError {
                source: source.to_string(),
                line: idx + 1,
                raw: raw.to_string(),
            }),
        }
    }

    outcome
}

fn split_once(line: &str) -> Option<(&str, &str)> {
    let (front, back) = line.split_once(DELIMITER)?;
    let (front, back) = (front.trim(), back.trim());
    if front.is_empty() || back.is_empty() {
        return None;
    }
    Some((front, back))
}

/// Unions several parse outcomes in order. Cards are deduplicated by key across
/// all inputs (first wins); errors are concatenated.
pub fn merge(outcomes: impl IntoIterator<Item = ParseOutcome>) -> ParseOutcome {
    let mut seen = HashSet::new();
    let mut merged = ParseOutcome::default();
    for outcome in outcomes {
        for card in outcome.cards {
            if seen.insert(card.key().to_string()) {
                merged.cards.push(card);
            }
        }
        merged.errors.extend(outcome.errors);
    }
    merged
}

/// Writes cards back in the line format accepted by [`parse`].
pub fn to_text(cards: &[Card]) -> String {
    let mut out = String::new();
    for card in cards {
        out.push_str(card.front());
        out.push_str(" - ");
        out.push_str(card.back());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_lines() {
        let outcome = parse("hello - cześć\napple - jabłko\n", "sample.txt");
        assert_eq!(outcome.cards.len(), 2);
        assert_eq!(outcome.cards[0].front(), "hello");
        assert_eq!(outcome.cards[0].back(), "cześć");
        assert_eq!(outcome.cards[1].front(), "apple");
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn skips_blank_and_comment_lines() {
        let text = "# animals\n\n   \n  # indented comment\ncat - kot\n";
        let outcome = parse(text, "a.txt");
        assert_eq!(outcome.cards, vec![Card::new("cat", "kot")]);
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn splits_on_first_delimiter_only() {
        let outcome = parse("see you - do zobaczenia - później", "a.txt");
        assert_eq!(outcome.cards.len(), 1);
        assert_eq!(outcome.cards[0].front(), "see you");
        assert_eq!(outcome.cards[0].back(), "do zobaczenia - później");
    }

    #[test]
    fn missing_delimiter_is_reported_with_line_number() {
        let outcome = parse("cat - kot\nonlytext\ndog - pies", "zoo.txt");
        assert_eq!(outcome.cards.len(), 2);
        assert_eq!(
            outcome.errors,
            vec![LineParseError {
                source: "zoo.txt".to_string(),
                line: 2,
                raw: "onlytext".to_string(),
            }]
        );
    }

    #[test]
    fn empty_side_is_an_error() {
        let outcome = parse("- kot\ncat -\n  -  \n", "a.txt");
        assert!(outcome.cards.is_empty());
        let lines: Vec<usize> = outcome.errors.iter().map(|e| e.line).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    }

    #[test]
    fn error_keeps_raw_untrimmed_line() {
        let outcome = parse("   broken line  ", "a.txt");
        assert_eq!(outcome.errors[0].raw, "   broken line  ");
    }

    #[test]
    fn case_insensitive_duplicates_collapse() {
        let outcome = parse("a - b\nA - B\n", "a.txt");
        assert_eq!(outcome.cards.len(), 1);
        assert_eq!(outcome.cards[0].front(), "a");
        assert!(outcome.errors.is_empty());
    }

    #[test]
    fn handles_crlf_and_lone_cr() {
        let outcome = parse("cat - kot\r\ndog - pies\rbad\r\n", "a.txt");
        assert_eq!(outcome.cards.len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert_eq!(outcome.errors[0].line, 3);
        assert_eq!(outcome.errors[0].raw, "bad");
    }

    #[test]
    fn leading_byte_order_mark_is_ignored() {
        let outcome = parse("\u{feff}# zwierzęta\ncat - kot\n", "bom.txt");
        assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
        assert_eq!(outcome.cards, vec![Card::new("cat", "kot")]);

        let outcome = parse("\u{feff}cat - kot\r\n", "bom.txt");
        assert_eq!(outcome.cards[0].front(), "cat");
        assert_eq!(outcome.cards[0].key(), Card::new("cat", "kot").key());
    }

    #[test]
    fn merge_keeps_first_occurrence_across_sources() {
        let first = parse("cat - kot\ndog - pies", "one.txt");
        let second = parse("CAT - KOT\nbird - ptak\nnope", "two.txt");
        let merged = merge([first, second]);

        let fronts: Vec<&str> = merged.cards.iter().map(|c| c.front()).collect();
        assert_eq!(fronts, vec!["cat", "dog", "bird"]);
        assert_eq!(merged.errors.len(), 1);
        assert_eq!(merged.errors[0].source, "two.txt");
    }

    #[test]
    fn to_text_writes_one_card_per_line() {
        let cards = vec![Card::new("cat", "kot"), Card::new("dog", "pies")];
        assert_eq!(to_text(&cards), "cat - kot\ndog - pies\n");
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        // A side without the delimiter, comment marker or surrounding whitespace.
        fn side() -> impl Strategy<Value = String> {
            "[a-zA-Ząęłńóśźż?!.,' ]{0,12}[a-zA-Ząęłńóśźż]"
                .prop_map(|s| s.trim().to_string())
                .prop_filter("non-empty", |s| !s.is_empty())
        }

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(64))]

            #[test]
            fn parse_of_serialized_cards_is_identity(
                pairs in prop::collection::vec((side(), side()), 0..20)
            ) {
                let cards = merge([ParseOutcome {
                    cards: pairs.iter().map(|(f, b)| Card::new(f.clone(), b.clone())).collect(),
                    errors: Vec::new(),
                }])
                .cards;
                let reparsed = parse(&to_text(&cards), "gen.txt");
                prop_assert_eq!(reparsed.cards, cards);
                prop_assert!(reparsed.errors.is_empty());
            }

            #[test]
            fn error_count_matches_unsplittable_lines(
                lines in prop::collection::vec("[ a-z#-]{0,10}", 0..30)
            ) {
                let text = lines.join("\n");
                let outcome = parse(&text, "gen.txt");
                let expected = lines
                    .iter()
                    .map(|l| l.trim())
                    .filter(|l| !l.is_empty() && !l.starts_with('#'))
                    .filter(|l| match l.split_once('-') {
                        Some((a, b)) => a.trim().is_empty() || b.trim().is_empty(),
                        None => true,
                    })
                    .count();
                prop_assert_eq!(outcome.errors.len(), expected);
            }
        }
    }
}
