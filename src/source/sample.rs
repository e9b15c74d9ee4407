use rust_embed::Embed;

use crate::source::SourceFile;

#[derive(Embed)]
#[folder = "assets/decks/"]
struct DeckAssets;

/// Decks shipped inside the binary, sorted by file name. Used when no other
/// source is given or remote discovery finds nothing.
pub fn bundled() -> Vec<SourceFile> {
    let mut names: Vec<String> = DeckAssets::iter().map(|n| n.to_string()).collect();
    names.sort();
    names
        .into_iter()
        .filter_map(|name| {
            let file = DeckAssets::get(&name)?;
            let text = std::str::from_utf8(file.data.as_ref()).ok()?.to_string();
            Some(SourceFile::inline(name, text))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::parser;
    use crate::source::SourceOrigin;

    #[test]
    fn bundled_decks_parse_cleanly() {
        let decks = bundled();
        assert!(!decks.is_empty());
        for deck in decks {
            let SourceOrigin::Inline(text) = &deck.origin else {
                panic!("bundled deck {} is not inline", deck.name);
            };
            let outcome = parser::parse(text, &deck.name);
            assert!(outcome.errors.is_empty(), "{:?}", outcome.errors);
            assert!(!outcome.cards.is_empty());
        }
    }
}
