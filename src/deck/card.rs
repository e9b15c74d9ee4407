use icu_normalizer::ComposingNormalizerBorrowed;

/// Joins front and back inside a key. Contains a non-ASCII dash so a key can
/// never be forged by text around a `-` delimiter.
pub const KEY_SEPARATOR: &str = " \u{2014} ";

/// One front/back term pair with its identity key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Card {
    front: String,
    back: String,
    key: String,
}

impl Card {
    pub fn new(front: impl Into<String>, back: impl Into<String>) -> Self {
        let front = front.into();
        let back = back.into();
        let key = card_key(&front, &back);
        Self { front, back, key }
    }

    pub fn front(&self) -> &str {
        &self.front
    }

    pub fn back(&self) -> &str {
        &self.back
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Case-insensitive fingerprint of a front/back pair.
///
/// The text is composed to NFC before lowercasing so that `ł` typed as one code
/// point and `l` + combining stroke produce the same key.
pub fn card_key(front: &str, back: &str) -> String {
    let joined = format!("{front}{KEY_SEPARATOR}{back}");
    ComposingNormalizerBorrowed::new_nfc()
        .normalize(&joined)
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_ignores_case() {
        assert_eq!(Card::new("Apple", "Jabłko").key(), Card::new("apple", "JABŁKO").key());
    }

    #[test]
    fn key_keeps_sides_apart() {
        // "a b" / "c" must not collide with "a" / "b c"
        assert_ne!(card_key("a b", "c"), card_key("a", "b c"));
        assert_ne!(card_key("a-b", "c"), card_key("a", "b-c"));
    }

    #[test]
    fn key_normalizes_decomposed_diacritics() {
        let composed = "\u{00e9}t\u{00e9}";
        let decomposed = "e\u{0301}te\u{0301}";
        assert_eq!(card_key(composed, "summer"), card_key(decomposed, "summer"));
    }

    #[test]
    fn display_text_is_kept_verbatim() {
        let card = Card::new("How are you?", "Jak się masz?");
        assert_eq!(card.front(), "How are you?");
        assert_eq!(card.back(), "Jak się masz?");
        assert_eq!(card.key(), "how are you? \u{2014} jak się masz?");
    }
}
