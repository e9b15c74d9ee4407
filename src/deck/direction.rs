use serde::{Deserialize, Serialize};

/// Which side of a card is asked and which is the answer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    FrontToBack,
    BackToFront,
}

impl Direction {
    pub fn as_tag(self) -> &'static str {
        match self {
            Direction::FrontToBack => "front-to-back",
            Direction::BackToFront => "back-to-front",
        }
    }

    /// Parses a persisted tag. Also accepts the `EN->PL` / `PL->EN` tags
    /// written by the browser version of the trainer.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim() {
            "front-to-back" | "EN->PL" => Some(Direction::FrontToBack),
            "back-to-front" | "PL->EN" => Some(Direction::BackToFront),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Direction::FrontToBack => Direction::BackToFront,
            Direction::BackToFront => Direction::FrontToBack,
        }
    }

    /// Returns `(prompt, answer)` for the given card sides.
    pub fn orient<'a>(self, front: &'a str, back: &'a str) -> (&'a str, &'a str) {
        match self {
            Direction::FrontToBack => (front, back),
            Direction::BackToFront => (back, front),
        }
    }
}
