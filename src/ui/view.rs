use crate::deck::{DeckEngine, Direction};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CardView {
    pub prompt: String,
    /// Present once the answer has been revealed.
    pub answer: Option<String>,
}

/// Everything the study screen shows, derived from the engine without
/// touching it.
#[derive(Clone, Debug, PartialEq)]
pub struct DeckView {
    pub learned: usize,
    pub total: usize,
    pub remaining: usize,
    pub direction: Direction,
    /// `None` when there is nothing left to study.
    pub card: Option<CardView>,
}

impl DeckView {
    pub fn from_engine(engine: &DeckEngine) -> Self {
        let card = engine.current_prompt().ok().map(|p| CardView {
            prompt: p.prompt.to_string(),
            answer: p.revealed.then(|| p.answer.to_string()),
        });
        Self {
            learned: engine.learned_count(),
            total: engine.total(),
            remaining: engine.remaining(),
            direction: engine.direction(),
            card,
        }
    }

    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.learned as f64 / self.total as f64
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.card.is_none()
    }
}
