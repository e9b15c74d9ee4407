pub mod card;
pub mod direction;
pub mod engine;
pub mod parser;

pub use card::Card;
pub use direction::Direction;
pub use engine::{AnswerOutcome, DeckEngine, DeckError, Prompt, Verdict, VerdictPolicy};
pub use parser::{LineParseError, ParseOutcome};
