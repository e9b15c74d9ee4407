use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::deck::card::Card;
use crate::deck::direction::Direction;
use crate::store::progress::ProgressStore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    Good,
    Bad,
}

/// How the verdict controls behave before the answer is shown.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VerdictPolicy {
    /// The first press of either verdict reveals, the second one records it.
    #[default]
    TwoStep,
    /// Good still needs a reveal; Bad draws the next card right away.
    BadImmediate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Revealed,
    Learned,
    Skipped,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("no active card: the study pool is empty")]
    NoActiveCard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Prompt<'a> {
    pub prompt: &'a str,
    pub answer: &'a str,
    pub revealed: bool,
}

#[derive(Clone, Copy, Debug)]
struct Cursor {
    /// Index into `active`.
    index: usize,
    revealed: bool,
}

/// Owns the card set, the learned progress and the session cursor.
///
/// The active pool is kept as indices into `cards` and is rebuilt from the
/// learned set after every mutation that can change it.
pub struct DeckEngine {
    cards: Vec<Card>,
    active: Vec<usize>,
    cursor: Option<Cursor>,
    progress: ProgressStore,
    policy: VerdictPolicy,
    session_touched: bool,
    rng: SmallRng,
}

impl DeckEngine {
    pub fn new(progress: ProgressStore, policy: VerdictPolicy) -> Self {
        Self::with_rng(progress, policy, SmallRng::from_entropy())
    }

    pub fn with_rng(progress: ProgressStore, policy: VerdictPolicy, rng: SmallRng) -> Self {
        Self {
            cards: Vec::new(),
            active: Vec::new(),
            cursor: None,
            progress,
            policy,
            session_touched: false,
            rng,
        }
    }

    /// Replaces the card set wholesale and starts a fresh session on it.
    pub fn load_card_set(&mut self, cards: Vec<Card>) {
        self.cards = cards;
        self.session_touched = false;
        self.recompute();
        log::info!(
            "loaded {} cards, {} still to learn",
            self.cards.len(),
            self.active.len()
        );
    }

    pub fn current_card(&self) -> Option<&Card> {
        let cursor = self.cursor?;
        self.active.get(cursor.index).map(|&i| &self.cards[i])
    }

    pub fn current_prompt(&self) -> Result<Prompt<'_>, DeckError> {
        let cursor = self.cursor.ok_or(DeckError::NoActiveCard)?;
        let card = self.current_card().ok_or(DeckError::NoActiveCard)?;
        let (prompt, answer) = self.progress.direction().orient(card.front(), card.back());
        Ok(Prompt {
            prompt,
            answer,
            revealed: cursor.revealed,
        })
    }

    pub fn reveal(&mut self) -> Result<(), DeckError> {
        let cursor = self.cursor.as_mut().ok_or(DeckError::NoActiveCard)?;
        cursor.revealed = true;
        self.session_touched = true;
        Ok(())
    }

    pub fn answer(&mut self, verdict: Verdict) -> Result<AnswerOutcome, DeckError> {
        let cursor = self.cursor.ok_or(DeckError::NoActiveCard)?;
        self.session_touched = true;

        let skip_now = cursor.revealed || self.policy == VerdictPolicy::BadImmediate;
        if verdict == Verdict::Bad && skip_now {
            self.draw();
            return Ok(AnswerOutcome::Skipped);
        }
        if !cursor.revealed {
            self.reveal()?;
            return Ok(AnswerOutcome::Revealed);
        }

        let key = self.cards[self.active[cursor.index]].key().to_string();
        if let Err(e) = self.progress.mark_learned(&key) {
            log::warn!("could not persist learned card {key:?}: {e}");
        }
        self.recompute();
        Ok(AnswerOutcome::Learned)
    }

    /// Changes which side is asked. Cursor, pool and learned set are untouched.
    pub fn switch_direction(&mut self, direction: Direction) {
        if let Err(e) = self.progress.set_direction(direction) {
            log::warn!("could not persist study direction: {e}");
        }
    }

    pub fn reset_progress(&mut self) {
        if let Err(e) = self.progress.reset() {
            log::warn!("could not persist progress reset: {e}");
        }
        self.recompute();
        log::info!("progress reset, {} cards back in the pool", self.active.len());
    }

    fn recompute(&mut self) {
        let progress = &self.progress;
        self.active = self
            .cards
            .iter()
            .enumerate()
            .filter(|(_, card)| !progress.is_learned(card.key()))
            .map(|(i, _)| i)
            .collect();
        self.draw();
    }

    /// Uniform pick over the active pool; the previous card may come up again.
    fn draw(&mut self) {
        self.cursor = if self.active.is_empty() {
            None
        } else {
            Some(Cursor {
                index: self.rng.gen_range(0..self.active.len()),
                revealed: false,
            })
        };
    }

    pub fn session_touched(&self) -> bool {
        self.session_touched
    }

    /// True when there is nothing left to study: every card is learned or the
    /// set is empty.
    pub fn is_exhausted(&self) -> bool {
        self.active.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn active_cards(&self) -> impl Iterator<Item = &Card> {
        self.active.iter().map(|&i| &self.cards[i])
    }

    pub fn total(&self) -> usize {
        self.cards.len()
    }

    pub fn remaining(&self) -> usize {
        self.active.len()
    }

    pub fn learned_count(&self) -> usize {
        self.cards.len() - self.active.len()
    }

    pub fn direction(&self) -> Direction {
        self.progress.direction()
    }

    pub fn progress(&self) -> &ProgressStore {
        &self.progress
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::store::kv::MemoryStore;
    use crate::store::progress::LEARNED_ENTRY;

    fn engine_with(policy: VerdictPolicy, seed: u64) -> DeckEngine {
        let progress = ProgressStore::open(Box::new(MemoryStore::new()));
        DeckEngine::with_rng(progress, policy, SmallRng::seed_from_u64(seed))
    }

    fn two_cards() -> Vec<Card> {
        vec![Card::new("a", "b"), Card::new("c", "d")]
    }

    fn assert_pool_invariant(engine: &DeckEngine) {
        let pool: BTreeSet<&str> = engine.active_cards().map(|c| c.key()).collect();
        let expected: BTreeSet<&str> = engine
            .cards()
            .iter()
            .map(|c| c.key())
            .filter(|k| !engine.progress().is_learned(k))
            .collect();
        assert_eq!(pool, expected);
        assert_eq!(engine.current_card().is_some(), !pool.is_empty());
    }

    #[test]
    fn empty_set_is_exhausted_immediately() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 1);
        engine.load_card_set(Vec::new());
        assert!(engine.is_exhausted());
        assert_eq!(engine.current_prompt(), Err(DeckError::NoActiveCard));
        assert_eq!(engine.reveal(), Err(DeckError::NoActiveCard));
        assert_eq!(engine.answer(Verdict::Good), Err(DeckError::NoActiveCard));
        assert!(!engine.session_touched());
    }

    #[test]
    fn first_press_reveals_second_records() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 7);
        engine.load_card_set(two_cards());

        let before = engine.current_card().unwrap().key().to_string();
        assert_eq!(engine.answer(Verdict::Good), Ok(AnswerOutcome::Revealed));
        assert!(engine.current_prompt().unwrap().revealed);
        assert!(engine.progress().learned().is_empty());

        assert_eq!(engine.answer(Verdict::Good), Ok(AnswerOutcome::Learned));
        assert!(engine.progress().is_learned(&before));
        assert_eq!(engine.remaining(), 1);
        assert!(!engine.current_prompt().unwrap().revealed);
        assert_pool_invariant(&engine);
    }

    #[test]
    fn learning_both_cards_empties_the_pool() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 42);
        engine.load_card_set(two_cards());

        for _ in 0..2 {
            engine.reveal().unwrap();
            assert_eq!(engine.answer(Verdict::Good), Ok(AnswerOutcome::Learned));
        }

        assert!(engine.is_exhausted());
        assert_eq!(engine.current_card(), None);
        let learned: Vec<&str> = engine.progress().learned().iter().map(|s| s.as_str()).collect();
        assert_eq!(learned, vec![Card::new("a", "b").key(), Card::new("c", "d").key()]);
        assert_pool_invariant(&engine);
    }

    #[test]
    fn bad_never_touches_learned_set() {
        for policy in [VerdictPolicy::TwoStep, VerdictPolicy::BadImmediate] {
            let mut engine = engine_with(policy, 3);
            engine.load_card_set(two_cards());
            for _ in 0..10 {
                engine.answer(Verdict::Bad).unwrap();
            }
            engine.reveal().unwrap();
            engine.answer(Verdict::Bad).unwrap();
            assert!(engine.progress().learned().is_empty());
            assert_eq!(engine.remaining(), 2);
        }
    }

    #[test]
    fn two_step_bad_reveals_first() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 5);
        engine.load_card_set(two_cards());
        assert_eq!(engine.answer(Verdict::Bad), Ok(AnswerOutcome::Revealed));
        assert_eq!(engine.answer(Verdict::Bad), Ok(AnswerOutcome::Skipped));
        assert!(!engine.current_prompt().unwrap().revealed);
    }

    #[test]
    fn bad_immediate_skips_without_reveal_but_good_still_reveals() {
        let mut engine = engine_with(VerdictPolicy::BadImmediate, 5);
        engine.load_card_set(two_cards());
        assert_eq!(engine.answer(Verdict::Bad), Ok(AnswerOutcome::Skipped));
        assert!(engine.session_touched());
        assert_eq!(engine.answer(Verdict::Good), Ok(AnswerOutcome::Revealed));
        assert_eq!(engine.answer(Verdict::Good), Ok(AnswerOutcome::Learned));
    }

    #[test]
    fn reveal_is_idempotent_and_touches_session() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 9);
        engine.load_card_set(two_cards());
        assert!(!engine.session_touched());
        let key = engine.current_card().unwrap().key().to_string();
        engine.reveal().unwrap();
        engine.reveal().unwrap();
        assert!(engine.session_touched());
        assert_eq!(engine.current_card().unwrap().key(), key);

        engine.load_card_set(two_cards());
        assert!(!engine.session_touched());
    }

    #[test]
    fn reset_restores_full_pool_and_clears_persisted_keys() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 11);
        engine.load_card_set(two_cards());
        while !engine.is_exhausted() {
            engine.reveal().unwrap();
            engine.answer(Verdict::Good).unwrap();
        }

        engine.reset_progress();
        assert_eq!(engine.remaining(), 2);
        assert!(engine.current_card().is_some());
        assert_eq!(engine.progress().kv().get(LEARNED_ENTRY).as_deref(), Some("[]"));
        assert_pool_invariant(&engine);
    }

    #[test]
    fn direction_switch_only_changes_orientation() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 13);
        engine.load_card_set(vec![Card::new("cat", "kot"), Card::new("dog", "pies")]);
        engine.reveal().unwrap();
        let card = engine.current_card().unwrap().clone();

        engine.switch_direction(Direction::BackToFront);
        let prompt = engine.current_prompt().unwrap();
        assert_eq!(prompt.prompt, card.back());
        assert_eq!(prompt.answer, card.front());
        assert!(prompt.revealed);
        assert_eq!(engine.current_card(), Some(&card));
        assert_eq!(engine.remaining(), 2);
        assert!(engine.progress().learned().is_empty());
        assert_eq!(engine.direction(), Direction::BackToFront);
    }

    #[test]
    fn learned_keys_outlive_a_card_set() {
        let mut engine = engine_with(VerdictPolicy::TwoStep, 17);
        engine.load_card_set(vec![Card::new("cat", "kot")]);
        engine.reveal().unwrap();
        engine.answer(Verdict::Good).unwrap();

        engine.load_card_set(vec![Card::new("dog", "pies")]);
        assert_eq!(engine.remaining(), 1);
        engine.load_card_set(vec![Card::new("CAT", "Kot"), Card::new("dog", "pies")]);
        assert_eq!(engine.remaining(), 1);
        assert_eq!(engine.learned_count(), 1);
        assert_eq!(engine.current_card().unwrap().front(), "dog");
    }

    #[test]
    fn pool_invariant_holds_over_random_operations() {
        let mut rng = SmallRng::seed_from_u64(99);
        let mut engine = engine_with(VerdictPolicy::TwoStep, 23);
        let deck: Vec<Card> = (0..12)
            .map(|i| Card::new(format!("word{i}"), format!("słowo{i}")))
            .collect();
        engine.load_card_set(deck.clone());

        for _ in 0..300 {
            match rng.gen_range(0..6) {
                0 => {
                    let take = rng.gen_range(0..=deck.len());
                    engine.load_card_set(deck[..take].to_vec());
                }
                1 => engine.reset_progress(),
                2 => {
                    let _ = engine.answer(Verdict::Bad);
                }
                _ => {
                    let _ = engine.reveal();
                    let _ = engine.answer(Verdict::Good);
                }
            }
            assert_pool_invariant(&engine);
        }
    }
}
