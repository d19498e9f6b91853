use std::rc::Rc;

use log::{debug, info};
use yew::Reducible;

use crate::model::Cat;
use crate::swipe::Decision;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeckPhase {
    Loading,
    Browsing,
    Exhausted,
}

/// The cats being browsed and how far through them the viewer is.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Deck {
    cats: Option<Vec<Cat>>,
    cursor: usize,
}

impl Deck {
    pub fn loading() -> Self {
        Self::default()
    }

    pub fn load(&mut self, cats: Vec<Cat>) {
        info!("Deck loaded with {} cats", cats.len());
        self.cats = Some(cats);
        self.cursor = 0;
    }

    pub fn phase(&self) -> DeckPhase {
        match &self.cats {
            None => DeckPhase::Loading,
            Some(cats) if self.cursor < cats.len() => DeckPhase::Browsing,
            Some(_) => DeckPhase::Exhausted,
        }
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    fn len(&self) -> usize {
        self.cats.as_ref().map_or(0, Vec::len)
    }

    pub fn remaining(&self) -> usize {
        self.len().saturating_sub(self.cursor)
    }

    pub fn active(&self) -> Option<&Cat> {
        self.cats.as_ref()?.get(self.cursor)
    }

    /// The cat shown behind the active card.
    pub fn next(&self) -> Option<&Cat> {
        self.cats.as_ref()?.get(self.cursor + 1)
    }

    /// Consumes the active cat. A decision naming any other cat is stale
    /// (e.g. a second release before the deck re-rendered) and is ignored.
    pub fn record_decision(&mut self, decision: Decision, cat_id: &str) -> bool {
        let Some(active) = self.active() else {
            debug!("Ignoring {:?} on exhausted deck", decision);
            return false;
        };
        if active.id != cat_id {
            debug!("Ignoring stale {:?} for cat {}", decision, cat_id);
            return false;
        }

        info!("Swiped {:?} on {}", decision.direction(), active.name);
        self.cursor += 1;
        true
    }

    /// Starts over from the first cat without refetching. The deck ends up
    /// `Browsing` if it has cats and `Exhausted` if it has none; a deck still
    /// `Loading` has no sequence yet and stays `Loading` with the cursor at 0.
    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

pub enum DeckAction {
    Loaded(Vec<Cat>),
    Decide { decision: Decision, cat_id: String },
    Reset,
}

impl Reducible for Deck {
    type Action = DeckAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut deck = (*self).clone();
        match action {
            DeckAction::Loaded(cats) => deck.load(cats),
            DeckAction::Decide { decision, cat_id } => {
                if !deck.record_decision(decision, &cat_id) {
                    return self;
                }
            }
            DeckAction::Reset => deck.reset(),
        }
        Rc::new(deck)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fallback_cats;

    fn loaded() -> Deck {
        let mut deck = Deck::loading();
        deck.load(fallback_cats());
        deck
    }

    fn active_id(deck: &Deck) -> String {
        deck.active().expect("active cat").id.clone()
    }

    #[test]
    fn starts_loading() {
        let deck = Deck::loading();
        assert_eq!(deck.phase(), DeckPhase::Loading);
        assert!(deck.active().is_none());
    }

    #[test]
    fn load_picks_phase_from_sequence() {
        assert_eq!(loaded().phase(), DeckPhase::Browsing);

        let mut empty = Deck::loading();
        empty.load(Vec::new());
        assert_eq!(empty.phase(), DeckPhase::Exhausted);
    }

    #[test]
    fn exposes_active_and_next() {
        let deck = loaded();
        assert_eq!(deck.active().map(|cat| cat.name.as_str()), Some("Mittens"));
        assert_eq!(deck.next().map(|cat| cat.name.as_str()), Some("Whiskers"));
    }

    #[test]
    fn either_decision_advances_by_one() {
        let mut deck = loaded();
        let first = active_id(&deck);
        assert!(deck.record_decision(Decision::Reject, &first));
        assert_eq!(deck.cursor(), 1);
        let second = active_id(&deck);
        assert!(deck.record_decision(Decision::Accept, &second));
        assert_eq!(deck.cursor(), 2);
        assert_eq!(deck.remaining(), 3);
    }

    #[test]
    fn stale_decision_does_not_double_advance() {
        let mut deck = loaded();
        let first = active_id(&deck);
        assert!(deck.record_decision(Decision::Accept, &first));
        assert!(!deck.record_decision(Decision::Accept, &first));
        assert_eq!(deck.cursor(), 1);
    }

    #[test]
    fn last_cat_has_no_next() {
        let mut deck = loaded();
        for _ in 0..4 {
            let id = active_id(&deck);
            deck.record_decision(Decision::Reject, &id);
        }
        assert_eq!(deck.active().map(|cat| cat.name.as_str()), Some("Salem"));
        assert!(deck.next().is_none());
    }

    #[test]
    fn accepting_everything_exhausts_then_reset_restarts() {
        let mut deck = loaded();
        for n in 1..=5 {
            let id = active_id(&deck);
            assert!(deck.record_decision(Decision::Accept, &id));
            assert_eq!(deck.cursor(), n);
        }
        assert_eq!(deck.phase(), DeckPhase::Exhausted);
        assert!(!deck.record_decision(Decision::Accept, "5"));

        deck.reset();
        assert_eq!(deck.cursor(), 0);
        assert_eq!(deck.phase(), DeckPhase::Browsing);
        assert_eq!(deck.active(), fallback_cats().first());
    }

    #[test]
    fn reset_on_empty_deck_stays_exhausted() {
        let mut deck = Deck::loading();
        deck.load(Vec::new());
        deck.reset();
        assert_eq!(deck.cursor(), 0);
        assert_eq!(deck.phase(), DeckPhase::Exhausted);

        let mut pending = Deck::loading();
        pending.reset();
        assert_eq!(pending.phase(), DeckPhase::Loading);
    }

    #[test]
    fn reducer_keeps_state_on_stale_decision() {
        let deck = Rc::new(loaded());
        let advanced = deck.clone().reduce(DeckAction::Decide {
            decision: Decision::Accept,
            cat_id: "1".into(),
        });
        assert_eq!(advanced.cursor(), 1);

        let unchanged = advanced.clone().reduce(DeckAction::Decide {
            decision: Decision::Accept,
            cat_id: "1".into(),
        });
        assert!(Rc::ptr_eq(&advanced, &unchanged));

        let reset = unchanged.reduce(DeckAction::Reset);
        assert_eq!(reset.cursor(), 0);
    }
}
