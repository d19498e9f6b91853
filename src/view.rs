use log::debug;

use crate::model::Cat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Deck,
    Matches,
    Chat,
}

/// Which screen is showing, plus the cat being chatted with.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    screen: Screen,
    selected: Option<Cat>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            screen: Screen::Deck,
            selected: None,
        }
    }
}

impl ViewState {
    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn show_deck(&mut self) {
        self.screen = Screen::Deck;
        self.selected = None;
    }

    pub fn show_matches(&mut self) {
        self.screen = Screen::Matches;
        self.selected = None;
    }

    /// Opens a chat with `cat`. Only the matches screen can do this.
    pub fn select_match(&mut self, cat: Cat) -> bool {
        if self.screen != Screen::Matches {
            debug!("Ignoring match selection outside the matches screen");
            return false;
        }
        self.screen = Screen::Chat;
        self.selected = Some(cat);
        true
    }

    pub fn back_to_matches(&mut self) {
        self.show_matches();
    }

    /// The cat to chat with, if the chat screen can render at all.
    pub fn chat_target(&self) -> Option<&Cat> {
        match self.screen {
            Screen::Chat => self.selected.as_ref(),
            _ => None,
        }
    }

    pub fn shows_navigation(&self) -> bool {
        self.screen != Screen::Chat
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::fallback_cats;

    fn salem() -> Cat {
        fallback_cats().remove(4)
    }

    #[test]
    fn starts_on_deck_without_selection() {
        let view = ViewState::default();
        assert_eq!(view.screen(), Screen::Deck);
        assert!(view.chat_target().is_none());
        assert!(view.shows_navigation());
    }

    #[test]
    fn deck_and_matches_switch_freely() {
        let mut view = ViewState::default();
        view.show_matches();
        assert_eq!(view.screen(), Screen::Matches);
        view.show_deck();
        assert_eq!(view.screen(), Screen::Deck);
        view.show_deck();
        assert_eq!(view.screen(), Screen::Deck);
    }

    #[test]
    fn selecting_a_match_opens_chat_and_back_clears_it() {
        let mut view = ViewState::default();
        view.show_matches();
        assert!(view.select_match(salem()));
        assert_eq!(view.screen(), Screen::Chat);
        assert_eq!(view.chat_target().map(|cat| cat.name.as_str()), Some("Salem"));
        assert!(!view.shows_navigation());

        view.back_to_matches();
        assert_eq!(view.screen(), Screen::Matches);
        assert!(view.chat_target().is_none());
        assert!(view.selected.is_none());
    }

    #[test]
    fn selection_from_deck_is_ignored() {
        let mut view = ViewState::default();
        assert!(!view.select_match(salem()));
        assert_eq!(view.screen(), Screen::Deck);
    }

    #[test]
    fn chat_without_selection_renders_nothing() {
        let view = ViewState {
            screen: Screen::Chat,
            selected: None,
        };
        assert!(view.chat_target().is_none());
    }
}
