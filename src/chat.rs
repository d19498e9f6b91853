use std::rc::Rc;

use chrono::Utc;
use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;
use yew::Reducible;

use crate::model::{Message, Sender, MAX_MESSAGE_CHARS};

const CAT_PHRASES: [&str; 8] = [
    "Meow!",
    "Purr...",
    "Can I have a treat?",
    "Zzz...",
    "Feed me.",
    "*Knocks glass off table*",
    "Mrrp?",
    "Hiss! (Just kidding)",
];

const REPLY_BASE_MS: u32 = 1500;
const REPLY_JITTER_MS: u32 = 1000;

/// Counter turns red past this many characters.
pub const NEAR_LIMIT_CHARS: usize = 450;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    #[error("message is empty")]
    Empty,
    #[error("message is {0} characters, the limit is {max}", max = MAX_MESSAGE_CHARS)]
    TooLong(usize),
}

/// Trims `raw` and checks it fits in a message.
pub fn validate_message(raw: &str) -> Result<String, ChatError> {
    let text = raw.trim();
    if text.is_empty() {
        return Err(ChatError::Empty);
    }
    let chars = text.chars().count();
    if chars > MAX_MESSAGE_CHARS {
        return Err(ChatError::TooLong(chars));
    }
    Ok(text.to_owned())
}

pub fn reply_delay_ms(rng: &mut impl Rng) -> u32 {
    REPLY_BASE_MS + rng.gen_range(0..REPLY_JITTER_MS)
}

pub fn pick_reply(rng: &mut impl Rng) -> &'static str {
    CAT_PHRASES.choose(rng).copied().unwrap_or(CAT_PHRASES[0])
}

/// One conversation with a matched cat. Messages are only ever appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatSession {
    messages: Vec<Message>,
    next_id: u64,
    pending_replies: usize,
}

impl ChatSession {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Shown while at least one reply is still on its way.
    pub fn is_typing(&self) -> bool {
        self.pending_replies > 0
    }

    pub fn send(&mut self, raw: &str) -> Result<&Message, ChatError> {
        let text = validate_message(raw)?;
        self.pending_replies += 1;
        Ok(self.push(Sender::Viewer, text))
    }

    pub fn receive_reply(&mut self, text: &str) -> &Message {
        if self.pending_replies == 0 {
            debug!("Reply arrived with nothing pending");
        }
        self.pending_replies = self.pending_replies.saturating_sub(1);
        self.push(Sender::Cat, text.to_owned())
    }

    fn push(&mut self, sender: Sender, text: String) -> &Message {
        self.next_id += 1;
        self.messages.push(Message {
            id: self.next_id,
            sender,
            text,
            sent_at: Utc::now(),
        });
        &self.messages[self.messages.len() - 1]
    }
}

pub enum ChatAction {
    Send(String),
    Reply(String),
}

impl Reducible for ChatSession {
    type Action = ChatAction;

    fn reduce(self: Rc<Self>, action: Self::Action) -> Rc<Self> {
        let mut session = (*self).clone();
        match action {
            ChatAction::Send(text) => {
                if let Err(err) = session.send(&text) {
                    warn!("Dropping message: {}", err);
                    return self;
                }
            }
            ChatAction::Reply(text) => {
                session.receive_reply(&text);
            }
        }
        Rc::new(session)
    }
}
