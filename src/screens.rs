use std::ops::Deref;

use chrono::{DateTime, Local, Utc};
use gloo_timers::callback::Timeout;
use log::debug;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::HtmlInputElement;
use yew::prelude::*;

use crate::chat::{self, ChatAction, ChatSession, NEAR_LIMIT_CHARS};
use crate::config::BackendConfig;
use crate::data::{load_cats, load_matches};
use crate::deck::{Deck, DeckAction, DeckPhase};
use crate::model::{Cat, Match, Sender, MAX_MESSAGE_CHARS};
use crate::swipe::{decision_for_key, Decision, DragTracker, SwipeVisuals};

#[derive(Properties, PartialEq)]
pub struct DeckProps {
    pub backend: Option<BackendConfig>,
}

#[function_component(CardDeck)]
pub fn card_deck(props: &DeckProps) -> Html {
    let deck = use_reducer(Deck::loading);
    let deck_ref = use_node_ref();

    {
        let deck = deck.clone();
        use_effect_with_deps(
            move |backend: &Option<BackendConfig>| {
                let backend = backend.clone();
                spawn_local(async move {
                    let cats = load_cats(backend.as_ref()).await;
                    deck.dispatch(DeckAction::Loaded(cats));
                });
                || ()
            },
            props.backend.clone(),
        );
    }

    {
        let deck_ref = deck_ref.clone();
        use_effect_with_deps(
            move |phase: &DeckPhase| {
                if *phase == DeckPhase::Browsing {
                    if let Some(element) = deck_ref.cast::<web_sys::HtmlElement>() {
                        let _ = element.focus();
                    }
                }
                || ()
            },
            deck.phase(),
        );
    }

    let on_decision = {
        let deck = deck.clone();
        Callback::from(move |(decision, cat_id): (Decision, String)| {
            deck.dispatch(DeckAction::Decide { decision, cat_id });
        })
    };

    let on_reset = {
        let deck = deck.clone();
        Callback::from(move |_: MouseEvent| deck.dispatch(DeckAction::Reset))
    };

    match deck.phase() {
        DeckPhase::Loading => html! { <SkeletonCard /> },
        DeckPhase::Exhausted => html! {
            <div class="deck-empty">
                <h2>{ "No more cats!" }</h2>
                <p>{ "You've viewed all the furry friends nearby." }</p>
                <button class="start-over" onclick={on_reset}>{ "Start Over" }</button>
            </div>
        },
        DeckPhase::Browsing => {
            let Some(active) = deck.active().cloned() else {
                return html! {};
            };
            let next = deck.next().cloned();

            let on_key = {
                let on_decision = on_decision.clone();
                let active_id = active.id.clone();
                Callback::from(move |event: KeyboardEvent| {
                    if let Some(decision) = decision_for_key(&event.key(), event.repeat()) {
                        event.prevent_default();
                        on_decision.emit((decision, active_id.clone()));
                    }
                })
            };
            let button = |decision: Decision| {
                let on_decision = on_decision.clone();
                let active_id = active.id.clone();
                Callback::from(move |_: MouseEvent| on_decision.emit((decision, active_id.clone())))
            };
            let on_pass = button(Decision::Reject);
            let on_like = button(Decision::Accept);
            let active_key = active.id.clone();

            html! {
                <div class="deck" tabindex="0" ref={deck_ref} onkeydown={on_key}>
                    <div class="card-stack">
                        {
                            if let Some(next) = next {
                                let next_key = next.id.clone();
                                html! {
                                    <div class="card-backdrop">
                                        <SwipeCard key={next_key} cat={next}
                                            interactive={false} on_decision={Callback::noop()} />
                                    </div>
                                }
                            } else {
                                html! {}
                            }
                        }
                        <SwipeCard key={active_key} cat={active}
                            interactive={true} on_decision={on_decision.clone()} />
                    </div>
                    <div class="deck-controls">
                        <button class="pass" aria-label="Pass" onclick={on_pass}>{ "✕" }</button>
                        <button class="like" aria-label="Like" onclick={on_like}>{ "♥" }</button>
                    </div>
                    <p class="deck-progress">{ remaining_label(deck.remaining()) }</p>
                </div>
            }
        }
    }
}

#[derive(Properties, PartialEq)]
pub struct SwipeCardProps {
    pub cat: Cat,
    pub interactive: bool,
    pub on_decision: Callback<(Decision, String)>,
}

/// A draggable cat card. Key it by cat id so a new cat gets a fresh drag.
#[function_component(SwipeCard)]
pub fn swipe_card(props: &SwipeCardProps) -> Html {
    let drag = use_state(DragTracker::default);
    let cat = &props.cat;

    let visuals = if props.interactive {
        drag.visuals()
    } else {
        SwipeVisuals::resting()
    };
    let style = card_style(drag.displacement(), &visuals, drag.is_dragging());

    let pointer_down = {
        let drag = drag.clone();
        let interactive = props.interactive;
        Callback::from(move |event: PointerEvent| {
            if !interactive {
                return;
            }
            event.prevent_default();
            let mut tracker = drag.deref().clone();
            if !tracker.begin(event.pointer_id(), event.client_x() as f64) {
                return;
            }
            if let Some(target) = event
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            {
                let _ = target.set_pointer_capture(event.pointer_id());
            }
            drag.set(tracker);
        })
    };

    let pointer_move = {
        let drag = drag.clone();
        Callback::from(move |event: PointerEvent| {
            let mut tracker = drag.deref().clone();
            if tracker.move_to(event.pointer_id(), event.client_x() as f64) {
                event.prevent_default();
                drag.set(tracker);
            }
        })
    };

    let pointer_up = {
        let drag = drag.clone();
        let on_decision = props.on_decision.clone();
        let cat_id = cat.id.clone();
        Callback::from(move |event: PointerEvent| {
            let mut tracker = drag.deref().clone();
            let Some(outcome) = tracker.release(event.pointer_id(), event.client_x() as f64) else {
                return;
            };
            release_capture(&event);
            drag.set(tracker);
            match outcome {
                Some(decision) => on_decision.emit((decision, cat_id.clone())),
                None => debug!("Drag released under threshold, springing back"),
            }
        })
    };

    let pointer_cancel = {
        let drag = drag.clone();
        Callback::from(move |event: PointerEvent| {
            let mut tracker = drag.deref().clone();
            if tracker.cancel(event.pointer_id()) {
                release_capture(&event);
                drag.set(tracker);
            }
        })
    };

    html! {
        <div class={classes!("swipe-card", props.interactive.then_some("interactive"))}
            style={style}
            onpointerdown={pointer_down}
            onpointermove={pointer_move}
            onpointerup={pointer_up}
            onpointercancel={pointer_cancel}>
            <div class="card-photo" style={format!("background-image: url({})", cat.photo_url)}></div>
            <div class="card-body">
                <h2>{ format!("{}, {}", cat.name, cat.age) }</h2>
                <p class="card-bio">{ &cat.bio }</p>
                <div class="card-tags">
                    { for cat.tags.iter().map(|tag| html! { <span class="tag">{ tag.clone() }</span> }) }
                </div>
                <p class="card-distance">{ format!("{:.1} km away", cat.distance) }</p>
            </div>
            <div class="stamp like" style={format!("opacity: {:.3};", visuals.accept_strength)}>{ "Like" }</div>
            <div class="stamp nope" style={format!("opacity: {:.3};", visuals.reject_strength)}>{ "Nope" }</div>
        </div>
    }
}

fn remaining_label(remaining: usize) -> String {
    match remaining {
        1 => "Last cat nearby".to_owned(),
        n => format!("{n} cats left nearby"),
    }
}

fn release_capture(event: &PointerEvent) {
    if let Some(target) = event
        .target()
        .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
    {
        let _ = target.release_pointer_capture(event.pointer_id());
    }
}

fn card_style(displacement: f64, visuals: &SwipeVisuals, dragging: bool) -> String {
    format!(
        "transform: translateX({:.1}px) rotate({:.2}deg); opacity: {:.3}; transition: {};",
        displacement,
        visuals.rotation_deg,
        visuals.opacity,
        if dragging {
            "transform 0s, opacity 0s"
        } else {
            "transform 0.35s cubic-bezier(0.34, 1.56, 0.64, 1), opacity 0.35s ease"
        }
    )
}

#[function_component(SkeletonCard)]
pub fn skeleton_card() -> Html {
    html! {
        <div class="swipe-card skeleton" aria-busy="true">
            <div class="card-photo placeholder"></div>
            <div class="card-body">
                <div class="line title"></div>
                <div class="line"></div>
                <div class="line short"></div>
            </div>
            <p class="loading-hint">{ "Summoning cats..." }</p>
        </div>
    }
}

#[derive(Properties, PartialEq)]
pub struct MatchesProps {
    pub backend: Option<BackendConfig>,
    pub on_select: Callback<Cat>,
}

#[function_component(MatchesList)]
pub fn matches_list(props: &MatchesProps) -> Html {
    let matches = use_state(|| None::<Vec<Match>>);

    {
        let matches = matches.clone();
        use_effect_with_deps(
            move |backend: &Option<BackendConfig>| {
                let backend = backend.clone();
                spawn_local(async move {
                    matches.set(Some(load_matches(backend.as_ref()).await));
                });
                || ()
            },
            props.backend.clone(),
        );
    }

    let Some(list) = matches.deref().as_ref() else {
        return html! { <p class="matches-loading">{ "Loading matches…" }</p> };
    };

    let now = Utc::now();
    let select = |cat: &Cat| {
        let on_select = props.on_select.clone();
        let cat = cat.clone();
        Callback::from(move |_: MouseEvent| on_select.emit(cat.clone()))
    };

    html! {
        <div class="matches">
            <h2>{ "New Matches" }</h2>
            <div class="match-avatars">
                { for list.iter().map(|m| html! {
                    <button key={m.id.clone()} class="match-avatar" onclick={select(&m.cat)}>
                        <div class="avatar" style={format!("background-image: url({})", m.cat.photo_url)}></div>
                        <span>{ &m.cat.name }</span>
                    </button>
                }) }
            </div>
            <h2>{ "Messages" }</h2>
            <div class="match-threads">
                { for list.iter().map(|m| html! {
                    <button key={m.id.clone()} class="match-thread" onclick={select(&m.cat)}>
                        <div class="avatar" style={format!("background-image: url({})", m.cat.photo_url)}></div>
                        <div class="thread-summary">
                            <span class="thread-name">{ &m.cat.name }</span>
                            <span class="thread-time">{ matched_label(m.matched_at, now) }</span>
                            <p class="thread-preview">
                                { m.last_message.clone().unwrap_or_else(|| format!("Say hi to {}!", m.cat.name)) }
                            </p>
                        </div>
                    </button>
                }) }
            </div>
        </div>
    }
}

/// Short "how long ago" label for a match.
fn matched_label(matched_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(matched_at);
    if elapsed.num_minutes() < 1 {
        "Now".to_owned()
    } else if elapsed.num_hours() < 1 {
        format!("{}m", elapsed.num_minutes())
    } else if elapsed.num_days() < 1 {
        format!("{}h", elapsed.num_hours())
    } else {
        matched_at.format("%b %-d").to_string()
    }
}

#[derive(Properties, PartialEq)]
pub struct ChatProps {
    pub cat: Cat,
    pub on_back: Callback<()>,
}

#[function_component(ChatScreen)]
pub fn chat_screen(props: &ChatProps) -> Html {
    let session = use_reducer(ChatSession::default);
    let input = use_state(String::new);
    let bottom_ref = use_node_ref();

    {
        let bottom_ref = bottom_ref.clone();
        use_effect_with_deps(
            move |_| {
                if let Some(element) = bottom_ref.cast::<web_sys::Element>() {
                    element.scroll_into_view();
                }
                || ()
            },
            (session.messages().len(), session.is_typing()),
        );
    }

    let on_input = {
        let input = input.clone();
        Callback::from(move |event: InputEvent| {
            let value = event.target_unchecked_into::<HtmlInputElement>().value();
            input.set(value);
        })
    };

    let on_submit = {
        let input = input.clone();
        let dispatcher = session.dispatcher();
        Callback::from(move |event: SubmitEvent| {
            event.prevent_default();
            let Ok(text) = chat::validate_message(&input) else {
                return;
            };
            dispatcher.dispatch(ChatAction::Send(text));
            input.set(String::new());

            let delay = chat::reply_delay_ms(&mut rand::thread_rng());
            let dispatcher = dispatcher.clone();
            Timeout::new(delay, move || {
                let reply = chat::pick_reply(&mut rand::thread_rng());
                dispatcher.dispatch(ChatAction::Reply(reply.to_owned()));
            })
            .forget();
        })
    };

    let on_back = {
        let on_back = props.on_back.clone();
        Callback::from(move |_: MouseEvent| on_back.emit(()))
    };

    let cat = &props.cat;
    let length = input.chars().count();
    let can_send = chat::validate_message(&input).is_ok();

    html! {
        <div class="chat">
            <div class="chat-header">
                <button class="chat-back" aria-label="Back" onclick={on_back}>{ "‹" }</button>
                <div class="avatar" style={format!("background-image: url({})", cat.photo_url)}></div>
                <div>
                    <h3>{ &cat.name }</h3>
                    <p class="presence">{ "Online now" }</p>
                </div>
            </div>
            <div class="chat-messages">
                {
                    if session.messages().is_empty() {
                        html! {
                            <div class="chat-empty">
                                <p class="chat-empty-title">{ "Start chatting!" }</p>
                                <p>{ format!("Say hello to {} to break the ice.", cat.name) }</p>
                            </div>
                        }
                    } else {
                        html! {}
                    }
                }
                { for session.messages().iter().map(|message| {
                    let side = match message.sender {
                        Sender::Viewer => "from-viewer",
                        Sender::Cat => "from-cat",
                    };
                    html! {
                        <div key={message.id} class={classes!("bubble", side)}>
                            { &message.text }
                            <span class="bubble-time">
                                { message.sent_at.with_timezone(&Local).format("%H:%M").to_string() }
                            </span>
                        </div>
                    }
                }) }
                {
                    if session.is_typing() {
                        html! { <div class="bubble from-cat typing"><span></span><span></span><span></span></div> }
                    } else {
                        html! {}
                    }
                }
                <div ref={bottom_ref}></div>
            </div>
            <form class="chat-input" onsubmit={on_submit}>
                <input type="text"
                    value={(*input).clone()}
                    maxlength={MAX_MESSAGE_CHARS.to_string()}
                    placeholder="Type a message..."
                    oninput={on_input} />
                <span class={classes!("counter", (length > NEAR_LIMIT_CHARS).then_some("near-limit"))}>
                    { format!("{}/{}", length, MAX_MESSAGE_CHARS) }
                </span>
                <button type="submit" aria-label="Send" disabled={!can_send}>{ "➤" }</button>
            </form>
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn matched_label_scales_with_age() {
        let now = Utc.with_ymd_and_hms(2024, 6, 10, 12, 0, 0).unwrap();
        assert_eq!(matched_label(now - Duration::seconds(20), now), "Now");
        assert_eq!(matched_label(now - Duration::minutes(5), now), "5m");
        assert_eq!(matched_label(now - Duration::hours(3), now), "3h");
        assert_eq!(matched_label(now - Duration::days(9), now), "Jun 1");
    }

    #[test]
    fn remaining_label_counts_down() {
        assert_eq!(remaining_label(5), "5 cats left nearby");
        assert_eq!(remaining_label(1), "Last cat nearby");
    }

    #[test]
    fn resting_card_has_no_transform() {
        let style = card_style(0.0, &SwipeVisuals::resting(), false);
        assert!(style.starts_with("transform: translateX(0.0px) rotate(0.00deg); opacity: 1.000;"));
        assert!(style.contains("transform 0.35s"));
    }

    #[test]
    fn dragged_card_follows_pointer_without_easing() {
        let style = card_style(60.0, &SwipeVisuals::from_displacement(60.0), true);
        assert!(style.contains("translateX(60.0px) rotate(7.50deg)"));
        assert!(style.contains("transition: transform 0s"));
    }
}
