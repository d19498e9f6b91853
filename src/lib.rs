pub mod chat;
pub mod config;
pub mod data;
pub mod deck;
pub mod model;
pub mod screens;
pub mod swipe;
pub mod view;

use config::load_backend_config;
use model::Cat;
use screens::{CardDeck, ChatScreen, MatchesList};
use std::ops::Deref;
use view::{Screen, ViewState};
use wasm_bindgen::prelude::wasm_bindgen;
use yew::prelude::*;

#[function_component(App)]
fn app() -> Html {
    let backend = use_state(load_backend_config);
    let view = use_state(ViewState::default);

    let update_view = {
        let view = view.clone();
        move |change: fn(&mut ViewState)| {
            let view = view.clone();
            Callback::from(move |_: MouseEvent| {
                let mut next = view.deref().clone();
                change(&mut next);
                view.set(next);
            })
        }
    };

    let on_select_match = {
        let view = view.clone();
        Callback::from(move |cat: Cat| {
            let mut next = view.deref().clone();
            if next.select_match(cat) {
                view.set(next);
            }
        })
    };

    let on_back = {
        let view = view.clone();
        Callback::from(move |_: ()| {
            let mut next = view.deref().clone();
            next.back_to_matches();
            view.set(next);
        })
    };

    let content = match view.screen() {
        Screen::Deck => html! { <CardDeck backend={(*backend).clone()} /> },
        Screen::Matches => html! {
            <MatchesList backend={(*backend).clone()} on_select={on_select_match} />
        },
        Screen::Chat => match view.chat_target() {
            Some(cat) => html! {
                <ChatScreen key={cat.id.clone()} cat={cat.clone()} on_back={on_back} />
            },
            None => html! {},
        },
    };

    let nav = if view.shows_navigation() {
        render_nav(
            view.screen(),
            update_view(ViewState::show_deck),
            update_view(ViewState::show_matches),
        )
    } else {
        html! {}
    };

    html! {
        <div class="app-container">
            <header class="app-header">
                <h1>{ "Purr Pals" }</h1>
                <p>{ "Find your fur-ever friend" }</p>
            </header>
            <main class="content">
                { content }
            </main>
            { nav }
        </div>
    }
}

fn render_nav(
    screen: Screen,
    on_explore: Callback<MouseEvent>,
    on_matches: Callback<MouseEvent>,
) -> Html {
    let tab = |target: Screen| classes!("nav-tab", (screen == target).then_some("active"));

    html! {
        <nav class="tab-bar">
            <button class={tab(Screen::Deck)} onclick={on_explore}>{ "Explore" }</button>
            <button class={tab(Screen::Matches)} onclick={on_matches}>{ "Matches" }</button>
        </nav>
    }
}

#[wasm_bindgen(start)]
pub fn run_app() {
    wasm_logger::init(wasm_logger::Config::new(log::Level::Info));
    yew::Renderer::<App>::new().render();
}
