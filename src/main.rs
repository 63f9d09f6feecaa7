#![deny(clippy::all, clippy::pedantic)]
#![allow(non_snake_case, clippy::module_name_repetitions)]

use std::rc::Rc;

use leptos::{component, ev::MouseEvent, view, IntoView, Show, SignalWith};
use leptos_router::{use_navigate, NavigateOptions, Route, Router, Routes, A};
use tracing::{error, Level};
use wasm_tracing::WASMLayerConfigBuilder;

use crate::auth::Login;
use crate::home::Home;
use crate::monitor::ViewGraph;
use crate::session::{provide_session, use_session, BrowserSessionStore};
use crate::toast::{provide_toasts, use_toasts, Toaster};

mod auth;
mod components;
mod config;
mod datetime;
mod home;
mod monitor;
mod request;
mod session;
mod task;
mod toast;
mod use_canvas;

fn main() {
    console_error_panic_hook::set_once();
    wasm_tracing::set_as_global_default_with_config(
        WASMLayerConfigBuilder::new()
            .set_max_level(Level::INFO)
            .build(),
    );
    leptos::mount_to_body(|| view! { <App /> });
}

#[component]
fn App() -> impl IntoView {
    provide_toasts();
    provide_session(Rc::new(BrowserSessionStore));

    view! {
        <main class="container-fluid">
            <Router>
                <Nav />
                <div class="h-full w-full overflow-auto">
                    <Routes>
                        <Route path="/" view=Home />
                        <Route path="/login" view=Login />
                        <Route path="/monitors/:id" view=ViewGraph />
                        <Route path="/*any" view=|| view! { <h1>"Not Found"</h1> } />
                    </Routes>
                </div>
            </Router>
            <Toaster />
        </main>
    }
}

#[component]
fn Nav() -> impl IntoView {
    let session = use_session();
    let toasts = use_toasts();
    let navigate = use_navigate();
    let signed_in = session.session();

    let handle_logout = move |evt: MouseEvent| {
        evt.prevent_default();

        if let Err(err) = session.sign_out() {
            error!("sign out error: {err}");
            toasts.error("Couldn't clear the stored session");
        } else {
            toasts.info("Signed out");
        }
        navigate("/login", NavigateOptions::default());
    };

    view! {
        <nav>
            <ul>
                <li>
                    <strong>
                        <A href="/">"Uptime"</A>
                    </strong>
                </li>
            </ul>
            <ul>
                <li>
                    <Show
                        when=move || signed_in.with(Option::is_some)
                        fallback=|| view! { <A href="/login">"Sign in"</A> }
                    >
                        <a href="#" on:click=handle_logout.clone()>
                            "Sign out"
                        </a>
                    </Show>
                </li>
            </ul>
        </nav>
    }
}
