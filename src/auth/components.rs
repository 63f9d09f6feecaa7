use std::rc::Rc;

use leptos::{
    component, create_rw_signal, create_signal, ev::SubmitEvent, event_target_value, view,
    IntoView, RwSignal, Show, Signal, SignalGet, SignalGetUntracked, SignalSet, SignalWith,
};
use leptos_router::{use_navigate, NavigateOptions};
use tracing::error;

use crate::{
    config::login_url,
    request::post_json,
    session::{use_session, SessionContext},
    task::{spawn_latest, use_task_slot, TaskSlot},
    toast::{use_toasts, Toasts},
};

use super::{
    flow::{LoginEffect, LoginEvent, LoginState},
    types::LoginResponse,
    validation::{validate_credentials, FieldErrors},
};

/// Runs [`LoginEffect`]s and feeds their outcome back into the flow.
#[derive(Clone)]
struct LoginDriver {
    state: RwSignal<LoginState>,
    toasts: Toasts,
    session: SessionContext,
    slot: Rc<TaskSlot>,
    on_signed_in: Rc<dyn Fn()>,
}

impl LoginDriver {
    fn dispatch(&self, event: LoginEvent) {
        let (state, effects) = self.state.get_untracked().handle(event);
        self.state.set(state);

        for effect in effects {
            self.run(effect);
        }
    }

    fn run(&self, effect: LoginEffect) {
        match effect {
            LoginEffect::SendLogin(request) => {
                let driver = self.clone();
                spawn_latest(
                    &self.slot,
                    async move { post_json::<LoginResponse>(&login_url(), &request, None).await },
                    move |response| {
                        let event = match response {
                            Ok(response) => LoginEvent::Reply(response.classify()),
                            Err(err) => {
                                error!("login request error: {err}");
                                LoginEvent::RequestFailed(format!("Login failed: {err}"))
                            }
                        };
                        driver.dispatch(event);
                    },
                );
            }
            LoginEffect::OpenPrompt => self.dispatch(LoginEvent::PromptOpened),
            LoginEffect::PersistSession(session) => match self.session.sign_in(session) {
                Ok(()) => {
                    self.dispatch(LoginEvent::SessionSaved);
                    (self.on_signed_in)();
                }
                Err(err) => {
                    error!("session persistence error: {err}");
                    self.dispatch(LoginEvent::SessionSaveFailed(
                        "Couldn't save the session".to_string(),
                    ));
                }
            },
            LoginEffect::Notify(level, message) => self.toasts.push(level, message),
        }
    }
}

#[component]
pub fn Login() -> impl IntoView {
    let navigate = use_navigate();
    let (email, set_email) = create_signal(String::new());
    let (password, set_password) = create_signal(String::new());
    let (errors, set_errors) = create_signal(FieldErrors::default());

    let driver = LoginDriver {
        state: create_rw_signal(LoginState::default()),
        toasts: use_toasts(),
        session: use_session(),
        slot: use_task_slot(),
        on_signed_in: Rc::new(move || navigate("/", NavigateOptions::default())),
    };
    let state = driver.state;

    let submit_driver = driver.clone();
    let handle_submit = move |evt: SubmitEvent| {
        evt.prevent_default();

        match validate_credentials(&email.get_untracked(), &password.get_untracked()) {
            Ok(credentials) => {
                set_errors.set(FieldErrors::default());
                submit_driver.dispatch(LoginEvent::Submit(credentials));
            }
            Err(field_errors) => set_errors.set(field_errors),
        }
    };

    let confirm_driver = driver.clone();
    let cancel_driver = driver;

    view! {
        <article class="login">
            <h2>"Sign in"</h2>
            <form on:submit=handle_submit novalidate=true>
                <label>
                    "Email"
                    <input
                        type="email"
                        autocomplete="username"
                        prop:value=email
                        aria-invalid=move || errors.with(|errors| errors.email.is_some().to_string())
                        on:input=move |evt| set_email.set(event_target_value(&evt))
                    />
                    <small>{move || errors.with(|errors| errors.email.clone())}</small>
                </label>
                <label>
                    "Password"
                    <input
                        type="password"
                        autocomplete="current-password"
                        prop:value=password
                        aria-invalid=move || {
                            errors.with(|errors| errors.password.is_some().to_string())
                        }
                        on:input=move |evt| set_password.set(event_target_value(&evt))
                    />
                    <small>{move || errors.with(|errors| errors.password.clone())}</small>
                </label>
                <button
                    type="submit"
                    disabled=move || state.with(LoginState::is_in_flight)
                    aria-busy=move || state.with(LoginState::is_in_flight).to_string()
                >
                    "Sign in"
                </button>
            </form>
            <Show when=move || state.with(LoginState::is_awaiting_confirmation)>
                <ConfirmOverride
                    message=Signal::derive(move || {
                        state
                            .with(|state| state.conflict_message().map(str::to_string))
                            .unwrap_or_else(|| {
                                "This account is already signed in on another device.".to_string()
                            })
                    })
                    on_confirm={
                        let driver = confirm_driver.clone();
                        Rc::new(move || driver.dispatch(LoginEvent::Confirm))
                    }
                    on_cancel={
                        let driver = cancel_driver.clone();
                        Rc::new(move || driver.dispatch(LoginEvent::Cancel))
                    }
                ></ConfirmOverride>
            </Show>
        </article>
    }
}

#[component]
fn ConfirmOverride(
    message: Signal<String>,
    on_confirm: Rc<dyn Fn()>,
    on_cancel: Rc<dyn Fn()>,
) -> impl IntoView {
    view! {
        <dialog open=true>
            <article>
                <h3>"Already signed in"</h3>
                <p>{move || message.get()}</p>
                <p>"Continuing will sign that session out."</p>
                <footer>
                    <button class="secondary" on:click=move |_| on_cancel()>
                        "Cancel"
                    </button>
                    <button on:click=move |_| on_confirm()>"Continue"</button>
                </footer>
            </article>
        </dialog>
    }
}
