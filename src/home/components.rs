use leptos::{
    component, create_signal, ev::SubmitEvent, event_target_value, view, IntoView, Show,
    SignalGet, SignalGetUntracked, SignalSet, SignalWith,
};
use leptos_router::{use_navigate, NavigateOptions, A};

use crate::session::use_session;

#[component]
pub fn Home() -> impl IntoView {
    let session = use_session().session();
    let navigate = use_navigate();
    let (monitor_id, set_monitor_id) = create_signal(String::new());

    let handle_submit = move |evt: SubmitEvent| {
        evt.prevent_default();

        if let Some(path) = monitor_path(&monitor_id.get_untracked()) {
            navigate(&path, NavigateOptions::default());
        }
    };

    view! {
        <article>
            <Show
                when=move || session.with(Option::is_some)
                fallback=|| {
                    view! {
                        <p>
                            <A href="/login">"Sign in"</A>
                            " to view monitors."
                        </p>
                    }
                }
            >
                <p>
                    "Signed in as "
                    <strong>
                        {move || {
                            session
                                .get()
                                .map(|session| session.user.email)
                                .unwrap_or_default()
                        }}
                    </strong>
                </p>
                <form role="search" on:submit=handle_submit.clone()>
                    <input
                        type="search"
                        placeholder="Monitor ID"
                        prop:value=monitor_id
                        on:input=move |evt| set_monitor_id.set(event_target_value(&evt))
                    />
                    <button type="submit">"View graph"</button>
                </form>
            </Show>
        </article>
    }
}

fn monitor_path(monitor_id: &str) -> Option<String> {
    let monitor_id = monitor_id.trim();
    (!monitor_id.is_empty()).then(|| format!("/monitors/{monitor_id}"))
}
