use leptos::{component, view, IntoView};

#[component]
pub fn Spinner() -> impl IntoView {
    view! { <span class="spinner" aria-busy="true">"Loading..."</span> }
}
