use std::time::Duration;

use leptos::{
    component, create_rw_signal, expect_context, provide_context, set_timeout, view, For,
    IntoView, RwSignal, SignalUpdate, SignalWith,
};
use tracing::{error, info};
use uuid::Uuid;

pub const MAX_TOASTS: usize = 5;
pub const TOAST_LIFETIME: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

impl ToastLevel {
    fn class(self) -> &'static str {
        match self {
            Self::Info => "toast toast-info",
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Toast {
    pub id: Uuid,
    pub level: ToastLevel,
    pub message: String,
}

impl Toast {
    pub fn new(level: ToastLevel, message: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
        }
    }
}

/// Visible notifications, oldest first. Holds at most [`MAX_TOASTS`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToastQueue {
    toasts: Vec<Toast>,
}

impl ToastQueue {
    pub fn push(&mut self, toast: Toast) {
        self.toasts.push(toast);
        if self.toasts.len() > MAX_TOASTS {
            let overflow = self.toasts.len() - MAX_TOASTS;
            self.toasts.drain(..overflow);
        }
    }

    pub fn dismiss(&mut self, id: Uuid) -> bool {
        let len = self.toasts.len();
        self.toasts.retain(|toast| toast.id != id);
        self.toasts.len() != len
    }

    pub fn toasts(&self) -> &[Toast] {
        &self.toasts
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Toasts(RwSignal<ToastQueue>);

impl Toasts {
    pub fn push(self, level: ToastLevel, message: impl Into<String>) {
        let toast = Toast::new(level, message);
        let id = toast.id;

        match level {
            ToastLevel::Error => error!(text = toast.message, "notification"),
            ToastLevel::Info | ToastLevel::Success => info!(text = toast.message, "notification"),
        }

        self.0.update(|queue| queue.push(toast));
        set_timeout(move || self.dismiss(id), TOAST_LIFETIME);
    }

    pub fn info(self, message: impl Into<String>) {
        self.push(ToastLevel::Info, message);
    }

    pub fn error(self, message: impl Into<String>) {
        self.push(ToastLevel::Error, message);
    }

    pub fn dismiss(self, id: Uuid) {
        // The signal is gone once the app unmounts, timers may still fire.
        self.0.try_update(|queue| queue.dismiss(id));
    }
}

pub fn provide_toasts() -> Toasts {
    let toasts = Toasts(create_rw_signal(ToastQueue::default()));
    provide_context(toasts);
    toasts
}

pub fn use_toasts() -> Toasts {
    expect_context::<Toasts>()
}

#[component]
pub fn Toaster() -> impl IntoView {
    let toasts = use_toasts();

    view! {
        <div class="toaster" role="status" aria-live="polite">
            <For
                each=move || toasts.0.with(|queue| queue.toasts().to_vec())
                key=|toast| toast.id
                let:toast
            >
                <ToastItem toast toasts></ToastItem>
            </For>
        </div>
    }
}

#[component]
fn ToastItem(toast: Toast, toasts: Toasts) -> impl IntoView {
    let id = toast.id;

    view! {
        <article class=toast.level.class() on:click=move |_| toasts.dismiss(id)>
            {toast.message}
        </article>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queue_drops_oldest_past_capacity() {
        let mut queue = ToastQueue::default();
        let toasts = (0..MAX_TOASTS + 2)
            .map(|index| Toast::new(ToastLevel::Info, format!("toast {index}")))
            .collect::<Vec<_>>();

        for toast in &toasts {
            queue.push(toast.clone());
        }

        assert_eq!(queue.toasts().len(), MAX_TOASTS);
        assert_eq!(queue.toasts().first(), toasts.get(2));
        assert_eq!(queue.toasts().last(), toasts.last());
    }

    #[test]
    fn dismiss_removes_only_matching_toast() {
        let mut queue = ToastQueue::default();
        let kept = Toast::new(ToastLevel::Success, "signed in");
        let dismissed = Toast::new(ToastLevel::Error, "request failed");
        queue.push(kept.clone());
        queue.push(dismissed.clone());

        assert!(queue.dismiss(dismissed.id));
        assert!(!queue.dismiss(dismissed.id));
        assert_eq!(queue.toasts(), &[kept]);
    }
}
