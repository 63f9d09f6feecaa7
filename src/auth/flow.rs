//! Login flow, including the confirmation step the server asks for when the
//! account is already signed in on another device.
//!
//! ```text
//! Idle -> Submitted -> ConflictDetected -> ConfirmationPending -> ConfirmedLogin
//!                  \-> ConfirmedLogin                         \-> Cancelled
//! ```
//!
//! [`LoginState::handle`] is pure: side effects come back as [`LoginEffect`]s
//! for the view to run. The session is only ever persisted through
//! [`LoginEffect::PersistSession`], which is only emitted for an
//! authenticated reply. The sign-in is only announced once the store reports
//! the session saved.

use tracing::debug;

use crate::{session::Session, toast::ToastLevel};

use super::types::{Credentials, LoginReply, LoginRequest};

#[derive(Debug, Clone, Default, PartialEq)]
pub enum LoginState {
    #[default]
    Idle,
    Submitted {
        credentials: Credentials,
        confirm_override: bool,
    },
    ConflictDetected {
        credentials: Credentials,
        message: Option<String>,
    },
    ConfirmationPending {
        credentials: Credentials,
        message: Option<String>,
    },
    ConfirmedLogin(Session),
    Cancelled,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginEvent {
    Submit(Credentials),
    Reply(LoginReply),
    RequestFailed(String),
    PromptOpened,
    Confirm,
    Cancel,
    SessionSaved,
    SessionSaveFailed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoginEffect {
    SendLogin(LoginRequest),
    OpenPrompt,
    PersistSession(Session),
    Notify(ToastLevel, String),
}

impl LoginState {
    pub fn is_in_flight(&self) -> bool {
        matches!(self, Self::Submitted { .. })
    }

    pub fn is_awaiting_confirmation(&self) -> bool {
        matches!(self, Self::ConfirmationPending { .. })
    }

    pub fn conflict_message(&self) -> Option<&str> {
        match self {
            Self::ConflictDetected { message, .. } | Self::ConfirmationPending { message, .. } => {
                message.as_deref()
            }
            _ => None,
        }
    }

    pub fn handle(self, event: LoginEvent) -> (Self, Vec<LoginEffect>) {
        match (self, event) {
            (Self::Idle | Self::Cancelled, LoginEvent::Submit(credentials)) => {
                let request = credentials.login_request(false);
                (
                    Self::Submitted {
                        credentials,
                        confirm_override: false,
                    },
                    vec![LoginEffect::SendLogin(request)],
                )
            }

            (Self::Submitted { .. }, LoginEvent::Reply(LoginReply::Authenticated(session))) => (
                Self::ConfirmedLogin(session.clone()),
                vec![LoginEffect::PersistSession(session)],
            ),

            (Self::ConfirmedLogin(session), LoginEvent::SessionSaved) => (
                Self::ConfirmedLogin(session),
                vec![LoginEffect::Notify(
                    ToastLevel::Success,
                    "Signed in".to_string(),
                )],
            ),

            (Self::ConfirmedLogin(_), LoginEvent::SessionSaveFailed(message)) => failed(message),

            (
                Self::Submitted {
                    credentials,
                    confirm_override: false,
                },
                LoginEvent::Reply(LoginReply::Conflict { message }),
            ) => (
                Self::ConflictDetected {
                    credentials,
                    message,
                },
                vec![LoginEffect::OpenPrompt],
            ),

            // Asking again after an override would loop forever.
            (
                Self::Submitted {
                    confirm_override: true,
                    ..
                },
                LoginEvent::Reply(LoginReply::Conflict { message }),
            ) => failed(message.unwrap_or_else(|| "Session conflict persists".to_string())),

            (Self::Submitted { .. }, LoginEvent::Reply(LoginReply::Rejected(message)))
            | (Self::Submitted { .. }, LoginEvent::RequestFailed(message)) => failed(message),

            (
                Self::ConflictDetected {
                    credentials,
                    message,
                },
                LoginEvent::PromptOpened,
            ) => (
                Self::ConfirmationPending {
                    credentials,
                    message,
                },
                Vec::new(),
            ),

            (Self::ConfirmationPending { credentials, .. }, LoginEvent::Confirm) => {
                let request = credentials.login_request(true);
                (
                    Self::Submitted {
                        credentials,
                        confirm_override: true,
                    },
                    vec![LoginEffect::SendLogin(request)],
                )
            }

            (
                Self::ConflictDetected { .. } | Self::ConfirmationPending { .. },
                LoginEvent::Cancel,
            ) => (Self::Cancelled, Vec::new()),

            (state, event) => {
                debug!(?state, ?event, "login event ignored");
                (state, Vec::new())
            }
        }
    }
}

fn failed(message: String) -> (LoginState, Vec<LoginEffect>) {
    (
        LoginState::Idle,
        vec![LoginEffect::Notify(ToastLevel::Error, message)],
    )
}
