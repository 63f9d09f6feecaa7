#[cfg(test)]
use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{anyhow, Context, Result};
use leptos::{
    create_rw_signal, expect_context, provide_context, RwSignal, Signal, SignalSet,
    SignalWithUntracked,
};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

pub const SESSION_STORAGE_KEY: &str = "uptime-dashboard.session";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default, alias = "_id")]
    pub id: Option<String>,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user: User,
    pub access_token: String,
}

// Keeps the token out of logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("access_token", &"<redacted>")
            .finish()
    }
}

/// Where the signed-in session survives reloads. The stored blob is opaque to
/// the rest of the app; sealing it is up to the implementation.
pub trait SessionStore {
    fn load(&self) -> Result<Option<Session>>;
    fn save(&self, session: &Session) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

pub fn encode_session(session: &Session) -> Result<String> {
    serde_json::to_string(session).context("session serialization error")
}

pub fn decode_session(blob: &str) -> Result<Session> {
    serde_json::from_str(blob).context("session deserialization error")
}

/// Browser `localStorage` backed store.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserSessionStore;

impl BrowserSessionStore {
    fn storage() -> Result<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| anyhow!("window not found"))?;
        window
            .local_storage()
            .map_err(|err| anyhow!("local storage access error: {err:?}"))?
            .ok_or_else(|| anyhow!("local storage unavailable"))
    }
}

impl SessionStore for BrowserSessionStore {
    fn load(&self) -> Result<Option<Session>> {
        let blob = Self::storage()?
            .get_item(SESSION_STORAGE_KEY)
            .map_err(|err| anyhow!("local storage read error: {err:?}"))?;

        blob.as_deref().map(decode_session).transpose()
    }

    fn save(&self, session: &Session) -> Result<()> {
        Self::storage()?
            .set_item(SESSION_STORAGE_KEY, &encode_session(session)?)
            .map_err(|err| anyhow!("local storage write error: {err:?}"))
    }

    fn clear(&self) -> Result<()> {
        Self::storage()?
            .remove_item(SESSION_STORAGE_KEY)
            .map_err(|err| anyhow!("local storage remove error: {err:?}"))
    }
}

#[cfg(test)]
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    blob: RefCell<Option<String>>,
}

#[cfg(test)]
impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<Session>> {
        self.blob.borrow().as_deref().map(decode_session).transpose()
    }

    fn save(&self, session: &Session) -> Result<()> {
        *self.blob.borrow_mut() = Some(encode_session(session)?);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        self.blob.borrow_mut().take();
        Ok(())
    }
}

/// The one place the signed-in session lives. Provided at the app root and
/// injected wherever authenticated requests are made.
#[derive(Clone)]
pub struct SessionContext {
    session: RwSignal<Option<Session>>,
    store: Rc<dyn SessionStore>,
}

impl SessionContext {
    pub fn new(store: Rc<dyn SessionStore>) -> Self {
        let session = match store.load() {
            Ok(session) => session,
            Err(err) => {
                warn!("stored session discarded: {err}");
                if let Err(err) = store.clear() {
                    warn!("stored session couldn't be cleared: {err}");
                }
                None
            }
        };

        Self {
            session: create_rw_signal(session),
            store,
        }
    }

    pub fn session(&self) -> Signal<Option<Session>> {
        self.session.into()
    }

    pub fn bearer(&self) -> Option<String> {
        self.session
            .with_untracked(|session| session.as_ref().map(|session| session.access_token.clone()))
    }

    pub fn sign_in(&self, session: Session) -> Result<()> {
        self.store.save(&session)?;
        info!(email = session.user.email, "signed in");
        self.session.set(Some(session));
        Ok(())
    }

    pub fn sign_out(&self) -> Result<()> {
        self.session.set(None);
        self.store.clear()?;
        info!("signed out");
        Ok(())
    }
}

pub fn provide_session(store: Rc<dyn SessionStore>) -> SessionContext {
    let context = SessionContext::new(store);
    provide_context(context.clone());
    context
}

pub fn use_session() -> SessionContext {
    expect_context::<SessionContext>()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session {
            user: User {
                id: Some("u-1".to_string()),
                email: "ops@example.com".to_string(),
                name: None,
            },
            access_token: "token-123".to_string(),
        }
    }

    struct FullStore;

    impl SessionStore for FullStore {
        fn load(&self) -> Result<Option<Session>> {
            Ok(None)
        }

        fn save(&self, _session: &Session) -> Result<()> {
            Err(anyhow!("quota exceeded"))
        }

        fn clear(&self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_save_leaves_user_signed_out() {
        let runtime = leptos::create_runtime();
        let context = SessionContext::new(Rc::new(FullStore));

        assert!(context.sign_in(session()).is_err());
        assert_eq!(context.bearer(), None);

        runtime.dispose();
    }

    #[test]
    fn successful_sign_in_exposes_bearer() {
        let runtime = leptos::create_runtime();
        let context = SessionContext::new(Rc::new(MemorySessionStore::default()));

        context.sign_in(session()).unwrap();
        assert_eq!(context.bearer().as_deref(), Some("token-123"));

        runtime.dispose();
    }

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemorySessionStore::default();
        assert_eq!(store.load().unwrap(), None);

        store.save(&session()).unwrap();
        assert_eq!(store.load().unwrap(), Some(session()));

        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn corrupt_blob_is_an_error() {
        let store = MemorySessionStore {
            blob: RefCell::new(Some("not a session".to_string())),
        };

        assert!(store.load().is_err());
    }

    #[test]
    fn user_accepts_mongo_style_id() {
        let user: User =
            serde_json::from_str(r#"{"_id":"abc","email":"ops@example.com","role":"admin"}"#)
                .unwrap();

        assert_eq!(user.id.as_deref(), Some("abc"));
        assert_eq!(user.name, None);
    }

    #[test]
    fn debug_output_redacts_token() {
        let debug = format!("{:?}", session());

        assert!(!debug.contains("token-123"));
        assert!(debug.contains("ops@example.com"));
    }
}
