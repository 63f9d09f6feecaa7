use serde::{Deserialize, Serialize};

use crate::session::{Session, User};

/// Status reported by the login endpoint when the account already has an
/// active session on another device.
pub const SESSION_CONFLICT_STATUS: u16 = 302;

const CONFIRMATION_YES: &str = "yes";

#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// `confirm_override` asks the server to drop the session held elsewhere.
    pub fn login_request(&self, confirm_override: bool) -> LoginRequest {
        LoginRequest {
            email: self.email.clone(),
            password: self.password.clone(),
            confirmation: confirm_override.then(|| CONFIRMATION_YES.to_string()),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmation: Option<String>,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("confirmation", &self.confirmation)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
}

/// What a login response means for the login flow.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginReply {
    Authenticated(Session),
    Conflict { message: Option<String> },
    Rejected(String),
}

impl LoginResponse {
    pub fn classify(self) -> LoginReply {
        if self.success {
            return match (self.user, self.access_token) {
                (Some(user), Some(access_token)) => LoginReply::Authenticated(Session {
                    user,
                    access_token,
                }),
                _ => LoginReply::Rejected("login response is missing the session".to_string()),
            };
        }

        if self.status == Some(SESSION_CONFLICT_STATUS) {
            return LoginReply::Conflict {
                message: self.message,
            };
        }

        LoginReply::Rejected(self.message.unwrap_or_else(|| "login failed".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn credentials() -> Credentials {
        Credentials {
            email: "ops@example.com".to_string(),
            password: "hunter22".to_string(),
        }
    }

    fn response(value: serde_json::Value) -> LoginResponse {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn plain_request_omits_confirmation() {
        let body = serde_json::to_value(credentials().login_request(false)).unwrap();

        assert_eq!(
            body,
            json!({ "email": "ops@example.com", "password": "hunter22" })
        );
    }

    #[test]
    fn confirmed_request_carries_yes() {
        let body = serde_json::to_value(credentials().login_request(true)).unwrap();

        assert_eq!(body["confirmation"], "yes");
    }

    #[test]
    fn successful_response_yields_session() {
        let reply = response(json!({
            "success": true,
            "user": { "_id": "u-1", "email": "ops@example.com" },
            "accessToken": "token-123",
        }))
        .classify();

        let LoginReply::Authenticated(session) = reply else {
            panic!("expected an authenticated reply, got {reply:?}");
        };
        assert_eq!(session.access_token, "token-123");
        assert_eq!(session.user.email, "ops@example.com");
    }

    #[test]
    fn success_without_token_is_rejected() {
        let reply = response(json!({
            "success": true,
            "user": { "email": "ops@example.com" },
        }))
        .classify();

        assert!(matches!(reply, LoginReply::Rejected(_)));
    }

    #[test]
    fn conflict_status_is_recognized() {
        let reply = response(json!({
            "success": false,
            "status": 302,
            "message": "Already logged in on another device",
        }))
        .classify();

        assert_eq!(
            reply,
            LoginReply::Conflict {
                message: Some("Already logged in on another device".to_string())
            }
        );
    }

    #[test]
    fn other_failures_are_rejections_with_server_message() {
        let reply = response(json!({
            "success": false,
            "status": 401,
            "message": "Invalid credentials",
        }))
        .classify();

        assert_eq!(reply, LoginReply::Rejected("Invalid credentials".to_string()));
    }

    #[test]
    fn debug_output_redacts_password() {
        let debug = format!("{:?} {:?}", credentials(), credentials().login_request(true));

        assert!(!debug.contains("hunter22"));
    }
}
