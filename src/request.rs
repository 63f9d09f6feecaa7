use anyhow::{anyhow, Result};
use reqwest::{RequestBuilder, Response};
use serde::{de::DeserializeOwned, Serialize};
use tracing::debug;

pub async fn get_json<R: DeserializeOwned>(url: &str, bearer: Option<&str>) -> Result<R> {
    let client = reqwest::Client::new();
    let request = with_bearer(client.get(url), bearer);

    debug!(url, "GET");
    decode_response(request.send().await?).await
}

pub async fn post_json<R: DeserializeOwned>(
    url: &str,
    body: &impl Serialize,
    bearer: Option<&str>,
) -> Result<R> {
    let client = reqwest::Client::new();
    let request = with_bearer(client.post(url).json(body), bearer);

    debug!(url, "POST");
    decode_response(request.send().await?).await
}

fn with_bearer(request: RequestBuilder, bearer: Option<&str>) -> RequestBuilder {
    match bearer {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

// The API reports application failures with `success: false` in the body,
// often alongside a non-2xx status, so the body is decoded regardless of status.
async fn decode_response<R: DeserializeOwned>(response: Response) -> Result<R> {
    let status = response.status();
    let bytes = response.bytes().await?;

    debug!(%status, len = bytes.len(), "response received");

    decode_body(status, &bytes)
}

fn decode_body<R: DeserializeOwned>(status: reqwest::StatusCode, bytes: &[u8]) -> Result<R> {
    serde_json::from_slice(bytes).map_err(|err| {
        if status.is_success() {
            anyhow!("deserialization error: {err}")
        } else {
            anyhow!("request failed with status {status}")
        }
    })
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde::Deserialize;

    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Envelope {
        success: bool,
        message: Option<String>,
    }

    #[test]
    fn decodes_error_bodies_on_non_success_status() {
        let envelope: Envelope = decode_body(
            StatusCode::UNAUTHORIZED,
            br#"{"success":false,"message":"invalid credentials"}"#,
        )
        .unwrap();

        assert_eq!(
            envelope,
            Envelope {
                success: false,
                message: Some("invalid credentials".to_string()),
            }
        );
    }

    #[test]
    fn reports_status_when_body_is_not_json() {
        let err = decode_body::<Envelope>(StatusCode::BAD_GATEWAY, b"<html>bad gateway</html>")
            .unwrap_err();

        assert!(err.to_string().contains("502"));
    }

    #[test]
    fn reports_deserialization_error_on_success_status() {
        let err = decode_body::<Envelope>(StatusCode::OK, b"{}").unwrap_err();

        assert!(err.to_string().starts_with("deserialization error"));
    }
}
