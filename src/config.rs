use anyhow::{anyhow, bail, Result};
use reqwest::Url;

const DEFAULT_API_URL: &str = "http://localhost:8080/api";

/// Base URL of the dashboard API, fixed at build time through
/// `DASHBOARD_API_URL`.
pub fn api_url() -> &'static str {
    option_env!("DASHBOARD_API_URL").unwrap_or(DEFAULT_API_URL)
}

/// The monitor id is a single percent-encoded path segment, so ids holding
/// `/`, `?` or `#` can't reach other endpoints.
pub fn monitor_logs_url(monitor_id: &str) -> Result<String> {
    let monitor_id = monitor_id.trim();
    if monitor_id.is_empty() {
        bail!("monitor id is empty");
    }

    let mut url = Url::parse(&endpoint(api_url(), "monitor-logs"))?;
    url.path_segments_mut()
        .map_err(|()| anyhow!("API URL can't take path segments: {}", api_url()))?
        .push(monitor_id);

    Ok(url.into())
}

pub fn login_url() -> String {
    endpoint(api_url(), "auth/login")
}

fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_joins_without_double_slash() {
        assert_eq!(
            endpoint("https://api.example.com/", "auth/login"),
            "https://api.example.com/auth/login"
        );
        assert_eq!(
            endpoint("https://api.example.com", "auth/login"),
            "https://api.example.com/auth/login"
        );
    }

    #[test]
    fn monitor_logs_url_embeds_id() {
        let url = monitor_logs_url(" 65f1c0ffee ").unwrap();
        assert!(url.starts_with(api_url().trim_end_matches('/')));
        assert!(url.ends_with("/monitor-logs/65f1c0ffee"));
    }

    #[test]
    fn monitor_id_stays_one_path_segment() {
        let url = monitor_logs_url("a/b?x=1#top").unwrap();

        assert!(url.ends_with("/monitor-logs/a%2Fb%3Fx=1%23top"));
        assert_eq!(Url::parse(&url).unwrap().query(), None);
    }

    #[test]
    fn blank_monitor_id_is_rejected() {
        assert!(monitor_logs_url("  ").is_err());
    }
}
