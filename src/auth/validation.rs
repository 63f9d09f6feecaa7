use super::types::Credentials;

pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Inline, per-field messages for the login form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub email: Option<String>,
    pub password: Option<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

pub fn validate_credentials(email: &str, password: &str) -> Result<Credentials, FieldErrors> {
    let email = email.trim();
    let errors = FieldErrors {
        email: validate_email(email),
        password: validate_password(password),
    };

    if errors.is_empty() {
        Ok(Credentials {
            email: email.to_string(),
            password: password.to_string(),
        })
    } else {
        Err(errors)
    }
}

fn validate_email(email: &str) -> Option<String> {
    if email.is_empty() {
        return Some("Email is required".to_string());
    }

    let plausible = email.split_once('@').is_some_and(|(local, domain)| {
        !local.is_empty()
            && !domain.contains('@')
            && !email.contains(char::is_whitespace)
            && domain
                .split_once('.')
                .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty() && !tld.ends_with('.'))
    });

    (!plausible).then(|| "Enter a valid email address".to_string())
}

fn validate_password(password: &str) -> Option<String> {
    if password.is_empty() {
        return Some("Password is required".to_string());
    }

    (password.chars().count() < MIN_PASSWORD_LENGTH)
        .then(|| format!("Password must be at least {MIN_PASSWORD_LENGTH} characters"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_credentials_are_trimmed() {
        let credentials = validate_credentials("  ops@example.com ", "secret1").unwrap();

        assert_eq!(credentials.email, "ops@example.com");
        assert_eq!(credentials.password, "secret1");
    }

    #[test]
    fn empty_fields_are_required() {
        let errors = validate_credentials("", "").unwrap_err();

        assert_eq!(errors.email.as_deref(), Some("Email is required"));
        assert_eq!(errors.password.as_deref(), Some("Password is required"));
    }

    #[test]
    fn implausible_emails_are_rejected() {
        for email in [
            "ops",
            "@example.com",
            "ops@",
            "ops@example",
            "ops@.com",
            "ops@example.",
            "o ps@example.com",
            "ops@exa@mple.com",
        ] {
            let errors = validate_credentials(email, "secret1").unwrap_err();
            assert!(errors.email.is_some(), "{email} should be rejected");
            assert_eq!(errors.password, None);
        }
    }

    #[test]
    fn subdomains_are_accepted() {
        assert!(validate_credentials("ops@status.example.co.uk", "secret1").is_ok());
    }

    #[test]
    fn short_password_is_rejected() {
        let errors = validate_credentials("ops@example.com", "12345").unwrap_err();

        assert_eq!(errors.email, None);
        assert_eq!(
            errors.password.as_deref(),
            Some("Password must be at least 6 characters")
        );
    }
}
