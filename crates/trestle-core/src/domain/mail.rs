//! Mail transport settings derived from environment variables.
//!
//! Generated applications read these at boot (`config/smtp.rb`); the same
//! mapping is exposed here so `trestle smtp` can check a deployment
//! environment before it goes live.

use serde::Serialize;

use crate::domain::error::DomainError;

/// Provider-specific credential variable names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MailProvider {
    Sendgrid,
    Generic,
}

impl MailProvider {
    /// `SMTP_PROVIDER=sendgrid` selects SendGrid; anything else is generic.
    pub fn from_env_value(value: Option<&str>) -> Self {
        match value {
            Some("sendgrid") => Self::Sendgrid,
            _ => Self::Generic,
        }
    }

    pub const fn credential_keys(&self) -> (&'static str, &'static str) {
        match self {
            Self::Sendgrid => ("SENDGRID_USERNAME", "SENDGRID_PASSWORD"),
            Self::Generic => ("SMTP_USERNAME", "SMTP_PASSWORD"),
        }
    }
}

pub const SMTP_PORT: &str = "587";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SmtpSettings {
    pub address: String,
    pub authentication: &'static str,
    pub domain: String,
    pub enable_starttls_auto: bool,
    pub password: String,
    pub port: &'static str,
    pub user_name: String,
}

impl SmtpSettings {
    /// Resolve settings through `lookup` (usually `std::env::var(..).ok()`).
    ///
    /// Fails on the first required variable that is absent. Credentials are
    /// checked before the address and domain.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, DomainError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let fetch = |name: &str| {
            lookup(name).ok_or_else(|| DomainError::MissingEnvironmentVariable {
                name: name.to_string(),
            })
        };

        let provider = MailProvider::from_env_value(lookup("SMTP_PROVIDER").as_deref());
        let (user_key, password_key) = provider.credential_keys();
        let user_name = fetch(user_key)?;
        let password = fetch(password_key)?;

        Ok(Self {
            address: fetch("SMTP_ADDRESS")?,
            authentication: "plain",
            domain: fetch("SMTP_DOMAIN")?,
            enable_starttls_auto: true,
            password,
            port: SMTP_PORT,
            user_name,
        })
    }

    /// Key/value pairs in declaration order, for table output.
    pub fn entries(&self) -> Vec<(&'static str, String)> {
        vec![
            ("address", self.address.clone()),
            ("authentication", self.authentication.to_string()),
            ("domain", self.domain.clone()),
            ("enable_starttls_auto", self.enable_starttls_auto.to_string()),
            ("password", self.password.clone()),
            ("port", self.port.to_string()),
            ("user_name", self.user_name.clone()),
        ]
    }
}
