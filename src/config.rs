//! Connection and archive configuration

use crate::error::{Error, Result};
use std::env;
use std::fmt;
use std::str::FromStr;

/// How the TCP connection is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// TLS from the first byte (IMAPS, usually port 993).
    #[default]
    Tls,
    /// Plain TCP upgraded with `STARTTLS` (usually port 143).
    StartTls,
}

impl Security {
    /// The port conventionally used with this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Tls => 993,
            Self::StartTls => 143,
        }
    }
}

impl FromStr for Security {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "tls" | "ssl" | "imaps" => Ok(Self::Tls),
            "starttls" => Ok(Self::StartTls),
            other => Err(Error::Config(format!("Invalid IMAP_SECURITY: {other}"))),
        }
    }
}

impl fmt::Display for Security {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Tls => "tls",
            Self::StartTls => "starttls",
        })
    }
}

/// IMAP connection configuration
#[derive(Debug, Clone)]
pub struct ImapConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub security: Security,
    /// Skip certificate verification (self-signed bridges, test servers).
    pub accept_invalid_certs: bool,
}

impl ImapConfig {
    /// Load IMAP configuration from environment variables
    ///
    /// Reads from `.env` file if present. Required variables:
    /// - `IMAP_HOST`
    /// - `IMAP_USERNAME`
    /// - `IMAP_PASSWORD`
    ///
    /// Optional:
    /// - `IMAP_SECURITY` (`tls` or `starttls`, default: `tls`)
    /// - `IMAP_PORT` (default: 993 for TLS, 143 for STARTTLS)
    /// - `IMAP_ACCEPT_INVALID_CERTS` (default: `false`)
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from `lookup`, which maps a variable
    /// name to its value.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required =
            |key: &str| lookup(key).ok_or_else(|| Error::Config(format!("{key} not set")));

        let security = lookup("IMAP_SECURITY")
            .map(|s| s.parse::<Security>())
            .transpose()?
            .unwrap_or_default();

        let port = match lookup("IMAP_PORT") {
            Some(p) => p
                .parse()
                .map_err(|e| Error::Config(format!("Invalid IMAP_PORT: {e}")))?,
            None => security.default_port(),
        };

        Ok(Self {
            host: required("IMAP_HOST")?,
            port,
            username: required("IMAP_USERNAME")?,
            password: required("IMAP_PASSWORD")?,
            security,
            accept_invalid_certs: lookup("IMAP_ACCEPT_INVALID_CERTS")
                .is_some_and(|v| matches!(v.to_ascii_lowercase().as_str(), "1" | "true" | "yes")),
        })
    }

    /// Check that every setting needed to open a session is present.
    pub fn validate(&self) -> Result<()> {
        if self.host.is_empty() || self.port == 0 || self.username.is_empty() {
            return Err(Error::Config("no host, port or user supplied".into()));
        }
        if self.password.is_empty() {
            return Err(Error::Config("no password supplied".into()));
        }
        Ok(())
    }
}

/// What to archive, where to, and how.
#[derive(Debug, Clone, Default)]
pub struct ArchiveConfig {
    /// Root folder of the year/month hierarchy, e.g. `Archive`.
    pub archive_root: String,
    /// Mailboxes processed when their name matches exactly.
    pub mailboxes: Vec<String>,
    /// Mailboxes processed when their name starts with one of these.
    pub recursive_mailboxes: Vec<String>,
    /// Name prefixes that are never processed. Wins over the lists above.
    pub ignore_mailboxes: Vec<String>,
    /// Leave messages from the current month where they are.
    pub skip_current_month: bool,
    /// Report planned work without changing anything on the server.
    pub dry_run: bool,
}

impl ArchiveConfig {
    /// Reject configurations that cannot produce a meaningful run.
    pub fn validate(&self) -> Result<()> {
        if self.archive_root.is_empty() {
            return Err(Error::Config("no archive folder supplied".into()));
        }
        if self.mailboxes.is_empty() && self.recursive_mailboxes.is_empty() {
            return Err(Error::Config(
                "please supply at least one mailbox to process".into(),
            ));
        }
        Ok(())
    }
}
