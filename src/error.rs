//! Error types for mail-archiver

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A command sent to the mail server failed.
    #[error("IMAP error: {0}")]
    Imap(String),

    /// Required settings are missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, Error>;
