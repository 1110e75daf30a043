//! IMAP mail archiver library
//!
//! Sorts messages from selected mailboxes into a `<root>/<year>/<month>`
//! folder hierarchy on the server, creating folders as needed. Moves
//! use `UID MOVE` when the server supports it and fall back to
//! copy, flag and expunge otherwise. A dry run reports the same work
//! without changing anything.
//!
//! ```no_run
//! use mail_archiver::{
//!     ArchiveConfig, Archiver, ImapConfig, ImapMailSession, RunContext, connect,
//! };
//!
//! # async fn example() -> mail_archiver::Result<()> {
//! let config = ArchiveConfig {
//!     archive_root: "Archive".to_string(),
//!     mailboxes: vec!["INBOX".to_string()],
//!     ..ArchiveConfig::default()
//! };
//! config.validate()?;
//!
//! let mut session = ImapMailSession::new(connect(&ImapConfig::from_env()?).await?);
//! let mut ctx = RunContext::load(&mut session, config.dry_run).await?;
//! let archiver = Archiver::new(&config, &mut session).await?;
//! let outcome = archiver.run(&mut session, &mut ctx).await;
//! session.logout().await;
//!
//! println!("{}", ctx.summary);
//! outcome
//! # }
//! ```

mod catalog;
mod classifier;
mod config;
mod connection;
mod dry_run;
mod engine;
mod ensurer;
mod error;
mod flag;
mod mailbox;
mod mover;
mod selector;
mod session;

pub use catalog::Catalog;
pub use classifier::{Classification, Classifier};
pub use config::{ArchiveConfig, ImapConfig, Security};
pub use connection::{ImapSession, connect};
pub use dry_run::DryRun;
pub use engine::{Archiver, RunContext, Summary};
pub use ensurer::{FolderCreator, RemoteCreator, ensure_available};
pub use error::{Error, Result};
pub use flag::Flag;
pub use mailbox::Mailbox;
pub use mover::{AtomicMove, CopyDeleteExpunge, Mover, detect as detect_mover};
pub use selector::{Selection, Selector};
pub use session::{ImapMailSession, MailSession, MessageRef};
