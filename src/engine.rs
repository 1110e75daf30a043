//! Archive engine
//!
//! Walks the selected mailboxes one at a time and moves every message
//! whose date places it elsewhere into its year/month folder.
//!
//! State that lives for the whole run (the mailbox catalog and the
//! counters) is held in a [`RunContext`] owned by the caller and passed
//! in explicitly, so a failed run still leaves its counters readable.

use crate::catalog::Catalog;
use crate::classifier::{Classification, Classifier};
use crate::config::ArchiveConfig;
use crate::dry_run::DryRun;
use crate::ensurer::{FolderCreator, RemoteCreator, ensure_available};
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::mover::{self, Mover};
use crate::selector::Selector;
use crate::session::MailSession;
use chrono::Local;
use serde::Serialize;
use std::fmt;
use tracing::{debug, info};

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub mailboxes_processed: usize,
    pub messages_moved: usize,
    pub dry_run: bool,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Processed {} mailbox(es) and moved {} message(s)",
            self.mailboxes_processed, self.messages_moved
        )?;
        if self.dry_run {
            f.write_str(" (DRY RUN)")?;
        }
        Ok(())
    }
}

/// Mutable state of one run.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    pub catalog: Catalog,
    pub summary: Summary,
}

impl RunContext {
    /// Start a run from the server's current mailbox list.
    pub async fn load(session: &mut dyn MailSession, dry_run: bool) -> Result<Self> {
        Ok(Self {
            catalog: Catalog::load(session).await?,
            summary: Summary {
                dry_run,
                ..Summary::default()
            },
        })
    }
}

/// Moves messages into `<root>/<year>/<month>` folders.
pub struct Archiver<'a> {
    config: &'a ArchiveConfig,
    mover: Box<dyn Mover>,
    creator: Box<dyn FolderCreator>,
}

impl<'a> Archiver<'a> {
    /// Build an archiver for `session`.
    ///
    /// The move strategy is chosen here, from a single capability
    /// query. In dry-run mode the mover and folder creator are wrapped
    /// so nothing on the server changes.
    pub async fn new(config: &'a ArchiveConfig, session: &mut dyn MailSession) -> Result<Self> {
        let mover = mover::detect(session).await?;
        Ok(if config.dry_run {
            Self::with_parts(config, Box::new(DryRun(mover)), Box::new(DryRun(RemoteCreator)))
        } else {
            Self::with_parts(config, mover, Box::new(RemoteCreator))
        })
    }

    #[must_use]
    pub fn with_parts(
        config: &'a ArchiveConfig,
        mover: Box<dyn Mover>,
        creator: Box<dyn FolderCreator>,
    ) -> Self {
        Self {
            config,
            mover,
            creator,
        }
    }

    /// Process every selected mailbox in catalog order.
    ///
    /// Stops at the first failure. Mailboxes finished before it keep
    /// their changes and stay counted in `ctx.summary`.
    pub async fn run(&self, session: &mut dyn MailSession, ctx: &mut RunContext) -> Result<()> {
        let selected = Selector::new(self.config).select(&ctx.catalog);
        debug!("{} mailbox(es) selected", selected.len());

        for mailbox in &selected {
            self.process_mailbox(session, ctx, mailbox).await?;
        }
        Ok(())
    }

    /// Archive the messages of a single mailbox.
    pub async fn process_mailbox(
        &self,
        session: &mut dyn MailSession,
        ctx: &mut RunContext,
        mailbox: &Mailbox,
    ) -> Result<()> {
        info!("Processing mailbox {}", mailbox);

        let exists = session.select(mailbox.name()).await?;
        let messages = if exists == 0 {
            Vec::new()
        } else {
            session.fetch_dates().await?
        };

        let classifier = Classifier::new(
            &self.config.archive_root,
            self.config.skip_current_month,
            Local::now(),
        );

        for message in &messages {
            let Classification::Target(name) =
                classifier.classify(message.date.as_ref(), mailbox.delimiter())
            else {
                continue;
            };
            if name == mailbox.name() {
                continue;
            }

            let target = mailbox.sibling(name);
            info!("Moving message {} to mailbox '{}'", message.uid, target);

            ensure_available(session, &mut ctx.catalog, self.creator.as_ref(), &target).await?;
            self.mover
                .move_message(session, message.uid, target.name())
                .await?;
            ctx.summary.messages_moved += 1;
        }

        ctx.summary.mailboxes_processed += 1;
        Ok(())
    }
}
