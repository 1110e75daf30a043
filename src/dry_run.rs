//! Dry-run decorator
//!
//! [`DryRun`] wraps a [`Mover`] or [`FolderCreator`] and replaces its
//! mutating call with a log line. Reads still go to the session, so a
//! dry run plans exactly the work a live run would do.

use crate::ensurer::FolderCreator;
use crate::error::Result;
use crate::mover::Mover;
use crate::session::MailSession;
use async_trait::async_trait;
use tracing::info;

/// Reports the wrapped operation instead of performing it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRun<T>(pub T);

#[async_trait(?Send)]
impl<T: Mover> Mover for DryRun<T> {
    async fn move_message(
        &self,
        _session: &mut dyn MailSession,
        uid: u32,
        target: &str,
    ) -> Result<()> {
        info!("[dry run] would move UID {} to '{}'", uid, target);
        Ok(())
    }
}

#[async_trait(?Send)]
impl<T: FolderCreator> FolderCreator for DryRun<T> {
    async fn create_folder(&self, _session: &mut dyn MailSession, name: &str) -> Result<()> {
        info!("[dry run] would create mailbox '{}'", name);
        Ok(())
    }
}
