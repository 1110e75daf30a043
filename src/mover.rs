//! Relocate a single message, with or without server-side `MOVE`

use crate::error::Result;
use crate::session::MailSession;
use async_trait::async_trait;
use tracing::{debug, info};

/// Moves one message out of the selected mailbox.
#[async_trait(?Send)]
pub trait Mover {
    async fn move_message(&self, session: &mut dyn MailSession, uid: u32, target: &str)
    -> Result<()>;
}

#[async_trait(?Send)]
impl<M: Mover + ?Sized> Mover for Box<M> {
    async fn move_message(
        &self,
        session: &mut dyn MailSession,
        uid: u32,
        target: &str,
    ) -> Result<()> {
        (**self).move_message(session, uid, target).await
    }
}

/// `UID MOVE` (RFC 6851). Atomic on the server.
#[derive(Debug, Clone, Copy, Default)]
pub struct AtomicMove;

#[async_trait(?Send)]
impl Mover for AtomicMove {
    async fn move_message(
        &self,
        session: &mut dyn MailSession,
        uid: u32,
        target: &str,
    ) -> Result<()> {
        session.uid_move(uid, target).await
    }
}

/// `UID COPY`, `UID STORE +FLAGS (\Deleted)`, `EXPUNGE`.
///
/// Used when the server lacks `MOVE`. Not atomic: if a later step
/// fails, the effects of the earlier ones stay (a copy in the target,
/// a deleted flag on the source).
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyDeleteExpunge;

#[async_trait(?Send)]
impl Mover for CopyDeleteExpunge {
    async fn move_message(
        &self,
        session: &mut dyn MailSession,
        uid: u32,
        target: &str,
    ) -> Result<()> {
        session.uid_copy(uid, target).await?;
        session.mark_deleted(uid).await?;
        session.expunge().await
    }
}

/// Pick the mover for a session.
///
/// Queries the server capability once; the returned mover is reused
/// for the whole run.
pub async fn detect(session: &mut dyn MailSession) -> Result<Box<dyn Mover>> {
    if session.supports_move().await? {
        debug!("Server supports MOVE");
        Ok(Box::new(AtomicMove))
    } else {
        info!("Server does not support MOVE, falling back to COPY/STORE/EXPUNGE");
        Ok(Box::new(CopyDeleteExpunge))
    }
}
