//! Make sure a target folder and all of its parents exist

use crate::catalog::Catalog;
use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::session::MailSession;
use async_trait::async_trait;
use tracing::info;

/// Creates a single mailbox on the server.
#[async_trait(?Send)]
pub trait FolderCreator {
    async fn create_folder(&self, session: &mut dyn MailSession, name: &str) -> Result<()>;
}

/// Issues `CREATE` on the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct RemoteCreator;

#[async_trait(?Send)]
impl FolderCreator for RemoteCreator {
    async fn create_folder(&self, session: &mut dyn MailSession, name: &str) -> Result<()> {
        session.create(name).await
    }
}

/// Create every missing segment of `target`, parents first.
///
/// A segment is created only when the catalog does not know it, and is
/// recorded in the catalog right after creation, so repeated calls for
/// overlapping paths never create a segment twice. The first failed
/// creation is returned and nothing below it is attempted.
pub async fn ensure_available(
    session: &mut dyn MailSession,
    catalog: &mut Catalog,
    creator: &dyn FolderCreator,
    target: &Mailbox,
) -> Result<()> {
    for path in target.ancestors() {
        if catalog.contains(&path) {
            continue;
        }
        info!("Creating mailbox '{}'", path);
        creator.create_folder(session, &path).await?;
        catalog.record(target.sibling(path));
    }
    Ok(())
}
