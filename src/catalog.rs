//! Snapshot of the server's mailboxes for the duration of a run

use crate::error::Result;
use crate::mailbox::Mailbox;
use crate::session::MailSession;

/// Every known mailbox, in the order the server listed them followed
/// by the ones created during the run.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    mailboxes: Vec<Mailbox>,
}

impl Catalog {
    /// Build the catalog from the server's `LIST` response.
    pub async fn load(session: &mut dyn MailSession) -> Result<Self> {
        let mut catalog = Self::default();
        for mailbox in session.list_mailboxes().await? {
            catalog.record(mailbox);
        }
        Ok(catalog)
    }

    #[must_use]
    pub fn list_all(&self) -> &[Mailbox] {
        &self.mailboxes
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.mailboxes.iter().any(|m| m.name() == name)
    }

    /// Append `mailbox` unless a mailbox with that name is known.
    pub fn record(&mut self, mailbox: Mailbox) {
        if !self.contains(mailbox.name()) {
            self.mailboxes.push(mailbox);
        }
    }
}

impl FromIterator<Mailbox> for Catalog {
    fn from_iter<I: IntoIterator<Item = Mailbox>>(iter: I) -> Self {
        let mut catalog = Self::default();
        for mailbox in iter {
            catalog.record(mailbox);
        }
        catalog
    }
}
