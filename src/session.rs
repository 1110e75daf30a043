//! Mail session abstraction
//!
//! [`MailSession`] is the set of server operations the archiver needs.
//! [`ImapMailSession`] implements it on top of an authenticated
//! `async-imap` session; tests substitute an in-memory implementation.

use crate::connection::ImapSession;
use crate::error::{Error, Result};
use crate::flag::Flag;
use crate::mailbox::Mailbox;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use futures::{Stream, StreamExt, TryStreamExt};
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Depth of the queue between a response stream and its consumer.
const QUEUE_DEPTH: usize = 10;

/// Query sent with `UID FETCH`: the UID and the `Date:` header only.
/// `PEEK` leaves the `\Seen` flag alone.
const DATE_QUERY: &str = "(UID BODY.PEEK[HEADER.FIELDS (DATE)])";

/// A message in the selected mailbox, reduced to what archiving needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageRef {
    pub uid: u32,
    /// `None` when the message has no `Date:` header or it does not parse.
    pub date: Option<DateTime<FixedOffset>>,
}

/// Operations the archiver performs against the mail server.
///
/// Every call acts on the single connection behind the session. UIDs
/// refer to the mailbox most recently passed to [`MailSession::select`].
#[async_trait(?Send)]
pub trait MailSession {
    /// Every mailbox on the server with its hierarchy delimiter.
    async fn list_mailboxes(&mut self) -> Result<Vec<Mailbox>>;

    /// Open `mailbox` read-write. Returns the number of messages in it.
    async fn select(&mut self, mailbox: &str) -> Result<u32>;

    /// UID and date of every message in the selected mailbox.
    async fn fetch_dates(&mut self) -> Result<Vec<MessageRef>>;

    /// Whether the server advertises `MOVE` (RFC 6851).
    async fn supports_move(&mut self) -> Result<bool>;

    async fn uid_move(&mut self, uid: u32, target: &str) -> Result<()>;

    async fn uid_copy(&mut self, uid: u32, target: &str) -> Result<()>;

    /// Set `\Deleted` on a message in the selected mailbox.
    async fn mark_deleted(&mut self, uid: u32) -> Result<()>;

    /// Remove every `\Deleted` message from the selected mailbox.
    async fn expunge(&mut self) -> Result<()>;

    async fn create(&mut self, mailbox: &str) -> Result<()>;
}

/// [`MailSession`] backed by a live IMAP connection.
pub struct ImapMailSession {
    session: ImapSession,
    selected: Option<String>,
}

impl ImapMailSession {
    #[must_use]
    pub const fn new(session: ImapSession) -> Self {
        Self {
            session,
            selected: None,
        }
    }

    /// End the session. Failures are logged, not returned: there is
    /// nothing left to do with the connection either way.
    pub async fn logout(mut self) {
        if let Err(e) = self.session.logout().await {
            warn!("LOGOUT failed: {}", e);
        }
    }

    fn selected(&self) -> &str {
        self.selected.as_deref().unwrap_or("<none>")
    }

    /// Drop queued unsolicited responses. `UID MOVE` answers with one
    /// `EXPUNGE` per message, and nothing here reads them.
    fn discard_unsolicited(&self) {
        let mut dropped = 0usize;
        while self.session.unsolicited_responses.try_recv().is_ok() {
            dropped += 1;
        }
        if dropped > 0 {
            debug!("Discarded {} unsolicited response(s)", dropped);
        }
    }
}

#[async_trait(?Send)]
impl MailSession for ImapMailSession {
    async fn list_mailboxes(&mut self) -> Result<Vec<Mailbox>> {
        let stream = self
            .session
            .list(Some(""), Some("*"))
            .await
            .map_err(|e| Error::Imap(format!("List mailboxes failed: {e}")))?;

        let names = drain_bounded(stream)
            .await
            .map_err(|e| Error::Imap(format!("List mailboxes failed: {e}")))?;

        Ok(names
            .iter()
            .map(|n| Mailbox::new(n.name(), n.delimiter().unwrap_or_default()))
            .collect())
    }

    async fn select(&mut self, mailbox: &str) -> Result<u32> {
        let selected = self
            .session
            .select(mailbox)
            .await
            .map_err(|e| Error::Imap(format!("Failed to select {mailbox}: {e}")))?;
        self.selected = Some(mailbox.to_string());
        Ok(selected.exists)
    }

    async fn fetch_dates(&mut self) -> Result<Vec<MessageRef>> {
        let mailbox = self.selected().to_string();
        let stream = self
            .session
            .uid_fetch("1:*", DATE_QUERY)
            .await
            .map_err(|e| Error::Imap(format!("Fetch in {mailbox} failed: {e}")))?;

        let fetches = drain_bounded(stream)
            .await
            .map_err(|e| Error::Imap(format!("Fetch in {mailbox} failed: {e}")))?;

        let mut messages = Vec::with_capacity(fetches.len());
        for fetch in &fetches {
            let Some(uid) = fetch.uid else {
                warn!("FETCH response without UID in {}", mailbox);
                continue;
            };
            let date = fetch.header().and_then(parse_date_header);
            messages.push(MessageRef { uid, date });
        }
        debug!("Fetched {} message dates from {}", messages.len(), mailbox);
        Ok(messages)
    }

    async fn supports_move(&mut self) -> Result<bool> {
        let caps = self
            .session
            .capabilities()
            .await
            .map_err(|e| Error::Imap(format!("CAPABILITY failed: {e}")))?;
        Ok(caps.has_str("MOVE"))
    }

    async fn uid_move(&mut self, uid: u32, target: &str) -> Result<()> {
        self.session
            .uid_mv(uid.to_string(), target)
            .await
            .map_err(|e| {
                Error::Imap(format!(
                    "Move of UID {uid} from {} to {target} failed: {e}",
                    self.selected()
                ))
            })?;
        self.discard_unsolicited();
        Ok(())
    }

    async fn uid_copy(&mut self, uid: u32, target: &str) -> Result<()> {
        self.session
            .uid_copy(uid.to_string(), target)
            .await
            .map_err(|e| {
                Error::Imap(format!(
                    "Copy of UID {uid} from {} to {target} failed: {e}",
                    self.selected()
                ))
            })
    }

    async fn mark_deleted(&mut self, uid: u32) -> Result<()> {
        let mailbox = self.selected().to_string();
        let query = Flag::add_silently(&[Flag::Deleted]);
        self.session
            .uid_store(uid.to_string(), &query)
            .await
            .map_err(|e| Error::Imap(format!("Store on UID {uid} in {mailbox} failed: {e}")))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| Error::Imap(format!("Store on UID {uid} in {mailbox} failed: {e}")))?;
        Ok(())
    }

    async fn expunge(&mut self) -> Result<()> {
        let mailbox = self.selected().to_string();
        let removed = self
            .session
            .expunge()
            .await
            .map_err(|e| Error::Imap(format!("Expunge of {mailbox} failed: {e}")))?
            .try_collect::<Vec<_>>()
            .await
            .map_err(|e| Error::Imap(format!("Expunge of {mailbox} failed: {e}")))?;
        debug!("Expunged {} message(s) from {}", removed.len(), mailbox);
        Ok(())
    }

    async fn create(&mut self, mailbox: &str) -> Result<()> {
        self.session
            .create(mailbox)
            .await
            .map_err(|e| Error::Imap(format!("Failed to create {mailbox}: {e}")))
    }
}

/// Collect a response stream through a bounded queue.
///
/// A producer moves items from the stream into the queue while a
/// consumer accumulates them in order. Both run on the current task.
/// The producer's status is checked only after the consumer finished;
/// the first stream error is returned.
async fn drain_bounded<T, E, S>(stream: S) -> std::result::Result<Vec<T>, E>
where
    S: Stream<Item = std::result::Result<T, E>>,
{
    let (tx, mut rx) = mpsc::channel(QUEUE_DEPTH);

    let producer = async move {
        let mut stream = std::pin::pin!(stream);
        while let Some(item) = stream.next().await {
            if tx.send(item?).await.is_err() {
                break;
            }
        }
        Ok::<(), E>(())
    };

    let consumer = async {
        let mut items = Vec::new();
        while let Some(item) = rx.recv().await {
            items.push(item);
        }
        items
    };

    let (status, items) = tokio::join!(producer, consumer);
    status.map(|()| items)
}

/// Extract the `Date:` field from a header block and parse it as
/// RFC 2822. Folded continuation lines are joined and a trailing
/// comment such as `(UTC)` is dropped.
fn parse_date_header(header: &[u8]) -> Option<DateTime<FixedOffset>> {
    let text = String::from_utf8_lossy(header);
    let mut value: Option<String> = None;

    for line in text.lines() {
        if let Some(v) = value.as_mut() {
            if line.starts_with([' ', '\t']) {
                v.push(' ');
                v.push_str(line.trim());
                continue;
            }
            break;
        }
        if let Some((name, rest)) = line.split_once(':') {
            if name.trim().eq_ignore_ascii_case("date") {
                value = Some(rest.trim().to_string());
            }
        }
    }

    let value = value?;
    let value = match value.find('(') {
        Some(idx) => value[..idx].trim(),
        None => value.trim(),
    };
    DateTime::parse_from_rfc2822(value).ok()
}
