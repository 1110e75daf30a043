//! UID STORE command handler.
//!
//! Modifies `\Seen` and `\Deleted` on messages identified by UID.
//! Supports `+FLAGS`, `-FLAGS` and `FLAGS`, each optionally `.SILENT`.
//! Non-silent stores answer with `* N FETCH (FLAGS (...))` per
//! modified message before the tagged OK.

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::Mailbox;
use crate::fake_imap::sequence::contains;
use imap_codec::imap_types::flag::{Flag, StoreResponse, StoreType};
use imap_codec::imap_types::sequence::SequenceSet;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Parsed STORE command arguments.
pub struct StoreArgs<'a> {
    pub sequence_set: &'a SequenceSet,
    pub kind: &'a StoreType,
    pub response: &'a StoreResponse,
    pub flags: &'a [Flag<'a>],
}

impl StoreArgs<'_> {
    fn apply(&self, current: bool, flag: &Flag<'_>) -> bool {
        let named = self.flags.iter().any(|f| f == flag);
        match self.kind {
            StoreType::Add => current || named,
            StoreType::Remove => current && !named,
            StoreType::Replace => named,
        }
    }

    fn describe(&self) -> String {
        let sign = match self.kind {
            StoreType::Add => "+",
            StoreType::Remove => "-",
            StoreType::Replace => "",
        };
        let flags: Vec<&str> = self
            .flags
            .iter()
            .filter_map(|f| match f {
                Flag::Seen => Some("\\Seen"),
                Flag::Deleted => Some("\\Deleted"),
                _ => None,
            })
            .collect();
        format!("{sign}FLAGS ({})", flags.join(" "))
    }
}

pub async fn handle_uid_store<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    args: &StoreArgs<'_>,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    // Mutate under lock, write responses afterwards.
    let results = {
        let mut mb = mailbox.lock().unwrap();
        let results = mb.get_folder_mut(folder_name).map(|folder| {
            let max_uid = folder.max_uid();
            let mut results = Vec::new();
            for (idx, email) in folder.emails.iter_mut().enumerate() {
                if !contains(args.sequence_set, email.uid, max_uid) {
                    continue;
                }
                email.seen = args.apply(email.seen, &Flag::Seen);
                email.deleted = args.apply(email.deleted, &Flag::Deleted);

                let mut current = Vec::new();
                if email.seen {
                    current.push("\\Seen");
                }
                if email.deleted {
                    current.push("\\Deleted");
                }
                results.push((idx + 1, email.uid, current.join(" ")));
            }
            results
        });

        let change = args.describe();
        for (_, uid, _) in results.iter().flatten() {
            mb.journal.push(format!("UID STORE {uid} {change}"));
        }
        results
    };

    let Some(results) = results else {
        let resp = format!("{tag} BAD Folder not found\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    if !matches!(args.response, StoreResponse::Silent) {
        for (seq, uid, flags) in &results {
            let line = format!("* {seq} FETCH (UID {uid} FLAGS ({flags}))\r\n");
            if write_line(stream, &line).await.is_err() {
                return;
            }
        }
    }

    let resp = format!("{tag} OK STORE completed\r\n");
    let _ = write_line(stream, &resp).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::read_all;
    use crate::fake_imap::mailbox::MailboxBuilder;
    use imap_codec::imap_types::sequence::{SeqOrUid, Sequence};
    use std::num::NonZeroU32;

    fn uid_set(uid: u32) -> SequenceSet {
        SequenceSet(
            vec![Sequence::Single(SeqOrUid::Value(
                NonZeroU32::new(uid).unwrap(),
            ))]
            .try_into()
            .unwrap(),
        )
    }

    async fn run_store(
        kind: &StoreType,
        response: &StoreResponse,
        flags: &[Flag<'_>],
        mailbox: &Mutex<Mailbox>,
        selected: Option<&str>,
    ) -> String {
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);
        let seq = uid_set(1);
        let args = StoreArgs {
            sequence_set: &seq,
            kind,
            response,
            flags,
        };
        handle_uid_store("A1", &args, mailbox, selected, &mut stream).await;
        drop(stream);
        read_all(client).await
    }

    #[tokio::test]
    async fn silent_add_deleted_is_journaled() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").undated(1).build());

        let output = run_store(
            &StoreType::Add,
            &StoreResponse::Silent,
            &[Flag::Deleted],
            &mb,
            Some("INBOX"),
        )
        .await;

        assert_eq!(output, "A1 OK STORE completed\r\n");
        let state = mb.lock().unwrap();
        assert!(state.get_folder("INBOX").unwrap().emails[0].deleted);
        assert_eq!(state.journal, vec!["UID STORE 1 +FLAGS (\\Deleted)"]);
    }

    #[tokio::test]
    async fn answer_reports_resulting_flags() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").undated(1).build());

        let output = run_store(
            &StoreType::Add,
            &StoreResponse::Answer,
            &[Flag::Seen],
            &mb,
            Some("INBOX"),
        )
        .await;

        assert!(output.contains("* 1 FETCH (UID 1 FLAGS (\\Seen))"));
        assert!(mb.lock().unwrap().get_folder("INBOX").unwrap().emails[0].seen);
    }

    #[tokio::test]
    async fn no_folder_selected_returns_bad() {
        let mb = Mutex::new(MailboxBuilder::new().folder("INBOX").build());

        let output = run_store(
            &StoreType::Add,
            &StoreResponse::Answer,
            &[Flag::Seen],
            &mb,
            None,
        )
        .await;

        assert!(output.contains("A1 BAD No folder selected"));
    }
}
