//! UID MOVE command handler (RFC 6851).
//!
//! Moves messages from the selected folder into the destination in one
//! step. The server answers with `* N EXPUNGE` for every message that
//! left the source, then the tagged OK:
//!
//! ```text
//! A0007 UID MOVE 4 "Archive/2023/11"
//! * 1 EXPUNGE
//! A0007 OK MOVE completed
//! ```
//!
//! The command line is recognized before codec decoding, so it is
//! parsed here by hand.

use crate::fake_imap::io::write_line;
use crate::fake_imap::mailbox::Mailbox;
use crate::fake_imap::sequence::parse_uid_set;
use std::sync::Mutex;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// A parsed `UID MOVE` command.
#[derive(Debug, PartialEq, Eq)]
pub struct UidMove {
    pub tag: String,
    pub uids: Vec<(u32, u32)>,
    pub destination: String,
}

impl UidMove {
    fn matches(&self, uid: u32) -> bool {
        self.uids.iter().any(|&(a, b)| (a.min(b)..=a.max(b)).contains(&uid))
    }
}

/// Recognize `<tag> UID MOVE <set> <mailbox>`. Returns `None` for any
/// other command.
pub fn parse_uid_move(line: &str) -> Option<UidMove> {
    let mut parts = line.splitn(5, ' ');
    let tag = parts.next()?;
    if !parts.next()?.eq_ignore_ascii_case("UID") || !parts.next()?.eq_ignore_ascii_case("MOVE") {
        return None;
    }
    let uids = parse_uid_set(parts.next()?)?;
    let raw = parts.next()?.trim();
    let destination = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .unwrap_or(raw);
    Some(UidMove {
        tag: tag.to_string(),
        uids,
        destination: destination.to_string(),
    })
}

pub async fn handle_uid_move<S: AsyncRead + AsyncWrite + Unpin>(
    cmd: &UidMove,
    mailbox: &Mutex<Mailbox>,
    selected_folder: Option<&str>,
    stream: &mut BufReader<S>,
) {
    let tag = &cmd.tag;
    let Some(folder_name) = selected_folder else {
        let resp = format!("{tag} BAD No folder selected\r\n");
        let _ = write_line(stream, &resp).await;
        return;
    };

    let outcome = {
        let mut mb = mailbox.lock().unwrap();
        if !mb.supports_move {
            Err(format!("{tag} BAD Unknown command\r\n"))
        } else if mb.get_folder(&cmd.destination).is_none() {
            Err(format!("{tag} NO [TRYCREATE] Destination folder not found\r\n"))
        } else {
            let mut seqs = Vec::new();
            let mut moved = Vec::new();
            if let Some(src) = mb.get_folder_mut(folder_name) {
                let mut idx = 0;
                src.emails.retain(|e| {
                    idx += 1;
                    if cmd.matches(e.uid) {
                        seqs.push(idx - seqs.len());
                        moved.push(e.clone());
                        false
                    } else {
                        true
                    }
                });
            }
            for email in &moved {
                mb.journal
                    .push(format!("UID MOVE {} {}", email.uid, cmd.destination));
            }
            if let Some(dest) = mb.get_folder_mut(&cmd.destination) {
                dest.emails.extend(moved);
            }
            Ok(seqs)
        }
    };

    let seqs = match outcome {
        Ok(seqs) => seqs,
        Err(resp) => {
            let _ = write_line(stream, &resp).await;
            return;
        }
    };
    for seq in seqs {
        let line = format!("* {seq} EXPUNGE\r\n");
        if write_line(stream, &line).await.is_err() {
            return;
        }
    }
    let resp = format!("{tag} OK MOVE completed\r\n");
    let _ = write_line(stream, &resp).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::io::read_all;
    use crate::fake_imap::mailbox::MailboxBuilder;

    async fn run(line: &str, mailbox: &Mutex<Mailbox>) -> String {
        let cmd = parse_uid_move(line).unwrap();
        let (client, server) = tokio::io::duplex(4096);
        let mut stream = BufReader::new(server);
        handle_uid_move(&cmd, mailbox, Some("INBOX"), &mut stream).await;
        drop(stream);
        read_all(client).await
    }

    #[test]
    fn parses_quoted_destination() {
        let cmd = parse_uid_move("A7 UID MOVE 4 \"Archive/2023/11\"").unwrap();
        assert_eq!(
            cmd,
            UidMove {
                tag: "A7".to_string(),
                uids: vec![(4, 4)],
                destination: "Archive/2023/11".to_string(),
            }
        );
    }

    #[test]
    fn ignores_other_commands() {
        assert!(parse_uid_move("A7 UID COPY 4 Archive").is_none());
        assert!(parse_uid_move("A7 NOOP").is_none());
    }

    #[tokio::test]
    async fn moves_and_reports_expunge() {
        let mb = Mutex::new(
            MailboxBuilder::new()
                .with_move()
                .folder("INBOX")
                .undated(1)
                .undated(2)
                .folder("Archive")
                .build(),
        );

        let output = run("A1 UID MOVE 2 \"Archive\"", &mb).await;

        assert_eq!(output, "* 2 EXPUNGE\r\nA1 OK MOVE completed\r\n");
        let state = mb.lock().unwrap();
        assert_eq!(state.uids("INBOX"), vec![1]);
        assert_eq!(state.uids("Archive"), vec![2]);
        assert_eq!(state.journal, vec!["UID MOVE 2 Archive"]);
    }

    #[tokio::test]
    async fn refused_without_move_capability() {
        let mb = Mutex::new(
            MailboxBuilder::new()
                .folder("INBOX")
                .undated(1)
                .folder("Archive")
                .build(),
        );

        let output = run("A1 UID MOVE 1 Archive", &mb).await;

        assert!(output.contains("A1 BAD"));
        assert_eq!(mb.lock().unwrap().uids("INBOX"), vec![1]);
    }
}
