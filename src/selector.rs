//! Decide which mailboxes a run processes

use crate::catalog::Catalog;
use crate::config::ArchiveConfig;
use crate::mailbox::Mailbox;
use tracing::info;

/// Verdict for a single mailbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Matched an exact or recursive rule.
    Process,
    /// Matched an ignore prefix. Reported, never processed.
    Ignore,
    /// Matched no rule.
    Untouched,
}

/// Include/ignore rules taken from an [`ArchiveConfig`].
#[derive(Debug, Clone, Copy)]
pub struct Selector<'a> {
    exact: &'a [String],
    recursive: &'a [String],
    ignore: &'a [String],
}

impl<'a> Selector<'a> {
    #[must_use]
    pub fn new(config: &'a ArchiveConfig) -> Self {
        Self {
            exact: &config.mailboxes,
            recursive: &config.recursive_mailboxes,
            ignore: &config.ignore_mailboxes,
        }
    }

    /// Apply the rules to one name. Ignore prefixes are checked first
    /// and win over any include rule.
    #[must_use]
    pub fn classify(&self, name: &str) -> Selection {
        if self.ignore.iter().any(|p| name.starts_with(p.as_str())) {
            Selection::Ignore
        } else if self.exact.iter().any(|e| e == name)
            || self.recursive.iter().any(|p| name.starts_with(p.as_str()))
        {
            Selection::Process
        } else {
            Selection::Untouched
        }
    }

    /// Mailboxes to process, in catalog order, each at most once.
    ///
    /// Ignored mailboxes are reported as they are skipped.
    #[must_use]
    pub fn select(&self, catalog: &Catalog) -> Vec<Mailbox> {
        catalog
            .list_all()
            .iter()
            .filter(|mbox| match self.classify(mbox.name()) {
                Selection::Process => true,
                Selection::Ignore => {
                    info!("Ignore mailbox '{}'", mbox);
                    false
                }
                Selection::Untouched => false,
            })
            .cloned()
            .collect()
    }
}
