//! IMAP message flags
//!
//! Typed flags and the `STORE` item built from them, so the move
//! fallback never hand-writes protocol strings.

use std::fmt;

/// An IMAP system flag the archiver sets.
///
/// # Examples
///
/// ```
/// use mail_archiver::Flag;
///
/// assert_eq!(Flag::Deleted.as_imap_str(), "\\Deleted");
/// assert_eq!(Flag::add_silently(&[Flag::Deleted]), "+FLAGS.SILENT (\\Deleted)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Flag {
    /// Message is marked for deletion (`\Deleted`).
    Deleted,
}

impl Flag {
    /// The IMAP wire representation of this flag.
    #[must_use]
    pub const fn as_imap_str(self) -> &'static str {
        match self {
            Self::Deleted => "\\Deleted",
        }
    }

    /// `STORE` data item that adds `flags` without echoing the new
    /// flag set back.
    #[must_use]
    pub fn add_silently(flags: &[Self]) -> String {
        let list: Vec<&str> = flags.iter().map(|f| f.as_imap_str()).collect();
        format!("+FLAGS.SILENT ({})", list.join(" "))
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_imap_str())
    }
}
