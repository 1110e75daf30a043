//! Hierarchical mailbox names
//!
//! A mailbox name is a path whose segments are joined by a
//! server-defined delimiter. The delimiter is carried alongside the
//! name and is the only thing used to split or join segments.

use std::fmt;

/// A folder on the mail server.
///
/// Equality and hashing consider the name only; the delimiter is
/// metadata describing how to read the name.
///
/// # Examples
///
/// ```
/// use mail_archiver::Mailbox;
///
/// let mbox = Mailbox::new("Archive.2024.03", ".");
/// assert_eq!(mbox.segments(), vec!["Archive", "2024", "03"]);
/// assert_eq!(mbox.ancestors(), vec!["Archive", "Archive.2024", "Archive.2024.03"]);
/// ```
#[derive(Debug, Clone)]
pub struct Mailbox {
    name: String,
    delimiter: String,
}

impl Mailbox {
    #[must_use]
    pub fn new(name: impl Into<String>, delimiter: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            delimiter: delimiter.into(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hierarchy delimiter. Empty for flat namespaces.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// A mailbox in the same namespace (same delimiter) with another name.
    #[must_use]
    pub fn sibling(&self, name: impl Into<String>) -> Self {
        Self::new(name, self.delimiter.clone())
    }

    /// Path segments of the name, in hierarchy order.
    #[must_use]
    pub fn segments(&self) -> Vec<&str> {
        if self.delimiter.is_empty() {
            vec![self.name.as_str()]
        } else {
            self.name.split(self.delimiter.as_str()).collect()
        }
    }

    /// Cumulative paths from the top-level segment down to the full
    /// name, ancestor first.
    #[must_use]
    pub fn ancestors(&self) -> Vec<String> {
        let mut paths: Vec<String> = Vec::new();
        for segment in self.segments() {
            let path = match paths.last() {
                Some(parent) => format!("{parent}{}{segment}", self.delimiter),
                None => segment.to_string(),
            };
            paths.push(path);
        }
        paths
    }
}

impl PartialEq for Mailbox {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Mailbox {}

impl std::hash::Hash for Mailbox {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Mailbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
