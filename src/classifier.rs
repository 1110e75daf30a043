//! Map message dates to archive folders

use chrono::{DateTime, Datelike, FixedOffset, TimeZone};

/// Where a message belongs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// Leave the message where it is.
    Skip,
    /// Full name of the mailbox the message belongs in.
    Target(String),
}

/// Classifies the messages of one mailbox pass.
///
/// `now` is fixed when the classifier is built, so every message of a
/// pass is compared against the same month even if the pass crosses a
/// month boundary. Message dates are converted to the time zone of
/// `now` before the year and month are read.
#[derive(Debug, Clone)]
pub struct Classifier<'a, Tz: TimeZone> {
    archive_root: &'a str,
    skip_current_month: bool,
    now: DateTime<Tz>,
}

impl<'a, Tz: TimeZone> Classifier<'a, Tz> {
    #[must_use]
    pub const fn new(archive_root: &'a str, skip_current_month: bool, now: DateTime<Tz>) -> Self {
        Self {
            archive_root,
            skip_current_month,
            now,
        }
    }

    /// Classify a message date for a mailbox using `delimiter`.
    ///
    /// Messages without a usable date go to the archive root.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::{DateTime, Utc};
    /// use mail_archiver::{Classification, Classifier};
    ///
    /// let now: DateTime<Utc> = "2024-03-15T12:00:00Z".parse().unwrap();
    /// let classifier = Classifier::new("Archive", false, now);
    /// let date = DateTime::parse_from_rfc3339("2023-11-05T12:00:00Z").unwrap();
    ///
    /// assert_eq!(
    ///     classifier.classify(Some(&date), "/"),
    ///     Classification::Target("Archive/2023/11".to_string())
    /// );
    /// assert_eq!(
    ///     classifier.classify(None, "/"),
    ///     Classification::Target("Archive".to_string())
    /// );
    /// ```
    #[must_use]
    pub fn classify(&self, date: Option<&DateTime<FixedOffset>>, delimiter: &str) -> Classification {
        let Some(date) = date else {
            return Classification::Target(self.archive_root.to_string());
        };

        let local = date.with_timezone(&self.now.timezone());
        if self.skip_current_month
            && local.year() == self.now.year()
            && local.month() == self.now.month()
        {
            return Classification::Skip;
        }

        Classification::Target(format!(
            "{root}{delimiter}{year:04}{delimiter}{month:02}",
            root = self.archive_root,
            year = local.year(),
            month = local.month(),
        ))
    }
}
