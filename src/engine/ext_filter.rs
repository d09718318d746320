//! Extension filter parsed from a user list like `.pdf, DOCX,txt`.

use std::collections::BTreeSet;
use std::fmt;

/// Normalized set of dot-prefixed lowercase extensions. Empty means "accept everything".
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtFilter {
    exts: BTreeSet<String>,
}

impl ExtFilter {
    /// Parse a comma list: trim each token, lowercase, drop empties, add a leading `.` if missing.
    pub fn parse(s: &str) -> Self {
        let exts = s
            .split(',')
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .map(|t| if t.starts_with('.') { t } else { format!(".{t}") })
            .collect();
        Self { exts }
    }

    pub fn is_empty(&self) -> bool {
        self.exts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.exts.len()
    }

    pub fn contains(&self, ext: &str) -> bool {
        self.exts.contains(ext)
    }

    /// True when a file with this (already normalized) extension should be cataloged.
    pub fn accepts(&self, ext: &str) -> bool {
        self.is_empty() || self.contains(ext)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.exts.iter().map(String::as_str)
    }
}

impl fmt::Display for ExtFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<&str> = self.iter().collect();
        write!(f, "{}", joined.join(","))
    }
}

impl<S: AsRef<str>> FromIterator<S> for ExtFilter {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let joined: Vec<String> = iter.into_iter().map(|s| s.as_ref().to_string()).collect();
        Self::parse(&joined.join(","))
    }
}
