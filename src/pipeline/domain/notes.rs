//! Append-only notes log and the audit entries written into it.
//!
//! The log is a single text field. Entries are separated by a blank line and
//! each one starts with a bracketed timestamp. Existing entries are never
//! edited or removed.

use std::fmt;

/// Separator placed between two log entries.
pub const ENTRY_SEPARATOR: &str = "\n\n";

/// Owned notes log that only supports appending.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesLog(String);

impl NotesLog {
    /// Wraps the notes field of a deal. Absent and empty fields start an
    /// empty log.
    #[must_use]
    pub fn from_existing(notes: Option<&str>) -> Self {
        Self(notes.unwrap_or_default().to_owned())
    }

    /// Appends one entry, separated from earlier entries by a blank line.
    pub fn append(&mut self, entry: &AuditEntry) {
        if !self.0.is_empty() {
            self.0.push_str(ENTRY_SEPARATOR);
        }
        self.0.push_str(&entry.to_string());
    }

    /// Returns the log with `entry` appended, leaving `self` untouched.
    #[must_use]
    pub fn appended(&self, entry: &AuditEntry) -> Self {
        let mut next = self.clone();
        next.append(entry);
        next
    }

    /// Returns the non-blank entries in log order.
    #[must_use]
    pub fn entries(&self) -> Vec<&str> {
        entries(&self.0)
    }

    /// Returns the log text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the log, returning its text.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Splits a notes field into its non-blank entries.
#[must_use]
pub fn entries(notes: &str) -> Vec<&str> {
    notes
        .split(ENTRY_SEPARATOR)
        .filter(|entry| !entry.trim().is_empty())
        .collect()
}

/// A single timestamped notes entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEntry {
    /// Entry recording a stage transition.
    StageMove {
        /// Rendered timestamp.
        timestamp: String,
        /// Display name of the source stage.
        from: String,
        /// Display name of the target stage.
        to: String,
        /// User annotation; `None` when the user left it blank.
        annotation: Option<String>,
    },
    /// Free-text note added directly to the deal.
    Note {
        /// Rendered timestamp.
        timestamp: String,
        /// Note text.
        text: String,
    },
}

impl AuditEntry {
    /// Builds a stage-move entry. Blank annotations are dropped; others are
    /// kept verbatim.
    #[must_use]
    pub fn stage_move(
        timestamp: impl Into<String>,
        from: impl Into<String>,
        to: impl Into<String>,
        annotation: Option<&str>,
    ) -> Self {
        Self::StageMove {
            timestamp: timestamp.into(),
            from: from.into(),
            to: to.into(),
            annotation: annotation
                .filter(|text| !text.trim().is_empty())
                .map(str::to_owned),
        }
    }

    /// Builds a free-text note entry.
    #[must_use]
    pub fn note(timestamp: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Note {
            timestamp: timestamp.into(),
            text: text.into(),
        }
    }
}

impl fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StageMove {
                timestamp,
                from,
                to,
                annotation,
            } => {
                write!(f, "[{timestamp}] Moved from {from} to {to}")?;
                if let Some(text) = annotation {
                    write!(f, ": {text}")?;
                }
                Ok(())
            }
            Self::Note { timestamp, text } => write!(f, "[{timestamp}] {text}"),
        }
    }
}
