use std::fmt;

use serde::{Deserialize, Serialize};

use super::ConstraintKind;

/// Why a supplied constraint (or part of one) was left out of scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IssueCode {
    /// A guest, table, group or seat reference does not exist in this run.
    InvalidConstraintReference,
    /// A soft weight or a distance bound is negative or not finite.
    InvalidConstraintValue,
    /// Entry id already used by an earlier entry; the entry is still scored.
    DuplicateConstraint,
    /// A seat lock contradicts an earlier lock on the same seat or guest.
    ConflictingLock,
}

impl IssueCode {
    pub fn as_str(self) -> &'static str {
        match self {
            IssueCode::InvalidConstraintReference => "INVALID_CONSTRAINT_REFERENCE",
            IssueCode::InvalidConstraintValue => "INVALID_CONSTRAINT_VALUE",
            IssueCode::DuplicateConstraint => "DUPLICATE_CONSTRAINT",
            IssueCode::ConflictingLock => "CONFLICTING_LOCK",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-fatal diagnostic produced while compiling the constraint list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConstraintIssue {
    /// Position of the entry in the supplied list.
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub kind: ConstraintKind,
    pub code: IssueCode,
    pub detail: String,
}

impl fmt::Display for ConstraintIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} #{} ({}): {}", self.kind, self.index, self.code, self.detail)
    }
}
