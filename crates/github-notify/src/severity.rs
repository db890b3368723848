//! Action verbs grouped by how alarming they are.
//!
//! Renderers pick their own colours per bucket.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Created,
    Closed,
    Merged,
    Destructive,
    Neutral,
}

impl Severity {
    /// Bucket for an effective (already remapped) action.
    pub fn of(action: &str) -> Self {
        match action {
            "created" | "resolved" | "reopened" => Self::Created,
            "closed" => Self::Closed,
            "merged" => Self::Merged,
            "locked"
            | "deleted"
            | "dismissed"
            | "unpublished"
            | "force-pushed"
            | "requested changes"
            | "requested changes in"
            | "closed without merging" => Self::Destructive,
            _ => Self::Neutral,
        }
    }
}
