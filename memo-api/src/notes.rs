use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

// Common

/// A note as the server reports it. Ids and timestamps are server-assigned;
/// clients never invent them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

// Requests

#[derive(Debug, Clone, Serialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
        }
    }
}
