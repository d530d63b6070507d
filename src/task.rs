//! Task data structure.
//!
//! This module defines the `Task` struct: a single todo item owned by
//! exactly one list.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single todo item.
///
/// `text` is stored exactly as the user typed it; creation only rejects
/// input that is empty after trimming. `due` is absent until explicitly set
/// and can be cleared again.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: u64,
    pub text: String,
    pub completed: bool,
    pub due: Option<NaiveDate>,
}

impl Task {
    /// Create a fresh, uncompleted task with no due date.
    pub fn new(id: u64, text: &str) -> Self {
        Task {
            id,
            text: text.to_string(),
            completed: false,
            due: None,
        }
    }
}
