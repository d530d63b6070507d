//! Named task lists.
//!
//! A `TaskList` owns an ordered sequence of tasks. Insertion order is
//! significant and survives every operation except explicit deletion.

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// A named, ordered collection of tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskList {
    pub id: u64,
    pub name: String,
    pub tasks: Vec<Task>,
}

impl TaskList {
    /// Create an empty list with the given name.
    ///
    /// The name is kept as typed; callers trim only to decide whether the
    /// input was empty.
    pub fn new(id: u64, name: &str) -> Self {
        TaskList {
            id,
            name: name.to_string(),
            tasks: Vec::new(),
        }
    }

    /// Get a task in this list by id.
    pub fn get(&self, task_id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Get a mutable reference to a task in this list by id.
    pub fn get_mut(&mut self, task_id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == task_id)
    }
}
