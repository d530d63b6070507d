//! Enumerations for TUI state management.

/// Application state for the terminal user interface.
#[derive(Clone, Copy, PartialEq)]
pub enum AppState {
    Tasks,
    Prompt,
    Help,
    Confirm,
}

/// What an open line-editor prompt will do when submitted.
#[derive(Clone, Copy, PartialEq)]
pub enum PromptKind {
    NewList,
    NewTask { list_id: u64 },
    EditTask { task_id: u64 },
    DueDate { task_id: u64 },
}
