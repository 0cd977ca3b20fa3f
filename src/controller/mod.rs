//! View controllers driving the store: list, detail, and form.

/// Search-input debouncing.
pub mod debounce;
/// Detail resolution and delete workflow.
pub mod detail;
/// Create/edit form model.
pub mod form;
/// Pagination state machine.
pub mod list;
