use chrono::{DateTime, Utc};

use crate::model::task::{Category, Priority, Task, TaskId};
use crate::ops::guard::{self, GuardError};

/// Error type for task operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TaskError {
    #[error("task not found: {0}")]
    NotFound(TaskId),
    #[error("rejected: {0}")]
    Rejected(#[from] GuardError),
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

pub fn find_task<'a>(tasks: &'a [Task], id: &TaskId) -> Option<&'a Task> {
    tasks.iter().find(|t| &t.id == id)
}

pub fn find_task_mut<'a>(tasks: &'a mut [Task], id: &TaskId) -> Option<&'a mut Task> {
    tasks.iter_mut().find(|t| &t.id == id)
}

fn require_mut<'a>(tasks: &'a mut [Task], id: &TaskId) -> Result<&'a mut Task, TaskError> {
    find_task_mut(tasks, id).ok_or_else(|| TaskError::NotFound(id.clone()))
}

/// Id for a task created at `now`: its millisecond timestamp, bumped past
/// any id already in use.
pub fn next_id(tasks: &[Task], now: DateTime<Utc>) -> TaskId {
    let mut millis = now.timestamp_millis();
    loop {
        let candidate = TaskId(millis.to_string());
        if find_task(tasks, &candidate).is_none() {
            return candidate;
        }
        millis += 1;
    }
}

// ---------------------------------------------------------------------------
// Create / edit / delete
// ---------------------------------------------------------------------------

/// Append a new task built from raw user text. Returns the assigned ID.
pub fn add_task(
    tasks: &mut Vec<Task>,
    text: &str,
    priority: Priority,
    category: Category,
    now: DateTime<Utc>,
) -> Result<TaskId, TaskError> {
    let stored = guard::admit(text)?;
    let id = next_id(tasks, now);
    tasks.push(Task::new(id.clone(), stored, now, category, priority));
    Ok(id)
}

/// Replace a task's text with the sanitized form of raw user text.
pub fn set_text(tasks: &mut [Task], id: &TaskId, text: &str) -> Result<(), TaskError> {
    let task = require_mut(tasks, id)?;
    task.text = guard::admit(text)?;
    Ok(())
}

/// Remove a task, returning it.
pub fn delete_task(tasks: &mut Vec<Task>, id: &TaskId) -> Result<Task, TaskError> {
    let idx = tasks
        .iter()
        .position(|t| &t.id == id)
        .ok_or_else(|| TaskError::NotFound(id.clone()))?;
    Ok(tasks.remove(idx))
}

/// Remove every completed task. Returns how many were removed.
pub fn clear_completed(tasks: &mut Vec<Task>) -> usize {
    let before = tasks.len();
    tasks.retain(|t| !t.completed);
    before - tasks.len()
}

// ---------------------------------------------------------------------------
// Completion
// ---------------------------------------------------------------------------

/// Flip a task's completed flag. Returns the new value.
pub fn toggle_task(tasks: &mut [Task], id: &TaskId) -> Result<bool, TaskError> {
    let task = require_mut(tasks, id)?;
    task.completed = !task.completed;
    Ok(task.completed)
}

/// Set a task's completed flag. Returns whether it changed.
pub fn set_completed(tasks: &mut [Task], id: &TaskId, completed: bool) -> Result<bool, TaskError> {
    let task = require_mut(tasks, id)?;
    if task.completed == completed {
        return Ok(false);
    }
    task.completed = completed;
    Ok(true)
}
