//! The task session: owner of the canonical task list.
//!
//! Every intent from a display layer goes through a `Session` method. A
//! mutating intent takes the store's lock, re-reads the snapshot so changes
//! from other processes are not overwritten, changes the list, and writes
//! the snapshot back before returning. Views are never stored; `visible`,
//! `board` and `stats` project the current list on each call.

use chrono::{DateTime, Utc};

use crate::io::lock::StoreLock;
use crate::io::persist::{self, LoadReport};
use crate::io::store::{KeyValueStore, StoreError};
use crate::model::config::Defaults;
use crate::model::task::{Category, Priority, Task, TaskId};
use crate::ops::guard;
use crate::ops::task_ops::{self, TaskError};
use crate::ops::view::{self, Board, Filter, Stats};

/// Error type for session intents
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("no task is being edited")]
    NotEditing,
    #[error(transparent)]
    Task(#[from] TaskError),
}

/// Edit state machine. At most one task is edited at a time.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditState {
    #[default]
    Viewing,
    Editing { id: TaskId, buffer: String },
}

/// What happened while loading the snapshot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub dropped: usize,
    pub corrupt: bool,
}

pub struct Session<S: KeyValueStore> {
    store: S,
    tasks: Vec<Task>,
    edit: EditState,
    filter: Filter,
    defaults: Defaults,
    loaded: LoadSummary,
    save_error: Option<StoreError>,
    /// A write failed, so the list is ahead of the store
    unsaved: bool,
}

impl<S: KeyValueStore> Session<S> {
    /// Load the canonical list from `store`.
    pub fn open(mut store: S, defaults: Defaults) -> Result<Self, StoreError> {
        let LoadReport {
            tasks,
            dropped,
            corrupt,
        } = persist::load_tasks(&mut store)?;
        Ok(Session {
            store,
            tasks,
            edit: EditState::Viewing,
            filter: Filter::All,
            defaults,
            loaded: LoadSummary { dropped, corrupt },
            save_error: None,
            unsaved: false,
        })
    }

    // -----------------------------------------------------------------------
    // Read side
    // -----------------------------------------------------------------------

    /// The canonical list in insertion order
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn find(&self, id: &TaskId) -> Option<&Task> {
        task_ops::find_task(&self.tasks, id)
    }

    pub fn defaults(&self) -> Defaults {
        self.defaults
    }

    pub fn load_summary(&self) -> LoadSummary {
        self.loaded
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    /// The task being edited and the current buffer
    pub fn editing(&self) -> Option<(&TaskId, &str)> {
        match &self.edit {
            EditState::Editing { id, buffer } => Some((id, buffer.as_str())),
            EditState::Viewing => None,
        }
    }

    pub fn is_editing(&self, id: &TaskId) -> bool {
        matches!(&self.edit, EditState::Editing { id: editing, .. } if editing == id)
    }

    /// Whether the commit action is enabled for the current buffer
    pub fn can_save(&self) -> bool {
        match &self.edit {
            EditState::Editing { buffer, .. } => {
                !buffer.trim().is_empty() && guard::validate(buffer)
            }
            EditState::Viewing => false,
        }
    }

    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Tasks under the current filter, sorted by priority
    pub fn visible(&self) -> Vec<&Task> {
        view::filtered(&self.tasks, self.filter)
    }

    pub fn board(&self) -> Board<'_> {
        view::board(&self.tasks)
    }

    pub fn stats(&self) -> Stats {
        view::stats(&self.tasks)
    }

    /// The last failed snapshot write, if any, cleared on read
    pub fn take_save_error(&mut self) -> Option<StoreError> {
        self.save_error.take()
    }

    // -----------------------------------------------------------------------
    // Intents
    // -----------------------------------------------------------------------

    /// Add a task. `None` picks the configured default.
    pub fn add(
        &mut self,
        text: &str,
        priority: Option<Priority>,
        category: Option<Category>,
    ) -> Result<TaskId, SessionError> {
        self.add_at(text, priority, category, Utc::now())
    }

    /// Add a task created at `now`.
    pub fn add_at(
        &mut self,
        text: &str,
        priority: Option<Priority>,
        category: Option<Category>,
        now: DateTime<Utc>,
    ) -> Result<TaskId, SessionError> {
        let priority = priority.unwrap_or(self.defaults.priority);
        let category = category.unwrap_or(self.defaults.category);
        let _lock = self.begin_write();
        let id = task_ops::add_task(&mut self.tasks, text, priority, category, now)
            .inspect_err(|e| log::info!("event=task_add_rejected reason={}", e))?;
        log::info!(
            "event=task_add id={} priority={} category={}",
            id,
            priority,
            category
        );
        self.commit();
        Ok(id)
    }

    /// Flip completion. Returns the new value.
    pub fn toggle(&mut self, id: &TaskId) -> Result<bool, SessionError> {
        let _lock = self.begin_write();
        let completed = task_ops::toggle_task(&mut self.tasks, id)?;
        log::info!("event=task_toggle id={} completed={}", id, completed);
        self.commit();
        Ok(completed)
    }

    /// Mark completed. Returns whether anything changed.
    pub fn complete(&mut self, id: &TaskId) -> Result<bool, SessionError> {
        let _lock = self.begin_write();
        let changed = task_ops::set_completed(&mut self.tasks, id, true)?;
        if changed {
            log::info!("event=task_toggle id={} completed=true", id);
            self.commit();
        }
        Ok(changed)
    }

    pub fn delete(&mut self, id: &TaskId) -> Result<Task, SessionError> {
        let _lock = self.begin_write();
        let removed = task_ops::delete_task(&mut self.tasks, id)?;
        if self.is_editing(id) {
            self.edit = EditState::Viewing;
        }
        log::info!("event=task_delete id={}", id);
        self.commit();
        Ok(removed)
    }

    /// Replace a task's text directly, outside the edit state machine.
    pub fn set_text(&mut self, id: &TaskId, text: &str) -> Result<(), SessionError> {
        let _lock = self.begin_write();
        task_ops::set_text(&mut self.tasks, id, text)
            .inspect_err(|e| log::info!("event=task_edit_rejected id={} reason={}", id, e))?;
        log::info!("event=task_edit id={}", id);
        self.commit();
        Ok(())
    }

    /// Remove all completed tasks. Returns how many were removed.
    pub fn clear_completed(&mut self) -> usize {
        let _lock = self.begin_write();
        let removed = task_ops::clear_completed(&mut self.tasks);
        if removed == 0 {
            return 0;
        }
        self.drop_stale_edit();
        log::info!("event=clear_completed removed={}", removed);
        self.commit();
        removed
    }

    pub fn set_filter(&mut self, filter: Filter) {
        self.filter = filter;
    }

    // -----------------------------------------------------------------------
    // Edit state machine
    // -----------------------------------------------------------------------

    /// Viewing → Editing. The buffer starts as the stored text. Replaces any
    /// edit already open.
    pub fn start_edit(&mut self, id: &TaskId) -> Result<(), SessionError> {
        let task = task_ops::find_task(&self.tasks, id)
            .ok_or_else(|| TaskError::NotFound(id.clone()))?;
        self.edit = EditState::Editing {
            id: id.clone(),
            buffer: task.text.clone(),
        };
        Ok(())
    }

    /// Replace the edit buffer. Ignored while viewing.
    pub fn set_buffer(&mut self, text: impl Into<String>) {
        if let EditState::Editing { buffer, .. } = &mut self.edit {
            *buffer = text.into();
        }
    }

    /// Editing → Viewing, committing the buffer. On rejection the state and
    /// buffer are left as they were.
    pub fn save_edit(&mut self) -> Result<TaskId, SessionError> {
        let (id, buffer) = match &self.edit {
            EditState::Editing { id, buffer } => (id.clone(), buffer.clone()),
            EditState::Viewing => return Err(SessionError::NotEditing),
        };
        // A task deleted elsewhere ends the edit and fails as not found
        let _lock = self.begin_write();
        task_ops::set_text(&mut self.tasks, &id, &buffer)
            .inspect_err(|e| log::info!("event=edit_rejected id={} reason={}", id, e))?;
        self.edit = EditState::Viewing;
        log::info!("event=task_edit id={}", id);
        self.commit();
        Ok(id)
    }

    /// Editing → Viewing, discarding the buffer. Returns whether an edit was
    /// open.
    pub fn cancel_edit(&mut self) -> bool {
        let was_editing = matches!(self.edit, EditState::Editing { .. });
        self.edit = EditState::Viewing;
        was_editing
    }

    /// Lock the store and pick up what other processes committed since the
    /// last read. The guard must live until `commit` has run. A lock that
    /// cannot be taken is reported like a failed write and the intent goes
    /// ahead unlocked.
    fn begin_write(&mut self) -> Option<StoreLock> {
        let guard = match self.store.lock() {
            Ok(guard) => guard,
            Err(e) => {
                log::warn!("event=store_lock_failed error={}", e);
                self.save_error = Some(e);
                None
            }
        };
        if !self.unsaved {
            self.reload();
        }
        guard
    }

    /// Replace the list with the stored snapshot. A snapshot that cannot be
    /// read leaves the list alone.
    fn reload(&mut self) {
        match persist::load_tasks(&mut self.store) {
            Ok(report) if !report.corrupt => {
                self.tasks = report.tasks;
                self.drop_stale_edit();
            }
            Ok(_) => log::warn!("event=reload_skipped reason=corrupt"),
            Err(e) => log::warn!("event=reload_skipped error={}", e),
        }
    }

    /// End the edit if its task is gone.
    fn drop_stale_edit(&mut self) {
        let gone = match &self.edit {
            EditState::Editing { id, .. } => task_ops::find_task(&self.tasks, id).is_none(),
            EditState::Viewing => false,
        };
        if gone {
            self.edit = EditState::Viewing;
        }
    }

    /// Persist the canonical list. A failed write is logged and kept for
    /// `take_save_error`; the in-memory change stands.
    fn commit(&mut self) {
        match persist::save_tasks(&mut self.store, &self.tasks) {
            Ok(()) => self.unsaved = false,
            Err(e) => {
                log::error!("event=store_write_failed error={}", e);
                self.save_error = Some(e);
                self.unsaved = true;
            }
        }
    }
}
