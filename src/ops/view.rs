//! View projection: filtered, priority-sorted and aggregated views derived
//! from the canonical task list. Nothing here mutates or caches; callers
//! re-project after every change.

use serde::{Deserialize, Serialize};

use crate::model::task::Task;

/// Which subset of tasks a list shows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    #[default]
    All,
    Active,
    Completed,
}

impl Filter {
    pub const ALL: [Filter; 3] = [Filter::All, Filter::Active, Filter::Completed];

    pub fn matches(self, task: &Task) -> bool {
        match self {
            Filter::All => true,
            Filter::Active => !task.completed,
            Filter::Completed => task.completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Filter::All => "all",
            Filter::Active => "active",
            Filter::Completed => "completed",
        }
    }

    pub fn parse_filter(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Some(Filter::All),
            "active" => Some(Filter::Active),
            "completed" | "done" => Some(Filter::Completed),
            _ => None,
        }
    }

    /// all → active → completed → all
    pub fn cycle(self) -> Self {
        match self {
            Filter::All => Filter::Active,
            Filter::Active => Filter::Completed,
            Filter::Completed => Filter::All,
        }
    }

    /// Column heading
    pub fn title(self) -> &'static str {
        match self {
            Filter::All => "All",
            Filter::Active => "Active",
            Filter::Completed => "Completed",
        }
    }

    /// Message shown when the subset is empty
    pub fn empty_message(self) -> &'static str {
        match self {
            Filter::All => "No todos yet",
            Filter::Active => "No active tasks",
            Filter::Completed => "No completed tasks",
        }
    }
}

impl std::fmt::Display for Filter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort by priority, highest first. Equal priorities keep their
/// relative order from the input.
pub fn sort_by_priority(tasks: &mut [&Task]) {
    tasks.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank()));
}

/// Tasks matching `filter`, sorted by priority.
pub fn filtered(tasks: &[Task], filter: Filter) -> Vec<&Task> {
    let mut out: Vec<&Task> = tasks.iter().filter(|t| filter.matches(t)).collect();
    sort_by_priority(&mut out);
    out
}

/// The three-column grouping: every task, the active ones and the
/// completed ones, each sorted by priority.
#[derive(Debug)]
pub struct Board<'a> {
    pub all: Vec<&'a Task>,
    pub active: Vec<&'a Task>,
    pub completed: Vec<&'a Task>,
}

impl<'a> Board<'a> {
    pub fn column(&self, filter: Filter) -> &[&'a Task] {
        match filter {
            Filter::All => &self.all,
            Filter::Active => &self.active,
            Filter::Completed => &self.completed,
        }
    }
}

pub fn board(tasks: &[Task]) -> Board<'_> {
    Board {
        all: filtered(tasks, Filter::All),
        active: filtered(tasks, Filter::Active),
        completed: filtered(tasks, Filter::Completed),
    }
}

/// Aggregate counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub total: usize,
    pub active: usize,
    pub completed: usize,
    /// Percentage of completed tasks, rounded; 0 for an empty list
    pub completion_rate: u32,
}

pub fn stats(tasks: &[Task]) -> Stats {
    let total = tasks.len();
    let completed = tasks.iter().filter(|t| t.completed).count();
    let completion_rate = if total > 0 {
        (completed as f64 / total as f64 * 100.0).round() as u32
    } else {
        0
    };
    Stats {
        total,
        active: total - completed,
        completed,
        completion_rate,
    }
}
