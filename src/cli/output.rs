use serde::Serialize;

use crate::model::task::{Category, Priority, Task};
use crate::ops::guard;
use crate::ops::view::{Board, Filter, Stats};

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct TaskJson {
    pub id: String,
    /// Stored (escaped) text
    pub text: String,
    pub completed: bool,
    pub category: Category,
    pub priority: Priority,
    pub created_at: String,
}

#[derive(Serialize)]
pub struct ColumnJson {
    pub count: usize,
    pub tasks: Vec<TaskJson>,
}

#[derive(Serialize)]
pub struct BoardJson {
    pub all: ColumnJson,
    pub active: ColumnJson,
    pub completed: ColumnJson,
}

#[derive(Serialize)]
pub struct AddedJson {
    pub id: String,
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

pub fn task_to_json(task: &Task) -> TaskJson {
    TaskJson {
        id: task.id.to_string(),
        text: task.text.clone(),
        completed: task.completed,
        category: task.category,
        priority: task.priority,
        created_at: task.created_at.to_rfc3339(),
    }
}

fn column_to_json(tasks: &[&Task]) -> ColumnJson {
    ColumnJson {
        count: tasks.len(),
        tasks: tasks.iter().map(|t| task_to_json(t)).collect(),
    }
}

pub fn board_to_json(board: &Board) -> BoardJson {
    BoardJson {
        all: column_to_json(board.column(Filter::All)),
        active: column_to_json(board.column(Filter::Active)),
        completed: column_to_json(board.column(Filter::Completed)),
    }
}

// ---------------------------------------------------------------------------
// Human-readable formatting
// ---------------------------------------------------------------------------

/// Format a single task as a one-line summary. Text is decoded once, the
/// terminal's equivalent of rendering the stored markup.
pub fn format_task_line(task: &Task) -> String {
    let mark = if task.completed { 'x' } else { ' ' };
    format!(
        "[{}] {}  {}  ({}, {})",
        mark,
        task.id,
        guard::decode_entities(&task.text),
        task.category,
        task.priority
    )
}

/// Format a task list, or the filter's empty message
pub fn format_task_list(tasks: &[&Task], filter: Filter) -> Vec<String> {
    if tasks.is_empty() {
        return vec![filter.empty_message().to_string()];
    }
    tasks.iter().map(|t| format_task_line(t)).collect()
}

/// Format the three board columns one after another
pub fn format_board(board: &Board) -> Vec<String> {
    let mut lines = Vec::new();
    for (i, filter) in Filter::ALL.into_iter().enumerate() {
        let tasks = board.column(filter);
        if i > 0 {
            lines.push(String::new());
        }
        let hint = if filter == Filter::Completed && !tasks.is_empty() {
            "  (tl clear removes them)"
        } else {
            ""
        };
        lines.push(format!("== {} ({}) =={}", filter.title(), tasks.len(), hint));
        for line in format_task_list(tasks, filter) {
            lines.push(format!("  {}", line));
        }
    }
    lines
}

pub fn format_stats(stats: &Stats) -> String {
    format!(
        "total {}  active {}  completed {}  progress {}%",
        stats.total, stats.active, stats.completed, stats.completion_rate
    )
}

// ---------------------------------------------------------------------------
// HTML export
// ---------------------------------------------------------------------------

const HTML_STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#f5f3ff;color:#1f1d3a;margin:2rem}
.stats{display:flex;gap:1rem;margin-bottom:1.5rem}
.card{background:#fff;border-radius:8px;padding:.75rem 1rem;box-shadow:0 1px 3px #0002}
.board{display:grid;grid-template-columns:repeat(3,1fr);gap:1rem}
.column h2{font-size:1rem}
.task{background:#fff;border-radius:8px;padding:.5rem .75rem;margin:.5rem 0}
.task.done .text{text-decoration:line-through;color:#888}
.badge{font-size:.75rem;border-radius:4px;padding:0 .3rem;margin-right:.3rem;background:#eee}
.empty{color:#888;font-style:italic}
.meta{font-size:.75rem;color:#888}";

/// A static page of the board. Stored text is inserted as-is: it was
/// escaped when admitted, so the browser renders it exactly once.
pub fn render_html(board: &Board, stats: &Stats) -> String {
    let mut out = String::new();
    out.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
    out.push_str("<title>Todo Board</title>\n<style>\n");
    out.push_str(HTML_STYLE);
    out.push_str("\n</style>\n</head>\n<body>\n<h1>Todo Board</h1>\n");

    out.push_str("<div class=\"stats\">\n");
    for (label, value) in [
        ("Total", stats.total.to_string()),
        ("Active", stats.active.to_string()),
        ("Completed", stats.completed.to_string()),
        ("Progress", format!("{}%", stats.completion_rate)),
    ] {
        out.push_str(&format!(
            "<div class=\"card\"><div>{}</div><strong>{}</strong></div>\n",
            label, value
        ));
    }
    out.push_str("</div>\n<div class=\"board\">\n");

    for filter in Filter::ALL {
        let tasks = board.column(filter);
        out.push_str(&format!(
            "<section class=\"column {}\">\n<h2>{} ({})</h2>\n",
            filter,
            filter.title(),
            tasks.len()
        ));
        if tasks.is_empty() {
            out.push_str(&format!(
                "<p class=\"empty\">{}</p>\n",
                filter.empty_message()
            ));
        }
        for task in tasks {
            out.push_str(&html_task(task));
        }
        out.push_str("</section>\n");
    }

    out.push_str("</div>\n</body>\n</html>\n");
    out
}

fn html_task(task: &Task) -> String {
    let class = if task.completed { "task done" } else { "task" };
    let mark = if task.completed { "&#x2713; " } else { "" };
    let mut out = format!(
        "<div class=\"{}\"><div class=\"text\">{}{}</div>\
         <span class=\"badge {}\">{}</span><span class=\"badge {}\">{}</span>",
        class,
        mark,
        task.text,
        task.category,
        task.category,
        task.priority,
        task.priority
    );
    if task.completed {
        out.push_str(&format!(
            "<div class=\"meta\">Completed on {}</div>",
            task.created_at.format("%Y-%m-%d")
        ));
    }
    out.push_str("</div>\n");
    out
}
