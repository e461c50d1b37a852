use std::path::{Path, PathBuf};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::persist::CORRUPT_KEY;
use crate::io::store::{FileStore, KeyValueStore};
use crate::logging;
use crate::model::{Category, Config, Priority, TaskId};
use crate::ops::session::{LoadSummary, Session};
use crate::ops::view::Filter;
use crate::tui;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let Some(command) = cli.command else {
        return cmd_tui(cli.data_dir.as_deref());
    };

    let (data_dir, config) = load_config(cli.data_dir.as_deref())?;
    let store = FileStore::new(&data_dir);
    let corrupt_path = store.path_for(CORRUPT_KEY);
    let mut session = Session::open(store, config.defaults)?;
    for warning in load_warnings(session.load_summary(), &corrupt_path) {
        eprintln!("warning: {}", warning);
    }

    match command {
        // Read commands
        Commands::List(args) => cmd_list(&mut session, args, json),
        Commands::Board => cmd_board(&session, json),
        Commands::Stats => cmd_stats(&session, json),
        Commands::Export(args) => cmd_export(&session, args),

        // Write commands
        Commands::Add(args) => cmd_add(&mut session, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut session, args, json),
        Commands::Done(args) => cmd_done(&mut session, args, json),
        Commands::Edit(args) => cmd_edit(&mut session, args, json),
        Commands::Rm(args) => cmd_rm(&mut session, args, json),
        Commands::Clear => cmd_clear(&mut session, json),
    }
}

/// Launch the terminal board
pub fn cmd_tui(data_dir_flag: Option<&Path>) -> CmdResult {
    let (data_dir, config) = load_config(data_dir_flag)?;
    let file_store = FileStore::new(&data_dir);
    let corrupt_path = file_store.path_for(CORRUPT_KEY);
    let store: Box<dyn KeyValueStore> = Box::new(file_store);
    let session = Session::open(store, config.defaults)?;
    let warnings = load_warnings(session.load_summary(), &corrupt_path);

    let mut app = tui::app::App::new(session, &config, data_dir);
    if !warnings.is_empty() {
        app.status = Some(warnings.join("; "));
    }
    tui::run(&mut app)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Resolve the data directory, read its config and start file logging.
fn load_config(flag: Option<&Path>) -> Result<(PathBuf, Config), Box<dyn std::error::Error>> {
    let data_dir = config_io::resolve_data_dir(flag);
    let config = config_io::read_config(&data_dir)?;
    if let Err(e) = logging::init_logging(&config.log.level, &data_dir) {
        eprintln!("warning: logging disabled: {}", e);
    }
    Ok((data_dir, config))
}

fn load_warnings(summary: LoadSummary, corrupt_path: &Path) -> Vec<String> {
    let mut warnings = Vec::new();
    if summary.corrupt {
        warnings.push(format!(
            "stored tasks were unreadable; starting empty (copy kept at {})",
            corrupt_path.display()
        ));
    }
    if summary.dropped > 0 {
        warnings.push(format!(
            "skipped {} unreadable task record{}",
            summary.dropped,
            if summary.dropped == 1 { "" } else { "s" }
        ));
    }
    warnings
}

/// Turn a failed snapshot write into the command's error
fn finish<S: KeyValueStore>(session: &mut Session<S>) -> CmdResult {
    match session.take_save_error() {
        Some(e) => Err(e.into()),
        None => Ok(()),
    }
}

fn parse_priority_arg(s: Option<&str>) -> Result<Option<Priority>, String> {
    s.map(|s| {
        Priority::parse_priority(s)
            .ok_or_else(|| format!("unknown priority '{}' (expected: low, medium, high)", s))
    })
    .transpose()
}

fn parse_category_arg(s: Option<&str>) -> Result<Option<Category>, String> {
    s.map(|s| {
        Category::parse_category(s).ok_or_else(|| {
            format!(
                "unknown category '{}' (expected: work, personal, shopping, health)",
                s
            )
        })
    })
    .transpose()
}

/// Print the task with `id` as a line or as JSON
fn print_task<S: KeyValueStore>(session: &Session<S>, id: &TaskId, json: bool) -> CmdResult {
    let task = session
        .find(id)
        .ok_or_else(|| format!("task not found: {}", id))?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(task))?);
    } else {
        println!("{}", format_task_line(task));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list<S: KeyValueStore>(session: &mut Session<S>, args: ListArgs, json: bool) -> CmdResult {
    let filter = Filter::parse_filter(&args.filter).ok_or_else(|| {
        format!(
            "unknown filter '{}' (expected: all, active, completed)",
            args.filter
        )
    })?;
    session.set_filter(filter);
    let tasks = session.visible();

    if json {
        let out: Vec<TaskJson> = tasks.iter().map(|t| task_to_json(t)).collect();
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        for line in format_task_list(&tasks, filter) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_board<S: KeyValueStore>(session: &Session<S>, json: bool) -> CmdResult {
    let board = session.board();
    if json {
        println!("{}", serde_json::to_string_pretty(&board_to_json(&board))?);
    } else {
        for line in format_board(&board) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_stats<S: KeyValueStore>(session: &Session<S>, json: bool) -> CmdResult {
    let stats = session.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", format_stats(&stats));
    }
    Ok(())
}

fn cmd_export<S: KeyValueStore>(session: &Session<S>, args: ExportArgs) -> CmdResult {
    if !args.html {
        return Err("choose an export format (--html)".into());
    }
    let html = render_html(&session.board(), &session.stats());
    match args.output {
        Some(path) => {
            crate::io::store::atomic_write(&path, html.as_bytes())
                .map_err(|e| format!("could not write {}: {}", path.display(), e))?;
            log::info!("event=export format=html tasks={}", session.tasks().len());
            println!("wrote {}", path.display());
        }
        None => print!("{}", html),
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add<S: KeyValueStore>(session: &mut Session<S>, args: AddArgs, json: bool) -> CmdResult {
    let priority = parse_priority_arg(args.priority.as_deref())?;
    let category = parse_category_arg(args.category.as_deref())?;
    let text = args.text.join(" ");

    let id = session.add(&text, priority, category)?;
    finish(session)?;

    if json {
        let out = AddedJson { id: id.to_string() };
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_toggle<S: KeyValueStore>(session: &mut Session<S>, args: IdArg, json: bool) -> CmdResult {
    let id = TaskId::from(args.id.as_str());
    session.toggle(&id)?;
    finish(session)?;
    print_task(session, &id, json)
}

fn cmd_done<S: KeyValueStore>(session: &mut Session<S>, args: IdArg, json: bool) -> CmdResult {
    let id = TaskId::from(args.id.as_str());
    let changed = session.complete(&id)?;
    finish(session)?;
    if !changed && !json {
        eprintln!("{} was already completed", id);
    }
    print_task(session, &id, json)
}

fn cmd_edit<S: KeyValueStore>(session: &mut Session<S>, args: EditArgs, json: bool) -> CmdResult {
    let id = TaskId::from(args.id.as_str());
    session.set_text(&id, &args.text.join(" "))?;
    finish(session)?;
    print_task(session, &id, json)
}

fn cmd_rm<S: KeyValueStore>(session: &mut Session<S>, args: IdArg, json: bool) -> CmdResult {
    let id = TaskId::from(args.id.as_str());
    let removed = session.delete(&id)?;
    finish(session)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&task_to_json(&removed))?);
    } else {
        println!("deleted {}", removed.id);
    }
    Ok(())
}

fn cmd_clear<S: KeyValueStore>(session: &mut Session<S>, json: bool) -> CmdResult {
    let removed = session.clear_completed();
    finish(session)?;
    if json {
        println!("{}", serde_json::json!({ "removed": removed }));
    } else {
        println!(
            "cleared {} completed task{}",
            removed,
            if removed == 1 { "" } else { "s" }
        );
    }
    Ok(())
}
