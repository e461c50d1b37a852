use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("[x] tally v", env!("CARGO_PKG_VERSION"), " - a small, careful todo board"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different data directory
    #[arg(short = 'C', long = "data-dir", global = true)]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task
    Add(AddArgs),
    /// List tasks, highest priority first
    List(ListArgs),
    /// Show the All / Active / Completed columns
    Board,
    /// Flip a task between active and completed
    Toggle(IdArg),
    /// Mark a task completed
    Done(IdArg),
    /// Replace a task's text
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArg),
    /// Delete every completed task
    Clear,
    /// Show totals and progress
    Stats,
    /// Write the board as a static page
    Export(ExportArgs),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Which tasks to show (all, active, completed)
    #[arg(long, default_value = "all")]
    pub filter: String,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Export as HTML (the only format)
    #[arg(long)]
    pub html: bool,
    /// Write to a file instead of stdout
    #[arg(short = 'o', long = "output")]
    pub output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Task text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Priority (low, medium, high; default from config)
    #[arg(long, short = 'p')]
    pub priority: Option<String>,
    /// Category (work, personal, shopping, health; default from config)
    #[arg(long, short = 'c')]
    pub category: Option<String>,
}

#[derive(Args)]
pub struct IdArg {
    /// Task ID
    pub id: String,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: String,
    /// New text (words are joined with spaces)
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn add_joins_words_and_reads_flags() {
        let cli = Cli::parse_from(["tl", "add", "Buy", "milk", "-p", "high", "--category", "shopping"]);
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        assert_eq!(args.text.join(" "), "Buy milk");
        assert_eq!(args.priority.as_deref(), Some("high"));
        assert_eq!(args.category.as_deref(), Some("shopping"));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["tl", "stats", "--json", "-C", "/tmp/x"]);
        assert!(cli.json);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
    }

    #[test]
    fn no_subcommand_launches_board() {
        let cli = Cli::parse_from(["tl"]);
        assert!(cli.command.is_none());
    }
}
