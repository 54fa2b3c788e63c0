use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{ArgGroup, Args, Parser, Subcommand};

use crate::model::task::{FilterMode, TaskId};

#[derive(Parser)]
#[command(name = "ck", about = concat!("[x] checklist v", env!("CARGO_PKG_VERSION"), " - an ordered to-do list"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task file to use instead of the configured one
    #[arg(long, global = true, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// Config file (default: <config dir>/checklist/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Add a task to the bottom of the list
    Add(AddArgs),
    /// List tasks
    List(ListArgs),
    /// Flip a task between pending and completed
    Toggle(IdArgs),
    /// Replace a task's text
    Edit(EditArgs),
    /// Delete a task
    Rm(IdArgs),
    /// Move a task within the list
    Mv(MvArgs),
}

#[derive(Args)]
pub struct AddArgs {
    /// Task text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
    /// Due date
    #[arg(long, value_name = "YYYY-MM-DD", value_parser = parse_due)]
    pub due: Option<NaiveDate>,
}

#[derive(Args)]
pub struct ListArgs {
    /// all, pending or completed (default from config)
    #[arg(long)]
    pub filter: Option<FilterMode>,
}

#[derive(Args)]
pub struct IdArgs {
    /// Task ID
    pub id: TaskId,
}

#[derive(Args)]
pub struct EditArgs {
    /// Task ID
    pub id: TaskId,
    /// New text
    #[arg(required = true, num_args = 1..)]
    pub text: Vec<String>,
}

#[derive(Args)]
#[command(group(
    ArgGroup::new("position")
        .required(true)
        .args(["top", "bottom", "before", "after"])
))]
pub struct MvArgs {
    /// Task ID
    pub id: TaskId,
    /// Move to the top of the list
    #[arg(long)]
    pub top: bool,
    /// Move to the bottom of the list
    #[arg(long)]
    pub bottom: bool,
    /// Move before this task
    #[arg(long, value_name = "ID")]
    pub before: Option<TaskId>,
    /// Move after this task
    #[arg(long, value_name = "ID")]
    pub after: Option<TaskId>,
}

fn parse_due(s: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{}' (expected YYYY-MM-DD)", s))
}
