use std::path::Path;

use chrono::Local;

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::persistence::FileStore;
use crate::model::config::Config;
use crate::model::task::TaskId;
use crate::ops::filter::build_view;
use crate::ops::task_ops::{InsertPosition, Outcome, TaskStore};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

/// Run a subcommand. The no-subcommand case (TUI) is handled in main.rs.
pub fn dispatch(cli: Cli, config: &Config) -> CmdResult {
    let json = cli.json;
    let Some(command) = cli.command else {
        return Err("no command given (try `ck --help`)".into());
    };
    let mut store = open_store(cli.file.as_deref(), config)?;

    match command {
        Commands::List(args) => cmd_list(&store, args, config, json),
        Commands::Add(args) => cmd_add(&mut store, args, json),
        Commands::Toggle(args) => cmd_toggle(&mut store, args, json),
        Commands::Edit(args) => cmd_edit(&mut store, args),
        Commands::Rm(args) => cmd_rm(&mut store, args),
        Commands::Mv(args) => cmd_mv(&mut store, args),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn open_store(file: Option<&Path>, config: &Config) -> Result<TaskStore, Box<dyn std::error::Error>> {
    let path = config_io::resolve_task_file(file, config)
        .ok_or("cannot locate a data directory; pass --file or set CHECKLIST_FILE")?;
    let outcome = TaskStore::open(Box::new(FileStore::new(path)));
    Ok(report(outcome))
}

/// Print a persistence warning, if any, and unwrap the value.
fn report<T>(outcome: Outcome<T>) -> T {
    if let Some(warning) = &outcome.warning {
        eprintln!("warning: {}", warning);
    }
    outcome.value
}

fn require(store: &TaskStore, id: TaskId) -> CmdResult {
    if store.contains(id) {
        Ok(())
    } else {
        Err(format!("task not found: {}", id).into())
    }
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

fn cmd_list(store: &TaskStore, args: ListArgs, config: &Config, json: bool) -> CmdResult {
    let filter = args.filter.unwrap_or(config.ui.default_filter);
    let today = Local::now().date_naive();
    let view = build_view(store.tasks(), filter, today, &config.ui.date_format);

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
    } else {
        for line in format_list(&view) {
            println!("{}", line);
        }
        if view.total > 0 {
            println!();
            println!("{}", format_summary(&view));
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write commands
// ---------------------------------------------------------------------------

fn cmd_add(store: &mut TaskStore, args: AddArgs, json: bool) -> CmdResult {
    let text = args.text.join(" ");
    let id = report(store.add(&text, args.due)?);
    if json {
        println!("{}", serde_json::to_string(&AddedJson { id })?);
    } else {
        println!("{}", id);
    }
    Ok(())
}

fn cmd_toggle(store: &mut TaskStore, args: IdArgs, json: bool) -> CmdResult {
    require(store, args.id)?;
    let completed = report(store.toggle_completed(args.id))
        .ok_or_else(|| format!("task not found: {}", args.id))?;
    if json {
        println!(
            "{}",
            serde_json::to_string(&ToggledJson {
                id: args.id,
                completed
            })?
        );
    } else {
        let state = if completed { "completed" } else { "pending" };
        println!("{} {}", args.id, state);
    }
    Ok(())
}

fn cmd_edit(store: &mut TaskStore, args: EditArgs) -> CmdResult {
    require(store, args.id)?;
    let text = args.text.join(" ");
    report(store.edit(args.id, &text)?);
    Ok(())
}

/// Deletes at once; the fade-out delay only applies to interactive use.
fn cmd_rm(store: &mut TaskStore, args: IdArgs) -> CmdResult {
    require(store, args.id)?;
    report(store.delete(args.id));
    Ok(())
}

fn cmd_mv(store: &mut TaskStore, args: MvArgs) -> CmdResult {
    let position = if args.top {
        InsertPosition::Top
    } else if let Some(anchor) = args.before {
        InsertPosition::Before(anchor)
    } else if let Some(anchor) = args.after {
        InsertPosition::After(anchor)
    } else {
        InsertPosition::Bottom
    };
    report(store.move_task(args.id, position)?);
    Ok(())
}
