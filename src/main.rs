use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{bail, eyre};

use kdesk::app;
use kdesk::board::slot::FileSlot;
use kdesk::board::store::{Store, StoreError};
use kdesk::board::{Board, ColumnId, Task};
use kdesk::ui::board_view::format_card_date;

#[derive(Parser)]
#[command(name = "kdesk", about = "A keyboard-first kanban task board for the terminal")]
struct Cli {
    /// Path to the board file (default: per-user data directory)
    #[arg(long, env = "KDESK_BOARD", global = true, value_name = "PATH")]
    board: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Add a new task
    Add {
        /// Task title
        title: String,
        /// Task description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Target column (todo, in-progress, done)
        #[arg(short, long, default_value = "todo")]
        column: ColumnId,
    },
    /// List tasks column by column
    List {
        /// Only show this column
        #[arg(short, long)]
        column: Option<ColumnId>,
    },
    /// Edit a task's title and/or description
    Edit {
        /// Task id (a unique prefix is enough)
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New description
        #[arg(short, long)]
        description: Option<String>,
    },
    /// Delete a task
    Delete {
        /// Task id (a unique prefix is enough)
        id: String,
    },
    /// Move a task to a column
    Move {
        /// Task id (a unique prefix is enough)
        id: String,
        /// Target column (todo, in-progress, done)
        column: ColumnId,
        /// Position within the column (default: end)
        #[arg(long)]
        at: Option<usize>,
    },
}

fn main() {
    // Install color_eyre for unexpected panics/errors (developer bugs).
    let _ = color_eyre::install();
    let cli = Cli::parse();

    let result = run(cli);
    if let Err(e) = result {
        print_user_error(&e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> color_eyre::Result<()> {
    let path = match cli.board {
        Some(path) => path,
        None => default_board_path()?,
    };

    match cli.command {
        Some(command) => {
            init_tracing();
            match command {
                Command::Add {
                    title,
                    description,
                    column,
                } => cmd_add(&path, &title, &description, column),
                Command::List { column } => cmd_list(&path, column),
                Command::Edit {
                    id,
                    title,
                    description,
                } => cmd_edit(&path, &id, title, description),
                Command::Delete { id } => cmd_delete(&path, &id),
                Command::Move { id, column, at } => cmd_move(&path, &id, column, at),
            }
        }
        None => cmd_tui(path),
    }
}

/// The per-user board slot, the terminal analog of the browser profile's
/// local storage.
fn default_board_path() -> color_eyre::Result<PathBuf> {
    let dirs = directories::ProjectDirs::from("", "", "kdesk")
        .ok_or_else(|| eyre!("cannot determine a data directory for the board"))?;
    Ok(dirs.data_dir().join("todo-board.json"))
}

/// Stderr diagnostics for CLI runs, `RUST_LOG`-filtered. The TUI stays
/// silent; a subscriber writing to the alternate screen would corrupt it.
fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

/// Print a user-friendly error message, with actionable hints for known
/// error types.
fn print_user_error(error: &color_eyre::Report) {
    if let Some(store_err) = error.downcast_ref::<StoreError>() {
        match store_err {
            StoreError::Slot(e) => {
                eprintln!("error: could not read or write the board file.");
                eprintln!("  {e}");
            }
            StoreError::Codec(e) => {
                eprintln!("error: failed to encode the board.");
                eprintln!("  {e}");
            }
            StoreError::IndexOutOfRange { column, index, len } => {
                eprintln!("error: position {index} is out of range for '{column}' ({len} tasks).");
                eprintln!("  Use --at with a position between 0 and the column length.");
            }
        }
        return;
    }

    // For eyre!() / bail!() messages, print the full error chain.
    // These are already human-readable strings like "Task 'abc' not found".
    eprintln!("error: {e:#}", e = error);
}

fn open_store(path: &Path) -> Result<Store<FileSlot>, StoreError> {
    Store::open(FileSlot::new(path))
}

/// A display-friendly id prefix (the first uuid group).
fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}

/// Resolve a full id or unique id prefix to a task's full id.
fn resolve_task_id(board: &Board, needle: &str) -> color_eyre::Result<String> {
    let matches: Vec<&Task> = board
        .columns()
        .flat_map(|(_, col)| col.items.iter())
        .filter(|t| t.id.starts_with(needle))
        .collect();

    match matches.as_slice() {
        [] => bail!("Task '{}' not found", needle),
        [task] => Ok(task.id.clone()),
        many => {
            if let Some(exact) = many.iter().find(|t| t.id == needle) {
                return Ok(exact.id.clone());
            }
            bail!(
                "Task id '{}' is ambiguous ({} matches); use more characters",
                needle,
                many.len()
            )
        }
    }
}

fn cmd_add(path: &Path, title: &str, description: &str, column: ColumnId) -> color_eyre::Result<()> {
    let mut store = open_store(path)?;
    let task = store.add_task(column, title, description)?;
    println!("Created {}: {}", short_id(&task.id), task.title);
    Ok(())
}

fn cmd_list(path: &Path, column: Option<ColumnId>) -> color_eyre::Result<()> {
    let store = open_store(path)?;

    for (id, col) in store.board().columns() {
        if let Some(only) = column {
            if id != only {
                continue;
            }
        }

        println!("\n{} ({})", col.title, col.items.len());
        println!("{}", "─".repeat(40));
        for task in &col.items {
            let desc = if task.description.is_empty() {
                String::new()
            } else {
                format!("  — {}", task.description)
            };
            println!(
                "  {}  {}{}  ({})",
                short_id(&task.id),
                task.title,
                desc,
                format_card_date(task.updated_at),
            );
        }
    }
    println!();
    Ok(())
}

fn cmd_edit(
    path: &Path,
    id: &str,
    title: Option<String>,
    description: Option<String>,
) -> color_eyre::Result<()> {
    if title.is_none() && description.is_none() {
        bail!("Nothing to change; pass --title and/or --description");
    }

    let mut store = open_store(path)?;
    let task_id = resolve_task_id(store.board(), id)?;
    let (column, index) = store
        .board()
        .find_task(&task_id)
        .ok_or_else(|| eyre!("Task '{}' not found", id))?;

    let current = &store.board().column(column).items[index];
    let new_title = title.unwrap_or_else(|| current.title.clone());
    let new_description = description.unwrap_or_else(|| current.description.clone());

    store.edit_task(column, &task_id, new_title, new_description)?;
    println!("Updated {}", short_id(&task_id));
    Ok(())
}

fn cmd_delete(path: &Path, id: &str) -> color_eyre::Result<()> {
    let mut store = open_store(path)?;
    let task_id = resolve_task_id(store.board(), id)?;
    let (column, index) = store
        .board()
        .find_task(&task_id)
        .ok_or_else(|| eyre!("Task '{}' not found", id))?;
    let title = store.board().column(column).items[index].title.clone();

    store.delete_task(column, &task_id)?;
    println!("Deleted {}: {}", short_id(&task_id), title);
    Ok(())
}

fn cmd_move(path: &Path, id: &str, column: ColumnId, at: Option<usize>) -> color_eyre::Result<()> {
    let mut store = open_store(path)?;
    let task_id = resolve_task_id(store.board(), id)?;
    let (from, from_index) = store
        .board()
        .find_task(&task_id)
        .ok_or_else(|| eyre!("Task '{}' not found", id))?;

    if from == column && at.is_none() {
        println!("Task is already in '{}'", column);
        return Ok(());
    }

    let to_len = store.board().column(column).items.len();
    let to_index = at.unwrap_or(if from == column {
        to_len.saturating_sub(1)
    } else {
        to_len
    });

    store.move_task(from, from_index, column, to_index)?;
    println!(
        "Moved {} to {}",
        short_id(&task_id),
        store.board().column(column).title
    );
    Ok(())
}

fn cmd_tui(path: PathBuf) -> color_eyre::Result<()> {
    let mut store = Store::open(FileSlot::new(path))?;
    let mut terminal = ratatui::init();
    let result = app::run(&mut terminal, &mut store);
    ratatui::restore();
    result
}
