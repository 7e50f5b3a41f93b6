//! Command implementations for the CLI interface.
//!
//! Each handler drives the same `TaskStore` the TUI uses, so validation,
//! persistence and list derivation behave identically on both surfaces.

use std::io;

use clap::{CommandFactory, Subcommand};
use clap_complete::{generate, Shell};

use crate::cli::Cli;
use crate::dates::{format_due_relative, today, truncate};
use crate::error::AppError;
use crate::fields::*;
use crate::store::TaskStore;
use crate::task::{Task, TaskDraft};
use crate::tui::run::run_tui;

/// Message shown when the derived list is empty.
pub const EMPTY_LIST_MESSAGE: &str = "No tasks found for this filter.";

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI (default).
    Ui,

    /// Add a new task.
    Add {
        /// What needs doing.
        description: String,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", "in Nd" or a weekday.
        #[arg(long)]
        due: String,
        /// Category: personal | work.
        #[arg(long, value_enum, default_value_t = Category::Personal)]
        category: Category,
    },

    /// List tasks of one category with optional filters.
    List {
        /// Category to show.
        #[arg(long, value_enum, default_value_t = Category::Personal)]
        category: Category,
        /// Status filter: all | pending | completed.
        #[arg(long, value_enum, default_value_t = StatusFilter::All)]
        status: StatusFilter,
        /// Secondary sort by due date.
        #[arg(long, value_enum)]
        sort: Option<SortDirection>,
        /// Case-insensitive description search.
        #[arg(long)]
        search: Option<String>,
    },

    /// Update fields on a task.
    Update {
        /// Task ID, ID prefix or description.
        task: String,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        due: Option<String>,
    },

    /// Toggle a task between pending and completed.
    Toggle {
        /// Task ID, ID prefix or description.
        task: String,
    },

    /// Delete a task.
    Delete {
        /// Task ID, ID prefix or description.
        task: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Launch the terminal user interface.
pub fn cmd_ui(store: TaskStore) -> Result<(), AppError> {
    run_tui(store)?;
    Ok(())
}

/// Add a new task after form-boundary validation.
pub fn cmd_add(store: &mut TaskStore, description: String, due: String, category: Category) -> Result<(), AppError> {
    let draft = TaskDraft { description, category, due };
    let new_task = draft.validate(today())?;
    let id = store.add(new_task);
    println!("Added task {}", id);
    Ok(())
}

/// Print the derived list for one category.
pub fn cmd_list(
    store: &mut TaskStore,
    category: Category,
    status: StatusFilter,
    sort: Option<SortDirection>,
    search: Option<String>,
) {
    store.set_active_category(category);
    store.set_status_filter(status);
    if let Some(direction) = sort {
        store.set_sort(Some(SortField::DueDate), Some(direction));
    }
    if let Some(text) = search {
        store.set_search_text(text);
    }

    let tasks = store.visible_tasks();
    if tasks.is_empty() {
        println!("{}", EMPTY_LIST_MESSAGE);
        return;
    }
    print_table(&tasks);
}

/// Update an existing task's fields. Unset flags keep their current values.
pub fn cmd_update(
    store: &mut TaskStore,
    task: String,
    desc: Option<String>,
    category: Option<Category>,
    due: Option<String>,
) -> Result<(), AppError> {
    let id = store.resolve(&task)?;
    let Some(current) = store.get(id).cloned() else {
        return Err(AppError::TaskNotFound(task));
    };

    let draft = TaskDraft {
        description: desc.unwrap_or_else(|| current.description.clone()),
        category: category.unwrap_or(current.category),
        due: due.unwrap_or_else(|| current.due_date.to_string()),
    };
    let updated = draft.apply_to(&current, today())?;
    store.begin_edit(id);
    store.update(updated);
    println!("Updated task {}", id);
    Ok(())
}

/// Flip a task's completion flag.
pub fn cmd_toggle(store: &mut TaskStore, task: String) -> Result<(), AppError> {
    let id = store.resolve(&task)?;
    store.toggle_completion(id);
    let state = match store.get(id) {
        Some(t) if t.completed => "completed",
        _ => "pending",
    };
    println!("Task {} marked {}", id, state);
    Ok(())
}

/// Delete a task.
pub fn cmd_delete(store: &mut TaskStore, task: String) -> Result<(), AppError> {
    let id = store.resolve(&task)?;
    store.delete(id);
    println!("Deleted task {}", id);
    Ok(())
}

/// Generate shell completion script.
pub fn cmd_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    println!(
        "{:<9} {:<10} {:<10} {:<10} {}",
        "ID", "Status", "Due", "When", "Description"
    );
    let today = today();
    for t in tasks {
        let short_id: String = t.id.to_string().chars().take(8).collect();
        println!(
            "{:<9} {:<10} {:<10} {:<10} {}",
            short_id,
            if t.completed { "Completed" } else { "Pending" },
            t.due_date,
            format_due_relative(t.due_date, today),
            truncate(&t.description, 60)
        );
    }
}
