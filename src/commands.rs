use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use chrono::Duration;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};

use crate::clock::Clock;
use crate::manager::{TaskCount, TaskManager};
use crate::models::{NewTask, Priority, Task};
use crate::storage::write_export;

/// Options for `tasknest demo`.
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    /// Print the JSON export instead of tables.
    pub json: bool,
    /// Save the JSON export into this directory.
    pub save_to: Option<PathBuf>,
    /// Query to demonstrate search with.
    pub search: String,
}

/// Loads the demonstration task set and completes the shopping task.
pub fn seed_demo<C: Clock>(manager: &mut TaskManager<C>) -> Result<()> {
    let now = manager.clock().now();
    manager.add_task(
        NewTask::new("Study Rust")
            .description("Review ownership, traits and unit testing")
            .priority(Priority::High)
            .due(now + Duration::days(3)),
    )?;
    let shopping = manager
        .add_task(
            NewTask::new("Go shopping")
                .description("Buy ingredients for dinner")
                .priority(Priority::Medium)
                .due(now + Duration::days(1)),
        )?
        .id()
        .context("demo task was stored without an id")?;
    manager.add_task(
        NewTask::new("Exercise")
            .description("Go to the gym or take a walk")
            .priority(Priority::Low)
            .due(now + Duration::days(2)),
    )?;
    manager.add_task(
        NewTask::new("Overdue task")
            .description("This task is past its due date")
            .priority(Priority::High)
            .due(now - Duration::days(1)),
    )?;
    ensure!(
        manager.complete_task(shopping),
        "demo task {} not found",
        shopping
    );
    Ok(())
}

/// Runs the demonstration: seeds a fresh manager and prints what it holds.
pub fn cmd_demo(opts: DemoOptions) -> Result<()> {
    let mut manager = TaskManager::new();
    seed_demo(&mut manager)?;

    if opts.json || opts.save_to.is_some() {
        let json = manager.export_to_json()?;
        if let Some(dir) = &opts.save_to {
            let path = write_export(dir, &json, manager.clock().now())?;
            println!("Export saved to {}", path.display());
        }
        if opts.json {
            println!("{json}");
        }
        return Ok(());
    }

    println!("{}", stats_table(&manager.task_count()));
    println!("Pending tasks");
    println!("{}", task_table(&manager.pending_tasks(), manager.clock()));
    println!("Completed tasks");
    println!("{}", task_table(&manager.completed_tasks(), manager.clock()));
    println!("Search for '{}'", opts.search);
    println!("{}", task_table(&manager.search_tasks(&opts.search), manager.clock()));
    Ok(())
}

/// Renders task totals as a two-column table.
pub fn stats_table(count: &TaskCount) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        Cell::new("Statistic").add_attribute(Attribute::Bold),
        Cell::new("Count").add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![Cell::new("Total"), Cell::new(count.total)]);
    table.add_row(vec![Cell::new("Pending"), Cell::new(count.pending)]);
    table.add_row(vec![Cell::new("Completed"), Cell::new(count.completed)]);
    table.add_row(vec![
        Cell::new("Overdue"),
        Cell::new(count.overdue).fg(if count.overdue > 0 { Color::Red } else { Color::Reset }),
    ]);
    table
}

/// Renders tasks in insertion order.
pub fn task_table(tasks: &[&Task], clock: &impl Clock) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Title").add_attribute(Attribute::Bold),
            Cell::new("Description").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Time Left").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    let now = clock.now();
    for t in tasks {
        let priority_color = match t.priority() {
            Priority::High => Color::Red,
            Priority::Medium => Color::Yellow,
            Priority::Low => Color::Green,
        };
        let (status, status_color) = if t.is_completed() {
            let done = t
                .completed_at()
                .map(|at| format!("Done {}", at.format("%d/%m/%Y %H:%M")))
                .unwrap_or_else(|| "Done".to_string());
            (done, Color::Green)
        } else if t.is_overdue(now) {
            ("Overdue".to_string(), Color::Red)
        } else {
            ("Pending".to_string(), Color::Yellow)
        };

        table.add_row(vec![
            Cell::new(t.id().map(|id| id.to_string()).unwrap_or_default()),
            Cell::new(t.title()),
            Cell::new(t.description()),
            Cell::new(t.priority().symbol()).fg(priority_color),
            Cell::new(t.due_date().map(|d| d.format("%d/%m/%Y").to_string()).unwrap_or_default()),
            Cell::new(t.due_label(now).unwrap_or_default()),
            Cell::new(status).fg(status_color),
        ]);
    }
    table
}
