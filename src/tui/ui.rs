use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use super::app::{App, InputMode};
use crate::clock::Clock;
use crate::models::Priority;

pub fn ui<C: Clock>(f: &mut Frame, app: &mut App<C>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),    // Table
            Constraint::Length(3), // Status
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    let now = app.manager.clock().now();
    let rows: Vec<Row> = app
        .visible_tasks()
        .iter()
        .map(|t| {
            let style = if t.is_completed() {
                Style::default().fg(Color::DarkGray)
            } else if t.is_overdue(now) {
                Style::default().fg(Color::Red)
            } else {
                match t.priority() {
                    Priority::High => Style::default().fg(Color::Yellow),
                    Priority::Medium => Style::default(),
                    Priority::Low => Style::default().fg(Color::Green),
                }
            };

            Row::new(vec![
                Cell::from(t.id().map(|id| id.to_string()).unwrap_or_default()),
                Cell::from(t.title().to_string()),
                Cell::from(t.description().to_string()),
                Cell::from(t.priority().symbol()),
                Cell::from(t.due_date().map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default()),
                Cell::from(t.due_label(now).unwrap_or_default()),
                Cell::from(if t.is_completed() { "Done" } else { "Pending" }),
            ])
            .style(style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),
        Constraint::Min(20),
        Constraint::Min(20),
        Constraint::Length(9),
        Constraint::Length(12),
        Constraint::Length(12),
        Constraint::Length(8),
    ];

    let mut title = format!("Tasknest - {}", app.view.title());
    if let Some(q) = &app.search {
        title.push_str(&format!(" (search: {})", q));
    }

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec!["ID", "Title", "Description", "Priority", "Due", "Time Left", "Status"])
                .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .bottom_margin(1),
        )
        .block(Block::default().borders(Borders::ALL).title(title))
        .row_highlight_style(Style::default().add_modifier(Modifier::BOLD).bg(Color::DarkGray))
        .highlight_symbol(">> ");

    f.render_stateful_widget(table, chunks[0], &mut app.state);

    let count = app.manager.task_count();
    let status_text = format!(
        "Total {} | Pending {} | Completed {} | Overdue {}   {}",
        count.total, count.pending, count.completed, count.overdue, app.status
    );
    let status = Paragraph::new(status_text).block(Block::default().borders(Borders::ALL));
    f.render_widget(status, chunks[1]);

    let help_text = match app.input_mode {
        InputMode::Normal => "q: Quit | a: Add | Space: Done | d: Del | v: View | p: Priority | /: Search | Esc: Clear Search | e: Export",
        InputMode::Adding => "Enter: Next Step | Esc: Cancel",
        InputMode::Searching => "Enter: Search (empty clears) | Esc: Cancel",
    };

    let help = Paragraph::new(help_text)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL));

    f.render_widget(help, chunks[2]);

    let prompt = match app.input_mode {
        InputMode::Normal => return,
        InputMode::Searching => "Search title or description",
        InputMode::Adding => match app.add_state.step {
            0 => "Add Task: Enter Title",
            1 => "Add Task: Enter Description (Optional)",
            2 => "Add Task: Enter Priority (low/medium/high, default medium)",
            3 => "Add Task: Enter Due Date (YYYY-MM-DD or +N days, Optional)",
            _ => "Add Task",
        },
    };

    let area = centered_rect(60, 3, f.area());
    f.render_widget(Clear, area);
    let input = Paragraph::new(app.input_buffer.as_str())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL).title(prompt));
    f.render_widget(input, area);
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let margin = r.height.saturating_sub(height) / 2;
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(margin),
            Constraint::Length(height),
            Constraint::Length(margin),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
