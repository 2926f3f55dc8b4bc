use std::path::PathBuf;

use ratatui::widgets::TableState;

use crate::clock::{Clock, SystemClock};
use crate::manager::TaskManager;
use crate::models::{parse_due_date, NewTask, Priority, Task};
use crate::storage::write_export;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Adding,
    Searching,
}

/// Which slice of the task list is on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    All,
    Pending,
    Completed,
    Overdue,
    Priority(Priority),
}

impl View {
    pub fn title(self) -> String {
        match self {
            View::All => "All".to_string(),
            View::Pending => "Pending".to_string(),
            View::Completed => "Completed".to_string(),
            View::Overdue => "Overdue".to_string(),
            View::Priority(p) => format!("Priority {}", p.symbol()),
        }
    }
}

/// State for the multi-step "Add Task" wizard.
#[derive(Debug, Default)]
pub struct AddState {
    pub step: usize, // 0: Title, 1: Description, 2: Priority, 3: Due
    pub draft: NewTask,
}

pub struct App<C: Clock = SystemClock> {
    pub manager: TaskManager<C>,
    pub state: TableState,
    pub view: View,
    /// Priority shown by the priority view.
    pub priority_filter: Priority,
    pub input_mode: InputMode,
    pub input_buffer: String,
    pub add_state: AddState,
    pub search: Option<String>,
    pub status: String,
    pub export_dir: PathBuf,
}

impl<C: Clock> App<C> {
    pub fn new(manager: TaskManager<C>, export_dir: PathBuf) -> App<C> {
        let mut app = App {
            manager,
            state: TableState::default(),
            view: View::All,
            priority_filter: Priority::High,
            input_mode: InputMode::Normal,
            input_buffer: String::new(),
            add_state: AddState::default(),
            search: None,
            status: String::new(),
            export_dir,
        };
        app.refresh_selection();
        app
    }

    /// Tasks in the current view, narrowed by the active search.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        let base: Vec<&Task> = match self.view {
            View::All => self.manager.tasks().iter().collect(),
            View::Pending => self.manager.pending_tasks(),
            View::Completed => self.manager.completed_tasks(),
            View::Overdue => self.manager.overdue_tasks(),
            View::Priority(p) => self.manager.tasks_by_priority(p),
        };
        match &self.search {
            Some(query) => {
                let hits: Vec<Option<u64>> = self
                    .manager
                    .search_tasks(query)
                    .iter()
                    .map(|t| t.id())
                    .collect();
                base.into_iter().filter(|t| hits.contains(&t.id())).collect()
            }
            None => base,
        }
    }

    pub fn selected_id(&self) -> Option<u64> {
        let i = self.state.selected()?;
        self.visible_tasks().get(i).and_then(|t| t.id())
    }

    /// Selects the next row, wrapping to the top.
    pub fn next(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row, wrapping to the bottom.
    pub fn previous(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    pub fn complete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        self.status = if self.manager.complete_task(id) {
            format!("Task {} marked as complete.", id)
        } else {
            format!("Task {} not found.", id)
        };
        self.refresh_selection();
    }

    pub fn delete_selected(&mut self) {
        let Some(id) = self.selected_id() else { return };
        self.status = if self.manager.remove_task(id) {
            format!("Task {} removed.", id)
        } else {
            format!("Task {} not found.", id)
        };
        self.refresh_selection();
    }

    /// Cycles All -> Pending -> Completed -> Overdue -> Priority -> All.
    pub fn cycle_view(&mut self) {
        self.view = match self.view {
            View::All => View::Pending,
            View::Pending => View::Completed,
            View::Completed => View::Overdue,
            View::Overdue => View::Priority(self.priority_filter),
            View::Priority(_) => View::All,
        };
        self.refresh_selection();
    }

    /// Switches to the priority view, advancing the priority if already there.
    pub fn cycle_priority(&mut self) {
        if let View::Priority(_) = self.view {
            self.priority_filter = self.priority_filter.cycle();
        }
        self.view = View::Priority(self.priority_filter);
        self.refresh_selection();
    }

    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    pub fn start_search(&mut self) {
        self.input_mode = InputMode::Searching;
        self.input_buffer = self.search.clone().unwrap_or_default();
    }

    pub fn clear_search(&mut self) {
        self.search = None;
        self.refresh_selection();
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_buffer.clear();
    }

    /// Writes the current export into the export directory.
    pub fn export(&mut self) {
        let taken_at = self.manager.clock().now();
        let result = self
            .manager
            .export_to_json()
            .and_then(|json| write_export(&self.export_dir, &json, taken_at));
        self.status = match result {
            Ok(path) => format!("Exported {} tasks to {}", self.manager.len(), path.display()),
            Err(e) => format!("Export failed: {}", e),
        };
    }

    /// Handles Enter based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Searching => self.handle_search_input(),
            InputMode::Normal => {}
        }
    }

    fn handle_search_input(&mut self) {
        let query = self.input_buffer.trim().to_string();
        self.search = if query.is_empty() { None } else { Some(query) };
        self.status = match &self.search {
            Some(q) => format!("{} tasks match '{}'", self.manager.search_tasks(q).len(), q),
            None => "Search cleared.".to_string(),
        };
        self.cancel_input();
        self.refresh_selection();
    }

    fn handle_adding_input(&mut self) {
        match self.add_state.step {
            0 => {
                self.add_state.draft.title = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            1 => {
                self.add_state.draft.description = self.input_buffer.clone();
                self.add_state.step += 1;
                self.input_buffer.clear();
            }
            2 => {
                let input = self.input_buffer.trim();
                let priority = if input.is_empty() {
                    Ok(Priority::default())
                } else {
                    input.parse::<Priority>()
                };
                match priority {
                    Ok(p) => {
                        self.add_state.draft.priority = p;
                        self.add_state.step += 1;
                        self.input_buffer.clear();
                    }
                    Err(e) => self.status = e.to_string(),
                }
            }
            3 => {
                let input = self.input_buffer.trim();
                if !input.is_empty() {
                    match parse_due_date(input, self.manager.clock().now()) {
                        Ok(due) => self.add_state.draft.due_date = Some(due),
                        Err(e) => {
                            self.status = e.to_string();
                            return;
                        }
                    }
                }
                let draft = std::mem::take(&mut self.add_state.draft);
                self.status = match self.manager.add_task(draft) {
                    Ok(task) => format!("Task added (id = {})", task.id().unwrap_or_default()),
                    Err(e) => e.to_string(),
                };
                self.cancel_input();
                self.refresh_selection();
            }
            _ => {}
        }
    }

    /// Keeps the selection inside the visible rows.
    fn refresh_selection(&mut self) {
        let len = self.visible_tasks().len();
        if len == 0 {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= len {
                self.state.select(Some(len - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use chrono::{Duration, Local, TimeZone};
    use std::rc::Rc;

    fn app_with_tasks() -> (App<Rc<ManualClock>>, Rc<ManualClock>) {
        let start = Local.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
        let clock = Rc::new(ManualClock::new(start));
        let mut manager = TaskManager::with_clock(Rc::clone(&clock));
        manager
            .add_task(NewTask::new("Write report").priority(Priority::High))
            .unwrap();
        manager
            .add_task(NewTask::new("Pay rent").due(start - Duration::days(1)))
            .unwrap();
        manager
            .add_task(NewTask::new("Read book").description("fiction").priority(Priority::Low))
            .unwrap();
        (App::new(manager, PathBuf::from(".")), clock)
    }

    fn type_line(app: &mut App<Rc<ManualClock>>, text: &str) {
        app.input_buffer = text.to_string();
        app.handle_input();
    }

    #[test]
    fn test_add_wizard_creates_task() {
        let (mut app, _clock) = app_with_tasks();
        app.start_add();
        type_line(&mut app, "Call mom");
        type_line(&mut app, "Sunday");
        type_line(&mut app, "high");
        type_line(&mut app, "+2");

        assert_eq!(app.input_mode, InputMode::Normal);
        let task = app.manager.get_task_by_id(4).unwrap();
        assert_eq!(task.title(), "Call mom");
        assert_eq!(task.description(), "Sunday");
        assert_eq!(task.priority(), Priority::High);
        assert!(task.due_date().is_some());
        assert_eq!(app.status, "Task added (id = 4)");
    }

    #[test]
    fn test_add_wizard_reports_empty_title() {
        let (mut app, _clock) = app_with_tasks();
        app.start_add();
        type_line(&mut app, "   ");
        type_line(&mut app, "");
        type_line(&mut app, "");
        type_line(&mut app, "");

        assert_eq!(app.manager.len(), 3);
        assert_eq!(app.manager.next_id(), 4);
        assert_eq!(app.status, "Task title cannot be empty");
    }

    #[test]
    fn test_add_wizard_stays_on_bad_priority() {
        let (mut app, _clock) = app_with_tasks();
        app.start_add();
        type_line(&mut app, "Plan trip");
        type_line(&mut app, "");
        type_line(&mut app, "urgent");

        assert_eq!(app.add_state.step, 2);
        assert_eq!(app.input_mode, InputMode::Adding);
        assert!(app.status.contains("Invalid priority"));
    }

    #[test]
    fn test_views_follow_manager_filters() {
        let (mut app, _clock) = app_with_tasks();
        assert_eq!(app.visible_tasks().len(), 3);

        app.cycle_view();
        assert_eq!(app.view, View::Pending);
        app.cycle_view();
        assert_eq!(app.view, View::Completed);
        assert!(app.visible_tasks().is_empty());
        assert_eq!(app.state.selected(), None);

        app.cycle_view();
        assert_eq!(app.view, View::Overdue);
        let overdue: Vec<&str> = app.visible_tasks().iter().map(|t| t.title()).collect();
        assert_eq!(overdue, vec!["Pay rent"]);

        app.cycle_priority();
        assert_eq!(app.view, View::Priority(Priority::High));
        app.cycle_priority();
        assert_eq!(app.view, View::Priority(Priority::Low));
        let low: Vec<&str> = app.visible_tasks().iter().map(|t| t.title()).collect();
        assert_eq!(low, vec!["Read book"]);
    }

    #[test]
    fn test_complete_and_delete_selected() {
        let (mut app, _clock) = app_with_tasks();
        app.next();
        assert_eq!(app.selected_id(), Some(2));
        app.complete_selected();
        assert!(app.manager.get_task_by_id(2).unwrap().is_completed());
        assert_eq!(app.status, "Task 2 marked as complete.");

        app.previous();
        app.delete_selected();
        assert!(app.manager.get_task_by_id(1).is_none());
        assert_eq!(app.manager.len(), 2);
    }

    #[test]
    fn test_search_narrows_view() {
        let (mut app, _clock) = app_with_tasks();
        app.start_search();
        type_line(&mut app, "FICTION");
        assert_eq!(app.search.as_deref(), Some("FICTION"));
        let titles: Vec<&str> = app.visible_tasks().iter().map(|t| t.title()).collect();
        assert_eq!(titles, vec!["Read book"]);

        app.start_search();
        type_line(&mut app, "");
        assert!(app.search.is_none());
        assert_eq!(app.visible_tasks().len(), 3);
    }

    #[test]
    fn test_overdue_view_tracks_clock() {
        let (mut app, clock) = app_with_tasks();
        app.start_add();
        type_line(&mut app, "Dentist");
        type_line(&mut app, "");
        type_line(&mut app, "");
        type_line(&mut app, "+1");

        app.view = View::Overdue;
        assert_eq!(app.visible_tasks().len(), 1);
        clock.advance(Duration::days(2));
        assert_eq!(app.visible_tasks().len(), 2);
    }

    #[test]
    fn test_export_writes_file() {
        let (mut app, _clock) = app_with_tasks();
        let dir = tempfile::tempdir().unwrap();
        app.export_dir = dir.path().to_path_buf();
        app.export();
        assert!(app.status.starts_with("Exported 3 tasks to"));
        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 1);

        // a second export under the same clock reading adds a file
        app.export();
        let written = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(written, 2);
    }
}
