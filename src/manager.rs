use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::clock::{Clock, SystemClock};
use crate::error::{Result, TaskError};
use crate::models::{NewTask, Priority, Task};
use crate::storage::ExportDocument;

/// Task totals, recomputed on every call.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskCount {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    pub overdue: usize,
}

/// Owns the task list and hands out ids.
///
/// Tasks keep insertion order. Ids start at 1 and are never reused, even
/// after the task holding one is removed.
#[derive(Debug)]
pub struct TaskManager<C: Clock = SystemClock> {
    tasks: Vec<Task>,
    next_id: u64,
    clock: C,
}

impl TaskManager<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl Default for TaskManager<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> TaskManager<C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            tasks: Vec::new(),
            next_id: 1,
            clock,
        }
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// The id the next successful `add_task` will assign.
    pub fn next_id(&self) -> u64 {
        self.next_id
    }

    /// Validates and stores a new task.
    ///
    /// Fails with [`TaskError::EmptyTitle`] if the title is blank after
    /// trimming, in which case nothing is stored and no id is consumed.
    pub fn add_task(&mut self, draft: NewTask) -> Result<&Task> {
        if draft.title.trim().is_empty() {
            warn!("rejected task with empty title");
            return Err(TaskError::EmptyTitle);
        }

        let mut task = Task::new(draft, self.clock.now());
        let id = self.next_id;
        task.assign_id(id);
        debug!(id, title = task.title(), priority = %task.priority(), "task added");

        let idx = self.tasks.len();
        self.tasks.push(task);
        self.next_id += 1;
        Ok(&self.tasks[idx])
    }

    pub fn get_task_by_id(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == Some(id))
    }

    /// Marks a task done. Returns `false` if no task has this id.
    pub fn complete_task(&mut self, id: u64) -> bool {
        let now = self.clock.now();
        match self.tasks.iter_mut().find(|t| t.id() == Some(id)) {
            Some(task) => {
                task.mark_completed(now);
                debug!(id, "task completed");
                true
            }
            None => {
                debug!(id, "complete: task not found");
                false
            }
        }
    }

    /// Deletes a task. Returns `false` if no task has this id.
    pub fn remove_task(&mut self, id: u64) -> bool {
        match self.tasks.iter().position(|t| t.id() == Some(id)) {
            Some(idx) => {
                self.tasks.remove(idx);
                debug!(id, "task removed");
                true
            }
            None => {
                debug!(id, "remove: task not found");
                false
            }
        }
    }

    pub fn pending_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| !t.is_completed()).collect()
    }

    pub fn completed_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| t.is_completed()).collect()
    }

    pub fn overdue_tasks(&self) -> Vec<&Task> {
        let now = self.clock.now();
        self.tasks.iter().filter(|t| t.is_overdue(now)).collect()
    }

    /// Pending tasks with the given priority. Completed tasks are left out.
    pub fn tasks_by_priority(&self, priority: Priority) -> Vec<&Task> {
        self.tasks
            .iter()
            .filter(|t| t.priority() == priority && !t.is_completed())
            .collect()
    }

    pub fn task_count(&self) -> TaskCount {
        TaskCount {
            total: self.tasks.len(),
            completed: self.completed_tasks().len(),
            pending: self.pending_tasks().len(),
            overdue: self.overdue_tasks().len(),
        }
    }

    /// Tasks whose title or description contains `query`, ignoring case.
    /// An empty query matches everything.
    pub fn search_tasks(&self, query: &str) -> Vec<&Task> {
        let needle = query.to_lowercase();
        self.tasks.iter().filter(|t| t.matches(&needle)).collect()
    }

    /// Snapshot of every task plus the export time.
    pub fn export_document(&self) -> ExportDocument {
        ExportDocument {
            tasks: self.tasks.iter().map(Task::to_record).collect(),
            export_date: self.clock.now().to_rfc3339(),
        }
    }

    /// The export snapshot as pretty-printed JSON.
    pub fn export_to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.export_document())?)
    }
}
