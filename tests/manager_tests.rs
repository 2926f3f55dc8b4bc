use std::rc::Rc;

use chrono::{DateTime, Duration, Local, TimeZone};
use tasknest::{ManualClock, NewTask, Priority, Task, TaskCount, TaskError, TaskManager};

fn manager_at_fixed_time() -> (TaskManager<Rc<ManualClock>>, Rc<ManualClock>, DateTime<Local>) {
    let now = Local.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
    let clock = Rc::new(ManualClock::new(now));
    (TaskManager::with_clock(Rc::clone(&clock)), clock, now)
}

fn ids(tasks: Vec<&Task>) -> Vec<u64> {
    tasks.iter().filter_map(|t| t.id()).collect()
}

fn add(manager: &mut TaskManager<Rc<ManualClock>>, draft: NewTask) -> u64 {
    manager.add_task(draft).unwrap().id().unwrap()
}

#[test]
fn test_add_task_valid() {
    let (mut manager, _clock, now) = manager_at_fixed_time();
    let task = manager
        .add_task(NewTask::new("New Task").description("Description"))
        .unwrap();

    assert_eq!(task.id(), Some(1));
    assert_eq!(task.title(), "New Task");
    assert_eq!(task.priority(), Priority::Medium);
    assert_eq!(task.created_at(), now);
    assert_eq!(manager.len(), 1);
    assert_eq!(manager.next_id(), 2);
}

#[test]
fn test_add_task_empty_title() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();

    assert!(matches!(manager.add_task(NewTask::new("")), Err(TaskError::EmptyTitle)));
    assert!(matches!(manager.add_task(NewTask::new("   ")), Err(TaskError::EmptyTitle)));
    assert!(matches!(manager.add_task(NewTask::new("\t\n")), Err(TaskError::EmptyTitle)));

    assert!(manager.is_empty());
    assert_eq!(manager.next_id(), 1);
}

#[test]
fn test_ids_are_never_reused() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();
    let first = add(&mut manager, NewTask::new("Task 1"));
    let second = add(&mut manager, NewTask::new("Task 2"));
    assert_eq!((first, second), (1, 2));

    assert!(manager.remove_task(second));
    assert_eq!(manager.next_id(), 3);

    let _ = manager.add_task(NewTask::new(" "));
    let third = add(&mut manager, NewTask::new("Task 3"));
    assert_eq!(third, 3);
    let ids: Vec<Option<u64>> = manager.tasks().iter().map(|t| t.id()).collect();
    assert_eq!(ids, vec![Some(1), Some(3)]);
}

#[test]
fn test_complete_and_remove_task() {
    let (mut manager, clock, now) = manager_at_fixed_time();
    let task1 = add(&mut manager, NewTask::new("Task 1"));
    let task2 = add(&mut manager, NewTask::new("Task 2"));

    clock.advance(Duration::minutes(5));
    assert!(manager.complete_task(task1));
    let done = manager.get_task_by_id(task1).unwrap();
    assert!(done.is_completed());
    assert_eq!(done.completed_at(), Some(now + Duration::minutes(5)));

    assert!(!manager.complete_task(999));

    assert!(manager.remove_task(task2));
    assert_eq!(manager.len(), 1);
    assert!(manager.get_task_by_id(task2).is_none());

    assert!(!manager.remove_task(999));
    assert!(!manager.remove_task(task2));
}

#[test]
fn test_completed_at_tracks_completion() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();
    add(&mut manager, NewTask::new("A"));
    add(&mut manager, NewTask::new("B"));
    manager.complete_task(2);

    for task in manager.tasks() {
        assert_eq!(task.completed_at().is_some(), task.is_completed());
    }
}

#[test]
fn test_get_tasks_by_status() {
    let (mut manager, _clock, now) = manager_at_fixed_time();
    add(&mut manager, NewTask::new("Pending 1"));
    add(&mut manager, NewTask::new("Pending 2"));
    let done = add(&mut manager, NewTask::new("Completed").due(now - Duration::days(1)));
    manager.complete_task(done);

    assert_eq!(manager.pending_tasks().len(), 2);
    assert_eq!(manager.completed_tasks().len(), 1);
    // a completed task is never overdue
    assert!(manager.overdue_tasks().is_empty());

    let late = add(&mut manager, NewTask::new("Late").due(now - Duration::days(2)));
    let overdue = manager.overdue_tasks();
    assert_eq!(overdue.len(), 1);
    assert_eq!(overdue[0].id(), Some(late));
}

#[test]
fn test_overdue_is_recomputed_against_clock() {
    let (mut manager, clock, now) = manager_at_fixed_time();
    add(&mut manager, NewTask::new("Tomorrow").due(now + Duration::days(1)));
    assert!(manager.overdue_tasks().is_empty());

    clock.advance(Duration::days(1));
    assert!(manager.overdue_tasks().is_empty());

    clock.advance(Duration::seconds(1));
    assert_eq!(manager.overdue_tasks().len(), 1);
    assert_eq!(manager.task_count().overdue, 1);
}

#[test]
fn test_search_and_priority_filter() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();
    add(&mut manager, NewTask::new("Study Rust").description("Online course").priority(Priority::High));
    add(&mut manager, NewTask::new("Buy Rust book").description("Bookstore").priority(Priority::Low));
    add(&mut manager, NewTask::new("Workout").description("Gym").priority(Priority::Medium));

    assert_eq!(manager.search_tasks("rust").len(), 2);

    let gym = manager.search_tasks("GYM");
    assert_eq!(gym.len(), 1);
    assert_eq!(gym[0].title(), "Workout");

    assert_eq!(manager.search_tasks("").len(), 3);
    assert!(manager.search_tasks("nothing here").is_empty());

    let high = manager.tasks_by_priority(Priority::High);
    assert_eq!(high.len(), 1);
    assert_eq!(high[0].title(), "Study Rust");
    assert_eq!(manager.tasks_by_priority(Priority::Medium).len(), 1);

    manager.complete_task(1);
    assert!(manager.tasks_by_priority(Priority::High).is_empty());
}

#[test]
fn test_filters_keep_insertion_order() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();
    for title in ["c task", "a task", "b task"] {
        add(&mut manager, NewTask::new(title));
    }
    let titles: Vec<&str> = manager.search_tasks("task").iter().map(|t| t.title()).collect();
    assert_eq!(titles, vec!["c task", "a task", "b task"]);
}

#[test]
fn test_task_count_statistics() {
    let (mut manager, _clock, now) = manager_at_fixed_time();
    assert_eq!(manager.task_count(), TaskCount::default());

    let normal = add(&mut manager, NewTask::new("Normal"));
    add(&mut manager, NewTask::new("Late").due(now - Duration::days(1)));
    add(&mut manager, NewTask::new("Future").due(now + Duration::days(1)));
    manager.complete_task(normal);

    let count = manager.task_count();
    assert_eq!(
        count,
        TaskCount { total: 3, completed: 1, pending: 2, overdue: 1 }
    );
    assert_eq!(count.total, count.pending + count.completed);
    assert!(count.overdue <= count.pending);
}

#[test]
fn test_end_to_end_scenario() {
    let (mut manager, _clock, now) = manager_at_fixed_time();
    let a = add(
        &mut manager,
        NewTask::new("Study").priority(Priority::High).due(now + Duration::days(3)),
    );
    let b = add(
        &mut manager,
        NewTask::new("Shopping").priority(Priority::Medium).due(now + Duration::days(1)),
    );
    assert!(manager.complete_task(b));
    let c = add(&mut manager, NewTask::new("Overdue demo").due(now - Duration::days(1)));

    assert_eq!(
        manager.task_count(),
        TaskCount { total: 3, completed: 1, pending: 2, overdue: 1 }
    );
    assert_eq!(ids(manager.overdue_tasks()), vec![c]);
    assert_eq!(ids(manager.pending_tasks()), vec![a, c]);
    assert_eq!(ids(manager.search_tasks("study")), vec![a]);
}

#[test]
fn test_demo_seed_after_existing_tasks() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();
    add(&mut manager, NewTask::new("Already here"));
    let gone = add(&mut manager, NewTask::new("Removed"));
    assert!(manager.remove_task(gone));

    tasknest::commands::seed_demo(&mut manager).unwrap();

    let completed = manager.completed_tasks();
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].title(), "Go shopping");
    assert_eq!(completed[0].id(), Some(4));
    assert!(!manager.get_task_by_id(1).unwrap().is_completed());
}

#[test]
fn test_demo_seed() {
    let (mut manager, _clock, _now) = manager_at_fixed_time();
    tasknest::commands::seed_demo(&mut manager).unwrap();

    assert_eq!(
        manager.task_count(),
        TaskCount { total: 4, completed: 1, pending: 3, overdue: 1 }
    );
    assert_eq!(manager.completed_tasks()[0].title(), "Go shopping");
    assert_eq!(manager.search_tasks("rust").len(), 1);
}
