use chrono::NaiveDate;
use choreust::actions::{create_task, delete_task, get_tasks, toggle_task_completion};
use choreust::auth::Session;
use choreust::codec::{fields, FormData};
use choreust::models::{DayOfWeek, NewTask, Recurrence};
use choreust::storage::Store;
use choreust::Error;
use serde_json::json;
use tempfile::TempDir;

fn session(email: &str) -> Session {
    Session { email: email.to_string(), name: Some("Casa".into()), image: None }
}

fn form(title: &str, due: &str) -> FormData {
    FormData::new().with(fields::TITLE, title).with(fields::DUE_DATE, due)
}

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

#[test]
fn test_add_and_list() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    create_task(&store, Some(&me), &form("  Limpar a geladeira ", "2025-12-01")).unwrap();

    let tasks = get_tasks(&store, Some(&me)).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Limpar a geladeira");
    assert_eq!(tasks[0].due_date, date("2025-12-01"));
    assert!(!tasks[0].is_completed);
    assert_eq!(tasks[0].repetition, None);
}

#[test]
fn test_list_is_ordered_by_due_date() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    create_task(&store, Some(&me), &form("Depois", "2025-12-10")).unwrap();
    create_task(&store, Some(&me), &form("Antes", "2025-11-01")).unwrap();
    create_task(&store, Some(&me), &form("Meio", "2025-12-01")).unwrap();

    let titles: Vec<String> = get_tasks(&store, Some(&me))
        .unwrap()
        .into_iter()
        .map(|t| t.title)
        .collect();
    assert_eq!(titles, ["Antes", "Meio", "Depois"]);
}

#[test]
fn test_create_with_recurrence() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    let f = form("Lixo", "2025-12-01")
        .with(fields::REPETITION_TYPE, "weekly")
        .with(fields::WEEKLY_DAYS, "monday")
        .with(fields::WEEKLY_DAYS, "thursday");
    let task = create_task(&store, Some(&me), &f).unwrap();
    assert_eq!(
        task.repetition,
        Some(Recurrence::Weekly { days: vec![DayOfWeek::Monday, DayOfWeek::Thursday] })
    );

    let stored = store.load_tasks().unwrap();
    assert_eq!(stored[0].repetition_type.as_deref(), Some("weekly"));
    assert_eq!(stored[0].repetition_data, Some(json!({ "days": ["monday", "thursday"] })));
}

#[test]
fn test_empty_weekly_selection_is_stored_as_non_recurring() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    let f = form("Lixo", "2025-12-01").with(fields::REPETITION_TYPE, "weekly");
    let task = create_task(&store, Some(&me), &f).unwrap();
    assert_eq!(task.repetition, None);

    let stored = store.load_tasks().unwrap();
    assert_eq!(stored[0].repetition_type, None);
    assert_eq!(stored[0].repetition_data, None);
}

#[test]
fn test_validation_errors() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    let err = create_task(&store, Some(&me), &form("   ", "2025-12-01")).unwrap_err();
    assert!(matches!(err, Error::MissingTitle));
    assert_eq!(err.to_string(), "Título é obrigatório");

    let err = create_task(&store, Some(&me), &FormData::new().with(fields::TITLE, "x")).unwrap_err();
    assert!(matches!(err, Error::MissingDueDate));

    let err = create_task(&store, Some(&me), &form("x", "01/12/2025")).unwrap_err();
    assert!(matches!(err, Error::InvalidDueDate(_)));

    assert!(store.load_tasks().unwrap().is_empty());
}

#[test]
fn test_requires_session() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());

    assert!(matches!(
        create_task(&store, None, &form("x", "2025-12-01")),
        Err(Error::NotSignedIn)
    ));
    assert!(matches!(toggle_task_completion(&store, None, 1), Err(Error::NotSignedIn)));
    assert!(matches!(delete_task(&store, None, 1), Err(Error::NotSignedIn)));
    assert!(get_tasks(&store, None).unwrap().is_empty());
}

#[test]
fn test_toggle_task() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");
    let id = create_task(&store, Some(&me), &form("Varrer", "2025-12-01")).unwrap().task_id;

    assert!(toggle_task_completion(&store, Some(&me), id).unwrap().is_completed);
    assert!(get_tasks(&store, Some(&me)).unwrap()[0].is_completed);

    assert!(!toggle_task_completion(&store, Some(&me), id).unwrap().is_completed);
    assert!(!get_tasks(&store, Some(&me)).unwrap()[0].is_completed);
}

#[test]
fn test_unknown_user_and_task() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    assert!(matches!(
        toggle_task_completion(&store, Some(&me), 1),
        Err(Error::UserNotFound)
    ));

    create_task(&store, Some(&me), &form("Varrer", "2025-12-01")).unwrap();
    assert!(matches!(
        toggle_task_completion(&store, Some(&me), 99),
        Err(Error::TaskNotFound)
    ));
    assert!(matches!(delete_task(&store, Some(&me), 99), Err(Error::TaskNotFound)));
}

#[test]
fn test_other_owners_tasks_are_not_found() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");
    let other = session("vizinho@example.com");

    let theirs = create_task(&store, Some(&other), &form("Deles", "2025-12-01")).unwrap();
    create_task(&store, Some(&me), &form("Minha", "2025-12-02")).unwrap();

    let mine = get_tasks(&store, Some(&me)).unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].title, "Minha");

    assert!(matches!(
        toggle_task_completion(&store, Some(&me), theirs.task_id),
        Err(Error::TaskNotFound)
    ));
    assert!(matches!(
        delete_task(&store, Some(&me), theirs.task_id),
        Err(Error::TaskNotFound)
    ));
    assert_eq!(store.load_tasks().unwrap().len(), 2);
}

#[test]
fn test_delete_task() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");
    let id = create_task(&store, Some(&me), &form("Passar roupa", "2025-12-01")).unwrap().task_id;

    delete_task(&store, Some(&me), id).unwrap();
    assert!(get_tasks(&store, Some(&me)).unwrap().is_empty());
}

#[test]
fn test_user_is_created_once() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let me = session("casa@example.com");

    create_task(&store, Some(&me), &form("A", "2025-12-01")).unwrap();
    create_task(&store, Some(&me), &form("B", "2025-12-02")).unwrap();

    let users = store.load_users().unwrap();
    assert_eq!(users.len(), 1);
    assert_eq!(users[0].email, "casa@example.com");
    assert_eq!(users[0].name, "Casa");
}

#[test]
fn test_corrupt_recurrence_does_not_break_listing() {
    let dir = TempDir::new().unwrap();
    let store = Store::new(dir.path());
    let user = store.find_or_create_user("casa@example.com", None, None).unwrap();
    assert_eq!(user.name, "Usuário");

    store
        .insert_task(NewTask {
            title: "Regar".into(),
            owner_id: Some(user.id),
            due_date: date("2025-12-01"),
            repetition: None,
        })
        .unwrap();
    let mut stored = store.load_tasks().unwrap();
    stored[0].repetition_type = Some("weekly".into());
    stored[0].repetition_data = Some(json!({ "days": "not-an-array" }));
    store.save_tasks(&stored).unwrap();

    let tasks = store.tasks_for_owner(user.id).unwrap();
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].repetition, None);
}

#[test]
fn test_corrupt_task_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("tasks.json"), "{ not json").unwrap();
    let store = Store::new(dir.path());
    assert!(matches!(store.load_tasks(), Err(Error::Json(_))));
}
