use serde_json::Value;
use studyflow_core::db::{open_db, open_db_in_memory};
use studyflow_core::{
    MemoryKvBackend, NewCourse, NewTask, NewTimetableEntry, SqliteKvBackend, Store, TaskKind,
    Weekday,
};

#[test]
fn collections_roundtrip_through_sqlite_backend() {
    let conn = open_db_in_memory().unwrap();

    let (courses, tasks, timetable) = {
        let backend = SqliteKvBackend::try_new(&conn).unwrap();
        let mut store = Store::open(backend);

        let course_id = store.add_course(NewCourse::new("Algorithms", "Dr. X").unwrap());
        let course = store.course_by_id(course_id).unwrap().clone();
        store.add_task(NewTask::new(&course, "HW1", TaskKind::Assignment, 60).unwrap());
        store.add_task(NewTask::new(&course, "Mock exam", TaskKind::Test, 120).unwrap());
        store.add_timetable_entry(
            NewTimetableEntry::new(&course, Weekday::Monday, "09:00", "10:30").unwrap(),
        );

        (
            store.courses().to_vec(),
            store.tasks().to_vec(),
            store.timetable().clone(),
        )
    };

    let backend = SqliteKvBackend::try_new(&conn).unwrap();
    let reloaded = Store::open(backend);

    assert_eq!(reloaded.courses(), courses.as_slice());
    assert_eq!(reloaded.tasks(), tasks.as_slice());
    assert_eq!(reloaded.timetable(), &timetable);
}

#[test]
fn store_survives_process_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("studyflow.db");

    {
        let conn = open_db(&path).unwrap();
        let backend = SqliteKvBackend::try_new(&conn).unwrap();
        let mut store = Store::open(backend);
        store.add_course(NewCourse::new("Astronomy", "Dr. A").unwrap());
    }

    let conn = open_db(&path).unwrap();
    let backend = SqliteKvBackend::try_new(&conn).unwrap();
    let store = Store::open(backend);

    assert_eq!(store.courses().len(), 1);
    assert_eq!(store.courses()[0].name, "Astronomy");
}

#[test]
fn durable_task_snapshot_uses_the_wire_field_names() {
    let backend = MemoryKvBackend::new();
    let mut store = Store::open(&backend);

    let course_id = store.add_course(NewCourse::new("Algorithms", "Dr. X").unwrap());
    let course = store.course_by_id(course_id).unwrap().clone();
    store.add_task(NewTask::new(&course, "HW1", TaskKind::Assignment, 60).unwrap());

    let (key, raw) = backend.writes().last().unwrap().clone();
    assert_eq!(key, "tasks");

    let snapshot: Value = serde_json::from_str(&raw).unwrap();
    let task = &snapshot.as_array().unwrap()[0];
    assert!(task.get("id").is_some());
    assert_eq!(task["courseId"], Value::String(course_id.to_string()));
    assert_eq!(task["title"], "HW1");
    assert_eq!(task["type"], "ASSIGNMENT");
    assert_eq!(task["estimatedTime"], 60);
    assert_eq!(task["isCompleted"], false);
}

#[test]
fn durable_timetable_snapshot_is_keyed_by_day_names() {
    let backend = MemoryKvBackend::new();
    let mut store = Store::open(&backend);

    let course_id = store.add_course(NewCourse::new("Algorithms", "Dr. X").unwrap());
    let course = store.course_by_id(course_id).unwrap().clone();
    store.add_timetable_entry(
        NewTimetableEntry::new(&course, Weekday::Wednesday, "14:00", "15:00").unwrap(),
    );

    let (key, raw) = backend.writes().last().unwrap().clone();
    assert_eq!(key, "timetable");

    let snapshot: Value = serde_json::from_str(&raw).unwrap();
    let days = snapshot.as_object().unwrap();
    assert_eq!(days.len(), 7);
    for day in ["Monday", "Tuesday", "Wednesday", "Thursday", "Friday", "Saturday", "Sunday"] {
        assert!(days.contains_key(day), "missing day key {day}");
    }

    let entry = &days["Wednesday"].as_array().unwrap()[0];
    assert_eq!(entry["courseName"], "Algorithms");
    assert_eq!(entry["day"], "Wednesday");
    assert_eq!(entry["startTime"], "14:00");
    assert_eq!(entry["endTime"], "15:00");
}

#[test]
fn malformed_snapshot_falls_back_to_empty_collection() {
    let backend = MemoryKvBackend::new();
    backend.seed("courses", r#"[{"id":"c1","name":"Maths","instructor":"Dr. M"#);
    backend.seed("tasks", "not json at all");

    let mut store = Store::open(&backend);

    assert!(store.courses().is_empty());
    assert!(store.tasks().is_empty());
    // The store stays usable after the fallback.
    store.add_course(NewCourse::new("Fresh start", "Dr. F").unwrap());
    assert_eq!(store.courses().len(), 1);
}

#[test]
fn snapshot_with_invalid_wall_clock_time_is_rejected_as_a_whole() {
    let backend = MemoryKvBackend::new();
    backend.seed(
        "timetable",
        r#"{"Monday":[{"id":"00000000-0000-4000-8000-000000000001",
            "courseId":"00000000-0000-4000-8000-000000000002",
            "courseName":"Maths","day":"Monday","startTime":"25:99","endTime":"10:00"}]}"#,
    );

    let store = Store::open(&backend);
    assert!(store.timetable().is_empty());
}

#[test]
fn backend_read_failure_loads_defaults_and_store_stays_usable() {
    let backend = MemoryKvBackend::new();
    backend.seed("courses", r#"[]"#);
    backend.fail_loads(true);

    let mut store = Store::open(&backend);
    assert!(store.courses().is_empty());

    backend.fail_loads(false);
    store.add_course(NewCourse::new("Recovered", "Dr. R").unwrap());
    assert_eq!(backend.writes().len(), 1);
}

#[test]
fn timetable_snapshot_missing_days_is_normalized_on_load() {
    let backend = MemoryKvBackend::new();
    backend.seed(
        "timetable",
        r#"{"Monday":[{"id":"00000000-0000-4000-8000-000000000001",
            "courseId":"00000000-0000-4000-8000-000000000002",
            "courseName":"Maths","day":"Monday","startTime":"09:00","endTime":"10:00"}]}"#,
    );

    let store = Store::open(&backend);

    assert_eq!(store.timetable().entries(Weekday::Monday).len(), 1);
    for day in Weekday::ALL {
        if day != Weekday::Monday {
            assert!(store.timetable().entries(day).is_empty());
        }
    }
}
