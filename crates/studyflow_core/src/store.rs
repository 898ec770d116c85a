//! Persistent store for courses, tasks and the weekly timetable.
//!
//! # Responsibility
//! - Own the three in-memory collections as the single source of truth.
//! - Mirror every mutation to the durable backend as a whole-collection JSON
//!   snapshot under a fixed key.
//! - Notify subscribers after each mutation so presentation can re-read.
//!
//! # Invariants
//! - The startup load runs exactly once, before any command is accepted.
//! - A durable read/write failure never fails or rolls back the in-memory
//!   mutation; it is logged and the session continues.
//! - Commands take `&mut self`, so no two commands interleave mid-mutation.

use crate::model::course::{Course, CourseId, NewCourse};
use crate::model::task::{NewTask, Task, TaskId};
use crate::model::timetable::{EntryId, NewTimetableEntry, Timetable, Weekday};
use crate::repo::kv_backend::KvBackend;
use log::{error, info, warn};
use serde::de::DeserializeOwned;

/// Collection kinds, doubling as durable key names and notification tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Courses,
    Tasks,
    Timetable,
}

impl Collection {
    /// Fixed durable key the collection snapshot is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Self::Courses => "courses",
            Self::Tasks => "tasks",
            Self::Timetable => "timetable",
        }
    }
}

type Subscriber = Box<dyn Fn(Collection)>;

/// In-memory owner of the organizer collections with a durable mirror.
pub struct Store<B: KvBackend> {
    backend: B,
    courses: Vec<Course>,
    tasks: Vec<Task>,
    timetable: Timetable,
    subscribers: Vec<Subscriber>,
}

impl<B: KvBackend> Store<B> {
    /// Opens the store, loading all three collections from the backend.
    ///
    /// Each key falls back to its default (empty) collection when absent,
    /// unreadable or malformed; startup itself never fails.
    pub fn open(backend: B) -> Self {
        let courses = load_collection(&backend, Collection::Courses);
        let tasks = load_collection(&backend, Collection::Tasks);
        let timetable = load_collection(&backend, Collection::Timetable);
        Self {
            backend,
            courses,
            tasks,
            timetable,
            subscribers: Vec::new(),
        }
    }

    /// Appends a new course and returns its id. Duplicate names are allowed.
    pub fn add_course(&mut self, input: NewCourse) -> CourseId {
        let course = input.into_course();
        let id = course.id;
        self.courses.push(course);
        self.persist_and_notify(Collection::Courses);
        id
    }

    /// Removes a course and every task that referenced it.
    ///
    /// Timetable entries for the course are not touched; their denormalized
    /// course name keeps the creation-time value. Returns whether a matching
    /// course existed.
    pub fn delete_course(&mut self, course_id: CourseId) -> bool {
        let before = self.courses.len();
        self.courses.retain(|course| course.id != course_id);
        if self.courses.len() == before {
            return false;
        }

        self.tasks.retain(|task| task.course_id != course_id);
        self.persist_and_notify(Collection::Courses);
        self.persist_and_notify(Collection::Tasks);
        true
    }

    /// Appends a new task with completion cleared and returns its id.
    pub fn add_task(&mut self, input: NewTask) -> TaskId {
        let task = input.into_task();
        let id = task.id;
        self.tasks.push(task);
        self.persist_and_notify(Collection::Tasks);
        id
    }

    /// Replaces the stored task with the same id wholesale.
    ///
    /// Field edits and completion toggles both go through this path. Returns
    /// `false` (and changes nothing) when no task matches.
    pub fn update_task(&mut self, task: Task) -> bool {
        match self.tasks.iter_mut().find(|stored| stored.id == task.id) {
            Some(stored) => {
                *stored = task;
                self.persist_and_notify(Collection::Tasks);
                true
            }
            None => false,
        }
    }

    /// Removes one task. Returns whether a matching task existed.
    pub fn delete_task(&mut self, task_id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != task_id);
        if self.tasks.len() == before {
            return false;
        }
        self.persist_and_notify(Collection::Tasks);
        true
    }

    /// Inserts a timetable entry and re-sorts its day by start time.
    pub fn add_timetable_entry(&mut self, input: NewTimetableEntry) -> EntryId {
        let entry = input.into_entry();
        let id = entry.id;
        self.timetable.insert(entry);
        self.persist_and_notify(Collection::Timetable);
        id
    }

    /// Removes one entry from a day. Returns whether it existed.
    pub fn delete_timetable_entry(&mut self, day: Weekday, entry_id: EntryId) -> bool {
        if !self.timetable.remove(day, entry_id) {
            return false;
        }
        self.persist_and_notify(Collection::Timetable);
        true
    }

    /// Read-only course snapshot, in insertion order.
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    /// Read-only task snapshot, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Read-only timetable snapshot.
    pub fn timetable(&self) -> &Timetable {
        &self.timetable
    }

    /// Looks up one course by id.
    pub fn course_by_id(&self, course_id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| course.id == course_id)
    }

    /// Tasks belonging to one course, in insertion order.
    pub fn tasks_for_course(&self, course_id: CourseId) -> impl Iterator<Item = &Task> + '_ {
        self.tasks
            .iter()
            .filter(move |task| task.course_id == course_id)
    }

    /// Registers a callback invoked with the collection kind after every
    /// mutation of that collection.
    pub fn subscribe(&mut self, subscriber: impl Fn(Collection) + 'static) {
        self.subscribers.push(Box::new(subscriber));
    }

    fn persist_and_notify(&self, collection: Collection) {
        self.persist(collection);
        for subscriber in &self.subscribers {
            subscriber(collection);
        }
    }

    // Write-through is fire-and-forget: a failed write leaves the in-memory
    // state authoritative for the session and is reported only in the log.
    fn persist(&self, collection: Collection) {
        let key = collection.key();
        let encoded = match collection {
            Collection::Courses => serde_json::to_string(&self.courses),
            Collection::Tasks => serde_json::to_string(&self.tasks),
            Collection::Timetable => serde_json::to_string(&self.timetable),
        };

        let snapshot = match encoded {
            Ok(snapshot) => snapshot,
            Err(err) => {
                error!(
                    "event=store_persist module=store status=error key={key} error_code=encode_failed error={err}"
                );
                return;
            }
        };

        if let Err(err) = self.backend.save(key, &snapshot) {
            error!(
                "event=store_persist module=store status=error key={key} error_code=backend_write_failed error={err}"
            );
        }
    }
}

fn load_collection<B, T>(backend: &B, collection: Collection) -> T
where
    B: KvBackend,
    T: DeserializeOwned + Default,
{
    let key = collection.key();
    match backend.load(key) {
        Ok(Some(raw)) => match serde_json::from_str(&raw) {
            Ok(value) => {
                info!("event=store_load module=store status=ok key={key}");
                value
            }
            Err(err) => {
                warn!(
                    "event=store_load module=store status=error key={key} error_code=malformed_snapshot error={err}"
                );
                T::default()
            }
        },
        Ok(None) => {
            info!("event=store_load module=store status=ok key={key} outcome=absent");
            T::default()
        }
        Err(err) => {
            warn!(
                "event=store_load module=store status=error key={key} error_code=backend_read_failed error={err}"
            );
            T::default()
        }
    }
}
