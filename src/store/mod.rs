//! Persistent storage for todo records.
//!
//! # Data Flow
//! ```text
//! handler
//!     → TodoStore (async facade, Clone)
//!     → spawn_blocking + Mutex<Connection>
//!     → SQLite file (single `todos` table)
//! ```
//!
//! # Design Decisions
//! - One ad-hoc SQL statement per operation, no multi-statement transactions
//! - The single connection is serialized by a mutex; ids come from AUTOINCREMENT
//! - Delete takes the id as opaque text: anything non-numeric matches no row

pub mod sqlite;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub use sqlite::TodoStore;

/// A persisted todo record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    pub id: i64,
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
}

/// Fields accepted when creating a todo. Absent or `null` fields take their
/// defaults and any client-supplied `id` is ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct NewTodo {
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub completed: bool,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewTodo {
    /// Attach the store-assigned id.
    pub fn into_item(self, id: i64) -> TodoItem {
        TodoItem {
            id,
            title: self.title,
            description: self.description,
            completed: self.completed,
        }
    }
}

/// Errors raised by the store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("store connection lock poisoned")]
    Poisoned,

    #[error("store task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
