//! SQLite-backed todo store.

use rusqlite::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};

use crate::store::{NewTodo, StoreError, TodoItem};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS todos (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT,
        completed BOOLEAN DEFAULT 0
    );
";

/// Thread-safe handle to the todo table. Clones share one connection.
#[derive(Clone)]
pub struct TodoStore {
    conn: Arc<Mutex<Connection>>,
}

impl TodoStore {
    /// Open (or create) the database file and ensure the schema exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        let store = Self::bootstrap(conn)?;
        tracing::info!(path = %path.display(), "Todo store opened");
        Ok(store)
    }

    /// Private in-memory database with the same schema.
    pub fn in_memory() -> Result<Self, StoreError> {
        Self::bootstrap(Connection::open_in_memory()?)
    }

    fn bootstrap(conn: Connection) -> Result<Self, StoreError> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// All todos, in whatever order SQLite yields them.
    pub async fn list(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, title, description, completed FROM todos")?;
            let rows = stmt.query_map([], |row| {
                Ok(TodoItem {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    description: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                    completed: row.get(3)?,
                })
            })?;
            let todos = rows.collect::<Result<Vec<_>, _>>()?;
            Ok(todos)
        })
        .await
    }

    /// Insert a todo and return it with its assigned id.
    pub async fn create(&self, new: NewTodo) -> Result<TodoItem, StoreError> {
        self.with_conn(move |conn| {
            conn.execute(
                "INSERT INTO todos (title, description, completed) VALUES (?1, ?2, ?3)",
                params![new.title, new.description, new.completed],
            )?;
            let id = conn.last_insert_rowid();
            Ok(new.into_item(id))
        })
        .await
    }

    /// Delete by id. Returns the number of rows removed (0 or 1).
    pub async fn delete(&self, id: &str) -> Result<usize, StoreError> {
        let id = id.to_owned();
        self.with_conn(move |conn| {
            let removed = conn.execute("DELETE FROM todos WHERE id = ?1", params![id])?;
            Ok(removed)
        })
        .await
    }

    /// Run `f` against the connection on the blocking pool.
    pub(crate) async fn with_conn<F, T>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&Connection) -> Result<T, StoreError> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().map_err(|_| StoreError::Poisoned)?;
            f(&guard)
        })
        .await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn todo(title: &str) -> NewTodo {
        NewTodo {
            title: title.to_string(),
            ..NewTodo::default()
        }
    }

    #[tokio::test]
    async fn test_ids_strictly_increase() {
        let store = TodoStore::in_memory().unwrap();
        let a = store.create(todo("a")).await.unwrap();
        let b = store.create(todo("b")).await.unwrap();
        let c = store.create(todo("c")).await.unwrap();
        assert!(a.id < b.id && b.id < c.id);
    }

    #[tokio::test]
    async fn test_round_trip_preserves_fields() {
        let store = TodoStore::in_memory().unwrap();
        let created = store
            .create(NewTodo {
                title: "write report".into(),
                description: "quarterly numbers".into(),
                completed: true,
            })
            .await
            .unwrap();

        let todos = store.list().await.unwrap();
        assert_eq!(todos, vec![created.clone()]);
        assert_eq!(created.description, "quarterly numbers");
        assert!(created.completed);
    }

    #[tokio::test]
    async fn test_ids_not_reused_after_delete() {
        let store = TodoStore::in_memory().unwrap();
        let first = store.create(todo("a")).await.unwrap();
        store.delete(&first.id.to_string()).await.unwrap();
        let second = store.create(todo("b")).await.unwrap();
        assert!(second.id > first.id);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = TodoStore::in_memory().unwrap();
        let item = store.create(todo("a")).await.unwrap();
        let id = item.id.to_string();

        assert_eq!(store.delete(&id).await.unwrap(), 1);
        assert_eq!(store.delete(&id).await.unwrap(), 0);
        assert!(store.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_non_numeric_id_matches_nothing() {
        let store = TodoStore::in_memory().unwrap();
        store.create(todo("a")).await.unwrap();

        assert_eq!(store.delete("abc").await.unwrap(), 0);
        assert_eq!(store.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_null_description_reads_empty() {
        let store = TodoStore::in_memory().unwrap();
        store
            .with_conn(|conn| {
                conn.execute("INSERT INTO todos (title) VALUES ('raw')", [])?;
                Ok(())
            })
            .await
            .unwrap();

        let todos = store.list().await.unwrap();
        assert_eq!(todos.len(), 1);
        assert_eq!(todos[0].description, "");
        assert!(!todos[0].completed);
    }

    #[tokio::test]
    async fn test_file_store_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");

        let created = {
            let store = TodoStore::open(&path).unwrap();
            store.create(todo("persisted")).await.unwrap()
        };

        let reopened = TodoStore::open(&path).unwrap();
        assert_eq!(reopened.list().await.unwrap(), vec![created]);
    }
}
