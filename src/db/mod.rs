pub mod from_row;
pub mod queries;

use r2d2_sqlite::SqliteConnectionManager;
use rusqlite::Connection;

use crate::error::Result;

pub type DbPool = r2d2::Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
}

/// Open a connection pool with foreign keys enforced on every connection.
pub fn open_pool(path: &str) -> anyhow::Result<DbPool> {
    let manager = SqliteConnectionManager::file(path)
        .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
    Ok(r2d2::Pool::new(manager)?)
}

/// Create the schema. Idempotent; runs at startup.
///
/// Deletion rules: tasks, task_resources, and messages cascade with their
/// parent rows. Resources, costs, and memberships are removed explicitly by
/// the project-deletion transaction.
pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            name        TEXT NOT NULL,
            role        TEXT NOT NULL DEFAULT 'USER',
            created_at  INTEGER NOT NULL,
            updated_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS projects (
            id                 TEXT PRIMARY KEY,
            name               TEXT NOT NULL,
            description        TEXT NOT NULL,
            invite_code        TEXT NOT NULL UNIQUE,
            invite_code_chef   TEXT NOT NULL UNIQUE,
            invite_code_membre TEXT NOT NULL UNIQUE,
            created_by_id      TEXT NOT NULL REFERENCES users(id),
            chef_de_projet_id  TEXT REFERENCES users(id),
            created_at         INTEGER NOT NULL,
            updated_at         INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS project_users (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            project_id  TEXT NOT NULL REFERENCES projects(id),
            created_at  INTEGER NOT NULL,
            UNIQUE(user_id, project_id)
        );

        CREATE TABLE IF NOT EXISTS tasks (
            id                   TEXT PRIMARY KEY,
            name                 TEXT NOT NULL,
            description          TEXT NOT NULL,
            due_date             INTEGER,
            status               TEXT NOT NULL DEFAULT 'To Do',
            solution_description TEXT,
            project_id           TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            created_by_id        TEXT NOT NULL REFERENCES users(id),
            user_id              TEXT NOT NULL REFERENCES users(id),
            created_at           INTEGER NOT NULL,
            updated_at           INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS resources (
            id          TEXT PRIMARY KEY,
            name        TEXT NOT NULL,
            type        TEXT NOT NULL,
            cost        REAL NOT NULL,
            project_id  TEXT REFERENCES projects(id),
            created_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS task_resources (
            id          TEXT PRIMARY KEY,
            task_id     TEXT NOT NULL REFERENCES tasks(id) ON DELETE CASCADE,
            resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            quantity    REAL
        );

        CREATE TABLE IF NOT EXISTS costs (
            id          TEXT PRIMARY KEY,
            project_id  TEXT NOT NULL REFERENCES projects(id),
            budget      REAL NOT NULL,
            spent       REAL NOT NULL,
            updated_at  INTEGER NOT NULL
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            sender_id   TEXT NOT NULL REFERENCES users(id),
            receiver_id TEXT NOT NULL REFERENCES users(id),
            project_id  TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
            content     TEXT NOT NULL,
            read        INTEGER NOT NULL DEFAULT 0,
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_tasks_project ON tasks(project_id);
        CREATE INDEX IF NOT EXISTS idx_tasks_assignee ON tasks(user_id);
        CREATE INDEX IF NOT EXISTS idx_project_users_project ON project_users(project_id);
        CREATE INDEX IF NOT EXISTS idx_messages_receiver ON messages(receiver_id, read);
        CREATE INDEX IF NOT EXISTS idx_messages_project ON messages(project_id);",
    )?;
    Ok(())
}
