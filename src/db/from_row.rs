//! Row-mapping helpers: per-entity column lists plus generic query wrappers
//! so queries stay a single `query_one`/`query_all` call.

use std::str::FromStr;

use rusqlite::{Connection, Row};

use crate::error::Result;
use crate::models::*;

pub const USER_COLS: &str = "id, email, name, role, created_at, updated_at";
pub const PROJECT_COLS: &str = "id, name, description, invite_code, invite_code_chef, \
     invite_code_membre, created_by_id, chef_de_projet_id, created_at, updated_at";
pub const PROJECT_USER_COLS: &str = "id, user_id, project_id, created_at";
pub const TASK_COLS: &str = "id, name, description, due_date, status, solution_description, \
     project_id, created_by_id, user_id, created_at, updated_at";
pub const RESOURCE_COLS: &str = "id, name, type, cost, project_id, created_at";
pub const TASK_RESOURCE_COLS: &str = "id, task_id, resource_id, quantity";
pub const COST_COLS: &str = "id, project_id, budget, spent, updated_at";
pub const MESSAGE_COLS: &str = "id, sender_id, receiver_id, project_id, content, read, created_at";

pub trait FromRow: Sized {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Read a TEXT column into a strum-backed enum.
fn parse_enum<T: FromStr>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T> {
    let raw: String = row.get(idx)?;
    raw.parse().map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            rusqlite::types::Type::Text,
            format!("unrecognized value: {raw}").into(),
        )
    })
}

impl FromRow for User {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: parse_enum(row, 3)?,
            created_at: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl FromRow for Project {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            invite_code: row.get(3)?,
            invite_code_chef: row.get(4)?,
            invite_code_membre: row.get(5)?,
            created_by_id: row.get(6)?,
            chef_de_projet_id: row.get(7)?,
            created_at: row.get(8)?,
            updated_at: row.get(9)?,
        })
    }
}

impl FromRow for ProjectUser {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            project_id: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

impl FromRow for Task {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            due_date: row.get(3)?,
            status: parse_enum(row, 4)?,
            solution_description: row.get(5)?,
            project_id: row.get(6)?,
            created_by_id: row.get(7)?,
            user_id: row.get(8)?,
            created_at: row.get(9)?,
            updated_at: row.get(10)?,
        })
    }
}

impl FromRow for Resource {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            resource_type: parse_enum(row, 2)?,
            cost: row.get(3)?,
            project_id: row.get(4)?,
            created_at: row.get(5)?,
        })
    }
}

impl FromRow for TaskResource {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            task_id: row.get(1)?,
            resource_id: row.get(2)?,
            quantity: row.get(3)?,
        })
    }
}

impl FromRow for Cost {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            project_id: row.get(1)?,
            budget: row.get(2)?,
            spent: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }
}

impl FromRow for Message {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            sender_id: row.get(1)?,
            receiver_id: row.get(2)?,
            project_id: row.get(3)?,
            content: row.get(4)?,
            read: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

pub fn query_one<T: FromRow, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Option<T>> {
    let mut stmt = conn.prepare(sql)?;
    let mut rows = stmt.query_map(params, |row| T::from_row(row))?;
    match rows.next() {
        Some(row) => Ok(Some(row?)),
        None => Ok(None),
    }
}

pub fn query_all<T: FromRow, P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<T>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, |row| T::from_row(row))?;
    rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
}
