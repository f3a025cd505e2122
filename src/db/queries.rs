use chrono::Utc;
use rusqlite::{Connection, params, types::Value};
use uuid::Uuid;

use crate::error::{AppError, Result};
use crate::models::*;

use super::from_row::{
    COST_COLS, MESSAGE_COLS, PROJECT_COLS, PROJECT_USER_COLS, RESOURCE_COLS, TASK_COLS,
    TASK_RESOURCE_COLS, USER_COLS, query_all, query_one,
};

fn now() -> i64 {
    Utc::now().timestamp()
}

fn gen_id() -> String {
    Uuid::new_v4().to_string()
}

/// Generate an invite code: 6 random bytes, hex-encoded (12 chars).
pub fn gen_invite_code() -> String {
    let bytes: [u8; 6] = rand::random();
    hex::encode(bytes)
}

/// Builder for dynamic UPDATE statements with optional fields.
/// Combines multiple field updates into a single query.
struct UpdateBuilder {
    table: &'static str,
    id: String,
    fields: Vec<(&'static str, Value)>,
    track_updated_at: bool,
}

impl UpdateBuilder {
    fn new(table: &'static str, id: &str) -> Self {
        Self {
            table,
            id: id.to_string(),
            fields: Vec::new(),
            track_updated_at: false,
        }
    }

    fn with_updated_at(mut self) -> Self {
        self.track_updated_at = true;
        self
    }

    fn set(mut self, column: &'static str, value: impl Into<Value>) -> Self {
        self.fields.push((column, value.into()));
        self
    }

    fn set_opt<V: Into<Value>>(self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.set(column, v),
            None => self,
        }
    }

    /// Set a column to an explicit value (including NULL).
    fn set_nullable<V: Into<Value>>(mut self, column: &'static str, value: Option<V>) -> Self {
        match value {
            Some(v) => self.fields.push((column, v.into())),
            None => self.fields.push((column, Value::Null)),
        }
        self
    }

    fn execute(mut self, conn: &Connection) -> Result<bool> {
        if self.fields.is_empty() {
            return Ok(false);
        }
        if self.track_updated_at {
            self.fields.push(("updated_at", now().into()));
        }
        let sets: Vec<String> = self
            .fields
            .iter()
            .map(|(col, _)| format!("{} = ?", col))
            .collect();
        let mut values: Vec<Value> = self.fields.into_iter().map(|(_, v)| v).collect();
        values.push(self.id.into());
        let sql = format!("UPDATE {} SET {} WHERE id = ?", self.table, sets.join(", "));
        let affected = conn.execute(&sql, rusqlite::params_from_iter(values))?;
        Ok(affected > 0)
    }
}

// ============ Users ============

/// Create a user with the default USER role (first sign-in sync).
pub fn create_user(conn: &Connection, email: &str, name: &str) -> Result<User> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO users (id, email, name, role, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![&id, email, name, Role::User.as_ref(), now, now],
    )?;

    Ok(User {
        id,
        email: email.to_string(),
        name: name.to_string(),
        role: Role::User,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_user_by_id(conn: &Connection, id: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE id = ?1", USER_COLS),
        &[&id],
    )
}

pub fn get_user_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    query_one(
        conn,
        &format!("SELECT {} FROM users WHERE email = ?1", USER_COLS),
        &[&email],
    )
}

/// Role lookups accept either a stable id or an email.
pub fn get_user_by_id_or_email(conn: &Connection, key: &str) -> Result<Option<User>> {
    if key.contains('@') {
        get_user_by_email(conn, key)
    } else {
        get_user_by_id(conn, key)
    }
}

pub fn list_users(conn: &Connection) -> Result<Vec<User>> {
    query_all(
        conn,
        &format!("SELECT {} FROM users ORDER BY created_at DESC", USER_COLS),
        [],
    )
}

pub fn update_user_role(conn: &Connection, id: &str, role: Role) -> Result<bool> {
    UpdateBuilder::new("users", id)
        .with_updated_at()
        .set("role", role.as_ref().to_string())
        .execute(conn)
}

/// Done/total assigned-task counts plus projects-created count.
pub fn get_user_stats(conn: &Connection, user_id: &str) -> Result<UserStats> {
    let done: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE user_id = ?1 AND status = 'Done'",
        params![user_id],
        |row| row.get(0),
    )?;
    let total: i64 = conn.query_row(
        "SELECT COUNT(*) FROM tasks WHERE user_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    let projects_created: i64 = conn.query_row(
        "SELECT COUNT(*) FROM projects WHERE created_by_id = ?1",
        params![user_id],
        |row| row.get(0),
    )?;
    Ok(UserStats {
        tasks: UserTaskStats { done, total },
        projects_created,
    })
}

// ============ Projects ============

/// Create a project with three freshly generated invite codes.
pub fn create_project(
    conn: &Connection,
    input: &CreateProject,
    created_by_id: &str,
) -> Result<Project> {
    let id = gen_id();
    let now = now();
    let invite_code = gen_invite_code();
    let invite_code_chef = gen_invite_code();
    let invite_code_membre = gen_invite_code();

    conn.execute(
        "INSERT INTO projects (id, name, description, invite_code, invite_code_chef,
             invite_code_membre, created_by_id, chef_de_projet_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8, ?9)",
        params![
            &id,
            &input.name,
            &input.description,
            &invite_code,
            &invite_code_chef,
            &invite_code_membre,
            created_by_id,
            now,
            now
        ],
    )?;

    Ok(Project {
        id,
        name: input.name.clone(),
        description: input.description.clone(),
        invite_code,
        invite_code_chef,
        invite_code_membre,
        created_by_id: created_by_id.to_string(),
        chef_de_projet_id: None,
        created_at: now,
        updated_at: now,
    })
}

pub fn get_project_by_id(conn: &Connection, id: &str) -> Result<Option<Project>> {
    query_one(
        conn,
        &format!("SELECT {} FROM projects WHERE id = ?1", PROJECT_COLS),
        &[&id],
    )
}

pub fn list_project_summaries(conn: &Connection) -> Result<Vec<ProjectSummary>> {
    let mut stmt =
        conn.prepare("SELECT id, name, chef_de_projet_id FROM projects ORDER BY created_at DESC")?;
    let rows = stmt.query_map([], |row| {
        Ok(ProjectSummary {
            id: row.get(0)?,
            name: row.get(1)?,
            chef_de_projet_id: row.get(2)?,
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}

pub fn update_project(conn: &Connection, id: &str, input: &UpdateProject) -> Result<bool> {
    let mut builder = UpdateBuilder::new("projects", id)
        .with_updated_at()
        .set_opt("name", input.name.clone())
        .set_opt("description", input.description.clone());
    if let Some(chef_id) = &input.chef_id {
        builder = builder.set_nullable("chef_de_projet_id", chef_id.clone());
    }
    builder.execute(conn)
}

pub fn set_project_chef(conn: &Connection, project_id: &str, chef_id: &str) -> Result<bool> {
    UpdateBuilder::new("projects", project_id)
        .with_updated_at()
        .set("chef_de_projet_id", chef_id.to_string())
        .execute(conn)
}

/// Projects created by the given user.
pub fn list_projects_created_by(conn: &Connection, user_id: &str) -> Result<Vec<Project>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM projects WHERE created_by_id = ?1 ORDER BY created_at DESC",
            PROJECT_COLS
        ),
        &[&user_id],
    )
}

/// Projects the user is a member of.
pub fn list_projects_for_member(conn: &Connection, user_id: &str) -> Result<Vec<Project>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM projects
             WHERE id IN (SELECT project_id FROM project_users WHERE user_id = ?1)
             ORDER BY created_at DESC",
            PROJECT_COLS
        ),
        &[&user_id],
    )
}

/// Union of member projects and led projects, de-duplicated.
pub fn list_projects_for_user(conn: &Connection, user_id: &str) -> Result<Vec<Project>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM projects
             WHERE id IN (SELECT project_id FROM project_users WHERE user_id = ?1)
                OR chef_de_projet_id = ?1
             ORDER BY created_at DESC",
            PROJECT_COLS
        ),
        &[&user_id],
    )
}

/// Sum of `spent` across the project's cost lines.
pub fn project_total_cost(conn: &Connection, project_id: &str) -> Result<f64> {
    conn.query_row(
        "SELECT COALESCE(SUM(spent), 0) FROM costs WHERE project_id = ?1",
        params![project_id],
        |row| row.get(0),
    )
    .map_err(Into::into)
}

/// Project with tasks (assignee/creator resolved), members, and creator.
pub fn get_project_with_details(
    conn: &Connection,
    project_id: &str,
) -> Result<Option<ProjectWithDetails>> {
    let Some(project) = get_project_by_id(conn, project_id)? else {
        return Ok(None);
    };
    Ok(Some(load_project_details(conn, project)?))
}

pub fn load_project_details(conn: &Connection, project: Project) -> Result<ProjectWithDetails> {
    let tasks = list_tasks_with_users(conn, &project.id)?;
    let users = list_project_members(conn, &project.id)?;
    let created_by = get_user_by_id(conn, &project.created_by_id)?.map(UserSummary::from);
    Ok(ProjectWithDetails {
        project,
        tasks,
        users,
        created_by,
    })
}

/// Delete a project and everything hanging off it in one transaction:
/// resources, then costs, then memberships, then the project row. Tasks,
/// task_resources, and messages go via FK cascade.
pub fn delete_project_cascade(conn: &mut Connection, project_id: &str) -> Result<bool> {
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    tx.execute(
        "DELETE FROM resources WHERE project_id = ?1",
        params![project_id],
    )?;
    tx.execute(
        "DELETE FROM costs WHERE project_id = ?1",
        params![project_id],
    )?;
    tx.execute(
        "DELETE FROM project_users WHERE project_id = ?1",
        params![project_id],
    )?;
    let deleted = tx.execute("DELETE FROM projects WHERE id = ?1", params![project_id])?;

    tx.commit()?;
    Ok(deleted > 0)
}

// ============ Memberships ============

pub fn get_membership(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Option<ProjectUser>> {
    query_one(
        conn,
        &format!(
            "SELECT {} FROM project_users WHERE user_id = ?1 AND project_id = ?2",
            PROJECT_USER_COLS
        ),
        &[&user_id, &project_id],
    )
}

pub fn is_project_member(conn: &Connection, user_id: &str, project_id: &str) -> Result<bool> {
    Ok(get_membership(conn, user_id, project_id)?.is_some())
}

pub fn list_project_members(conn: &Connection, project_id: &str) -> Result<Vec<UserSummary>> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.email, u.name, u.role
         FROM users u
         JOIN project_users pu ON pu.user_id = u.id
         WHERE pu.project_id = ?1
         ORDER BY u.name",
    )?;
    let rows = stmt.query_map([project_id], |row| {
        Ok(UserSummary {
            id: row.get(0)?,
            email: row.get(1)?,
            name: row.get(2)?,
            role: row.get::<_, String>(3)?.parse().unwrap_or(Role::User),
        })
    })?;
    rows.collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Into::into)
}

/// Outcome of an invite redemption.
#[derive(Debug)]
pub struct InviteRedemption {
    pub project: Project,
    /// Role assigned by the code, if the code was role-bearing.
    pub assigned_role: Option<Role>,
}

/// Redeem an invite code for `user`: resolve the project, reject duplicate
/// membership, assign the code's role, and record membership. Runs in one
/// IMMEDIATE transaction so a failed step leaves no partial state.
pub fn redeem_invite(conn: &mut Connection, user: &User, code: &str) -> Result<InviteRedemption> {
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    let mut project: Project = query_one(
        &tx,
        &format!(
            "SELECT {} FROM projects
             WHERE invite_code = ?1 OR invite_code_chef = ?1 OR invite_code_membre = ?1",
            PROJECT_COLS
        ),
        &[&code],
    )?
    .ok_or_else(|| AppError::NotFound("No project matches this invite code".into()))?;

    let existing: Option<ProjectUser> = query_one(
        &tx,
        &format!(
            "SELECT {} FROM project_users WHERE user_id = ?1 AND project_id = ?2",
            PROJECT_USER_COLS
        ),
        &[&user.id, &project.id],
    )?;
    if existing.is_some() {
        return Err(AppError::Conflict(
            "User is already a member of this project".into(),
        ));
    }

    let assigned_role = if code == project.invite_code_chef {
        Some(Role::Chef)
    } else if code == project.invite_code_membre {
        Some(Role::Membre)
    } else {
        None
    };

    let now = now();
    if let Some(role) = assigned_role {
        tx.execute(
            "UPDATE users SET role = ?1, updated_at = ?2 WHERE id = ?3",
            params![role.as_ref(), now, &user.id],
        )?;
        if role == Role::Chef {
            tx.execute(
                "UPDATE projects SET chef_de_projet_id = ?1, updated_at = ?2 WHERE id = ?3",
                params![&user.id, now, &project.id],
            )?;
            project.chef_de_projet_id = Some(user.id.clone());
        }
    }

    tx.execute(
        "INSERT INTO project_users (id, user_id, project_id, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![gen_id(), &user.id, &project.id, now],
    )?;

    tx.commit()?;
    Ok(InviteRedemption {
        project,
        assigned_role,
    })
}

// ============ Tasks ============

pub fn create_task(
    conn: &Connection,
    input: &CreateTask,
    created_by_id: &str,
    assignee_id: &str,
) -> Result<Task> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO tasks (id, name, description, due_date, status, solution_description,
             project_id, created_by_id, user_id, created_at, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5, NULL, ?6, ?7, ?8, ?9, ?10)",
        params![
            &id,
            &input.name,
            &input.description,
            input.due_date,
            TaskStatus::ToDo.as_ref(),
            &input.project_id,
            created_by_id,
            assignee_id,
            now,
            now
        ],
    )?;

    Ok(Task {
        id,
        name: input.name.clone(),
        description: input.description.clone(),
        due_date: input.due_date,
        status: TaskStatus::ToDo,
        solution_description: None,
        project_id: input.project_id.clone(),
        created_by_id: created_by_id.to_string(),
        user_id: assignee_id.to_string(),
        created_at: now,
        updated_at: now,
    })
}

pub fn get_task_by_id(conn: &Connection, id: &str) -> Result<Option<Task>> {
    query_one(
        conn,
        &format!("SELECT {} FROM tasks WHERE id = ?1", TASK_COLS),
        &[&id],
    )
}

pub fn get_task_with_details(conn: &Connection, id: &str) -> Result<Option<TaskWithDetails>> {
    let Some(task) = get_task_by_id(conn, id)? else {
        return Ok(None);
    };
    let project = get_project_by_id(conn, &task.project_id)?
        .ok_or_else(|| AppError::Internal("Task references a missing project".into()))?;
    let user = get_user_by_id(conn, &task.user_id)?.map(UserSummary::from);
    let created_by = get_user_by_id(conn, &task.created_by_id)?.map(UserSummary::from);
    Ok(Some(TaskWithDetails {
        task,
        project,
        user,
        created_by,
    }))
}

pub fn list_tasks_with_users(conn: &Connection, project_id: &str) -> Result<Vec<TaskWithUsers>> {
    let tasks: Vec<Task> = query_all(
        conn,
        &format!(
            "SELECT {} FROM tasks WHERE project_id = ?1 ORDER BY created_at DESC",
            TASK_COLS
        ),
        &[&project_id],
    )?;

    let mut results = Vec::with_capacity(tasks.len());
    for task in tasks {
        let user = get_user_by_id(conn, &task.user_id)?.map(UserSummary::from);
        let created_by = get_user_by_id(conn, &task.created_by_id)?.map(UserSummary::from);
        results.push(TaskWithUsers {
            task,
            user,
            created_by,
        });
    }
    Ok(results)
}

pub fn delete_task(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn update_task_status(
    conn: &Connection,
    id: &str,
    status: TaskStatus,
    solution_description: Option<&str>,
) -> Result<bool> {
    UpdateBuilder::new("tasks", id)
        .with_updated_at()
        .set("status", status.as_ref().to_string())
        .set_opt(
            "solution_description",
            solution_description.map(String::from),
        )
        .execute(conn)
}

// ============ Resources ============

pub fn create_resource(conn: &Connection, input: &CreateResource) -> Result<Resource> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO resources (id, name, type, cost, project_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &id,
            &input.name,
            input.resource_type.as_ref(),
            input.cost,
            &input.project_id,
            now
        ],
    )?;

    Ok(Resource {
        id,
        name: input.name.clone(),
        resource_type: input.resource_type,
        cost: input.cost,
        project_id: input.project_id.clone(),
        created_at: now,
    })
}

pub fn get_resource_by_id(conn: &Connection, id: &str) -> Result<Option<Resource>> {
    query_one(
        conn,
        &format!("SELECT {} FROM resources WHERE id = ?1", RESOURCE_COLS),
        &[&id],
    )
}

pub fn list_resources(conn: &Connection) -> Result<Vec<Resource>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM resources ORDER BY created_at DESC",
            RESOURCE_COLS
        ),
        [],
    )
}

pub fn list_resources_for_project(conn: &Connection, project_id: &str) -> Result<Vec<Resource>> {
    query_all(
        conn,
        &format!(
            "SELECT {} FROM resources WHERE project_id = ?1 ORDER BY created_at DESC",
            RESOURCE_COLS
        ),
        &[&project_id],
    )
}

pub fn update_resource(conn: &Connection, id: &str, input: &UpdateResource) -> Result<bool> {
    UpdateBuilder::new("resources", id)
        .set_opt("name", input.name.clone())
        .set_opt("type", input.resource_type.map(|t| t.as_ref().to_string()))
        .set_opt("cost", input.cost)
        .execute(conn)
}

pub fn delete_resource(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM resources WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn assign_resource(conn: &Connection, input: &AssignResource) -> Result<TaskResource> {
    let id = gen_id();
    conn.execute(
        "INSERT INTO task_resources (id, task_id, resource_id, quantity)
         VALUES (?1, ?2, ?3, ?4)",
        params![&id, &input.task_id, &input.resource_id, input.quantity],
    )?;
    Ok(TaskResource {
        id,
        task_id: input.task_id.clone(),
        resource_id: input.resource_id.clone(),
        quantity: input.quantity,
    })
}

pub fn unassign_resource(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM task_resources WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

pub fn list_task_resources(
    conn: &Connection,
    task_id: &str,
) -> Result<Vec<TaskResourceWithResource>> {
    let assignments: Vec<TaskResource> = query_all(
        conn,
        &format!(
            "SELECT {} FROM task_resources WHERE task_id = ?1",
            TASK_RESOURCE_COLS
        ),
        &[&task_id],
    )?;

    let mut results = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let resource = get_resource_by_id(conn, &assignment.resource_id)?
            .ok_or_else(|| AppError::Internal("Assignment references a missing resource".into()))?;
        results.push(TaskResourceWithResource {
            assignment,
            resource,
        });
    }
    Ok(results)
}

// ============ Costs ============

pub fn create_cost(conn: &Connection, input: &CreateCost) -> Result<Cost> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO costs (id, project_id, budget, spent, updated_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![&id, &input.project_id, input.budget, input.spent, now],
    )?;

    Ok(Cost {
        id,
        project_id: input.project_id.clone(),
        budget: input.budget,
        spent: input.spent,
        updated_at: now,
    })
}

pub fn get_cost_by_id(conn: &Connection, id: &str) -> Result<Option<Cost>> {
    query_one(
        conn,
        &format!("SELECT {} FROM costs WHERE id = ?1", COST_COLS),
        &[&id],
    )
}

pub fn list_costs_for_project(conn: &Connection, project_id: &str) -> Result<Vec<Cost>> {
    query_all(
        conn,
        &format!("SELECT {} FROM costs WHERE project_id = ?1", COST_COLS),
        &[&project_id],
    )
}

pub fn update_cost(conn: &Connection, id: &str, input: &UpdateCost) -> Result<bool> {
    UpdateBuilder::new("costs", id)
        .with_updated_at()
        .set_opt("budget", input.budget)
        .set_opt("spent", input.spent)
        .execute(conn)
}

pub fn delete_cost(conn: &Connection, id: &str) -> Result<bool> {
    let deleted = conn.execute("DELETE FROM costs WHERE id = ?1", params![id])?;
    Ok(deleted > 0)
}

// ============ Messages ============

pub fn create_message(
    conn: &Connection,
    sender_id: &str,
    receiver_id: &str,
    project_id: &str,
    content: &str,
) -> Result<Message> {
    let id = gen_id();
    let now = now();

    conn.execute(
        "INSERT INTO messages (id, sender_id, receiver_id, project_id, content, read, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
        params![&id, sender_id, receiver_id, project_id, content, now],
    )?;

    Ok(Message {
        id,
        sender_id: sender_id.to_string(),
        receiver_id: receiver_id.to_string(),
        project_id: project_id.to_string(),
        content: content.to_string(),
        read: false,
        created_at: now,
    })
}

/// Fan a message out to every project member except the sender, atomically.
/// Returns the number of messages written.
pub fn broadcast_message(
    conn: &mut Connection,
    sender_id: &str,
    project_id: &str,
    content: &str,
) -> Result<i64> {
    let tx = conn.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;

    let receiver_ids: Vec<String> = {
        let mut stmt = tx
            .prepare("SELECT user_id FROM project_users WHERE project_id = ?1 AND user_id != ?2")?;
        let rows = stmt.query_map(params![project_id, sender_id], |row| row.get(0))?;
        rows.collect::<rusqlite::Result<Vec<_>>>()?
    };

    let now = now();
    for receiver_id in &receiver_ids {
        tx.execute(
            "INSERT INTO messages (id, sender_id, receiver_id, project_id, content, read, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![gen_id(), sender_id, receiver_id, project_id, content, now],
        )?;
    }

    tx.commit()?;
    Ok(receiver_ids.len() as i64)
}

pub fn get_message_by_id(conn: &Connection, id: &str) -> Result<Option<Message>> {
    query_one(
        conn,
        &format!("SELECT {} FROM messages WHERE id = ?1", MESSAGE_COLS),
        &[&id],
    )
}

/// Messages sent by `user_id` in a project, newest first, receiver resolved.
pub fn list_sent_messages(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Vec<MessageWithUser>> {
    let messages: Vec<Message> = query_all(
        conn,
        &format!(
            "SELECT {} FROM messages WHERE sender_id = ?1 AND project_id = ?2
             ORDER BY created_at DESC",
            MESSAGE_COLS
        ),
        &[&user_id, &project_id],
    )?;

    let mut results = Vec::with_capacity(messages.len());
    for message in messages {
        let receiver = get_user_by_id(conn, &message.receiver_id)?.map(UserSummary::from);
        results.push(MessageWithUser {
            message,
            sender: None,
            receiver,
        });
    }
    Ok(results)
}

/// Messages received by `user_id` in a project, newest first, sender resolved.
pub fn list_received_messages(
    conn: &Connection,
    user_id: &str,
    project_id: &str,
) -> Result<Vec<MessageWithUser>> {
    let messages: Vec<Message> = query_all(
        conn,
        &format!(
            "SELECT {} FROM messages WHERE receiver_id = ?1 AND project_id = ?2
             ORDER BY created_at DESC",
            MESSAGE_COLS
        ),
        &[&user_id, &project_id],
    )?;

    let mut results = Vec::with_capacity(messages.len());
    for message in messages {
        let sender = get_user_by_id(conn, &message.sender_id)?.map(UserSummary::from);
        results.push(MessageWithUser {
            message,
            sender,
            receiver: None,
        });
    }
    Ok(results)
}

/// Unread count for a receiver, optionally scoped to one project.
pub fn count_unread_messages(
    conn: &Connection,
    user_id: &str,
    project_id: Option<&str>,
) -> Result<i64> {
    let count = match project_id {
        Some(project_id) => conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND project_id = ?2 AND read = 0",
            params![user_id, project_id],
            |row| row.get(0),
        )?,
        None => conn.query_row(
            "SELECT COUNT(*) FROM messages WHERE receiver_id = ?1 AND read = 0",
            params![user_id],
            |row| row.get(0),
        )?,
    };
    Ok(count)
}

/// Flip the read flag. One-way: unread -> read.
pub fn mark_message_read(conn: &Connection, id: &str) -> Result<bool> {
    let affected = conn.execute("UPDATE messages SET read = 1 WHERE id = ?1", params![id])?;
    Ok(affected > 0)
}
