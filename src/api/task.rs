use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::{
        role::Role,
        task::{Task, TaskStatus},
    },
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::info;
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AssignTask {
    #[schema(example = "TRD1042")]
    pub employee_code: Option<String>,
    #[schema(example = "Quarterly report")]
    pub title: Option<String>,
    #[schema(example = "Prepare the Q3 attendance summary")]
    pub description: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateTaskStatus {
    /// One of `assigned` | `in-progress` | `completed`
    #[schema(example = "in-progress")]
    pub status: Option<String>,
}

/// Assign a task to an employee (admin).
#[utoipa::path(
    post,
    path = "/api/tasks",
    request_body = AssignTask,
    responses(
        (status = 200, description = "Task assigned", body = Object, example = json!({
            "message": "Task assigned successfully"
        })),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Employee not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn assign_task(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<AssignTask>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let (employee_code, title, description) = match (
        payload.employee_code.as_deref().filter(|s| !s.trim().is_empty()),
        payload.title.as_deref().filter(|s| !s.trim().is_empty()),
        payload.description.as_deref().filter(|s| !s.trim().is_empty()),
    ) {
        (Some(c), Some(t), Some(d)) => (c, t, d),
        _ => return Err(ApiError::validation("All fields are required")),
    };

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_code = ?)",
    )
    .bind(employee_code)
    .fetch_one(pool.get_ref())
    .await?;

    if !exists {
        return Err(ApiError::not_found("Employee not found"));
    }

    sqlx::query(
        r#"
        INSERT INTO tasks (employee_code, title, description, status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_code)
    .bind(title)
    .bind(description)
    .bind(TaskStatus::Assigned.as_str())
    .execute(pool.get_ref())
    .await?;

    info!(employee_code, title, "task assigned");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task assigned successfully"
    })))
}

/// List tasks: admin sees all, an employee sees their own.
#[utoipa::path(
    get,
    path = "/api/tasks",
    responses(
        (status = 200, description = "Task list", body = [Task]),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn list_tasks(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let tasks = match auth.role {
        Role::Admin => {
            sqlx::query_as::<_, Task>(
                r#"
                SELECT id, employee_code, title, description, status, created_at
                FROM tasks
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(pool.get_ref())
            .await?
        }
        Role::Employee => {
            let employee_code = auth.require_employee_code()?;
            sqlx::query_as::<_, Task>(
                r#"
                SELECT id, employee_code, title, description, status, created_at
                FROM tasks
                WHERE employee_code = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(employee_code)
            .fetch_all(pool.get_ref())
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(tasks))
}

/// Advance a task's status (admin). Transitions only move forward through
/// assigned → in-progress → completed.
#[utoipa::path(
    put,
    path = "/api/tasks/{task_id}",
    params(("task_id" = u64, Path, description = "Task id")),
    request_body = UpdateTaskStatus,
    responses(
        (status = 200, description = "Status updated", body = Object, example = json!({
            "message": "Task status updated"
        })),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Task not found"),
        (status = 409, description = "Backward transition rejected"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Task"
)]
pub async fn update_task_status(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
    payload: web::Json<UpdateTaskStatus>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let task_id = path.into_inner();

    let next = payload
        .status
        .as_deref()
        .and_then(TaskStatus::from_str)
        .ok_or_else(|| ApiError::validation("Invalid status"))?;

    let current = sqlx::query_scalar::<_, String>("SELECT status FROM tasks WHERE id = ?")
        .bind(task_id)
        .fetch_optional(pool.get_ref())
        .await?
        .ok_or_else(|| ApiError::not_found("Task not found"))?;

    let current = TaskStatus::from_str(&current)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("corrupt task status tag")))?;

    if !current.can_advance_to(next) {
        return Err(ApiError::conflict(format!(
            "Task already {}, cannot move back to {}",
            current.as_str(),
            next.as_str()
        )));
    }

    sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
        .bind(next.as_str())
        .bind(task_id)
        .execute(pool.get_ref())
        .await?;

    info!(task_id, status = next.as_str(), "task status updated");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Task status updated"
    })))
}
