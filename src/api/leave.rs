use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::{
        leave::{LeaveDecision, LeaveRequest, LeaveStatus},
        role::Role,
    },
    notify::{Notifier, log_if_failed},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SubmitLeave {
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: Option<NaiveDate>,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: Option<NaiveDate>,
    #[schema(example = "Family event")]
    pub reason: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct DecideLeave {
    /// One of `approved` | `rejected`
    #[schema(example = "approved")]
    pub status: Option<String>,
}

/// Submit a leave request (employee). Creates a pending record and fires a
/// best-effort notification to the admin mailbox.
#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = SubmitLeave,
    responses(
        (status = 200, description = "Leave request submitted", body = Object, example = json!({
            "message": "Leave request submitted successfully"
        })),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Employee not found"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn submit_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<SubmitLeave>,
) -> Result<impl Responder, ApiError> {
    let employee_code = auth.require_employee_code()?;

    let (start_date, end_date, reason) = match (
        payload.start_date,
        payload.end_date,
        payload.reason.as_deref().filter(|s| !s.trim().is_empty()),
    ) {
        (Some(s), Some(e), Some(r)) => (s, e, r),
        _ => return Err(ApiError::validation("All fields are required")),
    };

    if start_date > end_date {
        return Err(ApiError::validation("start_date cannot be after end_date"));
    }

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
        INSERT INTO leave_requests (employee_code, start_date, end_date, reason, status)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_code)
    .bind(start_date)
    .bind(end_date)
    .bind(reason)
    .bind(LeaveStatus::Pending.as_str())
    .execute(pool.get_ref())
    .await?;

    info!(employee_code, %start_date, %end_date, "leave request submitted");

    log_if_failed(
        notifier
            .send(
                &notifier.admin_email,
                "New Leave Request",
                &format!(
                    "Employee {} submitted a leave request from {} to {}. Reason: {}",
                    employee_code, start_date, end_date, reason
                ),
            )
            .await,
        "leave submission notice",
    );

    Ok(HttpResponse::Ok().json(json!({
        "message": "Leave request submitted successfully"
    })))
}

/// Decide a leave request (admin): pending → approved/rejected, both terminal.
/// Re-deciding an already-terminal request is rejected outright.
#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "Leave request id")),
    request_body = DecideLeave,
    responses(
        (status = 200, description = "Leave request decided", body = Object, example = json!({
            "message": "Leave request approved successfully"
        })),
        (status = 400, description = "Invalid status value"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already decided"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn decide_leave(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    path: web::Path<u64>,
    payload: web::Json<DecideLeave>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let leave_id = path.into_inner();

    let decision = payload
        .status
        .as_deref()
        .and_then(LeaveDecision::parse)
        .ok_or_else(|| ApiError::validation("Invalid status"))?;

    let leave = sqlx::query_as::<_, LeaveRequest>(
        r#"
        SELECT id, employee_code, start_date, end_date, reason, status, created_at
        FROM leave_requests
        WHERE id = ?
        "#,
    )
    .bind(leave_id)
    .fetch_optional(pool.get_ref())
    .await?
    .ok_or_else(|| ApiError::not_found("Leave request not found"))?;

    let current = LeaveStatus::from_str(&leave.status)
        .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("corrupt leave status tag")))?;

    let next = current
        .decide(decision)
        .map_err(|e| ApiError::conflict(e.to_string()))?;

    // The pending guard also loses a race against a concurrent decision.
    let result = sqlx::query(
        "UPDATE leave_requests SET status = ? WHERE id = ? AND status = 'pending'",
    )
    .bind(next.as_str())
    .bind(leave_id)
    .execute(pool.get_ref())
    .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::conflict("Leave request already processed"));
    }

    info!(leave_id, status = next.as_str(), "leave request decided");

    // Best-effort notice to the employee's registered address.
    let email = address_for_notice(
        sqlx::query_scalar::<_, String>("SELECT email FROM employees WHERE employee_code = ?")
            .bind(&leave.employee_code)
            .fetch_optional(pool.get_ref())
            .await,
    );

    if let Some(email) = email {
        let subject = match decision {
            LeaveDecision::Approve => "Leave Request Approved",
            LeaveDecision::Reject => "Leave Request Rejected",
        };
        log_if_failed(
            notifier
                .send(
                    &email,
                    subject,
                    &format!(
                        "Your leave request from {} to {} has been {}.",
                        leave.start_date,
                        leave.end_date,
                        next.as_str()
                    ),
                )
                .await,
            "leave decision notice",
        );
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave request {} successfully", next.as_str())
    })))
}

/// Address lookup failures stay on the side channel: logged, then treated as
/// "no address", never surfaced to the decision's caller.
fn address_for_notice(result: Result<Option<String>, sqlx::Error>) -> Option<String> {
    match result {
        Ok(email) => email,
        Err(e) => {
            warn!(error = %e, "address lookup for decision notice failed; skipping");
            None
        }
    }
}

/// List leave requests. Admin sees every request (unordered, as the admin
/// dashboard consumes it); an employee sees only their own, newest first.
#[utoipa::path(
    get,
    path = "/api/leave",
    responses(
        (status = 200, description = "Leave request list", body = [LeaveRequest]),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Leave"
)]
pub async fn list_leaves(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let leaves = match auth.role {
        Role::Admin => {
            sqlx::query_as::<_, LeaveRequest>(
                r#"
                SELECT id, employee_code, start_date, end_date, reason, status, created_at
                FROM leave_requests
                "#,
            )
            .fetch_all(pool.get_ref())
            .await?
        }
        Role::Employee => {
            let employee_code = auth.require_employee_code()?;
            sqlx::query_as::<_, LeaveRequest>(
                r#"
                SELECT id, employee_code, start_date, end_date, reason, status, created_at
                FROM leave_requests
                WHERE employee_code = ?
                ORDER BY created_at DESC
                "#,
            )
            .bind(employee_code)
            .fetch_all(pool.get_ref())
            .await?
        }
    };

    Ok(HttpResponse::Ok().json(leaves))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notice_address_passes_through_lookup_results() {
        assert_eq!(
            address_for_notice(Ok(Some("j@x.com".to_string()))),
            Some("j@x.com".to_string())
        );
        assert_eq!(address_for_notice(Ok(None)), None);
    }

    #[test]
    fn notice_address_defaults_on_storage_failure() {
        assert_eq!(address_for_notice(Err(sqlx::Error::RowNotFound)), None);
    }
}
