use crate::{
    auth::auth::AuthUser,
    error::{ApiError, on_duplicate_key},
    model::attendance::{Attendance, AttendanceStatus},
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use tracing::info;
use utoipa::{IntoParams, ToSchema};

/// Punch-in creates today's attendance row. The unique key on
/// (employee_code, date) makes a concurrent double punch-in lose as a
/// duplicate-key conflict.
#[utoipa::path(
    post,
    path = "/api/attendance/punch-in",
    responses(
        (status = 200, description = "Punched in", body = Object, example = json!({
            "message": "Punch-in successful",
            "status": "P"
        })),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Already punched in today", body = Object, example = json!({
            "message": "Already punched in today"
        })),
        (status = 401), (status = 403), (status = 500)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn punch_in(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let employee_code = auth.require_employee_code()?;

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE employee_code = ?)",
    )
    .bind(employee_code)
    .fetch_one(pool.get_ref())
    .await?;

    if !exists {
        return Err(ApiError::not_found("Employee not found"));
    }

    let now = Local::now().naive_local();
    let status = AttendanceStatus::derive_at_punch_in(now.time());

    sqlx::query(
        r#"
        INSERT INTO attendance (employee_code, date, punch_in, status)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(employee_code)
    .bind(now.date())
    .bind(now)
    .bind(status.as_str())
    .execute(pool.get_ref())
    .await
    .map_err(|e| on_duplicate_key(e, "Already punched in today"))?;

    info!(employee_code, status = status.as_str(), "punch-in");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Punch-in successful",
        "status": status.as_str()
    })))
}

/// Punch-out: requires today's punch-in and is terminal for the day.
#[utoipa::path(
    put,
    path = "/api/attendance/punch-out",
    responses(
        (status = 200, description = "Punched out", body = Object, example = json!({
            "message": "Punch-out successful"
        })),
        (status = 404, description = "No punch-in found for today"),
        (status = 409, description = "Already punched out today"),
        (status = 401), (status = 403), (status = 500)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn punch_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let employee_code = auth.require_employee_code()?;

    let now = Local::now().naive_local();

    let punched_out = sqlx::query_scalar::<_, Option<NaiveDateTime>>(
        "SELECT punch_out FROM attendance WHERE employee_code = ? AND date = ?",
    )
    .bind(employee_code)
    .bind(now.date())
    .fetch_optional(pool.get_ref())
    .await?;

    match punched_out {
        None => return Err(ApiError::not_found("No punch-in found for today")),
        Some(Some(_)) => return Err(ApiError::conflict("Already punched out today")),
        Some(None) => {}
    }

    sqlx::query(
        r#"
        UPDATE attendance
        SET punch_out = ?
        WHERE employee_code = ? AND date = ? AND punch_out IS NULL
        "#,
    )
    .bind(now)
    .bind(employee_code)
    .bind(now.date())
    .execute(pool.get_ref())
    .await?;

    info!(employee_code, "punch-out");

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Punch-out successful"
    })))
}

/// Own attendance history, newest first.
#[utoipa::path(
    get,
    path = "/api/attendance",
    responses(
        (status = 200, description = "Attendance history, newest first", body = [Attendance]),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn my_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    let employee_code = auth.require_employee_code()?;

    let records = sqlx::query_as::<_, Attendance>(
        r#"
        SELECT id, employee_code, date, punch_in, punch_out, status
        FROM attendance
        WHERE employee_code = ?
        ORDER BY date DESC
        "#,
    )
    .bind(employee_code)
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(records))
}

#[derive(Serialize, sqlx::FromRow, ToSchema)]
pub struct AttendanceWithName {
    pub id: u64,
    pub employee_code: String,
    pub name: String,
    #[schema(value_type = String, format = "date")]
    pub date: NaiveDate,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub punch_out: Option<NaiveDateTime>,
    pub status: String,
}

/// Full cross-employee history (admin), newest first.
#[utoipa::path(
    get,
    path = "/api/attendance/all",
    responses(
        (status = 200, description = "All attendance records", body = [AttendanceWithName]),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn all_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let records = sqlx::query_as::<_, AttendanceWithName>(
        r#"
        SELECT a.id, a.employee_code, e.name, a.date, a.punch_in, a.punch_out, a.status
        FROM attendance a
        JOIN employees e ON e.employee_code = a.employee_code
        ORDER BY a.date DESC, a.employee_code
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(records))
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct ExportQuery {
    /// Inclusive range start, YYYY-MM-DD
    #[schema(example = "2024-01-01")]
    pub start_date: Option<String>,
    /// Inclusive range end, YYYY-MM-DD
    #[schema(example = "2024-01-31")]
    pub end_date: Option<String>,
}

/// Both bounds required, parseable, and ordered.
fn validate_range(query: &ExportQuery) -> Result<(NaiveDate, NaiveDate), ApiError> {
    let (start, end) = match (query.start_date.as_deref(), query.end_date.as_deref()) {
        (Some(s), Some(e)) => (s, e),
        _ => return Err(ApiError::validation("Start date and end date are required")),
    };

    let start: NaiveDate = start
        .parse()
        .map_err(|_| ApiError::validation("Invalid start date, expected YYYY-MM-DD"))?;
    let end: NaiveDate = end
        .parse()
        .map_err(|_| ApiError::validation("Invalid end date, expected YYYY-MM-DD"))?;

    if start > end {
        return Err(ApiError::validation("start_date cannot be after end_date"));
    }

    Ok((start, end))
}

const EXPORT_HEADER: [&str; 6] = ["Employee ID", "Name", "Date", "Status", "Punch In", "Punch Out"];

struct ExportRow {
    employee_code: String,
    name: String,
    date: String,
    status: String,
    punch_in: String,
    punch_out: String,
}

fn format_punch(t: Option<NaiveDateTime>) -> String {
    t.map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn export_rows(records: &[AttendanceWithName]) -> Vec<ExportRow> {
    records
        .iter()
        .map(|r| ExportRow {
            employee_code: r.employee_code.clone(),
            name: r.name.clone(),
            date: r.date.to_string(),
            status: AttendanceStatus::label_for(&r.status).to_string(),
            punch_in: format_punch(r.punch_in),
            punch_out: format_punch(r.punch_out),
        })
        .collect()
}

/// An empty row set still yields a header-only artifact.
fn write_csv(rows: &[ExportRow]) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADER)?;
    for row in rows {
        writer.write_record([
            &row.employee_code,
            &row.name,
            &row.date,
            &row.status,
            &row.punch_in,
            &row.punch_out,
        ])?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("csv buffer error: {e}"))
}

/// Date-ranged attendance export (admin). Records whose employee is missing
/// from the directory are excluded by the join; an empty range is a valid,
/// header-only result.
#[utoipa::path(
    get,
    path = "/api/attendance/export",
    params(ExportQuery),
    responses(
        (status = 200, description = "CSV artifact", body = String, content_type = "text/csv"),
        (status = 400, description = "Missing or malformed date range"),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Attendance"
)]
pub async fn export_attendance(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<ExportQuery>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let (start, end) = validate_range(&query)?;

    let records = sqlx::query_as::<_, AttendanceWithName>(
        r#"
        SELECT a.id, a.employee_code, e.name, a.date, a.punch_in, a.punch_out, a.status
        FROM attendance a
        JOIN employees e ON e.employee_code = a.employee_code
        WHERE a.date BETWEEN ? AND ?
        ORDER BY a.employee_code, a.date
        "#,
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool.get_ref())
    .await?;

    let bytes = write_csv(&export_rows(&records))?;

    info!(%start, %end, rows = records.len(), "attendance exported");

    let file_name = format!("attendance_{}_{}.csv", start, end);
    Ok(HttpResponse::Ok()
        .content_type("text/csv")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(start: Option<&str>, end: Option<&str>) -> ExportQuery {
        ExportQuery {
            start_date: start.map(str::to_string),
            end_date: end.map(str::to_string),
        }
    }

    fn record(code: &str, name: &str, date: &str, status: &str) -> AttendanceWithName {
        AttendanceWithName {
            id: 1,
            employee_code: code.to_string(),
            name: name.to_string(),
            date: date.parse().unwrap(),
            punch_in: Some(format!("{}T09:15:00", date).parse().unwrap()),
            punch_out: None,
            status: status.to_string(),
        }
    }

    #[test]
    fn range_requires_both_bounds() {
        assert!(validate_range(&query(None, None)).is_err());
        assert!(validate_range(&query(Some("2024-01-01"), None)).is_err());
        assert!(validate_range(&query(None, Some("2024-01-31"))).is_err());
    }

    #[test]
    fn range_rejects_garbage_and_inversion() {
        assert!(validate_range(&query(Some("not-a-date"), Some("2024-01-31"))).is_err());
        assert!(validate_range(&query(Some("2024-02-01"), Some("2024-01-01"))).is_err());
    }

    #[test]
    fn valid_range_parses_inclusively() {
        let (s, e) = validate_range(&query(Some("2024-01-01"), Some("2024-01-31"))).unwrap();
        assert_eq!(s.to_string(), "2024-01-01");
        assert_eq!(e.to_string(), "2024-01-31");
        // single-day range is fine
        assert!(validate_range(&query(Some("2024-01-01"), Some("2024-01-01"))).is_ok());
    }

    #[test]
    fn rows_project_labels_and_placeholders() {
        let rows = export_rows(&[record("TRD0001", "John Doe", "2024-01-05", "H")]);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].status, "Half Day");
        assert_eq!(rows[0].punch_in, "09:15:00");
        assert_eq!(rows[0].punch_out, "-");
    }

    #[test]
    fn csv_has_stable_header_even_when_empty() {
        let bytes = write_csv(&[]).unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap().trim_end(),
            "Employee ID,Name,Date,Status,Punch In,Punch Out"
        );

        let bytes = write_csv(&export_rows(&[record("TRD0001", "John", "2024-01-05", "P")]))
            .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Employee ID,Name,Date,Status,Punch In,Punch Out"
        );
        assert_eq!(lines.next().unwrap(), "TRD0001,John,2024-01-05,Present,09:15:00,-");
    }
}
