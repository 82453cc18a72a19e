use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::employee::Employee,
    notify::Notifier,
    payslip,
};
use actix_web::{HttpResponse, Responder, web};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{info, warn};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct PayslipRequest {
    #[schema(example = "TRD1042")]
    pub employee_code: Option<String>,
    #[schema(example = "January")]
    pub month: Option<String>,
    #[schema(example = "2026")]
    pub year: Option<String>,
}

fn validate(payload: &PayslipRequest) -> Result<(&str, &str, &str), ApiError> {
    match (
        payload.employee_code.as_deref().filter(|s| !s.trim().is_empty()),
        payload.month.as_deref().filter(|s| !s.trim().is_empty()),
        payload.year.as_deref().filter(|s| !s.trim().is_empty()),
    ) {
        (Some(c), Some(m), Some(y)) => Ok((c, m, y)),
        _ => Err(ApiError::validation("All fields are required")),
    }
}

async fn fetch_employee(pool: &MySqlPool, employee_code: &str) -> Result<Employee, ApiError> {
    sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, name, email, position, salary, department, tax_id
        FROM employees
        WHERE employee_code = ?
        "#,
    )
    .bind(employee_code)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| ApiError::not_found("Employee not found"))
}

/// Generate a salary slip and stream it back as a download (admin).
#[utoipa::path(
    post,
    path = "/api/payslip/generate",
    request_body = PayslipRequest,
    responses(
        (status = 200, description = "PDF artifact", body = Vec<u8>, content_type = "application/pdf"),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Employee not found"),
        (status = 401), (status = 403), (status = 500)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn generate_payslip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<PayslipRequest>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let (employee_code, month, year) = validate(&payload)?;
    let employee = fetch_employee(pool.get_ref(), employee_code).await?;

    let bytes = payslip::render(&employee, month, year)?;
    let file_name = payslip::file_name(employee_code, month, year);

    info!(employee_code, month, year, "payslip generated");

    Ok(HttpResponse::Ok()
        .content_type("application/pdf")
        .insert_header((
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", file_name),
        ))
        .body(bytes))
}

/// Generate a salary slip and mail it to the employee's registered address
/// (admin). A delivery failure is partial success: the slip was generated, so
/// the response stays 200 with an adjusted message.
#[utoipa::path(
    post,
    path = "/api/payslip/email",
    request_body = PayslipRequest,
    responses(
        (status = 200, description = "Mailed (or generated with delivery failure)", body = Object, example = json!({
            "message": "Salary slip emailed successfully"
        })),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Employee not found"),
        (status = 401), (status = 403), (status = 500)
    ),
    security(("bearer_auth" = [])),
    tag = "Payroll"
)]
pub async fn email_payslip(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<PayslipRequest>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let (employee_code, month, year) = validate(&payload)?;
    let employee = fetch_employee(pool.get_ref(), employee_code).await?;

    let bytes = payslip::render(&employee, month, year)?;
    let file_name = payslip::file_name(employee_code, month, year);

    let subject = format!("Salary Slip for {} {}", month, year);
    let body = format!(
        "Dear {},\n\nPlease find attached your salary slip for {} {}.\n\nBest regards,\n{} HR Team",
        employee.name, month, year, payslip::COMPANY_NAME
    );

    let delivery = notifier
        .send_with_attachment(
            &employee.email,
            &subject,
            &body,
            &file_name,
            bytes,
            "application/pdf",
        )
        .await;

    let message = match delivery {
        Ok(()) => {
            info!(employee_code, month, year, "payslip emailed");
            "Salary slip emailed successfully"
        }
        Err(e) => {
            warn!(error = %e, employee_code, "payslip delivery failed; slip was generated");
            "Salary slip generated, but email sending failed"
        }
    };

    Ok(HttpResponse::Ok().json(json!({ "message": message })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(code: Option<&str>, month: Option<&str>, year: Option<&str>) -> PayslipRequest {
        PayslipRequest {
            employee_code: code.map(str::to_string),
            month: month.map(str::to_string),
            year: year.map(str::to_string),
        }
    }

    #[test]
    fn all_three_fields_are_mandatory() {
        assert!(validate(&req(None, Some("January"), Some("2026"))).is_err());
        assert!(validate(&req(Some("TRD1042"), None, Some("2026"))).is_err());
        assert!(validate(&req(Some("TRD1042"), Some("January"), None)).is_err());
        assert!(validate(&req(Some("  "), Some("January"), Some("2026"))).is_err());
        assert!(validate(&req(Some("TRD1042"), Some("January"), Some("2026"))).is_ok());
    }
}
