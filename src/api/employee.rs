use crate::{
    auth::auth::AuthUser,
    error::{ApiError, on_duplicate_key},
    model::{employee::Employee, role::Role},
    notify::{Notifier, log_if_failed},
    utils::employee_code::{CodeError, generate_employee_code},
};
use actix_web::{HttpResponse, Responder, web};
use rand::{Rng, distributions::Alphanumeric};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct CreateEmployee {
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[schema(example = "john.doe@gmail.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Software Engineer")]
    pub position: Option<String>,
    #[schema(example = 50000.0)]
    pub salary: Option<f64>,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "ABCDE1234F", nullable = true)]
    pub tax_id: Option<String>,
}

#[derive(Deserialize, ToSchema)]
pub struct UpdateEmployee {
    #[schema(example = "John Doe")]
    pub name: Option<String>,
    #[schema(example = "john.doe@gmail.com", format = "email", value_type = String)]
    pub email: Option<String>,
    #[schema(example = "Senior Engineer")]
    pub position: Option<String>,
    #[schema(example = 60000.0)]
    pub salary: Option<f64>,
    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,
    #[schema(example = "ABCDE1234F", nullable = true)]
    pub tax_id: Option<String>,
}

fn random_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(8)
        .map(char::from)
        .collect()
}

/// Shared create/update validation: the four mandatory fields present and
/// non-blank, salary non-negative.
fn validate_profile<'a>(
    name: &'a Option<String>,
    email: &'a Option<String>,
    position: &'a Option<String>,
    salary: Option<f64>,
) -> Result<(&'a str, &'a str, &'a str, f64), ApiError> {
    let (name, email, position, salary) = match (
        name.as_deref().filter(|s| !s.trim().is_empty()),
        email.as_deref().filter(|s| !s.trim().is_empty()),
        position.as_deref().filter(|s| !s.trim().is_empty()),
        salary,
    ) {
        (Some(n), Some(e), Some(p), Some(s)) => (n, e, p, s),
        _ => return Err(ApiError::validation("All fields are required")),
    };

    if salary < 0.0 {
        return Err(ApiError::validation("Salary must be non-negative"));
    }

    Ok((name, email, position, salary))
}

/// Create Employee (admin). Assigns a fresh employee code, pairs a credential
/// row, and sends a best-effort welcome mail with the generated password.
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 200, description = "Employee created", body = Object, example = json!({
            "message": "Employee added successfully",
            "employee_code": "TRD1042"
        })),
        (status = 400, description = "Missing fields"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Internal server error")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn create_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    notifier: web::Data<Notifier>,
    payload: web::Json<CreateEmployee>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let (name, email, position, salary) =
        validate_profile(&payload.name, &payload.email, &payload.position, payload.salary)?;

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ?)",
    )
    .bind(email)
    .fetch_one(pool.get_ref())
    .await?;

    if exists {
        return Err(ApiError::conflict("Email already exists"));
    }

    let employee_code = generate_employee_code(pool.get_ref()).await.map_err(|e| match e {
        CodeError::Exhausted => {
            error!("employee code space exhausted");
            ApiError::Internal(anyhow::anyhow!(e))
        }
        CodeError::Database(e) => ApiError::Database(e),
    })?;

    let password = random_password();
    let hashed = crate::auth::password::hash_password(&password);

    let mut tx = pool.get_ref().begin().await?;

    sqlx::query(
        r#"
        INSERT INTO employees (employee_code, name, email, position, salary, department, tax_id)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&employee_code)
    .bind(name)
    .bind(email)
    .bind(position)
    .bind(salary)
    .bind(&payload.department)
    .bind(&payload.tax_id)
    .execute(&mut *tx)
    .await
    .map_err(|e| on_duplicate_key(e, "Email already exists"))?;

    sqlx::query(
        r#"
        INSERT INTO users (email, password, role_id, employee_code)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(email)
    .bind(&hashed)
    .bind(Role::Employee as u8)
    .bind(&employee_code)
    .execute(&mut *tx)
    .await
    .map_err(|e| on_duplicate_key(e, "An account already exists for this address"))?;

    tx.commit().await?;

    info!(employee_code, email, "employee created");

    // Welcome mail only changes the response message, never the outcome.
    let welcome = notifier
        .send(
            email,
            "Welcome to Fintradify HR Portal",
            &format!(
                "Your account has been created. Employee ID: {}, Password: {}",
                employee_code, password
            ),
        )
        .await;

    let message = match &welcome {
        Ok(()) => "Employee added successfully",
        Err(_) => "Employee added successfully, but email sending failed",
    };
    log_if_failed(welcome, "welcome email");

    Ok(HttpResponse::Ok().json(json!({
        "message": message,
        "employee_code": employee_code
    })))
}

/// List all employees (admin)
#[utoipa::path(
    get,
    path = "/api/employees",
    responses(
        (status = 200, description = "Employee list", body = [Employee]),
        (status = 401), (status = 403)
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let employees = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, name, email, position, salary, department, tax_id
        FROM employees
        ORDER BY id DESC
        "#,
    )
    .fetch_all(pool.get_ref())
    .await?;

    Ok(HttpResponse::Ok().json(employees))
}

/// Get one employee by code (admin)
#[utoipa::path(
    get,
    path = "/api/employees/{employee_code}",
    params(("employee_code" = String, Path, description = "Employee code")),
    responses(
        (status = 200, description = "Employee found", body = Employee),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn get_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let employee_code = path.into_inner();

    let employee = sqlx::query_as::<_, Employee>(
        r#"
        SELECT id, employee_code, name, email, position, salary, department, tax_id
        FROM employees
        WHERE employee_code = ?
        "#,
    )
    .bind(&employee_code)
    .fetch_optional(pool.get_ref())
    .await?;

    match employee {
        Some(emp) => Ok(HttpResponse::Ok().json(emp)),
        None => Err(ApiError::not_found("Employee not found")),
    }
}

/// Update Employee (admin). Full replacement of the mutable attributes; the
/// employee code itself is immutable.
#[utoipa::path(
    put,
    path = "/api/employees/{employee_code}",
    params(("employee_code" = String, Path, description = "Employee code")),
    request_body = UpdateEmployee,
    responses(
        (status = 200, description = "Employee updated"),
        (status = 400, description = "Missing fields"),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Email already exists")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn update_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
    payload: web::Json<UpdateEmployee>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let employee_code = path.into_inner();

    let (name, email, position, salary) =
        validate_profile(&payload.name, &payload.email, &payload.position, payload.salary)?;

    let taken = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM employees WHERE email = ? AND employee_code <> ?)",
    )
    .bind(email)
    .bind(&employee_code)
    .fetch_one(pool.get_ref())
    .await?;

    if taken {
        return Err(ApiError::conflict("Email already exists"));
    }

    let result = sqlx::query(
        r#"
        UPDATE employees
        SET name = ?, email = ?, position = ?, salary = ?, department = ?, tax_id = ?
        WHERE employee_code = ?
        "#,
    )
    .bind(name)
    .bind(email)
    .bind(position)
    .bind(salary)
    .bind(&payload.department)
    .bind(&payload.tax_id)
    .bind(&employee_code)
    .execute(pool.get_ref())
    .await
    .map_err(|e| on_duplicate_key(e, "Email already exists"))?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee updated successfully"
    })))
}

/// Delete Employee (admin). Removes the employee and its paired credential in
/// one transaction.
#[utoipa::path(
    delete,
    path = "/api/employees/{employee_code}",
    params(("employee_code" = String, Path, description = "Employee code")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Employee"
)]
pub async fn delete_employee(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    path: web::Path<String>,
) -> Result<impl Responder, ApiError> {
    auth.require_admin()?;

    let employee_code = path.into_inner();

    let mut tx = pool.get_ref().begin().await?;

    let result = sqlx::query("DELETE FROM employees WHERE employee_code = ?")
        .bind(&employee_code)
        .execute(&mut *tx)
        .await?;

    if result.rows_affected() == 0 {
        return Err(ApiError::not_found("Employee not found"));
    }

    sqlx::query("DELETE FROM users WHERE employee_code = ?")
        .bind(&employee_code)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;

    info!(employee_code, "employee and credential deleted");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Employee deleted successfully"
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(
        name: Option<&str>,
        email: Option<&str>,
        position: Option<&str>,
    ) -> (Option<String>, Option<String>, Option<String>) {
        (
            name.map(str::to_string),
            email.map(str::to_string),
            position.map(str::to_string),
        )
    }

    #[test]
    fn profile_requires_every_field() {
        let (name, email, position) = fields(Some("John"), Some("j@x.com"), Some("Engineer"));
        assert!(validate_profile(&name, &email, &position, Some(50000.0)).is_ok());

        let (none, ..) = fields(None, None, None);
        assert!(validate_profile(&none, &email, &position, Some(50000.0)).is_err());
        assert!(validate_profile(&name, &email, &position, None).is_err());

        let (blank, ..) = fields(Some("  "), None, None);
        assert!(validate_profile(&blank, &email, &position, Some(50000.0)).is_err());
    }

    #[test]
    fn profile_rejects_negative_salary() {
        let (name, email, position) = fields(Some("John"), Some("j@x.com"), Some("Engineer"));
        // same guard on create and update: both go through validate_profile
        assert!(matches!(
            validate_profile(&name, &email, &position, Some(-1000.0)),
            Err(ApiError::Validation(_))
        ));
        assert!(validate_profile(&name, &email, &position, Some(0.0)).is_ok());
    }

    #[test]
    fn generated_passwords_are_eight_alphanumerics() {
        for _ in 0..50 {
            let p = random_password();
            assert_eq!(p.len(), 8);
            assert!(p.chars().all(|c| c.is_ascii_alphanumeric()));
        }
    }
}
