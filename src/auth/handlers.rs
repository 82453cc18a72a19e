use crate::{
    auth::{jwt::generate_token, password::verify_password},
    config::Config,
    error::ApiError,
    model::role::Role,
    model::user::User,
    models::{AdminLoginReq, EmployeeLoginReq, LoginResponse},
};
use actix_web::{HttpResponse, Responder, web};
use sqlx::MySqlPool;
use tracing::{debug, info, instrument};

/// Admin login: address plus password, verified against the stored hash.
#[utoipa::path(
    post,
    path = "/auth/admin/login",
    request_body = AdminLoginReq,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing credentials"),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "Auth"
)]
#[instrument(name = "admin_login", skip(pool, config, body), fields(email = %body.email))]
pub async fn admin_login(
    body: web::Json<AdminLoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    if body.email.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::validation("Email and password are required"));
    }

    debug!("Fetching admin account");

    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, email, password, role_id, employee_code
        FROM users
        WHERE email = ? AND role_id = ?
        "#,
    )
    .bind(&body.email)
    .bind(Role::Admin as u8)
    .fetch_optional(pool.get_ref())
    .await?;

    let user = user.ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    // Invariant: an admin account always has a secret
    let hash = user
        .password
        .as_deref()
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if verify_password(&body.password, hash).is_err() {
        info!("Invalid credentials: password mismatch");
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_token(
        user.email.clone(),
        Role::Admin as u8,
        user.employee_code,
        &config.jwt_secret,
        config.access_token_ttl,
    );

    info!("Admin login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        email: user.email,
        role: Role::Admin.as_str().to_string(),
    }))
}

/// Employee login: passwordless, keyed by the registered address. Requires an
/// existing employee record; accounts are never provisioned here.
#[utoipa::path(
    post,
    path = "/auth/employee/login",
    request_body = EmployeeLoginReq,
    responses(
        (status = 200, description = "Token issued", body = LoginResponse),
        (status = 400, description = "Missing email"),
        (status = 401, description = "No employee registered for this address")
    ),
    tag = "Auth"
)]
#[instrument(name = "employee_login", skip(pool, config, body), fields(email = %body.email))]
pub async fn employee_login(
    body: web::Json<EmployeeLoginReq>,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> Result<impl Responder, ApiError> {
    if body.email.trim().is_empty() {
        return Err(ApiError::validation("Email is required"));
    }

    let employee_code = sqlx::query_scalar::<_, String>(
        "SELECT employee_code FROM employees WHERE email = ?",
    )
    .bind(&body.email)
    .fetch_optional(pool.get_ref())
    .await?;

    let employee_code = employee_code.ok_or_else(|| {
        info!("No employee registered for this address");
        ApiError::Unauthorized("No employee registered for this address".to_string())
    })?;

    let token = generate_token(
        body.email.clone(),
        Role::Employee as u8,
        Some(employee_code),
        &config.jwt_secret,
        config.access_token_ttl,
    );

    info!("Employee login successful");

    Ok(HttpResponse::Ok().json(LoginResponse {
        token,
        email: body.email.clone(),
        role: Role::Employee.as_str().to_string(),
    }))
}
