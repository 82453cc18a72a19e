use crate::error::ApiError;
use crate::model::role::Role;
use actix_web::{FromRequest, HttpMessage, HttpRequest, dev::Payload};
use futures::future::{Ready, ready};

/// Canonical authenticated identity, populated by the auth middleware. Every
/// handler consumes this one shape regardless of which attribute the
/// credential row is indexed on.
#[derive(Clone)]
pub struct AuthUser {
    pub email: String,
    pub role: Role,

    /// Present only if this account is linked to an employee record
    pub employee_code: Option<String>,
}

impl FromRequest for AuthUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<AuthUser>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("Missing token".to_string()).into()),
        )
    }
}

impl AuthUser {
    pub fn require_admin(&self) -> Result<(), ApiError> {
        if self.role == Role::Admin {
            Ok(())
        } else {
            Err(ApiError::Forbidden("Admin access required".to_string()))
        }
    }

    /// Operations keyed by employee identity need an employee-linked account.
    pub fn require_employee_code(&self) -> Result<&str, ApiError> {
        self.employee_code
            .as_deref()
            .ok_or_else(|| ApiError::Forbidden("No employee profile".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role, code: Option<&str>) -> AuthUser {
        AuthUser {
            email: "x@y.com".to_string(),
            role,
            employee_code: code.map(str::to_string),
        }
    }

    #[test]
    fn only_admins_pass_the_admin_gate() {
        assert!(user(Role::Admin, None).require_admin().is_ok());
        assert!(user(Role::Employee, Some("TRD0001")).require_admin().is_err());
    }

    #[test]
    fn employee_operations_need_a_linked_code() {
        assert_eq!(
            user(Role::Employee, Some("TRD0001")).require_employee_code().unwrap(),
            "TRD0001"
        );
        assert!(user(Role::Admin, None).require_employee_code().is_err());
    }
}
