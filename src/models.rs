use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct AdminLoginReq {
    #[schema(example = "hr@fintradify.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "secret")]
    pub password: String,
}

/// Employee login is passwordless: the address alone identifies the account.
#[derive(Deserialize, ToSchema)]
pub struct EmployeeLoginReq {
    #[schema(example = "john.doe@gmail.com", format = "email", value_type = String)]
    pub email: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    #[schema(example = "john.doe@gmail.com")]
    pub email: String,
    #[schema(example = "employee")]
    pub role: String,
}

/// One canonical identity shape for every token, whatever the credential row
/// happens to be indexed on: address in `sub`, employee code when the account
/// is linked to one, role as its numeric id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: u8,
    pub exp: usize,
    pub jti: String,

    /// Present only if this account is linked to an employee record
    pub employee_code: Option<String>,
}
