use serde::{Deserialize, Serialize};

/// Credential row paired with an employee (or a standalone admin account).
/// Admin accounts always carry a password hash; employee accounts may be
/// passwordless.
#[derive(Debug, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: u64,
    pub email: String,
    pub password: Option<String>,
    pub role_id: u8,
    pub employee_code: Option<String>,
}
