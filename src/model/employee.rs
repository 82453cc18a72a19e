use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(
    example = json!({
        "id": 1,
        "employee_code": "TRD1042",
        "name": "John Doe",
        "email": "john.doe@gmail.com",
        "position": "Software Engineer",
        "salary": 50000.0,
        "department": "Engineering",
        "tax_id": "ABCDE1234F"
    })
)]
pub struct Employee {
    #[schema(example = 1)]
    pub id: u64,

    /// Immutable once assigned; globally unique.
    #[schema(example = "TRD1042")]
    pub employee_code: String,

    #[schema(example = "John Doe")]
    pub name: String,

    #[schema(example = "john.doe@gmail.com")]
    pub email: String,

    #[schema(example = "Software Engineer")]
    pub position: String,

    #[schema(example = 50000.0)]
    pub salary: f64,

    #[schema(example = "Engineering", nullable = true)]
    pub department: Option<String>,

    #[schema(example = "ABCDE1234F", nullable = true)]
    pub tax_id: Option<String>,
}
