use crate::api::attendance::{AttendanceWithName, ExportQuery};
use crate::api::employee::{CreateEmployee, UpdateEmployee};
use crate::api::leave::{DecideLeave, SubmitLeave};
use crate::api::payroll::PayslipRequest;
use crate::api::task::{AssignTask, UpdateTaskStatus};
use crate::model::attendance::Attendance;
use crate::model::employee::Employee;
use crate::model::leave::LeaveRequest;
use crate::model::task::Task;
use crate::models::{AdminLoginReq, EmployeeLoginReq, LoginResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Portal API",
        version = "1.0.0",
        description = r#"
## HR Portal Backend

Employee records, attendance punch-in/out, leave workflow, salary-slip
generation and task assignment, with role-based (admin/employee) JWT auth.

### Key features
- **Employee Management** — create (with generated employee codes and paired
  credentials), update, list, view and delete employee profiles
- **Attendance** — daily punch-in/punch-out with derived Present/Half Day
  status and a date-ranged CSV export
- **Leave Workflow** — submit, approve/reject (terminal states), list
- **Payroll** — on-demand salary-slip PDFs, downloadable or emailed
- **Tasks** — assignment and forward-only status tracking

### Security
Everything under the API prefix requires a **JWT Bearer token**; admin-only
operations additionally check the role claim.
"#,
    ),
    paths(
        crate::auth::handlers::admin_login,
        crate::auth::handlers::employee_login,

        crate::api::employee::create_employee,
        crate::api::employee::list_employees,
        crate::api::employee::get_employee,
        crate::api::employee::update_employee,
        crate::api::employee::delete_employee,

        crate::api::attendance::punch_in,
        crate::api::attendance::punch_out,
        crate::api::attendance::my_attendance,
        crate::api::attendance::all_attendance,
        crate::api::attendance::export_attendance,

        crate::api::leave::submit_leave,
        crate::api::leave::decide_leave,
        crate::api::leave::list_leaves,

        crate::api::payroll::generate_payslip,
        crate::api::payroll::email_payslip,

        crate::api::task::assign_task,
        crate::api::task::list_tasks,
        crate::api::task::update_task_status
    ),
    components(
        schemas(
            AdminLoginReq,
            EmployeeLoginReq,
            LoginResponse,
            Employee,
            CreateEmployee,
            UpdateEmployee,
            Attendance,
            AttendanceWithName,
            ExportQuery,
            SubmitLeave,
            DecideLeave,
            LeaveRequest,
            PayslipRequest,
            AssignTask,
            UpdateTaskStatus,
            Task
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Login endpoints"),
        (name = "Employee", description = "Employee directory APIs"),
        (name = "Attendance", description = "Attendance tracking and export APIs"),
        (name = "Leave", description = "Leave workflow APIs"),
        (name = "Payroll", description = "Salary slip APIs"),
        (name = "Task", description = "Task assignment APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
