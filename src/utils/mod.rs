pub mod employee_code;
