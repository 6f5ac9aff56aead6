pub mod employee_id;
