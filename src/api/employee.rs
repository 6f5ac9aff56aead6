use actix_web::{HttpResponse, Responder, web};
use serde::Serialize;
use utoipa::ToSchema;

use crate::utils::employee_id::validate_employee_id;

#[derive(Debug, Serialize, ToSchema)]
pub struct EmployeeIdCheck {
    #[schema(example = "f881234")]
    pub id: String,
    #[schema(example = true)]
    pub valid: bool,
}

/// Validate an employee badge id
#[utoipa::path(
    get,
    path = "/employee/validate/{id}",
    params(
        ("id", Path, description = "Scanned employee badge")
    ),
    responses(
        (status = 200, description = "Validation result", body = EmployeeIdCheck)
    ),
    tag = "Employee"
)]
pub async fn validate_employee(path: web::Path<String>) -> impl Responder {
    let id = path.into_inner();
    let valid = validate_employee_id(&id);
    tracing::debug!(id = %id, valid, "employee id checked");

    HttpResponse::Ok().json(EmployeeIdCheck { id, valid })
}
