//! Axum HTTP handlers.

pub mod classes;
pub mod health;
pub mod marks;
pub mod resources;
pub mod student;
pub mod syllabus;

use axum::routing::{delete, get, post, put};
use axum::Router;
use uuid::Uuid;

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::models::SchoolClass;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        // Teacher: classes and membership
        .route("/api/classes", get(classes::list_classes))
        .route("/api/classes", post(classes::create_class))
        .route("/api/classes/{id}", get(classes::get_class))
        .route("/api/classes/{id}", delete(classes::delete_class))
        .route("/api/classes/{id}/students", post(classes::add_student))
        .route(
            "/api/classes/{id}/students/{email}",
            delete(classes::remove_student),
        )
        .route("/api/classes/{id}/subjects", post(classes::add_subject))
        .route(
            "/api/classes/{id}/subjects/{subject}",
            delete(classes::remove_subject),
        )
        // Teacher: marks and content
        .route("/api/marks", put(marks::upsert_mark))
        .route("/api/students/{email}", get(marks::student_profile))
        .route("/api/classes/{id}/syllabus", put(syllabus::upload_syllabus))
        .route(
            "/api/classes/{id}/syllabus/{subject}",
            get(syllabus::get_syllabus),
        )
        .route("/api/resources", put(resources::replace_resources))
        // Student
        .route("/api/me/dashboard", get(student::dashboard))
        .route("/api/me/resources", get(student::resource_recommendations))
        .with_state(state)
}

/// Load a class the calling teacher owns.
pub(crate) fn owned_class(
    state: &AppState,
    ctx: &AuthContext,
    class_id: Uuid,
) -> Result<SchoolClass, AppError> {
    ctx.require_teacher()?;
    let class = state
        .store
        .get_class(class_id)
        .ok_or_else(|| AppError::NotFound("Class".to_string()))?;
    if class.teacher_email != ctx.email {
        return Err(AppError::Forbidden("class belongs to another teacher"));
    }
    Ok(class)
}

/// Trimmed, non-empty request field.
pub(crate) fn required(value: &str, field: &str) -> Result<String, AppError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{field} is required")));
    }
    Ok(value.to_string())
}
