use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use super::{owned_class, required};
use crate::auth::AuthContext;
use crate::error::AppError;
use crate::models::{
    AddStudentRequest, AddSubjectRequest, ClassDetails, CreateClassRequest, SchoolClass, Student,
};
use crate::state::AppState;

/// GET /api/classes - Classes owned by the calling teacher
pub async fn list_classes(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<Vec<SchoolClass>>, AppError> {
    ctx.require_teacher()?;
    Ok(Json(state.store.classes_for_teacher(&ctx.email)))
}

/// POST /api/classes - Create a class
pub async fn create_class(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<CreateClassRequest>,
) -> Result<(StatusCode, Json<SchoolClass>), AppError> {
    ctx.require_teacher()?;
    let name = required(&req.name, "Class name")?;

    let class = state.store.create_class(&name, &ctx.email)?;
    tracing::info!("Class '{}' ({}) created by {}", class.name, class.id, ctx.email);
    Ok((StatusCode::CREATED, Json(class)))
}

/// GET /api/classes/:id - Class with students, subjects and subject averages
pub async fn get_class(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<Json<ClassDetails>, AppError> {
    let class = owned_class(&state, &ctx, id)?;

    Ok(Json(ClassDetails {
        students: state.store.students_in_class(id),
        subjects: state.store.subjects_in_class(id),
        subject_averages: state.store.subject_averages(id),
        class,
    }))
}

/// DELETE /api/classes/:id - Remove a class and everything recorded for it
pub async fn delete_class(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    owned_class(&state, &ctx, id)?;
    state.store.delete_class(id)?;
    tracing::info!("Class {id} deleted by {}", ctx.email);
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/classes/:id/students - Assign a student to the class
pub async fn add_student(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AddStudentRequest>,
) -> Result<(StatusCode, Json<Student>), AppError> {
    owned_class(&state, &ctx, id)?;
    let email = required(&req.email, "Student email")?;

    if let Some(current) = state.store.student_class(&email) {
        if current == id {
            return Err(AppError::Conflict(format!(
                "{email} is already in this class"
            )));
        }
        // A student belongs to one class; only the owning teacher may move them.
        if state
            .store
            .get_class(current)
            .is_some_and(|c| c.teacher_email != ctx.email)
        {
            return Err(AppError::Conflict(format!(
                "{email} is assigned to another teacher's class"
            )));
        }
    }

    let name = req.name.as_deref().map(str::trim).filter(|n| !n.is_empty());
    let student = state.store.add_student(id, &email, name)?;
    Ok((StatusCode::CREATED, Json(student)))
}

/// DELETE /api/classes/:id/students/:email
pub async fn remove_student(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path((id, email)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    owned_class(&state, &ctx, id)?;
    if !state.store.remove_student(id, &email)? {
        return Err(AppError::NotFound("Student".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/classes/:id/subjects - Add a subject; every student gets a 0 mark
pub async fn add_subject(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<AddSubjectRequest>,
) -> Result<(StatusCode, Json<Vec<String>>), AppError> {
    owned_class(&state, &ctx, id)?;
    let subject = required(&req.subject, "Subject")?;

    state.store.add_subject(id, &subject)?;
    Ok((StatusCode::CREATED, Json(state.store.subjects_in_class(id))))
}

/// DELETE /api/classes/:id/subjects/:subject
pub async fn remove_subject(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path((id, subject)): Path<(Uuid, String)>,
) -> Result<StatusCode, AppError> {
    owned_class(&state, &ctx, id)?;
    if !state.store.remove_subject(id, &subject)? {
        return Err(AppError::NotFound("Subject".to_string()));
    }
    Ok(StatusCode::NO_CONTENT)
}
