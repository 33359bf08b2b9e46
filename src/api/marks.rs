use axum::extract::{Path, State};
use axum::Json;

use super::{owned_class, required};
use crate::auth::AuthContext;
use crate::error::AppError;
use crate::models::{MarkRecord, StudentProfile, UpsertMarkRequest};
use crate::state::AppState;

/// Marks are recorded out of 100.
const MAX_MARKS: i64 = 100;

/// PUT /api/marks - Insert or overwrite a student's mark for a subject.
/// Without `class_id` the student's current class is used.
pub async fn upsert_mark(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(req): Json<UpsertMarkRequest>,
) -> Result<Json<MarkRecord>, AppError> {
    ctx.require_teacher()?;
    let email = required(&req.student_email, "Student email")?;
    let subject = required(&req.subject, "Subject")?;
    if !(0..=MAX_MARKS).contains(&req.marks) {
        return Err(AppError::BadRequest(format!(
            "Marks must be between 0 and {MAX_MARKS}"
        )));
    }

    let class_id = match req.class_id {
        Some(id) => id,
        None => state
            .store
            .student_class(&email)
            .ok_or_else(|| AppError::NotFound("Student".to_string()))?,
    };
    owned_class(&state, &ctx, class_id)?;

    let record = state
        .store
        .upsert_mark(&email, class_id, &subject, req.marks)?;
    tracing::debug!("Mark for {email} in '{subject}' set to {}", record.marks);
    Ok(Json(record))
}

/// GET /api/students/:email - Student profile with all recorded marks
pub async fn student_profile(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(email): Path<String>,
) -> Result<Json<StudentProfile>, AppError> {
    ctx.require_teacher()?;
    let student = state
        .store
        .get_student(&email)
        .ok_or_else(|| AppError::NotFound("Student".to_string()))?;
    owned_class(&state, &ctx, student.class_id)?;

    Ok(Json(StudentProfile {
        marks: state.store.marks_for_student(&email),
        student,
    }))
}
