use axum::extract::{Path, State};
use axum::Json;
use uuid::Uuid;

use super::{owned_class, required};
use crate::auth::{AuthContext, Role};
use crate::error::AppError;
use crate::models::{SyllabusEntry, SyllabusUploadResponse, UploadSyllabusRequest};
use crate::state::AppState;
use crate::syllabus::parse_syllabus;

/// PUT /api/classes/:id/syllabus - Parse free text into units and replace the
/// stored syllabus for the subject. Text without unit headers clears it.
pub async fn upload_syllabus(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path(id): Path<Uuid>,
    Json(req): Json<UploadSyllabusRequest>,
) -> Result<Json<SyllabusUploadResponse>, AppError> {
    owned_class(&state, &ctx, id)?;
    let subject = required(&req.subject, "Subject")?;

    let units = parse_syllabus(&req.syllabus_text);
    if units.is_empty() {
        tracing::warn!("Syllabus for '{subject}' in class {id} has no 'Unit N:' headers");
    }
    state.store.replace_syllabus(id, &subject, &units)?;
    tracing::info!("Stored {} syllabus units for '{subject}' in class {id}", units.len());

    Ok(Json(SyllabusUploadResponse {
        class_id: id,
        subject,
        units,
    }))
}

/// GET /api/classes/:id/syllabus/:subject - Stored units for a subject.
/// Teachers must own the class, students must belong to it.
pub async fn get_syllabus(
    State(state): State<AppState>,
    ctx: AuthContext,
    Path((id, subject)): Path<(Uuid, String)>,
) -> Result<Json<Vec<SyllabusEntry>>, AppError> {
    match ctx.role {
        Role::Teacher => {
            owned_class(&state, &ctx, id)?;
        }
        Role::Student => {
            if state.store.student_class(&ctx.email) != Some(id) {
                return Err(AppError::Forbidden("not a member of this class"));
            }
        }
    }

    Ok(Json(state.store.syllabus_units(id, &subject)))
}
