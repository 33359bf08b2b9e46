use axum::extract::State;
use axum::Json;

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::models::Resource;
use crate::state::AppState;

/// PUT /api/resources - Replace the resource catalog
pub async fn replace_resources(
    State(state): State<AppState>,
    ctx: AuthContext,
    Json(resources): Json<Vec<Resource>>,
) -> Result<Json<usize>, AppError> {
    ctx.require_teacher()?;

    if let Some(bad) = resources
        .iter()
        .find(|r| r.subject.trim().is_empty() || r.link.trim().is_empty())
    {
        return Err(AppError::BadRequest(format!(
            "Resource '{}' needs a subject and a link",
            bad.title
        )));
    }

    let count = resources.len();
    state.store.replace_resources(resources)?;
    tracing::info!("Resource catalog replaced with {count} entries");
    Ok(Json(count))
}
