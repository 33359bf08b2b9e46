use axum::extract::State;
use axum::Json;

use crate::auth::AuthContext;
use crate::error::AppError;
use crate::models::{ResourceRecommendations, StudentDashboard, SubjectMark};
use crate::recommend::{recommend_resources, weak_subjects, Recommender};
use crate::state::AppState;

/// GET /api/me/dashboard - Own marks, weak subjects and web recommendations.
///
/// Never fails because of the search provider: subjects whose search failed
/// carry an `error` and no results, the marks list is always returned.
pub async fn dashboard(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<StudentDashboard>, AppError> {
    ctx.require_student()?;

    let Some(class_id) = state.store.student_class(&ctx.email) else {
        tracing::debug!("{} is not assigned to a class", ctx.email);
        return Ok(Json(StudentDashboard {
            class_id: None,
            marks: Vec::new(),
            weak_subjects: Vec::new(),
            recommendations: Default::default(),
        }));
    };

    let marks = state
        .store
        .marks_for(&ctx.email, class_id)
        .into_iter()
        .map(|m| SubjectMark {
            subject: m.subject,
            marks: m.marks,
        })
        .collect();
    let weak = weak_subjects(
        &state.store,
        &ctx.email,
        class_id,
        state.config.recommend.weak_threshold,
    );

    let recommender = Recommender::new(
        &state.store,
        state.search.as_ref(),
        &state.config.recommend,
    );
    let recommendations = recommender.recommend_for_student(&ctx.email, class_id).await;

    Ok(Json(StudentDashboard {
        class_id: Some(class_id),
        marks,
        weak_subjects: weak,
        recommendations,
    }))
}

/// GET /api/me/resources - Catalog resources for each weak subject
pub async fn resource_recommendations(
    State(state): State<AppState>,
    ctx: AuthContext,
) -> Result<Json<ResourceRecommendations>, AppError> {
    ctx.require_student()?;

    let Some(class_id) = state.store.student_class(&ctx.email) else {
        return Ok(Json(ResourceRecommendations {
            class_id: None,
            weak_subjects: Vec::new(),
            recommendations: Default::default(),
        }));
    };

    let settings = &state.config.recommend;
    Ok(Json(ResourceRecommendations {
        class_id: Some(class_id),
        weak_subjects: weak_subjects(&state.store, &ctx.email, class_id, settings.weak_threshold),
        recommendations: recommend_resources(&state.store, &ctx.email, class_id, settings),
    }))
}
