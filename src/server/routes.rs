use std::sync::Arc;

use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
    http::StatusCode,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::AppState;
use super::error::ApiError;
use super::extract::{Id, ValidatedJson};
use super::views::{ApiResponse, Health, ProfileView, ProjectView, SearchView, SkillView, WorkView};
use crate::model::{Profile, ProfileInput};
use crate::query::{QueryEngine, TopSkill};

type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[derive(Deserialize)]
pub struct ProjectFilter {
    pub skill: Option<String>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

pub async fn index() -> Json<ApiResponse<serde_json::Value>> {
    Json(ApiResponse::ok(json!({
        "name": "Folio",
        "version": env!("CARGO_PKG_VERSION"),
        "description": "Personal Profile API with Query Capabilities",
        "endpoints": {
            "health": "/api/health",
            "profile": "/api/profile",
            "projects": "/api/projects",
            "skills": "/api/skills",
            "work": "/api/work",
            "search": "/api/search",
        },
    })))
}

pub async fn health() -> Json<ApiResponse<Health>> {
    Json(ApiResponse::ok(Health {
        status: "ok",
        timestamp: Utc::now(),
    }))
}

pub async fn not_found() -> ApiError {
    ApiError::RouteNotFound
}

// ========== Profile ==========

pub async fn get_profile(State(state): State<Arc<AppState>>) -> ApiResult<ProfileView> {
    let store = state.store.lock().await;
    let full = store.get_profile_with_relations()?;
    Ok(Json(ApiResponse::ok(full.into())))
}

pub async fn create_profile(
    State(state): State<Arc<AppState>>,
    ValidatedJson(input): ValidatedJson<ProfileInput>,
) -> Result<(StatusCode, Json<ApiResponse<Profile>>), ApiError> {
    let store = state.store.lock().await;
    let profile = store.create_profile(&input)?;
    tracing::info!("Profile created: {}", profile.id);
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    Id(id): Id,
    ValidatedJson(input): ValidatedJson<ProfileInput>,
) -> ApiResult<Profile> {
    let store = state.store.lock().await;
    let profile = store.update_profile(id, &input)?;
    tracing::info!("Profile updated: {}", profile.id);
    Ok(Json(ApiResponse::ok(profile)))
}

pub async fn delete_profile(State(state): State<Arc<AppState>>, Id(id): Id) -> ApiResult<()> {
    let store = state.store.lock().await;
    store.delete_profile(id)?;
    tracing::info!("Profile deleted: {}", id);
    Ok(Json(ApiResponse::message("Profile deleted successfully")))
}

// ========== Projects ==========

pub async fn list_projects(
    State(state): State<Arc<AppState>>,
    filter: Result<Query<ProjectFilter>, QueryRejection>,
) -> ApiResult<Vec<ProjectView>> {
    let Query(filter) = filter.map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

    let store = state.store.lock().await;
    let projects = store.list_projects(filter.skill.as_deref())?;
    Ok(Json(ApiResponse::ok(
        projects.into_iter().map(ProjectView::from).collect(),
    )))
}

pub async fn get_project(State(state): State<Arc<AppState>>, Id(id): Id) -> ApiResult<ProjectView> {
    let store = state.store.lock().await;
    let project = store.get_project(id)?;
    Ok(Json(ApiResponse::ok(project.into())))
}

// ========== Skills & Work ==========

pub async fn list_skills(State(state): State<Arc<AppState>>) -> ApiResult<Vec<SkillView>> {
    let store = state.store.lock().await;
    let skills = store.list_skills()?;
    Ok(Json(ApiResponse::ok(
        skills.into_iter().map(SkillView::from).collect(),
    )))
}

pub async fn top_skills(State(state): State<Arc<AppState>>) -> ApiResult<Vec<TopSkill>> {
    let store = state.store.lock().await;
    let top = QueryEngine::new(&store).top_skills()?;
    Ok(Json(ApiResponse::ok(top)))
}

pub async fn list_work(State(state): State<Arc<AppState>>) -> ApiResult<Vec<WorkView>> {
    let store = state.store.lock().await;
    let work = store.list_work()?;
    Ok(Json(ApiResponse::ok(
        work.into_iter().map(WorkView::from).collect(),
    )))
}

// ========== Search ==========

/// A missing, empty or malformed `q` yields empty results, never an error
pub async fn search(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> ApiResult<SearchView> {
    let query = params.ok().and_then(|Query(p)| p.q);

    let store = state.store.lock().await;
    let results = QueryEngine::new(&store).search(query.as_deref())?;
    Ok(Json(ApiResponse::ok(results.into())))
}
