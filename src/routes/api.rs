// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! API routes for authenticated users.

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::{Activity, ActivityAddRequest, ActivityType};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::sync::Arc;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/activity", post(add_activity))
        .route("/api/activity/{watched_id}", get(list_activity))
}

// ─── Activities ──────────────────────────────────────────────

/// Activity as returned to its owner. The owner id is left out.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct ActivityResponse {
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub id: u64,
    #[cfg_attr(feature = "binding-generation", ts(type = "number"))]
    pub watched_id: u64,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[cfg_attr(feature = "binding-generation", ts(optional))]
    pub custom_date: Option<String>,
    pub created_at: String,
}

/// Timestamps go out as second-precision RFC3339 with a `Z` suffix.
fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl From<Activity> for ActivityResponse {
    fn from(a: Activity) -> Self {
        Self {
            id: a.id,
            watched_id: a.watched_id,
            activity_type: a.activity_type,
            data: a.data,
            custom_date: a.custom_date.map(format_utc_rfc3339),
            created_at: format_utc_rfc3339(a.created_at),
        }
    }
}

/// Record a new activity for the current user.
///
/// Bodies that do not deserialize (missing `watchedId`, unknown `type`, ...)
/// are validation errors like any other bad request.
async fn add_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<ActivityAddRequest>, JsonRejection>,
) -> Result<Json<ActivityResponse>> {
    let Json(request) = payload.map_err(|rejection| AppError::Validation(rejection.body_text()))?;

    let activity = state.activity_service.add(user.user_id, request).await?;
    Ok(Json(activity.into()))
}

/// List the current user's activities for one watched item.
async fn list_activity(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(watched_id): Path<u64>,
) -> Result<Json<Vec<ActivityResponse>>> {
    tracing::debug!(user_id = user.user_id, watched_id, "Fetching activity");

    let activities = state
        .activity_service
        .list(user.user_id, watched_id)
        .await?;

    Ok(Json(activities.into_iter().map(Into::into).collect()))
}
