// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Activity service.
//!
//! The only entry point handlers use for activities:
//! 1. Validate the add request
//! 2. Bind the record to the authenticated user
//! 3. Store it, hiding store failures behind an opaque error

use crate::db::ActivityStore;
use crate::error::{AppError, Result};
use crate::models::{Activity, ActivityAddRequest, NewActivity};
use std::sync::Arc;
use validator::{Validate, ValidationErrors};

/// Records and lists activity events for watched items.
#[derive(Clone)]
pub struct ActivityService {
    store: Arc<dyn ActivityStore>,
}

impl ActivityService {
    pub fn new(store: Arc<dyn ActivityStore>) -> Self {
        Self { store }
    }

    /// Add an activity owned by `user_id`.
    ///
    /// `user_id` must come from the authenticated session. The request has
    /// no owner field, so a client can never choose it.
    pub async fn add(&self, user_id: u64, request: ActivityAddRequest) -> Result<Activity> {
        if request.watched_id == 0 {
            return Err(AppError::Validation("watchedId must be set".to_string()));
        }
        request
            .validate()
            .map_err(|e| AppError::Validation(describe_validation(&e)))?;

        let new_activity = NewActivity {
            user_id,
            watched_id: request.watched_id,
            activity_type: request.activity_type,
            data: request.data,
            custom_date: request.custom_date,
        };

        let activity = self.store.create(new_activity).await.map_err(|e| {
            tracing::error!(
                user_id,
                watched_id = request.watched_id,
                error = %e,
                "Error adding activity to database"
            );
            AppError::Persistence("failed adding new activity")
        })?;

        tracing::debug!(
            user_id,
            activity_id = activity.id,
            watched_id = activity.watched_id,
            activity_type = %activity.activity_type,
            "Added activity"
        );

        Ok(activity)
    }

    /// All of `user_id`'s activities for one watched item.
    pub async fn list(&self, user_id: u64, watched_id: u64) -> Result<Vec<Activity>> {
        self.store.query(user_id, watched_id).await.map_err(|e| {
            tracing::error!(
                user_id,
                watched_id,
                error = %e,
                "Failed getting activity from database"
            );
            AppError::Persistence("failed getting activity")
        })
    }
}

/// Flatten validator errors into one client-facing message.
fn describe_validation(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{} is invalid", field),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
