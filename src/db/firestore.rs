// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Firestore client wrapper implementing [`ActivityStore`].
//!
//! Layout:
//! - `activities/{id}`: one document per activity
//! - `counters/activities`: last id handed out
//!
//! Listing needs a composite index on (`user_id`, `watched_id`, `id`).

use crate::db::{collections, ActivityStore, StoreError};
use crate::models::{Activity, NewActivity};
use async_trait::async_trait;
use firestore::errors::FirestoreError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Attempts at the counter transaction before giving up on contention.
const MAX_CREATE_ATTEMPTS: u32 = 5;
/// Backoff step between attempts, multiplied by the attempt number.
const CREATE_RETRY_BACKOFF: Duration = Duration::from_millis(50);

/// Id counter document.
#[derive(Debug, Default, Serialize, Deserialize)]
struct IdCounter {
    last_id: u64,
}

/// Firestore database client.
#[derive(Clone)]
pub struct FirestoreDb {
    client: Option<firestore::FirestoreDb>,
}

impl FirestoreDb {
    /// Create a new Firestore client.
    ///
    /// For local development with emulator, set FIRESTORE_EMULATOR_HOST.
    pub async fn new(project_id: &str) -> Result<Self, StoreError> {
        // If the emulator environment variable is set, use unauthenticated connection
        // to avoid local credential warnings and leakage.
        if std::env::var("FIRESTORE_EMULATOR_HOST").is_ok() {
            return Self::create_emulator_client(project_id).await;
        }

        let client = firestore::FirestoreDb::new(project_id)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Firestore: {}", e)))?;

        tracing::info!(project = project_id, "Connected to Firestore");

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a Firestore client for the emulator with unauthenticated access.
    async fn create_emulator_client(project_id: &str) -> Result<Self, StoreError> {
        tracing::info!("Using unauthenticated connection for Firestore Emulator");

        let token_source = gcloud_sdk::ExternalJwtFunctionSource::new(|| async {
            Ok(gcloud_sdk::Token {
                token_type: "Bearer".to_string(),
                token: gcloud_sdk::SecretValue::new(
                    "eyJhbGciOiJub25lIn0.eyJ1aWQiOiJ0ZXN0In0."
                        .to_string()
                        .into(),
                ),
                expiry: chrono::Utc::now() + chrono::Duration::hours(1),
            })
        });

        let options = firestore::FirestoreDbOptions::new(project_id.to_string());

        let client = firestore::FirestoreDb::with_options_token_source(
            options,
            gcloud_sdk::GCP_DEFAULT_SCOPES.clone(),
            gcloud_sdk::TokenSourceType::ExternalSource(Box::new(token_source)),
        )
        .await
        .map_err(|e| {
            StoreError::Backend(format!("Failed to connect to Firestore Emulator: {}", e))
        })?;

        tracing::info!(
            project = project_id,
            "Connected to Firestore (Emulator/Unauthenticated)"
        );

        Ok(Self {
            client: Some(client),
        })
    }

    /// Create a mock Firestore client for testing (offline mode).
    ///
    /// All database operations will return [`StoreError::Offline`].
    pub fn new_mock() -> Self {
        Self { client: None }
    }

    /// Helper to get the client or return an error if offline.
    fn get_client(&self) -> Result<&firestore::FirestoreDb, StoreError> {
        self.client.as_ref().ok_or(StoreError::Offline)
    }

    /// One attempt at allocating an id and writing the activity atomically.
    async fn try_create(&self, activity: &NewActivity) -> Result<Activity, StoreError> {
        let client = self.get_client()?;

        let mut transaction = client
            .begin_transaction()
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to begin transaction: {}", e)))?;

        // Read the counter through the transaction so a concurrent writer
        // makes this commit fail instead of reusing an id.
        let tx_client = client.clone_with_consistency_selector(
            firestore::FirestoreConsistencySelector::Transaction(
                transaction.transaction_id().clone(),
            ),
        );
        let counter: Option<IdCounter> = tx_client
            .fluent()
            .select()
            .by_id_in(collections::COUNTERS)
            .obj()
            .one(collections::ACTIVITIES)
            .await
            .map_err(|e| classify_error("Failed to read id counter in transaction", e))?;

        let id = counter.unwrap_or_default().last_id + 1;
        let stored = activity.clone().into_activity(id, chrono::Utc::now());

        client
            .fluent()
            .update()
            .in_col(collections::COUNTERS)
            .document_id(collections::ACTIVITIES)
            .object(&IdCounter { last_id: id })
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                StoreError::Backend(format!("Failed to add counter to transaction: {}", e))
            })?;

        client
            .fluent()
            .update()
            .in_col(collections::ACTIVITIES)
            .document_id(id.to_string())
            .object(&stored)
            .add_to_transaction(&mut transaction)
            .map_err(|e| {
                StoreError::Backend(format!("Failed to add activity to transaction: {}", e))
            })?;

        transaction
            .commit()
            .await
            .map_err(|e| classify_error("Transaction commit failed", e))?;

        Ok(stored)
    }
}

/// Contention (gRPC `ABORTED` and other errors Firestore marks retryable)
/// becomes [`StoreError::Conflict`] so `create` retries it.
fn classify_error(context: &str, e: FirestoreError) -> StoreError {
    match &e {
        FirestoreError::DatabaseError(db_err) if db_err.retry_possible => {
            StoreError::Conflict(format!("{}: {}", context, e))
        }
        _ => StoreError::Backend(format!("{}: {}", context, e)),
    }
}

#[async_trait]
impl ActivityStore for FirestoreDb {
    async fn create(&self, activity: NewActivity) -> Result<Activity, StoreError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.try_create(&activity).await {
                Err(StoreError::Conflict(msg)) if attempt < MAX_CREATE_ATTEMPTS => {
                    tracing::warn!(
                        user_id = activity.user_id,
                        watched_id = activity.watched_id,
                        attempt,
                        error = %msg,
                        "Activity id allocation conflicted, retrying"
                    );
                    tokio::time::sleep(CREATE_RETRY_BACKOFF * attempt).await;
                }
                result => return result,
            }
        }
    }

    async fn query(&self, user_id: u64, watched_id: u64) -> Result<Vec<Activity>, StoreError> {
        self.get_client()?
            .fluent()
            .select()
            .from(collections::ACTIVITIES)
            .filter(move |q| {
                q.for_all([
                    q.field("user_id").eq(user_id),
                    q.field("watched_id").eq(watched_id),
                ])
            })
            .order_by([("id", firestore::FirestoreQueryDirection::Ascending)])
            .obj()
            .query()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ActivityType;

    #[tokio::test]
    async fn test_offline_create_fails() {
        let db = FirestoreDb::new_mock();
        let result = db
            .create(NewActivity {
                user_id: 1,
                watched_id: 2,
                activity_type: ActivityType::AddedWatched,
                data: "x".to_string(),
                custom_date: None,
            })
            .await;

        assert!(matches!(result, Err(StoreError::Offline)));
    }

    #[test]
    fn test_aborted_transaction_is_retryable_conflict() {
        let err = FirestoreError::from(gcloud_sdk::tonic::Status::aborted(
            "Transaction lock timeout",
        ));
        assert!(matches!(
            classify_error("Transaction commit failed", err),
            StoreError::Conflict(_)
        ));
    }

    #[test]
    fn test_invalid_argument_is_backend_error() {
        let err = FirestoreError::from(gcloud_sdk::tonic::Status::invalid_argument(
            "bad field path",
        ));
        assert!(matches!(
            classify_error("Transaction commit failed", err),
            StoreError::Backend(_)
        ));
    }

    #[tokio::test]
    async fn test_offline_query_fails() {
        let db = FirestoreDb::new_mock();
        assert!(matches!(db.query(1, 2).await, Err(StoreError::Offline)));
    }
}
