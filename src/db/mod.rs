//! Database layer.
//!
//! [`ActivityStore`] is the persistence contract. It does no business
//! validation; callers go through `ActivityService`.

pub mod firestore;
pub mod memory;

pub use firestore::FirestoreDb;
pub use memory::MemoryDb;

use crate::models::{Activity, NewActivity};
use async_trait::async_trait;

/// Collection names as constants.
pub mod collections {
    pub const ACTIVITIES: &str = "activities";
    /// Id counters (one document per counted collection)
    pub const COUNTERS: &str = "counters";
}

/// Store failures. Carries full diagnostic detail, so it is logged by the
/// service layer and never returned to API clients.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database not connected (offline mode)")]
    Offline,

    #[error("Database error: {0}")]
    Backend(String),

    #[error("Write conflict: {0}")]
    Conflict(String),
}

/// Durable storage for activity records.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Store a new activity, assigning its id and creation time.
    async fn create(&self, activity: NewActivity) -> Result<Activity, StoreError>;

    /// All activities for one user and watched item, in ascending id order.
    ///
    /// No matches is an empty vec, not an error.
    async fn query(&self, user_id: u64, watched_id: u64) -> Result<Vec<Activity>, StoreError>;
}
